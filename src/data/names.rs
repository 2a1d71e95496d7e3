//! Player-name normalization.
//!
//! Replay exports occasionally store UTF-8 names that were decoded as
//! Latin-1 or Windows-1252 along the way (`"AÃ©zurly"` instead of
//! `"Aézurly"`). Names are repaired and NFC-normalized before being used as
//! player identities.

use encoding_rs::WINDOWS_1252;
use unicode_normalization::char::is_combining_mark;
use unicode_normalization::UnicodeNormalization;

/// Undo UTF-8 → Latin-1 (then Windows-1252) mojibake. Returns the input
/// unchanged when neither re-encoding yields valid UTF-8.
pub fn repair_mojibake(name: &str) -> String {
    if name.is_ascii() {
        return name.to_string();
    }

    if let Some(repaired) = from_latin1(name) {
        return repaired;
    }

    let (bytes, _, had_errors) = WINDOWS_1252.encode(name);
    if had_errors {
        return name.to_string();
    }
    String::from_utf8(bytes.into_owned()).unwrap_or_else(|_| name.to_string())
}

fn from_latin1(name: &str) -> Option<String> {
    if name.chars().any(|c| c as u32 > 0xFF) {
        return None;
    }
    let bytes: Vec<u8> = name.chars().map(|c| c as u32 as u8).collect();
    String::from_utf8(bytes).ok()
}

/// Canonical identity used for player keys.
pub fn normalize_player_name(name: &str) -> String {
    repair_mojibake(name.trim()).nfc().collect()
}

/// Case- and accent-insensitive comparison key.
pub fn fold_key(name: &str) -> String {
    normalize_player_name(name)
        .nfd()
        .filter(|c| !is_combining_mark(*c))
        .flat_map(char::to_lowercase)
        .collect()
}
