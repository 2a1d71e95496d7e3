use crate::error::AppError;
use std::env;
use std::path::PathBuf;

pub const DEFAULT_DATA_DIR: &str = "data";
pub const DEFAULT_TARGET_PLAYER: &str = "Aezurly";
pub const DEFAULT_LOG_LEVEL: &str = "warn";

#[derive(Debug, Clone)]
pub struct Config {
    pub data_dir: PathBuf,
    pub target_player: String,
    pub log_level: String,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            data_dir: PathBuf::from(DEFAULT_DATA_DIR),
            target_player: DEFAULT_TARGET_PLAYER.to_string(),
            log_level: DEFAULT_LOG_LEVEL.to_string(),
        }
    }
}

impl Config {
    pub fn from_env() -> Result<Self, AppError> {
        dotenvy::dotenv().ok();
        Self::from_vars(|key| env::var(key).ok())
    }

    /// Build a config from an arbitrary variable lookup.
    pub fn from_vars<F>(lookup: F) -> Result<Self, AppError>
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Config::default();

        let data_dir = lookup("LEAGUE_STATS_DATA_DIR")
            .map(PathBuf::from)
            .unwrap_or(defaults.data_dir);

        let target_player = match lookup("LEAGUE_STATS_TARGET_PLAYER") {
            Some(name) if name.trim().is_empty() => {
                return Err(AppError::ConfigError(
                    "LEAGUE_STATS_TARGET_PLAYER is set but empty".to_string(),
                ));
            }
            Some(name) => name.trim().to_string(),
            None => defaults.target_player,
        };

        let log_level = lookup("LEAGUE_STATS_LOG").unwrap_or(defaults.log_level);

        Ok(Config {
            data_dir,
            target_player,
            log_level,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn test_defaults_when_nothing_set() {
        let config = Config::from_vars(lookup_from(&[])).unwrap();
        assert_eq!(config.data_dir, PathBuf::from("data"));
        assert_eq!(config.target_player, "Aezurly");
        assert_eq!(config.log_level, "warn");
    }

    #[test]
    fn test_overrides_from_vars() {
        let config = Config::from_vars(lookup_from(&[
            ("LEAGUE_STATS_DATA_DIR", "/tmp/games"),
            ("LEAGUE_STATS_TARGET_PLAYER", " Faker "),
            ("LEAGUE_STATS_LOG", "debug"),
        ]))
        .unwrap();
        assert_eq!(config.data_dir, PathBuf::from("/tmp/games"));
        assert_eq!(config.target_player, "Faker");
        assert_eq!(config.log_level, "debug");
    }

    #[test]
    fn test_empty_target_player_is_rejected() {
        let err = Config::from_vars(lookup_from(&[("LEAGUE_STATS_TARGET_PLAYER", "  ")]))
            .unwrap_err();
        assert!(matches!(err, AppError::ConfigError(_)));
    }
}
