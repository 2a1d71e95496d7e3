use serde::Deserialize;
use std::collections::HashMap;

// Match export as written by the replay tooling, one file per game
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct MatchDto {
    #[serde(default)]
    pub game_duration: Option<RawValue>, // milliseconds
    #[serde(default)]
    pub game_version: Option<String>,
    #[serde(default)]
    pub participants: Vec<ParticipantDto>,
    #[serde(default)]
    pub teams: Vec<TeamDto>,
}

/// Per-team block; `teamId` may be absent, in which case list order decides the side.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(rename_all = "camelCase")]
pub struct TeamDto {
    #[serde(default)]
    pub team_id: Option<RawValue>,
    #[serde(default)]
    pub objectives: Option<ObjectivesDto>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ObjectivesDto {
    #[serde(default)]
    pub champion: Option<ObjectiveDto>,
    #[serde(default)]
    pub dragon: Option<ObjectiveDto>,
    #[serde(default)]
    pub baron: Option<ObjectiveDto>,
    #[serde(default)]
    pub tower: Option<ObjectiveDto>,
}

#[derive(Debug, Deserialize, Clone, Default)]
pub struct ObjectiveDto {
    #[serde(default)]
    pub kills: Option<RawValue>,
}

/// One participant, kept as a loose field map because exports mix
/// `SCREAMING_SNAKE_CASE` and `camelCase` keys and store numbers as strings.
#[derive(Debug, Deserialize, Clone, Default)]
#[serde(transparent)]
pub struct ParticipantDto {
    pub fields: HashMap<String, RawValue>,
}

impl ParticipantDto {
    /// Look up a field by its primary name, falling back to the alternate spelling.
    pub fn get(&self, field: &Field) -> Option<&RawValue> {
        self.fields
            .get(field.primary)
            .or_else(|| self.fields.get(field.alternate))
    }
}

#[derive(Debug, Deserialize, Clone, PartialEq)]
#[serde(untagged)]
pub enum RawValue {
    Bool(bool),
    Int(i64),
    Float(f64),
    Text(String),
    Other(serde_json::Value),
}

impl RawValue {
    pub fn as_text(&self) -> Option<String> {
        match self {
            RawValue::Text(s) => Some(s.clone()),
            RawValue::Int(n) => Some(n.to_string()),
            RawValue::Float(f) => Some(f.to_string()),
            RawValue::Bool(b) => Some(b.to_string()),
            RawValue::Other(_) => None,
        }
    }

    /// Non-negative integer count; `Err` carries the offending text.
    pub fn as_count(&self) -> Result<u64, String> {
        match self {
            RawValue::Int(n) if *n >= 0 => Ok(*n as u64),
            // 2^64 and up would saturate on the cast
            RawValue::Float(f) if *f >= 0.0 && f.fract() == 0.0 && *f < u64::MAX as f64 => {
                Ok(*f as u64)
            }
            RawValue::Text(s) => {
                let trimmed = s.trim();
                if trimmed.is_empty() {
                    return Ok(0);
                }
                trimmed.parse::<u64>().map_err(|_| s.clone())
            }
            other => Err(other.describe()),
        }
    }

    pub fn as_win(&self) -> bool {
        match self {
            RawValue::Bool(b) => *b,
            RawValue::Int(n) => *n == 1,
            RawValue::Float(f) => *f == 1.0,
            RawValue::Text(s) => matches!(s.trim(), "Win" | "1" | "true" | "True"),
            RawValue::Other(_) => false,
        }
    }

    fn describe(&self) -> String {
        match self {
            RawValue::Other(value) => value.to_string(),
            other => other.as_text().unwrap_or_default(),
        }
    }
}

/// A participant field with its two accepted spellings.
#[derive(Debug, Clone, Copy)]
pub struct Field {
    pub primary: &'static str,
    pub alternate: &'static str,
}

macro_rules! fields {
    ($($name:ident => $primary:literal, $alternate:literal;)*) => {
        $(pub const $name: Field = Field { primary: $primary, alternate: $alternate };)*
    };
}

pub mod field {
    use super::Field;

    fields! {
        NAME => "RIOT_ID_GAME_NAME", "riotIdGameName";
        CHAMPION => "SKIN", "skin";
        TEAM => "TEAM", "team";
        POSITION => "INDIVIDUAL_POSITION", "individualPosition";
        WIN => "WIN", "win";
        KILLS => "CHAMPIONS_KILLED", "championsKilled";
        DEATHS => "NUM_DEATHS", "numDeaths";
        ASSISTS => "ASSISTS", "assists";
        DAMAGE => "TOTAL_DAMAGE_DEALT_TO_CHAMPIONS", "totalDamageDealtToChampions";
        DAMAGE_TAKEN => "TOTAL_DAMAGE_TAKEN", "totalDamageTaken";
        GOLD_EARNED => "GOLD_EARNED", "goldEarned";
        GOLD_SPENT => "GOLD_SPENT", "goldSpent";
        MINIONS => "MINIONS_KILLED", "minionsKilled";
        NEUTRAL_MINIONS => "NEUTRAL_MINIONS_KILLED", "neutralMinionsKilled";
        VISION_SCORE => "VISION_SCORE", "visionScore";
        LEVEL => "LEVEL", "level";
        CC_TIME => "TOTAL_TIME_CROWD_CONTROL_DEALT", "totalTimeCrowdControlDealt";
        TOTAL_HEAL => "TOTAL_HEAL", "totalHeal";
        HEAL_ON_TEAMMATES => "TOTAL_HEALING_ON_TEAMMATES", "totalHealingOnTeammates";
    }
}
