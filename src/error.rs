use std::path::PathBuf;
use thiserror::Error;

#[derive(Error, Debug)]
pub enum AppError {
    #[error("Data directory not found: {0}")]
    DataDirNotFound(PathBuf),

    #[error("No JSON match files found in {0}")]
    NoMatchFiles(PathBuf),

    #[error("Failed to read {path}: {source}")]
    FileRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("JSON parsing error in {path}: {source}")]
    JsonError {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    #[error("Invalid match record {match_id}: {}", format_issues(.issues))]
    InvalidRecord {
        match_id: String,
        issues: Vec<RecordIssue>,
    },

    #[error("Player not found: {0}")]
    PlayerNotFound(String),

    #[error("No games could be analyzed")]
    NoGamesAnalyzed,

    #[error("Configuration error: {0}")]
    ConfigError(String),

    #[error("Output error: {0}")]
    OutputError(String),
}

/// A single problem found while validating one match record.
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum RecordIssue {
    #[error("participant {index}: missing field {field}")]
    MissingField { index: usize, field: &'static str },

    #[error("participant {index}: field {field} is not a valid count: {value}")]
    InvalidNumber {
        index: usize,
        field: &'static str,
        value: String,
    },

    #[error("participant {index}: unknown team id {value}")]
    UnknownTeam { index: usize, value: String },

    #[error("team {index}: unknown team id {value}")]
    UnknownTeamEntry { index: usize, value: String },

    #[error("team {index}: {objective} kills is not a valid count: {value}")]
    InvalidObjective {
        index: usize,
        objective: &'static str,
        value: String,
    },

    #[error("game duration is not a valid number: {0}")]
    InvalidDuration(String),
}

fn format_issues(issues: &[RecordIssue]) -> String {
    issues
        .iter()
        .map(|issue| issue.to_string())
        .collect::<Vec<_>>()
        .join("; ")
}
