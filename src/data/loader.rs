use crate::error::AppError;
use serde::Serialize;
use std::fs;
use std::path::{Path, PathBuf};
use tracing::{debug, warn};

use super::models::MatchDto;
use super::record::Match;

/// A file that could not be turned into a [`Match`].
#[derive(Debug, Clone, Serialize)]
pub struct LoadFailure {
    pub path: PathBuf,
    pub reason: String,
}

/// Result of loading a directory: the good records plus everything skipped.
#[derive(Debug, Default, Clone, Serialize)]
pub struct LoadReport {
    pub matches: Vec<Match>,
    pub failures: Vec<LoadFailure>,
}

impl LoadReport {
    pub fn files_seen(&self) -> usize {
        self.matches.len() + self.failures.len()
    }
}

pub fn match_id_for(path: &Path) -> String {
    path.file_stem()
        .and_then(|stem| stem.to_str())
        .map(|stem| stem.to_string())
        .unwrap_or_else(|| path.display().to_string())
}

pub fn parse_match(id: &str, path: &Path, body: &str) -> Result<Match, AppError> {
    let dto: MatchDto = serde_json::from_str(body).map_err(|source| AppError::JsonError {
        path: path.to_path_buf(),
        source,
    })?;

    Match::from_dto(id, dto).map_err(|issues| AppError::InvalidRecord {
        match_id: id.to_string(),
        issues,
    })
}

/// Load and validate a single match file.
pub fn load_match_file(path: &Path) -> Result<Match, AppError> {
    let body = fs::read_to_string(path).map_err(|source| AppError::FileRead {
        path: path.to_path_buf(),
        source,
    })?;

    parse_match(&match_id_for(path), path, &body)
}

/// All `.json` files directly inside `dir`, sorted by name.
pub fn find_match_files(dir: &Path) -> Result<Vec<PathBuf>, AppError> {
    if !dir.is_dir() {
        return Err(AppError::DataDirNotFound(dir.to_path_buf()));
    }

    let entries = fs::read_dir(dir).map_err(|source| AppError::FileRead {
        path: dir.to_path_buf(),
        source,
    })?;

    let mut files: Vec<PathBuf> = entries
        .filter_map(|entry| entry.ok())
        .map(|entry| entry.path())
        .filter(|path| {
            path.is_file() && path.extension().and_then(|ext| ext.to_str()) == Some("json")
        })
        .collect();

    if files.is_empty() {
        return Err(AppError::NoMatchFiles(dir.to_path_buf()));
    }

    files.sort();
    Ok(files)
}

pub fn load_directory(dir: &Path) -> Result<LoadReport, AppError> {
    load_directory_with(dir, |_| {})
}

/// Load every match file in `dir`. A bad file is recorded in the report and
/// loading moves on; only a missing or empty directory is fatal.
pub fn load_directory_with<F>(dir: &Path, on_file: F) -> Result<LoadReport, AppError>
where
    F: FnMut(&Path),
{
    let files = find_match_files(dir)?;
    let report = load_files(&files, on_file);

    debug!(
        "Loaded {} matches from {} ({} skipped)",
        report.matches.len(),
        dir.display(),
        report.failures.len()
    );

    Ok(report)
}

pub fn load_files<F>(files: &[PathBuf], mut on_file: F) -> LoadReport
where
    F: FnMut(&Path),
{
    let mut report = LoadReport::default();

    for path in files {
        match load_match_file(path) {
            Ok(game) => report.matches.push(game),
            Err(e) => {
                warn!("Skipping {}: {}", path.display(), e);
                report.failures.push(LoadFailure {
                    path: path.clone(),
                    reason: e.to_string(),
                });
            }
        }
        on_file(path);
    }

    report
}
