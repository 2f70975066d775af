use cardrush_core::ScoreStore;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};

const BEST_SCHEMA_VERSION: u32 = 1;

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SavedBest {
    pub version: u32,
    pub best_score: i64,
}

pub fn default_best_path() -> Option<PathBuf> {
    if let Some(path) = std::env::var_os("CARDRUSH_BEST") {
        return Some(PathBuf::from(path));
    }
    std::env::var_os("HOME").map(|home| PathBuf::from(home).join(".cardrush_best.json"))
}

pub fn write_best_file(path: &Path, best_score: i64) -> Result<(), String> {
    let payload = SavedBest {
        version: BEST_SCHEMA_VERSION,
        best_score,
    };
    let body = serde_json::to_string_pretty(&payload).map_err(|err| err.to_string())?;
    fs::write(path, body).map_err(|err| err.to_string())
}

/// Reads a saved best score. A missing file is a fresh install, not an error.
pub fn read_best_file(path: &Path) -> Result<Option<i64>, String> {
    let body = match fs::read_to_string(path) {
        Ok(body) => body,
        Err(err) if err.kind() == ErrorKind::NotFound => return Ok(None),
        Err(err) => return Err(err.to_string()),
    };
    let payload: SavedBest = serde_json::from_str(&body).map_err(|err| err.to_string())?;
    if payload.version != BEST_SCHEMA_VERSION {
        return Err(format!(
            "unsupported best score version {} (expected {})",
            payload.version, BEST_SCHEMA_VERSION
        ));
    }
    Ok(Some(payload.best_score.max(0)))
}

/// Best score kept in a small JSON file. IO failures are reported on stderr
/// and otherwise ignored so a read-only home never stops a run.
#[derive(Debug, Clone)]
pub struct FileScoreStore {
    path: PathBuf,
    failures: usize,
}

impl FileScoreStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            failures: 0,
        }
    }

    pub fn failures(&self) -> usize {
        self.failures
    }
}

impl ScoreStore for FileScoreStore {
    fn load(&self) -> i64 {
        match read_best_file(&self.path) {
            Ok(best) => best.unwrap_or(0),
            Err(err) => {
                eprintln!("best score warning: {err}");
                0
            }
        }
    }

    fn save(&mut self, best: i64) {
        if let Err(err) = write_best_file(&self.path, best) {
            self.failures += 1;
            eprintln!("best score warning: {err}");
        }
    }
}
