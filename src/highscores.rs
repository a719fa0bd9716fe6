//! Persist high scores to disk as JSON (data dir / neontris / highscores.json).

use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};
use thiserror::Error;
use tracing::{debug, warn};

use crate::scoreboard::{DEFAULT_NAME, ScoreEntry, Scoreboard};

const DIRNAME: &str = "neontris";
const FILENAME: &str = "highscores.json";

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("malformed score file: {0}")]
    Json(#[from] serde_json::Error),
}

/// Somewhere the ranked list can be read from and written to.
pub trait ScoreStore {
    fn load(&self) -> Result<Vec<ScoreEntry>, StoreError>;
    fn save(&self, entries: &[ScoreEntry]) -> Result<(), StoreError>;
}

/// On disk, a record is either `{"name": .., "score": ..}` or, in files
/// written by older versions, a bare score.
#[derive(Deserialize)]
#[serde(untagged)]
enum StoredScore {
    Entry(ScoreEntry),
    Legacy(u32),
}

impl From<StoredScore> for ScoreEntry {
    fn from(s: StoredScore) -> Self {
        match s {
            StoredScore::Entry(e) => e,
            StoredScore::Legacy(score) => ScoreEntry::new(DEFAULT_NAME, score),
        }
    }
}

/// Parse score file contents, upgrading legacy records.
pub fn parse_scores(s: &str) -> Result<Vec<ScoreEntry>, StoreError> {
    let stored: Vec<StoredScore> = serde_json::from_str(s)?;
    Ok(stored.into_iter().map(ScoreEntry::from).collect())
}

/// Default location of the score file; falls back to the working directory.
pub fn default_path() -> PathBuf {
    dirs::data_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join(DIRNAME)
        .join(FILENAME)
}

#[derive(Debug, Clone)]
pub struct JsonFileStore {
    path: PathBuf,
}

impl JsonFileStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl ScoreStore for JsonFileStore {
    fn load(&self) -> Result<Vec<ScoreEntry>, StoreError> {
        let content = fs::read_to_string(&self.path)?;
        let entries = parse_scores(&content)?;
        debug!(path = %self.path.display(), count = entries.len(), "loaded high scores");
        Ok(entries)
    }

    /// Creates the parent directory if needed.
    fn save(&self, entries: &[ScoreEntry]) -> Result<(), StoreError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }
        let json = serde_json::to_string(entries)?;
        fs::write(&self.path, json)?;
        debug!(path = %self.path.display(), count = entries.len(), "saved high scores");
        Ok(())
    }
}

/// Persist `scoreboard` on a detached thread so the game loop never waits
/// on the disk.
pub fn save_in_background<S>(store: S, scoreboard: Scoreboard)
where
    S: ScoreStore + Send + 'static,
{
    let spawned = std::thread::Builder::new()
        .name("score-save".into())
        .spawn(move || scoreboard.persist(&store));
    if let Err(e) = spawned {
        warn!("could not start score save: {e}");
    }
}
