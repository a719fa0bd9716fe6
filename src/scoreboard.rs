//! Ranked top-five list of (name, score).

use serde::{Deserialize, Serialize};
use tracing::warn;

use crate::highscores::ScoreStore;

/// Entries kept on the board.
pub const MAX_ENTRIES: usize = 5;

/// Longest name kept, in characters.
pub const MAX_NAME_LEN: usize = 15;

/// Name recorded when the player leaves the name blank.
pub const DEFAULT_NAME: &str = "Anonymous";

fn default_name() -> String {
    DEFAULT_NAME.to_string()
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ScoreEntry {
    #[serde(default = "default_name")]
    pub name: String,
    pub score: u32,
}

impl ScoreEntry {
    pub fn new(name: impl Into<String>, score: u32) -> Self {
        Self {
            name: name.into(),
            score,
        }
    }
}

/// Strictly descending by score; equal scores keep insertion order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Scoreboard {
    entries: Vec<ScoreEntry>,
}

impl Scoreboard {
    pub fn new() -> Self {
        Self::default()
    }

    /// Rank arbitrary entries (e.g. from disk) and keep the top five.
    /// Over-long names are cut to [`MAX_NAME_LEN`] characters.
    pub fn from_entries(mut entries: Vec<ScoreEntry>) -> Self {
        for entry in &mut entries {
            if let Some((cut, _)) = entry.name.char_indices().nth(MAX_NAME_LEN) {
                entry.name.truncate(cut);
            }
        }
        // `sort_by` is stable, so ties stay in the order given.
        entries.sort_by(|a, b| b.score.cmp(&a.score));
        entries.truncate(MAX_ENTRIES);
        Self { entries }
    }

    /// Load from `store`; any failure yields an empty board.
    pub fn load(store: &dyn ScoreStore) -> Self {
        match store.load() {
            Ok(entries) => Self::from_entries(entries),
            Err(e) => {
                warn!("could not load high scores, starting empty: {e}");
                Self::new()
            }
        }
    }

    /// Save to `store`. Failures are logged and otherwise ignored.
    pub fn persist(&self, store: &dyn ScoreStore) {
        if let Err(e) = store.save(&self.entries) {
            warn!("could not save high scores: {e}");
        }
    }

    pub fn entries(&self) -> &[ScoreEntry] {
        &self.entries
    }

    pub fn best(&self) -> Option<u32> {
        self.entries.first().map(|e| e.score)
    }

    /// A score qualifies while the board has free slots, or when it beats
    /// the lowest entry. Equalling the lowest entry does not qualify.
    pub fn is_high_score(&self, score: u32) -> bool {
        if self.entries.len() < MAX_ENTRIES {
            return true;
        }
        self.entries.iter().map(|e| e.score).min().is_none_or(|min| score > min)
    }

    pub fn add(&mut self, entry: ScoreEntry) {
        self.entries.push(entry);
        self.entries.sort_by(|a, b| b.score.cmp(&a.score));
        self.entries.truncate(MAX_ENTRIES);
    }
}
