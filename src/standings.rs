use std::collections::HashMap;
use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};

// Position substituted for teams the table does not list. Twenty is the
// bottom of a standard top-flight table.
const ABSENT_POSITION: u32 = 20;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct StandingsEntry {
    pub position: u32,
    pub points: u32,
    pub goal_diff: i32,
    #[serde(default)]
    pub played: u32,
}

impl StandingsEntry {
    /// Worst-case profile for teams missing from the standings document.
    /// Substitution is silent; a missing entry is never an error.
    pub fn absent() -> Self {
        Self {
            position: ABSENT_POSITION,
            points: 0,
            goal_diff: 0,
            played: 0,
        }
    }
}

/// League-position context keyed by exact team name. The engine treats this
/// as optional input; an empty table behaves like no table at all for teams
/// it is asked about.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct StandingsTable {
    entries: HashMap<String, StandingsEntry>,
}

impl StandingsTable {
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads a JSON object mapping team name to standings entry, the
    /// hand-off format for whatever scraped or typed the table.
    pub fn from_json_path(path: &Path) -> Result<Self> {
        let raw = fs::read_to_string(path)
            .with_context(|| format!("read standings {}", path.display()))?;
        serde_json::from_str(&raw).context("invalid standings json")
    }

    pub fn insert(&mut self, team: impl Into<String>, entry: StandingsEntry) {
        self.entries.insert(team.into(), entry);
    }

    /// Exact-name lookup; no fuzzy matching.
    pub fn entry(&self, team: &str) -> StandingsEntry {
        self.entries
            .get(team)
            .copied()
            .unwrap_or_else(StandingsEntry::absent)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
