//! Session history exports on disk.
//!
//! Accepts either a bare JSON array of sessions or an object with `sessions`
//! and an optional persisted `stats` summary. Sessions may be in any order.

use persona_shared::{EngineError, InMemorySource, SessionRecord, SessionSource, UserStats};
use serde::Deserialize;
use std::fs;
use std::path::{Path, PathBuf};

#[derive(Deserialize)]
#[serde(untagged)]
enum HistoryFile {
    Bare(Vec<SessionRecord>),
    Export {
        sessions: Vec<SessionRecord>,
        #[serde(default)]
        stats: Option<UserStats>,
    },
}

/// Read-only session source backed by a JSON export.
///
/// The file is read once in [`JsonFileSource::open`]; history and persisted
/// stats always come from the same snapshot of it.
#[derive(Debug, Clone)]
pub struct JsonFileSource {
    path: PathBuf,
    loaded: InMemorySource,
}

impl JsonFileSource {
    pub fn open(path: impl Into<PathBuf>) -> Result<Self, EngineError> {
        let path = path.into();
        let contents = fs::read_to_string(&path)
            .map_err(|e| EngineError::Source(format!("{}: {}", path.display(), e)))?;
        let loaded = match serde_json::from_str::<HistoryFile>(&contents)
            .map_err(|e| EngineError::Source(format!("{}: invalid session data: {}", path.display(), e)))?
        {
            HistoryFile::Bare(sessions) => InMemorySource::new(sessions),
            HistoryFile::Export { sessions, stats: Some(stats) } => InMemorySource::new(sessions).with_stats(stats),
            HistoryFile::Export { sessions, stats: None } => InMemorySource::new(sessions),
        };
        Ok(Self { path, loaded })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }
}

impl SessionSource for JsonFileSource {
    fn history(&self) -> Result<Vec<SessionRecord>, EngineError> {
        self.loaded.history()
    }

    fn persisted_stats(&self) -> Result<Option<UserStats>, EngineError> {
        self.loaded.persisted_stats()
    }
}
