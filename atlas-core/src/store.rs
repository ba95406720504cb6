//! Durable JSON persistence for [`ProjectState`].
//!
//! The document is written to a temp file and renamed into place, after the
//! previous generation has been copied to the backup path. There is no
//! locking: two processes saving in the same directory race, and the last
//! rename wins.

use std::path::{Path, PathBuf};

use chrono::Local;
use tracing::{debug, warn};

use crate::config::{BACKUP_FILE, SESSION_FILE, STATE_FILE, TEMP_FILE};
use crate::error::StateError;
use crate::types::ProjectState;

/// Outcome of [`StateStore::load`].
#[derive(Debug, Clone, PartialEq)]
pub enum Loaded {
    /// No document exists yet.
    Missing,
    /// The document parsed cleanly.
    Current(ProjectState),
    /// The document was corrupted; this is the backup's content.
    Restored(ProjectState),
}

impl Loaded {
    pub fn into_state(self) -> Option<ProjectState> {
        match self {
            Self::Missing => None,
            Self::Current(state) | Self::Restored(state) => Some(state),
        }
    }
}

/// Reads and writes the state document and its side files under one root.
#[derive(Debug, Clone)]
pub struct StateStore {
    root: PathBuf,
}

impl StateStore {
    pub fn new(root: &Path) -> Self {
        Self {
            root: root.to_path_buf(),
        }
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    pub fn state_path(&self) -> PathBuf {
        self.root.join(STATE_FILE)
    }

    pub fn backup_path(&self) -> PathBuf {
        self.root.join(BACKUP_FILE)
    }

    pub fn session_path(&self) -> PathBuf {
        self.root.join(SESSION_FILE)
    }

    fn temp_path(&self) -> PathBuf {
        self.root.join(TEMP_FILE)
    }

    pub fn exists(&self) -> bool {
        self.state_path().exists()
    }

    /// Load the document, falling back to the backup when it is corrupted.
    ///
    /// A corrupted document with no parsable backup is an error; there is
    /// no silent empty-state fallback.
    pub fn load(&self) -> Result<Loaded, StateError> {
        let path = self.state_path();
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(Loaded::Missing),
            Err(e) => return Err(StateError::io(path, e)),
        };

        match serde_json::from_str(&text) {
            Ok(state) => Ok(Loaded::Current(state)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "State document is corrupted");
                let backup = self.backup_path();
                let restored = std::fs::read_to_string(&backup)
                    .ok()
                    .and_then(|t| serde_json::from_str::<ProjectState>(&t).ok());
                match restored {
                    Some(state) => {
                        warn!(backup = %backup.display(), "Restored state from backup");
                        Ok(Loaded::Restored(state))
                    }
                    None => Err(StateError::Corrupted { path, backup }),
                }
            }
        }
    }

    /// Stamp `last_updated`, back up the current document, then write
    /// through a temp file and rename.
    pub fn save(&self, state: &mut ProjectState) -> Result<(), StateError> {
        state.metadata.last_updated = Local::now().format("%Y-%m-%dT%H:%M:%S%.6f").to_string();

        let path = self.state_path();
        if path.exists() {
            let backup = self.backup_path();
            std::fs::copy(&path, &backup).map_err(|e| StateError::io(&backup, e))?;
        }

        let json = serde_json::to_string_pretty(state)?;
        let temp = self.temp_path();
        std::fs::write(&temp, json).map_err(|e| StateError::io(&temp, e))?;
        if let Err(e) = std::fs::rename(&temp, &path) {
            let _ = std::fs::remove_file(&temp);
            return Err(StateError::io(&path, e));
        }
        debug!(path = %path.display(), "State saved");
        Ok(())
    }

    // ── Session baseline side file ─────────────────────────────────

    pub fn write_session_snapshot(&self, baseline: &ProjectState) -> Result<(), StateError> {
        let path = self.session_path();
        let json = serde_json::to_string(baseline)?;
        std::fs::write(&path, json).map_err(|e| StateError::io(&path, e))
    }

    /// Read the in-flight session baseline. An unparsable snapshot counts
    /// as no session and is removed.
    pub fn read_session_snapshot(&self) -> Result<Option<ProjectState>, StateError> {
        let path = self.session_path();
        let text = match std::fs::read_to_string(&path) {
            Ok(text) => text,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(StateError::io(path, e)),
        };
        match serde_json::from_str(&text) {
            Ok(state) => Ok(Some(state)),
            Err(e) => {
                warn!(path = %path.display(), error = %e, "Discarding unreadable session snapshot");
                self.clear_session_snapshot()?;
                Ok(None)
            }
        }
    }

    pub fn clear_session_snapshot(&self) -> Result<(), StateError> {
        let path = self.session_path();
        match std::fs::remove_file(&path) {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(StateError::io(path, e)),
        }
    }
}
