//! Local state persistence.
//!
//! Guest cart, wishlist, and session tokens survive restarts through a
//! single JSON state file. Writes go through a temp file and an atomic
//! rename so a crash mid-write never leaves a truncated file; a missing or
//! corrupt file loads as empty state with a warning.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use crate::error::StorageError;
use crate::stores::{CartLine, WishlistEntry};

/// Session tokens in plain text, as stored on disk.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PersistedTokens {
    pub access_token: String,
    pub refresh_token: String,
}

/// Everything the client persists between runs.
#[derive(Debug, Default, Serialize, Deserialize)]
pub struct PersistedState {
    #[serde(default)]
    pub cart: Vec<CartLine>,
    #[serde(default)]
    pub wishlist: Vec<WishlistEntry>,
    #[serde(default)]
    pub tokens: Option<PersistedTokens>,
}

/// Handle to the on-disk state file.
#[derive(Debug, Clone)]
pub struct StateFile {
    path: PathBuf,
}

impl StateFile {
    /// State file inside the configured state directory.
    #[must_use]
    pub fn in_dir(state_dir: &Path) -> Self {
        Self {
            path: state_dir.join("state.json"),
        }
    }

    #[must_use]
    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Load the persisted state.
    ///
    /// A missing file is first-run and loads as defaults; a corrupt file is
    /// logged and also loads as defaults rather than blocking startup.
    #[must_use]
    pub fn load(&self) -> PersistedState {
        let bytes = match std::fs::read(&self.path) {
            Ok(bytes) => bytes,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                debug!(path = %self.path.display(), "no state file, starting empty");
                return PersistedState::default();
            }
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "state file unreadable, starting empty");
                return PersistedState::default();
            }
        };

        match serde_json::from_slice(&bytes) {
            Ok(state) => state,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "state file corrupt, starting empty");
                PersistedState::default()
            }
        }
    }

    /// Write the state atomically (temp file, then rename).
    ///
    /// # Errors
    ///
    /// Returns an error if the directory cannot be created or the write
    /// fails.
    pub fn save(&self, state: &PersistedState) -> Result<(), StorageError> {
        if let Some(dir) = self.path.parent() {
            std::fs::create_dir_all(dir)?;
        }

        let json = serde_json::to_vec_pretty(state).map_err(StorageError::Encode)?;

        let tmp = self.path.with_extension("json.tmp");
        std::fs::write(&tmp, &json)?;
        std::fs::rename(&tmp, &self.path)?;

        debug!(path = %self.path.display(), bytes = json.len(), "state saved");
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn temp_dir(tag: &str) -> PathBuf {
        let dir = std::env::temp_dir().join(format!("tamarind-persist-{tag}-{}", std::process::id()));
        std::fs::create_dir_all(&dir).expect("create temp dir");
        dir
    }

    #[test]
    fn test_missing_file_loads_empty() {
        let dir = temp_dir("missing");
        let file = StateFile::in_dir(&dir);
        let state = file.load();
        assert!(state.cart.is_empty());
        assert!(state.tokens.is_none());
    }

    #[test]
    fn test_corrupt_file_loads_empty() {
        let dir = temp_dir("corrupt");
        let file = StateFile::in_dir(&dir);
        std::fs::write(file.path(), b"{ not json").expect("write garbage");
        let state = file.load();
        assert!(state.cart.is_empty());
        assert!(state.wishlist.is_empty());
    }

    #[test]
    fn test_save_then_load_roundtrip() {
        let dir = temp_dir("roundtrip");
        let file = StateFile::in_dir(&dir);

        let state = PersistedState {
            cart: Vec::new(),
            wishlist: Vec::new(),
            tokens: Some(PersistedTokens {
                access_token: "a".into(),
                refresh_token: "r".into(),
            }),
        };
        file.save(&state).expect("save");

        let loaded = file.load();
        let tokens = loaded.tokens.expect("tokens persisted");
        assert_eq!(tokens.access_token, "a");
        assert_eq!(tokens.refresh_token, "r");

        // No leftover temp file after a successful save.
        assert!(!file.path().with_extension("json.tmp").exists());
    }
}
