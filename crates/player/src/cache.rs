//! Last-known-good state cache on disk.
//!
//! A display must keep playing through server outages and boot without
//! network, so every successfully fetched state is written to a JSON file
//! and read back on cold start.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ringside_core::player::PlayerState;

#[derive(Debug, thiserror::Error)]
pub enum CacheError {
    #[error("Cache I/O failed: {0}")]
    Io(#[from] io::Error),

    #[error("Cache file is not a valid player state: {0}")]
    Corrupt(#[from] serde_json::Error),
}

/// A single-file JSON cache for the most recent state.
pub struct StateCache {
    path: PathBuf,
}

impl StateCache {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Read the cached state. A missing file is `Ok(None)`; a corrupt one is
    /// an error so the caller can log it and move on.
    pub fn load(&self) -> Result<Option<PlayerState>, CacheError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(None),
            Err(e) => return Err(e.into()),
        };
        Ok(Some(serde_json::from_str(&raw)?))
    }

    /// Persist a state, replacing the previous copy.
    ///
    /// Writes a sibling temp file and renames it into place, so a power cut
    /// mid-write leaves the previous copy intact.
    pub fn store(&self, state: &PlayerState) -> Result<(), CacheError> {
        if let Some(parent) = self.path.parent() {
            if !parent.as_os_str().is_empty() {
                fs::create_dir_all(parent)?;
            }
        }
        let tmp = self.path.with_extension("tmp");
        fs::write(&tmp, serde_json::to_vec(state)?)?;
        fs::rename(&tmp, &self.path)?;
        Ok(())
    }
}
