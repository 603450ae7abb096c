//! Saved session defaults — best-effort persistence of the last-used
//! study parameters.
//!
//! Loading never fails: a missing or corrupt file yields
//! [`StudyParams::default`], so a bad session can always be recovered by
//! running once more. Saving reports real errors since losing the write
//! silently would be surprising.

use std::fs;
use std::io::ErrorKind;
use std::path::Path;

use anyhow::{Context, Result};

use crate::params::StudyParams;

/// Load saved parameters, falling back to defaults when the file is
/// missing or unreadable.
pub fn load(path: &Path) -> StudyParams {
    match fs::read_to_string(path) {
        Ok(content) => serde_json::from_str(&content).unwrap_or_default(),
        Err(_) => StudyParams::default(),
    }
}

/// Persist parameters as pretty JSON, creating parent directories as
/// needed.
pub fn save(path: &Path, params: &StudyParams) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent)
            .with_context(|| format!("failed to create {}", parent.display()))?;
    }
    let json = serde_json::to_string_pretty(params).context("failed to serialize parameters")?;
    fs::write(path, json).with_context(|| format!("failed to write {}", path.display()))
}

/// Remove the saved session. A session that never existed counts as
/// cleared.
pub fn clear(path: &Path) -> Result<()> {
    match fs::remove_file(path) {
        Ok(()) => Ok(()),
        Err(e) if e.kind() == ErrorKind::NotFound => Ok(()),
        Err(e) => Err(e).with_context(|| format!("failed to remove {}", path.display())),
    }
}
