use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

use crate::issue::TrackedIssue;

/// The only tracker state that survives a reload: the tracked set and which
/// issue is active. Modal and switching flags always start cleared.
#[derive(Clone, Debug, Default, Serialize, Deserialize, PartialEq)]
pub struct Snapshot {
    pub issues: Vec<TrackedIssue>,
    pub active_id: Option<i64>,
}

fn root_path() -> Result<PathBuf> {
    Ok(dirs::config_dir()
        .context("Cannot determine config directory")?
        .join("stint"))
}

pub fn snapshot_path() -> Result<PathBuf> {
    Ok(root_path()?.join("tracker.json"))
}

pub fn load_snapshot() -> Result<Option<Snapshot>> {
    load_snapshot_from(&snapshot_path()?)
}

pub fn save_snapshot(snapshot: &Snapshot) -> Result<()> {
    save_snapshot_to(&snapshot_path()?, snapshot)
}

fn load_snapshot_from(path: &Path) -> Result<Option<Snapshot>> {
    if !path.exists() {
        return Ok(None);
    }

    let raw = std::fs::read_to_string(path).context("Failed to read tracker snapshot")?;
    let snapshot = serde_json::from_str(&raw).context("Tracker snapshot is not valid JSON")?;
    Ok(Some(snapshot))
}

fn save_snapshot_to(path: &Path, snapshot: &Snapshot) -> Result<()> {
    if let Some(parent) = path.parent() {
        std::fs::create_dir_all(parent)?;
    }

    let content = serde_json::to_string_pretty(snapshot)?;
    std::fs::write(path, content).context("Failed to write tracker snapshot")?;
    Ok(())
}
