use std::fs;
use std::io;
use std::sync::Mutex;

use camino::{Utf8Path, Utf8PathBuf};
use chrono::{DateTime, TimeDelta, Utc};
use directories::BaseDirs;
use serde::{Deserialize, Serialize};
use tempfile::Builder;

use crate::domain::CanonicalDataset;
use crate::error::AzkarError;

pub trait SnapshotStore: Send + Sync {
    fn load(&self) -> Result<Option<String>, AzkarError>;
    fn save(&self, raw: &str) -> Result<(), AzkarError>;
    fn clear(&self) -> Result<(), AzkarError>;
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Snapshot {
    pub fetched_at: DateTime<Utc>,
    pub data: CanonicalDataset,
}

impl Snapshot {
    pub fn new(fetched_at: DateTime<Utc>, data: CanonicalDataset) -> Self {
        Self { fetched_at, data }
    }

    pub fn decode(raw: &str) -> Result<Self, AzkarError> {
        let snapshot: Self =
            serde_json::from_str(raw).map_err(|err| AzkarError::SnapshotParse(err.to_string()))?;
        Ok(Self {
            data: snapshot.data.canonicalized(),
            ..snapshot
        })
    }

    pub fn encode(&self) -> Result<String, AzkarError> {
        serde_json::to_string(self).map_err(|err| AzkarError::SnapshotParse(err.to_string()))
    }

    /// Fresh while `now` lies in `[fetched_at, fetched_at + window)`.
    pub fn is_fresh(&self, now: DateTime<Utc>, window: TimeDelta) -> bool {
        let age = now.signed_duration_since(self.fetched_at);
        age >= TimeDelta::zero() && age < window
    }
}

#[derive(Debug, Clone)]
pub struct FileSnapshotStore {
    path: Utf8PathBuf,
}

impl FileSnapshotStore {
    pub fn new() -> Result<Self, AzkarError> {
        let path = BaseDirs::new()
            .and_then(|dirs| {
                Utf8PathBuf::from_path_buf(
                    dirs.home_dir()
                        .join(".cache")
                        .join("azkar-content")
                        .join("snapshot.json"),
                )
                .ok()
            })
            .ok_or_else(|| {
                AzkarError::Filesystem("unable to resolve cache directory".to_string())
            })?;
        Ok(Self { path })
    }

    pub fn new_with_path(path: Utf8PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Utf8Path {
        &self.path
    }
}

impl SnapshotStore for FileSnapshotStore {
    fn load(&self) -> Result<Option<String>, AzkarError> {
        match fs::read_to_string(self.path.as_std_path()) {
            Ok(content) => Ok(Some(content)),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(err) => Err(AzkarError::Filesystem(format!("read {}: {err}", self.path))),
        }
    }

    fn save(&self, raw: &str) -> Result<(), AzkarError> {
        let parent = self
            .path
            .parent()
            .ok_or_else(|| AzkarError::Filesystem("invalid snapshot path".to_string()))?;
        fs::create_dir_all(parent.as_std_path())
            .map_err(|err| AzkarError::Filesystem(err.to_string()))?;
        let temp = Builder::new()
            .prefix("azkar-snapshot")
            .tempfile_in(parent.as_std_path())
            .map_err(|err| AzkarError::Filesystem(err.to_string()))?;
        fs::write(temp.path(), raw).map_err(|err| AzkarError::Filesystem(err.to_string()))?;
        temp.persist(self.path.as_std_path())
            .map_err(|err| AzkarError::Filesystem(err.to_string()))?;
        Ok(())
    }

    fn clear(&self) -> Result<(), AzkarError> {
        match fs::remove_file(self.path.as_std_path()) {
            Ok(()) => Ok(()),
            Err(err) if err.kind() == io::ErrorKind::NotFound => Ok(()),
            Err(err) => Err(AzkarError::Filesystem(format!("remove {}: {err}", self.path))),
        }
    }
}

#[derive(Debug, Default)]
pub struct MemorySnapshotStore {
    slot: Mutex<Option<String>>,
}

impl MemorySnapshotStore {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_content(raw: impl Into<String>) -> Self {
        Self {
            slot: Mutex::new(Some(raw.into())),
        }
    }

    pub fn content(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|slot| slot.clone())
    }
}

impl SnapshotStore for MemorySnapshotStore {
    fn load(&self) -> Result<Option<String>, AzkarError> {
        let slot = self
            .slot
            .lock()
            .map_err(|err| AzkarError::Filesystem(err.to_string()))?;
        Ok(slot.clone())
    }

    fn save(&self, raw: &str) -> Result<(), AzkarError> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|err| AzkarError::Filesystem(err.to_string()))?;
        *slot = Some(raw.to_string());
        Ok(())
    }

    fn clear(&self) -> Result<(), AzkarError> {
        let mut slot = self
            .slot
            .lock()
            .map_err(|err| AzkarError::Filesystem(err.to_string()))?;
        *slot = None;
        Ok(())
    }
}
