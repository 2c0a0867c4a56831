use std::fs;
use std::path::{Path, PathBuf};
use std::sync::{Arc, Mutex};

use tracing::{debug, warn};

use crate::error::AppError;
use crate::meal::MealSummary;

/// Durable slot holding one serialized favourites collection
pub trait PersistentStore {
    /// Read the stored collection. Absent or malformed data yields an empty list.
    fn read(&self) -> Vec<MealSummary>;

    /// Overwrite the slot with the full collection
    fn write(&self, items: &[MealSummary]) -> Result<(), AppError>;
}

/// Parse slot text, treating anything unexpected as an empty collection
fn decode(raw: &str, slot: &str) -> Vec<MealSummary> {
    match serde_json::from_str::<Option<Vec<MealSummary>>>(raw) {
        Ok(items) => items.unwrap_or_default(),
        Err(e) => {
            warn!(slot, error = %e, "Discarding malformed favourites data");
            Vec::new()
        }
    }
}

/// File-backed slot, replaced atomically on every write
#[derive(Debug, Clone)]
pub struct FileStore {
    path: PathBuf,
}

impl FileStore {
    pub fn new(path: PathBuf) -> Self {
        Self { path }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    fn temp_path(&self) -> PathBuf {
        let name = self
            .path
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .unwrap_or_default();
        self.path
            .with_file_name(format!(".{}.{}.tmp", name, uuid::Uuid::new_v4()))
    }
}

impl PersistentStore for FileStore {
    fn read(&self) -> Vec<MealSummary> {
        let slot = self.path.display().to_string();
        if !self.path.exists() {
            debug!(slot = %slot, "No favourites stored yet");
            return Vec::new();
        }
        match fs::read_to_string(&self.path) {
            Ok(raw) => decode(&raw, &slot),
            Err(e) => {
                warn!(slot = %slot, error = %e, "Failed to read favourites");
                Vec::new()
            }
        }
    }

    fn write(&self, items: &[MealSummary]) -> Result<(), AppError> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)?;
        }

        let content = serde_json::to_string(items)?;
        let temp_path = self.temp_path();
        fs::write(&temp_path, content)?;

        if let Err(e) = fs::rename(&temp_path, &self.path) {
            let _ = fs::remove_file(&temp_path);
            return Err(e.into());
        }

        debug!(slot = %self.path.display(), count = items.len(), "Wrote favourites");
        Ok(())
    }
}

#[derive(Debug, Default)]
struct MemorySlot {
    raw: Option<String>,
    writes: usize,
}

/// In-process slot; clones share the same storage
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    slot: Arc<Mutex<MemorySlot>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    /// Raw text currently held in the slot
    pub fn raw(&self) -> Option<String> {
        self.slot.lock().ok().and_then(|s| s.raw.clone())
    }

    /// Replace the slot text directly, bypassing serialization
    pub fn set_raw(&self, raw: impl Into<String>) {
        if let Ok(mut slot) = self.slot.lock() {
            slot.raw = Some(raw.into());
        }
    }

    /// Number of successful writes so far
    pub fn writes(&self) -> usize {
        self.slot.lock().map(|s| s.writes).unwrap_or(0)
    }
}

impl PersistentStore for MemoryStore {
    fn read(&self) -> Vec<MealSummary> {
        match self.raw() {
            Some(raw) => decode(&raw, "memory"),
            None => Vec::new(),
        }
    }

    fn write(&self, items: &[MealSummary]) -> Result<(), AppError> {
        let content = serde_json::to_string(items)?;
        let mut slot = self
            .slot
            .lock()
            .map_err(|e| AppError::Lock(e.to_string()))?;
        slot.raw = Some(content);
        slot.writes += 1;
        Ok(())
    }
}
