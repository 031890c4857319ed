// src/store.rs

use std::collections::HashMap;
use std::fs;
use std::io;
use std::path::PathBuf;
use std::sync::Mutex;

use thiserror::Error;
use tracing::debug;

use crate::core::models::AuditRecord;

#[derive(Debug, Error)]
pub enum StoreError {
    #[error("store I/O failure: {0}")]
    Io(#[from] io::Error),
    #[error("record serialization failure: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Persistence seam for audit records. Saving is an upsert keyed by slug:
/// re-running an audit for the same slug overwrites the prior record and no
/// history is retained.
pub trait ReportStore: Send + Sync {
    fn save(&self, record: &AuditRecord) -> Result<(), StoreError>;
    fn get_by_slug(&self, slug: &str) -> Result<Option<AuditRecord>, StoreError>;
}

/// One pretty-printed JSON document per slug under a directory. Slugs are
/// `[a-z0-9-]` by construction, so they double as file stems directly.
pub struct JsonFileStore {
    dir: PathBuf,
}

impl JsonFileStore {
    /// Opens (creating if needed) a store rooted at `dir`.
    pub fn open(dir: impl Into<PathBuf>) -> Result<Self, StoreError> {
        let dir = dir.into();
        fs::create_dir_all(&dir)?;
        Ok(Self { dir })
    }

    /// Opens the store in the platform data directory.
    pub fn open_default() -> Result<Self, StoreError> {
        Self::open(crate::logging::get_data_dir().join("audits"))
    }

    fn path_for(&self, slug: &str) -> PathBuf {
        self.dir.join(format!("{slug}.json"))
    }
}

impl ReportStore for JsonFileStore {
    fn save(&self, record: &AuditRecord) -> Result<(), StoreError> {
        let path = self.path_for(&record.result.slug);
        let document = serde_json::to_vec_pretty(record)?;
        fs::write(&path, document)?;
        debug!(slug = %record.result.slug, path = %path.display(), "Persisted audit record.");
        Ok(())
    }

    fn get_by_slug(&self, slug: &str) -> Result<Option<AuditRecord>, StoreError> {
        match fs::read(self.path_for(slug)) {
            Ok(bytes) => Ok(Some(serde_json::from_slice(&bytes)?)),
            Err(e) if e.kind() == io::ErrorKind::NotFound => Ok(None),
            Err(e) => Err(e.into()),
        }
    }
}

/// In-process store for tests and embedding.
#[derive(Default)]
pub struct MemoryStore {
    records: Mutex<HashMap<String, AuditRecord>>,
}

impl MemoryStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn records(&self) -> std::sync::MutexGuard<'_, HashMap<String, AuditRecord>> {
        self.records.lock().unwrap_or_else(|e| e.into_inner())
    }
}

impl ReportStore for MemoryStore {
    fn save(&self, record: &AuditRecord) -> Result<(), StoreError> {
        self.records()
            .insert(record.result.slug.clone(), record.clone());
        Ok(())
    }

    fn get_by_slug(&self, slug: &str) -> Result<Option<AuditRecord>, StoreError> {
        Ok(self.records().get(slug).cloned())
    }
}
