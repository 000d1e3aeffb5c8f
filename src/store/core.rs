use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use serde_json::{Map, Value};
use thiserror::Error;
use tracing::{debug, info, warn};

/// A single stored record: an open-ended JSON object plus a mandatory `id`
/// field assigned by the store on creation.
pub type Record = Map<String, Value>;

/// Errors surfaced by [`RecordStore`] operations.
///
/// Store errors propagate synchronously to the calling handler; the handler
/// is responsible for translating them into a wire response.
#[derive(Debug, Error)]
pub enum StoreError {
    /// No record with the requested id exists in the collection.
    #[error("no record with id {id}")]
    NotFound { id: u64 },
    /// The backing document could not be rewritten after a mutation.
    #[error("failed to write backing document: {0}")]
    Write(#[source] io::Error),
    /// The backing document exists but could not be read or parsed.
    #[error("failed to load backing document {path}: {reason}")]
    Load { path: PathBuf, reason: String },
}

/// Persistence dependency injected into the store.
///
/// Every mutating store operation serializes the entire collection and hands
/// it to the backend, which overwrites the backing document wholesale. There
/// are no partial writes, no append log, and no atomic rename.
pub trait Persistence {
    fn save(&mut self, records: &[Record]) -> io::Result<()>;
}

/// Default backend: a single JSON document on disk holding the record array.
pub struct JsonFileBackend {
    path: PathBuf,
}

impl JsonFileBackend {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    /// Read the backing document into a record collection.
    ///
    /// A missing document is treated as an empty collection so a fresh
    /// deployment can start from nothing and seed via `create`.
    pub fn load(&self) -> Result<Vec<Record>, StoreError> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(err) if err.kind() == io::ErrorKind::NotFound => {
                info!(path = %self.path.display(), "No backing document, starting empty");
                return Ok(Vec::new());
            }
            Err(err) => {
                return Err(StoreError::Load {
                    path: self.path.clone(),
                    reason: err.to_string(),
                })
            }
        };
        let records: Vec<Record> = serde_json::from_str(&raw).map_err(|err| StoreError::Load {
            path: self.path.clone(),
            reason: err.to_string(),
        })?;
        info!(
            path = %self.path.display(),
            record_count = records.len(),
            "Backing document loaded"
        );
        Ok(records)
    }
}

impl Persistence for JsonFileBackend {
    fn save(&mut self, records: &[Record]) -> io::Result<()> {
        let body = serde_json::to_vec(records).map_err(io::Error::other)?;
        fs::write(&self.path, body)
    }
}

/// Owner of the in-memory record collection and its persistence dependency.
///
/// The collection is loaded once at process start, mutated in place by
/// handlers, and rewritten to the backing document synchronously after every
/// mutation, before that mutation's result is returned.
///
/// # Concurrency
///
/// The store carries no lock and no optimistic concurrency token. Two
/// overlapping mutating calls can race on the read-modify-write-then-overwrite
/// sequence and corrupt the backing document. Callers get isolation by running
/// a single logical worker per store, not from the store itself.
pub struct RecordStore {
    records: Vec<Record>,
    backend: Box<dyn Persistence>,
}

/// Extract the `id` field of a record, if present and a positive integer.
#[inline]
#[must_use]
pub fn record_id(record: &Record) -> Option<u64> {
    record.get("id").and_then(Value::as_u64)
}

impl RecordStore {
    /// Create a store over an already-loaded collection.
    #[must_use]
    pub fn new(records: Vec<Record>, backend: Box<dyn Persistence>) -> Self {
        Self { records, backend }
    }

    /// Open a store backed by the JSON document at `path`.
    pub fn open(path: &Path) -> Result<Self, StoreError> {
        let backend = JsonFileBackend::new(path);
        let records = backend.load()?;
        Ok(Self::new(records, Box::new(backend)))
    }

    /// The full collection in insertion order.
    #[must_use]
    pub fn list(&self) -> &[Record] {
        &self.records
    }

    /// Linear scan for the record with the given id.
    pub fn get(&self, id: u64) -> Result<&Record, StoreError> {
        self.records
            .iter()
            .find(|r| record_id(r) == Some(id))
            .ok_or(StoreError::NotFound { id })
    }

    /// Append a new record with `id = max existing id + 1` (1 when empty).
    ///
    /// Ids are never reused after deletion. A caller-supplied `id` field is
    /// discarded; the store owns id assignment.
    ///
    /// If the persistence write fails the operation returns
    /// [`StoreError::Write`] while the in-memory collection still holds the
    /// appended record. That divergence is a documented property of the
    /// design, not an oversight: the append is not rolled back.
    pub fn create(&mut self, fields: Record) -> Result<&Record, StoreError> {
        let id = self.next_id();
        let mut record = fields;
        record.insert("id".to_string(), Value::from(id));
        let idx = self.records.len();
        self.records.push(record);
        debug!(id, "Record appended");
        self.persist()?;
        info!(id, record_count = self.records.len(), "Record created");
        Ok(&self.records[idx])
    }

    /// Merge `fields` over the record with the given id, in place.
    ///
    /// Incoming fields win on key collision except `id`, which is immutable
    /// and cannot be overwritten by caller-supplied fields. The record keeps
    /// its position in the collection.
    pub fn update(&mut self, id: u64, fields: Record) -> Result<&Record, StoreError> {
        let idx = self
            .records
            .iter()
            .position(|r| record_id(r) == Some(id))
            .ok_or(StoreError::NotFound { id })?;
        for (key, value) in fields {
            if key == "id" {
                continue;
            }
            self.records[idx].insert(key, value);
        }
        self.persist()?;
        info!(id, "Record updated");
        Ok(&self.records[idx])
    }

    /// Remove the record with the given id and rewrite the remaining
    /// collection as the new full document content.
    ///
    /// Success is confirmed only after the write call returns.
    pub fn delete(&mut self, id: u64) -> Result<(), StoreError> {
        let idx = self
            .records
            .iter()
            .position(|r| record_id(r) == Some(id))
            .ok_or(StoreError::NotFound { id })?;
        self.records.remove(idx);
        self.persist()?;
        info!(id, record_count = self.records.len(), "Record deleted");
        Ok(())
    }

    fn next_id(&self) -> u64 {
        self.records.iter().filter_map(record_id).max().unwrap_or(0) + 1
    }

    fn persist(&mut self) -> Result<(), StoreError> {
        self.backend.save(&self.records).map_err(|err| {
            warn!(error = %err, "Backing document write failed");
            StoreError::Write(err)
        })
    }
}
