mod core;

pub use core::{record_id, JsonFileBackend, Persistence, Record, RecordStore, StoreError};
