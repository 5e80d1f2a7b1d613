//! Student registration records.
//!
//! Holds every submission in an in-memory collection and writes each
//! mutation through to a persistence backend:
//! - Field validation that reports every violation at once
//! - Newest-first listing and per-class / since-instant counting
//! - Memory, plain JSON file or AES-GCM encrypted file storage

mod collection;
mod error;
mod persist;
mod store;
mod types;
mod validation;

pub use collection::Collection;
pub use error::StoreError;
pub use persist::{EncryptedStore, FileStore, MemoryStore, Store};
pub use store::RecordStore;
pub use types::*;
pub use validation::{validate, ValidationError};
