//! Key-addressed object storage.
//!
//! The ingest pipeline only needs two primitives: "does this key exist" and
//! "write these bytes at this key". [`ObjectStore`] is that seam; [`S3Store`]
//! talks to AWS S3 (or any S3-compatible endpoint) and [`MemoryStore`] keeps
//! objects in process for tests and dry runs.

mod memory;
mod s3;

use async_trait::async_trait;
use thiserror::Error;

pub use memory::{MemoryStore, StoredObject};
pub use s3::S3Store;

/// Content type declared on every uploaded record.
pub const JSON_CONTENT_TYPE: &str = "application/json";

#[derive(Debug, Error)]
pub enum StoreError {
    /// The service answered with an error other than "not found"
    #[error("Store error {code}: {message}")]
    Service { code: String, message: String },
    /// The request never produced a service response (DNS, TLS, timeout, ...)
    #[error("Store request failed: {0}")]
    Transport(String),
}

#[async_trait]
pub trait ObjectStore: Send + Sync {
    /// Returns `Ok(false)` only when the store positively reports the key as
    /// missing. Every other failure is an error.
    async fn exists(&self, key: &str) -> Result<bool, StoreError>;

    /// Write `body` at `key`. Assumed atomic per key.
    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<(), StoreError>;

    /// Human-readable location of `key`, for logs.
    fn describe(&self, key: &str) -> String;
}
