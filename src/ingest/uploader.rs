use thiserror::Error;

use super::key::StorageKey;
use super::record::StoredRecord;
use crate::store::{ObjectStore, StoreError, JSON_CONTENT_TYPE};

/// Entry-level ingest failures. None of these stop the run.
#[derive(Debug, Error)]
pub enum IngestError {
    /// Probing the store failed with something other than "not found"
    #[error("Error checking existence for {key}: {source}")]
    ExistenceCheck {
        key: String,
        #[source]
        source: StoreError,
    },
    /// The write itself failed; the key stays absent until the next run
    #[error("Failed to upload {key}: {source}")]
    Upload {
        key: String,
        #[source]
        source: StoreError,
    },
    #[error("Failed to serialize record for {key}: {source}")]
    Serialize {
        key: String,
        #[source]
        source: serde_json::Error,
    },
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UploadOutcome {
    /// The key did not exist and the record was written.
    Uploaded,
    /// The key already existed; nothing was written.
    AlreadyPresent,
}

/// Write `record` at `key` unless the key already exists.
///
/// Check-then-write is not transactional. Two concurrent runs can both see the
/// key as missing and both write; the payloads are identical so the race is
/// harmless.
pub async fn upload_if_absent(
    store: &dyn ObjectStore,
    key: &StorageKey,
    record: &StoredRecord,
) -> Result<UploadOutcome, IngestError> {
    let exists = store
        .exists(key.as_str())
        .await
        .map_err(|source| IngestError::ExistenceCheck {
            key: key.to_string(),
            source,
        })?;

    if exists {
        tracing::debug!(key = %key, "Entry already exists, skipping");
        return Ok(UploadOutcome::AlreadyPresent);
    }

    let body = record
        .to_json_bytes()
        .map_err(|source| IngestError::Serialize {
            key: key.to_string(),
            source,
        })?;

    store
        .put(key.as_str(), body, JSON_CONTENT_TYPE)
        .await
        .map_err(|source| IngestError::Upload {
            key: key.to_string(),
            source,
        })?;

    tracing::info!(location = %store.describe(key.as_str()), "Uploaded");
    Ok(UploadOutcome::Uploaded)
}
