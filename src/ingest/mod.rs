//! Feed-to-object-store ingestion.
//!
//! For each entry of each configured feed:
//!
//! 1. [`StorageKey::derive`] computes `YYYY/MM/DD/<sha1>.json` from the entry's
//!    identity (id, else link) and publish day.
//! 2. [`upload_if_absent`] checks the store for the key and writes the
//!    [`StoredRecord`] only when the key is missing.
//!
//! [`Ingestor`] drives the loop and keeps a failing feed or entry from
//! stopping the run. The object store itself is the only dedup state.

mod key;
mod record;
mod runner;
mod uploader;

pub use key::{identity_digest, identity_source, StorageKey};
pub use record::StoredRecord;
pub use runner::{Ingestor, RunSummary};
pub use uploader::{upload_if_absent, IngestError, UploadOutcome};
