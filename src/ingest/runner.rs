use chrono::{DateTime, Utc};

use super::key::StorageKey;
use super::record::StoredRecord;
use super::uploader::{upload_if_absent, IngestError, UploadOutcome};
use crate::feed::{fetch_feed, FeedEntry};
use crate::store::ObjectStore;
use crate::util::catch_panic;

/// Tally of one batch run. Logged at the end; never affects the exit status.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct RunSummary {
    /// Feeds fetched and parsed successfully
    pub feeds_processed: usize,
    /// Feeds skipped because they failed to fetch or parse
    pub feeds_failed: usize,
    /// Entries written to the store this run
    pub uploaded: usize,
    /// Entries whose key already existed
    pub already_present: usize,
    /// Entries that errored or panicked
    pub entries_failed: usize,
}

/// Sequential feed-to-store pipeline.
///
/// One feed at a time, one entry at a time, one store round trip at a time.
/// Failures are contained to the feed or entry that caused them.
pub struct Ingestor<'a> {
    client: &'a reqwest::Client,
    store: &'a dyn ObjectStore,
    clock: fn() -> DateTime<Utc>,
}

impl<'a> Ingestor<'a> {
    pub fn new(client: &'a reqwest::Client, store: &'a dyn ObjectStore) -> Self {
        Self {
            client,
            store,
            clock: Utc::now,
        }
    }

    /// Replace the clock used for the date of entries without a publish time.
    pub fn with_clock(mut self, clock: fn() -> DateTime<Utc>) -> Self {
        self.clock = clock;
        self
    }

    /// Process every feed in order and return the tally.
    pub async fn run(&self, feeds: &[String]) -> RunSummary {
        let mut summary = RunSummary::default();

        for url in feeds {
            self.process_feed(url, &mut summary).await;
        }

        tracing::info!(
            feeds_processed = summary.feeds_processed,
            feeds_failed = summary.feeds_failed,
            uploaded = summary.uploaded,
            already_present = summary.already_present,
            entries_failed = summary.entries_failed,
            "Ingest run complete"
        );
        summary
    }

    async fn process_feed(&self, url: &str, summary: &mut RunSummary) {
        tracing::info!(feed = %url, "Fetching feed");

        let entries = match fetch_feed(self.client, url).await {
            Ok(entries) => entries,
            Err(e) => {
                tracing::error!(feed = %url, error = %e.cause, "Failed to parse feed");
                summary.feeds_failed += 1;
                return;
            }
        };
        summary.feeds_processed += 1;
        tracing::debug!(feed = %url, entries = entries.len(), "Parsed feed");

        for entry in &entries {
            match catch_panic(self.process_entry(entry)).await {
                Ok(Ok(UploadOutcome::Uploaded)) => summary.uploaded += 1,
                Ok(Ok(UploadOutcome::AlreadyPresent)) => summary.already_present += 1,
                Ok(Err(e)) => {
                    tracing::error!(feed = %url, error = %e, "Failed to ingest entry");
                    summary.entries_failed += 1;
                }
                Err(panic_msg) => {
                    tracing::error!(
                        feed = %url,
                        entry_id = entry.id.as_deref().unwrap_or(""),
                        error = %panic_msg,
                        "Unexpected error processing entry"
                    );
                    summary.entries_failed += 1;
                }
            }
        }
    }

    /// Derive the key for one entry and upload it if absent.
    pub async fn process_entry(&self, entry: &FeedEntry) -> Result<UploadOutcome, IngestError> {
        let key = StorageKey::derive(entry, (self.clock)());
        let record = StoredRecord::from_entry(entry);
        upload_if_absent(self.store, &key, &record).await
    }
}
