//! Financial news ingestion.
//!
//! Reads RSS/Atom feeds, derives a deterministic object key per entry, and
//! writes each entry's raw JSON to an object store unless that key already
//! exists. Also hosts the tiny echo API used by the frontend.

pub mod config;
pub mod feed;
pub mod ingest;
pub mod server;
pub mod store;
pub mod util;
