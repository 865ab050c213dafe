//! Feed reading: HTTP retrieval plus RSS/Atom parsing.
//!
//! - [`fetcher`] - single-shot HTTP fetch with a body size cap
//! - [`parser`] - `feed-rs` parsing into [`FeedEntry`] values
//!
//! A feed either yields all of its entries or a [`FeedParseError`]; callers
//! never see a partially parsed feed.

mod fetcher;
mod parser;

pub use fetcher::{fetch_feed, FeedError, FeedParseError};
pub use parser::{parse_feed, FeedEntry};
