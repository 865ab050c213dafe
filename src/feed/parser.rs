use chrono::{DateTime, Utc};
use feed_rs::parser;

/// One item of a parsed RSS/Atom document.
///
/// Only the fields the ingest pipeline persists or keys on are kept. Every
/// field is optional because feeds in the wild omit almost anything.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FeedEntry {
    /// Entry identifier (`<guid>` / `<id>`), `None` when missing or empty.
    pub id: Option<String>,
    pub title: Option<String>,
    pub link: Option<String>,
    pub summary: Option<String>,
    pub published: Option<DateTime<Utc>>,
}

/// Parse raw feed bytes into entries.
///
/// Parsing is all-or-nothing: a document `feed-rs` rejects yields no entries.
/// Missing ids stay missing; `feed-rs` would otherwise synthesize one from the
/// link and title, and a retitled item would then get a new identity.
pub fn parse_feed(bytes: &[u8]) -> Result<Vec<FeedEntry>, parser::ParseFeedError> {
    let feed = parser::Builder::new()
        .id_generator(|_links, _title, _uri| String::new())
        .build()
        .parse(bytes)?;

    let entries = feed
        .entries
        .into_iter()
        .map(|entry| {
            let link = entry.links.first().map(|l| l.href.clone());
            let summary = entry
                .summary
                .map(|s| s.content)
                .or_else(|| entry.content.and_then(|c| c.body));

            FeedEntry {
                id: non_empty(entry.id),
                title: entry.title.map(|t| t.content),
                link,
                summary,
                published: entry.published,
            }
        })
        .collect();

    Ok(entries)
}

/// The id is hashed as-is, so it is never trimmed.
fn non_empty(id: String) -> Option<String> {
    if id.is_empty() {
        None
    } else {
        Some(id)
    }
}
