use crate::feed::parser::{parse_feed, FeedEntry};
use futures::StreamExt;
use thiserror::Error;
use url::Url;

const MAX_FEED_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// Why a feed could not be turned into entries.
#[derive(Debug, Error)]
pub enum FeedError {
    /// Configured URL is unparseable or not http(s)
    #[error("Invalid feed URL: {0}")]
    InvalidUrl(String),
    /// Network-level error (DNS, connection, TLS, etc.)
    #[error("Request failed: {0}")]
    Network(#[from] reqwest::Error),
    /// HTTP response with non-2xx status code
    #[error("HTTP error: status {0}")]
    HttpStatus(u16),
    /// Response body exceeded the 10MB size limit
    #[error("Response too large")]
    ResponseTooLarge,
    /// Feed XML could not be parsed as RSS or Atom
    #[error("Parse error: {0}")]
    Parse(#[from] feed_rs::parser::ParseFeedError),
}

/// A feed that was malformed or unreachable. The whole feed is skipped.
#[derive(Debug, Error)]
#[error("Failed to parse feed {url}: {cause}")]
pub struct FeedParseError {
    pub url: String,
    #[source]
    pub cause: FeedError,
}

/// Fetches a feed URL and parses it into entries.
///
/// Single attempt, no retry: a failure here is reported to the caller, which
/// skips the feed for this run.
///
/// # Errors
///
/// Returns [`FeedParseError`] wrapping:
/// - [`FeedError::InvalidUrl`] - URL does not parse or uses a non-http scheme
/// - [`FeedError::Network`] - Connection or TLS errors
/// - [`FeedError::HttpStatus`] - Non-2xx HTTP response
/// - [`FeedError::ResponseTooLarge`] - Response exceeded 10MB
/// - [`FeedError::Parse`] - Invalid RSS/Atom XML
pub async fn fetch_feed(
    client: &reqwest::Client,
    url: &str,
) -> Result<Vec<FeedEntry>, FeedParseError> {
    fetch_entries(client, url)
        .await
        .map_err(|cause| FeedParseError {
            url: url.to_string(),
            cause,
        })
}

async fn fetch_entries(client: &reqwest::Client, url: &str) -> Result<Vec<FeedEntry>, FeedError> {
    let url = validate_feed_url(url)?;

    let response = client.get(url).send().await?;
    if !response.status().is_success() {
        return Err(FeedError::HttpStatus(response.status().as_u16()));
    }

    let bytes = read_limited_bytes(response, MAX_FEED_SIZE).await?;
    let entries = parse_feed(&bytes)?;
    Ok(entries)
}

fn validate_feed_url(raw: &str) -> Result<Url, FeedError> {
    let url = Url::parse(raw).map_err(|e| FeedError::InvalidUrl(format!("{raw}: {e}")))?;
    match url.scheme() {
        "http" | "https" => Ok(url),
        scheme => Err(FeedError::InvalidUrl(format!(
            "{raw}: unsupported scheme {scheme}"
        ))),
    }
}

async fn read_limited_bytes(response: reqwest::Response, limit: usize) -> Result<Vec<u8>, FeedError> {
    // Fast path: check Content-Length header
    if let Some(len) = response.content_length() {
        if len as usize > limit {
            return Err(FeedError::ResponseTooLarge);
        }
    }

    let mut bytes = Vec::new();
    let mut stream = response.bytes_stream();

    while let Some(chunk) = stream.next().await {
        let chunk = chunk?;
        if bytes.len().saturating_add(chunk.len()) > limit {
            return Err(FeedError::ResponseTooLarge);
        }
        bytes.extend_from_slice(&chunk);
    }

    Ok(bytes)
}
