//! Ingest configuration.
//!
//! Resolved once at startup, in increasing precedence:
//! built-in defaults, an optional TOML file, then environment variables
//! (`FEEDS`, `S3_BUCKET`, `AWS_REGION`, `S3_ENDPOINT`) or the matching CLI
//! flags. The resulting [`Config`] is passed by reference to everything that
//! needs it.
use serde::Deserialize;
use std::path::Path;
use thiserror::Error;

pub const DEFAULT_FEEDS: &str =
    "https://feeds.reuters.com/reuters/businessNews,https://www.ft.com/?format=rss";
pub const DEFAULT_BUCKET: &str = "finance-news-raw";
pub const DEFAULT_REGION: &str = "us-east-1";

// ============================================================================
// Error Types
// ============================================================================

#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config file: {0}")]
    Io(#[from] std::io::Error),

    #[error("Invalid TOML in config file: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("Config file too large: {0}")]
    TooLarge(String),
}

// ============================================================================
// Configuration Structs
// ============================================================================

/// All fields use `#[serde(default)]` so any subset of keys can be specified.
#[derive(Debug, Clone, PartialEq, Eq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Feed URLs, processed in this order.
    pub feeds: Vec<String>,

    /// Destination bucket for raw article JSON.
    pub bucket: String,

    /// Bucket region.
    pub region: String,

    /// Custom S3-compatible endpoint (MinIO, LocalStack, ...).
    pub endpoint_url: Option<String>,

    /// User-Agent sent with feed requests.
    pub user_agent: String,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            feeds: parse_feed_list(DEFAULT_FEEDS),
            bucket: DEFAULT_BUCKET.to_string(),
            region: DEFAULT_REGION.to_string(),
            endpoint_url: None,
            user_agent: concat!("finance-news/", env!("CARGO_PKG_VERSION")).to_string(),
        }
    }
}

/// Values taken from the environment or command line. `None` keeps whatever
/// the file or defaults provided.
#[derive(Debug, Clone, Default)]
pub struct Overrides {
    /// Comma-separated feed URLs.
    pub feeds: Option<String>,
    pub bucket: Option<String>,
    pub region: Option<String>,
    pub endpoint_url: Option<String>,
}

impl Config {
    /// Maximum config file size (1 MB).
    const MAX_FILE_SIZE: u64 = 1_048_576;

    const KNOWN_KEYS: [&'static str; 5] =
        ["feeds", "bucket", "region", "endpoint_url", "user_agent"];

    /// Load configuration from a TOML file.
    ///
    /// - Missing file → `Ok(Config::default())`
    /// - Empty file → `Ok(Config::default())`
    /// - Invalid TOML → `Err(ConfigError::Parse)` with line number info
    /// - Unknown keys → accepted, logged as warning
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        match std::fs::metadata(path) {
            Ok(meta) if meta.len() > Self::MAX_FILE_SIZE => {
                return Err(ConfigError::TooLarge(format!(
                    "Config file is {} bytes (max {} bytes)",
                    meta.len(),
                    Self::MAX_FILE_SIZE
                )));
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                tracing::debug!(path = %path.display(), "No config file found, using defaults");
                return Ok(Self::default());
            }
            Err(e) => return Err(ConfigError::Io(e)),
            Ok(_) => {}
        }

        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            tracing::debug!(path = %path.display(), "Config file is empty, using defaults");
            return Ok(Self::default());
        }

        if let Ok(raw) = content.parse::<toml::Table>() {
            for key in raw.keys() {
                if !Self::KNOWN_KEYS.contains(&key.as_str()) {
                    tracing::warn!(key = %key, "Unknown key in config file, ignoring");
                }
            }
        }

        let config: Config = toml::from_str(&content)?;
        tracing::info!(path = %path.display(), feeds = config.feeds.len(), "Loaded configuration");
        Ok(config)
    }

    /// Apply environment / CLI values on top of this config.
    pub fn with_overrides(mut self, overrides: Overrides) -> Self {
        if let Some(feeds) = overrides.feeds {
            self.feeds = parse_feed_list(&feeds);
        }
        if let Some(bucket) = overrides.bucket {
            self.bucket = bucket;
        }
        if let Some(region) = overrides.region {
            self.region = region;
        }
        if let Some(endpoint) = overrides.endpoint_url {
            self.endpoint_url = Some(endpoint);
        }
        self
    }
}

/// Split a comma-separated feed list, trimming each URL and dropping blanks.
pub fn parse_feed_list(raw: &str) -> Vec<String> {
    raw.split(',')
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

// ============================================================================
// Tests
// ============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn write_config(name: &str, content: &str) -> std::path::PathBuf {
        let dir = std::env::temp_dir().join(format!("finance_news_config_{name}"));
        std::fs::create_dir_all(&dir).unwrap();
        let path = dir.join("config.toml");
        std::fs::write(&path, content).unwrap();
        path
    }

    fn cleanup(path: &Path) {
        if let Some(dir) = path.parent() {
            std::fs::remove_dir_all(dir).ok();
        }
    }

    #[test]
    fn test_default_config() {
        let config = Config::default();
        assert_eq!(
            config.feeds,
            vec![
                "https://feeds.reuters.com/reuters/businessNews".to_string(),
                "https://www.ft.com/?format=rss".to_string(),
            ]
        );
        assert_eq!(config.bucket, "finance-news-raw");
        assert_eq!(config.region, "us-east-1");
        assert!(config.endpoint_url.is_none());
        assert!(config.user_agent.starts_with("finance-news/"));
    }

    #[test]
    fn test_missing_file_returns_default() {
        let path = Path::new("/tmp/finance_news_test_nonexistent_config.toml");
        let config = Config::load(path).unwrap();
        assert_eq!(config, Config::default());
    }

    #[test]
    fn test_whitespace_only_file_returns_default() {
        let path = write_config("whitespace", "   \n  \n  ");
        let config = Config::load(&path).unwrap();
        assert_eq!(config, Config::default());
        cleanup(&path);
    }

    #[test]
    fn test_partial_config_uses_defaults_for_missing() {
        let path = write_config("partial", "bucket = \"news-staging\"\n");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.bucket, "news-staging");
        assert_eq!(config.region, "us-east-1");
        assert_eq!(config.feeds.len(), 2);
        cleanup(&path);
    }

    #[test]
    fn test_full_config() {
        let content = r#"
feeds = ["https://a.example.com/rss", "https://b.example.com/atom"]
bucket = "raw-news"
region = "eu-west-1"
endpoint_url = "http://localhost:9000"
user_agent = "test-agent"
"#;
        let path = write_config("full", content);
        let config = Config::load(&path).unwrap();
        assert_eq!(
            config,
            Config {
                feeds: vec![
                    "https://a.example.com/rss".to_string(),
                    "https://b.example.com/atom".to_string(),
                ],
                bucket: "raw-news".to_string(),
                region: "eu-west-1".to_string(),
                endpoint_url: Some("http://localhost:9000".to_string()),
                user_agent: "test-agent".to_string(),
            }
        );
        cleanup(&path);
    }

    #[test]
    fn test_invalid_toml_returns_error() {
        let path = write_config("invalid", "this is not [valid toml");
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::Parse(_)));
        assert!(err.to_string().contains("Invalid TOML"));
        cleanup(&path);
    }

    #[test]
    fn test_unknown_keys_accepted() {
        let path = write_config("unknown", "bucket = \"b\"\nnot_a_key = 42\n");
        let config = Config::load(&path).unwrap();
        assert_eq!(config.bucket, "b");
        cleanup(&path);
    }

    #[test]
    fn test_wrong_type_returns_error() {
        let path = write_config("wrongtype", "feeds = \"https://a.example.com/rss\"\n");
        assert!(Config::load(&path).is_err());
        cleanup(&path);
    }

    #[test]
    fn test_too_large_file_rejected() {
        let path = write_config("too_large", &"a".repeat(1_048_577));
        let err = Config::load(&path).unwrap_err();
        assert!(matches!(err, ConfigError::TooLarge(_)));
        assert!(err.to_string().contains("too large"));
        cleanup(&path);
    }

    #[test]
    fn test_overrides_take_precedence() {
        let config = Config::default().with_overrides(Overrides {
            feeds: Some("https://x.example.com/rss".to_string()),
            bucket: Some("override-bucket".to_string()),
            region: None,
            endpoint_url: Some("http://127.0.0.1:4566".to_string()),
        });
        assert_eq!(config.feeds, vec!["https://x.example.com/rss".to_string()]);
        assert_eq!(config.bucket, "override-bucket");
        assert_eq!(config.region, "us-east-1");
        assert_eq!(config.endpoint_url.as_deref(), Some("http://127.0.0.1:4566"));
    }

    #[test]
    fn test_empty_overrides_keep_values() {
        let base = Config {
            bucket: "from-file".to_string(),
            ..Config::default()
        };
        assert_eq!(base.clone().with_overrides(Overrides::default()), base);
    }

    #[test]
    fn test_parse_feed_list_trims_and_drops_blanks() {
        assert_eq!(
            parse_feed_list(" https://a.example.com/rss , ,https://b.example.com/rss,"),
            vec![
                "https://a.example.com/rss".to_string(),
                "https://b.example.com/rss".to_string(),
            ]
        );
        assert!(parse_feed_list("").is_empty());
    }
}
