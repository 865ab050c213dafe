use async_trait::async_trait;
use aws_config::BehaviorVersion;
use aws_sdk_s3::config::retry::RetryConfig;
use aws_sdk_s3::config::Region;
use aws_sdk_s3::error::{DisplayErrorContext, ProvideErrorMetadata, SdkError};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client;

use super::{ObjectStore, StoreError};
use crate::config::Config;

/// Error codes S3 (and compatible stores) use for a missing key.
const NOT_FOUND_CODES: [&str; 3] = ["404", "NoSuchKey", "NotFound"];

/// S3 bucket backend.
///
/// Existence is checked with `HeadObject`, which only needs read permission and
/// transfers no body.
#[derive(Debug, Clone)]
pub struct S3Store {
    client: Client,
    bucket: String,
}

impl S3Store {
    pub fn new(client: Client, bucket: impl Into<String>) -> Self {
        Self {
            client,
            bucket: bucket.into(),
        }
    }

    /// Build a client from the ambient AWS credential chain, pinned to the
    /// configured region.
    pub async fn connect(config: &Config) -> Self {
        let shared = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .load()
            .await;

        let client = client_for(
            aws_sdk_s3::config::Builder::from(&shared),
            config.endpoint_url.as_deref(),
        );
        Self::new(client, config.bucket.clone())
    }
}

/// Every store call is attempted exactly once; a failure is reported to the
/// caller, never retried by the SDK. A custom endpoint switches to path-style
/// addressing so S3-compatible stores work.
fn client_for(builder: aws_sdk_s3::config::Builder, endpoint: Option<&str>) -> Client {
    let mut builder = builder.retry_config(RetryConfig::disabled());
    if let Some(endpoint) = endpoint {
        tracing::info!(endpoint = %endpoint, "Using custom S3 endpoint");
        builder = builder.endpoint_url(endpoint).force_path_style(true);
    }
    Client::from_conf(builder.build())
}

#[async_trait]
impl ObjectStore for S3Store {
    async fn exists(&self, key: &str) -> Result<bool, StoreError> {
        let result = self
            .client
            .head_object()
            .bucket(&self.bucket)
            .key(key)
            .send()
            .await;

        match result {
            Ok(_) => Ok(true),
            Err(SdkError::ServiceError(service))
                if service.err().is_not_found() || is_not_found_code(service.err().code()) =>
            {
                Ok(false)
            }
            Err(err) => Err(into_store_error(err)),
        }
    }

    async fn put(&self, key: &str, body: Vec<u8>, content_type: &str) -> Result<(), StoreError> {
        self.client
            .put_object()
            .bucket(&self.bucket)
            .key(key)
            .body(ByteStream::from(body))
            .content_type(content_type)
            .send()
            .await
            .map_err(into_store_error)?;
        Ok(())
    }

    fn describe(&self, key: &str) -> String {
        format!("s3://{}/{}", self.bucket, key)
    }
}

fn is_not_found_code(code: Option<&str>) -> bool {
    code.is_some_and(|c| NOT_FOUND_CODES.contains(&c))
}

fn into_store_error<E, R>(err: SdkError<E, R>) -> StoreError
where
    E: ProvideErrorMetadata + std::error::Error + 'static,
    R: std::fmt::Debug + 'static,
{
    match &err {
        SdkError::ServiceError(service) => StoreError::Service {
            code: service.err().code().unwrap_or("Unknown").to_string(),
            message: service
                .err()
                .message()
                .map(str::to_string)
                .unwrap_or_else(|| DisplayErrorContext(&err).to_string()),
        },
        _ => StoreError::Transport(DisplayErrorContext(&err).to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use aws_sdk_s3::config::Credentials;
    use wiremock::matchers::{header, method, path};
    use wiremock::{Mock, MockServer, ResponseTemplate};

    const BUCKET: &str = "finance-news-raw";
    const KEY: &str = "2024/01/02/abc.json";

    fn test_builder() -> aws_sdk_s3::config::Builder {
        aws_sdk_s3::Config::builder()
            .behavior_version(BehaviorVersion::latest())
            .region(Region::new("us-east-1"))
            .credentials_provider(Credentials::new("AKIDTEST", "secret", None, None, "test"))
    }

    fn store_at(server: &MockServer) -> S3Store {
        S3Store::new(client_for(test_builder(), Some(&server.uri())), BUCKET)
    }

    fn object_path() -> String {
        format!("/{BUCKET}/{KEY}")
    }

    #[test]
    fn test_not_found_codes() {
        assert!(is_not_found_code(Some("404")));
        assert!(is_not_found_code(Some("NoSuchKey")));
        assert!(is_not_found_code(Some("NotFound")));
    }

    #[test]
    fn test_other_codes_are_errors() {
        assert!(!is_not_found_code(Some("403")));
        assert!(!is_not_found_code(Some("AccessDenied")));
        assert!(!is_not_found_code(Some("SlowDown")));
        assert!(!is_not_found_code(None));
    }

    #[test]
    fn test_describe_uses_s3_uri() {
        let store = S3Store::new(client_for(test_builder(), None), BUCKET);
        assert_eq!(
            store.describe(KEY),
            "s3://finance-news-raw/2024/01/02/abc.json"
        );
    }

    #[tokio::test]
    async fn test_exists_true_on_200() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path(object_path()))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        assert!(store_at(&server).exists(KEY).await.unwrap());
    }

    #[tokio::test]
    async fn test_exists_false_on_404() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path(object_path()))
            .respond_with(ResponseTemplate::new(404))
            .expect(1)
            .mount(&server)
            .await;

        assert!(!store_at(&server).exists(KEY).await.unwrap());
    }

    #[tokio::test]
    async fn test_exists_forbidden_is_service_error() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path(object_path()))
            .respond_with(ResponseTemplate::new(403))
            .expect(1)
            .mount(&server)
            .await;

        let result = store_at(&server).exists(KEY).await;
        assert!(
            matches!(result, Err(StoreError::Service { .. })),
            "expected service error, got {result:?}"
        );
    }

    #[tokio::test]
    async fn test_server_error_is_not_retried() {
        let server = MockServer::start().await;
        Mock::given(method("HEAD"))
            .and(path(object_path()))
            .respond_with(ResponseTemplate::new(503))
            .expect(1)
            .mount(&server)
            .await;

        assert!(store_at(&server).exists(KEY).await.is_err());
        // MockServer verifies `.expect(1)` on drop.
    }

    #[tokio::test]
    async fn test_put_sends_body_with_content_type() {
        let server = MockServer::start().await;
        Mock::given(method("PUT"))
            .and(path(object_path()))
            .and(header("content-type", "application/json"))
            .respond_with(ResponseTemplate::new(200))
            .expect(1)
            .mount(&server)
            .await;

        store_at(&server)
            .put(KEY, b"{}".to_vec(), crate::store::JSON_CONTENT_TYPE)
            .await
            .unwrap();
    }
}
