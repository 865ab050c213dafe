use futures::FutureExt;
use std::panic::AssertUnwindSafe;

/// Runs a future, converting a panic into `Err(panic_message)`.
///
/// Used to contain a misbehaving entry so the rest of the batch still runs.
pub async fn catch_panic<F, T>(future: F) -> Result<T, String>
where
    F: std::future::Future<Output = T>,
{
    AssertUnwindSafe(future)
        .catch_unwind()
        .await
        .map_err(|panic| {
            if let Some(s) = panic.downcast_ref::<&'static str>() {
                s.to_string()
            } else if let Some(s) = panic.downcast_ref::<String>() {
                s.clone()
            } else {
                "Unknown panic".to_string()
            }
        })
}
