use std::future::Future;
use std::time::Duration;

use tokio_util::sync::CancellationToken;

use crate::{FailureKind, RequestError};

/// Run `request` until it settles, the deadline passes, or `cancel` fires.
///
/// The losing branches are dropped, which aborts the in-flight HTTP call and
/// disposes of the timer.
pub async fn with_deadline<T, F>(
    deadline: Option<Duration>,
    cancel: &CancellationToken,
    request: F,
) -> Result<T, RequestError>
where
    F: Future<Output = Result<T, RequestError>>,
{
    let timer = async {
        match deadline {
            Some(limit) => tokio::time::sleep(limit).await,
            None => std::future::pending::<()>().await,
        }
    };

    tokio::select! {
        biased;
        _ = cancel.cancelled() => Err(RequestError::new(FailureKind::Cancelled, "request cancelled")),
        result = request => result,
        _ = timer => Err(RequestError::new(
            FailureKind::Timeout,
            format!(
                "no response within {} ms",
                deadline.map(|limit| limit.as_millis()).unwrap_or_default()
            ),
        )),
    }
}
