//! The outbound `query` call with its deadline and cancellation.

use datachat_core::DatachatError;
use datachat_core::backend::{QueryBackend, QueryRequest, QueryResponse};
use std::sync::Arc;
use std::time::Duration;
use tokio_util::sync::CancellationToken;

/// How an outbound query ended.
#[derive(Debug, Clone, PartialEq)]
pub enum QueryOutcome {
    /// The backend answered 2xx. The payload may still carry an `error`.
    Response(QueryResponse),
    Failed(DatachatError),
    /// The widget shut down before an answer arrived.
    Cancelled,
}

/// Sends `query` and waits at most `deadline` for the answer.
///
/// Elapsing the deadline drops the in-flight request and yields
/// `DatachatError::Timeout`. Cancelling `cancel` ends the call without a
/// user-visible outcome.
pub async fn run_query(
    backend: Arc<dyn QueryBackend>,
    query: String,
    deadline: Duration,
    cancel: CancellationToken,
) -> QueryOutcome {
    let request = QueryRequest::new(query);

    tokio::select! {
        _ = cancel.cancelled() => {
            tracing::debug!(query = %request.query, "query cancelled");
            QueryOutcome::Cancelled
        }
        result = tokio::time::timeout(deadline, backend.query(&request)) => match result {
            Ok(Ok(response)) => QueryOutcome::Response(response),
            Ok(Err(err)) => {
                tracing::warn!(query = %request.query, error = %err, "query failed");
                QueryOutcome::Failed(err)
            }
            Err(_) => {
                tracing::warn!(query = %request.query, ?deadline, "query deadline elapsed");
                QueryOutcome::Failed(DatachatError::Timeout {
                    seconds: deadline.as_secs(),
                })
            }
        },
    }
}
