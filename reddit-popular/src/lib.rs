pub mod aggregate;
pub mod api;
pub mod auth;
pub mod retry;

pub use aggregate::{aggregate, AggregateState, StepOutcome};
pub use api::{Page, RedditClient, PAGE_LIMIT};
pub use auth::{AccessToken, Credentials};
pub use retry::{RetryConfig, RetryExecutor};

use lists_core::ListsError;
use tracing::info;

const USER_AGENT: &str = concat!("subreddit-lists/", env!("CARGO_PKG_VERSION"));

/// Runs the whole popular-list pipeline: credentials from the environment,
/// token exchange, paginated aggregation.
pub async fn generate(target: usize) -> Result<Vec<String>, ListsError> {
    let credentials = Credentials::from_env()?;
    let client = RedditClient::new(USER_AGENT)?;
    fetch_popular(&client, &credentials, target, RetryConfig::reddit()).await
}

/// Aggregates up to `target` unique popular-subreddit names through `client`.
///
/// Authentication happens first and is never retried; page fetches go through
/// the retry executor. Pages are requested strictly in cursor order, one at a
/// time.
pub async fn fetch_popular(
    client: &RedditClient,
    credentials: &Credentials,
    target: usize,
    retry: RetryConfig,
) -> Result<Vec<String>, ListsError> {
    let token = client.authenticate(credentials).await?;
    info!(target, "authenticated, starting pagination walk");

    let executor = RetryExecutor::new(retry);
    let token_ref = &token;
    let executor_ref = &executor;

    aggregate(target, move |after| async move {
        executor_ref
            .execute("fetch popular page", || {
                let after = after.clone();
                async move { client.fetch_page(token_ref, after.as_deref()).await }
            })
            .await
    })
    .await
}
