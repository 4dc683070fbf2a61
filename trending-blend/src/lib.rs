pub mod blend;
pub mod client;
pub mod score;

pub use blend::{bucket_top, BlendConfig, BlendState};
pub use client::{TrendingClient, TrendingEntry, RESULTS_PER_QUERY, SIZE_FILTERS};
pub use score::SubredditScore;

use lists_core::{ListsError, Period};
use tracing::{info, warn};

/// Names taken per size bucket for the single-period listing.
pub const BUCKET_TOP: usize = 5;

/// Cap for the single-period listing: every bucket's share.
pub const BUCKET_LIMIT: usize = BUCKET_TOP * SIZE_FILTERS.len();

/// Produces the blended trending list: every size bucket is queried for both
/// periods, results are scored, and the blend is selected for diversity.
///
/// A failed query for one bucket/period combination is logged and skipped so
/// a single flaky bucket cannot sink the whole blend.
pub async fn generate_blended(
    client: &TrendingClient,
    config: &BlendConfig,
) -> Result<Vec<String>, ListsError> {
    let mut state = BlendState::new();

    for size_filter in SIZE_FILTERS {
        for period in Period::ALL {
            match client.fetch(size_filter, period).await {
                Ok(entries) => state.record_query(size_filter, period, &entries),
                Err(err) => {
                    warn!(
                        size = size_filter,
                        period = %period,
                        error = %err,
                        "trending query failed, skipping"
                    );
                }
            }
        }
    }

    let names = state.into_blended(config);
    info!(count = names.len(), "blended trending list ready");
    Ok(names)
}

/// Produces the single-period listing: top names per size bucket. Unlike the
/// blend, any failed fetch is fatal.
pub async fn period_buckets(
    client: &TrendingClient,
    period: Period,
) -> Result<Vec<String>, ListsError> {
    let mut buckets = Vec::with_capacity(SIZE_FILTERS.len());
    for size_filter in SIZE_FILTERS {
        let entries = client.fetch(size_filter, period).await?;
        buckets.push((size_filter, entries));
    }

    let names = bucket_top(&buckets, BUCKET_TOP, BUCKET_LIMIT);
    info!(count = names.len(), period = %period, "per-bucket listing ready");
    Ok(names)
}
