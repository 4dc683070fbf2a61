use lists_core::{ListsError, Period};
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error};
use url::Url;

const SUBRIFF_URL: &str = "https://subriff.com/Home/GetSubreddits";

/// Size buckets the endpoint understands, smallest to largest.
pub const SIZE_FILTERS: [&str; 4] = ["medium-small", "medium", "large", "xlarge"];

/// The endpoint returns at most this many entries per query.
pub const RESULTS_PER_QUERY: usize = 20;

/// One subreddit entry from the embedded-JSON payload.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct TrendingEntry {
    #[serde(rename = "displayName")]
    pub display_name: String,
    pub subscribers: u64,
    #[serde(rename = "dailyGrowthPercentage")]
    pub daily_growth_percentage: Option<f64>,
    #[serde(rename = "weeklyGrowthPercentage")]
    pub weekly_growth_percentage: Option<f64>,
    #[serde(rename = "isNsfw")]
    pub is_nsfw: bool,
    #[serde(rename = "internal_IsNsfw")]
    pub internal_is_nsfw: bool,
    #[serde(rename = "suggested_Internal_IsNsfw")]
    pub suggested_internal_is_nsfw: bool,
}

impl TrendingEntry {
    /// True if any of the three NSFW flags is set.
    pub fn is_adult(&self) -> bool {
        self.is_nsfw || self.internal_is_nsfw || self.suggested_internal_is_nsfw
    }
}

#[derive(Debug, Deserialize)]
struct TrendingResponse {
    #[serde(default)]
    subreddits: Vec<TrendingEntry>,
}

/// HTTP client for the embedded-JSON trending endpoint. No authentication.
#[derive(Debug)]
pub struct TrendingClient {
    http_client: reqwest::Client,
    base: Url,
}

impl TrendingClient {
    pub fn new() -> Result<Self, ListsError> {
        Self::with_base(SUBRIFF_URL)
    }

    /// Points the client at an alternate endpoint. Used by tests against a
    /// local server.
    pub fn with_base(base: &str) -> Result<Self, ListsError> {
        let base = Url::parse(base).map_err(|e| ListsError::InvalidInput {
            message: format!("invalid trending endpoint '{base}': {e}"),
        })?;
        let http_client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self { http_client, base })
    }

    /// Fetches the first page of trending subreddits for one size bucket and
    /// period.
    pub async fn fetch(
        &self,
        size_filter: &str,
        period: Period,
    ) -> Result<Vec<TrendingEntry>, ListsError> {
        debug!(size = size_filter, period = %period, "fetching trending page");

        let response = self
            .http_client
            .get(self.base.clone())
            .query(&[
                ("page", "1"),
                ("sizeFilter", size_filter),
                ("searchTerm", ""),
                ("sortBy", period.as_str()),
                ("growthType", "percent"),
                ("sortColumn", ""),
                ("sortDirection", ""),
                ("dateFilter", "all"),
                ("allowsPromotion", "false"),
                ("nsfw", "false"),
            ])
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            error!("trending request failed with status {}", status);
            return Err(ListsError::Upstream {
                details: format!("trending request returned status {status}"),
            });
        }

        let payload: TrendingResponse = response.json().await.map_err(|e| {
            error!("failed to parse trending payload: {}", e);
            ListsError::Upstream {
                details: format!("malformed trending payload: {e}"),
            }
        })?;

        debug!(count = payload.subreddits.len(), "trending page fetched");
        Ok(payload.subreddits)
    }
}
