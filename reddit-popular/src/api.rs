use crate::auth::{AccessToken, Credentials};
use lists_core::ListsError;
use serde::Deserialize;
use std::time::Duration;
use tracing::{debug, error, info, warn};

const REDDIT_API_BASE: &str = "https://oauth.reddit.com";
const REDDIT_TOKEN_URL: &str = "https://www.reddit.com/api/v1/access_token";

/// Page size requested from the listing endpoint. 100 is the maximum Reddit
/// serves per page.
pub const PAGE_LIMIT: u32 = 100;

const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

#[derive(Debug, Clone, Deserialize)]
pub struct Listing<T> {
    pub kind: String,
    pub data: ListingData<T>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListingData<T> {
    pub children: Vec<ListingChild<T>>,
    pub after: Option<String>,
    pub dist: Option<u32>,
}

#[derive(Debug, Clone, Deserialize)]
pub struct ListingChild<T> {
    pub kind: String,
    pub data: T,
}

#[derive(Debug, Clone, Deserialize)]
pub struct SubredditData {
    pub display_name: String,
    pub subscribers: Option<u64>,
    pub over18: Option<bool>,
}

#[derive(Debug, Deserialize)]
struct TokenResponse {
    access_token: String,
    #[serde(default)]
    token_type: String,
    #[serde(default)]
    expires_in: u64,
}

/// One page of ranked subreddit names plus the cursor for the next page.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Page {
    pub names: Vec<String>,
    pub after: Option<String>,
}

/// HTTP client for the app-only Reddit API.
#[derive(Debug)]
pub struct RedditClient {
    http_client: reqwest::Client,
    user_agent: String,
    token_url: String,
    api_base: String,
}

impl RedditClient {
    pub fn new(user_agent: &str) -> Result<Self, ListsError> {
        Self::with_endpoints(user_agent, REDDIT_TOKEN_URL, REDDIT_API_BASE)
    }

    /// Points the client at alternate endpoints. Used by tests against a
    /// local server.
    pub fn with_endpoints(
        user_agent: &str,
        token_url: &str,
        api_base: &str,
    ) -> Result<Self, ListsError> {
        let http_client = reqwest::Client::builder()
            .user_agent(user_agent)
            .timeout(Duration::from_secs(30))
            .build()?;

        Ok(Self {
            http_client,
            user_agent: user_agent.to_string(),
            token_url: token_url.to_string(),
            api_base: api_base.to_string(),
        })
    }

    /// Exchanges script-app credentials for a bearer token via the
    /// client-credentials grant. Never retried: bad credentials will not
    /// become valid by retrying.
    pub async fn authenticate(&self, credentials: &Credentials) -> Result<AccessToken, ListsError> {
        info!("requesting app-only access token");

        let response = self
            .http_client
            .post(&self.token_url)
            .basic_auth(credentials.client_id(), Some(credentials.client_secret()))
            .header("User-Agent", &self.user_agent)
            .form(&[("grant_type", "client_credentials")])
            .send()
            .await
            .map_err(|e| {
                error!("token exchange request failed: {}", e);
                ListsError::Authentication {
                    reason: format!("token exchange request failed: {e}"),
                }
            })?;

        let status = response.status();
        if !status.is_success() {
            error!("token exchange rejected with status {}", status);
            return Err(ListsError::Authentication {
                reason: format!("token exchange returned status {status}"),
            });
        }

        let token: TokenResponse = response.json().await.map_err(|e| {
            error!("failed to parse token response: {}", e);
            ListsError::Authentication {
                reason: format!("malformed token response: {e}"),
            }
        })?;

        if token.access_token.is_empty() {
            return Err(ListsError::Authentication {
                reason: "token response contained an empty access_token".to_string(),
            });
        }

        debug!(
            token_type = %token.token_type,
            expires_in = token.expires_in,
            "access token obtained"
        );
        Ok(AccessToken::new(token.access_token))
    }

    /// Fetches one page of the popular-subreddits listing.
    pub async fn fetch_page(
        &self,
        token: &AccessToken,
        after: Option<&str>,
    ) -> Result<Page, ListsError> {
        let url = format!("{}/subreddits/popular", self.api_base);
        let limit_str = PAGE_LIMIT.to_string();

        let mut params = vec![("limit", limit_str.as_str())];
        if let Some(cursor) = after {
            params.push(("after", cursor));
        }

        debug!(after = after.unwrap_or("<start>"), "fetching listing page");
        let response = self
            .http_client
            .get(&url)
            .bearer_auth(token.as_str())
            .header("User-Agent", &self.user_agent)
            .query(&params)
            .send()
            .await?;

        let status = response.status();
        if status.as_u16() == 429 {
            let retry_after = response
                .headers()
                .get("retry-after")
                .and_then(|v| v.to_str().ok())
                .and_then(|v| v.parse::<u64>().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            warn!("rate limited, upstream asks for {}s", retry_after);
            return Err(ListsError::RateLimited { retry_after });
        }
        if status.as_u16() == 401 || status.as_u16() == 403 {
            error!("listing request rejected with status {}", status);
            return Err(ListsError::Authentication {
                reason: format!("listing request returned status {status}"),
            });
        }
        if !status.is_success() {
            error!("listing request failed with status {}", status);
            return Err(ListsError::Upstream {
                details: format!("listing request returned status {status}"),
            });
        }

        let listing: Listing<SubredditData> = response.json().await.map_err(|e| {
            error!("failed to parse listing page: {}", e);
            ListsError::Upstream {
                details: format!("malformed listing page: {e}"),
            }
        })?;

        let names = listing
            .data
            .children
            .into_iter()
            .map(|child| child.data.display_name)
            .collect::<Vec<_>>();

        debug!(
            count = names.len(),
            next = listing.data.after.as_deref().unwrap_or("<end>"),
            "listing page fetched"
        );
        Ok(Page {
            names,
            after: listing.data.after,
        })
    }
}
