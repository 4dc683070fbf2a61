use lists_core::ListsError;
use std::time::Duration;
use tokio::time::sleep;
use tracing::{debug, info, warn};

/// Configuration for retry behavior
#[derive(Debug, Clone)]
pub struct RetryConfig {
    /// Maximum number of attempts, including the first one
    pub max_attempts: u32,
    /// Base delay for exponential backoff (in milliseconds)
    pub base_delay_ms: u64,
    /// Maximum delay between retries (in milliseconds)
    pub max_delay_ms: u64,
    /// Multiplier for exponential backoff
    pub backoff_multiplier: f64,
    /// Maximum jitter factor (0.0 to 1.0)
    pub jitter_factor: f64,
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            max_attempts: 4,
            base_delay_ms: 1000,
            max_delay_ms: 30000,
            backoff_multiplier: 2.0,
            jitter_factor: 0.1,
        }
    }
}

impl RetryConfig {
    /// Retry config tuned for the Reddit API.
    pub fn reddit() -> Self {
        Self {
            max_attempts: 4,
            base_delay_ms: 2000,
            max_delay_ms: 60000,
            backoff_multiplier: 2.0,
            jitter_factor: 0.2,
        }
    }
}

/// Retry strategy based on error type
#[derive(Debug, Clone, PartialEq)]
pub enum RetryStrategy {
    /// Retry with exponential backoff
    Retry,
    /// Retry after the delay the upstream asked for
    RetryWithDelay(Duration),
    /// Don't retry (for permanent failures)
    NoRetry,
}

/// Determine retry strategy based on error type
pub fn get_retry_strategy(error: &ListsError) -> RetryStrategy {
    match error {
        // Rate limits are retried after the upstream-specified delay
        ListsError::RateLimited { retry_after } => {
            RetryStrategy::RetryWithDelay(Duration::from_secs(*retry_after))
        }
        // Connection-level failures are transient
        ListsError::Network(e) => {
            if e.is_timeout() || e.is_connect() {
                RetryStrategy::Retry
            } else {
                RetryStrategy::NoRetry
            }
        }
        // Bad credentials will not become valid by retrying, and an
        // unexpected response shape will come back just as unexpected
        _ => RetryStrategy::NoRetry,
    }
}

/// Calculate delay with exponential backoff and jitter
pub fn calculate_delay(attempt: u32, config: &RetryConfig) -> Duration {
    let exponential_delay = if attempt == 0 {
        Duration::from_millis(config.base_delay_ms)
    } else {
        let multiplier = config.backoff_multiplier.powi(attempt as i32);
        let delay_ms = (config.base_delay_ms as f64 * multiplier) as u64;
        Duration::from_millis(delay_ms.min(config.max_delay_ms))
    };

    // Jitter to avoid synchronized retries
    let jitter_range = (exponential_delay.as_millis() as f64 * config.jitter_factor) as u64;
    let jitter = fastrand::u64(0..=jitter_range);
    let final_delay = exponential_delay + Duration::from_millis(jitter);

    final_delay.min(Duration::from_millis(config.max_delay_ms))
}

/// Wraps page fetches with bounded retry.
#[derive(Debug)]
pub struct RetryExecutor {
    config: RetryConfig,
}

impl RetryExecutor {
    pub fn new(config: RetryConfig) -> Self {
        Self { config }
    }

    /// Runs `operation` until it succeeds, fails permanently, or the attempt
    /// budget is exhausted. The last error is returned as-is so the caller
    /// sees which stage failed.
    pub async fn execute<F, Fut, T>(
        &self,
        operation_name: &str,
        operation: F,
    ) -> Result<T, ListsError>
    where
        F: Fn() -> Fut,
        Fut: std::future::Future<Output = Result<T, ListsError>>,
    {
        if self.config.max_attempts == 0 {
            return Err(ListsError::Internal {
                message: format!("retry budget for {operation_name} is zero"),
            });
        }

        for attempt in 0..self.config.max_attempts {
            if attempt > 0 {
                debug!("retry attempt {} for {}", attempt, operation_name);
            }

            let error = match operation().await {
                Ok(result) => {
                    if attempt > 0 {
                        info!("{} succeeded after {} retries", operation_name, attempt);
                    }
                    return Ok(result);
                }
                Err(error) => error,
            };

            let last_attempt = attempt + 1 >= self.config.max_attempts;
            match get_retry_strategy(&error) {
                RetryStrategy::NoRetry => {
                    debug!("not retrying {} after: {}", operation_name, error);
                    return Err(error);
                }
                _ if last_attempt => {
                    warn!(
                        "{} failed after {} attempts: {}",
                        operation_name, self.config.max_attempts, error
                    );
                    return Err(error);
                }
                RetryStrategy::Retry => {
                    let delay = calculate_delay(attempt, &self.config);
                    warn!("retrying {} in {:?} after: {}", operation_name, delay, error);
                    sleep(delay).await;
                }
                RetryStrategy::RetryWithDelay(delay) => {
                    let delay = delay.min(Duration::from_millis(self.config.max_delay_ms));
                    warn!("retrying {} in {:?} after: {}", operation_name, delay, error);
                    sleep(delay).await;
                }
            }
        }

        Err(ListsError::Internal {
            message: format!("retry loop for {operation_name} exited without a result"),
        })
    }
}
