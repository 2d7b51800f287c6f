//! Sentiment scoring and key phrase extraction through an external service.

mod azure;
mod rate_limiter;
mod runner;

pub use azure::AzureTextAnalytics;
pub use rate_limiter::{shared_limiter, RateLimiter, SharedRateLimiter};
pub use runner::{AnalyticsOutcome, AnalyticsRunner};

use std::time::Duration;
use thiserror::Error;

/// Result of analyzing one comment body.
#[derive(Debug, Clone, PartialEq)]
pub struct TextAnalysis {
    /// Score in `[-1, 1]`, negative to positive.
    pub sentiment_score: f64,
    pub key_phrases: Vec<String>,
}

#[derive(Error, Debug)]
pub enum AnalyticsError {
    #[error("request failed: {0}")]
    Request(#[from] reqwest::Error),

    #[error("unexpected response: {0}")]
    Response(String),

    #[error("timed out after {0:?}")]
    Timeout(Duration),
}

pub trait TextAnalytics {
    async fn analyze(&self, text: &str) -> Result<TextAnalysis, AnalyticsError>;

    /// HTTP requests one `analyze` call makes, for rate limiting.
    fn requests_per_call(&self) -> u32 {
        1
    }
}
