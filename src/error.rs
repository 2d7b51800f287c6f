use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

#[derive(Error, Debug)]
pub enum Error {
    /// One comment node lacks a required element. Recovered by skipping the node.
    #[error("Malformed comment node #{index}: missing {field}")]
    MalformedNode { index: usize, field: &'static str },

    #[error("No recognizable issue structure found in document")]
    NoIssueStructureFound,

    /// Text analytics call failed or timed out. Recovered by omitting the data.
    #[error("Analytics unavailable for comment #{index}: {reason}")]
    AnalyticsUnavailable { index: usize, reason: String },

    #[error("Invalid configuration: {0}")]
    ConfigInvalid(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    #[error("Image error: {0}")]
    Image(#[from] image::ImageError),

    #[error("Report error: {0}")]
    Report(String),
}

impl Error {
    /// Errors that only affect one comment and never abort a run.
    pub const fn is_recoverable(&self) -> bool {
        matches!(
            self,
            Self::MalformedNode { .. } | Self::AnalyticsUnavailable { .. }
        )
    }
}
