//! Participant analytics for a saved GitHub issue page: who commented, who
//! got @mentioned, which reactions they collected and, optionally, how the
//! discussion's sentiment moved.

pub mod analytics;
pub mod analyze;
pub mod error;
pub mod extract;
pub mod model;
pub mod normalize;
pub mod pipeline;
pub mod report;
pub mod utils;

pub use error::{Error, Result};
pub use model::{Config, IssueSummary};
pub use pipeline::{attach_analytics, extract_summary};
