mod analyzer;
mod model;

pub use analyzer::Aggregator;
pub use model::IssueAnalysis;
