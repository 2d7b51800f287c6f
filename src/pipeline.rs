use crate::analytics::{AnalyticsRunner, TextAnalytics};
use crate::analyze::{Aggregator, IssueAnalysis};
use crate::error::Result;
use crate::extract::Extractor;
use crate::model::{Config, IssueSummary};
use crate::normalize::Normalizer;
use indicatif::ProgressBar;
use scraper::Html;
use tracing::{info, warn};

/// Extracts, normalizes and aggregates one issue page.
///
/// Malformed comment nodes are skipped and reported in `warnings`. Fails
/// only when the page holds no recognizable issue.
pub fn extract_summary(html: &str, config: &Config) -> Result<IssueSummary> {
    let document = Html::parse_document(html);
    let extractor = Extractor::new(&document);

    let mut normalizer = Normalizer::new(config.exclude_self_mentions);
    let mut comments = vec![];
    let mut warnings = vec![];
    for raw in extractor.comments()? {
        match raw {
            Ok(raw) => comments.push(normalizer.normalize(raw)),
            Err(e) if e.is_recoverable() => {
                warn!("{e}");
                warnings.push(e.to_string());
            }
            Err(e) => return Err(e),
        }
    }
    info!(
        comments = comments.len(),
        skipped = warnings.len(),
        participants = normalizer.registry().len(),
        "Extracted issue comments"
    );

    let mut analysis = IssueAnalysis::new(normalizer.finish(), config.count_issue_body);
    analysis.title = extractor.title();
    analysis.participation = extractor.participation();
    analysis.insert_comments(comments);
    analysis.insert_warnings(warnings);
    Ok(analysis.aggregate())
}

/// Scores every comment of `summary` with `provider` and attaches the results.
/// Failed calls end up as warnings; the summary is never rejected.
pub async fn attach_analytics<A: TextAnalytics>(
    summary: &mut IssueSummary,
    provider: A,
    config: &Config,
    pb: &ProgressBar,
) {
    let runner = AnalyticsRunner::new(provider, config);
    let outcome = runner.run(&summary.comments, pb).await;
    outcome.apply(summary);
}
