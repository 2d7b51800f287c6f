use crate::analytics::{shared_limiter, AnalyticsError, SharedRateLimiter, TextAnalysis, TextAnalytics};
use crate::error::Error;
use crate::model::{Comment, Config, IssueSummary, KeyPhrasesByComment, SentimentByComment};
use futures::stream::{self, StreamExt};
use indexmap::IndexSet;
use indicatif::ProgressBar;
use std::time::Duration;
use tracing::{debug, info, warn};

/// Runs a `TextAnalytics` provider over comments under a shared rate limit,
/// a per-call timeout and bounded concurrency.
pub struct AnalyticsRunner<A> {
    provider: A,
    limiter: SharedRateLimiter,
    timeout: Duration,
    max_concurrent: usize,
    excluded_key_phrases: IndexSet<String>,
    key_phrase_count: usize,
}

/// Per-comment results keyed by comment index, plus the failures.
#[derive(Debug, Default)]
pub struct AnalyticsOutcome {
    pub sentiment: SentimentByComment,
    pub key_phrases: KeyPhrasesByComment,
    pub warnings: Vec<String>,
}

impl<A: TextAnalytics> AnalyticsRunner<A> {
    pub fn new(provider: A, config: &Config) -> Self {
        Self {
            provider,
            limiter: shared_limiter(
                "text-analytics",
                config.requests_per_second,
                Duration::from_secs(config.request_timeout_secs),
            ),
            timeout: Duration::from_secs(config.request_timeout_secs),
            max_concurrent: config.max_concurrent_requests.max(1),
            excluded_key_phrases: config.excluded_key_phrases.clone(),
            key_phrase_count: config.key_phrase_count,
        }
    }

    pub fn with_timeout(mut self, timeout: Duration) -> Self {
        self.timeout = timeout;
        self
    }

    pub fn with_limiter(mut self, limiter: SharedRateLimiter) -> Self {
        self.limiter = limiter;
        self
    }

    /// Analyzes one comment body. Exclusions and the phrase cap are applied here.
    /// Waiting for rate limit tokens counts toward the timeout.
    pub async fn analyze_one(&self, text: &str) -> Result<TextAnalysis, AnalyticsError> {
        let call = async {
            for _ in 0..self.provider.requests_per_call() {
                self.limiter.acquire().await;
            }
            self.provider.analyze(text).await
        };
        let mut analysis = tokio::time::timeout(self.timeout, call)
            .await
            .map_err(|_| AnalyticsError::Timeout(self.timeout))??;
        analysis
            .key_phrases
            .retain(|phrase| !self.excluded_key_phrases.contains(phrase));
        analysis.key_phrases.truncate(self.key_phrase_count);
        Ok(analysis)
    }

    pub async fn run(&self, comments: &[Comment], pb: &ProgressBar) -> AnalyticsOutcome {
        pb.set_length(comments.len() as u64);
        pb.set_message("Analyzing comments");

        let mut results = stream::iter(comments)
            .map(|comment| async move {
                let result = if comment.body_text.trim().is_empty() {
                    debug!(index = comment.index, "Skipping empty comment body");
                    None
                } else {
                    Some(self.analyze_one(&comment.body_text).await)
                };
                pb.inc(1);
                (comment.index, result)
            })
            .buffer_unordered(self.max_concurrent)
            .collect::<Vec<_>>()
            .await;

        results.sort_by_key(|(index, _)| *index);

        let mut outcome = AnalyticsOutcome::default();
        for (index, result) in results {
            match result {
                Some(Ok(analysis)) => {
                    outcome.sentiment.insert(index, analysis.sentiment_score);
                    outcome.key_phrases.insert(index, analysis.key_phrases);
                }
                Some(Err(e)) => {
                    let err = Error::AnalyticsUnavailable {
                        index,
                        reason: e.to_string(),
                    };
                    warn!("{err}");
                    outcome.warnings.push(err.to_string());
                }
                None => {}
            }
        }

        pb.finish_with_message(format!(
            "✅ Completed analytics ({} of {} comments scored)",
            outcome.sentiment.len(),
            comments.len()
        ));
        info!(
            scored = outcome.sentiment.len(),
            failed = outcome.warnings.len(),
            "Text analytics finished"
        );
        outcome
    }
}

impl AnalyticsOutcome {
    /// Fills the summary's analytics fields. They stay absent when no comment
    /// got data.
    pub fn apply(self, summary: &mut IssueSummary) {
        if !self.sentiment.is_empty() {
            summary.sentiment_by_comment = Some(self.sentiment);
        }
        if !self.key_phrases.is_empty() {
            summary.key_phrases = Some(self.key_phrases);
        }
        summary.warnings.extend(self.warnings);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::analytics::RateLimiter;
    use crate::model::{CommentKind, Participants, Reactions};
    use std::sync::Arc;

    /// Scores by word count; later comments finish first to scramble arrival order.
    struct FakeAnalytics;

    impl TextAnalytics for FakeAnalytics {
        async fn analyze(&self, text: &str) -> Result<TextAnalysis, AnalyticsError> {
            if text.contains("fail") {
                return Err(AnalyticsError::Response("service error".into()));
            }
            let words = text.split_whitespace().count();
            tokio::time::sleep(Duration::from_millis(40 / words as u64)).await;
            Ok(TextAnalysis {
                sentiment_score: words as f64 / 10.0,
                key_phrases: text.split_whitespace().map(String::from).collect(),
            })
        }
    }

    struct SlowAnalytics;

    impl TextAnalytics for SlowAnalytics {
        async fn analyze(&self, _text: &str) -> Result<TextAnalysis, AnalyticsError> {
            tokio::time::sleep(Duration::from_millis(500)).await;
            Ok(TextAnalysis {
                sentiment_score: 1.0,
                key_phrases: vec![],
            })
        }
    }

    fn comment(index: usize, text: &str) -> Comment {
        Comment {
            index,
            kind: CommentKind::Comment,
            author: "bob".to_string(),
            body_text: text.to_string(),
            mentions: vec![],
            reactions: Reactions::new(),
            timestamp: None,
        }
    }

    fn fast_config() -> Config {
        Config {
            requests_per_second: 1000.0,
            ..Config::default()
        }
    }

    fn empty_summary() -> IssueSummary {
        IssueSummary {
            title: None,
            participation: None,
            participants: Participants::new(),
            total_comments: 0,
            comments: vec![],
            sentiment_by_comment: None,
            key_phrases: None,
            warnings: vec![],
        }
    }

    #[tokio::test]
    async fn test_results_associated_by_comment_index() {
        let runner = AnalyticsRunner::new(FakeAnalytics, &fast_config());
        let comments = vec![
            comment(0, "one"),
            comment(1, "one two"),
            comment(2, "one two three four"),
        ];

        let outcome = runner.run(&comments, &ProgressBar::hidden()).await;

        assert_eq!(outcome.sentiment[&0], 0.1);
        assert_eq!(outcome.sentiment[&1], 0.2);
        assert_eq!(outcome.sentiment[&2], 0.4);
        assert_eq!(outcome.key_phrases[&1], vec!["one", "two"]);
        assert!(outcome.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_failures_are_warnings() {
        let runner = AnalyticsRunner::new(FakeAnalytics, &fast_config());
        let comments = vec![comment(0, "fine words"), comment(1, "this will fail")];

        let outcome = runner.run(&comments, &ProgressBar::hidden()).await;

        assert_eq!(outcome.sentiment.len(), 1);
        assert!(outcome.sentiment.contains_key(&0));
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.warnings[0].starts_with("Analytics unavailable for comment #1"));
    }

    #[tokio::test]
    async fn test_timeout_degrades_to_no_data() {
        let runner = AnalyticsRunner::new(SlowAnalytics, &fast_config())
            .with_timeout(Duration::from_millis(20));

        let outcome = runner.run(&[comment(0, "slow")], &ProgressBar::hidden()).await;

        assert!(outcome.sentiment.is_empty());
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.warnings[0].contains("timed out"));

        let mut summary = empty_summary();
        outcome.apply(&mut summary);
        assert!(summary.sentiment_by_comment.is_none());
        assert!(summary.key_phrases.is_none());
        assert_eq!(summary.warnings.len(), 1);
    }

    #[tokio::test]
    async fn test_exclusions_and_phrase_cap() {
        let config = Config {
            excluded_key_phrases: IndexSet::from(["two".to_string()]),
            key_phrase_count: 2,
            ..fast_config()
        };
        let runner = AnalyticsRunner::new(FakeAnalytics, &config);

        let analysis = runner.analyze_one("one two three four").await.unwrap();

        assert_eq!(analysis.key_phrases, vec!["one", "three"]);
    }

    #[tokio::test]
    async fn test_empty_bodies_are_skipped() {
        let runner = AnalyticsRunner::new(FakeAnalytics, &fast_config());
        let outcome = runner
            .run(&[comment(0, "   "), comment(1, "hello")], &ProgressBar::hidden())
            .await;
        assert_eq!(outcome.sentiment.keys().copied().collect::<Vec<_>>(), vec![1]);
        assert!(outcome.warnings.is_empty());
    }

    #[tokio::test]
    async fn test_shared_limiter_gates_all_calls() {
        let limiter = Arc::new(RateLimiter::from_rps("test", 20.0));
        let runner = AnalyticsRunner::new(FakeAnalytics, &fast_config()).with_limiter(limiter);
        let comments = (0..4).map(|i| comment(i, "a b c d e f g h")).collect::<Vec<_>>();

        let start = std::time::Instant::now();
        let outcome = runner.run(&comments, &ProgressBar::hidden()).await;

        assert_eq!(outcome.sentiment.len(), 4);
        // 4 calls at 20 rps: three 50ms waits after the first token
        assert!(start.elapsed() >= Duration::from_millis(140));
    }

    #[tokio::test]
    async fn test_tiny_rate_degrades_to_timeout() {
        let config = Config {
            requests_per_second: 1e-20,
            request_timeout_secs: 1,
            ..Config::default()
        };
        let runner = AnalyticsRunner::new(FakeAnalytics, &config)
            .with_timeout(Duration::from_millis(200));
        let comments = vec![comment(0, "first"), comment(1, "second")];

        let outcome = tokio::time::timeout(
            Duration::from_secs(5),
            runner.run(&comments, &ProgressBar::hidden()),
        )
        .await
        .unwrap();

        assert_eq!(outcome.sentiment.len(), 1);
        assert_eq!(outcome.warnings.len(), 1);
        assert!(outcome.warnings[0].contains("timed out"));
    }
}
