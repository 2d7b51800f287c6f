use crate::analytics::{AnalyticsError, TextAnalysis, TextAnalytics};
use reqwest::{Client, Url};
use serde::Deserialize;
use serde_json::json;
use std::time::Duration;
use tracing::debug;

const SENTIMENT_PATH: &str = "text/analytics/v3.0/sentiment";
const KEY_PHRASES_PATH: &str = "text/analytics/v3.0/keyPhrases";
const KEY_HEADER: &str = "Ocp-Apim-Subscription-Key";
/// Keeps a single document under the service's 5120 character limit.
const MAX_TEXT_CHARS: usize = 5000;

/// Azure Cognitive Services Text Analytics (REST v3.0).
#[derive(Debug, Clone)]
pub struct AzureTextAnalytics {
    client: Client,
    endpoint: Url,
    key: String,
    language: String,
}

impl AzureTextAnalytics {
    pub fn new(
        endpoint: &str,
        key: impl Into<String>,
        language: impl Into<String>,
        timeout: Duration,
    ) -> Result<Self, AnalyticsError> {
        let mut endpoint = Url::parse(endpoint)
            .map_err(|e| AnalyticsError::Response(format!("invalid endpoint: {e}")))?;
        if !endpoint.path().ends_with('/') {
            let path = format!("{}/", endpoint.path());
            endpoint.set_path(&path);
        }
        let client = Client::builder().timeout(timeout).build()?;
        Ok(Self {
            client,
            endpoint,
            key: key.into(),
            language: language.into(),
        })
    }

    fn url(&self, path: &str) -> Result<Url, AnalyticsError> {
        self.endpoint
            .join(path)
            .map_err(|e| AnalyticsError::Response(format!("invalid endpoint path: {e}")))
    }

    async fn post<T: for<'de> Deserialize<'de>>(
        &self,
        path: &str,
        text: &str,
    ) -> Result<T, AnalyticsError> {
        let body = json!({
            "documents": [{
                "id": "1",
                "language": self.language,
                "text": truncate(text, MAX_TEXT_CHARS),
            }]
        });
        let url = self.url(path)?;
        debug!(url = %url, "Calling text analytics");
        let response = self
            .client
            .post(url)
            .header(KEY_HEADER, &self.key)
            .json(&body)
            .send()
            .await?
            .error_for_status()?;
        Ok(response.json::<T>().await?)
    }
}

impl TextAnalytics for AzureTextAnalytics {
    async fn analyze(&self, text: &str) -> Result<TextAnalysis, AnalyticsError> {
        let sentiment: SentimentResponse = self.post(SENTIMENT_PATH, text).await?;
        let key_phrases: KeyPhraseResponse = self.post(KEY_PHRASES_PATH, text).await?;

        let Some(sentiment) = sentiment.documents.into_iter().next() else {
            return Err(document_error("sentiment", sentiment.errors));
        };
        let Some(key_phrases) = key_phrases.documents.into_iter().next() else {
            return Err(document_error("key phrases", key_phrases.errors));
        };

        Ok(TextAnalysis {
            sentiment_score: sentiment.confidence_scores.score(),
            key_phrases: key_phrases.key_phrases,
        })
    }

    fn requests_per_call(&self) -> u32 {
        2
    }
}

#[derive(Debug, Deserialize)]
struct SentimentResponse {
    documents: Vec<SentimentDocument>,
    #[serde(default)]
    errors: Vec<DocumentError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct SentimentDocument {
    confidence_scores: ConfidenceScores,
}

#[derive(Debug, Deserialize)]
struct ConfidenceScores {
    positive: f64,
    negative: f64,
}

impl ConfidenceScores {
    fn score(&self) -> f64 {
        (self.positive - self.negative).clamp(-1.0, 1.0)
    }
}

#[derive(Debug, Deserialize)]
struct KeyPhraseResponse {
    documents: Vec<KeyPhraseDocument>,
    #[serde(default)]
    errors: Vec<DocumentError>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct KeyPhraseDocument {
    key_phrases: Vec<String>,
}

#[derive(Debug, Deserialize)]
struct DocumentError {
    error: ErrorDetail,
}

#[derive(Debug, Deserialize)]
struct ErrorDetail {
    message: String,
}

fn document_error(what: &str, errors: Vec<DocumentError>) -> AnalyticsError {
    let message = errors
        .into_iter()
        .next()
        .map(|e| e.error.message)
        .unwrap_or_else(|| "no document in response".to_string());
    AnalyticsError::Response(format!("{what}: {message}"))
}

fn truncate(text: &str, max_chars: usize) -> String {
    text.chars().take(max_chars).collect()
}
