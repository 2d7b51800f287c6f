use crate::model::{Comment, Participant};
use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

pub type Participants = IndexMap<String, Participant>;
pub type SentimentByComment = BTreeMap<usize, f64>;
pub type KeyPhrasesByComment = BTreeMap<usize, Vec<String>>;

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IssueSummary {
    pub title: Option<String>,
    pub participation: Option<String>,
    pub participants: Participants,
    pub total_comments: usize,
    #[serde(default)]
    pub comments: Vec<Comment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sentiment_by_comment: Option<SentimentByComment>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub key_phrases: Option<KeyPhrasesByComment>,
    #[serde(default)]
    pub warnings: Vec<String>,
}

impl IssueSummary {
    /// Sentiment scores in comment order, skipping comments without data.
    pub fn sentiments(&self) -> Vec<f64> {
        self.sentiment_by_comment
            .as_ref()
            .map(|scores| scores.values().copied().collect())
            .unwrap_or_default()
    }

    pub fn average_sentiment(&self, username: &str) -> Option<f64> {
        let scores = self.sentiment_by_comment.as_ref()?;
        let values = self
            .comments
            .iter()
            .filter(|c| c.author == username)
            .filter_map(|c| scores.get(&c.index))
            .collect::<Vec<_>>();
        if values.is_empty() {
            return None;
        }
        Some(values.iter().copied().sum::<f64>() / values.len() as f64)
    }

    /// Key phrase frequencies across all comments, most frequent first.
    /// Ties keep first-seen order.
    pub fn key_phrase_frequencies(&self, excluded: &[String]) -> Vec<(String, usize)> {
        let Some(phrases) = &self.key_phrases else {
            return vec![];
        };
        let mut counts: IndexMap<&str, usize> = IndexMap::new();
        for phrase in phrases.values().flatten() {
            if excluded.iter().any(|e| e == phrase) {
                continue;
            }
            *counts.entry(phrase.as_str()).or_insert(0) += 1;
        }
        let mut counts = counts
            .into_iter()
            .map(|(p, c)| (p.to_string(), c))
            .collect::<Vec<_>>();
        counts.sort_by(|a, b| b.1.cmp(&a.1));
        counts
    }
}
