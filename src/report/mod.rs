pub mod json;
pub mod markdown;
pub mod plot;

pub use markdown::{ranked_participants, MarkdownReport, ReportOptions};

use crate::error::Result;
use crate::model::{Config, IssueSummary};
use std::fs;
use std::path::PathBuf;
use tracing::{debug, info};

/// What was written by `Reporter::save`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum SavedOutput {
    Summary(PathBuf),
    RawJson(PathBuf),
    SentimentPlot(PathBuf),
}

impl SavedOutput {
    pub fn path(&self) -> &PathBuf {
        match self {
            Self::Summary(path) | Self::RawJson(path) | Self::SentimentPlot(path) => path,
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::Summary(_) => "summary",
            Self::RawJson(_) => "raw output",
            Self::SentimentPlot(_) => "sentiment plot",
        }
    }
}

/// Renders a summary and writes it wherever the configuration asks.
pub struct Reporter<'a> {
    config: &'a Config,
    options: ReportOptions,
}

impl<'a> Reporter<'a> {
    pub fn new(config: &'a Config) -> Self {
        Self {
            config,
            options: ReportOptions::from(config),
        }
    }

    pub fn render_text(&self, summary: &IssueSummary) -> Result<String> {
        summary.report_render(&self.options)
    }

    /// Writes the text summary and raw JSON next to `output_filename`, and the
    /// sentiment plot when there is sentiment data to draw.
    pub fn save(&self, summary: &IssueSummary) -> Result<Vec<SavedOutput>> {
        let mut saved = vec![];

        if let Some(path) = &self.config.output_filename {
            fs::write(path, self.render_text(summary)?)?;
            saved.push(SavedOutput::Summary(path.clone()));
        }
        if let Some(path) = self.config.json_output_path() {
            fs::write(&path, json::to_json(summary)?)?;
            saved.push(SavedOutput::RawJson(path));
        }

        let scores = summary.sentiments();
        if self.config.show_sentiment_plot && !scores.is_empty() {
            let path = self.config.plot_output_path();
            plot::save_sentiment_plot(&scores, &path)?;
            saved.push(SavedOutput::SentimentPlot(path));
        } else {
            debug!(points = scores.len(), "Sentiment plot skipped");
        }

        for output in &saved {
            info!(path = %output.path().display(), "Saved {}", output.label());
        }
        Ok(saved)
    }
}
