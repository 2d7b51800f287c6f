use crate::error::{Error, Result};
use crate::model::{Config, IssueSummary, Participant};
use itertools::Itertools;
use markdown_builder::Markdown;
use markdown_table::{Heading, HeadingAlignment, MarkdownTable};

/// Presentation switches for the text summary.
#[derive(Debug, Clone)]
pub struct ReportOptions {
    pub key_phrase_count: usize,
    pub excluded_key_phrases: Vec<String>,
    pub exclude_user_names: bool,
    pub use_emojis: bool,
}

impl From<&Config> for ReportOptions {
    fn from(config: &Config) -> Self {
        Self {
            key_phrase_count: config.key_phrase_count,
            excluded_key_phrases: config.excluded_key_phrases.iter().cloned().collect(),
            exclude_user_names: config.exclude_user_names,
            use_emojis: config.use_emojis,
        }
    }
}

pub trait MarkdownReport {
    fn report_render(&self, options: &ReportOptions) -> Result<String>;
}

impl MarkdownReport for IssueSummary {
    fn report_render(&self, options: &ReportOptions) -> Result<String> {
        let mut doc = Markdown::new();

        doc.header1(format!(
            "Summary of GitHub issue: {}",
            self.title.as_deref().unwrap_or("(untitled)")
        ));
        let participation = self
            .participation
            .clone()
            .unwrap_or_else(|| format!("{} participants", self.participants.len()));
        doc.paragraph(format!(
            "Analyzed: {} comments from {}",
            self.total_comments, participation
        ));

        doc.add_participants(self, options)?;
        doc.add_key_phrases(self, options)?;
        doc.add_warnings(self);

        Ok(doc.render())
    }
}

/// Participants by comment count, then mention count, both descending, then name.
pub fn ranked_participants(summary: &IssueSummary) -> Vec<&Participant> {
    summary
        .participants
        .values()
        .sorted_by(|a, b| {
            b.comment_count
                .cmp(&a.comment_count)
                .then(b.mention_count.cmp(&a.mention_count))
                .then(a.username.cmp(&b.username))
        })
        .collect()
}

fn reactions_cell(participant: &Participant, use_emojis: bool) -> String {
    participant
        .reaction_totals
        .iter()
        .filter(|(_, count)| **count > 0)
        .sorted_by(|a, b| b.1.cmp(a.1).then(a.0.cmp(b.0)))
        .map(|(kind, count)| {
            if use_emojis {
                format!("{} {count}", kind.emoji())
            } else {
                format!("{kind}: {count}")
            }
        })
        .join(", ")
}

fn render_table(header: Vec<Heading>, rows: Vec<Vec<String>>) -> Result<String> {
    let mut md_table = MarkdownTable::new(rows);
    md_table.with_headings(header);
    md_table
        .as_markdown()
        .map_err(|e| Error::Report(format!("{e:?}")))
}

trait MarkdownExt {
    fn add_participants(&mut self, summary: &IssueSummary, options: &ReportOptions) -> Result<()>;
    fn add_key_phrases(&mut self, summary: &IssueSummary, options: &ReportOptions) -> Result<()>;
    fn add_warnings(&mut self, summary: &IssueSummary);
}

impl MarkdownExt for Markdown {
    fn add_participants(&mut self, summary: &IssueSummary, options: &ReportOptions) -> Result<()> {
        self.header2("User summary from all comments".to_string());

        let participants = ranked_participants(summary);
        if participants.is_empty() {
            self.paragraph("No participants found.".to_string());
            return Ok(());
        }

        let header = ["", "", "User", "Comment count", "Times @mentioned", "Avg sentiment", "Reactions"]
            .iter()
            .map(|s| Heading::new(s.to_string(), None))
            .collect::<Vec<_>>();
        let rows = participants
            .iter()
            .map(|p| {
                vec![
                    if p.is_issue_author { "#" } else { "" }.to_string(),
                    if p.is_member { "*" } else { "" }.to_string(),
                    p.username.clone(),
                    p.comment_count.to_string(),
                    p.mention_count.to_string(),
                    summary
                        .average_sentiment(&p.username)
                        .map(|s| format!("{s:.2}"))
                        .unwrap_or_else(|| "-".to_string()),
                    reactions_cell(p, options.use_emojis),
                ]
            })
            .collect::<Vec<_>>();

        self.paragraph(render_table(header, rows)?);
        self.paragraph("`#` issue author, `*` organization member".to_string());
        Ok(())
    }

    fn add_key_phrases(&mut self, summary: &IssueSummary, options: &ReportOptions) -> Result<()> {
        self.header2(format!(
            "Top {} key phrases from all comments",
            options.key_phrase_count
        ));

        let mut excluded = options.excluded_key_phrases.clone();
        if options.exclude_user_names {
            excluded.extend(summary.participants.keys().cloned());
        }
        let phrases = summary
            .key_phrase_frequencies(&excluded)
            .into_iter()
            .take(options.key_phrase_count)
            .collect::<Vec<_>>();

        if summary.key_phrases.is_none() {
            self.paragraph("Key phrases were not analyzed.".to_string());
        } else if phrases.is_empty() {
            self.paragraph("No key phrases found.".to_string());
        } else {
            let header = vec![
                Heading::new("Key phrase".to_string(), None),
                Heading::new("Frequency".to_string(), Some(HeadingAlignment::Right)),
            ];
            let rows = phrases
                .into_iter()
                .map(|(phrase, count)| vec![phrase, count.to_string()])
                .collect::<Vec<_>>();
            self.paragraph(render_table(header, rows)?);
        }

        let excluded = if options.excluded_key_phrases.is_empty() {
            "none".to_string()
        } else {
            options.excluded_key_phrases.join(", ")
        };
        self.paragraph(format!("Excludes key phrases: {excluded}"));
        Ok(())
    }

    fn add_warnings(&mut self, summary: &IssueSummary) {
        if summary.warnings.is_empty() {
            return;
        }
        self.header2("Warnings".to_string());
        self.paragraph(
            summary
                .warnings
                .iter()
                .map(|w| format!("- {w}"))
                .join("\n"),
        );
    }
}
