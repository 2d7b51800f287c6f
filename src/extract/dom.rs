use crate::error::{Error, Result};
use crate::extract::selector::{IssueSelectors, GITHUB};
use crate::extract::text::{digits, normalize_ws, visible_text};
use crate::model::{CommentKind, ReactionKind, Reactions};
use chrono::{DateTime, FixedOffset};
use scraper::{ElementRef, Html};
use tracing::debug;

/// Fields pulled from one comment node, before mention resolution.
#[derive(Debug, Clone, PartialEq)]
pub struct RawComment {
    pub position: usize,
    pub kind: CommentKind,
    pub author: String,
    pub body_text: String,
    pub reactions: Reactions,
    pub timestamp: Option<DateTime<FixedOffset>>,
    pub is_member: bool,
}

pub struct Extractor<'a> {
    html: &'a Html,
    selectors: &'a IssueSelectors,
}

// Create
impl<'a> Extractor<'a> {
    pub fn new(html: &'a Html) -> Self {
        Self::with_selectors(html, &GITHUB)
    }

    pub fn with_selectors(html: &'a Html, selectors: &'a IssueSelectors) -> Self {
        Self { html, selectors }
    }
}

// Document
impl<'a> Extractor<'a> {
    /// Comment nodes in document order, issue body first.
    ///
    /// Fails only when the page has no recognizable issue at all. Each item
    /// is extracted when the iterator reaches it; a node missing its author
    /// or body yields `Err(MalformedNode)` and iteration carries on.
    pub fn comments(&self) -> Result<RawComments<'a>> {
        let nodes = self.selectors.container.all_in(self.html);
        if nodes.is_empty() && self.selectors.issue_structure.first_in(self.html).is_none() {
            return Err(Error::NoIssueStructureFound);
        }
        debug!(nodes = nodes.len(), "Found comment containers");
        Ok(RawComments {
            nodes: nodes.into_iter().enumerate(),
            selectors: self.selectors,
        })
    }

    pub fn title(&self) -> Option<String> {
        self.selectors
            .title
            .first_in(self.html)
            .map(|el| normalize_ws(&el.text().collect::<String>()))
            .filter(|t| !t.is_empty())
    }

    /// GitHub's participant label, e.g. `"4 participants"`.
    pub fn participation(&self) -> Option<String> {
        self.selectors
            .participation
            .first_in(self.html)
            .map(|el| normalize_ws(&el.text().collect::<String>()))
            .filter(|t| !t.is_empty())
    }
}

pub struct RawComments<'a> {
    nodes: std::iter::Enumerate<std::vec::IntoIter<ElementRef<'a>>>,
    selectors: &'a IssueSelectors,
}

impl Iterator for RawComments<'_> {
    type Item = Result<RawComment>;

    fn next(&mut self) -> Option<Self::Item> {
        let (position, node) = self.nodes.next()?;
        Some(extract_node(self.selectors, position, node))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.nodes.size_hint()
    }
}

fn extract_node(
    selectors: &IssueSelectors,
    position: usize,
    node: ElementRef<'_>,
) -> Result<RawComment> {
    let malformed = |field: &'static str| Error::MalformedNode { index: position, field };

    let author = selectors
        .author
        .first(node)
        .map(|el| normalize_ws(&el.text().collect::<String>()))
        .filter(|a| !a.is_empty())
        .ok_or_else(|| malformed(selectors.author.name()))?;
    let body = selectors
        .body
        .first(node)
        .ok_or_else(|| malformed(selectors.body.name()))?;

    let kind = if position == 0 && selectors.reply_form.first(node).is_none() {
        CommentKind::IssueBody
    } else {
        CommentKind::Comment
    };

    let timestamp = selectors
        .timestamp
        .first(node)
        .and_then(|el| el.value().attr("datetime"))
        .and_then(|dt| DateTime::parse_from_rfc3339(dt).ok());

    let is_member = selectors
        .badge
        .all(node)
        .iter()
        .filter_map(|el| el.value().attr("aria-label"))
        .any(|label| selectors.member_label.is_match(label));

    Ok(RawComment {
        position,
        kind,
        author,
        body_text: visible_text(body),
        reactions: extract_reactions(selectors, node),
        timestamp,
        is_member,
    })
}

fn extract_reactions(selectors: &IssueSelectors, node: ElementRef<'_>) -> Reactions {
    let mut reactions = Reactions::new();
    for button in selectors.reactions.all(node) {
        let text = button.text().collect::<String>();
        let Some(count) = digits(&text) else {
            continue;
        };
        let kind = button
            .value()
            .attr("value")
            .and_then(ReactionKind::parse)
            .or_else(|| {
                let emoji = selectors.reaction_emoji.first(button)?;
                emoji
                    .value()
                    .attr("alias")
                    .and_then(ReactionKind::parse)
                    .or_else(|| ReactionKind::parse(&emoji.text().collect::<String>()))
            })
            .or_else(|| ReactionKind::parse(&text));
        match kind {
            Some(kind) => *reactions.entry(kind).or_insert(0) += count,
            None => debug!(text = %normalize_ws(&text), "Skipping unknown reaction"),
        }
    }
    reactions
}
