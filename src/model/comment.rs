use crate::model::reaction::Reactions;
use chrono::{DateTime, FixedOffset};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, Eq, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CommentKind {
    IssueBody,
    Comment,
}

/// One normalized issue comment, or the issue body itself.
///
/// `index` is the comment's position in extraction order and serves as its
/// identity when analytics results come back.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Comment {
    pub index: usize,
    pub kind: CommentKind,
    pub author: String,
    pub body_text: String,
    pub mentions: Vec<String>,
    pub reactions: Reactions,
    pub timestamp: Option<DateTime<FixedOffset>>,
}

impl Comment {
    pub fn is_issue_body(&self) -> bool {
        self.kind == CommentKind::IssueBody
    }

    /// Number of times `username` is mentioned in this comment.
    pub fn mentions_of(&self, username: &str) -> usize {
        self.mentions.iter().filter(|m| *m == username).count()
    }
}
