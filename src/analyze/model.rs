use crate::model::{Comment, CommentKind};
use crate::normalize::Registry;

/// Everything the aggregator needs: the registry built during normalization,
/// the materialized comments and the issue-body policy.
#[derive(Debug, Clone)]
pub struct IssueAnalysis {
    pub title: Option<String>,
    pub participation: Option<String>,
    pub registry: Registry,
    pub comments: Vec<Comment>,
    pub warnings: Vec<String>,
    pub count_issue_body: bool,
}

impl IssueAnalysis {
    pub fn new(registry: Registry, count_issue_body: bool) -> Self {
        Self {
            title: None,
            participation: None,
            registry,
            comments: vec![],
            warnings: vec![],
            count_issue_body,
        }
    }

    pub fn insert_comments(&mut self, comments: Vec<Comment>) {
        self.comments.extend(comments);
    }

    pub fn insert_warnings(&mut self, warnings: Vec<String>) {
        self.warnings.extend(warnings);
    }

    /// Whether `comment` adds to `total_comments` and its author's `comment_count`.
    pub fn is_counted(&self, comment: &Comment) -> bool {
        match comment.kind {
            CommentKind::Comment => true,
            CommentKind::IssueBody => self.count_issue_body,
        }
    }
}
