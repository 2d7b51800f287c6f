mod mention;
mod registry;

pub use mention::scan_mentions;
pub use registry::Registry;

use crate::extract::RawComment;
use crate::model::{Comment, CommentKind};
use tracing::debug;

/// Turns raw nodes into `Comment`s, registering every author and mention
/// target in first-appearance order.
#[derive(Debug, Default)]
pub struct Normalizer {
    registry: Registry,
    exclude_self_mentions: bool,
    next_index: usize,
}

impl Normalizer {
    pub fn new(exclude_self_mentions: bool) -> Self {
        Self {
            exclude_self_mentions,
            ..Default::default()
        }
    }

    pub fn normalize(&mut self, raw: RawComment) -> Comment {
        let author = self.registry.resolve(&raw.author);
        if raw.is_member {
            author.is_member = true;
        }
        if raw.kind == CommentKind::IssueBody {
            author.is_issue_author = true;
        }

        let mut mentions = scan_mentions(&raw.body_text);
        if self.exclude_self_mentions {
            mentions.retain(|m| *m != raw.author);
        }
        for mention in &mentions {
            self.registry.resolve(mention);
        }

        let index = self.next_index;
        self.next_index += 1;
        debug!(
            index,
            author = %raw.author,
            mentions = mentions.len(),
            "Normalized comment"
        );

        Comment {
            index,
            kind: raw.kind,
            author: raw.author,
            body_text: raw.body_text,
            mentions,
            reactions: raw.reactions,
            timestamp: raw.timestamp,
        }
    }

    pub fn registry(&self) -> &Registry {
        &self.registry
    }

    pub fn finish(self) -> Registry {
        self.registry
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::Reactions;

    fn raw(kind: CommentKind, author: &str, body: &str) -> RawComment {
        RawComment {
            position: 0,
            kind,
            author: author.to_string(),
            body_text: body.to_string(),
            reactions: Reactions::new(),
            timestamp: None,
            is_member: false,
        }
    }

    #[test]
    fn test_mentions_register_participants_in_order() {
        let mut normalizer = Normalizer::new(false);
        normalizer.normalize(raw(CommentKind::IssueBody, "alice", "cc @carol"));
        let comment = normalizer.normalize(raw(CommentKind::Comment, "bob", "@dave and @alice"));

        assert_eq!(comment.index, 1);
        assert_eq!(comment.mentions, vec!["dave", "alice"]);
        let names = normalizer
            .finish()
            .into_participants()
            .keys()
            .cloned()
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["alice", "carol", "bob", "dave"]);
    }

    #[test]
    fn test_self_mentions_kept_by_default() {
        let mut normalizer = Normalizer::new(false);
        let comment = normalizer.normalize(raw(CommentKind::Comment, "bob", "as @bob said"));
        assert_eq!(comment.mentions, vec!["bob"]);
    }

    #[test]
    fn test_self_mentions_can_be_excluded() {
        let mut normalizer = Normalizer::new(true);
        let comment =
            normalizer.normalize(raw(CommentKind::Comment, "bob", "as @bob told @amy"));
        assert_eq!(comment.mentions, vec!["amy"]);
    }

    #[test]
    fn test_flags_recorded_on_author() {
        let mut normalizer = Normalizer::new(false);
        let mut body = raw(CommentKind::IssueBody, "alice", "");
        body.is_member = true;
        normalizer.normalize(body);
        normalizer.normalize(raw(CommentKind::Comment, "bob", ""));

        let alice = normalizer.registry().get("alice").unwrap();
        assert!(alice.is_issue_author);
        assert!(alice.is_member);
        let bob = normalizer.registry().get("bob").unwrap();
        assert!(!bob.is_issue_author);
        assert!(!bob.is_member);
    }

    #[test]
    fn test_empty_body_has_no_mentions() {
        let mut normalizer = Normalizer::new(false);
        let comment = normalizer.normalize(raw(CommentKind::Comment, "bob", ""));
        assert!(comment.mentions.is_empty());
    }
}
