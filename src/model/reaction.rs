use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use std::fmt;

pub type Reactions = IndexMap<ReactionKind, u64>;

#[derive(Debug, Clone, Copy, Eq, Hash, PartialEq, Ord, PartialOrd, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ReactionKind {
    ThumbsUp,
    ThumbsDown,
    Laugh,
    Hooray,
    Confused,
    Heart,
    Rocket,
    Eyes,
}

impl ReactionKind {
    /// Parses a GitHub button value (`THUMBS_UP react`), a `g-emoji` alias (`+1`)
    /// or the glyph itself.
    pub fn parse(token: &str) -> Option<Self> {
        let token = token.split_whitespace().next()?;
        let kind = match token.to_ascii_lowercase().as_str() {
            "thumbs_up" | "+1" | "thumbsup" | "👍" => Self::ThumbsUp,
            "thumbs_down" | "-1" | "thumbsdown" | "👎" => Self::ThumbsDown,
            "laugh" | "smile" | "😄" => Self::Laugh,
            "hooray" | "tada" | "🎉" => Self::Hooray,
            "confused" | "😕" => Self::Confused,
            "heart" | "❤" | "❤️" => Self::Heart,
            "rocket" | "🚀" => Self::Rocket,
            "eyes" | "👀" => Self::Eyes,
            _ => return None,
        };
        Some(kind)
    }

    pub fn label(&self) -> &'static str {
        match self {
            Self::ThumbsUp => "THUMBS_UP",
            Self::ThumbsDown => "THUMBS_DOWN",
            Self::Laugh => "LAUGH",
            Self::Hooray => "HOORAY",
            Self::Confused => "CONFUSED",
            Self::Heart => "HEART",
            Self::Rocket => "ROCKET",
            Self::Eyes => "EYES",
        }
    }

    pub fn emoji(&self) -> &'static str {
        match self {
            Self::ThumbsUp => "👍",
            Self::ThumbsDown => "👎",
            Self::Laugh => "😄",
            Self::Hooray => "🎉",
            Self::Confused => "😕",
            Self::Heart => "❤️",
            Self::Rocket => "🚀",
            Self::Eyes => "👀",
        }
    }
}

impl fmt::Display for ReactionKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

/// Adds `from` into `into` per kind. Kinds missing from `into` start at zero.
pub fn merge_reactions(into: &mut Reactions, from: &Reactions) {
    for (kind, count) in from {
        *into.entry(*kind).or_insert(0) += count;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_button_value() {
        assert_eq!(ReactionKind::parse("THUMBS_UP react"), Some(ReactionKind::ThumbsUp));
        assert_eq!(ReactionKind::parse("HOORAY unreact"), Some(ReactionKind::Hooray));
    }

    #[test]
    fn test_parse_alias_and_glyph() {
        assert_eq!(ReactionKind::parse("+1"), Some(ReactionKind::ThumbsUp));
        assert_eq!(ReactionKind::parse("tada"), Some(ReactionKind::Hooray));
        assert_eq!(ReactionKind::parse("🚀"), Some(ReactionKind::Rocket));
        assert_eq!(ReactionKind::parse("sparkles"), None);
        assert_eq!(ReactionKind::parse(""), None);
    }

    #[test]
    fn test_merge_reactions() {
        let mut totals = Reactions::new();
        totals.insert(ReactionKind::Heart, 2);
        let mut other = Reactions::new();
        other.insert(ReactionKind::Heart, 1);
        other.insert(ReactionKind::Eyes, 4);

        merge_reactions(&mut totals, &other);

        assert_eq!(totals[&ReactionKind::Heart], 3);
        assert_eq!(totals[&ReactionKind::Eyes], 4);
    }

    #[test]
    fn test_serializes_as_snake_case() {
        let json = serde_json::to_string(&ReactionKind::ThumbsUp).unwrap();
        assert_eq!(json, "\"thumbs_up\"");
    }
}
