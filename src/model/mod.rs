mod comment;
mod config;
mod participant;
mod reaction;
mod summary;

pub use comment::{Comment, CommentKind};
pub use config::Config;
pub use participant::Participant;
pub use reaction::{merge_reactions, ReactionKind, Reactions};
pub use summary::{IssueSummary, KeyPhrasesByComment, Participants, SentimentByComment};
