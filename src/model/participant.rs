use crate::model::reaction::{merge_reactions, Reactions};
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Eq, PartialEq, Serialize, Deserialize)]
pub struct Participant {
    pub username: String,
    pub comment_count: usize,
    pub mention_count: usize,
    pub reaction_totals: Reactions,
    #[serde(default)]
    pub is_issue_author: bool,
    #[serde(default)]
    pub is_member: bool,
}

// Create
impl Participant {
    pub fn new(username: impl ToString) -> Self {
        Self {
            username: username.to_string(),
            comment_count: 0,
            mention_count: 0,
            reaction_totals: Reactions::new(),
            is_issue_author: false,
            is_member: false,
        }
    }
}

// Update
impl Participant {
    pub fn add_reactions(&mut self, reactions: &Reactions) {
        merge_reactions(&mut self.reaction_totals, reactions);
    }

    pub fn total_reactions(&self) -> u64 {
        self.reaction_totals.values().sum()
    }
}
