use crate::model::{Participant, Participants};

/// Run-scoped username → participant map. Iteration follows first appearance.
#[derive(Debug, Clone, Default)]
pub struct Registry {
    participants: Participants,
}

impl Registry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Looks `username` up, creating a zero-count entry on first sight.
    pub fn resolve(&mut self, username: &str) -> &mut Participant {
        self.participants
            .entry(username.to_string())
            .or_insert_with(|| Participant::new(username))
    }

    pub fn get(&self, username: &str) -> Option<&Participant> {
        self.participants.get(username)
    }

    pub fn len(&self) -> usize {
        self.participants.len()
    }


    pub fn into_participants(self) -> Participants {
        self.participants
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_first_appearance_order() {
        let mut registry = Registry::new();
        registry.resolve("zoe");
        registry.resolve("adam");
        registry.resolve("zoe");
        registry.resolve("mia");

        let names = registry
            .into_participants()
            .keys()
            .cloned()
            .collect::<Vec<_>>();
        assert_eq!(names, vec!["zoe", "adam", "mia"]);
    }

    #[test]
    fn test_usernames_are_case_sensitive() {
        let mut registry = Registry::new();
        registry.resolve("Alice");
        registry.resolve("alice");
        assert_eq!(registry.len(), 2);
        assert!(registry.get("ALICE").is_none());
    }

    #[test]
    fn test_resolve_creates_zero_counts() {
        let mut registry = Registry::new();
        let participant = registry.resolve("ghost");
        assert_eq!(participant.comment_count, 0);
        assert_eq!(participant.mention_count, 0);
        assert!(participant.reaction_totals.is_empty());
    }
}
