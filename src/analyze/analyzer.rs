use crate::analyze::IssueAnalysis;
use crate::model::{Comment, IssueSummary, Participant, Participants};

pub trait Aggregator {
    fn aggregate(&self) -> IssueSummary;
}

impl Aggregator for IssueAnalysis {
    fn aggregate(&self) -> IssueSummary {
        let mut participants = self.registry.clone().into_participants();
        let mut total_comments = 0;
        for comment in &self.comments {
            let counted = self.is_counted(comment);
            if counted {
                total_comments += 1;
            }
            participants.analyze_comment(comment, counted);
        }

        IssueSummary {
            title: self.title.clone(),
            participation: self.participation.clone(),
            participants,
            total_comments,
            comments: self.comments.clone(),
            sentiment_by_comment: None,
            key_phrases: None,
            warnings: self.warnings.clone(),
        }
    }
}

trait ParticipantsAnalyzer {
    fn analyze_comment(&mut self, comment: &Comment, counted: bool);
}

impl ParticipantsAnalyzer for Participants {
    fn analyze_comment(&mut self, comment: &Comment, counted: bool) {
        let author = self
            .entry(comment.author.clone())
            .or_insert_with(|| Participant::new(&comment.author));
        if counted {
            author.comment_count += 1;
        }
        author.add_reactions(&comment.reactions);

        for mention in &comment.mentions {
            self.entry(mention.clone())
                .or_insert_with(|| Participant::new(mention))
                .mention_count += 1;
        }
    }
}
