use indicatif::{MultiProgress, ProgressBar, ProgressStyle};
use std::time::Duration;

pub trait MultiProgressNew {
    fn add_with_style(&self, pb: ProgressBar, style: ProgressStyle) -> ProgressBar;

    /// A styled bar that draws nothing when `visible` is false.
    fn add_stage(&self, visible: bool, style: ProgressStyle) -> ProgressBar {
        if visible {
            self.add_with_style(ProgressBar::new_spinner(), style)
        } else {
            ProgressBar::hidden()
        }
    }
}

impl MultiProgressNew for MultiProgress {
    fn add_with_style(&self, pb: ProgressBar, style: ProgressStyle) -> ProgressBar {
        let pb = self.add(pb);
        pb.set_style(style);
        pb.enable_steady_tick(Duration::from_millis(100));
        pb
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::utils::ProgressStyleTemplate;
    use indicatif::ProgressDrawTarget;

    #[test]
    fn test_hidden_stage() {
        let multi_progress = MultiProgress::with_draw_target(ProgressDrawTarget::hidden());
        let pb = multi_progress.add_stage(false, ProgressStyleTemplate::stage());
        assert!(pb.is_hidden());
    }

    #[test]
    fn test_comments_bar_counts() {
        let multi_progress = MultiProgress::with_draw_target(ProgressDrawTarget::hidden());
        let pb = multi_progress.add_stage(true, ProgressStyleTemplate::comments_bar());
        pb.set_length(3);
        pb.inc(2);
        assert_eq!(pb.position(), 2);
        assert_eq!(pb.length(), Some(3));
    }
}
