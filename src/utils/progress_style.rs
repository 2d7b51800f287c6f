use indicatif::ProgressStyle;

const STAGE_TEMPLATE: &str = "{spinner} {wide_msg}";
const COMMENTS_TEMPLATE: &str = "{spinner} {msg:20} {wide_bar} {pos:>4}/{len:4} [{elapsed}]";

pub struct ProgressStyleTemplate;

impl ProgressStyleTemplate {
    /// Spinner with a single status line, for one pipeline stage.
    pub fn stage() -> ProgressStyle {
        ProgressStyle::with_template(STAGE_TEMPLATE).expect("stage template must be valid")
    }

    /// Bar counting analyzed comments.
    pub fn comments_bar() -> ProgressStyle {
        ProgressStyle::with_template(COMMENTS_TEMPLATE)
            .expect("comments template must be valid")
            .progress_chars("#>-")
    }
}
