use regex::Regex;
use scraper::{ElementRef, Html, Selector};
use std::sync::LazyLock;

/// A named field lookup with ordered fallback CSS selectors.
///
/// Candidates are tried in order and the first one that matches wins, so a
/// renamed element only breaks the field it belongs to.
#[derive(Debug)]
pub struct FieldSelector {
    name: &'static str,
    candidates: Vec<Selector>,
}

impl FieldSelector {
    pub fn new(name: &'static str, patterns: &[&str]) -> Self {
        let candidates = patterns
            .iter()
            .map(|p| Selector::parse(p).expect("field selector must be valid CSS"))
            .collect();
        Self { name, candidates }
    }

    pub fn name(&self) -> &'static str {
        self.name
    }

    pub fn first<'a>(&self, scope: ElementRef<'a>) -> Option<ElementRef<'a>> {
        self.candidates
            .iter()
            .find_map(|selector| scope.select(selector).next())
    }

    /// All matches of the first candidate that matches anything.
    pub fn all<'a>(&self, scope: ElementRef<'a>) -> Vec<ElementRef<'a>> {
        self.candidates
            .iter()
            .map(|selector| scope.select(selector).collect::<Vec<_>>())
            .find(|found| !found.is_empty())
            .unwrap_or_default()
    }

    pub fn first_in<'a>(&self, html: &'a Html) -> Option<ElementRef<'a>> {
        self.candidates
            .iter()
            .find_map(|selector| html.select(selector).next())
    }

    pub fn all_in<'a>(&self, html: &'a Html) -> Vec<ElementRef<'a>> {
        self.candidates
            .iter()
            .map(|selector| html.select(selector).collect::<Vec<_>>())
            .find(|found| !found.is_empty())
            .unwrap_or_default()
    }
}

/// Field selectors for one page layout.
#[derive(Debug)]
pub struct IssueSelectors {
    pub container: FieldSelector,
    pub author: FieldSelector,
    pub body: FieldSelector,
    pub reactions: FieldSelector,
    pub reaction_emoji: FieldSelector,
    pub timestamp: FieldSelector,
    pub badge: FieldSelector,
    pub reply_form: FieldSelector,
    pub title: FieldSelector,
    pub participation: FieldSelector,
    pub issue_structure: FieldSelector,
    pub member_label: Regex,
}

impl IssueSelectors {
    pub fn github() -> Self {
        Self {
            container: FieldSelector::new(
                "container",
                &[
                    "div.unminimized-comment",
                    "div.timeline-comment",
                    ".js-comment-container",
                ],
            ),
            author: FieldSelector::new(
                "author",
                &["a.author", ".author", r#"a[data-hovercard-type="user"]"#],
            ),
            body: FieldSelector::new(
                "body",
                &[
                    ".comment-body",
                    "td.d-block",
                    r#"textarea[name="issue[body]"]"#,
                    r#"textarea[name="issue_comment[body]"]"#,
                ],
            ),
            reactions: FieldSelector::new(
                "reactions",
                &[
                    ".has-reactions button",
                    ".comment-reactions button",
                    "button.social-reaction-summary-item",
                ],
            ),
            reaction_emoji: FieldSelector::new("reaction emoji", &["g-emoji"]),
            timestamp: FieldSelector::new(
                "timestamp",
                &["relative-time[datetime]", "time[datetime]"],
            ),
            badge: FieldSelector::new("badge", &["span[aria-label]"]),
            reply_form: FieldSelector::new(
                "reply form",
                &[r#"textarea[name="issue_comment[body]"]"#],
            ),
            title: FieldSelector::new(
                "title",
                &[".js-issue-title", r#"[data-testid="issue-title"]"#, "title"],
            ),
            participation: FieldSelector::new(
                "participation",
                &[".participation .participant-count", "div.participation > div"],
            ),
            issue_structure: FieldSelector::new(
                "issue structure",
                &[
                    "#discussion_bucket",
                    ".js-discussion",
                    ".js-issue-title",
                    r#"[data-testid="issue-viewer-container"]"#,
                ],
            ),
            member_label: Regex::new(r"^(This user is|You are) a member of the .* organization\.$")
                .expect("member label regex must be valid"),
        }
    }
}

pub static GITHUB: LazyLock<IssueSelectors> = LazyLock::new(IssueSelectors::github);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_fallback_candidate_is_used() {
        let html = Html::parse_document(
            r#"<div class="timeline-comment"><span class="author">bob</span></div>"#,
        );
        let containers = GITHUB.container.all_in(&html);
        assert_eq!(containers.len(), 1);
        let author = GITHUB.author.first(containers[0]).unwrap();
        assert_eq!(author.text().collect::<String>(), "bob");
    }

    #[test]
    fn test_first_tier_wins_over_later_tiers() {
        let html = Html::parse_document(
            r#"<div class="timeline-comment"><div class="unminimized-comment">a</div></div>
               <div class="timeline-comment"><div class="unminimized-comment">b</div></div>"#,
        );
        let containers = GITHUB.container.all_in(&html);
        assert_eq!(containers.len(), 2);
        assert!(containers
            .iter()
            .all(|c| c.value().attr("class") == Some("unminimized-comment")));
    }

    #[test]
    fn test_missing_field_is_none() {
        let html = Html::parse_document(r#"<div class="unminimized-comment"></div>"#);
        let container = GITHUB.container.first_in(&html).unwrap();
        assert!(GITHUB.author.first(container).is_none());
        assert_eq!(GITHUB.author.name(), "author");
    }

    #[test]
    fn test_member_label() {
        assert!(GITHUB
            .member_label
            .is_match("This user is a member of the rust-lang organization."));
        assert!(GITHUB
            .member_label
            .is_match("You are a member of the acme organization."));
        assert!(!GITHUB.member_label.is_match("You are the author of this issue."));
    }
}
