use regex::Regex;
use std::sync::LazyLock;

static MENTION: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"@([A-Za-z0-9][A-Za-z0-9-]*)").expect("mention regex must be valid")
});

fn is_boundary(ch: Option<char>) -> bool {
    match ch {
        None => true,
        Some(c) => !(c.is_alphanumeric() || c == '_'),
    }
}

/// `@username` tokens of `text`, left to right, duplicates kept.
///
/// A token must start the text or follow a non-word character, and must end
/// the text or be followed by one. Trailing hyphens are not part of a username.
/// `_` counts as a word character, as in GitHub's own linking, so `@alice_`
/// and `_@alice` are not mentions.
pub fn scan_mentions(text: &str) -> Vec<String> {
    let mut mentions = Vec::new();
    for caps in MENTION.captures_iter(text) {
        let (Some(whole), Some(name)) = (caps.get(0), caps.get(1)) else {
            continue;
        };
        let before = text[..whole.start()].chars().next_back();
        if !is_boundary(before) {
            continue;
        }
        let username = name.as_str().trim_end_matches('-');
        let end = name.start() + username.len();
        let after = text[end..].chars().next();
        if !is_boundary(after) {
            continue;
        }
        mentions.push(username.to_string());
    }
    mentions
}
