use scraper::{ElementRef, Node};

const HIDDEN_ELEMENTS: &[&str] = &["script", "style", "template", "noscript"];
const BLOCK_ELEMENTS: &[&str] = &[
    "p", "div", "br", "li", "ul", "ol", "tr", "td", "th", "pre", "blockquote", "h1", "h2", "h3",
    "h4", "h5", "h6", "hr", "table", "details", "summary",
];

/// Visible text of `element`: markup stripped, script/style content dropped,
/// block boundaries turned into spaces, whitespace collapsed.
pub fn visible_text(element: ElementRef<'_>) -> String {
    let mut out = String::new();
    for node in element.descendants() {
        match node.value() {
            Node::Element(el) if BLOCK_ELEMENTS.contains(&el.name()) => out.push(' '),
            Node::Text(text) => {
                let hidden = node
                    .ancestors()
                    .filter_map(ElementRef::wrap)
                    .any(|a| HIDDEN_ELEMENTS.contains(&a.value().name()));
                if !hidden {
                    out.push_str(text);
                }
            }
            _ => {}
        }
    }
    normalize_ws(&out)
}

/// Collapse sequences of whitespace into a single space and trim.
pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space {
                out.push(' ');
                prev_space = true;
            }
        } else {
            out.push(ch);
            prev_space = false;
        }
    }
    out.trim().to_string()
}

/// Digits of `s` parsed as a count, ignoring everything else (`"👍 12"` → 12).
pub fn digits(s: &str) -> Option<u64> {
    let digits = s.chars().filter(char::is_ascii_digit).collect::<String>();
    digits.parse().ok()
}

#[cfg(test)]
mod tests {
    use super::*;
    use scraper::{Html, Selector};

    fn body(html: &str) -> String {
        let doc = Html::parse_fragment(html);
        let sel = Selector::parse("div.body").unwrap();
        visible_text(doc.select(&sel).next().unwrap())
    }

    #[test]
    fn test_strips_markup_and_scripts() {
        let text = body(
            r#"<div class="body"><p>Hello <b>there</b></p><script>var x = 1;</script><style>p{}</style><p>thanks <a class="user-mention" href="/alice">@alice</a> 🎉</p></div>"#,
        );
        assert_eq!(text, "Hello there thanks @alice 🎉");
    }

    #[test]
    fn test_block_boundaries_keep_tokens_apart() {
        let text = body(r#"<div class="body"><p>see</p><p>@bob</p></div>"#);
        assert_eq!(text, "see @bob");
    }

    #[test]
    fn test_normalize_ws() {
        assert_eq!(normalize_ws("  a \n\t b  "), "a b");
        assert_eq!(normalize_ws(""), "");
    }

    #[test]
    fn test_digits() {
        assert_eq!(digits("👍 12"), Some(12));
        assert_eq!(digits("\n  3\n"), Some(3));
        assert_eq!(digits("React"), None);
    }
}
