//! Wikitext helpers (regex-based): links, redirects and plain text.

use regex::Regex;
use std::collections::BTreeSet;
use std::sync::OnceLock;

use crate::title::normalize;

fn regex(cell: &'static OnceLock<Regex>, pattern: &str) -> &'static Regex {
    cell.get_or_init(|| Regex::new(pattern).expect("Invalid regex pattern"))
}

fn link_regex() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    regex(&CELL, r"\[\[([^\[\]]*)\]\]")
}

/// Target of a wikilink body (`Target#Section|label`), or None when empty.
pub fn link_target(body: &str) -> Option<String> {
    let target = body.split('|').next().unwrap_or("");
    let target = target.split('#').next().unwrap_or("").trim();
    if target.is_empty() {
        None
    } else {
        Some(normalize(target))
    }
}

/// Deduplicated wikilink targets, fragments stripped. Links whose target is
/// empty (e.g. `[[#History]]`) are excluded.
pub fn link_targets(wikitext: &str) -> BTreeSet<String> {
    link_regex()
        .captures_iter(wikitext)
        .filter_map(|cap| cap.get(1).and_then(|m| link_target(m.as_str())))
        .collect()
}

/// A page is a redirect if its wikitext contains `#REDIRECT` in any case.
pub fn is_redirect(wikitext: &str) -> bool {
    wikitext.to_lowercase().contains("#redirect")
}

/// Target of a redirect page: the first wikilink on the page.
pub fn redirect_target(wikitext: &str) -> Option<String> {
    link_regex()
        .captures_iter(wikitext)
        .find_map(|cap| cap.get(1).and_then(|m| link_target(m.as_str())))
}

/// Reduce wikitext to readable plain text.
///
/// Templates, references, comments and HTML tags are removed; links are
/// replaced by their label; headings keep their text. Paragraph breaks
/// survive as a single blank line.
pub fn strip_code(wikitext: &str) -> String {
    static COMMENT: OnceLock<Regex> = OnceLock::new();
    static REF_EMPTY: OnceLock<Regex> = OnceLock::new();
    static REF: OnceLock<Regex> = OnceLock::new();
    static TEMPLATE: OnceLock<Regex> = OnceLock::new();
    static EXTERNAL: OnceLock<Regex> = OnceLock::new();
    static TAG: OnceLock<Regex> = OnceLock::new();
    static HEADING: OnceLock<Regex> = OnceLock::new();
    static EMPHASIS: OnceLock<Regex> = OnceLock::new();

    let mut text = regex(&COMMENT, r"(?s)<!--.*?-->")
        .replace_all(wikitext, "")
        .into_owned();
    text = regex(&REF_EMPTY, r"<ref\b[^>]*/>")
        .replace_all(&text, "")
        .into_owned();
    text = regex(&REF, r"(?s)<ref\b[^>]*>.*?</ref>")
        .replace_all(&text, "")
        .into_owned();

    // innermost templates first until nothing nested remains
    let template = regex(&TEMPLATE, r"\{\{[^{}]*\}\}");
    while template.is_match(&text) {
        text = template.replace_all(&text, "").into_owned();
    }

    text = link_regex()
        .replace_all(&text, |cap: &regex::Captures| {
            let body = &cap[1];
            match body.rsplit_once('|') {
                Some((_, label)) => label.to_string(),
                None => body.to_string(),
            }
        })
        .into_owned();
    text = regex(&EXTERNAL, r"\[(?:https?:)?//[^\s\]]+\s*([^\]]*)\]")
        .replace_all(&text, "$1")
        .into_owned();
    text = regex(&TAG, r"<[^>]+>").replace_all(&text, "").into_owned();
    text = regex(&HEADING, r"(?m)^=+\s*(.*?)\s*=+\s*$")
        .replace_all(&text, "$1")
        .into_owned();
    text = regex(&EMPHASIS, r"'{2,}").replace_all(&text, "").into_owned();

    let mut out = String::with_capacity(text.len());
    let mut paragraph_break = false;
    for line in text.lines().map(str::trim) {
        if line.is_empty() {
            paragraph_break = !out.is_empty();
            continue;
        }
        if !out.is_empty() {
            out.push('\n');
            if paragraph_break {
                out.push('\n');
            }
        }
        out.push_str(line);
        paragraph_break = false;
    }
    out
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_link_targets_dedup_and_fragments() {
        let text = "See [[Bat]], [[Bat|bats]], [[Bat#Diet|diet]] and [[Fruit_bat]].";
        let links = link_targets(text);
        let links: Vec<&str> = links.iter().map(String::as_str).collect();
        assert_eq!(links, vec!["Bat", "Fruit bat"]);
    }

    #[test]
    fn test_link_targets_exclude_empty() {
        let links = link_targets("[[#History|history]] [[ ]] [[Mammal]]");
        assert_eq!(links.len(), 1);
        assert!(links.contains("Mammal"));
    }

    #[test]
    fn test_redirect_detection() {
        assert!(is_redirect("#REDIRECT [[Bat]]"));
        assert!(is_redirect("#Redirect [[Bat]]"));
        assert!(!is_redirect("Bats are mammals. [[Mammal]]"));
    }

    #[test]
    fn test_redirect_target_first_link() {
        assert_eq!(
            redirect_target("#REDIRECT [[Bat#Evolution]] [[Other]]"),
            Some("Bat".to_string())
        );
        assert_eq!(redirect_target("#REDIRECT nowhere"), None);
    }

    #[test]
    fn test_strip_code() {
        let text = "{{Infobox|name={{nested}}}}'''Bats''' are [[mammal]]s of the order \
                    [[Chiroptera|Chiroptera]].<ref>Source</ref>\n\n== Diet ==\nMost eat \
                    [https://example.org insects].<!-- hidden -->";
        let plain = strip_code(text);
        assert_eq!(
            plain,
            "Bats are mammals of the order Chiroptera.\n\nDiet\nMost eat insects."
        );
    }
}
