//! Link and paragraph extraction from Wikipedia REST page HTML.

use regex::Regex;
use std::sync::OnceLock;

use super::Links;
use crate::title::normalize;

fn anchor_regex() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    CELL.get_or_init(|| Regex::new(r"(?s)<a\s([^>]*)>").expect("Invalid regex pattern"))
}

fn href_regex() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    CELL.get_or_init(|| {
        Regex::new(r#"\bhref\s*=\s*(?:"([^"]*)"|'([^']*)')"#).expect("Invalid regex pattern")
    })
}

fn class_regex() -> &'static Regex {
    static CELL: OnceLock<Regex> = OnceLock::new();
    CELL.get_or_init(|| Regex::new(r"\bclass\s*=").expect("Invalid regex pattern"))
}

/// Decode `%XX` escapes. Malformed escapes are kept verbatim.
pub fn percent_decode(input: &str) -> String {
    let bytes = input.as_bytes();
    let mut out = Vec::with_capacity(bytes.len());
    let mut i = 0;
    while i < bytes.len() {
        if bytes[i] == b'%' && i + 2 < bytes.len() {
            let decoded = std::str::from_utf8(&bytes[i + 1..i + 3])
                .ok()
                .and_then(|hex| u8::from_str_radix(hex, 16).ok());
            if let Some(b) = decoded {
                out.push(b);
                i += 3;
                continue;
            }
        }
        out.push(bytes[i]);
        i += 1;
    }
    String::from_utf8_lossy(&out).into_owned()
}

/// Replace the handful of entities that show up in article prose.
fn decode_entities(text: &str) -> String {
    text.replace("&nbsp;", " ")
        .replace("&#160;", " ")
        .replace("&quot;", "\"")
        .replace("&#39;", "'")
        .replace("&lt;", "<")
        .replace("&gt;", ">")
        .replace("&amp;", "&")
}

/// Article links of a page: anchors with a relative `./Title` href, no
/// namespace colon, and no `class` attribute (red links, external and
/// special links all carry one). Fragments are dropped and titles are
/// returned in canonical space-separated form.
pub fn extract_links(html: &str) -> Links {
    anchor_regex()
        .captures_iter(html)
        .filter_map(|cap| {
            let attrs = cap.get(1)?.as_str();
            if class_regex().is_match(attrs) {
                return None;
            }
            let href = href_regex().captures(attrs)?;
            let href = href.get(1).or_else(|| href.get(2))?.as_str();
            let target = href.strip_prefix("./")?;
            if target.contains(':') {
                return None;
            }
            let target = target.split('#').next().unwrap_or("");
            let title = normalize(&percent_decode(target));
            let title = title.trim();
            if title.is_empty() {
                None
            } else {
                Some(title.to_string())
            }
        })
        .collect()
}

/// Text of all `<p>` elements, tags stripped, joined by spaces.
pub fn extract_text(html: &str) -> String {
    static PARAGRAPH: OnceLock<Regex> = OnceLock::new();
    static TAG: OnceLock<Regex> = OnceLock::new();
    let paragraph = PARAGRAPH
        .get_or_init(|| Regex::new(r"(?s)<p\b[^>]*>(.*?)</p>").expect("Invalid regex pattern"));
    let tag = TAG.get_or_init(|| Regex::new(r"<[^>]+>").expect("Invalid regex pattern"));

    paragraph
        .captures_iter(html)
        .filter_map(|cap| cap.get(1))
        .map(|m| decode_entities(&tag.replace_all(m.as_str(), "")))
        .collect::<Vec<_>>()
        .join(" ")
}
