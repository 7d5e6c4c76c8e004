//! Article title normalization and capitalization variants.

/// Words kept lowercase by [`title_case`] unless they open or close the title.
const SMALL_WORDS: &[&str] = &[
    "a", "an", "and", "as", "at", "but", "by", "en", "for", "if", "in", "of", "on", "or", "the",
    "to", "v", "v.", "via", "vs", "vs.",
];

/// Canonical titles use spaces, never underscores.
pub fn normalize(title: &str) -> String {
    title.replace('_', " ")
}

/// Uppercase the first character and lowercase the rest.
pub fn capitalize(title: &str) -> String {
    let mut chars = title.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars.flat_map(char::to_lowercase)).collect(),
        None => String::new(),
    }
}

/// Titles that differ only in the case of their first letter name the same
/// page.
pub fn same_title(a: &str, b: &str) -> bool {
    fn first_upper(title: &str) -> String {
        let mut chars = title.trim().chars();
        match chars.next() {
            Some(first) => first.to_uppercase().chain(chars).collect(),
            None => String::new(),
        }
    }
    first_upper(&normalize(a)) == first_upper(&normalize(b))
}

/// Naive title case: every run of letters starts uppercase, the rest of the
/// run is lowercase. "they're" becomes "They'Re".
pub fn naive_title_case(title: &str) -> String {
    let mut out = String::with_capacity(title.len());
    let mut in_word = false;
    for c in title.chars() {
        if c.is_alphabetic() {
            if in_word {
                out.extend(c.to_lowercase());
            } else {
                out.extend(c.to_uppercase());
            }
            in_word = true;
        } else {
            out.push(c);
            in_word = false;
        }
    }
    out
}

/// English title case: small words stay lowercase except in first and last
/// position, every other word is capitalized.
pub fn title_case(title: &str) -> String {
    let words: Vec<&str> = title.split(' ').collect();
    let last = words.len().saturating_sub(1);
    words
        .iter()
        .enumerate()
        .map(|(i, word)| {
            let lower = word.to_lowercase();
            if i != 0 && i != last && SMALL_WORDS.contains(&lower.as_str()) {
                lower
            } else {
                capitalize(word)
            }
        })
        .collect::<Vec<_>>()
        .join(" ")
}

/// Capitalization variants tried, in order, when a title has no article.
///
/// For "A joUrNey tO WonderLAND":
/// - capitalized: "A journey to wonderland"
/// - title case: "A Journey to Wonderland"
/// - naive title case: "A Journey To Wonderland"
/// - lowercase: "a journey to wonderland"
/// - uppercase: "A JOURNEY TO WONDERLAND"
pub fn name_variants(title: &str) -> Vec<String> {
    vec![
        capitalize(title),
        title_case(title),
        naive_title_case(title),
        title.to_lowercase(),
        title.to_uppercase(),
    ]
}

/// Shorten long paths for log output: first five, "...", last five.
pub fn abbreviate_path(path: &[String]) -> String {
    if path.len() < 10 {
        return format!("[{}]", path.join(", "));
    }
    let head = path[..5].join(", ");
    let tail = path[path.len() - 5..].join(", ");
    format!("[{}, ..., {}]", head, tail)
}
