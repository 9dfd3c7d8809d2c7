// src/core/sanitize.rs
use std::collections::HashMap;

pub fn normalize_ws(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut prev_space = false;
    for ch in s.chars() {
        if ch.is_whitespace() {
            if !prev_space { out.push(' '); prev_space = true; }
        } else { out.push(ch); prev_space = false; }
    }
    out.trim().to_string()
}

/// The site lists alternative common names as `A | B`; the API wants `A, B`.
pub fn join_common_names(s: &str) -> String {
    normalize_ws(s)
        .split('|')
        .map(str::trim)
        .filter(|part| !part.is_empty())
        .collect::<Vec<_>>()
        .join(", ")
}

/// Lowercase ASCII slug: alphanumerics kept, every other run becomes one `-`.
/// `"Labroides dimidiatus"` → `"labroides-dimidiatus"`, `"North America"` → `"north-america"`.
pub fn slugify(s: &str) -> String {
    let mut out = String::with_capacity(s.len());
    let mut last_dash = true; // suppress leading dash
    for ch in s.chars() {
        if ch.is_ascii_alphanumeric() {
            out.push(ch.to_ascii_lowercase());
            last_dash = false;
        } else if !last_dash {
            out.push('-');
            last_dash = true;
        }
    }
    let out = out.trim_end_matches('-').to_string();
    if out.is_empty() { s!("unnamed") } else { out }
}

/// Duplicate handling **only within this run**: first use of a stem keeps it,
/// later uses get `-2`, `-3`, …
pub fn unique_slug(stem: &str, seen: &mut HashMap<String, usize>) -> String {
    let count = seen.entry(stem.to_string()).or_insert(0);
    *count += 1;
    if *count == 1 { stem.to_string() } else { format!("{stem}-{}", *count) }
}

/// Last non-empty path segment of a URL, ignoring query and fragment.
/// `https://x.com/species/fish2/` → `fish2`.
pub fn last_path_segment(url: &str) -> String {
    let path = url.split(['?', '#']).next().unwrap_or("");
    path.trim_end_matches('/')
        .rsplit('/')
        .next()
        .unwrap_or("")
        .to_string()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn common_names_are_comma_joined() {
        assert_eq!(join_common_names("Cleaner wrasse | Blue Diesel Wrasse"), "Cleaner wrasse, Blue Diesel Wrasse");
        assert_eq!(join_common_names("  Single  name "), "Single name");
        assert_eq!(join_common_names(""), "");
    }

    #[test]
    fn slugify_collapses_punctuation() {
        assert_eq!(slugify("Labroides dimidiatus"), "labroides-dimidiatus");
        assert_eq!(slugify("Trachinops sp. [blue]"), "trachinops-sp-blue");
        assert_eq!(slugify("  North America "), "north-america");
        assert_eq!(slugify("???"), "unnamed");
    }

    #[test]
    fn unique_slug_numbers_repeats() {
        let mut seen = HashMap::new();
        assert_eq!(unique_slug("a", &mut seen), "a");
        assert_eq!(unique_slug("a", &mut seen), "a-2");
        assert_eq!(unique_slug("b", &mut seen), "b");
        assert_eq!(unique_slug("a", &mut seen), "a-3");
    }

    #[test]
    fn last_segment_ignores_trailing_slash_and_query() {
        assert_eq!(last_path_segment("https://reeflifesurvey.com/species/labroides-dimidiatus/"), "labroides-dimidiatus");
        assert_eq!(last_path_segment("https://reeflifesurvey.com/species/fish2"), "fish2");
        assert_eq!(last_path_segment("https://x.com/species/fish3/?tab=1#top"), "fish3");
    }
}
