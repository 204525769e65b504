use lazy_static::lazy_static;
use regex::Regex;

lazy_static! {
    static ref DISALLOWED: Regex = Regex::new(r"[^a-z0-9\s-]").unwrap();
    static ref WHITESPACE: Regex = Regex::new(r"\s+").unwrap();
    static ref DASH_RUNS: Regex = Regex::new(r"-+").unwrap();
}

/// Derives a URL slug: lowercase, drop anything outside `[a-z0-9\s-]`,
/// whitespace runs become `-`, dash runs collapse to one.
pub fn slugify(text: &str) -> String {
    let lower = text.trim().to_lowercase();
    let cleaned = DISALLOWED.replace_all(&lower, "");
    let dashed = WHITESPACE.replace_all(cleaned.trim(), "-");
    DASH_RUNS
        .replace_all(&dashed, "-")
        .trim_matches('-')
        .to_string()
}
