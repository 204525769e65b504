//! SEO metadata embedded in studio output.
//!
//! Generated articles open with `META_TITLE: ...` and `META_DESCRIPTION: ...`
//! lines. Markers are matched case-insensitively; a missing marker yields an
//! empty value.

use lazy_static::lazy_static;
use regex::Regex;
use serde::Serialize;

lazy_static! {
    static ref META_TITLE: Regex = Regex::new(r"(?i)META_TITLE:\s*(.*)").unwrap();
    static ref META_DESCRIPTION: Regex = Regex::new(r"(?i)META_DESCRIPTION:\s*(.*)").unwrap();
    static ref META_TITLE_LINE: Regex = Regex::new(r"(?i)META_TITLE:\s*.*\n?").unwrap();
    static ref META_DESCRIPTION_LINE: Regex =
        Regex::new(r"(?i)META_DESCRIPTION:\s*.*\n?").unwrap();
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ArticleMeta {
    pub meta_title: String,
    pub meta_description: String,
    pub body: String,
}

fn capture(re: &Regex, content: &str) -> String {
    re.captures(content)
        .and_then(|c| c.get(1))
        .map(|m| m.as_str().trim().to_string())
        .unwrap_or_default()
}

/// Splits studio output into its metadata and the article body.
pub fn extract_meta(content: &str) -> ArticleMeta {
    if content.is_empty() {
        return ArticleMeta {
            meta_title: String::new(),
            meta_description: String::new(),
            body: String::new(),
        };
    }

    let meta_title = capture(&META_TITLE, content);
    let meta_description = capture(&META_DESCRIPTION, content);

    // `replace` only touches the first match.
    let without_title = META_TITLE_LINE.replace(content, "");
    let body = META_DESCRIPTION_LINE
        .replace(&without_title, "")
        .trim()
        .to_string();

    ArticleMeta {
        meta_title,
        meta_description,
        body,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extract_meta_from_studio_format() {
        let content = "META_TITLE: Growing Tea in Ilam\n\
                       META_DESCRIPTION: A grower's guide to the hills.\n\
                       \n\
                       # Growing Tea\n\
                       Start with the soil.";
        let meta = extract_meta(content);
        assert_eq!(meta.meta_title, "Growing Tea in Ilam");
        assert_eq!(meta.meta_description, "A grower's guide to the hills.");
        assert_eq!(meta.body, "# Growing Tea\nStart with the soil.");
    }

    #[test]
    fn test_markers_are_case_insensitive() {
        let meta = extract_meta("meta_title:  Lower  \nMeta_Description: Mixed\nBody");
        assert_eq!(meta.meta_title, "Lower");
        assert_eq!(meta.meta_description, "Mixed");
        assert_eq!(meta.body, "Body");
    }

    #[test]
    fn test_missing_markers_give_empty_values() {
        let meta = extract_meta("Just an article.\n");
        assert_eq!(meta.meta_title, "");
        assert_eq!(meta.meta_description, "");
        assert_eq!(meta.body, "Just an article.");
    }

    #[test]
    fn test_only_first_marker_line_is_removed() {
        let meta = extract_meta("META_TITLE: One\nText\nMETA_TITLE: Two");
        assert_eq!(meta.meta_title, "One");
        assert_eq!(meta.body, "Text\nMETA_TITLE: Two");
    }

    #[test]
    fn test_empty_content() {
        let meta = extract_meta("");
        assert_eq!(meta.body, "");
        assert_eq!(meta.meta_title, "");
    }
}
