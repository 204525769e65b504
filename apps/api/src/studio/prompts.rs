/// System prompt for the AI writing studio.
pub const STUDIO_SYSTEM: &str = "You are Kalamkunja's writing studio. \
    You write well-structured, search-friendly articles in clear English. \
    You never add commentary before or after the article.";

/// Studio prompt. Replace `{topic}` and `{keywords}` before sending.
pub const STUDIO_PROMPT_TEMPLATE: &str = r#"Write an SEO-optimized article about: {topic}

Target keywords: {keywords}

Output format (follow exactly):
META_TITLE: <title, at most 60 characters>
META_DESCRIPTION: <summary, at most 155 characters>

<the article in Markdown: an H1 title, an introduction, 3-5 H2 sections and a short conclusion>

Use the keywords naturally. Do not stuff them."#;

/// Shown to the model when the caller supplies no keywords.
pub const NO_KEYWORDS: &str = "choose 3-5 relevant keywords yourself";
