/// System prompt for the article summarizer.
pub const SUMMARY_SYSTEM: &str = "You are Kalamkunja's reading assistant. \
    You write short, plain-language summaries of articles for general readers. \
    Respond with the summary text only, no headings or preamble.";

/// Summary prompt. Replace `{title}` and `{content}` before sending.
pub const SUMMARY_PROMPT_TEMPLATE: &str = r#"Summarize the following article in 4-6 simple sentences.
Keep the author's key points and conclusions; skip examples and asides.

Title: {title}

Article:
{content}"#;

/// Longest article body (in characters) forwarded to the summarizer.
pub const MAX_SUMMARY_INPUT_CHARS: usize = 20_000;
