// Prompts for the resume builder.
// Generation and enhancement reply with JSON; chat replies with prose.

/// Resume JSON schema shared by generation and enhancement.
pub const RESUME_SCHEMA: &str = r#"{
  "name": "", "title": "", "email": "", "phone": "", "address": "",
  "links": [""], "specialization": "", "skills": [""],
  "summary": "2-3 sentence professional summary",
  "experiences": [
    {"title": "", "company": "", "startDate": "", "endDate": "", "location": "", "bullets": [""]}
  ],
  "education": [
    {"degree": "", "institution": "", "startDate": "", "endDate": "", "notes": ""}
  ],
  "projects": [
    {"name": "", "link": "", "summary": "", "tech": [""]}
  ],
  "certifications": [""], "hobbies": [""]
}"#;

/// Generation prompt. Replace `{user_data}`, `{schema}` and `{factual}` before sending.
pub const GENERATE_PROMPT_TEMPLATE: &str = r#"Turn the following candidate details into a polished, ATS-friendly resume.

Candidate details (JSON):
{user_data}

Write a short professional summary. Tighten every experience bullet to start
with a strong action verb. Keep dates, names and links exactly as given.

{factual}

Return a JSON object with this EXACT schema:
{schema}"#;

/// Enhancement prompt. Replace `{resume_json}`, `{request}`, `{schema}` and `{factual}`.
pub const ENHANCE_PROMPT_TEMPLATE: &str = r#"Revise this resume according to the user's request.

Current resume (JSON):
{resume_json}

User request:
{request}

Change only what the request asks for.

{factual}

Return the complete revised resume as a JSON object with this EXACT schema:
{schema}"#;

/// System prompt for resume chat.
pub const CHAT_SYSTEM: &str = "You are Kalamkunja's resume coach. \
    You answer questions about the user's resume with specific, practical advice. \
    Keep answers under 150 words. Respond in plain text.";

/// Chat prompt. Replace `{resume_json}` and `{message}` before sending.
pub const CHAT_PROMPT_TEMPLATE: &str = r#"Here is my resume (JSON):
{resume_json}

{message}"#;
