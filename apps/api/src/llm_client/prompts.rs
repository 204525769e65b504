// Shared prompt fragments.
// Each feature that needs AI calls defines its own prompts.rs alongside it.

/// System prompt fragment that enforces JSON-only output.
pub const JSON_ONLY_SYSTEM: &str = "You are a precise, structured assistant. \
    You MUST respond with valid JSON only. \
    Do NOT include any text outside the JSON object. \
    Do NOT use markdown code fences. \
    Do NOT include explanations or apologies.";

/// Instruction appended to prompts that rewrite user-supplied facts.
pub const FACTUAL_INSTRUCTION: &str = "\
    CRITICAL: Use only the facts provided. Do NOT invent employers, dates, \
    degrees, metrics or links. You may rephrase, reorder and tighten wording.";
