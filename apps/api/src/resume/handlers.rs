//! POST /api/v1/ai/resume: generate, enhance and chat actions.

use axum::extract::State;
use serde::{Deserialize, Serialize};
use tracing::info;

use crate::envelope::Envelope;
use crate::errors::AppError;
use crate::extract::Json;
use crate::llm_client::prompts::{FACTUAL_INSTRUCTION, JSON_ONLY_SYSTEM};
use crate::llm_client::{complete_json, TextGenerator};
use crate::resume::form::{ResumeForm, ResumeUserData};
use crate::resume::prompts::{
    CHAT_PROMPT_TEMPLATE, CHAT_SYSTEM, ENHANCE_PROMPT_TEMPLATE, GENERATE_PROMPT_TEMPLATE,
    RESUME_SCHEMA,
};
use crate::resume::render::{render, ResumeDocument};
use crate::state::AppState;

// ────────────────────────────────────────────────────────────────────────────
// Request / Response types
// ────────────────────────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
#[serde(tag = "action", rename_all = "lowercase")]
pub enum ResumeRequest {
    Generate {
        #[serde(default)]
        form: Option<ResumeForm>,
        #[serde(default, rename = "userData")]
        user_data: Option<ResumeUserData>,
    },
    Enhance {
        #[serde(default, rename = "resumeJson")]
        resume_json: Option<ResumeDocument>,
        #[serde(default, rename = "enhancementPrompt")]
        enhancement_prompt: Option<String>,
    },
    Chat {
        #[serde(default, rename = "resumeJson")]
        resume_json: Option<ResumeDocument>,
        #[serde(default)]
        message: Option<String>,
    },
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RenderedResume {
    pub resume_json: ResumeDocument,
    pub html: String,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ChatReply {
    pub ai_message: String,
}

#[derive(Debug, Serialize)]
#[serde(untagged)]
pub enum ResumeResponse {
    Rendered(RenderedResume),
    Chat(ChatReply),
}

// ────────────────────────────────────────────────────────────────────────────
// Handler
// ────────────────────────────────────────────────────────────────────────────

/// POST /api/v1/ai/resume
pub async fn handle_resume(
    State(state): State<AppState>,
    Json(request): Json<ResumeRequest>,
) -> Result<Envelope<ResumeResponse>, AppError> {
    let ai = state.ai.as_ref();
    match request {
        ResumeRequest::Generate { form, user_data } => {
            let user_data = resolve_user_data(form, user_data)?;
            let rendered = generate(ai, &user_data).await?;
            info!("Generated resume for '{}'", user_data.name);
            Ok(Envelope::ok(ResumeResponse::Rendered(rendered))
                .with_message("Resume generated successfully"))
        }
        ResumeRequest::Enhance {
            resume_json,
            enhancement_prompt,
        } => {
            let resume = resume_json.ok_or_else(|| missing("resumeJson"))?;
            let request = non_blank(enhancement_prompt).ok_or_else(|| missing("enhancementPrompt"))?;
            let rendered = enhance(ai, &resume, &request).await?;
            Ok(Envelope::ok(ResumeResponse::Rendered(rendered))
                .with_message("Resume enhanced successfully"))
        }
        ResumeRequest::Chat {
            resume_json,
            message,
        } => {
            let resume = resume_json.ok_or_else(|| missing("resumeJson"))?;
            let message = non_blank(message).ok_or_else(|| missing("message"))?;
            let reply = chat(ai, &resume, &message).await?;
            Ok(Envelope::ok(ResumeResponse::Chat(reply)))
        }
    }
}

fn missing(field: &str) -> AppError {
    AppError::Validation(format!("{field} is required"))
}

fn non_blank(value: Option<String>) -> Option<String> {
    value.filter(|v| !v.trim().is_empty())
}

/// The delimited form is validated and parsed; typed `userData` only needs
/// its required fields. Form input wins when both are sent.
fn resolve_user_data(
    form: Option<ResumeForm>,
    user_data: Option<ResumeUserData>,
) -> Result<ResumeUserData, AppError> {
    let (errors, data) = match (form, user_data) {
        (Some(form), _) => (form.validate(), form.build_user_data()),
        (None, Some(data)) => (data.validate(), data),
        (None, None) => return Err(missing("form or userData")),
    };
    if errors.is_empty() {
        Ok(data)
    } else {
        Err(AppError::InvalidForm(errors))
    }
}

// ────────────────────────────────────────────────────────────────────────────
// AI actions
// ────────────────────────────────────────────────────────────────────────────

fn to_json<T: Serialize>(value: &T) -> Result<String, AppError> {
    serde_json::to_string_pretty(value).map_err(|e| AppError::Internal(e.into()))
}

async fn generate(
    ai: &dyn TextGenerator,
    user_data: &ResumeUserData,
) -> Result<RenderedResume, AppError> {
    let prompt = GENERATE_PROMPT_TEMPLATE
        .replace("{user_data}", &to_json(user_data)?)
        .replace("{schema}", RESUME_SCHEMA)
        .replace("{factual}", FACTUAL_INSTRUCTION);

    let mut resume: ResumeDocument = complete_json(ai, &prompt, JSON_ONLY_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Resume generation failed: {e}")))?;
    let html = render(&mut resume);
    Ok(RenderedResume {
        resume_json: resume,
        html,
    })
}

async fn enhance(
    ai: &dyn TextGenerator,
    resume: &ResumeDocument,
    request: &str,
) -> Result<RenderedResume, AppError> {
    let prompt = ENHANCE_PROMPT_TEMPLATE
        .replace("{resume_json}", &to_json(&resume.without_text())?)
        .replace("{request}", request.trim())
        .replace("{schema}", RESUME_SCHEMA)
        .replace("{factual}", FACTUAL_INSTRUCTION);

    let mut revised: ResumeDocument = complete_json(ai, &prompt, JSON_ONLY_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Resume enhancement failed: {e}")))?;
    let html = render(&mut revised);
    Ok(RenderedResume {
        resume_json: revised,
        html,
    })
}

async fn chat(
    ai: &dyn TextGenerator,
    resume: &ResumeDocument,
    message: &str,
) -> Result<ChatReply, AppError> {
    let prompt = CHAT_PROMPT_TEMPLATE
        .replace("{resume_json}", &to_json(&resume.without_text())?)
        .replace("{message}", message.trim());

    let reply = ai
        .complete(&prompt, CHAT_SYSTEM)
        .await
        .map_err(|e| AppError::Llm(format!("Resume chat failed: {e}")))?;
    Ok(ChatReply {
        ai_message: reply.trim().to_string(),
    })
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use axum::http::{Method, StatusCode};
    use serde_json::{json, Value};

    use crate::llm_client::CannedGenerator;
    use crate::store::memory::MemoryStore;
    use crate::test_support::{send, state, state_with};

    fn form() -> Value {
        json!({
            "name": "Asha Rai",
            "title": "Software Developer",
            "email": "asha@example.com",
            "specialization": "Backend",
            "skills": "Rust, SQL",
            "experiences": "Developer | Kalamkunja | 2025-01-2025-01 | Kathmandu | Built X;Improved Y"
        })
    }

    fn polished() -> String {
        json!({
            "name": "Asha Rai",
            "title": "Software Developer",
            "skills": ["Rust", "SQL"],
            "summary": "Backend developer.",
            "experiences": [{
                "title": "Developer", "company": "Kalamkunja",
                "startDate": "2025", "endDate": "01-2025-01",
                "location": "Kathmandu", "bullets": ["Built X", "Improved Y"]
            }]
        })
        .to_string()
    }

    async fn post(ai: Arc<CannedGenerator>, body: Value) -> (StatusCode, Value) {
        let store = Arc::new(MemoryStore::new());
        send(
            state_with(store, ai),
            Method::POST,
            "/api/v1/ai/resume",
            None,
            Some(body),
        )
        .await
    }

    #[tokio::test]
    async fn test_generate_from_form_renders_html_and_text() {
        let ai = Arc::new(CannedGenerator::replying(polished()));
        let (status, body) = post(ai.clone(), json!({"action": "generate", "form": form()})).await;

        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["resumeJson"]["summary"], "Backend developer.");
        assert!(body["resumeJson"]["text"].as_str().unwrap().contains("SUMMARY"));
        assert!(body["html"].as_str().unwrap().contains("<h1>Asha Rai</h1>"));

        // The parsed form (with its date split) is what the AI sees.
        let prompt = ai.prompts.lock().unwrap()[0].clone();
        assert!(prompt.contains("\"endDate\": \"01-2025-01\""));
    }

    #[tokio::test]
    async fn test_generate_invalid_form_returns_errors_map() {
        let ai = Arc::new(CannedGenerator::replying(polished()));
        let (status, body) = post(
            ai.clone(),
            json!({"action": "generate", "form": {"email": "bad"}}),
        )
        .await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["errors"]["name"], "Full name is required");
        assert_eq!(body["errors"]["email"], "Invalid email format");
        assert!(ai.prompts.lock().unwrap().is_empty());
    }

    #[tokio::test]
    async fn test_generate_from_user_data() {
        let ai = Arc::new(CannedGenerator::replying(polished()));
        let (status, body) = post(
            ai,
            json!({"action": "generate", "userData": {"name": "Asha Rai", "title": "Dev"}}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["resumeJson"]["experiences"][0]["company"], "Kalamkunja");
    }

    #[tokio::test]
    async fn test_generate_without_input_is_400() {
        let ai = Arc::new(CannedGenerator::replying(polished()));
        let (status, _) = post(ai, json!({"action": "generate"})).await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
    }

    #[tokio::test]
    async fn test_enhance_requires_prompt() {
        let ai = Arc::new(CannedGenerator::replying(polished()));
        let (status, body) = post(
            ai,
            json!({"action": "enhance", "resumeJson": {"name": "Asha"}, "enhancementPrompt": "  "}),
        )
        .await;
        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["message"], "enhancementPrompt is required");
    }

    #[tokio::test]
    async fn test_enhance_returns_revised_resume() {
        let ai = Arc::new(CannedGenerator::replying(polished()));
        let (status, body) = post(
            ai.clone(),
            json!({
                "action": "enhance",
                "resumeJson": {"name": "Asha Rai", "text": "stale"},
                "enhancementPrompt": "Make it punchier"
            }),
        )
        .await;

        assert_eq!(status, StatusCode::OK);
        assert_ne!(body["resumeJson"]["text"], "stale");
        let prompt = ai.prompts.lock().unwrap()[0].clone();
        assert!(prompt.contains("Make it punchier"));
        assert!(!prompt.contains("stale"));
    }

    #[tokio::test]
    async fn test_chat_returns_ai_message() {
        let ai = Arc::new(CannedGenerator::replying("  Lead with metrics. "));
        let (status, body) = post(
            ai,
            json!({"action": "chat", "resumeJson": {"name": "Asha"}, "message": "Any tips?"}),
        )
        .await;
        assert_eq!(status, StatusCode::OK);
        assert_eq!(body["aiMessage"], "Lead with metrics.");
    }

    #[tokio::test]
    async fn test_ai_failure_is_500_envelope() {
        let store = Arc::new(MemoryStore::new());
        let (status, body) = send(
            state(store),
            Method::POST,
            "/api/v1/ai/resume",
            None,
            Some(json!({"action": "generate", "form": form()})),
        )
        .await;
        assert_eq!(status, StatusCode::INTERNAL_SERVER_ERROR);
        assert_eq!(body["message"], "An AI processing error occurred");
    }

    #[tokio::test]
    async fn test_unknown_action_is_400_envelope() {
        let ai = Arc::new(CannedGenerator::replying(polished()));
        let (status, body) = post(ai.clone(), json!({"action": "translate", "form": form()})).await;

        assert_eq!(status, StatusCode::BAD_REQUEST);
        assert_eq!(body["success"], false);
        assert_eq!(body["status"], 400);
        assert!(ai.prompts.lock().unwrap().is_empty());
    }
}
