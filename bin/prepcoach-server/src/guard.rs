//! Request guard for `POST /interview`.
//!
//! Validation runs in a fixed order before any model call: content type,
//! declared size, client identification, rate limit (in the handler, using
//! [`client_key`]), then body parse, field presence, question length, and
//! technique resolution.  Everything here is pure; only the rate-limit step
//! in the handler mutates state.

use axum::http::{HeaderMap, header};
use prepcoach_core::types::{ConversationTurn, Difficulty, InterviewType};
use prepcoach_core::Technique;
use serde::Deserialize;

use crate::error::ServerError;

/// Maximum accepted question length in characters.
pub const MAX_QUESTION_CHARS: usize = 1000;

/// Rate-limit key for clients with no forwarded-for header.  All such
/// clients share one bucket.
pub const UNKNOWN_CLIENT: &str = "unknown";

/// Step 1: the request must declare a JSON body.
pub fn check_content_type(headers: &HeaderMap) -> Result<(), ServerError> {
    let declares_json = headers
        .get(header::CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .is_some_and(|ct| ct.contains("application/json"));
    if declares_json {
        Ok(())
    } else {
        Err(ServerError::UnsupportedMediaType)
    }
}

/// Step 2: the declared content length must not exceed `max_bytes`.
///
/// Advisory only; a client that lies about its length is not caught here
/// but the question-length check still bounds what reaches the provider.
pub fn check_declared_length(headers: &HeaderMap, max_bytes: usize) -> Result<(), ServerError> {
    let declared = headers
        .get(header::CONTENT_LENGTH)
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.parse::<usize>().ok());
    match declared {
        Some(len) if len > max_bytes => Err(ServerError::PayloadTooLarge),
        _ => Ok(()),
    }
}

/// Step 3: derive the rate-limit key from `X-Forwarded-For`.
///
/// Takes the first (client-most) entry of a comma-separated list.
pub fn client_key(headers: &HeaderMap) -> String {
    headers
        .get("x-forwarded-for")
        .and_then(|v| v.to_str().ok())
        .and_then(|v| v.split(',').next())
        .map(str::trim)
        .filter(|v| !v.is_empty())
        .unwrap_or(UNKNOWN_CLIENT)
        .to_owned()
}

/// Lenient wire shape: presence and validity are checked explicitly so each
/// failure maps to its contractual error instead of a serde message.
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct RawInterviewRequest {
    #[serde(rename = "type")]
    interview_type: Option<String>,
    prompt_type: Option<String>,
    question: Option<String>,
    difficulty: Option<String>,
    job_description: Option<String>,
    #[serde(default)]
    #[allow(dead_code)] // accepted for contract compatibility, not forwarded
    conversation: Vec<ConversationTurn>,
    role_play_persona: Option<String>,
}

/// A request that passed every guard step.
#[derive(Debug)]
pub struct GuardedRequest {
    pub interview_type: InterviewType,
    pub technique: Technique,
    pub question: String,
    pub difficulty: Difficulty,
    pub job_description: Option<String>,
    pub persona: Option<String>,
}

/// Steps 5–7: parse the body, check required fields, bound the question,
/// and resolve the closed vocabularies.
pub fn parse_request(body: &[u8]) -> Result<GuardedRequest, ServerError> {
    let raw: RawInterviewRequest = serde_json::from_slice(body)
        .map_err(|_| ServerError::BadRequest("Malformed JSON body".to_owned()))?;

    let (Some(question), Some(interview_type), Some(prompt_type)) =
        (raw.question, raw.interview_type, raw.prompt_type)
    else {
        return Err(ServerError::MissingFields);
    };
    if question.is_empty() || interview_type.is_empty() || prompt_type.is_empty() {
        return Err(ServerError::MissingFields);
    }

    if question.chars().count() > MAX_QUESTION_CHARS {
        return Err(ServerError::QuestionTooLong);
    }

    let technique: Technique = prompt_type
        .parse()
        .map_err(|_| ServerError::InvalidPromptType)?;

    let interview_type: InterviewType = interview_type
        .parse()
        .map_err(|_| ServerError::BadRequest("Invalid interview type".to_owned()))?;

    // Absent difficulty defaults to medium rather than failing: the builder
    // always needs a level and the wire schema predates the closed enum.
    let difficulty: Difficulty = match raw.difficulty {
        Some(d) => d
            .parse()
            .map_err(|_| ServerError::BadRequest("Invalid difficulty".to_owned()))?,
        None => Difficulty::Medium,
    };

    Ok(GuardedRequest {
        interview_type,
        technique,
        question,
        difficulty,
        job_description: raw.job_description,
        persona: raw.role_play_persona,
    })
}

// ── Tests ──────────────────────────────────────────────────────────────────────
