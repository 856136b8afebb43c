//! The guarded interview-coaching endpoint.
//!
//! Guard order is part of the contract (see [`crate::guard`]): content type,
//! declared size, rate limit, then body validation.  Only after every step
//! passes is the completion dispatched, with the system instruction built
//! from the interview context and the question wrapped by the selected
//! technique's template.

use std::sync::Arc;

use axum::Json;
use axum::body::Bytes;
use axum::extract::State;
use axum::http::HeaderMap;
use axum::routing::post;
use axum::Router;
use prepcoach_core::Technique;
use prepcoach_core::build_instruction;
use prepcoach_core::types::{
    ChatMessage, ConversationTurn, Difficulty, ErrorResponse, InterviewRequest, InterviewResponse,
    InterviewType, MessageStatus, Role,
};
use tracing::{debug, info};
use utoipa::OpenApi;

use crate::error::ServerError;
use crate::guard;
use crate::state::AppState;

#[derive(OpenApi)]
#[openapi(
    paths(post_interview),
    components(schemas(
        InterviewRequest,
        InterviewResponse,
        ErrorResponse,
        ConversationTurn,
        ChatMessage,
        MessageStatus,
        Technique,
        InterviewType,
        Difficulty,
        Role
    ))
)]
pub struct InterviewApi;

/// Register the interview route.  The `OPTIONS` preflight is answered by the
/// router-level CORS layer.
pub fn router() -> Router<Arc<AppState>> {
    Router::new().route("/interview", post(post_interview))
}

/// One coaching exchange (`POST /interview`).
///
/// Note: the request may carry a `conversation` array, but only the current
/// question is forwarded upstream; multi-turn context is not part of the
/// contract.
#[utoipa::path(
    post,
    path = "/interview",
    tag = "interview",
    request_body = InterviewRequest,
    responses(
        (status = 200, description = "Coaching answer generated", body = InterviewResponse),
        (status = 400, description = "Missing field, question too long, or invalid prompt type", body = ErrorResponse),
        (status = 413, description = "Declared payload exceeds the size cap", body = ErrorResponse),
        (status = 415, description = "Body is not declared as JSON", body = ErrorResponse),
        (status = 429, description = "Rate limit exceeded for this client", body = ErrorResponse),
        (status = 500, description = "Completion provider failure", body = ErrorResponse),
    )
)]
pub async fn post_interview(
    State(state): State<Arc<AppState>>,
    headers: HeaderMap,
    body: Bytes,
) -> Result<Json<InterviewResponse>, ServerError> {
    guard::check_content_type(&headers)?;
    guard::check_declared_length(&headers, state.config.max_body_bytes)?;

    let client = guard::client_key(&headers);
    if !state.limiter.try_admit(&client) {
        debug!(%client, "rate limit exceeded");
        return Err(ServerError::RateLimited);
    }

    let req = guard::parse_request(&body)?;

    let instruction = build_instruction(
        req.interview_type,
        req.difficulty,
        req.technique,
        req.job_description.as_deref(),
        req.persona.as_deref(),
    );
    let prompt = req.technique.render(&req.question);

    debug!(
        interview_type = %req.interview_type,
        technique = %req.technique,
        difficulty = %req.difficulty,
        question_chars = req.question.chars().count(),
        "interview request admitted"
    );

    let answer = state.backend.complete(&instruction, &prompt).await?;

    info!(answer_len = answer.len(), "interview exchange completed");

    Ok(Json(InterviewResponse { response: answer }))
}

// ── Tests ──────────────────────────────────────────────────────────────────────
