//! Wire types for the `/interview` endpoint.
//!
//! The identifiers used on the wire (`"system-design"`, `"role-play"`, …)
//! are closed vocabularies; they deserialize into enums so an unknown value
//! is rejected at the boundary instead of flowing through as a bare string.

use serde::{Deserialize, Serialize};

use crate::prompt::Technique;

/// Domain category of the interview being prepared for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString)]
#[serde(rename_all = "kebab-case")]
#[strum(serialize_all = "kebab-case")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum InterviewType {
    Behavioral,
    Technical,
    SystemDesign,
    Leadership,
}

impl InterviewType {
    pub const ALL: [InterviewType; 4] = [
        InterviewType::Behavioral,
        InterviewType::Technical,
        InterviewType::SystemDesign,
        InterviewType::Leadership,
    ];

    /// Human-readable name for selection UIs.
    pub fn display_name(&self) -> &'static str {
        match self {
            InterviewType::Behavioral => "Behavioral interview",
            InterviewType::Technical => "Technical Interview",
            InterviewType::SystemDesign => "System Design",
            InterviewType::Leadership => "Leadership & Management",
        }
    }
}

/// Requested complexity of the coaching answer.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, strum::Display, strum::EnumString)]
#[serde(rename_all = "lowercase")]
#[strum(serialize_all = "lowercase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum Difficulty {
    Easy,
    Medium,
    Hard,
}

impl Difficulty {
    pub const ALL: [Difficulty; 3] = [Difficulty::Easy, Difficulty::Medium, Difficulty::Hard];
}

/// Author of a chat message.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum Role {
    User,
    Assistant,
}

impl Role {
    /// Label used in exported transcripts.
    pub fn transcript_label(&self) -> &'static str {
        match self {
            Role::User => "You",
            Role::Assistant => "AI",
        }
    }
}

/// Delivery state of a message within a session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub enum MessageStatus {
    Sending,
    Error,
    Sent,
}

/// One message in a running interview-coaching session.
///
/// Created in pairs on send: the user message plus an assistant placeholder
/// whose `content` stays empty while `status` is [`MessageStatus::Sending`].
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ChatMessage {
    /// Unique within the session (collision-resistant random id).
    pub id: String,
    pub role: Role,
    pub content: String,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub status: Option<MessageStatus>,
}

/// Role/content pair as carried in the request's `conversation` array.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ConversationTurn {
    pub role: Role,
    pub content: String,
}

/// Request body for `POST /interview`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct InterviewRequest {
    /// Interview category, e.g. `"technical"`.
    #[serde(rename = "type")]
    pub interview_type: InterviewType,
    /// Prompt-engineering technique, e.g. `"zero-shot"`.
    pub prompt_type: Technique,
    /// The question or answer to coach on (at most 1000 characters).
    pub question: String,
    pub difficulty: Difficulty,
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub job_description: Option<String>,
    /// Prior exchanges in the session.  Accepted for contract compatibility;
    /// the server does not currently forward history upstream.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub conversation: Vec<ConversationTurn>,
    /// Identity to answer as; only honoured under the role-play technique.
    #[serde(skip_serializing_if = "Option::is_none", default)]
    pub role_play_persona: Option<String>,
}

/// Success body for `POST /interview`.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct InterviewResponse {
    /// The coaching answer.
    pub response: String,
}

/// Failure body for every non-2xx response.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[cfg_attr(feature = "openapi", derive(utoipa::ToSchema))]
pub struct ErrorResponse {
    pub error: String,
}

// ── Tests ──────────────────────────────────────────────────────────────────────
