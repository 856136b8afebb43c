//! The chat session state machine.
//!
//! Message pairs move `Pending → Resolved | Failed`; a failed assistant
//! message can be retried by id, which flips the same message back to
//! `Pending` and re-issues the exchange with the conversation slice that
//! preceded it.  A failed exchange always lands in the `Error` status – a
//! placeholder is never left stuck in `Sending`.

use prepcoach_core::Technique;
use prepcoach_core::types::{
    ChatMessage, ConversationTurn, Difficulty, ErrorResponse, InterviewRequest, InterviewResponse,
    InterviewType, MessageStatus, Role,
};
use thiserror::Error;
use tracing::{debug, warn};
use uuid::Uuid;

/// Suggested filename when the transcript is handed to a download sink.
pub const TRANSCRIPT_FILENAME: &str = "interview-conversation.txt";

/// Failures surfaced by the session controller.
#[derive(Debug, Error)]
pub enum ClientError {
    /// The input was empty or whitespace-only; nothing was sent.
    #[error("message input is empty")]
    EmptyInput,

    /// An exchange is already in flight for this session.
    #[error("an exchange is already in flight")]
    Busy,

    /// No message in the conversation has the given id.
    #[error("no message with id {0}")]
    UnknownMessage(String),

    /// The id does not name an assistant message with a preceding user turn.
    #[error("message {0} is not a retryable assistant message")]
    NotRetryable(String),

    /// The request never produced an HTTP response.
    #[error("transport failure: {0}")]
    Transport(#[from] reqwest::Error),

    /// The server answered with a non-success status.
    #[error("server rejected the exchange ({status}): {message}")]
    Rejected { status: u16, message: String },
}

/// Interview context applied to every exchange in the session.
#[derive(Debug, Clone)]
pub struct SessionSettings {
    pub interview_type: InterviewType,
    pub technique: Technique,
    pub difficulty: Difficulty,
    pub job_description: Option<String>,
    /// Identity for the model to answer as; only sent under
    /// [`Technique::RolePlay`].
    pub persona: Option<String>,
}

/// Owns one conversation against a prepcoach server.
///
/// Not shared across sessions; all mutation goes through `&mut self`.
pub struct ChatSession {
    http: reqwest::Client,
    endpoint: String,
    conversation: Vec<ChatMessage>,
    loading: bool,
}

impl ChatSession {
    /// Create a session against the server's `/interview` URL,
    /// e.g. `"http://localhost:3000/interview"`.
    pub fn new(endpoint: impl Into<String>) -> Self {
        Self {
            http: reqwest::Client::new(),
            endpoint: endpoint.into(),
            conversation: Vec::new(),
            loading: false,
        }
    }

    /// The conversation in submission order.
    pub fn conversation(&self) -> &[ChatMessage] {
        &self.conversation
    }

    /// Whether an exchange is currently outstanding.  Advisory backpressure
    /// for UIs; [`send`](Self::send) also enforces it.
    pub fn is_loading(&self) -> bool {
        self.loading
    }

    /// Drop the whole conversation.
    pub fn reset(&mut self) {
        self.conversation.clear();
    }

    /// Send one question: appends the user message plus an assistant
    /// placeholder, runs the exchange, and resolves the placeholder in
    /// place.  On failure the placeholder is marked `Error` (content
    /// cleared) and the error is returned.
    pub async fn send(
        &mut self,
        input: &str,
        settings: &SessionSettings,
    ) -> Result<&ChatMessage, ClientError> {
        let input = input.trim();
        if input.is_empty() {
            return Err(ClientError::EmptyInput);
        }
        if self.loading {
            return Err(ClientError::Busy);
        }

        let history = self.turns_before(self.conversation.len());

        self.conversation.push(ChatMessage {
            id: Uuid::new_v4().to_string(),
            role: Role::User,
            content: input.to_owned(),
            status: None,
        });
        let assistant_id = Uuid::new_v4().to_string();
        self.conversation.push(ChatMessage {
            id: assistant_id.clone(),
            role: Role::Assistant,
            content: String::new(),
            status: Some(MessageStatus::Sending),
        });

        debug!(id = %assistant_id, technique = %settings.technique, "sending exchange");
        self.loading = true;
        let outcome = self.exchange(input, history, settings).await;
        self.loading = false;

        self.resolve(&assistant_id, outcome)
    }

    /// Retry a failed exchange.  `message_id` names the assistant message;
    /// the original user content is re-sent together with the conversation
    /// slice preceding the exchange, and the same message id transitions
    /// back through `Sending` before resolving again.
    pub async fn retry(
        &mut self,
        message_id: &str,
        settings: &SessionSettings,
    ) -> Result<&ChatMessage, ClientError> {
        if self.loading {
            return Err(ClientError::Busy);
        }
        let Some(pos) = self.conversation.iter().position(|m| m.id == message_id) else {
            return Err(ClientError::UnknownMessage(message_id.to_owned()));
        };
        if self.conversation[pos].role != Role::Assistant || pos == 0 {
            return Err(ClientError::NotRetryable(message_id.to_owned()));
        }

        let question = self.conversation[pos - 1].content.clone();
        let history = self.turns_before(pos - 1);

        let placeholder = &mut self.conversation[pos];
        placeholder.content.clear();
        placeholder.status = Some(MessageStatus::Sending);

        debug!(id = %message_id, "retrying exchange");
        self.loading = true;
        let outcome = self.exchange(&question, history, settings).await;
        self.loading = false;

        self.resolve(message_id, outcome)
    }

    /// Plain-text transcript: one line per message in submission order,
    /// `You:` for the user and `AI:` for the assistant.
    pub fn transcript(&self) -> String {
        self.conversation
            .iter()
            .map(|m| format!("{}: {}", m.role.transcript_label(), m.content))
            .collect::<Vec<_>>()
            .join("\n")
    }

    // ── internals ────────────────────────────────────────────────────────────

    fn turns_before(&self, end: usize) -> Vec<ConversationTurn> {
        self.conversation[..end]
            .iter()
            .map(|m| ConversationTurn { role: m.role, content: m.content.clone() })
            .collect()
    }

    async fn exchange(
        &self,
        question: &str,
        conversation: Vec<ConversationTurn>,
        settings: &SessionSettings,
    ) -> Result<String, ClientError> {
        let request = InterviewRequest {
            interview_type: settings.interview_type,
            prompt_type: settings.technique,
            question: question.to_owned(),
            difficulty: settings.difficulty,
            job_description: settings.job_description.clone(),
            conversation,
            role_play_persona: if settings.technique == Technique::RolePlay {
                settings.persona.clone()
            } else {
                None
            },
        };

        let response = self.http.post(&self.endpoint).json(&request).send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response
                .json::<ErrorResponse>()
                .await
                .map(|e| e.error)
                .unwrap_or_else(|_| status.to_string());
            warn!(status = status.as_u16(), %message, "exchange rejected");
            return Err(ClientError::Rejected { status: status.as_u16(), message });
        }

        let body: InterviewResponse = response.json().await?;
        Ok(body.response)
    }

    /// Apply the exchange outcome to the placeholder with `id`.
    fn resolve(
        &mut self,
        id: &str,
        outcome: Result<String, ClientError>,
    ) -> Result<&ChatMessage, ClientError> {
        let Some(pos) = self.conversation.iter().position(|m| m.id == id) else {
            return Err(ClientError::UnknownMessage(id.to_owned()));
        };
        let message = &mut self.conversation[pos];
        match outcome {
            Ok(answer) => {
                message.content = answer;
                message.status = None;
                Ok(&self.conversation[pos])
            }
            Err(e) => {
                message.content.clear();
                message.status = Some(MessageStatus::Error);
                Err(e)
            }
        }
    }
}

// ── Tests ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod test {
    use super::*;
    use axum::extract::State;
    use axum::http::StatusCode;
    use axum::routing::post;
    use axum::{Json, Router};
    use std::sync::atomic::{AtomicBool, Ordering};
    use std::sync::{Arc, Mutex};

    /// Test double for the server: records every request body and can be
    /// told to fail the next exchange.
    #[derive(Default)]
    struct FakeServer {
        bodies: Mutex<Vec<serde_json::Value>>,
        fail_next: AtomicBool,
    }

    impl FakeServer {
        fn bodies(&self) -> Vec<serde_json::Value> {
            self.bodies.lock().unwrap().clone()
        }
    }

    async fn handle(
        State(server): State<Arc<FakeServer>>,
        Json(body): Json<serde_json::Value>,
    ) -> Result<Json<serde_json::Value>, (StatusCode, Json<serde_json::Value>)> {
        server.bodies.lock().unwrap().push(body);
        if server.fail_next.swap(false, Ordering::SeqCst) {
            return Err((
                StatusCode::INTERNAL_SERVER_ERROR,
                Json(serde_json::json!({ "error": "Internal server error" })),
            ));
        }
        Ok(Json(serde_json::json!({ "response": "Answer." })))
    }

    /// Spawn the fake server and return the `/interview` endpoint URL.
    async fn spawn(server: Arc<FakeServer>) -> String {
        let app = Router::new()
            .route("/interview", post(handle))
            .with_state(server);
        let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
        let addr = listener.local_addr().unwrap();
        tokio::spawn(async move {
            axum::serve(listener, app).await.unwrap();
        });
        format!("http://{addr}/interview")
    }

    fn settings() -> SessionSettings {
        SessionSettings {
            interview_type: InterviewType::Behavioral,
            technique: Technique::ZeroShot,
            difficulty: Difficulty::Easy,
            job_description: None,
            persona: None,
        }
    }

    #[tokio::test]
    async fn send_appends_a_resolved_pair() {
        let server = Arc::new(FakeServer::default());
        let mut session = ChatSession::new(spawn(server).await);

        let resolved = session.send("Tell me about yourself", &settings()).await.unwrap();
        assert_eq!(resolved.role, Role::Assistant);
        assert_eq!(resolved.content, "Answer.");
        assert_eq!(resolved.status, None);

        let conversation = session.conversation();
        assert_eq!(conversation.len(), 2);
        assert_eq!(conversation[0].role, Role::User);
        assert_eq!(conversation[0].content, "Tell me about yourself");
        assert!(!session.is_loading());
    }

    #[tokio::test]
    async fn message_ids_are_unique_within_a_session() {
        let server = Arc::new(FakeServer::default());
        let mut session = ChatSession::new(spawn(server).await);
        session.send("q1", &settings()).await.unwrap();
        session.send("q2", &settings()).await.unwrap();

        let mut ids: Vec<_> = session.conversation().iter().map(|m| m.id.clone()).collect();
        ids.sort();
        ids.dedup();
        assert_eq!(ids.len(), 4);
    }

    #[tokio::test]
    async fn blank_input_sends_nothing() {
        let server = Arc::new(FakeServer::default());
        let mut session = ChatSession::new(spawn(server.clone()).await);

        let err = session.send("   ", &settings()).await.unwrap_err();
        assert!(matches!(err, ClientError::EmptyInput));
        assert!(session.conversation().is_empty());
        assert!(server.bodies().is_empty());
    }

    #[tokio::test]
    async fn failure_marks_the_placeholder_error_not_stuck() {
        let server = Arc::new(FakeServer::default());
        server.fail_next.store(true, Ordering::SeqCst);
        let mut session = ChatSession::new(spawn(server).await);

        let err = session.send("q", &settings()).await.unwrap_err();
        assert!(matches!(err, ClientError::Rejected { status: 500, .. }));

        let placeholder = &session.conversation()[1];
        assert_eq!(placeholder.status, Some(MessageStatus::Error));
        assert!(placeholder.content.is_empty());
        assert!(!session.is_loading());
    }

    #[tokio::test]
    async fn retry_reissues_the_same_message_id() {
        let server = Arc::new(FakeServer::default());
        server.fail_next.store(true, Ordering::SeqCst);
        let mut session = ChatSession::new(spawn(server.clone()).await);

        session.send("q", &settings()).await.unwrap_err();
        let failed_id = session.conversation()[1].id.clone();

        let resolved = session.retry(&failed_id, &settings()).await.unwrap();
        assert_eq!(resolved.id, failed_id);
        assert_eq!(resolved.content, "Answer.");
        assert_eq!(resolved.status, None);
        // Retry replaces in place; no duplicate pair is appended.
        assert_eq!(session.conversation().len(), 2);

        // The retried request re-sent the original user content.
        let bodies = server.bodies();
        assert_eq!(bodies.len(), 2);
        assert_eq!(bodies[1]["question"], "q");
    }

    #[tokio::test]
    async fn retry_sends_the_history_preceding_the_exchange() {
        let server = Arc::new(FakeServer::default());
        let mut session = ChatSession::new(spawn(server.clone()).await);

        session.send("first", &settings()).await.unwrap();
        server.fail_next.store(true, Ordering::SeqCst);
        session.send("second", &settings()).await.unwrap_err();

        let failed_id = session.conversation()[3].id.clone();
        session.retry(&failed_id, &settings()).await.unwrap();

        let bodies = server.bodies();
        let retry_history = bodies[2]["conversation"].as_array().unwrap();
        assert_eq!(retry_history.len(), 2, "only the first exchange precedes the retry");
        assert_eq!(retry_history[0]["content"], "first");
        assert_eq!(retry_history[1]["content"], "Answer.");
    }

    #[tokio::test]
    async fn retry_of_unknown_or_user_message_is_rejected() {
        let server = Arc::new(FakeServer::default());
        let mut session = ChatSession::new(spawn(server).await);
        session.send("q", &settings()).await.unwrap();

        let err = session.retry("no-such-id", &settings()).await.unwrap_err();
        assert!(matches!(err, ClientError::UnknownMessage(_)));

        let user_id = session.conversation()[0].id.clone();
        let err = session.retry(&user_id, &settings()).await.unwrap_err();
        assert!(matches!(err, ClientError::NotRetryable(_)));
    }

    #[tokio::test]
    async fn persona_is_sent_only_under_role_play() {
        let server = Arc::new(FakeServer::default());
        let mut session = ChatSession::new(spawn(server.clone()).await);

        let mut with_persona = settings();
        with_persona.persona = Some("a hiring manager".into());
        session.send("q1", &with_persona).await.unwrap();

        with_persona.technique = Technique::RolePlay;
        session.send("q2", &with_persona).await.unwrap();

        let bodies = server.bodies();
        assert!(bodies[0].get("rolePlayPersona").is_none());
        assert_eq!(bodies[1]["rolePlayPersona"], "a hiring manager");
        assert_eq!(bodies[1]["promptType"], "role-play");
    }

    #[tokio::test]
    async fn transcript_labels_every_message_in_order() {
        let server = Arc::new(FakeServer::default());
        let mut session = ChatSession::new(spawn(server).await);
        session.send("first question", &settings()).await.unwrap();
        session.send("second question", &settings()).await.unwrap();

        let transcript = session.transcript();
        let lines: Vec<&str> = transcript.lines().collect();
        assert_eq!(
            lines,
            vec![
                "You: first question",
                "AI: Answer.",
                "You: second question",
                "AI: Answer.",
            ]
        );
    }

    #[tokio::test]
    async fn reset_clears_the_conversation() {
        let server = Arc::new(FakeServer::default());
        let mut session = ChatSession::new(spawn(server).await);
        session.send("q", &settings()).await.unwrap();
        session.reset();
        assert!(session.conversation().is_empty());
        assert!(session.transcript().is_empty());
    }
}
