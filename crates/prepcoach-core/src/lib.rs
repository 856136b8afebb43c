//! prepcoach-core – pure domain layer shared by the server and the client.
//!
//! Contains the wire types for the `/interview` endpoint, the closed
//! technique / interview-type / difficulty vocabularies, the prompt template
//! registry, and the system instruction builder.  No I/O happens here.

pub mod instruction;
pub mod prompt;
pub mod types;

pub use instruction::build_instruction;
pub use prompt::Technique;
pub use types::{
    ChatMessage, ConversationTurn, Difficulty, ErrorResponse, InterviewRequest, InterviewResponse,
    InterviewType, MessageStatus, Role,
};
