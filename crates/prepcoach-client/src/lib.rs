//! prepcoach-client – chat session controller for the `/interview` endpoint.
//!
//! Owns the running conversation, issues exchanges against a prepcoach
//! server, tracks per-message sending / error state, supports retrying a
//! failed exchange in place, and exports the conversation as a plain-text
//! transcript.

pub mod session;

pub use session::{ChatSession, ClientError, SessionSettings, TRANSCRIPT_FILENAME};
