use tokio::sync::oneshot;

use crate::error::AppError;
use crate::models::ChatReply;

/// Messages that can be sent to the `LlmActor`.
#[derive(Debug)]
pub enum LlmMessage {
    /// A request to generate a complete text response with specific parameters.
    GenerateWithParams {
        prompt: String,
        system_prompt: Option<String>,
        temperature: Option<f32>,
        /// A channel to send the final `String` result back.
        responder: oneshot::Sender<Result<String, AppError>>,
    },
}

/// Messages that can be sent to the `SupervisorActor`.
#[derive(Debug)]
pub enum SupervisorMessage {
    /// A request to process one user message.
    ProcessUserMessage {
        /// Session to continue; a new one is created when absent.
        session_id: Option<String>,
        content: String,
        /// A channel to send the cleaned assistant reply back.
        responder: oneshot::Sender<Result<ChatReply, AppError>>,
    },
    /// A request to forget the history of a session.
    ClearSession {
        session_id: String,
        responder: oneshot::Sender<()>,
    },
    /// A command to stop the supervisor loop.
    Shutdown,
}
