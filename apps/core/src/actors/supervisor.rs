use crate::actors::llm::LlmActorHandle;
use crate::actors::messages::SupervisorMessage;
use crate::actors::traits::LlmActor;
use crate::brain::BrainAnalyzer;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::models::{ChatMessage, ChatReply};
use crate::session::{InMemorySessionStore, SessionStore};
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot};
use tokio::time::{timeout, Duration};
use tracing::{error, info, instrument, warn};
use uuid::Uuid;

/// Sent when the model produced nothing usable after cleaning.
pub const EMPTY_RESPONSE_FALLBACK: &str =
    "I'm sorry, I couldn't generate a response. Please try again.";

/// Time allowed for a turn on top of the LLM request timeout.
const TURN_GRACE: Duration = Duration::from_secs(10);

/// A handle to the `SupervisorActor`.
///
/// This is the primary entry point for the chat logic. It runs the Brain on the
/// user's message, calls the `LlmActor`, cleans the answer and keeps the session
/// history.
#[derive(Clone)]
pub struct SupervisorHandle {
    sender: mpsc::Sender<SupervisorMessage>,
    reply_timeout: Duration,
}

impl SupervisorHandle {
    /// Creates a supervisor backed by the HTTP `LlmActor` and an in-memory session store.
    pub fn new(config: &AppConfig) -> Self {
        let llm_actor = Arc::new(LlmActorHandle::new(&config.llm, &config.model));
        let store = Arc::new(InMemorySessionStore::new(&config.session));
        Self::with_actors(config, llm_actor, store)
    }

    /// Creates a supervisor with explicit collaborators.
    ///
    /// # Arguments
    ///
    /// * `config` - Supplies the temperature, repetition thresholds and timeouts.
    /// * `llm_actor` - The text-generation backend.
    /// * `store` - Where session history is kept.
    pub fn with_actors<L, S>(config: &AppConfig, llm_actor: Arc<L>, store: Arc<S>) -> Self
    where
        L: LlmActor,
        S: SessionStore,
    {
        let (sender, receiver) = mpsc::channel(32);
        let actor = SupervisorRunner {
            receiver,
            llm_actor,
            store,
            brain: BrainAnalyzer::with_config(config.repetition.clone()),
            temperature: config.model.temperature,
        };
        tokio::spawn(async move { actor.run().await });
        Self {
            sender,
            reply_timeout: config.llm.request_timeout() + TURN_GRACE,
        }
    }

    /// Processes one user message.
    ///
    /// 1. Classifies the message language and picks the prompts.
    /// 2. Builds the final prompt from the session history.
    /// 3. Calls the LLM and cleans its response.
    /// 4. Stores the user message and the cleaned reply.
    ///
    /// # Arguments
    ///
    /// * `session_id` - The session to continue; `None` starts a new one.
    /// * `content` - The user's message content.
    #[instrument(skip(self, content))]
    pub async fn process_message(
        &self,
        session_id: Option<String>,
        content: String,
    ) -> Result<ChatReply, AppError> {
        let (send, recv) = oneshot::channel();
        let msg = SupervisorMessage::ProcessUserMessage {
            session_id,
            content,
            responder: send,
        };
        self.sender
            .send(msg)
            .await
            .map_err(|e| AppError::Actor(e.to_string()))?;
        timeout(self.reply_timeout, recv)
            .await?
            .map_err(|e| AppError::Actor(e.to_string()))?
    }

    /// Forgets the history of a session.
    pub async fn clear_session(&self, session_id: String) -> Result<(), AppError> {
        let (send, recv) = oneshot::channel();
        self.sender
            .send(SupervisorMessage::ClearSession {
                session_id,
                responder: send,
            })
            .await
            .map_err(|e| AppError::Actor(e.to_string()))?;
        recv.await.map_err(|e| AppError::Actor(e.to_string()))
    }

    /// Stops the supervisor loop; later calls fail with `AppError::Actor`.
    pub async fn shutdown(&self) -> Result<(), AppError> {
        self.sender
            .send(SupervisorMessage::Shutdown)
            .await
            .map_err(|e| AppError::Actor(e.to_string()))
    }
}

// --- Actor Runner ---
struct SupervisorRunner<L, S>
where
    L: LlmActor,
    S: SessionStore,
{
    receiver: mpsc::Receiver<SupervisorMessage>,
    llm_actor: Arc<L>,
    store: Arc<S>,
    brain: BrainAnalyzer,
    temperature: f32,
}

impl<L, S> SupervisorRunner<L, S>
where
    L: LlmActor,
    S: SessionStore,
{
    async fn run(mut self) {
        info!("Supervisor started");
        while let Some(msg) = self.receiver.recv().await {
            if matches!(msg, SupervisorMessage::Shutdown) {
                info!("Supervisor shutting down...");
                break;
            }
            self.handle_message(msg).await;
        }
        info!("Supervisor stopped");
    }

    async fn handle_message(&mut self, msg: SupervisorMessage) {
        match msg {
            SupervisorMessage::ProcessUserMessage {
                session_id,
                content,
                responder,
            } => {
                let result = self.handle_user_message(session_id, content).await;
                if let Err(e) = &result {
                    error!("Error processing user message: {:?}", e);
                }
                let _ = responder.send(result);
            }
            SupervisorMessage::ClearSession {
                session_id,
                responder,
            } => {
                self.store.clear(&session_id);
                info!(session = %session_id, "Session cleared");
                let _ = responder.send(());
            }
            SupervisorMessage::Shutdown => {}
        }
    }

    #[instrument(skip(self, content))]
    async fn handle_user_message(
        &mut self,
        session_id: Option<String>,
        content: String,
    ) -> Result<ChatReply, AppError> {
        let content = content.trim();
        if content.is_empty() {
            return Err(AppError::Validation("Message is required".to_string()));
        }

        let session_id = session_id
            .filter(|id| !id.trim().is_empty())
            .unwrap_or_else(|| Uuid::new_v4().to_string());

        // --- Analysis ---
        let packet = self.brain.analyze(content);
        info!(session = %session_id, "{}", packet.summary());

        // --- Generation ---
        let history = self.store.history(&session_id);
        let final_prompt = build_final_prompt(&history, &self.brain.user_prompt(&packet));
        let raw = self
            .llm_actor
            .generate_with_params(
                final_prompt,
                Some(packet.system_prompt.clone()),
                Some(self.temperature),
            )
            .await?;

        // --- Cleaning ---
        let cleaned = self.brain.clean_response(&raw);
        let text = if cleaned.text.is_empty() {
            warn!(session = %session_id, "Model response was empty after cleaning");
            EMPTY_RESPONSE_FALLBACK.to_string()
        } else {
            cleaned.text
        };

        self.store.append(&session_id, ChatMessage::user(content));
        self.store.append(&session_id, ChatMessage::assistant(text.clone()));

        Ok(ChatReply {
            session_id,
            language: packet.language,
            text,
            warnings: cleaned.warnings,
        })
    }
}

fn build_final_prompt(history: &[ChatMessage], user_prompt: &str) -> String {
    let mut prompt_parts = Vec::new();
    if !history.is_empty() {
        let conversation_history = history
            .iter()
            .map(|msg| format!("{}: {}", msg.role, msg.content))
            .collect::<Vec<String>>()
            .join("\n");
        prompt_parts.push(format!("Conversation History:\n{}", conversation_history));
    }
    prompt_parts.push(format!("User: {}", user_prompt));
    prompt_parts.join("\n\n")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::brain::LanguageTag;
    use async_trait::async_trait;
    use std::sync::Mutex;

    // --- Mock Actors ---

    struct MockLlmActor {
        response: Result<String, AppError>,
        prompts: Mutex<Vec<(String, Option<String>)>>,
    }

    impl MockLlmActor {
        fn new(response: Result<String, AppError>) -> Self {
            Self {
                response,
                prompts: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl LlmActor for MockLlmActor {
        async fn generate_with_params(
            &self,
            prompt: String,
            system_prompt: Option<String>,
            _temperature: Option<f32>,
        ) -> Result<String, AppError> {
            self.prompts.lock().unwrap().push((prompt, system_prompt));
            self.response.clone()
        }
    }

    fn setup(
        response: Result<String, AppError>,
    ) -> (SupervisorHandle, Arc<MockLlmActor>, Arc<InMemorySessionStore>) {
        let llm = Arc::new(MockLlmActor::new(response));
        let store = Arc::new(InMemorySessionStore::default());
        let handle = SupervisorHandle::with_actors(&AppConfig::default(), llm.clone(), store.clone());
        (handle, llm, store)
    }

    #[tokio::test]
    async fn test_supervisor_process_message_nominal() {
        // 1. Arrange
        let (handle, llm, store) =
            setup(Ok("(Respond in Hinglish) Corn ek important crop hai.".to_string()));

        // 2. Act
        let reply = handle
            .process_message(Some("s1".to_string()), "corn ke baare mein batao".to_string())
            .await
            .unwrap();

        // 3. Assert
        assert_eq!(reply.session_id, "s1");
        assert_eq!(reply.language, LanguageTag::Hinglish);
        assert_eq!(reply.text, "Corn ek important crop hai.");

        let history = store.history("s1");
        assert_eq!(history.len(), 2);
        assert_eq!(history[0].content, "corn ke baare mein batao");
        assert_eq!(history[1].content, "Corn ek important crop hai.");

        let prompts = llm.prompts.lock().unwrap();
        assert!(prompts[0].1.as_deref().unwrap().contains("Hinglish"));
    }

    #[tokio::test]
    async fn test_supervisor_llm_error_propagates() {
        let (handle, _llm, store) = setup(Err(AppError::Llm("LLM simulation error".to_string())));

        let result = handle
            .process_message(Some("s1".to_string()), "Hello".to_string())
            .await;

        match result {
            Err(AppError::Llm(msg)) => assert!(msg.contains("LLM simulation error")),
            other => panic!("Expected AppError::Llm, got {:?}", other),
        }
        assert!(store.history("s1").is_empty());
    }

    #[test]
    fn test_build_final_prompt_includes_history() {
        let history = vec![
            ChatMessage::user("namaste"),
            ChatMessage::assistant("Namaste! Kaise madad karun?"),
        ];
        let prompt = build_final_prompt(&history, "gehun kab boyein?");
        assert!(prompt.starts_with("Conversation History:\nUser: namaste\nAssistant: Namaste!"));
        assert!(prompt.ends_with("User: gehun kab boyein?"));

        assert_eq!(build_final_prompt(&[], "hello"), "User: hello");
    }
}
