use crate::actors::supervisor::{SupervisorHandle, EMPTY_RESPONSE_FALLBACK};
use crate::actors::traits::LlmActor;
use crate::brain::LanguageTag;
use crate::config::AppConfig;
use crate::error::AppError;
use crate::models::Role;
use crate::session::{InMemorySessionStore, SessionConfig, SessionStore};
use async_trait::async_trait;
use std::collections::VecDeque;
use std::sync::{Arc, Mutex};
use uuid::Uuid;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

// --- Mock Components ---

/// Replays canned responses and records every prompt it receives.
struct ScriptedLlmActor {
    responses: Mutex<VecDeque<Result<String, AppError>>>,
    prompts: Mutex<Vec<String>>,
}

impl ScriptedLlmActor {
    fn new(responses: Vec<Result<String, AppError>>) -> Self {
        Self {
            responses: Mutex::new(responses.into()),
            prompts: Mutex::new(Vec::new()),
        }
    }

    fn prompts(&self) -> Vec<String> {
        self.prompts.lock().unwrap().clone()
    }
}

#[async_trait]
impl LlmActor for ScriptedLlmActor {
    async fn generate_with_params(
        &self,
        prompt: String,
        _system_prompt: Option<String>,
        _temperature: Option<f32>,
    ) -> Result<String, AppError> {
        self.prompts.lock().unwrap().push(prompt);
        self.responses
            .lock()
            .unwrap()
            .pop_front()
            .unwrap_or_else(|| Ok("Default answer about crops.".to_string()))
    }
}

fn setup(
    config: &AppConfig,
    responses: Vec<Result<String, AppError>>,
) -> (SupervisorHandle, Arc<ScriptedLlmActor>, Arc<InMemorySessionStore>) {
    let llm = Arc::new(ScriptedLlmActor::new(responses));
    let store = Arc::new(InMemorySessionStore::new(&config.session));
    let handle = SupervisorHandle::with_actors(config, Arc::clone(&llm), Arc::clone(&store));
    (handle, llm, store)
}

// --- Tests ---

#[tokio::test]
async fn test_second_turn_sees_history() {
    let (handle, llm, _store) = setup(
        &AppConfig::default(),
        vec![
            Ok("Namaste! Aapke khet ke liye kya madad karun?".to_string()),
            Ok("Gehun ki buvai November mein karein.".to_string()),
        ],
    );
    let session = Some("farm-1".to_string());

    let first = handle
        .process_message(session.clone(), "namaste".to_string())
        .await
        .unwrap();
    assert_eq!(first.language, LanguageTag::Hindi);

    let second = handle
        .process_message(session, "gehun kab boyein?".to_string())
        .await
        .unwrap();
    assert_eq!(second.language, LanguageTag::Hinglish);
    assert_eq!(second.text, "Gehun ki buvai November mein karein.");

    let prompts = llm.prompts();
    assert!(!prompts[0].contains("Conversation History"));
    assert!(prompts[0].contains("only greeted you"));
    assert!(prompts[1].starts_with(
        "Conversation History:\nUser: namaste\nAssistant: Namaste! Aapke khet ke liye kya madad karun?"
    ));
}

#[tokio::test]
async fn test_missing_session_id_gets_uuid() {
    let (handle, _llm, store) = setup(&AppConfig::default(), vec![]);

    let reply = handle
        .process_message(None, "hello".to_string())
        .await
        .unwrap();

    assert!(Uuid::parse_str(&reply.session_id).is_ok());
    assert_eq!(store.history(&reply.session_id).len(), 2);
}

#[tokio::test]
async fn test_blank_message_is_rejected() {
    let (handle, llm, store) = setup(&AppConfig::default(), vec![]);

    let result = handle
        .process_message(Some("s".to_string()), "   ".to_string())
        .await;

    assert!(matches!(result, Err(AppError::Validation(_))));
    assert!(llm.prompts().is_empty());
    assert!(store.is_empty());
}

#[tokio::test]
async fn test_fully_scrubbed_response_uses_fallback() {
    let (handle, _llm, store) = setup(
        &AppConfig::default(),
        vec![Ok("(Please respond in Hindi)".to_string())],
    );

    let reply = handle
        .process_message(Some("s".to_string()), "namaste".to_string())
        .await
        .unwrap();

    assert_eq!(reply.text, EMPTY_RESPONSE_FALLBACK);
    let history = store.history("s");
    assert_eq!(history[1].role, Role::Assistant);
    assert_eq!(history[1].content, EMPTY_RESPONSE_FALLBACK);
}

#[tokio::test]
async fn test_price_warning_reaches_reply() {
    let (handle, _llm, _store) = setup(
        &AppConfig::default(),
        vec![Ok("Tomatoes sell at ₹40 per kg in the mandi today.".to_string())],
    );

    let reply = handle
        .process_message(None, "tomato price?".to_string())
        .await
        .unwrap();

    assert_eq!(reply.warnings.len(), 1);
    assert_eq!(reply.text, "Tomatoes sell at ₹40 per kg in the mandi today.");
}

#[tokio::test]
async fn test_history_cap_applies_across_turns() {
    let config = AppConfig {
        session: SessionConfig {
            max_history_messages: 4,
            max_sessions: 10,
        },
        ..AppConfig::default()
    };
    let (handle, _llm, store) = setup(&config, vec![]);

    for question in ["rice?", "wheat?", "maize?"] {
        handle
            .process_message(Some("s".to_string()), question.to_string())
            .await
            .unwrap();
    }

    let history = store.history("s");
    assert_eq!(history.len(), 4);
    assert_eq!(history[0].content, "wheat?");
}

#[tokio::test]
async fn test_clear_session_and_shutdown() {
    let (handle, _llm, store) = setup(&AppConfig::default(), vec![]);

    handle
        .process_message(Some("s".to_string()), "hello".to_string())
        .await
        .unwrap();
    handle.clear_session("s".to_string()).await.unwrap();
    assert!(store.history("s").is_empty());

    handle.shutdown().await.unwrap();
    let result = handle
        .process_message(Some("s".to_string()), "hello".to_string())
        .await;
    assert!(matches!(result, Err(AppError::Actor(_))));
}

#[tokio::test]
async fn test_end_to_end_with_http_llm() {
    let mock_server = MockServer::start().await;
    Mock::given(method("POST"))
        .and(path("/completion"))
        .respond_with(ResponseTemplate::new(200).set_body_json(serde_json::json!({
            "content": "CRITICAL LANGUAGE MATCHING: Gehun ki buvai November mein karein. \
                        Gehun ki buvai November mein karein."
        })))
        .expect(1)
        .mount(&mock_server)
        .await;

    let mut config = AppConfig::default();
    config.llm.server_url = mock_server.uri();
    let handle = SupervisorHandle::new(&config);

    let reply = handle
        .process_message(None, "gehun kab boyein?".to_string())
        .await
        .unwrap();

    assert_eq!(reply.language, LanguageTag::Hinglish);
    assert_eq!(reply.text, "Gehun ki buvai November mein karein.");
}
