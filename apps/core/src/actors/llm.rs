use crate::actors::messages::LlmMessage;
use crate::actors::traits::LlmActor;
use crate::config::LlmConfig;
use crate::error::AppError;
use crate::models::ModelConfig;
use async_trait::async_trait;
use reqwest::Client;
use serde_json::json;
use std::time::Duration;
use tokio::sync::{mpsc, oneshot};
use tokio::time::timeout;
use tracing::{debug, error, info};

/// Extra time the handle waits beyond the HTTP timeout before giving up on the runner.
const HANDLE_GRACE: Duration = Duration::from_secs(5);

/// A handle to the `LlmActor`.
///
/// This struct provides a public, cloneable interface for sending messages to the
/// running LLM actor. It abstracts away the `mpsc::Sender`.
#[derive(Clone)]
pub struct LlmActorHandle {
    sender: mpsc::Sender<LlmMessage>,
    reply_timeout: Duration,
}

impl LlmActorHandle {
    /// Creates a new `LlmActor` talking to an already running `llama-server`.
    ///
    /// This will spawn the `LlmActorRunner` in a new Tokio task.
    pub fn new(config: &LlmConfig, model: &ModelConfig) -> Self {
        let (sender, receiver) = mpsc::channel(32);
        let actor = LlmActorRunner::new(receiver, config, model);
        tokio::spawn(async move { actor.run().await });
        Self {
            sender,
            reply_timeout: config.request_timeout() + HANDLE_GRACE,
        }
    }

    /// A convenience method for generating text with default parameters.
    pub async fn generate(&self, prompt: String) -> Result<String, AppError> {
        self.generate_with_params(prompt, None, None).await
    }
}

#[async_trait]
impl LlmActor for LlmActorHandle {
    async fn generate_with_params(
        &self,
        prompt: String,
        system_prompt: Option<String>,
        temperature: Option<f32>,
    ) -> Result<String, AppError> {
        let (send, recv) = oneshot::channel();
        let msg = LlmMessage::GenerateWithParams {
            prompt,
            system_prompt,
            temperature,
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
}

// --- Actor Runner (Internal Logic) ---
struct LlmActorRunner {
    receiver: mpsc::Receiver<LlmMessage>,
    server_url: String,
    client: Client,
    auth_token: Option<String>,
    n_predict: u32,
    request_timeout: Duration,
}

impl LlmActorRunner {
    fn new(receiver: mpsc::Receiver<LlmMessage>, config: &LlmConfig, model: &ModelConfig) -> Self {
        Self {
            receiver,
            server_url: config.server_url.trim_end_matches('/').to_string(),
            client: Client::new(),
            auth_token: config.auth_token.clone(),
            n_predict: model.max_tokens,
            request_timeout: config.request_timeout(),
        }
    }

    async fn run(mut self) {
        info!(server_url = %self.server_url, "LlmActor started");

        while let Some(msg) = self.receiver.recv().await {
            self.handle_message(msg).await;
        }

        info!("LlmActor stopped");
    }

    fn build_request(&self, endpoint: &str, payload: &serde_json::Value) -> reqwest::RequestBuilder {
        let request = self
            .client
            .post(format!("{}/{}", self.server_url, endpoint))
            .json(payload);

        match &self.auth_token {
            Some(token) => request.bearer_auth(token),
            None => request,
        }
    }

    async fn handle_message(&mut self, msg: LlmMessage) {
        match msg {
            LlmMessage::GenerateWithParams {
                prompt,
                system_prompt,
                temperature,
                responder,
            } => {
                let result = self
                    .generate_completion(prompt, system_prompt, temperature)
                    .await;
                if let Err(e) = &result {
                    error!("Completion failed: {}", e);
                }
                let _ = responder.send(result);
            }
        }
    }

    async fn generate_completion(
        &self,
        prompt: String,
        system_prompt: Option<String>,
        temperature: Option<f32>,
    ) -> Result<String, AppError> {
        debug!(prompt_chars = prompt.chars().count(), "LLM generating");

        let mut payload = json!({
            "prompt": prompt,
            "stream": false,
            "n_predict": self.n_predict
        });

        if let Some(system) = system_prompt {
            payload["system_prompt"] = json!(system);
        }

        if let Some(temp) = temperature {
            payload["temperature"] = json!(temp);
        }

        let request_future = self.build_request("completion", &payload).send();

        let res = timeout(self.request_timeout, request_future).await??;

        let status = res.status();

        if !status.is_success() {
            let body = res.text().await.unwrap_or_default();
            return Err(AppError::Llm(format!(
                "Completion request failed with status {}: {}",
                status, body
            )));
        }

        let json: serde_json::Value = res.json().await?;

        json["content"]
            .as_str()
            .map(str::to_string)
            .ok_or_else(|| AppError::Llm("Completion response has no content field".to_string()))
    }
}
