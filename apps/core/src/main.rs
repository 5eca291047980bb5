// AgriBot chat loop
// Reads one message per line from stdin and prints the cleaned reply.

use agribot_core::actors::SupervisorHandle;
use agribot_core::telemetry::init_tracing;
use agribot_core::AppConfig;
use anyhow::Context;
use tokio::io::{AsyncBufReadExt, AsyncWriteExt, BufReader};
use tracing::{error, info, warn};
use uuid::Uuid;

const PROMPT: &str = "you> ";

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv::dotenv().ok();

    let config = AppConfig::from_env().context("Invalid configuration")?;
    init_tracing(config.log_format)?;

    info!(server_url = %config.llm.server_url, "Starting AgriBot");
    if config.llm.auth_token.is_none() {
        warn!("LLAMA_AUTH_TOKEN is not set; requests to llama-server are unauthenticated");
    }

    let supervisor = SupervisorHandle::new(&config);
    let session_id = Uuid::new_v4().to_string();

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    let mut stdout = tokio::io::stdout();

    loop {
        stdout.write_all(PROMPT.as_bytes()).await?;
        stdout.flush().await?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let message = line.trim();
        if message.is_empty() {
            continue;
        }
        if matches!(message, "/quit" | "/exit") {
            break;
        }
        if message == "/reset" {
            supervisor.clear_session(session_id.clone()).await?;
            stdout.write_all(b"(history cleared)\n").await?;
            continue;
        }

        match supervisor
            .process_message(Some(session_id.clone()), message.to_string())
            .await
        {
            Ok(reply) => {
                let output = format!("agribot [{}]> {}\n", reply.language, reply.text);
                stdout.write_all(output.as_bytes()).await?;
            }
            Err(e) => {
                error!("Chat turn failed: {}", e);
                stdout
                    .write_all(b"agribot> I'm sorry, I encountered an error. Please try again.\n")
                    .await?;
            }
        }
    }

    supervisor.shutdown().await.ok();
    info!("AgriBot stopped");
    Ok(())
}
