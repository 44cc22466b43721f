//! Interactive terminal chat with the DeepSeek brain and the built-in tools.
//!
//! Run with: cargo run -p deepseek-brain --bin chat
//!
//! Make sure to set environment variables in .env:
//!   DEEPSEEK_API_KEY - DeepSeek API key for authentication

use std::env;
use std::io::Write;
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use agent_tools::{default_registry, RegistryToolExecutor};
use deepseek_brain::{Brain, DeepSeekBrain, DeepSeekBrainConfig, InboundMessage};
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::info;
use tracing_subscriber::EnvFilter;

const QUIT_WORDS: [&str; 3] = ["quit", "exit", "q"];

#[tokio::main]
async fn main() -> Result<(), Box<dyn std::error::Error>> {
    let _ = dotenvy::dotenv();
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("warn")),
        )
        .init();

    let registry = default_registry()?;
    let executor = RegistryToolExecutor::new(registry);
    let tool_names: Vec<String> = executor
        .registry()
        .get_descriptions()
        .into_iter()
        .map(|(name, desc)| format!("{}: {}", name, desc))
        .collect();

    let config = DeepSeekBrainConfig::from_env()?;
    let brain = DeepSeekBrain::with_tools(config, Arc::new(executor))?;
    let session_id = env::var("CHAT_SESSION_ID").unwrap_or_else(|_| "default".to_string());

    info!("Chat session '{}' using model {}", session_id, brain.config().model);

    println!("=== DeepSeek chat ({}) ===", brain.config().model);
    println!("Commands: /tools, /history, /clear. Type quit, exit or q to leave.\n");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();

    loop {
        print!("You: ");
        std::io::stdout().flush()?;

        let Some(line) = lines.next_line().await? else {
            break;
        };
        let input = line.trim();

        if input.is_empty() {
            continue;
        }
        if QUIT_WORDS.contains(&input.to_lowercase().as_str()) {
            break;
        }

        match input {
            "/tools" => {
                for tool in &tool_names {
                    println!("  - {}", tool);
                }
            }
            "/history" => {
                let history = brain.history(&session_id).await;
                if history.is_empty() {
                    println!("(no history)");
                }
                for msg in history {
                    println!("[{}] {}", msg.role, msg.content);
                }
            }
            "/clear" => {
                brain.clear_history(&session_id).await;
                println!("History cleared.");
            }
            _ => {
                let message = InboundMessage::new(&session_id, input, unix_timestamp());
                match brain.process(message).await {
                    Ok(reply) => println!("Assistant: {}\n", reply.text),
                    Err(e) => eprintln!("Error: {}\n", e),
                }
            }
        }
    }

    println!("Goodbye!");
    Ok(())
}

fn unix_timestamp() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .map(|d| d.as_secs())
        .unwrap_or(0)
}
