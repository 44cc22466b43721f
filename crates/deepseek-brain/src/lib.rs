//! DeepSeek-backed brain with tool calling.
//!
//! [`DeepSeekBrain`] sends each message, together with the session's recent
//! history, to DeepSeek's OpenAI-compatible chat completions endpoint. When
//! built with a `ToolExecutor` (usually an `agent_tools::RegistryToolExecutor`),
//! the tool definitions ride along with every request and any `tool_calls`
//! in the reply are executed and fed back until the model answers in text.
//!
//! # Usage
//!
//! ```rust,no_run
//! use std::sync::Arc;
//!
//! use agent_tools::{default_registry, RegistryToolExecutor};
//! use deepseek_brain::{Brain, DeepSeekBrain, DeepSeekBrainConfig, InboundMessage};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = DeepSeekBrainConfig::from_env()?;
//!     let tools = RegistryToolExecutor::new(default_registry()?);
//!     let brain = DeepSeekBrain::with_tools(config, Arc::new(tools))?;
//!
//!     let reply = brain
//!         .process(InboundMessage::new("demo", "What is 2 + 3 * 4?", 0))
//!         .await?;
//!     println!("{}", reply.text);
//!     Ok(())
//! }
//! ```
//!
//! The `chat` binary wraps this in an interactive terminal loop.

mod api_types;
mod brain;
mod config;

pub use api_types::{
    ApiError, ApiErrorDetails, ChatCompletionRequest, ChatCompletionResponse, ChatMessage, Choice,
    FunctionCall, ResponseMessage, ToolCall, Usage,
};
pub use brain::DeepSeekBrain;
pub use config::{DeepSeekBrainConfig, DeepSeekBrainConfigBuilder};

// Re-export brain-core types for convenience
pub use brain_core::{
    async_trait, Brain, BrainError, ConversationHistory, HistoryMessage, InboundMessage,
    OutboundMessage, ToolExecutor,
};
