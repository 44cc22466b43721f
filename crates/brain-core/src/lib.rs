//! Core traits and types shared by brains and tool executors.
//!
//! This crate defines:
//!
//! - [`Brain`] - The trait every LLM-backed brain implements
//! - [`InboundMessage`] / [`OutboundMessage`] - Message types for input/output
//! - [`BrainError`] - Error types for brain operations
//! - [`ToolExecutor`] - Trait for executing tool calls made by a model
//! - [`ConversationHistory`] - Per-session conversation memory
//!
//! # Example
//!
//! ```rust
//! use brain_core::{Brain, BrainError, InboundMessage, OutboundMessage};
//! use async_trait::async_trait;
//!
//! struct MyBrain;
//!
//! #[async_trait]
//! impl Brain for MyBrain {
//!     async fn process(&self, message: InboundMessage) -> Result<OutboundMessage, BrainError> {
//!         Ok(OutboundMessage::reply_to(&message, "Hello!"))
//!     }
//!
//!     fn name(&self) -> &str {
//!         "MyBrain"
//!     }
//! }
//! ```

mod error;
mod history;
mod message;
mod prompt;
mod tools;
mod trait_def;

pub use error::BrainError;
pub use history::{ConversationHistory, HistoryMessage};
pub use message::{InboundMessage, OutboundMessage};
pub use prompt::hash_prompt;
pub use tools::{
    FunctionDefinition, ToolDefinition, ToolExecutor, ToolRequest, ToolRequestMeta, ToolResult,
};
pub use trait_def::Brain;

// Re-export async_trait for convenience
pub use async_trait::async_trait;
