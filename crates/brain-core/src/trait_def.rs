//! The Brain trait definition.

use async_trait::async_trait;

use crate::error::BrainError;
use crate::message::{InboundMessage, OutboundMessage};

/// A trait for processing inbound messages and generating responses.
///
/// This trait is object-safe and can be used with `Box<dyn Brain>`.
#[async_trait]
pub trait Brain: Send + Sync {
    /// Process an inbound message and generate a response.
    async fn process(&self, message: InboundMessage) -> Result<OutboundMessage, BrainError>;

    /// Get a human-readable name for this brain implementation.
    fn name(&self) -> &str;

    /// Check if the brain is ready to process messages.
    async fn is_ready(&self) -> bool {
        true
    }
}
