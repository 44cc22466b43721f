//! DeepSeekBrain implementation using the DeepSeek chat completions API.

use std::sync::Arc;

use async_trait::async_trait;
use brain_core::{
    hash_prompt, Brain, BrainError, ConversationHistory, HistoryMessage, InboundMessage,
    OutboundMessage, ToolDefinition, ToolExecutor, ToolRequest, ToolRequestMeta, ToolResult,
};
use reqwest::Client;
use tracing::{debug, info, warn};

use crate::api_types::{
    ApiError, ChatCompletionRequest, ChatCompletionResponse, ChatMessage, ToolCall,
};
use crate::config::DeepSeekBrainConfig;

/// Default HTTP timeout for API requests (60 seconds).
const DEFAULT_HTTP_TIMEOUT_SECS: u64 = 60;

const EMPTY_REPLY: &str = "I apologize, but I couldn't generate a response.";
const TOOL_LIMIT_REPLY: &str =
    "I apologize, but I couldn't finish that request within the allowed number of tool calls.";

/// A brain backed by DeepSeek's OpenAI-compatible API.
///
/// Keeps a per-session conversation history. When constructed with a
/// [`ToolExecutor`], the executor's definitions are offered to the model and
/// any tool calls it makes are answered before the final reply.
pub struct DeepSeekBrain {
    client: Client,
    config: DeepSeekBrainConfig,
    history: ConversationHistory,
    tools: Option<Arc<dyn ToolExecutor>>,
    system_prompt_hash: Option<String>,
}

impl DeepSeekBrain {
    /// Create a brain without tools.
    pub fn new(config: DeepSeekBrainConfig) -> Result<Self, BrainError> {
        Self::build(config, None)
    }

    /// Create a brain whose model may call the executor's tools.
    pub fn with_tools(
        config: DeepSeekBrainConfig,
        tools: Arc<dyn ToolExecutor>,
    ) -> Result<Self, BrainError> {
        Self::build(config, Some(tools))
    }

    fn build(
        config: DeepSeekBrainConfig,
        tools: Option<Arc<dyn ToolExecutor>>,
    ) -> Result<Self, BrainError> {
        if config.api_key.is_empty() {
            return Err(BrainError::Configuration("API key is empty".to_string()));
        }

        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(DEFAULT_HTTP_TIMEOUT_SECS))
            .build()
            .map_err(|e| BrainError::Configuration(format!("Failed to create HTTP client: {}", e)))?;

        let history = ConversationHistory::new(config.max_history_turns);
        let system_prompt_hash = config.system_prompt.as_deref().map(hash_prompt);

        if let Some(ref hash) = system_prompt_hash {
            info!("DeepSeekBrain system prompt fingerprint: {}", hash);
        }

        info!(
            "DeepSeekBrain initialized with model: {}, tools: {}",
            config.model,
            tools
                .as_ref()
                .map(|t| t.supported_tools().join(", "))
                .unwrap_or_else(|| "none".to_string())
        );

        Ok(Self {
            client,
            config,
            history,
            tools,
            system_prompt_hash,
        })
    }

    /// Create a DeepSeekBrain without tools from environment variables.
    ///
    /// See [`DeepSeekBrainConfig::from_env`] for required environment variables.
    pub fn from_env() -> Result<Self, BrainError> {
        Self::new(DeepSeekBrainConfig::from_env()?)
    }

    /// Get the configuration.
    pub fn config(&self) -> &DeepSeekBrainConfig {
        &self.config
    }

    /// Get the system prompt fingerprint, if configured.
    pub fn system_prompt_hash(&self) -> Option<&str> {
        self.system_prompt_hash.as_deref()
    }

    /// Stored exchanges for a session, oldest first.
    pub async fn history(&self, session_id: &str) -> Vec<HistoryMessage> {
        self.history.get(session_id).await
    }

    /// Clear conversation history for a specific session.
    pub async fn clear_history(&self, session_id: &str) {
        self.history.clear(session_id).await;
    }

    /// Clear all conversation histories.
    pub async fn clear_all_history(&self) {
        self.history.clear_all().await;
    }

    /// Build the messages array for a chat completion request.
    async fn build_messages(&self, session_id: &str, user_text: &str) -> Vec<ChatMessage> {
        let mut messages = Vec::new();

        if let Some(ref system_prompt) = self.config.system_prompt {
            messages.push(ChatMessage::system(system_prompt.clone()));
        }

        for msg in self.history.get(session_id).await {
            messages.push(history_to_chat(msg));
        }

        messages.push(ChatMessage::user(user_text));

        messages
    }

    fn tool_definitions(&self) -> Option<Vec<ToolDefinition>> {
        self.tools
            .as_ref()
            .map(|tools| tools.definitions())
            .filter(|definitions| !definitions.is_empty())
    }

    /// Make a chat completion request to the DeepSeek API.
    async fn chat_completion(
        &self,
        messages: &[ChatMessage],
        tools: Option<Vec<ToolDefinition>>,
    ) -> Result<ChatCompletionResponse, BrainError> {
        let url = self.config.completions_url();

        let request = ChatCompletionRequest {
            model: self.config.model.clone(),
            messages: messages.to_vec(),
            max_tokens: self.config.max_tokens,
            temperature: self.config.temperature,
            tools,
            stream: false,
        };

        debug!(
            "Sending request to DeepSeek API ({} messages)",
            request.messages.len()
        );

        let response = self
            .client
            .post(&url)
            .bearer_auth(&self.config.api_key)
            .json(&request)
            .send()
            .await
            .map_err(|e| BrainError::Network(format!("Failed to send request: {}", e)))?;

        let status = response.status();

        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            let detail = serde_json::from_str::<ApiError>(&error_text)
                .map(|api_error| api_error.error.message)
                .unwrap_or(error_text);

            return Err(BrainError::ProcessingFailed(format!(
                "API error ({}): {}",
                status.as_u16(),
                detail
            )));
        }

        let completion: ChatCompletionResponse = response
            .json()
            .await
            .map_err(|e| BrainError::ProcessingFailed(format!("Failed to parse response: {}", e)))?;

        if let Some(ref usage) = completion.usage {
            debug!(
                "Token usage - prompt: {}, completion: {}, total: {}",
                usage.prompt_tokens, usage.completion_tokens, usage.total_tokens
            );
        }

        Ok(completion)
    }

    /// Answer each tool call, returning one `tool` message per call.
    async fn run_tool_calls(&self, session_id: &str, calls: &[ToolCall]) -> Vec<ChatMessage> {
        let mut results = Vec::with_capacity(calls.len());

        for call in calls {
            let result = match (self.tools.as_ref(), tool_request(call, session_id)) {
                (Some(tools), Ok(request)) => {
                    info!("Calling tool '{}' ({})", call.function.name, call.id);
                    tools.execute(request).await
                }
                (None, _) => ToolResult::error(&call.id, "No tools are available"),
                (_, Err(result)) => result,
            };

            if !result.success {
                warn!("Tool '{}' failed: {}", call.function.name, result.content);
            }
            results.push(ChatMessage::tool(result.tool_call_id, result.content));
        }

        results
    }
}

/// Turn a model tool call into a request, or an error result when the
/// arguments are not a JSON object.
fn tool_request(call: &ToolCall, session_id: &str) -> Result<ToolRequest, ToolResult> {
    ToolRequest::from_call(
        call.id.clone(),
        call.function.name.clone(),
        &call.function.arguments,
    )
    .map(|request| {
        request.with_metadata(ToolRequestMeta {
            session_id: Some(session_id.to_string()),
        })
    })
    .map_err(|e| ToolResult::error(&call.id, format!("Invalid tool arguments: {}", e)))
}

fn history_to_chat(msg: HistoryMessage) -> ChatMessage {
    match msg.role.as_str() {
        "assistant" => ChatMessage::assistant(msg.content),
        _ => ChatMessage::user(msg.content),
    }
}

/// Non-blank reply text.
fn reply_text(content: Option<String>) -> Option<String> {
    content.filter(|text| !text.trim().is_empty())
}

#[async_trait]
impl Brain for DeepSeekBrain {
    async fn process(&self, message: InboundMessage) -> Result<OutboundMessage, BrainError> {
        let session_id = &message.session_id;
        let user_text = &message.text;

        debug!("Processing message in session {}: {}", session_id, user_text);

        let mut messages = self.build_messages(session_id, user_text).await;
        let tools = self.tool_definitions();
        let mut last_text: Option<String> = None;
        let mut rounds = 0;

        let response_text = loop {
            let completion = self.chat_completion(&messages, tools.clone()).await?;

            let choice = completion.choices.into_iter().next().ok_or_else(|| {
                BrainError::ProcessingFailed("Response contained no choices".to_string())
            })?;

            let text = reply_text(choice.message.content);
            let calls = choice.message.tool_calls.unwrap_or_default();

            if calls.is_empty() {
                break text.unwrap_or_else(|| {
                    warn!("No content in response, using default");
                    EMPTY_REPLY.to_string()
                });
            }

            if rounds >= self.config.max_tool_rounds {
                warn!(
                    "Tool round limit ({}) reached in session {}",
                    self.config.max_tool_rounds, session_id
                );
                break text
                    .or(last_text)
                    .unwrap_or_else(|| TOOL_LIMIT_REPLY.to_string());
            }

            rounds += 1;
            debug!("Tool round {}: {} call(s)", rounds, calls.len());

            if text.is_some() {
                last_text = text.clone();
            }
            let results = self.run_tool_calls(session_id, &calls).await;
            messages.push(ChatMessage::assistant_tool_calls(text, calls));
            messages.extend(results);
        };

        self.history
            .add_exchange(session_id, user_text, &response_text)
            .await;

        info!(
            "Generated response for session {}: {} chars",
            session_id,
            response_text.len()
        );

        Ok(OutboundMessage::reply_to(&message, response_text))
    }

    fn name(&self) -> &str {
        "DeepSeekBrain"
    }
}
