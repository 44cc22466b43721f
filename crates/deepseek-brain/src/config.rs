//! Configuration for DeepSeekBrain.

use brain_core::BrainError;
use std::env;
use std::path::Path;

/// Default system prompt file name.
pub const DEFAULT_PROMPT_FILE: &str = "SYSTEM_PROMPT.md";

pub const DEFAULT_API_URL: &str = "https://api.deepseek.com";
pub const DEFAULT_MODEL: &str = "deepseek-chat";

/// Prompt used when neither `DEEPSEEK_SYSTEM_PROMPT` nor a prompt file is set.
pub const DEFAULT_SYSTEM_PROMPT: &str = "You are a friendly and helpful assistant. \
You can answer questions, hold a conversation, give suggestions and remember what was \
said earlier in the conversation. When a question needs a calculation, a unit conversion, \
the current date or time, text processing, random values or a weather forecast, call the \
matching tool instead of guessing. Keep a friendly, professional tone.";

/// Configuration for DeepSeekBrain.
#[derive(Debug, Clone)]
pub struct DeepSeekBrainConfig {
    /// DeepSeek API URL (without the `/chat/completions` path).
    pub api_url: String,

    /// API key for authentication.
    pub api_key: String,

    /// Model name to use.
    pub model: String,

    /// System prompt sent ahead of every conversation.
    pub system_prompt: Option<String>,

    /// Maximum tokens for response.
    pub max_tokens: Option<u32>,

    /// Temperature for generation (0.0 - 2.0).
    pub temperature: Option<f32>,

    /// Maximum number of conversation turns to keep in history.
    pub max_history_turns: usize,

    /// Maximum rounds of tool calls answered per user message.
    pub max_tool_rounds: usize,
}

impl Default for DeepSeekBrainConfig {
    fn default() -> Self {
        Self {
            api_url: DEFAULT_API_URL.to_string(),
            api_key: String::new(),
            model: DEFAULT_MODEL.to_string(),
            system_prompt: Some(DEFAULT_SYSTEM_PROMPT.to_string()),
            max_tokens: Some(1000),
            temperature: Some(0.7),
            max_history_turns: 10,
            max_tool_rounds: 5,
        }
    }
}

impl DeepSeekBrainConfig {
    /// Create configuration from environment variables.
    ///
    /// Required environment variables:
    /// - `DEEPSEEK_API_KEY` - API key for authentication
    ///
    /// Optional environment variables:
    /// - `DEEPSEEK_API_URL` - API URL (default: https://api.deepseek.com)
    /// - `MODEL_NAME` - Model name (default: deepseek-chat)
    /// - `TEMPERATURE` - Temperature (default: 0.7)
    /// - `MAX_TOKENS` - Max tokens (default: 1000)
    /// - `DEEPSEEK_SYSTEM_PROMPT` - System prompt (overrides prompt file)
    /// - `DEEPSEEK_PROMPT_FILE` - Path to system prompt file (default: SYSTEM_PROMPT.md)
    /// - `MAX_HISTORY_TURNS` - Max history turns (default: 10)
    /// - `MAX_TOOL_ROUNDS` - Max tool-call rounds per message (default: 5)
    ///
    /// System prompt priority:
    /// 1. `DEEPSEEK_SYSTEM_PROMPT` env var (if set)
    /// 2. Contents of prompt file (if exists and non-empty)
    /// 3. [`DEFAULT_SYSTEM_PROMPT`]
    pub fn from_env() -> Result<Self, BrainError> {
        let api_key = env::var("DEEPSEEK_API_KEY")
            .ok()
            .filter(|key| !key.trim().is_empty())
            .ok_or_else(|| BrainError::Configuration("DEEPSEEK_API_KEY not set".to_string()))?;

        let api_url = env::var("DEEPSEEK_API_URL").unwrap_or_else(|_| DEFAULT_API_URL.to_string());

        let model = env::var("MODEL_NAME").unwrap_or_else(|_| DEFAULT_MODEL.to_string());

        let system_prompt = if let Ok(prompt) = env::var("DEEPSEEK_SYSTEM_PROMPT") {
            prompt
        } else {
            let prompt_file = env::var("DEEPSEEK_PROMPT_FILE")
                .unwrap_or_else(|_| DEFAULT_PROMPT_FILE.to_string());
            load_prompt_file(&prompt_file).unwrap_or_else(|| DEFAULT_SYSTEM_PROMPT.to_string())
        };

        let temperature = parse_var("TEMPERATURE")?.or(Some(0.7));
        let max_tokens = parse_var("MAX_TOKENS")?.or(Some(1000));
        let max_history_turns = parse_var("MAX_HISTORY_TURNS")?.unwrap_or(10);
        let max_tool_rounds = parse_var("MAX_TOOL_ROUNDS")?.unwrap_or(5);

        Ok(Self {
            api_url,
            api_key,
            model,
            system_prompt: Some(system_prompt),
            max_tokens,
            temperature,
            max_history_turns,
            max_tool_rounds,
        })
    }

    /// Create a new config builder.
    pub fn builder() -> DeepSeekBrainConfigBuilder {
        DeepSeekBrainConfigBuilder::default()
    }

    /// Chat completions endpoint.
    pub fn completions_url(&self) -> String {
        format!("{}/chat/completions", self.api_url.trim_end_matches('/'))
    }
}

/// Parse an optional numeric env var. A set but malformed value is an error.
fn parse_var<T: std::str::FromStr>(name: &str) -> Result<Option<T>, BrainError> {
    match env::var(name) {
        Ok(raw) => raw.trim().parse().map(Some).map_err(|_| {
            BrainError::Configuration(format!("{} has an invalid value: {}", name, raw))
        }),
        Err(_) => Ok(None),
    }
}

/// Builder for DeepSeekBrainConfig.
#[derive(Debug, Default)]
pub struct DeepSeekBrainConfigBuilder {
    config: DeepSeekBrainConfig,
}

impl DeepSeekBrainConfigBuilder {
    /// Set the API key.
    pub fn api_key(mut self, key: impl Into<String>) -> Self {
        self.config.api_key = key.into();
        self
    }

    /// Set the API URL.
    pub fn api_url(mut self, url: impl Into<String>) -> Self {
        self.config.api_url = url.into();
        self
    }

    /// Set the model name.
    pub fn model(mut self, model: impl Into<String>) -> Self {
        self.config.model = model.into();
        self
    }

    /// Set the system prompt.
    pub fn system_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.config.system_prompt = Some(prompt.into());
        self
    }

    /// Send no system prompt.
    pub fn no_system_prompt(mut self) -> Self {
        self.config.system_prompt = None;
        self
    }

    /// Set the max tokens.
    pub fn max_tokens(mut self, tokens: u32) -> Self {
        self.config.max_tokens = Some(tokens);
        self
    }

    /// Set the temperature.
    pub fn temperature(mut self, temp: f32) -> Self {
        self.config.temperature = Some(temp);
        self
    }

    /// Set the max history turns.
    pub fn max_history_turns(mut self, turns: usize) -> Self {
        self.config.max_history_turns = turns;
        self
    }

    /// Set the max tool-call rounds per message.
    pub fn max_tool_rounds(mut self, rounds: usize) -> Self {
        self.config.max_tool_rounds = rounds;
        self
    }

    /// Build the configuration.
    pub fn build(self) -> DeepSeekBrainConfig {
        self.config
    }

    /// Load system prompt from a file.
    ///
    /// If the file exists and is non-empty, sets the system prompt.
    pub fn load_prompt_file(mut self, path: impl AsRef<Path>) -> Self {
        if let Some(prompt) = load_prompt_file(path) {
            self.config.system_prompt = Some(prompt);
        }
        self
    }
}

/// Load a prompt file, returning None if not found or empty.
fn load_prompt_file(path: impl AsRef<Path>) -> Option<String> {
    let content = std::fs::read_to_string(path.as_ref()).ok()?;
    let trimmed = content.trim();
    if trimmed.is_empty() {
        None
    } else {
        Some(trimmed.to_string())
    }
}
