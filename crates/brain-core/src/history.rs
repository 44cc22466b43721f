//! Conversation session store.
//!
//! Each session (thread) id maps to an ordered list of user/assistant
//! messages. Histories are trimmed to a fixed number of turns, and the least
//! recently used session is evicted once the session limit is reached.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tokio::sync::RwLock;

/// Default maximum number of sessions to track before LRU eviction.
const DEFAULT_MAX_SESSIONS: usize = 1000;

/// One stored turn half: what the user said, or what the model answered.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct HistoryMessage {
    /// `"user"` or `"assistant"`.
    pub role: String,
    pub content: String,
}

impl HistoryMessage {
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }

    pub fn assistant(content: impl Into<String>) -> Self {
        Self {
            role: "assistant".to_string(),
            content: content.into(),
        }
    }
}

/// Session store shared by a brain's concurrent `process` calls.
///
/// Reads count as use: `get` moves a session to the most recent end, so an
/// active chat is never the one evicted.
///
/// # Example
///
/// ```rust
/// use brain_core::ConversationHistory;
///
/// #[tokio::main(flavor = "current_thread")]
/// async fn main() {
///     let history = ConversationHistory::new(5); // Keep 5 turns
///
///     history.add_exchange("default", "Hello", "Hi there!").await;
///     history.add_exchange("default", "What did I say?", "You said hello.").await;
///
///     let messages = history.get("default").await;
///     assert_eq!(messages.len(), 4); // 2 turns = 4 messages
/// }
/// ```
#[derive(Debug)]
pub struct ConversationHistory {
    /// Oldest-used session first.
    histories: RwLock<IndexMap<String, Vec<HistoryMessage>>>,
    /// Exchanges (user + assistant pairs) kept per session.
    max_turns: usize,
    max_sessions: usize,
}

impl Default for ConversationHistory {
    fn default() -> Self {
        Self::new(10)
    }
}

impl ConversationHistory {
    /// Store keeping `max_turns` exchanges per session, for up to 1000 sessions.
    pub fn new(max_turns: usize) -> Self {
        Self::with_limits(max_turns, DEFAULT_MAX_SESSIONS)
    }

    pub fn with_limits(max_turns: usize, max_sessions: usize) -> Self {
        Self {
            histories: RwLock::new(IndexMap::new()),
            max_turns,
            max_sessions,
        }
    }

    /// Messages of a session, oldest first. Unknown sessions are empty.
    pub async fn get(&self, session_id: &str) -> Vec<HistoryMessage> {
        let mut histories = self.histories.write().await;

        match histories.shift_remove(session_id) {
            Some(entry) => {
                let result = entry.clone();
                histories.insert(session_id.to_string(), entry);
                result
            }
            None => Vec::new(),
        }
    }

    /// Record one exchange, dropping the oldest exchanges past `max_turns`
    /// and the least recently used session past `max_sessions`.
    pub async fn add_exchange(&self, session_id: &str, user_msg: &str, assistant_msg: &str) {
        let mut histories = self.histories.write().await;

        let mut history = histories.shift_remove(session_id).unwrap_or_default();
        history.push(HistoryMessage::user(user_msg));
        history.push(HistoryMessage::assistant(assistant_msg));

        let max_messages = self.max_turns * 2;
        if history.len() > max_messages {
            let to_remove = history.len() - max_messages;
            history.drain(0..to_remove);
        }

        histories.insert(session_id.to_string(), history);

        while histories.len() > self.max_sessions {
            histories.shift_remove_index(0);
        }
    }

    /// Forget one session.
    pub async fn clear(&self, session_id: &str) {
        self.histories.write().await.shift_remove(session_id);
    }

    pub async fn clear_all(&self) {
        self.histories.write().await.clear();
    }

    /// Number of sessions currently tracked.
    pub async fn session_count(&self) -> usize {
        self.histories.read().await.len()
    }
}
