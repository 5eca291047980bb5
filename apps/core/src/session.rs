//! Bounded chat history, keyed by session id.

use lru::LruCache;
use serde::{Deserialize, Serialize};
use std::collections::VecDeque;
use std::num::NonZeroUsize;
use std::sync::{Mutex, MutexGuard};
use tracing::debug;
use validator::Validate;

use crate::models::ChatMessage;

/// Limits applied by the in-memory store.
#[derive(Debug, Clone, Serialize, Deserialize, Validate)]
pub struct SessionConfig {
    /// Messages kept per session; the oldest are dropped first.
    #[validate(range(min = 1))]
    pub max_history_messages: usize,
    /// Sessions kept in total; the least recently used is evicted.
    #[validate(range(min = 1))]
    pub max_sessions: usize,
}

impl Default for SessionConfig {
    fn default() -> Self {
        Self {
            max_history_messages: 10,
            max_sessions: 1000,
        }
    }
}

/// Storage for per-session chat history.
///
/// Injected into the chat supervisor so the history backend can be swapped
/// (and so tests can inspect what a turn stored).
pub trait SessionStore: Send + Sync + 'static {
    /// Append a message to a session, creating the session if needed.
    fn append(&self, session_id: &str, message: ChatMessage);

    /// Messages of a session, oldest first. Unknown sessions are empty.
    fn history(&self, session_id: &str) -> Vec<ChatMessage>;

    /// Forget a session entirely.
    fn clear(&self, session_id: &str);

    /// Number of sessions currently held.
    fn len(&self) -> usize;

    fn is_empty(&self) -> bool {
        self.len() == 0
    }
}

/// Process-local store with explicit eviction on both axes.
pub struct InMemorySessionStore {
    sessions: Mutex<LruCache<String, VecDeque<ChatMessage>>>,
    max_history: usize,
}

impl Default for InMemorySessionStore {
    fn default() -> Self {
        Self::new(&SessionConfig::default())
    }
}

impl InMemorySessionStore {
    const MIN_CAPACITY: NonZeroUsize = match NonZeroUsize::new(1) {
        Some(size) => size,
        None => panic!("Capacity must be non-zero"),
    };

    pub fn new(config: &SessionConfig) -> Self {
        let capacity = NonZeroUsize::new(config.max_sessions).unwrap_or(Self::MIN_CAPACITY);
        Self {
            sessions: Mutex::new(LruCache::new(capacity)),
            max_history: config.max_history_messages.max(1),
        }
    }

    // A panic while holding the lock cannot leave the cache half-written
    fn lock(&self) -> MutexGuard<'_, LruCache<String, VecDeque<ChatMessage>>> {
        self.sessions.lock().unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

impl SessionStore for InMemorySessionStore {
    fn append(&self, session_id: &str, message: ChatMessage) {
        let mut sessions = self.lock();

        if !sessions.contains(session_id) {
            if let Some((evicted, _)) = sessions.push(session_id.to_string(), VecDeque::new()) {
                if evicted != session_id {
                    debug!(session = %evicted, "Evicted least recently used session");
                }
            }
        }

        if let Some(history) = sessions.get_mut(session_id) {
            history.push_back(message);
            while history.len() > self.max_history {
                history.pop_front();
            }
        }
    }

    fn history(&self, session_id: &str) -> Vec<ChatMessage> {
        self.lock()
            .get(session_id)
            .map(|history| history.iter().cloned().collect())
            .unwrap_or_default()
    }

    fn clear(&self, session_id: &str) {
        self.lock().pop(session_id);
    }

    fn len(&self) -> usize {
        self.lock().len()
    }
}
