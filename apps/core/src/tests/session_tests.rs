use crate::models::{ChatMessage, Role};
use crate::session::{InMemorySessionStore, SessionConfig, SessionStore};
use std::sync::Arc;
use std::thread;

fn store_with(max_history_messages: usize, max_sessions: usize) -> InMemorySessionStore {
    InMemorySessionStore::new(&SessionConfig {
        max_history_messages,
        max_sessions,
    })
}

#[test]
fn test_history_is_capped_oldest_first() {
    let store = store_with(3, 10);
    for i in 0..5 {
        store.append("farm", ChatMessage::user(format!("message {}", i)));
    }

    let history = store.history("farm");
    assert_eq!(history.len(), 3);
    assert_eq!(history[0].content, "message 2");
    assert_eq!(history[2].content, "message 4");
}

#[test]
fn test_least_recently_used_session_is_evicted() {
    let store = store_with(10, 2);
    store.append("a", ChatMessage::user("first"));
    store.append("b", ChatMessage::user("second"));

    // Reading "a" makes "b" the least recently used
    assert_eq!(store.history("a").len(), 1);
    store.append("c", ChatMessage::user("third"));

    assert_eq!(store.len(), 2);
    assert_eq!(store.history("a").len(), 1);
    assert!(store.history("b").is_empty());
    assert_eq!(store.history("c").len(), 1);
}

#[test]
fn test_sessions_are_isolated() {
    let store = InMemorySessionStore::default();
    store.append("a", ChatMessage::user("namaste"));
    store.append("b", ChatMessage::assistant("Hello!"));

    assert_eq!(store.history("a")[0].role, Role::User);
    assert_eq!(store.history("b")[0].role, Role::Assistant);
}

#[test]
fn test_concurrent_appends() {
    let store = Arc::new(store_with(100, 100));

    let handles: Vec<_> = (0..8)
        .map(|worker| {
            let store = Arc::clone(&store);
            thread::spawn(move || {
                for i in 0..10 {
                    store.append(
                        &format!("session-{}", worker % 4),
                        ChatMessage::user(format!("{}-{}", worker, i)),
                    );
                }
            })
        })
        .collect();

    for handle in handles {
        handle.join().unwrap();
    }

    assert_eq!(store.len(), 4);
    for session in 0..4 {
        assert_eq!(store.history(&format!("session-{}", session)).len(), 20);
    }
}
