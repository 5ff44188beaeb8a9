//! Per-user placement sessions.

use std::collections::HashMap;

/// Tracks which image each user has armed for their next placement attempt.
///
/// Each user holds at most one session. Starting a new session silently
/// replaces the previous one, and an attempt consumes the session whether
/// the placement succeeds or not.
#[derive(Debug)]
pub struct PlacementSessions {
    entries: HashMap<String, String>,
}

impl PlacementSessions {
    /// Creates an empty session tracker.
    #[must_use]
    pub fn new() -> Self {
        Self {
            entries: HashMap::new(),
        }
    }

    /// Arms `user` to place `image` on their next attempt, replacing any
    /// session already in progress for that user.
    pub fn begin(&mut self, user: &str, image: &str) {
        let _ = self.entries.insert(user.to_owned(), image.to_owned());
    }

    /// Removes and returns the armed image for `user`.
    ///
    /// `None` means no attempt is in progress; callers treat that as a
    /// no-op rather than an error.
    pub fn consume(&mut self, user: &str) -> Option<String> {
        self.entries.remove(user)
    }

    /// Reports whether `user` currently has a placement armed.
    #[must_use]
    pub fn is_placing(&self, user: &str) -> bool {
        self.entries.contains_key(user)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn begin_overwrites_and_consume_returns_latest_once() {
        let mut sessions = PlacementSessions::new();

        sessions.begin("alice", "a.png");
        sessions.begin("alice", "b.png");

        assert_eq!(sessions.consume("alice"), Some("b.png".to_owned()));
        assert_eq!(sessions.consume("alice"), None, "session is single-use");
    }

    #[test]
    fn consume_without_begin_is_a_no_op() {
        let mut sessions = PlacementSessions::new();
        assert_eq!(sessions.consume("bob"), None);
    }

    #[test]
    fn users_hold_independent_sessions() {
        let mut sessions = PlacementSessions::new();

        sessions.begin("alice", "a.png");
        sessions.begin("bob", "b.png");

        assert!(sessions.is_placing("alice"));
        assert_eq!(sessions.consume("bob"), Some("b.png".to_owned()));
        assert!(sessions.is_placing("alice"), "other users stay armed");
        assert!(!sessions.is_placing("bob"));
    }
}
