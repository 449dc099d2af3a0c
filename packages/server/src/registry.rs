//! Session registry: which usernames are currently online.
//!
//! The registry is a plain map owned by the server state, mutated only
//! under the room lock. It performs no normalization of usernames; clients
//! are expected to pre-clean input, so names differing only by whitespace
//! are distinct keys.

use std::collections::HashMap;

use thiserror::Error;

use crate::state::ConnId;

/// Registration failures, surfaced to the requesting connection only.
/// The `Display` string is sent verbatim as the wire `err` message.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum RegistrationError {
    #[error("This username already exists. Please use another username!")]
    UsernameTaken,
}

/// Map of active usernames to the connection holding each one.
///
/// Invariant: `user_count == active_users.len()` at all times; both are
/// updated together on every mutation.
#[derive(Debug, Default)]
pub struct SessionRegistry {
    active_users: HashMap<String, ConnId>,
    user_count: usize,
}

impl SessionRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Claim `username` for `conn`. Fails if the exact string is already
    /// taken; the first registrant wins. Returns the new user count.
    pub fn try_register(
        &mut self,
        username: &str,
        conn: ConnId,
    ) -> Result<usize, RegistrationError> {
        if self.active_users.contains_key(username) {
            return Err(RegistrationError::UsernameTaken);
        }
        self.active_users.insert(username.to_string(), conn);
        self.user_count += 1;
        debug_assert_eq!(self.user_count, self.active_users.len());
        Ok(self.user_count)
    }

    /// Release `username` if present. Absent names are a silent no-op so
    /// cleanup may run twice safely. Returns the current user count.
    pub fn unregister(&mut self, username: &str) -> usize {
        if self.active_users.remove(username).is_some() {
            self.user_count -= 1;
        }
        debug_assert_eq!(self.user_count, self.active_users.len());
        self.user_count
    }

    /// Read-only snapshot for the online-users broadcast. The map is
    /// username -> username, the shape the web UI expects.
    pub fn snapshot(&self) -> HashMap<String, String> {
        self.active_users
            .keys()
            .map(|name| (name.clone(), name.clone()))
            .collect()
    }

    pub fn user_count(&self) -> usize {
        self.user_count
    }

    pub fn contains(&self, username: &str) -> bool {
        self.active_users.contains_key(username)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use uuid::Uuid;

    #[test]
    fn test_first_registration_succeeds() {
        // given:
        let mut registry = SessionRegistry::new();

        // when:
        let result = registry.try_register("alice", Uuid::new_v4());

        // then:
        assert_eq!(result, Ok(1));
        assert!(registry.contains("alice"));
        assert_eq!(registry.user_count(), 1);
    }

    #[test]
    fn test_duplicate_username_is_rejected() {
        // given:
        let mut registry = SessionRegistry::new();
        registry.try_register("alice", Uuid::new_v4()).unwrap();

        // when: a second connection claims the identical string
        let result = registry.try_register("alice", Uuid::new_v4());

        // then: rejected, exactly one entry remains
        assert_eq!(result, Err(RegistrationError::UsernameTaken));
        assert_eq!(registry.user_count(), 1);
    }

    #[test]
    fn test_usernames_are_case_sensitive_and_not_trimmed() {
        // given:
        let mut registry = SessionRegistry::new();
        registry.try_register("alice", Uuid::new_v4()).unwrap();

        // when: names differing by case or whitespace are distinct keys
        let upper = registry.try_register("Alice", Uuid::new_v4());
        let padded = registry.try_register(" alice", Uuid::new_v4());

        // then:
        assert_eq!(upper, Ok(2));
        assert_eq!(padded, Ok(3));
        assert_eq!(registry.user_count(), 3);
    }

    #[test]
    fn test_unregister_removes_and_decrements() {
        // given:
        let mut registry = SessionRegistry::new();
        registry.try_register("alice", Uuid::new_v4()).unwrap();
        registry.try_register("bob", Uuid::new_v4()).unwrap();

        // when:
        let count = registry.unregister("alice");

        // then:
        assert_eq!(count, 1);
        assert!(!registry.contains("alice"));
        assert!(registry.contains("bob"));
    }

    #[test]
    fn test_unregister_absent_name_is_a_noop() {
        // given:
        let mut registry = SessionRegistry::new();
        registry.try_register("alice", Uuid::new_v4()).unwrap();

        // when: double cleanup must be safe
        registry.unregister("bob");
        let count = registry.unregister("bob");

        // then:
        assert_eq!(count, 1);
        assert_eq!(registry.user_count(), 1);
    }

    #[test]
    fn test_count_tracks_registry_size_across_sequences() {
        // given:
        let mut registry = SessionRegistry::new();

        // when: an arbitrary mix of registrations and removals
        registry.try_register("alice", Uuid::new_v4()).unwrap();
        registry.try_register("bob", Uuid::new_v4()).unwrap();
        let _ = registry.try_register("alice", Uuid::new_v4());
        registry.unregister("alice");
        registry.unregister("alice");
        registry.try_register("carol", Uuid::new_v4()).unwrap();

        // then:
        assert_eq!(registry.user_count(), registry.snapshot().len());
        assert_eq!(registry.user_count(), 2);
    }

    #[test]
    fn test_snapshot_maps_each_name_to_itself() {
        // given:
        let mut registry = SessionRegistry::new();
        registry.try_register("alice", Uuid::new_v4()).unwrap();
        registry.try_register("bob", Uuid::new_v4()).unwrap();

        // when:
        let snapshot = registry.snapshot();

        // then:
        assert_eq!(snapshot.len(), 2);
        assert_eq!(snapshot.get("alice"), Some(&"alice".to_string()));
        assert_eq!(snapshot.get("bob"), Some(&"bob".to_string()));
    }

    #[test]
    fn test_name_is_free_again_after_unregister() {
        // given:
        let mut registry = SessionRegistry::new();
        registry.try_register("alice", Uuid::new_v4()).unwrap();
        registry.unregister("alice");

        // when:
        let result = registry.try_register("alice", Uuid::new_v4());

        // then:
        assert_eq!(result, Ok(1));
    }
}
