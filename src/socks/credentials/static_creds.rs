//! In-memory username to plaintext password map

use super::{constant_time_compare, CredentialStore, DiagnosticSink, RejectReason};
use std::collections::HashMap;

/// Plaintext credential map; the remote address is ignored
#[derive(Debug, Clone, Default)]
pub struct StaticCredentials {
    users: HashMap<String, String>,
}

impl StaticCredentials {
    /// Build from a username to password map
    pub fn new(users: HashMap<String, String>) -> Self {
        StaticCredentials { users }
    }

    /// Number of users
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether the store has no users
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl<K, V> FromIterator<(K, V)> for StaticCredentials
where
    K: Into<String>,
    V: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (K, V)>>(iter: I) -> Self {
        StaticCredentials {
            users: iter
                .into_iter()
                .map(|(user, pass)| (user.into(), pass.into()))
                .collect(),
        }
    }
}

impl CredentialStore for StaticCredentials {
    fn valid(
        &self,
        user: &str,
        password: &str,
        remote_addr: &str,
        sink: &dyn DiagnosticSink,
    ) -> bool {
        let Some(expected) = self.users.get(user) else {
            sink.credential_rejected(RejectReason::UnknownUser, user, remote_addr);
            return false;
        };

        if !constant_time_compare(password.as_bytes(), expected.as_bytes()) {
            sink.credential_rejected(RejectReason::PasswordMismatch, user, remote_addr);
            return false;
        }

        true
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::socks::credentials::testing::RecordingSink;

    fn store() -> StaticCredentials {
        [("foo", "bar"), ("baz", "")].into_iter().collect()
    }

    #[test]
    fn test_static_credentials() {
        let sink = RecordingSink::default();
        let creds = store();

        assert!(creds.valid("foo", "bar", "", &sink));
        assert!(creds.valid("baz", "", "", &sink));
        assert!(!creds.valid("foo", "", "", &sink));
        assert!(!creds.valid("foo", "baz", "", &sink));
        assert_eq!(creds.len(), 2);
    }

    #[test]
    fn test_empty_password_only_matches_empty() {
        let sink = RecordingSink::default();
        let creds = store();

        for guess in ["a", " ", "bar", "\0"] {
            assert!(!creds.valid("baz", guess, "", &sink));
        }
        assert!(creds.valid("baz", "", "", &sink));
    }

    #[test]
    fn test_rejections_reported_to_sink() {
        let sink = RecordingSink::default();
        let creds = store();

        assert!(!creds.valid("nobody", "bar", "10.0.0.1:1", &sink));
        assert!(!creds.valid("foo", "nope", "10.0.0.1:1", &sink));

        assert_eq!(
            sink.reasons(),
            vec![RejectReason::UnknownUser, RejectReason::PasswordMismatch]
        );
        let events = sink.events.lock().unwrap();
        assert_eq!(events[0].1, "nobody");
        assert_eq!(events[0].2, "10.0.0.1:1");
    }
}
