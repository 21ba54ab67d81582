//! Credential stores for username/password authentication
//!
//! A [`CredentialStore`] answers one question: may this user, with this
//! password, connect from this remote address. Every failed check returns
//! the same `false`; only the [`DiagnosticSink`] learns which check failed.

mod hashed;
mod static_creds;

pub use hashed::{HashedCredentials, UserEntry};
pub use static_creds::StaticCredentials;

use std::fmt;

/// Why a credential check failed
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RejectReason {
    /// Username not in the store
    UnknownUser,
    /// Password did not match
    PasswordMismatch,
    /// Remote address could not be parsed as an IP
    UnparsableAddress,
    /// Remote address is outside every allowed network
    AddressNotAllowed,
    /// Username or password is not valid UTF-8
    MalformedCredentials,
}

impl fmt::Display for RejectReason {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            RejectReason::UnknownUser => write!(f, "unknown user"),
            RejectReason::PasswordMismatch => write!(f, "password mismatch"),
            RejectReason::UnparsableAddress => write!(f, "unparsable remote address"),
            RejectReason::AddressNotAllowed => write!(f, "remote address not allowed"),
            RejectReason::MalformedCredentials => write!(f, "malformed credentials"),
        }
    }
}

/// Receives credential rejections for diagnostics
pub trait DiagnosticSink: Send + Sync {
    /// Called once for each rejected credential check
    fn credential_rejected(&self, reason: RejectReason, user: &str, remote_addr: &str);
}

/// Sink that logs rejections through `tracing`
#[derive(Debug, Clone, Copy, Default)]
pub struct TracingSink;

impl DiagnosticSink for TracingSink {
    fn credential_rejected(&self, reason: RejectReason, user: &str, remote_addr: &str) {
        tracing::warn!(
            user = %user,
            remote = %remote_addr,
            reason = %reason,
            "Credential check failed"
        );
    }
}

/// Validates username/password/remote-address triples
///
/// Stores are shared across connection tasks. Implementations backed by
/// mutable state must synchronize internally.
pub trait CredentialStore: Send + Sync {
    /// Whether the credentials are acceptable from `remote_addr`
    fn valid(
        &self,
        user: &str,
        password: &str,
        remote_addr: &str,
        sink: &dyn DiagnosticSink,
    ) -> bool;
}

/// Constant-time comparison of two byte slices
pub(crate) fn constant_time_compare(a: &[u8], b: &[u8]) -> bool {
    if a.len() != b.len() {
        return false;
    }

    let mut result = 0u8;
    for (x, y) in a.iter().zip(b.iter()) {
        result |= x ^ y;
    }
    result == 0
}

#[cfg(test)]
pub(crate) mod testing {
    use super::{DiagnosticSink, RejectReason};
    use std::sync::Mutex;

    /// Sink that remembers every rejection
    #[derive(Default)]
    pub struct RecordingSink {
        pub events: Mutex<Vec<(RejectReason, String, String)>>,
    }

    impl RecordingSink {
        pub fn reasons(&self) -> Vec<RejectReason> {
            self.events
                .lock()
                .unwrap()
                .iter()
                .map(|(reason, _, _)| *reason)
                .collect()
        }
    }

    impl DiagnosticSink for RecordingSink {
        fn credential_rejected(&self, reason: RejectReason, user: &str, remote_addr: &str) {
            self.events
                .lock()
                .unwrap()
                .push((reason, user.to_string(), remote_addr.to_string()));
        }
    }
}
