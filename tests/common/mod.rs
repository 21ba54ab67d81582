//! Test utilities for Sockguard
//!
//! This module provides common test utilities used across integration tests.

#![allow(dead_code)]

use sockguard::socks::{
    Authenticator, HashedCredentials, NoAuthAuthenticator, StaticCredentials, UserEntry,
    UserPassAuthenticator,
};
use std::sync::Arc;
use tokio::io::{duplex, DuplexStream};
use tracing_subscriber::EnvFilter;

/// bcrypt hash of "bar"
pub const BAR_HASH: &str = "$2a$10$cWsrCEayMfSoZnLDrPXck.yNSHzcpp7vutsfpDJaf./tPQl2IVYMy";

/// Install a test-writer subscriber once; respects RUST_LOG
pub fn init_tracing() {
    let _ = tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env())
        .with_test_writer()
        .try_init();
}

/// Create a pair of connected duplex streams for testing
pub fn create_mock_stream_pair() -> (DuplexStream, DuplexStream) {
    duplex(8192)
}

/// Username/password request frame
pub fn create_auth_request(username: &str, password: &str) -> Vec<u8> {
    let mut request = vec![1, username.len() as u8];
    request.extend_from_slice(username.as_bytes());
    request.push(password.len() as u8);
    request.extend_from_slice(password.as_bytes());
    request
}

/// Authenticator list builder
#[derive(Default)]
pub struct TestAuthBuilder {
    no_auth: bool,
    static_users: Vec<(String, String)>,
    hashed_users: Vec<(String, Vec<String>)>,
}

impl TestAuthBuilder {
    /// Create a new builder
    pub fn new() -> Self {
        Self::default()
    }

    /// Offer the no-auth method
    pub fn no_auth(mut self) -> Self {
        self.no_auth = true;
        self
    }

    /// Add a plaintext user
    pub fn static_user(mut self, username: &str, password: &str) -> Self {
        self.static_users
            .push((username.to_string(), password.to_string()));
        self
    }

    /// Add a user whose password is "bar", allowed from `networks`
    pub fn hashed_user(mut self, username: &str, networks: &[&str]) -> Self {
        self.hashed_users.push((
            username.to_string(),
            networks.iter().map(|n| n.to_string()).collect(),
        ));
        self
    }

    /// Build authenticators: password first when configured, then no-auth
    pub fn build(self) -> Vec<Arc<dyn Authenticator>> {
        let mut authenticators: Vec<Arc<dyn Authenticator>> = Vec::new();

        if !self.hashed_users.is_empty() {
            let store: HashedCredentials = self
                .hashed_users
                .into_iter()
                .map(|(user, networks)| {
                    let networks = networks.iter().map(|n| n.parse().unwrap()).collect();
                    (user, UserEntry::new(BAR_HASH, networks))
                })
                .collect();
            authenticators.push(Arc::new(UserPassAuthenticator::new(Arc::new(store))));
        } else if !self.static_users.is_empty() {
            let store: StaticCredentials = self.static_users.into_iter().collect();
            authenticators.push(Arc::new(UserPassAuthenticator::new(Arc::new(store))));
        }

        if self.no_auth {
            authenticators.push(Arc::new(NoAuthAuthenticator));
        }

        authenticators
    }
}
