//! Authentication configuration types
//!
//! Describes which methods a server offers and where credentials come from.

use crate::socks::{
    Authenticator, CredentialStore, HashedCredentials, NoAuthAuthenticator, StaticCredentials,
    UserEntry, UserPassAuthenticator,
};
use anyhow::{anyhow, Context, Result};
use cidr::IpCidr;
use serde::{Deserialize, Serialize};
use std::collections::{HashMap, HashSet};
use std::sync::Arc;

/// Default offered methods
fn default_methods() -> Vec<MethodName> {
    vec![MethodName::None]
}

/// Configured authentication method
#[derive(Debug, Serialize, Deserialize, Clone, Copy, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum MethodName {
    /// No authentication
    None,
    /// Username/password
    Password,
}

/// Authentication configuration
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct AuthConfig {
    /// Methods offered to clients
    #[serde(default = "default_methods")]
    pub methods: Vec<MethodName>,

    /// Plaintext username to password map
    #[serde(default)]
    pub static_users: HashMap<String, String>,

    /// Users with bcrypt hashes and allowed networks
    #[serde(default)]
    pub users: Vec<UserConfig>,
}

impl Default for AuthConfig {
    fn default() -> Self {
        AuthConfig {
            methods: default_methods(),
            static_users: HashMap::new(),
            users: Vec::new(),
        }
    }
}

/// A hashed-password user
#[derive(Debug, Serialize, Deserialize, Clone)]
pub struct UserConfig {
    /// Username
    pub username: String,

    /// bcrypt hash of the password
    pub password_hash: String,

    /// CIDR networks the user may connect from, e.g. "10.0.0.0/8"
    #[serde(default)]
    pub allowed_networks: Vec<String>,
}

impl UserConfig {
    fn parse_networks(&self) -> Result<Vec<IpCidr>> {
        self.allowed_networks
            .iter()
            .map(|net| {
                net.parse::<IpCidr>().with_context(|| {
                    format!("Invalid network {:?} for user {}", net, self.username)
                })
            })
            .collect()
    }
}

impl AuthConfig {
    /// Validate the configuration
    pub fn validate(&self) -> Result<(), String> {
        if self.methods.is_empty() {
            return Err("At least one authentication method is required".to_string());
        }

        let has_static = !self.static_users.is_empty();
        let has_hashed = !self.users.is_empty();

        if has_static && has_hashed {
            return Err("static_users and users cannot both be configured".to_string());
        }
        if self.methods.contains(&MethodName::Password) && !has_static && !has_hashed {
            return Err("Password authentication enabled but no users configured".to_string());
        }

        let mut seen = HashSet::new();
        for user in &self.users {
            if !seen.insert(user.username.as_str()) {
                return Err(format!("Duplicate user: {}", user.username));
            }
            if user.allowed_networks.is_empty() {
                return Err(format!("User {} has no allowed networks", user.username));
            }
            if let Err(e) = user.parse_networks() {
                return Err(format!("{:#}", e));
            }
        }

        Ok(())
    }

    /// Build the configured credential store, if any
    pub fn build_credentials(&self) -> Result<Option<Arc<dyn CredentialStore>>> {
        if !self.users.is_empty() {
            let mut store = HashMap::with_capacity(self.users.len());
            for user in &self.users {
                let entry = UserEntry::new(user.password_hash.clone(), user.parse_networks()?);
                store.insert(user.username.clone(), entry);
            }
            return Ok(Some(Arc::new(HashedCredentials::new(store))));
        }

        if !self.static_users.is_empty() {
            return Ok(Some(Arc::new(StaticCredentials::new(
                self.static_users.clone(),
            ))));
        }

        Ok(None)
    }

    /// Build authenticators in configured order
    pub fn build_authenticators(&self) -> Result<Vec<Arc<dyn Authenticator>>> {
        self.validate().map_err(|e| anyhow!(e))?;

        let credentials = self.build_credentials()?;
        let mut authenticators: Vec<Arc<dyn Authenticator>> = Vec::new();

        for method in &self.methods {
            match method {
                MethodName::None => authenticators.push(Arc::new(NoAuthAuthenticator)),
                MethodName::Password => {
                    let store = credentials
                        .clone()
                        .ok_or_else(|| anyhow!("Password authentication needs users"))?;
                    authenticators.push(Arc::new(UserPassAuthenticator::new(store)));
                }
            }
        }

        tracing::debug!(methods = ?self.methods, "Built authenticators");
        Ok(authenticators)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::socks::AuthMethod;

    const BAR_HASH: &str = "$2a$10$cWsrCEayMfSoZnLDrPXck.yNSHzcpp7vutsfpDJaf./tPQl2IVYMy";

    fn hashed_user(name: &str, networks: &[&str]) -> UserConfig {
        UserConfig {
            username: name.to_string(),
            password_hash: BAR_HASH.to_string(),
            allowed_networks: networks.iter().map(|s| s.to_string()).collect(),
        }
    }

    #[test]
    fn test_auth_config_default() {
        let config = AuthConfig::default();
        assert_eq!(config.methods, vec![MethodName::None]);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn test_validate_password_without_users() {
        let config = AuthConfig {
            methods: vec![MethodName::Password],
            ..Default::default()
        };
        assert!(config.validate().unwrap_err().contains("no users"));
    }

    #[test]
    fn test_validate_mixed_stores() {
        let config = AuthConfig {
            methods: vec![MethodName::Password],
            static_users: [("a".to_string(), "b".to_string())].into_iter().collect(),
            users: vec![hashed_user("c", &["127.0.0.1/32"])],
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn test_validate_bad_network() {
        let config = AuthConfig {
            methods: vec![MethodName::Password],
            users: vec![hashed_user("c", &["10.0.0.0/33"])],
            ..Default::default()
        };
        assert!(config.validate().unwrap_err().contains("Invalid network"));

        let config = AuthConfig {
            methods: vec![MethodName::Password],
            users: vec![hashed_user("c", &[])],
            ..Default::default()
        };
        assert!(config.validate().unwrap_err().contains("no allowed networks"));
    }

    #[test]
    fn test_validate_duplicate_user() {
        let config = AuthConfig {
            methods: vec![MethodName::Password],
            users: vec![
                hashed_user("c", &["127.0.0.1/32"]),
                hashed_user("c", &["10.0.0.0/8"]),
            ],
            ..Default::default()
        };
        assert_eq!(config.validate().unwrap_err(), "Duplicate user: c");
    }

    #[test]
    fn test_build_authenticators_in_order() {
        let config = AuthConfig {
            methods: vec![MethodName::Password, MethodName::None],
            users: vec![hashed_user("foo", &["127.0.0.1/32", "::1/128"])],
            ..Default::default()
        };

        let authenticators = config.build_authenticators().unwrap();
        let methods: Vec<_> = authenticators.iter().map(|a| a.method()).collect();
        assert_eq!(methods, vec![AuthMethod::Password, AuthMethod::None]);
    }

    #[test]
    fn test_build_credentials_static() {
        let config = AuthConfig {
            methods: vec![MethodName::Password],
            static_users: [("foo".to_string(), "bar".to_string())]
                .into_iter()
                .collect(),
            ..Default::default()
        };

        let store = config.build_credentials().unwrap().unwrap();
        let sink = crate::socks::TracingSink;
        assert!(store.valid("foo", "bar", "", &sink));
        assert!(!store.valid("foo", "baz", "", &sink));
    }

    #[test]
    fn test_build_authenticators_rejects_invalid() {
        let config = AuthConfig {
            methods: vec![],
            ..Default::default()
        };
        assert!(config.build_authenticators().is_err());
    }
}
