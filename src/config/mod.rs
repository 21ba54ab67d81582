//! Configuration module for Sockguard
//!
//! This module provides configuration types and parsing for the
//! authentication layer.

mod auth;

pub use auth::{AuthConfig, MethodName, UserConfig};

use anyhow::{Context, Result};
use serde::{Deserialize, Serialize};
use std::path::Path;

/// Root configuration structure
#[derive(Debug, Serialize, Deserialize, Clone, Default)]
pub struct Config {
    /// Authentication configuration
    #[serde(default)]
    pub auth: AuthConfig,
}

/// Load configuration from a TOML file
pub fn load_config<P: AsRef<Path>>(path: P) -> Result<Config> {
    let content = std::fs::read_to_string(path.as_ref())
        .with_context(|| format!("Failed to read config file: {:?}", path.as_ref()))?;

    parse_config(&content)
}

/// Parse configuration from a TOML string
pub fn parse_config(content: &str) -> Result<Config> {
    toml::from_str(content).with_context(|| "Failed to parse configuration")
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_empty_config() {
        let config = parse_config("").unwrap();
        assert_eq!(config.auth.methods, vec![MethodName::None]);
        assert!(config.auth.static_users.is_empty());
    }

    #[test]
    fn test_parse_static_config() {
        let config_str = r#"
[auth]
methods = ["password", "none"]

[auth.static_users]
foo = "bar"
baz = ""
"#;

        let config = parse_config(config_str).unwrap();
        assert_eq!(
            config.auth.methods,
            vec![MethodName::Password, MethodName::None]
        );
        assert_eq!(config.auth.static_users.get("baz"), Some(&String::new()));
        assert!(config.auth.validate().is_ok());
    }

    #[test]
    fn test_parse_hashed_config() {
        let config_str = r#"
[auth]
methods = ["password"]

[[auth.users]]
username = "foo"
password_hash = "$2a$10$cWsrCEayMfSoZnLDrPXck.yNSHzcpp7vutsfpDJaf./tPQl2IVYMy"
allowed_networks = ["127.0.0.1/32", "10.0.0.0/8"]
"#;

        let config = parse_config(config_str).unwrap();
        assert_eq!(config.auth.users.len(), 1);
        assert_eq!(config.auth.users[0].allowed_networks.len(), 2);
        assert!(config.auth.validate().is_ok());
    }

    #[test]
    fn test_parse_unknown_method() {
        let config_str = r#"
[auth]
methods = ["gssapi"]
"#;
        assert!(parse_config(config_str).is_err());
    }

    #[test]
    fn test_load_config_missing_file() {
        let err = load_config("/nonexistent/sockguard.toml").unwrap_err();
        assert!(err.to_string().contains("Failed to read config file"));
    }
}
