//! # Sockguard - SOCKS4/SOCKS5 protocol boundary
//!
//! Sockguard is the part of a SOCKS proxy that sits between the accepted
//! connection and the relay: it decodes request headers for both protocol
//! versions and decides, through pluggable authenticators and credential
//! stores, whether a connection is admitted at all.
//!
//! ## Features
//!
//! - **Header Codec**: byte-exact SOCKS4 and SOCKS5 request headers and replies
//! - **Method Negotiation**: no-auth and RFC 1929 username/password
//! - **Credential Stores**: plaintext map, or bcrypt hashes with per-user CIDR allowlists
//! - **Fail Closed**: the peer always gets a failure status before the error returns
//!
//! ## Usage
//!
//! ```rust,ignore
//! use sockguard::config::parse_config;
//! use sockguard::socks::{negotiate, Header};
//!
//! async fn handshake(stream: tokio::net::TcpStream) -> anyhow::Result<()> {
//!     let config = parse_config(r#"
//! [auth]
//! methods = ["password"]
//! static_users = { alice = "wonderland" }
//! "#)?;
//!     let authenticators = config.auth.build_authenticators()?;
//!
//!     let remote = stream.peer_addr()?.to_string();
//!     let (mut reader, mut writer) = stream.into_split();
//!     let ctx = negotiate(&mut reader, &mut writer, &authenticators, &remote).await?;
//!     let header = Header::decode(&mut reader).await?;
//!     // hand `ctx` and `header` to the relay
//!     Ok(())
//! }
//! ```

#![warn(missing_docs)]
#![warn(rust_2018_idioms)]

pub mod config;
pub mod error;
pub mod socks;

// Re-export commonly used items
pub use config::{load_config, parse_config, Config};
pub use error::{HeaderError, Socks5Error, Socks5ReplyCode};

/// Version of the Sockguard library
pub const VERSION: &str = env!("CARGO_PKG_VERSION");

/// Name of the library
pub const NAME: &str = env!("CARGO_PKG_NAME");
