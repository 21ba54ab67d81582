//! SOCKS protocol boundary
//!
//! This module holds the SOCKS4/SOCKS5 request header codec, the reply
//! encoder and the SOCKS5 authentication negotiation. A server drives these
//! per connection and owns everything after the handshake.

pub mod auth;
pub mod credentials;

mod addr;
mod consts;
mod header;
mod reply;
mod types;

pub use addr::AddrSpec;
pub use auth::{
    negotiate, AuthContext, AuthMethod, Authenticator, NoAuthAuthenticator,
    UserPassAuthenticator,
};
pub use consts::*;
pub use credentials::{
    CredentialStore, DiagnosticSink, HashedCredentials, RejectReason, StaticCredentials,
    TracingSink, UserEntry,
};
pub use header::{break_port, build_port, Header};
pub use reply::{send_reply, Reply};
pub use types::{AddrType, SocksCommand, Version};
