//! SOCKS5 authentication module
//!
//! Handles method negotiation and the per-method sub-negotiations.

mod none;
mod password;

pub use none::NoAuthAuthenticator;
pub use password::UserPassAuthenticator;

use super::consts::*;
use crate::error::{HeaderError, Result, Socks5Error};
use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Authentication method types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AuthMethod {
    /// No authentication required
    None,
    /// Username/password authentication
    Password,
}

impl AuthMethod {
    /// Convert to SOCKS5 method byte
    pub fn to_byte(self) -> u8 {
        match self {
            AuthMethod::None => SOCKS5_AUTH_METHOD_NONE,
            AuthMethod::Password => SOCKS5_AUTH_METHOD_PASSWORD,
        }
    }

    /// Parse from SOCKS5 method byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            SOCKS5_AUTH_METHOD_NONE => Some(AuthMethod::None),
            SOCKS5_AUTH_METHOD_PASSWORD => Some(AuthMethod::Password),
            _ => None,
        }
    }
}

/// Outcome of a successful negotiation
///
/// The payload holds method-specific values: `username` and `password` for
/// [`AuthMethod::Password`], nothing for [`AuthMethod::None`].
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthContext {
    /// Negotiated method
    pub method: AuthMethod,
    /// Method-specific values
    pub payload: HashMap<String, String>,
}

impl AuthContext {
    /// Context with an empty payload
    pub fn new(method: AuthMethod) -> Self {
        AuthContext {
            method,
            payload: HashMap::new(),
        }
    }

    /// Authenticated username, if the method carries one
    pub fn username(&self) -> Option<&str> {
        self.payload.get("username").map(String::as_str)
    }
}

/// One SOCKS5 authentication method
///
/// `authenticate` runs after the client offered this method. It writes the
/// method-selection reply and any sub-negotiation status to `writer` on
/// every path, including failures, before returning.
#[async_trait]
pub trait Authenticator: Send + Sync {
    /// Method this authenticator implements
    fn method(&self) -> AuthMethod;

    /// Method byte advertised during negotiation
    fn method_code(&self) -> u8 {
        self.method().to_byte()
    }

    /// Run the sub-negotiation for a client at `remote_addr`
    async fn authenticate(
        &self,
        reader: &mut (dyn AsyncRead + Unpin + Send),
        writer: &mut (dyn AsyncWrite + Unpin + Send),
        remote_addr: &str,
    ) -> Result<AuthContext>;
}

/// Perform method negotiation and authentication
///
/// # Client Greeting
///
/// ```text
/// +----+----------+----------+
/// |VER | NMETHODS | METHODS  |
/// +----+----------+----------+
/// | 1  |    1     | 1 to 255 |
/// +----+----------+----------+
/// ```
///
/// Client methods are tried in the order offered; the first one with a
/// configured authenticator wins. When none match, `[5, 0xFF]` is sent.
pub async fn negotiate<R, W>(
    reader: &mut R,
    writer: &mut W,
    authenticators: &[Arc<dyn Authenticator>],
    remote_addr: &str,
) -> Result<AuthContext>
where
    R: AsyncRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    let mut buf = [0u8; 2];
    reader
        .read_exact(&mut buf)
        .await
        .map_err(|e| Socks5Error::from_read(e, "greeting"))?;

    let version = buf[0];
    let num_methods = buf[1] as usize;

    if version != SOCKS5_VERSION {
        return Err(HeaderError::UnsupportedVersion(version).into());
    }

    let mut methods = vec![0u8; num_methods];
    reader
        .read_exact(&mut methods)
        .await
        .map_err(|e| Socks5Error::from_read(e, "methods"))?;

    let selected = methods.iter().find_map(|&method| {
        authenticators
            .iter()
            .find(|auth| auth.method_code() == method)
    });

    match selected {
        Some(auth) => {
            tracing::debug!(
                method = ?auth.method(),
                remote = %remote_addr,
                "Selected authentication method"
            );
            auth.authenticate(reader, writer, remote_addr).await
        }
        None => {
            writer
                .write_all(&[SOCKS5_VERSION, SOCKS5_AUTH_METHOD_NOT_ACCEPTABLE])
                .await?;
            writer.flush().await?;
            let recognized: Vec<AuthMethod> = methods
                .iter()
                .filter_map(|&method| AuthMethod::from_byte(method))
                .collect();
            tracing::debug!(
                offered = ?methods,
                recognized = ?recognized,
                remote = %remote_addr,
                "No acceptable authentication method"
            );
            Err(Socks5Error::NoAcceptableMethod)
        }
    }
}
