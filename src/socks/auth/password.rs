//! Username/password authentication handler
//!
//! Implements RFC 1929 username/password authentication for SOCKS5.

use super::{AuthContext, AuthMethod, Authenticator};
use crate::error::{Result, Socks5Error};
use crate::socks::consts::*;
use crate::socks::credentials::{CredentialStore, DiagnosticSink, RejectReason, TracingSink};
use async_trait::async_trait;
use std::sync::Arc;
use tokio::io::{AsyncRead, AsyncReadExt, AsyncWrite, AsyncWriteExt};

/// Username/password authentication against a [`CredentialStore`]
#[derive(Clone)]
pub struct UserPassAuthenticator {
    credentials: Arc<dyn CredentialStore>,
    sink: Arc<dyn DiagnosticSink>,
}

impl UserPassAuthenticator {
    /// Authenticator logging rejections through `tracing`
    pub fn new(credentials: Arc<dyn CredentialStore>) -> Self {
        UserPassAuthenticator {
            credentials,
            sink: Arc::new(TracingSink),
        }
    }

    /// Replace the diagnostic sink
    pub fn with_sink(mut self, sink: Arc<dyn DiagnosticSink>) -> Self {
        self.sink = sink;
        self
    }
}

impl std::fmt::Debug for UserPassAuthenticator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("UserPassAuthenticator").finish_non_exhaustive()
    }
}

#[async_trait]
impl Authenticator for UserPassAuthenticator {
    fn method(&self) -> AuthMethod {
        AuthMethod::Password
    }

    /// # Protocol
    ///
    /// Server selects the method with `[5, 2]`, then the client sends:
    /// ```text
    /// +----+------+----------+------+----------+
    /// |VER | ULEN |  UNAME   | PLEN |  PASSWD  |
    /// +----+------+----------+------+----------+
    /// | 1  |  1   | 0 to 255 |  1   | 0 to 255 |
    /// +----+------+----------+------+----------+
    /// ```
    ///
    /// Server responds:
    /// ```text
    /// +----+--------+
    /// |VER | STATUS |
    /// +----+--------+
    /// | 1  |   1    |
    /// +----+--------+
    /// ```
    async fn authenticate(
        &self,
        reader: &mut (dyn AsyncRead + Unpin + Send),
        writer: &mut (dyn AsyncWrite + Unpin + Send),
        remote_addr: &str,
    ) -> Result<AuthContext> {
        writer
            .write_all(&[SOCKS5_VERSION, SOCKS5_AUTH_METHOD_PASSWORD])
            .await?;
        writer.flush().await?;

        let (username, password) = match read_request(reader).await {
            Ok(request) => request,
            Err(e) => {
                // The peer may already be gone; the request error matters more
                let _ = send_auth_status(writer, SOCKS5_AUTH_FAILURE).await;
                return Err(e);
            }
        };

        let username = String::from_utf8(username);
        let password = String::from_utf8(password);
        let (username, password) = match (username, password) {
            (Ok(username), Ok(password)) => (username, password),
            (username, _) => {
                let user = match &username {
                    Ok(name) => name.clone(),
                    Err(e) => String::from_utf8_lossy(e.as_bytes()).into_owned(),
                };
                self.sink
                    .credential_rejected(RejectReason::MalformedCredentials, &user, remote_addr);
                send_auth_status(writer, SOCKS5_AUTH_FAILURE).await?;
                return Err(Socks5Error::AuthFailed);
            }
        };

        if self
            .credentials
            .valid(&username, &password, remote_addr, self.sink.as_ref())
        {
            send_auth_status(writer, SOCKS5_AUTH_SUCCESS).await?;
            tracing::debug!("Authentication successful for user: {}", username);

            let mut ctx = AuthContext::new(AuthMethod::Password);
            ctx.payload.insert("username".to_string(), username);
            ctx.payload.insert("password".to_string(), password);
            Ok(ctx)
        } else {
            send_auth_status(writer, SOCKS5_AUTH_FAILURE).await?;
            Err(Socks5Error::AuthFailed)
        }
    }
}

/// Read the sub-negotiation request as raw username and password bytes
async fn read_request(reader: &mut (dyn AsyncRead + Unpin + Send)) -> Result<(Vec<u8>, Vec<u8>)> {
    let mut buf = [0u8; 2];
    reader
        .read_exact(&mut buf)
        .await
        .map_err(|e| Socks5Error::from_read(e, "auth version and username length"))?;

    let version = buf[0];
    let username_len = buf[1] as usize;

    if version != SOCKS5_AUTH_VERSION {
        return Err(Socks5Error::UnsupportedAuthVersion(version));
    }

    let mut username = vec![0u8; username_len];
    reader
        .read_exact(&mut username)
        .await
        .map_err(|e| Socks5Error::from_read(e, "username"))?;

    let mut len = [0u8; 1];
    reader
        .read_exact(&mut len)
        .await
        .map_err(|e| Socks5Error::from_read(e, "password length"))?;

    let mut password = vec![0u8; len[0] as usize];
    reader
        .read_exact(&mut password)
        .await
        .map_err(|e| Socks5Error::from_read(e, "password"))?;

    Ok((username, password))
}

/// Send authentication status to client
async fn send_auth_status(writer: &mut (dyn AsyncWrite + Unpin + Send), status: u8) -> Result<()> {
    writer.write_all(&[SOCKS5_AUTH_VERSION, status]).await?;
    writer.flush().await?;
    Ok(())
}
