//! No authentication handler
//!
//! Handles the case when no authentication is required.

use super::{AuthContext, AuthMethod, Authenticator};
use crate::error::Result;
use crate::socks::consts::{SOCKS5_AUTH_METHOD_NONE, SOCKS5_VERSION};
use async_trait::async_trait;
use tokio::io::{AsyncRead, AsyncWrite, AsyncWriteExt};

/// Accepts every client; only the method-selection reply is sent
#[derive(Debug, Clone, Copy, Default)]
pub struct NoAuthAuthenticator;

#[async_trait]
impl Authenticator for NoAuthAuthenticator {
    fn method(&self) -> AuthMethod {
        AuthMethod::None
    }

    async fn authenticate(
        &self,
        _reader: &mut (dyn AsyncRead + Unpin + Send),
        writer: &mut (dyn AsyncWrite + Unpin + Send),
        _remote_addr: &str,
    ) -> Result<AuthContext> {
        writer
            .write_all(&[SOCKS5_VERSION, SOCKS5_AUTH_METHOD_NONE])
            .await?;
        writer.flush().await?;
        Ok(AuthContext::new(AuthMethod::None))
    }
}
