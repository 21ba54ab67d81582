//! SOCKS4/SOCKS5 reply builder
//!
//! Lets the server answer a request, including the ones the header codec
//! rejected, using the same address layout as the request header.

use super::addr::AddrSpec;
use super::consts::*;
use super::header::{address_payload_len, break_port, ipv4_octets, put_address};
use super::types::Version;
use crate::error::{Result, Socks5ReplyCode};
use bytes::{BufMut, Bytes, BytesMut};
use tokio::io::{AsyncWrite, AsyncWriteExt};

/// Reply to a SOCKS request
///
/// # SOCKS5 Reply Format
///
/// ```text
/// +----+-----+-------+------+----------+----------+
/// |VER | REP |  RSV  | ATYP | BND.ADDR | BND.PORT |
/// +----+-----+-------+------+----------+----------+
/// | 1  |  1  | X'00' |  1   | Variable |    2     |
/// +----+-----+-------+------+----------+----------+
/// ```
///
/// SOCKS4 replies are `[0][0x5A|0x5B][PORT][IPV4]`; any code other than
/// `Succeeded` is sent as rejected.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Reply {
    /// Version of the request being answered
    pub version: Version,
    /// Outcome
    pub code: Socks5ReplyCode,
    /// Bound address reported to the client
    pub bind: AddrSpec,
}

impl Reply {
    /// Successful reply carrying the bound address
    pub fn success(version: Version, bind: AddrSpec) -> Self {
        Reply {
            version,
            code: Socks5ReplyCode::Succeeded,
            bind,
        }
    }

    /// Failure reply with an unspecified bound address
    pub fn failure(version: Version, code: Socks5ReplyCode) -> Self {
        Reply {
            version,
            code,
            bind: AddrSpec::default(),
        }
    }

    /// Encode the reply
    pub fn to_bytes(&self) -> Bytes {
        let (hi, lo) = break_port(self.bind.port());

        match self.version {
            Version::Socks4 => {
                let mut buf = BytesMut::with_capacity(8);
                buf.put_u8(SOCKS4_REPLY_VERSION);
                buf.put_u8(if self.code == Socks5ReplyCode::Succeeded {
                    SOCKS4_REPLY_GRANTED
                } else {
                    SOCKS4_REPLY_REJECTED
                });
                buf.put_u8(hi);
                buf.put_u8(lo);
                buf.put_slice(&ipv4_octets(&self.bind));
                buf.freeze()
            }
            Version::Socks5 => {
                let addr_type = self.bind.addr_type();
                let mut buf =
                    BytesMut::with_capacity(6 + address_payload_len(addr_type, &self.bind));
                buf.put_u8(SOCKS5_VERSION);
                buf.put_u8(self.code.into());
                buf.put_u8(SOCKS5_RESERVED);
                buf.put_u8(addr_type.to_byte());
                put_address(&mut buf, addr_type, &self.bind);
                buf.put_u8(hi);
                buf.put_u8(lo);
                buf.freeze()
            }
        }
    }
}

/// Write a reply and flush
pub async fn send_reply<S>(stream: &mut S, reply: &Reply) -> Result<()>
where
    S: AsyncWrite + Unpin + ?Sized,
{
    stream.write_all(&reply.to_bytes()).await?;
    stream.flush().await?;
    tracing::debug!(code = ?reply.code, bind = %reply.bind.display_string(), "Sent SOCKS reply");
    Ok(())
}
