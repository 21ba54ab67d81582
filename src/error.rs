//! Error types for Sockguard
//!
//! This module defines the error taxonomy for header decoding, address
//! parsing and authentication negotiation.

use std::io;
use thiserror::Error;

/// Result alias used by the protocol layer
pub type Result<T> = std::result::Result<T, Socks5Error>;

/// Malformed SOCKS4/SOCKS5 request header
#[derive(Error, Debug)]
pub enum HeaderError {
    /// Version byte is neither 4 nor 5
    #[error("Unsupported SOCKS version: {0}")]
    UnsupportedVersion(u8),

    /// Command is unknown, or not available under this version
    #[error("Unsupported command {command} for SOCKS version {version}")]
    UnsupportedCommand {
        /// Protocol version of the request
        version: u8,
        /// Raw command byte
        command: u8,
    },

    /// Address type byte is not IPv4, domain or IPv6
    #[error("Unrecognized address type: {0}")]
    UnrecognizedAddressType(u8),

    /// Stream ended before the named field was complete
    #[error("Truncated header while reading {0}")]
    Truncated(&'static str),

    /// Domain name field is empty or not valid UTF-8
    #[error("Invalid domain name: {0}")]
    InvalidDomain(&'static str),
}

/// Protocol boundary errors
#[derive(Error, Debug)]
pub enum Socks5Error {
    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] io::Error),

    /// Malformed header
    #[error("Malformed header: {0}")]
    Header(#[from] HeaderError),

    /// Authentication failed
    #[error("Authentication failed")]
    AuthFailed,

    /// Username/password sub-negotiation version is not 1
    #[error("Unsupported auth version: {0}")]
    UnsupportedAuthVersion(u8),

    /// No acceptable authentication method
    #[error("No acceptable authentication method")]
    NoAcceptableMethod,

    /// Invalid address
    #[error("Invalid address: {0}")]
    InvalidAddress(String),
}

impl Socks5Error {
    /// Turn a failed `read_exact` into `Truncated` when the peer hung up early
    pub(crate) fn from_read(err: io::Error, field: &'static str) -> Self {
        if err.kind() == io::ErrorKind::UnexpectedEof {
            Socks5Error::Header(HeaderError::Truncated(field))
        } else {
            Socks5Error::Io(err)
        }
    }
}

/// Reply codes for SOCKS5 protocol
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[repr(u8)]
pub enum Socks5ReplyCode {
    /// Command succeeded
    Succeeded = 0x00,
    /// General SOCKS server failure
    GeneralFailure = 0x01,
    /// Connection not allowed by ruleset
    ConnectionNotAllowed = 0x02,
    /// Network unreachable
    NetworkUnreachable = 0x03,
    /// Host unreachable
    HostUnreachable = 0x04,
    /// Connection refused
    ConnectionRefused = 0x05,
    /// TTL expired
    TtlExpired = 0x06,
    /// Command not supported
    CommandNotSupported = 0x07,
    /// Address type not supported
    AddressTypeNotSupported = 0x08,
}

impl From<Socks5ReplyCode> for u8 {
    fn from(code: Socks5ReplyCode) -> Self {
        code as u8
    }
}

impl From<&HeaderError> for Socks5ReplyCode {
    fn from(err: &HeaderError) -> Self {
        match err {
            HeaderError::UnsupportedCommand { .. } => Socks5ReplyCode::CommandNotSupported,
            HeaderError::UnrecognizedAddressType(_) | HeaderError::InvalidDomain(_) => {
                Socks5ReplyCode::AddressTypeNotSupported
            }
            _ => Socks5ReplyCode::GeneralFailure,
        }
    }
}
