//! SOCKS4/SOCKS5 protocol constants
//!
//! Shared by the header codec, the reply encoder and the authenticators.

/// SOCKS4 protocol version
pub const SOCKS4_VERSION: u8 = 0x04;

/// SOCKS5 protocol version
pub const SOCKS5_VERSION: u8 = 0x05;

/// SOCKS5 authentication sub-negotiation version
pub const SOCKS5_AUTH_VERSION: u8 = 0x01;

// Authentication methods
/// No authentication required
pub const SOCKS5_AUTH_METHOD_NONE: u8 = 0x00;
/// Username/password authentication
pub const SOCKS5_AUTH_METHOD_PASSWORD: u8 = 0x02;
/// No acceptable methods
pub const SOCKS5_AUTH_METHOD_NOT_ACCEPTABLE: u8 = 0xFF;

// Sub-negotiation status
/// Credentials accepted
pub const SOCKS5_AUTH_SUCCESS: u8 = 0x00;
/// Credentials rejected
pub const SOCKS5_AUTH_FAILURE: u8 = 0x01;

// Commands
/// TCP CONNECT command
pub const SOCKS_CMD_CONNECT: u8 = 0x01;
/// TCP BIND command
pub const SOCKS_CMD_BIND: u8 = 0x02;
/// UDP ASSOCIATE command (SOCKS5 only)
pub const SOCKS_CMD_ASSOCIATE: u8 = 0x03;

// Address types
/// IPv4 address
pub const SOCKS5_ADDR_TYPE_IPV4: u8 = 0x01;
/// Domain name
pub const SOCKS5_ADDR_TYPE_DOMAIN: u8 = 0x03;
/// IPv6 address
pub const SOCKS5_ADDR_TYPE_IPV6: u8 = 0x04;

// SOCKS4 replies
/// SOCKS4 reply version byte
pub const SOCKS4_REPLY_VERSION: u8 = 0x00;
/// Request granted
pub const SOCKS4_REPLY_GRANTED: u8 = 0x5A;
/// Request rejected or failed
pub const SOCKS4_REPLY_REJECTED: u8 = 0x5B;

/// Reserved byte value
pub const SOCKS5_RESERVED: u8 = 0x00;

// Field lengths
pub(crate) const HEADER_VER_LEN: usize = 1;
pub(crate) const HEADER_CMD_LEN: usize = 1;
pub(crate) const HEADER_RSV_LEN: usize = 1;
pub(crate) const HEADER_ATYP_LEN: usize = 1;
pub(crate) const HEADER_PORT_LEN: usize = 2;
pub(crate) const IPV4_LEN: usize = 4;
pub(crate) const IPV6_LEN: usize = 16;

/// Maximum domain name length
pub const MAX_DOMAIN_LEN: usize = 255;
