//! SOCKS type definitions
//!
//! Frozen enumerations over the protocol constants.

use super::consts::*;
use std::fmt;

/// SOCKS protocol version
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Version {
    /// SOCKS4
    Socks4,
    /// SOCKS5
    Socks5,
}

impl Version {
    /// Parse a version byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            SOCKS4_VERSION => Some(Version::Socks4),
            SOCKS5_VERSION => Some(Version::Socks5),
            _ => None,
        }
    }

    /// Convert to version byte
    pub fn to_byte(self) -> u8 {
        match self {
            Version::Socks4 => SOCKS4_VERSION,
            Version::Socks5 => SOCKS5_VERSION,
        }
    }
}

/// SOCKS command types
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SocksCommand {
    /// TCP CONNECT - establish a TCP connection to target
    Connect,
    /// TCP BIND - wait for incoming connection
    Bind,
    /// UDP ASSOCIATE - establish UDP relay (SOCKS5 only)
    Associate,
}

impl SocksCommand {
    /// Parse a command byte into SocksCommand
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            SOCKS_CMD_CONNECT => Some(SocksCommand::Connect),
            SOCKS_CMD_BIND => Some(SocksCommand::Bind),
            SOCKS_CMD_ASSOCIATE => Some(SocksCommand::Associate),
            _ => None,
        }
    }

    /// Convert SocksCommand to byte
    pub fn to_byte(self) -> u8 {
        match self {
            SocksCommand::Connect => SOCKS_CMD_CONNECT,
            SocksCommand::Bind => SOCKS_CMD_BIND,
            SocksCommand::Associate => SOCKS_CMD_ASSOCIATE,
        }
    }
}

impl fmt::Display for SocksCommand {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SocksCommand::Connect => write!(f, "CONNECT"),
            SocksCommand::Bind => write!(f, "BIND"),
            SocksCommand::Associate => write!(f, "UDP ASSOCIATE"),
        }
    }
}

/// SOCKS5 address type (ATYP)
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AddrType {
    /// 4-byte IPv4 address
    Ipv4,
    /// Length-prefixed domain name
    Domain,
    /// 16-byte IPv6 address
    Ipv6,
}

impl AddrType {
    /// Parse an address type byte
    pub fn from_byte(byte: u8) -> Option<Self> {
        match byte {
            SOCKS5_ADDR_TYPE_IPV4 => Some(AddrType::Ipv4),
            SOCKS5_ADDR_TYPE_DOMAIN => Some(AddrType::Domain),
            SOCKS5_ADDR_TYPE_IPV6 => Some(AddrType::Ipv6),
            _ => None,
        }
    }

    /// Convert to address type byte
    pub fn to_byte(self) -> u8 {
        match self {
            AddrType::Ipv4 => SOCKS5_ADDR_TYPE_IPV4,
            AddrType::Domain => SOCKS5_ADDR_TYPE_DOMAIN,
            AddrType::Ipv6 => SOCKS5_ADDR_TYPE_IPV6,
        }
    }
}
