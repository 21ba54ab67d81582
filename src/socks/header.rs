//! SOCKS4/SOCKS5 request header codec
//!
//! Decodes exactly one header per call from a byte stream and encodes a
//! header back to its wire form. No state is carried between calls.

use super::addr::AddrSpec;
use super::consts::*;
use super::types::{AddrType, SocksCommand, Version};
use crate::error::{HeaderError, Result, Socks5Error};
use bytes::{BufMut, Bytes, BytesMut};
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr};
use tokio::io::{AsyncRead, AsyncReadExt};

/// Combine the two big-endian port bytes
pub fn build_port(hi: u8, lo: u8) -> u16 {
    (u16::from(hi) << 8) | u16::from(lo)
}

/// Split a port into its big-endian bytes
pub fn break_port(port: u16) -> (u8, u8) {
    ((port >> 8) as u8, (port & 0xFF) as u8)
}

/// SOCKS4/SOCKS5 request header: everything that is not payload
///
/// # SOCKS4 Request Format
///
/// ```text
/// +-----+-----+------+------+
/// | VER | CMD | PORT | IPV4 |
/// +-----+-----+------+------+
/// |  1  |  1  |  2   |  4   |
/// +-----+-----+------+------+
/// ```
///
/// # SOCKS5 Request Format
///
/// ```text
/// +-----+-----+-------+------+----------+----------+
/// | VER | CMD |  RSV  | ATYP | DST.ADDR | DST.PORT |
/// +-----+-----+-------+------+----------+----------+
/// |  1  |  1  | X'00' |  1   | Variable |    2     |
/// +-----+-----+-------+------+----------+----------+
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Header {
    /// Protocol version of the message
    pub version: Version,
    /// Requested command
    pub command: SocksCommand,
    /// Reserved byte, echoed as read (SOCKS5 only)
    pub reserved: u8,
    /// Address encoding (always `Ipv4` for SOCKS4)
    pub addr_type: AddrType,
    /// Destination address
    pub address: AddrSpec,
}

impl Header {
    /// SOCKS5 header whose address type follows the address
    pub fn socks5(command: SocksCommand, address: AddrSpec) -> Self {
        Header {
            version: Version::Socks5,
            command,
            reserved: SOCKS5_RESERVED,
            addr_type: address.addr_type(),
            address,
        }
    }

    /// SOCKS4 header; UDP ASSOCIATE has no SOCKS4 form
    pub fn socks4(command: SocksCommand, ip: Ipv4Addr, port: u16) -> Result<Self> {
        if command == SocksCommand::Associate {
            return Err(HeaderError::UnsupportedCommand {
                version: SOCKS4_VERSION,
                command: command.to_byte(),
            }
            .into());
        }
        Ok(Header {
            version: Version::Socks4,
            command,
            reserved: SOCKS5_RESERVED,
            addr_type: AddrType::Ipv4,
            address: AddrSpec::ipv4(ip, port),
        })
    }

    /// Read one complete header from the stream
    pub async fn decode<R>(reader: &mut R) -> Result<Header>
    where
        R: AsyncRead + Unpin,
    {
        let mut buf = [0u8; HEADER_VER_LEN + HEADER_CMD_LEN];
        read_field(reader, &mut buf, "version and command").await?;

        let version =
            Version::from_byte(buf[0]).ok_or(HeaderError::UnsupportedVersion(buf[0]))?;
        let command = match SocksCommand::from_byte(buf[1]) {
            Some(SocksCommand::Associate) if version == Version::Socks4 => None,
            command => command,
        }
        .ok_or(HeaderError::UnsupportedCommand {
            version: buf[0],
            command: buf[1],
        })?;

        match version {
            Version::Socks5 => Self::decode_socks5(reader, command).await,
            Version::Socks4 => Self::decode_socks4(reader, command).await,
        }
    }

    async fn decode_socks5<R>(reader: &mut R, command: SocksCommand) -> Result<Header>
    where
        R: AsyncRead + Unpin,
    {
        let mut buf = [0u8; HEADER_RSV_LEN + HEADER_ATYP_LEN];
        read_field(reader, &mut buf, "reserved and address type").await?;

        let reserved = buf[0];
        let addr_type =
            AddrType::from_byte(buf[1]).ok_or(HeaderError::UnrecognizedAddressType(buf[1]))?;

        let address = match addr_type {
            AddrType::Domain => {
                let mut len = [0u8; 1];
                read_field(reader, &mut len, "domain length").await?;
                let domain_len = len[0] as usize;

                let mut addr = vec![0u8; domain_len + HEADER_PORT_LEN];
                read_field(reader, &mut addr, "domain and port").await?;
                let port = build_port(addr[domain_len], addr[domain_len + 1]);
                addr.truncate(domain_len);
                if addr.is_empty() {
                    return Err(HeaderError::InvalidDomain("empty").into());
                }
                let domain = String::from_utf8(addr)
                    .map_err(|_| HeaderError::InvalidDomain("not valid UTF-8"))?;
                AddrSpec::from_fqdn(domain, port)?
            }
            AddrType::Ipv4 => {
                let mut addr = [0u8; IPV4_LEN + HEADER_PORT_LEN];
                read_field(reader, &mut addr, "IPv4 address and port").await?;
                let ip = Ipv4Addr::new(addr[0], addr[1], addr[2], addr[3]);
                AddrSpec::ipv4(ip, build_port(addr[IPV4_LEN], addr[IPV4_LEN + 1]))
            }
            AddrType::Ipv6 => {
                let mut addr = [0u8; IPV6_LEN + HEADER_PORT_LEN];
                read_field(reader, &mut addr, "IPv6 address and port").await?;
                let mut octets = [0u8; IPV6_LEN];
                octets.copy_from_slice(&addr[..IPV6_LEN]);
                AddrSpec::ipv6(
                    Ipv6Addr::from(octets),
                    build_port(addr[IPV6_LEN], addr[IPV6_LEN + 1]),
                )
            }
        };

        Ok(Header {
            version: Version::Socks5,
            command,
            reserved,
            addr_type,
            address,
        })
    }

    async fn decode_socks4<R>(reader: &mut R, command: SocksCommand) -> Result<Header>
    where
        R: AsyncRead + Unpin,
    {
        // Port comes before the address here, unlike SOCKS5
        let mut buf = [0u8; HEADER_PORT_LEN + IPV4_LEN];
        read_field(reader, &mut buf, "SOCKS4 port and IPv4 address").await?;

        let port = build_port(buf[0], buf[1]);
        let ip = Ipv4Addr::new(buf[2], buf[3], buf[4], buf[5]);

        Ok(Header {
            version: Version::Socks4,
            command,
            reserved: SOCKS5_RESERVED,
            addr_type: AddrType::Ipv4,
            address: AddrSpec::ipv4(ip, port),
        })
    }

    /// Number of bytes [`Header::to_bytes`] produces
    pub fn encoded_len(&self) -> usize {
        match self.version {
            Version::Socks4 => HEADER_VER_LEN + HEADER_CMD_LEN + HEADER_PORT_LEN + IPV4_LEN,
            Version::Socks5 => {
                HEADER_VER_LEN
                    + HEADER_CMD_LEN
                    + HEADER_RSV_LEN
                    + HEADER_ATYP_LEN
                    + HEADER_PORT_LEN
                    + address_payload_len(self.addr_type, &self.address)
            }
        }
    }

    /// Encode the header to its wire form
    ///
    /// `addr_type` must agree with `address`. A mismatch is not reported:
    /// the missing part is written as an unspecified address so the frame
    /// length still matches `addr_type`.
    pub fn to_bytes(&self) -> Bytes {
        let mut buf = BytesMut::with_capacity(self.encoded_len());
        let (hi, lo) = break_port(self.address.port());

        buf.put_u8(self.version.to_byte());
        buf.put_u8(self.command.to_byte());

        match self.version {
            Version::Socks4 => {
                buf.put_u8(hi);
                buf.put_u8(lo);
                buf.put_slice(&ipv4_octets(&self.address));
            }
            Version::Socks5 => {
                buf.put_u8(self.reserved);
                buf.put_u8(self.addr_type.to_byte());
                put_address(&mut buf, self.addr_type, &self.address);
                buf.put_u8(hi);
                buf.put_u8(lo);
            }
        }

        buf.freeze()
    }
}

async fn read_field<R>(reader: &mut R, buf: &mut [u8], field: &'static str) -> Result<()>
where
    R: AsyncRead + Unpin,
{
    reader
        .read_exact(buf)
        .await
        .map(|_| ())
        .map_err(|e| Socks5Error::from_read(e, field))
}

fn domain_bytes(address: &AddrSpec) -> &[u8] {
    address.fqdn().unwrap_or_default().as_bytes()
}

pub(crate) fn address_payload_len(addr_type: AddrType, address: &AddrSpec) -> usize {
    match addr_type {
        AddrType::Domain => 1 + domain_bytes(address).len(),
        AddrType::Ipv4 => IPV4_LEN,
        AddrType::Ipv6 => IPV6_LEN,
    }
}

/// Write the variable address part of a SOCKS5 frame (no ATYP, no port)
pub(crate) fn put_address(buf: &mut BytesMut, addr_type: AddrType, address: &AddrSpec) {
    match addr_type {
        AddrType::Domain => {
            let domain = domain_bytes(address);
            buf.put_u8(domain.len() as u8);
            buf.put_slice(domain);
        }
        AddrType::Ipv4 => buf.put_slice(&ipv4_octets(address)),
        AddrType::Ipv6 => buf.put_slice(&ipv6_octets(address)),
    }
}

pub(crate) fn ipv4_octets(address: &AddrSpec) -> [u8; IPV4_LEN] {
    match address.ip() {
        Some(IpAddr::V4(ip)) => ip.octets(),
        Some(IpAddr::V6(ip)) => ip.to_ipv4_mapped().unwrap_or(Ipv4Addr::UNSPECIFIED).octets(),
        None => Ipv4Addr::UNSPECIFIED.octets(),
    }
}

fn ipv6_octets(address: &AddrSpec) -> [u8; IPV6_LEN] {
    match address.ip() {
        Some(IpAddr::V6(ip)) => ip.octets(),
        Some(IpAddr::V4(ip)) => ip.to_ipv6_mapped().octets(),
        None => Ipv6Addr::UNSPECIFIED.octets(),
    }
}
