//! Target address specification
//!
//! An [`AddrSpec`] is either a numeric IP address or a domain name, plus a
//! port. Instances built through the constructors here always carry exactly
//! one of the two; a domain instance can later be annotated with the IP it
//! resolved to via [`AddrSpec::with_resolved_ip`].

use super::consts::MAX_DOMAIN_LEN;
use super::types::AddrType;
use crate::error::{Result, Socks5Error};
use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, SocketAddr};
use std::str::FromStr;

/// Destination address of a SOCKS request
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct AddrSpec {
    fqdn: Option<String>,
    ip: Option<IpAddr>,
    port: u16,
}

impl AddrSpec {
    /// Numeric address
    pub fn from_ip(ip: IpAddr, port: u16) -> Self {
        AddrSpec {
            fqdn: None,
            ip: Some(ip),
            port,
        }
    }

    /// IPv4 address
    pub fn ipv4(ip: Ipv4Addr, port: u16) -> Self {
        Self::from_ip(IpAddr::V4(ip), port)
    }

    /// IPv6 address
    pub fn ipv6(ip: Ipv6Addr, port: u16) -> Self {
        Self::from_ip(IpAddr::V6(ip), port)
    }

    /// Domain name address
    ///
    /// The name must be non-empty and fit the one-byte SOCKS5 length field.
    pub fn from_fqdn(fqdn: impl Into<String>, port: u16) -> Result<Self> {
        let fqdn = fqdn.into();
        if fqdn.is_empty() {
            return Err(Socks5Error::InvalidAddress("empty domain name".to_string()));
        }
        if fqdn.len() > MAX_DOMAIN_LEN {
            return Err(Socks5Error::InvalidAddress(format!(
                "domain name is {} bytes, limit is {}",
                fqdn.len(),
                MAX_DOMAIN_LEN
            )));
        }
        Ok(AddrSpec {
            fqdn: Some(fqdn),
            ip: None,
            port,
        })
    }

    /// Parse `host:port`, splitting on the rightmost colon
    ///
    /// The host is tried as an IPv4 address, then IPv6, and is otherwise
    /// kept as a domain name. IPv6 hosts must be bracketed.
    pub fn parse(address: &str) -> Result<Self> {
        let invalid = || Socks5Error::InvalidAddress(address.to_string());

        let (host, port) = address.rsplit_once(':').ok_or_else(invalid)?;

        let host = match host.strip_prefix('[') {
            Some(inner) => inner.strip_suffix(']').ok_or_else(invalid)?,
            None if host.contains(':') => return Err(invalid()),
            None => host,
        };
        if host.is_empty() {
            return Err(invalid());
        }

        if port.is_empty() || !port.bytes().all(|b| b.is_ascii_digit()) {
            return Err(invalid());
        }
        let port: u16 = port.parse().map_err(|_| invalid())?;

        if let Ok(ip) = host.parse::<Ipv4Addr>() {
            Ok(Self::ipv4(ip, port))
        } else if let Ok(ip) = host.parse::<Ipv6Addr>() {
            Ok(Self::ipv6(ip, port))
        } else {
            Self::from_fqdn(host, port)
        }
    }

    /// Copy of a domain address annotated with the IP it resolved to
    pub fn with_resolved_ip(&self, ip: IpAddr) -> Self {
        AddrSpec {
            fqdn: self.fqdn.clone(),
            ip: Some(ip),
            port: self.port,
        }
    }

    /// Domain name, if this is a domain address
    pub fn fqdn(&self) -> Option<&str> {
        self.fqdn.as_deref()
    }

    /// IP address, if numeric or resolved
    pub fn ip(&self) -> Option<IpAddr> {
        self.ip
    }

    /// Port number
    pub fn port(&self) -> u16 {
        self.port
    }

    /// SOCKS5 address type this address encodes as
    pub fn addr_type(&self) -> AddrType {
        match (&self.fqdn, self.ip) {
            (Some(_), _) => AddrType::Domain,
            (None, Some(IpAddr::V6(_))) => AddrType::Ipv6,
            (None, _) => AddrType::Ipv4,
        }
    }

    /// `host:port` suitable for dialing, preferring the IP when one is set
    pub fn dial_string(&self) -> String {
        match (self.ip, &self.fqdn) {
            (Some(ip), _) => SocketAddr::new(ip, self.port).to_string(),
            (None, Some(fqdn)) => format!("{}:{}", fqdn, self.port),
            (None, None) => format!(":{}", self.port),
        }
    }

    /// `name (ip):port` for domains, `ip:port` otherwise. Never dial this.
    pub fn display_string(&self) -> String {
        match (&self.fqdn, self.ip) {
            (Some(fqdn), Some(ip)) => format!("{} ({}):{}", fqdn, ip, self.port),
            (Some(fqdn), None) => format!("{} (unresolved):{}", fqdn, self.port),
            (None, Some(ip)) => format!("{}:{}", ip, self.port),
            (None, None) => format!(":{}", self.port),
        }
    }
}

impl FromStr for AddrSpec {
    type Err = Socks5Error;

    fn from_str(s: &str) -> Result<Self> {
        AddrSpec::parse(s)
    }
}

impl fmt::Display for AddrSpec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.dial_string())
    }
}

impl From<SocketAddr> for AddrSpec {
    fn from(addr: SocketAddr) -> Self {
        AddrSpec::from_ip(addr.ip(), addr.port())
    }
}

impl Default for AddrSpec {
    fn default() -> Self {
        AddrSpec::ipv4(Ipv4Addr::UNSPECIFIED, 0)
    }
}
