//! bcrypt password hashes with per-user network allowlists

use super::{CredentialStore, DiagnosticSink, RejectReason};
use cidr::IpCidr;
use std::collections::HashMap;
use std::net::{IpAddr, SocketAddr};

/// A user's password hash and the networks they may connect from
#[derive(Debug, Clone)]
pub struct UserEntry {
    password_hash: String,
    allowed_networks: Vec<IpCidr>,
}

impl UserEntry {
    /// Entry from an existing bcrypt hash
    pub fn new(password_hash: impl Into<String>, allowed_networks: Vec<IpCidr>) -> Self {
        UserEntry {
            password_hash: password_hash.into(),
            allowed_networks,
        }
    }

    /// Entry hashing `password` at bcrypt's default cost
    pub fn from_password(
        password: &str,
        allowed_networks: Vec<IpCidr>,
    ) -> Result<Self, bcrypt::BcryptError> {
        Self::from_password_with_cost(password, bcrypt::DEFAULT_COST, allowed_networks)
    }

    /// Entry hashing `password` at the given bcrypt cost
    pub fn from_password_with_cost(
        password: &str,
        cost: u32,
        allowed_networks: Vec<IpCidr>,
    ) -> Result<Self, bcrypt::BcryptError> {
        let hash = bcrypt::hash(password, cost)?;
        Ok(Self::new(hash, allowed_networks))
    }

    /// Allowed networks
    pub fn allowed_networks(&self) -> &[IpCidr] {
        &self.allowed_networks
    }

    fn password_matches(&self, password: &str) -> bool {
        match bcrypt::verify(password, &self.password_hash) {
            Ok(matches) => matches,
            Err(e) => {
                tracing::debug!("Stored password hash is unusable: {}", e);
                false
            }
        }
    }

    /// IPv4-mapped IPv6 peers match both their IPv6 form and the IPv4
    /// address they carry
    fn allows(&self, ip: IpAddr) -> bool {
        let mapped = match ip {
            IpAddr::V6(v6) => v6.to_ipv4_mapped().map(IpAddr::V4),
            IpAddr::V4(_) => None,
        };
        self.allowed_networks.iter().any(|net| {
            net.contains(&ip) || mapped.map_or(false, |v4| net.contains(&v4))
        })
    }
}

/// Credential store checking a bcrypt hash and the remote address
#[derive(Debug, Clone, Default)]
pub struct HashedCredentials {
    users: HashMap<String, UserEntry>,
}

impl HashedCredentials {
    /// Build from a username to entry map
    pub fn new(users: HashMap<String, UserEntry>) -> Self {
        HashedCredentials { users }
    }

    /// Number of users
    pub fn len(&self) -> usize {
        self.users.len()
    }

    /// Whether the store has no users
    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }
}

impl<K: Into<String>> FromIterator<(K, UserEntry)> for HashedCredentials {
    fn from_iter<I: IntoIterator<Item = (K, UserEntry)>>(iter: I) -> Self {
        HashedCredentials {
            users: iter
                .into_iter()
                .map(|(user, entry)| (user.into(), entry))
                .collect(),
        }
    }
}

impl CredentialStore for HashedCredentials {
    fn valid(
        &self,
        user: &str,
        password: &str,
        remote_addr: &str,
        sink: &dyn DiagnosticSink,
    ) -> bool {
        let Some(entry) = self.users.get(user) else {
            sink.credential_rejected(RejectReason::UnknownUser, user, remote_addr);
            return false;
        };

        if !entry.password_matches(password) {
            sink.credential_rejected(RejectReason::PasswordMismatch, user, remote_addr);
            return false;
        }

        let Some(ip) = remote_ip(remote_addr) else {
            sink.credential_rejected(RejectReason::UnparsableAddress, user, remote_addr);
            return false;
        };

        if !entry.allows(ip) {
            sink.credential_rejected(RejectReason::AddressNotAllowed, user, remote_addr);
            return false;
        }

        true
    }
}

/// IP part of `ip:port`, `[v6]:port` or a bare IP
fn remote_ip(remote_addr: &str) -> Option<IpAddr> {
    if let Ok(addr) = remote_addr.parse::<SocketAddr>() {
        Some(addr.ip())
    } else if let Ok(ip) = remote_addr.parse::<IpAddr>() {
        Some(ip)
    } else {
        let (host, _) = remote_addr.split_once(':')?;
        host.parse::<IpAddr>().ok()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::socks::credentials::testing::RecordingSink;

    /// bcrypt hash of "bar"
    const BAR_HASH: &str = "$2a$10$cWsrCEayMfSoZnLDrPXck.yNSHzcpp7vutsfpDJaf./tPQl2IVYMy";

    fn cidr(s: &str) -> IpCidr {
        s.parse().unwrap()
    }

    fn store() -> HashedCredentials {
        [
            ("foo", UserEntry::new(BAR_HASH, vec![cidr("127.0.0.1/32")])),
            ("baz", UserEntry::new(BAR_HASH, vec![cidr("127.0.0.1/32")])),
            (
                "wide",
                UserEntry::new(BAR_HASH, vec![cidr("10.0.0.0/8"), cidr("2001:db8::/32")]),
            ),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn test_hashed_credentials() {
        let sink = RecordingSink::default();
        let creds = store();

        assert!(creds.valid("foo", "bar", "127.0.0.1:47274", &sink));
        assert!(!creds.valid("baz", "bar", "192.168.0.1:47274", &sink));
        assert_eq!(sink.reasons(), vec![RejectReason::AddressNotAllowed]);
    }

    #[test]
    fn test_each_failed_check_is_reported_separately() {
        let sink = RecordingSink::default();
        let creds = store();

        assert!(!creds.valid("nobody", "bar", "127.0.0.1:1", &sink));
        assert!(!creds.valid("foo", "baz", "127.0.0.1:1", &sink));
        assert!(!creds.valid("foo", "bar", "not-an-ip:1", &sink));
        assert!(!creds.valid("foo", "bar", "127.0.0.2:1", &sink));

        assert_eq!(
            sink.reasons(),
            vec![
                RejectReason::UnknownUser,
                RejectReason::PasswordMismatch,
                RejectReason::UnparsableAddress,
                RejectReason::AddressNotAllowed,
            ]
        );
    }

    #[test]
    fn test_network_containment_v4_and_v6() {
        let sink = RecordingSink::default();
        let creds = store();

        assert!(creds.valid("wide", "bar", "10.200.3.4:5000", &sink));
        assert!(creds.valid("wide", "bar", "[2001:db8::42]:5000", &sink));
        assert!(!creds.valid("wide", "bar", "11.0.0.1:5000", &sink));
        assert!(!creds.valid("wide", "bar", "[2001:db9::1]:5000", &sink));
    }

    #[test]
    fn test_ipv4_mapped_peer_matches_either_form() {
        let sink = RecordingSink::default();
        let creds: HashedCredentials = [
            ("v4", UserEntry::new(BAR_HASH, vec![cidr("10.0.0.0/8")])),
            ("mapped", UserEntry::new(BAR_HASH, vec![cidr("::ffff:0:0/96")])),
            ("exact", UserEntry::new(BAR_HASH, vec![cidr("::ffff:10.0.0.1/128")])),
        ]
        .into_iter()
        .collect();

        assert!(creds.valid("v4", "bar", "[::ffff:10.0.0.1]:80", &sink));
        assert!(creds.valid("mapped", "bar", "[::ffff:10.0.0.1]:80", &sink));
        assert!(creds.valid("exact", "bar", "[::ffff:10.0.0.1]:80", &sink));
        assert!(!creds.valid("exact", "bar", "[::ffff:10.0.0.2]:80", &sink));
        assert!(!creds.valid("mapped", "bar", "10.0.0.1:80", &sink));
        assert!(sink.reasons().iter().all(|r| *r == RejectReason::AddressNotAllowed));
    }

    #[test]
    fn test_unusable_hash_fails_closed() {
        let sink = RecordingSink::default();
        let creds: HashedCredentials =
            [("foo", UserEntry::new("not-a-hash", vec![cidr("0.0.0.0/0")]))]
                .into_iter()
                .collect();

        assert!(!creds.valid("foo", "not-a-hash", "127.0.0.1:1", &sink));
        assert_eq!(sink.reasons(), vec![RejectReason::PasswordMismatch]);
    }

    #[test]
    fn test_from_password_with_cost() {
        let sink = RecordingSink::default();
        let entry = UserEntry::from_password_with_cost("s3cret", 4, vec![cidr("0.0.0.0/0")])
            .unwrap();
        let creds: HashedCredentials = [("alice", entry)].into_iter().collect();

        assert!(creds.valid("alice", "s3cret", "8.8.8.8:53", &sink));
        assert!(!creds.valid("alice", "S3cret", "8.8.8.8:53", &sink));
    }

    #[test]
    fn test_remote_ip_forms() {
        assert_eq!(
            remote_ip("127.0.0.1:47274"),
            Some("127.0.0.1".parse().unwrap())
        );
        assert_eq!(remote_ip("[::1]:80"), Some("::1".parse().unwrap()));
        assert_eq!(remote_ip("10.1.1.1"), Some("10.1.1.1".parse().unwrap()));
        assert_eq!(
            remote_ip("[::ffff:127.0.0.1]:80"),
            Some("::ffff:127.0.0.1".parse().unwrap())
        );
        assert_eq!(remote_ip("127.0.0.1:notaport"), Some("127.0.0.1".parse().unwrap()));
        assert_eq!(remote_ip(""), None);
        assert_eq!(remote_ip("localhost:80"), None);
    }
}
