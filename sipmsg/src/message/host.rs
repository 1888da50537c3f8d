use std::fmt;
use std::net::{IpAddr, Ipv4Addr, Ipv6Addr, ToSocketAddrs};
use std::str::FromStr;
use std::sync::OnceLock;

use sipmsg_util::ArcStr;
use thiserror::Error;

use crate::error::{Error, Result};
use crate::object::Structured;
use crate::parser::Parser;

/// An error resolving a [`Host`] to an IP address.
#[derive(Debug, Error)]
pub enum ResolutionError {
    /// The DNS lookup itself failed.
    #[error("DNS lookup for {host} failed: {source}")]
    Lookup {
        /// The hostname that was looked up.
        host: ArcStr,
        /// The underlying I/O failure.
        source: std::io::Error,
    },
    /// The lookup succeeded but returned no addresses.
    #[error("DNS lookup for {0} returned no addresses")]
    NoAddresses(ArcStr),
}

/// The shape of a [`Host`]: a DNS name or an IP literal.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum HostKind {
    /// A domain name, such as `example.com`. Always stored
    /// lower-cased.
    Hostname(ArcStr),
    /// An IPv4 literal.
    Ipv4(Ipv4Addr),
    /// An IPv6 literal. Encoded wrapped in `[...]`.
    Ipv6(Ipv6Addr),
}

/// The host part of a URI or Via sent-by.
///
/// Carries a lazily filled resolution cache; any mutation of the host
/// text invalidates it.
#[derive(Debug)]
pub struct Host {
    kind: HostKind,
    resolved: OnceLock<IpAddr>,
}

impl Host {
    /// Classifies `text` into a hostname, an IPv4 literal or an IPv6
    /// literal (with or without the enclosing brackets). Hostnames are
    /// folded to lowercase.
    pub fn new(text: &str) -> Self {
        let kind = if let Some(inner) = text.strip_prefix('[').and_then(|t| t.strip_suffix(']')) {
            match inner.parse() {
                Ok(addr) => HostKind::Ipv6(addr),
                Err(_) => HostKind::Hostname(text.to_ascii_lowercase().into()),
            }
        } else if text.contains(':') {
            match text.parse() {
                Ok(addr) => HostKind::Ipv6(addr),
                Err(_) => HostKind::Hostname(text.to_ascii_lowercase().into()),
            }
        } else if let Ok(addr) = text.parse::<Ipv4Addr>() {
            HostKind::Ipv4(addr)
        } else {
            HostKind::Hostname(text.to_ascii_lowercase().into())
        };

        Self::from_kind(kind)
    }

    /// Creates a `Host` from an already classified [`HostKind`].
    pub fn from_kind(kind: HostKind) -> Self {
        Host {
            kind,
            resolved: OnceLock::new(),
        }
    }

    /// Returns the shape of this host.
    pub fn kind(&self) -> &HostKind {
        &self.kind
    }

    /// Returns the hostname if this host is a domain name.
    pub fn hostname(&self) -> Option<&str> {
        match &self.kind {
            HostKind::Hostname(name) => Some(name),
            _ => None,
        }
    }

    /// Returns the IP address if this host is an IP literal.
    pub fn ip_addr(&self) -> Option<IpAddr> {
        match self.kind {
            HostKind::Hostname(_) => None,
            HostKind::Ipv4(addr) => Some(IpAddr::V4(addr)),
            HostKind::Ipv6(addr) => Some(IpAddr::V6(addr)),
        }
    }

    /// Returns `true` if the host is an IP literal.
    pub fn is_ip_addr(&self) -> bool {
        !matches!(self.kind, HostKind::Hostname(_))
    }

    /// Returns `true` if the host is an IPv6 literal.
    pub fn is_ipv6(&self) -> bool {
        matches!(self.kind, HostKind::Ipv6(_))
    }

    /// Replaces the host text, invalidating the resolution cache.
    pub fn set(&mut self, kind: HostKind) {
        self.kind = kind;
        self.resolved = OnceLock::new();
    }

    /// Resolves this host to an IP address.
    ///
    /// IP literals resolve to themselves. Hostnames go through the
    /// system resolver; this is the only operation in the crate that
    /// performs (blocking) I/O. The result is cached per instance, so
    /// repeated calls do not hit the resolver again.
    pub fn resolve(&self) -> std::result::Result<IpAddr, ResolutionError> {
        if let Some(addr) = self.resolved.get() {
            return Ok(*addr);
        }

        let addr = match &self.kind {
            HostKind::Ipv4(addr) => IpAddr::V4(*addr),
            HostKind::Ipv6(addr) => IpAddr::V6(*addr),
            HostKind::Hostname(name) => (name.as_ref(), 0u16)
                .to_socket_addrs()
                .map_err(|source| ResolutionError::Lookup {
                    host: name.clone(),
                    source,
                })?
                .next()
                .map(|sockaddr| sockaddr.ip())
                .ok_or_else(|| ResolutionError::NoAddresses(name.clone()))?,
        };

        Ok(*self.resolved.get_or_init(|| addr))
    }
}

impl Clone for Host {
    fn clone(&self) -> Self {
        let resolved = OnceLock::new();
        if let Some(addr) = self.resolved.get() {
            let _ = resolved.set(*addr);
        }
        Host {
            kind: self.kind.clone(),
            resolved,
        }
    }
}

// The resolution cache is transient and takes no part in equality.
impl PartialEq for Host {
    fn eq(&self, other: &Self) -> bool {
        self.kind == other.kind
    }
}

impl Eq for Host {}

impl std::hash::Hash for Host {
    fn hash<H: std::hash::Hasher>(&self, state: &mut H) {
        self.kind.hash(state);
    }
}

impl From<IpAddr> for Host {
    fn from(addr: IpAddr) -> Self {
        match addr {
            IpAddr::V4(addr) => Host::from_kind(HostKind::Ipv4(addr)),
            IpAddr::V6(addr) => Host::from_kind(HostKind::Ipv6(addr)),
        }
    }
}

impl FromStr for Host {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        if s.is_empty() {
            return Err(Error::Grammar {
                message: "empty host".into(),
                line: 1,
                col: 1,
            });
        }
        Ok(Host::new(s))
    }
}

impl fmt::Display for Host {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.kind {
            HostKind::Hostname(name) => f.write_str(name),
            HostKind::Ipv4(addr) => write!(f, "{addr}"),
            HostKind::Ipv6(addr) => write!(f, "[{addr}]"),
        }
    }
}

impl Structured for Host {
    fn type_label(&self) -> &'static str {
        "host"
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn matches_dyn(&self, template: &dyn Structured) -> bool {
        match template.as_any().downcast_ref::<Host>() {
            // Hostnames are stored lower-cased, plain equality is
            // already case-insensitive.
            Some(template) => self.kind == template.kind,
            None => false,
        }
    }

    fn merge_dyn(&mut self, other: &dyn Structured) -> Result<()> {
        let Some(other) = other.as_any().downcast_ref::<Host>() else {
            return Err(Error::TypeMismatch {
                expected: "host",
                found: other.type_label(),
            });
        };
        self.set(other.kind.clone());
        Ok(())
    }

    fn assign_from(&mut self, other: &dyn Structured) -> bool {
        match other.as_any().downcast_ref::<Host>() {
            Some(other) => {
                *self = other.clone();
                true
            }
            None => false,
        }
    }

    fn children(&self) -> Vec<(&'static str, &dyn Structured)> {
        Vec::new()
    }

    fn children_mut(&mut self) -> Vec<(&'static str, &mut dyn Structured)> {
        Vec::new()
    }

    fn scalar_fields(&self) -> Vec<(&'static str, String)> {
        vec![("host", self.to_string())]
    }
}

crate::macros::node_value!(Host);

/// A host plus an optional port.
#[derive(Debug, PartialEq, Eq, Clone, Hash)]
pub struct HostPort {
    /// The host part, a domain name or an IP literal.
    pub host: Host,
    /// The optional port number.
    pub port: Option<u16>,
}

impl HostPort {
    /// Creates a `HostPort` from its parts.
    pub fn new(host: Host, port: Option<u16>) -> Self {
        Self { host, port }
    }

    /// Returns the IP address if the host is an IP literal.
    pub fn ip_addr(&self) -> Option<IpAddr> {
        self.host.ip_addr()
    }

    /// Returns `true` if the host is an IP literal.
    pub fn is_ip_addr(&self) -> bool {
        self.host.is_ip_addr()
    }
}

impl Default for HostPort {
    fn default() -> Self {
        HostPort::from(Host::new("localhost"))
    }
}

impl From<Host> for HostPort {
    fn from(host: Host) -> Self {
        Self { host, port: None }
    }
}

impl FromStr for HostPort {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Parser::new(s.as_bytes()).parse_host_port()
    }
}

impl fmt::Display for HostPort {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.host)?;
        if let Some(port) = self.port {
            write!(f, ":{}", port)?;
        }
        Ok(())
    }
}

crate::macros::structured!(HostPort, "host-port" { host, port });

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_hostname_case_folding() {
        let host = Host::new("FOO.BAR.COM");
        assert_eq!(host.hostname(), Some("foo.bar.com"));
        assert_eq!(host.to_string(), "foo.bar.com");
    }

    #[test]
    fn test_ipv6_bracket_normalization() {
        let host = Host::new("[::1]");
        assert_eq!(host.to_string(), "[::1]");

        // A bare IPv6 literal gains brackets on encode.
        let host = Host::new("::1");
        assert!(host.is_ipv6());
        assert_eq!(host.to_string(), "[::1]");
    }

    #[test]
    fn test_ipv4_classification() {
        let host = Host::new("192.0.2.1");
        assert_eq!(host.ip_addr(), Some("192.0.2.1".parse().unwrap()));
    }

    #[test]
    fn test_resolve_ip_literal_is_identity() {
        let host = Host::new("127.0.0.1");
        assert_eq!(host.resolve().unwrap(), IpAddr::V4(Ipv4Addr::LOCALHOST));
    }

    #[test]
    fn test_mutation_invalidates_cache() {
        let mut host = Host::new("127.0.0.1");
        host.resolve().unwrap();

        host.set(HostKind::Ipv4(Ipv4Addr::new(192, 0, 2, 7)));
        assert_eq!(host.resolve().unwrap(), "192.0.2.7".parse::<IpAddr>().unwrap());
    }

    #[test]
    fn test_host_port_from_str() {
        let hp: HostPort = "foo.bar.com:1234".parse().unwrap();
        assert_eq!(hp.host.hostname(), Some("foo.bar.com"));
        assert_eq!(hp.port, Some(1234));

        let hp: HostPort = "foo.bar.com".parse().unwrap();
        assert_eq!(hp.port, None);

        // A port with no host is rejected.
        assert!(":1234".parse::<HostPort>().is_err());
        // A non-digit port is rejected.
        assert!("foo.bar.com:56ty".parse::<HostPort>().is_err());
    }

    #[test]
    fn test_host_port_display() {
        let hp = HostPort::new(Host::new("foo.bar.com"), Some(1234));
        assert_eq!(hp.to_string(), "foo.bar.com:1234");

        let hp = HostPort::new(Host::new("::1"), Some(5060));
        assert_eq!(hp.to_string(), "[::1]:5060");
    }
}
