use std::fmt;
use std::str::FromStr;

use enum_as_inner::EnumAsInner;
use itertools::Itertools;
use sipmsg_util::ArcStr;

use crate::error::{Error, Result};
use crate::object::Structured;
use crate::parser::Parser;

use super::{Host, HostPort, Params, SipMethod};

#[derive(Debug, PartialEq, Eq, Clone, Default, Copy)]
/// A SIP URI scheme, either `sip` or `sips`.
pub enum Scheme {
    #[default]
    /// The `sip` uri scheme.
    Sip,
    /// The `sips` uri scheme.
    Sips,
}

impl fmt::Display for Scheme {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Scheme::Sip => f.write_str("sip"),
            Scheme::Sips => f.write_str("sips"),
        }
    }
}

crate::macros::scalar_value!(Scheme);

#[derive(Debug, PartialEq, Eq, Clone, Hash)]
/// The transport a URI or Via names.
pub enum TransportKind {
    /// UDP transport.
    Udp,
    /// TCP transport.
    Tcp,
    /// TLS over TCP.
    Tls,
    /// SCTP transport.
    Sctp,
    /// WebSocket transport.
    Ws,
    /// Secure WebSocket transport.
    Wss,
    /// A transport token not known to this crate.
    Other(ArcStr),
}

impl TransportKind {
    /// Returns the canonical (upper-cased) token.
    pub fn as_str(&self) -> &str {
        match self {
            TransportKind::Udp => "UDP",
            TransportKind::Tcp => "TCP",
            TransportKind::Tls => "TLS",
            TransportKind::Sctp => "SCTP",
            TransportKind::Ws => "WS",
            TransportKind::Wss => "WSS",
            TransportKind::Other(token) => token,
        }
    }
}

impl From<&str> for TransportKind {
    fn from(value: &str) -> Self {
        if value.eq_ignore_ascii_case("udp") {
            TransportKind::Udp
        } else if value.eq_ignore_ascii_case("tcp") {
            TransportKind::Tcp
        } else if value.eq_ignore_ascii_case("tls") {
            TransportKind::Tls
        } else if value.eq_ignore_ascii_case("sctp") {
            TransportKind::Sctp
        } else if value.eq_ignore_ascii_case("ws") {
            TransportKind::Ws
        } else if value.eq_ignore_ascii_case("wss") {
            TransportKind::Wss
        } else {
            TransportKind::Other(value.to_ascii_uppercase().into())
        }
    }
}

impl fmt::Display for TransportKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

crate::macros::scalar_value!(TransportKind);

#[derive(Debug, PartialEq, Eq, Clone)]
/// The user information component of a URI.
pub struct UserInfo {
    /// The username part of the URI.
    pub user: ArcStr,
    /// The optional password associated with the user.
    pub pass: Option<ArcStr>,
}

impl UserInfo {
    /// Creates a `UserInfo` from its parts.
    pub fn new(user: &str, pass: Option<&str>) -> Self {
        Self {
            user: user.into(),
            pass: pass.map(|p| p.into()),
        }
    }
}

impl fmt::Display for UserInfo {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.user)?;
        if let Some(pass) = &self.pass {
            write!(f, ":{}", pass)?;
        }
        Ok(())
    }
}

crate::macros::structured!(UserInfo, "user-info" { user, pass });

#[derive(Debug, PartialEq, Eq, Default, Clone)]
/// A SIP URI.
pub struct Uri {
    /// The uri scheme.
    pub scheme: Scheme,
    /// Optional user part of the uri.
    pub user: Option<UserInfo>,
    /// The uri host and optional port.
    pub host_port: HostPort,
    /// Optional `user` parameter.
    pub user_param: Option<ArcStr>,
    /// Optional `method` parameter.
    pub method_param: Option<SipMethod>,
    /// Optional `transport` parameter.
    pub transport_param: Option<TransportKind>,
    /// Optional `ttl` parameter.
    pub ttl_param: Option<u8>,
    /// The `lr` flag parameter.
    pub lr_param: bool,
    /// Optional `maddr` parameter.
    pub maddr_param: Option<Host>,
    /// Other parameters.
    pub params: Option<Params>,
    /// Optional header parameters (the `?name=value` part).
    pub hdr_params: Option<Params>,
}

impl Uri {
    /// Creates a `Uri` without parameters.
    pub fn without_params(scheme: Scheme, user: Option<UserInfo>, host_port: HostPort) -> Self {
        Uri {
            scheme,
            user,
            host_port,
            ..Default::default()
        }
    }

    /// Parses a `Uri` from a string.
    pub fn parse_str(s: &str) -> Result<Self> {
        Parser::new(s.as_bytes()).parse_uri(true)
    }

    /// Returns a builder for a new URI.
    pub fn builder() -> UriBuilder {
        UriBuilder::new()
    }

    /// Returns the user part of the uri.
    pub fn user(&self) -> Option<&UserInfo> {
        self.user.as_ref()
    }

    /// `user@host:port` rendering used by transaction identifiers.
    pub(crate) fn user_host_port(&self) -> String {
        match &self.user {
            Some(user) => format!("{}@{}", user.user, self.host_port),
            None => self.host_port.to_string(),
        }
    }
}

impl FromStr for Uri {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        Self::parse_str(s)
    }
}

impl fmt::Display for Uri {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:", self.scheme)?;

        if let Some(user) = &self.user {
            write!(f, "{}@", user)?;
        }
        write!(f, "{}", self.host_port)?;

        if let Some(user) = &self.user_param {
            write!(f, ";user={}", user)?;
        }
        if let Some(method) = &self.method_param {
            write!(f, ";method={}", method)?;
        }
        if let Some(maddr) = &self.maddr_param {
            write!(f, ";maddr={}", maddr)?;
        }
        if let Some(transport) = &self.transport_param {
            write!(f, ";transport={}", transport)?;
        }
        if let Some(ttl) = self.ttl_param {
            write!(f, ";ttl={}", ttl)?;
        }
        if self.lr_param {
            write!(f, ";lr")?;
        }
        if let Some(params) = &self.params {
            write!(f, ";{}", params)?;
        }
        if let Some(hdr_params) = &self.hdr_params {
            let formatter = Itertools::format_with(hdr_params.iter(), "&", |it, f| {
                f(&format_args!("{}={}", it.name().unwrap_or(""), it.value().unwrap_or("")))
            });
            write!(f, "?{}", formatter)?;
        }

        Ok(())
    }
}

crate::macros::structured!(Uri, "uri" {
    scheme,
    user,
    host_port,
    user_param,
    method_param,
    transport_param,
    ttl_param,
    lr_param,
    maddr_param,
    params,
    hdr_params,
});

#[derive(Default)]
/// Builder for creating a new SIP URI.
pub struct UriBuilder {
    uri: Uri,
}

impl UriBuilder {
    /// Returns an empty builder.
    pub fn new() -> Self {
        Self::default()
    }

    /// Sets the uri scheme.
    pub fn scheme(mut self, scheme: Scheme) -> Self {
        self.uri.scheme = scheme;
        self
    }

    /// Sets the user part of the uri.
    pub fn user(mut self, user: UserInfo) -> Self {
        self.uri.user = Some(user);
        self
    }

    /// Sets the host of the uri.
    pub fn host(mut self, host_port: HostPort) -> Self {
        self.uri.host_port = host_port;
        self
    }

    /// Sets the user parameter of the uri.
    pub fn user_param(mut self, param: &str) -> Self {
        self.uri.user_param = Some(param.into());
        self
    }

    /// Sets the method parameter of the uri.
    pub fn method_param(mut self, param: SipMethod) -> Self {
        self.uri.method_param = Some(param);
        self
    }

    /// Sets the transport parameter of the uri.
    pub fn transport_param(mut self, param: TransportKind) -> Self {
        self.uri.transport_param = Some(param);
        self
    }

    /// Sets the ttl parameter of the uri.
    pub fn ttl_param(mut self, param: u8) -> Self {
        self.uri.ttl_param = Some(param);
        self
    }

    /// Sets the lr parameter of the uri.
    pub fn lr_param(mut self, param: bool) -> Self {
        self.uri.lr_param = param;
        self
    }

    /// Sets the maddr parameter of the uri.
    pub fn maddr_param(mut self, param: Host) -> Self {
        self.uri.maddr_param = Some(param);
        self
    }

    /// Sets a generic parameter of the uri.
    pub fn param(mut self, name: &str, value: Option<&str>) -> Self {
        self.uri
            .params
            .get_or_insert_with(Params::new)
            .push(super::Param::new(name, value));
        self
    }

    /// Sets a header parameter of the uri.
    pub fn header_param(mut self, name: &str, value: Option<&str>) -> Self {
        self.uri
            .hdr_params
            .get_or_insert_with(Params::new)
            .push(super::Param::new(name, value));
        self
    }

    /// Finalizes the builder into a `Uri`.
    pub fn get(self) -> Uri {
        self.uri
    }
}

/// A SIP `name-addr`.
///
/// Typically appears in `From`, `To`, `Contact` and `Route` headers:
/// an optional display name followed by a `<>`-enclosed uri.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct NameAddr {
    /// The optional display part.
    pub display: Option<ArcStr>,
    /// The uri of the `name-addr`.
    pub uri: Uri,
}

impl NameAddr {
    /// Creates a `NameAddr` without a display name.
    pub fn new(uri: Uri) -> Self {
        Self { display: None, uri }
    }

    /// Parses a `NameAddr` from a string.
    pub fn parse_str(s: &str) -> Result<Self> {
        Parser::new(s.as_bytes()).parse_name_addr()
    }
}

fn display_needs_quoting(display: &str) -> bool {
    display.bytes().any(|b| !crate::parser::is_token(b))
}

impl fmt::Display for NameAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if let Some(display) = &self.display {
            if display_needs_quoting(display) {
                write!(f, "\"{}\" ", display)?;
            } else {
                write!(f, "{} ", display)?;
            }
        }
        write!(f, "<{}>", self.uri)
    }
}

crate::macros::structured!(NameAddr, "name-addr" { display, uri });

/// The address of an address-bearing header: either a plain
/// `addr-spec` URI or a `name-addr`.
///
/// The distinction decides parameter ownership: parameters after a
/// bare URI belong to the enclosing header, parameters inside a
/// `<>`-enclosed URI belong to the URI itself.
#[derive(Debug, PartialEq, Eq, Clone, EnumAsInner)]
pub enum SipAddr {
    /// A plain SIP URI (e.g. `sip:user@example.com`).
    Uri(Uri),
    /// A named address (e.g. `"Alice" <sip:user@example.com>`).
    NameAddr(NameAddr),
}

impl SipAddr {
    /// Parses a `SipAddr` from a string.
    pub fn parse_str(s: &str) -> Result<Self> {
        Parser::new(s.as_bytes()).parse_sip_addr(true)
    }

    /// Returns the scheme of the address.
    pub fn scheme(&self) -> Scheme {
        self.uri_ref().scheme
    }

    /// Returns the user part of the address.
    pub fn user(&self) -> Option<&UserInfo> {
        self.uri_ref().user.as_ref()
    }

    /// Returns the host and port of the address.
    pub fn host_port(&self) -> &HostPort {
        &self.uri_ref().host_port
    }

    /// Returns the underlying URI, whichever form the address takes.
    pub fn uri_ref(&self) -> &Uri {
        match self {
            SipAddr::Uri(uri) => uri,
            SipAddr::NameAddr(addr) => &addr.uri,
        }
    }

    /// Mutable form of [`SipAddr::uri_ref`].
    pub fn uri_mut(&mut self) -> &mut Uri {
        match self {
            SipAddr::Uri(uri) => uri,
            SipAddr::NameAddr(addr) => &mut addr.uri,
        }
    }

    /// Returns the display name, when the address carries one.
    pub fn display(&self) -> Option<&str> {
        match self {
            SipAddr::Uri(_) => None,
            SipAddr::NameAddr(addr) => addr.display.as_deref(),
        }
    }
}

impl fmt::Display for SipAddr {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SipAddr::Uri(uri) => write!(f, "{}", uri),
            SipAddr::NameAddr(addr) => write!(f, "{}", addr),
        }
    }
}

impl Structured for SipAddr {
    fn type_label(&self) -> &'static str {
        "addr"
    }

    fn as_any(&self) -> &dyn std::any::Any {
        self
    }

    fn matches_dyn(&self, template: &dyn Structured) -> bool {
        let Some(template) = template.as_any().downcast_ref::<SipAddr>() else {
            return false;
        };
        match (self, template) {
            (SipAddr::Uri(a), SipAddr::Uri(b)) => a.matches_dyn(b),
            (SipAddr::NameAddr(a), SipAddr::NameAddr(b)) => a.matches_dyn(b),
            _ => false,
        }
    }

    fn merge_dyn(&mut self, other: &dyn Structured) -> Result<()> {
        let Some(other) = other.as_any().downcast_ref::<SipAddr>() else {
            return Err(Error::TypeMismatch {
                expected: "addr",
                found: other.type_label(),
            });
        };
        match (&mut *self, other) {
            (SipAddr::Uri(a), SipAddr::Uri(b)) => a.merge_dyn(b),
            (SipAddr::NameAddr(a), SipAddr::NameAddr(b)) => a.merge_dyn(b),
            // Across forms the other side wins wholesale.
            (this, other) => {
                *this = other.clone();
                Ok(())
            }
        }
    }

    fn assign_from(&mut self, other: &dyn Structured) -> bool {
        match other.as_any().downcast_ref::<SipAddr>() {
            Some(other) => {
                *self = other.clone();
                true
            }
            None => false,
        }
    }

    fn children(&self) -> Vec<(&'static str, &dyn Structured)> {
        match self {
            SipAddr::Uri(uri) => vec![("uri", uri as &dyn Structured)],
            SipAddr::NameAddr(addr) => vec![("name_addr", addr as &dyn Structured)],
        }
    }

    fn children_mut(&mut self) -> Vec<(&'static str, &mut dyn Structured)> {
        match self {
            SipAddr::Uri(uri) => vec![("uri", uri as &mut dyn Structured)],
            SipAddr::NameAddr(addr) => vec![("name_addr", addr as &mut dyn Structured)],
        }
    }

    fn scalar_fields(&self) -> Vec<(&'static str, String)> {
        Vec::new()
    }
}

crate::macros::node_value!(SipAddr);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_uri_display() {
        let uri = UriBuilder::new()
            .user(UserInfo::new("alice", None))
            .host(HostPort::from(Host::new("atlanta.com")))
            .transport_param(TransportKind::Tcp)
            .get();

        assert_eq!(uri.to_string(), "sip:alice@atlanta.com;transport=TCP");
    }

    #[test]
    fn test_name_addr_display_quoting() {
        let uri = UriBuilder::new().host(HostPort::from(Host::new("wonderland.com"))).get();

        let plain = NameAddr {
            display: Some("Alice".into()),
            uri: uri.clone(),
        };
        assert_eq!(plain.to_string(), "Alice <sip:wonderland.com>");

        let spaced = NameAddr {
            display: Some("Alice Liddell".into()),
            uri,
        };
        assert_eq!(spaced.to_string(), "\"Alice Liddell\" <sip:wonderland.com>");
    }

    #[test]
    fn test_addr_accessors() {
        let addr = SipAddr::NameAddr(NameAddr {
            display: Some("Bob".into()),
            uri: UriBuilder::new()
                .user(UserInfo::new("bob", None))
                .host(HostPort::from(Host::new("biloxi.com")))
                .get(),
        });

        assert_eq!(addr.display(), Some("Bob"));
        assert_eq!(addr.user().map(|u| u.user.as_ref()), Some("bob"));
        assert!(addr.as_name_addr().is_some());
    }
}
