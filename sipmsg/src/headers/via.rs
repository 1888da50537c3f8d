use core::fmt;
use std::net::IpAddr;

use sipmsg_util::util::is_valid_port;
use sipmsg_util::ArcStr;

use crate::error::Result;
use crate::headers::{EncodeBody, HeaderParse};
use crate::message::{Host, HostPort, Params, TransportKind};
use crate::parser::{self, Parser, SIPV2};

const MADDR_PARAM: &str = "maddr";
const BRANCH_PARAM: &str = "branch";
const TTL_PARAM: &str = "ttl";
const RPORT_PARAM: &str = "rport";
const RECEIVED_PARAM: &str = "received";

/// The branch parameter prefix RFC 3261 mandates.
pub const MAGIC_COOKIE: &str = "z9hG4bK";

/// The `Via` SIP header.
///
/// Indicates the path taken by the request so far and the path that
/// should be followed when routing responses.
///
/// # Examples
///
/// ```
/// use sipmsg::headers::Via;
///
/// let via = Via::new_udp(
///     "server10.biloxi.com".parse().unwrap(),
///     Some("z9hG4bKnashds8"),
/// );
///
/// assert_eq!(
///     "Via: SIP/2.0/UDP server10.biloxi.com;branch=z9hG4bKnashds8",
///     via.to_string()
/// );
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Via {
    transport: TransportKind,
    sent_by: HostPort,
    ttl: Option<u8>,
    maddr: Option<Host>,
    received: Option<IpAddr>,
    branch: Option<ArcStr>,
    rport: Option<u16>,
    comment: Option<ArcStr>,
    params: Option<Params>,
}

impl Via {
    /// Creates a new `Via` header with UDP transport and an optional
    /// branch.
    pub fn new_udp(sent_by: HostPort, branch: Option<&str>) -> Self {
        Self {
            transport: TransportKind::Udp,
            sent_by,
            ttl: None,
            maddr: None,
            received: None,
            branch: branch.map(|b| b.into()),
            rport: None,
            comment: None,
            params: None,
        }
    }

    /// Returns the transport.
    pub fn transport(&self) -> &TransportKind {
        &self.transport
    }

    /// Returns the sent-by host and port.
    pub fn sent_by(&self) -> &HostPort {
        &self.sent_by
    }

    /// Replaces the sent-by host and port.
    pub fn set_sent_by(&mut self, sent_by: HostPort) {
        self.sent_by = sent_by;
    }

    /// Returns the branch parameter.
    pub fn branch(&self) -> Option<&str> {
        self.branch.as_deref()
    }

    /// Returns the `received` parameter.
    pub fn received(&self) -> Option<IpAddr> {
        self.received
    }

    /// Sets the `received` parameter.
    pub fn set_received(&mut self, received: IpAddr) {
        self.received = Some(received);
    }

    /// Returns the `rport` parameter.
    pub fn rport(&self) -> Option<u16> {
        self.rport
    }

    /// Returns the `maddr` parameter.
    pub fn maddr(&self) -> Option<&Host> {
        self.maddr.as_ref()
    }

    /// The transaction identifier this Via contributes: its branch
    /// value lower-cased, when RFC 3261 compliant (magic-cookie
    /// prefixed).
    pub(crate) fn cookie_branch(&self) -> Option<String> {
        let branch = self.branch.as_deref()?;
        if branch.len() >= MAGIC_COOKIE.len()
            && branch[..MAGIC_COOKIE.len()].eq_ignore_ascii_case(MAGIC_COOKIE)
        {
            Some(branch.to_ascii_lowercase())
        } else {
            None
        }
    }
}

impl fmt::Display for Via {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", Via::NAME)?;
        self.fmt_body(f)
    }
}

impl EncodeBody for Via {
    fn fmt_body(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}/{} {}", SIPV2, self.transport, self.sent_by)?;

        if let Some(rport) = self.rport {
            write!(f, ";rport={}", rport)?;
        }
        if let Some(received) = &self.received {
            write!(f, ";received={received}")?;
        }
        if let Some(ttl) = &self.ttl {
            write!(f, ";ttl={ttl}")?;
        }
        if let Some(maddr) = &self.maddr {
            write!(f, ";maddr={maddr}")?;
        }
        if let Some(branch) = &self.branch {
            write!(f, ";branch={branch}")?;
        }
        if let Some(params) = &self.params {
            write!(f, ";{params}")?;
        }
        if let Some(comment) = &self.comment {
            write!(f, " ({comment})")?;
        }

        Ok(())
    }
}

impl HeaderParse for Via {
    const NAME: &'static str = "Via";
    const SHORT_NAME: Option<&'static str> = Some("v");
    /*
     * Via               =  ( "Via" / "v" ) HCOLON via-parm *(COMMA via-parm)
     * via-parm          =  sent-protocol LWS sent-by *( SEMI via-params )
     * via-params        =  via-ttl / via-maddr
     *                      / via-received / via-branch
     *                      / via-extension
     * sent-protocol     =  protocol-name SLASH protocol-version
     *                      SLASH transport
     * sent-by           =  host [ COLON port ]
     * ttl               =  1*3DIGIT ; 0 to 255
     */
    fn parse(parser: &mut Parser<'_>) -> Result<Self> {
        parser.skip_lws();
        parser.parse_sip_version()?;
        parser.must_read(b'/')?;
        let transport = TransportKind::from(parser.read_token()?);

        parser.skip_lws();
        let sent_by = parser.parse_host_port()?;

        let mut branch = None;
        let mut ttl = None;
        let mut maddr = None;
        let mut received = None;
        let mut rport = None;
        let params = crate::macros::parse_param!(
            parser,
            parser::parse_via_param,
            BRANCH_PARAM = branch,
            TTL_PARAM = ttl,
            MADDR_PARAM = maddr,
            RECEIVED_PARAM = received,
            RPORT_PARAM = rport
        );

        let received = received.and_then(|r: ArcStr| r.parse().ok());
        let maddr = maddr.map(|a: ArcStr| Host::new(&a));
        let ttl = match ttl {
            Some(ttl) => Some(
                ttl.parse()
                    .or_else(|_| parser.grammar_error("Via ttl is invalid"))?,
            ),
            None => None,
        };

        let rport = match rport.filter(|r: &ArcStr| !r.is_empty()) {
            Some(rport) => {
                let rport: u16 = rport
                    .parse()
                    .or_else(|_| parser.grammar_error("Via rport is invalid"))?;
                if !is_valid_port(rport) {
                    return parser.grammar_error("Via rport is invalid");
                }
                Some(rport)
            }
            None => None,
        };

        let comment = if parser.peek() == Some(&b'(') {
            parser.advance(1);
            let comment = parser.read_until_byte(b')')?;
            parser.advance(1);
            Some(comment.into())
        } else {
            None
        };

        Ok(Via {
            transport,
            sent_by,
            params,
            comment,
            ttl,
            maddr,
            received,
            branch,
            rport,
        })
    }
}

crate::macros::structured!(Via, "via" {
    transport,
    sent_by,
    ttl,
    maddr,
    received,
    branch,
    rport,
    comment,
    params,
});

#[cfg(test)]
mod tests {
    use std::net::Ipv4Addr;

    use super::*;
    use crate::message::Host;

    #[test]
    fn test_parse() {
        let src = b"SIP/2.0/UDP bobspc.biloxi.com:5060;received=192.0.2.4\r\n";
        let via = Via::from_bytes(src).unwrap();

        assert_eq!(via.transport, TransportKind::Udp);
        assert_eq!(
            via.sent_by,
            HostPort {
                host: Host::new("bobspc.biloxi.com"),
                port: Some(5060)
            }
        );
        assert_eq!(via.received, Some("192.0.2.4".parse().unwrap()));
    }

    #[test]
    fn test_parse_with_branch() {
        let src = b"SIP/2.0/UDP 192.0.2.1:5060 ;received=192.0.2.207 ;branch=z9hG4bK77asjd\r\n";
        let via = Via::from_bytes(src).unwrap();

        assert_eq!(via.transport, TransportKind::Udp);
        assert_eq!(
            via.sent_by.host.ip_addr(),
            Some(IpAddr::V4(Ipv4Addr::new(192, 0, 2, 1)))
        );
        assert_eq!(via.received, Some("192.0.2.207".parse().unwrap()));
        assert_eq!(via.branch(), Some("z9hG4bK77asjd"));
    }

    #[test]
    fn test_cookie_branch_is_case_folded() {
        let via = Via::from_bytes(b"SIP/2.0/UDP 129.6.55.181:5060;branch=z9hG4bK776sgdkse").unwrap();
        assert_eq!(via.cookie_branch().as_deref(), Some("z9hg4bk776sgdkse"));

        let legacy = Via::from_bytes(b"SIP/2.0/UDP 129.6.55.181:5060;branch=oldstyle1").unwrap();
        assert_eq!(legacy.cookie_branch(), None);
    }

    #[test]
    fn test_round_trip() {
        let src = b"SIP/2.0/TCP client.atlanta.example.com:5060;branch=z9hG4bK74b43";
        let via = Via::from_bytes(src).unwrap();
        assert_eq!(
            via.encode_body(),
            "SIP/2.0/TCP client.atlanta.example.com:5060;branch=z9hG4bK74b43"
        );
    }
}
