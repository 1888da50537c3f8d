use core::fmt;

use sipmsg_util::ArcStr;

use crate::error::Result;
use crate::headers::{EncodeBody, HeaderParse, TAG_PARAM};
use crate::message::{Params, SipAddr};
use crate::parser::Parser;

/// The `From` SIP header.
///
/// Indicates the initiator of the request.
///
/// # Examples
///
/// ```
/// use sipmsg::headers::From;
/// use sipmsg::message::SipAddr;
///
/// let addr = SipAddr::parse_str("<sip:alice@atlanta.com>").unwrap();
/// let from = From::new(addr);
///
/// assert_eq!("From: <sip:alice@atlanta.com>", from.to_string());
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct From {
    addr: SipAddr,
    tag: Option<ArcStr>,
    params: Option<Params>,
}

impl From {
    /// Creates a new `From` header.
    pub fn new(addr: SipAddr) -> Self {
        Self {
            addr,
            tag: None,
            params: None,
        }
    }

    /// Returns the address of the header.
    pub fn addr(&self) -> &SipAddr {
        &self.addr
    }

    /// Returns the display name, if the address carries one.
    pub fn display(&self) -> Option<&str> {
        self.addr.display()
    }

    /// Returns the tag parameter.
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    /// Sets the tag parameter.
    pub fn set_tag(&mut self, tag: Option<&str>) {
        self.tag = tag.map(|t| t.into());
    }

    /// Returns the generic header parameters.
    pub fn params(&self) -> Option<&Params> {
        self.params.as_ref()
    }
}

impl fmt::Display for From {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", From::NAME)?;
        self.fmt_body(f)
    }
}

impl EncodeBody for From {
    fn fmt_body(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.addr)?;
        if let Some(tag) = &self.tag {
            write!(f, ";tag={}", tag)?;
        }
        if let Some(params) = &self.params {
            write!(f, ";{}", params)?;
        }
        Ok(())
    }
}

impl HeaderParse for From {
    const NAME: &'static str = "From";
    const SHORT_NAME: Option<&'static str> = Some("f");
    /*
     * From        =  ( "From" / "f" ) HCOLON from-spec
     * from-spec   =  ( name-addr / addr-spec )
     *                *( SEMI from-param )
     * from-param  =  tag-param / generic-param
     * tag-param   =  "tag" EQUAL token
     */
    fn parse(parser: &mut Parser<'_>) -> Result<Self> {
        let addr = parser.parse_sip_addr(false)?;
        let mut tag = None;
        let params = crate::macros::parse_header_param!(parser, TAG_PARAM = tag);

        Ok(From { addr, tag, params })
    }
}

crate::macros::structured!(From, "from" { addr, tag, params });

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::message::{Host, HostKind, Scheme};

    #[test]
    fn test_parse() {
        let src = b"\"A. G. Bell\" <sip:agb@bell-telephone.com> ;tag=a48s\r\n";
        let mut parser = Parser::new(src);
        let from = From::parse(&mut parser).unwrap();

        assert_matches!(&from.addr, SipAddr::NameAddr(addr) => {
            assert_eq!(addr.display.as_deref(), Some("A. G. Bell"));
            assert_eq!(addr.uri.user.as_ref().unwrap().user, "agb");
            assert_eq!(addr.uri.host_port.host, Host::new("bell-telephone.com"));
            assert_eq!(addr.uri.host_port.port, None);
            assert_eq!(addr.uri.scheme, Scheme::Sip);
        });
        assert_eq!(from.tag(), Some("a48s"));
    }

    #[test]
    fn test_parse_bare_addr_spec() {
        let src = b"sip:+12125551212@server.phone2net.com;tag=887s\r\n";
        let from = From::from_bytes(src).unwrap();

        assert_matches!(&from.addr, SipAddr::Uri(uri) => {
            assert_eq!(uri.user.as_ref().unwrap().user, "+12125551212");
            assert_matches!(uri.host_port.host.kind(), HostKind::Hostname(h) => {
                assert_eq!(h.as_ref(), "server.phone2net.com");
            });
        });
        // Without angle brackets the tag belongs to the header, not
        // the URI.
        assert_eq!(from.tag(), Some("887s"));
    }

    #[test]
    fn test_round_trip() {
        let from = From::from_bytes(b"Anonymous <sip:c8oqz84zk7z@privacy.org>;tag=hyh8").unwrap();
        assert_eq!(from.encode_body(), "Anonymous <sip:c8oqz84zk7z@privacy.org>;tag=hyh8");
    }
}
