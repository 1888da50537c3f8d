use core::fmt;

use sipmsg_util::ArcStr;

use crate::error::Result;
use crate::headers::{EncodeBody, HeaderParse, TAG_PARAM};
use crate::message::{Params, SipAddr};
use crate::parser::Parser;

/// The `To` SIP header.
///
/// Specifies the logical recipient of the request.
///
/// # Examples
///
/// ```
/// use sipmsg::headers::To;
/// use sipmsg::message::SipAddr;
///
/// let addr = SipAddr::parse_str("Bob <sip:bob@biloxi.com>").unwrap();
/// let to = To::new(addr);
///
/// assert_eq!("To: Bob <sip:bob@biloxi.com>", to.to_string());
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct To {
    addr: SipAddr,
    tag: Option<ArcStr>,
    params: Option<Params>,
}

impl To {
    /// Creates a new `To` header.
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
}

impl fmt::Display for To {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", To::NAME)?;
        self.fmt_body(f)
    }
}

impl EncodeBody for To {
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

impl HeaderParse for To {
    const NAME: &'static str = "To";
    const SHORT_NAME: Option<&'static str> = Some("t");
    /*
     * To        =  ( "To" / "t" ) HCOLON ( name-addr
     *              / addr-spec ) *( SEMI to-param )
     * to-param  =  tag-param / generic-param
     */
    fn parse(parser: &mut Parser<'_>) -> Result<Self> {
        let addr = parser.parse_sip_addr(false)?;
        let mut tag = None;
        let params = crate::macros::parse_header_param!(parser, TAG_PARAM = tag);

        Ok(To { addr, tag, params })
    }
}

crate::macros::structured!(To, "to" { addr, tag, params });

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;

    #[test]
    fn test_parse() {
        let src = b"Bob <sip:bob@biloxi.com>;tag=a6c85cf\r\n";
        let to = To::from_bytes(src).unwrap();

        assert_matches!(&to.addr, SipAddr::NameAddr(addr) => {
            assert_eq!(addr.display.as_deref(), Some("Bob"));
            assert_eq!(addr.uri.to_string(), "sip:bob@biloxi.com");
        });
        assert_eq!(to.tag(), Some("a6c85cf"));
    }

    #[test]
    fn test_set_tag() {
        let mut to = To::from_bytes(b"<sip:bob@biloxi.com>").unwrap();
        assert_eq!(to.tag(), None);

        to.set_tag(Some("a6c85cf"));
        assert_eq!(to.encode_body(), "<sip:bob@biloxi.com>;tag=a6c85cf");
    }
}
