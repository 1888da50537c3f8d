use core::fmt;

use crate::error::Result;
use crate::headers::{EncodeBody, HeaderParse};
use crate::message::{Params, SipAddr};
use crate::parser::Parser;

/// The `Record-Route` SIP header.
///
/// Inserted by proxies that want to stay on the path of subsequent
/// requests in the dialog.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct RecordRoute {
    /// The recorded proxy address.
    pub addr: SipAddr,
    /// Generic header parameters.
    pub params: Option<Params>,
}

impl RecordRoute {
    /// Creates a new `RecordRoute` header.
    pub fn new(addr: SipAddr) -> Self {
        Self { addr, params: None }
    }
}

impl fmt::Display for RecordRoute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", RecordRoute::NAME)?;
        self.fmt_body(f)
    }
}

impl EncodeBody for RecordRoute {
    fn fmt_body(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.addr)?;
        if let Some(params) = &self.params {
            write!(f, ";{}", params)?;
        }
        Ok(())
    }
}

impl HeaderParse for RecordRoute {
    const NAME: &'static str = "Record-Route";
    /*
     * Record-Route  =  "Record-Route" HCOLON rec-route *(COMMA rec-route)
     * rec-route     =  name-addr *( SEMI rr-param )
     * rr-param      =  generic-param
     */
    fn parse(parser: &mut Parser<'_>) -> Result<Self> {
        let addr = parser.parse_sip_addr(false)?;
        let params = crate::macros::parse_header_param!(parser);

        Ok(RecordRoute { addr, params })
    }
}

crate::macros::structured!(RecordRoute, "record-route" { addr, params });

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let src = b"<sip:ss2.biloxi.example.com;lr>\r\n";
        let record_route = RecordRoute::from_bytes(src).unwrap();

        assert_eq!(
            record_route.encode_body(),
            "<sip:ss2.biloxi.example.com;lr>"
        );
    }
}
