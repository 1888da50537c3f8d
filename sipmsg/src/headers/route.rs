use core::fmt;

use crate::error::Result;
use crate::headers::{EncodeBody, HeaderParse};
use crate::message::{Params, SipAddr};
use crate::parser::Parser;

/// The `Route` SIP header.
///
/// Forces routing of a request through the listed set of proxies.
///
/// # Examples
///
/// ```
/// use sipmsg::headers::Route;
/// use sipmsg::message::SipAddr;
///
/// let addr = SipAddr::parse_str("<sip:ss1.atlanta.com;lr>").unwrap();
/// let route = Route::new(addr);
///
/// assert_eq!("Route: <sip:ss1.atlanta.com;lr>", route.to_string());
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Route {
    /// The route-set entry.
    pub addr: SipAddr,
    /// Generic header parameters.
    pub params: Option<Params>,
}

impl Route {
    /// Creates a new `Route` header.
    pub fn new(addr: SipAddr) -> Self {
        Self { addr, params: None }
    }
}

impl fmt::Display for Route {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", Route::NAME)?;
        self.fmt_body(f)
    }
}

impl EncodeBody for Route {
    fn fmt_body(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.addr)?;
        if let Some(params) = &self.params {
            write!(f, ";{}", params)?;
        }
        Ok(())
    }
}

impl HeaderParse for Route {
    const NAME: &'static str = "Route";
    /*
     * Route        =  "Route" HCOLON route-param *(COMMA route-param)
     * route-param  =  name-addr *( SEMI rr-param )
     */
    fn parse(parser: &mut Parser<'_>) -> Result<Self> {
        let addr = parser.parse_sip_addr(false)?;
        let params = crate::macros::parse_header_param!(parser);

        Ok(Route { addr, params })
    }
}

crate::macros::structured!(Route, "route" { addr, params });

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let src = b"<sip:ss1.atlanta.example.com;lr>\r\n";
        let route = Route::from_bytes(src).unwrap();

        assert_eq!(route.addr.uri_ref().to_string(), "sip:ss1.atlanta.example.com;lr");
        assert!(route.addr.uri_ref().lr_param);
    }

    #[test]
    fn test_round_trip() {
        let route = Route::from_bytes(b"<sip:p1.example.com;lr>;hide").unwrap();
        assert_eq!(route.encode_body(), "<sip:p1.example.com;lr>;hide");
    }
}
