use core::fmt;

use crate::error::Result;
use crate::headers::{EncodeBody, HeaderParse};
use crate::message::Credential;
use crate::parser::Parser;

/// The `Proxy-Authorization` SIP header.
///
/// Carries the credentials a user agent presents to a proxy.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ProxyAuthorization {
    credential: Credential,
}

impl ProxyAuthorization {
    /// Creates a new `ProxyAuthorization` header.
    pub fn new(credential: Credential) -> Self {
        Self { credential }
    }

    /// Returns the credentials.
    pub fn credential(&self) -> &Credential {
        &self.credential
    }
}

impl fmt::Display for ProxyAuthorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", ProxyAuthorization::NAME)?;
        self.fmt_body(f)
    }
}

impl EncodeBody for ProxyAuthorization {
    fn fmt_body(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.credential)
    }
}

impl HeaderParse for ProxyAuthorization {
    const NAME: &'static str = "Proxy-Authorization";
    /*
     * Proxy-Authorization  =  "Proxy-Authorization" HCOLON credentials
     */
    fn parse(parser: &mut Parser<'_>) -> Result<Self> {
        let credential = parser.parse_auth_credential()?;

        Ok(ProxyAuthorization { credential })
    }
}

crate::macros::structured!(ProxyAuthorization, "proxy-authorization" { credential });

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let src = b"Digest username=\"bob\", realm=\"biloxi.com\", uri=\"sip:biloxi.com\"";
        let proxy_auth = ProxyAuthorization::from_bytes(src).unwrap();
        assert_eq!(
            proxy_auth.encode_body(),
            "Digest username=\"bob\", realm=\"biloxi.com\", uri=\"sip:biloxi.com\""
        );
    }
}
