use core::fmt;

use crate::error::Result;
use crate::headers::{EncodeBody, HeaderParse};
use crate::message::Challenge;
use crate::parser::Parser;

/// The `Proxy-Authenticate` SIP header.
///
/// Carries the challenge of a 407 response.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ProxyAuthenticate {
    challenge: Challenge,
}

impl ProxyAuthenticate {
    /// Creates a new `ProxyAuthenticate` header.
    pub fn new(challenge: Challenge) -> Self {
        Self { challenge }
    }

    /// Returns the challenge.
    pub fn challenge(&self) -> &Challenge {
        &self.challenge
    }
}

impl fmt::Display for ProxyAuthenticate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", ProxyAuthenticate::NAME)?;
        self.fmt_body(f)
    }
}

impl EncodeBody for ProxyAuthenticate {
    fn fmt_body(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.challenge)
    }
}

impl HeaderParse for ProxyAuthenticate {
    const NAME: &'static str = "Proxy-Authenticate";
    /*
     * Proxy-Authenticate  =  "Proxy-Authenticate" HCOLON challenge
     */
    fn parse(parser: &mut Parser<'_>) -> Result<Self> {
        let challenge = parser.parse_auth_challenge()?;

        Ok(ProxyAuthenticate { challenge })
    }
}

crate::macros::structured!(ProxyAuthenticate, "proxy-authenticate" { challenge });

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_round_trip() {
        let src = b"Digest realm=\"atlanta.com\", nonce=\"c60f3082ee1212b402a21831ae\"";
        let proxy_auth = ProxyAuthenticate::from_bytes(src).unwrap();
        assert_eq!(
            proxy_auth.encode_body(),
            "Digest realm=\"atlanta.com\", nonce=\"c60f3082ee1212b402a21831ae\""
        );
    }
}
