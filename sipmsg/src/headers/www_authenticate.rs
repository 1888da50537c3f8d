use core::fmt;

use crate::error::Result;
use crate::headers::{EncodeBody, HeaderParse};
use crate::message::Challenge;
use crate::parser::Parser;

/// The `WWW-Authenticate` SIP header.
///
/// Carries at least one challenge with the authentication scheme and
/// parameters applicable to the Request-URI.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct WWWAuthenticate {
    challenge: Challenge,
}

impl WWWAuthenticate {
    /// Creates a new `WWWAuthenticate` header.
    pub fn new(challenge: Challenge) -> Self {
        Self { challenge }
    }

    /// Returns the challenge.
    pub fn challenge(&self) -> &Challenge {
        &self.challenge
    }
}

impl fmt::Display for WWWAuthenticate {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", WWWAuthenticate::NAME)?;
        self.fmt_body(f)
    }
}

impl EncodeBody for WWWAuthenticate {
    fn fmt_body(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.challenge)
    }
}

impl HeaderParse for WWWAuthenticate {
    const NAME: &'static str = "WWW-Authenticate";
    /*
     * WWW-Authenticate  =  "WWW-Authenticate" HCOLON challenge
     * challenge         =  ("Digest" LWS digest-cln *(COMMA digest-cln))
     *                      / other-challenge
     */
    fn parse(parser: &mut Parser<'_>) -> Result<Self> {
        let challenge = parser.parse_auth_challenge()?;

        Ok(WWWAuthenticate { challenge })
    }
}

crate::macros::structured!(WWWAuthenticate, "www-authenticate" { challenge });

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::message::DigestChallenge;

    #[test]
    fn test_parse() {
        let src = b"Digest realm=\"atlanta.com\",\
        domain=\"sip:boxesbybob.com\", qop=\"auth\",\
        nonce=\"f84f1cec41e6cbe5aea9c8e88d359\",\
        opaque=\"\", stale=FALSE, algorithm=MD5";
        let www_auth = WWWAuthenticate::from_bytes(src).unwrap();

        assert_matches!(www_auth.challenge(), Challenge::Digest(DigestChallenge {
            realm, domain, nonce, opaque, stale, algorithm, qop, ..
        }) => {
            assert_eq!(realm.as_deref(), Some("atlanta.com"));
            assert_eq!(algorithm.as_deref(), Some("MD5"));
            assert_eq!(domain.as_deref(), Some("sip:boxesbybob.com"));
            assert_eq!(qop.as_deref(), Some("auth"));
            assert_eq!(nonce.as_deref(), Some("f84f1cec41e6cbe5aea9c8e88d359"));
            assert_eq!(opaque.as_deref(), Some(""));
            assert_eq!(stale.as_deref(), Some("FALSE"));
        });
    }
}
