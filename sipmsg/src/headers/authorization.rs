use core::fmt;

use crate::error::Result;
use crate::headers::{EncodeBody, HeaderParse};
use crate::message::Credential;
use crate::parser::Parser;

/// The `Authorization` SIP header.
///
/// Carries the credentials of a user agent answering a challenge.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Authorization {
    credential: Credential,
}

impl Authorization {
    /// Creates a new `Authorization` header.
    pub fn new(credential: Credential) -> Self {
        Self { credential }
    }

    /// Returns the credentials.
    pub fn credential(&self) -> &Credential {
        &self.credential
    }
}

impl fmt::Display for Authorization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", Authorization::NAME)?;
        self.fmt_body(f)
    }
}

impl EncodeBody for Authorization {
    fn fmt_body(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.credential)
    }
}

impl HeaderParse for Authorization {
    const NAME: &'static str = "Authorization";
    /*
     * Authorization  =  "Authorization" HCOLON credentials
     * credentials    =  ("Digest" LWS digest-response)
     *                   / other-response
     */
    fn parse(parser: &mut Parser<'_>) -> Result<Self> {
        let credential = parser.parse_auth_credential()?;

        Ok(Authorization { credential })
    }
}

crate::macros::structured!(Authorization, "authorization" { credential });

#[cfg(test)]
mod tests {
    use assert_matches::assert_matches;

    use super::*;
    use crate::message::DigestCredential;

    #[test]
    fn test_parse() {
        let src = b"Digest username=\"Alice\", realm=\"atlanta.com\",\
        nonce=\"84a4cc6f3082121f32b42a2187831a9e\",\
        response=\"7587245234b3434cc3412213e5f113a5432\"";
        let auth = Authorization::from_bytes(src).unwrap();

        assert_matches!(auth.credential(), Credential::Digest(DigestCredential {
            username, realm, nonce, response, ..
        }) => {
            assert_eq!(username.as_deref(), Some("Alice"));
            assert_eq!(realm.as_deref(), Some("atlanta.com"));
            assert_eq!(nonce.as_deref(), Some("84a4cc6f3082121f32b42a2187831a9e"));
            assert_eq!(response.as_deref(), Some("7587245234b3434cc3412213e5f113a5432"));
        });
    }
}
