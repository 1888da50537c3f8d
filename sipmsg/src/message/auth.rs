use std::fmt;

use sipmsg_util::ArcStr;

use crate::error::{Error, Result};
use crate::object::Structured;

use super::Params;

/// The `Digest` authentication scheme token.
pub(crate) const DIGEST: &str = "Digest";

pub(crate) const REALM: &str = "realm";
pub(crate) const USERNAME: &str = "username";
pub(crate) const NONCE: &str = "nonce";
pub(crate) const DOMAIN: &str = "domain";
pub(crate) const ALGORITHM: &str = "algorithm";
pub(crate) const OPAQUE: &str = "opaque";
pub(crate) const QOP: &str = "qop";
pub(crate) const STALE: &str = "stale";
pub(crate) const URI: &str = "uri";
pub(crate) const RESPONSE: &str = "response";
pub(crate) const CNONCE: &str = "cnonce";
pub(crate) const NC: &str = "nc";

/// A challenge carried by `WWW-Authenticate` and
/// `Proxy-Authenticate` headers.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Challenge {
    /// A digest challenge with its well-known parameters broken out.
    Digest(DigestChallenge),
    /// Any other scheme, parameters kept generic.
    Other {
        /// The authentication scheme token.
        scheme: ArcStr,
        /// The challenge parameters.
        params: Params,
    },
}

impl fmt::Display for Challenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Challenge::Digest(digest) => write!(f, "{DIGEST} {digest}"),
            Challenge::Other { scheme, params } => write!(f, "{scheme} {params}"),
        }
    }
}

/// The parameters of a digest challenge.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct DigestChallenge {
    /// The protection realm.
    pub realm: Option<ArcStr>,
    /// The protection domain.
    pub domain: Option<ArcStr>,
    /// The server nonce.
    pub nonce: Option<ArcStr>,
    /// Opaque data echoed back by the client.
    pub opaque: Option<ArcStr>,
    /// Whether the previous response used a stale nonce.
    pub stale: Option<ArcStr>,
    /// The digest algorithm.
    pub algorithm: Option<ArcStr>,
    /// The quality-of-protection options.
    pub qop: Option<ArcStr>,
}

impl fmt::Display for DigestChallenge {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sep = "";
        // Canonical quoting per parameter, independent of how the
        // input happened to quote.
        for (name, value, quote) in [
            (REALM, &self.realm, true),
            (DOMAIN, &self.domain, true),
            (NONCE, &self.nonce, true),
            (OPAQUE, &self.opaque, true),
            (STALE, &self.stale, false),
            (ALGORITHM, &self.algorithm, false),
            (QOP, &self.qop, true),
        ] {
            if let Some(value) = value {
                if quote {
                    write!(f, "{sep}{name}=\"{value}\"")?;
                } else {
                    write!(f, "{sep}{name}={value}")?;
                }
                sep = ", ";
            }
        }
        Ok(())
    }
}

crate::macros::structured!(DigestChallenge, "digest-challenge" {
    realm,
    domain,
    nonce,
    opaque,
    stale,
    algorithm,
    qop,
});

/// Credentials carried by `Authorization` and `Proxy-Authorization`
/// headers.
#[derive(Debug, PartialEq, Eq, Clone)]
pub enum Credential {
    /// Digest credentials with the well-known parameters broken out.
    Digest(DigestCredential),
    /// Any other scheme, parameters kept generic.
    Other {
        /// The authentication scheme token.
        scheme: ArcStr,
        /// The credential parameters.
        params: Params,
    },
}

impl fmt::Display for Credential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Credential::Digest(digest) => write!(f, "{DIGEST} {digest}"),
            Credential::Other { scheme, params } => write!(f, "{scheme} {params}"),
        }
    }
}

/// The parameters of digest credentials.
#[derive(Debug, PartialEq, Eq, Clone, Default)]
pub struct DigestCredential {
    /// The authenticating username.
    pub username: Option<ArcStr>,
    /// The protection realm.
    pub realm: Option<ArcStr>,
    /// The server nonce being answered.
    pub nonce: Option<ArcStr>,
    /// The digest uri.
    pub uri: Option<ArcStr>,
    /// The computed digest response.
    pub response: Option<ArcStr>,
    /// The digest algorithm.
    pub algorithm: Option<ArcStr>,
    /// The client nonce.
    pub cnonce: Option<ArcStr>,
    /// Opaque data echoed from the challenge.
    pub opaque: Option<ArcStr>,
    /// The chosen quality of protection.
    pub qop: Option<ArcStr>,
    /// The nonce count.
    pub nc: Option<ArcStr>,
}

impl fmt::Display for DigestCredential {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let mut sep = "";
        for (name, value, quote) in [
            (USERNAME, &self.username, true),
            (REALM, &self.realm, true),
            (NONCE, &self.nonce, true),
            (URI, &self.uri, true),
            (RESPONSE, &self.response, true),
            (ALGORITHM, &self.algorithm, false),
            (CNONCE, &self.cnonce, true),
            (OPAQUE, &self.opaque, true),
            (QOP, &self.qop, false),
            (NC, &self.nc, false),
        ] {
            if let Some(value) = value {
                if quote {
                    write!(f, "{sep}{name}=\"{value}\"")?;
                } else {
                    write!(f, "{sep}{name}={value}")?;
                }
                sep = ", ";
            }
        }
        Ok(())
    }
}

crate::macros::structured!(DigestCredential, "digest-credential" {
    username,
    realm,
    nonce,
    uri,
    response,
    algorithm,
    cnonce,
    opaque,
    qop,
    nc,
});

macro_rules! auth_enum_structured {
    ($ty:ident, $label:literal) => {
        impl Structured for $ty {
            fn type_label(&self) -> &'static str {
                $label
            }

            fn as_any(&self) -> &dyn std::any::Any {
                self
            }

            fn matches_dyn(&self, template: &dyn Structured) -> bool {
                let Some(template) = template.as_any().downcast_ref::<$ty>() else {
                    return false;
                };
                match (self, template) {
                    ($ty::Digest(a), $ty::Digest(b)) => a.matches_dyn(b),
                    (
                        $ty::Other { scheme, params },
                        $ty::Other {
                            scheme: t_scheme,
                            params: t_params,
                        },
                    ) => scheme.eq_ignore_ascii_case(t_scheme) && params.matches_dyn(t_params),
                    _ => false,
                }
            }

            fn merge_dyn(&mut self, other: &dyn Structured) -> Result<()> {
                let Some(other) = other.as_any().downcast_ref::<$ty>() else {
                    return Err(Error::TypeMismatch {
                        expected: $label,
                        found: other.type_label(),
                    });
                };
                match (&mut *self, other) {
                    ($ty::Digest(a), $ty::Digest(b)) => a.merge_dyn(b),
                    (
                        $ty::Other { scheme, params },
                        $ty::Other {
                            scheme: o_scheme,
                            params: o_params,
                        },
                    ) => {
                        *scheme = o_scheme.clone();
                        params.merge_dyn(o_params)
                    }
                    (this, other) => {
                        *this = other.clone();
                        Ok(())
                    }
                }
            }

            fn assign_from(&mut self, other: &dyn Structured) -> bool {
                match other.as_any().downcast_ref::<$ty>() {
                    Some(other) => {
                        *self = other.clone();
                        true
                    }
                    None => false,
                }
            }

            fn children(&self) -> Vec<(&'static str, &dyn Structured)> {
                match self {
                    $ty::Digest(digest) => vec![("digest", digest as &dyn Structured)],
                    $ty::Other { params, .. } => vec![("params", params as &dyn Structured)],
                }
            }

            fn children_mut(&mut self) -> Vec<(&'static str, &mut dyn Structured)> {
                match self {
                    $ty::Digest(digest) => vec![("digest", digest as &mut dyn Structured)],
                    $ty::Other { params, .. } => vec![("params", params as &mut dyn Structured)],
                }
            }

            fn scalar_fields(&self) -> Vec<(&'static str, String)> {
                match self {
                    $ty::Digest(_) => vec![("scheme", DIGEST.to_string())],
                    $ty::Other { scheme, .. } => vec![("scheme", scheme.to_string())],
                }
            }
        }

        crate::macros::node_value!($ty);
    };
}

auth_enum_structured!(Challenge, "challenge");
auth_enum_structured!(Credential, "credential");

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_digest_challenge_display() {
        let challenge = Challenge::Digest(DigestChallenge {
            realm: Some("atlanta.com".into()),
            nonce: Some("84a4cc6f3082121f32b42a2187831a9e".into()),
            algorithm: Some("MD5".into()),
            ..Default::default()
        });

        assert_eq!(
            challenge.to_string(),
            "Digest realm=\"atlanta.com\", nonce=\"84a4cc6f3082121f32b42a2187831a9e\", algorithm=MD5"
        );
    }

    #[test]
    fn test_credential_merge_keeps_set_fields() {
        let mut creds = DigestCredential {
            username: Some("alice".into()),
            realm: Some("atlanta.com".into()),
            ..Default::default()
        };
        let update = DigestCredential {
            nonce: Some("abc".into()),
            ..Default::default()
        };

        crate::object::merge(&mut creds, &update);
        assert_eq!(creds.username.as_deref(), Some("alice"));
        assert_eq!(creds.nonce.as_deref(), Some("abc"));
    }
}
