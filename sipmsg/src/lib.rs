//! # sipmsg
//!
//! A SIP (RFC 3261) message toolkit: a hand-written recursive-descent
//! parser for requests, responses, headers, URIs and SDP bodies, a
//! structured object model with uniform clone / equality / template
//! match / merge behavior, and canonical re-encoding back to wire
//! format.
//!
//! Parsing is a pure computation over an in-memory buffer: no I/O, no
//! shared state between parses. The single exception is
//! [`message::Host::resolve`], which performs a blocking DNS lookup
//! and caches the result per host instance.
//!
//! ```
//! use sipmsg::parser::Parser;
//!
//! let buf = concat!(
//!     "OPTIONS sip:bob@biloxi.com SIP/2.0\r\n",
//!     "Via: SIP/2.0/UDP atlanta.com;branch=z9hG4bK776sgdkse\r\n",
//!     "Max-Forwards: 70\r\n",
//!     "Content-Length: 0\r\n",
//!     "\r\n"
//! );
//!
//! let msg = Parser::parse_sip_msg(buf).unwrap();
//! let req = msg.as_request().unwrap();
//!
//! assert_eq!(req.transaction_id(), "z9hg4bk776sgdkse");
//! ```

pub mod headers;
pub mod message;
pub mod object;
pub mod parser;
pub mod sdp;

pub(crate) mod error;
pub(crate) mod macros;

pub use error::{Error, Result};
pub use parser::{parse_header, parse_header_values, Parser, ParserConfig};
pub use sipmsg_util::ArcStr;

use std::fmt;
use std::str::FromStr;

use crate::message::Params;
use crate::parser::Parser as ParseCtx;

/// A quality value (q-value) used to weight SIP header entries.
///
/// # Example
///
/// ```
/// use sipmsg::Q;
///
/// let q_value = "0.5".parse();
/// assert_eq!(q_value, Ok(Q(0, 5)));
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Copy)]
pub struct Q(pub u8, pub u8);

impl Q {
    /// Creates a `Q` from its integer and fractional digits.
    pub fn new(a: u8, b: u8) -> Self {
        Self(a, b)
    }
}

impl From<u8> for Q {
    fn from(value: u8) -> Self {
        Self(value, 0)
    }
}

/// The error returned when a q-value fails to parse.
#[derive(Debug, PartialEq, Eq)]
pub struct ParseQError;

impl From<ParseQError> for Error {
    fn from(_: ParseQError) -> Self {
        Error::Grammar {
            message: "invalid q value".into(),
            line: 1,
            col: 1,
        }
    }
}

impl FromStr for Q {
    type Err = ParseQError;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.rsplit_once('.') {
            Some((a, b)) => {
                let a = a.parse().map_err(|_| ParseQError)?;
                let b = b.parse().map_err(|_| ParseQError)?;
                Ok(Q(a, b))
            }
            None => match s.parse() {
                Ok(n) => Ok(Q(n, 0)),
                Err(_) => Err(ParseQError),
            },
        }
    }
}

impl fmt::Display for Q {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}.{}", self.0, self.1)
    }
}

/// A MIME type, the `type/subtype` pair of a media type.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MimeType {
    /// The top-level type, e.g. `application`.
    pub mtype: ArcStr,
    /// The subtype, e.g. `sdp`.
    pub subtype: ArcStr,
}

/// The `media-type` that appears in `Accept` and `Content-Type` SIP
/// headers.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MediaType {
    /// The MIME type.
    pub mimetype: MimeType,
    /// Optional media parameters (`;charset=...`, `;q=...`).
    pub param: Option<Params>,
}

impl fmt::Display for MediaType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let MediaType { mimetype, param } = self;
        write!(f, "{}/{}", mimetype.mtype, mimetype.subtype)?;
        if let Some(param) = &param {
            write!(f, ";{}", param)?;
        }
        Ok(())
    }
}

impl MediaType {
    /// Constructs a `MediaType` from a type and a subtype.
    pub fn new(mtype: &str, subtype: &str) -> Self {
        Self {
            mimetype: MimeType {
                mtype: mtype.into(),
                subtype: subtype.into(),
            },
            param: None,
        }
    }

    /// Constructs a `MediaType` with optional parameters.
    pub fn from_parts(mtype: &str, subtype: &str, param: Option<Params>) -> Self {
        Self {
            mimetype: MimeType {
                mtype: mtype.into(),
                subtype: subtype.into(),
            },
            param,
        }
    }

    /// Parses a `MediaType` at the parser's cursor.
    pub fn parse(parser: &mut ParseCtx<'_>) -> Result<Self> {
        let mtype = parser.read_token()?;
        parser.must_read(b'/')?;
        let subtype = parser.read_token()?;
        let param = crate::macros::parse_header_param!(parser);

        Ok(Self {
            mimetype: MimeType {
                mtype: mtype.into(),
                subtype: subtype.into(),
            },
            param,
        })
    }

    /// Parses a `MediaType` from a string.
    pub fn parse_str(s: &str) -> Result<Self> {
        Self::parse(&mut ParseCtx::new(s.as_bytes()))
    }
}

crate::macros::scalar_value!(Q, MediaType);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_q_from_str() {
        assert_eq!("0.7".parse(), Ok(Q(0, 7)));
        assert_eq!("1".parse(), Ok(Q(1, 0)));
        assert_eq!("x".parse::<Q>(), Err(ParseQError));
    }

    #[test]
    fn test_media_type_parse_str() {
        let media_type = MediaType::parse_str("application/sdp").unwrap();
        assert_eq!(media_type.mimetype.mtype, "application");
        assert_eq!(media_type.mimetype.subtype, "sdp");
        assert_eq!(media_type.to_string(), "application/sdp");
    }

    #[test]
    fn test_media_type_with_params() {
        let media_type = MediaType::parse_str("text/html;charset=ISO-8859-4").unwrap();
        assert_eq!(
            media_type.param.as_ref().unwrap().get_value("charset"),
            Some("ISO-8859-4")
        );
        assert_eq!(media_type.to_string(), "text/html;charset=ISO-8859-4");
    }
}
