use core::fmt;

use sipmsg_util::ArcStr;

use crate::error::Result;
use crate::headers::{EncodeBody, HeaderParse};
use crate::parser::Parser;

/// The `Call-ID` SIP header.
///
/// Groups together all the messages of one call.
///
/// # Examples
///
/// ```
/// use sipmsg::headers::CallId;
///
/// let call_id = CallId::new("a84b4c76e66710@pc33.atlanta.com");
///
/// assert_eq!("Call-ID: a84b4c76e66710@pc33.atlanta.com", call_id.to_string());
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct CallId {
    id: ArcStr,
}

impl CallId {
    /// Creates a new `CallId`.
    pub fn new(id: &str) -> Self {
        Self { id: id.into() }
    }

    /// Returns the identifier text.
    pub fn id(&self) -> &str {
        &self.id
    }
}

impl fmt::Display for CallId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", CallId::NAME)?;
        self.fmt_body(f)
    }
}

impl EncodeBody for CallId {
    fn fmt_body(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.id)
    }
}

impl HeaderParse for CallId {
    const NAME: &'static str = "Call-ID";
    const SHORT_NAME: Option<&'static str> = Some("i");
    /*
     * Call-ID  =  ( "Call-ID" / "i" ) HCOLON callid
     * callid   =  word [ "@" word ]
     */
    fn parse(parser: &mut Parser<'_>) -> Result<Self> {
        parser.skip_lws();
        let id = parser.read_word()?;
        if id.is_empty() {
            return parser.grammar_error("empty Call-ID");
        }

        Ok(CallId { id: id.into() })
    }
}

crate::macros::structured!(CallId, "call-id" { id });

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let src = b"bs9ki9iqbee8k5kal8mpqb@10.1.1.1\r\n";
        let mut parser = Parser::new(src);
        let call_id = CallId::parse(&mut parser).unwrap();

        assert_eq!(parser.remaining(), b"\r\n");
        assert_eq!(call_id.id(), "bs9ki9iqbee8k5kal8mpqb@10.1.1.1");
    }

    #[test]
    fn test_empty_is_rejected() {
        assert!(CallId::from_bytes(b"\r\n").is_err());
    }
}
