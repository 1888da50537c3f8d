use core::fmt;

use crate::error::Result;
use crate::headers::{EncodeBody, HeaderParse};
use crate::parser::Parser;

/// The `Content-Length` SIP header.
///
/// Gives the size of the message body in bytes. Every message carries
/// exactly one; messages built programmatically start with
/// `Content-Length: 0`.
///
/// # Examples
///
/// ```
/// use sipmsg::headers::ContentLength;
///
/// let content_length = ContentLength::new(151);
///
/// assert_eq!("Content-Length: 151", content_length.to_string());
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ContentLength {
    length: u32,
}

impl ContentLength {
    /// Creates a new `ContentLength`.
    pub fn new(length: u32) -> Self {
        Self { length }
    }

    /// Returns the body length in bytes.
    pub fn clen(&self) -> u32 {
        self.length
    }

    /// Replaces the body length.
    pub fn set_clen(&mut self, length: u32) {
        self.length = length;
    }
}

impl fmt::Display for ContentLength {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", ContentLength::NAME)?;
        self.fmt_body(f)
    }
}

impl EncodeBody for ContentLength {
    fn fmt_body(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.length)
    }
}

impl HeaderParse for ContentLength {
    const NAME: &'static str = "Content-Length";
    const SHORT_NAME: Option<&'static str> = Some("l");
    /*
     * Content-Length  =  ( "Content-Length" / "l" ) HCOLON 1*DIGIT
     */
    fn parse(parser: &mut Parser<'_>) -> Result<Self> {
        parser.skip_lws();
        let length = parser.parse_u32()?;

        Ok(ContentLength { length })
    }
}

crate::macros::structured!(ContentLength, "content-length" { length });

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let mut parser = Parser::new(b"151\r\n");
        let content_length = ContentLength::parse(&mut parser).unwrap();

        assert_eq!(parser.remaining(), b"\r\n");
        assert_eq!(content_length.clen(), 151);
    }

    #[test]
    fn test_non_digit_is_rejected() {
        assert!(ContentLength::from_bytes(b"abc").is_err());
    }
}
