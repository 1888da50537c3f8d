use core::fmt;

use crate::error::Result;
use crate::headers::{EncodeBody, HeaderParse};
use crate::parser::Parser;

/// The `Expires` SIP header.
///
/// Gives the relative time after which the message or registration
/// expires.
///
/// # Examples
///
/// ```
/// use sipmsg::headers::Expires;
///
/// let expires = Expires::new(3600);
///
/// assert_eq!("Expires: 3600", expires.to_string());
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Expires {
    seconds: u32,
}

impl Expires {
    /// Creates a new `Expires`.
    pub fn new(seconds: u32) -> Self {
        Self { seconds }
    }

    /// Returns the expiry interval in seconds.
    pub fn seconds(&self) -> u32 {
        self.seconds
    }
}

impl fmt::Display for Expires {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", Expires::NAME)?;
        self.fmt_body(f)
    }
}

impl EncodeBody for Expires {
    fn fmt_body(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.seconds)
    }
}

impl HeaderParse for Expires {
    const NAME: &'static str = "Expires";
    /*
     * Expires  =  "Expires" HCOLON delta-seconds
     */
    fn parse(parser: &mut Parser<'_>) -> Result<Self> {
        parser.skip_lws();
        let seconds = parser.parse_u32()?;

        Ok(Expires { seconds })
    }
}

crate::macros::structured!(Expires, "expires" { seconds });

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let mut parser = Parser::new(b"7200\r\n");
        let expires = Expires::parse(&mut parser).unwrap();

        assert_eq!(parser.remaining(), b"\r\n");
        assert_eq!(expires.seconds(), 7200);
    }
}
