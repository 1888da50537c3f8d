use core::fmt;

use crate::error::Result;
use crate::headers::{EncodeBody, HeaderParse};
use crate::parser::Parser;

/// The `Min-Expires` SIP header.
///
/// Conveys the minimum refresh interval a registrar will accept.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct MinExpires {
    seconds: u32,
}

impl MinExpires {
    /// Creates a new `MinExpires`.
    pub fn new(seconds: u32) -> Self {
        Self { seconds }
    }

    /// Returns the minimum interval in seconds.
    pub fn seconds(&self) -> u32 {
        self.seconds
    }
}

impl fmt::Display for MinExpires {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", MinExpires::NAME)?;
        self.fmt_body(f)
    }
}

impl EncodeBody for MinExpires {
    fn fmt_body(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.seconds)
    }
}

impl HeaderParse for MinExpires {
    const NAME: &'static str = "Min-Expires";
    /*
     * Min-Expires  =  "Min-Expires" HCOLON delta-seconds
     */
    fn parse(parser: &mut Parser<'_>) -> Result<Self> {
        parser.skip_lws();
        let seconds = parser.parse_u32()?;

        Ok(MinExpires { seconds })
    }
}

crate::macros::structured!(MinExpires, "min-expires" { seconds });

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let min_expires = MinExpires::from_bytes(b"60").unwrap();
        assert_eq!(min_expires.seconds(), 60);
        assert_eq!(min_expires.to_string(), "Min-Expires: 60");
    }
}
