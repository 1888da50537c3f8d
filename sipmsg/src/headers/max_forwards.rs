use core::fmt;

use crate::error::Result;
use crate::headers::{EncodeBody, HeaderParse};
use crate::parser::Parser;

/// The `Max-Forwards` SIP header.
///
/// Limits the number of hops a request can make on the way to its
/// destination.
///
/// # Examples
///
/// ```
/// use sipmsg::headers::MaxForwards;
///
/// let max_forwards = MaxForwards::new(70);
///
/// assert_eq!("Max-Forwards: 70", max_forwards.to_string());
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct MaxForwards {
    hops: u32,
}

impl MaxForwards {
    /// Creates a new `MaxForwards`.
    pub fn new(hops: u32) -> Self {
        Self { hops }
    }

    /// Returns the remaining hop count.
    pub fn max_forwards(&self) -> u32 {
        self.hops
    }

    /// Decrements the hop count, saturating at zero.
    pub fn decrement(&mut self) {
        self.hops = self.hops.saturating_sub(1);
    }
}

impl fmt::Display for MaxForwards {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", MaxForwards::NAME)?;
        self.fmt_body(f)
    }
}

impl EncodeBody for MaxForwards {
    fn fmt_body(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.hops)
    }
}

impl HeaderParse for MaxForwards {
    const NAME: &'static str = "Max-Forwards";
    /*
     * Max-Forwards  =  "Max-Forwards" HCOLON 1*DIGIT
     */
    fn parse(parser: &mut Parser<'_>) -> Result<Self> {
        parser.skip_lws();
        let hops = parser.parse_u32()?;

        Ok(MaxForwards { hops })
    }
}

crate::macros::structured!(MaxForwards, "max-forwards" { hops });

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let mut parser = Parser::new(b"70\r\n");
        let max_forwards = MaxForwards::parse(&mut parser).unwrap();

        assert_eq!(parser.remaining(), b"\r\n");
        assert_eq!(max_forwards.max_forwards(), 70);
    }

    #[test]
    fn test_decrement_saturates() {
        let mut max_forwards = MaxForwards::new(1);
        max_forwards.decrement();
        max_forwards.decrement();
        assert_eq!(max_forwards.max_forwards(), 0);
    }
}
