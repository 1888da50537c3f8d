use core::fmt;

use crate::error::Result;
use crate::headers::{EncodeBody, HeaderParse};
use crate::message::SipMethod;
use crate::parser::Parser;

/// The `CSeq` SIP header.
///
/// Orders transactions within a dialog.
///
/// # Examples
///
/// ```
/// use sipmsg::headers::CSeq;
/// use sipmsg::message::SipMethod;
///
/// let cseq = CSeq::new(1, SipMethod::Options);
///
/// assert_eq!("CSeq: 1 OPTIONS", cseq.to_string());
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct CSeq {
    /// The sequence number. Sequence numbers are non-negative by
    /// construction.
    pub cseq: u32,
    /// The method the sequence number counts.
    pub method: SipMethod,
}

impl CSeq {
    /// Creates a new `CSeq`.
    pub fn new(cseq: u32, method: SipMethod) -> Self {
        Self { cseq, method }
    }

    /// Returns the sequence number.
    pub fn cseq(&self) -> u32 {
        self.cseq
    }

    /// Returns the method associated with the sequence number.
    pub fn method(&self) -> &SipMethod {
        &self.method
    }
}

impl fmt::Display for CSeq {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", CSeq::NAME)?;
        self.fmt_body(f)
    }
}

impl EncodeBody for CSeq {
    fn fmt_body(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.cseq, self.method)
    }
}

impl HeaderParse for CSeq {
    const NAME: &'static str = "CSeq";
    /*
     * CSeq  =  "CSeq" HCOLON 1*DIGIT LWS Method
     */
    fn parse(parser: &mut Parser<'_>) -> Result<Self> {
        parser.skip_lws();
        if parser.peek() == Some(&b'-') {
            return parser.grammar_error("sequence number must be non-negative");
        }
        let cseq = parser.parse_u32()?;

        parser.skip_lws();
        let method = SipMethod::from(parser.alphabetic());

        Ok(CSeq { cseq, method })
    }
}

crate::macros::structured!(CSeq, "cseq" { cseq, method });

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let src = b"4711 INVITE\r\n";
        let mut parser = Parser::new(src);
        let cseq = CSeq::parse(&mut parser).unwrap();

        assert_eq!(parser.remaining(), b"\r\n");
        assert_eq!(cseq.method, SipMethod::Invite);
        assert_eq!(cseq.cseq, 4711);
    }

    #[test]
    fn test_negative_sequence_number_is_rejected() {
        let mut parser = Parser::new(b"-1 INVITE\r\n");
        assert!(CSeq::parse(&mut parser).is_err());
    }

    #[test]
    fn test_round_trip() {
        let cseq = CSeq::from_bytes(b"314159 INVITE").unwrap();
        assert_eq!(cseq.encode_body(), "314159 INVITE");
    }
}
