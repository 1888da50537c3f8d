use core::fmt;

use itertools::Itertools;

use crate::error::Result;
use crate::headers::{EncodeBody, HeaderParse};
use crate::message::SipMethod;
use crate::parser::Parser;

/// The `Allow` SIP header.
///
/// Lists the methods supported by the sender.
///
/// # Examples
///
/// ```
/// use sipmsg::headers::Allow;
/// use sipmsg::message::SipMethod;
///
/// let mut allow = Allow::new();
/// allow.push(SipMethod::Invite);
/// allow.push(SipMethod::Register);
///
/// assert_eq!("Allow: INVITE, REGISTER", allow.to_string());
/// ```
#[derive(Debug, PartialEq, Eq, Default, Clone)]
pub struct Allow {
    methods: Vec<SipMethod>,
}

impl Allow {
    /// Creates an empty `Allow` header.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a method.
    pub fn push(&mut self, method: SipMethod) {
        self.methods.push(method);
    }

    /// Gets the method at the given index.
    pub fn get(&self, index: usize) -> Option<&SipMethod> {
        self.methods.get(index)
    }

    /// Returns the number of methods listed.
    pub fn len(&self) -> usize {
        self.methods.len()
    }

    /// Returns `true` if no methods are listed.
    pub fn is_empty(&self) -> bool {
        self.methods.is_empty()
    }

    /// Returns `true` if the given method is listed.
    pub fn allows(&self, method: &SipMethod) -> bool {
        self.methods.contains(method)
    }
}

impl fmt::Display for Allow {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", Allow::NAME)?;
        self.fmt_body(f)
    }
}

impl EncodeBody for Allow {
    fn fmt_body(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.methods.iter().format(", "))
    }
}

impl HeaderParse for Allow {
    const NAME: &'static str = "Allow";
    /*
     * Allow  =  "Allow" HCOLON [Method *(COMMA Method)]
     */
    fn parse(parser: &mut Parser<'_>) -> Result<Self> {
        let methods = crate::macros::hdr_list!(parser => {
            SipMethod::from(parser.alphabetic())
        });

        Ok(Allow { methods })
    }
}

crate::macros::structured!(Allow, "allow" { methods });

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let src = b"INVITE, ACK, OPTIONS, CANCEL, BYE\r\n";
        let mut parser = Parser::new(src);
        let allow = Allow::parse(&mut parser).unwrap();

        assert_eq!(parser.remaining(), b"\r\n");

        assert_eq!(allow.get(0), Some(&SipMethod::Invite));
        assert_eq!(allow.get(1), Some(&SipMethod::Ack));
        assert_eq!(allow.get(2), Some(&SipMethod::Options));
        assert_eq!(allow.get(3), Some(&SipMethod::Cancel));
        assert_eq!(allow.get(4), Some(&SipMethod::Bye));
        assert_eq!(allow.get(5), None);
    }

    #[test]
    fn test_allows() {
        let allow = Allow::from_bytes(b"INVITE, BYE").unwrap();
        assert!(allow.allows(&SipMethod::Invite));
        assert!(!allow.allows(&SipMethod::Register));
    }
}
