use core::fmt;

use sipmsg_util::ArcStr;

use crate::error::Result;
use crate::headers::{EncodeBody, HeaderParse};
use crate::parser::Parser;

/// The `Organization` SIP header.
///
/// Names the organization the entity issuing the message belongs to.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Organization {
    text: ArcStr,
}

impl Organization {
    /// Creates a new `Organization` header.
    pub fn new(text: &str) -> Self {
        Self { text: text.into() }
    }

    /// Returns the organization text.
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Organization {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", Organization::NAME)?;
        self.fmt_body(f)
    }
}

impl EncodeBody for Organization {
    fn fmt_body(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl HeaderParse for Organization {
    const NAME: &'static str = "Organization";
    /*
     * Organization  =  "Organization" HCOLON [TEXT-UTF8-TRIM]
     */
    fn parse(parser: &mut Parser<'_>) -> Result<Self> {
        parser.skip_lws();
        let text = parser.read_until_newline()?;

        Ok(Organization { text: text.into() })
    }
}

crate::macros::structured!(Organization, "organization" { text });

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let organization = Organization::from_bytes(b"Boxes by Bob\r\n").unwrap();
        assert_eq!(organization.text(), "Boxes by Bob");
    }
}
