use core::fmt;

use sipmsg_util::ArcStr;

use crate::error::Result;
use crate::headers::{EncodeBody, HeaderParse};
use crate::parser::Parser;

/// The `Subject` SIP header.
///
/// A summary of the call, intended for display.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Subject {
    text: ArcStr,
}

impl Subject {
    /// Creates a new `Subject` header.
    pub fn new(text: &str) -> Self {
        Self { text: text.into() }
    }

    /// Returns the subject text.
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Subject {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", Subject::NAME)?;
        self.fmt_body(f)
    }
}

impl EncodeBody for Subject {
    fn fmt_body(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.text)
    }
}

impl HeaderParse for Subject {
    const NAME: &'static str = "Subject";
    const SHORT_NAME: Option<&'static str> = Some("s");
    /*
     * Subject  =  ( "Subject" / "s" ) HCOLON [TEXT-UTF8-TRIM]
     */
    fn parse(parser: &mut Parser<'_>) -> Result<Self> {
        parser.skip_lws();
        let text = parser.read_until_newline()?;

        Ok(Subject { text: text.into() })
    }
}

crate::macros::structured!(Subject, "subject" { text });

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let subject = Subject::from_bytes(b"Project X status\r\n").unwrap();
        assert_eq!(subject.text(), "Project X status");
        assert_eq!(subject.to_string(), "Subject: Project X status");
    }
}
