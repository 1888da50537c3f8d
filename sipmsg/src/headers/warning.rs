use core::fmt;

use sipmsg_util::ArcStr;

use crate::error::Result;
use crate::headers::{EncodeBody, HeaderParse};
use crate::parser::Parser;

/// The `Warning` SIP header.
///
/// Carries additional information about the status of a response.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Warning {
    code: u32,
    agent: ArcStr,
    text: ArcStr,
}

impl Warning {
    /// Creates a new `Warning` header.
    pub fn new(code: u32, agent: &str, text: &str) -> Self {
        Self {
            code,
            agent: agent.into(),
            text: text.into(),
        }
    }

    /// Returns the warning code.
    pub fn code(&self) -> u32 {
        self.code
    }

    /// Returns the warning agent.
    pub fn agent(&self) -> &str {
        &self.agent
    }

    /// Returns the warning text.
    pub fn text(&self) -> &str {
        &self.text
    }
}

impl fmt::Display for Warning {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", Warning::NAME)?;
        self.fmt_body(f)
    }
}

impl EncodeBody for Warning {
    fn fmt_body(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} \"{}\"", self.code, self.agent, self.text)
    }
}

impl HeaderParse for Warning {
    const NAME: &'static str = "Warning";
    /*
     * Warning        =  "Warning" HCOLON warning-value *(COMMA warning-value)
     * warning-value  =  warn-code SP warn-agent SP warn-text
     * warn-code      =  3DIGIT
     * warn-agent     =  hostport / pseudonym
     * warn-text      =  quoted-string
     */
    fn parse(parser: &mut Parser<'_>) -> Result<Self> {
        parser.skip_lws();
        let code = parser.parse_u32()?;
        parser.skip_lws();
        let agent = parser.read_until_byte(b' ')?;
        parser.skip_lws();
        let text = parser.read_quoted()?;

        Ok(Warning {
            code,
            agent: agent.into(),
            text: text.into(),
        })
    }
}

crate::macros::structured!(Warning, "warning" { code, agent, text });

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let src = b"307 isi.edu \"Session parameter 'foo' not understood\"\r\n";
        let warning = Warning::from_bytes(src).unwrap();

        assert_eq!(warning.code(), 307);
        assert_eq!(warning.agent(), "isi.edu");
        assert_eq!(warning.text(), "Session parameter 'foo' not understood");
    }

    #[test]
    fn test_round_trip() {
        let src = b"301 isi.edu \"Incompatible network address type 'E.164'\"";
        let warning = Warning::from_bytes(src).unwrap();
        assert_eq!(
            warning.encode_body(),
            "301 isi.edu \"Incompatible network address type 'E.164'\""
        );
    }
}
