use core::fmt;

use itertools::Itertools;
use sipmsg_util::ArcStr;

use crate::error::Result;
use crate::headers::{EncodeBody, HeaderParse};
use crate::parser::Parser;

/// The `Supported` SIP header.
///
/// Lists option tags the sender understands.
#[derive(Debug, PartialEq, Eq, Default, Clone)]
pub struct Supported {
    tags: Vec<ArcStr>,
}

impl Supported {
    /// Creates an empty `Supported` header.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends an option tag.
    pub fn push(&mut self, tag: &str) {
        self.tags.push(tag.into());
    }

    /// Returns an iterator over the option tags.
    pub fn iter(&self) -> impl Iterator<Item = &str> {
        self.tags.iter().map(|t| t.as_ref())
    }

    /// Returns `true` if the given option tag is listed.
    pub fn supports(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

impl fmt::Display for Supported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", Supported::NAME)?;
        self.fmt_body(f)
    }
}

impl EncodeBody for Supported {
    fn fmt_body(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tags.iter().format(", "))
    }
}

impl HeaderParse for Supported {
    const NAME: &'static str = "Supported";
    const SHORT_NAME: Option<&'static str> = Some("k");
    /*
     * Supported  =  ( "Supported" / "k" ) HCOLON
     *               [option-tag *(COMMA option-tag)]
     */
    fn parse(parser: &mut Parser<'_>) -> Result<Self> {
        parser.skip_lws();
        if parser.is_next_newline() {
            return Ok(Supported::new());
        }
        let tags = crate::macros::hdr_list!(parser => {
            parser.read_token()?.into()
        });

        Ok(Supported { tags })
    }
}

crate::macros::structured!(Supported, "supported" { tags });

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let supported = Supported::from_bytes(b"replaces, 100rel\r\n").unwrap();
        assert!(supported.supports("replaces"));
        assert!(supported.supports("100REL"));
        assert_eq!(supported.encode_body(), "replaces, 100rel");
    }

    #[test]
    fn test_empty_tag_list() {
        let supported = Supported::from_bytes(b"\r\n").unwrap();
        assert_eq!(supported.iter().count(), 0);
    }
}
