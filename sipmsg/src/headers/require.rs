use core::fmt;

use itertools::Itertools;
use sipmsg_util::ArcStr;

use crate::error::Result;
use crate::headers::{EncodeBody, HeaderParse};
use crate::parser::Parser;

/// The `Require` SIP header.
///
/// Lists option tags the recipient must support to process the
/// request.
#[derive(Debug, PartialEq, Eq, Default, Clone)]
pub struct Require {
    tags: Vec<ArcStr>,
}

impl Require {
    /// Creates an empty `Require` header.
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
    pub fn requires(&self, tag: &str) -> bool {
        self.tags.iter().any(|t| t.eq_ignore_ascii_case(tag))
    }
}

impl fmt::Display for Require {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", Require::NAME)?;
        self.fmt_body(f)
    }
}

impl EncodeBody for Require {
    fn fmt_body(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tags.iter().format(", "))
    }
}

impl HeaderParse for Require {
    const NAME: &'static str = "Require";
    /*
     * Require  =  "Require" HCOLON option-tag *(COMMA option-tag)
     */
    fn parse(parser: &mut Parser<'_>) -> Result<Self> {
        let tags = crate::macros::hdr_list!(parser => {
            parser.read_token()?.into()
        });

        Ok(Require { tags })
    }
}

crate::macros::structured!(Require, "require" { tags });

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let require = Require::from_bytes(b"100rel, timer\r\n").unwrap();
        assert!(require.requires("100rel"));
        assert!(require.requires("timer"));
        assert!(!require.requires("replaces"));
        assert_eq!(require.encode_body(), "100rel, timer");
    }
}
