use core::fmt;

use itertools::Itertools;
use sipmsg_util::ArcStr;

use crate::error::Result;
use crate::headers::{EncodeBody, HeaderParse};
use crate::parser::Parser;

/// The `Unsupported` SIP header.
///
/// Lists option tags a 420 response rejects.
#[derive(Debug, PartialEq, Eq, Default, Clone)]
pub struct Unsupported {
    tags: Vec<ArcStr>,
}

impl Unsupported {
    /// Creates an empty `Unsupported` header.
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
}

impl fmt::Display for Unsupported {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", Unsupported::NAME)?;
        self.fmt_body(f)
    }
}

impl EncodeBody for Unsupported {
    fn fmt_body(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tags.iter().format(", "))
    }
}

impl HeaderParse for Unsupported {
    const NAME: &'static str = "Unsupported";
    /*
     * Unsupported  =  "Unsupported" HCOLON option-tag
     *                 *(COMMA option-tag)
     */
    fn parse(parser: &mut Parser<'_>) -> Result<Self> {
        let tags = crate::macros::hdr_list!(parser => {
            parser.read_token()?.into()
        });

        Ok(Unsupported { tags })
    }
}

crate::macros::structured!(Unsupported, "unsupported" { tags });

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let unsupported = Unsupported::from_bytes(b"foo\r\n").unwrap();
        assert_eq!(unsupported.encode_body(), "foo");
    }
}
