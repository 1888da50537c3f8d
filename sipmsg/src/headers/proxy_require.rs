use core::fmt;

use itertools::Itertools;
use sipmsg_util::ArcStr;

use crate::error::Result;
use crate::headers::{EncodeBody, HeaderParse};
use crate::parser::Parser;

/// The `Proxy-Require` SIP header.
///
/// Lists option tags every proxy on the path must support.
#[derive(Debug, PartialEq, Eq, Default, Clone)]
pub struct ProxyRequire {
    tags: Vec<ArcStr>,
}

impl ProxyRequire {
    /// Creates an empty `ProxyRequire` header.
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

impl fmt::Display for ProxyRequire {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", ProxyRequire::NAME)?;
        self.fmt_body(f)
    }
}

impl EncodeBody for ProxyRequire {
    fn fmt_body(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.tags.iter().format(", "))
    }
}

impl HeaderParse for ProxyRequire {
    const NAME: &'static str = "Proxy-Require";
    /*
     * Proxy-Require  =  "Proxy-Require" HCOLON option-tag
     *                   *(COMMA option-tag)
     */
    fn parse(parser: &mut Parser<'_>) -> Result<Self> {
        let tags = crate::macros::hdr_list!(parser => {
            parser.read_token()?.into()
        });

        Ok(ProxyRequire { tags })
    }
}

crate::macros::structured!(ProxyRequire, "proxy-require" { tags });

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let proxy_require = ProxyRequire::from_bytes(b"sec-agree\r\n").unwrap();
        assert_eq!(proxy_require.encode_body(), "sec-agree");
    }
}
