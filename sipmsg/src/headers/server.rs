use core::fmt;

use sipmsg_util::ArcStr;

use crate::error::Result;
use crate::headers::{EncodeBody, HeaderParse};
use crate::parser::Parser;

/// The `Server` SIP header.
///
/// Carries information about the software of the server answering the
/// request.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Server {
    server: ArcStr,
}

impl Server {
    /// Creates a new `Server` header.
    pub fn new(server: &str) -> Self {
        Self { server: server.into() }
    }

    /// Returns the server text.
    pub fn server(&self) -> &str {
        &self.server
    }
}

impl fmt::Display for Server {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", Server::NAME)?;
        self.fmt_body(f)
    }
}

impl EncodeBody for Server {
    fn fmt_body(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.server)
    }
}

impl HeaderParse for Server {
    const NAME: &'static str = "Server";
    /*
     * Server  =  "Server" HCOLON server-val *(LWS server-val)
     */
    fn parse(parser: &mut Parser<'_>) -> Result<Self> {
        parser.skip_lws();
        let server = parser.read_until_newline()?;

        Ok(Server { server: server.into() })
    }
}

crate::macros::structured!(Server, "server" { server });

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let server = Server::from_bytes(b"HomeServer v2\r\n").unwrap();
        assert_eq!(server.server(), "HomeServer v2");
    }
}
