use core::fmt;

use sipmsg_util::ArcStr;

use crate::error::Result;
use crate::headers::{EncodeBody, HeaderParse};
use crate::parser::Parser;

/// The `User-Agent` SIP header.
///
/// Carries information about the client originating the request.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct UserAgent {
    agent: ArcStr,
}

impl UserAgent {
    /// Creates a new `UserAgent` header.
    pub fn new(agent: &str) -> Self {
        Self { agent: agent.into() }
    }

    /// Returns the agent text.
    pub fn agent(&self) -> &str {
        &self.agent
    }
}

impl fmt::Display for UserAgent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", UserAgent::NAME)?;
        self.fmt_body(f)
    }
}

impl EncodeBody for UserAgent {
    fn fmt_body(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.agent)
    }
}

impl HeaderParse for UserAgent {
    const NAME: &'static str = "User-Agent";
    /*
     * User-Agent  =  "User-Agent" HCOLON server-val *(LWS server-val)
     */
    fn parse(parser: &mut Parser<'_>) -> Result<Self> {
        parser.skip_lws();
        let agent = parser.read_until_newline()?;

        Ok(UserAgent { agent: agent.into() })
    }
}

crate::macros::structured!(UserAgent, "user-agent" { agent });

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let user_agent = UserAgent::from_bytes(b"X-Lite release 1104o stamp 56125\r\n").unwrap();
        assert_eq!(user_agent.agent(), "X-Lite release 1104o stamp 56125");
    }
}
