use core::fmt;

use sipmsg_util::ArcStr;

use crate::error::Result;
use crate::headers::{EncodeBody, HeaderParse};
use crate::parser::Parser;

/// The `Priority` SIP header.
///
/// Indicates the urgency of the request as perceived by the client.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Priority {
    priority: ArcStr,
}

impl Priority {
    /// Creates a new `Priority` header.
    pub fn new(priority: &str) -> Self {
        Self {
            priority: priority.into(),
        }
    }

    /// Returns the priority token.
    pub fn priority(&self) -> &str {
        &self.priority
    }
}

impl fmt::Display for Priority {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", Priority::NAME)?;
        self.fmt_body(f)
    }
}

impl EncodeBody for Priority {
    fn fmt_body(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.priority)
    }
}

impl HeaderParse for Priority {
    const NAME: &'static str = "Priority";
    /*
     * Priority        =  "Priority" HCOLON priority-value
     * priority-value  =  "emergency" / "urgent" / "normal"
     *                    / "non-urgent" / other-priority
     */
    fn parse(parser: &mut Parser<'_>) -> Result<Self> {
        parser.skip_lws();
        let priority = parser.read_token()?;

        Ok(Priority {
            priority: priority.into(),
        })
    }
}

crate::macros::structured!(Priority, "priority" { priority });

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let priority = Priority::from_bytes(b"emergency\r\n").unwrap();
        assert_eq!(priority.priority(), "emergency");
    }
}
