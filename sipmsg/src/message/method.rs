use std::fmt;

use sipmsg_util::ArcStr;

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
/// A SIP method.
///
/// This enum declares the SIP methods described by RFC 3261 and its
/// common extensions. Unrecognized method tokens are preserved
/// verbatim in [`SipMethod::Other`].
pub enum SipMethod {
    /// SIP INVITE method.
    Invite,
    /// SIP ACK method.
    Ack,
    /// SIP BYE method.
    Bye,
    /// SIP CANCEL method.
    Cancel,
    /// SIP REGISTER method.
    Register,
    /// SIP OPTIONS method.
    Options,
    /// SIP INFO method.
    Info,
    /// SIP NOTIFY method.
    Notify,
    /// SIP SUBSCRIBE method.
    Subscribe,
    /// SIP UPDATE method.
    Update,
    /// SIP REFER method.
    Refer,
    /// SIP PRACK method.
    Prack,
    /// SIP MESSAGE method.
    Message,
    /// SIP PUBLISH method.
    Publish,
    /// A method token not known to this crate.
    Other(ArcStr),
}

impl SipMethod {
    /// Returns the string representation of the method.
    #[inline(always)]
    pub fn as_str(&self) -> &str {
        match self {
            SipMethod::Invite => "INVITE",
            SipMethod::Ack => "ACK",
            SipMethod::Bye => "BYE",
            SipMethod::Cancel => "CANCEL",
            SipMethod::Register => "REGISTER",
            SipMethod::Options => "OPTIONS",
            SipMethod::Info => "INFO",
            SipMethod::Notify => "NOTIFY",
            SipMethod::Subscribe => "SUBSCRIBE",
            SipMethod::Update => "UPDATE",
            SipMethod::Refer => "REFER",
            SipMethod::Prack => "PRACK",
            SipMethod::Message => "MESSAGE",
            SipMethod::Publish => "PUBLISH",
            SipMethod::Other(token) => token,
        }
    }

    /// Returns the byte representation of the method.
    pub fn as_bytes(&self) -> &[u8] {
        self.as_str().as_bytes()
    }

    /// Returns `true` if this method can establish a dialog.
    pub const fn can_establish_a_dialog(&self) -> bool {
        matches!(self, SipMethod::Invite)
    }
}

impl From<&str> for SipMethod {
    fn from(value: &str) -> Self {
        match value {
            "INVITE" => SipMethod::Invite,
            "CANCEL" => SipMethod::Cancel,
            "ACK" => SipMethod::Ack,
            "BYE" => SipMethod::Bye,
            "REGISTER" => SipMethod::Register,
            "OPTIONS" => SipMethod::Options,
            "INFO" => SipMethod::Info,
            "NOTIFY" => SipMethod::Notify,
            "SUBSCRIBE" => SipMethod::Subscribe,
            "UPDATE" => SipMethod::Update,
            "REFER" => SipMethod::Refer,
            "PRACK" => SipMethod::Prack,
            "MESSAGE" => SipMethod::Message,
            "PUBLISH" => SipMethod::Publish,
            other => SipMethod::Other(other.into()),
        }
    }
}

impl From<&[u8]> for SipMethod {
    fn from(value: &[u8]) -> Self {
        // Method tokens are ASCII by construction.
        let token = std::str::from_utf8(value).unwrap_or_default();
        SipMethod::from(token)
    }
}

impl fmt::Display for SipMethod {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

crate::macros::scalar_value!(SipMethod);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_known_tokens() {
        assert_eq!(SipMethod::from("INVITE"), SipMethod::Invite);
        assert_eq!(SipMethod::from("REGISTER").as_str(), "REGISTER");
    }

    #[test]
    fn test_unknown_token_round_trips() {
        let method = SipMethod::from("CHECKPOINT");
        assert_eq!(method.to_string(), "CHECKPOINT");
    }
}
