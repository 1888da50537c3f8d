use core::fmt;

use crate::error::Result;
use crate::headers::{EncodeBody, HeaderParse, EXPIRES_PARAM, Q_PARAM};
use crate::message::{Params, SipAddr};
use crate::parser::Parser;
use crate::Q;

/// The `Contact` SIP header.
///
/// Gives a URI at which the sender can be reached directly. A
/// REGISTER request may instead carry the wildcard form `Contact: *`.
///
/// # Examples
///
/// ```
/// use sipmsg::headers::Contact;
/// use sipmsg::message::SipAddr;
///
/// let addr = SipAddr::parse_str("<sip:alice@client.atlanta.com>").unwrap();
/// let contact = Contact::new(addr);
///
/// assert_eq!("Contact: <sip:alice@client.atlanta.com>", contact.to_string());
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Contact {
    star: bool,
    addr: Option<SipAddr>,
    q: Option<Q>,
    expires: Option<u32>,
    params: Option<Params>,
}

impl Contact {
    /// Creates a new `Contact` for the given address.
    pub fn new(addr: SipAddr) -> Self {
        Self {
            star: false,
            addr: Some(addr),
            q: None,
            expires: None,
            params: None,
        }
    }

    /// Creates the wildcard `Contact: *`.
    pub fn star() -> Self {
        Self {
            star: true,
            addr: None,
            q: None,
            expires: None,
            params: None,
        }
    }

    /// Returns `true` for the wildcard form.
    pub fn is_star(&self) -> bool {
        self.star
    }

    /// Returns the contact address. `None` for the wildcard form.
    pub fn addr(&self) -> Option<&SipAddr> {
        self.addr.as_ref()
    }

    /// Returns the q-value preference.
    pub fn q(&self) -> Option<Q> {
        self.q
    }

    /// Returns the expires parameter.
    pub fn expires(&self) -> Option<u32> {
        self.expires
    }

    /// Returns the generic header parameters.
    pub fn params(&self) -> Option<&Params> {
        self.params.as_ref()
    }
}

impl fmt::Display for Contact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", Contact::NAME)?;
        self.fmt_body(f)
    }
}

impl EncodeBody for Contact {
    fn fmt_body(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.star {
            return f.write_str("*");
        }
        if let Some(addr) = &self.addr {
            write!(f, "{}", addr)?;
        }
        if let Some(q) = &self.q {
            write!(f, ";q={}", q)?;
        }
        if let Some(expires) = &self.expires {
            write!(f, ";expires={}", expires)?;
        }
        if let Some(params) = &self.params {
            write!(f, ";{}", params)?;
        }
        Ok(())
    }
}

impl HeaderParse for Contact {
    const NAME: &'static str = "Contact";
    const SHORT_NAME: Option<&'static str> = Some("m");
    /*
     * Contact        =  ("Contact" / "m" ) HCOLON
     *                   ( STAR / (contact-param *(COMMA contact-param)))
     * contact-param  =  (name-addr / addr-spec) *(SEMI contact-params)
     * contact-params =  c-p-q / c-p-expires / contact-extension
     * c-p-q          =  "q" EQUAL qvalue
     * c-p-expires    =  "expires" EQUAL delta-seconds
     */
    fn parse(parser: &mut Parser<'_>) -> Result<Self> {
        parser.skip_lws();
        if parser.peek() == Some(&b'*') {
            parser.advance(1);
            return Ok(Contact::star());
        }

        let addr = parser.parse_sip_addr(false)?;
        let mut q = None;
        let mut expires = None;
        let params = crate::macros::parse_header_param!(
            parser,
            Q_PARAM = q,
            EXPIRES_PARAM = expires
        );

        let q = match q {
            Some(q) => Some(
                q.parse()
                    .or_else(|_| parser.grammar_error("invalid q value"))?,
            ),
            None => None,
        };
        let expires = match expires {
            Some(seconds) => Some(
                seconds
                    .parse()
                    .or_else(|_| parser.grammar_error("invalid expires value"))?,
            ),
            None => None,
        };

        Ok(Contact {
            star: false,
            addr: Some(addr),
            q,
            expires,
            params,
        })
    }
}

crate::macros::structured!(Contact, "contact" { star, addr, q, expires, params });

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let src = b"<sip:alice@client.atlanta.com;transport=tcp>;q=0.7;expires=3600\r\n";
        let contact = Contact::from_bytes(src).unwrap();

        let addr = contact.addr().unwrap();
        assert_eq!(
            addr.uri_ref().to_string(),
            "sip:alice@client.atlanta.com;transport=TCP"
        );
        assert_eq!(contact.q(), Some(Q(0, 7)));
        assert_eq!(contact.expires(), Some(3600));
    }

    #[test]
    fn test_parse_star() {
        let contact = Contact::from_bytes(b"*\r\n").unwrap();
        assert!(contact.is_star());
        assert_eq!(contact.to_string(), "Contact: *");
    }

    #[test]
    fn test_header_params_stay_outside_bare_uri() {
        // Without angle brackets the parameters belong to the header.
        let contact = Contact::from_bytes(b"sip:carol@chicago.com;param=x\r\n").unwrap();

        let addr = contact.addr().unwrap();
        assert_eq!(addr.uri_ref().to_string(), "sip:carol@chicago.com");
        assert_eq!(contact.params().unwrap().get_value("param"), Some("x"));
    }
}
