use core::fmt;

use crate::error::Result;
use crate::headers::{EncodeBody, HeaderParse};
use crate::parser::Parser;
use crate::MediaType;

/// The `Content-Type` SIP header.
///
/// Indicates the media type of the message body.
///
/// # Examples
///
/// ```
/// use sipmsg::headers::ContentType;
/// use sipmsg::MediaType;
///
/// let ctype = ContentType::new(MediaType::new("application", "sdp"));
///
/// assert_eq!("Content-Type: application/sdp", ctype.to_string());
/// ```
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct ContentType {
    media_type: MediaType,
}

impl ContentType {
    /// Creates a new `ContentType`.
    pub fn new(media_type: MediaType) -> Self {
        Self { media_type }
    }

    /// Creates a `Content-Type: application/sdp` header.
    pub fn new_sdp() -> Self {
        Self::new(MediaType::new("application", "sdp"))
    }

    /// Returns the media type.
    pub fn media_type(&self) -> &MediaType {
        &self.media_type
    }
}

impl fmt::Display for ContentType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", ContentType::NAME)?;
        self.fmt_body(f)
    }
}

impl EncodeBody for ContentType {
    fn fmt_body(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.media_type)
    }
}

impl HeaderParse for ContentType {
    const NAME: &'static str = "Content-Type";
    const SHORT_NAME: Option<&'static str> = Some("c");
    /*
     * Content-Type     =  ( "Content-Type" / "c" ) HCOLON media-type
     * media-type       =  m-type SLASH m-subtype *(SEMI m-parameter)
     * m-parameter      =  m-attribute EQUAL m-value
     * m-attribute      =  token
     * m-value          =  token / quoted-string
     */
    fn parse(parser: &mut Parser<'_>) -> Result<Self> {
        parser.skip_lws();
        let media_type = MediaType::parse(parser)?;

        Ok(ContentType { media_type })
    }
}

crate::macros::structured!(ContentType, "content-type" { media_type });

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let ctype = ContentType::from_bytes(b"application/sdp\r\n").unwrap();
        assert_eq!(ctype.media_type().mimetype.mtype, "application");
        assert_eq!(ctype.media_type().mimetype.subtype, "sdp");
    }

    #[test]
    fn test_parse_with_charset() {
        let ctype = ContentType::from_bytes(b"text/html; charset=ISO-8859-4\r\n").unwrap();
        assert_eq!(ctype.media_type().mimetype.mtype, "text");
        assert_eq!(ctype.media_type().mimetype.subtype, "html");
        assert_eq!(
            ctype.media_type().param.as_ref().unwrap().get_value("charset"),
            Some("ISO-8859-4")
        );
    }
}
