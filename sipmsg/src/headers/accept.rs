use core::fmt;

use itertools::Itertools;

use crate::error::Result;
use crate::headers::{EncodeBody, HeaderParse};
use crate::parser::Parser;
use crate::MediaType;

/// The `Accept` SIP header.
///
/// Lists the body media types the sender is willing to receive,
/// optionally weighted with q-values carried in the media-type
/// parameters.
#[derive(Debug, PartialEq, Eq, Default, Clone)]
pub struct Accept {
    media_types: Vec<MediaType>,
}

impl Accept {
    /// Creates an empty `Accept` header.
    pub fn new() -> Self {
        Self::default()
    }

    /// Appends a media type.
    pub fn push(&mut self, media_type: MediaType) {
        self.media_types.push(media_type);
    }

    /// Gets the media type at the given index.
    pub fn get(&self, index: usize) -> Option<&MediaType> {
        self.media_types.get(index)
    }

    /// Returns the number of media types listed.
    pub fn len(&self) -> usize {
        self.media_types.len()
    }

    /// Returns `true` if no media type is listed.
    pub fn is_empty(&self) -> bool {
        self.media_types.is_empty()
    }
}

impl fmt::Display for Accept {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}: ", Accept::NAME)?;
        self.fmt_body(f)
    }
}

impl EncodeBody for Accept {
    fn fmt_body(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.media_types.iter().format(", "))
    }
}

impl HeaderParse for Accept {
    const NAME: &'static str = "Accept";
    /*
     * Accept         =  "Accept" HCOLON [ accept-range *(COMMA accept-range) ]
     * accept-range   =  media-range *(SEMI accept-param)
     * accept-param   =  ("q" EQUAL qvalue) / generic-param
     */
    fn parse(parser: &mut Parser<'_>) -> Result<Self> {
        let media_types = crate::macros::hdr_list!(parser => {
            MediaType::parse(parser)?
        });

        Ok(Accept { media_types })
    }
}

crate::macros::structured!(Accept, "accept" { media_types });

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse() {
        let accept = Accept::from_bytes(b"application/sdp;level=1, application/x-private, text/html\r\n").unwrap();

        assert_eq!(accept.len(), 3);
        assert_eq!(accept.get(0).unwrap().mimetype.subtype, "sdp");
        assert_eq!(accept.get(1).unwrap().mimetype.subtype, "x-private");
        assert_eq!(accept.get(2).unwrap().mimetype.mtype, "text");
    }
}
