#![deny(missing_docs)]
//! Session Description Protocol (RFC 4566) body model.
//!
//! A small structured model for the SDP payloads SIP messages carry:
//! enough to read a session's origin, connection, timing, media
//! sections and attributes, and to re-encode them in canonical line
//! order. Semantic validation of the description is out of scope.

use std::fmt;

use sipmsg_util::ArcStr;

use crate::error::{Error, Result};

/// The `o=` origin line of a session description.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Origin {
    /// The originating username.
    pub username: ArcStr,
    /// The session identifier.
    pub sess_id: u64,
    /// The session version.
    pub sess_version: u64,
    /// The network type, normally `IN`.
    pub net_type: ArcStr,
    /// The address type, `IP4` or `IP6`.
    pub addr_type: ArcStr,
    /// The unicast address of the originating machine.
    pub address: ArcStr,
}

impl fmt::Display for Origin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "{} {} {} {} {} {}",
            self.username, self.sess_id, self.sess_version, self.net_type, self.addr_type, self.address
        )
    }
}

/// The `c=` connection data line.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct Connection {
    /// The network type, normally `IN`.
    pub net_type: ArcStr,
    /// The address type, `IP4` or `IP6`.
    pub addr_type: ArcStr,
    /// The connection address.
    pub address: ArcStr,
}

impl fmt::Display for Connection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {}", self.net_type, self.addr_type, self.address)
    }
}

/// One `t=` timing line.
#[derive(Debug, PartialEq, Eq, Clone, Copy)]
pub struct TimeDescription {
    /// Session start time (NTP timestamp), 0 for unbounded.
    pub start: u64,
    /// Session stop time (NTP timestamp), 0 for unbounded.
    pub stop: u64,
}

impl fmt::Display for TimeDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {}", self.start, self.stop)
    }
}

/// One `a=` attribute, either a flag (`a=sendrecv`) or a valued
/// attribute (`a=rtpmap:0 PCMU/8000`).
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct SdpAttribute {
    /// The attribute name.
    pub name: ArcStr,
    /// The attribute value, if any.
    pub value: Option<ArcStr>,
}

impl SdpAttribute {
    /// Creates an attribute from its line text (without the `a=`).
    fn from_line(text: &str) -> Self {
        match text.split_once(':') {
            Some((name, value)) => Self {
                name: name.into(),
                value: Some(value.into()),
            },
            None => Self {
                name: text.into(),
                value: None,
            },
        }
    }
}

impl fmt::Display for SdpAttribute {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match &self.value {
            Some(value) => write!(f, "{}:{}", self.name, value),
            None => write!(f, "{}", self.name),
        }
    }
}

/// One `m=` media section with its own connection, attributes and
/// any unrecognized lines.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct MediaDescription {
    /// The media kind (`audio`, `video`, ...).
    pub media: ArcStr,
    /// The transport port.
    pub port: u16,
    /// The optional number of ports (`m=audio 49170/2 ...`).
    pub port_count: Option<u16>,
    /// The transport protocol (`RTP/AVP`, ...).
    pub proto: ArcStr,
    /// The media format descriptions (payload types).
    pub formats: Vec<ArcStr>,
    /// Media-level connection data, overriding the session's.
    pub connection: Option<Connection>,
    /// Media-level attributes.
    pub attributes: Vec<SdpAttribute>,
    /// Unrecognized media-level lines, kept as `(type, text)`.
    pub extra: Vec<(char, ArcStr)>,
}

impl fmt::Display for MediaDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "m={} {}", self.media, self.port)?;
        if let Some(count) = self.port_count {
            write!(f, "/{}", count)?;
        }
        write!(f, " {}", self.proto)?;
        for format in &self.formats {
            write!(f, " {}", format)?;
        }
        write!(f, "\r\n")?;
        if let Some(connection) = &self.connection {
            write!(f, "c={}\r\n", connection)?;
        }
        for (kind, text) in &self.extra {
            write!(f, "{}={}\r\n", kind, text)?;
        }
        for attribute in &self.attributes {
            write!(f, "a={}\r\n", attribute)?;
        }
        Ok(())
    }
}

/// A parsed SDP session description.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct SessionDescription {
    /// The protocol version (`v=`), always 0 today.
    pub version: u8,
    /// The origin line (`o=`).
    pub origin: Origin,
    /// The session name (`s=`).
    pub session_name: ArcStr,
    /// The optional session information line (`i=`).
    pub info: Option<ArcStr>,
    /// Session-level connection data (`c=`).
    pub connection: Option<Connection>,
    /// The timing lines (`t=`).
    pub times: Vec<TimeDescription>,
    /// Session-level attributes (`a=`).
    pub attributes: Vec<SdpAttribute>,
    /// The media sections (`m=` blocks).
    pub media: Vec<MediaDescription>,
    /// Unrecognized session-level lines, kept as `(type, text)`.
    pub extra: Vec<(char, ArcStr)>,
}

impl SessionDescription {
    /// Parses a session description from its text form.
    pub fn parse(src: &str) -> Result<Self> {
        let mut version = None;
        let mut origin = None;
        let mut session_name = None;
        let mut info = None;
        let mut connection = None;
        let mut times = Vec::new();
        let mut attributes = Vec::new();
        let mut media: Vec<MediaDescription> = Vec::new();
        let mut extra = Vec::new();

        for (lineno, raw) in src.lines().enumerate() {
            let line = raw.trim_end_matches('\r');
            if line.is_empty() {
                continue;
            }
            let (kind, text) = split_line(line, lineno)?;
            let in_media = !media.is_empty();

            match kind {
                'v' => {
                    version = Some(
                        text.parse()
                            .map_err(|_| line_error(lineno, "invalid protocol version"))?,
                    );
                }
                'o' => origin = Some(parse_origin(text, lineno)?),
                's' => session_name = Some(text.into()),
                'i' if !in_media => info = Some(text.into()),
                'c' => {
                    let parsed = parse_connection(text, lineno)?;
                    match media.last_mut() {
                        Some(section) => section.connection = Some(parsed),
                        None => connection = Some(parsed),
                    }
                }
                't' => times.push(parse_time(text, lineno)?),
                'm' => media.push(parse_media(text, lineno)?),
                'a' => {
                    let attribute = SdpAttribute::from_line(text);
                    match media.last_mut() {
                        Some(section) => section.attributes.push(attribute),
                        None => attributes.push(attribute),
                    }
                }
                other => match media.last_mut() {
                    Some(section) => section.extra.push((other, text.into())),
                    None => extra.push((other, text.into())),
                },
            }
        }

        Ok(SessionDescription {
            version: version.ok_or_else(|| line_error(0, "missing v= line"))?,
            origin: origin.ok_or_else(|| line_error(0, "missing o= line"))?,
            session_name: session_name.ok_or_else(|| line_error(0, "missing s= line"))?,
            info,
            connection,
            times,
            attributes,
            media,
            extra,
        })
    }
}

impl fmt::Display for SessionDescription {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "v={}\r\n", self.version)?;
        write!(f, "o={}\r\n", self.origin)?;
        write!(f, "s={}\r\n", self.session_name)?;
        if let Some(info) = &self.info {
            write!(f, "i={}\r\n", info)?;
        }
        if let Some(connection) = &self.connection {
            write!(f, "c={}\r\n", connection)?;
        }
        for time in &self.times {
            write!(f, "t={}\r\n", time)?;
        }
        for (kind, text) in &self.extra {
            write!(f, "{}={}\r\n", kind, text)?;
        }
        for attribute in &self.attributes {
            write!(f, "a={}\r\n", attribute)?;
        }
        for section in &self.media {
            write!(f, "{}", section)?;
        }
        Ok(())
    }
}

fn line_error(lineno: usize, message: &str) -> Error {
    Error::Grammar {
        message: message.into(),
        line: lineno + 1,
        col: 1,
    }
}

fn split_line(line: &str, lineno: usize) -> Result<(char, &str)> {
    let mut chars = line.chars();
    let kind = chars.next().unwrap_or(' ');
    if chars.next() != Some('=') || !kind.is_ascii_alphabetic() {
        return Err(line_error(lineno, "expected <type>=<value>"));
    }
    Ok((kind, &line[2..]))
}

fn parse_origin(text: &str, lineno: usize) -> Result<Origin> {
    let mut fields = text.split_whitespace();
    let err = || line_error(lineno, "malformed o= line");

    Ok(Origin {
        username: fields.next().ok_or_else(err)?.into(),
        sess_id: fields.next().ok_or_else(err)?.parse().map_err(|_| err())?,
        sess_version: fields.next().ok_or_else(err)?.parse().map_err(|_| err())?,
        net_type: fields.next().ok_or_else(err)?.into(),
        addr_type: fields.next().ok_or_else(err)?.into(),
        address: fields.next().ok_or_else(err)?.into(),
    })
}

fn parse_connection(text: &str, lineno: usize) -> Result<Connection> {
    let mut fields = text.split_whitespace();
    let err = || line_error(lineno, "malformed c= line");

    Ok(Connection {
        net_type: fields.next().ok_or_else(err)?.into(),
        addr_type: fields.next().ok_or_else(err)?.into(),
        address: fields.next().ok_or_else(err)?.into(),
    })
}

fn parse_time(text: &str, lineno: usize) -> Result<TimeDescription> {
    let mut fields = text.split_whitespace();
    let err = || line_error(lineno, "malformed t= line");

    Ok(TimeDescription {
        start: fields.next().ok_or_else(err)?.parse().map_err(|_| err())?,
        stop: fields.next().ok_or_else(err)?.parse().map_err(|_| err())?,
    })
}

fn parse_media(text: &str, lineno: usize) -> Result<MediaDescription> {
    let mut fields = text.split_whitespace();
    let err = || line_error(lineno, "malformed m= line");

    let media = fields.next().ok_or_else(err)?;
    let port_field = fields.next().ok_or_else(err)?;
    let (port, port_count) = match port_field.split_once('/') {
        Some((port, count)) => (
            port.parse().map_err(|_| err())?,
            Some(count.parse().map_err(|_| err())?),
        ),
        None => (port_field.parse().map_err(|_| err())?, None),
    };
    let proto = fields.next().ok_or_else(err)?;
    let formats = fields.map(|f| f.into()).collect();

    Ok(MediaDescription {
        media: media.into(),
        port,
        port_count,
        proto: proto.into(),
        formats,
        connection: None,
        attributes: Vec::new(),
        extra: Vec::new(),
    })
}

impl crate::message::SipMessage {
    /// Parses the message body as a session description when the
    /// Content-Type header says `application/sdp`.
    pub fn sdp_body(&self) -> Option<Result<SessionDescription>> {
        let media_type = self.headers().find_map(|h| match h {
            crate::headers::Header::ContentType(c) => Some(c.media_type()),
            _ => None,
        })?;
        if !media_type.mimetype.mtype.eq_ignore_ascii_case("application")
            || !media_type.mimetype.subtype.eq_ignore_ascii_case("sdp")
        {
            return None;
        }
        let body = self.body_text()?;
        Some(SessionDescription::parse(&body))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const DESCRIPTION: &str = concat!(
        "v=0\r\n",
        "o=alice 2890844526 2890844526 IN IP4 client.atlanta.example.com\r\n",
        "s=-\r\n",
        "c=IN IP4 192.0.2.101\r\n",
        "t=0 0\r\n",
        "m=audio 49172 RTP/AVP 0\r\n",
        "a=rtpmap:0 PCMU/8000\r\n"
    );

    #[test]
    fn test_parse() {
        let sdp = SessionDescription::parse(DESCRIPTION).unwrap();

        assert_eq!(sdp.version, 0);
        assert_eq!(sdp.origin.username, "alice");
        assert_eq!(sdp.origin.sess_id, 2890844526);
        assert_eq!(sdp.session_name, "-");
        assert_eq!(sdp.connection.as_ref().unwrap().address, "192.0.2.101");
        assert_eq!(sdp.times, vec![TimeDescription { start: 0, stop: 0 }]);

        assert_eq!(sdp.media.len(), 1);
        let audio = &sdp.media[0];
        assert_eq!(audio.media, "audio");
        assert_eq!(audio.port, 49172);
        assert_eq!(audio.proto, "RTP/AVP");
        assert_eq!(audio.formats.len(), 1);
        assert_eq!(audio.formats[0], "0");
        assert_eq!(audio.attributes[0].name, "rtpmap");
        assert_eq!(audio.attributes[0].value.as_deref(), Some("0 PCMU/8000"));
    }

    #[test]
    fn test_round_trip() {
        let sdp = SessionDescription::parse(DESCRIPTION).unwrap();
        assert_eq!(sdp.to_string(), DESCRIPTION);
    }

    #[test]
    fn test_missing_origin_fails() {
        let err = SessionDescription::parse("v=0\r\ns=-\r\n").unwrap_err();
        assert!(matches!(err, Error::Grammar { .. }));
    }

    #[test]
    fn test_unknown_lines_are_preserved() {
        let src = concat!(
            "v=0\r\n",
            "o=bob 1 1 IN IP4 biloxi.com\r\n",
            "s=call\r\n",
            "b=CT:128\r\n",
            "t=0 0\r\n"
        );
        let sdp = SessionDescription::parse(src).unwrap();
        assert_eq!(sdp.extra.len(), 1);
        assert_eq!(sdp.extra[0].0, 'b');
        assert_eq!(sdp.extra[0].1, "CT:128");
        assert!(sdp.to_string().contains("b=CT:128\r\n"));
    }
}
