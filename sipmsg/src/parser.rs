//! SIP parser.
//!
//! The module provides the [`Parser`] struct for parsing SIP messages,
//! requests and responses, as well as the shared grammar productions
//! every header parser is built from: tokens, quoted strings,
//! host/port, name-addr and parameter runs.

use std::str;

use sipmsg_util::util::{is_space, is_valid_port};
use sipmsg_util::{Position, Scanner};

use crate::error::{Error, Result};
use crate::headers::{
    canonical_key, is_mandatory, is_singleton, Header, HeaderParse, Headers, RawHeader,
};
use crate::headers::{
    Accept, Allow, Authorization, CSeq, CallId, Contact, ContentLength, ContentType, Expires, From,
    MaxForwards, MinExpires, Organization, Priority, ProxyAuthenticate, ProxyAuthorization,
    ProxyRequire, RecordRoute, Require, Route, Server, Subject, Supported, To, Unsupported,
    UserAgent, Via, Warning, WWWAuthenticate,
};
use crate::macros::{comma_separated, lookup_table, parse_param};
use crate::message::auth::{
    ALGORITHM, CNONCE, DIGEST, DOMAIN, NC, NONCE, OPAQUE, QOP, REALM, RESPONSE, STALE, URI,
    USERNAME,
};
use crate::message::{
    Challenge, Credential, DigestChallenge, DigestCredential, Host, HostPort, NameAddr, Param,
    Params, Request, RequestLine, Response, Scheme, SipMessage, SipMethod, StatusCode, StatusLine,
    Uri, UserInfo,
};

// ---------------------------------------------------------------------
// Parser constants
// ---------------------------------------------------------------------
/// The user param used in SIP URIs.
const USER_PARAM: &str = "user";
/// The method param used in SIP URIs.
const METHOD_PARAM: &str = "method";
/// The transport param used in SIP URIs.
const TRANSPORT_PARAM: &str = "transport";
/// The ttl param used in SIP URIs.
const TTL_PARAM: &str = "ttl";
/// The lr param used in SIP URIs.
const LR_PARAM: &str = "lr";
/// The maddr param used in SIP URIs.
const MADDR_PARAM: &str = "maddr";
/// Alphanumeric is valid in all SIP message components.
const ALPHANUMERIC: &[u8] = b"abcdefghijklmnopqrstuvwxyzABCDEFGHIJKLMNOPQRSTUVWXYZ0123456789";
/// Unreserved characters in user, password, uri and header
/// parameters in SIP uris.
const UNRESERVED: &[u8] = b"-_.!~*'()%";
/// Escaped character in SIP URIs.
const ESCAPED: &[u8] = b"%";
/// Unreserved characters in the user part of SIP URIs.
const USER_UNRESERVED: &[u8] = b"&=+$,;?/";
/// Token characters in SIP messages.
const TOKEN: &[u8] = b"-.!%*_`'~+";
/// Password valid characters in SIP URIs.
const PASS: &[u8] = b"&=+$,";
/// Valid characters in the host part of SIP URIs.
const HOST: &[u8] = b"_-.";
/// Word characters, as used by Call-ID values.
const WORD: &[u8] = b"-.!%*_+`'~()<>:\\\"/[]?{}@";
/// The SIP version this parser understands.
pub(crate) const SIPV2: &str = "SIP/2.0";

const B_SIPV2: &[u8] = SIPV2.as_bytes();

// ---------------------------------------------------------------------
// Lookup Tables
// ---------------------------------------------------------------------
// For reading user in uri.
lookup_table!(USER_TAB => ALPHANUMERIC, UNRESERVED, USER_UNRESERVED, ESCAPED);
// For reading password in uri.
lookup_table!(PASS_TAB => ALPHANUMERIC, UNRESERVED, ESCAPED, PASS);
// For reading host in uri.
lookup_table!(HOST_TAB => ALPHANUMERIC, HOST);
// For reading parameter in uri.
lookup_table!(PARAM_TAB => b"[]/:&+$", ALPHANUMERIC, UNRESERVED, ESCAPED);
// For reading header parameter in uri.
lookup_table!(HDR_TAB => b"[]/?:+$", ALPHANUMERIC, UNRESERVED, ESCAPED);
// For reading token.
lookup_table!(TOKEN_TAB => ALPHANUMERIC, TOKEN);
// For reading via parameter.
lookup_table!(VIA_PARAM_TAB => b"[:]", ALPHANUMERIC, TOKEN);
// For reading Call-ID words.
lookup_table!(WORD_TAB => ALPHANUMERIC, WORD);

/// How tolerant a [`Parser`] is towards malformed optional headers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ParserConfig {
    /// In lenient mode an unparsable recognized header that is not
    /// mandatory is demoted to a raw passthrough header (with a
    /// warning event) instead of failing the whole message parse.
    pub lenient: bool,
}

/// A SIP message parser.
///
/// One `Parser` is created per parse call over one in-memory buffer;
/// nothing is cached process-wide, so concurrent parses need no
/// synchronization.
pub struct Parser<'buf> {
    scanner: Scanner<'buf>,
    config: ParserConfig,
}

impl<'buf> Parser<'buf> {
    /// Creates a new strict `Parser` over the given buffer.
    #[inline]
    pub fn new<B>(buf: &'buf B) -> Self
    where
        B: AsRef<[u8]> + ?Sized,
    {
        Self::with_config(buf, ParserConfig::default())
    }

    /// Creates a `Parser` with an explicit configuration.
    pub fn with_config<B>(buf: &'buf B, config: ParserConfig) -> Self
    where
        B: AsRef<[u8]> + ?Sized,
    {
        Self {
            scanner: Scanner::new(buf.as_ref()),
            config,
        }
    }

    /// Parses the `buf` into a [`SipMessage`].
    ///
    /// This is equivalent to `Parser::new(buf).parse()`.
    #[inline]
    pub fn parse_sip_msg<B>(buf: &'buf B) -> Result<SipMessage>
    where
        B: AsRef<[u8]> + ?Sized,
    {
        Self::new(buf.as_ref()).parse()
    }

    /// Parses the internal buffer into a [`SipMessage`].
    ///
    /// # Examples
    ///
    /// ```
    /// use sipmsg::parser::Parser;
    ///
    /// let buf = b"SIP/2.0 200 OK\r\nContent-Length: 0\r\n\r\n";
    /// let msg = Parser::parse_sip_msg(buf).unwrap();
    /// let res = msg.as_response().unwrap();
    ///
    /// assert_eq!(res.code().as_u16(), 200);
    /// assert_eq!(res.reason(), "OK");
    /// ```
    pub fn parse(&mut self) -> Result<SipMessage> {
        tracing::trace!("parsing SIP message");
        let mut sip_message = self.parse_start_line()?;

        let mut headers = self.parse_headers_block()?;

        // The blank line separating headers from the body.
        if self.scanner.starts_with(b"\r\n") {
            self.scanner.advance(2);
        } else {
            self.scanner.advance_if_eq(b'\n');
        }

        let clen = headers
            .find_map(|h| match h {
                Header::ContentLength(c) => Some(c),
                _ => None,
            })
            .map(|c| c.clen() as usize);
        let clen = match clen {
            Some(n) => n,
            None => {
                // Every message carries exactly one Content-Length.
                headers.push(Header::ContentLength(ContentLength::new(0)));
                0
            }
        };

        if clen > 0 {
            let body = self.scanner.remaining();
            if body.len() < clen {
                if self.config.lenient {
                    tracing::warn!(
                        expected = clen,
                        present = body.len(),
                        "body shorter than Content-Length, taking what is there"
                    );
                    sip_message.set_body(Some(body));
                } else {
                    return self.grammar_error("body shorter than Content-Length");
                }
            } else {
                sip_message.set_body(Some(&body[..clen]));
            }
        }

        *sip_message.headers_mut() = headers;
        Ok(sip_message)
    }

    /// Parses a block of header lines (no start line), up to the blank
    /// line or end of input.
    ///
    /// Useful for header fragments; whole messages go through
    /// [`Parser::parse`].
    pub fn parse_headers_block(&mut self) -> Result<Headers> {
        // Might be enough for most messages.
        let probable_number_of_headers = 10;
        let mut headers = Headers::with_capacity(probable_number_of_headers);

        if matches!(self.peek(), Some(&b'\r') | Some(&b'\n') | None) {
            return Ok(headers);
        }

        'headers: loop {
            let header_name = self.read_token()?;

            self.space();
            self.must_read(b':')?;
            self.skip_lws();

            self.parse_named_header(header_name, &mut headers)?;

            if self.scanner.advance_if_eq(b'\r').is_none() || self.scanner.advance_if_eq(b'\n').is_none()
            {
                return self.grammar_error("missing CRLF on header end");
            }

            // A continuation line that no header grammar consumed
            // belongs to the previous header; only raw headers can
            // absorb it.
            while self.scanner.peek().is_some_and(|&b| is_space(b)) {
                self.space();
                let continuation = self.read_until_newline()?;
                self.new_line();
                match headers.last_raw_mut() {
                    Some(raw) => raw.append_folded_line(continuation.trim_end()),
                    None if self.config.lenient => {
                        tracing::warn!("dropping orphan header continuation line");
                    }
                    None => {
                        return self.grammar_error("unexpected header continuation line");
                    }
                }
            }

            if matches!(self.peek(), Some(&b'\r') | Some(&b'\n') | None) {
                break 'headers;
            }
        }

        Ok(headers)
    }

    /// Parses one named header value (everything after the `:`) and
    /// appends the resulting header(s), enforcing the
    /// duplicate-singleton policy and the lenient-mode demotion rule.
    fn parse_named_header(&mut self, name: &'buf str, headers: &mut Headers) -> Result<()> {
        let mark = self.scanner.mark();
        let mut parsed = Vec::with_capacity(1);

        if let Err(err) = self.dispatch_header(name, &mut parsed) {
            if self.config.lenient && !is_mandatory(name) {
                self.scanner.rewind(mark);
                let value = self.read_until_newline()?;
                tracing::warn!(header = name, error = %err, "demoting unparsable header to raw");
                headers.push(Header::Raw(RawHeader::new(name, value.trim())));
                return Ok(());
            }
            return Err(self.header_error(name, err));
        }

        for hdr in parsed {
            let key = canonical_key(hdr.name());
            if is_singleton(&key) && headers.contains_named(&key) {
                // Keep-first policy; the duplicate is observable via
                // the warning event.
                tracing::warn!(header = %key, "duplicate singleton header dropped, keeping first");
                continue;
            }
            headers.push(hdr);
        }
        Ok(())
    }

    /// The header-name dispatch table: one arm per recognized header,
    /// everything else lands in the raw passthrough bucket.
    fn dispatch_header(&mut self, name: &str, out: &mut Vec<Header>) -> Result<()> {
        match canonical_key(name).as_str() {
            "via" => comma_separated!(self => {
                out.push(Header::Via(Via::parse(self)?));
            }),
            "route" => comma_separated!(self => {
                out.push(Header::Route(Route::parse(self)?));
            }),
            "record-route" => comma_separated!(self => {
                out.push(Header::RecordRoute(RecordRoute::parse(self)?));
            }),
            "contact" => comma_separated!(self => {
                out.push(Header::Contact(Contact::parse(self)?));
            }),
            "warning" => comma_separated!(self => {
                out.push(Header::Warning(Warning::parse(self)?));
            }),
            "from" => out.push(Header::From(From::parse(self)?)),
            "to" => out.push(Header::To(To::parse(self)?)),
            "call-id" => out.push(Header::CallId(CallId::parse(self)?)),
            "cseq" => out.push(Header::CSeq(CSeq::parse(self)?)),
            "max-forwards" => out.push(Header::MaxForwards(MaxForwards::parse(self)?)),
            "content-length" => out.push(Header::ContentLength(ContentLength::parse(self)?)),
            "content-type" => out.push(Header::ContentType(ContentType::parse(self)?)),
            "expires" => out.push(Header::Expires(Expires::parse(self)?)),
            "min-expires" => out.push(Header::MinExpires(MinExpires::parse(self)?)),
            "accept" => out.push(Header::Accept(Accept::parse(self)?)),
            "allow" => out.push(Header::Allow(Allow::parse(self)?)),
            "require" => out.push(Header::Require(Require::parse(self)?)),
            "proxy-require" => out.push(Header::ProxyRequire(ProxyRequire::parse(self)?)),
            "supported" => out.push(Header::Supported(Supported::parse(self)?)),
            "unsupported" => out.push(Header::Unsupported(Unsupported::parse(self)?)),
            "subject" => out.push(Header::Subject(Subject::parse(self)?)),
            "user-agent" => out.push(Header::UserAgent(UserAgent::parse(self)?)),
            "server" => out.push(Header::Server(Server::parse(self)?)),
            "organization" => out.push(Header::Organization(Organization::parse(self)?)),
            "priority" => out.push(Header::Priority(Priority::parse(self)?)),
            "www-authenticate" => out.push(Header::WWWAuthenticate(WWWAuthenticate::parse(self)?)),
            "proxy-authenticate" => {
                out.push(Header::ProxyAuthenticate(ProxyAuthenticate::parse(self)?))
            }
            "authorization" => out.push(Header::Authorization(Authorization::parse(self)?)),
            "proxy-authorization" => {
                out.push(Header::ProxyAuthorization(ProxyAuthorization::parse(self)?))
            }
            _ => {
                // A header this crate has no parser for: keep it
                // verbatim.
                let value = self.read_until_newline()?;
                out.push(Header::Raw(RawHeader::new(name, value.trim())));
            }
        };
        Ok(())
    }

    fn parse_start_line(&mut self) -> Result<SipMessage> {
        if self.scanner.starts_with(B_SIPV2) {
            // A status line, e.g. "SIP/2.0 200 OK".
            let status_line = self.parse_status_line()?;

            Ok(SipMessage::Response(Response::new(status_line)))
        } else {
            // A request line, e.g. "OPTIONS sip:localhost SIP/2.0".
            let req_line = self.parse_request_line()?;

            Ok(SipMessage::Request(Request::new(req_line)))
        }
    }

    fn parse_status_line(&mut self) -> Result<StatusLine> {
        self.parse_sip_version()?;
        let code = self.parse_status_code()?;
        let reason = self.read_until_newline()?;
        self.new_line();

        Ok(StatusLine::new(code, reason))
    }

    fn parse_request_line(&mut self) -> Result<RequestLine> {
        let method = SipMethod::from(self.read_token()?);
        let uri = self.parse_uri(true)?;
        self.parse_sip_version()?;
        self.new_line();

        Ok(RequestLine { method, uri })
    }

    #[inline]
    pub(crate) fn parse_sip_version(&mut self) -> Result<()> {
        Ok(self.scanner.must_read_bytes(B_SIPV2)?)
    }

    fn parse_status_code(&mut self) -> Result<StatusCode> {
        self.space();
        let code = self
            .scanner
            .read_u16()
            .or_else(|_| self.grammar_error("invalid status code"))?;
        self.space();

        if !(100..700).contains(&code) {
            return self.grammar_error("status code out of range");
        }

        Ok(StatusCode::new(code))
    }

    fn parse_scheme(&mut self) -> Result<Scheme> {
        let (token, _) = self.scanner.peek_while(is_token);

        let scheme = if token.eq_ignore_ascii_case(b"sip") {
            Scheme::Sip
        } else if token.eq_ignore_ascii_case(b"sips") {
            Scheme::Sips
        } else {
            return self.grammar_error(format!(
                "unsupported URI scheme: {}",
                String::from_utf8_lossy(token)
            ));
        };

        // Eat the scheme and the ":" character.
        self.scanner.advance(token.len());
        self.must_read(b':')?;

        Ok(scheme)
    }

    fn exists_user_part_in_uri(&self) -> bool {
        self.remaining()
            .iter()
            .take_while(|&&b| !is_space(b) && !is_newline(b) && b != b'>' && b != b',')
            .any(|&b| b == b'@')
    }

    fn parse_user_info(&mut self) -> Result<Option<UserInfo>> {
        if !self.exists_user_part_in_uri() {
            return Ok(None);
        }

        let user = self.read_user_str();
        let pass = if self.scanner.advance_if_eq(b':').is_some() {
            Some(self.read_pass_str())
        } else {
            None
        };

        // Take '@'.
        self.must_read(b'@')?;

        Ok(Some(UserInfo::new(user, pass)))
    }

    pub(crate) fn parse_host_port(&mut self) -> Result<HostPort> {
        let host = match self.peek() {
            Some(&b'[') => {
                // An IPv6 reference; scan through the matching ']'.
                let inner = self
                    .scanner
                    .read_between(b'[', b']')
                    .or_else(|_| self.grammar_error("IPv6 reference missing closing bracket"))?;
                let inner = str::from_utf8(inner)?;

                match inner.parse() {
                    Ok(addr) => Host::from_kind(crate::message::HostKind::Ipv6(addr)),
                    Err(_) => return self.grammar_error("invalid IPv6 reference"),
                }
            }
            _ => {
                // A domain name or IPv4 literal; which of the two is
                // the host entity's own call.
                let host = self.read_host_str();
                if host.is_empty() {
                    return self.grammar_error("empty host");
                }
                Host::new(host)
            }
        };

        let port = self.parse_port()?;

        Ok(HostPort { host, port })
    }

    fn parse_port(&mut self) -> Result<Option<u16>> {
        if self.scanner.advance_if_eq(b':').is_none() {
            return Ok(None);
        }
        let port = self
            .scanner
            .read_u16()
            .or_else(|_| self.grammar_error("port must be all digits"))?;

        // "56ty" is not a port.
        if self.peek().is_some_and(|&b| is_host(b)) {
            return self.grammar_error("port must be all digits");
        }

        if is_valid_port(port) {
            Ok(Some(port))
        } else {
            self.grammar_error("port is out of range")
        }
    }

    pub(crate) fn parse_sip_addr(&mut self, parse_params: bool) -> Result<crate::message::SipAddr> {
        self.skip_lws();

        if self.starts_with_scheme() {
            let uri = self.parse_uri(parse_params)?;
            Ok(crate::message::SipAddr::Uri(uri))
        } else {
            let addr = self.parse_name_addr()?;
            Ok(crate::message::SipAddr::NameAddr(addr))
        }
    }

    fn starts_with_scheme(&self) -> bool {
        let rem = self.remaining();
        let lower = |b: u8| b.to_ascii_lowercase();
        if rem.len() >= 4 && lower(rem[0]) == b's' && lower(rem[1]) == b'i' && lower(rem[2]) == b'p' {
            if rem[3] == b':' {
                return true;
            }
            return rem.len() >= 5 && lower(rem[3]) == b's' && rem[4] == b':';
        }
        false
    }

    pub(crate) fn parse_uri(&mut self, parse_params: bool) -> Result<Uri> {
        self.skip_lws();
        // "sip:" [ userinfo ] hostport uri-parameters [ headers ]
        let scheme = self.parse_scheme()?;
        let user = self.parse_user_info()?;
        let host_port = self.parse_host_port()?;

        if !parse_params {
            return Ok(Uri::without_params(scheme, user, host_port));
        }

        // Parse SIP uri parameters.
        let mut user_param = None;
        let mut method_param = None;
        let mut transport_param = None;
        let mut ttl_param = None;
        let mut lr_param = None;
        let mut maddr_param = None;

        let params = parse_param!(
            self,
            parse_uri_param,
            USER_PARAM = user_param,
            METHOD_PARAM = method_param,
            TRANSPORT_PARAM = transport_param,
            TTL_PARAM = ttl_param,
            LR_PARAM = lr_param,
            MADDR_PARAM = maddr_param
        );

        let transport_param = transport_param.map(|t: sipmsg_util::ArcStr| t.as_ref().into());
        let ttl_param = match ttl_param {
            Some(ttl) => Some(
                str::parse(&ttl).or_else(|_| self.grammar_error("uri ttl is invalid"))?,
            ),
            None => None,
        };
        let lr_param = lr_param.is_some();
        let method_param = method_param.map(|m: sipmsg_util::ArcStr| m.as_ref().into());
        let maddr_param = maddr_param.map(|m: sipmsg_util::ArcStr| Host::new(&m));

        let hdr_params = if self.scanner.advance_if_eq(b'?').is_some() {
            Some(self.parse_headers_in_sip_uri()?)
        } else {
            None
        };
        self.space();

        Ok(Uri {
            scheme,
            user,
            host_port,
            transport_param,
            ttl_param,
            method_param,
            user_param,
            lr_param,
            maddr_param,
            params,
            hdr_params,
        })
    }

    pub(crate) fn parse_name_addr(&mut self) -> Result<NameAddr> {
        self.skip_lws();
        let display = self.parse_display_name()?;
        self.skip_lws();

        self.must_read(b'<')
            .or_else(|_| self.grammar_error("expected '<' in name-addr"))?;

        let uri = self.parse_uri(true)?;

        self.must_read(b'>')
            .or_else(|_| self.grammar_error("expected '>' in name-addr"))?;

        Ok(NameAddr {
            display: display.map(|d| d.trim().into()),
            uri,
        })
    }

    fn parse_display_name(&mut self) -> Result<Option<&'buf str>> {
        match self.peek() {
            Some(&b'"') => {
                let name = self.scanner.read_between(b'"', b'"')?;
                Ok(Some(str::from_utf8(name)?))
            }
            Some(&b'<') => Ok(None),
            None => self.grammar_error("unexpected end of input in name-addr"),
            _ => {
                let name = self.read_while(|b| b != b'<' && !is_newline(b));
                let name = str::from_utf8(name)?.trim_end();
                Ok((!name.is_empty()).then_some(name))
            }
        }
    }

    fn parse_headers_in_sip_uri(&mut self) -> Result<Params> {
        let mut params = Params::new();

        loop {
            // SAFETY: `is_hdr_uri` only accepts ASCII bytes.
            let param = unsafe { self.parse_param_with(is_hdr_uri)? };
            params.push(param);

            if self.scanner.advance_if_eq(b'&').is_none() {
                break;
            }
        }
        Ok(params)
    }

    /// Reads a bare token, failing on an empty one.
    pub(crate) fn read_token(&mut self) -> Result<&'buf str> {
        let token = self.read_token_str();
        if token.is_empty() {
            return self.grammar_error("expected a token");
        }
        Ok(token)
    }

    /// Reads a quoted string, returning the text between the quotes.
    pub(crate) fn read_quoted(&mut self) -> Result<&'buf str> {
        let value = self.scanner.read_between(b'"', b'"')?;
        Ok(str::from_utf8(value)?)
    }

    /// Reads a Call-ID style word.
    pub(crate) fn read_word(&mut self) -> Result<&'buf str> {
        // SAFETY: `is_word` only accepts ASCII bytes.
        Ok(unsafe { self.scanner.read_while_as_str_unchecked(is_word) })
    }

    /// Shortcut for yielding a grammar error wrapped in a result.
    pub(crate) fn grammar_error<T>(&self, message: impl Into<String>) -> Result<T> {
        let position = self.position();
        Err(Error::Grammar {
            message: message.into(),
            line: position.line(),
            col: position.col(),
        })
    }

    fn header_error(&self, name: &str, err: Error) -> Error {
        let position = self.position();
        Error::Header {
            name: name.into(),
            message: err.to_string(),
            line: position.line(),
            col: position.col(),
        }
    }

    /// Read until a new line (`\r` or `\n`) is found.
    pub(crate) fn read_until_newline(&mut self) -> Result<&'buf str> {
        let bytes = self.read_while(is_not_newline);

        Ok(str::from_utf8(bytes)?)
    }

    /// Read until `byte` or the end of the line.
    pub(crate) fn read_until_byte(&mut self, byte: u8) -> Result<&'buf str> {
        let bytes = self.read_while(|b| b != byte && !is_newline(b));

        Ok(str::from_utf8(bytes)?)
    }

    /// Read space characters.
    #[inline]
    pub(crate) fn space(&mut self) {
        self.read_while(is_space);
    }

    /// Read linear white space: spaces, tabs and folded line
    /// continuations (CRLF followed by more white space).
    pub(crate) fn skip_lws(&mut self) {
        loop {
            self.read_while(is_space);
            let rem = self.scanner.remaining();
            if rem.len() >= 3 && rem[0] == b'\r' && rem[1] == b'\n' && is_space(rem[2]) {
                self.scanner.advance(2);
                continue;
            }
            if rem.len() >= 2 && rem[0] == b'\n' && is_space(rem[1]) {
                self.scanner.advance(1);
                continue;
            }
            break;
        }
    }

    /// Advance past newline characters.
    #[inline]
    pub(crate) fn new_line(&mut self) {
        self.read_while(is_newline);
    }

    /// Read alphabetic characters.
    #[inline]
    pub(crate) fn alphabetic(&mut self) -> &'buf str {
        // SAFETY: alphabetic bytes are ASCII.
        unsafe { self.scanner.read_while_as_str_unchecked(is_alphabetic) }
    }

    #[inline]
    fn read_while(&mut self, func: impl Fn(u8) -> bool) -> &'buf [u8] {
        self.scanner.read_while(func)
    }

    #[inline]
    pub(crate) fn peek(&self) -> Option<&u8> {
        self.scanner.peek()
    }

    #[inline]
    pub(crate) fn advance(&mut self, n: usize) {
        self.scanner.advance(n);
    }

    #[inline]
    pub(crate) fn position(&self) -> Position {
        self.scanner.position()
    }

    /// Get the remaining bytes in the scanner.
    #[inline]
    pub(crate) fn remaining(&self) -> &'buf [u8] {
        self.scanner.remaining()
    }

    #[inline]
    pub(crate) fn is_next_newline(&self) -> bool {
        self.scanner.peek().is_some_and(|&b| is_newline(b))
    }

    #[inline]
    pub(crate) fn parse_u32(&mut self) -> Result<u32> {
        Ok(self.scanner.read_u32()?)
    }

    #[inline]
    pub(crate) fn must_read(&mut self, byte: u8) -> Result<()> {
        Ok(self.scanner.must_read(byte)?)
    }

    #[inline]
    fn read_user_str(&mut self) -> &'buf str {
        // SAFETY: `is_user` only accepts ASCII bytes.
        unsafe { self.scanner.read_while_as_str_unchecked(is_user) }
    }

    #[inline]
    fn read_pass_str(&mut self) -> &'buf str {
        // SAFETY: `is_pass` only accepts ASCII bytes.
        unsafe { self.scanner.read_while_as_str_unchecked(is_pass) }
    }

    #[inline]
    fn read_host_str(&mut self) -> &'buf str {
        // SAFETY: `is_host` only accepts ASCII bytes.
        unsafe { self.scanner.read_while_as_str_unchecked(is_host) }
    }

    #[inline]
    fn read_token_str(&mut self) -> &'buf str {
        // SAFETY: `is_token` only accepts ASCII bytes.
        unsafe { self.scanner.read_while_as_str_unchecked(is_token) }
    }

    /// Parses one `pname ["=" pvalue]` unit using `func` as the
    /// value's character class, with quoted values recorded as such.
    ///
    /// # Safety
    ///
    /// `func` must only accept ASCII bytes.
    pub(crate) unsafe fn parse_param_with(&mut self, func: impl Fn(u8) -> bool) -> Result<Param> {
        self.skip_lws();

        let name = unsafe { self.scanner.read_while_as_str_unchecked(&func) };

        if self.peek() != Some(&b'=') {
            return Ok(Param::new(name, None));
        }
        self.advance(1);

        if self.peek() == Some(&b'"') {
            let value = self.scanner.read_between(b'"', b'"')?;
            let value = str::from_utf8(value)?;
            Ok(Param::with_quoting(name, Some(value), true))
        } else {
            let value = unsafe { self.scanner.read_while_as_str_unchecked(func) };
            Ok(Param::with_quoting(name, Some(value), false))
        }
    }

    /// Parse a parameter (`pname ["=" pvalue]`) with token characters.
    pub(crate) fn parse_param_ref(&mut self) -> Result<Param> {
        // SAFETY: `is_token` only accepts ASCII bytes.
        unsafe { self.parse_param_with(is_token) }
    }

    pub(crate) fn parse_auth_credential(&mut self) -> Result<Credential> {
        self.skip_lws();
        let scheme = self.read_token()?;

        if scheme.eq_ignore_ascii_case(DIGEST) {
            return self.parse_digest_credential();
        }

        self.parse_other_scheme_params()
            .map(|params| Credential::Other {
                scheme: scheme.into(),
                params,
            })
    }

    pub(crate) fn parse_auth_challenge(&mut self) -> Result<Challenge> {
        self.skip_lws();
        let scheme = self.read_token()?;

        if scheme.eq_ignore_ascii_case(DIGEST) {
            return self.parse_digest_challenge();
        }

        self.parse_other_scheme_params()
            .map(|params| Challenge::Other {
                scheme: scheme.into(),
                params,
            })
    }

    fn parse_other_scheme_params(&mut self) -> Result<Params> {
        let mut params = Params::with_separator(',');

        comma_separated!(self => {
            params.push(self.parse_param_ref()?);
        });

        Ok(params)
    }

    fn parse_digest_challenge(&mut self) -> Result<Challenge> {
        let mut digest = DigestChallenge::default();

        comma_separated!(self => {
            let param = self.parse_param_ref()?;

            if param.name_matches(REALM) {
                digest.realm = param.into_value();
            } else if param.name_matches(NONCE) {
                digest.nonce = param.into_value();
            } else if param.name_matches(DOMAIN) {
                digest.domain = param.into_value();
            } else if param.name_matches(ALGORITHM) {
                digest.algorithm = param.into_value();
            } else if param.name_matches(OPAQUE) {
                digest.opaque = param.into_value();
            } else if param.name_matches(QOP) {
                digest.qop = param.into_value();
            } else if param.name_matches(STALE) {
                digest.stale = param.into_value();
            }
            // Unknown digest parameters are ignored.
        });

        Ok(Challenge::Digest(digest))
    }

    fn parse_digest_credential(&mut self) -> Result<Credential> {
        let mut digest = DigestCredential::default();

        comma_separated!(self => {
            let param = self.parse_param_ref()?;

            if param.name_matches(REALM) {
                digest.realm = param.into_value();
            } else if param.name_matches(USERNAME) {
                digest.username = param.into_value();
            } else if param.name_matches(NONCE) {
                digest.nonce = param.into_value();
            } else if param.name_matches(URI) {
                digest.uri = param.into_value();
            } else if param.name_matches(RESPONSE) {
                digest.response = param.into_value();
            } else if param.name_matches(ALGORITHM) {
                digest.algorithm = param.into_value();
            } else if param.name_matches(CNONCE) {
                digest.cnonce = param.into_value();
            } else if param.name_matches(OPAQUE) {
                digest.opaque = param.into_value();
            } else if param.name_matches(QOP) {
                digest.qop = param.into_value();
            } else if param.name_matches(NC) {
                digest.nc = param.into_value();
            }
            // Unknown digest parameters are ignored.
        });

        Ok(Credential::Digest(digest))
    }
}

/// Parses one header from separate name and value strings, e.g. when
/// building a message programmatically.
///
/// For multi-valued names this returns the first value;
/// [`parse_header_values`] returns all of them.
pub fn parse_header(name: &str, value: &str) -> Result<Header> {
    parse_header_values(name, value)?
        .into_iter()
        .next()
        .ok_or_else(|| Error::Grammar {
            message: "empty header value".into(),
            line: 1,
            col: 1,
        })
}

/// Parses a header value that may contain multiple comma-separated
/// entries into one header per entry.
pub fn parse_header_values(name: &str, value: &str) -> Result<Vec<Header>> {
    let mut parser = Parser::new(value);
    let mut out = Vec::with_capacity(1);
    match parser.dispatch_header(name, &mut out) {
        Ok(()) => Ok(out),
        Err(err) => Err(parser.header_error(name, err)),
    }
}

fn parse_uri_param(parser: &mut Parser<'_>) -> Result<Param> {
    // SAFETY: `is_param` only accepts ASCII bytes.
    let mut param = unsafe { parser.parse_param_with(is_param)? };

    if param.name_matches(LR_PARAM) && param.value().is_none() {
        param.set_value(Some(""));
    }

    Ok(param)
}

#[inline]
pub(crate) fn parse_via_param(parser: &mut Parser<'_>) -> Result<Param> {
    // SAFETY: `is_via_param` only accepts ASCII bytes.
    unsafe { parser.parse_param_with(is_via_param) }
}

#[inline(always)]
fn is_newline(c: u8) -> bool {
    matches!(c, b'\r' | b'\n')
}

#[inline(always)]
fn is_not_newline(c: u8) -> bool {
    !is_newline(c)
}

#[inline(always)]
fn is_alphabetic(c: u8) -> bool {
    c.is_ascii_alphabetic()
}

#[inline(always)]
pub(crate) fn is_via_param(b: u8) -> bool {
    VIA_PARAM_TAB[b as usize]
}

#[inline(always)]
pub(crate) fn is_host(b: u8) -> bool {
    HOST_TAB[b as usize]
}

#[inline(always)]
pub(crate) fn is_token(b: u8) -> bool {
    TOKEN_TAB[b as usize]
}

#[inline(always)]
fn is_user(b: u8) -> bool {
    USER_TAB[b as usize]
}

#[inline(always)]
fn is_pass(b: u8) -> bool {
    PASS_TAB[b as usize]
}

#[inline(always)]
fn is_param(b: u8) -> bool {
    PARAM_TAB[b as usize]
}

#[inline(always)]
fn is_hdr_uri(b: u8) -> bool {
    HDR_TAB[b as usize]
}

#[inline(always)]
fn is_word(b: u8) -> bool {
    WORD_TAB[b as usize]
}
