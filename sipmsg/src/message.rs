#![deny(missing_docs)]
//! SIP message types.
//!
//! The module provides the [`SipMessage`] enum over [`Request`] and
//! [`Response`], the start-line types, and re-exports the leaf value
//! types (methods, status codes, hosts, URIs, parameters, auth).

use std::collections::hash_map::DefaultHasher;
use std::fmt;
use std::hash::{Hash, Hasher};

use bytes::Bytes;
use enum_as_inner::EnumAsInner;
use sipmsg_util::ArcStr;

use crate::error::Result;
use crate::headers::{
    canonical_key, is_list_capable, Attached, ContentLength, Header, Headers,
};
use crate::object::Structured;
use crate::parser::SIPV2;

pub(crate) mod auth;
mod code;
mod host;
mod method;
mod param;
mod uri;

pub use auth::{Challenge, Credential, DigestChallenge, DigestCredential};
pub use code::StatusCode;
pub use host::{Host, HostKind, HostPort, ResolutionError};
pub use method::SipMethod;
pub use param::{Param, Params};
pub use uri::{NameAddr, Scheme, SipAddr, TransportKind, Uri, UriBuilder, UserInfo};

/// How list-capable headers are laid out when a message is encoded.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ListLayout {
    /// One header line per value (the default).
    #[default]
    SeparateLines,
    /// Consecutive same-name values joined with `", "` on one line.
    CommaJoined,
}

/// A SIP message as defined in [RFC 3261].
///
/// It can be either a request from a client to a server, or a
/// response from a server to a client.
///
/// [RFC 3261]: https://datatracker.ietf.org/doc/html/rfc3261
#[derive(Debug, PartialEq, Clone, EnumAsInner)]
pub enum SipMessage {
    /// A SIP request.
    Request(Request),
    /// A SIP response.
    Response(Response),
}

impl SipMessage {
    /// Returns a reference to the headers of the message.
    pub fn headers(&self) -> &Headers {
        match self {
            SipMessage::Request(req) => &req.headers,
            SipMessage::Response(res) => &res.headers,
        }
    }

    /// Returns a mutable reference to the headers of the message.
    pub fn headers_mut(&mut self) -> &mut Headers {
        match self {
            SipMessage::Request(req) => &mut req.headers,
            SipMessage::Response(res) => &mut res.headers,
        }
    }

    /// Returns the message body, if any.
    pub fn body(&self) -> Option<&[u8]> {
        match self {
            SipMessage::Request(req) => req.body.as_deref(),
            SipMessage::Response(res) => res.body.as_deref(),
        }
    }

    /// Sets the body of the message. `None` removes the body.
    pub fn set_body(&mut self, body: Option<&[u8]>) {
        let body = body.map(Bytes::copy_from_slice);
        match self {
            SipMessage::Request(req) => req.body = body,
            SipMessage::Response(res) => res.body = body,
        }
    }

    /// The body rendered as text, lossily decoded as UTF-8 (the
    /// default SIP charset). The raw bytes stay available through
    /// [`SipMessage::body`].
    pub fn body_text(&self) -> Option<std::borrow::Cow<'_, str>> {
        self.body().map(String::from_utf8_lossy)
    }

    /// Attaches a header following the singleton / list rules of
    /// [`Headers::attach`].
    pub fn attach_header(&mut self, header: Header, replace: bool, prepend: bool) -> Attached {
        self.headers_mut().attach(header, replace, prepend)
    }

    /// Returns the first header with the given name.
    pub fn get_header(&self, name: &str) -> Option<&Header> {
        self.headers().get_named(name)
    }

    /// Iterates every header with the given name.
    pub fn get_headers<'m>(&'m self, name: &str) -> impl Iterator<Item = &'m Header> {
        self.headers().get_named_all(name)
    }

    /// Removes one header with the given name; see
    /// [`Headers::remove_named`].
    pub fn remove_header(&mut self, name: &str, from_top: bool) -> Option<Header> {
        self.headers_mut().remove_named(name, from_top)
    }

    /// Returns the identifier of the transaction this message belongs
    /// to. See [`Request::transaction_id`].
    pub fn transaction_id(&self) -> String {
        transaction_id(self.headers())
    }

    /// Chooses the layout used for list-capable headers on encode.
    pub fn set_list_layout(&mut self, layout: ListLayout) {
        match self {
            SipMessage::Request(req) => req.list_layout = layout,
            SipMessage::Response(res) => res.list_layout = layout,
        }
    }

    /// The canonical byte-exact wire encoding, body included verbatim.
    pub fn to_bytes(&self) -> Bytes {
        match self {
            SipMessage::Request(req) => req.to_bytes(),
            SipMessage::Response(res) => res.to_bytes(),
        }
    }
}

impl fmt::Display for SipMessage {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SipMessage::Request(req) => write!(f, "{req}"),
            SipMessage::Response(res) => write!(f, "{res}"),
        }
    }
}

impl From<Request> for SipMessage {
    fn from(value: Request) -> Self {
        SipMessage::Request(value)
    }
}

impl From<Response> for SipMessage {
    fn from(value: Response) -> Self {
        SipMessage::Response(value)
    }
}

/// Represents a SIP Request-Line.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct RequestLine {
    /// The SIP method associated with the request.
    pub method: SipMethod,
    /// The Request-URI indicating the target of the request.
    pub uri: Uri,
}

impl RequestLine {
    /// Creates a new `RequestLine` from a [`SipMethod`] and a [`Uri`].
    pub fn new(method: SipMethod, uri: Uri) -> Self {
        Self { method, uri }
    }
}

impl fmt::Display for RequestLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} {} {SIPV2}\r\n", self.method, self.uri)
    }
}

crate::macros::structured!(RequestLine, "request-line" { method, uri });

/// Represents a SIP Status-Line.
#[derive(Debug, PartialEq, Eq, Clone)]
pub struct StatusLine {
    /// The SIP status code associated with the response.
    pub code: StatusCode,
    /// The reason phrase explaining the status code.
    pub reason: ArcStr,
}

impl StatusLine {
    /// Creates a new `StatusLine` from a code and a reason phrase.
    pub fn new(code: impl Into<StatusCode>, reason: &str) -> Self {
        StatusLine {
            code: code.into(),
            reason: reason.into(),
        }
    }

    /// Creates a `StatusLine` with the code's canonical reason phrase.
    pub fn from_code(code: StatusCode) -> Self {
        StatusLine {
            code,
            reason: code.reason_phrase().into(),
        }
    }
}

impl fmt::Display for StatusLine {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{SIPV2} {} {}\r\n", self.code, self.reason)
    }
}

crate::macros::structured!(StatusLine, "status-line" { code, reason });

/// A parsed SIP request.
#[derive(Debug, PartialEq, Clone)]
pub struct Request {
    /// The Request-Line of the message.
    pub req_line: RequestLine,
    /// All headers present in the message.
    pub headers: Headers,
    /// The body of the message, if present.
    pub body: Option<Bytes>,
    list_layout: ListLayout,
}

impl Request {
    /// Creates a new SIP `Request` with a `Content-Length: 0` header
    /// and no body.
    ///
    /// # Examples
    ///
    /// ```
    /// use sipmsg::message::{Request, RequestLine, SipMethod};
    ///
    /// let request = Request::new(RequestLine::new(
    ///     SipMethod::Options,
    ///     "sip:localhost".parse().unwrap(),
    /// ));
    ///
    /// assert_eq!(request.method(), &SipMethod::Options);
    /// ```
    pub fn new(req_line: RequestLine) -> Self {
        let mut headers = Headers::new();
        headers.push(Header::ContentLength(ContentLength::new(0)));
        Request {
            req_line,
            headers,
            body: None,
            list_layout: ListLayout::default(),
        }
    }

    /// Creates a new `Request` with the given headers.
    pub fn with_headers(req_line: RequestLine, headers: Headers) -> Self {
        Self {
            req_line,
            headers,
            body: None,
            list_layout: ListLayout::default(),
        }
    }

    /// Returns the SIP method of the request.
    pub fn method(&self) -> &SipMethod {
        &self.req_line.method
    }

    /// Returns the identifier of the transaction this request belongs
    /// to.
    ///
    /// When the top Via carries an RFC 3261 (magic-cookie prefixed)
    /// branch, the identifier is that branch value lower-cased;
    /// otherwise it is a hash computed over the From, To, Call-ID,
    /// CSeq and top Via sent-by, for interoperability with pre-3261
    /// peers.
    pub fn transaction_id(&self) -> String {
        transaction_id(&self.headers)
    }

    /// Chooses the layout used for list-capable headers on encode.
    pub fn set_list_layout(&mut self, layout: ListLayout) {
        self.list_layout = layout;
    }

    /// The canonical byte-exact wire encoding.
    pub fn to_bytes(&self) -> Bytes {
        let mut out = self.req_line.to_string();
        encode_headers(&self.headers, self.list_layout, body_len(&self.body), &mut out);
        let mut bytes = out.into_bytes();
        if let Some(body) = &self.body {
            bytes.extend_from_slice(body);
        }
        Bytes::from(bytes)
    }
}

impl fmt::Display for Request {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.req_line)?;
        let mut headers = String::new();
        encode_headers(&self.headers, self.list_layout, body_len(&self.body), &mut headers);
        f.write_str(&headers)?;
        if let Some(body) = &self.body {
            f.write_str(&String::from_utf8_lossy(body))?;
        }
        Ok(())
    }
}

/// A parsed SIP response.
#[derive(Debug, PartialEq, Clone)]
pub struct Response {
    /// The Status-Line of the message.
    pub status_line: StatusLine,
    /// All headers present in the message.
    pub headers: Headers,
    /// The body of the message, if present.
    pub body: Option<Bytes>,
    list_layout: ListLayout,
}

impl Response {
    /// Creates a new SIP `Response` with a `Content-Length: 0` header
    /// and no body.
    pub fn new(status_line: StatusLine) -> Self {
        let mut headers = Headers::new();
        headers.push(Header::ContentLength(ContentLength::new(0)));
        Self {
            status_line,
            headers,
            body: None,
            list_layout: ListLayout::default(),
        }
    }

    /// Creates a new `Response` with the given headers.
    pub fn with_headers(status_line: StatusLine, headers: Headers) -> Self {
        Self {
            status_line,
            headers,
            body: None,
            list_layout: ListLayout::default(),
        }
    }

    /// Returns the response status code.
    pub fn code(&self) -> StatusCode {
        self.status_line.code
    }

    /// Returns the reason phrase.
    pub fn reason(&self) -> &str {
        &self.status_line.reason
    }

    /// Returns the identifier of the transaction this response
    /// belongs to. See [`Request::transaction_id`].
    pub fn transaction_id(&self) -> String {
        transaction_id(&self.headers)
    }

    /// Chooses the layout used for list-capable headers on encode.
    pub fn set_list_layout(&mut self, layout: ListLayout) {
        self.list_layout = layout;
    }

    /// The canonical byte-exact wire encoding.
    pub fn to_bytes(&self) -> Bytes {
        let mut out = self.status_line.to_string();
        encode_headers(&self.headers, self.list_layout, body_len(&self.body), &mut out);
        let mut bytes = out.into_bytes();
        if let Some(body) = &self.body {
            bytes.extend_from_slice(body);
        }
        Bytes::from(bytes)
    }
}

impl fmt::Display for Response {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.status_line)?;
        let mut headers = String::new();
        encode_headers(&self.headers, self.list_layout, body_len(&self.body), &mut headers);
        f.write_str(&headers)?;
        if let Some(body) = &self.body {
            f.write_str(&String::from_utf8_lossy(body))?;
        }
        Ok(())
    }
}

fn body_len(body: &Option<Bytes>) -> usize {
    body.as_ref().map(|b| b.len()).unwrap_or(0)
}

/// Writes every header except Content-Length in insertion order, then
/// an accurate Content-Length, then the blank separator line.
fn encode_headers(headers: &Headers, layout: ListLayout, body_len: usize, out: &mut String) {
    use std::fmt::Write;

    let mut i = 0;
    let items: Vec<&Header> = headers.iter().collect();
    while i < items.len() {
        let hdr = items[i];
        if matches!(hdr, Header::ContentLength(_)) {
            i += 1;
            continue;
        }

        let key = canonical_key(hdr.name());
        if layout == ListLayout::CommaJoined && is_list_capable(&key) {
            // Join the consecutive run of same-name headers.
            let mut bodies = vec![hdr.encode_body()];
            let mut j = i + 1;
            while j < items.len() && canonical_key(items[j].name()) == key {
                bodies.push(items[j].encode_body());
                j += 1;
            }
            let _ = write!(out, "{}: {}\r\n", hdr.name(), bodies.join(", "));
            i = j;
        } else {
            let _ = write!(out, "{hdr}\r\n");
            i += 1;
        }
    }

    // Exactly one Content-Length, rendered last, right before the
    // blank line; always accurate with respect to the body.
    let _ = write!(out, "Content-Length: {body_len}\r\n\r\n");
}

/// RFC 3261 senders put the transaction identifier in the top Via
/// branch; for older peers it is a computed hash over the
/// dialog-identifying headers.
fn transaction_id(headers: &Headers) -> String {
    let top_via = headers.find_map(|h| match h {
        Header::Via(via) => Some(via),
        _ => None,
    });

    if let Some(branch) = top_via.and_then(|via| via.cookie_branch()) {
        return branch;
    }

    let mut hasher = DefaultHasher::new();
    if let Some(Header::From(from)) = headers.get_named("From") {
        from.addr().uri_ref().user_host_port().hash(&mut hasher);
        from.tag().unwrap_or("").hash(&mut hasher);
    }
    if let Some(Header::To(to)) = headers.get_named("To") {
        to.addr().uri_ref().user_host_port().hash(&mut hasher);
    }
    if let Some(Header::CallId(call_id)) = headers.get_named("Call-ID") {
        call_id.id().hash(&mut hasher);
    }
    if let Some(Header::CSeq(cseq)) = headers.get_named("CSeq") {
        cseq.cseq().hash(&mut hasher);
        cseq.method().as_str().hash(&mut hasher);
    }
    if let Some(via) = top_via {
        via.sent_by().to_string().hash(&mut hasher);
    }

    format!("{:x}", hasher.finish())
}

macro_rules! message_structured {
    ($ty:ident, $label:literal, $line_field:ident) => {
        impl Structured for $ty {
            fn type_label(&self) -> &'static str {
                $label
            }

            fn as_any(&self) -> &dyn std::any::Any {
                self
            }

            // A template message matches when its start line matches
            // and every one of its headers is matched by some header
            // of the same name in `self`.
            fn matches_dyn(&self, template: &dyn Structured) -> bool {
                let Some(template) = template.as_any().downcast_ref::<$ty>() else {
                    return false;
                };
                if !self.$line_field.matches_dyn(&template.$line_field) {
                    return false;
                }
                template.headers.iter().all(|t| {
                    self.headers
                        .get_named_all(&canonical_key(t.name()))
                        .any(|h| h.matches_dyn(t))
                })
            }

            fn merge_dyn(&mut self, other: &dyn Structured) -> Result<()> {
                let Some(other) = other.as_any().downcast_ref::<$ty>() else {
                    return Err(crate::Error::TypeMismatch {
                        expected: $label,
                        found: other.type_label(),
                    });
                };
                self.$line_field.merge_dyn(&other.$line_field)?;
                for hdr in other.headers.iter() {
                    self.headers.attach(hdr.clone(), true, false);
                }
                if other.body.is_some() {
                    self.body = other.body.clone();
                }
                Ok(())
            }

            fn assign_from(&mut self, other: &dyn Structured) -> bool {
                match other.as_any().downcast_ref::<$ty>() {
                    Some(other) => {
                        *self = other.clone();
                        true
                    }
                    None => false,
                }
            }

            fn children(&self) -> Vec<(&'static str, &dyn Structured)> {
                let mut out: Vec<(&'static str, &dyn Structured)> =
                    vec![(stringify!($line_field), &self.$line_field)];
                out.extend(self.headers.iter().map(|h| ("header", h as &dyn Structured)));
                out
            }

            fn children_mut(&mut self) -> Vec<(&'static str, &mut dyn Structured)> {
                let mut out: Vec<(&'static str, &mut dyn Structured)> =
                    vec![(stringify!($line_field), &mut self.$line_field)];
                out.extend(
                    self.headers
                        .iter_mut()
                        .map(|h| ("header", h as &mut dyn Structured)),
                );
                out
            }

            fn scalar_fields(&self) -> Vec<(&'static str, String)> {
                Vec::new()
            }
        }
    };
}

message_structured!(Request, "request", req_line);
message_structured!(Response, "response", status_line);

#[cfg(test)]
mod tests {
    use super::*;
    use crate::headers::{CallId, MaxForwards, Via};
    use crate::headers::HeaderParse;

    fn invite_request() -> Request {
        let uri = "sip:bob@biloxi.com".parse().unwrap();
        Request::new(RequestLine::new(SipMethod::Invite, uri))
    }

    #[test]
    fn test_new_request_has_content_length_zero() {
        let request = invite_request();
        let encoded = request.to_bytes();
        let text = String::from_utf8(encoded.to_vec()).unwrap();

        assert_eq!(text.matches("Content-Length").count(), 1);
        assert!(text.ends_with("Content-Length: 0\r\n\r\n"));
    }

    #[test]
    fn test_content_length_rendered_last() {
        let mut request = invite_request();
        request
            .headers
            .attach(Header::MaxForwards(MaxForwards::new(70)), false, false);
        request
            .headers
            .attach(Header::CallId(CallId::new("abc@host")), false, false);

        let text = String::from_utf8(request.to_bytes().to_vec()).unwrap();
        let clen_pos = text.find("Content-Length").unwrap();
        assert!(clen_pos > text.find("Max-Forwards").unwrap());
        assert!(clen_pos > text.find("Call-ID").unwrap());
    }

    #[test]
    fn test_transaction_id_uses_cookie_branch() {
        let mut request = invite_request();
        let via = Via::from_bytes(b"SIP/2.0/UDP 129.6.55.181:5060;branch=z9hG4bK776sgdkse").unwrap();
        request.headers.attach(Header::Via(via), false, false);

        assert_eq!(request.transaction_id(), "z9hg4bk776sgdkse");
    }

    #[test]
    fn test_transaction_id_legacy_fallback_is_stable() {
        let mut request = invite_request();
        let via = Via::from_bytes(b"SIP/2.0/UDP host.example.com:5060;branch=oldstyle").unwrap();
        request.headers.attach(Header::Via(via), false, false);

        let id1 = request.transaction_id();
        let id2 = request.transaction_id();
        assert_eq!(id1, id2);
        assert_ne!(id1, "oldstyle");
    }

    #[test]
    fn test_comma_joined_layout() {
        let mut request = invite_request();
        let via1 = Via::from_bytes(b"SIP/2.0/UDP h1.example.com;branch=z9hG4bK1").unwrap();
        let via2 = Via::from_bytes(b"SIP/2.0/UDP h2.example.com;branch=z9hG4bK2").unwrap();
        request.headers.attach(Header::Via(via1), false, false);
        request.headers.attach(Header::Via(via2), false, false);

        request.set_list_layout(ListLayout::CommaJoined);
        let text = String::from_utf8(request.to_bytes().to_vec()).unwrap();

        assert!(text.contains(
            "Via: SIP/2.0/UDP h1.example.com;branch=z9hG4bK1, SIP/2.0/UDP h2.example.com;branch=z9hG4bK2\r\n"
        ));
    }
}
