use sipmsg::headers::{Attached, ContentLength, Header};
use sipmsg::message::{ListLayout, Request, RequestLine, SipMethod};
use sipmsg::parser::{Parser, ParserConfig};
use sipmsg::{filter_map_header, find_map_header};

const INVITE: &str = concat!(
    "INVITE sip:bob@biloxi.example.com SIP/2.0\r\n",
    "Via: SIP/2.0/TCP client.atlanta.example.com:5060;branch=z9hG4bK74b43\r\n",
    "Max-Forwards: 70\r\n",
    "Route: <sip:ss1.atlanta.example.com;lr>\r\n",
    "From: Alice <sip:alice@atlanta.example.com>;tag=9fxced76sl\r\n",
    "To: Bob <sip:bob@biloxi.example.com>\r\n",
    "Call-ID: 3848276298220188511@atlanta.example.com\r\n",
    "CSeq: 1 INVITE\r\n",
    "Contact: <sip:alice@client.atlanta.example.com;transport=tcp>\r\n",
    "Content-Type: application/sdp\r\n",
    "Content-Length: 151\r\n",
    "\r\n",
    "v=0\r\n",
    "o=alice 2890844526 2890844526 IN IP4 client.atlanta.example.com\r\n",
    "s=-\r\n",
    "c=IN IP4 192.0.2.101\r\n",
    "t=0 0\r\n",
    "m=audio 49172 RTP/AVP 0\r\n",
    "a=rtpmap:0 PCMU/8000\r\n"
);

#[test]
fn test_parse_request() {
    let msg = Parser::parse_sip_msg(INVITE).unwrap();
    let req = msg.as_request().unwrap();

    assert_eq!(req.req_line.method, SipMethod::Invite);
    assert_eq!(req.req_line.uri.to_string(), "sip:bob@biloxi.example.com");

    let via = find_map_header!(req.headers, Via).unwrap();
    assert_eq!(via.sent_by().to_string(), "client.atlanta.example.com:5060");
    assert_eq!(via.branch(), Some("z9hG4bK74b43"));

    let max_forwards = find_map_header!(req.headers, MaxForwards).unwrap();
    assert_eq!(max_forwards.max_forwards(), 70);

    let route = find_map_header!(req.headers, Route).unwrap();
    assert_eq!(route.addr.uri_ref().to_string(), "sip:ss1.atlanta.example.com;lr");

    let from = find_map_header!(req.headers, From).unwrap();
    assert_eq!(from.display(), Some("Alice"));
    assert_eq!(from.tag(), Some("9fxced76sl"));

    let to = find_map_header!(req.headers, To).unwrap();
    assert_eq!(to.display(), Some("Bob"));
    assert_eq!(to.addr().uri_ref().to_string(), "sip:bob@biloxi.example.com");

    let call_id = find_map_header!(req.headers, CallId).unwrap();
    assert_eq!(call_id.id(), "3848276298220188511@atlanta.example.com");

    let cseq = find_map_header!(req.headers, CSeq).unwrap();
    assert_eq!(cseq.cseq, 1);
    assert_eq!(cseq.method, SipMethod::Invite);

    let content_type = find_map_header!(req.headers, ContentType).unwrap();
    assert_eq!(content_type.media_type().to_string(), "application/sdp");

    let content_length = find_map_header!(req.headers, ContentLength).unwrap();
    assert_eq!(content_length.clen(), 151);

    assert_eq!(
        req.body.as_deref().unwrap(),
        concat!(
            "v=0\r\n",
            "o=alice 2890844526 2890844526 IN IP4 client.atlanta.example.com\r\n",
            "s=-\r\n",
            "c=IN IP4 192.0.2.101\r\n",
            "t=0 0\r\n",
            "m=audio 49172 RTP/AVP 0\r\n",
            "a=rtpmap:0 PCMU/8000\r\n"
        )
        .as_bytes()
    );
}

#[test]
fn test_parsed_sdp_body() {
    let msg = Parser::parse_sip_msg(INVITE).unwrap();
    let sdp = msg.sdp_body().unwrap().unwrap();

    assert_eq!(sdp.origin.username, "alice");
    assert_eq!(sdp.media.len(), 1);
    assert_eq!(sdp.media[0].port, 49172);
}

#[test]
fn test_canonical_encoding_is_idempotent() {
    let msg = Parser::parse_sip_msg(INVITE).unwrap();
    let first = msg.to_bytes();

    let reparsed = Parser::parse_sip_msg(&first[..]).unwrap();
    let second = reparsed.to_bytes();

    assert_eq!(first, second);
}

#[test]
fn test_parse_response_without_body() {
    let buf = concat!(
        "SIP/2.0 200 OK\r\n",
        "Via: SIP/2.0/UDP pc33.atlanta.com;branch=z9hG4bK776asdhds\r\n",
        "To: Bob <sip:bob@example.com>;tag=a6c85cf\r\n",
        "From: Alice <sip:alice@example.com>;tag=1928301774\r\n",
        "Call-ID: a84b4c76e66710\r\n",
        "CSeq: 314159 INVITE\r\n",
        "Content-Length: 0\r\n\r\n"
    );

    let msg = Parser::parse_sip_msg(buf).unwrap();
    let resp = msg.as_response().unwrap();

    assert_eq!(resp.code().as_u16(), 200);
    assert_eq!(resp.reason(), "OK");
    assert!(resp.body.is_none());

    let to = find_map_header!(resp.headers, To).unwrap();
    assert_eq!(to.tag(), Some("a6c85cf"));
}

#[test]
fn test_multiple_via_headers() {
    let buf = concat!(
        "REGISTER sip:registrar.example.com SIP/2.0\r\n",
        "Via: SIP/2.0/UDP host1.example.com;branch=z9hG4bK111\r\n",
        "Via: SIP/2.0/UDP host2.example.com;branch=z9hG4bK222\r\n",
        "Via: SIP/2.0/UDP host3.example.com;branch=z9hG4bK333\r\n",
        "Max-Forwards: 70\r\n",
        "To: <sip:alice@example.com>\r\n",
        "From: <sip:alice@example.com>;tag=1928301774\r\n",
        "Call-ID: manyvias@atlanta.com\r\n",
        "CSeq: 42 REGISTER\r\n",
        "Content-Length: 0\r\n\r\n"
    );

    let msg = Parser::parse_sip_msg(buf).unwrap();
    let req = msg.as_request().unwrap();

    let vias: Vec<_> = filter_map_header!(req.headers, Via).collect();
    assert_eq!(vias.len(), 3);
    assert_eq!(vias[0].branch(), Some("z9hG4bK111"));
    assert_eq!(vias[1].branch(), Some("z9hG4bK222"));
    assert_eq!(vias[2].branch(), Some("z9hG4bK333"));
}

#[test]
fn test_comma_separated_contacts_respect_quoting() {
    let buf = concat!(
        "REGISTER sip:registrar.example.com SIP/2.0\r\n",
        "Via: SIP/2.0/UDP host.example.com;branch=z9hG4bKabc\r\n",
        "Max-Forwards: 70\r\n",
        "To: <sip:alice@example.com>\r\n",
        "From: <sip:alice@example.com>;tag=88sja8x\r\n",
        "Call-ID: commas@atlanta.com\r\n",
        "CSeq: 1 REGISTER\r\n",
        "Contact: <sip:a@b>;q=0.5, \"Smith, John\" <sip:c@d>;q=0.8\r\n",
        "Content-Length: 0\r\n\r\n"
    );

    let msg = Parser::parse_sip_msg(buf).unwrap();
    let req = msg.as_request().unwrap();

    let contacts: Vec<_> = filter_map_header!(req.headers, Contact).collect();
    assert_eq!(contacts.len(), 2);

    assert_eq!(contacts[0].addr().unwrap().uri_ref().to_string(), "sip:a@b");
    assert_eq!(contacts[0].q(), Some(sipmsg::Q(0, 5)));

    // The comma inside the quoted display name is not a separator.
    assert_eq!(contacts[1].addr().unwrap().display(), Some("Smith, John"));
    assert_eq!(contacts[1].q(), Some(sipmsg::Q(0, 8)));
}

#[test]
fn test_folded_header_value() {
    let folded = concat!(
        "OPTIONS sip:bob@example.com SIP/2.0\r\n",
        "Via: SIP/2.0/UDP host.example.com;branch=z9hG4bKf\r\n",
        "Max-Forwards: 70\r\n",
        "To: <sip:bob@example.com>\r\n",
        "From: <sip:alice@atlanta.com>;tag=777\r\n",
        "Call-ID: folded@atlanta.com\r\n",
        "CSeq: 100 OPTIONS\r\n",
        "Contact: <sip:alice@atlanta.com>;\r\n",
        " param1=value1;\r\n",
        " param2=value2\r\n",
        "Content-Length: 0\r\n\r\n"
    );

    let msg = Parser::parse_sip_msg(folded).unwrap();
    let req = msg.as_request().unwrap();

    let contact = find_map_header!(req.headers, Contact).unwrap();
    let params = contact.params().unwrap();
    assert_eq!(params.get_value("param1"), Some("value1"));
    assert_eq!(params.get_value("param2"), Some("value2"));
}

#[test]
fn test_unknown_header_round_trips_verbatim() {
    let buf = concat!(
        "OPTIONS sip:bob@example.com SIP/2.0\r\n",
        "X-Custom-Tracking: zone=7; mode=experimental\r\n",
        "Max-Forwards: 70\r\n",
        "Content-Length: 0\r\n\r\n"
    );

    let msg = Parser::parse_sip_msg(buf).unwrap();
    let raw = msg.get_header("X-Custom-Tracking").unwrap();
    assert_eq!(raw.encode_body(), "zone=7; mode=experimental");

    let encoded = String::from_utf8(msg.to_bytes().to_vec()).unwrap();
    assert!(encoded.contains("X-Custom-Tracking: zone=7; mode=experimental\r\n"));
}

#[test]
fn test_missing_content_length_is_defaulted() {
    let buf = concat!(
        "OPTIONS sip:bob@example.com SIP/2.0\r\n",
        "Max-Forwards: 70\r\n",
        "\r\n"
    );

    let msg = Parser::parse_sip_msg(buf).unwrap();
    let clen = msg.get_header("Content-Length").unwrap();
    assert_eq!(clen.encode_body(), "0");

    let encoded = String::from_utf8(msg.to_bytes().to_vec()).unwrap();
    assert_eq!(encoded.matches("Content-Length").count(), 1);
    assert!(encoded.ends_with("Content-Length: 0\r\n\r\n"));
}

#[test]
fn test_duplicate_singleton_keeps_first() {
    let buf = concat!(
        "OPTIONS sip:bob@example.com SIP/2.0\r\n",
        "Max-Forwards: 70\r\n",
        "Expires: 60\r\n",
        "Expires: 120\r\n",
        "Content-Length: 0\r\n\r\n"
    );

    let msg = Parser::parse_sip_msg(buf).unwrap();
    let req = msg.as_request().unwrap();

    let expires: Vec<_> = filter_map_header!(req.headers, Expires).collect();
    assert_eq!(expires.len(), 1);
    assert_eq!(expires[0].seconds(), 60);
}

#[test_log::test]
fn test_lenient_mode_demotes_bad_optional_header() {
    let buf = concat!(
        "OPTIONS sip:bob@example.com SIP/2.0\r\n",
        "Max-Forwards: 70\r\n",
        "Expires: never\r\n",
        "Content-Length: 0\r\n\r\n"
    );

    // Strict parsing fails on the unparsable recognized header.
    assert!(Parser::parse_sip_msg(buf).is_err());

    // Lenient parsing demotes it to a raw passthrough header.
    let msg = Parser::with_config(buf, ParserConfig { lenient: true })
        .parse()
        .unwrap();
    let raw = msg.get_header("Expires").unwrap();
    assert!(matches!(raw, Header::Raw(_)));
    assert_eq!(raw.encode_body(), "never");
}

#[test]
fn test_malformed_mandatory_header_always_fails() {
    let buf = concat!(
        "OPTIONS sip:bob@example.com SIP/2.0\r\n",
        "CSeq: -1 INVITE\r\n",
        "Content-Length: 0\r\n\r\n"
    );

    assert!(Parser::parse_sip_msg(buf).is_err());
    let config = ParserConfig { lenient: true };
    assert!(Parser::with_config(buf, config).parse().is_err());
}

#[test]
fn test_transaction_id_from_header_fragment() {
    let fragment = concat!(
        "Via: SIP/2.0/UDP 129.6.55.181:5060;branch=z9hG4bK776sgdkse\r\n",
        "Max-Forwards: 70\r\n"
    );

    let headers = Parser::new(fragment).parse_headers_block().unwrap();
    let request = Request::with_headers(
        RequestLine::new(SipMethod::Options, "sip:bob@example.com".parse().unwrap()),
        headers,
    );

    assert_eq!(request.transaction_id(), "z9hg4bk776sgdkse");
}

#[test]
fn test_attach_header_replace_and_singleton() {
    let mut msg = Parser::parse_sip_msg(INVITE).unwrap();

    let outcome = msg.attach_header(Header::ContentLength(ContentLength::new(99)), false, false);
    assert_eq!(outcome, Attached::KeptExisting);

    let outcome = msg.attach_header(Header::ContentLength(ContentLength::new(99)), true, false);
    assert_eq!(outcome, Attached::Replaced);
}

#[test]
fn test_comma_joined_encode_layout() {
    let buf = concat!(
        "REGISTER sip:registrar.example.com SIP/2.0\r\n",
        "Via: SIP/2.0/UDP h1.example.com;branch=z9hG4bK1\r\n",
        "Via: SIP/2.0/UDP h2.example.com;branch=z9hG4bK2\r\n",
        "Max-Forwards: 70\r\n",
        "Content-Length: 0\r\n\r\n"
    );

    let mut msg = Parser::parse_sip_msg(buf).unwrap();
    msg.set_list_layout(ListLayout::CommaJoined);

    let encoded = String::from_utf8(msg.to_bytes().to_vec()).unwrap();
    assert!(encoded.contains(
        "Via: SIP/2.0/UDP h1.example.com;branch=z9hG4bK1, SIP/2.0/UDP h2.example.com;branch=z9hG4bK2\r\n"
    ));

    // The joined layout parses back to the same two entries.
    let reparsed = Parser::parse_sip_msg(encoded.as_str()).unwrap();
    let vias: Vec<_> = filter_map_header!(reparsed.as_request().unwrap().headers, Via).collect();
    assert_eq!(vias.len(), 2);
}

#[test]
fn test_parse_header_by_name() {
    let header = sipmsg::parse_header("CSeq", "314159 INVITE").unwrap();
    assert_eq!(header.encode_body(), "314159 INVITE");

    let header = sipmsg::parse_header("i", "abc@host").unwrap();
    assert_eq!(header.name(), "Call-ID");

    let headers = sipmsg::parse_header_values("Contact", "<sip:a@b>;q=0.5, <sip:c@d>;q=0.8").unwrap();
    assert_eq!(headers.len(), 2);
    assert_eq!(headers[0].encode_body(), "<sip:a@b>;q=0.5");
    assert_eq!(headers[1].encode_body(), "<sip:c@d>;q=0.8");

    assert!(sipmsg::parse_header("CSeq", "-1 INVITE").is_err());
}
