use criterion::{black_box, criterion_group, criterion_main, Criterion};
use sipmsg::parser::Parser;

fn bench_parse_sip_msg(c: &mut Criterion) {
    let buf = concat!(
        "INVITE sip:bob@biloxi.example.com SIP/2.0\r\n",
        "Via: SIP/2.0/TCP client.atlanta.example.com:5060;ttl=65;branch=z9hG4bK74bf9\r\n",
        "Max-Forwards: 70\r\n",
        "From: Alice <sip:alice@atlanta.example.com>;tag=9fxced76sl\r\n",
        "To: Bob <sip:bob@biloxi.example.com>\r\n",
        "Call-ID: 3848276298220188511@atlanta.example.com\r\n",
        "CSeq: 2 INVITE\r\n",
        "Contact: <sip:alice@client.atlanta.example.com;transport=tcp>\r\n",
        "Diversion: Carol <sip:carol@atlanta.example.com>;reason=no-answer;counter=1\r\n",
        "P-Asserted-Identity: Alice <sip:alice@atlanta.example.com>\r\n",
        "User-Agent: X-Lite release 1104o stamp 56125\r\n",
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

    c.bench_function("parse invite with sdp", |b| {
        b.iter(|| {
            let msg = Parser::parse_sip_msg(black_box(buf)).unwrap();
            black_box(msg);
        });
    });

    c.bench_function("parse and re-encode", |b| {
        b.iter(|| {
            let msg = Parser::parse_sip_msg(black_box(buf)).unwrap();
            black_box(msg.to_bytes());
        });
    });
}

criterion_group!(benches, bench_parse_sip_msg);
criterion_main!(benches);
