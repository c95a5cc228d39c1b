#![expect(missing_docs)]

mod common;

use std::fmt::Write;

use wiretok::{HttpParser, HttpToken, JsonParser, JsonToken};

use crate::common::{render_http, render_json};

#[test]
fn snapshot_content_length_response() {
    let response = b"HTTP/1.1 404 Not Found\r\n\
Content-Type: text/plain\r\n\
X-Trace: abc\r\n\
Content-Length: 9\r\n\
\r\n\
not found";
    let mut storage = [HttpToken::EMPTY; 8];
    let mut parser = HttpParser::new(&mut storage);
    assert!(parser.feed(response).unwrap().is_complete());

    insta::assert_snapshot!(render_http(parser.tokens(), response), @r#"
    HTTP-Version 0..8 "HTTP/1.1"
    Status-Code 9..12 "404"
    Content-Type 38..48 "text/plain"
    Content-Length 80..81 "9"
    message-body 85..94 "not found"
    "#);
}

#[test]
fn snapshot_chunked_response() {
    let response = b"HTTP/1.1 200 OK\r\n\
Transfer-Encoding: chunked\r\n\
\r\n\
5;ext=1\r\n\
hello\r\n\
6\r\n \
world\r\n\
0\r\n\
\r\n";
    let mut storage = [HttpToken::EMPTY; 8];
    let mut parser = HttpParser::new(&mut storage);
    assert!(parser.feed(response).unwrap().is_complete());

    insta::assert_snapshot!(render_http(parser.tokens(), response), @r#"
    HTTP-Version 0..8 "HTTP/1.1"
    Status-Code 9..12 "200"
    Transfer-Encoding 36..43 "chunked"
    chunk-size 47..48 "5"
    chunk-data 56..61 "hello"
    chunk-size 63..64 "6"
    chunk-data 66..72 " world"
    "#);
}

#[test]
fn snapshot_json_document() {
    let input = br#"{"id": 7, "tags": ["a", null], "ok": true}"#;
    let mut storage = [JsonToken::EMPTY; 16];
    let mut parser = JsonParser::new(&mut storage);
    assert!(parser.feed(input).unwrap().is_complete());

    insta::assert_snapshot!(render_json(parser.tokens(), input), @r#"
    object 0..42
    string 2..4 "id"
    number 7..8 "7"
    string 11..15 "tags"
    array 18..29
    string 20..21 "a"
    null 24..28 "null"
    string 32..34 "ok"
    true 37..41 "true"
    "#);
}

#[test]
fn snapshot_json_statuses_while_streaming() {
    let input = br#"{"id": 7, "tags": ["a", null], "ok": true}"#;
    let mut storage = [JsonToken::EMPTY; 16];
    let mut parser = JsonParser::new(&mut storage);

    let mut out = String::new();
    for cut in [5, 12, 20, 30, input.len()] {
        let status = parser.feed(&input[..cut]).unwrap();
        writeln!(out, "{cut}: {status:?} position={} depth={}", parser.position(), parser.depth())
            .unwrap();
    }

    insta::assert_snapshot!(out, @r"
    5: Partial { written: 2 } position=5 depth=1
    12: Partial { written: 1 } position=10 depth=1
    20: Partial { written: 2 } position=19 depth=2
    30: Partial { written: 2 } position=30 depth=1
    42: Complete { written: 2 } position=42 depth=0
    ");
}

#[test]
fn snapshot_open_containers_mid_stream() {
    let input = br#"{"a": [1, {"b": "#;
    let mut storage = [JsonToken::EMPTY; 16];
    let mut parser = JsonParser::new(&mut storage);
    assert!(parser.feed(input).unwrap().is_partial());

    insta::assert_snapshot!(render_json(parser.tokens(), input), @r#"
    object 0..
    string 2..3 "a"
    array 6..
    number 7..8 "1"
    object 10..
    string 12..13 "b"
    "#);
}
