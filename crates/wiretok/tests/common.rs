#![allow(missing_docs)]
#![allow(dead_code)]

use std::fmt::Write;

use wiretok::{HttpToken, JsonToken, extract};

pub const VIDEO: &str = r#"{"type": "video", "title": "Big Buck Bunny", "duration": 596.5, "hd": true, "sources": [{"codec": "h264", "url": "https://cdn.example.net/bbb.mp4"}, {"codec": "vp9", "url": null}]}"#;

/// Serializes a chunked `200 OK` response carrying `body`, split into chunks
/// of the given sizes. Whatever the sizes leave over goes into one more chunk.
pub fn chunked_response(body: &[u8], sizes: &[usize]) -> Vec<u8> {
    let mut out = b"HTTP/1.1 200 OK\r\n\
Content-Type: application/json\r\n\
X-Request-Id: 9c1d\r\n\
Transfer-Encoding: chunked\r\n\
\r\n"
        .to_vec();

    let mut rest = body;
    for &size in sizes {
        let (chunk, tail) = rest.split_at(size.min(rest.len()));
        if chunk.is_empty() {
            break;
        }
        write_chunk(&mut out, chunk);
        rest = tail;
    }
    if !rest.is_empty() {
        write_chunk(&mut out, rest);
    }
    out.extend_from_slice(b"0\r\n\r\n");
    out
}

fn write_chunk(out: &mut Vec<u8>, chunk: &[u8]) {
    out.extend_from_slice(format!("{:x}\r\n", chunk.len()).as_bytes());
    out.extend_from_slice(chunk);
    out.extend_from_slice(b"\r\n");
}

/// Splits `payload` into pieces of the given sizes, cycling through them.
pub fn fragments(payload: &[u8], sizes: &[usize]) -> Vec<Vec<u8>> {
    assert!(sizes.iter().all(|&size| size > 0));
    let mut out = Vec::new();
    let mut rest = payload;
    for &size in sizes.iter().cycle() {
        if rest.is_empty() {
            break;
        }
        let (piece, tail) = rest.split_at(size.min(rest.len()));
        out.push(piece.to_vec());
        rest = tail;
    }
    out
}

/// One line per token: kind, offsets and text.
pub fn render_http(tokens: &[HttpToken], input: &[u8]) -> String {
    let mut out = String::new();
    for token in tokens {
        let text = extract(token, input).unwrap_or_default();
        writeln!(out, "{} {}..{} {text:?}", token.kind, token.start, token.end).unwrap();
    }
    out
}

/// One line per token. Containers show their offsets only.
pub fn render_json(tokens: &[JsonToken], input: &[u8]) -> String {
    let mut out = String::new();
    for token in tokens {
        let end = token.end.map(|end| end.to_string()).unwrap_or_default();
        write!(out, "{} {}..{end}", token.kind, token.start).unwrap();
        if !token.kind.is_container() {
            if let Some(text) = extract(token, input) {
                write!(out, " {text:?}").unwrap();
            }
        }
        out.push('\n');
    }
    out
}
