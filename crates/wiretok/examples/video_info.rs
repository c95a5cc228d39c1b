//! Pulls a video description out of a chunked HTTP response as it arrives.
//!
//! The response is delivered in irregular fragments, the way a socket would
//! hand it over. Every fragment is appended to one growing receive buffer and
//! the whole buffer is fed to the HTTP tokenizer, which resumes where it
//! stopped. Chunk-data tokens are copied into a body buffer as they appear,
//! and the JSON tokenizer follows the body the same way. Once the document is
//! complete its fields are looked up by key, without building a tree.
//!
//! Run with
//!
//! ```bash
//! cargo run -p wiretok --example video_info
//! ```

#![allow(clippy::needless_raw_string_hashes)]

use wiretok::{
    HttpParser, HttpToken, JsonFields, JsonParser, JsonToken, JsonTokenKind, extract, extract_str,
};

fn main() {
    // In real life this would come from the network.
    let simulated_stream: [&[u8]; 8] = [
        b"HTTP/1.1 200 OK\r\nContent-Ty",
        b"pe: application/json\r\nTransfer-Encoding: chunked\r\nX-Cache: HIT\r\n\r\n",
        b"23\r\n{\"type\": \"video\", \"title\": \"Sin",
        b"tel\"\r\n",
        b"28\r\n, \"regions\": [\"US\", \"CA\"], \"length\": 888",
        b"\r\n2\r\n}\n",
        b"\r\n0\r\n",
        b"\r\n",
    ];

    let mut http_storage = [HttpToken::EMPTY; 32];
    let mut http = HttpParser::new(&mut http_storage);
    let mut json_storage = [JsonToken::EMPTY; 32];
    let mut json = JsonParser::new(&mut json_storage);

    let mut received = Vec::new();
    let mut body = Vec::new();

    for fragment in simulated_stream {
        received.extend_from_slice(fragment);

        let status = match http.feed(&received) {
            Ok(status) => status,
            Err(error) => {
                eprintln!("bad response at byte {}: {error}", http.position());
                return;
            }
        };

        let tokens = http.tokens();
        for token in &tokens[tokens.len() - status.written()..] {
            if token.kind.is_body() {
                body.extend_from_slice(extract(token, &received).unwrap_or_default());
            } else if token.kind.is_header() {
                println!("{}: {}", token.kind, extract(token, &received).unwrap_or_default());
            }
        }

        match json.feed(&body) {
            Ok(_) => println!(
                "received {:>3} bytes, body {:>3} bytes, {} JSON tokens, depth {}",
                received.len(),
                body.len(),
                json.tokens().len(),
                json.depth(),
            ),
            Err(error) => {
                eprintln!("bad document at byte {}: {error}", json.position());
                return;
            }
        }

        if status.is_complete() {
            break;
        }
    }

    if let Err(error) = json.finish(&body) {
        eprintln!("document ended early: {error}");
        return;
    }

    let fields = JsonFields::new(json.tokens());
    let text = |key: &str| {
        let index = fields.object_get(0, key.as_bytes(), &body)?;
        extract_str(&json.tokens()[index], &body)
    };

    if text("type") != Some("video") {
        eprintln!("not a video");
        return;
    }
    println!("title:  {}", text("title").unwrap_or("<untitled>"));
    println!("length: {}s", text("length").unwrap_or("?"));

    if let Some(regions) = fields.object_get(0, b"regions", &body) {
        let regions: Vec<_> = fields
            .elements(regions)
            .filter(|&i| json.tokens()[i].kind == JsonTokenKind::String)
            .filter_map(|i| extract_str(&json.tokens()[i], &body))
            .collect();
        println!("regions: {}", regions.join(", "));
    }
}
