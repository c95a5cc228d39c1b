use alloc::{
    format,
    string::{String, ToString},
    vec::Vec,
};

use quickcheck::{Arbitrary, Gen};
use serde_json::{Map, Number, Value};

/// A JSON document, serialized compactly or pretty-printed.
#[derive(Debug, Clone)]
pub(crate) struct JsonDoc {
    pub value: Value,
    pub pretty: bool,
}

impl JsonDoc {
    pub fn text(&self) -> String {
        if self.pretty {
            serde_json::to_string_pretty(&self.value).unwrap_or_default()
        } else {
            self.value.to_string()
        }
    }
}

fn number(g: &mut Gen) -> Value {
    if bool::arbitrary(g) {
        return Value::Number(Number::from(i64::arbitrary(g)));
    }
    let mut value = f64::arbitrary(g);
    while !value.is_finite() {
        value = f64::arbitrary(g);
    }
    Number::from_f64(value).map_or(Value::Null, Value::Number)
}

fn gen_val(g: &mut Gen, depth: usize) -> Value {
    let choices = if depth == 0 { 4 } else { 6 };
    match usize::arbitrary(g) % choices {
        0 => Value::Null,
        1 => Value::Bool(bool::arbitrary(g)),
        2 => number(g),
        3 => Value::String(String::arbitrary(g)),
        4 => {
            let len = usize::arbitrary(g) % 4;
            Value::Array((0..len).map(|_| gen_val(g, depth - 1)).collect())
        }
        _ => {
            let len = usize::arbitrary(g) % 4;
            let mut map = Map::new();
            for _ in 0..len {
                map.insert(String::arbitrary(g), gen_val(g, depth - 1));
            }
            Value::Object(map)
        }
    }
}

impl Arbitrary for JsonDoc {
    fn arbitrary(g: &mut Gen) -> Self {
        let depth = usize::arbitrary(g) % 4;
        Self {
            value: gen_val(g, depth),
            pretty: bool::arbitrary(g),
        }
    }
}

/// A message body and the chunk sizes used to send it.
#[derive(Debug, Clone)]
pub(crate) struct ChunkedBody {
    pub body: Vec<u8>,
    pub sizes: Vec<usize>,
}

impl ChunkedBody {
    /// Serializes a complete chunked response carrying the body.
    pub fn response(&self) -> Vec<u8> {
        let mut out = b"HTTP/1.1 200 OK\r\nContent-Type: application/octet-stream\r\nTransfer-Encoding: chunked\r\n\r\n".to_vec();
        let mut rest = self.body.as_slice();
        for &size in &self.sizes {
            let (chunk, tail) = rest.split_at(size);
            out.extend_from_slice(format!("{size:x}\r\n").as_bytes());
            out.extend_from_slice(chunk);
            out.extend_from_slice(b"\r\n");
            rest = tail;
        }
        out.extend_from_slice(b"0\r\n\r\n");
        out
    }
}

impl Arbitrary for ChunkedBody {
    fn arbitrary(g: &mut Gen) -> Self {
        // Bodies routinely contain CRLF and hex digits, so bias towards them.
        let body: Vec<u8> = Vec::<u8>::arbitrary(g)
            .into_iter()
            .map(|b| match b % 8 {
                0 => b'\r',
                1 => b'\n',
                2 => b'0',
                _ => b,
            })
            .collect();

        let mut sizes = Vec::new();
        let mut left = body.len();
        while left > 0 {
            let size = 1 + usize::arbitrary(g) % left;
            sizes.push(size);
            left -= size;
        }
        Self { body, sizes }
    }
}
