#![no_main]

use arbitrary::Arbitrary;
use libfuzzer_sys::fuzz_target;
use wiretok::{HttpError, HttpOptions, HttpParser, HttpToken, body};

/// Either raw bytes or a well-formed chunked response, received in fragments.
#[derive(Debug, Arbitrary)]
enum Message {
    Raw(Vec<u8>),
    Chunked { body: Vec<u8>, sizes: Vec<u8> },
}

#[derive(Debug, Arbitrary)]
struct Input {
    options: HttpOptions,
    message: Message,
    splits: Vec<u16>,
}

impl Message {
    fn bytes(&self) -> Vec<u8> {
        match self {
            Message::Raw(bytes) => bytes.clone(),
            Message::Chunked { body, sizes } => {
                let mut out = b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n".to_vec();
                let mut rest = body.as_slice();
                for &size in sizes.iter().chain(std::iter::once(&u8::MAX)) {
                    if rest.is_empty() {
                        break;
                    }
                    let (chunk, tail) = rest.split_at(usize::from(size.max(1)).min(rest.len()));
                    out.extend_from_slice(format!("{:X}\r\n", chunk.len()).as_bytes());
                    out.extend_from_slice(chunk);
                    out.extend_from_slice(b"\r\n");
                    rest = tail;
                }
                if !rest.is_empty() {
                    out.extend_from_slice(format!("{:x}\r\n", rest.len()).as_bytes());
                    out.extend_from_slice(rest);
                    out.extend_from_slice(b"\r\n");
                }
                out.extend_from_slice(b"0\r\n\r\n");
                out
            }
        }
    }
}

fn tokenize(
    data: &[u8],
    prefixes: &[usize],
    options: HttpOptions,
    storage: &mut [HttpToken],
) -> Result<usize, HttpError> {
    let mut parser = HttpParser::with_options(storage, options);
    for &end in prefixes {
        parser.feed(&data[..end])?;
    }
    parser.finish(data)?;
    assert!(parser.is_complete());
    for token in parser.tokens() {
        assert!(token.start <= token.end && token.end <= data.len() as u64);
    }
    Ok(parser.tokens().len())
}

fuzz_target!(|input: Input| {
    let data = input.message.bytes();

    let mut prefixes: Vec<usize> = input
        .splits
        .iter()
        .map(|&split| usize::from(split) % (data.len() + 1))
        .collect();
    prefixes.sort_unstable();

    let mut whole_storage = vec![HttpToken::EMPTY; data.len() + 2];
    let mut split_storage = vec![HttpToken::EMPTY; data.len() + 2];
    let whole = tokenize(&data, &[], input.options, &mut whole_storage);
    let split = tokenize(&data, &prefixes, input.options, &mut split_storage);

    assert_eq!(whole.is_ok(), split.is_ok(), "{whole:?} vs {split:?}");
    if let (Ok(len), Ok(_)) = (&whole, &split) {
        assert_eq!(whole_storage[..*len], split_storage[..*len]);
    }

    if let Message::Chunked { body, .. } = &input.message {
        let len = whole.expect("generated chunked response is well formed");
        assert_eq!(body::collect_body(&whole_storage[..len], &data), *body);
    }
});
