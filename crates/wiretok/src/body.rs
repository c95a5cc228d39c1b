//! Message-body reassembly from HTTP tokens.
//!
//! A body is the concatenation of every `Content` and `ChunkData` span, in
//! token order. `ChunkSize` tokens are framing and are skipped.

use thiserror::Error;

use crate::{HttpToken, token::extract};

/// Failure to reassemble a body from its tokens.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum BodyError {
    /// The destination cannot hold the whole body.
    #[error("body of {needed} bytes does not fit in {capacity} bytes")]
    BufferTooSmall {
        /// Length of the body.
        needed: usize,
        /// Length of the destination.
        capacity: usize,
    },
    /// A body token points past the end of the input it was cut from.
    #[error("body token lies outside the input")]
    OutOfBounds,
}

fn body_spans<'t, 'b>(
    tokens: &'t [HttpToken],
    input: &'b [u8],
) -> impl Iterator<Item = Option<&'b [u8]>> {
    tokens
        .iter()
        .filter(|token| token.kind.is_body())
        .map(move |token| extract(token, input).map(|span| &**span))
}

/// Total length of the body spans in `tokens`.
#[must_use]
pub fn body_len(tokens: &[HttpToken]) -> u64 {
    tokens
        .iter()
        .filter(|token| token.kind.is_body())
        .map(HttpToken::len)
        .sum()
}

/// Copies the body into `out` and returns its length.
///
/// # Errors
///
/// [`BodyError::BufferTooSmall`] if `out` cannot hold the whole body, in
/// which case nothing is copied; [`BodyError::OutOfBounds`] if a token does not
/// lie inside `input`.
pub fn copy_body(tokens: &[HttpToken], input: &[u8], out: &mut [u8]) -> Result<usize, BodyError> {
    let needed = usize::try_from(body_len(tokens)).map_err(|_| BodyError::OutOfBounds)?;
    if needed > out.len() {
        return Err(BodyError::BufferTooSmall {
            needed,
            capacity: out.len(),
        });
    }

    let mut written = 0;
    for span in body_spans(tokens, input) {
        let span = span.ok_or(BodyError::OutOfBounds)?;
        out[written..written + span.len()].copy_from_slice(span);
        written += span.len();
    }
    Ok(written)
}

/// Collects the body into a new vector.
///
/// Tokens that do not lie inside `input` are skipped.
#[cfg(any(feature = "alloc", test))]
#[must_use]
pub fn collect_body(tokens: &[HttpToken], input: &[u8]) -> alloc::vec::Vec<u8> {
    body_spans(tokens, input).flatten().flatten().copied().collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::{HttpParser, HttpTokenKind};

    const CHUNKED: &[u8] =
        b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n5\r\nhello\r\n1\r\n \r\n5\r\nworld\r\n0\r\n\r\n";

    fn tokens(input: &[u8]) -> alloc::vec::Vec<HttpToken> {
        let mut storage = [HttpToken::EMPTY; 16];
        let mut parser = HttpParser::new(&mut storage);
        assert!(parser.feed(input).unwrap().is_complete());
        parser.tokens().to_vec()
    }

    #[test]
    fn copies_chunks_in_order() {
        let tokens = tokens(CHUNKED);
        let mut out = [0; 16];

        assert_eq!(body_len(&tokens), 11);
        assert_eq!(copy_body(&tokens, CHUNKED, &mut out), Ok(11));
        assert_eq!(&out[..11], b"hello world");
        assert_eq!(collect_body(&tokens, CHUNKED), b"hello world");
    }

    #[test]
    fn rejects_small_buffer_without_copying() {
        let tokens = tokens(CHUNKED);
        let mut out = [0; 10];

        assert_eq!(
            copy_body(&tokens, CHUNKED, &mut out),
            Err(BodyError::BufferTooSmall {
                needed: 11,
                capacity: 10
            })
        );
        assert_eq!(out, [0; 10]);
    }

    #[test]
    fn out_of_range_token() {
        let tokens = [HttpToken {
            kind: HttpTokenKind::Content,
            start: 4,
            end: 40,
        }];
        let mut out = [0; 64];

        assert_eq!(copy_body(&tokens, b"short", &mut out), Err(BodyError::OutOfBounds));
        assert!(collect_body(&tokens, b"short").is_empty());
    }

    #[test]
    fn no_body() {
        let input = b"HTTP/1.1 204 No Content\r\nServer: x\r\n\r\n";
        let tokens = tokens(input);

        assert_eq!(body_len(&tokens), 0);
        assert_eq!(copy_body(&tokens, input, &mut []), Ok(0));
    }
}
