use thiserror::Error;

use super::HttpTokenKind;

/// A terminal HTTP tokenizer error.
///
/// Once returned, the error is sticky: every later `feed` returns it again
/// until the parser is [`reset`](super::HttpParser::reset).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HttpError {
    /// The token storage is full.
    #[error("token storage exhausted ({capacity} tokens)")]
    OutOfTokens {
        /// Length of the token storage.
        capacity: usize,
    },
    /// `HTTP-Version` is not 8 bytes long.
    #[error("HTTP-Version must be 8 bytes")]
    VersionInvalid,
    /// `HTTP-Version` is 8 bytes but not `HTTP/1.1`.
    #[error("expected HTTP/1.1")]
    VersionNotHttp11,
    /// `Status-Code` is not 3 bytes long.
    #[error("Status-Code must be 3 bytes")]
    StatusCodeInvalid,
    /// `Status-Code` contains a non-digit.
    #[error("Status-Code must be a 3-digit integer")]
    StatusCodeNotNumeric,
    /// `Status-Code` is below 100.
    #[error("Status-Code {0} is not between 100 and 999")]
    StatusCodeOutOfRange(u16),
    /// The status line has no `Reason-Phrase`.
    #[error("Reason-Phrase is empty")]
    ReasonPhraseEmpty,
    /// A header line starts with `:`.
    #[error("header field-name is empty")]
    HeaderNameMissing,
    /// A header line has no `:`.
    #[error("header line has no ':'")]
    HeaderColonMissing,
    /// A recognized header has only whitespace after its colon.
    #[error("{0} header has an empty field-value")]
    HeaderValueEmpty(HttpTokenKind),
    /// `Content-Length` is not a decimal integer that fits in a `u64`.
    #[error("Content-Length must be a non-negative decimal integer")]
    ContentLengthInvalid,
    /// `Transfer-Encoding` names a coding other than `chunked`.
    #[error("Transfer-Encoding other than chunked is not supported")]
    UnsupportedTransferEncoding,
    /// A chunk-size line is not a hexadecimal integer.
    #[error("chunk-size must be a hexadecimal integer")]
    ChunkSizeInvalid,
    /// Chunk-data is not followed by CRLF.
    #[error("chunk-data is not terminated by CRLF after chunk-size octets")]
    ChunkDataMalformed,
    /// The input is shorter than what earlier calls consumed.
    #[error("input of {len} bytes is shorter than the {consumed} bytes already consumed")]
    BufferShrank {
        /// Bytes consumed by earlier calls.
        consumed: usize,
        /// Length of the input passed to this call.
        len: usize,
    },
    /// The input ended before the message did.
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
}

impl HttpError {
    /// Whether the status line did not start with `HTTP/1.1`.
    #[must_use]
    pub fn is_version_error(&self) -> bool {
        matches!(self, HttpError::VersionInvalid | HttpError::VersionNotHttp11)
    }
}
