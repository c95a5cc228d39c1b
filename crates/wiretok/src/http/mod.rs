//! HTTP/1.1 response tokenizer.
//!
//! Parses `Status-Line`, allow-listed headers and the message body of a
//! response (RFC 2616 §6, §4.5, §6.2, §7.1, §3.6.1) into [`HttpToken`]s.
//!
//! The parser moves through `StatusLine → Headers → Body → Done`. Each call
//! to [`HttpParser::feed`] gets the whole response received so far and
//! resumes at the first element it has not finished. An element cut by the
//! end of input (a header line, a chunk-size line, chunk-data, a
//! Content-Length body) is not tokenized until it is complete, so token
//! offsets always index into the buffer the caller keeps appending to.
//!
//! ```rust
//! use wiretok::{HttpParser, HttpToken, HttpTokenKind, Status, extract};
//!
//! let response = b"HTTP/1.1 200 OK\r\nTransfer-Encoding: chunked\r\n\r\n4\r\nWiki\r\n0\r\n\r\n";
//! let mut storage = [HttpToken::EMPTY; 8];
//! let mut parser = HttpParser::new(&mut storage);
//!
//! assert_eq!(parser.feed(response), Ok(Status::Complete { written: 5 }));
//! let kinds: Vec<_> = parser.tokens().iter().map(|t| t.kind).collect();
//! assert_eq!(
//!     kinds,
//!     [
//!         HttpTokenKind::Version,
//!         HttpTokenKind::StatusCode,
//!         HttpTokenKind::TransferEncoding,
//!         HttpTokenKind::ChunkSize,
//!         HttpTokenKind::ChunkData,
//!     ]
//! );
//! assert_eq!(extract(&parser.tokens()[4], response).unwrap(), "Wiki");
//! ```

mod error;
mod header;


use bstr::ByteSlice;

pub use self::{error::HttpError, header::HttpTokenKind};
use crate::{HttpOptions, Status, cursor::Cursor, token::Token};

const HTTP_1_1: &[u8] = b"HTTP/1.1";
const SP: &[u8] = b" ";
const CRLF: &[u8] = b"\r\n";

/// One span of an HTTP response.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct HttpToken {
    /// What the span holds.
    pub kind: HttpTokenKind,
    /// Offset of the first byte in the response.
    pub start: u64,
    /// Offset one past the last byte; always greater than `start`.
    pub end: u64,
}

impl HttpToken {
    /// Placeholder used to initialise token storage.
    pub const EMPTY: HttpToken = HttpToken {
        kind: HttpTokenKind::Version,
        start: 0,
        end: 0,
    };

    /// Number of bytes the token spans.
    #[must_use]
    pub fn len(&self) -> u64 {
        self.end - self.start
    }

    /// Whether the token spans no bytes.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.end == self.start
    }
}

impl Token for HttpToken {
    fn start(&self) -> u64 {
        self.start
    }

    fn end(&self) -> Option<u64> {
        Some(self.end)
    }
}

/// How the message body is delimited, known once the headers are parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum BodyKind {
    /// 1xx, 204 and 304 responses, or `Content-Length: 0`.
    Empty,
    /// Exactly this many octets follow the headers.
    ContentLength(u64),
    /// `Transfer-Encoding: chunked`.
    Chunked,
    /// Neither header present: the body ends when the connection closes.
    CloseDelimited,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Phase {
    StatusLine,
    Headers,
    Body(BodyPhase),
    Done,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum BodyPhase {
    ContentLength(u64),
    ChunkSize,
    ChunkData { size: u64 },
    CloseDelimited,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Step {
    Advanced,
    NeedMore,
}

/// Parser state as it stood before a call, restored when the call fails.
#[derive(Debug, Clone, Copy)]
struct Checkpoint {
    len: usize,
    phase: Phase,
    position: usize,
    status_code: Option<u16>,
    content_length: Option<u64>,
    chunked: bool,
    body_kind: Option<BodyKind>,
}

/// Resumable HTTP/1.1 response tokenizer writing into caller-owned storage.
#[derive(Debug)]
pub struct HttpParser<'t> {
    tokens: &'t mut [HttpToken],
    len: usize,
    options: HttpOptions,
    phase: Phase,
    /// Bytes of the response fully tokenized so far.
    position: usize,
    status_code: Option<u16>,
    content_length: Option<u64>,
    chunked: bool,
    body_kind: Option<BodyKind>,
    error: Option<HttpError>,
}

impl<'t> HttpParser<'t> {
    /// Creates a parser that appends tokens to `tokens`.
    ///
    /// The capacity of `tokens` bounds the number of tokens a response may
    /// produce; running out is reported as [`HttpError::OutOfTokens`].
    pub fn new(tokens: &'t mut [HttpToken]) -> Self {
        Self::with_options(tokens, HttpOptions::default())
    }

    /// Like [`new`](Self::new), with non-default [`HttpOptions`].
    pub fn with_options(tokens: &'t mut [HttpToken], options: HttpOptions) -> Self {
        Self {
            tokens,
            len: 0,
            options,
            phase: Phase::StatusLine,
            position: 0,
            status_code: None,
            content_length: None,
            chunked: false,
            body_kind: None,
            error: None,
        }
    }

    /// Forgets the current message, its tokens and any sticky error.
    pub fn reset(&mut self) {
        let options = self.options;
        let tokens = core::mem::take(&mut self.tokens);
        *self = Self::with_options(tokens, options);
    }

    /// Tokens emitted so far, in input order.
    #[must_use]
    pub fn tokens(&self) -> &[HttpToken] {
        &self.tokens[..self.len]
    }

    /// The numeric Status-Code, once the status line has been parsed.
    #[must_use]
    pub fn status_code(&self) -> Option<u16> {
        self.status_code
    }

    /// The value of a `Content-Length` header, if one was seen.
    #[must_use]
    pub fn content_length(&self) -> Option<u64> {
        self.content_length
    }

    /// How the body is framed, once the headers have been parsed.
    #[must_use]
    pub fn body_kind(&self) -> Option<BodyKind> {
        self.body_kind
    }

    /// The sticky error, if a previous call failed.
    #[must_use]
    pub fn error(&self) -> Option<&HttpError> {
        self.error.as_ref()
    }

    /// Number of leading bytes of the response that have been consumed.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Whether the whole message has been tokenized.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.phase == Phase::Done
    }

    /// Tokenizes as much of `input` as possible.
    ///
    /// `input` must be the whole response received so far: the previous
    /// input with any new bytes appended. On error the parser is left as it
    /// was before the call, apart from the sticky error, and stops
    /// advancing.
    ///
    /// # Errors
    ///
    /// Returns the first [`HttpError`] found, or the sticky error of an
    /// earlier call.
    pub fn feed(&mut self, input: &[u8]) -> Result<Status, HttpError> {
        self.transact(input, |parser| parser.advance(input))
    }

    /// Marks the end of the connection.
    ///
    /// A close-delimited body becomes a single `Content` token spanning
    /// everything after the headers. Any other unfinished message is an
    /// error.
    ///
    /// # Errors
    ///
    /// [`HttpError::UnexpectedEndOfInput`] if the message is not finished,
    /// or any error `feed` would report for `input`.
    pub fn finish(&mut self, input: &[u8]) -> Result<Status, HttpError> {
        self.transact(input, |parser| {
            if !parser.advance(input)? {
                if parser.phase != Phase::Body(BodyPhase::CloseDelimited) {
                    return Err(HttpError::UnexpectedEndOfInput);
                }
                if input.len() > parser.position {
                    parser.push(HttpTokenKind::Content, parser.position, input.len())?;
                }
                parser.position = input.len();
                parser.phase = Phase::Done;
            }
            Ok(true)
        })
    }

    fn transact<F>(&mut self, input: &[u8], run: F) -> Result<Status, HttpError>
    where
        F: FnOnce(&mut Self) -> Result<bool, HttpError>,
    {
        if let Some(error) = &self.error {
            return Err(error.clone());
        }

        let checkpoint = self.checkpoint();
        let result = if input.len() < self.position {
            Err(HttpError::BufferShrank {
                consumed: self.position,
                len: input.len(),
            })
        } else {
            run(self)
        };

        match result {
            Ok(complete) => {
                let written = self.len - checkpoint.len;
                Ok(if complete {
                    Status::Complete { written }
                } else {
                    Status::Partial { written }
                })
            }
            Err(error) => {
                tracing::debug!(%error, position = self.position, "http parse failed");
                self.rewind(checkpoint);
                self.error = Some(error.clone());
                Err(error)
            }
        }
    }

    fn checkpoint(&self) -> Checkpoint {
        Checkpoint {
            len: self.len,
            phase: self.phase,
            position: self.position,
            status_code: self.status_code,
            content_length: self.content_length,
            chunked: self.chunked,
            body_kind: self.body_kind,
        }
    }

    fn rewind(&mut self, checkpoint: Checkpoint) {
        let Checkpoint {
            len,
            phase,
            position,
            status_code,
            content_length,
            chunked,
            body_kind,
        } = checkpoint;
        self.len = len;
        self.phase = phase;
        self.position = position;
        self.status_code = status_code;
        self.content_length = content_length;
        self.chunked = chunked;
        self.body_kind = body_kind;
    }

    /// Runs phases until one needs more input. Returns whether the message
    /// is finished.
    fn advance(&mut self, input: &[u8]) -> Result<bool, HttpError> {
        loop {
            let step = match self.phase {
                Phase::StatusLine => self.status_line(input)?,
                Phase::Headers => self.header_line(input)?,
                Phase::Body(BodyPhase::ContentLength(length)) => self.content(input, length)?,
                Phase::Body(BodyPhase::ChunkSize) => self.chunk_size(input)?,
                Phase::Body(BodyPhase::ChunkData { size }) => self.chunk_data(input, size)?,
                Phase::Body(BodyPhase::CloseDelimited) => Step::NeedMore,
                Phase::Done => return Ok(true),
            };
            if step == Step::NeedMore {
                return Ok(false);
            }
        }
    }

    fn push(&mut self, kind: HttpTokenKind, start: usize, end: usize) -> Result<(), HttpError> {
        let Some(slot) = self.tokens.get_mut(self.len) else {
            return Err(HttpError::OutOfTokens {
                capacity: self.tokens.len(),
            });
        };
        let (start, end) = (start as u64, end as u64);
        tracing::trace!(%kind, start, end, "http token");
        *slot = HttpToken { kind, start, end };
        self.len += 1;
        Ok(())
    }

    /// `HTTP-Version SP Status-Code SP Reason-Phrase CRLF`
    fn status_line(&mut self, input: &[u8]) -> Result<Step, HttpError> {
        let cursor = Cursor::at(input, self.position);
        let Some(line) = cursor.extract_until(CRLF) else {
            check_version_prefix(cursor.remaining())?;
            return Ok(Step::NeedMore);
        };
        let base = cursor.position();

        let mut fields = Cursor::new(line);
        let version = match fields.consume_through(SP) {
            Some(version) => version,
            None => fields.consume_while(|_| true),
        };
        check_version(version)?;

        let code_start = fields.position();
        let code = match fields.consume_through(SP) {
            Some(code) => code,
            None => fields.consume_while(|_| true),
        };
        if code.len() != 3 {
            return Err(HttpError::StatusCodeInvalid);
        }
        let status_code = parse_status_code(code)?;

        if fields.at_end() && !self.options.allow_empty_reason_phrase {
            return Err(HttpError::ReasonPhraseEmpty);
        }

        self.push(HttpTokenKind::Version, base, base + version.len())?;
        self.push(
            HttpTokenKind::StatusCode,
            base + code_start,
            base + code_start + code.len(),
        )?;
        tracing::debug!(status_code, "http status line parsed");

        self.status_code = Some(status_code);
        self.position = base + line.len() + CRLF.len();
        self.phase = Phase::Headers;
        Ok(Step::Advanced)
    }

    /// `field-name ":" [ field-value ] CRLF`, or the bare CRLF ending the
    /// headers.
    fn header_line(&mut self, input: &[u8]) -> Result<Step, HttpError> {
        let cursor = Cursor::at(input, self.position);
        let Some(line) = cursor.extract_until(CRLF) else {
            return Ok(Step::NeedMore);
        };
        let base = cursor.position();
        let next = base + line.len() + CRLF.len();

        if line.is_empty() {
            self.position = next;
            self.enter_body();
            return Ok(Step::Advanced);
        }

        let Some(name) = Cursor::new(line).extract_until(b":") else {
            return Err(HttpError::HeaderColonMissing);
        };
        if name.is_empty() {
            return Err(HttpError::HeaderNameMissing);
        }

        let Some(kind) = HttpTokenKind::from_header_name(name) else {
            tracing::trace!(name = ?name.as_bstr(), "skipping header");
            self.position = next;
            return Ok(Step::Advanced);
        };

        let raw = &line[name.len() + 1..];
        let value = raw.trim_ascii();
        if value.is_empty() {
            return Err(HttpError::HeaderValueEmpty(kind));
        }

        match kind {
            HttpTokenKind::TransferEncoding => {
                if !value.eq_ignore_ascii_case(b"chunked") {
                    return Err(HttpError::UnsupportedTransferEncoding);
                }
                self.chunked = true;
            }
            HttpTokenKind::ContentLength => {
                let length = parse_decimal(value).ok_or(HttpError::ContentLengthInvalid)?;
                if self.content_length.is_some_and(|seen| seen != length) {
                    return Err(HttpError::ContentLengthInvalid);
                }
                self.content_length = Some(length);
            }
            _ => {}
        }

        let start = base + name.len() + 1 + (raw.len() - raw.trim_ascii_start().len());
        self.push(kind, start, start + value.len())?;
        self.position = next;
        Ok(Step::Advanced)
    }

    fn enter_body(&mut self) {
        let status = self.status_code.unwrap_or_default();
        let body = if (100..200).contains(&status) || status == 204 || status == 304 {
            BodyKind::Empty
        } else if self.chunked {
            // RFC 2616 §4.4: Content-Length is ignored with a transfer-coding
            BodyKind::Chunked
        } else {
            match self.content_length {
                Some(0) => BodyKind::Empty,
                Some(length) => BodyKind::ContentLength(length),
                None => BodyKind::CloseDelimited,
            }
        };
        tracing::debug!(?body, "http headers parsed");

        self.body_kind = Some(body);
        self.phase = match body {
            BodyKind::Empty => Phase::Done,
            BodyKind::ContentLength(length) => Phase::Body(BodyPhase::ContentLength(length)),
            BodyKind::Chunked => Phase::Body(BodyPhase::ChunkSize),
            BodyKind::CloseDelimited => Phase::Body(BodyPhase::CloseDelimited),
        };
    }

    fn content(&mut self, input: &[u8], length: u64) -> Result<Step, HttpError> {
        let length = usize::try_from(length).map_err(|_| HttpError::ContentLengthInvalid)?;
        let start = self.position;
        if input.len() - start < length {
            return Ok(Step::NeedMore);
        }

        self.push(HttpTokenKind::Content, start, start + length)?;
        self.position = start + length;
        self.phase = Phase::Done;
        Ok(Step::Advanced)
    }

    /// `chunk-size [ chunk-extension ] CRLF`
    fn chunk_size(&mut self, input: &[u8]) -> Result<Step, HttpError> {
        let cursor = Cursor::at(input, self.position);
        let Some(line) = cursor.extract_until(CRLF) else {
            if cursor.peek().is_some_and(|b| !b.is_ascii_hexdigit()) {
                return Err(HttpError::ChunkSizeInvalid);
            }
            return Ok(Step::NeedMore);
        };
        let base = cursor.position();

        let digits = Cursor::new(line).extract_while(|b| b.is_ascii_hexdigit());
        let rest = &line[digits.len()..];
        if !(rest.is_empty() || rest.trim_ascii_start().starts_with(b";") || rest.trim_ascii().is_empty())
        {
            return Err(HttpError::ChunkSizeInvalid);
        }
        let size = parse_hex(digits).ok_or(HttpError::ChunkSizeInvalid)?;

        self.position = base + line.len() + CRLF.len();
        if size == 0 {
            tracing::debug!("http last-chunk parsed");
            self.phase = Phase::Done;
        } else {
            self.push(HttpTokenKind::ChunkSize, base, base + digits.len())?;
            self.phase = Phase::Body(BodyPhase::ChunkData { size });
        }
        Ok(Step::Advanced)
    }

    /// `chunk-data CRLF`
    fn chunk_data(&mut self, input: &[u8], size: u64) -> Result<Step, HttpError> {
        let size = usize::try_from(size).map_err(|_| HttpError::ChunkSizeInvalid)?;
        let cursor = Cursor::at(input, self.position);
        let start = cursor.position();

        let Some(terminator) = cursor.remaining().get(size..) else {
            return Ok(Step::NeedMore);
        };
        if !CRLF.starts_with(terminator.get(..CRLF.len()).unwrap_or(terminator)) {
            return Err(HttpError::ChunkDataMalformed);
        }
        if terminator.len() < CRLF.len() {
            return Ok(Step::NeedMore);
        }

        self.push(HttpTokenKind::ChunkData, start, start + size)?;
        self.position = start + size + CRLF.len();
        self.phase = Phase::Body(BodyPhase::ChunkSize);
        Ok(Step::Advanced)
    }
}

/// Checks `HTTP-Version` for length first, then for value.
fn check_version(version: &[u8]) -> Result<(), HttpError> {
    if version.len() != HTTP_1_1.len() {
        return Err(HttpError::VersionInvalid);
    }
    if version != HTTP_1_1 {
        return Err(HttpError::VersionNotHttp11);
    }
    Ok(())
}

/// Rejects an unterminated status line once its version error is certain,
/// whatever bytes arrive next: the field is delimited by SP, or is already
/// longer than `HTTP/1.1`.
fn check_version_prefix(seen: &[u8]) -> Result<(), HttpError> {
    if let Some(at) = seen.find(SP) {
        return check_version(&seen[..at]);
    }
    // A trailing CR may start the CRLF ending the line.
    let known = seen.strip_suffix(&b"\r"[..]).unwrap_or(seen);
    if known.len() > HTTP_1_1.len() {
        return Err(HttpError::VersionInvalid);
    }
    Ok(())
}

fn parse_status_code(code: &[u8]) -> Result<u16, HttpError> {
    if !code.iter().all(u8::is_ascii_digit) {
        return Err(HttpError::StatusCodeNotNumeric);
    }
    let value = code
        .iter()
        .fold(0u16, |acc, b| acc * 10 + u16::from(b - b'0'));
    if value < 100 {
        return Err(HttpError::StatusCodeOutOfRange(value));
    }
    Ok(value)
}

fn parse_decimal(digits: &[u8]) -> Option<u64> {
    if digits.is_empty() {
        return None;
    }
    digits.iter().try_fold(0u64, |acc, &b| {
        let digit = char::from(b).to_digit(10)?;
        acc.checked_mul(10)?.checked_add(u64::from(digit))
    })
}

fn parse_hex(digits: &[u8]) -> Option<u64> {
    if digits.is_empty() {
        return None;
    }
    digits.iter().try_fold(0u64, |acc, &b| {
        let digit = char::from(b).to_digit(16)?;
        acc.checked_mul(16)?.checked_add(u64::from(digit))
    })
}
