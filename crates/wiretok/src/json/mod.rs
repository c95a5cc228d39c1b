//! JSON tokenizer.
//!
//! A single forward scan that records where every value starts and ends. It
//! does not build a tree, decode escapes or validate numbers: a `Number` token
//! is the maximal run of number characters and a `String` token is the raw,
//! still-escaped content between the quotes.
//!
//! Containers are matched with a fixed-size stack of open token indices, so a
//! `}` arriving in a later call still closes the `{` tokenized earlier. The
//! stack depth is the `DEPTH` const parameter.
//!
//! ```rust
//! use wiretok::{JsonParser, JsonToken, JsonTokenKind, Status, extract};
//!
//! let full = br#"{ "Lorem": "ipsum" }"#;
//! let mut storage = [JsonToken::EMPTY; 8];
//! let mut parser = JsonParser::new(&mut storage);
//!
//! // The string is cut: only the object and the key are emitted.
//! assert_eq!(parser.feed(&full[..13]), Ok(Status::Partial { written: 2 }));
//! assert_eq!(parser.feed(full), Ok(Status::Complete { written: 1 }));
//!
//! let tokens = parser.tokens();
//! assert_eq!(tokens[0].kind, JsonTokenKind::Object);
//! assert_eq!(tokens[0].end, Some(20));
//! assert_eq!(extract(&tokens[2], full).unwrap(), "ipsum");
//! ```

mod error;
mod fields;


use core::fmt;

pub use self::{
    error::JsonError,
    fields::{Elements, JsonFields, Members},
};
use crate::{JsonOptions, Status, cursor::Cursor, token::Token};

/// What a [`JsonToken`] spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum JsonTokenKind {
    /// `{ ... }`, brackets included.
    Object,
    /// `[ ... ]`, brackets included.
    Array,
    /// String content, quotes excluded, escapes left as written.
    String,
    /// Number text as written.
    Number,
    /// The literal `true`.
    True,
    /// The literal `false`.
    False,
    /// The literal `null`.
    Null,
}

impl JsonTokenKind {
    /// Whether the kind is an object or an array.
    #[must_use]
    pub fn is_container(self) -> bool {
        matches!(self, JsonTokenKind::Object | JsonTokenKind::Array)
    }

    /// Lower-case name of the kind.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            JsonTokenKind::Object => "object",
            JsonTokenKind::Array => "array",
            JsonTokenKind::String => "string",
            JsonTokenKind::Number => "number",
            JsonTokenKind::True => "true",
            JsonTokenKind::False => "false",
            JsonTokenKind::Null => "null",
        }
    }
}

impl fmt::Display for JsonTokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

/// One value of a JSON document.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct JsonToken {
    /// What the span holds.
    pub kind: JsonTokenKind,
    /// Offset of the first byte in the document.
    pub start: u64,
    /// `None` while an object or array has not seen its closing bracket.
    pub end: Option<u64>,
}

impl JsonToken {
    /// Placeholder used to initialise token storage.
    pub const EMPTY: JsonToken = JsonToken {
        kind: JsonTokenKind::Null,
        start: 0,
        end: None,
    };

    /// Whether the token's end is known.
    #[must_use]
    pub fn is_closed(&self) -> bool {
        self.end.is_some()
    }
}

impl Token for JsonToken {
    fn start(&self) -> u64 {
        self.start
    }

    fn end(&self) -> Option<u64> {
        self.end
    }
}

/// Where a call to `advance` stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Halt {
    /// Between values.
    Boundary,
    /// Inside a number that may continue.
    Number,
    /// Inside a string or literal.
    Literal,
}

/// Resumable JSON tokenizer writing into caller-owned storage.
///
/// `DEPTH` bounds how many objects and arrays may be open at once.
#[derive(Debug)]
pub struct JsonParser<'t, const DEPTH: usize = 64> {
    tokens: &'t mut [JsonToken],
    len: usize,
    options: JsonOptions,
    stack: [usize; DEPTH],
    depth: usize,
    /// Bytes of the input fully tokenized so far.
    position: usize,
    /// Completed top-level values.
    values: usize,
    complete: bool,
    error: Option<JsonError>,
}

impl<'t> JsonParser<'t> {
    /// Creates a parser with the default nesting limit of 64.
    pub fn new(tokens: &'t mut [JsonToken]) -> Self {
        Self::with_options(tokens, JsonOptions::default())
    }
}

impl<'t, const DEPTH: usize> JsonParser<'t, DEPTH> {
    /// Creates a parser whose nesting limit is the `DEPTH` parameter.
    ///
    /// ```rust
    /// use wiretok::{JsonError, JsonParser, JsonToken};
    ///
    /// let mut storage = [JsonToken::EMPTY; 8];
    /// let mut parser = JsonParser::<2>::with_depth(&mut storage);
    /// assert_eq!(parser.feed(b"[[[]]]"), Err(JsonError::NestingTooDeep { depth: 2 }));
    /// ```
    pub fn with_depth(tokens: &'t mut [JsonToken]) -> Self {
        Self::with_options(tokens, JsonOptions::default())
    }

    /// Like [`with_depth`](Self::with_depth), with non-default [`JsonOptions`].
    pub fn with_options(tokens: &'t mut [JsonToken], options: JsonOptions) -> Self {
        Self {
            tokens,
            len: 0,
            options,
            stack: [0; DEPTH],
            depth: 0,
            position: 0,
            values: 0,
            complete: false,
            error: None,
        }
    }

    /// Forgets the current document, its tokens and any sticky error.
    pub fn reset(&mut self) {
        let options = self.options;
        let tokens = core::mem::take(&mut self.tokens);
        *self = Self::with_options(tokens, options);
    }

    /// Tokens emitted so far, in order of their opening byte.
    ///
    /// Containers that are still open have `end == None`.
    #[must_use]
    pub fn tokens(&self) -> &[JsonToken] {
        &self.tokens[..self.len]
    }

    /// The sticky error, if a call has failed since the last reset.
    #[must_use]
    pub fn error(&self) -> Option<&JsonError> {
        self.error.as_ref()
    }

    /// Number of leading input bytes consumed.
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Number of objects and arrays currently open.
    #[must_use]
    pub fn depth(&self) -> usize {
        self.depth
    }

    /// Number of top-level values tokenized to completion.
    #[must_use]
    pub fn values(&self) -> usize {
        self.values
    }

    /// Whether the last call ended between complete top-level values.
    #[must_use]
    pub fn is_complete(&self) -> bool {
        self.complete
    }

    /// Tokenizes as much of `input` as possible.
    ///
    /// `input` must be the whole document received so far. A string, number
    /// or literal cut by the end of `input` is left for the next call, which
    /// starts again from its first byte.
    ///
    /// # Errors
    ///
    /// Returns the first [`JsonError`] found, or the sticky error of an
    /// earlier call. No token from a failing call is kept, and the container
    /// stack is left as the previous call left it.
    pub fn feed(&mut self, input: &[u8]) -> Result<Status, JsonError> {
        self.transact(input, |parser| parser.advance(input).map(|halt| halt == Halt::Boundary))
    }

    /// Marks the end of the document.
    ///
    /// A number running to the end of `input` is emitted.
    ///
    /// # Errors
    ///
    /// [`JsonError::UnexpectedEndOfInput`] for a cut string or literal, an
    /// open container, or an input without any value; otherwise any error
    /// `feed` would report.
    pub fn finish(&mut self, input: &[u8]) -> Result<Status, JsonError> {
        self.transact(input, |parser| {
            match parser.advance(input)? {
                Halt::Boundary => {}
                Halt::Number => {
                    let start = parser.position;
                    parser.push(JsonTokenKind::Number, start, Some(input.len()))?;
                    parser.position = input.len();
                    parser.value_done();
                }
                Halt::Literal => return Err(JsonError::UnexpectedEndOfInput),
            }
            if parser.depth > 0 || (parser.values == 0 && !parser.options.allow_multiple_values)
            {
                return Err(JsonError::UnexpectedEndOfInput);
            }
            Ok(true)
        })
    }

    fn transact<F>(&mut self, input: &[u8], run: F) -> Result<Status, JsonError>
    where
        F: FnOnce(&mut Self) -> Result<bool, JsonError>,
    {
        if let Some(error) = &self.error {
            return Err(error.clone());
        }

        let before = self.len;
        let resumed_at = self.position;
        let (stack, depth, values) = (self.stack, self.depth, self.values);
        let result = if input.len() < self.position {
            Err(JsonError::BufferShrank {
                consumed: self.position,
                len: input.len(),
            })
        } else {
            run(self)
        };

        match result {
            Ok(at_boundary) => {
                self.complete = at_boundary && self.depth == 0 && self.values > 0;
                let written = self.len - before;
                Ok(if self.complete {
                    Status::Complete { written }
                } else {
                    Status::Partial { written }
                })
            }
            Err(error) => {
                tracing::debug!(%error, position = self.position, "json parse failed");
                self.len = before;
                self.stack = stack;
                self.depth = depth;
                self.values = values;
                // Reopen containers this call closed.
                for token in &mut self.tokens[..before] {
                    if token.end.is_some_and(|end| end > resumed_at as u64) {
                        token.end = None;
                    }
                }
                self.complete = false;
                self.error = Some(error.clone());
                Err(error)
            }
        }
    }

    fn advance(&mut self, input: &[u8]) -> Result<Halt, JsonError> {
        let mut cursor = Cursor::at(input, self.position);
        loop {
            cursor.consume_while(|b| matches!(b, b' ' | b'\t' | b'\r' | b'\n' | b':' | b','));
            self.position = cursor.position();

            let Some(byte) = cursor.peek() else {
                return Ok(Halt::Boundary);
            };
            let start = cursor.position();
            match byte {
                b'{' | b'[' => {
                    self.begin_value()?;
                    let kind = if byte == b'{' {
                        JsonTokenKind::Object
                    } else {
                        JsonTokenKind::Array
                    };
                    self.open(kind, start)?;
                    cursor.advance(1);
                }
                b'}' | b']' => {
                    let kind = if byte == b'}' {
                        JsonTokenKind::Object
                    } else {
                        JsonTokenKind::Array
                    };
                    self.close(kind, start + 1)?;
                    cursor.advance(1);
                }
                b'"' => {
                    self.begin_value()?;
                    let Some(len) = string_len(&cursor.remaining()[1..]) else {
                        return Ok(Halt::Literal);
                    };
                    self.push(JsonTokenKind::String, start + 1, Some(start + 1 + len))?;
                    self.value_done();
                    cursor.advance(len + 2);
                }
                b'n' | b't' | b'f' => {
                    self.begin_value()?;
                    let (kind, word) = match byte {
                        b'n' => (JsonTokenKind::Null, &b"null"[..]),
                        b't' => (JsonTokenKind::True, &b"true"[..]),
                        _ => (JsonTokenKind::False, &b"false"[..]),
                    };
                    match cursor.extract_substring(word.len()) {
                        Some(spelled) if spelled == word => {}
                        Some(_) => return Err(JsonError::InvalidLiteral),
                        None if word.starts_with(cursor.remaining()) => return Ok(Halt::Literal),
                        None => return Err(JsonError::InvalidLiteral),
                    }
                    self.push(kind, start, Some(start + word.len()))?;
                    self.value_done();
                    cursor.advance(word.len());
                }
                b'-' | b'.' | b'0'..=b'9' => {
                    self.begin_value()?;
                    let number = cursor.extract_while(is_number_byte);
                    if number.len() == cursor.remaining_len() {
                        return Ok(Halt::Number);
                    }
                    self.push(JsonTokenKind::Number, start, Some(start + number.len()))?;
                    self.value_done();
                    cursor.advance(number.len());
                }
                other => return Err(JsonError::InvalidCharacter(other)),
            }
            self.position = cursor.position();
        }
    }

    /// Rejects a second top-level value unless several are allowed.
    fn begin_value(&self) -> Result<(), JsonError> {
        if self.depth == 0 && self.values > 0 && !self.options.allow_multiple_values {
            return Err(JsonError::TrailingCharacters);
        }
        Ok(())
    }

    fn value_done(&mut self) {
        if self.depth == 0 {
            self.values += 1;
            tracing::debug!(values = self.values, "json top-level value complete");
        }
    }

    fn push(&mut self, kind: JsonTokenKind, start: usize, end: Option<usize>) -> Result<(), JsonError> {
        let Some(slot) = self.tokens.get_mut(self.len) else {
            return Err(JsonError::OutOfTokens {
                capacity: self.tokens.len(),
            });
        };
        let (start, end) = (start as u64, end.map(|end| end as u64));
        tracing::trace!(%kind, start, ?end, "json token");
        *slot = JsonToken { kind, start, end };
        self.len += 1;
        Ok(())
    }

    fn open(&mut self, kind: JsonTokenKind, start: usize) -> Result<(), JsonError> {
        if self.depth == DEPTH {
            return Err(JsonError::NestingTooDeep { depth: DEPTH });
        }
        self.push(kind, start, None)?;
        self.stack[self.depth] = self.len - 1;
        self.depth += 1;
        Ok(())
    }

    fn close(&mut self, kind: JsonTokenKind, end: usize) -> Result<(), JsonError> {
        let Some(depth) = self.depth.checked_sub(1) else {
            return Err(JsonError::UnbalancedClose);
        };
        let token = &mut self.tokens[self.stack[depth]];
        if token.kind != kind {
            return Err(JsonError::UnbalancedClose);
        }
        token.end = Some(end as u64);
        self.depth = depth;
        self.value_done();
        Ok(())
    }
}

fn is_number_byte(b: u8) -> bool {
    b.is_ascii_digit() || matches!(b, b'+' | b'-' | b'.' | b'e' | b'E')
}

/// Length of string content up to the closing quote, skipping escaped bytes.
fn string_len(content: &[u8]) -> Option<usize> {
    use bstr::ByteSlice;

    let mut at = 0;
    loop {
        let hit = at + content.get(at..)?.find_byteset(b"\"\\")?;
        if content[hit] == b'"' {
            return Some(hit);
        }
        at = hit + 2;
    }
}
