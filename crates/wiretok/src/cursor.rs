//! Read position over an immutable byte slice.
//!
//! Every lookup that can fail returns `Option`: `None` means the delimiter (or
//! the requested number of bytes) is not there, while `Some(b"")` is a match
//! on an empty span. The two are never conflated.

use bstr::ByteSlice;

/// An immutable byte view plus a read position.
///
/// Invariant: `position <= input.len()`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Cursor<'a> {
    input: &'a [u8],
    position: usize,
}

impl<'a> Cursor<'a> {
    /// Creates a cursor at the start of `input`.
    #[must_use]
    pub fn new(input: &'a [u8]) -> Self {
        Self { input, position: 0 }
    }

    /// Creates a cursor at `position`, clamped to the end of `input`.
    #[must_use]
    pub fn at(input: &'a [u8], position: usize) -> Self {
        Self {
            input,
            position: position.min(input.len()),
        }
    }

    /// The underlying buffer.
    /// The whole input, consumed bytes included.
    #[inline]
    #[must_use]
    pub fn input(&self) -> &'a [u8] {
        self.input
    }

    /// Bytes consumed so far.
    #[inline]
    #[must_use]
    pub fn position(&self) -> usize {
        self.position
    }

    /// Whether every byte has been consumed.
    #[inline]
    #[must_use]
    pub fn at_end(&self) -> bool {
        self.position == self.input.len()
    }

    /// Number of bytes left after the cursor.
    #[inline]
    #[must_use]
    pub fn remaining_len(&self) -> usize {
        self.input.len() - self.position
    }

    /// Bytes from the current position to the end.
    #[inline]
    #[must_use]
    pub fn remaining(&self) -> &'a [u8] {
        &self.input[self.position..]
    }

    /// The byte under the cursor.
    #[inline]
    #[must_use]
    pub fn peek(&self) -> Option<u8> {
        self.input.get(self.position).copied()
    }

    /// Moves forward by `n` bytes, stopping at the end of input.
    #[inline]
    pub fn advance(&mut self, n: usize) {
        self.position = self.position.saturating_add(n).min(self.input.len());
    }

    /// Whether the remaining bytes begin with `pattern`. An empty pattern
    /// always matches.
    #[must_use]
    pub fn peek_starts_with(&self, pattern: &[u8]) -> bool {
        self.remaining().starts_with(pattern)
    }

    /// The span between the cursor and the first `delimiter`, without moving.
    #[must_use]
    pub fn extract_until(&self, delimiter: &[u8]) -> Option<&'a [u8]> {
        let rest = self.remaining();
        rest.find(delimiter).map(|at| &rest[..at])
    }

    /// Like [`Cursor::extract_until`], then moves onto the delimiter.
    pub fn consume_until(&mut self, delimiter: &[u8]) -> Option<&'a [u8]> {
        let span = self.extract_until(delimiter)?;
        self.position += span.len();
        Some(span)
    }

    /// Like [`Cursor::extract_until`], then moves past the delimiter.
    pub fn consume_through(&mut self, delimiter: &[u8]) -> Option<&'a [u8]> {
        let span = self.extract_until(delimiter)?;
        self.position += span.len() + delimiter.len();
        Some(span)
    }

    /// Exactly `n` bytes at the cursor, without moving.
    #[must_use]
    pub fn extract_substring(&self, n: usize) -> Option<&'a [u8]> {
        self.remaining().get(..n)
    }

    /// The longest run of bytes matching `pred`, without moving.
    #[must_use]
    pub fn extract_while<F>(&self, mut pred: F) -> &'a [u8]
    where
        F: FnMut(u8) -> bool,
    {
        let rest = self.remaining();
        let len = rest.iter().position(|&b| !pred(b)).unwrap_or(rest.len());
        &rest[..len]
    }

    /// Like [`Cursor::extract_while`], then moves past the run.
    pub fn consume_while<F>(&mut self, pred: F) -> &'a [u8]
    where
        F: FnMut(u8) -> bool,
    {
        let span = self.extract_while(pred);
        self.position += span.len();
        span
    }
}
