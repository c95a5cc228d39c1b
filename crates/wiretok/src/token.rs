use core::ops::Range;

use bstr::BStr;

/// A span of the logical input, identified by byte offsets.
///
/// Implemented by [`HttpToken`](crate::HttpToken) and
/// [`JsonToken`](crate::JsonToken).
pub trait Token {
    /// Offset of the first byte.
    fn start(&self) -> u64;

    /// Offset one past the last byte, or `None` while the token is still open.
    fn end(&self) -> Option<u64>;

    /// The byte range of a finished token.
    ///
    /// Empty ranges are legal (an empty JSON string has `start == end`).
    fn span(&self) -> Option<Range<usize>> {
        let start = usize::try_from(self.start()).ok()?;
        let end = usize::try_from(self.end()?).ok()?;
        (start <= end).then_some(start..end)
    }
}

/// Slices the text of `token` out of `input` in O(1).
///
/// Returns `None` for a container whose closing delimiter has not been seen
/// yet, or when the token does not lie inside `input`.
#[must_use]
pub fn extract<'b, T>(token: &T, input: &'b [u8]) -> Option<&'b BStr>
where
    T: Token + ?Sized,
{
    input.get(token.span()?).map(BStr::new)
}

/// Like [`extract`], but only succeeds if the span is valid UTF-8.
#[must_use]
pub fn extract_str<'b, T>(token: &T, input: &'b [u8]) -> Option<&'b str>
where
    T: Token + ?Sized,
{
    let bytes: &'b [u8] = extract(token, input)?;
    core::str::from_utf8(bytes).ok()
}
