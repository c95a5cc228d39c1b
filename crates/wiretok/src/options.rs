/// Configuration for [`HttpParser`](crate::HttpParser).
///
/// # Examples
///
/// ```rust
/// use wiretok::{HttpOptions, HttpParser, HttpToken};
///
/// let mut storage = [HttpToken::EMPTY; 8];
/// let parser = HttpParser::with_options(
///     &mut storage,
///     HttpOptions {
///         allow_empty_reason_phrase: true,
///     },
/// );
/// # let _ = parser;
/// ```
///
/// # Default
///
/// All options default to `false`.
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "fuzzing", derive(arbitrary::Arbitrary))]
pub struct HttpOptions {
    /// Whether a status line may end right after the status code's SP.
    ///
    /// RFC 2616 permits an empty Reason-Phrase, but servers that send one are
    /// rare and an empty phrase usually means the status line was mangled, so
    /// it is rejected unless this is set.
    ///
    /// # Default
    ///
    /// `false`
    pub allow_empty_reason_phrase: bool,
}

/// Configuration for [`JsonParser`](crate::JsonParser).
///
/// # Default
///
/// All options default to `false`.
#[derive(Debug, Clone, Copy, Default)]
#[cfg_attr(feature = "fuzzing", derive(arbitrary::Arbitrary))]
pub struct JsonOptions {
    /// Whether to tokenize more than one top-level value.
    ///
    /// When `false`, any value that starts after the first top-level value has
    /// closed is reported as [`JsonError::TrailingCharacters`]. When `true`,
    /// whitespace-delimited values such as `{}{}` or `1 2 3` (JSON Lines) are
    /// tokenized one after another.
    ///
    /// [`JsonError::TrailingCharacters`]: crate::JsonError::TrailingCharacters
    ///
    /// # Default
    ///
    /// `false`
    pub allow_multiple_values: bool,
}
