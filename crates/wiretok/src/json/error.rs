use thiserror::Error;

/// A terminal JSON tokenizer error.
///
/// The byte that caused it is at [`JsonParser::position`](super::JsonParser::position).
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum JsonError {
    /// The token storage is full.
    #[error("token storage exhausted ({capacity} tokens)")]
    OutOfTokens {
        /// Length of the token storage.
        capacity: usize,
    },
    /// Opening one more container would exceed the stack depth.
    #[error("containers nested deeper than {depth}")]
    NestingTooDeep {
        /// Maximum nesting depth of the parser.
        depth: usize,
    },
    /// A `}` or `]` with no matching open container.
    #[error("closing bracket does not match an open container")]
    UnbalancedClose,
    /// A bare word that is not `null`, `true` or `false`.
    #[error("invalid literal, expected null, true or false")]
    InvalidLiteral,
    /// A byte that cannot start or continue a token here.
    #[error("invalid character {:?}", char::from(*.0))]
    InvalidCharacter(u8),
    /// More input after a complete top-level value.
    #[error("unexpected value after the end of the top-level value")]
    TrailingCharacters,
    /// The input is shorter than what earlier calls consumed.
    #[error("input of {len} bytes is shorter than the {consumed} bytes already consumed")]
    BufferShrank {
        /// Bytes consumed by earlier calls.
        consumed: usize,
        /// Length of the input passed to this call.
        len: usize,
    },
    /// The input ended inside a value.
    #[error("unexpected end of input")]
    UnexpectedEndOfInput,
}
