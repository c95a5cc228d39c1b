/// Outcome of one successful `feed` call.
///
/// Both variants carry the number of tokens the call appended to storage.
/// `Partial` is not an error: the parser keeps its tokens and phase, and the
/// caller feeds the same buffer again once more bytes have been appended.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum Status {
    /// The message (or value) is finished.
    Complete {
        /// Tokens appended by this call.
        written: usize,
    },
    /// More input is needed.
    Partial {
        /// Tokens appended by this call.
        written: usize,
    },
}

impl Status {
    /// Tokens appended by the call that returned this status.
    #[must_use]
    pub fn written(self) -> usize {
        match self {
            Status::Complete { written } | Status::Partial { written } => written,
        }
    }

    /// Whether the message or document is finished.
    #[must_use]
    pub fn is_complete(self) -> bool {
        matches!(self, Status::Complete { .. })
    }

    /// Whether more input is needed.
    #[must_use]
    pub fn is_partial(self) -> bool {
        matches!(self, Status::Partial { .. })
    }
}
