use super::{JsonToken, JsonTokenKind};
use crate::token::extract;

/// Navigation over a finished token list.
///
/// Tokens are laid out in document order, so the tokens nested in a
/// container are exactly the ones that follow it and start before its end.
///
/// ```rust
/// use wiretok::{JsonFields, JsonParser, JsonToken, extract};
///
/// let input = br#"{ "title": "Test Video", "allowedRegions": [ "US", "CA" ] }"#;
/// let mut storage = [JsonToken::EMPTY; 16];
/// let mut parser = JsonParser::new(&mut storage);
/// parser.feed(input).unwrap();
///
/// let fields = JsonFields::new(parser.tokens());
/// let title = fields.object_get(0, b"title", input).unwrap();
/// assert_eq!(extract(&parser.tokens()[title], input).unwrap(), "Test Video");
///
/// let regions = fields.object_get(0, b"allowedRegions", input).unwrap();
/// assert_eq!(fields.elements(regions).count(), 2);
/// ```
#[derive(Debug, Clone, Copy)]
pub struct JsonFields<'a> {
    tokens: &'a [JsonToken],
}

impl<'a> JsonFields<'a> {
    /// Wraps tokens from [`JsonParser::tokens`](crate::JsonParser::tokens).
    #[must_use]
    pub fn new(tokens: &'a [JsonToken]) -> Self {
        Self { tokens }
    }

    /// The wrapped tokens.
    #[must_use]
    pub fn tokens(&self) -> &'a [JsonToken] {
        self.tokens
    }

    /// Index of the first token after the value at `index`, skipping
    /// everything nested inside it.
    ///
    /// `None` if `index` is out of range or names a container that is still
    /// open.
    #[must_use]
    pub fn value_end(&self, index: usize) -> Option<usize> {
        let token = self.tokens.get(index)?;
        let end = token.end?;
        let mut next = index + 1;
        if token.kind.is_container() {
            while self.tokens.get(next).is_some_and(|t| t.start < end) {
                next += 1;
            }
        }
        Some(next)
    }

    /// `(key, value)` token index pairs of the object at `object`.
    ///
    /// Empty if `object` is not a closed object.
    #[must_use]
    pub fn members(&self, object: usize) -> Members<'a> {
        Members {
            inner: self.children(object, JsonTokenKind::Object),
        }
    }

    /// Token indices of the elements of the array at `array`.
    ///
    /// Empty if `array` is not a closed array.
    #[must_use]
    pub fn elements(&self, array: usize) -> Elements<'a> {
        self.children(array, JsonTokenKind::Array)
    }

    /// The value of the first member of `object` whose key is `key`.
    ///
    /// Keys are compared byte for byte, escapes included.
    #[must_use]
    pub fn object_get(&self, object: usize, key: &[u8], input: &[u8]) -> Option<usize> {
        self.members(object)
            .find(|&(k, _)| {
                let token = &self.tokens[k];
                token.kind == JsonTokenKind::String
                    && extract(token, input).is_some_and(|name| name == key)
            })
            .map(|(_, value)| value)
    }

    fn children(&self, parent: usize, kind: JsonTokenKind) -> Elements<'a> {
        let end = match self.tokens.get(parent) {
            Some(token) if token.kind == kind => self.value_end(parent),
            _ => None,
        };
        Elements {
            fields: *self,
            next: parent + 1,
            end: end.unwrap_or(0),
        }
    }
}

/// Iterator returned by [`JsonFields::elements`].
#[derive(Debug, Clone)]
pub struct Elements<'a> {
    fields: JsonFields<'a>,
    next: usize,
    end: usize,
}

impl Iterator for Elements<'_> {
    type Item = usize;

    fn next(&mut self) -> Option<usize> {
        if self.next >= self.end {
            return None;
        }
        let index = self.next;
        self.next = self.fields.value_end(index)?;
        Some(index)
    }
}

/// Iterator returned by [`JsonFields::members`].
#[derive(Debug, Clone)]
pub struct Members<'a> {
    inner: Elements<'a>,
}

impl Iterator for Members<'_> {
    type Item = (usize, usize);

    fn next(&mut self) -> Option<(usize, usize)> {
        let key = self.inner.next()?;
        let value = self.inner.next()?;
        Some((key, value))
    }
}
