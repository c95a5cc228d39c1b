//! Resumable, zero-copy tokenizers for an HTTP/1.1 response and the JSON
//! document it carries.
//!
//! Both tokenizers write fixed-size token records into storage owned by the
//! caller and never allocate. Tokens reference the input by byte offset, so
//! the text of a token is recovered with [`extract`] against the same buffer
//! that was fed to the parser.
//!
//! Input is fed as a growing buffer: every call to `feed` receives everything
//! received so far, and the parser resumes where the previous call stopped.
//!
//! ```rust
//! use wiretok::{HttpParser, HttpToken, HttpTokenKind, Status, extract};
//!
//! let response = b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\n{}";
//! let mut storage = [HttpToken::EMPTY; 16];
//! let mut parser = HttpParser::new(&mut storage);
//!
//! assert_eq!(parser.feed(&response[..20]), Ok(Status::Partial { written: 2 }));
//! assert_eq!(parser.feed(response), Ok(Status::Complete { written: 2 }));
//!
//! let body = parser.tokens().last().unwrap();
//! assert_eq!(body.kind, HttpTokenKind::Content);
//! assert_eq!(extract(body, response).unwrap(), "{}");
//! ```

#![no_std]

#[cfg(any(feature = "alloc", test))]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod cursor;
mod options;
mod status;
mod token;

pub mod body;
pub mod http;
pub mod json;

#[cfg(any(feature = "alloc", test))]
mod chunk_utils;

#[cfg(test)]
mod tests;

pub use body::BodyError;
pub use cursor::Cursor;
pub use http::{BodyKind, HttpError, HttpParser, HttpToken, HttpTokenKind};
pub use json::{JsonError, JsonFields, JsonParser, JsonToken, JsonTokenKind};
pub use options::{HttpOptions, JsonOptions};
pub use status::Status;
pub use token::{Token, extract, extract_str};

#[cfg(any(feature = "alloc", test))]
pub use chunk_utils::{produce_chunks, produce_prefixes};
