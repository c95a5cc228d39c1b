use core::fmt;

/// What an [`HttpToken`](super::HttpToken) spans.
///
/// Header kinds are the allow-list of RFC 2616 general (§4.5), response
/// (§6.2) and entity (§7.1) header fields, plus `Server`. A header kind token
/// spans the trimmed field-value only.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub enum HttpTokenKind {
    /// `HTTP-Version` of the status line.
    Version,
    /// The 3-digit `Status-Code` of the status line.
    StatusCode,

    /// `Cache-Control` field-value.
    CacheControl,
    /// `Connection` field-value.
    Connection,
    /// `Date` field-value.
    Date,
    /// `Pragma` field-value.
    Pragma,
    /// `Trailer` field-value.
    Trailer,
    /// `Transfer-Encoding` field-value.
    TransferEncoding,
    /// `Upgrade` field-value.
    Upgrade,
    /// `Via` field-value.
    Via,
    /// `Warning` field-value.
    Warning,

    /// `Accept-Ranges` field-value.
    AcceptRanges,
    /// `Age` field-value.
    Age,
    /// `ETag` field-value.
    ETag,
    /// `Location` field-value.
    Location,
    /// `Proxy-Authenticate` field-value.
    ProxyAuthenticate,

    /// `Allow` field-value.
    Allow,
    /// `Content-Encoding` field-value.
    ContentEncoding,
    /// `Content-Language` field-value.
    ContentLanguage,
    /// `Content-Length` field-value.
    ContentLength,
    /// `Content-Location` field-value.
    ContentLocation,
    /// `Content-MD5` field-value.
    ContentMd5,
    /// `Content-Range` field-value.
    ContentRange,
    /// `Content-Type` field-value.
    ContentType,
    /// `Expires` field-value.
    Expires,
    /// `Last-Modified` field-value.
    LastModified,

    /// `Server` field-value.
    Server,

    /// A Content-Length delimited or close-delimited message body.
    Content,
    /// The hex digits of a `chunk-size` line.
    ChunkSize,
    /// The octets of one `chunk-data`.
    ChunkData,
}

/// Recognized field names, lower-cased.
const HEADERS: [(&str, HttpTokenKind); 25] = [
    ("cache-control", HttpTokenKind::CacheControl),
    ("connection", HttpTokenKind::Connection),
    ("date", HttpTokenKind::Date),
    ("pragma", HttpTokenKind::Pragma),
    ("trailer", HttpTokenKind::Trailer),
    ("transfer-encoding", HttpTokenKind::TransferEncoding),
    ("upgrade", HttpTokenKind::Upgrade),
    ("via", HttpTokenKind::Via),
    ("warning", HttpTokenKind::Warning),
    ("accept-ranges", HttpTokenKind::AcceptRanges),
    ("age", HttpTokenKind::Age),
    ("etag", HttpTokenKind::ETag),
    ("location", HttpTokenKind::Location),
    ("proxy-authenticate", HttpTokenKind::ProxyAuthenticate),
    ("allow", HttpTokenKind::Allow),
    ("content-encoding", HttpTokenKind::ContentEncoding),
    ("content-language", HttpTokenKind::ContentLanguage),
    ("content-length", HttpTokenKind::ContentLength),
    ("content-location", HttpTokenKind::ContentLocation),
    ("content-md5", HttpTokenKind::ContentMd5),
    ("content-range", HttpTokenKind::ContentRange),
    ("content-type", HttpTokenKind::ContentType),
    ("expires", HttpTokenKind::Expires),
    ("last-modified", HttpTokenKind::LastModified),
    ("server", HttpTokenKind::Server),
];

impl HttpTokenKind {
    /// Maps a field-name to its kind, ignoring ASCII case.
    ///
    /// Returns `None` for names outside the allow-list; those headers are
    /// skipped by the tokenizer.
    #[must_use]
    pub fn from_header_name(name: &[u8]) -> Option<Self> {
        HEADERS
            .iter()
            .find(|(known, _)| known.as_bytes().eq_ignore_ascii_case(name))
            .map(|&(_, kind)| kind)
    }

    /// Whether the token is the field-value of a header.
    #[must_use]
    pub fn is_header(self) -> bool {
        !matches!(
            self,
            HttpTokenKind::Version
                | HttpTokenKind::StatusCode
                | HttpTokenKind::Content
                | HttpTokenKind::ChunkSize
                | HttpTokenKind::ChunkData
        )
    }

    /// Whether the token carries message-body octets.
    #[must_use]
    pub fn is_body(self) -> bool {
        matches!(self, HttpTokenKind::Content | HttpTokenKind::ChunkData)
    }

    /// The grammar name of the span, in its canonical spelling.
    #[must_use]
    pub fn name(self) -> &'static str {
        match self {
            HttpTokenKind::Version => "HTTP-Version",
            HttpTokenKind::StatusCode => "Status-Code",
            HttpTokenKind::CacheControl => "Cache-Control",
            HttpTokenKind::Connection => "Connection",
            HttpTokenKind::Date => "Date",
            HttpTokenKind::Pragma => "Pragma",
            HttpTokenKind::Trailer => "Trailer",
            HttpTokenKind::TransferEncoding => "Transfer-Encoding",
            HttpTokenKind::Upgrade => "Upgrade",
            HttpTokenKind::Via => "Via",
            HttpTokenKind::Warning => "Warning",
            HttpTokenKind::AcceptRanges => "Accept-Ranges",
            HttpTokenKind::Age => "Age",
            HttpTokenKind::ETag => "ETag",
            HttpTokenKind::Location => "Location",
            HttpTokenKind::ProxyAuthenticate => "Proxy-Authenticate",
            HttpTokenKind::Allow => "Allow",
            HttpTokenKind::ContentEncoding => "Content-Encoding",
            HttpTokenKind::ContentLanguage => "Content-Language",
            HttpTokenKind::ContentLength => "Content-Length",
            HttpTokenKind::ContentLocation => "Content-Location",
            HttpTokenKind::ContentMd5 => "Content-MD5",
            HttpTokenKind::ContentRange => "Content-Range",
            HttpTokenKind::ContentType => "Content-Type",
            HttpTokenKind::Expires => "Expires",
            HttpTokenKind::LastModified => "Last-Modified",
            HttpTokenKind::Server => "Server",
            HttpTokenKind::Content => "message-body",
            HttpTokenKind::ChunkSize => "chunk-size",
            HttpTokenKind::ChunkData => "chunk-data",
        }
    }
}

impl fmt::Display for HttpTokenKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}
