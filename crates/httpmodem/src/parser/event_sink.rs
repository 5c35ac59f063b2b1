use core::{fmt, ops::Range};

/// A byte range of the slice passed to the current `execute` call.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Fragment {
    pub start: usize,
    pub len: usize,
}

impl Fragment {
    #[inline]
    #[must_use]
    pub fn new(start: usize, end: usize) -> Self {
        debug_assert!(start <= end);
        Self {
            start,
            len: end - start,
        }
    }

    #[inline]
    #[must_use]
    pub fn range(self) -> Range<usize> {
        self.start..self.start + self.len
    }

    #[inline]
    #[must_use]
    pub fn is_empty(self) -> bool {
        self.len == 0
    }
}

/// Request methods understood by the tokenizer.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Method {
    Get,
    Head,
    Post,
    Put,
    Delete,
    Connect,
    Options,
    Trace,
    Patch,
}

impl Method {
    pub(crate) fn from_token(token: &[u8]) -> Option<Self> {
        Some(match token {
            b"GET" => Self::Get,
            b"HEAD" => Self::Head,
            b"POST" => Self::Post,
            b"PUT" => Self::Put,
            b"DELETE" => Self::Delete,
            b"CONNECT" => Self::Connect,
            b"OPTIONS" => Self::Options,
            b"TRACE" => Self::Trace,
            b"PATCH" => Self::Patch,
            _ => return None,
        })
    }

    /// The method token as it appears on the wire.
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Get => "GET",
            Self::Head => "HEAD",
            Self::Post => "POST",
            Self::Put => "PUT",
            Self::Delete => "DELETE",
            Self::Connect => "CONNECT",
            Self::Options => "OPTIONS",
            Self::Trace => "TRACE",
            Self::Patch => "PATCH",
        }
    }
}

impl fmt::Display for Method {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// How the body following a header section is delimited.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum BodyFraming {
    /// No body follows the header section.
    #[default]
    None,
    /// Exactly this many bytes follow.
    ContentLength(u64),
    /// A sequence of chunks follows.
    Chunked,
    /// The body runs until the input ends (responses only).
    UntilEof,
}

/// Metadata known once the header section has been parsed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct HeadInfo {
    pub method: Option<Method>,
    pub status_code: u16,
    pub http_major: u16,
    pub http_minor: u16,
    pub content_length: Option<u64>,
    pub keep_alive: bool,
    pub chunked: bool,
    pub framing: BodyFraming,
}

/// Receiver of lexical events, in wire order.
///
/// Fragments for one logical field may be split across several calls, both
/// within one `execute` call and across calls.
pub trait EventSink {
    fn on_message_begin(&mut self) {}
    fn on_url(&mut self, fragment: Fragment);
    fn on_status(&mut self, fragment: Fragment);
    fn on_header_field(&mut self, fragment: Fragment);
    fn on_header_value(&mut self, fragment: Fragment);
    fn on_headers_complete(&mut self, head: &HeadInfo);
    fn on_body(&mut self, fragment: Fragment);
    /// A chunk size line was parsed; `size` is zero for the last chunk.
    fn on_chunk_header(&mut self, size: u64);
    fn on_chunk_complete(&mut self);
    fn on_message_complete(&mut self);
}
