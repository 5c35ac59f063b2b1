//! Per-session accumulation state and the borrowed view handed to handlers.

use alloc::{borrow::ToOwned, vec::Vec};
use core::fmt;

use bstr::{BStr, BString, ByteSlice};

use crate::{
    arena::Arena,
    body::BodyAssembler,
    chunk::ChunkCoordinator,
    headers::{HeaderAssembler, Headers},
    parser::{HeadInfo, MessageKind, Method, ParserOptions},
    span::Span,
};

/// Which side of an exchange a context parses.
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Mode {
    /// Parses requests; `url` and `method` are meaningful.
    Service,
    /// Parses responses; `status` and `status_code` are meaningful.
    Client,
}

impl Mode {
    pub(crate) fn message_kind(self) -> MessageKind {
        match self {
            Mode::Service => MessageKind::Request,
            Mode::Client => MessageKind::Response,
        }
    }
}

#[derive(Debug)]
pub(crate) struct Context {
    pub(crate) mode: Mode,
    pub(crate) url: Span,
    pub(crate) status: Span,
    pub(crate) headers: HeaderAssembler,
    pub(crate) body: BodyAssembler,
    pub(crate) head: HeadInfo,
    /// Declared length of the body, or of the current chunk.
    pub(crate) content_length: Option<u64>,
    pub(crate) chunks: ChunkCoordinator,
    pub(crate) arena: Arena,
    pub(crate) in_message: bool,
}

impl Context {
    pub(crate) fn new(mode: Mode, options: &ParserOptions) -> Self {
        Self {
            mode,
            url: Span::Empty,
            status: Span::Empty,
            headers: HeaderAssembler::default(),
            body: BodyAssembler::default(),
            head: HeadInfo::default(),
            content_length: None,
            chunks: ChunkCoordinator::default(),
            arena: Arena::with_capacity(options.arena_capacity),
            in_message: false,
        }
    }

    /// Forgets the previous message and reclaims the whole arena.
    pub(crate) fn begin_message(&mut self) {
        self.reset();
        self.in_message = true;
    }

    pub(crate) fn reset(&mut self) {
        self.url = Span::Empty;
        self.status = Span::Empty;
        self.headers.reset();
        self.body.start(Some(0));
        self.head = HeadInfo::default();
        self.content_length = None;
        self.chunks.reset();
        self.arena.clear();
        self.in_message = false;
    }

    /// Copies url, status and headers out of the current input.
    pub(crate) fn promote_head(&mut self, input: &[u8]) {
        self.url.promote(&mut self.arena, input);
        self.status.promote(&mut self.arena, input);
        self.headers.promote(&mut self.arena, input);
    }

    /// Copies every live alias out of `input`, which is about to be released.
    pub(crate) fn promote(&mut self, input: &[u8]) {
        if !self.in_message {
            return;
        }
        self.promote_head(input);
        self.body.promote(&mut self.arena, input);
    }

    pub(crate) fn message<'a>(&'a self, input: &'a [u8]) -> Message<'a> {
        Message { ctx: self, input }
    }
}

/// Read-only view of the message being assembled, passed to every
/// [`Handler`](crate::Handler) callback.
///
/// The view borrows both the context and the bytes of the current `feed`
/// call, so nothing it returns can be kept past the callback.
#[derive(Clone, Copy)]
pub struct Message<'a> {
    ctx: &'a Context,
    input: &'a [u8],
}

impl<'a> Message<'a> {
    #[must_use]
    pub fn mode(&self) -> Mode {
        self.ctx.mode
    }

    /// Request target. Empty in [`Mode::Client`].
    #[must_use]
    pub fn url(&self) -> &'a BStr {
        self.ctx.url.resolve(&self.ctx.arena, self.input).as_bstr()
    }

    /// Reason phrase of the status line. Empty in [`Mode::Service`].
    #[must_use]
    pub fn status(&self) -> &'a BStr {
        self.ctx.status.resolve(&self.ctx.arena, self.input).as_bstr()
    }

    #[must_use]
    pub fn method(&self) -> Option<Method> {
        self.ctx.head.method
    }

    /// Status code of a response; `0` for requests.
    #[must_use]
    pub fn status_code(&self) -> u16 {
        self.ctx.head.status_code
    }

    #[must_use]
    pub fn http_major(&self) -> u16 {
        self.ctx.head.http_major
    }

    #[must_use]
    pub fn http_minor(&self) -> u16 {
        self.ctx.head.http_minor
    }

    #[must_use]
    pub fn http_version(&self) -> (u16, u16) {
        (self.ctx.head.http_major, self.ctx.head.http_minor)
    }

    /// Declared `Content-Length`, or the size of the current chunk inside
    /// chunk callbacks.
    #[must_use]
    pub fn content_length(&self) -> Option<u64> {
        self.ctx.content_length
    }

    #[must_use]
    pub fn keep_alive(&self) -> bool {
        self.ctx.head.keep_alive
    }

    #[must_use]
    pub fn chunked(&self) -> bool {
        self.ctx.head.chunked
    }

    /// Headers in arrival order, duplicates included.
    #[must_use]
    pub fn headers(&self) -> Headers<'a> {
        self.ctx.headers.iter(&self.ctx.arena, self.input)
    }

    /// Value of the first header whose name matches `name`, ignoring ASCII
    /// case.
    #[must_use]
    pub fn header(&self, name: &str) -> Option<&'a BStr> {
        self.headers().find(|h| h.is(name)).map(|h| h.value)
    }

    /// The message body, or the current chunk inside chunk callbacks.
    #[must_use]
    pub fn body(&self) -> &'a BStr {
        self.ctx.body.bytes(&self.ctx.arena, self.input).as_bstr()
    }

    /// Returns `true` when [`Message::body`] points straight into the bytes
    /// passed to the current `feed` call.
    #[must_use]
    pub fn body_is_borrowed(&self) -> bool {
        self.ctx.body.is_aliased()
    }

    /// Copies the view into an owned value.
    #[must_use]
    pub fn to_snapshot(&self) -> MessageSnapshot {
        MessageSnapshot {
            mode: self.mode(),
            method: self.method(),
            url: self.url().to_owned(),
            status_code: self.status_code(),
            status: self.status().to_owned(),
            http_major: self.http_major(),
            http_minor: self.http_minor(),
            content_length: self.content_length(),
            keep_alive: self.keep_alive(),
            chunked: self.chunked(),
            headers: self
                .headers()
                .map(|h| (h.name.to_owned(), h.value.to_owned()))
                .collect(),
            body: self.body().to_owned(),
        }
    }
}

impl fmt::Debug for Message<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Message")
            .field("mode", &self.mode())
            .field("method", &self.method())
            .field("url", &self.url())
            .field("status_code", &self.status_code())
            .field("status", &self.status())
            .field("version", &self.http_version())
            .field("headers", &self.headers().len())
            .field("body", &self.body().len())
            .finish()
    }
}

/// Owned copy of a [`Message`].
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MessageSnapshot {
    pub mode: Mode,
    pub method: Option<Method>,
    pub url: BString,
    pub status_code: u16,
    pub status: BString,
    pub http_major: u16,
    pub http_minor: u16,
    pub content_length: Option<u64>,
    pub keep_alive: bool,
    pub chunked: bool,
    pub headers: Vec<(BString, BString)>,
    pub body: BString,
}
