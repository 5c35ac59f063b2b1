//! The public parsing context: tokenizer events in, handler callbacks out.

use tracing::{debug, trace};

use crate::{
    arena::Arena,
    chunk::ChunkState,
    context::{Context, Message, Mode},
    parser::{BodyFraming, EventSink, Fragment, HeadInfo, Parser, ParserError, ParserOptions},
    span::FirstFragment,
};

/// Receives completed messages and chunk boundaries.
///
/// Only [`Handler::on_message`] is required; the chunk callbacks default to
/// doing nothing. Any `FnMut(&Message<'_>)` closure is a handler that only
/// cares about whole messages.
///
/// The handler is the user data of an [`HttpModem`]: it survives
/// [`HttpModem::clear`] and can be recovered with [`HttpModem::into_handler`].
pub trait Handler {
    /// A message without chunked framing is complete.
    ///
    /// In [`Mode::Service`] this is the point where the request target, the
    /// headers and the body are all known; in [`Mode::Client`] it is the
    /// point where the response body is complete.
    fn on_message(&mut self, message: &Message<'_>);

    /// The header section announced a chunked body. Fires once per message,
    /// before any chunk.
    fn on_chunk_encoding(&mut self, message: &Message<'_>) {
        let _ = message;
    }

    /// A non-empty chunk arrived; [`Message::body`] holds its bytes.
    ///
    /// The chunk's buffer is reclaimed when the callback returns.
    fn on_chunk(&mut self, message: &Message<'_>) {
        let _ = message;
    }

    /// The chunked body ended. Fires once per chunked message, with an empty
    /// body.
    fn on_chunk_complete(&mut self, message: &Message<'_>) {
        let _ = message;
    }
}

impl<F> Handler for F
where
    F: FnMut(&Message<'_>),
{
    fn on_message(&mut self, message: &Message<'_>) {
        self(message);
    }
}

/// A reusable HTTP/1.x parsing context.
///
/// Bytes go in through [`HttpModem::feed`]; callbacks on the [`Handler`] run
/// inline, before `feed` returns. Fields that arrive whole within one `feed`
/// call are handed to the callbacks without copying (the request target is
/// always copied). Everything that must outlive the call is copied into the
/// context's arena, which is reclaimed in bulk when the next message begins.
///
/// # Examples
///
/// ```rust
/// use httpmodem::{HttpModem, Message, ParserOptions};
///
/// let mut urls = Vec::new();
/// let mut modem = HttpModem::service(
///     |msg: &Message<'_>| urls.push(msg.url().to_string()),
///     ParserOptions::default(),
/// );
/// modem.feed(b"GET /a HTTP/1.1\r\nHost: x\r\n\r\n").unwrap();
/// modem.feed(b"GET /b HTTP/1.1\r\n\r\n").unwrap();
/// drop(modem);
/// assert_eq!(urls, ["/a", "/b"]);
/// ```
#[derive(Debug)]
pub struct HttpModem<H> {
    parser: Parser,
    ctx: Context,
    handler: H,
}

impl<H: Handler> HttpModem<H> {
    /// Creates a context parsing requests.
    #[must_use]
    pub fn service(handler: H, options: ParserOptions) -> Self {
        Self::new(Mode::Service, handler, options)
    }

    /// Creates a context parsing responses.
    #[must_use]
    pub fn client(handler: H, options: ParserOptions) -> Self {
        Self::new(Mode::Client, handler, options)
    }

    #[must_use]
    pub fn new(mode: Mode, handler: H, options: ParserOptions) -> Self {
        Self {
            parser: Parser::new(mode.message_kind(), &options),
            ctx: Context::new(mode, &options),
            handler,
        }
    }

    /// Parses `input`, invoking handler callbacks for every message or chunk
    /// it completes.
    ///
    /// # Errors
    ///
    /// Returns the tokenizer's error when `input` is not valid HTTP/1.x. The
    /// context then keeps returning that error until [`HttpModem::clear`].
    pub fn feed(&mut self, input: &[u8]) -> Result<(), ParserError> {
        let mut sink = Feed {
            ctx: &mut self.ctx,
            handler: &mut self.handler,
            input,
        };
        let result = self.parser.execute(&mut sink, input);
        self.ctx.promote(input);
        if let Err(err) = &result {
            debug!(%err, mode = ?self.ctx.mode, "feed failed");
        }
        result
    }

    /// Signals that no more input will arrive.
    ///
    /// Completes a response whose body is delimited by the end of the
    /// connection.
    ///
    /// # Errors
    ///
    /// Returns an error when a message is only partially received.
    pub fn finish(&mut self) -> Result<(), ParserError> {
        let mut sink = Feed {
            ctx: &mut self.ctx,
            handler: &mut self.handler,
            input: &[],
        };
        let result = self.parser.finish(&mut sink);
        if let Err(err) = &result {
            debug!(%err, mode = ?self.ctx.mode, "finish failed");
        }
        result
    }

    /// Resets the context for a new connection: tokenizer state, stored
    /// error, accumulated message and arena. The handler is kept.
    pub fn clear(&mut self) {
        trace!(used = self.ctx.arena.used(), "clearing context");
        self.parser.reset();
        self.ctx.reset();
    }

    #[must_use]
    pub fn mode(&self) -> Mode {
        self.ctx.mode
    }

    #[must_use]
    pub fn handler(&self) -> &H {
        &self.handler
    }

    pub fn handler_mut(&mut self) -> &mut H {
        &mut self.handler
    }

    /// Consumes the context, returning the handler.
    pub fn into_handler(self) -> H {
        self.handler
    }

    /// The context's arena, for memory introspection.
    #[must_use]
    pub fn arena(&self) -> &Arena {
        &self.ctx.arena
    }
}

/// Routes tokenizer events for one `feed` call into the context.
struct Feed<'a, H> {
    ctx: &'a mut Context,
    handler: &'a mut H,
    input: &'a [u8],
}

impl<H: Handler> EventSink for Feed<'_, H> {
    fn on_message_begin(&mut self) {
        self.ctx.begin_message();
    }

    fn on_url(&mut self, fragment: Fragment) {
        let ctx = &mut *self.ctx;
        ctx.url
            .append(&mut ctx.arena, self.input, fragment, FirstFragment::Copy);
    }

    fn on_status(&mut self, fragment: Fragment) {
        let ctx = &mut *self.ctx;
        ctx.status
            .append(&mut ctx.arena, self.input, fragment, FirstFragment::Alias);
    }

    fn on_header_field(&mut self, fragment: Fragment) {
        let ctx = &mut *self.ctx;
        ctx.headers.on_field(&mut ctx.arena, self.input, fragment);
    }

    fn on_header_value(&mut self, fragment: Fragment) {
        let ctx = &mut *self.ctx;
        ctx.headers.on_value(&mut ctx.arena, self.input, fragment);
    }

    fn on_headers_complete(&mut self, head: &HeadInfo) {
        let ctx = &mut *self.ctx;
        ctx.headers.finish();
        ctx.head = *head;
        ctx.content_length = head.content_length;
        ctx.body.start(match head.framing {
            BodyFraming::ContentLength(n) => Some(usize::try_from(n).unwrap_or(usize::MAX)),
            BodyFraming::UntilEof => None,
            BodyFraming::None | BodyFraming::Chunked => Some(0),
        });

        if head.chunked {
            ctx.promote_head(self.input);
            self.handler.on_chunk_encoding(&ctx.message(self.input));
            ctx.chunks.arm(&ctx.arena);
        }
    }

    fn on_body(&mut self, fragment: Fragment) {
        let ctx = &mut *self.ctx;
        ctx.body.on_fragment(&mut ctx.arena, self.input, fragment);
    }

    fn on_chunk_header(&mut self, size: u64) {
        let ctx = &mut *self.ctx;
        ctx.content_length = Some(size);
        let size = usize::try_from(size).unwrap_or(usize::MAX);
        if ctx.chunks.open(&mut ctx.arena, &mut ctx.body, size) {
            self.handler.on_chunk_complete(&ctx.message(self.input));
        }
    }

    fn on_chunk_complete(&mut self) {
        let ctx = &mut *self.ctx;
        let len = ctx.body.bytes(&ctx.arena, self.input).len();
        if ctx.chunks.state() == ChunkState::Open && len > 0 {
            trace!(len, "chunk complete");
            self.handler.on_chunk(&ctx.message(self.input));
        }
        ctx.chunks.close(&mut ctx.arena, &mut ctx.body);
    }

    fn on_message_complete(&mut self) {
        let ctx = &mut *self.ctx;
        if ctx.head.chunked {
            if ctx.chunks.take_end() {
                self.handler.on_chunk_complete(&ctx.message(self.input));
            }
        } else {
            self.handler.on_message(&ctx.message(self.input));
        }
        ctx.in_message = false;
    }
}
