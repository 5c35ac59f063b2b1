//! Incremental HTTP/1.x tokenizer.
//!
//! [`Parser`] consumes bytes as they arrive and reports lexical events to an
//! [`EventSink`]. It never buffers input: every field is reported as one or
//! more [`Fragment`]s that index into the slice handed to the current
//! [`Parser::execute`] call. A field cut by the end of a slice is reported up
//! to that point and continues with a fragment starting at offset zero of the
//! next slice.
//!
//! The tokenizer validates the grammar (start line, header tokens, framing
//! headers, chunk sizes) and decides body framing and keep-alive. It does not
//! interpret any other header and does not assemble values; that is the job
//! of the composition layer built on top of it.
//!
//! Errors are sticky: after `execute` or `finish` fails, every later call
//! returns the same error until [`Parser::reset`].

mod error;
mod event_sink;
mod literal_buffer;
mod options;

#[cfg(test)]
mod tests;

pub use error::{ParserError, SyntaxError};
pub use event_sink::{BodyFraming, EventSink, Fragment, HeadInfo, Method};
use literal_buffer::{
    ExpectedLiteralBuffer, HEADER_NAMES, KnownHeader, KnownToken, LiteralSet, Step, VALUE_TOKENS,
};
pub use options::ParserOptions;
use tracing::trace;

const CR: u8 = b'\r';
const LF: u8 = b'\n';
const SP: u8 = b' ';
const HT: u8 = b'\t';

const PROTOCOL: &[u8] = b"HTTP/";

/// Which side of the exchange the byte stream carries.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MessageKind {
    Request,
    Response,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    MessageStart,
    BlankLineLf,
    Method,
    UrlStart,
    Url,
    Protocol,
    VersionMajor,
    VersionDot,
    VersionMinor,
    RequestLineCr,
    RequestLineLf,
    AfterVersion,
    StatusCode,
    AfterStatusCode,
    ReasonStart,
    Reason,
    StatusLineLf,
    HeaderLineStart,
    HeaderField,
    HeaderValueStart,
    HeaderValue,
    HeaderValueLf,
    HeadersLf,
    BodyFixed,
    BodyUntilEof,
    ChunkSizeStart,
    ChunkSize,
    ChunkExtension,
    ChunkSizeLf,
    ChunkData,
    ChunkDataCr,
    ChunkDataLf,
    TrailerLineStart,
    Trailer,
    TrailerLf,
    TrailersLf,
    Closed,
    Failed,
}

impl State {
    /// States whose bytes are reported as fragments.
    fn is_field(self) -> bool {
        matches!(
            self,
            State::Url | State::Reason | State::HeaderField | State::HeaderValue
        )
    }

    /// States whose bytes count against `max_head_size`.
    fn is_head(self) -> bool {
        !matches!(
            self,
            State::MessageStart
                | State::BlankLineLf
                | State::BodyFixed
                | State::BodyUntilEof
                | State::ChunkSizeStart
                | State::ChunkSize
                | State::ChunkExtension
                | State::ChunkSizeLf
                | State::ChunkData
                | State::ChunkDataCr
                | State::ChunkDataLf
                | State::Closed
                | State::Failed
        )
    }
}

/// Scans a comma separated token list (`Connection`, `Transfer-Encoding`)
/// one byte at a time.
#[derive(Debug, Clone, Copy)]
struct TokenList {
    token: LiteralSet<KnownToken>,
    closed: bool,
}

impl TokenList {
    fn new() -> Self {
        Self {
            token: LiteralSet::new(VALUE_TOKENS),
            closed: false,
        }
    }

    /// Feeds one value byte; returns the finished token on a comma.
    fn step(&mut self, b: u8) -> Option<Option<KnownToken>> {
        match b {
            b',' => self.finish(),
            SP | HT => {
                if self.token.is_started() {
                    self.closed = true;
                }
                None
            }
            _ => {
                if self.closed {
                    self.token.reject();
                }
                self.token.step(b);
                None
            }
        }
    }

    /// Ends the current token. `None` when the token was empty.
    fn finish(&mut self) -> Option<Option<KnownToken>> {
        let token = self.token.is_started().then(|| self.token.matched());
        self.token.reset();
        self.closed = false;
        token
    }
}

/// Incremental HTTP/1.x tokenizer. See the module documentation.
#[derive(Debug)]
pub struct Parser {
    kind: MessageKind,
    state: State,
    failed: Option<ParserError>,
    /// Bytes consumed by previous `execute` calls since the last reset.
    offset: u64,

    max_head_size: usize,
    max_content_length: u64,
    #[cfg(any(test, feature = "fuzzing"))]
    panic_on_error: bool,

    // Per-message state, cleared when a message begins.
    head_bytes: usize,
    method_buf: [u8; 8],
    method_len: usize,
    method: Option<Method>,
    protocol: ExpectedLiteralBuffer,
    http_major: u16,
    http_minor: u16,
    status_code: u16,
    status_digits: u8,
    header_name: LiteralSet<KnownHeader>,
    header: Option<KnownHeader>,
    tokens: TokenList,
    length_digits: usize,
    length_closed: bool,
    length_value: u64,
    content_length: Option<u64>,
    transfer_encoding: bool,
    chunked: bool,
    connection_close: bool,
    connection_keep_alive: bool,
    keep_alive: bool,
    remaining: u64,
}

impl Parser {
    #[must_use]
    pub fn new(kind: MessageKind, options: &ParserOptions) -> Self {
        Self {
            kind,
            state: State::MessageStart,
            failed: None,
            offset: 0,

            max_head_size: options.max_head_size,
            max_content_length: options.max_content_length,
            #[cfg(any(test, feature = "fuzzing"))]
            panic_on_error: options.panic_on_error,

            head_bytes: 0,
            method_buf: [0; 8],
            method_len: 0,
            method: None,
            protocol: ExpectedLiteralBuffer::none(),
            http_major: 0,
            http_minor: 0,
            status_code: 0,
            status_digits: 0,
            header_name: LiteralSet::new(HEADER_NAMES),
            header: None,
            tokens: TokenList::new(),
            length_digits: 0,
            length_closed: false,
            length_value: 0,
            content_length: None,
            transfer_encoding: false,
            chunked: false,
            connection_close: false,
            connection_keep_alive: false,
            keep_alive: false,
            remaining: 0,
        }
    }

    #[must_use]
    pub fn kind(&self) -> MessageKind {
        self.kind
    }

    /// Returns `true` once the parser has failed and needs a reset.
    #[must_use]
    pub fn is_failed(&self) -> bool {
        self.failed.is_some()
    }

    /// Returns `true` between messages, i.e. when ending the input now would
    /// not cut a message short.
    #[must_use]
    pub fn is_idle(&self) -> bool {
        matches!(self.state, State::MessageStart | State::Closed)
    }

    /// Forgets all progress, including a stored error.
    pub fn reset(&mut self) {
        self.state = State::MessageStart;
        self.failed = None;
        self.offset = 0;
        self.begin_message();
    }

    /// Consumes `input`, reporting events to `sink`.
    ///
    /// # Errors
    ///
    /// Returns a [`ParserError`] when the bytes violate the grammar or a
    /// configured limit. Events for the bytes before the offending one have
    /// already been delivered.
    pub fn execute<S: EventSink>(&mut self, sink: &mut S, input: &[u8]) -> Result<(), ParserError> {
        if let Some(err) = &self.failed {
            return Err(err.clone());
        }

        let mut i = 0;
        let mut mark = self.state.is_field().then_some(0);
        match self.run(sink, input, &mut i, &mut mark) {
            Ok(()) => {
                if let Some(start) = mark {
                    emit_field(self.state, sink, Fragment::new(start, input.len()));
                }
                self.offset += input.len() as u64;
                Ok(())
            }
            Err(source) => Err(self.fail(source, i)),
        }
    }

    /// Signals the end of input.
    ///
    /// Completes a response whose body runs until the connection closes.
    ///
    /// # Errors
    ///
    /// Returns [`SyntaxError::UnexpectedEndOfInput`] when a message is only
    /// partially parsed.
    pub fn finish<S: EventSink>(&mut self, sink: &mut S) -> Result<(), ParserError> {
        if let Some(err) = &self.failed {
            return Err(err.clone());
        }
        match self.state {
            State::MessageStart | State::Closed => Ok(()),
            State::BodyUntilEof => {
                self.complete_message(sink);
                Ok(())
            }
            _ => Err(self.fail(SyntaxError::UnexpectedEndOfInput, 0)),
        }
    }

    fn fail(&mut self, source: SyntaxError, at: usize) -> ParserError {
        #[cfg(any(test, feature = "fuzzing"))]
        assert!(
            !self.panic_on_error,
            "Syntax error at byte {}: {source}",
            self.offset + at as u64
        );
        let err = ParserError {
            source,
            offset: self.offset + at as u64,
        };
        self.state = State::Failed;
        self.failed = Some(err.clone());
        err
    }

    fn begin_message(&mut self) {
        self.head_bytes = 0;
        self.method_len = 0;
        self.method = None;
        self.protocol = ExpectedLiteralBuffer::none();
        self.http_major = 0;
        self.http_minor = 0;
        self.status_code = 0;
        self.status_digits = 0;
        self.header_name.reset();
        self.header = None;
        self.tokens = TokenList::new();
        self.reset_length_scan();
        self.content_length = None;
        self.transfer_encoding = false;
        self.chunked = false;
        self.connection_close = false;
        self.connection_keep_alive = false;
        self.keep_alive = false;
        self.remaining = 0;
    }

    fn reset_length_scan(&mut self) {
        self.length_digits = 0;
        self.length_closed = false;
        self.length_value = 0;
    }

    fn complete_message<S: EventSink>(&mut self, sink: &mut S) {
        trace!(keep_alive = self.keep_alive, "message complete");
        sink.on_message_complete();
        self.state = if self.keep_alive {
            State::MessageStart
        } else {
            State::Closed
        };
    }

    #[allow(clippy::too_many_lines)]
    fn run<S: EventSink>(
        &mut self,
        sink: &mut S,
        input: &[u8],
        i: &mut usize,
        mark: &mut Option<usize>,
    ) -> Result<(), SyntaxError> {
        while *i < input.len() {
            let b = input[*i];
            let before = *i;
            let state = self.state;

            match state {
                State::MessageStart => match b {
                    CR => {
                        self.state = State::BlankLineLf;
                        *i += 1;
                    }
                    LF => *i += 1,
                    _ => {
                        self.begin_message();
                        trace!(kind = ?self.kind, "message begin");
                        sink.on_message_begin();
                        self.state = match self.kind {
                            MessageKind::Request => State::Method,
                            MessageKind::Response => {
                                self.protocol = ExpectedLiteralBuffer::new(PROTOCOL);
                                State::Protocol
                            }
                        };
                    }
                },
                State::BlankLineLf => {
                    expect_lf(b)?;
                    self.state = State::MessageStart;
                    *i += 1;
                }

                // Request line
                State::Method => {
                    if b == SP {
                        self.method = Method::from_token(&self.method_buf[..self.method_len]);
                        if self.method.is_none() {
                            return Err(SyntaxError::InvalidMethod);
                        }
                        self.state = State::UrlStart;
                    } else if is_token(b) && self.method_len < self.method_buf.len() {
                        self.method_buf[self.method_len] = b;
                        self.method_len += 1;
                    } else {
                        return Err(SyntaxError::InvalidMethod);
                    }
                    *i += 1;
                }
                State::UrlStart => {
                    if !is_url(b) {
                        return Err(SyntaxError::InvalidUrl);
                    }
                    *mark = Some(*i);
                    self.state = State::Url;
                }
                State::Url => {
                    let end = scan(input, *i, is_url);
                    *i = end;
                    if end < input.len() {
                        if input[end] != SP {
                            return Err(SyntaxError::InvalidUrl);
                        }
                        take_field(State::Url, sink, mark, end);
                        self.protocol = ExpectedLiteralBuffer::new(PROTOCOL);
                        self.state = State::Protocol;
                        *i += 1;
                    }
                }

                // Version, shared by both start lines
                State::Protocol => {
                    match self.protocol.step(b) {
                        Step::NeedMore => {}
                        Step::Done => self.state = State::VersionMajor,
                        Step::Reject => return Err(SyntaxError::InvalidVersion),
                    }
                    *i += 1;
                }
                State::VersionMajor => {
                    self.http_major = u16::from(digit(b).ok_or(SyntaxError::InvalidVersion)?);
                    self.state = State::VersionDot;
                    *i += 1;
                }
                State::VersionDot => {
                    if b != b'.' {
                        return Err(SyntaxError::InvalidVersion);
                    }
                    self.state = State::VersionMinor;
                    *i += 1;
                }
                State::VersionMinor => {
                    self.http_minor = u16::from(digit(b).ok_or(SyntaxError::InvalidVersion)?);
                    if self.http_major != 1 || self.http_minor > 1 {
                        return Err(SyntaxError::InvalidVersion);
                    }
                    self.state = match self.kind {
                        MessageKind::Request => State::RequestLineCr,
                        MessageKind::Response => State::AfterVersion,
                    };
                    *i += 1;
                }
                State::RequestLineCr => {
                    if b != CR {
                        return Err(SyntaxError::InvalidVersion);
                    }
                    self.state = State::RequestLineLf;
                    *i += 1;
                }
                State::RequestLineLf => {
                    expect_lf(b)?;
                    self.state = State::HeaderLineStart;
                    *i += 1;
                }

                // Status line
                State::AfterVersion => {
                    if b != SP {
                        return Err(SyntaxError::InvalidStatus);
                    }
                    self.state = State::StatusCode;
                    *i += 1;
                }
                State::StatusCode => {
                    let d = digit(b).ok_or(SyntaxError::InvalidStatus)?;
                    self.status_code = self.status_code * 10 + u16::from(d);
                    self.status_digits += 1;
                    if self.status_digits == 3 {
                        if self.status_code < 100 {
                            return Err(SyntaxError::InvalidStatus);
                        }
                        self.state = State::AfterStatusCode;
                    }
                    *i += 1;
                }
                State::AfterStatusCode => {
                    self.state = match b {
                        SP => State::ReasonStart,
                        CR => State::StatusLineLf,
                        _ => return Err(SyntaxError::InvalidStatus),
                    };
                    *i += 1;
                }
                State::ReasonStart => {
                    if b == CR {
                        self.state = State::StatusLineLf;
                        *i += 1;
                    } else if is_text(b) {
                        *mark = Some(*i);
                        self.state = State::Reason;
                    } else {
                        return Err(SyntaxError::InvalidStatus);
                    }
                }
                State::Reason => {
                    let end = scan(input, *i, is_text);
                    *i = end;
                    if end < input.len() {
                        if input[end] != CR {
                            return Err(SyntaxError::InvalidStatus);
                        }
                        take_field(State::Reason, sink, mark, end);
                        self.state = State::StatusLineLf;
                        *i += 1;
                    }
                }
                State::StatusLineLf => {
                    expect_lf(b)?;
                    self.state = State::HeaderLineStart;
                    *i += 1;
                }

                // Header section
                State::HeaderLineStart => {
                    if b == CR {
                        self.state = State::HeadersLf;
                        *i += 1;
                    } else if is_token(b) {
                        *mark = Some(*i);
                        self.header_name.reset();
                        self.state = State::HeaderField;
                    } else {
                        return Err(SyntaxError::InvalidHeaderToken(b));
                    }
                }
                State::HeaderField => {
                    if is_token(b) {
                        self.header_name.step(b);
                    } else if b == b':' {
                        take_field(State::HeaderField, sink, mark, *i);
                        self.header = self.header_name.matched();
                        self.tokens = TokenList::new();
                        self.reset_length_scan();
                        self.state = State::HeaderValueStart;
                    } else {
                        return Err(SyntaxError::InvalidHeaderToken(b));
                    }
                    *i += 1;
                }
                State::HeaderValueStart => match b {
                    SP | HT => *i += 1,
                    CR => {
                        sink.on_header_value(Fragment::new(*i, *i));
                        self.state = State::HeaderValueLf;
                        *i += 1;
                    }
                    _ if is_text(b) => {
                        *mark = Some(*i);
                        self.state = State::HeaderValue;
                    }
                    _ => return Err(SyntaxError::InvalidHeaderValue(b)),
                },
                State::HeaderValue => {
                    if b == CR {
                        take_field(State::HeaderValue, sink, mark, *i);
                        self.state = State::HeaderValueLf;
                    } else if is_text(b) {
                        self.scan_value_byte(b)?;
                    } else {
                        return Err(SyntaxError::InvalidHeaderValue(b));
                    }
                    *i += 1;
                }
                State::HeaderValueLf => {
                    expect_lf(b)?;
                    self.finish_header_value()?;
                    self.state = State::HeaderLineStart;
                    *i += 1;
                }
                State::HeadersLf => {
                    expect_lf(b)?;
                    *i += 1;
                    let head = self.head_info()?;
                    trace!(framing = ?head.framing, keep_alive = head.keep_alive, "headers complete");
                    sink.on_headers_complete(&head);
                    match head.framing {
                        BodyFraming::None | BodyFraming::ContentLength(0) => {
                            self.complete_message(sink);
                        }
                        BodyFraming::ContentLength(n) => {
                            self.remaining = n;
                            self.state = State::BodyFixed;
                        }
                        BodyFraming::Chunked => self.state = State::ChunkSizeStart,
                        BodyFraming::UntilEof => self.state = State::BodyUntilEof,
                    }
                }

                // Bodies
                State::BodyFixed => {
                    let end = take_body(input, *i, &mut self.remaining);
                    sink.on_body(Fragment::new(*i, end));
                    *i = end;
                    if self.remaining == 0 {
                        self.complete_message(sink);
                    }
                }
                State::BodyUntilEof => {
                    sink.on_body(Fragment::new(*i, input.len()));
                    *i = input.len();
                }
                State::ChunkSizeStart => {
                    let d = hex_digit(b).ok_or(SyntaxError::InvalidChunkSize)?;
                    self.remaining = u64::from(d);
                    self.state = State::ChunkSize;
                    *i += 1;
                }
                State::ChunkSize => {
                    if let Some(d) = hex_digit(b) {
                        self.remaining = self
                            .remaining
                            .checked_mul(16)
                            .and_then(|v| v.checked_add(u64::from(d)))
                            .ok_or(SyntaxError::InvalidChunkSize)?;
                    } else {
                        self.state = match b {
                            b';' | SP | HT => State::ChunkExtension,
                            CR => State::ChunkSizeLf,
                            _ => return Err(SyntaxError::InvalidChunkSize),
                        };
                    }
                    *i += 1;
                }
                State::ChunkExtension => {
                    match b {
                        CR => self.state = State::ChunkSizeLf,
                        LF => return Err(SyntaxError::InvalidChunkSize),
                        _ => {}
                    }
                    *i += 1;
                }
                State::ChunkSizeLf => {
                    expect_lf(b)?;
                    *i += 1;
                    if self.remaining > self.max_content_length {
                        return Err(SyntaxError::BodyTooLarge {
                            limit: self.max_content_length,
                        });
                    }
                    trace!(size = self.remaining, "chunk header");
                    sink.on_chunk_header(self.remaining);
                    self.state = if self.remaining == 0 {
                        self.head_bytes = 0;
                        State::TrailerLineStart
                    } else {
                        State::ChunkData
                    };
                }
                State::ChunkData => {
                    let end = take_body(input, *i, &mut self.remaining);
                    sink.on_body(Fragment::new(*i, end));
                    *i = end;
                    if self.remaining == 0 {
                        self.state = State::ChunkDataCr;
                    }
                }
                State::ChunkDataCr => {
                    if b != CR {
                        return Err(SyntaxError::ExpectedLineFeed);
                    }
                    self.state = State::ChunkDataLf;
                    *i += 1;
                }
                State::ChunkDataLf => {
                    expect_lf(b)?;
                    sink.on_chunk_complete();
                    self.state = State::ChunkSizeStart;
                    *i += 1;
                }
                State::TrailerLineStart => {
                    self.state = match b {
                        CR => State::TrailersLf,
                        _ if is_token(b) => State::Trailer,
                        _ => return Err(SyntaxError::InvalidHeaderToken(b)),
                    };
                    *i += 1;
                }
                State::Trailer => {
                    match b {
                        CR => self.state = State::TrailerLf,
                        LF => return Err(SyntaxError::InvalidHeaderValue(b)),
                        _ => {}
                    }
                    *i += 1;
                }
                State::TrailerLf => {
                    expect_lf(b)?;
                    self.state = State::TrailerLineStart;
                    *i += 1;
                }
                State::TrailersLf => {
                    expect_lf(b)?;
                    *i += 1;
                    sink.on_chunk_complete();
                    self.complete_message(sink);
                }

                State::Closed => {
                    if b != CR && b != LF {
                        return Err(SyntaxError::DataAfterClose);
                    }
                    *i += 1;
                }
                State::Failed => unreachable!("failed parser is never run"),
            }

            if state.is_head() {
                self.head_bytes += *i - before;
                if self.head_bytes > self.max_head_size {
                    return Err(SyntaxError::HeadersTooLarge {
                        limit: self.max_head_size,
                    });
                }
            }
        }
        Ok(())
    }

    /// Interprets one byte of a framing header value.
    fn scan_value_byte(&mut self, b: u8) -> Result<(), SyntaxError> {
        match self.header {
            Some(KnownHeader::ContentLength) => {
                if let Some(d) = digit(b) {
                    if self.length_closed {
                        return Err(SyntaxError::InvalidContentLength);
                    }
                    self.length_value = self
                        .length_value
                        .checked_mul(10)
                        .and_then(|v| v.checked_add(u64::from(d)))
                        .ok_or(SyntaxError::InvalidContentLength)?;
                    self.length_digits += 1;
                } else if b == SP || b == HT {
                    self.length_closed = true;
                } else {
                    return Err(SyntaxError::InvalidContentLength);
                }
            }
            Some(KnownHeader::TransferEncoding | KnownHeader::Connection) => {
                if let Some(token) = self.tokens.step(b) {
                    self.apply_token(token);
                }
            }
            None => {}
        }
        Ok(())
    }

    fn finish_header_value(&mut self) -> Result<(), SyntaxError> {
        match self.header {
            Some(KnownHeader::ContentLength) => {
                if self.length_digits == 0 {
                    return Err(SyntaxError::InvalidContentLength);
                }
                if self.content_length.is_some() {
                    return Err(SyntaxError::DuplicateContentLength);
                }
                self.content_length = Some(self.length_value);
            }
            Some(KnownHeader::TransferEncoding) => {
                self.transfer_encoding = true;
                if let Some(token) = self.tokens.finish() {
                    self.apply_token(token);
                }
            }
            Some(KnownHeader::Connection) => {
                if let Some(token) = self.tokens.finish() {
                    self.apply_token(token);
                }
            }
            None => {}
        }
        self.header = None;
        Ok(())
    }

    fn apply_token(&mut self, token: Option<KnownToken>) {
        match self.header {
            Some(KnownHeader::TransferEncoding) => {
                self.chunked = token == Some(KnownToken::Chunked);
            }
            Some(KnownHeader::Connection) => match token {
                Some(KnownToken::Close) => self.connection_close = true,
                Some(KnownToken::KeepAlive) => self.connection_keep_alive = true,
                _ => {}
            },
            _ => {}
        }
    }

    fn head_info(&mut self) -> Result<HeadInfo, SyntaxError> {
        if self.transfer_encoding && self.content_length.is_some() {
            return Err(SyntaxError::AmbiguousBodyLength);
        }
        let chunked = self.transfer_encoding && self.chunked;
        let framing = match self.kind {
            MessageKind::Request => {
                if self.transfer_encoding {
                    if !chunked {
                        return Err(SyntaxError::InvalidTransferEncoding);
                    }
                    BodyFraming::Chunked
                } else if let Some(n) = self.content_length {
                    BodyFraming::ContentLength(n)
                } else {
                    BodyFraming::None
                }
            }
            MessageKind::Response => {
                if self.status_code / 100 == 1 || self.status_code == 204 || self.status_code == 304
                {
                    BodyFraming::None
                } else if chunked {
                    BodyFraming::Chunked
                } else if let Some(n) = self.content_length {
                    BodyFraming::ContentLength(n)
                } else {
                    BodyFraming::UntilEof
                }
            }
        };
        if let BodyFraming::ContentLength(n) = framing {
            if n > self.max_content_length {
                return Err(SyntaxError::BodyTooLarge {
                    limit: self.max_content_length,
                });
            }
        }

        self.keep_alive = framing != BodyFraming::UntilEof
            && !self.connection_close
            && (self.http_minor >= 1 || self.connection_keep_alive);

        Ok(HeadInfo {
            method: self.method,
            status_code: self.status_code,
            http_major: self.http_major,
            http_minor: self.http_minor,
            content_length: self.content_length,
            keep_alive: self.keep_alive,
            chunked: framing == BodyFraming::Chunked,
            framing,
        })
    }
}

fn emit_field<S: EventSink>(state: State, sink: &mut S, fragment: Fragment) {
    if fragment.is_empty() {
        return;
    }
    match state {
        State::Url => sink.on_url(fragment),
        State::Reason => sink.on_status(fragment),
        State::HeaderField => sink.on_header_field(fragment),
        State::HeaderValue => sink.on_header_value(fragment),
        _ => {}
    }
}

/// Reports the field that started at `mark` and ends at `end`.
fn take_field<S: EventSink>(state: State, sink: &mut S, mark: &mut Option<usize>, end: usize) {
    if let Some(start) = mark.take() {
        emit_field(state, sink, Fragment::new(start, end));
    }
}

/// Consumes up to `remaining` body bytes starting at `at`; returns the end.
fn take_body(input: &[u8], at: usize, remaining: &mut u64) -> usize {
    let available = (input.len() - at) as u64;
    let n = available.min(*remaining);
    *remaining -= n;
    // `n` is bounded by the slice length
    at + usize::try_from(n).unwrap_or(usize::MAX)
}

fn scan(input: &[u8], from: usize, pred: fn(u8) -> bool) -> usize {
    input[from..]
        .iter()
        .position(|&b| !pred(b))
        .map_or(input.len(), |p| from + p)
}

fn expect_lf(b: u8) -> Result<(), SyntaxError> {
    if b == LF {
        Ok(())
    } else {
        Err(SyntaxError::ExpectedLineFeed)
    }
}

fn digit(b: u8) -> Option<u8> {
    b.is_ascii_digit().then(|| b - b'0')
}

fn hex_digit(b: u8) -> Option<u8> {
    match b {
        b'0'..=b'9' => Some(b - b'0'),
        b'a'..=b'f' => Some(b - b'a' + 10),
        b'A'..=b'F' => Some(b - b'A' + 10),
        _ => None,
    }
}

fn is_token(b: u8) -> bool {
    b.is_ascii_alphanumeric() || b"!#$%&'*+-.^_`|~".contains(&b)
}

fn is_url(b: u8) -> bool {
    b > SP && b != 0x7f
}

/// Field content: visible ASCII, SP, HTAB and obs-text.
fn is_text(b: u8) -> bool {
    b == HT || (SP..0x7f).contains(&b) || b >= 0x80
}
