use alloc::{string::String, vec::Vec};

use rstest::rstest;

use super::*;

#[derive(Debug, Clone, PartialEq, Eq)]
enum Event {
    Begin,
    Url(Vec<u8>),
    Status(Vec<u8>),
    Field(Vec<u8>),
    Value(Vec<u8>),
    HeadersComplete(HeadInfo),
    Body(Vec<u8>),
    ChunkHeader(u64),
    ChunkComplete,
    Complete,
}

/// Records events with fragment bytes resolved against the current input.
#[derive(Default)]
struct Recorder<'a> {
    input: &'a [u8],
    events: Vec<Event>,
}

impl Recorder<'_> {
    fn bytes(&self, fragment: Fragment) -> Vec<u8> {
        self.input[fragment.range()].to_vec()
    }
}

impl EventSink for Recorder<'_> {
    fn on_message_begin(&mut self) {
        self.events.push(Event::Begin);
    }
    fn on_url(&mut self, fragment: Fragment) {
        let b = self.bytes(fragment);
        self.events.push(Event::Url(b));
    }
    fn on_status(&mut self, fragment: Fragment) {
        let b = self.bytes(fragment);
        self.events.push(Event::Status(b));
    }
    fn on_header_field(&mut self, fragment: Fragment) {
        let b = self.bytes(fragment);
        self.events.push(Event::Field(b));
    }
    fn on_header_value(&mut self, fragment: Fragment) {
        let b = self.bytes(fragment);
        self.events.push(Event::Value(b));
    }
    fn on_headers_complete(&mut self, head: &HeadInfo) {
        self.events.push(Event::HeadersComplete(*head));
    }
    fn on_body(&mut self, fragment: Fragment) {
        let b = self.bytes(fragment);
        self.events.push(Event::Body(b));
    }
    fn on_chunk_header(&mut self, size: u64) {
        self.events.push(Event::ChunkHeader(size));
    }
    fn on_chunk_complete(&mut self) {
        self.events.push(Event::ChunkComplete);
    }
    fn on_message_complete(&mut self) {
        self.events.push(Event::Complete);
    }
}

fn run(kind: MessageKind, parts: &[&[u8]]) -> (Vec<Event>, Result<(), ParserError>) {
    let mut parser = Parser::new(kind, &ParserOptions::default());
    let mut events = Vec::new();
    for part in parts {
        let mut rec = Recorder {
            input: part,
            events: core::mem::take(&mut events),
        };
        let res = parser.execute(&mut rec, part);
        events = rec.events;
        if res.is_err() {
            return (events, res);
        }
    }
    let mut rec = Recorder {
        input: b"",
        events,
    };
    let res = parser.finish(&mut rec);
    (rec.events, res)
}

fn request(parts: &[&[u8]]) -> Vec<Event> {
    let (events, res) = run(MessageKind::Request, parts);
    res.unwrap();
    events
}

fn error_of(kind: MessageKind, input: &[u8]) -> SyntaxError {
    run(kind, &[input]).1.unwrap_err().kind().clone()
}

/// Joins adjacent fragments of the same field so assertions do not depend on
/// where the input was split.
fn coalesce(events: Vec<Event>) -> Vec<Event> {
    let mut out: Vec<Event> = Vec::new();
    for event in events {
        match (out.last_mut(), event) {
            (Some(Event::Url(a)), Event::Url(b))
            | (Some(Event::Status(a)), Event::Status(b))
            | (Some(Event::Field(a)), Event::Field(b))
            | (Some(Event::Value(a)), Event::Value(b))
            | (Some(Event::Body(a)), Event::Body(b)) => a.extend_from_slice(&b),
            (_, event) => out.push(event),
        }
    }
    out
}

fn head(framing: BodyFraming, keep_alive: bool) -> HeadInfo {
    HeadInfo {
        method: None,
        status_code: 0,
        http_major: 1,
        http_minor: 1,
        content_length: match framing {
            BodyFraming::ContentLength(n) => Some(n),
            _ => None,
        },
        keep_alive,
        chunked: framing == BodyFraming::Chunked,
        framing,
    }
}

#[test]
fn simple_get() {
    let events = request(&[b"GET /index.html HTTP/1.1\r\nHost: example.com\r\n\r\n"]);
    assert_eq!(
        events,
        [
            Event::Begin,
            Event::Url(b"/index.html".to_vec()),
            Event::Field(b"Host".to_vec()),
            Event::Value(b"example.com".to_vec()),
            Event::HeadersComplete(HeadInfo {
                method: Some(Method::Get),
                ..head(BodyFraming::None, true)
            }),
            Event::Complete,
        ]
    );
}

#[test]
fn fragments_follow_the_input_split() {
    let events = request(&[b"GET /in", b"dex HTTP/1.1\r\nHo", b"st: exa", b"mple\r\n\r\n"]);
    assert_eq!(events[1], Event::Url(b"/in".to_vec()));
    assert_eq!(events[2], Event::Url(b"dex".to_vec()));
    assert_eq!(events[3], Event::Field(b"Ho".to_vec()));
    assert_eq!(events[4], Event::Field(b"st".to_vec()));
    assert_eq!(events[5], Event::Value(b"exa".to_vec()));
    assert_eq!(events[6], Event::Value(b"mple".to_vec()));
}

#[test]
fn byte_at_a_time_matches_single_feed() {
    let input: &[u8] = b"POST /submit HTTP/1.1\r\nContent-Length: 5\r\nX-A: 1\r\n\r\nhello";
    let whole = coalesce(request(&[input]));
    let bytes: Vec<&[u8]> = input.chunks(1).collect();
    let split = coalesce(request(&bytes));
    assert_eq!(whole, split);
    assert_eq!(whole[whole.len() - 2], Event::Body(b"hello".to_vec()));
}

#[test]
fn empty_header_value_is_reported() {
    let events = request(&[b"GET / HTTP/1.1\r\nX-Empty:\r\nX-Blank:   \r\n\r\n"]);
    assert_eq!(
        &events[2..6],
        [
            Event::Field(b"X-Empty".to_vec()),
            Event::Value(Vec::new()),
            Event::Field(b"X-Blank".to_vec()),
            Event::Value(Vec::new()),
        ]
    );
}

#[test]
fn header_value_keeps_trailing_whitespace() {
    let events = request(&[b"GET / HTTP/1.1\r\nX-A:  padded \t\r\n\r\n"]);
    assert_eq!(events[3], Event::Value(b"padded \t".to_vec()));
}

#[test]
fn leading_blank_lines_are_skipped() {
    let events = request(&[b"\r\n\r\nGET / HTTP/1.1\r\n\r\n"]);
    assert_eq!(events[0], Event::Begin);
    assert_eq!(events.last(), Some(&Event::Complete));
}

#[test]
fn content_length_body() {
    let events = request(&[b"POST / HTTP/1.1\r\nContent-Length: 3\r\n\r\nab", b"c"]);
    assert_eq!(
        &events[events.len() - 3..],
        [
            Event::Body(b"ab".to_vec()),
            Event::Body(b"c".to_vec()),
            Event::Complete,
        ]
    );
}

#[test]
fn chunked_body_events() {
    let events = request(&[
        b"POST / HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\n",
        b"3;ext=1\r\nabc\r\n",
        b"0\r\nX-Trailer: yes\r\n\r\n",
    ]);
    assert_eq!(
        &events[4..],
        [
            Event::HeadersComplete(HeadInfo {
                method: Some(Method::Post),
                ..head(BodyFraming::Chunked, true)
            }),
            Event::ChunkHeader(3),
            Event::Body(b"abc".to_vec()),
            Event::ChunkComplete,
            Event::ChunkHeader(0),
            Event::ChunkComplete,
            Event::Complete,
        ]
    );
}

#[test]
fn pipelined_requests() {
    let events = request(&[b"GET /a HTTP/1.1\r\n\r\nGET /b HTTP/1.1\r\n\r\n"]);
    let urls: Vec<_> = events
        .iter()
        .filter_map(|e| match e {
            Event::Url(u) => Some(u.clone()),
            _ => None,
        })
        .collect();
    assert_eq!(urls, [b"/a".to_vec(), b"/b".to_vec()]);
    assert_eq!(events.iter().filter(|e| **e == Event::Complete).count(), 2);
}

#[test]
fn response_with_reason_and_length() {
    let (events, res) = run(
        MessageKind::Response,
        &[b"HTTP/1.1 200 OK\r\nContent-Length: 2\r\n\r\nhi"],
    );
    res.unwrap();
    assert_eq!(events[1], Event::Status(b"OK".to_vec()));
    assert_eq!(
        events[4],
        Event::HeadersComplete(HeadInfo {
            status_code: 200,
            ..head(BodyFraming::ContentLength(2), true)
        })
    );
}

#[test]
fn response_without_length_reads_until_eof() {
    let (events, res) = run(
        MessageKind::Response,
        &[b"HTTP/1.1 200 OK\r\n\r\nsome", b" bytes"],
    );
    res.unwrap();
    assert_eq!(
        coalesce(events)[2..],
        [
            Event::HeadersComplete(HeadInfo {
                status_code: 200,
                ..head(BodyFraming::UntilEof, false)
            }),
            Event::Body(b"some bytes".to_vec()),
            Event::Complete,
        ]
    );
}

#[rstest]
#[case(b"HTTP/1.1 204 No Content\r\n\r\n")]
#[case(b"HTTP/1.1 304 Not Modified\r\nContent-Length: 10\r\n\r\n")]
#[case(b"HTTP/1.1 101 Switching\r\n\r\n")]
fn bodiless_statuses(#[case] input: &[u8]) {
    let (events, res) = run(MessageKind::Response, &[input]);
    res.unwrap();
    assert_eq!(events.last(), Some(&Event::Complete));
    assert!(!events.iter().any(|e| matches!(e, Event::Body(_))));
}

#[test]
fn status_line_without_reason() {
    let (events, res) = run(MessageKind::Response, &[b"HTTP/1.1 204\r\n\r\n"]);
    res.unwrap();
    assert!(!events.iter().any(|e| matches!(e, Event::Status(_))));
}

#[rstest]
#[case(b"GET / HTTP/1.0\r\n\r\n", false)]
#[case(b"GET / HTTP/1.0\r\nConnection: keep-alive\r\n\r\n", true)]
#[case(b"GET / HTTP/1.1\r\n\r\n", true)]
#[case(b"GET / HTTP/1.1\r\nConnection: Upgrade, close\r\n\r\n", false)]
#[case(b"GET / HTTP/1.1\r\nConnection: closed\r\n\r\n", true)]
fn keep_alive_rules(#[case] input: &[u8], #[case] expected: bool) {
    let events = request(&[input]);
    let keep_alive = events.iter().find_map(|e| match e {
        Event::HeadersComplete(h) => Some(h.keep_alive),
        _ => None,
    });
    assert_eq!(keep_alive, Some(expected));
}

#[test]
fn data_after_close_is_rejected() {
    let err = error_of(
        MessageKind::Request,
        b"GET / HTTP/1.1\r\nConnection: close\r\n\r\nGET / HTTP/1.1\r\n\r\n",
    );
    assert_eq!(err, SyntaxError::DataAfterClose);
}

#[rstest]
#[case(b"BREW / HTTP/1.1\r\n\r\n", SyntaxError::InvalidMethod)]
#[case(b"get / HTTP/1.1\r\n\r\n", SyntaxError::InvalidMethod)]
#[case(b"GET / HTTP/2.0\r\n\r\n", SyntaxError::InvalidVersion)]
#[case(b"GET / HXTP/1.1\r\n\r\n", SyntaxError::InvalidVersion)]
#[case(b"GET  / HTTP/1.1\r\n\r\n", SyntaxError::InvalidUrl)]
#[case(b"GET / HTTP/1.1\r\nBad Name: x\r\n\r\n", SyntaxError::InvalidHeaderToken(b' '))]
#[case(b"GET / HTTP/1.1\r\nX: a\x01b\r\n\r\n", SyntaxError::InvalidHeaderValue(0x01))]
#[case(b"GET / HTTP/1.1\r\n folded\r\n\r\n", SyntaxError::InvalidHeaderToken(b' '))]
#[case(b"GET / HTTP/1.1\r\nContent-Length: 1x\r\n\r\n", SyntaxError::InvalidContentLength)]
#[case(b"GET / HTTP/1.1\r\nContent-Length:\r\n\r\n", SyntaxError::InvalidContentLength)]
#[case(b"GET / HTTP/1.1\r\nContent-Length: 1 2\r\n\r\n", SyntaxError::InvalidContentLength)]
#[case(
    b"GET / HTTP/1.1\r\nContent-Length: 1\r\nContent-Length: 1\r\n\r\n",
    SyntaxError::DuplicateContentLength
)]
#[case(
    b"POST / HTTP/1.1\r\nTransfer-Encoding: gzip\r\n\r\n",
    SyntaxError::InvalidTransferEncoding
)]
#[case(
    b"POST / HTTP/1.1\r\nTransfer-Encoding: chunked\r\nContent-Length: 3\r\n\r\n",
    SyntaxError::AmbiguousBodyLength
)]
#[case(
    b"POST / HTTP/1.1\r\nTransfer-Encoding: chunked\r\n\r\nzz\r\n",
    SyntaxError::InvalidChunkSize
)]
#[case(b"GET / HTTP/1.1\r\r\n", SyntaxError::ExpectedLineFeed)]
fn request_errors(#[case] input: &[u8], #[case] expected: SyntaxError) {
    assert_eq!(error_of(MessageKind::Request, input), expected);
}

#[rstest]
#[case(b"HTTP/1.1 20 OK\r\n\r\n", SyntaxError::InvalidStatus)]
#[case(b"HTTP/1.1 099 Low\r\n\r\n", SyntaxError::InvalidStatus)]
#[case(b"HTTP/1.1 2000 OK\r\n\r\n", SyntaxError::InvalidStatus)]
#[case(b"HTTP/1.2 200 OK\r\n\r\n", SyntaxError::InvalidVersion)]
fn response_errors(#[case] input: &[u8], #[case] expected: SyntaxError) {
    assert_eq!(error_of(MessageKind::Response, input), expected);
}

#[test]
fn truncated_message_fails_on_finish() {
    let (_, res) = run(MessageKind::Request, &[b"GET / HTTP/1.1\r\nHost"]);
    assert_eq!(res.unwrap_err().kind(), &SyntaxError::UnexpectedEndOfInput);

    let (_, res) = run(
        MessageKind::Request,
        &[b"POST / HTTP/1.1\r\nContent-Length: 4\r\n\r\nab"],
    );
    assert_eq!(res.unwrap_err().kind(), &SyntaxError::UnexpectedEndOfInput);
}

#[test]
fn error_offset_counts_across_feeds() {
    let (_, res) = run(MessageKind::Request, &[b"GET / HT", b"XP/1.1\r\n\r\n"]);
    let err = res.unwrap_err();
    assert_eq!(err.kind(), &SyntaxError::InvalidVersion);
    assert_eq!(err.offset(), 8);
    assert_eq!(
        alloc::format!("{err}"),
        String::from("invalid HTTP version at byte 8")
    );
}

#[test]
fn errors_are_sticky_until_reset() {
    let mut parser = Parser::new(MessageKind::Request, &ParserOptions::default());
    let mut rec = Recorder::default();
    let first = parser.execute(&mut rec, b"BREW ").unwrap_err();
    let events_after_error = rec.events.len();
    let again = parser.execute(&mut rec, b"GET / HTTP/1.1\r\n\r\n").unwrap_err();
    assert_eq!(first, again);
    assert_eq!(rec.events.len(), events_after_error);
    assert!(parser.is_failed());

    parser.reset();
    let input: &[u8] = b"GET / HTTP/1.1\r\n\r\n";
    let mut rec = Recorder {
        input,
        events: Vec::new(),
    };
    parser.execute(&mut rec, input).unwrap();
    assert_eq!(rec.events.last(), Some(&Event::Complete));
}

#[test]
fn head_size_limit() {
    let options = ParserOptions {
        max_head_size: 32,
        ..Default::default()
    };
    let mut parser = Parser::new(MessageKind::Request, &options);
    let input: &[u8] = b"GET / HTTP/1.1\r\nX-Long: aaaaaaaaaaaaaaaaaaaaaaaa\r\n\r\n";
    let mut rec = Recorder {
        input,
        events: Vec::new(),
    };
    let err = parser.execute(&mut rec, input).unwrap_err();
    assert_eq!(err.kind(), &SyntaxError::HeadersTooLarge { limit: 32 });
}

#[test]
fn body_size_limit() {
    let options = ParserOptions {
        max_content_length: 10,
        ..Default::default()
    };
    let mut parser = Parser::new(MessageKind::Request, &options);
    let input: &[u8] = b"POST / HTTP/1.1\r\nContent-Length: 11\r\n\r\n";
    let mut rec = Recorder {
        input,
        events: Vec::new(),
    };
    let err = parser.execute(&mut rec, input).unwrap_err();
    assert_eq!(err.kind(), &SyntaxError::BodyTooLarge { limit: 10 });
}

#[test]
#[should_panic(expected = "Syntax error")]
fn panic_on_error_panics() {
    let options = ParserOptions {
        panic_on_error: true,
        ..Default::default()
    };
    let mut parser = Parser::new(MessageKind::Request, &options);
    let _ = parser.execute(&mut Recorder::default(), b"BREW / HTTP/1.1\r\n");
}
