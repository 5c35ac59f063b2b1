#![allow(missing_docs)]
#![allow(dead_code)]

use core::fmt::Write;

use httpmodem::{Handler, HttpModem, Message, Method, Mode, ParserOptions};

pub const JSON_POST: &[u8] = b"POST /submit HTTP/1.1\r\n\
Host: api.example.com\r\n\
Content-Type: application/json\r\n\
Content-Length: 25\r\n\
\r\n\
{\"id\":1,\"tags\":[\"a\",\"b\"]}";

// The same request as a socket might deliver it, cut inside the url, a
// header name, a header value and the body.
#[rustfmt::skip]
pub const STREAM: [&[u8]; 6] = [
    b"POST /sub",                                                     // url
    b"mit HTTP/1.1\r\nHo",                                            // url ends, name starts
    b"st: api.exa",                                                   // name ends, value starts
    b"mple.com\r\nContent-Type: application/json\r\nContent-Len",     // value ends
    b"gth: 25\r\n\r\n{\"id\":1,",                                     // body starts
    b"\"tags\":[\"a\",\"b\"]}",                                       // body ends
];

#[rustfmt::skip]
pub const CHUNKED_UPLOAD: [&[u8]; 4] = [
    b"POST /upload HTTP/1.1\r\nHost: files\r\nTransfer-Encoding: chunked\r\n\r\n",
    b"4\r\nwiki\r\n5\r\npe",
    b"dia\r\n",
    b"0\r\nChecksum: none\r\n\r\n",
];

/// Handler that renders every callback as text.
#[derive(Debug, Default)]
pub struct Render {
    pub out: String,
}

impl Render {
    fn start_line(&mut self, label: &str, msg: &Message<'_>) {
        let (major, minor) = msg.http_version();
        match msg.mode() {
            Mode::Service => writeln!(
                self.out,
                "{label} {} {} HTTP/{major}.{minor} keep_alive={}",
                msg.method().map_or("?", Method::as_str),
                msg.url(),
                msg.keep_alive(),
            ),
            Mode::Client => writeln!(
                self.out,
                "{label} HTTP/{major}.{minor} {} {} keep_alive={}",
                msg.status_code(),
                msg.status(),
                msg.keep_alive(),
            ),
        }
        .unwrap();
        for header in msg.headers() {
            writeln!(self.out, "  {}: {}", header.name, header.value).unwrap();
        }
    }
}

impl Handler for Render {
    fn on_message(&mut self, msg: &Message<'_>) {
        self.start_line("message", msg);
        if msg.body().is_empty() {
            writeln!(self.out, "  no body").unwrap();
            return;
        }
        let ownership = if msg.body_is_borrowed() {
            "borrowed"
        } else {
            "owned"
        };
        writeln!(
            self.out,
            "  body ({} bytes, {ownership}): {}",
            msg.body().len(),
            msg.body()
        )
        .unwrap();
    }

    fn on_chunk_encoding(&mut self, msg: &Message<'_>) {
        self.start_line("chunk-encoding", msg);
    }

    fn on_chunk(&mut self, msg: &Message<'_>) {
        writeln!(self.out, "chunk ({} bytes): {}", msg.body().len(), msg.body()).unwrap();
    }

    fn on_chunk_complete(&mut self, msg: &Message<'_>) {
        writeln!(self.out, "chunk-complete ({} bytes)", msg.body().len()).unwrap();
    }
}

pub fn render(mode: Mode, parts: &[&[u8]]) -> String {
    let mut modem = HttpModem::new(mode, Render::default(), ParserOptions::default());
    for part in parts {
        modem.feed(part).expect("feed");
    }
    modem.finish().expect("finish");
    modem.into_handler().out
}
