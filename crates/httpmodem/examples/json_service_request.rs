//! Parses a JSON `POST` request in service mode and prints what the handler
//! sees: the request target, every header, the body, its declared length and
//! the protocol version.
//!
//! The request is fed in two slices, the way it might come off a socket, so
//! the body is assembled in the context's arena instead of being viewed in
//! place.
//!
//! Run with
//!
//! ```bash
//! cargo run -p httpmodem --example json_service_request
//! ```

use httpmodem::{HttpModem, Message, ParserOptions};

const REQUEST: &[u8] = b"POST /submit HTTP/1.1\r\n\
Host: example.com\r\n\
Content-Type: application/json\r\n\
Content-Length: 28\r\n\
\r\n\
{\"name\":\"John Doe\",\"age\":30}";

fn on_request(msg: &Message<'_>) {
    println!("URL: {}", msg.url());
    for header in msg.headers() {
        println!("Header: {}: {}", header.name, header.value);
    }
    println!("Body: {}", msg.body());
    println!(
        "Content Length: {}",
        msg.content_length().unwrap_or_default()
    );
    let (major, minor) = msg.http_version();
    println!("HTTP Version: {major}.{minor}");
}

fn main() {
    let options = ParserOptions {
        arena_capacity: 16 * 1024,
        ..Default::default()
    };
    let mut modem = HttpModem::service(on_request, options);

    let (head, body) = REQUEST.split_at(REQUEST.len() - 10);
    for part in [head, body] {
        if let Err(err) = modem.feed(part) {
            eprintln!("Error parsing HTTP request: {err}");
            return;
        }
    }
    println!("Arena high water: {} bytes", modem.arena().high_water());
}
