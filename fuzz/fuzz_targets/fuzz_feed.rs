#![no_main]
use std::cell::RefCell;

use arbitrary::{Arbitrary, Unstructured};
use httpmodem::{Handler, HttpModem, Message, MessageSnapshot, Mode, ParserOptions, split_at_offsets};
use libfuzzer_sys::{fuzz_mutator, fuzz_target, fuzzer_mutate};
use rand::rngs::SmallRng;
use rand::{Rng, RngCore, SeedableRng};

const HEADER: usize = 5; // 1 flag + 4-byte seed

thread_local! {
    static RNG: RefCell<SmallRng> =
        RefCell::new(SmallRng::from_os_rng());
}

static METHODS: &[&[u8]] = &[b"GET", b"POST", b"PUT", b"HEAD", b"DELETE", b"OPTIONS"];

static FRAMING: &[&[u8]] = &[
    b"Content-Length",
    b"Transfer-Encoding",
    b"Connection",
    b"content-length",
    b"TRANSFER-ENCODING",
];

fn with_rng<F, R>(f: F) -> R
where
    F: FnOnce(&mut SmallRng) -> R,
{
    RNG.with(|cell| f(&mut cell.borrow_mut()))
}

/// A message skeleton rendered onto the wire by the mutator, so the corpus
/// reaches bodies and chunks instead of stalling in the request line.
#[derive(Debug, Arbitrary)]
struct Wire {
    response: bool,
    method: u8,
    target: Vec<u8>,
    status: u16,
    headers: Vec<(u8, Vec<u8>, Vec<u8>)>,
    body: Vec<u8>,
    chunk_sizes: Option<Vec<u8>>,
}

impl Wire {
    fn render(&self, out: &mut Vec<u8>) {
        if self.response {
            out.extend_from_slice(format!("HTTP/1.1 {} OK\r\n", self.status % 1000).as_bytes());
        } else {
            out.extend_from_slice(METHODS[self.method as usize % METHODS.len()]);
            out.push(b' ');
            out.push(b'/');
            out.extend(self.target.iter().filter(|b| b.is_ascii_graphic()));
            out.extend_from_slice(b" HTTP/1.1\r\n");
        }
        for (kind, name, value) in &self.headers {
            match FRAMING.get(*kind as usize) {
                Some(name) => out.extend_from_slice(name),
                None => out.extend(name.iter().filter(|b| b.is_ascii_alphanumeric())),
            }
            out.extend_from_slice(b": ");
            out.extend(value.iter().filter(|b| b.is_ascii_graphic()));
            out.extend_from_slice(b"\r\n");
        }
        match &self.chunk_sizes {
            Some(sizes) => {
                out.extend_from_slice(b"Transfer-Encoding: chunked\r\n\r\n");
                let mut rest = self.body.as_slice();
                for &size in sizes {
                    let (chunk, tail) = rest.split_at((size as usize).min(rest.len()));
                    if chunk.is_empty() {
                        break;
                    }
                    out.extend_from_slice(format!("{:x}\r\n", chunk.len()).as_bytes());
                    out.extend_from_slice(chunk);
                    out.extend_from_slice(b"\r\n");
                    rest = tail;
                }
                out.extend_from_slice(b"0\r\n\r\n");
            }
            None => {
                out.extend_from_slice(format!("Content-Length: {}\r\n\r\n", self.body.len()).as_bytes());
                out.extend_from_slice(&self.body);
            }
        }
    }
}

fn mutator(data: &mut [u8], size: usize, max_size: usize, seed: u32) -> usize {
    if max_size < HEADER {
        return fuzzer_mutate(data, size, max_size);
    }
    if size < HEADER || seed.is_multiple_of(10) {
        data[0] = with_rng(|rng| rng.next_u32() as u8 & 0x03);
        data[1..5].copy_from_slice(&with_rng(|rng| rng.next_u32().to_le_bytes()));

        let mut out = Vec::new();
        let messages = with_rng(|rng| rng.random_range(1..=3));
        for _ in 0..messages {
            let len = with_rng(|rng| rng.random_range(16..256));
            let bytes: Vec<u8> = with_rng(|rng| (0..len).map(|_| rng.random::<u8>()).collect());
            if let Ok(wire) = Wire::arbitrary(&mut Unstructured::new(&bytes)) {
                wire.render(&mut out);
            }
        }

        let len = out.len().min(max_size.saturating_sub(HEADER));
        data[HEADER..HEADER + len].copy_from_slice(&out[..len]);
        HEADER + len
    } else {
        fuzzer_mutate(data, size, max_size)
    }
}

fuzz_mutator!(|data: &mut [u8], size: usize, max_size: usize, seed: u32| {
    mutator(data, size, max_size, seed)
});

#[derive(Debug, PartialEq, Default)]
struct Calls(Vec<(&'static str, MessageSnapshot)>);

impl Handler for Calls {
    fn on_message(&mut self, message: &Message<'_>) {
        self.0.push(("message", message.to_snapshot()));
    }

    fn on_chunk_encoding(&mut self, message: &Message<'_>) {
        self.0.push(("encoding", message.to_snapshot()));
    }

    fn on_chunk(&mut self, message: &Message<'_>) {
        self.0.push(("chunk", message.to_snapshot()));
    }

    fn on_chunk_complete(&mut self, message: &Message<'_>) {
        self.0.push(("end", message.to_snapshot()));
    }
}

fn run(mode: Mode, options: &ParserOptions, parts: &[&[u8]]) -> (Calls, bool) {
    let mut modem = HttpModem::new(mode, Calls::default(), *options);
    let mut ok = true;
    for part in parts {
        if modem.feed(part).is_err() {
            ok = false;
            break;
        }
    }
    if ok {
        ok = modem.finish().is_ok();
    }
    (modem.into_handler(), ok)
}

fn feed(data: &[u8]) {
    if data.len() < HEADER {
        return;
    }

    let flags = data[0];
    let split_seed = u32::from_le_bytes([data[1], data[2], data[3], data[4]]) as usize;
    let data = &data[HEADER..];

    let mode = if flags & 1 == 0 {
        Mode::Service
    } else {
        Mode::Client
    };
    let options = ParserOptions {
        arena_capacity: if flags & 2 == 0 { 0 } else { 4096 },
        panic_on_error: false,
        ..ParserOptions::default()
    };

    let offsets: Vec<usize> = (0..data.len())
        .map(|i| split_seed.rotate_left(i as u32 % usize::BITS))
        .collect();
    let parts = split_at_offsets(data, &offsets);

    let whole = run(mode, &options, &[data]);
    let split = run(mode, &options, &parts);

    // Errors may be reported at a different call, but every callback that
    // fired before the error must agree.
    if whole.1 && split.1 {
        assert_eq!(whole.0, split.0);
    } else {
        let n = whole.0.0.len().min(split.0.0.len());
        assert_eq!(whole.0.0[..n], split.0.0[..n]);
    }
}

fuzz_target!(|data: &[u8]| feed(data));
