//! Incremental HTTP/1.x message assembly.
//!
//! `httpmodem` turns a byte stream into complete HTTP messages while copying
//! as little as possible. A built-in tokenizer reports every field as byte
//! ranges of the input it was just given; the composition layer on top pairs
//! header keys with values, assembles bodies against their declared length
//! and hands each finished message to a [`Handler`] as a borrowed
//! [`Message`] view.
//!
//! Fields that arrive whole within one [`HttpModem::feed`] call are viewed in
//! place. Anything that must survive the call is copied into an arena owned by
//! the context, reclaimed in bulk when the next message begins and, for
//! chunked bodies, after every chunk.

#![no_std]
#![allow(missing_docs)]
extern crate alloc;

#[cfg(test)]
extern crate std;

mod arena;
mod body;
mod chunk;
mod chunk_utils;
mod context;
mod headers;
mod parser;
mod session;
mod span;

#[cfg(test)]
mod tests;

pub use arena::{Arena, Checkpoint, DEFAULT_ARENA_CAPACITY};
pub use chunk_utils::{produce_chunks, split_at_offsets};
pub use context::{Message, MessageSnapshot, Mode};
pub use headers::{Header, Headers};
pub use parser::{
    BodyFraming, EventSink, Fragment, HeadInfo, MessageKind, Method, Parser, ParserError,
    ParserOptions, SyntaxError,
};
pub use session::{Handler, HttpModem};
