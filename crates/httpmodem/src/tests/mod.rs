
use alloc::vec::Vec;

use crate::{Handler, HttpModem, Message, MessageSnapshot, ParserError, ParserOptions};

#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) enum Call {
    Message(MessageSnapshot),
    ChunkEncoding(MessageSnapshot),
    Chunk(MessageSnapshot),
    ChunkComplete(MessageSnapshot),
}

/// Handler that snapshots every callback.
#[derive(Debug, Default)]
pub(crate) struct Recorder {
    pub(crate) calls: Vec<Call>,
    /// `body_is_borrowed` for every `on_message` and `on_chunk` call.
    pub(crate) borrowed: Vec<bool>,
}

impl Recorder {
    pub(crate) fn messages(&self) -> Vec<&MessageSnapshot> {
        self.calls
            .iter()
            .filter_map(|c| match c {
                Call::Message(m) => Some(m),
                _ => None,
            })
            .collect()
    }
}

impl Handler for Recorder {
    fn on_message(&mut self, message: &Message<'_>) {
        self.borrowed.push(message.body_is_borrowed());
        self.calls.push(Call::Message(message.to_snapshot()));
    }

    fn on_chunk_encoding(&mut self, message: &Message<'_>) {
        self.calls.push(Call::ChunkEncoding(message.to_snapshot()));
    }

    fn on_chunk(&mut self, message: &Message<'_>) {
        self.borrowed.push(message.body_is_borrowed());
        self.calls.push(Call::Chunk(message.to_snapshot()));
    }

    fn on_chunk_complete(&mut self, message: &Message<'_>) {
        self.calls.push(Call::ChunkComplete(message.to_snapshot()));
    }
}

pub(crate) fn service() -> HttpModem<Recorder> {
    HttpModem::service(Recorder::default(), ParserOptions::default())
}

pub(crate) fn client() -> HttpModem<Recorder> {
    HttpModem::client(Recorder::default(), ParserOptions::default())
}

/// Feeds every part, then signals end of input.
pub(crate) fn feed_all(modem: &mut HttpModem<Recorder>, parts: &[&[u8]]) -> Result<(), ParserError> {
    for part in parts {
        modem.feed(part)?;
    }
    modem.finish()
}
