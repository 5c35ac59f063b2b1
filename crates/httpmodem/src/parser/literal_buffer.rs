/// Header names the tokenizer interprets.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KnownHeader {
    ContentLength,
    TransferEncoding,
    Connection,
}

/// Tokens the tokenizer interprets inside `Connection` and
/// `Transfer-Encoding` values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum KnownToken {
    Close,
    KeepAlive,
    Chunked,
}

pub(crate) const HEADER_NAMES: &[(&[u8], KnownHeader)] = &[
    (b"content-length", KnownHeader::ContentLength),
    (b"transfer-encoding", KnownHeader::TransferEncoding),
    (b"connection", KnownHeader::Connection),
];

pub(crate) const VALUE_TOKENS: &[(&[u8], KnownToken)] = &[
    (b"close", KnownToken::Close),
    (b"keep-alive", KnownToken::KeepAlive),
    (b"chunked", KnownToken::Chunked),
];

/// What happened after feeding one more byte into an exact-case matcher?
pub(crate) enum Step {
    /// Byte matched, but the literal is not finished yet.
    NeedMore,
    /// Byte matched *and* it was the last byte of the literal.
    Done,
    /// Byte did **not** match the expected byte.
    Reject,
}

/// `None`  ➜  no literal is in flight
/// `Some`  ➜  the bytes still expected
#[derive(Debug, Copy, Clone, PartialEq, Eq)]
pub(crate) struct ExpectedLiteralBuffer(Option<&'static [u8]>);

impl ExpectedLiteralBuffer {
    pub(crate) fn none() -> Self {
        ExpectedLiteralBuffer(None)
    }

    pub(crate) fn new(literal: &'static [u8]) -> Self {
        ExpectedLiteralBuffer(Some(literal))
    }

    /// Give the matcher the next input byte and learn what to do next.
    pub(crate) fn step(&mut self, b: u8) -> Step {
        let Some(bytes) = self.0.take() else {
            return Step::Reject;
        };
        match bytes.split_first() {
            Some((first, rest)) if *first == b => {
                if rest.is_empty() {
                    Step::Done
                } else {
                    self.0 = Some(rest);
                    Step::NeedMore
                }
            }
            _ => {
                self.0 = Some(bytes);
                Step::Reject
            }
        }
    }
}

/// Case-insensitive matcher over a small table of literals, fed one byte at a
/// time so a name split across input buffers still classifies.
#[derive(Debug, Clone, Copy)]
pub(crate) struct LiteralSet<T: Copy + 'static> {
    table: &'static [(&'static [u8], T)],
    alive: u32,
    pos: usize,
}

impl<T: Copy + 'static> LiteralSet<T> {
    pub(crate) fn new(table: &'static [(&'static [u8], T)]) -> Self {
        debug_assert!(table.len() <= 32);
        let mut set = Self {
            table,
            alive: 0,
            pos: 0,
        };
        set.reset();
        set
    }

    pub(crate) fn reset(&mut self) {
        self.alive = if self.table.len() == 32 {
            u32::MAX
        } else {
            (1u32 << self.table.len()) - 1
        };
        self.pos = 0;
    }

    pub(crate) fn step(&mut self, b: u8) {
        if self.alive == 0 {
            return;
        }
        let b = b.to_ascii_lowercase();
        for (i, (literal, _)) in self.table.iter().enumerate() {
            let bit = 1u32 << i;
            if self.alive & bit != 0 && literal.get(self.pos) != Some(&b) {
                self.alive &= !bit;
            }
        }
        self.pos += 1;
    }

    /// Kills every candidate; `matched` returns `None` until the next reset.
    pub(crate) fn reject(&mut self) {
        self.alive = 0;
    }

    pub(crate) fn is_started(&self) -> bool {
        self.pos > 0
    }

    pub(crate) fn matched(&self) -> Option<T> {
        self.table
            .iter()
            .enumerate()
            .find(|(i, (literal, _))| self.alive & (1u32 << *i) != 0 && literal.len() == self.pos)
            .map(|(_, (_, value))| *value)
    }
}
