//! Bump arena backing every owned byte buffer of a parsing context.
//!
//! The arena is one growable byte buffer. Allocations are handed out as
//! [`ArenaSpan`] offset/length pairs rather than references, so growing the
//! buffer never invalidates a live span and the borrow checker never has to
//! reason about self-references between the context and its arena.
//!
//! Reclamation is coarse: [`Arena::restore`] frees everything allocated since
//! a [`Checkpoint`], [`Arena::clear`] frees everything. Spans allocated after
//! a checkpoint must not be read after the matching restore; the chunk
//! coordinator is the only caller that restores and it drops its body span
//! first.

use alloc::vec::Vec;

/// Pool size used when a context is created with a zero arena capacity.
pub const DEFAULT_ARENA_CAPACITY: usize = 4096;

/// A region of the arena, addressed by offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) struct ArenaSpan {
    start: usize,
    len: usize,
}

impl ArenaSpan {
    #[inline]
    pub(crate) fn start(self) -> usize {
        self.start
    }

    #[inline]
    pub(crate) fn len(self) -> usize {
        self.len
    }

    #[inline]
    fn end(self) -> usize {
        self.start + self.len
    }
}

/// Marker returned by [`Arena::checkpoint`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub struct Checkpoint(usize);

/// Byte arena with checkpoint/restore and bulk clear.
#[derive(Debug)]
pub struct Arena {
    buf: Vec<u8>,
    high_water: usize,
}

impl Arena {
    /// Creates an arena whose backing buffer starts with `capacity` bytes.
    /// A zero capacity selects [`DEFAULT_ARENA_CAPACITY`].
    #[must_use]
    pub fn with_capacity(capacity: usize) -> Self {
        let capacity = if capacity == 0 {
            DEFAULT_ARENA_CAPACITY
        } else {
            capacity
        };
        Self {
            buf: Vec::with_capacity(capacity),
            high_water: 0,
        }
    }

    /// Bytes currently allocated.
    #[must_use]
    pub fn used(&self) -> usize {
        self.buf.len()
    }

    /// Size of the backing buffer.
    #[must_use]
    pub fn capacity(&self) -> usize {
        self.buf.capacity()
    }

    /// Largest number of bytes ever allocated at once since creation.
    #[must_use]
    pub fn high_water(&self) -> usize {
        self.high_water
    }

    /// Allocates `len` zeroed bytes.
    pub(crate) fn alloc(&mut self, len: usize) -> ArenaSpan {
        let start = self.buf.len();
        self.buf.resize(start + len, 0);
        self.note_usage();
        ArenaSpan { start, len }
    }

    /// Allocates a copy of `bytes`.
    pub(crate) fn alloc_copy(&mut self, bytes: &[u8]) -> ArenaSpan {
        let start = self.buf.len();
        self.buf.extend_from_slice(bytes);
        self.note_usage();
        ArenaSpan {
            start,
            len: bytes.len(),
        }
    }

    /// Returns a span holding `head` followed by `tail`.
    ///
    /// When `head` is the most recent allocation it is grown in place;
    /// otherwise the full concatenation is copied to the top of the arena and
    /// the old region stays allocated until the next restore or clear.
    pub(crate) fn concat(&mut self, head: ArenaSpan, tail: &[u8]) -> ArenaSpan {
        if head.end() == self.buf.len() {
            self.buf.extend_from_slice(tail);
            self.note_usage();
            return ArenaSpan {
                start: head.start,
                len: head.len + tail.len(),
            };
        }
        let start = self.buf.len();
        self.buf.extend_from_within(head.start..head.end());
        self.buf.extend_from_slice(tail);
        self.note_usage();
        ArenaSpan {
            start,
            len: head.len + tail.len(),
        }
    }

    #[inline]
    pub(crate) fn get(&self, span: ArenaSpan) -> &[u8] {
        &self.buf[span.start..span.end()]
    }

    #[inline]
    pub(crate) fn get_mut(&mut self, span: ArenaSpan) -> &mut [u8] {
        &mut self.buf[span.start..span.end()]
    }

    /// Remembers the current top of the arena.
    #[must_use]
    pub fn checkpoint(&self) -> Checkpoint {
        Checkpoint(self.buf.len())
    }

    /// Frees everything allocated since `checkpoint`.
    ///
    /// The checkpoint must not be older than the last [`Arena::clear`] or a
    /// deeper restore; debug builds assert this.
    pub fn restore(&mut self, checkpoint: Checkpoint) {
        debug_assert!(
            checkpoint.0 <= self.buf.len(),
            "restore past the top of the arena"
        );
        self.buf.truncate(checkpoint.0);
    }

    /// Frees every allocation. The backing buffer is kept for reuse.
    pub fn clear(&mut self) {
        self.buf.clear();
    }

    fn note_usage(&mut self) {
        self.high_water = self.high_water.max(self.buf.len());
    }
}

impl Default for Arena {
    fn default() -> Self {
        Self::with_capacity(DEFAULT_ARENA_CAPACITY)
    }
}
