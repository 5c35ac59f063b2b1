//! Chunk-scoped arena reuse for chunked transfer bodies.

use tracing::trace;

use crate::{
    arena::{Arena, Checkpoint},
    body::BodyAssembler,
};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum ChunkState {
    #[default]
    Idle,
    Open,
    Closed,
}

/// Tracks chunk boundaries and reclaims each chunk's buffer before the next
/// one starts.
///
/// The reclaim point is taken once, after the message head has been moved
/// into the arena, so restoring it never touches url, status or headers.
#[derive(Debug, Default)]
pub(crate) struct ChunkCoordinator {
    state: ChunkState,
    mark: Option<Checkpoint>,
    end_signalled: bool,
    chunks: usize,
}

impl ChunkCoordinator {
    /// Takes the reclaim point for this message's chunks.
    pub(crate) fn arm(&mut self, arena: &Arena) {
        self.state = ChunkState::Idle;
        self.mark = Some(arena.checkpoint());
        self.end_signalled = false;
        self.chunks = 0;
    }

    /// Starts a chunk of `size` bytes. Returns `true` for the zero-size chunk
    /// that ends the body.
    pub(crate) fn open(&mut self, arena: &mut Arena, body: &mut BodyAssembler, size: usize) -> bool {
        self.reclaim(arena, body);
        body.start(Some(size));
        if size == 0 {
            trace!(chunks = self.chunks, "last chunk");
            self.state = ChunkState::Closed;
            self.end_signalled = true;
            true
        } else {
            self.chunks += 1;
            self.state = ChunkState::Open;
            false
        }
    }

    /// Ends the current chunk once its callback has run.
    pub(crate) fn close(&mut self, arena: &mut Arena, body: &mut BodyAssembler) {
        self.reclaim(arena, body);
        if self.state == ChunkState::Open {
            self.state = ChunkState::Idle;
        }
    }

    fn reclaim(&mut self, arena: &mut Arena, body: &mut BodyAssembler) {
        body.clear();
        if let Some(mark) = self.mark {
            trace!(used = arena.used(), "restoring chunk checkpoint");
            arena.restore(mark);
        }
    }

    pub(crate) fn state(&self) -> ChunkState {
        self.state
    }

    /// Marks the end of the body as signalled. Returns `false` if it already
    /// was.
    pub(crate) fn take_end(&mut self) -> bool {
        !core::mem::replace(&mut self.end_signalled, true)
    }

    pub(crate) fn reset(&mut self) {
        *self = Self::default();
    }
}
