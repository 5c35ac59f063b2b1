//! Body assembly against a declared length.

use crate::{
    arena::Arena,
    parser::Fragment,
    span::{FirstFragment, Span},
};

/// Assembles one message body or one chunk.
///
/// With a declared length the first fragment is aliased when it already
/// holds the whole body; otherwise a buffer of the declared length is
/// allocated up front and later fragments are written into it. Bytes past the
/// declared length are discarded. Without a declared length fragments are
/// accumulated like any other field.
#[derive(Debug, Default)]
pub(crate) struct BodyAssembler {
    span: Span,
    expected: Option<usize>,
    cursor: usize,
    remaining: usize,
}

impl BodyAssembler {
    /// Latches the length of the body about to arrive and forgets any
    /// previous one.
    pub(crate) fn start(&mut self, expected: Option<usize>) {
        self.span = Span::Empty;
        self.expected = expected;
        self.cursor = 0;
        self.remaining = expected.unwrap_or(0);
    }

    pub(crate) fn on_fragment(&mut self, arena: &mut Arena, input: &[u8], fragment: Fragment) {
        let Some(expected) = self.expected else {
            self.span
                .append(arena, input, fragment, FirstFragment::Alias);
            return;
        };
        if fragment.is_empty() {
            return;
        }

        match self.span {
            Span::Empty => {
                if expected <= fragment.len {
                    self.span = Span::Input {
                        start: fragment.start,
                        len: expected,
                    };
                    self.cursor = expected;
                    self.remaining = 0;
                } else {
                    let buf = arena.alloc(expected);
                    arena.get_mut(buf)[..fragment.len].copy_from_slice(&input[fragment.range()]);
                    self.span = Span::Arena(buf);
                    self.cursor = fragment.len;
                    self.remaining = expected - fragment.len;
                }
            }
            Span::Arena(buf) => {
                let n = fragment.len.min(self.remaining);
                if n == 0 {
                    return;
                }
                let src = &input[fragment.start..fragment.start + n];
                arena.get_mut(buf)[self.cursor..self.cursor + n].copy_from_slice(src);
                self.cursor += n;
                self.remaining -= n;
            }
            // Already complete: the alias covers the declared length.
            Span::Input { .. } => {}
        }
    }

    pub(crate) fn promote(&mut self, arena: &mut Arena, input: &[u8]) {
        self.span.promote(arena, input);
    }

    pub(crate) fn clear(&mut self) {
        self.span = Span::Empty;
        self.cursor = 0;
        self.remaining = 0;
    }

    /// Bytes received so far, or the whole body once complete.
    pub(crate) fn bytes<'a>(&self, arena: &'a Arena, input: &'a [u8]) -> &'a [u8] {
        let bytes = self.span.resolve(arena, input);
        match self.span {
            Span::Arena(_) if self.expected.is_some() => &bytes[..self.cursor],
            _ => bytes,
        }
    }

    pub(crate) fn is_aliased(&self) -> bool {
        self.span.is_aliased()
    }

    #[cfg(test)]
    pub(crate) fn remaining(&self) -> usize {
        self.remaining
    }
}
