//! Byte spans that either alias the current input or live in the arena.

use crate::arena::{Arena, ArenaSpan};
use crate::parser::Fragment;

/// How the first fragment of a field is stored.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum FirstFragment {
    /// Reference the input in place.
    Alias,
    /// Copy into the arena right away.
    Copy,
}

/// Accumulated value of one lexical field.
///
/// `Input` spans index the slice handed to the current `feed` call and must
/// be promoted before that call returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub(crate) enum Span {
    #[default]
    Empty,
    Input {
        start: usize,
        len: usize,
    },
    Arena(ArenaSpan),
}

impl Span {
    /// Appends `fragment` of `input` to the span.
    ///
    /// An empty span takes the first fragment as an alias or a copy according
    /// to `first`. Any later fragment turns the span into one arena buffer
    /// holding the concatenation.
    pub(crate) fn append(
        &mut self,
        arena: &mut Arena,
        input: &[u8],
        fragment: Fragment,
        first: FirstFragment,
    ) {
        if fragment.is_empty() {
            return;
        }
        let bytes = &input[fragment.range()];
        *self = match *self {
            Span::Empty => match first {
                FirstFragment::Alias => Span::Input {
                    start: fragment.start,
                    len: fragment.len,
                },
                FirstFragment::Copy => Span::Arena(arena.alloc_copy(bytes)),
            },
            Span::Input { start, len } => {
                let head = arena.alloc_copy(&input[start..start + len]);
                Span::Arena(arena.concat(head, bytes))
            }
            Span::Arena(head) => Span::Arena(arena.concat(head, bytes)),
        };
    }

    /// Copies an input alias into the arena. Other spans are left alone.
    pub(crate) fn promote(&mut self, arena: &mut Arena, input: &[u8]) {
        if let Span::Input { start, len } = *self {
            *self = Span::Arena(arena.alloc_copy(&input[start..start + len]));
        }
    }

    pub(crate) fn resolve<'a>(&self, arena: &'a Arena, input: &'a [u8]) -> &'a [u8] {
        match *self {
            Span::Empty => &[],
            Span::Input { start, len } => &input[start..start + len],
            Span::Arena(span) => arena.get(span),
        }
    }

    pub(crate) fn len(&self) -> usize {
        match *self {
            Span::Empty => 0,
            Span::Input { len, .. } => len,
            Span::Arena(span) => span.len(),
        }
    }

    pub(crate) fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub(crate) fn is_aliased(&self) -> bool {
        matches!(self, Span::Input { .. })
    }
}
