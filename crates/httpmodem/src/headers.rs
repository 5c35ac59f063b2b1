//! Header assembly: pairs key and value fragments into ordered records.

use alloc::vec::Vec;
use core::{iter::FusedIterator, slice};

use bstr::{BStr, ByteSlice};

use crate::{
    arena::Arena,
    parser::Fragment,
    span::{FirstFragment, Span},
};

#[derive(Debug, Clone, Copy)]
pub(crate) struct HeaderRecord {
    name: Span,
    value: Span,
}

/// Buffers the pending key/value pair and commits it once the next key
/// begins or the header section ends.
#[derive(Debug, Default)]
pub(crate) struct HeaderAssembler {
    key: Span,
    value: Span,
    last_was_value: bool,
    records: Vec<HeaderRecord>,
}

impl HeaderAssembler {
    pub(crate) fn on_field(&mut self, arena: &mut Arena, input: &[u8], fragment: Fragment) {
        if self.last_was_value {
            self.commit();
        }
        self.key
            .append(arena, input, fragment, FirstFragment::Alias);
        self.last_was_value = false;
    }

    pub(crate) fn on_value(&mut self, arena: &mut Arena, input: &[u8], fragment: Fragment) {
        self.value
            .append(arena, input, fragment, FirstFragment::Alias);
        self.last_was_value = true;
    }

    /// Commits the pair still pending when the header section ends.
    pub(crate) fn finish(&mut self) {
        self.commit();
    }

    fn commit(&mut self) {
        let name = core::mem::take(&mut self.key);
        let value = core::mem::take(&mut self.value);
        self.last_was_value = false;
        if name.is_empty() {
            return;
        }
        self.records.push(HeaderRecord { name, value });
    }

    pub(crate) fn promote(&mut self, arena: &mut Arena, input: &[u8]) {
        self.key.promote(arena, input);
        self.value.promote(arena, input);
        for record in &mut self.records {
            record.name.promote(arena, input);
            record.value.promote(arena, input);
        }
    }

    /// Drops every record and the pending pair; keeps the record buffer.
    pub(crate) fn reset(&mut self) {
        self.key = Span::Empty;
        self.value = Span::Empty;
        self.last_was_value = false;
        self.records.clear();
    }

    pub(crate) fn len(&self) -> usize {
        self.records.len()
    }

    pub(crate) fn iter<'a>(&'a self, arena: &'a Arena, input: &'a [u8]) -> Headers<'a> {
        Headers {
            records: self.records.iter(),
            arena,
            input,
        }
    }
}

/// One committed header line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header<'a> {
    pub name: &'a BStr,
    pub value: &'a BStr,
}

impl Header<'_> {
    /// Case-insensitive comparison of the header name.
    #[must_use]
    pub fn is(&self, name: &str) -> bool {
        self.name.eq_ignore_ascii_case(name.as_bytes())
    }
}

/// Iterator over the headers of a [`Message`](crate::Message), in arrival
/// order. Repeated names are yielded once per occurrence.
#[derive(Debug, Clone)]
pub struct Headers<'a> {
    records: slice::Iter<'a, HeaderRecord>,
    arena: &'a Arena,
    input: &'a [u8],
}

impl<'a> Headers<'a> {
    fn header(&self, record: &HeaderRecord) -> Header<'a> {
        Header {
            name: record.name.resolve(self.arena, self.input).as_bstr(),
            value: record.value.resolve(self.arena, self.input).as_bstr(),
        }
    }
}

impl<'a> Iterator for Headers<'a> {
    type Item = Header<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let record = self.records.next()?;
        Some(self.header(record))
    }

    fn size_hint(&self) -> (usize, Option<usize>) {
        self.records.size_hint()
    }
}

impl DoubleEndedIterator for Headers<'_> {
    fn next_back(&mut self) -> Option<Self::Item> {
        let record = self.records.next_back()?;
        Some(self.header(record))
    }
}

impl ExactSizeIterator for Headers<'_> {}
impl FusedIterator for Headers<'_> {}
