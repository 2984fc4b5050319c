//! Body decoding: one policy per body encoding, sharing the per-element
//! progress kept in [`ElementCursor`].

pub(crate) mod ascii;
pub(crate) mod binary;
mod row;

pub(crate) use row::RecordDeserializer;

use tracing::debug;

use crate::{ElementDef, PropertyValue};

/// Tracks which element is being decoded and how far along it is.
///
/// Only the binary policy fills records property by property; the ascii
/// policy always completes a record within one line.
#[derive(Debug)]
pub(crate) struct ElementCursor {
    element_index: usize,
    remaining: usize,
    pub(crate) next_property: usize,
    pub(crate) fields: Vec<(String, PropertyValue)>,
}

impl ElementCursor {
    pub fn new(elements: &[ElementDef]) -> Self {
        let mut cursor = Self {
            element_index: 0,
            remaining: elements.first().map_or(0, |e| e.count),
            next_property: 0,
            fields: Vec::new(),
        };
        cursor.settle(elements);
        cursor
    }

    /// The element still owed rows, or `None` once every declared row was
    /// decoded.
    pub fn current<'e>(&self, elements: &'e [ElementDef]) -> Option<&'e ElementDef> {
        elements.get(self.element_index)
    }

    /// Rows still owed for the current element, including one in progress.
    pub fn remaining(&self) -> usize {
        self.remaining
    }

    /// Counts one emitted row and moves past elements with nothing left.
    pub fn finish_record(&mut self, elements: &[ElementDef]) {
        self.remaining = self.remaining.saturating_sub(1);
        self.next_property = 0;
        self.fields.clear();
        self.settle(elements);
    }

    fn settle(&mut self, elements: &[ElementDef]) {
        while let Some(elem_def) = elements.get(self.element_index) {
            if self.remaining > 0 {
                break;
            }
            debug!(element = %elem_def.name, rows = elem_def.count, "element complete");
            self.element_index += 1;
            self.remaining = elements.get(self.element_index).map_or(0, |e| e.count);
        }
    }
}
