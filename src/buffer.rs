//! Accumulates incoming bytes and hands them out in whole units.
//!
//! Every `try_consume_*` method either consumes a complete unit (a line, a
//! scalar, or a length-prefixed list) or leaves the cursor untouched and
//! returns `None`, so a caller can simply retry once more bytes arrived.

use byteorder::{BigEndian, LittleEndian};

use crate::{DecoderOptions, PlyError, ScalarType, ScalarValue};

/// Byte order of binary body values.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Endianness {
    #[default]
    Little,
    Big,
}

#[derive(Debug)]
pub struct ByteCursor {
    data: Vec<u8>,
    /// Index of the first unconsumed byte.
    start: usize,
    /// Where the next newline search resumes; bytes before it are known to
    /// hold no `\n`.
    line_scan: usize,
    endianness: Endianness,
    trim_carriage_return: bool,
    compact_threshold: usize,
}

impl ByteCursor {
    pub fn new() -> Self {
        Self::with_options(&DecoderOptions::default())
    }

    pub fn with_options(options: &DecoderOptions) -> Self {
        Self {
            data: Vec::new(),
            start: 0,
            line_scan: 0,
            endianness: Endianness::default(),
            trim_carriage_return: options.trim_carriage_return,
            compact_threshold: options.compact_threshold,
        }
    }

    pub fn set_endianness(&mut self, endianness: Endianness) {
        self.endianness = endianness;
    }

    pub fn endianness(&self) -> Endianness {
        self.endianness
    }

    pub fn append(&mut self, bytes: &[u8]) {
        self.compact();
        self.data.extend_from_slice(bytes);
    }

    /// Number of unconsumed bytes.
    pub fn available(&self) -> usize {
        self.data.len() - self.start
    }

    pub fn has_bytes(&self) -> bool {
        self.available() > 0
    }

    /// Consumes one `\n` terminated line and returns it without the
    /// terminator.
    pub fn try_consume_line(&mut self) -> Result<Option<String>, PlyError> {
        let scan_from = self.line_scan.max(self.start);
        let Some(offset) = self.data[scan_from..].iter().position(|&b| b == b'\n') else {
            self.line_scan = self.data.len();
            return Ok(None);
        };
        let newline = scan_from + offset;
        let text = self.decode_line(&self.data[self.start..newline])?;
        self.start = newline + 1;
        self.line_scan = self.start;
        Ok(Some(text))
    }

    pub fn try_consume_scalar(&mut self, data_type: ScalarType) -> Option<ScalarValue> {
        let width = data_type.size_bytes();
        let bytes = self.data.get(self.start..self.start + width)?;
        let value = read_value(self.endianness, data_type, bytes);
        self.start += width;
        Some(value)
    }

    /// Consumes a length prefix plus that many values, or nothing at all.
    pub fn try_consume_list(
        &mut self,
        count_type: ScalarType,
        data_type: ScalarType,
    ) -> Result<Option<Vec<ScalarValue>>, PlyError> {
        let count_width = count_type.size_bytes();
        let Some(len_bytes) = self.data.get(self.start..self.start + count_width) else {
            return Ok(None);
        };
        let len = read_value(self.endianness, count_type, len_bytes).to_list_len()?;

        let data_width = data_type.size_bytes();
        let total = len
            .checked_mul(data_width)
            .and_then(|n| n.checked_add(count_width))
            .ok_or(PlyError::InvalidListLength)?;
        if self.available() < total {
            return Ok(None);
        }

        let values_start = self.start + count_width;
        let values = self.data[values_start..values_start + len * data_width]
            .chunks_exact(data_width)
            .map(|bytes| read_value(self.endianness, data_type, bytes))
            .collect();
        self.start += total;
        Ok(Some(values))
    }

    fn decode_line(&self, mut line: &[u8]) -> Result<String, PlyError> {
        if self.trim_carriage_return {
            if let Some(stripped) = line.strip_suffix(b"\r") {
                line = stripped;
            }
        }
        std::str::from_utf8(line)
            .map(str::to_string)
            .map_err(|_| PlyError::InvalidText)
    }

    /// Drops the consumed prefix once it dominates the storage, which keeps
    /// repeated small appends amortized linear.
    fn compact(&mut self) {
        if self.start == 0 || self.start < self.compact_threshold || self.start * 2 < self.data.len()
        {
            return;
        }
        self.data.drain(..self.start);
        self.line_scan -= self.start.min(self.line_scan);
        self.start = 0;
    }
}

impl Default for ByteCursor {
    fn default() -> Self {
        Self::new()
    }
}

fn read_value(endianness: Endianness, data_type: ScalarType, bytes: &[u8]) -> ScalarValue {
    match endianness {
        Endianness::Little => data_type.read_binary::<LittleEndian>(bytes),
        Endianness::Big => data_type.read_binary::<BigEndian>(bytes),
    }
}
