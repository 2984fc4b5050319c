/// Tuning knobs for [`PlyDecoder`](crate::PlyDecoder) and
/// [`RecordReader`](crate::RecordReader).
#[derive(Debug, Clone)]
pub struct DecoderOptions {
    /// Strip a trailing `\r` from header and ascii body lines, so files
    /// written with CRLF line endings decode like LF files.
    pub trim_carriage_return: bool,
    /// Bytes requested from the underlying reader per read call.
    pub read_chunk_size: usize,
    /// Consumed bytes are only compacted out of the buffer once at least this
    /// many have accumulated.
    pub compact_threshold: usize,
}

impl DecoderOptions {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn trim_carriage_return(mut self, trim: bool) -> Self {
        self.trim_carriage_return = trim;
        self
    }

    pub fn read_chunk_size(mut self, size: usize) -> Self {
        self.read_chunk_size = size.max(1);
        self
    }

    pub fn compact_threshold(mut self, threshold: usize) -> Self {
        self.compact_threshold = threshold;
        self
    }
}

impl Default for DecoderOptions {
    fn default() -> Self {
        Self {
            trim_carriage_return: true,
            read_chunk_size: 64 * 1024,
            compact_threshold: 4096,
        }
    }
}
