use std::collections::VecDeque;
use std::io::{ErrorKind, Read};

use crate::{DecoderOptions, ElementRecord, PlyDecoder, PlyError, PlyHeader};

/// Pull-based record iterator over any [`Read`] source.
///
/// Reads the source in chunks of [`DecoderOptions::read_chunk_size`] and
/// yields records as they complete. The first error ends the iteration, and
/// the iterator cannot be restarted once the source is exhausted.
///
/// # Examples
///
/// ```rust
/// use streaming_ply::RecordReader;
///
/// let data = "ply\nformat ascii 1.0\nelement vertex 2\nproperty int a\nend_header\n1\n2\n";
/// let records = RecordReader::new(data.as_bytes()).collect::<Result<Vec<_>, _>>()?;
/// assert_eq!(records.len(), 2);
/// # Ok::<(), streaming_ply::PlyError>(())
/// ```
pub struct RecordReader<R> {
    reader: R,
    decoder: PlyDecoder,
    chunk: Vec<u8>,
    pending: VecDeque<ElementRecord>,
    error: Option<PlyError>,
    finished: bool,
}

impl<R: Read> RecordReader<R> {
    pub fn new(reader: R) -> Self {
        Self::with_options(reader, DecoderOptions::default())
    }

    pub fn with_options(reader: R, options: DecoderOptions) -> Self {
        Self {
            reader,
            chunk: vec![0; options.read_chunk_size.max(1)],
            decoder: PlyDecoder::with_options(options),
            pending: VecDeque::new(),
            error: None,
            finished: false,
        }
    }

    /// The parsed header, once enough of the source has been read.
    pub fn header(&self) -> Option<&PlyHeader> {
        self.decoder.header()
    }

    /// Either decodes one more record from buffered bytes or reads the next
    /// chunk from the source.
    fn fill(&mut self) -> Result<(), PlyError> {
        if let Some(record) = self.decoder.next_record()? {
            self.pending.push_back(record);
            return Ok(());
        }

        let read = loop {
            match self.reader.read(&mut self.chunk) {
                Ok(read) => break read,
                Err(e) if e.kind() == ErrorKind::Interrupted => continue,
                Err(e) => return Err(e.into()),
            }
        };

        if read == 0 {
            self.finished = true;
            let pending = &mut self.pending;
            self.decoder.finish_with(|record| pending.push_back(record))?;
        } else {
            self.decoder.feed(&self.chunk[..read]);
        }
        Ok(())
    }
}

impl<R: Read> Iterator for RecordReader<R> {
    type Item = Result<ElementRecord, PlyError>;

    fn next(&mut self) -> Option<Self::Item> {
        loop {
            if let Some(record) = self.pending.pop_front() {
                return Some(Ok(record));
            }
            if let Some(error) = self.error.take() {
                return Some(Err(error));
            }
            if self.finished {
                return None;
            }
            if let Err(error) = self.fill() {
                self.finished = true;
                self.error = Some(error);
            }
        }
    }
}
