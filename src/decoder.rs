use tracing::{debug, trace};

use crate::{
    de::{ascii, binary, ElementCursor},
    header::{HeaderParser, HeaderStep},
    ByteCursor, DecoderOptions, ElementDef, ElementRecord, PlyError, PlyFormat, PlyHeader,
};

/// Outcome of a single [`PlyDecoder::step`].
#[derive(Debug, Clone, PartialEq)]
pub enum Step {
    /// A row was completed.
    Record(ElementRecord),
    /// Input was consumed, call `step` again.
    Progress,
    /// The buffered bytes do not hold the next unit yet. Feed more data.
    Suspend,
    /// Every declared row has been decoded.
    Done,
}

#[derive(Debug)]
enum Phase {
    Header(HeaderParser),
    Body {
        header: PlyHeader,
        cursor: ElementCursor,
    },
    Failed,
}

/// Incremental PLY decoder.
///
/// Bytes go in through [`feed`](Self::feed) in whatever chunks they arrive,
/// records come out in file order once they are complete. Nothing blocks: when
/// the buffered bytes run out mid-line or mid-value the decoder simply reports
/// that it needs more input.
///
/// # Examples
///
/// ```rust
/// use streaming_ply::PlyDecoder;
///
/// let data = b"ply\nformat ascii 1.0\nelement vertex 2\nproperty float x\nend_header\n1.5\n2.5\n";
///
/// let mut decoder = PlyDecoder::new();
/// let mut xs = Vec::new();
/// for chunk in data.chunks(7) {
///     decoder.push(chunk, |record| xs.push(record))?;
/// }
/// decoder.finish()?;
/// assert_eq!(xs.len(), 2);
/// # Ok::<(), streaming_ply::PlyError>(())
/// ```
#[derive(Debug)]
pub struct PlyDecoder {
    phase: Phase,
    buffer: ByteCursor,
}

impl PlyDecoder {
    pub fn new() -> Self {
        Self::with_options(DecoderOptions::default())
    }

    pub fn with_options(options: DecoderOptions) -> Self {
        Self {
            phase: Phase::Header(HeaderParser::new()),
            buffer: ByteCursor::with_options(&options),
        }
    }

    /// Appends the next chunk of the stream.
    pub fn feed(&mut self, bytes: &[u8]) {
        self.buffer.append(bytes);
    }

    /// The parsed header, once `end_header` has been seen.
    pub fn header(&self) -> Option<&PlyHeader> {
        match &self.phase {
            Phase::Body { header, .. } => Some(header),
            _ => None,
        }
    }

    /// The element whose rows are decoded next.
    pub fn current_element(&self) -> Option<&ElementDef> {
        match &self.phase {
            Phase::Body { header, cursor } => cursor.current(&header.elements),
            _ => None,
        }
    }

    /// True once every declared row has been emitted.
    pub fn is_done(&self) -> bool {
        matches!(self.phase, Phase::Body { .. }) && self.current_element().is_none()
    }

    /// Advances the state machine by one unit: a header line, an ascii row or
    /// a binary property.
    ///
    /// Any error is terminal, later calls return [`PlyError::Poisoned`].
    pub fn step(&mut self) -> Result<Step, PlyError> {
        let step = self.advance();
        if step.is_err() {
            self.phase = Phase::Failed;
        }
        step
    }

    /// Steps until a record completes or the buffered input runs dry.
    pub fn next_record(&mut self) -> Result<Option<ElementRecord>, PlyError> {
        loop {
            match self.step()? {
                Step::Record(record) => return Ok(Some(record)),
                Step::Progress => {}
                Step::Suspend | Step::Done => return Ok(None),
            }
        }
    }

    /// Feeds a chunk and hands every record it completes to `on_record`.
    pub fn push(
        &mut self,
        bytes: &[u8],
        mut on_record: impl FnMut(ElementRecord),
    ) -> Result<(), PlyError> {
        self.feed(bytes);
        while let Some(record) = self.next_record()? {
            on_record(record);
        }
        Ok(())
    }

    /// Signals the end of the stream and returns the records still pending.
    ///
    /// Fails unless every declared row was decoded.
    pub fn finish(&mut self) -> Result<Vec<ElementRecord>, PlyError> {
        let mut records = Vec::new();
        self.finish_with(|record| records.push(record))?;
        Ok(records)
    }

    /// Like [`finish`](Self::finish), but hands the pending records to a
    /// callback.
    pub fn finish_with(&mut self, mut on_record: impl FnMut(ElementRecord)) -> Result<(), PlyError> {
        while let Some(record) = self.next_record()? {
            on_record(record);
        }

        // The last ascii row may lack its line feed.
        let ascii_tail = matches!(
            &self.phase,
            Phase::Body { header, .. } if header.format == PlyFormat::Ascii
        ) && self.buffer.has_bytes();
        if ascii_tail {
            self.buffer.append(b"\n");
            while let Some(record) = self.next_record()? {
                on_record(record);
            }
        }

        let result = match &self.phase {
            Phase::Failed => Err(PlyError::Poisoned),
            Phase::Header(_) => Err(PlyError::PrematureEndOfStream {
                element: None,
                remaining: 0,
            }),
            Phase::Body { header, cursor } => match cursor.current(&header.elements) {
                Some(elem_def) => Err(PlyError::PrematureEndOfStream {
                    element: Some(elem_def.name.clone()),
                    remaining: cursor.remaining(),
                }),
                None => {
                    debug!("ply stream complete");
                    Ok(())
                }
            },
        };
        if result.is_err() {
            self.phase = Phase::Failed;
        }
        result
    }

    fn advance(&mut self) -> Result<Step, PlyError> {
        let step = match &mut self.phase {
            Phase::Failed => return Err(PlyError::Poisoned),
            Phase::Header(parser) => match parser.step(&mut self.buffer)? {
                HeaderStep::Progress => Step::Progress,
                HeaderStep::Suspend => Step::Suspend,
                HeaderStep::Complete(header) => {
                    let cursor = ElementCursor::new(&header.elements);
                    self.phase = Phase::Body { header, cursor };
                    Step::Progress
                }
            },
            Phase::Body { header, cursor } => match header.format {
                PlyFormat::Ascii => ascii::step(&header.elements, cursor, &mut self.buffer)?,
                PlyFormat::BinaryLittleEndian | PlyFormat::BinaryBigEndian => {
                    binary::step(&header.elements, cursor, &mut self.buffer)?
                }
            },
        };

        if matches!(step, Step::Suspend) {
            trace!(buffered = self.buffer.available(), "waiting for more data");
        }
        Ok(step)
    }
}

impl Default for PlyDecoder {
    fn default() -> Self {
        Self::new()
    }
}
