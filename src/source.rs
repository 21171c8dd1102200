use std::collections::VecDeque;

use thiserror::Error;

use crate::parser::{self, ParseError};
use crate::producer::{Producer, ProducerError};
use crate::stream::{ArrayStream, StreamError};
use crate::tokenizer::{ByteFeed, Tokenizer};
use crate::value::JsonValue;

/// An error raised by [`Source`] while locating the array, streaming its
/// items, or reconstructing the full document.
#[derive(Error, Debug)]
pub enum SourceError {
    #[error("end of stream searching for array start")]
    FindingStart(#[source] Option<ProducerError>),

    #[error("end of stream in middle of array item")]
    InArrayItem(#[source] StreamError),

    #[error("end of stream while collecting rest data after array")]
    CollectingRest(#[source] Option<ProducerError>),

    #[error("expected the document to open with '['")]
    NotAnArray,

    #[error("could not decode the full document: {0}")]
    FullDocument(#[from] ParseError),
}

/// Records every byte a [`Prelude`] consumes while looking for the start of
/// the array, so the caller can recognise a landmark without having to
/// buffer and re-scan the input itself.
#[derive(Default)]
pub struct SkipBuffer {
    buf: Vec<u8>,
}

impl SkipBuffer {
    pub fn push(&mut self, b: u8) {
        self.buf.push(b);
    }

    pub fn ends_with(&self, suffix: &[u8]) -> bool {
        self.buf.ends_with(suffix)
    }

    pub fn as_bytes(&self) -> &[u8] {
        &self.buf
    }
}

/// Consumes bytes from `source` (via its [`ByteFeed`] side, one at a time)
/// until the caller-defined landmark that precedes the target array has been
/// found. Returns `false` if the source runs dry first.
pub trait Prelude<Pr: Producer> {
    fn run(&mut self, source: &mut Source<Pr>, skip: &mut SkipBuffer) -> bool;
}

impl<Pr: Producer, F> Prelude<Pr> for F
where
    F: FnMut(&mut Source<Pr>, &mut SkipBuffer) -> bool,
{
    fn run(&mut self, source: &mut Source<Pr>, skip: &mut SkipBuffer) -> bool {
        self(source, skip)
    }
}

/// The default [`Prelude`]: the array is the very first thing in the
/// document, so there is nothing to skip.
pub struct NoPrelude;

impl<Pr: Producer> Prelude<Pr> for NoPrelude {
    fn run(&mut self, _source: &mut Source<Pr>, _skip: &mut SkipBuffer) -> bool {
        true
    }
}

/// A tee'ing wrapper around a [`Producer`]: it feeds a tokenizer one byte at
/// a time while, in lossless mode, also recording every byte it has ever
/// handed out (plus whatever a [`Prelude`] consumed finding the array and
/// whatever is left over once the array closes), so the complete original
/// document can be reconstructed afterwards with [`full_document`](Self::full_document).
pub struct Source<Pr> {
    producer: Pr,
    chunk_size: usize,
    lossless: bool,
    hold: VecDeque<u8>,
    replay: Vec<u8>,
    pending_error: Option<ProducerError>,
}

impl<Pr: Producer> Source<Pr> {
    pub fn new(producer: Pr) -> Self {
        Source {
            producer,
            chunk_size: 1024,
            lossless: true,
            hold: VecDeque::new(),
            replay: Vec::new(),
            pending_error: None,
        }
    }

    /// Size of the bulk reads pulled from the underlying [`Producer`]. Purely
    /// a performance knob: behaviour does not depend on this value.
    pub fn with_chunk_size(mut self, chunk_size: usize) -> Self {
        self.chunk_size = chunk_size;
        self
    }

    /// Whether to record bytes for [`full_document`](Self::full_document).
    /// Disabling this drops the replay buffer entirely, at the cost of no
    /// longer being able to reconstruct the full document afterwards.
    pub fn lossless(mut self, lossless: bool) -> Self {
        self.lossless = lossless;
        self
    }

    /// Pull one more chunk from the producer. Returns `false` at a clean end
    /// of input or (after recording the error) a producer failure.
    fn pull_chunk(&mut self) -> bool {
        match self.producer.read(self.chunk_size) {
            Ok(chunk) if chunk.is_empty() => false,
            Ok(chunk) => {
                if self.lossless {
                    self.replay.extend_from_slice(&chunk);
                }
                self.hold.extend(chunk);
                true
            }
            Err(e) => {
                self.pending_error = Some(e);
                false
            }
        }
    }

    /// Read the next byte from the underlying producer, recording it for
    /// replay in lossless mode. This is what a [`Prelude`] calls while
    /// scanning for its landmark.
    pub fn read_byte(&mut self) -> Option<u8> {
        if let Some(b) = self.hold.pop_front() {
            return Some(b);
        }
        if !self.pull_chunk() {
            return None;
        }
        self.hold.pop_front()
    }

    /// Consume bytes using `prelude` until it reports the array has been
    /// found.
    pub fn find_start(&mut self, mut prelude: impl Prelude<Pr>) -> Result<(), SourceError> {
        let mut skip = SkipBuffer::default();
        if prelude.run(self, &mut skip) {
            Ok(())
        } else {
            Err(SourceError::FindingStart(self.pending_error.take()))
        }
    }

    /// Run `prelude`, then open an [`ArrayStream`] over the remaining input.
    /// This is the `iterate()` entry point (§4.5): it pairs with
    /// [`full_document`](Self::full_document) once the stream is exhausted.
    pub fn iterate(mut self, prelude: impl Prelude<Pr>) -> Result<ArrayStream<Self>, SourceError> {
        self.find_start(prelude)?;
        match ArrayStream::new(Tokenizer::new(self)) {
            Ok(stream) => Ok(stream),
            Err(StreamError::NotAnArray) => Err(SourceError::NotAnArray),
            Err(e) => Err(SourceError::InArrayItem(e)),
        }
    }

    /// Drain any remaining input so it is recorded for
    /// [`full_document`](Self::full_document). A no-op when the source was
    /// built with `lossless(false)`.
    pub fn finish(&mut self) -> Result<(), SourceError> {
        if !self.lossless {
            return Ok(());
        }
        self.hold.clear();
        while self.pull_chunk() {
            self.hold.clear();
        }
        if let Some(e) = self.pending_error.take() {
            return Err(SourceError::CollectingRest(Some(e)));
        }
        Ok(())
    }

    /// Reconstruct and parse the complete original document from everything
    /// this source has ever seen: bytes a [`Prelude`] skipped, the array
    /// itself, and whatever followed it. Drains any not-yet-read remainder
    /// first. Returns `Ok(None)` when the source was built with
    /// `lossless(false)`.
    pub fn full_document(&mut self) -> Result<Option<JsonValue>, SourceError> {
        if !self.lossless {
            return Ok(None);
        }
        self.finish()?;
        let mut tokens = Tokenizer::new(self.replay.as_slice());
        let value = parser::parse(&mut tokens)?;
        Ok(Some(value))
    }

    /// Convenience wrapper around [`full_document`](Self::full_document) for
    /// callers who would rather work with [`serde_json::Value`].
    #[cfg(feature = "serde_json")]
    pub fn full_document_as_serde_json(&mut self) -> Result<Option<serde_json::Value>, SourceError> {
        Ok(self.full_document()?.map(|v| crate::serde_json::to_value(&v)))
    }
}

impl<Pr: Producer> ByteFeed for Source<Pr> {
    fn next_byte(&mut self) -> Option<u8> {
        self.read_byte()
    }
}
