use std::io::Read;

use thiserror::Error;

/// An error raised while pulling a chunk of bytes from a [`Producer`].
#[derive(Error, Debug)]
pub enum ProducerError {
    #[error("{0}")]
    Io(#[from] std::io::Error),
}

/// Something that can hand the tee'ing [`Source`](crate::source::Source) bulk
/// chunks of input, as opposed to [`ByteFeed`](crate::tokenizer::ByteFeed),
/// which the tokenizer pulls one byte at a time. `Source` is the only
/// consumer of this trait; it is the boundary between this crate and
/// whatever owns the raw bytes (a socket, a file, an in-memory buffer).
pub trait Producer {
    /// Return up to `max` bytes of new input. An empty (but `Ok`) result
    /// means the producer is exhausted; callers must not call `read` again
    /// afterwards.
    fn read(&mut self, max: usize) -> Result<Vec<u8>, ProducerError>;
}

/// A [`Producer`] that serves input from an in-memory byte slice.
pub struct SliceProducer<'a> {
    slice: &'a [u8],
    pos: usize,
}

impl<'a> SliceProducer<'a> {
    pub fn new(slice: &'a [u8]) -> Self {
        SliceProducer { slice, pos: 0 }
    }
}

impl<'a> Producer for SliceProducer<'a> {
    fn read(&mut self, max: usize) -> Result<Vec<u8>, ProducerError> {
        let end = (self.pos + max).min(self.slice.len());
        let chunk = self.slice[self.pos..end].to_vec();
        self.pos = end;
        Ok(chunk)
    }
}

/// A [`Producer`] that reads from anything implementing [`std::io::Read`].
pub struct ReaderProducer<R> {
    reader: R,
}

impl<R: Read> ReaderProducer<R> {
    pub fn new(reader: R) -> Self {
        ReaderProducer { reader }
    }
}

impl<R: Read> Producer for ReaderProducer<R> {
    fn read(&mut self, max: usize) -> Result<Vec<u8>, ProducerError> {
        let mut buf = vec![0u8; max];
        let n = self.reader.read(&mut buf)?;
        buf.truncate(n);
        Ok(buf)
    }
}

/// A [`Producer`] that is fed manually by the caller, for push-based input
/// (e.g. bytes arriving off a non-blocking socket). Push as much data as is
/// available with [`push`](Self::push), call [`done`](Self::done) once no
/// more will arrive, then drive the source as usual: `read` returns whatever
/// has been pushed so far, up to `max` bytes, and an empty chunk once the
/// queue is drained and [`done`](Self::done) has been called.
pub struct PushProducer {
    input: std::collections::VecDeque<u8>,
    done: bool,
}

impl PushProducer {
    pub fn new() -> Self {
        PushProducer {
            input: std::collections::VecDeque::new(),
            done: false,
        }
    }

    /// Make more bytes available to the next [`Producer::read`] call.
    pub fn push(&mut self, bytes: &[u8]) {
        self.input.extend(bytes.iter().copied());
    }

    /// Indicate that no more bytes will be pushed.
    pub fn done(&mut self) {
        self.done = true;
    }

    /// Whether all pushed bytes have been consumed and [`done`](Self::done)
    /// has been called.
    pub fn is_done(&self) -> bool {
        self.done && self.input.is_empty()
    }
}

impl Default for PushProducer {
    fn default() -> Self {
        Self::new()
    }
}

impl Producer for PushProducer {
    fn read(&mut self, max: usize) -> Result<Vec<u8>, ProducerError> {
        let n = max.min(self.input.len());
        Ok(self.input.drain(..n).collect())
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn slice_producer_consumes_all() {
        let mut p = SliceProducer::new(b"hello");
        assert_eq!(p.read(3).unwrap(), b"hel");
        assert_eq!(p.read(3).unwrap(), b"lo");
        assert_eq!(p.read(3).unwrap(), b"");
    }

    #[test]
    fn slice_producer_empty() {
        let mut p = SliceProducer::new(b"");
        assert_eq!(p.read(16).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn reader_producer_consumes_all() {
        let mut p = ReaderProducer::new(std::io::Cursor::new(b"abcdef".to_vec()));
        assert_eq!(p.read(4).unwrap(), b"abcd");
        assert_eq!(p.read(4).unwrap(), b"ef");
        assert_eq!(p.read(4).unwrap(), b"");
    }

    #[test]
    fn push_producer_returns_what_is_available() {
        let mut p = PushProducer::new();
        assert_eq!(p.read(16).unwrap(), Vec::<u8>::new());
        assert!(!p.is_done());
        p.push(b"ab");
        assert_eq!(p.read(16).unwrap(), b"ab");
        assert!(!p.is_done());
        p.done();
        assert!(p.is_done());
        assert_eq!(p.read(16).unwrap(), Vec::<u8>::new());
    }

    #[test]
    fn push_producer_respects_max() {
        let mut p = PushProducer::new();
        p.push(b"abcdef");
        assert_eq!(p.read(2).unwrap(), b"ab");
        assert_eq!(p.read(2).unwrap(), b"cd");
        assert_eq!(p.read(2).unwrap(), b"ef");
    }
}
