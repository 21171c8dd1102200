use crate::producer::Producer;
use crate::source::{Prelude, Source, SourceError};
use crate::stream::ArrayStream;
use crate::value::JsonValue;

/// Pairs each array element with `None`, except the last, which is paired
/// with the fully reconstructed document (§4.5). An empty array yields
/// exactly one pair, `(None, None)`.
///
/// This look-ahead-by-one shape exists so that the full document — which can
/// only be known once the array and everything after it has been consumed —
/// is handed to the caller alongside the final element, rather than forcing
/// a second pass.
pub struct ArrayPairs<Pr> {
    stream: Option<ArrayStream<Source<Pr>>>,
    prev: Option<JsonValue>,
    started: bool,
    finished: bool,
}

impl<Pr: Producer> Iterator for ArrayPairs<Pr> {
    type Item = Result<(Option<JsonValue>, Option<JsonValue>), SourceError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.finished {
            return None;
        }
        let stream = self
            .stream
            .as_mut()
            .expect("stream is only taken once `finished` is set");

        if !self.started {
            self.started = true;
            match stream.next() {
                None => {
                    self.finished = true;
                    return Some(Ok((None, None)));
                }
                Some(Err(e)) => {
                    self.finished = true;
                    return Some(Err(SourceError::InArrayItem(e)));
                }
                Some(Ok(v)) => self.prev = Some(v),
            }
        }

        match stream.next() {
            Some(Ok(v)) => {
                let out = self.prev.replace(v);
                Some(Ok((out, None)))
            }
            Some(Err(e)) => {
                self.finished = true;
                Some(Err(SourceError::InArrayItem(e)))
            }
            None => {
                self.finished = true;
                let mut source = self.stream.take().unwrap().into_tokenizer().into_inner();
                match source.full_document() {
                    Ok(full) => Some(Ok((self.prev.take(), full))),
                    Err(e) => Some(Err(e)),
                }
            }
        }
    }
}

/// Locate a top-level array inside a document using `prelude`, then stream
/// its elements paired with the reconstructed document (see [`ArrayPairs`]).
/// Pass [`crate::source::NoPrelude`] when the array is the document's root
/// value.
pub fn find_start_and_parse<Pr: Producer>(
    producer: Pr,
    prelude: impl Prelude<Pr>,
    lossless: bool,
) -> Result<ArrayPairs<Pr>, SourceError> {
    let source = Source::new(producer).lossless(lossless);
    let stream = source.iterate(prelude)?;
    Ok(ArrayPairs {
        stream: Some(stream),
        prev: None,
        started: false,
        finished: false,
    })
}

#[cfg(test)]
mod test {
    use super::*;
    use crate::producer::SliceProducer;
    use crate::source::NoPrelude;

    #[test]
    fn pairs_each_item_with_none_except_the_last() {
        let pairs = find_start_and_parse(SliceProducer::new(b"[1,2,3]"), NoPrelude, true)
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        assert_eq!(pairs.len(), 3);
        assert_eq!(pairs[0], (Some(JsonValue::Int(1)), None));
        assert_eq!(pairs[1], (Some(JsonValue::Int(2)), None));
        assert_eq!(pairs[2].0, Some(JsonValue::Int(3)));
        assert_eq!(pairs[2].1, Some(JsonValue::Array(vec![
            JsonValue::Int(1),
            JsonValue::Int(2),
            JsonValue::Int(3),
        ])));
    }

    #[test]
    fn empty_array_yields_a_single_none_none_pair() {
        let pairs = find_start_and_parse(SliceProducer::new(b"[]"), NoPrelude, true)
            .unwrap()
            .collect::<Result<Vec<_>, _>>()
            .unwrap();

        assert_eq!(pairs, vec![(None, None)]);
    }
}
