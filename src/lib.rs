//! # arraytap
//!
//! A streaming JSON parser that iterates the elements of a top-level array
//! one at a time, without ever holding the whole array in memory, while
//! still being able to reconstruct the complete original document once the
//! array has been consumed.
//!
//! This is useful for large API responses and line-delimited-adjacent
//! formats where the payload is `{"meta": ..., "data": [ ... huge ... ]}`
//! and you want to process `data` incrementally but still need `meta` (and
//! anything else in the document) afterwards.
//!
//! ## Examples
//!
//! ### Parsing a slice of bytes
//!
//! For convenience, [`SliceProducer`](producer::SliceProducer) feeds the
//! tokenizer and parser from an in-memory byte slice.
//!
//! ```
//! use arraytap::parse_str;
//! use arraytap::JsonValue;
//!
//! let value = parse_str(r#"{"name": "Elvis"}"#).unwrap();
//! assert_eq!(value.get("name").unwrap().as_str(), Some("Elvis"));
//! ```
//!
//! ### Streaming a top-level array
//!
//! ```
//! use arraytap::producer::SliceProducer;
//! use arraytap::source::{NoPrelude, Source};
//!
//! let json = br#"[1, 2, 3]"#;
//! let source = Source::new(SliceProducer::new(json));
//! let mut stream = source.iterate(NoPrelude).unwrap();
//!
//! let mut sum = 0;
//! for item in &mut stream {
//!     let item = item.unwrap();
//!     sum += match item {
//!         arraytap::JsonValue::Int(i) => i,
//!         _ => 0,
//!     };
//! }
//! assert_eq!(sum, 6);
//! ```
//!
//! ### Finding an array nested inside a larger document
//!
//! A [`Prelude`](source::Prelude) is a closure that consumes bytes off the
//! front of the input until it recognises the landmark that precedes the
//! array you actually want; this crate doesn't care what that landmark looks
//! like, only that the closure stops exactly where the array starts.
//!
//! ```
//! use arraytap::producer::SliceProducer;
//! use arraytap::source::{Source, SkipBuffer};
//!
//! let json = br#"{"ignore_this": 1, "array": [1, 2, 3]}"#;
//!
//! let find_array = |source: &mut Source<SliceProducer>, skip: &mut SkipBuffer| loop {
//!     if skip.ends_with(b"\"array\": ") {
//!         return true;
//!     }
//!     match source.read_byte() {
//!         Some(b) => skip.push(b),
//!         None => return false,
//!     }
//! };
//!
//! let source = Source::new(SliceProducer::new(json));
//! let mut stream = source.iterate(find_array).unwrap();
//! assert_eq!(stream.next().unwrap().unwrap(), arraytap::JsonValue::Int(1));
//! ```
//!
//! ### Pairing each element with the reconstructed document
//!
//! [`find_start_and_parse`] is the highest-level entry point: it combines a
//! [`Prelude`](source::Prelude) with array streaming and hands back, for the
//! very last element only, the complete original document.
//!
//! ```
//! use arraytap::find_start_and_parse;
//! use arraytap::producer::SliceProducer;
//! use arraytap::source::NoPrelude;
//!
//! let json = br#"[1, 2, 3]"#;
//! let pairs: Vec<_> = find_start_and_parse(SliceProducer::new(json), NoPrelude, true)
//!     .unwrap()
//!     .collect::<Result<_, _>>()
//!     .unwrap();
//!
//! assert_eq!(pairs.len(), 3);
//! assert!(pairs[0].1.is_none());
//! assert!(pairs[2].1.is_some());
//! ```
//!
//! ### Converting to a Serde JSON Value
//!
//! Heads up: you need to enable the `serde_json` feature for this.
//!
//! ```
//! use arraytap::parse_str;
//! use arraytap::serde_json::to_value;
//!
//! let value = to_value(&parse_str(r#"{"name": "Elvis"}"#).unwrap());
//! assert_eq!(value, serde_json::json!({"name": "Elvis"}));
//! ```

mod find_start;
mod parser;
pub mod producer;
pub mod source;
mod stream;
mod token;
mod tokenizer;
mod value;

#[cfg(feature = "serde_json")]
pub mod serde_json;

pub use find_start::{find_start_and_parse, ArrayPairs};
pub use parser::{parse, parse_str, parse_value, ParseError};
pub use stream::{ArrayStream, StreamError};
pub use token::{Number, Token, TokenKind, TokenValue};
pub use tokenizer::{ByteFeed, LexError, Tokenizer};
pub use value::JsonValue;
