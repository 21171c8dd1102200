use thiserror::Error;

use crate::parser::{parse_value, ParseError};
use crate::token::{Token, TokenValue};
use crate::tokenizer::{LexError, Tokenizer};
use crate::value::JsonValue;
use crate::tokenizer::ByteFeed;

/// An error raised while streaming a top-level JSON array element by
/// element (§4.3).
#[derive(Error, Debug, Clone, PartialEq)]
pub enum StreamError {
    #[error("lexical error: {0}")]
    Lex(#[from] LexError),

    #[error(transparent)]
    Parse(#[from] ParseError),

    #[error("expected the document to open with '['")]
    NotAnArray,

    #[error("array items must be followed by ',' or ']'")]
    SyntaxError,

    #[error("unexpected end of token stream")]
    UnexpectedEnd,
}

/// Iterates the elements of a top-level JSON array one at a time, without
/// materialising the whole array.
///
/// Only the tokens belonging to the element currently being yielded are
/// consumed from the underlying tokenizer; a scalar element consumes exactly
/// one token, a nested container consumes exactly the tokens that make it
/// up. Calling [`Iterator::next`] again then reads the `,` or `]` that
/// follows and either proceeds to the next element or ends the stream.
pub struct ArrayStream<S> {
    tokens: Tokenizer<S>,
    awaiting_value: bool,
    done: bool,
}

impl<S: ByteFeed> ArrayStream<S> {
    /// Open `tokens` as an array stream. Reads and checks the opening `[`.
    pub fn new(mut tokens: Tokenizer<S>) -> Result<Self, StreamError> {
        match tokens.next() {
            Some(Ok(Token {
                value: TokenValue::Operator(b'['),
            })) => Ok(ArrayStream {
                tokens,
                awaiting_value: true,
                done: false,
            }),
            Some(Ok(_)) => Err(StreamError::NotAnArray),
            Some(Err(e)) => Err(StreamError::Lex(e)),
            None => Err(StreamError::UnexpectedEnd),
        }
    }

    /// Recover the underlying tokenizer once the stream is exhausted, e.g.
    /// to confirm there is nothing left but trailing whitespace, or to keep
    /// reading a document that has more than one top-level value.
    pub fn into_tokenizer(self) -> Tokenizer<S> {
        self.tokens
    }
}

impl<S: ByteFeed> Iterator for ArrayStream<S> {
    type Item = Result<JsonValue, StreamError>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }

        if !self.awaiting_value {
            match self.tokens.next() {
                Some(Ok(Token {
                    value: TokenValue::Operator(b','),
                })) => self.awaiting_value = true,
                Some(Ok(Token {
                    value: TokenValue::Operator(b']'),
                })) => {
                    self.done = true;
                    return None;
                }
                Some(Ok(_)) => {
                    self.done = true;
                    return Some(Err(StreamError::SyntaxError));
                }
                Some(Err(e)) => {
                    self.done = true;
                    return Some(Err(StreamError::Lex(e)));
                }
                None => {
                    self.done = true;
                    return Some(Err(StreamError::UnexpectedEnd));
                }
            }
        }

        let token = match self.tokens.next() {
            Some(Ok(t)) => t,
            Some(Err(e)) => {
                self.done = true;
                return Some(Err(StreamError::Lex(e)));
            }
            None => {
                self.done = true;
                return Some(Err(StreamError::UnexpectedEnd));
            }
        };

        if token.is_operator(b']') {
            // an empty array: the very first token after '[' is ']'
            self.done = true;
            return None;
        }

        match &token.value {
            TokenValue::Operator(b'{') | TokenValue::Operator(b'[') => {
                match parse_value(&mut self.tokens, token) {
                    Ok(value) => {
                        self.awaiting_value = false;
                        Some(Ok(value))
                    }
                    Err(e) => {
                        self.done = true;
                        Some(Err(StreamError::Parse(e)))
                    }
                }
            }
            TokenValue::Operator(_) => {
                self.done = true;
                Some(Err(StreamError::SyntaxError))
            }
            _ => {
                self.awaiting_value = false;
                Some(Ok(crate::parser::scalar_value(token)))
            }
        }
    }
}
