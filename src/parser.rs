use thiserror::Error;

use crate::token::{Number, Token, TokenValue};
use crate::tokenizer::LexError;
use crate::value::JsonValue;

/// An error raised by the value parser (§4.2) or the array-streaming parser
/// (§4.3) when the token stream does not form a grammatically valid JSON
/// value.
#[derive(Error, Debug, Clone, PartialEq)]
pub enum ParseError {
    #[error("lexical error: {0}")]
    Lex(#[from] LexError),

    #[error("expected an object or array, got {0}")]
    ExpectedContainer(String),

    #[error("object keys must be strings, got {0}")]
    NonStringKey(String),

    #[error("expected ':' after an object key, got {0}")]
    MissingColon(String),

    #[error("{0}")]
    Syntax(String),

    #[error("unexpected end of token stream")]
    UnexpectedEnd,

    #[error("trailing tokens after the JSON value")]
    TrailingTokens,
}

fn describe(token: &Token) -> String {
    match &token.value {
        TokenValue::Operator(b) => format!("'{}'", *b as char),
        TokenValue::String(s) => format!("string {s:?}"),
        TokenValue::Number(Number::Int(i)) => format!("number {i}"),
        TokenValue::Number(Number::Float(f)) => format!("number {f}"),
        TokenValue::Boolean(b) => format!("boolean {b}"),
        TokenValue::Null => "null".to_string(),
    }
}

pub(crate) fn scalar_value(token: Token) -> JsonValue {
    match token.value {
        TokenValue::String(s) => JsonValue::String(s),
        TokenValue::Number(Number::Int(i)) => JsonValue::Int(i),
        TokenValue::Number(Number::Float(f)) => JsonValue::Float(f),
        TokenValue::Boolean(b) => JsonValue::Bool(b),
        TokenValue::Null => JsonValue::Null,
        TokenValue::Operator(_) => unreachable!("scalar_value called on an operator token"),
    }
}

/// One frame of the parser's working stack (§3): an in-progress array, an
/// in-progress object, an in-progress key-value pair, or (transiently,
/// inside `attach`) a bare value about to be merged into its parent.
enum Frame {
    Array {
        items: Vec<JsonValue>,
        awaiting_value: bool,
    },
    Object {
        pairs: Vec<(String, JsonValue)>,
        awaiting_key: bool,
    },
    KeyValue {
        key: String,
        value: Option<JsonValue>,
        colon_seen: bool,
    },
}

enum FrameKind {
    Array,
    Object,
    KeyValue,
}

impl Frame {
    fn kind(&self) -> FrameKind {
        match self {
            Frame::Array { .. } => FrameKind::Array,
            Frame::Object { .. } => FrameKind::Object,
            Frame::KeyValue { .. } => FrameKind::KeyValue,
        }
    }
}

fn open_container(stack: &mut Vec<Frame>, tok: Token) -> Result<(), ParseError> {
    match &tok.value {
        TokenValue::Operator(b'{') => {
            stack.push(Frame::Object {
                pairs: Vec::new(),
                awaiting_key: true,
            });
            Ok(())
        }
        TokenValue::Operator(b'[') => {
            stack.push(Frame::Array {
                items: Vec::new(),
                awaiting_value: true,
            });
            Ok(())
        }
        _ => Err(ParseError::ExpectedContainer(describe(&tok))),
    }
}

/// Merge a completed value into whatever sits below it on the stack.
/// Returns `Some(value)` once the merge empties the stack (the root value is
/// complete).
fn attach(stack: &mut Vec<Frame>, value: JsonValue) -> Result<Option<JsonValue>, ParseError> {
    match stack.last_mut() {
        None => Ok(Some(value)),
        Some(Frame::Array {
            items,
            awaiting_value,
        }) => {
            items.push(value);
            *awaiting_value = false;
            Ok(None)
        }
        Some(Frame::KeyValue { value: slot, .. }) => {
            *slot = Some(value);
            let (key, value) = match stack.pop() {
                Some(Frame::KeyValue {
                    key,
                    value: Some(v),
                    ..
                }) => (key, v),
                _ => unreachable!("just filled this KeyValue frame"),
            };
            match stack.last_mut() {
                Some(Frame::Object { pairs, awaiting_key }) => {
                    pairs.push((key, value));
                    *awaiting_key = false;
                    Ok(None)
                }
                _ => unreachable!("a KeyValue frame always sits directly atop an Object frame"),
            }
        }
        Some(Frame::Object { .. }) => Err(ParseError::Syntax(
            "a value cannot follow an object key without a ':'".to_string(),
        )),
    }
}

fn step(stack: &mut Vec<Frame>, token: Token) -> Result<Option<JsonValue>, ParseError> {
    let kind = match stack.last() {
        Some(f) => f.kind(),
        None => return Err(ParseError::TrailingTokens),
    };

    match kind {
        FrameKind::Array => {
            let awaiting_value = matches!(stack.last(), Some(Frame::Array { awaiting_value: true, .. }));
            if awaiting_value {
                match &token.value {
                    TokenValue::Operator(b']') => {
                        let is_empty =
                            matches!(stack.last(), Some(Frame::Array { items, .. }) if items.is_empty());
                        if !is_empty {
                            return Err(ParseError::Syntax(
                                "an array must either be empty or contain a value".to_string(),
                            ));
                        }
                        let items = match stack.pop() {
                            Some(Frame::Array { items, .. }) => items,
                            _ => unreachable!(),
                        };
                        attach(stack, JsonValue::Array(items))
                    }
                    TokenValue::Operator(b'{') => {
                        stack.push(Frame::Object {
                            pairs: Vec::new(),
                            awaiting_key: true,
                        });
                        Ok(None)
                    }
                    TokenValue::Operator(b'[') => {
                        stack.push(Frame::Array {
                            items: Vec::new(),
                            awaiting_value: true,
                        });
                        Ok(None)
                    }
                    TokenValue::Operator(_) => Err(ParseError::Syntax(format!(
                        "an array value was expected, got {}",
                        describe(&token)
                    ))),
                    _ => attach(stack, scalar_value(token)),
                }
            } else {
                match &token.value {
                    TokenValue::Operator(b',') => {
                        if let Some(Frame::Array { awaiting_value, .. }) = stack.last_mut() {
                            *awaiting_value = true;
                        }
                        Ok(None)
                    }
                    TokenValue::Operator(b']') => {
                        let items = match stack.pop() {
                            Some(Frame::Array { items, .. }) => items,
                            _ => unreachable!(),
                        };
                        attach(stack, JsonValue::Array(items))
                    }
                    _ => Err(ParseError::Syntax(format!(
                        "array items must be followed by ',' or ']', got {}",
                        describe(&token)
                    ))),
                }
            }
        }

        FrameKind::Object => {
            let awaiting_key = matches!(stack.last(), Some(Frame::Object { awaiting_key: true, .. }));
            if awaiting_key {
                match token.value {
                    TokenValue::Operator(b'}') => {
                        let is_empty =
                            matches!(stack.last(), Some(Frame::Object { pairs, .. }) if pairs.is_empty());
                        if !is_empty {
                            return Err(ParseError::Syntax(
                                "an object must either be empty or contain key-value pairs".to_string(),
                            ));
                        }
                        let pairs = match stack.pop() {
                            Some(Frame::Object { pairs, .. }) => pairs,
                            _ => unreachable!(),
                        };
                        attach(stack, JsonValue::Object(pairs))
                    }
                    TokenValue::String(s) => {
                        stack.push(Frame::KeyValue {
                            key: s,
                            value: None,
                            colon_seen: false,
                        });
                        Ok(None)
                    }
                    other => Err(ParseError::NonStringKey(describe(&Token { value: other }))),
                }
            } else {
                match &token.value {
                    TokenValue::Operator(b',') => {
                        if let Some(Frame::Object { awaiting_key, .. }) = stack.last_mut() {
                            *awaiting_key = true;
                        }
                        Ok(None)
                    }
                    TokenValue::Operator(b'}') => {
                        let pairs = match stack.pop() {
                            Some(Frame::Object { pairs, .. }) => pairs,
                            _ => unreachable!(),
                        };
                        attach(stack, JsonValue::Object(pairs))
                    }
                    _ => Err(ParseError::Syntax(format!(
                        "object key-value pairs must be followed by ',' or '}}', got {}",
                        describe(&token)
                    ))),
                }
            }
        }

        FrameKind::KeyValue => {
            let colon_seen = matches!(stack.last(), Some(Frame::KeyValue { colon_seen: true, .. }));
            if !colon_seen {
                match &token.value {
                    TokenValue::Operator(b':') => {
                        if let Some(Frame::KeyValue { colon_seen, .. }) = stack.last_mut() {
                            *colon_seen = true;
                        }
                        Ok(None)
                    }
                    _ => Err(ParseError::MissingColon(describe(&token))),
                }
            } else {
                match &token.value {
                    TokenValue::Operator(b'{') => {
                        stack.push(Frame::Object {
                            pairs: Vec::new(),
                            awaiting_key: true,
                        });
                        Ok(None)
                    }
                    TokenValue::Operator(b'[') => {
                        stack.push(Frame::Array {
                            items: Vec::new(),
                            awaiting_value: true,
                        });
                        Ok(None)
                    }
                    TokenValue::Operator(_) => Err(ParseError::Syntax(format!(
                        "an object property value was expected, got {}",
                        describe(&token)
                    ))),
                    _ => attach(stack, scalar_value(token)),
                }
            }
        }
    }
}

/// Consume tokens from `tokens`, treating `first` as the already-read
/// opening token (which must be `{` or `[`), and return the single completed
/// [`JsonValue`] it introduces. Does not check for trailing tokens after the
/// value closes — callers that need "exactly one value" semantics (e.g.
/// [`parse`]) must check that themselves; the array-streaming parser (§4.3)
/// deliberately relies on being able to keep reading afterwards.
pub fn parse_value<I>(tokens: &mut I, first: Token) -> Result<JsonValue, ParseError>
where
    I: Iterator<Item = Result<Token, LexError>>,
{
    let mut stack = Vec::new();
    open_container(&mut stack, first)?;

    loop {
        let token = match tokens.next() {
            Some(Ok(t)) => t,
            Some(Err(e)) => return Err(ParseError::Lex(e)),
            None => return Err(ParseError::UnexpectedEnd),
        };
        if let Some(value) = step(&mut stack, token)? {
            return Ok(value);
        }
    }
}

/// Parse a complete token stream into exactly one [`JsonValue`]. Fails if the
/// stream does not start with `{`/`[`, or if anything follows the value once
/// it closes.
pub fn parse<I>(tokens: &mut I) -> Result<JsonValue, ParseError>
where
    I: Iterator<Item = Result<Token, LexError>>,
{
    let first = match tokens.next() {
        Some(Ok(t)) => t,
        Some(Err(e)) => return Err(ParseError::Lex(e)),
        None => return Err(ParseError::UnexpectedEnd),
    };
    let value = parse_value(tokens, first)?;
    match tokens.next() {
        None => Ok(value),
        Some(Ok(_)) => Err(ParseError::TrailingTokens),
        Some(Err(e)) => Err(ParseError::Lex(e)),
    }
}

/// Parse a string slice into exactly one [`JsonValue`], for convenience.
pub fn parse_str(input: &str) -> Result<JsonValue, ParseError> {
    let mut tokens = crate::tokenizer::Tokenizer::new(input.as_bytes());
    parse(&mut tokens)
}
