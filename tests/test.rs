use arraytap::producer::SliceProducer;
use arraytap::source::{NoPrelude, Source};
use arraytap::{parse_str, JsonValue, Token, TokenKind, TokenValue, Tokenizer};

fn reference_decode(json: &str) -> JsonValue {
    from_serde(&serde_json::from_str(json).unwrap())
}

fn from_serde(v: &serde_json::Value) -> JsonValue {
    match v {
        serde_json::Value::Null => JsonValue::Null,
        serde_json::Value::Bool(b) => JsonValue::Bool(*b),
        serde_json::Value::Number(n) => {
            if let Some(i) = n.as_i64() {
                JsonValue::Int(i)
            } else {
                JsonValue::Float(n.as_f64().unwrap())
            }
        }
        serde_json::Value::String(s) => JsonValue::String(s.clone()),
        serde_json::Value::Array(items) => JsonValue::Array(items.iter().map(from_serde).collect()),
        serde_json::Value::Object(map) => {
            JsonValue::Object(map.iter().map(|(k, v)| (k.clone(), from_serde(v))).collect())
        }
    }
}

// --- invariant 1: parse(tokenize(J)) == reference_decode(J) ---

#[test]
fn parses_match_reference_decode() {
    let cases = [
        r#"{"name":"Elvis","age":42}"#,
        r#"[1, 2.5, -3, true, false, null, "x"]"#,
        r#"{"a":{"b":{"c":[1,2,3]}}}"#,
        r#"[]"#,
        r#"{}"#,
        r#"["just a string"]"#,
        r#"[-17, 3.14]"#,
    ];
    for c in cases {
        assert_eq!(parse_str(c).unwrap(), reference_decode(c), "case: {c}");
    }
}

// --- invariant 2: stream_array elements match reference_decode ---

#[test]
fn array_stream_matches_reference_decode() {
    let json = r#"["Apples", "Bananas", ["Pears", "Limes"]]"#;
    let source = Source::new(SliceProducer::new(json.as_bytes()));
    let items: Vec<JsonValue> = source
        .iterate(NoPrelude)
        .unwrap()
        .map(|r| r.unwrap())
        .collect();
    let expected = match reference_decode(json) {
        JsonValue::Array(items) => items,
        _ => unreachable!(),
    };
    assert_eq!(items, expected);
}

#[test]
fn empty_array_streams_nothing() {
    let source = Source::new(SliceProducer::new(b"[]"));
    let items: Vec<_> = source.iterate(NoPrelude).unwrap().collect();
    assert!(items.is_empty());
}

// --- invariant 3: full_document reconstructs the original regardless of prelude ---

#[test]
fn full_document_reconstructs_original_with_prelude_lossless() {
    let json = r#"{"name":"abcdefghijklmnopqrstuvwxyz1234567890","type":"foo","dataset":[{"a":1,"b":[]},{"a":2,"b":[]},{"a":3,"b":[]}]}"#;

    let find_dataset = |source: &mut Source<SliceProducer>, skip: &mut arraytap::source::SkipBuffer| loop {
        if skip.ends_with(b"\"dataset\":") {
            return true;
        }
        match source.read_byte() {
            Some(b) => skip.push(b),
            None => return false,
        }
    };

    let source = Source::new(SliceProducer::new(json.as_bytes())).lossless(true);
    let mut stream = source.iterate(find_dataset).unwrap();

    let mut items = Vec::new();
    while let Some(item) = stream.next() {
        items.push(item.unwrap());
    }
    assert_eq!(items.len(), 3);
    for (i, item) in items.iter().enumerate() {
        assert_eq!(item.get("a").unwrap(), &JsonValue::Int(i as i64 + 1));
        assert_eq!(item.get("b").unwrap(), &JsonValue::Array(vec![]));
    }

    let mut source = stream.into_tokenizer().into_inner();
    let full = source.full_document().unwrap().unwrap();
    assert_eq!(full, reference_decode(json));
}

#[test]
fn full_document_is_absent_when_not_lossless() {
    let json = r#"{"dataset":[1,2,3]}"#;

    let find_dataset = |source: &mut Source<SliceProducer>, skip: &mut arraytap::source::SkipBuffer| loop {
        if skip.ends_with(b"\"dataset\":") {
            return true;
        }
        match source.read_byte() {
            Some(b) => skip.push(b),
            None => return false,
        }
    };

    let source = Source::new(SliceProducer::new(json.as_bytes())).lossless(false);
    let mut stream = source.iterate(find_dataset).unwrap();
    while stream.next().is_some() {}

    let mut source = stream.into_tokenizer().into_inner();
    assert_eq!(source.full_document().unwrap(), None);
}

// --- invariant 4: chunk size does not affect the yielded sequence ---

#[test]
fn chunk_size_does_not_affect_tokens() {
    let json = r#"[1, "two", 3.5, {"a": [true, false, null]}]"#;
    for chunk_size in [1, 3, 1024] {
        let source = Source::new(SliceProducer::new(json.as_bytes())).with_chunk_size(chunk_size);
        let mut stream = source.iterate(NoPrelude).unwrap();
        let items: Vec<JsonValue> = stream.by_ref().map(|r| r.unwrap()).collect();
        assert_eq!(JsonValue::Array(items), reference_decode(json));

        let mut source = stream.into_tokenizer().into_inner();
        assert_eq!(source.full_document().unwrap().unwrap(), reference_decode(json));
    }
}

// --- invariant 5: error index equals characters delivered before the offending one ---

#[test]
fn lex_error_reports_delivered_count() {
    let input = b"[1, 2a]";
    let mut tokens = Tokenizer::new(input.as_slice());
    let err = loop {
        match tokens.next().unwrap() {
            Ok(_) => continue,
            Err(e) => break e,
        }
    };
    // "2a" starts at index 4; the offending 'a' is at index 5.
    assert_eq!(err.index, 5);
}

// --- concrete scenario 6: token wire form ---

#[test]
fn tokenizes_to_expected_wire_form() {
    let mut tokens = Tokenizer::new(r#"123 "abc":{}"#.as_bytes());
    let collected: Vec<Token> = std::iter::from_fn(|| tokens.next()).map(|r| r.unwrap()).collect();

    let kinds_and_values: Vec<(TokenKind, TokenValue)> =
        collected.iter().map(|t| (t.kind(), t.value.clone())).collect();

    assert_eq!(
        kinds_and_values,
        vec![
            (TokenKind::Number, TokenValue::Number(arraytap::Number::Int(123))),
            (TokenKind::String, TokenValue::String("abc".to_string())),
            (TokenKind::Operator, TokenValue::Operator(b':')),
            (TokenKind::Operator, TokenValue::Operator(b'{')),
            (TokenKind::Operator, TokenValue::Operator(b'}')),
        ]
    );
}

// --- rejection list ---

fn assert_rejected(json: &str) {
    assert!(
        parse_str(json).is_err(),
        "expected {json:?} to be rejected"
    );
}

#[test]
fn rejects_malformed_numbers() {
    for bad in ["01", "1.", "-01", "2a", "-a", "3.b", "3.e10", "3.6ea", "67.8e+a"] {
        assert_rejected(&format!("[{bad}]"));
    }
}

#[test]
fn rejects_malformed_string_escapes() {
    for bad in [r#""\uay76""#, r#""\h""#, r#""\2""#, r#""\!""#, r#""\u!""#] {
        assert_rejected(&format!("[{bad}]"));
    }
}

#[test]
fn rejects_tokens_trailing_a_value() {
    for bad in [r#"123"text""#, "23.9e10true", r#""test"56"#] {
        assert_rejected(bad);
    }
}

#[test]
fn rejects_grammar_violations() {
    for bad in [
        r#"["People", "Places" "Things"]"#,
        "{",
        r#"{"key": "value""#,
        r#"{"key": "value"}}"#,
        r#"{"key": "value", "value2"}"#,
        r#"{"key", "value": "value2"}"#,
    ] {
        assert_rejected(bad);
    }
}
