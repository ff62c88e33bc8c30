use sax_json::{Event, Tokenizer};

fn events_with_offsets(json: &str) -> Vec<(Event, usize)> {
    let mut tokenizer = Tokenizer::new();
    tokenizer.feed(json.as_bytes()).unwrap();
    tokenizer.finish().unwrap();
    std::iter::from_fn(|| tokenizer.next_event()).collect()
}

fn events(json: &str) -> Vec<Event> {
    events_with_offsets(json)
        .into_iter()
        .map(|(event, _)| event)
        .collect()
}

#[test]
fn test_scalar_values() {
    assert_eq!(events("42"), [Event::Int(42)]);
    assert_eq!(events("-7"), [Event::Int(-7)]);
    assert_eq!(events("0"), [Event::Int(0)]);
    assert_eq!(events("3.5"), [Event::Double(3.5)]);
    assert_eq!(events("-0.5e2"), [Event::Double(-50.0)]);
    assert_eq!(events("1E3"), [Event::Double(1000.0)]);
    assert_eq!(events("true"), [Event::Bool(true)]);
    assert_eq!(events("false"), [Event::Bool(false)]);
    assert_eq!(events("null"), [Event::Null]);
    assert_eq!(events(r#""hello""#), [Event::String("hello".to_string())]);
}

#[test]
fn test_integer_boundaries() {
    assert_eq!(
        events("9223372036854775807"),
        [Event::Int(i64::MAX)]
    );
    assert_eq!(
        events("-9223372036854775808"),
        [Event::Int(i64::MIN)]
    );
    // One past the i64 range widens to a double.
    assert_eq!(
        events("9223372036854775808"),
        [Event::Double(9_223_372_036_854_775_808.0)]
    );
}

#[test]
fn test_string_escapes() {
    assert_eq!(
        events(r#""a\nb\t\"c\"\\""#),
        [Event::String("a\nb\t\"c\"\\".to_string())]
    );
    assert_eq!(
        events(r#""\u0041""#),
        [Event::String("A".to_string())]
    );
    assert_eq!(
        events(r#""\u00e9\u0416""#),
        [Event::String("\u{e9}\u{416}".to_string())]
    );
    // A surrogate pair combines into one code point.
    assert_eq!(
        events(r#""\ud83d\ude00""#),
        [Event::String("\u{1f600}".to_string())]
    );
    // Raw multi-byte UTF-8 passes through unchanged.
    assert_eq!(
        events("\"\u{e9}\u{416}\u{1f600}\""),
        [Event::String("\u{e9}\u{416}\u{1f600}".to_string())]
    );
}

#[test]
fn test_empty_containers() {
    assert_eq!(events("{}"), [Event::ObjectStart, Event::ObjectEnd]);
    assert_eq!(events("[]"), [Event::ArrayStart, Event::ArrayEnd]);
    assert_eq!(events("  [ ]  "), [Event::ArrayStart, Event::ArrayEnd]);
}

#[test]
fn test_object_keys_vs_value_strings() {
    assert_eq!(
        events(r#"{"k": "v"}"#),
        [
            Event::ObjectStart,
            Event::Key("k".to_string()),
            Event::String("v".to_string()),
            Event::ObjectEnd,
        ]
    );
}

#[test]
fn test_nested_structure() {
    assert_eq!(
        events(r#"{"a": [1, {"b": null}], "c": true}"#),
        [
            Event::ObjectStart,
            Event::Key("a".to_string()),
            Event::ArrayStart,
            Event::Int(1),
            Event::ObjectStart,
            Event::Key("b".to_string()),
            Event::Null,
            Event::ObjectEnd,
            Event::ArrayEnd,
            Event::Key("c".to_string()),
            Event::Bool(true),
            Event::ObjectEnd,
        ]
    );
}

#[test]
fn test_event_offsets() {
    let got = events_with_offsets(r#"{"a": [1, 2]}"#);
    let expected = [
        (Event::ObjectStart, 0),
        (Event::Key("a".to_string()), 1),
        (Event::ArrayStart, 6),
        (Event::Int(1), 7),
        (Event::Int(2), 10),
        (Event::ArrayEnd, 11),
        (Event::ObjectEnd, 12),
    ];
    assert_eq!(got, expected);
}

#[test]
fn test_top_level_number_flushed_by_finish() {
    let mut tokenizer = Tokenizer::new();
    tokenizer.feed(b"123").unwrap();
    // Nothing yet: the number could continue in the next chunk.
    assert!(tokenizer.next_event().is_none());
    tokenizer.finish().unwrap();
    assert_eq!(tokenizer.next_event(), Some((Event::Int(123), 0)));
}

#[test]
fn test_position_advances() {
    let mut tokenizer = Tokenizer::new();
    assert_eq!(tokenizer.position(), 0);
    tokenizer.feed(b"[1, 2").unwrap();
    assert_eq!(tokenizer.position(), 5);
    tokenizer.feed(b"]").unwrap();
    assert_eq!(tokenizer.position(), 6);
}

#[test]
fn test_reset_restarts_the_document() {
    let mut tokenizer = Tokenizer::new();
    tokenizer.feed(b"[1, ").unwrap();
    tokenizer.reset();
    tokenizer.feed(b"true").unwrap();
    tokenizer.finish().unwrap();
    let got: Vec<(Event, usize)> = std::iter::from_fn(|| tokenizer.next_event()).collect();
    assert_eq!(got, [(Event::Bool(true), 0)]);
}
