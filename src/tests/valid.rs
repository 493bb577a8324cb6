//! Corpus of accepted documents, checked against both parser modes and
//! cross-checked against `serde_json` (spec §8 P3, P5).

use crate::padded::OwnedPaddedInput;
use crate::tests::some;
use crate::{ondemand, tape};

use serde_json::json;

fn parse_both(json: &str) -> (serde_json::Value, serde_json::Value) {
    let owned = OwnedPaddedInput::new(json.as_bytes());

    let mut tape_parser = tape::Parser::new(json.len() + 64);
    let tape_value = tape_parser.iterate(owned.as_padded()).unwrap().to_value().unwrap();

    let mut ondemand_parser = ondemand::Parser::new(json.len() + 64);
    let doc = ondemand_parser.iterate(owned.as_padded()).unwrap();
    let ondemand_value = ondemand_to_value(doc.get_root().unwrap());

    (tape_value, ondemand_value)
}

fn ondemand_to_value(value: ondemand::Value<'_>) -> serde_json::Value {
    use std::str::FromStr;

    match value.value_type() {
        ondemand::ValueType::Null => serde_json::Value::Null,
        ondemand::ValueType::Bool => serde_json::Value::Bool(value.get_bool().unwrap()),
        ondemand::ValueType::String => serde_json::Value::String(value.get_string().unwrap().to_owned()),
        ondemand::ValueType::Number => {
            if let Ok(token) = value.get_bigint_token() {
                match serde_json::Number::from_str(token) {
                    Ok(n) => serde_json::Value::Number(n),
                    Err(_) => serde_json::Value::String(token.to_owned()),
                }
            } else if let Ok(v) = value.get_int64() {
                serde_json::Value::Number(v.into())
            } else if let Ok(v) = value.get_uint64() {
                serde_json::Value::Number(v.into())
            } else {
                serde_json::Number::from_f64(value.get_double().unwrap())
                    .map(serde_json::Value::Number)
                    .unwrap_or(serde_json::Value::Null)
            }
        }
        ondemand::ValueType::Array => serde_json::Value::Array(
            value.as_array().unwrap().iter().map(|v| ondemand_to_value(v.unwrap())).collect(),
        ),
        ondemand::ValueType::Object => {
            let mut out = serde_json::Map::new();
            for field in value.as_object().unwrap().iter() {
                let field = field.unwrap();
                out.insert(field.key.to_owned(), ondemand_to_value(field.value));
            }
            serde_json::Value::Object(out)
        }
    }
}

fn assert_parses_as(input: &str, expected: serde_json::Value) {
    let expected_serde: serde_json::Value = serde_json::from_str(input).unwrap();
    assert_eq!(expected, expected_serde, "test fixture disagrees with serde_json");

    let (tape_value, ondemand_value) = parse_both(input);
    assert_eq!(expected, tape_value, "tape mode disagreed on `{}`", input);
    assert_eq!(expected, ondemand_value, "on-demand mode disagreed on `{}`", input);
}

#[test]
fn reads_scalar_documents() {
    assert_parses_as("42", json!(42));
    assert_parses_as("-17", json!(-17));
    assert_parses_as("3.5", json!(3.5));
    assert_parses_as("true", json!(true));
    assert_parses_as("false", json!(false));
    assert_parses_as("null", json!(null));
    assert_parses_as(r#""hello""#, json!("hello"));
}

#[test]
fn reads_empty_containers() {
    assert_parses_as("{}", json!({}));
    assert_parses_as("[]", json!([]));
}

#[test]
fn reads_nested_containers() {
    assert_parses_as(
        r#"{"a":[1,2,3],"b":{"c":true},"d":[{},{},{}]}"#,
        json!({"a": [1,2,3], "b": {"c": true}, "d": [{}, {}, {}]}),
    );
}

// spec §8 scenario 1.
#[test]
fn array_of_three_integers() {
    assert_parses_as("[1,2,3]", json!([1, 2, 3]));

    let owned = OwnedPaddedInput::new(b"[1,2,3]");
    let mut parser = ondemand::Parser::new(64);
    let doc = parser.iterate(owned.as_padded()).unwrap();
    let arr = doc.get_root().unwrap().as_array().unwrap();
    let values: Vec<i64> = arr.iter().map(|v| v.unwrap().get_int64().unwrap()).collect();
    assert_eq!(vec![1, 2, 3], values);
    assert_eq!(3, arr.count_elements().unwrap());
}

#[test]
fn reads_whitespace_between_tokens() {
    assert_parses_as(" { \"a\" : 1 , \"b\" : [ 1 , 2 ] }\n", json!({"a": 1, "b": [1, 2]}));
}

#[test]
fn reads_numbers_across_all_classes() {
    assert_parses_as(
        r#"[0,-0,123,-123,1.5,-1.5e10,1E-10,9223372036854775807,18446744073709551615]"#,
        json!([0, 0, 123, -123, 1.5, -1.5e10, 1e-10, 9223372036854775807i64, 18446744073709551615u64]),
    );
}

// spec §8 scenario 3: a `big_integer` literal is only readable as a raw
// token, not as a fixed-width accessor; note this is a point of deliberate
// divergence from `serde_json`'s default `Value`, which silently rounds a
// too-big integer literal to an `f64` instead of preserving it exactly.
#[test]
fn big_integer_literal_is_readable_only_as_raw_token() {
    let owned = OwnedPaddedInput::new(b"18446744073709551616");

    let mut tape_parser = tape::Parser::new(64);
    let doc = tape_parser.iterate(owned.as_padded()).unwrap();
    let root = doc.get_root().unwrap();
    assert_eq!(Err(crate::Error::IncorrectType), root.get_int64());
    assert_eq!("18446744073709551616", root.get_bigint_token().unwrap());

    let mut ondemand_parser = ondemand::Parser::new(64);
    let doc = ondemand_parser.iterate(owned.as_padded()).unwrap();
    let root = doc.get_root().unwrap();
    assert_eq!(Err(crate::Error::IncorrectType), root.get_int64());
    assert_eq!("18446744073709551616", root.get_bigint_token().unwrap());
    assert_eq!("18446744073709551616", root.raw_json_token().unwrap());
}

#[test]
fn reads_strings_with_every_simple_escape() {
    assert_parses_as(r#""\"\\\/\b\f\n\r\t""#, json!("\"\\/\u{8}\u{c}\n\r\t"));
}

// spec §8 scenario 5.
#[test]
fn reads_unicode_escape_in_key_and_value() {
    assert_parses_as(r#"{"key":1}"#, json!({"key": 1}));
}

#[test]
fn reads_surrogate_pair_escape() {
    assert_parses_as(r#""😀""#, json!("\u{1F600}"));
}

// P7: runs of backslashes collapse to floor(n/2) literal backslashes.
#[test]
fn reads_backslash_runs() {
    assert_parses_as(r#""\\""#, json!("\\"));
    assert_parses_as(r#""\\\\""#, json!("\\\\"));
    assert_parses_as("\"\\\\\\\"\"", json!("\\\""));
}

#[test]
fn reads_generated_documents() {
    let iterations = if cfg!(debug_assertions) { 200 } else { 2000 };

    for _ in 0..iterations {
        let input = some::json_object();
        assert_parses_as(&input, serde_json::from_str(&input).unwrap());
    }
}
