//! Corpus of malformed documents. Every case here must be rejected with a
//! specific error code by both parser modes -- never panic, never read out
//! of bounds, never return a successful document (spec §7).

use crate::padded::OwnedPaddedInput;
use crate::{ondemand, tape, Error};

fn tape_err(input: &[u8]) -> Error {
    let owned = OwnedPaddedInput::new(input);
    let mut parser = tape::Parser::new(input.len() + 64);
    parser.iterate(owned.as_padded()).map(|_| ()).unwrap_err()
}

/// Drives the on-demand cursor deep enough to surface a structural error:
/// walks every container recursively and forces every scalar to be read.
fn ondemand_err(input: &[u8]) -> Error {
    let owned = OwnedPaddedInput::new(input);
    let mut parser = ondemand::Parser::new(input.len() + 64);
    let doc = match parser.iterate(owned.as_padded()) {
        Ok(doc) => doc,
        Err(e) => return e,
    };
    match walk(doc.get_root().unwrap()) {
        Ok(()) => panic!("expected an error reading {:?}", String::from_utf8_lossy(input)),
        Err(e) => e,
    }
}

fn walk(value: ondemand::Value<'_>) -> Result<(), Error> {
    match value.value_type() {
        ondemand::ValueType::Array => {
            for element in value.as_array()?.iter() {
                walk(element?)?;
            }
            Ok(())
        }
        ondemand::ValueType::Object => {
            for field in value.as_object()?.iter() {
                walk(field?.value)?;
            }
            Ok(())
        }
        ondemand::ValueType::String => value.get_string().map(|_| ()),
        ondemand::ValueType::Number => value.get_double().map(|_| ()),
        ondemand::ValueType::Bool => value.get_bool().map(|_| ()),
        ondemand::ValueType::Null => Ok(()),
    }
}

#[test]
fn empty_input_is_rejected() {
    assert_eq!(Error::Empty, tape_err(b""));
}

// spec §8 scenario 4: tape mode hits the malformed element structurally and
// returns `TAPE_ERROR`; on-demand hands out the comma as a value first, and
// reading it as a number is the first error it surfaces -- `INCORRECT_TYPE`,
// not the `TAPE_ERROR` a continued walk would eventually hit.
#[test]
fn leading_comma_in_array_is_rejected() {
    assert_eq!(Error::TapeError, tape_err(b"[,]"));
    assert_eq!(Error::IncorrectType, ondemand_err(b"[,]"));
}

#[test]
fn trailing_comma_in_array_is_rejected() {
    assert_eq!(Error::TapeError, tape_err(b"[1,2,]"));
}

#[test]
fn trailing_comma_in_object_is_rejected() {
    assert_eq!(Error::TapeError, tape_err(br#"{"a":1,}"#));
}

#[test]
fn missing_colon_is_rejected() {
    assert_eq!(Error::TapeError, tape_err(br#"{"a" 1}"#));
}

#[test]
fn missing_comma_between_array_elements_is_rejected() {
    assert_eq!(Error::TapeError, tape_err(b"[1 2]"));
}

#[test]
fn mismatched_close_bracket_is_rejected() {
    assert_eq!(Error::TapeError, tape_err(b"[1,2}"));
    assert_eq!(Error::TapeError, tape_err(br#"{"a":1]"#));
}

#[test]
fn unclosed_array_is_rejected() {
    assert_eq!(Error::IncompleteArrayOrObject, tape_err(b"[1,2"));
}

#[test]
fn unclosed_object_is_rejected() {
    assert_eq!(Error::IncompleteArrayOrObject, tape_err(br#"{"a":1"#));
}

#[test]
fn unclosed_string_is_rejected() {
    assert_eq!(Error::UnclosedString, tape_err(br#"{"a":"unterminated}"#));
}

#[test]
fn unclosed_string_with_trailing_escape_is_rejected() {
    // an odd number of trailing backslashes means the closing quote is
    // itself escaped away, so the string never terminates.
    assert_eq!(Error::UnclosedString, tape_err(b"\"abc\\\""));
}

#[test]
fn unknown_escape_is_rejected() {
    assert_eq!(Error::StringError, tape_err(br#""bad \j escape""#));
}

#[test]
fn unpaired_high_surrogate_is_rejected() {
    assert_eq!(Error::StringError, tape_err(br#""\ud800""#));
}

#[test]
fn unpaired_low_surrogate_is_rejected() {
    assert_eq!(Error::StringError, tape_err(br#""\udc00""#));
}

#[test]
fn bad_true_atom_is_rejected() {
    assert_eq!(Error::TAtomError, tape_err(b"tru "));
    assert_eq!(Error::TAtomError, tape_err(b"truee"));
}

#[test]
fn bad_false_atom_is_rejected() {
    assert_eq!(Error::FAtomError, tape_err(b"fals "));
}

#[test]
fn bad_null_atom_is_rejected() {
    assert_eq!(Error::NAtomError, tape_err(b"nul "));
}

#[test]
fn leading_zero_in_number_is_rejected() {
    assert_eq!(Error::NumberError, tape_err(b"01"));
}

#[test]
fn bare_dot_number_is_rejected() {
    assert_eq!(Error::NumberError, tape_err(b".5"));
}

#[test]
fn missing_exponent_digits_is_rejected() {
    assert_eq!(Error::NumberError, tape_err(b"1e"));
}

#[test]
fn trailing_content_after_root_is_rejected() {
    assert_eq!(Error::TrailingContent, tape_err(b"1 2"));
    assert_eq!(Error::TrailingContent, tape_err(br#"{} {}"#));
}

#[test]
fn unescaped_control_char_in_string_is_rejected() {
    assert_eq!(Error::UnescapedChars, tape_err(b"\"a\nb\""));
}

#[test]
fn invalid_utf8_is_rejected() {
    assert_eq!(Error::Utf8Error, tape_err(b"\"\xff\xfe\""));
}

#[test]
fn overlong_utf8_is_rejected() {
    // a two-byte overlong encoding of `/` (U+002F)
    assert_eq!(Error::Utf8Error, tape_err(b"\"\xc0\xaf\""));
}

#[test]
fn truncated_utf8_sequence_at_eof_is_rejected() {
    assert_eq!(Error::Utf8Error, tape_err(b"\"\xe2\x82\""));
}

#[test]
fn depth_guard_rejects_runaway_nesting() {
    let json = "[".repeat(2000) + &"]".repeat(2000);
    let owned = OwnedPaddedInput::new(json.as_bytes());
    let mut parser = tape::Parser::new(json.len() + 64);
    assert_eq!(Error::DepthError, parser.iterate(owned.as_padded()).map(|_| ()).unwrap_err());
}

#[test]
fn capacity_limit_is_enforced() {
    let owned = OwnedPaddedInput::new(b"[1,2,3]");
    let mut parser = tape::Parser::new(4);
    assert_eq!(Error::Capacity, parser.iterate(owned.as_padded()).map(|_| ()).unwrap_err());
}

#[test]
fn no_such_field_does_not_panic() {
    let owned = OwnedPaddedInput::new(br#"{"a":1}"#);
    let mut parser = tape::Parser::new(64);
    let doc = parser.iterate(owned.as_padded()).unwrap();
    let obj = doc.get_root().unwrap().as_object().unwrap();
    assert_eq!(Error::NoSuchField, obj.find_field("missing").unwrap_err());
}

#[test]
fn index_out_of_bounds_does_not_panic() {
    let owned = OwnedPaddedInput::new(b"[1,2,3]");
    let mut parser = tape::Parser::new(64);
    let doc = parser.iterate(owned.as_padded()).unwrap();
    let arr = doc.get_root().unwrap().as_array().unwrap();
    assert_eq!(Error::IndexOutOfBounds, arr.at(10).unwrap_err());
}

#[cfg(any(all(test, debug), checked))]
#[test]
fn reading_a_stale_value_after_advancing_is_out_of_order() {
    let owned = OwnedPaddedInput::new(br#"{"a":1,"b":2}"#);
    let mut parser = ondemand::Parser::new(64);
    let doc = parser.iterate(owned.as_padded()).unwrap();
    let obj = doc.get_root().unwrap().as_object().unwrap();

    let mut iter = obj.iter();
    let first = iter.next().unwrap().unwrap();
    let _second = iter.next().unwrap().unwrap();

    assert_eq!(Err(Error::OutOfOrderIteration), first.value.get_int64());
}
