/*!
Tape-mode document navigation (spec §6 "Output — tape mode").

A thin decoder over the `(tape, string_buf, input)` triple the builder
produces. Every value is already materialized, so unlike [`crate::ondemand`]
there's no lazy state to track: this is a straightforward walk, grounded in
how `examples/original_source/src/generic/implementation_simdjson_result.h`-
style tape readers decode one word at a time.
*/

use crate::error::Error;
use crate::pointer;

use super::writer::{decode, unpack_start_payload, TapeTag};

/// The root of a parsed document (spec §6).
#[derive(Debug, Clone, Copy)]
pub struct Document<'p> {
    input: &'p [u8],
    tape: &'p [u64],
    string_buf: &'p [u8],
}

impl<'p> Document<'p> {
    pub(crate) fn new(input: &'p [u8], tape: &'p [u64], string_buf: &'p [u8]) -> Self {
        Document { input, tape, string_buf }
    }

    /// The document's single root value.
    pub fn get_root(&self) -> Result<Value<'p>, Error> {
        self.value_at(1)
    }

    /// Resolve an RFC 6901 JSON Pointer against this document's root.
    pub fn at_pointer(&self, json_pointer: &str) -> Result<Value<'p>, Error> {
        self.get_root()?.at_pointer(json_pointer)
    }

    fn value_at(&self, index: usize) -> Result<Value<'p>, Error> {
        let (tag, payload) = decode(*tape_get_unchecked!(self.tape, index));
        Ok(match tag {
            TapeTag::Null => Value::Null,
            TapeTag::True => Value::Bool(true),
            TapeTag::False => Value::Bool(false),
            TapeTag::Int64 => Value::Int64(*tape_get_unchecked!(self.tape, index + 1) as i64),
            TapeTag::Uint64 => Value::Uint64(*tape_get_unchecked!(self.tape, index + 1)),
            TapeTag::Double => Value::Double(f64::from_bits(*tape_get_unchecked!(self.tape, index + 1))),
            TapeTag::BigInt => {
                let (offset, len) = unpack_start_payload(payload);
                let text = from_utf8_unchecked!(&self.input[offset..offset + len as usize]);
                Value::BigInt(text)
            }
            TapeTag::String => Value::String(self.decode_string(payload as usize)),
            TapeTag::StartObject => {
                let (end, count) = unpack_start_payload(payload);
                Value::Object(Object {
                    input: self.input,
                    tape: self.tape,
                    string_buf: self.string_buf,
                    start: index + 1,
                    end,
                    count,
                })
            }
            TapeTag::StartArray => {
                let (end, count) = unpack_start_payload(payload);
                Value::Array(Array {
                    input: self.input,
                    tape: self.tape,
                    string_buf: self.string_buf,
                    start: index + 1,
                    end,
                    count,
                })
            }
            TapeTag::EndObject | TapeTag::EndArray | TapeTag::Root => {
                test_unreachable!("value_at landed on a non-value tape word");
                #[allow(unreachable_code)]
                return Err(Error::UnexpectedError);
            }
        })
    }

    fn decode_string(&self, offset: usize) -> &'p str {
        let len = u32::from_le_bytes(
            get_unchecked!(self.string_buf, offset..offset + 4)
                .try_into()
                .expect("4-byte length prefix"),
        ) as usize;
        from_utf8_unchecked!(get_unchecked!(self.string_buf, offset + 4..offset + 4 + len))
    }
}

/// A decoded JSON value, backed by the tape (spec §6).
#[derive(Debug, Clone, Copy)]
pub enum Value<'p> {
    Null,
    Bool(bool),
    Int64(i64),
    Uint64(u64),
    Double(f64),
    /// An integer literal with more significant digits than fit in a
    /// `u64` (spec §4.9); only the raw token is available.
    BigInt(&'p str),
    String(&'p str),
    Array(Array<'p>),
    Object(Object<'p>),
}

impl<'p> Value<'p> {
    pub fn is_null(&self) -> bool {
        matches!(self, Value::Null)
    }

    pub fn get_bool(&self) -> Result<bool, Error> {
        match self {
            Value::Bool(b) => Ok(*b),
            _ => Err(Error::IncorrectType),
        }
    }

    /// Succeeds for any integer or unsigned-integer tape entry that fits in
    /// an `i64`; an out-of-range value is `INCORRECT_TYPE`, not
    /// `NUMBER_OUT_OF_RANGE` (spec §7).
    pub fn get_int64(&self) -> Result<i64, Error> {
        match self {
            Value::Int64(v) => Ok(*v),
            Value::Uint64(v) if *v <= i64::MAX as u64 => Ok(*v as i64),
            _ => Err(Error::IncorrectType),
        }
    }

    pub fn get_uint64(&self) -> Result<u64, Error> {
        match self {
            Value::Uint64(v) => Ok(*v),
            Value::Int64(v) if *v >= 0 => Ok(*v as u64),
            _ => Err(Error::IncorrectType),
        }
    }

    pub fn get_double(&self) -> Result<f64, Error> {
        match self {
            Value::Double(v) => Ok(*v),
            Value::Int64(v) => Ok(*v as f64),
            Value::Uint64(v) => Ok(*v as f64),
            _ => Err(Error::IncorrectType),
        }
    }

    pub fn get_string(&self) -> Result<&'p str, Error> {
        match self {
            Value::String(s) => Ok(s),
            _ => Err(Error::IncorrectType),
        }
    }

    /// The raw literal of a big-integer value, e.g. `"18446744073709551616"`.
    pub fn get_bigint_token(&self) -> Result<&'p str, Error> {
        match self {
            Value::BigInt(s) => Ok(s),
            _ => Err(Error::BigintError),
        }
    }

    pub fn as_array(&self) -> Result<Array<'p>, Error> {
        match self {
            Value::Array(a) => Ok(*a),
            _ => Err(Error::IncorrectType),
        }
    }

    pub fn as_object(&self) -> Result<Object<'p>, Error> {
        match self {
            Value::Object(o) => Ok(*o),
            _ => Err(Error::IncorrectType),
        }
    }

    /// Resolve an RFC 6901 JSON Pointer relative to this value.
    ///
    /// Each token's meaning depends on what it's resolved against: inside
    /// an object it's always a literal key (even a digit string, even
    /// `"-"`); inside an array it must be `"-"` (always an error on read --
    /// RFC 6901 §4) or a valid non-negative index with no leading zero.
    pub fn at_pointer(&self, json_pointer: &str) -> Result<Value<'p>, Error> {
        let tokens = pointer::tokenize(json_pointer)?;
        let mut current = *self;
        for token in tokens {
            current = match current {
                Value::Object(o) => o.find_field(&token)?,
                Value::Array(a) => a.at(parse_array_token(&token)?)?,
                _ => return Err(Error::IncorrectType),
            };
        }
        Ok(current)
    }
}

/// A lazily-walked object (spec §4.8, realized eagerly here since the tape
/// already holds every value).
#[derive(Debug, Clone, Copy)]
pub struct Object<'p> {
    input: &'p [u8],
    tape: &'p [u64],
    string_buf: &'p [u8],
    start: usize,
    end: usize,
    count: u32,
}

impl<'p> Object<'p> {
    pub fn count_fields(&self) -> u32 {
        self.count
    }

    pub fn iter(&self) -> ObjectIterator<'p> {
        ObjectIterator { doc: self.document(), pos: self.start, end: self.end }
    }

    /// Find the first field with the given key, scanning forward from the
    /// start of the object (spec §4.8 `find_field`).
    pub fn find_field(&self, key: &str) -> Result<Value<'p>, Error> {
        for field in self.iter() {
            let field = field?;
            if field.key == key {
                return Ok(field.value);
            }
        }
        Err(Error::NoSuchField)
    }

    /// Same as [`Object::find_field`] -- the tape holds every field up
    /// front, so "unordered" and "ordered" search cost the same here; the
    /// distinction matters for [`crate::ondemand`], which can't re-scan
    /// without rewinding.
    pub fn find_field_unordered(&self, key: &str) -> Result<Value<'p>, Error> {
        self.find_field(key)
    }

    /// Equivalent to `[key]` in the spec's shape (spec §4.8) -- unordered
    /// lookup, exposed as a plain method since `std::ops::Index` can't
    /// return a fallible, owned `Value`.
    pub fn get(&self, key: &str) -> Result<Value<'p>, Error> {
        self.find_field_unordered(key)
    }

    fn document(&self) -> Document<'p> {
        Document { input: self.input, tape: self.tape, string_buf: self.string_buf }
    }
}

/// One key/value pair of an [`Object`].
#[derive(Debug, Clone, Copy)]
pub struct Field<'p> {
    pub key: &'p str,
    pub value: Value<'p>,
}

pub struct ObjectIterator<'p> {
    doc: Document<'p>,
    pos: usize,
    end: usize,
}

impl<'p> Iterator for ObjectIterator<'p> {
    type Item = Result<Field<'p>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.end {
            return None;
        }

        let key = self.doc.decode_string({
            let (tag, payload) = decode(*tape_get_unchecked!(self.doc.tape, self.pos));
            test_assert_eq!(TapeTag::String, tag);
            payload as usize
        });
        self.pos += 1;

        let value = match self.doc.value_at(self.pos) {
            Ok(v) => v,
            Err(e) => return Some(Err(e)),
        };
        self.pos = next_sibling(self.doc.tape, self.pos);

        Some(Ok(Field { key, value }))
    }
}

/// A lazily-walked array (spec §4.8, eager here -- see [`Object`]'s doc).
#[derive(Debug, Clone, Copy)]
pub struct Array<'p> {
    input: &'p [u8],
    tape: &'p [u64],
    string_buf: &'p [u8],
    start: usize,
    end: usize,
    count: u32,
}

impl<'p> Array<'p> {
    pub fn count_elements(&self) -> u32 {
        self.count
    }

    pub fn iter(&self) -> ArrayIterator<'p> {
        ArrayIterator { doc: self.document(), pos: self.start, end: self.end }
    }

    pub fn at(&self, index: usize) -> Result<Value<'p>, Error> {
        match self.iter().nth(index) {
            Some(result) => result,
            None => Err(Error::IndexOutOfBounds),
        }
    }

    pub fn at_pointer(&self, json_pointer: &str) -> Result<Value<'p>, Error> {
        Value::Array(*self).at_pointer(json_pointer)
    }

    fn document(&self) -> Document<'p> {
        Document { input: self.input, tape: self.tape, string_buf: self.string_buf }
    }
}

pub struct ArrayIterator<'p> {
    doc: Document<'p>,
    pos: usize,
    end: usize,
}

impl<'p> Iterator for ArrayIterator<'p> {
    type Item = Result<Value<'p>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.pos >= self.end {
            return None;
        }

        let value = match self.doc.value_at(self.pos) {
            Ok(v) => v,
            Err(e) => return Some(Err(e)),
        };
        self.pos = next_sibling(self.doc.tape, self.pos);

        Some(Ok(value))
    }
}

/// Parse a pointer token as an array index: no leading zero (unless the
/// token is exactly `"0"`), all ASCII digits, `"-"` rejected explicitly.
fn parse_array_token(token: &str) -> Result<usize, Error> {
    if token == "-" || token.is_empty() {
        return Err(Error::InvalidJsonPointer);
    }
    if token.len() > 1 && token.starts_with('0') {
        return Err(Error::InvalidJsonPointer);
    }
    token.parse().map_err(|_| Error::InvalidJsonPointer)
}

#[cfg(any(test, feature = "serde_json"))]
impl<'p> Document<'p> {
    /// Convert this document into a [`serde_json::Value`].
    pub fn to_value(&self) -> Result<serde_json::Value, Error> {
        self.get_root()?.to_value()
    }
}

#[cfg(any(test, feature = "serde_json"))]
impl<'p> Value<'p> {
    /// Convert this value into a [`serde_json::Value`], recursing into
    /// containers.
    pub fn to_value(&self) -> Result<serde_json::Value, Error> {
        use std::str::FromStr;

        Ok(match self {
            Value::Null => serde_json::Value::Null,
            Value::Bool(b) => serde_json::Value::Bool(*b),
            Value::Int64(v) => serde_json::Value::Number((*v).into()),
            Value::Uint64(v) => serde_json::Value::Number((*v).into()),
            Value::Double(v) => serde_json::Number::from_f64(*v)
                .map(serde_json::Value::Number)
                .unwrap_or(serde_json::Value::Null),
            // a bigint literal that doesn't fit serde_json's default `Number`
            // (no `arbitrary_precision` feature here) round-trips as a string.
            Value::BigInt(s) => match serde_json::Number::from_str(s) {
                Ok(n) => serde_json::Value::Number(n),
                Err(_) => serde_json::Value::String((*s).to_owned()),
            },
            Value::String(s) => serde_json::Value::String((*s).to_owned()),
            Value::Array(a) => {
                let mut out = Vec::with_capacity(a.count_elements() as usize);
                for v in a.iter() {
                    out.push(v?.to_value()?);
                }
                serde_json::Value::Array(out)
            }
            Value::Object(o) => {
                let mut out = serde_json::Map::with_capacity(o.count_fields() as usize);
                for field in o.iter() {
                    let field = field?;
                    out.insert(field.key.to_owned(), field.value.to_value()?);
                }
                serde_json::Value::Object(out)
            }
        })
    }
}

/// The tape index of the word immediately after the value starting at
/// `index` -- one word for scalars/strings/bigints, two for the
/// tag+raw-value pairs (`INT64`/`UINT64`/`DOUBLE`), or the matching `END_*`
/// plus one for a container.
fn next_sibling(tape: &[u64], index: usize) -> usize {
    let (tag, payload) = decode(*tape_get_unchecked!(tape, index));
    match tag {
        TapeTag::StartObject | TapeTag::StartArray => {
            let (end, _count) = unpack_start_payload(payload);
            end + 1
        }
        TapeTag::Int64 | TapeTag::Uint64 | TapeTag::Double => index + 2,
        _ => index + 1,
    }
}
