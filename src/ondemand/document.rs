/*!
On-demand value navigation (spec §4.8).

Unlike [`crate::tape::Value`], which is an enum over an already-decoded tape
word, [`Value`] here is a position: a byte offset plus the shared [`Cursor`]
state needed to validate that nothing else has moved past it since it was
handed out (spec §4.8 contract 1, P6). Its type isn't known until something
actually peeks at the byte under it.
*/

use std::cell::Cell;

use crate::error::Error;
use crate::number::{self, Number};
use crate::pointer::{self, PathSegment};
use crate::string;

use super::cursor::Cursor;

/// The root of a document opened for on-demand iteration (spec §4.8).
pub struct Document<'p> {
    cursor: Cursor<'p>,
}

impl<'p> Document<'p> {
    pub(crate) fn new(cursor: Cursor<'p>) -> Self {
        Document { cursor }
    }

    /// The document's single root value.
    ///
    /// A fresh `Document` always resolves this to the first structural
    /// token; calling it again after the root has already been consumed
    /// elsewhere fails the same out-of-order check any other stale `Value`
    /// would (call [`Document::rewind`] first to start over).
    pub fn get_root(&self) -> Result<Value<'p>, Error> {
        let offset = self.cursor.peek_offset();
        if offset as usize >= self.cursor.input.len() {
            return Err(Error::Empty);
        }
        Ok(Value { cursor: self.cursor, offset, token_pos: 0, base_depth: 0 })
    }

    /// Resolve an RFC 6901 JSON Pointer against this document's root.
    pub fn at_pointer(&self, json_pointer: &str) -> Result<Value<'p>, Error> {
        self.get_root()?.at_pointer(json_pointer)
    }

    /// Resolve a wildcard path (`$.store.book[*].title`) against this
    /// document's root, returning every value it matches.
    pub fn at_wildcard_path(&self, path: &str) -> Result<Vec<Value<'p>>, Error> {
        self.get_root()?.at_wildcard_path(path)
    }

    /// The byte offset the cursor is currently parked at.
    pub fn current_location(&self) -> usize {
        self.cursor.peek_offset() as usize
    }

    /// Whether the cursor has reached the padding past the document's last
    /// structural token.
    pub fn at_end(&self) -> bool {
        self.current_location() >= self.cursor.input.len()
    }

    /// Move the cursor back to the document's first structural token,
    /// discarding whatever iteration progress was made against the root.
    pub fn rewind(&self) {
        self.cursor.pos.set(0);
        self.cursor.depth.set(0);
    }

    /// The remaining unparsed input, starting at the cursor's current
    /// position.
    pub fn raw_json(&self) -> &'p str {
        from_utf8_unchecked!(&self.cursor.input[self.current_location()..])
    }
}

/// The kind of JSON value a [`Value`] currently points at, without
/// consuming it (spec §4.8 `type`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ValueType {
    Null,
    Bool,
    Number,
    String,
    Array,
    Object,
}

/// A value's position in the input, not yet read (spec §4.8).
///
/// Cheap to copy -- every field is itself `Copy` -- but each scalar read or
/// container entry first checks that the shared cursor hasn't moved past
/// `token_pos` since this `Value` was produced (P6, spec §4.8 contract 1).
#[derive(Clone, Copy)]
pub struct Value<'p> {
    cursor: Cursor<'p>,
    offset: u32,
    token_pos: usize,
    base_depth: usize,
}

impl<'p> Value<'p> {
    /// The kind of value this is, without consuming it.
    pub fn value_type(&self) -> ValueType {
        match self.cursor.byte_at(self.offset) {
            b'n' => ValueType::Null,
            b't' | b'f' => ValueType::Bool,
            b'"' => ValueType::String,
            b'{' => ValueType::Object,
            b'[' => ValueType::Array,
            _ => ValueType::Number,
        }
    }

    pub fn is_null(&self) -> bool {
        self.cursor.byte_at(self.offset) == b'n'
    }

    pub fn is_object(&self) -> bool {
        self.cursor.byte_at(self.offset) == b'{'
    }

    pub fn is_array(&self) -> bool {
        self.cursor.byte_at(self.offset) == b'['
    }

    pub fn get_bool(&self) -> Result<bool, Error> {
        self.cursor.check_current(self.token_pos)?;
        match self.cursor.byte_at(self.offset) {
            b't' => Ok(true),
            b'f' => Ok(false),
            _ => Err(Error::IncorrectType),
        }
    }

    /// Succeeds for any number literal that fits in an `i64`; a value that
    /// parses but doesn't fit is `INCORRECT_TYPE`, not `NUMBER_OUT_OF_RANGE`
    /// (spec §7, matching [`crate::tape::Value::get_int64`]).
    pub fn get_int64(&self) -> Result<i64, Error> {
        match self.parse_number()?.number {
            Number::Signed(v) => Ok(v),
            Number::Unsigned(v) if v <= i64::MAX as u64 => Ok(v as i64),
            _ => Err(Error::IncorrectType),
        }
    }

    pub fn get_uint64(&self) -> Result<u64, Error> {
        match self.parse_number()?.number {
            Number::Unsigned(v) => Ok(v),
            Number::Signed(v) if v >= 0 => Ok(v as u64),
            _ => Err(Error::IncorrectType),
        }
    }

    pub fn get_double(&self) -> Result<f64, Error> {
        match self.parse_number()?.number {
            Number::Float(v) => Ok(v),
            Number::Signed(v) => Ok(v as f64),
            Number::Unsigned(v) => Ok(v as f64),
            Number::Big => Err(Error::IncorrectType),
        }
    }

    /// The raw literal of a number with more significant digits than fit in
    /// a `u64` (spec §4.9); `BIGINT_ERROR` if this value isn't one.
    pub fn get_bigint_token(&self) -> Result<&'p str, Error> {
        self.cursor.check_current(self.token_pos)?;
        match self.cursor.byte_at(self.offset) {
            b'-' | b'0'..=b'9' => {
                let src = &self.cursor.input[self.offset as usize..];
                let parsed = number::parse(src, self.cursor.config.minus_zero_as_float)?;
                match parsed.number {
                    Number::Big => Ok(from_utf8_unchecked!(&src[..parsed.consumed])),
                    _ => Err(Error::BigintError),
                }
            }
            _ => Err(Error::BigintError),
        }
    }

    fn parse_number(&self) -> Result<crate::number::ParsedNumber, Error> {
        self.cursor.check_current(self.token_pos)?;
        match self.cursor.byte_at(self.offset) {
            b'-' | b'0'..=b'9' => {
                number::parse(&self.cursor.input[self.offset as usize..], self.cursor.config.minus_zero_as_float)
            }
            _ => Err(Error::IncorrectType),
        }
    }

    pub fn get_string(&self) -> Result<&'p str, Error> {
        self.cursor.check_current(self.token_pos)?;
        if self.cursor.byte_at(self.offset) != b'"' {
            return Err(Error::IncorrectType);
        }
        self.cursor.materialize_string(&self.cursor.input[self.offset as usize..])
    }

    /// The string's raw, still-escaped token (spec §4.8 `get_raw_json_string`).
    pub fn get_raw_json_string(&self) -> Result<RawString<'p>, Error> {
        self.cursor.check_current(self.token_pos)?;
        if self.cursor.byte_at(self.offset) != b'"' {
            return Err(Error::IncorrectType);
        }
        let len = string::skip(&self.cursor.input[self.offset as usize..])?;
        let raw = &self.cursor.input[self.offset as usize..self.offset as usize + len];
        Ok(RawString(from_utf8_unchecked!(raw)))
    }

    /// A number literal written inside a JSON string, e.g. `"123"` --
    /// useful for wire formats that stringify large numbers to dodge a
    /// receiver's own `f64`-backed JSON parser.
    pub fn get_int64_in_string(&self) -> Result<i64, Error> {
        match self.parse_number_in_string()?.number {
            Number::Signed(v) => Ok(v),
            Number::Unsigned(v) if v <= i64::MAX as u64 => Ok(v as i64),
            _ => Err(Error::NumberError),
        }
    }

    pub fn get_uint64_in_string(&self) -> Result<u64, Error> {
        match self.parse_number_in_string()?.number {
            Number::Unsigned(v) => Ok(v),
            Number::Signed(v) if v >= 0 => Ok(v as u64),
            _ => Err(Error::NumberError),
        }
    }

    pub fn get_double_in_string(&self) -> Result<f64, Error> {
        match self.parse_number_in_string()?.number {
            Number::Float(v) => Ok(v),
            Number::Signed(v) => Ok(v as f64),
            Number::Unsigned(v) => Ok(v as f64),
            Number::Big => Err(Error::NumberError),
        }
    }

    fn parse_number_in_string(&self) -> Result<crate::number::ParsedNumber, Error> {
        self.cursor.check_current(self.token_pos)?;
        if self.cursor.byte_at(self.offset) != b'"' {
            return Err(Error::IncorrectType);
        }
        let quoted = &self.cursor.input[self.offset as usize..];
        let len = string::skip(quoted)?;
        let inner = &quoted[1..len - 1];
        let mut padded = Vec::with_capacity(inner.len() + 1);
        padded.extend_from_slice(inner);
        padded.push(b' ');
        let parsed = number::parse(&padded, self.cursor.config.minus_zero_as_float)?;
        if parsed.consumed != inner.len() {
            return Err(Error::NumberError);
        }
        Ok(parsed)
    }

    /// This value's full raw token: a scalar literal verbatim, or a quoted
    /// string still escaped. Containers aren't supported -- on-demand's
    /// skip is shallow (see [`Cursor::skip_value`]), so it can't cheaply
    /// hand back a validated raw span for one; read it through
    /// [`crate::tape::Parser`] instead.
    pub fn raw_json_token(&self) -> Result<&'p str, Error> {
        self.cursor.check_current(self.token_pos)?;
        let src = &self.cursor.input[self.offset as usize..];
        let len = match self.cursor.byte_at(self.offset) {
            b'"' => string::skip(src)?,
            b't' => 4,
            b'f' => 5,
            b'n' => 4,
            b'-' | b'0'..=b'9' => number::parse(src, self.cursor.config.minus_zero_as_float)?.consumed,
            b'{' | b'[' => return Err(Error::IncorrectType),
            _ => return Err(Error::TapeError),
        };
        Ok(from_utf8_unchecked!(&src[..len]))
    }

    pub fn as_object(&self) -> Result<Object<'p>, Error> {
        self.cursor.check_current(self.token_pos)?;
        if self.cursor.byte_at(self.offset) != b'{' {
            return Err(Error::IncorrectType);
        }
        self.cursor.next_offset();
        let content_depth = self.base_depth + 1;
        if content_depth > self.cursor.config.max_depth {
            return Err(Error::DepthError);
        }
        self.cursor.depth.set(content_depth);
        Ok(Object {
            cursor: self.cursor,
            content_depth,
            begin_pos: self.cursor.pos.get(),
            prev: Cell::new(None),
            errored: Cell::new(false),
        })
    }

    pub fn as_array(&self) -> Result<Array<'p>, Error> {
        self.cursor.check_current(self.token_pos)?;
        if self.cursor.byte_at(self.offset) != b'[' {
            return Err(Error::IncorrectType);
        }
        self.cursor.next_offset();
        let content_depth = self.base_depth + 1;
        if content_depth > self.cursor.config.max_depth {
            return Err(Error::DepthError);
        }
        self.cursor.depth.set(content_depth);
        Ok(Array {
            cursor: self.cursor,
            content_depth,
            begin_pos: self.cursor.pos.get(),
            prev: Cell::new(None),
            errored: Cell::new(false),
        })
    }

    /// Resolve an RFC 6901 JSON Pointer relative to this value.
    ///
    /// Each token's meaning depends on what it's resolved against, same as
    /// [`crate::tape::Value::at_pointer`]: a literal key inside an object
    /// (even an all-digit one), an index inside an array.
    pub fn at_pointer(&self, json_pointer: &str) -> Result<Value<'p>, Error> {
        let tokens = pointer::tokenize(json_pointer)?;
        let mut current = *self;
        for token in tokens {
            current = current.navigate(&token)?;
        }
        Ok(current)
    }

    /// Resolve a wildcard path (`$.store.book[*].title`) relative to this
    /// value, returning every value it matches.
    pub fn at_wildcard_path(&self, path: &str) -> Result<Vec<Value<'p>>, Error> {
        let segments = pointer::tokenize_wildcard_path(path)?;
        resolve_wildcard(*self, &segments)
    }

    fn navigate(&self, token: &str) -> Result<Value<'p>, Error> {
        if self.is_object() {
            self.as_object()?.find_field(token)
        } else if self.is_array() {
            self.as_array()?.at(parse_array_token(token)?)
        } else {
            Err(Error::IncorrectType)
        }
    }
}

fn resolve_wildcard<'p>(value: Value<'p>, segments: &[PathSegment<'_>]) -> Result<Vec<Value<'p>>, Error> {
    let (first, rest) = match segments.split_first() {
        Some(split) => split,
        None => return Ok(vec![value]),
    };

    match first {
        PathSegment::Key(key) => resolve_wildcard(value.as_object()?.find_field(key)?, rest),
        PathSegment::KeyWildcard => {
            let obj = value.as_object()?;
            let mut out = Vec::new();
            for field in obj.iter() {
                out.extend(resolve_wildcard(field?.value, rest)?);
            }
            Ok(out)
        }
        PathSegment::Index(index) => resolve_wildcard(value.as_array()?.at(*index)?, rest),
        PathSegment::IndexWildcard => {
            let arr = value.as_array()?;
            let mut out = Vec::new();
            for element in arr.iter() {
                out.extend(resolve_wildcard(element?, rest)?);
            }
            Ok(out)
        }
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

/// A string value's raw, still-escaped token (spec §4.8).
#[derive(Debug, Clone, Copy)]
pub struct RawString<'p>(&'p str);

impl<'p> RawString<'p> {
    /// The raw token, quotes included, escapes not decoded.
    pub fn as_str(&self) -> &'p str {
        self.0
    }
}

/// An object entered for field-by-field iteration (spec §4.8).
///
/// Every method scans forward from wherever the shared cursor is currently
/// parked: there's no up-front field count the way [`crate::tape::Object`]
/// has one, since nothing has been read yet.
pub struct Object<'p> {
    cursor: Cursor<'p>,
    content_depth: usize,
    begin_pos: usize,
    prev: Cell<Option<(usize, usize)>>,
    errored: Cell<bool>,
}

impl<'p> Object<'p> {
    pub fn iter(&self) -> ObjectIterator<'p> {
        ObjectIterator { object: self.shallow_copy() }
    }

    /// Scan forward from the cursor's current position for the first field
    /// with `key` (spec §4.8 `find_field`). Does not wrap.
    pub fn find_field(&self, key: &str) -> Result<Value<'p>, Error> {
        loop {
            match self.next_field()? {
                Some(field) if field.key == key => return Ok(field.value),
                Some(_) => continue,
                None => return Err(Error::NoSuchField),
            }
        }
    }

    /// As [`Object::find_field`], but if the key isn't found scanning
    /// forward, wraps once back to the object's first field and searches
    /// up to (not including) where this call started (spec §4.8
    /// `find_field_unordered`).
    pub fn find_field_unordered(&self, key: &str) -> Result<Value<'p>, Error> {
        let resume_from = self.cursor.pos.get();

        loop {
            match self.next_field()? {
                Some(field) if field.key == key => return Ok(field.value),
                Some(_) => continue,
                None => break,
            }
        }

        self.cursor.pos.set(self.begin_pos);
        self.cursor.depth.set(self.content_depth);
        self.prev.set(None);

        while self.cursor.pos.get() < resume_from {
            match self.next_field()? {
                Some(field) if field.key == key => return Ok(field.value),
                Some(_) => continue,
                None => break,
            }
        }

        Err(Error::NoSuchField)
    }

    /// Equivalent to `[key]` in the spec's shape (spec §4.8).
    pub fn get(&self, key: &str) -> Result<Value<'p>, Error> {
        self.find_field_unordered(key)
    }

    /// The object's field count, found by scanning the whole container from
    /// its start and restoring the cursor to wherever this call started
    /// (spec §4.8 `count_fields`) -- unlike
    /// [`crate::tape::Object::count_fields`], this costs a full scan, since
    /// nothing is precomputed.
    pub fn count_fields(&self) -> Result<u32, Error> {
        let saved_pos = self.cursor.pos.get();
        let saved_depth = self.cursor.depth.get();
        let saved_prev = self.prev.take();
        let saved_errored = self.errored.get();

        self.cursor.pos.set(self.begin_pos);
        self.cursor.depth.set(self.content_depth);
        self.errored.set(false);

        let mut count = 0u32;
        let result = loop {
            match self.next_field() {
                Ok(Some(_)) => count += 1,
                Ok(None) => break Ok(count),
                Err(e) => break Err(e),
            }
        };

        self.cursor.pos.set(saved_pos);
        self.cursor.depth.set(saved_depth);
        self.prev.set(saved_prev);
        self.errored.set(saved_errored);
        result
    }

    fn shallow_copy(&self) -> Object<'p> {
        Object {
            cursor: self.cursor,
            content_depth: self.content_depth,
            begin_pos: self.begin_pos,
            prev: Cell::new(self.prev.get()),
            errored: Cell::new(self.errored.get()),
        }
    }

    fn next_field(&self) -> Result<Option<Field<'p>>, Error> {
        if self.errored.get() {
            return Ok(None);
        }

        if let Some((token_pos, base_depth)) = self.prev.take() {
            self.cursor.finish_value(token_pos, base_depth)?;
            let offset = self.cursor.next_offset();
            match self.cursor.byte_at(offset) {
                b'}' => {
                    self.cursor.depth.set(self.content_depth - 1);
                    return Ok(None);
                }
                b',' => {}
                _ => {
                    self.errored.set(true);
                    return Err(Error::TapeError);
                }
            }
        }

        let offset = self.cursor.next_offset();
        match self.cursor.byte_at(offset) {
            b'}' => {
                self.cursor.depth.set(self.content_depth - 1);
                Ok(None)
            }
            b'"' => {
                let key = match self.cursor.materialize_string(&self.cursor.input[offset as usize..]) {
                    Ok(key) => key,
                    Err(e) => {
                        self.errored.set(true);
                        return Err(e);
                    }
                };
                let colon = self.cursor.next_offset();
                if self.cursor.byte_at(colon) != b':' {
                    self.errored.set(true);
                    return Err(Error::TapeError);
                }
                let value_token_pos = self.cursor.pos.get();
                let value_offset = self.cursor.peek_offset();
                let value = Value {
                    cursor: self.cursor,
                    offset: value_offset,
                    token_pos: value_token_pos,
                    base_depth: self.content_depth,
                };
                self.prev.set(Some((value_token_pos, self.content_depth)));
                Ok(Some(Field { key, value }))
            }
            _ => {
                self.errored.set(true);
                Err(Error::TapeError)
            }
        }
    }
}

/// One key/value pair of an [`Object`].
pub struct Field<'p> {
    pub key: &'p str,
    pub value: Value<'p>,
}

pub struct ObjectIterator<'p> {
    object: Object<'p>,
}

impl<'p> Iterator for ObjectIterator<'p> {
    type Item = Result<Field<'p>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.object.next_field().transpose()
    }
}

/// An array entered for element-by-element iteration (spec §4.8).
pub struct Array<'p> {
    cursor: Cursor<'p>,
    content_depth: usize,
    begin_pos: usize,
    prev: Cell<Option<(usize, usize)>>,
    errored: Cell<bool>,
}

impl<'p> Array<'p> {
    pub fn iter(&self) -> ArrayIterator<'p> {
        ArrayIterator { array: self.shallow_copy() }
    }

    /// The element at `index`, found by scanning (and skipping) from the
    /// array's start every time (spec §4.8 `at`) -- on-demand has no
    /// random access the way the tape's fully-materialized form does.
    pub fn at(&self, index: usize) -> Result<Value<'p>, Error> {
        self.reset();
        match self.iter().nth(index) {
            Some(result) => result,
            None => Err(Error::IndexOutOfBounds),
        }
    }

    /// The array's element count, found the same way as
    /// [`Object::count_fields`] (spec §4.8 `count_elements`) -- `Result`,
    /// not a plain `u32`, since the scan itself can fail.
    pub fn count_elements(&self) -> Result<u32, Error> {
        let saved_pos = self.cursor.pos.get();
        let saved_depth = self.cursor.depth.get();
        let saved_prev = self.prev.take();
        let saved_errored = self.errored.get();

        self.cursor.pos.set(self.begin_pos);
        self.cursor.depth.set(self.content_depth);
        self.errored.set(false);

        let mut count = 0u32;
        let result = loop {
            match self.next_element() {
                Ok(Some(_)) => count += 1,
                Ok(None) => break Ok(count),
                Err(e) => break Err(e),
            }
        };

        self.cursor.pos.set(saved_pos);
        self.cursor.depth.set(saved_depth);
        self.prev.set(saved_prev);
        self.errored.set(saved_errored);
        result
    }

    pub fn at_pointer(&self, json_pointer: &str) -> Result<Value<'p>, Error> {
        let tokens = pointer::tokenize(json_pointer)?;
        let mut tokens = tokens.into_iter();
        let first = tokens.next().ok_or(Error::InvalidJsonPointer)?;
        let mut current = self.at(parse_array_token(&first)?)?;
        for token in tokens {
            current = current.navigate(&token)?;
        }
        Ok(current)
    }

    /// Move back to the array's first element, discarding whatever
    /// iteration progress was made (spec §4.8 `Array::reset`).
    pub fn reset(&self) {
        self.cursor.pos.set(self.begin_pos);
        self.cursor.depth.set(self.content_depth);
        self.prev.set(None);
        self.errored.set(false);
    }

    fn shallow_copy(&self) -> Array<'p> {
        Array {
            cursor: self.cursor,
            content_depth: self.content_depth,
            begin_pos: self.begin_pos,
            prev: Cell::new(self.prev.get()),
            errored: Cell::new(self.errored.get()),
        }
    }

    fn next_element(&self) -> Result<Option<Value<'p>>, Error> {
        if self.errored.get() {
            return Ok(None);
        }

        if let Some((token_pos, base_depth)) = self.prev.take() {
            if let Err(e) = self.cursor.finish_value(token_pos, base_depth) {
                self.errored.set(true);
                return Err(e);
            }
            let offset = self.cursor.next_offset();
            match self.cursor.byte_at(offset) {
                b']' => {
                    self.cursor.depth.set(self.content_depth - 1);
                    return Ok(None);
                }
                b',' => {}
                _ => {
                    self.errored.set(true);
                    return Err(Error::TapeError);
                }
            }
        }

        let offset = self.cursor.peek_offset();
        if self.cursor.byte_at(offset) == b']' {
            self.cursor.next_offset();
            self.cursor.depth.set(self.content_depth - 1);
            return Ok(None);
        }

        let token_pos = self.cursor.pos.get();
        let value = Value { cursor: self.cursor, offset, token_pos, base_depth: self.content_depth };
        self.prev.set(Some((token_pos, self.content_depth)));
        Ok(Some(value))
    }
}

pub struct ArrayIterator<'p> {
    array: Array<'p>,
}

impl<'p> Iterator for ArrayIterator<'p> {
    type Item = Result<Value<'p>, Error>;

    fn next(&mut self) -> Option<Self::Item> {
        self.array.next_element().transpose()
    }
}
