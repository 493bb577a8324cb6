/*!
`C7`: the tape builder.

Drives the structural index as an explicit `enum State` trampoline (spec §9
design note: the original's computed-goto dispatch in
`examples/original_source/src/generic/stage2/tape_builder.h` becomes a
`loop { match state { ... } }` here instead of recursion or a `goto`).
*/

use crate::error::Error;
use crate::number::{self, Number};
use crate::string;
use crate::ParserConfig;

use super::writer::{pack_start_payload, TapeTag, TapeWriter};

/// One level of the open-container stack (spec §3).
struct Frame {
    /// Tape index of this container's `START_*` word.
    start_index: usize,
    /// Running count of children seen so far (key/value pairs for an
    /// object, elements for an array).
    count: u32,
    is_object: bool,
}

/// What the trampoline expects to see at the current structural position.
enum State {
    /// A value is expected (root value, array element, or object value
    /// after a colon).
    Value,
    /// Just entered an object: a key or `}` is expected.
    ObjectBegin,
    /// Just consumed `,` inside an object: only a key is valid.
    ObjectKey,
    /// A key was just parsed: `:` is expected.
    ObjectColon,
    /// A value was just parsed inside an object: `,` or `}` is expected.
    ObjectCommaOrClose,
    /// Just entered an array: a value or `]` is expected.
    ArrayBegin,
    /// A value was just parsed inside an array: `,` or `]` is expected.
    ArrayCommaOrClose,
}

pub(crate) struct BuildResult {
    pub(crate) tape: Vec<u64>,
    pub(crate) string_buf: Vec<u8>,
}

/// Build a tape from `input` and its structural index array (spec §4.7).
pub(crate) fn build(
    input: &[u8],
    structural_indices: &[u32],
    config: ParserConfig,
) -> Result<BuildResult, Error> {
    if input.is_empty() {
        return Err(Error::Empty);
    }

    let mut tape = vec![0u64]; // slot 0: the opening ROOT, patched at the end
    let mut string_buf = Vec::new();
    let mut stack: Vec<Frame> = Vec::new();
    let mut pos = 0usize;
    let mut state = State::Value;

    loop {
        match state {
            State::Value => {
                let offset = next_offset(structural_indices, &mut pos);
                if offset as usize >= input.len() {
                    return Err(unexpected_end(&stack));
                }

                let mut writer = TapeWriter::new(&mut tape);
                match *get_unchecked!(input, offset as usize) {
                    b'{' => {
                        stack.push(Frame {
                            start_index: writer.next_index(),
                            count: 0,
                            is_object: true,
                        });
                        if stack.len() > config.max_depth {
                            return Err(Error::DepthError);
                        }
                        writer.skip();
                        state = State::ObjectBegin;
                        continue;
                    }
                    b'[' => {
                        stack.push(Frame {
                            start_index: writer.next_index(),
                            count: 0,
                            is_object: false,
                        });
                        if stack.len() > config.max_depth {
                            return Err(Error::DepthError);
                        }
                        writer.skip();
                        state = State::ArrayBegin;
                        continue;
                    }
                    b'"' => {
                        write_string(input, offset, &mut string_buf, &mut writer)?;
                    }
                    b't' => write_atom(input, offset, b"true", Error::TAtomError, &mut writer, TapeTag::True)?,
                    b'f' => write_atom(input, offset, b"false", Error::FAtomError, &mut writer, TapeTag::False)?,
                    b'n' => write_atom(input, offset, b"null", Error::NAtomError, &mut writer, TapeTag::Null)?,
                    b'-' | b'0'..=b'9' => write_number(input, offset, config, &mut writer)?,
                    _ => return Err(Error::TapeError),
                }

                bump_count(&mut stack);
                if stack.is_empty() {
                    break;
                }
                state = continue_state(&stack);
            }
            State::ObjectBegin => {
                let offset = next_offset(structural_indices, &mut pos);
                if offset as usize >= input.len() {
                    return Err(unexpected_end(&stack));
                }
                match peek(input, offset) {
                    b'}' => {
                        close_container(input, &mut tape, &mut stack, true)?;
                        if stack.is_empty() {
                            break;
                        }
                        state = continue_state(&stack);
                    }
                    b'"' => {
                        let mut writer = TapeWriter::new(&mut tape);
                        write_string(input, offset, &mut string_buf, &mut writer)?;
                        state = State::ObjectColon;
                    }
                    _ => return Err(Error::TapeError),
                }
            }
            State::ObjectKey => {
                let offset = next_offset(structural_indices, &mut pos);
                if offset as usize >= input.len() {
                    return Err(unexpected_end(&stack));
                }
                match peek(input, offset) {
                    b'"' => {
                        let mut writer = TapeWriter::new(&mut tape);
                        write_string(input, offset, &mut string_buf, &mut writer)?;
                        state = State::ObjectColon;
                    }
                    _ => return Err(Error::TapeError),
                }
            }
            State::ObjectColon => {
                let offset = next_offset(structural_indices, &mut pos);
                if offset as usize >= input.len() {
                    return Err(unexpected_end(&stack));
                }
                if peek(input, offset) != b':' {
                    return Err(Error::TapeError);
                }
                state = State::Value;
            }
            State::ObjectCommaOrClose => {
                let offset = next_offset(structural_indices, &mut pos);
                if offset as usize >= input.len() {
                    return Err(unexpected_end(&stack));
                }
                match peek(input, offset) {
                    b',' => state = State::ObjectKey,
                    b'}' => {
                        close_container(input, &mut tape, &mut stack, true)?;
                        if stack.is_empty() {
                            break;
                        }
                        state = continue_state(&stack);
                    }
                    _ => return Err(Error::TapeError),
                }
            }
            State::ArrayBegin => {
                let offset = next_offset(structural_indices, &mut pos);
                if offset as usize >= input.len() {
                    return Err(unexpected_end(&stack));
                }
                if peek(input, offset) == b']' {
                    close_container(input, &mut tape, &mut stack, false)?;
                    if stack.is_empty() {
                        break;
                    }
                    state = continue_state(&stack);
                    continue;
                }
                pos -= 1; // put the value's first structural back
                state = State::Value;
            }
            State::ArrayCommaOrClose => {
                let offset = next_offset(structural_indices, &mut pos);
                if offset as usize >= input.len() {
                    return Err(unexpected_end(&stack));
                }
                match peek(input, offset) {
                    b',' => state = State::Value,
                    b']' => {
                        close_container(input, &mut tape, &mut stack, false)?;
                        if stack.is_empty() {
                            break;
                        }
                        state = continue_state(&stack);
                    }
                    _ => return Err(Error::TapeError),
                }
            }
        }
    }

    // the document's one root value is done; anything left besides the
    // trailing sentinel is rejected (spec §4.7 "Root handling").
    let trailing = *get_unchecked!(structural_indices, pos);
    if (trailing as usize) < input.len() {
        return Err(Error::TrailingContent);
    }

    let root_end = tape.len();
    {
        let mut writer = TapeWriter::new(&mut tape);
        writer.write(0, root_end as u64, TapeTag::Root);
        writer.append(0, TapeTag::Root);
    }

    Ok(BuildResult { tape, string_buf })
}

#[inline]
fn next_offset(structural_indices: &[u32], pos: &mut usize) -> u32 {
    let offset = *get_unchecked!(structural_indices, *pos);
    *pos += 1;
    offset
}

#[inline]
fn peek(input: &[u8], offset: u32) -> u8 {
    if (offset as usize) < input.len() {
        *get_unchecked!(input, offset as usize)
    } else {
        b' '
    }
}

fn unexpected_end(stack: &[Frame]) -> Error {
    if stack.is_empty() {
        Error::TapeError
    } else {
        Error::IncompleteArrayOrObject
    }
}

fn continue_state(stack: &[Frame]) -> State {
    if stack.last().expect("non-empty stack").is_object {
        State::ObjectCommaOrClose
    } else {
        State::ArrayCommaOrClose
    }
}

fn bump_count(stack: &mut [Frame]) {
    if let Some(frame) = stack.last_mut() {
        frame.count += 1;
    }
}

fn close_container(
    input: &[u8],
    tape: &mut Vec<u64>,
    stack: &mut Vec<Frame>,
    is_object: bool,
) -> Result<(), Error> {
    let frame = stack.pop().expect("a close must match an open frame");
    test_assert_eq!(is_object, frame.is_object);
    let _ = input;

    let mut writer = TapeWriter::new(tape);
    let end_index = writer.next_index();
    let end_tag = if is_object { TapeTag::EndObject } else { TapeTag::EndArray };
    let start_tag = if is_object { TapeTag::StartObject } else { TapeTag::StartArray };

    writer.append(frame.start_index as u64, end_tag);
    writer.write(frame.start_index, pack_start_payload(end_index, frame.count), start_tag);

    bump_count(stack);
    Ok(())
}

fn write_string(
    input: &[u8],
    offset: u32,
    string_buf: &mut Vec<u8>,
    writer: &mut TapeWriter<'_>,
) -> Result<(), Error> {
    let str_offset = string_buf.len();

    // reserve the 4-byte length prefix, patched once we know the unescaped length
    string_buf.extend_from_slice(&[0u8; 4]);

    let src = &input[offset as usize..];
    string::parse(src, string_buf)?;

    let len = (string_buf.len() - str_offset - 4) as u32;
    string_buf[str_offset..str_offset + 4].copy_from_slice(&len.to_le_bytes());
    string_buf.push(0); // trailing NUL (spec §3)

    writer.append(str_offset as u64, TapeTag::String);
    Ok(())
}

fn write_atom(
    input: &[u8],
    offset: u32,
    literal: &[u8],
    err: Error,
    writer: &mut TapeWriter<'_>,
    tag: TapeTag,
) -> Result<(), Error> {
    let start = offset as usize;
    let src = input.get(start..start + literal.len()).ok_or(err)?;
    if src != literal {
        return Err(err);
    }
    // the byte right after the literal must not continue an identifier,
    // or we'd have accepted a prefix of a longer (invalid) token.
    if matches!(input.get(start + literal.len()), Some(b) if b.is_ascii_alphanumeric() || *b == b'_') {
        return Err(err);
    }

    writer.append(0, tag);
    Ok(())
}

fn write_number(
    input: &[u8],
    offset: u32,
    config: ParserConfig,
    writer: &mut TapeWriter<'_>,
) -> Result<(), Error> {
    let src = &input[offset as usize..];
    let parsed = number::parse(src, config.minus_zero_as_float)?;

    match parsed.number {
        Number::Signed(v) => writer.append_s64(TapeTag::Int64, v),
        Number::Unsigned(v) => writer.append_u64(TapeTag::Uint64, v),
        Number::Float(v) => writer.append_f64(TapeTag::Double, v),
        // payload packs the literal's (offset, length) the same way a
        // container START packs (matching-index, count) -- the document
        // reader needs both to hand back the raw token (spec §4.9).
        Number::Big => writer.append(pack_start_payload(offset as usize, parsed.consumed as u32), TapeTag::BigInt),
    }

    Ok(())
}
