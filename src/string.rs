/*!
`C10`: the string parser.

Unescapes a JSON string into a destination buffer. Stage 2 only gets one
look at these bytes, so every escape decode point returns a `Result`
instead of best-effort: this module keeps the teacher's run-flushing
`Scan`/copy shape (`examples/datalust-squirrel-json/src/unescape.rs`) --
extend `dst` with the plain run since the last escape, decode the escape,
repeat -- but surfaces `Error::StringError`/`Error::UnclosedString` instead
of silently dropping malformed input.
*/

use std::str;

use crate::error::Error;
use crate::std_ext::char::try_from_utf16_surrogate_pair;

/// Unescape a JSON string literal starting at `src[0] == b'"'`.
///
/// Appends the unescaped UTF-8 bytes to `dst` and returns the number of
/// bytes of `src` consumed, including both quotes. Returns `Err` on an
/// invalid escape, an unpaired surrogate, or a string that runs off the end
/// of `src` before a closing quote.
pub(crate) fn parse(src: &[u8], dst: &mut Vec<u8>) -> Result<usize, Error> {
    test_assert_eq!(Some(&b'"'), src.first());

    let mut i = 1usize;
    let mut run_start = i;

    loop {
        let b = *src.get(i).ok_or(Error::UnclosedString)?;

        match b {
            b'"' => {
                dst.extend_from_slice(&src[run_start..i]);
                return Ok(i + 1);
            }
            b'\\' => {
                dst.extend_from_slice(&src[run_start..i]);
                i += 1;
                i = decode_escape(src, i, dst)?;
                run_start = i;
            }
            _ => {
                i += 1;
            }
        }
    }
}

/// Decode one escape sequence starting right after the `\`, appending its
/// decoded form to `dst`. Returns the offset of the byte following the
/// escape.
fn decode_escape(src: &[u8], i: usize, dst: &mut Vec<u8>) -> Result<usize, Error> {
    let kind = *src.get(i).ok_or(Error::StringError)?;

    match kind {
        b'"' => {
            dst.push(b'"');
            Ok(i + 1)
        }
        b'\\' => {
            dst.push(b'\\');
            Ok(i + 1)
        }
        b'/' => {
            dst.push(b'/');
            Ok(i + 1)
        }
        b'b' => {
            dst.push(0x08);
            Ok(i + 1)
        }
        b'f' => {
            dst.push(0x0c);
            Ok(i + 1)
        }
        b'n' => {
            dst.push(b'\n');
            Ok(i + 1)
        }
        b'r' => {
            dst.push(b'\r');
            Ok(i + 1)
        }
        b't' => {
            dst.push(b'\t');
            Ok(i + 1)
        }
        b'u' => decode_unicode_escape(src, i + 1, dst),
        _ => Err(Error::StringError),
    }
}

/// Decode a `\uXXXX` escape (and, if it's a high surrogate, the `\uXXXX`
/// low surrogate that must immediately follow it) starting at `i`, the byte
/// right after the `u`.
fn decode_unicode_escape(src: &[u8], i: usize, dst: &mut Vec<u8>) -> Result<usize, Error> {
    let code = parse_hex4(src, i)?;
    let mut next = i + 4;

    let ch = match code {
        0xD800..=0xDBFF => {
            if src.get(next) != Some(&b'\\') || src.get(next + 1) != Some(&b'u') {
                return Err(Error::StringError);
            }
            let low = parse_hex4(src, next + 2)?;
            next += 6;

            try_from_utf16_surrogate_pair(code, low).map_err(|_| Error::StringError)?
        }
        0xDC00..=0xDFFF => return Err(Error::StringError),
        _ => char::from_u32(code as u32).ok_or(Error::StringError)?,
    };

    let mut buf = [0u8; 4];
    dst.extend_from_slice(ch.encode_utf8(&mut buf).as_bytes());

    Ok(next)
}

/// Find the end of a quoted string literal without unescaping it, for
/// callers that only need the raw span (e.g. on-demand's `raw_json_token`).
///
/// A `\uXXXX` escape's four hex digits can never themselves be `"` or `\`,
/// so skipping exactly two bytes per escape (the backslash and the escape
/// kind byte) and letting the next iterations walk over the hex digits as
/// ordinary bytes still finds the real closing quote.
pub(crate) fn skip(src: &[u8]) -> Result<usize, Error> {
    test_assert_eq!(Some(&b'"'), src.first());

    let mut i = 1usize;
    loop {
        match *src.get(i).ok_or(Error::UnclosedString)? {
            b'"' => return Ok(i + 1),
            b'\\' => i += 2,
            _ => i += 1,
        }
    }
}

fn parse_hex4(src: &[u8], i: usize) -> Result<u16, Error> {
    let digits = src.get(i..i + 4).ok_or(Error::StringError)?;
    let digits = str::from_utf8(digits).map_err(|_| Error::StringError)?;
    u16::from_str_radix(digits, 16).map_err(|_| Error::StringError)
}
