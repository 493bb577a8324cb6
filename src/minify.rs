/*!
Minify (spec §6 "Minify (optional surface)"): strip whitespace outside
string literals.

Not part of `Parser::iterate` and not Stage 1 -- this is a standalone
textual pass that tracks just enough in-string state (quote/backslash) to
know which whitespace is safe to drop, the same three states
(`normal`/`in_string`/`escaped`) the original's `json_minifier.h` drives off
its own whitespace mask and string-interior mask, reduced here to a scalar
byte loop since there's no structural index to build alongside it.
*/

use crate::error::Error;

#[inline]
fn is_whitespace(byte: u8) -> bool {
    matches!(byte, b' ' | b'\t' | b'\n' | b'\r')
}

/// Append `src` to `dst` with every byte of whitespace outside a string
/// literal removed. Returns the number of bytes appended.
///
/// This doesn't validate JSON -- an unclosed string at EOF is reported as
/// `UNCLOSED_STRING` (the one case where failing to track string state
/// would otherwise silently swallow the rest of the input as "inside a
/// string"), but malformed structure otherwise passes through untouched.
pub fn minify(src: &[u8], dst: &mut Vec<u8>) -> Result<usize, Error> {
    let start = dst.len();

    let mut in_string = false;
    let mut escaped = false;

    for &byte in src {
        if in_string {
            dst.push(byte);
            if escaped {
                escaped = false;
            } else if byte == b'\\' {
                escaped = true;
            } else if byte == b'"' {
                in_string = false;
            }
        } else if byte == b'"' {
            in_string = true;
            dst.push(byte);
        } else if !is_whitespace(byte) {
            dst.push(byte);
        }
    }

    if in_string {
        return Err(Error::UnclosedString);
    }

    Ok(dst.len() - start)
}
