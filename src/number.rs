/*!
`C9`: the number parser.

Grounded in `examples/original_source/src/generic/numberparsing.h`: the
grammar walk (no leading `+`, no leading `.`, no leading zero followed by
more digits, mandatory digits after `.` and after `e`/`E`) is a direct port
of that file's `parse_number` preamble, reduced to the parts that matter
once SIMD string-to-float tricks are out of scope (`std::str::parse` covers
the float and integer conversions here; this module's job is validating the
grammar and picking the right tape representation, not reimplementing
`fast_float`).
*/

use std::str;

use crate::error::Error;

/// The classified value of a number literal, per spec §4.9.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) enum Number {
    Signed(i64),
    Unsigned(u64),
    Float(f64),
    /// More significant digits than fit in a `u64`. The tape records only
    /// the literal's length; callers read the raw token instead of a typed
    /// value (spec §4.9, §9 open question: any integer exceeding `u64`,
    /// including exactly `2^64`, is classified `big_integer` uniformly).
    Big,
}

/// A successfully parsed number literal and how many bytes of `src` it
/// occupied, so the caller (the tape builder or the on-demand cursor)
/// knows where the next token begins.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct ParsedNumber {
    pub(crate) number: Number,
    pub(crate) consumed: usize,
}

/// Parse a JSON number starting at `src[0]` (a `-` or an ASCII digit).
///
/// `src` only needs to extend at least one byte past the end of the literal;
/// the padded input guarantee (§3) means reading into whitespace/padding
/// bytes past a root-level scalar is always safe.
pub(crate) fn parse(src: &[u8], minus_zero_as_float: bool) -> Result<ParsedNumber, Error> {
    let mut i = 0usize;

    let negative = src.first() == Some(&b'-');
    if negative {
        i += 1;
    }

    let int_start = i;
    match src.get(i) {
        Some(b'0') => {
            i += 1;
            // RFC 8259: no leading zeros, `0` must stand alone in the integer part.
            if matches!(src.get(i), Some(b'0'..=b'9')) {
                return Err(Error::NumberError);
            }
        }
        Some(b'1'..=b'9') => {
            i += 1;
            while matches!(src.get(i), Some(b'0'..=b'9')) {
                i += 1;
            }
        }
        _ => return Err(Error::NumberError),
    }
    let int_digits = i - int_start;

    let mut has_frac = false;
    if src.get(i) == Some(&b'.') {
        has_frac = true;
        i += 1;
        let frac_start = i;
        while matches!(src.get(i), Some(b'0'..=b'9')) {
            i += 1;
        }
        if i == frac_start {
            return Err(Error::NumberError);
        }
    }

    let mut has_exp = false;
    if matches!(src.get(i), Some(b'e') | Some(b'E')) {
        has_exp = true;
        i += 1;
        if matches!(src.get(i), Some(b'+') | Some(b'-')) {
            i += 1;
        }
        let exp_start = i;
        while matches!(src.get(i), Some(b'0'..=b'9')) {
            i += 1;
        }
        if i == exp_start {
            return Err(Error::NumberError);
        }
    }

    let consumed = i;
    let text = str::from_utf8(&src[..consumed]).expect("number grammar is ASCII");

    let number = if has_frac || has_exp {
        text.parse::<f64>().map(Number::Float).map_err(|_| Error::NumberError)?
    } else if negative {
        if minus_zero_as_float && text == "-0" {
            Number::Float(-0.0)
        } else {
            match text.parse::<i64>() {
                Ok(v) => Number::Signed(v),
                // too many digits for i64: per the uniform big-integer rule
                // this is `big_integer`, not an error.
                Err(_) => Number::Big,
            }
        }
    } else {
        match text.parse::<u64>() {
            Ok(v) if v <= i64::MAX as u64 => Number::Signed(v as i64),
            Ok(v) => Number::Unsigned(v),
            Err(_) => Number::Big,
        }
    };

    // a merely-long run of leading zeros can't happen (RFC 8259 forbids it
    // above), so `int_digits` only matters for documentation purposes here.
    let _ = int_digits;

    Ok(ParsedNumber { number, consumed })
}
