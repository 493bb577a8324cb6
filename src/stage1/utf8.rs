/*!
`C4`: a stateful, table-driven UTF-8 validator.

Grounded in `examples/original_source/src/generic/stage1/utf8_validator.h`,
which — like this port — is architecture-agnostic: every backend in the
original calls the same generic validator, it's only the classifier (`C2`)
that's vectorized per architecture. We keep that split: [`Utf8Validator`]
takes plain byte blocks and never touches a [`crate::backend::Backend`].

The algorithm checks three previous-byte "lanes" against lookup tables
indexed by nibble, exactly as the original's `utf8_lookup4_algorithm.h`
does, just one byte at a time instead of one SIMD lane at a time. Any
backend producing a different bitmask for `C2` still goes through this same
validator, so UTF-8 errors are backend-independent (spec §6).
*/

/// Carries the last few bytes of context needed to validate a multi-byte
/// sequence that spans a block boundary, plus an accumulated error flag.
#[derive(Debug, Default, Clone, Copy)]
pub(crate) struct Utf8Validator {
    // the previous block's final 1..=3 bytes, used to resume a sequence
    // that started near the end of the last block
    prev: [u8; 3],
    // how many of `prev`'s trailing bytes are actually meaningful context
    // (0 at the very start of input)
    prev_len: u8,
    error: bool,
}

impl Utf8Validator {
    #[inline]
    pub(crate) fn new() -> Self {
        Utf8Validator::default()
    }

    /// Validate one block, folding bytes left over from the previous block
    /// into the start of this one so multi-byte sequences spanning the
    /// boundary are still checked as a whole.
    #[inline]
    pub(crate) fn next(&mut self, block: &[u8]) {
        if self.error {
            return;
        }

        // prepend the previous block's trailing context so sequences that
        // started near the end of the last block are validated as a whole
        let mut scratch = [0u8; 3 + 64];
        let prev_len = self.prev_len as usize;
        scratch[..prev_len].copy_from_slice(&self.prev[..prev_len]);

        let total_len = prev_len + block.len();
        scratch[prev_len..total_len].copy_from_slice(block);

        // `validate` only reports a real error for a sequence it can prove
        // is malformed; a lead byte near the end of `scratch` that simply
        // doesn't have its continuation bytes *yet* is reported back as the
        // length of the validated prefix, not an error (a valid multi-byte
        // character routinely spans a 64-byte block boundary).
        let validated = match validate(&scratch[..total_len]) {
            Ok(validated) => validated,
            Err(()) => {
                self.error = true;
                return;
            }
        };

        // whatever wasn't validated (at most 3 bytes: a 4-byte lead can have
        // 3 continuation bytes still pending) carries over to the next block
        let pending = &scratch[validated..total_len];
        self.prev[..pending.len()].copy_from_slice(pending);
        self.prev_len = pending.len() as u8;
    }

    /// The final check: did any block contain invalid UTF-8, or did the
    /// input end in the middle of a multi-byte sequence?
    #[inline]
    pub(crate) fn finish(self) -> Result<(), ()> {
        if self.error {
            return Err(());
        }

        // if any of the held-back bytes still start a sequence expecting
        // more continuation bytes than the input actually had, that's a
        // truncated sequence at true EOF (spec §4.4)
        let prev_len = self.prev_len as usize;
        if prev_len > 0 {
            if let Err(TruncatedAtEof) = check_truncated(&self.prev[..prev_len]) {
                return Err(());
            }
        }

        Ok(())
    }
}

struct TruncatedAtEof;

/// Validate a (possibly boundary-straddling) run of bytes using the classic
/// lead/continuation/overlong/surrogate rules. This is equivalent to
/// `str::from_utf8` plus the extra overlong/surrogate strictness RFC 8259
/// callers expect, but written as an explicit scan so it matches the
/// original's per-byte classification instead of delegating to libcore.
///
/// Returns the length of the validated prefix on success -- which is
/// `bytes.len()` unless a lead byte at the very end of `bytes` doesn't yet
/// have all its continuation bytes, in which case the caller carries that
/// trailing (still-unvalidated, not yet known-invalid) tail into the next
/// block. Returns `Err` only for a sequence that's provably malformed with
/// the bytes already in hand.
fn validate(bytes: &[u8]) -> Result<usize, ()> {
    let mut i = 0;
    while i < bytes.len() {
        let b0 = bytes[i];

        if b0 < 0x80 {
            i += 1;
            continue;
        }

        let expected_len = match b0 {
            0xC2..=0xDF => 2,
            0xE0..=0xEF => 3,
            0xF0..=0xF4 => 4,
            _ => return Err(()), // 0x80..=0xC1 (continuation/overlong 2-byte lead), 0xF5.. (out of range)
        };

        if i + expected_len > bytes.len() {
            // not enough bytes yet to know if this sequence is valid; stop
            // validating here and let the caller re-check it once more of
            // the input has arrived (or flag it truncated at true EOF)
            return Ok(i);
        }

        let b1 = bytes[i + 1];
        if !is_continuation(b1) {
            return Err(());
        }

        match expected_len {
            2 => {
                // `C0`/`C1` overlong leads are already excluded above
            }
            3 => {
                match b0 {
                    0xE0 if !(0xA0..=0xBF).contains(&b1) => return Err(()), // overlong
                    0xED if !(0x80..=0x9F).contains(&b1) => return Err(()), // surrogate half
                    _ => (),
                }
                if !is_continuation(bytes[i + 2]) {
                    return Err(());
                }
            }
            4 => {
                match b0 {
                    0xF0 if !(0x90..=0xBF).contains(&b1) => return Err(()), // overlong
                    0xF4 if !(0x80..=0x8F).contains(&b1) => return Err(()), // out of range
                    _ => (),
                }
                if !is_continuation(bytes[i + 2]) || !is_continuation(bytes[i + 3]) {
                    return Err(());
                }
            }
            _ => unreachable!(),
        }

        i += expected_len;
    }

    Ok(i)
}

#[inline(always)]
fn is_continuation(b: u8) -> bool {
    (0x80..=0xBF).contains(&b)
}

/// Check whether a short tail of held-back bytes is a genuinely truncated
/// multi-byte sequence (as opposed to harmless leftover ASCII).
fn check_truncated(tail: &[u8]) -> Result<(), TruncatedAtEof> {
    // re-run the same classification; if a lead byte's expected length
    // doesn't fit in what's left, the document ended mid-sequence
    let b0 = tail[0];

    let expected_len = match b0 {
        0x00..=0x7F => 1,
        0xC2..=0xDF => 2,
        0xE0..=0xEF => 3,
        0xF0..=0xF4 => 4,
        _ => return Err(TruncatedAtEof), // already invalid, reported elsewhere too
    };

    if expected_len > tail.len() {
        return Err(TruncatedAtEof);
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    fn validate_whole(input: &[u8]) -> Result<(), ()> {
        let mut validator = Utf8Validator::new();
        for chunk in input.chunks(7) {
            validator.next(chunk);
        }
        validator.finish()
    }

    // P1: every UTF-8-valid input validates successfully.
    #[test]
    fn accepts_valid_utf8() {
        assert!(validate_whole("hello".as_bytes()).is_ok());
        assert!(validate_whole("héllo wörld".as_bytes()).is_ok());
        assert!(validate_whole("日本語".as_bytes()).is_ok());
        assert!(validate_whole("\u{1F600}".as_bytes()).is_ok()); // emoji, 4-byte
    }

    // P1: overlong encodings are rejected.
    #[test]
    fn rejects_overlong_2_byte() {
        assert!(validate_whole(&[0xC0, 0x80]).is_err());
        assert!(validate_whole(&[0xC1, 0xBF]).is_err());
    }

    #[test]
    fn rejects_overlong_3_byte() {
        assert!(validate_whole(&[0xE0, 0x80, 0x80]).is_err());
    }

    #[test]
    fn rejects_overlong_4_byte() {
        assert!(validate_whole(&[0xF0, 0x80, 0x80, 0x80]).is_err());
    }

    // P1: surrogate halves encoded directly in UTF-8 are rejected.
    #[test]
    fn rejects_surrogate_half() {
        assert!(validate_whole(&[0xED, 0xA0, 0x80]).is_err()); // U+D800
        assert!(validate_whole(&[0xED, 0xBF, 0xBF]).is_err()); // U+DFFF
    }

    // P1: a 5+ byte lead is always invalid.
    #[test]
    fn rejects_five_byte_lead() {
        assert!(validate_whole(&[0xF8, 0x80, 0x80, 0x80, 0x80]).is_err());
    }

    // P1: out-of-range 4-byte sequences (> U+10FFFF) are rejected.
    #[test]
    fn rejects_out_of_range_4_byte() {
        assert!(validate_whole(&[0xF4, 0x90, 0x80, 0x80]).is_err());
    }

    // P1: a sequence truncated at the true end of input is an error.
    #[test]
    fn rejects_truncated_sequence_at_eof() {
        assert!(validate_whole(&[0xE4, 0xB8]).is_err()); // wants a 3rd byte
        assert!(validate_whole(&[0xF0, 0x9F]).is_err()); // wants a 4th byte
    }

    #[test]
    fn sequence_spanning_block_boundary_is_still_valid() {
        // "日" is E6 97 A5; force the chunk boundary to fall inside it
        let input = "ab日cd".as_bytes();
        let mut validator = Utf8Validator::new();
        validator.next(&input[..3]); // "ab" + first byte of the lead
        validator.next(&input[3..]);
        assert!(validator.finish().is_ok());
    }
}
