/*!
Document-stream mode (spec §6): iterate over multiple top-level JSON values
packed into one buffer -- concatenated values, NDJSON, or (with
`allow_comma_separated`) a comma-separated sequence like `1,2,3`.

Grounded in `examples/original_source/src/generic/stage1/find_next_document_index.h`,
but reshaped for this crate's explicit non-streaming-I/O scope (spec.md §1:
"input is a single contiguous padded buffer"): the original scans backward
over an already-built, possibly-truncated structural index to find a clean
split point inside one fixed-size window of unbounded input. Since this
crate always has the whole buffer in memory up front, [`find_document_end`]
instead scans forward from the start of the remaining bytes -- tracking
string/escape state and container depth exactly the same way -- to find
where the first complete top-level value ends, and hands that slice to a
fresh [`crate::tape::Parser::iterate`] call. Every document gets full Stage
1 + Stage 2 validation; only the split points are found without it.
*/

use crate::error::Error;
use crate::padded::OwnedPaddedInput;
use crate::tape;
use crate::ParserConfig;

/// Iterates the top-level JSON values packed into one buffer.
///
/// Not a [`std::iter::Iterator`]: each document borrows from this stream's
/// own internal buffers, so -- like [`crate::ondemand::Parser`] -- it's a
/// lending iterator, driven with `while let Some(doc) = stream.next_document()`.
pub struct DocumentStream<'p> {
    remaining: &'p [u8],
    allow_comma_separated: bool,
    parser: tape::Parser,
    current: Option<OwnedPaddedInput>,
}

impl<'p> DocumentStream<'p> {
    pub fn new(input: &'p [u8]) -> Self {
        DocumentStream::with_config(input, false, ParserConfig::default())
    }

    pub fn with_config(input: &'p [u8], allow_comma_separated: bool, config: ParserConfig) -> Self {
        DocumentStream {
            remaining: input,
            allow_comma_separated,
            parser: tape::Parser::with_config(input.len().max(1), config),
            current: None,
        }
    }

    /// Parse and return the next top-level document, or `None` once the
    /// remaining input is exhausted (nothing left but whitespace, and --
    /// with `allow_comma_separated` -- separators).
    pub fn next_document<'a>(&'a mut self) -> Option<Result<tape::Document<'a>, Error>> {
        self.skip_separators();
        if self.remaining.is_empty() {
            return None;
        }

        let end = match find_document_end(self.remaining) {
            Some(end) => end,
            None => {
                // malformed trailing data: consume it so a second call
                // doesn't loop, and report it once.
                let bytes = std::mem::take(&mut self.remaining);
                self.current = Some(OwnedPaddedInput::new(bytes));
                let owned = self.current.as_ref().unwrap();
                return Some(self.parser.iterate(owned.as_padded()));
            }
        };

        let (doc_bytes, rest) = self.remaining.split_at(end);
        self.remaining = rest;

        self.current = Some(OwnedPaddedInput::new(doc_bytes));
        let owned = self.current.as_ref().unwrap();
        Some(self.parser.iterate(owned.as_padded()))
    }

    fn skip_separators(&mut self) {
        loop {
            let trimmed = trim_leading_whitespace(self.remaining);
            if self.allow_comma_separated {
                if let Some(rest) = trimmed.strip_prefix(b",") {
                    self.remaining = rest;
                    continue;
                }
            }
            self.remaining = trimmed;
            break;
        }
    }
}

fn trim_leading_whitespace(bytes: &[u8]) -> &[u8] {
    let end = bytes.iter().position(|&b| !matches!(b, b' ' | b'\t' | b'\n' | b'\r')).unwrap_or(bytes.len());
    &bytes[end..]
}

/// Find the end (exclusive) of the first complete top-level value in
/// `bytes`, which must already start at a real token (no leading
/// whitespace). `None` if `bytes` is empty or the value never closes.
fn find_document_end(bytes: &[u8]) -> Option<usize> {
    match *bytes.first()? {
        b'{' | b'[' => scan_container(bytes),
        b'"' => scan_string(bytes),
        _ => Some(scan_scalar_end(bytes)),
    }
}

fn scan_container(bytes: &[u8]) -> Option<usize> {
    let mut depth = 0i32;
    let mut in_string = false;
    let mut escaped = false;

    for (i, &b) in bytes.iter().enumerate() {
        if in_string {
            if escaped {
                escaped = false;
            } else if b == b'\\' {
                escaped = true;
            } else if b == b'"' {
                in_string = false;
            }
            continue;
        }

        match b {
            b'"' => in_string = true,
            b'{' | b'[' => depth += 1,
            b'}' | b']' => {
                depth -= 1;
                if depth == 0 {
                    return Some(i + 1);
                }
            }
            _ => {}
        }
    }

    None
}

fn scan_string(bytes: &[u8]) -> Option<usize> {
    let mut escaped = false;
    for (i, &b) in bytes.iter().enumerate().skip(1) {
        if escaped {
            escaped = false;
        } else if b == b'\\' {
            escaped = true;
        } else if b == b'"' {
            return Some(i + 1);
        }
    }
    None
}

fn scan_scalar_end(bytes: &[u8]) -> usize {
    bytes.iter().position(|&b| matches!(b, b' ' | b'\t' | b'\n' | b'\r' | b',')).unwrap_or(bytes.len())
}
