/*!
Stage 1: turns padded input bytes into a structural index array.

Wires together `C1` (block reader), the selected [`crate::backend::Backend`]
(`C2`), `C3` (string scanner), `C4` (UTF-8 validator) and `C5` (structural
indexer), one block at a time, exactly as `examples/original_source`'s
`stage1/json_structural_indexer.h::index` drives its own block loop.
*/

mod block_reader;
mod indexer;
mod string_scanner;
mod utf8;

use crate::backend::{self, Backend};
use crate::error::Error;
use crate::padded::PaddedInput;

use block_reader::BlockReader;
use indexer::Indexer;
use string_scanner::StringScanner;
use utf8::Utf8Validator;

/// The output of stage 1: the structural index array stage 2 walks, and the
/// first error encountered (if any) while building it.
///
/// Stage 1 always finishes its pass even after finding an error (spec §7),
/// so the index it returns is complete up to whatever byte range was
/// classified, and stage 2 can decide whether to trust it.
pub(crate) struct Stage1Result {
    pub(crate) structural_indices: Vec<u32>,
    pub(crate) error: Option<Error>,
}

pub(crate) fn run(input: PaddedInput<'_>) -> Stage1Result {
    let bytes = input.as_bytes();

    let backend = backend::select();
    let step = backend.step();

    let mut reader = BlockReader::new(bytes, step);
    let mut scanner = StringScanner::new();
    let mut validator = Utf8Validator::new();
    let mut indexer = Indexer::new();

    let mut first_error: Option<Error> = None;
    let mut remainder_buf = vec![0u8; step];

    loop {
        let block_start = reader.block_index();

        let block: &[u8] = if reader.has_full_block() {
            reader.full_block()
        } else {
            let n = reader.get_remainder(&mut remainder_buf);
            if n == 0 {
                break;
            }
            &remainder_buf
        };

        validator.next(block);

        let classify = backend.classify(block);
        let (backslash, raw_quote) = string_scanner::raw_masks(block);
        let strings = scanner.next(backslash, raw_quote);

        indexer.next(block_start, block, classify, strings);

        reader.advance();
    }

    if let Err(()) = validator.finish() {
        record_error(Error::Utf8Error, &mut first_error);
    }

    if scanner.in_string_at_eof() {
        record_error(Error::UnclosedString, &mut first_error);
    }

    if indexer.has_unescaped_control_in_string() {
        record_error(Error::UnescapedChars, &mut first_error);
    }

    let structural_indices = indexer.finish(bytes.len());

    Stage1Result {
        structural_indices,
        error: first_error,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::padded::OwnedPaddedInput;

    fn run_str(s: &str) -> Stage1Result {
        let owned = OwnedPaddedInput::new(s.as_bytes());
        run(owned.as_padded())
    }

    // P2/P3: a well-formed document produces a clean structural index and no error.
    #[test]
    fn indexes_small_object_with_no_error() {
        let result = run_str(r#"{"a":1,"b":[2,3]}"#);
        assert!(result.error.is_none());
        assert!(result.structural_indices.len() > 3);
    }

    #[test]
    fn detects_unclosed_string_at_eof() {
        let result = run_str(r#"{"a":"oops"#);
        assert_eq!(Some(Error::UnclosedString), result.error);
    }

    #[test]
    fn detects_invalid_utf8() {
        let mut bytes = br#"{"a":""#.to_vec();
        bytes.push(0xFF);
        bytes.extend_from_slice(br#""}"#);

        let owned = OwnedPaddedInput::new(&bytes);
        let result = run(owned.as_padded());
        assert_eq!(Some(Error::Utf8Error), result.error);
    }

    #[test]
    fn detects_unescaped_control_character_in_string() {
        let result = run_str("{\"a\":\"b\tc\"}");
        assert_eq!(Some(Error::UnescapedChars), result.error);
    }

    // a document spanning more than one block (step is 64 on every backend)
    // still indexes correctly, exercising the cross-block carry state in
    // the string scanner and UTF-8 validator.
    #[test]
    fn indexes_document_spanning_multiple_blocks() {
        let mut big = String::from(r#"{"items":["#);
        for i in 0..30 {
            if i > 0 {
                big.push(',');
            }
            big.push_str(&format!(r#""item-{i}""#));
        }
        big.push_str("]}");

        let result = run_str(&big);
        assert!(result.error.is_none());
        // one structural index per: { "items" : [ + one opening-quote per
        // item + one comma between each + ] } + 3-word sentinel
        assert!(result.structural_indices.len() > 30);
    }

    #[test]
    fn empty_object_indexes_just_its_braces() {
        let result = run_str("{}");
        assert!(result.error.is_none());
        assert_eq!(&[0, 1], &result.structural_indices[..2]);
    }
}
