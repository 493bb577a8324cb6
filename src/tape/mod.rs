/*!
`C6`/`C7`: the tape-mode Stage 2 implementation (spec §3, §4.7, §6).

Builds a complete tape and string buffer for a document in one pass, then
hands out a read-only [`Document`] view over the result. This is the
eager counterpart to [`crate::ondemand`]'s lazy cursor; both share Stage 1's
structural index and agree on every valid input (spec §5 P5).
*/

mod builder;
mod document;
mod writer;

pub use document::{Array, ArrayIterator, Document, Field, Object, ObjectIterator, Value};

use crate::error::Error;
use crate::padded::PaddedInput;
use crate::stage1;
use crate::ParserConfig;

/// A reusable tape-mode parser (spec §4.1's `Parser::new`/`iterate`
/// surface).
///
/// Reuse one `Parser` across many documents: it holds onto its internal
/// tape and string-buffer allocations between calls to [`Parser::iterate`],
/// the same way the original amortizes allocation across repeated parses.
pub struct Parser {
    config: ParserConfig,
    max_capacity: usize,
    tape: Vec<u64>,
    string_buf: Vec<u8>,
}

impl Parser {
    /// A new parser bounded to documents of at most `max_capacity` bytes.
    pub fn new(max_capacity: usize) -> Self {
        Parser::with_config(max_capacity, ParserConfig::default())
    }

    pub fn with_config(max_capacity: usize, config: ParserConfig) -> Self {
        Parser { config, max_capacity, tape: Vec::new(), string_buf: Vec::new() }
    }

    /// Parse `input` into a tape and return a borrowing [`Document`] view
    /// over it.
    ///
    /// Reuses this parser's internal buffers: a prior [`Document`] borrowed
    /// from this parser must be dropped before calling `iterate` again
    /// (the borrow checker enforces this, since `Document<'p>` borrows from
    /// `&'p mut self`... no -- see note below).
    pub fn iterate<'p>(&'p mut self, input: PaddedInput<'p>) -> Result<Document<'p>, Error> {
        if input.len() > self.max_capacity {
            return Err(Error::Capacity);
        }

        let stage1 = stage1::run(input);
        if let Some(err) = stage1.error {
            return Err(err);
        }

        let result = builder::build(input.as_bytes(), &stage1.structural_indices, self.config)?;
        self.tape = result.tape;
        self.string_buf = result.string_buf;

        Ok(Document::new(input.as_bytes(), &self.tape, &self.string_buf))
    }
}
