/*!
`C8`: the on-demand cursor (spec §4.8).

Same Stage 1 structural index as [`crate::tape`], but Stage 2 never builds a
tape: values are validated and extracted lazily as the caller asks for them.
Grounded in the teacher's general "never materialize more than you're asked
for" philosophy (`examples/datalust-squirrel-json/src/de/mod.rs`'s
offset-walking `Document`), generalized from "minified input only" to the
full structural-index-driven walk spec §4.8 describes.
*/

mod cursor;
mod document;

pub use document::{Array, ArrayIterator, Document, Field, Object, ObjectIterator, RawString, Value};

use std::cell::{Cell, UnsafeCell};

use cursor::Cursor;

use crate::error::Error;
use crate::padded::PaddedInput;
use crate::stage1;
use crate::ParserConfig;

/// A reusable on-demand parser (spec §4.1's `Parser::new`/`iterate`
/// surface, shared with [`crate::tape::Parser`]).
///
/// Values produced by [`Parser::iterate`] borrow from this parser's
/// structural index and string arena for as long as the returned
/// [`Document`] is held -- which, since `iterate` takes `&mut self`, means
/// a second call to `iterate` is a compile error until the first
/// `Document` is dropped (a stricter, statically-checked version of the
/// spec's "valid until the next iterate call" contract).
pub struct Parser {
    config: ParserConfig,
    max_capacity: usize,
    structural_indices: Vec<u32>,
    string_buf: UnsafeCell<Vec<u8>>,
    pos: Cell<usize>,
    depth: Cell<usize>,
}

impl Parser {
    pub fn new(max_capacity: usize) -> Self {
        Parser::with_config(max_capacity, ParserConfig::default())
    }

    pub fn with_config(max_capacity: usize, config: ParserConfig) -> Self {
        Parser {
            config,
            max_capacity,
            structural_indices: Vec::new(),
            string_buf: UnsafeCell::new(Vec::with_capacity(max_capacity)),
            pos: Cell::new(0),
            depth: Cell::new(0),
        }
    }

    pub fn iterate<'p>(&'p mut self, input: PaddedInput<'p>) -> Result<Document<'p>, Error> {
        if input.len() > self.max_capacity {
            return Err(Error::Capacity);
        }

        let stage1 = stage1::run(input);
        if let Some(err) = stage1.error {
            return Err(err);
        }

        self.structural_indices = stage1.structural_indices;
        self.pos.set(0);
        self.depth.set(0);
        // SAFETY: `&mut self` for `'p` guarantees no borrow from a previous
        // `Document` produced by this parser is still alive.
        unsafe { (*self.string_buf.get()).clear() };

        let cursor = Cursor {
            input: input.as_bytes(),
            structural_indices: &self.structural_indices,
            string_buf: &self.string_buf,
            string_buf_cap: self.max_capacity,
            config: self.config,
            pos: &self.pos,
            depth: &self.depth,
        };

        Ok(Document::new(cursor))
    }
}
