/*!
# `falcon-json`

## 🦅⚡

A two-stage, vectorized JSON parser.

Stage 1 scans a padded input buffer in fixed-width blocks and produces a
*structural index*: an array of byte offsets, one per JSON structural
character (`{ } [ ] , :`), string-opening quote, and scalar literal. Stage 2
then either:

- walks the structural index once to build a compact binary *tape* plus an
  auxiliary string buffer ([`tape`]), or
- walks it lazily as the caller asks for values, without ever building a
  tape ([`ondemand`]).

Both stages share the same Stage 1 output, and both produce identical
results for valid input.

## ⚠️ CAREFUL

This library contains a _lot_ of unsafe code and is very performance
sensitive. Any changes need to be carefully considered and should be:

- tested against the benchmarks to make sure we don't regress (at least not
  accidentally).
- fuzz tested to ensure there aren't soundness holes introduced.

We take advantage of properties of the structural index to avoid bounds
checks wherever possible. Any unchecked operation is performed through a
macro that uses the checked variant in test/debug builds (or when the
`checked` build cfg is set) so we don't ever cause UB when working through
a document.
*/

#![cfg_attr(checked, deny(warnings))]
#![allow(unused_labels)] // labels are fun
#![allow(clippy::missing_safety_doc)] // false positives
#![allow(clippy::question_mark)] // generates slow code

pub(crate) mod std_ext;

#[macro_use]
mod macros;

mod backend;
mod error;
mod number;
mod padded;
mod pointer;
mod stage1;
mod string;

pub mod minify;
pub mod ondemand;
pub mod stream;
pub mod tape;

pub use error::Error;
pub use padded::{OwnedPaddedInput, PaddedInput, SIMDJSON_PADDING};
pub use tape::Parser;

/**
Configuration shared by the tape builder and the on-demand cursor.
*/
#[derive(Debug, Clone, Copy)]
pub struct ParserConfig {
    /**
    The maximum nesting depth of objects and arrays.

    Bounds the open-container stack so degenerate inputs like
    `[[[[[[[[[[[[...` can't cause unbounded allocation.
    */
    pub max_depth: usize,
    /**
    Whether `-0` is read back as a negative-zero `double` instead of the
    signed integer `0`.

    The spec doesn't mandate either choice, but requires it be fixed for the
    lifetime of one parser. We default to the historical simdjson behavior
    of treating `-0` as the integer zero.
    */
    pub minus_zero_as_float: bool,
}

impl Default for ParserConfig {
    #[inline]
    fn default() -> Self {
        ParserConfig {
            max_depth: Self::DEFAULT_MAX_DEPTH,
            minus_zero_as_float: false,
        }
    }
}

impl ParserConfig {
    /// simdjson's historical default maximum nesting depth.
    pub const DEFAULT_MAX_DEPTH: usize = 1024;
}

#[cfg(test)]
mod tests;
