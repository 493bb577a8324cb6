/*!
`C1`: presents the input as a stream of fixed-width blocks.

Grounded in `examples/original_source/src/generic/stage1/buf_block_reader.h`:
the reader hands out full blocks directly from the input while any remain,
then pads the final partial block with spaces so the classifier never has to
special-case a short read.
*/

/// Walks `input` in blocks of `step` bytes.
///
/// The final, possibly-partial block is delivered through
/// [`BlockReader::get_remainder`], space-padded to `step` bytes. Padding with
/// spaces (rather than zeros) matters: spaces are whitespace, so the padded
/// tail never gets misclassified as a structural or scalar byte.
pub(crate) struct BlockReader<'input> {
    input: &'input [u8],
    step: usize,
    idx: usize,
}

impl<'input> BlockReader<'input> {
    #[inline]
    pub(crate) fn new(input: &'input [u8], step: usize) -> Self {
        BlockReader { input, step, idx: 0 }
    }

    #[inline]
    pub(crate) fn block_index(&self) -> usize {
        self.idx
    }

    #[inline]
    pub(crate) fn has_full_block(&self) -> bool {
        self.idx + self.step <= self.input.len()
    }

    #[inline]
    pub(crate) fn full_block(&self) -> &'input [u8] {
        test_assert!(self.has_full_block());
        &self.input[self.idx..self.idx + self.step]
    }

    /// Copy the remaining `< step` bytes of input into `buf`, space-padding
    /// the rest. Returns the number of real (non-padding) bytes copied, or 0
    /// if there's no remainder (the caller should never present an empty
    /// block to the classifier).
    #[inline]
    pub(crate) fn get_remainder(&self, buf: &mut [u8]) -> usize {
        test_assert_eq!(self.step, buf.len());

        let remaining = self.input.len().saturating_sub(self.idx);
        if remaining == 0 {
            return 0;
        }

        let remaining = remaining.min(self.step);
        buf[..remaining].copy_from_slice(&self.input[self.idx..self.idx + remaining]);
        buf[remaining..].fill(b' ');

        remaining
    }

    #[inline]
    pub(crate) fn advance(&mut self) {
        self.idx += self.step;
    }
}
