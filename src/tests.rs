//! Cross-cutting corpus tests, grounded in the teacher's `tests/valid.rs` /
//! `tests/invalid.rs` / `tests/some.rs` split: `some` is a randomized
//! valid-JSON generator, `valid` checks accepted input against `serde_json`,
//! `invalid` checks that malformed input is rejected with the right error
//! code rather than panicking or reading out of bounds.

mod some;

mod invalid;
mod valid;
