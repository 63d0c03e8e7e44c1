//! Pre-tokenization pipeline.
//!
//! Splitting is the only pre-tokenization step: chunks bound merges, and
//! concatenating them reconstructs the input exactly.

pub mod split;

pub use self::split::{Splitter, GPT2_SPLIT_PATTERN, GPT4_SPLIT_PATTERN};
