//! Pairbpe-core - Core BPE algorithm implementation
//!
//! This crate provides the fundamental data structures and algorithms for
//! byte-pair encoding (BPE), independent of any specific tokenizer variant.
//!
//! # Features
//!
//! - Merge tables keyed by genuine `(u32, u32)` pairs with creation-order
//!   iteration, backed by `AHashMap`
//! - Single-pass, non-overlapping merge application
//! - Deterministic vocabulary derivation from a merge table
//! - Error handling with detailed diagnostics
//!
//! # Example
//!
//! ```rust
//! use pairbpe_core::{build_vocab, MergeTable};
//!
//! let mut merges = MergeTable::new();
//! merges.push((104, 105)); // "hi" -> 256
//!
//! let vocab = build_vocab(&merges);
//! assert_eq!(vocab[&256], b"hi".to_vec());
//! ```

pub mod error;
pub use error::{Result, TokenizerError};

// Core BPE algorithm modules
pub mod core;
pub use self::core::{build_vocab, engine, render_token, MergeTable, Pair, Vocab, BASE_VOCAB_SIZE};
