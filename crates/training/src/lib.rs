//! Pairbpe-training - BPE training infrastructure
//!
//! This crate learns BPE merge rules from text data: it counts adjacent
//! pair frequencies across the corpus (in parallel), selects the most
//! frequent pair each iteration with a deterministic tie-break, and rewrites
//! the corpus with the merged token.
//!
//! # Example
//!
//! ```rust
//! use pairbpe_training::{train_merges, PairCounter};
//!
//! let mut counter = PairCounter::new();
//! counter.add_sequence("aaabdaaabac".bytes().map(u32::from).collect(), 1);
//!
//! let merges = train_merges(&mut counter, 3, None);
//! assert_eq!(merges.len(), 3);
//! ```

pub use pairbpe_core::{Result, TokenizerError};

// Training infrastructure
pub mod training;
pub use training::{count_pairs, count_pairs_weighted, train_merges, MergeStep, PairCounter, ProgressCallback};
