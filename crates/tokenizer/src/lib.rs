//! Pairbpe-tokenizer - Byte-pair-encoding tokenizers
//!
//! This crate provides the user-facing tokenizer variants behind one
//! common [`Tokenizer`] trait:
//!
//! - [`ByteLevelTokenizer`] - trains and encodes over raw bytes, no
//!   pre-tokenization
//! - [`ChunkedTokenizer`] - regex pre-tokenization (GPT-2/GPT-4 presets or
//!   a custom pattern); merges never cross chunk boundaries
//! - [`PretrainedTokenizer`] - read-only import of an external rank table,
//!   with merge recovery and a byte permutation
//!
//! # Example
//!
//! ```rust
//! use pairbpe_tokenizer::{ByteLevelTokenizer, Tokenizer};
//!
//! let mut tokenizer = ByteLevelTokenizer::new();
//! tokenizer.train("aaabdaaabac", 256 + 3, None)?;
//!
//! let ids = tokenizer.encode("aaabdaaabac");
//! assert_eq!(ids, vec![258, 100, 258, 97, 99]);
//! assert_eq!(tokenizer.decode(&ids), "aaabdaaabac");
//! # Ok::<(), pairbpe_tokenizer::TokenizerError>(())
//! ```

// Re-export core types
pub use pairbpe_core::{render_token, MergeTable, Pair, Result, TokenizerError, Vocab};

// Re-export the training callback types used by `Tokenizer::train`
pub use pairbpe_training::{MergeStep, ProgressCallback};

// Tokenizer API
pub mod tokenizer;
pub use tokenizer::{ByteLevelTokenizer, ChunkedTokenizer, PretrainedTokenizer, Tokenizer};

// IO/Serialization
pub mod io;
pub use io::{ModelFile, ModelLoader, ModelSaver, MODEL_VERSION};

// Pre-tokenization
pub mod pre_tokenizer;
pub use pre_tokenizer::{Splitter, GPT2_SPLIT_PATTERN, GPT4_SPLIT_PATTERN};

// Pretrained rank tables
pub mod ranks;
pub use ranks::{load_rank_file, parse_rank_table, recover_merges, RankTable};

/// Library version
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
