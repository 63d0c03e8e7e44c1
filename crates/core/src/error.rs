//! Error types for the BPE tokenizer library.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for the tokenizer library.
#[derive(Error, Debug)]
pub enum TokenizerError {
    /// Requested target vocabulary is smaller than the 256 base byte tokens.
    #[error("invalid vocab size {0}: must be at least 256")]
    InvalidVocabSize(usize),

    /// Operation not available on this tokenizer variant.
    #[error("unsupported operation: {0}")]
    Unsupported(&'static str),

    /// Unknown version tag or structurally malformed model data.
    #[error("model format error: {0}")]
    ModelFormat(String),

    /// Merge recovery from a pretrained rank table failed to converge.
    #[error("rank table reconstruction failed: {0}")]
    Reconstruction(String),

    /// Invalid merge rule
    #[error("invalid merge rule: {0}")]
    InvalidMerge(String),

    /// I/O error with file context
    #[error("I/O error for {path}: {err}")]
    Io {
        path: PathBuf,
        #[source]
        err: std::io::Error,
    },
}

/// Result type alias for tokenizer operations.
pub type Result<T> = std::result::Result<T, TokenizerError>;
