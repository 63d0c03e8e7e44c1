//! Training infrastructure for BPE tokenizers.

pub mod counter;
pub mod trainer;

pub use self::counter::{count_pairs, count_pairs_weighted, PairCounter};
pub use self::trainer::{train_merges, MergeStep, ProgressCallback};
