//! Byte-level BPE tokenizer.
//!
//! The simplest variant: no pre-tokenization at all. The whole input is one
//! sequence of raw bytes and merges may span anything, including
//! whitespace.

use super::{BpeModel, Tokenizer};
use crate::pre_tokenizer::Splitter;
use pairbpe_core::{MergeTable, Result, Vocab};
use pairbpe_training::ProgressCallback;
use std::path::Path;

/// Byte-level BPE tokenizer without pre-tokenization.
pub struct ByteLevelTokenizer {
    model: BpeModel,
}

impl ByteLevelTokenizer {
    /// Create an untrained tokenizer whose vocabulary is the 256 raw bytes.
    pub fn new() -> Self {
        Self {
            model: BpeModel::with_splitter(Splitter::identity()),
        }
    }

    /// The learned merge table.
    pub fn merges(&self) -> &MergeTable {
        &self.model.merges
    }

    /// The derived vocabulary.
    pub fn vocab(&self) -> &Vocab {
        &self.model.vocab
    }
}

impl Default for ByteLevelTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer for ByteLevelTokenizer {
    fn train(
        &mut self,
        text: &str,
        vocab_size: usize,
        progress: Option<ProgressCallback<'_>>,
    ) -> Result<()> {
        self.model.train(text, vocab_size, progress)
    }

    fn encode(&self, text: &str) -> Vec<u32> {
        self.model.encode(text)
    }

    fn decode(&self, ids: &[u32]) -> String {
        self.model.decode(ids)
    }

    fn save(&self, prefix: &Path) -> Result<()> {
        self.model.save(prefix)
    }

    fn load(&mut self, model_path: &Path) -> Result<()> {
        // A byte-level tokenizer never splits, whatever pattern the file
        // carries.
        self.model.load(model_path, false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pairbpe_core::TokenizerError;

    #[test]
    fn test_wikipedia_example() {
        let mut tokenizer = ByteLevelTokenizer::new();
        let text = "aaabdaaabac";
        tokenizer.train(text, 256 + 3, None).unwrap();

        assert_eq!(tokenizer.merges().len(), 3);
        assert_eq!(tokenizer.encode(text), vec![258, 100, 258, 97, 99]);
        assert_eq!(tokenizer.decode(&[258, 100, 258, 97, 99]), text);
    }

    #[test]
    fn test_empty_string_round_trip() {
        let tokenizer = ByteLevelTokenizer::new();
        assert_eq!(tokenizer.encode(""), Vec::<u32>::new());
        assert_eq!(tokenizer.decode(&[]), "");
    }

    #[test]
    fn test_multibyte_char_without_merges() {
        let tokenizer = ByteLevelTokenizer::new();
        let text = "🙂";
        let ids = tokenizer.encode(text);
        assert_eq!(ids.len(), text.len()); // one id per UTF-8 byte
        assert_eq!(tokenizer.decode(&ids), text);
    }

    #[test]
    fn test_round_trip_after_training() {
        let mut tokenizer = ByteLevelTokenizer::new();
        let text = "hello world!!!? (안녕하세요!) lol123 😉";
        tokenizer.train(text, 256 + 40, None).unwrap();
        assert_eq!(tokenizer.decode(&tokenizer.encode(text)), text);

        // Other text still round-trips through the same merges.
        let other = "worlds apart, hello again";
        assert_eq!(tokenizer.decode(&tokenizer.encode(other)), other);
    }

    #[test]
    fn test_fewer_merges_than_requested() {
        let mut tokenizer = ByteLevelTokenizer::new();
        let text = "abab";
        tokenizer.train(text, 256 + 100, None).unwrap();

        assert!(tokenizer.merges().len() < 100);
        assert_eq!(tokenizer.decode(&tokenizer.encode(text)), text);
    }

    #[test]
    fn test_vocab_size_below_256_rejected() {
        let mut tokenizer = ByteLevelTokenizer::new();
        tokenizer.train("some text", 300, None).unwrap();
        let before = tokenizer.encode("some text");

        let err = tokenizer.train("other", 100, None).unwrap_err();
        assert!(matches!(err, TokenizerError::InvalidVocabSize(100)));
        // The failed call must not have touched the learned merges.
        assert_eq!(tokenizer.encode("some text"), before);
    }

    #[test]
    fn test_retrain_replaces_state() {
        let mut tokenizer = ByteLevelTokenizer::new();
        tokenizer.train("aaaa", 256 + 2, None).unwrap();
        let first: Vec<_> = tokenizer.merges().iter().collect();

        tokenizer.train("bbbb", 256 + 2, None).unwrap();
        let second: Vec<_> = tokenizer.merges().iter().collect();
        assert_ne!(first, second);
        assert_eq!(tokenizer.decode(&tokenizer.encode("bbbb")), "bbbb");
    }
}
