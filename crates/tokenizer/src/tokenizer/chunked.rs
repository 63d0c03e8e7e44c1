//! Chunked (pattern-based) BPE tokenizer.
//!
//! Text is pre-split with a regex pattern and merges are learned and
//! replayed within chunks only, so a token never straddles a chunk
//! boundary. Defaults to the GPT-4 split pattern.

use super::{BpeModel, Tokenizer};
use crate::pre_tokenizer::Splitter;
use pairbpe_core::{MergeTable, Result, Vocab};
use pairbpe_training::ProgressCallback;
use std::path::Path;

/// BPE tokenizer with regex pre-tokenization.
pub struct ChunkedTokenizer {
    model: BpeModel,
}

impl ChunkedTokenizer {
    /// Create an untrained tokenizer with the GPT-4 split pattern.
    pub fn new() -> Self {
        Self {
            model: BpeModel::with_splitter(Splitter::gpt4()),
        }
    }

    /// Create an untrained tokenizer with the GPT-2 split pattern.
    pub fn gpt2() -> Self {
        Self {
            model: BpeModel::with_splitter(Splitter::gpt2()),
        }
    }

    /// Create an untrained tokenizer with a custom split pattern. The
    /// empty pattern disables splitting.
    pub fn with_pattern(pattern: &str) -> Result<Self> {
        Ok(Self {
            model: BpeModel::with_splitter(Splitter::new(pattern)?),
        })
    }

    /// The split pattern in use.
    pub fn pattern(&self) -> &str {
        self.model.splitter.pattern()
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

impl Default for ChunkedTokenizer {
    fn default() -> Self {
        Self::new()
    }
}

impl Tokenizer for ChunkedTokenizer {
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
        // Adopt the pattern stored in the file, whatever this tokenizer
        // was constructed with.
        self.model.load(model_path, true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_string_round_trip() {
        let tokenizer = ChunkedTokenizer::new();
        assert_eq!(tokenizer.encode(""), Vec::<u32>::new());
        assert_eq!(tokenizer.decode(&[]), "");
    }

    #[test]
    fn test_round_trip_after_training() {
        let mut tokenizer = ChunkedTokenizer::new();
        let text = "The llama (Lama glama) is a domesticated South American camelid. \
                    Llamas are social animals and live with others as a herd.";
        tokenizer.train(text, 256 + 64, None).unwrap();

        assert_eq!(tokenizer.decode(&tokenizer.encode(text)), text);
        let other = "a llama herd's social life";
        assert_eq!(tokenizer.decode(&tokenizer.encode(other)), other);
    }

    #[test]
    fn test_repeated_chunks_are_weighted() {
        // "ab ab ab" splits into "ab", " ab", " ab": (a, b) occurs three
        // times in total and must win the first merge.
        let mut tokenizer = ChunkedTokenizer::new();
        tokenizer.train("ab ab ab", 256 + 1, None).unwrap();
        assert_eq!(tokenizer.merges().get((97, 98)), Some(256));
    }

    #[test]
    fn test_merges_never_cross_chunk_boundaries() {
        // Only " n" repeats across the chunk boundary in "on on on"; inside
        // chunks the frequent pairs are (o, n) and (space, o). No merge may
        // pair 'n' with the following space.
        let mut tokenizer = ChunkedTokenizer::new();
        tokenizer.train("on on on", 256 + 4, None).unwrap();
        for (pair, _) in tokenizer.merges().iter() {
            assert_ne!(pair, (110, 32), "merge crosses a chunk boundary");
        }
    }

    #[test]
    fn test_unicode_round_trip_without_training() {
        let tokenizer = ChunkedTokenizer::new();
        let text = "héllo wörld 🙂 北京 123456";
        assert_eq!(tokenizer.decode(&tokenizer.encode(text)), text);
    }

    #[test]
    fn test_gpt2_preset_round_trip() {
        let mut tokenizer = ChunkedTokenizer::gpt2();
        let text = "I've said don't    repeat  yourself 99 times!";
        tokenizer.train(text, 256 + 20, None).unwrap();
        assert_eq!(tokenizer.decode(&tokenizer.encode(text)), text);
    }

    #[test]
    fn test_custom_empty_pattern_behaves_byte_level() {
        let mut tokenizer = ChunkedTokenizer::with_pattern("").unwrap();
        let text = "aaabdaaabac";
        tokenizer.train(text, 256 + 3, None).unwrap();
        assert_eq!(tokenizer.encode(text), vec![258, 100, 258, 97, 99]);
    }

    #[test]
    fn test_determinism_across_instances() {
        let text = "deterministic training is deterministic";
        let mut first = ChunkedTokenizer::new();
        let mut second = ChunkedTokenizer::new();
        first.train(text, 256 + 16, None).unwrap();
        second.train(text, 256 + 16, None).unwrap();

        let merges_a: Vec<_> = first.merges().iter().collect();
        let merges_b: Vec<_> = second.merges().iter().collect();
        assert_eq!(merges_a, merges_b);
        assert_eq!(first.encode(text), second.encode(text));
    }
}
