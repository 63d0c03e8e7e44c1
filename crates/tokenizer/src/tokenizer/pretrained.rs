//! Pretrained-compatible BPE tokenizer.
//!
//! Built from an externally trained rank table instead of its own training
//! run. Ranks double as merge priority and token id. Because such tables
//! are trained over permuted bytes, raw bytes are mapped through the
//! permutation before merges apply, and mapped back after decoding. The
//! variant is read-only: it can neither retrain nor persist.

use super::{replay_merges, Tokenizer};
use crate::pre_tokenizer::Splitter;
use crate::ranks::{byte_permutation, load_rank_file, recover_merges, RankTable};
use pairbpe_core::{build_vocab, MergeTable, Result, TokenizerError, Vocab};
use pairbpe_training::ProgressCallback;
use std::path::Path;

/// Read-only tokenizer over an imported rank table.
pub struct PretrainedTokenizer {
    merges: MergeTable,
    vocab: Vocab,
    splitter: Splitter,
    /// Raw byte -> rank-space byte
    byte_shuffle: [u8; 256],
    /// Rank-space byte -> raw byte
    inverse_byte_shuffle: [u8; 256],
}

impl PretrainedTokenizer {
    /// Build a tokenizer from a rank table, recovering its merges and byte
    /// permutation. Uses the GPT-4 split pattern.
    pub fn from_ranks(ranks: &RankTable) -> Result<Self> {
        let (byte_shuffle, inverse_byte_shuffle) = byte_permutation(ranks)?;
        let merges = recover_merges(ranks)?;
        log::info!(
            "recovered {} merges from a rank table of {} tokens",
            merges.len(),
            ranks.len()
        );
        let vocab = build_vocab(&merges);
        Ok(Self {
            merges,
            vocab,
            splitter: Splitter::gpt4(),
            byte_shuffle,
            inverse_byte_shuffle,
        })
    }

    /// Build a tokenizer from a tiktoken-format rank file.
    pub fn from_rank_file(path: &Path) -> Result<Self> {
        Self::from_ranks(&load_rank_file(path)?)
    }

    /// The recovered merge table.
    pub fn merges(&self) -> &MergeTable {
        &self.merges
    }

    /// The vocabulary, in rank space.
    pub fn vocab(&self) -> &Vocab {
        &self.vocab
    }
}

impl Tokenizer for PretrainedTokenizer {
    fn train(
        &mut self,
        _text: &str,
        _vocab_size: usize,
        _progress: Option<ProgressCallback<'_>>,
    ) -> Result<()> {
        Err(TokenizerError::Unsupported(
            "train on a pretrained tokenizer",
        ))
    }

    fn encode(&self, text: &str) -> Vec<u32> {
        let mut ids = Vec::new();
        for chunk in self.splitter.split(text) {
            let chunk_ids = chunk
                .bytes()
                .map(|b| u32::from(self.byte_shuffle[b as usize]))
                .collect();
            ids.extend(replay_merges(chunk_ids, &self.merges));
        }
        ids
    }

    fn decode(&self, ids: &[u32]) -> String {
        let mut bytes = Vec::new();
        for id in ids {
            if let Some(token) = self.vocab.get(id) {
                bytes.extend(
                    token
                        .iter()
                        .map(|&b| self.inverse_byte_shuffle[b as usize]),
                );
            }
        }
        String::from_utf8_lossy(&bytes).into_owned()
    }

    fn save(&self, _prefix: &Path) -> Result<()> {
        Err(TokenizerError::Unsupported(
            "save on a pretrained tokenizer",
        ))
    }

    fn load(&mut self, _model_path: &Path) -> Result<()> {
        Err(TokenizerError::Unsupported(
            "load on a pretrained tokenizer",
        ))
    }
}
