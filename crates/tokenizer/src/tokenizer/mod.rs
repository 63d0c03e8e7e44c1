//! The tokenizer interface and its shared implementation.
//!
//! All variants expose the same five operations: `train`, `encode`,
//! `decode`, `save`, `load`. The two trainable variants (byte-level and
//! chunked) differ only in their pre-tokenizer, so they share a [`BpeModel`]
//! that owns the merge table, the derived vocabulary, and the splitter. The
//! pretrained variant implements the trait directly and rejects every
//! mutating call.

pub mod byte_level;
pub mod chunked;
pub mod pretrained;

pub use self::byte_level::ByteLevelTokenizer;
pub use self::chunked::ChunkedTokenizer;
pub use self::pretrained::PretrainedTokenizer;

use crate::io::{ModelLoader, ModelSaver};
use crate::pre_tokenizer::Splitter;
use ahash::AHashMap;
use compact_str::CompactString;
use pairbpe_core::{build_vocab, engine, MergeTable, Pair, Result, TokenizerError, Vocab, BASE_VOCAB_SIZE};
use pairbpe_training::{train_merges, PairCounter, ProgressCallback};
use std::path::Path;

/// Common interface over every tokenizer variant.
pub trait Tokenizer {
    /// Learn merges from `text` until the vocabulary reaches `vocab_size`
    /// (or the corpus runs out of pairs). Replaces any previously trained
    /// or loaded state. The optional callback observes each merge step.
    fn train(
        &mut self,
        text: &str,
        vocab_size: usize,
        progress: Option<ProgressCallback<'_>>,
    ) -> Result<()>;

    /// Encode text into token ids.
    fn encode(&self, text: &str) -> Vec<u32>;

    /// Decode token ids back into text. Unknown ids are skipped; invalid
    /// UTF-8 decodes with replacement characters.
    fn decode(&self, ids: &[u32]) -> String;

    /// Write `<prefix>.model` and `<prefix>.vocab`.
    fn save(&self, prefix: &Path) -> Result<()>;

    /// Replace this tokenizer's state with a previously saved model. The
    /// file is fully parsed before any state changes, so a failed load
    /// leaves the tokenizer usable.
    fn load(&mut self, model_path: &Path) -> Result<()>;
}

/// Replay learned merges over one chunk's id sequence.
///
/// Repeatedly applies, among the currently adjacent pairs that have a merge
/// rule, the one with the lowest merged id - the merge learned earliest,
/// mirroring training precedence. Stops when nothing is mergeable or fewer
/// than two ids remain.
pub(crate) fn replay_merges(mut ids: Vec<u32>, merges: &MergeTable) -> Vec<u32> {
    while ids.len() >= 2 {
        let mut best: Option<(Pair, u32)> = None;
        for window in ids.windows(2) {
            let pair = (window[0], window[1]);
            if let Some(new_id) = merges.get(pair) {
                if best.map_or(true, |(_, best_id)| new_id < best_id) {
                    best = Some((pair, new_id));
                }
            }
        }
        let Some((pair, new_id)) = best else { break };
        engine::apply_in_place(&mut ids, pair, new_id);
    }
    ids
}

/// Shared state and behavior of the trainable variants.
pub(crate) struct BpeModel {
    pub(crate) merges: MergeTable,
    pub(crate) vocab: Vocab,
    pub(crate) splitter: Splitter,
}

impl BpeModel {
    pub(crate) fn with_splitter(splitter: Splitter) -> Self {
        let merges = MergeTable::new();
        let vocab = build_vocab(&merges);
        Self {
            merges,
            vocab,
            splitter,
        }
    }

    pub(crate) fn train(
        &mut self,
        text: &str,
        vocab_size: usize,
        progress: Option<ProgressCallback<'_>>,
    ) -> Result<()> {
        if vocab_size < BASE_VOCAB_SIZE as usize {
            return Err(TokenizerError::InvalidVocabSize(vocab_size));
        }
        let num_merges = vocab_size - BASE_VOCAB_SIZE as usize;

        // Identical chunks are trained once and weighted by how often they
        // occur; pair totals are unchanged by the deduplication.
        let mut chunk_counts: AHashMap<CompactString, u64> = AHashMap::new();
        for chunk in self.splitter.split(text) {
            *chunk_counts.entry(CompactString::from(chunk)).or_insert(0) += 1;
        }

        let mut counter = PairCounter::new();
        for (chunk, count) in chunk_counts {
            counter.add_sequence(chunk.as_bytes().iter().map(|&b| u32::from(b)).collect(), count);
        }

        let merges = train_merges(&mut counter, num_merges, progress);
        self.vocab = build_vocab(&merges);
        self.merges = merges;
        Ok(())
    }

    pub(crate) fn encode(&self, text: &str) -> Vec<u32> {
        let mut ids = Vec::new();
        for chunk in self.splitter.split(text) {
            let chunk_ids = chunk.bytes().map(u32::from).collect();
            ids.extend(replay_merges(chunk_ids, &self.merges));
        }
        ids
    }

    pub(crate) fn decode(&self, ids: &[u32]) -> String {
        let mut bytes = Vec::new();
        for id in ids {
            if let Some(token) = self.vocab.get(id) {
                bytes.extend_from_slice(token);
            }
        }
        String::from_utf8_lossy(&bytes).into_owned()
    }

    pub(crate) fn save(&self, prefix: &Path) -> Result<()> {
        ModelSaver::new(&self.merges, &self.vocab, self.splitter.pattern()).save(prefix)
    }

    /// Load a parsed model, optionally adopting its split pattern.
    ///
    /// Everything fallible (reading, parsing, pattern compilation) happens
    /// before the first field assignment.
    pub(crate) fn load(&mut self, model_path: &Path, adopt_pattern: bool) -> Result<()> {
        let parsed = ModelLoader::load(model_path)?;
        let splitter = if adopt_pattern {
            Some(Splitter::new(&parsed.pattern)?)
        } else {
            None
        };

        let merges = parsed.to_merge_table();
        log::debug!(
            "loaded {} merges from {} (pattern: {:?})",
            merges.len(),
            model_path.display(),
            parsed.pattern
        );
        self.vocab = build_vocab(&merges);
        self.merges = merges;
        if let Some(splitter) = splitter {
            self.splitter = splitter;
        }
        Ok(())
    }
}
