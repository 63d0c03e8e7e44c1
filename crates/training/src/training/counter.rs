//! Pair counting for BPE training.
//!
//! The counter holds the training corpus as token sequences with occurrence
//! counts (identical chunks are stored once and weighted), and produces
//! adjacent-pair frequencies. Counting is the only step the trainer runs in
//! parallel: partial per-sequence maps are combined by addition before the
//! global best pair is selected, so the result is independent of both the
//! number of threads and the order of reduction.

use ahash::AHashMap;
use pairbpe_core::{engine, Pair};

/// Count adjacent pairs in one sequence, accumulating into `counts`.
///
/// Sequences shorter than 2 contribute no pairs.
pub fn count_pairs(ids: &[u32], counts: &mut AHashMap<Pair, u64>) {
    count_pairs_weighted(ids, 1, counts);
}

/// Weighted variant of [`count_pairs`]: every pair in `ids` counts `weight`
/// times, for sequences that occur more than once in the corpus.
pub fn count_pairs_weighted(ids: &[u32], weight: u64, counts: &mut AHashMap<Pair, u64>) {
    for window in ids.windows(2) {
        let pair = (window[0], window[1]);
        *counts.entry(pair).or_insert(0) += weight;
    }
}

/// Counter over the full training corpus.
pub struct PairCounter {
    /// Unique token sequences
    words: Vec<Vec<u32>>,
    /// Occurrence count per sequence
    word_counts: Vec<u64>,
}

impl PairCounter {
    /// Create an empty counter.
    pub fn new() -> Self {
        Self {
            words: Vec::new(),
            word_counts: Vec::new(),
        }
    }

    /// Add a token sequence with its occurrence count.
    pub fn add_sequence(&mut self, ids: Vec<u32>, count: u64) {
        self.words.push(ids);
        self.word_counts.push(count);
    }

    /// Number of unique sequences.
    pub fn sequence_count(&self) -> usize {
        self.words.len()
    }

    /// The unique sequences, in insertion order.
    pub fn words(&self) -> &[Vec<u32>] {
        &self.words
    }

    /// Count all pairs across all sequences, in parallel.
    pub fn count_parallel(&self) -> AHashMap<Pair, u64> {
        use rayon::prelude::*;

        self.words
            .par_iter()
            .zip(self.word_counts.par_iter())
            .map(|(word, &count)| {
                let mut counts: AHashMap<Pair, u64> = AHashMap::new();
                count_pairs_weighted(word, count, &mut counts);
                counts
            })
            .reduce(AHashMap::new, |mut acc, counts| {
                for (pair, count) in counts {
                    *acc.entry(pair).or_insert(0) += count;
                }
                acc
            })
    }

    /// Count all pairs sequentially. Produces the same totals as
    /// [`count_parallel`](Self::count_parallel).
    pub fn count_sequential(&self) -> AHashMap<Pair, u64> {
        let mut counts: AHashMap<Pair, u64> = AHashMap::new();
        for (word, &count) in self.words.iter().zip(self.word_counts.iter()) {
            count_pairs_weighted(word, count, &mut counts);
        }
        counts
    }

    /// Apply a merge to every sequence. Merge application is sequential:
    /// merge-table growth across training iterations cannot be reordered.
    pub fn merge_pair(&mut self, pair: Pair, new_id: u32) {
        for word in &mut self.words {
            engine::apply_in_place(word, pair, new_id);
        }
    }
}

impl Default for PairCounter {
    fn default() -> Self {
        Self::new()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_count_pairs_accumulates() {
        let mut counts = AHashMap::new();
        count_pairs(&[1, 2, 3, 1, 2], &mut counts);
        assert_eq!(counts.get(&(1, 2)), Some(&2));
        assert_eq!(counts.get(&(2, 3)), Some(&1));
        assert_eq!(counts.get(&(3, 1)), Some(&1));

        // Accumulate a second sequence into the same map.
        count_pairs(&[1, 2], &mut counts);
        assert_eq!(counts.get(&(1, 2)), Some(&3));
    }

    #[test]
    fn test_short_sequences_contribute_nothing() {
        let mut counts = AHashMap::new();
        count_pairs(&[], &mut counts);
        count_pairs(&[42], &mut counts);
        assert!(counts.is_empty());
    }

    #[test]
    fn test_weighted_count() {
        let mut counter = PairCounter::new();
        counter.add_sequence(vec![97, 98], 3);
        counter.add_sequence(vec![98, 99], 1);

        let counts = counter.count_sequential();
        assert_eq!(counts.get(&(97, 98)), Some(&3));
        assert_eq!(counts.get(&(98, 99)), Some(&1));
    }

    #[test]
    fn test_parallel_matches_sequential() {
        let mut counter = PairCounter::new();
        for i in 0..50u32 {
            counter.add_sequence(vec![i, i + 1, i + 2, i], (i as u64 % 5) + 1);
        }

        let sequential = counter.count_sequential();
        let parallel = counter.count_parallel();
        assert_eq!(sequential, parallel);
    }

    #[test]
    fn test_merge_pair_rewrites_all_sequences() {
        let mut counter = PairCounter::new();
        counter.add_sequence(vec![97, 97, 98], 1);
        counter.add_sequence(vec![97, 97, 97], 2);

        counter.merge_pair((97, 97), 256);
        assert_eq!(counter.words()[0], vec![256, 98]);
        assert_eq!(counter.words()[1], vec![256, 97]);
    }
}
