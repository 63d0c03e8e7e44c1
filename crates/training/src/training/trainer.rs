//! Iterative BPE merge selection.
//!
//! Each training step recounts pair frequencies across the whole corpus,
//! selects the most frequent pair, and rewrites every sequence with the new
//! merged token. Ties on frequency are broken by ascending numeric pair
//! order, so training is fully deterministic for identical input.

use crate::training::counter::PairCounter;
use ahash::AHashMap;
use pairbpe_core::{render_token, MergeTable, Pair, BASE_VOCAB_SIZE};

/// One completed merge step, reported to the progress callback.
#[derive(Debug, Clone)]
pub struct MergeStep<'a> {
    /// Step index, starting at 0
    pub step: usize,
    /// Total number of merges requested
    pub num_merges: usize,
    /// The pair that was merged
    pub pair: Pair,
    /// Id assigned to the merged token
    pub new_id: u32,
    /// Byte expansion of the merged token
    pub token: &'a [u8],
    /// How many times the pair occurred when it was selected
    pub count: u64,
}

/// Callback invoked once per merge step.
pub type ProgressCallback<'a> = &'a mut dyn FnMut(&MergeStep<'_>);

/// Learn up to `num_merges` merges from the sequences in `counter`.
///
/// Stops early, without error, when no adjacent pairs remain. Returns the
/// merge table in creation order; new ids run contiguously from 256.
pub fn train_merges(
    counter: &mut PairCounter,
    num_merges: usize,
    mut progress: Option<ProgressCallback<'_>>,
) -> MergeTable {
    let mut merges = MergeTable::with_capacity(num_merges);

    // Byte expansions of every id seen so far, for progress reporting.
    let mut token_bytes: Vec<Vec<u8>> = (0u32..BASE_VOCAB_SIZE).map(|b| vec![b as u8]).collect();

    log::info!(
        "training: {} merges over {} unique sequences",
        num_merges,
        counter.sequence_count()
    );

    for step in 0..num_merges {
        let counts = counter.count_parallel();
        let Some((pair, count)) = select_best_pair(&counts) else {
            log::info!("no pairs left after {} merges, stopping early", step);
            break;
        };

        let new_id = merges.push(pair);
        counter.merge_pair(pair, new_id);

        let mut bytes = token_bytes[pair.0 as usize].clone();
        bytes.extend_from_slice(&token_bytes[pair.1 as usize]);
        token_bytes.push(bytes);

        let token = token_bytes.last().map(Vec::as_slice).unwrap_or_default();
        log::debug!(
            "merge {}/{}: ({}, {}) -> {} ({}) had {} occurrences",
            step + 1,
            num_merges,
            pair.0,
            pair.1,
            new_id,
            render_token(token),
            count
        );
        if let Some(callback) = progress.as_deref_mut() {
            callback(&MergeStep {
                step,
                num_merges,
                pair,
                new_id,
                token,
                count,
            });
        }
    }

    merges
}

/// Select the pair with the strictly greatest count.
///
/// Equal counts resolve to the numerically smallest pair. The comparator is
/// a total order, so the winner does not depend on map iteration order.
fn select_best_pair(counts: &AHashMap<Pair, u64>) -> Option<(Pair, u64)> {
    counts
        .iter()
        .max_by(|(pair_a, count_a), (pair_b, count_b)| {
            count_a.cmp(count_b).then_with(|| pair_b.cmp(pair_a))
        })
        .map(|(&pair, &count)| (pair, count))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn counter_for(text: &str) -> PairCounter {
        let mut counter = PairCounter::new();
        counter.add_sequence(text.bytes().map(u32::from).collect(), 1);
        counter
    }

    #[test]
    fn test_wikipedia_example_merges() {
        // "aaabdaaabac": (a,a) wins with 4; then (a,b) and (256,a) tie at 2
        // and the numerically smaller pair (a,b) wins; then (256,257).
        let mut counter = counter_for("aaabdaaabac");
        let merges = train_merges(&mut counter, 3, None);

        let entries: Vec<_> = merges.iter().collect();
        assert_eq!(
            entries,
            vec![((97, 97), 256), ((97, 98), 257), ((256, 257), 258)]
        );
        assert_eq!(counter.words()[0], vec![258, 100, 258, 97, 99]);
    }

    #[test]
    fn test_ids_are_contiguous_from_256() {
        let mut counter = counter_for("the theme thesis");
        let merges = train_merges(&mut counter, 8, None);
        for (index, (_, new_id)) in merges.iter().enumerate() {
            assert_eq!(new_id, 256 + index as u32);
        }
    }

    #[test]
    fn test_early_stop_when_corpus_exhausted() {
        // "ab" supports exactly one merge; asking for ten is not an error.
        let mut counter = counter_for("ab");
        let merges = train_merges(&mut counter, 10, None);
        assert_eq!(merges.len(), 1);
        assert_eq!(counter.words()[0], vec![256]);
    }

    #[test]
    fn test_empty_corpus_learns_nothing() {
        let mut counter = counter_for("");
        let merges = train_merges(&mut counter, 5, None);
        assert!(merges.is_empty());
    }

    #[test]
    fn test_determinism() {
        let text = "low lower lowest low low";
        let mut first = counter_for(text);
        let mut second = counter_for(text);

        let merges_a: Vec<_> = train_merges(&mut first, 12, None).iter().collect();
        let merges_b: Vec<_> = train_merges(&mut second, 12, None).iter().collect();
        assert_eq!(merges_a, merges_b);
    }

    #[test]
    fn test_tie_break_prefers_smaller_pair() {
        // Every pair in "abcd" occurs exactly once; (97, 98) is the
        // numerically smallest and must win the first merge.
        let mut counter = counter_for("abcd");
        let merges = train_merges(&mut counter, 1, None);
        assert_eq!(merges.iter().next(), Some(((97, 98), 256)));
    }

    #[test]
    fn test_progress_callback_sees_every_step() {
        let mut counter = counter_for("aaabdaaabac");
        let mut seen: Vec<(usize, Pair, u32, Vec<u8>, u64)> = Vec::new();
        let mut callback = |step: &MergeStep<'_>| {
            seen.push((
                step.step,
                step.pair,
                step.new_id,
                step.token.to_vec(),
                step.count,
            ));
        };
        train_merges(&mut counter, 3, Some(&mut callback));

        assert_eq!(seen.len(), 3);
        assert_eq!(seen[0], (0, (97, 97), 256, b"aa".to_vec(), 4));
        assert_eq!(seen[1].1, (97, 98));
        assert_eq!(seen[2].3, b"aaab".to_vec());
    }
}
