//! Merge application.
//!
//! Applying a merge rewrites a token sequence in a single left-to-right
//! pass, replacing every non-overlapping occurrence of the pair with the
//! merged id. A matched pair is consumed: in `[a, a, a]` the rule
//! `(a, a) -> x` produces `[x, a]`, never `[x, x]`.

use crate::core::merges::Pair;

/// Replace all non-overlapping occurrences of `pair` with `new_id`,
/// returning a new sequence.
pub fn apply(ids: &[u32], pair: Pair, new_id: u32) -> Vec<u32> {
    let (a, b) = pair;
    let mut out = Vec::with_capacity(ids.len());
    let mut i = 0;
    while i < ids.len() {
        if i + 1 < ids.len() && ids[i] == a && ids[i + 1] == b {
            out.push(new_id);
            i += 2;
        } else {
            out.push(ids[i]);
            i += 1;
        }
    }
    out
}

/// In-place variant of [`apply`] used by the training loop, which rewrites
/// every chunk once per merge step. Compacts the sequence with a write
/// cursor instead of reallocating.
pub fn apply_in_place(ids: &mut Vec<u32>, pair: Pair, new_id: u32) {
    let (a, b) = pair;
    let n = ids.len();
    if n < 2 {
        return;
    }
    let mut write = 0;
    let mut read = 0;
    while read < n {
        if read + 1 < n && ids[read] == a && ids[read + 1] == b {
            ids[write] = new_id;
            read += 2;
        } else {
            ids[write] = ids[read];
            read += 1;
        }
        write += 1;
    }
    ids.truncate(write);
}
