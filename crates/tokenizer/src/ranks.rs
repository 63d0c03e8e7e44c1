//! Pretrained rank table import and merge recovery.
//!
//! A rank table maps token byte sequences to their rank, the way tiktoken
//! vocabularies do. The rank doubles as merge priority and final token id.
//! The table itself only stores results - which byte sequences exist and in
//! what order they were created - so the merge rules have to be
//! reconstructed: for every multi-byte token, re-run the merge search over
//! its bytes restricted to earlier ranks, and whatever two parts remain are
//! the children it was merged from.

use ahash::AHashMap;
use base64::engine::general_purpose::STANDARD;
use base64::Engine;
use pairbpe_core::{render_token, MergeTable, Result, TokenizerError};
use std::path::Path;

/// Externally supplied mapping: token byte sequence -> rank.
pub type RankTable = AHashMap<Vec<u8>, u32>;

/// Parse a tiktoken-format rank table: one `<base64 token> <rank>` pair
/// per line.
pub fn parse_rank_table(contents: &str) -> Result<RankTable> {
    let mut ranks = RankTable::new();
    for (line_number, line) in contents.lines().enumerate() {
        let line = line.trim();
        if line.is_empty() {
            continue;
        }
        let mut parts = line.split_whitespace();
        let (Some(token_b64), Some(rank_str), None) = (parts.next(), parts.next(), parts.next())
        else {
            return Err(TokenizerError::ModelFormat(format!(
                "rank line {}: expected \"<base64> <rank>\", got {:?}",
                line_number + 1,
                line
            )));
        };
        let token = STANDARD.decode(token_b64).map_err(|e| {
            TokenizerError::ModelFormat(format!("rank line {}: {}", line_number + 1, e))
        })?;
        let rank: u32 = rank_str.parse().map_err(|_| {
            TokenizerError::ModelFormat(format!(
                "rank line {}: {:?} is not a rank",
                line_number + 1,
                rank_str
            ))
        })?;
        if ranks.insert(token, rank).is_some() {
            return Err(TokenizerError::ModelFormat(format!(
                "rank line {}: duplicate token",
                line_number + 1
            )));
        }
    }
    Ok(ranks)
}

/// Read and parse a tiktoken-format rank file.
pub fn load_rank_file(path: &Path) -> Result<RankTable> {
    let contents = std::fs::read_to_string(path).map_err(|err| TokenizerError::Io {
        path: path.to_path_buf(),
        err,
    })?;
    parse_rank_table(&contents)
}

/// Derive the byte permutation from the 256 single-byte ranks.
///
/// Returns `(shuffle, inverse)`: `shuffle[b]` is the rank of byte `b`, and
/// the two arrays invert each other. The single-byte ranks must form a
/// bijection over 0-255.
pub fn byte_permutation(ranks: &RankTable) -> Result<([u8; 256], [u8; 256])> {
    let mut shuffle = [0u8; 256];
    let mut inverse = [0u8; 256];
    let mut seen = [false; 256];

    for byte in 0..=255u8 {
        let &rank = ranks.get([byte].as_slice()).ok_or_else(|| {
            TokenizerError::Reconstruction(format!(
                "rank table has no entry for byte 0x{:02x}",
                byte
            ))
        })?;
        if rank > 255 {
            return Err(TokenizerError::Reconstruction(format!(
                "single-byte rank {} for 0x{:02x} falls outside 0-255",
                rank, byte
            )));
        }
        if seen[rank as usize] {
            return Err(TokenizerError::Reconstruction(format!(
                "two bytes share rank {}",
                rank
            )));
        }
        seen[rank as usize] = true;
        shuffle[byte as usize] = rank as u8;
        inverse[rank as usize] = byte;
    }

    Ok((shuffle, inverse))
}

/// Re-split `token` into the two parts it was merged from.
///
/// Starts from single bytes and repeatedly merges the adjacent pair whose
/// concatenation has the lowest rank strictly below `max_rank`, stopping at
/// two parts. Fails if the parts stop reducing before that.
pub(crate) fn bpe_recover(
    ranks: &RankTable,
    token: &[u8],
    max_rank: u32,
) -> Result<Vec<Vec<u8>>> {
    let mut parts: Vec<Vec<u8>> = token.iter().map(|&b| vec![b]).collect();
    while parts.len() > 2 {
        let mut best: Option<(usize, u32)> = None;
        for i in 0..parts.len() - 1 {
            let mut key = parts[i].clone();
            key.extend_from_slice(&parts[i + 1]);
            if let Some(&rank) = ranks.get(&key) {
                if rank < max_rank && best.map_or(true, |(_, lowest)| rank < lowest) {
                    best = Some((i, rank));
                }
            }
        }
        let Some((index, _)) = best else {
            return Err(TokenizerError::Reconstruction(format!(
                "token [{}] does not reduce to a pair below rank {}",
                render_token(token),
                max_rank
            )));
        };
        let right = parts.remove(index + 1);
        parts[index].extend_from_slice(&right);
    }
    Ok(parts)
}

/// Reconstruct the merge table equivalent to a rank table.
///
/// Multi-byte tokens are processed in ascending rank order; each one's
/// recovered parts are looked up to form the `(left, right) -> rank` rule.
pub fn recover_merges(ranks: &RankTable) -> Result<MergeTable> {
    let mut multi_byte: Vec<(&[u8], u32)> = ranks
        .iter()
        .filter(|(token, _)| token.len() > 1)
        .map(|(token, &rank)| (token.as_slice(), rank))
        .collect();
    multi_byte.sort_unstable_by_key(|&(_, rank)| rank);

    let mut merges = MergeTable::with_capacity(multi_byte.len());
    for (token, rank) in multi_byte {
        let parts = bpe_recover(ranks, token, rank)?;
        let missing_part = || {
            TokenizerError::Reconstruction(format!(
                "recovered part of [{}] is missing from the rank table",
                render_token(token)
            ))
        };
        let left = *ranks.get(&parts[0]).ok_or_else(missing_part)?;
        let right = *ranks.get(&parts[1]).ok_or_else(missing_part)?;
        merges
            .insert((left, right), rank)
            .map_err(|e| TokenizerError::Reconstruction(e.to_string()))?;
    }
    Ok(merges)
}
