//! Vocabulary derivation and token rendering.
//!
//! The vocabulary maps every token id to its byte expansion. It is never
//! stored: it is rebuilt deterministically from the merge table, walking
//! merges in creation order so that later merges can reference ids created
//! by earlier ones.

use crate::core::merges::{MergeTable, BASE_VOCAB_SIZE};
use ahash::AHashMap;
use unicode_properties::{GeneralCategoryGroup, UnicodeGeneralCategory};

/// Mapping from token id to the bytes the token expands to.
pub type Vocab = AHashMap<u32, Vec<u8>>;

/// Derive the vocabulary from a merge table.
///
/// Base ids 0-255 map to their single byte; each merged id maps to the
/// concatenation of its two children's expansions.
pub fn build_vocab(merges: &MergeTable) -> Vocab {
    let mut vocab = Vocab::with_capacity(BASE_VOCAB_SIZE as usize + merges.len());
    for byte in 0..BASE_VOCAB_SIZE {
        vocab.insert(byte, vec![byte as u8]);
    }
    for ((left, right), new_id) in merges.iter() {
        let mut bytes = vocab.get(&left).cloned().unwrap_or_default();
        if let Some(right_bytes) = vocab.get(&right) {
            bytes.extend_from_slice(right_bytes);
        }
        vocab.insert(new_id, bytes);
    }
    vocab
}

/// Render token bytes for human-readable output.
///
/// Decodes the bytes as UTF-8 (lossily, since a token may end mid
/// codepoint) and escapes category-C characters as `\uXXXX` so that control
/// characters never distort the output (e.g. `\n` would break the one line
/// per token layout of the vocab file).
pub fn render_token(bytes: &[u8]) -> String {
    let decoded = String::from_utf8_lossy(bytes);
    let mut out = String::with_capacity(decoded.len());
    for ch in decoded.chars() {
        if ch.general_category_group() == GeneralCategoryGroup::Other {
            out.push_str(&format!("\\u{:04x}", ch as u32));
        } else {
            out.push(ch);
        }
    }
    out
}
