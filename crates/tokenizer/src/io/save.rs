//! Save functionality for trained tokenizers.
//!
//! Saving writes two files next to each other:
//!
//! - `<prefix>.model` — the reloadable model (version tag, pattern, merges)
//! - `<prefix>.vocab` — a human-readable rendering of every token, never
//!   read back

use super::format::ModelFile;
use ahash::AHashMap;
use pairbpe_core::{render_token, MergeTable, Pair, Result, TokenizerError, Vocab};
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// Tokenizer saver - writes the model and vocab files for a trained model.
pub struct ModelSaver<'a> {
    merges: &'a MergeTable,
    vocab: &'a Vocab,
    pattern: &'a str,
}

impl<'a> ModelSaver<'a> {
    /// Create a new saver over a tokenizer's state.
    pub fn new(merges: &'a MergeTable, vocab: &'a Vocab, pattern: &'a str) -> Self {
        Self {
            merges,
            vocab,
            pattern,
        }
    }

    /// Write `<prefix>.model` and `<prefix>.vocab`.
    pub fn save(&self, prefix: &Path) -> Result<()> {
        self.save_model(&with_suffix(prefix, ".model"))?;
        self.save_vocab(&with_suffix(prefix, ".vocab"))
    }

    fn save_model(&self, path: &Path) -> Result<()> {
        let file = ModelFile {
            pattern: self.pattern.to_string(),
            merges: self.merges.iter().map(|(pair, _)| pair).collect(),
        };
        std::fs::write(path, file.render()).map_err(|err| TokenizerError::Io {
            path: path.to_path_buf(),
            err,
        })
    }

    fn save_vocab(&self, path: &Path) -> Result<()> {
        let io_err = |err| TokenizerError::Io {
            path: path.to_path_buf(),
            err,
        };
        let file = File::create(path).map_err(io_err)?;
        let mut writer = BufWriter::new(file);

        // id -> the pair it was merged from
        let children: AHashMap<u32, Pair> =
            self.merges.iter().map(|(pair, id)| (id, pair)).collect();

        let mut ids: Vec<u32> = self.vocab.keys().copied().collect();
        ids.sort_unstable();

        for id in ids {
            let token = render_token(&self.vocab[&id]);
            match children.get(&id) {
                Some(&(left, right)) => {
                    let left = render_token(self.vocab.get(&left).map(Vec::as_slice).unwrap_or_default());
                    let right = render_token(self.vocab.get(&right).map(Vec::as_slice).unwrap_or_default());
                    writeln!(writer, "[{}][{}] -> [{}] {}", left, right, token, id).map_err(io_err)?;
                }
                None => {
                    writeln!(writer, "[{}] {}", token, id).map_err(io_err)?;
                }
            }
        }

        writer.flush().map_err(io_err)
    }
}

/// Append a suffix to a path without treating it as an extension swap
/// (`tok.v1` must become `tok.v1.model`, not `tok.model`).
pub(crate) fn with_suffix(prefix: &Path, suffix: &str) -> PathBuf {
    let mut os = prefix.as_os_str().to_os_string();
    os.push(suffix);
    PathBuf::from(os)
}

#[cfg(test)]
mod tests {
    use super::*;
    use pairbpe_core::build_vocab;

    #[test]
    fn test_with_suffix_keeps_dotted_prefixes() {
        assert_eq!(
            with_suffix(Path::new("dir/tok.v1"), ".model"),
            PathBuf::from("dir/tok.v1.model")
        );
    }

    #[test]
    fn test_vocab_file_layout() {
        let mut merges = MergeTable::new();
        merges.push((104, 105)); // "hi" -> 256
        let vocab = build_vocab(&merges);

        let prefix = std::env::temp_dir().join("pairbpe_test_vocab_layout");
        ModelSaver::new(&merges, &vocab, "").save(&prefix).unwrap();

        let rendered = std::fs::read_to_string(with_suffix(&prefix, ".vocab")).unwrap();
        let lines: Vec<&str> = rendered.lines().collect();
        assert_eq!(lines.len(), 257);
        assert_eq!(lines[104], "[h] 104");
        assert_eq!(lines[256], "[h][i] -> [hi] 256");
        // Control characters are escaped, one line per token holds.
        assert_eq!(lines[10], "[\\u000a] 10");

        std::fs::remove_file(with_suffix(&prefix, ".model")).ok();
        std::fs::remove_file(with_suffix(&prefix, ".vocab")).ok();
    }
}
