//! Load functionality for saved models.

use super::format::ModelFile;
use pairbpe_core::{Result, TokenizerError};
use std::path::Path;

/// Tokenizer loader - reads and parses a `.model` file.
///
/// Only returns the parsed representation; the caller decides when to
/// commit it to tokenizer state. Reading and parsing both fail without
/// side effects.
pub struct ModelLoader;

impl ModelLoader {
    /// Read and fully parse a model file.
    pub fn load(path: &Path) -> Result<ModelFile> {
        let contents = std::fs::read_to_string(path).map_err(|err| TokenizerError::Io {
            path: path.to_path_buf(),
            err,
        })?;
        ModelFile::parse(&contents)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_load_missing_file_reports_path() {
        let path = std::env::temp_dir().join("pairbpe_test_load_missing.model");
        let err = ModelLoader::load(&path).unwrap_err();
        match err {
            TokenizerError::Io { path: reported, .. } => assert_eq!(reported, path),
            other => panic!("expected Io error, got {other:?}"),
        }
    }

    #[test]
    fn test_load_parses_written_file() {
        let path = std::env::temp_dir().join("pairbpe_test_load_ok.model");
        std::fs::write(&path, "pairbpe v1\n\n97 98\n").unwrap();

        let parsed = ModelLoader::load(&path).unwrap();
        assert_eq!(parsed.merges, vec![(97, 98)]);

        std::fs::remove_file(&path).ok();
    }
}
