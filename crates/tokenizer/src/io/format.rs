//! The `.model` file format.
//!
//! ```text
//! pairbpe v1
//! <split pattern, empty for byte-level models>
//! <leftId> <rightId>
//! ...
//! ```
//!
//! Merges appear in creation order; ids are reassigned sequentially from
//! 256 when the file is read back, so the lines only need to name each
//! merge's children. Blank lines are ignored.

use pairbpe_core::{MergeTable, Pair, Result, TokenizerError, BASE_VOCAB_SIZE};

/// Version tag on the first line of every model file.
pub const MODEL_VERSION: &str = "pairbpe v1";

/// A fully parsed model file.
///
/// Parsing is separated from committing: callers parse the whole file into
/// a `ModelFile` first, and only then replace their own state, so a failed
/// load never leaves a tokenizer half-updated.
#[derive(Debug, Clone)]
pub struct ModelFile {
    /// Pre-tokenization pattern, empty for byte-level models
    pub pattern: String,
    /// Merge pairs in creation order
    pub merges: Vec<Pair>,
}

impl ModelFile {
    /// Parse model file contents, validating structure and merge
    /// references.
    pub fn parse(contents: &str) -> Result<Self> {
        let mut lines = contents.lines();

        let version = lines
            .next()
            .ok_or_else(|| TokenizerError::ModelFormat("empty model file".to_string()))?;
        if version != MODEL_VERSION {
            return Err(TokenizerError::ModelFormat(format!(
                "unknown version tag {:?}, expected {:?}",
                version, MODEL_VERSION
            )));
        }

        let pattern = lines
            .next()
            .ok_or_else(|| TokenizerError::ModelFormat("missing pattern line".to_string()))?
            .to_string();

        let mut merges: Vec<Pair> = Vec::new();
        // The table is only used here to reject duplicate pairs.
        let mut table = MergeTable::new();
        for (line_number, line) in lines.enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            let pair = Self::parse_merge_line(line, line_number + 3)?;
            let next_id = BASE_VOCAB_SIZE + merges.len() as u32;
            if pair.0 >= next_id || pair.1 >= next_id {
                return Err(TokenizerError::ModelFormat(format!(
                    "line {}: merge ({}, {}) references an id not yet defined",
                    line_number + 3,
                    pair.0,
                    pair.1
                )));
            }
            if table.contains(pair) {
                return Err(TokenizerError::ModelFormat(format!(
                    "line {}: pair ({}, {}) merged twice",
                    line_number + 3,
                    pair.0,
                    pair.1
                )));
            }
            table.push(pair);
            merges.push(pair);
        }

        Ok(Self { pattern, merges })
    }

    fn parse_merge_line(line: &str, line_number: usize) -> Result<Pair> {
        let mut parts = line.split_whitespace();
        let (Some(left), Some(right), None) = (parts.next(), parts.next(), parts.next()) else {
            return Err(TokenizerError::ModelFormat(format!(
                "line {}: expected \"<leftId> <rightId>\", got {:?}",
                line_number, line
            )));
        };
        let parse = |field: &str| {
            field.parse::<u32>().map_err(|_| {
                TokenizerError::ModelFormat(format!(
                    "line {}: {:?} is not a token id",
                    line_number, field
                ))
            })
        };
        Ok((parse(left)?, parse(right)?))
    }

    /// Rebuild the merge table, assigning ids sequentially from 256 in
    /// file order.
    pub fn to_merge_table(&self) -> MergeTable {
        let mut table = MergeTable::with_capacity(self.merges.len());
        for &pair in &self.merges {
            table.push(pair);
        }
        table
    }

    /// Render the model file contents for saving.
    pub fn render(&self) -> String {
        let mut out = String::new();
        out.push_str(MODEL_VERSION);
        out.push('\n');
        out.push_str(&self.pattern);
        out.push('\n');
        for (left, right) in &self.merges {
            out.push_str(&format!("{} {}\n", left, right));
        }
        out
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_roundtrip() {
        let file = ModelFile {
            pattern: r"\s+".to_string(),
            merges: vec![(97, 97), (256, 98)],
        };
        let parsed = ModelFile::parse(&file.render()).unwrap();
        assert_eq!(parsed.pattern, file.pattern);
        assert_eq!(parsed.merges, file.merges);
    }

    #[test]
    fn test_parse_empty_pattern_and_trailing_blanks() {
        let parsed = ModelFile::parse("pairbpe v1\n\n97 98\n\n\n").unwrap();
        assert_eq!(parsed.pattern, "");
        assert_eq!(parsed.merges, vec![(97, 98)]);
    }

    #[test]
    fn test_unknown_version_tag() {
        let err = ModelFile::parse("pairbpe v2\n\n97 98\n").unwrap_err();
        assert!(matches!(err, TokenizerError::ModelFormat(_)));
    }

    #[test]
    fn test_malformed_merge_lines() {
        for contents in [
            "pairbpe v1\n\n97\n",
            "pairbpe v1\n\n97 98 99\n",
            "pairbpe v1\n\nninety seven\n",
            "pairbpe v1\n\n97 -1\n",
        ] {
            let err = ModelFile::parse(contents).unwrap_err();
            assert!(matches!(err, TokenizerError::ModelFormat(_)), "{contents:?}");
        }
    }

    #[test]
    fn test_forward_reference_rejected() {
        // First merge gets id 256, so referencing 257 is invalid.
        let err = ModelFile::parse("pairbpe v1\n\n97 257\n").unwrap_err();
        assert!(matches!(err, TokenizerError::ModelFormat(_)));
    }

    #[test]
    fn test_duplicate_pair_rejected() {
        let err = ModelFile::parse("pairbpe v1\n\n97 98\n97 98\n").unwrap_err();
        assert!(matches!(err, TokenizerError::ModelFormat(_)));
    }

    #[test]
    fn test_ids_reassigned_in_file_order() {
        let parsed = ModelFile::parse("pairbpe v1\n\n97 97\n256 98\n").unwrap();
        let table = parsed.to_merge_table();
        assert_eq!(table.get((97, 97)), Some(256));
        assert_eq!(table.get((256, 98)), Some(257));
    }
}
