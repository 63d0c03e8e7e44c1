//! Text splitting for pre-tokenization.
//!
//! Splitting bounds BPE merges: pairs are never counted or merged across
//! chunk boundaries. The two preset patterns need lookahead
//! (`\s+(?!\S)` keeps trailing whitespace without a following non-space
//! together) and possessive quantifiers, which is why `fancy_regex` is used
//! rather than the plain `regex` crate.

use fancy_regex::Regex;
use pairbpe_core::{Result, TokenizerError};

/// GPT-2 style split pattern: contractions, letter runs, number runs,
/// punctuation runs, and whitespace.
pub const GPT2_SPLIT_PATTERN: &str =
    r"'(?:[sdmt]|ll|ve|re)| ?\p{L}+| ?\p{N}+| ?[^\s\p{L}\p{N}]+|\s+(?!\S)|\s+";

/// GPT-4 style split pattern: like GPT-2, but caps number runs at three
/// digits and handles newlines separately.
pub const GPT4_SPLIT_PATTERN: &str =
    r"'(?:[sdmt]|ll|ve|re)|[^\r\n\p{L}\p{N}]?+\p{L}+|\p{N}{1,3}| ?[^\s\p{L}\p{N}]++[\r\n]*|\s*[\r\n]|\s+(?!\S)|\s+";

/// Text splitter for pre-tokenization.
///
/// Guarantees that concatenating the returned chunks reconstructs the input
/// exactly: any text the pattern does not match is emitted as its own
/// chunk instead of being dropped.
pub struct Splitter {
    pattern: String,
    /// `None` is the identity splitter: the whole text as one chunk.
    regex: Option<Regex>,
}

impl Splitter {
    /// Compile a splitter from a pattern. The empty pattern yields the
    /// identity splitter.
    pub fn new(pattern: &str) -> Result<Self> {
        let regex = if pattern.is_empty() {
            None
        } else {
            Some(Regex::new(pattern).map_err(|e| {
                TokenizerError::ModelFormat(format!("invalid split pattern {:?}: {}", pattern, e))
            })?)
        };
        Ok(Self {
            pattern: pattern.to_string(),
            regex,
        })
    }

    /// The identity splitter: no pre-tokenization.
    pub fn identity() -> Self {
        Self {
            pattern: String::new(),
            regex: None,
        }
    }

    /// Splitter using the GPT-2 preset.
    pub fn gpt2() -> Self {
        Self::new(GPT2_SPLIT_PATTERN).expect("preset pattern must compile")
    }

    /// Splitter using the GPT-4 preset.
    pub fn gpt4() -> Self {
        Self::new(GPT4_SPLIT_PATTERN).expect("preset pattern must compile")
    }

    /// The pattern string this splitter was built from. Empty for the
    /// identity splitter.
    pub fn pattern(&self) -> &str {
        &self.pattern
    }

    /// Split text into ordered chunks.
    pub fn split<'t>(&self, text: &'t str) -> Vec<&'t str> {
        if text.is_empty() {
            return Vec::new();
        }
        let Some(regex) = &self.regex else {
            return vec![text];
        };

        let mut chunks = Vec::new();
        let mut last_end = 0;
        for found in regex.find_iter(text) {
            let found = found.expect("regex match failed");
            if found.start() > last_end {
                chunks.push(&text[last_end..found.start()]);
            }
            chunks.push(found.as_str());
            last_end = found.end();
        }
        if last_end < text.len() {
            chunks.push(&text[last_end..]);
        }
        chunks
    }
}

impl Default for Splitter {
    fn default() -> Self {
        Self::identity()
    }
}
