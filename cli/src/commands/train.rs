//! Train command implementation.

use clap::{Parser, ValueEnum};

/// Which pre-tokenization the trained model uses.
#[derive(Clone, Copy, Debug, ValueEnum)]
pub enum SplitPreset {
    /// No pre-tokenization; merges may span anything
    Byte,
    /// GPT-2 style splitting
    Gpt2,
    /// GPT-4 style splitting
    Gpt4,
}

/// Train command arguments.
#[derive(Parser)]
pub struct TrainCommand {
    /// Path to the training text file
    #[arg(short, long)]
    pub input: String,

    /// Output prefix; writes <prefix>.model and <prefix>.vocab
    #[arg(short, long)]
    pub output: String,

    /// Target vocabulary size (including the 256 base bytes)
    #[arg(short, long, default_value_t = 512)]
    pub vocab_size: usize,

    /// Pre-tokenization preset
    #[arg(short, long, value_enum, default_value = "gpt4")]
    pub pattern: SplitPreset,

    /// Print one line per learned merge
    #[arg(long, default_value_t = false)]
    pub verbose: bool,
}

use anyhow::{Context, Result as AnyhowResult};
use pairbpe_tokenizer::{
    render_token, ByteLevelTokenizer, ChunkedTokenizer, MergeStep, ProgressCallback, Tokenizer,
};
use std::path::Path;

pub fn run(cmd: TrainCommand) -> AnyhowResult<()> {
    let text = std::fs::read_to_string(&cmd.input)
        .with_context(|| format!("failed to read training data from {}", cmd.input))?;

    let mut tokenizer: Box<dyn Tokenizer> = match cmd.pattern {
        SplitPreset::Byte => Box::new(ByteLevelTokenizer::new()),
        SplitPreset::Gpt2 => Box::new(ChunkedTokenizer::gpt2()),
        SplitPreset::Gpt4 => Box::new(ChunkedTokenizer::new()),
    };

    let mut print_step = |step: &MergeStep<'_>| {
        println!(
            "merge {}/{}: ({}, {}) -> {} ({}) had {} occurrences",
            step.step + 1,
            step.num_merges,
            step.pair.0,
            step.pair.1,
            step.new_id,
            render_token(step.token),
            step.count
        );
    };
    let progress: Option<ProgressCallback<'_>> = if cmd.verbose {
        Some(&mut print_step)
    } else {
        None
    };

    tokenizer.train(&text, cmd.vocab_size, progress)?;
    tokenizer.save(Path::new(&cmd.output))?;

    println!(
        "Trained on {} bytes, wrote {}.model and {}.vocab",
        text.len(),
        cmd.output,
        cmd.output
    );

    Ok(())
}
