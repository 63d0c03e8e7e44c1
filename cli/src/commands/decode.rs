//! Decode command implementation.

use clap::Parser;

/// Decode command arguments.
#[derive(Parser)]
pub struct DecodeCommand {
    /// Path to a trained .model file
    #[arg(short, long)]
    pub model: String,

    /// Token IDs, whitespace or comma separated ("-" reads stdin)
    #[arg(short, long)]
    pub ids: String,
}

use anyhow::{Context, Result as AnyhowResult};
use pairbpe_tokenizer::{ChunkedTokenizer, Tokenizer};
use std::path::Path;

pub fn run(cmd: DecodeCommand) -> AnyhowResult<()> {
    let mut tokenizer = ChunkedTokenizer::new();
    tokenizer.load(Path::new(&cmd.model))?;

    let ids_input = if cmd.ids == "-" {
        use std::io::Read;
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        cmd.ids
    };

    let ids = ids_input
        .split(|c: char| c.is_whitespace() || c == ',')
        .filter(|part| !part.is_empty())
        .map(|part| {
            part.parse::<u32>()
                .with_context(|| format!("{:?} is not a token id", part))
        })
        .collect::<AnyhowResult<Vec<u32>>>()?;

    println!("{}", tokenizer.decode(&ids));

    Ok(())
}
