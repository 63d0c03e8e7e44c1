//! Encode command implementation.

use clap::Parser;

/// Encode command arguments.
#[derive(Parser)]
pub struct EncodeCommand {
    /// Path to a trained .model file
    #[arg(short, long)]
    pub model: String,

    /// Text to encode ("-" reads stdin)
    #[arg(short, long)]
    pub input: String,

    /// Output file (stdout if not specified)
    #[arg(short, long)]
    pub output: Option<String>,
}

use anyhow::Result as AnyhowResult;
use pairbpe_tokenizer::{ChunkedTokenizer, Tokenizer};
use std::path::Path;

pub fn run(cmd: EncodeCommand) -> AnyhowResult<()> {
    // A chunked tokenizer adopts whatever pattern the model file carries;
    // an empty pattern degrades to byte-level behavior.
    let mut tokenizer = ChunkedTokenizer::new();
    tokenizer.load(Path::new(&cmd.model))?;

    let input_text = if cmd.input == "-" {
        use std::io::Read;
        let mut buffer = String::new();
        std::io::stdin().read_to_string(&mut buffer)?;
        buffer
    } else {
        cmd.input
    };

    let ids = tokenizer.encode(&input_text);
    let ids_str: Vec<String> = ids.iter().map(|id| id.to_string()).collect();
    let output = ids_str.join(" ");

    match &cmd.output {
        Some(path) => {
            std::fs::write(path, &output)?;
            println!("Encoded {} tokens to {}", ids.len(), path);
        }
        None => {
            println!("{}", output);
        }
    }

    Ok(())
}
