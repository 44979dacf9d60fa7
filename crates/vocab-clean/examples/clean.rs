use std::env;

use anyhow::{Context, Result};
use vocab_clean::{Normalizer, NormalizerConfig};

fn main() -> Result<()> {
    let raw = env::args()
        .nth(1)
        .context("usage: cargo run -p vocab-clean --example clean -- '<definition text>'")?;

    let normalizer = Normalizer::new(&NormalizerConfig::default())?;
    let normalized = normalizer.normalize(&raw);

    println!("Input   : {raw}");
    for (i, meaning) in normalized.meanings.iter().enumerate() {
        println!("Meaning {}: {meaning}", i + 1);
    }
    if let Some(usage) = &normalized.usage {
        println!("Usage   : {usage}");
    }
    Ok(())
}
