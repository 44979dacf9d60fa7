use std::env;
use std::path::PathBuf;

use anyhow::{Context, Result};
use stardict_db::{Definition, DictPaths, LoadMode, StarDict};

fn main() -> Result<()> {
    let mut args = env::args().skip(1);
    let dir = args
        .next()
        .map(PathBuf::from)
        .context("usage: cargo run -p stardict-db --example stats -- <dir> <stem>")?;
    let stem = args.next().context("missing dictionary stem")?;

    let paths = DictPaths::new(&dir, &stem);
    let dict = StarDict::load_with_mode(&paths, LoadMode::Mmap)
        .with_context(|| format!("loading StarDict from {}", dir.display()))?;

    let mut text = 0usize;
    let mut empty = 0usize;
    let mut out_of_range = 0usize;
    for (_, def) in dict.iter_definitions() {
        match def {
            Definition::Text(_) => text += 1,
            Definition::Empty => empty += 1,
            Definition::OutOfRange => out_of_range += 1,
        }
    }

    println!("Dictionary: {}", dict.metadata().book_name().unwrap_or("?"));
    println!("Declared words : {:?}", dict.metadata().word_count());
    println!("Index entries  : {}", dict.entries().len());
    println!("Invalid words  : {}", dict.invalid_words());
    println!("Data bytes     : {}", dict.data_len());
    println!("Definitions    : {text} text, {empty} empty, {out_of_range} out of range");

    Ok(())
}
