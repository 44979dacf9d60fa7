use std::fs::{self, File};
use std::io::{BufWriter, Write};
use std::path::Path;
use std::time::Instant;

use serde::Serialize;
use serde_json::Serializer;
use serde_json::ser::PrettyFormatter;
use tracing::info;
use vocab_layout::SpanSource;
use vocab_types::LeveledVocabulary;

use crate::config::BuildConfig;
use crate::error::BuildError;
use crate::level::assign_levels;
use crate::merge::merge;
use crate::sources::{load_glosses, load_translations};

/// Load both sources, merge and level them. Writes nothing but the caches.
pub fn build(
    config: &BuildConfig,
    document: &dyn SpanSource,
) -> Result<LeveledVocabulary, BuildError> {
    info!("[1/4] reading the Armenian-Russian dictionary");
    let start = Instant::now();
    let translations = load_translations(config)?;
    info!(
        "{} translations in {} ms",
        translations.len(),
        start.elapsed().as_millis()
    );

    info!("[2/4] reading the Armenian-English dictionary");
    let start = Instant::now();
    let glosses = load_glosses(config, document)?;
    info!(
        "{} glossed headwords in {} ms",
        glosses.len(),
        start.elapsed().as_millis()
    );

    if translations.is_empty() && glosses.is_empty() {
        return Err(BuildError::NoSources);
    }

    info!("[3/4] merging");
    let merged = merge(&translations, &glosses, config.max_entries);
    let stats = merged.stats;
    info!(
        "{} common headwords, {} merged, {} dropped without glosses",
        stats.common,
        merged.entries.len(),
        stats.dropped
    );
    info!(
        "translations per entry: avg {:.1}, min {}, max {}",
        stats.translations.avg, stats.translations.min, stats.translations.max
    );
    info!(
        "glosses per entry: avg {:.1}, min {}, max {}",
        stats.glosses.avg, stats.glosses.min, stats.glosses.max
    );
    if merged.entries.is_empty() {
        return Err(BuildError::EmptyMerge);
    }

    info!("[4/4] assigning levels");
    let leveled = assign_levels(merged.entries, &config.levels);
    for (tier, entries) in leveled.iter() {
        info!("{tier}: {} words", entries.len());
    }
    Ok(leveled)
}

/// Write the vocabulary as UTF-8 JSON indented by one space.
pub fn write_output(path: &Path, vocabulary: &LeveledVocabulary) -> Result<(), BuildError> {
    let io_err = |error| BuildError::Output {
        path: path.to_path_buf(),
        error,
    };
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(io_err)?;
    }
    let file = File::create(path).map_err(io_err)?;
    let mut writer = BufWriter::new(file);
    let mut serializer = Serializer::with_formatter(&mut writer, PrettyFormatter::with_indent(b" "));
    vocabulary.serialize(&mut serializer)?;
    writer.flush().map_err(io_err)
}

/// Build the vocabulary and write it to `config.output_path`.
pub fn run(
    config: &BuildConfig,
    document: &dyn SpanSource,
) -> Result<LeveledVocabulary, BuildError> {
    let vocabulary = build(config, document)?;
    write_output(&config.output_path, &vocabulary)?;
    info!(
        "wrote {} entries to {}",
        vocabulary.len(),
        config.output_path.display()
    );
    Ok(vocabulary)
}
