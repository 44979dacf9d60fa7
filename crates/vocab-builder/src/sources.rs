//! Loading the two dictionaries into records.

use stardict_db::{Definition, StarDict};
use tracing::{debug, info, warn};
use vocab_clean::Normalizer;
use vocab_layout::SpanSource;
use vocab_types::script::is_abbreviation;
use vocab_types::{GlossRecord, Translation, TranslationRecord};

use crate::cache::load_or_parse;
use crate::config::BuildConfig;
use crate::error::{BuildError, SourceKind};

/// Translations pulled out of a StarDict dictionary.
#[derive(Debug, Default)]
pub struct TranslationExtraction {
    pub record: TranslationRecord,
    /// Headwords rejected by the filter or without a usable definition.
    pub skipped: usize,
}

/// Headwords worth keeping: not abbreviations and free of digits.
pub fn accept_stardict_headword(word: &str) -> bool {
    !word.trim().is_empty() && !is_abbreviation(word) && !word.chars().any(|c| c.is_ascii_digit())
}

pub fn extract_translations(dict: &StarDict, normalizer: &Normalizer) -> TranslationExtraction {
    let mut out = TranslationExtraction::default();
    for (entry, definition) in dict.iter_definitions() {
        if !accept_stardict_headword(&entry.word) {
            debug!("skipping headword {:?}", entry.word);
            out.skipped += 1;
            continue;
        }
        let text = match definition {
            Definition::Text(text) => text,
            Definition::Empty => {
                debug!("empty definition for {:?}", entry.word);
                out.skipped += 1;
                continue;
            }
            Definition::OutOfRange => {
                debug!("definition of {:?} lies outside the data file", entry.word);
                out.skipped += 1;
                continue;
            }
        };
        let normalized = normalizer.normalize(&text);
        if normalized.meanings.is_empty() {
            debug!("no usable meanings for {:?}", entry.word);
            out.skipped += 1;
            continue;
        }
        out.record.insert(
            entry.word.clone(),
            Translation {
                meanings: normalized.meanings,
                usage: normalized.usage,
            },
        );
    }
    out
}

/// Fail when a present source yielded fewer than `min` entries.
pub fn validate(dictionary: SourceKind, found: usize, min: usize) -> Result<(), BuildError> {
    if found < min {
        return Err(BuildError::TooFewEntries {
            dictionary,
            found,
            min,
        });
    }
    Ok(())
}

/// The Armenian-Russian record, from cache or the StarDict files.
///
/// A dictionary with missing files is skipped with a warning and yields an
/// empty record.
pub fn load_translations(config: &BuildConfig) -> Result<TranslationRecord, BuildError> {
    let paths = config.stardict_paths();
    let missing = paths.missing();
    if !missing.is_empty() {
        for path in missing {
            warn!("StarDict file not found: {}", path.display());
        }
        warn!("skipping the {} dictionary", SourceKind::Translations);
        return Ok(TranslationRecord::new());
    }

    let loaded = load_or_parse(
        &config.translation_cache(),
        config.use_translation_cache,
        || {
            let dict = StarDict::load_with_mode(&paths, config.stardict_mode)?;
            if let Some(count) = dict.metadata().word_count() {
                info!("StarDict header announces {count} words");
            }
            info!(
                "read {} index entries ({} invalid headwords)",
                dict.entries().len(),
                dict.invalid_words()
            );
            let normalizer = Normalizer::new(&config.normalizer)?;
            let extraction = extract_translations(&dict, &normalizer);
            info!(
                "extracted {} translations, skipped {}",
                extraction.record.len(),
                extraction.skipped
            );
            Ok(extraction.record)
        },
    )?;

    let record = loaded.into_inner();
    validate(
        SourceKind::Translations,
        record.len(),
        config.min_entries_per_source,
    )?;
    Ok(record)
}

/// The Armenian-English record, from cache or the layout source.
pub fn load_glosses(
    config: &BuildConfig,
    document: &dyn SpanSource,
) -> Result<GlossRecord, BuildError> {
    if !document.is_available() {
        warn!(
            "PDF not found at {}, skipping the {} dictionary",
            config.pdf_path.display(),
            SourceKind::Glosses
        );
        return Ok(GlossRecord::new());
    }

    let loaded = load_or_parse(&config.gloss_cache(), config.use_gloss_cache, || {
        let pages = document.pages()?;
        let extraction = vocab_layout::extract(&config.layout, &pages);
        let stats = extraction.stats;
        info!(
            "scanned {} pages: {} headwords, {} distinct, {} without gloss, {} rejected",
            stats.pages, stats.headwords, stats.distinct, stats.unmatched, stats.rejected
        );
        Ok(extraction.record)
    })?;

    let record = loaded.into_inner();
    validate(
        SourceKind::Glosses,
        record.len(),
        config.min_entries_per_source,
    )?;
    Ok(record)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn filters_headwords() {
        assert!(accept_stardict_headword("տուն"));
        assert!(accept_stardict_headword("Հայաստան"));
        assert!(!accept_stardict_headword("ՀՀ"));
        assert!(!accept_stardict_headword("Ա"));
        assert!(!accept_stardict_headword("տուն2"));
        assert!(!accept_stardict_headword("  "));
    }

    #[test]
    fn validation_names_the_source() {
        assert!(validate(SourceKind::Glosses, 700, 700).is_ok());
        let err = validate(SourceKind::Translations, 12, 700).unwrap_err();
        assert!(matches!(
            err,
            BuildError::TooFewEntries {
                dictionary: SourceKind::Translations,
                found: 12,
                min: 700
            }
        ));
        assert!(err.to_string().contains("StarDict"));
    }
}
