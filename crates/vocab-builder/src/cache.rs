//! CSV caches of parsed sources.
//!
//! Parsing the PDF takes minutes, so each parsed record is written next to the
//! build as a two- or three-column CSV and trusted on the next run.

use std::fs::{self, File};
use std::io;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::info;
use vocab_types::{Gloss, GlossRecord, Translation, TranslationRecord};

use crate::error::BuildError;

/// A record that can round-trip through a CSV cache file.
pub trait CacheFormat: Sized {
    fn write_rows<W: io::Write>(&self, writer: &mut csv::Writer<W>) -> csv::Result<()>;
    fn read_rows<R: io::Read>(reader: &mut csv::Reader<R>) -> csv::Result<Self>;
    fn entry_count(&self) -> usize;
}

#[derive(Serialize, Deserialize)]
struct TranslationRow {
    armenian: String,
    translations: String,
}

#[derive(Serialize, Deserialize)]
struct GlossRow {
    armenian: String,
    english: String,
    pronunciation: String,
}

fn split_list(raw: &str, separator: char) -> Vec<String> {
    raw.split(separator)
        .map(str::trim)
        .filter(|s| !s.is_empty())
        .map(str::to_string)
        .collect()
}

impl CacheFormat for TranslationRecord {
    fn write_rows<W: io::Write>(&self, writer: &mut csv::Writer<W>) -> csv::Result<()> {
        for (word, translation) in self.iter() {
            writer.serialize(TranslationRow {
                armenian: word.to_string(),
                translations: translation.meanings.join(";"),
            })?;
        }
        Ok(())
    }

    fn read_rows<R: io::Read>(reader: &mut csv::Reader<R>) -> csv::Result<Self> {
        let mut record = TranslationRecord::new();
        for row in reader.deserialize::<TranslationRow>() {
            let row = row?;
            let meanings = split_list(&row.translations, ';');
            if row.armenian.is_empty() || meanings.is_empty() {
                continue;
            }
            record.insert(
                row.armenian,
                Translation {
                    meanings,
                    usage: None,
                },
            );
        }
        Ok(record)
    }

    fn entry_count(&self) -> usize {
        self.len()
    }
}

impl CacheFormat for GlossRecord {
    fn write_rows<W: io::Write>(&self, writer: &mut csv::Writer<W>) -> csv::Result<()> {
        for (word, gloss) in self.iter() {
            writer.serialize(GlossRow {
                armenian: word.to_string(),
                english: gloss.glosses.join(","),
                pronunciation: gloss.pronunciation.clone().unwrap_or_default(),
            })?;
        }
        Ok(())
    }

    fn read_rows<R: io::Read>(reader: &mut csv::Reader<R>) -> csv::Result<Self> {
        let mut record = GlossRecord::new();
        for row in reader.deserialize::<GlossRow>() {
            let row = row?;
            if row.armenian.is_empty() {
                continue;
            }
            let pronunciation = row.pronunciation.trim();
            record.insert(
                row.armenian,
                Gloss {
                    glosses: split_list(&row.english, ','),
                    pronunciation: (!pronunciation.is_empty()).then(|| pronunciation.to_string()),
                },
            );
        }
        Ok(record)
    }

    fn entry_count(&self) -> usize {
        self.len()
    }
}

pub fn read_cache<T: CacheFormat>(path: &Path) -> Result<T, BuildError> {
    let cache_err = |error| BuildError::Cache {
        path: path.to_path_buf(),
        error,
    };
    let mut reader = csv::Reader::from_path(path).map_err(cache_err)?;
    T::read_rows(&mut reader).map_err(cache_err)
}

pub fn write_cache<T: CacheFormat>(path: &Path, record: &T) -> Result<(), BuildError> {
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(|error| BuildError::Output {
            path: parent.to_path_buf(),
            error,
        })?;
    }
    let file = File::create(path).map_err(|error| BuildError::Output {
        path: path.to_path_buf(),
        error,
    })?;
    let cache_err = |error| BuildError::Cache {
        path: path.to_path_buf(),
        error,
    };
    let mut writer = csv::Writer::from_writer(file);
    record.write_rows(&mut writer).map_err(cache_err)?;
    writer.flush().map_err(|error| BuildError::Output {
        path: path.to_path_buf(),
        error,
    })
}

/// Where a source record came from.
#[derive(Debug)]
pub enum Loaded<T> {
    Cached(T),
    Parsed(T),
}

impl<T> Loaded<T> {
    pub fn is_cached(&self) -> bool {
        matches!(self, Loaded::Cached(_))
    }

    pub fn get(&self) -> &T {
        match self {
            Loaded::Cached(t) | Loaded::Parsed(t) => t,
        }
    }

    pub fn into_inner(self) -> T {
        match self {
            Loaded::Cached(t) | Loaded::Parsed(t) => t,
        }
    }
}

/// Read `path` when trusted and present, otherwise run `parse` and cache a
/// non-empty result.
pub fn load_or_parse<T, F>(path: &Path, trust_cache: bool, parse: F) -> Result<Loaded<T>, BuildError>
where
    T: CacheFormat,
    F: FnOnce() -> Result<T, BuildError>,
{
    if trust_cache && path.exists() {
        let record: T = read_cache(path)?;
        info!(
            "loaded {} entries from cache {}",
            record.entry_count(),
            path.display()
        );
        return Ok(Loaded::Cached(record));
    }
    let record = parse()?;
    if record.entry_count() > 0 {
        write_cache(path, &record)?;
        info!("cached {} entries to {}", record.entry_count(), path.display());
    }
    Ok(Loaded::Parsed(record))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn translations() -> TranslationRecord {
        [
            (
                "տուն",
                Translation {
                    meanings: vec!["дом".into(), "жилище".into()],
                    usage: Some("не кэшируется".into()),
                },
            ),
            (
                "ջուր",
                Translation {
                    meanings: vec!["вода".into()],
                    usage: None,
                },
            ),
        ]
        .into_iter()
        .collect()
    }

    #[test]
    fn translation_cache_drops_usage() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join("armenian_russian.csv");
        write_cache(&path, &translations()).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.starts_with("armenian,translations\n"));
        assert!(text.contains("տուն,дом;жилище\n"));

        let back: TranslationRecord = read_cache(&path).unwrap();
        assert_eq!(back.len(), 2);
        assert_eq!(back.get("տուն").unwrap().meanings, vec!["дом", "жилище"]);
        assert_eq!(back.get("տուն").unwrap().usage, None);
    }

    #[test]
    fn gloss_cache_keeps_pronunciation_and_quotes() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("armenian_english.csv");
        let record: GlossRecord = [
            (
                "տուն",
                Gloss {
                    glosses: vec!["house".into(), "home".into()],
                    pronunciation: Some("tun".into()),
                },
            ),
            (
                "ամպ",
                Gloss {
                    glosses: vec!["cloud".into()],
                    pronunciation: None,
                },
            ),
        ]
        .into_iter()
        .collect();
        write_cache(&path, &record).unwrap();

        let text = fs::read_to_string(&path).unwrap();
        assert!(text.contains("\"house,home\""));

        let back: GlossRecord = read_cache(&path).unwrap();
        assert_eq!(back, record);
    }

    #[test]
    fn untrusted_cache_is_rebuilt() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("armenian_russian.csv");
        fs::write(&path, "armenian,translations\nհին,старый\n").unwrap();

        let cached = load_or_parse(&path, true, || Ok(translations())).unwrap();
        assert!(cached.is_cached());
        assert!(cached.get().contains("հին"));

        let fresh = load_or_parse(&path, false, || Ok(translations())).unwrap();
        assert!(!fresh.is_cached());
        let reread: TranslationRecord = read_cache(&path).unwrap();
        assert!(!reread.contains("հին"));
        assert_eq!(reread.len(), 2);
    }

    #[test]
    fn empty_parse_writes_nothing() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("armenian_english.csv");
        let loaded = load_or_parse(&path, true, || Ok(GlossRecord::new())).unwrap();
        assert!(loaded.into_inner().is_empty());
        assert!(!path.exists());
    }
}
