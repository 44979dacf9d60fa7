//! Joining the two records on case-folded headwords.

use std::collections::{BTreeMap, HashSet, btree_map};

use vocab_types::script::{fold_case, has_lowercase};
use vocab_types::{GlossRecord, TranslationRecord, VocabularyEntry};

/// Minimum, maximum and mean of a per-entry count.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct CountStats {
    pub min: usize,
    pub max: usize,
    pub avg: f64,
}

impl CountStats {
    pub fn from_counts(counts: &[usize]) -> Self {
        let (Some(min), Some(max)) = (counts.iter().min(), counts.iter().max()) else {
            return Self::default();
        };
        let total: usize = counts.iter().sum();
        Self {
            min: *min,
            max: *max,
            avg: total as f64 / counts.len() as f64,
        }
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct MergeStats {
    /// Case-folded headwords present in both records.
    pub common: usize,
    /// Common headwords dropped for lack of a usable gloss.
    pub dropped: usize,
    pub translations: CountStats,
    pub glosses: CountStats,
}

#[derive(Clone, Debug, Default)]
pub struct Merged {
    pub entries: Vec<VocabularyEntry>,
    pub stats: MergeStats,
}

/// Spelling used for a merged entry.
///
/// Prefers whichever spelling carries lowercase letters, the gloss source's
/// when both or neither do.
pub fn pick_spelling<'a>(gloss_word: &'a str, translation_word: &'a str) -> &'a str {
    if has_lowercase(gloss_word) || !has_lowercase(translation_word) {
        gloss_word
    } else {
        translation_word
    }
}

/// Index a record by folded key. On a collision a spelling with lowercase
/// letters replaces one without.
fn fold_keys<'a, T: 'a>(
    entries: impl Iterator<Item = (&'a str, &'a T)>,
) -> BTreeMap<String, (&'a str, &'a T)> {
    let mut folded = BTreeMap::new();
    for (word, value) in entries {
        match folded.entry(fold_case(word)) {
            btree_map::Entry::Vacant(slot) => {
                slot.insert((word, value));
            }
            btree_map::Entry::Occupied(mut slot) => {
                if has_lowercase(word) && !has_lowercase(slot.get().0) {
                    slot.insert((word, value));
                }
            }
        }
    }
    folded
}

fn clean_glosses(raw: &[String]) -> Vec<String> {
    let mut seen = HashSet::new();
    raw.iter()
        .map(|g| g.trim())
        .filter(|g| !g.is_empty())
        .filter(|g| seen.insert(g.to_string()))
        .map(str::to_string)
        .collect()
}

/// Entries whose headword appears in both records, in folded-key order.
///
/// Translations are kept whole. Entries left without glosses are dropped.
/// Merging stops once `max_entries` entries have been produced.
pub fn merge(
    translations: &TranslationRecord,
    glosses: &GlossRecord,
    max_entries: Option<usize>,
) -> Merged {
    let ru = fold_keys(translations.iter());
    let en = fold_keys(glosses.iter());

    let mut merged = Merged::default();
    for (key, (en_word, gloss)) in &en {
        let Some((ru_word, translation)) = ru.get(key) else {
            continue;
        };
        merged.stats.common += 1;
        if max_entries.is_some_and(|max| merged.entries.len() >= max) {
            continue;
        }
        let cleaned = clean_glosses(&gloss.glosses);
        if cleaned.is_empty() {
            merged.stats.dropped += 1;
            continue;
        }
        merged.entries.push(VocabularyEntry {
            word: pick_spelling(en_word, ru_word).to_string(),
            translations: translation.meanings.clone(),
            glosses: cleaned,
            pronunciation: gloss.pronunciation.clone(),
        });
    }

    let ru_counts: Vec<usize> = merged.entries.iter().map(|e| e.translations.len()).collect();
    let en_counts: Vec<usize> = merged.entries.iter().map(|e| e.glosses.len()).collect();
    merged.stats.translations = CountStats::from_counts(&ru_counts);
    merged.stats.glosses = CountStats::from_counts(&en_counts);
    merged
}
