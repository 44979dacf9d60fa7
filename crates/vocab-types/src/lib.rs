//! Shared types that flow between the vocabulary builder stages.
//!
//! Two dictionary sources feed the pipeline: a StarDict dictionary whose index
//! is parsed into [`IndexEntry`] values and whose definitions become a
//! [`TranslationRecord`], and a scanned PDF whose positioned text ([`Span`]s
//! grouped into [`Page`]s) becomes a [`GlossRecord`]. The merger joins both
//! into [`VocabularyEntry`] values, and the leveler partitions those into a
//! [`LeveledVocabulary`].
//!
//! Script predicates used by every stage live in [`script`].
//!
//! ```rust
//! use vocab_types::{Gloss, GlossRecord, Tier};
//!
//! let mut record = GlossRecord::new();
//! record.insert("տուն", Gloss { glosses: vec!["house".into()], pronunciation: None });
//! assert_eq!(record.len(), 1);
//! assert_eq!(Tier::from_index(5), Tier::A2);
//! ```

use std::collections::BTreeMap;
use std::collections::btree_map;
use std::fmt;

use serde::{Deserialize, Serialize};

pub mod script;

/// One headword record from a StarDict `.idx` file.
#[derive(Clone, Debug, Eq, PartialEq, Hash)]
pub struct IndexEntry {
    pub word: String,
    pub offset: u32,
    pub size: u32,
}

/// Meanings extracted from one dictionary definition.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Translation {
    pub meanings: Vec<String>,
    pub usage: Option<String>,
}

/// Glosses and pronunciation recovered from one row of the scanned table.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Gloss {
    pub glosses: Vec<String>,
    pub pronunciation: Option<String>,
}

/// Headword-keyed dictionary built once per source.
///
/// Keys keep the casing they were extracted with. Iteration follows key order,
/// so a record loaded from a cache iterates exactly like a freshly parsed one.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct Record<T> {
    entries: BTreeMap<String, T>,
}

/// Headword → Russian meanings.
pub type TranslationRecord = Record<Translation>;
/// Headword → English glosses and pronunciation.
pub type GlossRecord = Record<Gloss>;

impl<T> Record<T> {
    pub fn new() -> Self {
        Self {
            entries: BTreeMap::new(),
        }
    }

    /// Insert or replace the value for `word`, returning the previous value.
    pub fn insert(&mut self, word: impl Into<String>, value: T) -> Option<T> {
        self.entries.insert(word.into(), value)
    }

    pub fn get(&self, word: &str) -> Option<&T> {
        self.entries.get(word)
    }

    pub fn contains(&self, word: &str) -> bool {
        self.entries.contains_key(word)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &T)> + '_ {
        self.entries.iter().map(|(k, v)| (k.as_str(), v))
    }

    pub fn words(&self) -> impl Iterator<Item = &str> + '_ {
        self.entries.keys().map(String::as_str)
    }
}

impl<T> Default for Record<T> {
    fn default() -> Self {
        Self::new()
    }
}

impl<K: Into<String>, T> FromIterator<(K, T)> for Record<T> {
    fn from_iter<I: IntoIterator<Item = (K, T)>>(iter: I) -> Self {
        Self {
            entries: iter.into_iter().map(|(k, v)| (k.into(), v)).collect(),
        }
    }
}

impl<T> IntoIterator for Record<T> {
    type Item = (String, T);
    type IntoIter = btree_map::IntoIter<String, T>;

    fn into_iter(self) -> Self::IntoIter {
        self.entries.into_iter()
    }
}

/// Unified record present in both sources.
#[derive(Clone, Debug, Eq, PartialEq, Serialize, Deserialize)]
pub struct VocabularyEntry {
    #[serde(rename = "am")]
    pub word: String,
    #[serde(rename = "ru")]
    pub translations: Vec<String>,
    #[serde(rename = "en")]
    pub glosses: Vec<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub pronunciation: Option<String>,
}

/// Difficulty tier, ordered from simplest to hardest.
#[derive(Clone, Copy, Debug, Eq, PartialEq, Hash, PartialOrd, Ord)]
pub enum Tier {
    A1,
    A2,
    B1,
    B2,
}

impl Tier {
    pub const ALL: [Tier; 4] = [Tier::A1, Tier::A2, Tier::B1, Tier::B2];

    /// Round-robin tier for a sorted position (`index % 4`).
    pub fn from_index(index: usize) -> Self {
        Self::ALL[index % Self::ALL.len()]
    }

    fn slot(self) -> usize {
        match self {
            Tier::A1 => 0,
            Tier::A2 => 1,
            Tier::B1 => 2,
            Tier::B2 => 3,
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            Tier::A1 => "A1",
            Tier::A2 => "A2",
            Tier::B1 => "B1",
            Tier::B2 => "B2",
        })
    }
}

/// Four disjoint, ordered tiers. Serializes as `{"A1": [...], ..., "B2": [...]}`.
#[derive(Clone, Debug, Default, Eq, PartialEq, Serialize, Deserialize)]
pub struct LeveledVocabulary {
    #[serde(rename = "A1")]
    a1: Vec<VocabularyEntry>,
    #[serde(rename = "A2")]
    a2: Vec<VocabularyEntry>,
    #[serde(rename = "B1")]
    b1: Vec<VocabularyEntry>,
    #[serde(rename = "B2")]
    b2: Vec<VocabularyEntry>,
}

impl LeveledVocabulary {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, tier: Tier, entry: VocabularyEntry) {
        self.tier_mut(tier).push(entry);
    }

    pub fn tier(&self, tier: Tier) -> &[VocabularyEntry] {
        match tier.slot() {
            0 => &self.a1,
            1 => &self.a2,
            2 => &self.b1,
            _ => &self.b2,
        }
    }

    fn tier_mut(&mut self, tier: Tier) -> &mut Vec<VocabularyEntry> {
        match tier.slot() {
            0 => &mut self.a1,
            1 => &mut self.a2,
            2 => &mut self.b1,
            _ => &mut self.b2,
        }
    }

    /// Tier sizes in tier order.
    pub fn sizes(&self) -> [usize; 4] {
        Tier::ALL.map(|t| self.tier(t).len())
    }

    /// Total number of entries across all tiers.
    pub fn len(&self) -> usize {
        self.sizes().iter().sum()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    pub fn iter(&self) -> impl Iterator<Item = (Tier, &[VocabularyEntry])> + '_ {
        Tier::ALL.into_iter().map(|t| (t, self.tier(t)))
    }
}

/// A positioned run of text on a page, as produced by a layout parser.
#[derive(Clone, Debug, PartialEq)]
pub struct Span {
    pub x0: f64,
    pub y0: f64,
    pub x1: f64,
    pub y1: f64,
    pub text: String,
}

impl Span {
    pub fn new(x0: f64, y0: f64, x1: f64, y1: f64, text: impl Into<String>) -> Self {
        Self {
            x0,
            y0,
            x1,
            y1,
            text: text.into(),
        }
    }

    pub fn height(&self) -> f64 {
        self.y1 - self.y0
    }
}

/// All spans of one document page.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct Page {
    pub number: usize,
    pub spans: Vec<Span>,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn entry(word: &str) -> VocabularyEntry {
        VocabularyEntry {
            word: word.into(),
            translations: vec!["дом".into()],
            glosses: vec!["house".into()],
            pronunciation: None,
        }
    }

    #[test]
    fn round_robin_tiers() {
        assert_eq!(Tier::from_index(0), Tier::A1);
        assert_eq!(Tier::from_index(3), Tier::B2);
        assert_eq!(Tier::from_index(9), Tier::A2);
    }

    #[test]
    fn record_iterates_in_key_order() {
        let mut record = TranslationRecord::new();
        record.insert("բ", Translation::default());
        record.insert("ա", Translation::default());
        let words: Vec<_> = record.words().collect();
        assert_eq!(words, vec!["ա", "բ"]);
    }

    #[test]
    fn leveled_serializes_tiers_in_order() {
        let mut leveled = LeveledVocabulary::new();
        leveled.push(Tier::B1, entry("տուն"));
        let json = serde_json::to_string(&leveled).unwrap();
        assert_eq!(
            json,
            r#"{"A1":[],"A2":[],"B1":[{"am":"տուն","ru":["дом"],"en":["house"]}],"B2":[]}"#
        );
        assert_eq!(leveled.sizes(), [0, 0, 1, 0]);
    }

    #[test]
    fn pronunciation_serialized_when_present() {
        let mut e = entry("տուն");
        e.pronunciation = Some("tun".into());
        let json = serde_json::to_value(&e).unwrap();
        assert_eq!(json["pronunciation"], "tun");
    }
}
