//! Rebuild `headword | pronunciation | gloss` rows from positioned PDF text.
//!
//! The scanned dictionary is laid out in three columns. Each text span is
//! assigned to a column by its left edge; headwords are then paired with the
//! pronunciation and gloss spans nearest to them vertically on the same page.
//! Rows without a gloss are dropped. Duplicate headwords (also across pages
//! and across letter case) are merged at the end.
//!
//! Pages come from a [`SpanSource`]; [`PdfToText`] is the production source.
//!
//! ```rust
//! use vocab_layout::{LayoutConfig, extract};
//! use vocab_types::{Page, Span};
//!
//! let page = Page {
//!     number: 1,
//!     spans: vec![
//!         Span::new(50.0, 100.0, 120.0, 112.0, "տուն"),
//!         Span::new(220.0, 101.0, 260.0, 112.0, "[tun]"),
//!         Span::new(360.0, 100.0, 450.0, 112.0, "house, home"),
//!     ],
//! };
//! let out = extract(&LayoutConfig::default(), &[page]);
//! let gloss = out.record.get("տուն").unwrap();
//! assert_eq!(gloss.glosses, vec!["house", "home"]);
//! assert_eq!(gloss.pronunciation.as_deref(), Some("tun"));
//! ```

use std::collections::HashMap;

use tracing::debug;
use vocab_types::script::{
    contains_armenian, contains_armenian_lowercase, contains_latin_letter, fold_case,
    has_lowercase, is_abbreviation,
};
use vocab_types::{Gloss, GlossRecord, Page, Span};

mod document;

pub use document::{DocumentError, PdfToText, SpanSource, parse_bbox_layout};

const HEADWORD_TRIM: &[char] = &['.', ',', ';', ':', '(', ')', '[', ']', '{', '}'];
const PRONUNCIATION_TRIM: &[char] = &['[', ']', '(', ')'];

/// Column geometry and cleanup tables for the scanned dictionary.
#[derive(Clone, Debug)]
pub struct LayoutConfig {
    /// Spans starting left of this x are headwords.
    pub pronunciation_x: f64,
    /// Spans starting at or right of this x are glosses; in between is pronunciation.
    pub gloss_x: f64,
    /// Maximum vertical distance (exclusive) between a headword and its cells.
    pub row_tolerance: f64,
    /// OCR digit/letter confusions fixed in the pronunciation column.
    pub ocr_substitutions: Vec<(char, char)>,
    pub min_pronunciation_chars: usize,
    pub max_pronunciation_chars: usize,
}

impl Default for LayoutConfig {
    fn default() -> Self {
        Self {
            pronunciation_x: 200.0,
            gloss_x: 350.0,
            row_tolerance: 10.0,
            ocr_substitutions: vec![('0', 'o'), ('1', 'l'), ('3', 'e'), ('5', 's'), ('8', 'b')],
            min_pronunciation_chars: 2,
            max_pronunciation_chars: 50,
        }
    }
}

/// Column a span belongs to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum Column {
    Headword,
    Pronunciation,
    Gloss,
}

/// Assign a span to a column, or `None` if its text does not fit the column.
pub fn classify(span: &Span, config: &LayoutConfig) -> Option<Column> {
    let text = span.text.trim();
    if text.is_empty() {
        return None;
    }
    if span.x0 < config.pronunciation_x {
        contains_armenian(text).then_some(Column::Headword)
    } else if span.x0 < config.gloss_x {
        Some(Column::Pronunciation)
    } else {
        contains_latin_letter(text).then_some(Column::Gloss)
    }
}

/// Apply the OCR substitution table character by character.
pub fn fix_ocr(text: &str, substitutions: &[(char, char)]) -> String {
    text.chars()
        .map(|c| {
            substitutions
                .iter()
                .find(|(from, _)| *from == c)
                .map_or(c, |(_, to)| *to)
        })
        .collect()
}

/// Strip surrounding punctuation from a headword line.
pub fn clean_headword(raw: &str) -> &str {
    raw.trim().trim_matches(HEADWORD_TRIM).trim()
}

/// Headwords must have a lowercase Armenian letter and not be an abbreviation.
pub fn accept_headword(word: &str) -> bool {
    contains_armenian_lowercase(word) && !is_abbreviation(word)
}

/// Comma-separated glosses, trimmed and deduplicated, as authored.
pub fn split_glosses(text: &str) -> Vec<String> {
    let mut out: Vec<String> = Vec::new();
    for gloss in text.split(',').map(str::trim).filter(|g| !g.is_empty()) {
        if !out.iter().any(|g| g == gloss) {
            out.push(gloss.to_string());
        }
    }
    out
}

/// Strip surrounding brackets and keep the pronunciation if its length is plausible.
pub fn clean_pronunciation(raw: &str, config: &LayoutConfig) -> Option<String> {
    let cleaned = raw.trim().trim_matches(PRONUNCIATION_TRIM).trim();
    let len = cleaned.chars().count();
    (config.min_pronunciation_chars..=config.max_pronunciation_chars)
        .contains(&len)
        .then(|| cleaned.to_string())
}

/// Estimated y of each line of a multi-line headword span.
///
/// Lines are assumed evenly spread over the span height; a single line sits at
/// the vertical midpoint.
fn line_positions(span: &Span, lines: usize) -> impl Iterator<Item = f64> + '_ {
    let step = span.height() / lines.max(1) as f64;
    (0..lines).map(move |i| {
        if lines > 1 {
            span.y0 + (i as f64 + 0.5) * step
        } else {
            (span.y0 + span.y1) / 2.0
        }
    })
}

/// y keyed to a tenth of a point, so spans on the same baseline collapse.
fn row_key(y: f64) -> i64 {
    (y * 10.0).round() as i64
}

/// Cells of one column keyed by row, in first-seen order.
#[derive(Default)]
struct ColumnCells {
    cells: Vec<(i64, String)>,
}

impl ColumnCells {
    fn slot(&mut self, y: f64) -> Option<&mut String> {
        let key = row_key(y);
        self.cells.iter_mut().find(|(k, _)| *k == key).map(|(_, t)| t)
    }

    fn replace(&mut self, y: f64, text: String) {
        match self.slot(y) {
            Some(existing) => *existing = text,
            None => self.cells.push((row_key(y), text)),
        }
    }

    fn append(&mut self, y: f64, text: &str) {
        match self.slot(y) {
            Some(existing) => {
                existing.push_str(", ");
                existing.push_str(text);
            }
            None => self.cells.push((row_key(y), text.to_string())),
        }
    }

    /// Closest cell strictly within `tolerance`; earlier cells win ties.
    fn nearest(&self, y: f64, tolerance: f64) -> Option<&str> {
        let mut best: Option<(f64, &str)> = None;
        for (key, text) in &self.cells {
            let dist = (*key as f64 / 10.0 - y).abs();
            let limit = best.map_or(tolerance, |(d, _)| d);
            if dist < limit {
                best = Some((dist, text.as_str()));
            }
        }
        best.map(|(_, text)| text)
    }
}

/// Counters describing one extraction run.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
pub struct LayoutStats {
    pub pages: usize,
    pub headwords: usize,
    /// Headwords with no gloss within tolerance.
    pub unmatched: usize,
    /// Headwords failing [`accept_headword`] or yielding no glosses.
    pub rejected: usize,
    /// Distinct headwords before case folding.
    pub distinct: usize,
}

/// Result of extracting a whole document.
#[derive(Clone, Debug)]
pub struct Extraction {
    pub record: GlossRecord,
    pub stats: LayoutStats,
}

/// Incremental extractor: feed pages, then [`finish`](TableExtractor::finish).
pub struct TableExtractor<'c> {
    config: &'c LayoutConfig,
    rows: Vec<(String, Gloss)>,
    positions: HashMap<String, usize>,
    stats: LayoutStats,
}

impl<'c> TableExtractor<'c> {
    pub fn new(config: &'c LayoutConfig) -> Self {
        Self {
            config,
            rows: Vec::new(),
            positions: HashMap::new(),
            stats: LayoutStats::default(),
        }
    }

    pub fn add_page(&mut self, page: &Page) {
        let mut headwords: Vec<(f64, &str)> = Vec::new();
        let mut pronunciations = ColumnCells::default();
        let mut glosses = ColumnCells::default();

        for span in &page.spans {
            let text = span.text.trim();
            match classify(span, self.config) {
                Some(Column::Headword) => {
                    let lines: Vec<&str> = text
                        .lines()
                        .map(str::trim)
                        .filter(|l| !l.is_empty() && contains_armenian(l))
                        .collect();
                    headwords.extend(line_positions(span, lines.len()).zip(lines));
                }
                Some(Column::Pronunciation) => {
                    pronunciations.replace(span.y0, fix_ocr(text, &self.config.ocr_substitutions));
                }
                Some(Column::Gloss) => glosses.append(span.y0, text),
                None => {}
            }
        }

        let before = self.stats;
        for (y, line) in headwords {
            self.stats.headwords += 1;
            let Some(gloss_text) = glosses.nearest(y, self.config.row_tolerance) else {
                self.stats.unmatched += 1;
                continue;
            };
            let word = clean_headword(line);
            let gloss_list = split_glosses(gloss_text);
            if !accept_headword(word) || gloss_list.is_empty() {
                self.stats.rejected += 1;
                continue;
            }
            let pronunciation = pronunciations
                .nearest(y, self.config.row_tolerance)
                .and_then(|p| clean_pronunciation(p, self.config));
            self.accumulate(word, gloss_list, pronunciation);
        }

        self.stats.pages += 1;
        debug!(
            "page {}: {} headwords, {} unmatched, {} rejected",
            page.number,
            self.stats.headwords - before.headwords,
            self.stats.unmatched - before.unmatched,
            self.stats.rejected - before.rejected
        );
    }

    fn accumulate(&mut self, word: &str, glosses: Vec<String>, pronunciation: Option<String>) {
        let idx = match self.positions.get(word) {
            Some(idx) => *idx,
            None => {
                self.positions.insert(word.to_string(), self.rows.len());
                self.rows.push((word.to_string(), Gloss::default()));
                self.rows.len() - 1
            }
        };
        merge_gloss(&mut self.rows[idx].1, Gloss {
            glosses,
            pronunciation,
        });
    }

    /// Fold case-insensitive duplicates and build the record.
    pub fn finish(self) -> Extraction {
        let mut stats = self.stats;
        stats.distinct = self.rows.len();

        let mut folded: Vec<(String, Gloss)> = Vec::new();
        let mut by_key: HashMap<String, usize> = HashMap::new();
        for (word, gloss) in self.rows {
            let key = fold_case(&word);
            match by_key.get(&key) {
                Some(idx) => {
                    let (canonical, existing) = &mut folded[*idx];
                    if has_lowercase(&word) && !has_lowercase(canonical) {
                        *canonical = word;
                    }
                    merge_gloss(existing, gloss);
                }
                None => {
                    by_key.insert(key, folded.len());
                    folded.push((word, gloss));
                }
            }
        }

        Extraction {
            record: folded.into_iter().collect(),
            stats,
        }
    }
}

/// Union glosses (first-seen order) and keep the first pronunciation.
fn merge_gloss(into: &mut Gloss, from: Gloss) {
    for gloss in from.glosses {
        if !into.glosses.contains(&gloss) {
            into.glosses.push(gloss);
        }
    }
    if into.pronunciation.is_none() {
        into.pronunciation = from.pronunciation;
    }
}

/// Extract every page in order.
pub fn extract(config: &LayoutConfig, pages: &[Page]) -> Extraction {
    let mut extractor = TableExtractor::new(config);
    for page in pages {
        extractor.add_page(page);
    }
    extractor.finish()
}
