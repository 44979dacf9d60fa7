//! Extract clean target-language meanings from raw dictionary definitions.
//!
//! StarDict definitions mix Armenian headword text, Russian meanings, list
//! numbering, markup and usage examples. The normalizer recovers the short
//! meanings and sets the usage example aside. It is a heuristic: the goal is
//! reasonable precision on well-formed entries.
//!
//! # How it works
//! 1. Strip markup and split off the usage example at the separator (`◊`).
//! 2. Split the remaining text on list numbering (`1. `, `2. `).
//! 3. Per chunk: drop word-class markers (`գ.`), cut at the first Armenian
//!    character, drop bracketed notes, split on `;`, `,` and line breaks,
//!    and collect runs of Cyrillic or Latin letters.
//! 4. Reject candidates that are too short, have no target letters, look like
//!    a sentence, or have too many words.
//! 5. Lowercase and deduplicate, keeping first-seen order.
//! 6. If nothing survived, fall back to any target-script run in the text.
//!
//! Every rule is a public function so it can be tested on its own.
//!
//! # Example
//! ```
//! use vocab_clean::{Normalizer, NormalizerConfig};
//!
//! # fn main() -> anyhow::Result<()> {
//! let normalizer = Normalizer::new(&NormalizerConfig::default())?;
//! let out = normalizer.normalize("1. գ. Нация. ◊ example text");
//! assert_eq!(out.meanings, vec!["нация"]);
//! assert_eq!(out.usage.as_deref(), Some("example text"));
//! # Ok(()) }
//! ```
//!
//! For a runnable demo, see `cargo run -p vocab-clean --example clean -- '<text>'`.

use std::collections::HashSet;
use std::sync::LazyLock;

use anyhow::{Context, Result};
use regex::Regex;
use vocab_types::script::{contains_target_letter, is_armenian};

static MARKUP: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"<[^>]+>").expect("markup regex"));
static LIST_NUMBER: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(r"(?:^|\s)\d+\.\s*").expect("list number regex"));
static WORD_CLASS: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"(^|[^\x{0531}-\x{0556}\x{0561}-\x{0587}])[\x{0531}-\x{0556}\x{0561}-\x{0587}]{1,3}\.")
        .expect("word class regex")
});
static BRACKETED: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"\([^)]*\)|\[[^\]]*\]|\{[^}]*\}").expect("bracket regex")
});
// Letters match `script::is_target_letter`; runs never cross a line break.
static TARGET_RUN: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(
        r"[A-Za-z[\x{0400}-\x{04FF}&&\p{Alphabetic}]]+(?:[\p{Zs}\t'’\-]+[A-Za-z[\x{0400}-\x{04FF}&&\p{Alphabetic}]]+)*",
    )
    .expect("target run regex")
});

const BULLETS: [char; 3] = ['•', '▪', '▫'];

/// Tunable data for the normalizer.
#[derive(Clone, Debug)]
pub struct NormalizerConfig {
    /// Symbol separating meanings from the usage example.
    pub usage_separator: char,
    /// Minimum characters in a meaning.
    pub min_chars: usize,
    /// Maximum words in a meaning; longer candidates are sentences.
    pub max_words: usize,
    /// Regexes that mark a candidate as an example sentence.
    pub sentence_patterns: Vec<String>,
}

impl Default for NormalizerConfig {
    fn default() -> Self {
        Self {
            usage_separator: '◊',
            min_chars: 2,
            max_words: 4,
            sentence_patterns: vec![
                r"(?i)\b(это|является|являются)\b".into(),
                r"(?i)^(я|ты|он|она|оно|мы|вы|они)\s".into(),
                r"(?i)\b(is|are|was|were)\b".into(),
            ],
        }
    }
}

/// Meanings and usage example recovered from one definition.
#[derive(Clone, Debug, Default, Eq, PartialEq)]
pub struct Normalized {
    pub meanings: Vec<String>,
    pub usage: Option<String>,
}

/// Compiled normalizer.
#[derive(Clone, Debug)]
pub struct Normalizer {
    usage_separator: char,
    min_chars: usize,
    max_words: usize,
    sentence_patterns: Vec<Regex>,
}

impl Normalizer {
    pub fn new(config: &NormalizerConfig) -> Result<Self> {
        let sentence_patterns = config
            .sentence_patterns
            .iter()
            .map(|p| Regex::new(p).with_context(|| format!("sentence pattern {p:?}")))
            .collect::<Result<_>>()?;
        Ok(Self {
            usage_separator: config.usage_separator,
            min_chars: config.min_chars,
            max_words: config.max_words,
            sentence_patterns,
        })
    }

    pub fn normalize(&self, raw: &str) -> Normalized {
        let text = strip_markup(raw);
        let (meanings_part, usage) = split_usage(&text, self.usage_separator);

        let mut seen = HashSet::new();
        let mut meanings = Vec::new();
        for chunk in split_numbered(meanings_part) {
            let unmarked = strip_word_class_markers(chunk);
            let cut = truncate_at_source_script(&unmarked);
            let plain = strip_bracketed(cut);
            for piece in plain.split([';', ',', '\n', '\r']) {
                for run in target_runs(piece) {
                    self.push_candidate(run, &mut seen, &mut meanings);
                }
            }
        }

        if meanings.is_empty() {
            for run in target_runs(meanings_part) {
                self.push_candidate(run, &mut seen, &mut meanings);
            }
        }

        Normalized {
            meanings,
            usage: usage.map(str::to_string),
        }
    }

    /// Whether `candidate` passes every rejection rule.
    pub fn accepts(&self, candidate: &str) -> bool {
        !is_too_short(candidate, self.min_chars)
            && !lacks_target_script(candidate)
            && !self.looks_like_sentence(candidate)
            && !exceeds_word_limit(candidate, self.max_words)
    }

    /// Matches one of the configured sentence patterns.
    pub fn looks_like_sentence(&self, candidate: &str) -> bool {
        self.sentence_patterns.iter().any(|re| re.is_match(candidate))
    }

    fn push_candidate(&self, run: &str, seen: &mut HashSet<String>, out: &mut Vec<String>) {
        let candidate = collapse_whitespace(run);
        if !self.accepts(&candidate) {
            return;
        }
        let lowered = candidate.to_lowercase();
        if seen.insert(lowered.clone()) {
            out.push(lowered);
        }
    }
}

/// Trim and join words with single spaces.
pub fn collapse_whitespace(text: &str) -> String {
    text.split_whitespace().collect::<Vec<_>>().join(" ")
}

/// Remove markup tags and decorative bullets.
pub fn strip_markup(text: &str) -> String {
    MARKUP
        .replace_all(text, "")
        .chars()
        .filter(|c| !BULLETS.contains(c))
        .collect()
}

/// Split at the first `separator`: meanings before, trimmed usage after.
pub fn split_usage(text: &str, separator: char) -> (&str, Option<&str>) {
    match text.split_once(separator) {
        Some((meanings, usage)) => {
            let usage = usage.trim();
            (meanings, (!usage.is_empty()).then_some(usage))
        }
        None => (text, None),
    }
}

/// Split on list numbering, dropping empty chunks.
pub fn split_numbered(text: &str) -> Vec<&str> {
    LIST_NUMBER
        .split(text)
        .map(str::trim)
        .filter(|chunk| !chunk.is_empty())
        .collect()
}

/// Remove short Armenian abbreviations such as `գ.` or `բայ.`.
pub fn strip_word_class_markers(chunk: &str) -> String {
    WORD_CLASS.replace_all(chunk, "$1").into_owned()
}

/// Everything before the first Armenian character.
pub fn truncate_at_source_script(chunk: &str) -> &str {
    match chunk.char_indices().find(|(_, c)| is_armenian(*c)) {
        Some((idx, _)) => &chunk[..idx],
        None => chunk,
    }
}

/// Remove `(...)`, `[...]` and `{...}` notes.
pub fn strip_bracketed(text: &str) -> String {
    BRACKETED.replace_all(text, "").into_owned()
}

/// Contiguous runs of Cyrillic/Latin letters, allowing inner spaces, hyphens
/// and apostrophes.
pub fn target_runs(text: &str) -> impl Iterator<Item = &str> + '_ {
    TARGET_RUN.find_iter(text).map(|m| m.as_str())
}

pub fn is_too_short(candidate: &str, min_chars: usize) -> bool {
    candidate.chars().count() < min_chars
}

pub fn lacks_target_script(candidate: &str) -> bool {
    !contains_target_letter(candidate)
}

pub fn exceeds_word_limit(candidate: &str, max_words: usize) -> bool {
    candidate.split_whitespace().count() > max_words
}
