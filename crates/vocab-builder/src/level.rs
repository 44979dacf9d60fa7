//! Difficulty tiers from a word-complexity score.

use vocab_types::{LeveledVocabulary, Tier, VocabularyEntry};

use crate::config::LevelConfig;

/// Heuristic difficulty of a headword; higher is harder.
pub fn complexity(word: &str, has_pronunciation: bool, config: &LevelConfig) -> f64 {
    let chars = word.chars().count();
    let mut score = chars as f64 * config.length_weight;
    for suffix in &config.abstract_suffixes {
        if word.ends_with(suffix.as_str()) {
            score += config.suffix_weight;
        }
    }
    if word.contains('-') || chars > config.long_word_chars {
        score += config.compound_weight;
    }
    if has_pronunciation {
        score -= config.pronunciation_bonus;
    }
    score
}

fn entry_complexity(entry: &VocabularyEntry, config: &LevelConfig) -> f64 {
    let has_pronunciation = entry
        .pronunciation
        .as_deref()
        .is_some_and(|p| !p.is_empty());
    complexity(&entry.word, has_pronunciation, config)
}

/// Sort by ascending complexity and fill the tiers in order.
///
/// Each tier takes `min(len / 4, per_tier_cap)` entries; the rest go round
/// robin by sorted position. Equal scores keep their input order.
pub fn assign_levels(entries: Vec<VocabularyEntry>, config: &LevelConfig) -> LeveledVocabulary {
    let mut scored: Vec<(f64, VocabularyEntry)> = entries
        .into_iter()
        .map(|entry| (entry_complexity(&entry, config), entry))
        .collect();
    scored.sort_by(|a, b| a.0.total_cmp(&b.0));

    let per_tier = (scored.len() / Tier::ALL.len()).min(config.per_tier_cap);
    let mut leveled = LeveledVocabulary::new();
    for (position, (_, entry)) in scored.into_iter().enumerate() {
        let tier = Tier::ALL
            .into_iter()
            .find(|tier| leveled.tier(*tier).len() < per_tier)
            .unwrap_or_else(|| Tier::from_index(position));
        leveled.push(tier, entry);
    }
    leveled
}
