use std::path::PathBuf;

use stardict_db::{DictPaths, LoadMode};
use vocab_clean::NormalizerConfig;
use vocab_layout::LayoutConfig;

pub const DEFAULT_STARDICT_DIR: &str = "vocabulary_sources/ArmRus_1.28";
pub const DEFAULT_STARDICT_STEM: &str = "ArmRus_1.28";
pub const DEFAULT_PDF_PATH: &str = "vocabulary_sources/dictionary-armenian-english ocr.pdf";
pub const DEFAULT_CACHE_DIR: &str = "scripts/tmp";
pub const DEFAULT_OUTPUT_PATH: &str = "vocabulary.json";
pub const MIN_ENTRIES_PER_SOURCE: usize = 700;
pub const MAX_PER_TIER: usize = 2500;

const TRANSLATION_CACHE: &str = "armenian_russian.csv";
const GLOSS_CACHE: &str = "armenian_english.csv";

/// Everything the pipeline needs, passed into [`crate::run`].
#[derive(Clone, Debug)]
pub struct BuildConfig {
    pub stardict_dir: PathBuf,
    pub stardict_stem: String,
    pub stardict_mode: LoadMode,
    pub pdf_path: PathBuf,
    pub cache_dir: PathBuf,
    pub output_path: PathBuf,
    /// Trust `armenian_russian.csv` when present.
    pub use_translation_cache: bool,
    /// Trust `armenian_english.csv` when present.
    pub use_gloss_cache: bool,
    /// Fewer usable entries than this from a present source is fatal.
    pub min_entries_per_source: usize,
    /// Stop merging after this many entries.
    pub max_entries: Option<usize>,
    pub normalizer: NormalizerConfig,
    pub layout: LayoutConfig,
    pub levels: LevelConfig,
}

impl Default for BuildConfig {
    fn default() -> Self {
        Self {
            stardict_dir: PathBuf::from(DEFAULT_STARDICT_DIR),
            stardict_stem: DEFAULT_STARDICT_STEM.to_string(),
            stardict_mode: LoadMode::Mmap,
            pdf_path: PathBuf::from(DEFAULT_PDF_PATH),
            cache_dir: PathBuf::from(DEFAULT_CACHE_DIR),
            output_path: PathBuf::from(DEFAULT_OUTPUT_PATH),
            use_translation_cache: true,
            use_gloss_cache: true,
            min_entries_per_source: MIN_ENTRIES_PER_SOURCE,
            max_entries: None,
            normalizer: NormalizerConfig::default(),
            layout: LayoutConfig::default(),
            levels: LevelConfig::default(),
        }
    }
}

impl BuildConfig {
    pub fn stardict_paths(&self) -> DictPaths {
        DictPaths::new(&self.stardict_dir, &self.stardict_stem)
    }

    pub fn translation_cache(&self) -> PathBuf {
        self.cache_dir.join(TRANSLATION_CACHE)
    }

    pub fn gloss_cache(&self) -> PathBuf {
        self.cache_dir.join(GLOSS_CACHE)
    }
}

/// Weights of the complexity score and the tier cap.
#[derive(Clone, Debug)]
pub struct LevelConfig {
    pub per_tier_cap: usize,
    /// Score per character of the headword.
    pub length_weight: f64,
    /// Suffixes marking abstract nouns and derived adjectives.
    pub abstract_suffixes: Vec<String>,
    pub suffix_weight: f64,
    /// Added for hyphenated words or words longer than `long_word_chars`.
    pub compound_weight: f64,
    pub long_word_chars: usize,
    /// Subtracted when the entry has a pronunciation.
    pub pronunciation_bonus: f64,
}

impl Default for LevelConfig {
    fn default() -> Self {
        Self {
            per_tier_cap: MAX_PER_TIER,
            length_weight: 0.1,
            abstract_suffixes: ["ություն", "ական", "ային", "ավոր", "ականություն"]
                .map(String::from)
                .to_vec(),
            suffix_weight: 2.0,
            compound_weight: 1.5,
            long_word_chars: 15,
            pronunciation_bonus: 0.5,
        }
    }
}
