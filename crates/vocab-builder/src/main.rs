use std::env;
use std::path::PathBuf;
use std::time::Instant;

use clap::Parser;
use stardict_db::LoadMode;
use tracing::info;
use tracing_subscriber::EnvFilter;
use vocab_builder::BuildConfig;
use vocab_layout::PdfToText;

#[derive(Parser, Debug)]
#[command(name = "build-vocabulary")]
#[command(about = "Build vocabulary.json from the Armenian-Russian and Armenian-English dictionaries")]
struct Cli {
    /// Re-parse the StarDict dictionary instead of reading its cache.
    #[arg(long)]
    no_cache_russian: bool,
    /// Re-parse the PDF dictionary instead of reading its cache.
    #[arg(long)]
    no_cache_english: bool,
    /// Ignore both caches.
    #[arg(long)]
    no_cache: bool,
}

fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();
    init_tracing();

    let config = load_config(&cli);
    info!(
        "StarDict: {}/{} (mode: {:?})",
        config.stardict_dir.display(),
        config.stardict_stem,
        config.stardict_mode
    );
    info!("PDF: {}", config.pdf_path.display());
    info!("cache dir: {}", config.cache_dir.display());
    if !config.use_translation_cache {
        info!("ignoring the Russian cache");
    }
    if !config.use_gloss_cache {
        info!("ignoring the English cache");
    }

    let start = Instant::now();
    let document = PdfToText::new(&config.pdf_path);
    let vocabulary = vocab_builder::run(&config, &document)?;
    info!(
        "built {} words in {} ms",
        vocabulary.len(),
        start.elapsed().as_millis()
    );
    Ok(())
}

fn load_config(cli: &Cli) -> BuildConfig {
    let mut config = BuildConfig::default();
    if let Some(dir) = env_path("STARDICT_DIR") {
        config.stardict_dir = dir;
    }
    if let Ok(stem) = env::var("STARDICT_STEM") {
        config.stardict_stem = stem;
    }
    if let Some(mode) = env::var("STARDICT_LOAD_MODE")
        .ok()
        .as_deref()
        .and_then(parse_load_mode)
    {
        config.stardict_mode = mode;
    }
    if let Some(path) = env_path("PDF_DICT_PATH") {
        config.pdf_path = path;
    }
    if let Some(dir) = env_path("CACHE_DIR") {
        config.cache_dir = dir;
    }
    if let Some(path) = env_path("OUTPUT_PATH") {
        config.output_path = path;
    }
    config.use_translation_cache = !(cli.no_cache || cli.no_cache_russian);
    config.use_gloss_cache = !(cli.no_cache || cli.no_cache_english);
    config
}

fn env_path(key: &str) -> Option<PathBuf> {
    env::var(key)
        .ok()
        .filter(|v| !v.is_empty())
        .map(PathBuf::from)
}

fn parse_load_mode(raw: &str) -> Option<LoadMode> {
    match raw.to_ascii_lowercase().as_str() {
        "mmap" => Some(LoadMode::Mmap),
        "owned" => Some(LoadMode::Owned),
        _ => None,
    }
}

/// Directives from `RUST_LOG` when they parse, `info` otherwise.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|raw| EnvFilter::try_new(raw).ok())
        .unwrap_or_else(|| EnvFilter::new("info"))
}

fn init_tracing() {
    let directives = env::var(EnvFilter::DEFAULT_ENV).ok();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(directives.as_deref()))
        .with_target(false)
        .with_level(true)
        .init();
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::level_filters::LevelFilter;

    #[test]
    fn per_target_directives_survive() {
        let filter = log_filter(Some("vocab_layout=debug"));
        assert_eq!(filter.to_string(), "vocab_layout=debug");
        assert_eq!(filter.max_level_hint(), Some(LevelFilter::DEBUG));
    }

    #[test]
    fn falls_back_to_info() {
        assert_eq!(log_filter(None).to_string(), "info");
        assert_eq!(log_filter(Some("vocab_layout=loud")).to_string(), "info");
    }

    #[test]
    fn cache_flags_disable_their_caches() {
        let cli = Cli::parse_from(["build-vocabulary", "--no-cache-english"]);
        let config = load_config(&cli);
        assert!(config.use_translation_cache);
        assert!(!config.use_gloss_cache);

        let cli = Cli::parse_from(["build-vocabulary", "--no-cache"]);
        let config = load_config(&cli);
        assert!(!config.use_translation_cache);
        assert!(!config.use_gloss_cache);
    }
}
