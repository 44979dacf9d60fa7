//! Build a leveled Armenian vocabulary from two dictionaries.
//!
//! An Armenian-Russian StarDict dictionary supplies translations, a scanned
//! Armenian-English PDF supplies glosses and pronunciations. Headwords present
//! in both are merged, scored for complexity and split into four tiers
//! (`A1`, `A2`, `B1`, `B2`) written to `vocabulary.json`.
//!
//! Each parsed source is cached as CSV under the cache directory; later runs
//! reuse the caches unless told otherwise.
//!
//! # Example
//! ```no_run
//! use vocab_builder::{BuildConfig, run};
//! use vocab_layout::PdfToText;
//!
//! # fn main() -> anyhow::Result<()> {
//! let config = BuildConfig::default();
//! let document = PdfToText::new(&config.pdf_path);
//! let vocabulary = run(&config, &document)?;
//! println!("{} words", vocabulary.len());
//! # Ok(()) }
//! ```

pub mod cache;
pub mod config;
pub mod error;
pub mod level;
pub mod merge;
pub mod pipeline;
pub mod sources;

pub use cache::{CacheFormat, Loaded, load_or_parse};
pub use config::{BuildConfig, LevelConfig};
pub use error::{BuildError, SourceKind};
pub use level::{assign_levels, complexity};
pub use merge::{MergeStats, Merged, merge};
pub use pipeline::{build, run, write_output};
