use std::fmt;
use std::io;
use std::path::PathBuf;

use thiserror::Error;
use vocab_layout::DocumentError;

/// Which dictionary a validation failure refers to.
#[derive(Clone, Copy, Debug, Eq, PartialEq)]
pub enum SourceKind {
    Translations,
    Glosses,
}

impl fmt::Display for SourceKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            SourceKind::Translations => "Armenian-Russian StarDict",
            SourceKind::Glosses => "Armenian-English PDF",
        })
    }
}

#[derive(Debug, Error)]
pub enum BuildError {
    #[error(
        "only extracted {found} entries from the {dictionary} dictionary, \
         expected at least {min}; check parsing logic"
    )]
    TooFewEntries {
        dictionary: SourceKind,
        found: usize,
        min: usize,
    },
    #[error("no source files found; check the configured paths")]
    NoSources,
    #[error("no vocabulary entries after merging; check the source files")]
    EmptyMerge,
    #[error("missing dependency: {0}")]
    DependencyMissing(String),
    #[error(transparent)]
    Document(DocumentError),
    #[error(transparent)]
    Reader(#[from] anyhow::Error),
    #[error("cache {}: {error}", .path.display())]
    Cache {
        path: PathBuf,
        #[source]
        error: csv::Error,
    },
    #[error("writing {}: {error}", .path.display())]
    Output {
        path: PathBuf,
        #[source]
        error: io::Error,
    },
    #[error("serializing vocabulary: {0}")]
    Json(#[from] serde_json::Error),
}

impl From<DocumentError> for BuildError {
    fn from(err: DocumentError) -> Self {
        match err {
            DocumentError::MissingTool { .. } => BuildError::DependencyMissing(err.to_string()),
            other => BuildError::Document(other),
        }
    }
}
