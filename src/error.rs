//! Error types
//!
//! Only configuration problems surface as errors. Everything that can go wrong while
//! rendering a single docstring (unknown identifiers, missing include files, incomplete
//! external references) is handled in place and never aborts a run.

use std::path::PathBuf;

use crate::markup::grammar::GrammarError;

/// Result alias used across the crate
pub type Result<T> = std::result::Result<T, Error>;

#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The docstring grammar could not be compiled
    #[error(transparent)]
    Grammar(#[from] GrammarError),

    /// The requested output language has no formatter
    #[error("Unsupported language: {0}")]
    UnsupportedLanguage(String),

    /// A configuration, repository or sections file could not be read
    #[error("could not read {}: {source}", path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("invalid YAML in {}: {source}", path.display())]
    Yaml {
        path: PathBuf,
        #[source]
        source: serde_yaml::Error,
    },

    #[error("invalid JSON in {}: {source}", path.display())]
    Json {
        path: PathBuf,
        #[source]
        source: serde_json::Error,
    },

    /// A qualified `Ns.Name` did not resolve to an entity of the repository
    #[error("unknown entity: {0}")]
    UnknownEntity(String),
}
