//! Formatter configuration
//!
//! Options that shape how docstrings are rendered. They can be built in code with the
//! `with_*` methods or loaded from a YAML or JSON file:
//!
//! ```text
//! language: python
//! include_paths: [docs/snippets]
//! resolve_implicit_links: true
//! link_to_gtk_doc: true
//! online: true
//! ```
//!
//! The language is kept as text here and checked when a formatter is built, so an
//! unsupported language fails the run before any document is processed.

use std::path::{Path, PathBuf};

use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

pub const DEFAULT_REFERENCE_ROOT: &str = "/usr/share/gtk-doc/html";

fn default_language() -> String {
    "c".into()
}

fn default_reference_root() -> PathBuf {
    PathBuf::from(DEFAULT_REFERENCE_ROOT)
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct FormatterConfig {
    /// `c`, `python` or `gjs`, case-insensitive
    #[serde(default = "default_language")]
    pub language: String,
    /// Directories searched by `{{ path }}` includes, in order
    pub include_paths: Vec<PathBuf>,
    /// Link gtk-doc references to their online location
    pub online: bool,
    /// Link foreign entities to installed gtk-doc references
    pub link_to_gtk_doc: bool,
    /// Try every word of plain text as a type or symbol reference
    pub resolve_implicit_links: bool,
    /// Directory holding one gtk-doc reference directory per package
    #[serde(default = "default_reference_root")]
    pub reference_root: PathBuf,
}

impl Default for FormatterConfig {
    fn default() -> Self {
        Self {
            language: default_language(),
            include_paths: Vec::new(),
            online: false,
            link_to_gtk_doc: false,
            resolve_implicit_links: false,
            reference_root: default_reference_root(),
        }
    }
}

impl FormatterConfig {
    pub fn with_language(mut self, language: impl Into<String>) -> Self {
        self.language = language.into();
        self
    }

    pub fn with_include_path(mut self, path: impl Into<PathBuf>) -> Self {
        self.include_paths.push(path.into());
        self
    }

    pub fn with_online(mut self, online: bool) -> Self {
        self.online = online;
        self
    }

    pub fn with_link_to_gtk_doc(mut self, link: bool) -> Self {
        self.link_to_gtk_doc = link;
        self
    }

    pub fn with_implicit_links(mut self, resolve: bool) -> Self {
        self.resolve_implicit_links = resolve;
        self
    }

    pub fn with_reference_root(mut self, root: impl Into<PathBuf>) -> Self {
        self.reference_root = root.into();
        self
    }

    /// Load from a `.json`, `.yaml` or `.yml` file
    pub fn load(path: &Path) -> Result<Self> {
        read_structured(path)
    }
}

/// Read a YAML or JSON file, picking the format from the extension (YAML by default)
pub fn read_structured<T: DeserializeOwned>(path: &Path) -> Result<T> {
    let source = std::fs::read_to_string(path).map_err(|source| Error::Io {
        path: path.to_path_buf(),
        source,
    })?;

    let is_json = path
        .extension()
        .and_then(|ext| ext.to_str())
        .is_some_and(|ext| ext.eq_ignore_ascii_case("json"));

    if is_json {
        serde_json::from_str(&source).map_err(|source| Error::Json {
            path: path.to_path_buf(),
            source,
        })
    } else {
        serde_yaml::from_str(&source).map_err(|source| Error::Yaml {
            path: path.to_path_buf(),
            source,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn test_defaults() {
        let config = FormatterConfig::default();
        assert_eq!(config.language, "c");
        assert!(config.include_paths.is_empty());
        assert_eq!(config.reference_root, PathBuf::from(DEFAULT_REFERENCE_ROOT));
    }

    #[test]
    fn test_partial_yaml_keeps_defaults() {
        let mut file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        writeln!(file, "language: Python\nresolve_implicit_links: true").unwrap();

        let config = FormatterConfig::load(file.path()).unwrap();
        assert_eq!(config.language, "Python");
        assert!(config.resolve_implicit_links);
        assert!(!config.online);
        assert_eq!(config.reference_root, PathBuf::from(DEFAULT_REFERENCE_ROOT));
    }

    #[test]
    fn test_json_by_extension() {
        let mut file = tempfile::Builder::new().suffix(".json").tempfile().unwrap();
        write!(file, r#"{{"language": "gjs", "include_paths": ["a", "b"]}}"#).unwrap();

        let config = FormatterConfig::load(file.path()).unwrap();
        assert_eq!(config.language, "gjs");
        assert_eq!(config.include_paths, vec![PathBuf::from("a"), PathBuf::from("b")]);
    }

    #[test]
    fn test_missing_file_is_an_io_error() {
        let err = FormatterConfig::load(Path::new("/nonexistent/girdoc.yaml")).unwrap_err();
        assert!(matches!(err, Error::Io { .. }));
    }
}
