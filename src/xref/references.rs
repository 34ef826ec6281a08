//! Installed gtk-doc references
//!
//! Each package documented with gtk-doc installs a directory under the reference root
//! (`/usr/share/gtk-doc/html/gtk3/`) holding an `index.sgml` file:
//!
//! ```text
//! <ONLINE href="https://developer.gnome.org/gtk3/stable/">
//! <ANCHOR id="GtkWidget" href="gtk3/GtkWidget.html">
//! ```
//!
//! The map is read once, up front. Unreadable directories are skipped.

use std::collections::HashMap;
use std::io::BufRead;
use std::path::{Path, PathBuf};

use once_cell::sync::Lazy;
use regex::Regex;

static PACKAGE_VERSION: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"-\d+\.\d+$").expect("package version pattern is valid"));

/// One package's reference directory
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct PackageReference {
    pub dir: PathBuf,
    /// Base URL of the online copy, from the `<ONLINE` line
    pub online: Option<String>,
    /// Anchor id to `package/page.html#anchor` style href
    pub anchors: HashMap<String, String>,
}

impl PackageReference {
    /// Parse an `index.sgml` stream
    pub fn parse(dir: impl Into<PathBuf>, reader: impl BufRead) -> std::io::Result<Self> {
        let mut reference = PackageReference {
            dir: dir.into(),
            ..Self::default()
        };
        for line in reader.lines() {
            let line = line?;
            let fields: Vec<&str> = line.split('"').collect();
            if line.starts_with("<ONLINE") {
                if let Some(url) = fields.get(1) {
                    reference.online = Some(url.to_string());
                }
            } else if line.starts_with("<ANCHOR") {
                if let (Some(id), Some(href)) = (fields.get(1), fields.get(3)) {
                    reference.anchors.insert(id.to_string(), href.to_string());
                }
            }
        }
        Ok(reference)
    }
}

/// A reference found for a namespace's packages
#[derive(Debug, Clone, Copy)]
pub struct FoundReference<'a> {
    pub package: &'a str,
    pub reference: &'a PackageReference,
    /// False when found only after dropping the `-X.Y` version suffix
    pub exact: bool,
}

/// Package name to reference directory
#[derive(Debug, Clone, Default)]
pub struct ReferenceMap {
    packages: HashMap<String, PackageReference>,
}

impl ReferenceMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Index every `<root>/<package>/index.sgml`
    pub fn load(root: &Path) -> Self {
        let mut map = ReferenceMap::new();
        let entries = match std::fs::read_dir(root) {
            Ok(entries) => entries,
            Err(err) => {
                tracing::debug!(root = %root.display(), %err, "no gtk-doc references");
                return map;
            }
        };

        for entry in entries.flatten() {
            let dir = entry.path();
            let Some(package) = dir.file_name().and_then(|n| n.to_str()).map(str::to_string)
            else {
                continue;
            };
            let index = dir.join("index.sgml");
            let parsed = std::fs::File::open(&index)
                .and_then(|file| PackageReference::parse(&dir, std::io::BufReader::new(file)));
            match parsed {
                Ok(reference) => map.insert(package, reference),
                Err(err) => tracing::debug!(index = %index.display(), %err, "skipping reference"),
            }
        }
        tracing::debug!(packages = map.packages.len(), "loaded gtk-doc references");
        map
    }

    pub fn insert(&mut self, package: impl Into<String>, reference: PackageReference) {
        self.packages.insert(package.into(), reference);
    }

    pub fn get(&self, package: &str) -> Option<&PackageReference> {
        self.packages.get(package)
    }

    pub fn is_empty(&self) -> bool {
        self.packages.is_empty()
    }

    /// The reference of the first package found, exactly or without its version suffix
    pub fn find<'a>(&'a self, packages: &'a [String]) -> Option<FoundReference<'a>> {
        packages.iter().find_map(|package| {
            if let Some(reference) = self.packages.get(package) {
                return Some(FoundReference {
                    package,
                    reference,
                    exact: true,
                });
            }
            let unversioned = PACKAGE_VERSION.replace(package, "");
            self.packages
                .get(unversioned.as_ref())
                .map(|reference| FoundReference {
                    package,
                    reference,
                    exact: false,
                })
        })
    }
}
