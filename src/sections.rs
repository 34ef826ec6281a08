//! Sections ordering
//!
//! An ordered list of sections, each listing its symbols in order. Pages use it to link
//! to the next and previous page: functions by C symbol within their section, types and
//! doc sections by section title.
//!
//! ```text
//! - title: GtkWidget
//!   symbols: [gtk_widget_show, gtk_widget_hide]
//! - title: GtkContainer
//!   symbols: [gtk_container_add]
//! ```

use std::collections::HashMap;
use std::path::Path;

use serde::{Deserialize, Serialize};

use crate::config;
use crate::error::Result;

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SectionDecl {
    pub title: String,
    #[serde(default)]
    pub symbols: Vec<String>,
}

/// Serializable sections ordering
pub type SectionsDecl = Vec<SectionDecl>;

#[derive(Debug, Clone, Default)]
pub struct SectionsIndex {
    sections: Vec<SectionDecl>,
    by_title: HashMap<String, usize>,
    /// Symbol to (section, position), last declaration wins
    symbols: HashMap<String, (usize, usize)>,
}

impl SectionsIndex {
    pub fn new(sections: impl IntoIterator<Item = SectionDecl>) -> Self {
        let mut index = SectionsIndex::default();
        for section in sections {
            let position = index.sections.len();
            index.by_title.insert(section.title.clone(), position);
            for (i, symbol) in section.symbols.iter().enumerate() {
                index.symbols.insert(symbol.clone(), (position, i));
            }
            index.sections.push(section);
        }
        index
    }

    /// Load a YAML or JSON sections list
    pub fn load(path: &Path) -> Result<Self> {
        let decl: SectionsDecl = config::read_structured(path)?;
        Ok(Self::new(decl))
    }

    pub fn section(&self, title: &str) -> Option<&SectionDecl> {
        self.by_title.get(title).map(|&i| &self.sections[i])
    }

    pub fn next_section(&self, title: &str) -> Option<&SectionDecl> {
        let &i = self.by_title.get(title)?;
        self.sections.get(i + 1)
    }

    pub fn previous_section(&self, title: &str) -> Option<&SectionDecl> {
        let &i = self.by_title.get(title)?;
        i.checked_sub(1).map(|i| &self.sections[i])
    }

    /// The symbol after `symbol` in its section
    pub fn next_symbol(&self, symbol: &str) -> Option<&str> {
        let &(section, i) = self.symbols.get(symbol)?;
        self.sections[section].symbols.get(i + 1).map(String::as_str)
    }

    /// The symbol before `symbol` in its section
    pub fn previous_symbol(&self, symbol: &str) -> Option<&str> {
        let &(section, i) = self.symbols.get(symbol)?;
        let i = i.checked_sub(1)?;
        self.sections[section].symbols.get(i).map(String::as_str)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn index() -> SectionsIndex {
        SectionsIndex::new([
            SectionDecl {
                title: "GtkWidget".into(),
                symbols: vec!["gtk_widget_show".into(), "gtk_widget_hide".into()],
            },
            SectionDecl {
                title: "GtkContainer".into(),
                symbols: vec!["gtk_container_add".into()],
            },
        ])
    }

    #[test]
    fn test_symbols_stay_within_their_section() {
        let index = index();
        assert_eq!(index.next_symbol("gtk_widget_show"), Some("gtk_widget_hide"));
        assert_eq!(index.next_symbol("gtk_widget_hide"), None);
        assert_eq!(index.previous_symbol("gtk_widget_hide"), Some("gtk_widget_show"));
        assert_eq!(index.previous_symbol("gtk_container_add"), None);
        assert_eq!(index.next_symbol("unknown"), None);
    }

    #[test]
    fn test_section_order() {
        let index = index();
        assert_eq!(index.next_section("GtkWidget").unwrap().title, "GtkContainer");
        assert!(index.next_section("GtkContainer").is_none());
        assert_eq!(index.previous_section("GtkContainer").unwrap().title, "GtkWidget");
        assert!(index.previous_section("GtkWidget").is_none());
    }

    #[test]
    fn test_load_yaml() {
        let file = tempfile::Builder::new().suffix(".yaml").tempfile().unwrap();
        std::fs::write(
            file.path(),
            "- title: GtkWidget\n  symbols: [gtk_widget_show]\n- title: Misc\n",
        )
        .unwrap();
        let index = SectionsIndex::load(file.path()).unwrap();
        assert!(index.section("Misc").unwrap().symbols.is_empty());
        assert_eq!(index.next_section("GtkWidget").unwrap().title, "Misc");
    }
}
