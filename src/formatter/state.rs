//! Per-document transducer state

use std::path::{Path, PathBuf};

/// What the transducer needs to remember between tokens of one document.
///
/// A fresh state is used for every document, so an unterminated code block or heading
/// never leaks into the next one.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct TransducerState {
    in_code: bool,
    open_sections: usize,
    /// Files currently being included, innermost last
    includes: Vec<PathBuf>,
}

impl TransducerState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn in_code(&self) -> bool {
        self.in_code
    }

    pub fn open_sections(&self) -> usize {
        self.open_sections
    }

    pub(crate) fn start_code(&mut self) {
        self.in_code = true;
    }

    pub(crate) fn end_code(&mut self) {
        self.in_code = false;
    }

    /// Close sections down to `level - 1`, then open up to `level`
    pub(crate) fn enter_heading(&mut self, level: usize) -> String {
        let level = level.max(1);
        let mut out = String::new();
        while self.open_sections >= level {
            out.push_str("</section>");
            self.open_sections -= 1;
        }
        while self.open_sections < level {
            out.push_str("<section>");
            self.open_sections += 1;
        }
        out
    }

    pub(crate) fn close_sections(&mut self) -> String {
        let out = "</section>".repeat(self.open_sections);
        self.open_sections = 0;
        out
    }

    pub(crate) fn is_including(&self, path: &Path) -> bool {
        self.includes.iter().any(|p| p == path)
    }

    pub(crate) fn push_include(&mut self, path: PathBuf) {
        self.includes.push(path);
    }

    pub(crate) fn pop_include(&mut self) {
        self.includes.pop();
    }
}
