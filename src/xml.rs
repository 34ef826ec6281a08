//! Markup output helpers
//!
//! [`build_tag`] writes a single element inline, the way cross-reference links are spliced
//! into rendered text. [`Element`] is a small tree for the block output (the class
//! hierarchy), with the conventional pretty-printing indentation.

use crate::markup::escape::{escape, escape_attribute};

/// `<name a="b">data</name>`, or `<name a="b"/>` without data. `data` is written as is.
pub fn build_tag(name: &str, attrs: &[(&str, &str)], data: Option<&str>) -> String {
    let mut out = format!("<{name}");
    for (key, value) in attrs {
        out.push_str(&format!(" {key}=\"{}\"", escape_attribute(value)));
    }
    match data {
        Some(data) => out.push_str(&format!(">{data}</{name}>")),
        None => out.push_str("/>"),
    }
    out
}

/// An element with text and tail, as in a classic XML element tree
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Element {
    pub name: String,
    pub attrs: Vec<(String, String)>,
    /// Text before the first child
    pub text: Option<String>,
    /// Text after the closing tag
    pub tail: Option<String>,
    pub children: Vec<Element>,
}

fn is_blank(text: &Option<String>) -> bool {
    text.as_deref().map_or(true, |t| t.trim().is_empty())
}

impl Element {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            ..Self::default()
        }
    }

    pub fn with_attr(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.attrs.push((key.into(), value.into()));
        self
    }

    pub fn with_text(mut self, text: impl Into<String>) -> Self {
        self.text = Some(text.into());
        self
    }

    pub fn push(&mut self, child: Element) {
        self.children.push(child);
    }

    /// Insert newlines and two-space indentation into whitespace-only text and tails.
    ///
    /// Children are indented one level deeper than their parent; the last child's tail
    /// brings the closing tag back to the parent's level.
    pub fn indent(&mut self, level: usize) {
        let i = format!("\n{}", "  ".repeat(level));
        if self.children.is_empty() {
            if level > 0 && is_blank(&self.tail) {
                self.tail = Some(i);
            }
            return;
        }

        if is_blank(&self.text) {
            self.text = Some(format!("{i}  "));
        }
        if is_blank(&self.tail) {
            self.tail = Some(i.clone());
        }
        for child in &mut self.children {
            child.indent(level + 1);
        }
        if let Some(last) = self.children.last_mut() {
            if is_blank(&last.tail) {
                last.tail = Some(i);
            }
        }
    }

    /// Serialize, escaping text and attribute values
    pub fn to_markup(&self) -> String {
        let mut out = String::new();
        self.write(&mut out);
        out
    }

    fn write(&self, out: &mut String) {
        out.push('<');
        out.push_str(&self.name);
        for (key, value) in &self.attrs {
            out.push_str(&format!(" {key}=\"{}\"", escape_attribute(value)));
        }
        if self.text.is_none() && self.children.is_empty() {
            out.push_str("/>");
        } else {
            out.push('>');
            if let Some(text) = &self.text {
                out.push_str(&escape(text));
            }
            for child in &self.children {
                child.write(out);
            }
            out.push_str(&format!("</{}>", self.name));
        }
        if let Some(tail) = &self.tail {
            out.push_str(&escape(tail));
        }
    }
}
