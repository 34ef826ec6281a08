//! Docstring formatter
//!
//! Turns a documentation comment into page markup. The comment is scanned into
//! [`Markup`] tokens and each token is rendered by its handler:
//!
//! - paragraphs, line breaks, notes and headings become `<p>`, `<note>`, `<section>` and
//!   `<title>` elements; headings open and close nested sections by level
//! - `|[ ... ]|` becomes a `<code>` element, with a `mime` attribute when a known
//!   language is given
//! - `#Type`, `#Type:property`, `#Type::signal`, `%MEMBER` and `symbol()` become links
//!   when they resolve, and are left untouched otherwise
//! - `@param` becomes the parameter's display name in `<code>`
//! - `{{ file }}` is replaced by the formatted contents of the file
//!
//! The output of a document is always balanced: sections opened by headings are closed
//! after the final paragraph.

mod pages;
mod state;

use std::path::PathBuf;

use crate::config::FormatterConfig;
use crate::error::Result;
use crate::language::{code_mime_type, Language};
use crate::markup::escape::escape;
use crate::markup::{DocToken, DocstringScanner, Markup};
use crate::model::{EntityRef, Repository};
use crate::resolve::words::{self, Piece};
use crate::resolve::Resolver;
use crate::sections::SectionsIndex;
use crate::xref::{Linker, ReferenceMap};

pub use pages::Direction;
pub use state::TransducerState;

/// Formats docstrings of one repository for one output language
#[derive(Debug)]
pub struct DocFormatter<'r> {
    repo: &'r Repository,
    language: Language,
    config: FormatterConfig,
    scanner: DocstringScanner,
    resolver: Resolver<'r>,
    linker: Linker<'r>,
    sections: Option<SectionsIndex>,
}

impl<'r> DocFormatter<'r> {
    /// Fails on an unsupported language or a broken docstring grammar.
    ///
    /// With `link_to_gtk_doc` set, the gtk-doc references under the configured
    /// reference root are indexed here.
    pub fn new(repo: &'r Repository, config: FormatterConfig) -> Result<Self> {
        let language: Language = config.language.parse()?;
        let scanner = DocstringScanner::new()?;

        let mut linker = Linker::new(repo, language);
        if config.link_to_gtk_doc {
            let references = ReferenceMap::load(&config.reference_root);
            linker = linker.with_gtk_doc(references, config.online);
        }
        tracing::debug!(%language, namespace = %repo.current().name, "formatter ready");

        Ok(Self {
            repo,
            language,
            config,
            scanner,
            resolver: Resolver::new(repo),
            linker,
            sections: None,
        })
    }

    /// Enable next/previous navigation links
    pub fn with_sections(mut self, sections: SectionsIndex) -> Self {
        self.sections = Some(sections);
        self
    }

    pub fn language(&self) -> Language {
        self.language
    }

    pub fn repository(&self) -> &'r Repository {
        self.repo
    }

    pub fn resolver(&self) -> &Resolver<'r> {
        &self.resolver
    }

    pub fn linker(&self) -> &Linker<'r> {
        &self.linker
    }

    pub fn scanner(&self) -> &DocstringScanner {
        &self.scanner
    }

    /// Format the documentation of `owner`; a missing docstring formats to nothing
    pub fn format(&self, owner: Option<EntityRef>, doc: Option<&str>) -> String {
        let Some(doc) = doc else {
            return String::new();
        };
        let mut state = TransducerState::new();
        self.format_with_state(&mut state, owner, doc)
    }

    /// Format a whole document: paragraph wrapped (outside code), sections closed
    pub fn format_with_state(
        &self,
        state: &mut TransducerState,
        owner: Option<EntityRef>,
        doc: &str,
    ) -> String {
        let wrap = !state.in_code();
        let mut out = String::new();
        if wrap {
            out.push_str("<p>");
        }
        out.push_str(&self.format_inline(state, owner, doc));
        if wrap {
            // An unterminated `|[` is closed with the document
            if state.in_code() {
                state.end_code();
                out.push_str("</code><p>");
            }
            out.push_str("</p>");
        }
        out.push_str(&state.close_sections());
        out
    }

    /// Format a fragment without paragraph wrapping
    pub fn format_inline(
        &self,
        state: &mut TransducerState,
        owner: Option<EntityRef>,
        text: &str,
    ) -> String {
        self.scanner
            .scan(text)
            .map(|token| self.process(state, owner, token))
            .collect()
    }

    fn process(
        &self,
        state: &mut TransducerState,
        owner: Option<EntityRef>,
        token: DocToken<'_>,
    ) -> String {
        let text = token.text;
        let resolved = match token.markup {
            Markup::Other => Some(self.resolve_implicit_links(text)),
            Markup::NewLine => Some("\n".to_string()),
            Markup::NewParagraph if state.in_code() => Some("\n\n".to_string()),
            Markup::NewParagraph => Some("</p><p>".to_string()),
            Markup::CodeStart => {
                state.start_code();
                Some("</p><code>".to_string())
            }
            Markup::CodeStartWithLanguage { language } => {
                state.start_code();
                Some(match code_mime_type(language) {
                    Some(mime) => format!("</p><code mime=\"{mime}\">"),
                    None => "</p><code>".to_string(),
                })
            }
            Markup::CodeEnd => {
                state.end_code();
                Some("</code><p>".to_string())
            }
            Markup::Note { .. } | Markup::Heading { .. } if state.in_code() => None,
            Markup::Note { contents } => {
                Some(format!("</p><note><p>{}</p></note><p>", escape(contents)))
            }
            Markup::Heading { level, title } => Some(format!(
                "</p>{}<title>{}</title><p>",
                state.enter_heading(level),
                escape(title)
            )),
            Markup::Property {
                type_name,
                property_name,
            } => self.link_property(type_name, property_name),
            Markup::Signal {
                type_name,
                signal_name,
            } => self.link_signal(type_name, signal_name),
            Markup::TypeName { type_name } => self.link_type(type_name),
            Markup::EnumValue { member_name } => self.link_enum_value(member_name),
            Markup::Parameter { param_name } => self.parameter(owner, param_name),
            Markup::FunctionCall { symbol_name } => self.link_function(symbol_name, text),
            Markup::Include { path } => self.include(state, owner, path),
        };
        resolved.unwrap_or_else(|| escape(text))
    }

    /// Escape plain text, then link every word that names a type or symbol
    fn resolve_implicit_links(&self, text: &str) -> String {
        let escaped = escape(text);
        if !self.config.resolve_implicit_links {
            return escaped;
        }

        words::split(&escaped)
            .into_iter()
            .map(|(piece, slice)| match piece {
                Piece::Word => match self.resolver.resolve_word(slice) {
                    Some(entity) => self.linker.format_xref(Some(entity), Some(slice), false),
                    None => slice.to_string(),
                },
                Piece::Space | Piece::OpenParen | Piece::CloseParen => slice.to_string(),
            })
            .collect()
    }

    fn link_property(&self, type_name: &str, property_name: &str) -> Option<String> {
        let owner = self.resolver.resolve_type(type_name)?;
        let property = self.resolver.find_property(owner, property_name)?;
        Some(
            self.linker
                .format_xref(Some(property), Some(property_name), false),
        )
    }

    fn link_signal(&self, type_name: &str, signal_name: &str) -> Option<String> {
        let owner = self.resolver.resolve_type(type_name)?;
        let signal = self.resolver.find_signal(owner, signal_name)?;
        Some(self.linker.format_xref(Some(signal), None, false))
    }

    /// `#Widgets` links to `Widget` with a plural link text
    fn link_type(&self, ident: &str) -> Option<String> {
        if let Some(entity) = self.resolver.resolve_type(ident) {
            return Some(self.linker.format_xref(Some(entity), None, false));
        }
        let singular = ident.strip_suffix('s')?;
        let entity = self.resolver.resolve_type(singular)?;
        Some(self.linker.format_xref(Some(entity), None, true))
    }

    fn link_enum_value(&self, member_name: &str) -> Option<String> {
        if let Some(literal) = self.language.fundamental(member_name) {
            return Some(format!("<code>{literal}</code>"));
        }
        let member = self.resolver.resolve_symbol(member_name)?;
        Some(self.linker.format_xref(Some(member), None, false))
    }

    fn parameter(&self, owner: Option<EntityRef>, name: &str) -> Option<String> {
        let owner = self.repo.entity(owner?);
        let parameter = owner.callable()?.parameter(name)?;
        Some(format!(
            "<code>{}</code>",
            escape(&self.language.parameter_name(owner, parameter))
        ))
    }

    fn link_function(&self, symbol: &str, call: &str) -> Option<String> {
        let function = self.resolver.resolve_symbol(symbol)?;
        Some(self.linker.format_xref(Some(function), Some(call), false))
    }

    fn include(
        &self,
        state: &mut TransducerState,
        owner: Option<EntityRef>,
        name: &str,
    ) -> Option<String> {
        let Some((path, contents)) = self.read_include(name) else {
            tracing::warn!("Could not find file {name}");
            return None;
        };
        if state.is_including(&path) {
            tracing::warn!("Recursive include of {}", path.display());
            return None;
        }

        if state.in_code() {
            return Some(self.resolve_implicit_links(&contents));
        }
        state.push_include(path);
        let formatted = self.format_inline(state, owner, &contents);
        state.pop_include();
        Some(formatted)
    }

    /// The file as named, else the first include directory holding it.
    ///
    /// Contents that aren't UTF-8 are decoded lossily.
    fn read_include(&self, name: &str) -> Option<(PathBuf, String)> {
        std::iter::once(PathBuf::from(name))
            .chain(self.config.include_paths.iter().map(|dir| dir.join(name)))
            .find_map(|path| {
                let bytes = std::fs::read(&path).ok()?;
                let contents = String::from_utf8_lossy(&bytes).into_owned();
                Some((path, contents))
            })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{Callable, EntityDecl, EntityKind, Namespace};
    use rstest::rstest;

    fn repo() -> Repository {
        let mut gtk = Namespace::new("Gtk", "3.0")
            .with_identifier_prefixes(["Gtk"])
            .with_symbol_prefixes(["gtk"]);
        gtk.add(
            EntityDecl::new("Widget", EntityKind::class())
                .with_child(
                    EntityDecl::new(
                        "show",
                        EntityKind::Function(Callable::with_parameters(["flags"]).method("widget")),
                    )
                    .with_symbol("gtk_widget_show"),
                )
                .with_child(EntityDecl::new("can-focus", EntityKind::Property(Default::default())))
                .with_child(EntityDecl::new("destroy", EntityKind::Signal(Callable::default()))),
        );
        gtk.add(
            EntityDecl::new("Align", EntityKind::Enum).with_child(
                EntityDecl::new("fill", EntityKind::Member).with_symbol("GTK_ALIGN_FILL"),
            ),
        );
        Repository::new(gtk)
    }

    fn format(repo: &Repository, language: &str, doc: &str) -> String {
        let formatter =
            DocFormatter::new(repo, FormatterConfig::default().with_language(language)).unwrap();
        let owner = repo.lookup_qualified("Gtk.Widget.show");
        formatter.format(owner, Some(doc))
    }

    #[test]
    fn test_missing_doc_is_empty() {
        let repo = repo();
        let formatter = DocFormatter::new(&repo, FormatterConfig::default()).unwrap();
        assert_eq!(formatter.format(None, None), "");
        assert_eq!(formatter.format(None, Some("")), "<p></p>");
    }

    #[test]
    fn test_unsupported_language() {
        let repo = repo();
        let err = DocFormatter::new(&repo, FormatterConfig::default().with_language("cobol"))
            .unwrap_err();
        assert!(matches!(err, crate::Error::UnsupportedLanguage(_)));
    }

    #[rstest]
    #[case("#GtkWidget", r#"<p><link xref="Gtk.Widget"/></p>"#)]
    #[case("#GtkWidgets", r#"<p><link xref="Gtk.Widget">Gtk.Widgets</link></p>"#)]
    #[case(
        "#GtkWidget:can-focus",
        r#"<p><link xref="Gtk.Widget-can-focus">can-focus</link></p>"#
    )]
    #[case("#GtkWidget::destroy", r#"<p><link xref="Gtk.Widget-destroy"/></p>"#)]
    #[case("#GtkWidget::missing", "<p>#GtkWidget::missing</p>")]
    #[case("%GTK_ALIGN_FILL", r#"<p><link xref="Gtk.Align"/>.fill</p>"#)]
    #[case(
        "gtk_widget_show()",
        r#"<p><link xref="Gtk.Widget.show">gtk_widget_show()</link></p>"#
    )]
    #[case("@flags", "<p><code>flags</code></p>")]
    #[case("@nope", "<p>@nope</p>")]
    fn test_references(#[case] doc: &str, #[case] expected: &str) {
        let repo = repo();
        assert_eq!(format(&repo, "c", doc), expected);
    }

    #[rstest]
    #[case("c", "<p><code>NULL</code> or <code>widget</code></p>")]
    #[case("python", "<p><code>None</code> or <code>self</code></p>")]
    #[case("gjs", "<p><code>null</code> or <code>widget</code></p>")]
    fn test_language_specific_rendering(#[case] language: &str, #[case] expected: &str) {
        let repo = repo();
        assert_eq!(format(&repo, language, "%NULL or @widget"), expected);
    }

    #[test]
    fn test_headings_close_after_last_paragraph() {
        let repo = repo();
        assert_eq!(
            format(&repo, "c", "# A\n\n## B\ntext"),
            "<p></p><section><title>A</title><p></p><p></p><section><title>B</title><p>\ntext</p></section></section>"
        );
    }

    #[test]
    fn test_code_block_keeps_paragraph_breaks() {
        let repo = repo();
        assert_eq!(
            format(&repo, "c", "|[<!-- language=\"C\" -->\na\n\nb\n]|"),
            "<p></p><code mime=\"text/x-csrc\">\na\n\nb\n</code><p></p>"
        );
    }

    #[test]
    fn test_unterminated_code_is_closed() {
        let repo = repo();
        assert_eq!(
            format(&repo, "c", "text |[ code"),
            "<p>text </p><code> code</code><p></p>"
        );
    }

    #[test]
    fn test_heading_inside_code_is_text() {
        let repo = repo();
        assert_eq!(
            format(&repo, "c", "|[\n# not a title\n]|"),
            "<p></p><code>\n# not a title\n</code><p></p>"
        );
    }

    #[test]
    fn test_note() {
        let repo = repo();
        assert_eq!(
            format(&repo, "c", "Intro\n> Careful\n"),
            "<p>Intro</p><note><p>Careful</p></note><p></p>"
        );
    }

    #[test]
    fn test_text_is_escaped() {
        let repo = repo();
        assert_eq!(format(&repo, "c", "a < b && c"), "<p>a &lt; b &amp;&amp; c</p>");
    }

    #[test]
    fn test_implicit_links() {
        let repo = repo();
        let formatter = DocFormatter::new(
            &repo,
            FormatterConfig::default().with_implicit_links(true),
        )
        .unwrap();
        assert_eq!(
            formatter.format(None, Some("Each GtkWidget (see gtk_widget_show) shows.")),
            "<p>Each <link xref=\"Gtk.Widget\">GtkWidget</link> (see <link xref=\"Gtk.Widget.show\">gtk_widget_show</link>) shows.</p>"
        );
    }
}
