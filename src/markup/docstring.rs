//! Docstring grammar
//!
//! The markup recognized inside documentation comments, layered on the generic grammar
//! compiler. Each alternative of the compiled grammar is bound to a [`MarkupKind`] when
//! the scanner is built, so scanning yields typed [`Markup`] tokens and the formatter can
//! match on them exhaustively.
//!
//! | Construct                  | Syntax                                   |
//! |----------------------------|------------------------------------------|
//! | heading                    | `# Title`, `## Title`, ...               |
//! | note                       | `\n> text\n`                             |
//! | paragraph / line break     | `\n\n` / `\n`                            |
//! | code block                 | `|[ ... ]|`, `|[<!-- language="C" -->`   |
//! | property / signal          | `#Type:prop-name` / `#Type::signal-name` |
//! | type                       | `#Type`                                  |
//! | enum member                | `%MEMBER`                                |
//! | parameter                  | `@name`                                  |
//! | function call              | `name()`                                 |
//! | include                    | `{{ path }}`                             |

use super::grammar::{CompiledGrammar, GrammarError, PatternSpec};
use super::scanner::TokenKind;

/// Patterns in priority order
const DOCSTRING_PATTERNS: &[(&str, &str)] = &[
    ("!alpha", r"[a-zA-Z0-9_]+"),
    ("!alpha_dash", r"[a-zA-Z0-9_-]+"),
    ("!anything", r".*"),
    ("note", r"\n+>\s*<<note_contents:anything>>\s*\n"),
    ("new_paragraph", r"\n\n"),
    ("new_line", r"\n"),
    (
        "code_start_with_language",
        r#"\|\[<!--\s*language\s*=\s*"<<language_name:alpha>>"\s*-->"#,
    ),
    ("code_start", r"\|\["),
    ("code_end", r"\]\|"),
    ("property", r"#<<type_name:alpha>>:(<<property_name:alpha_dash>>)"),
    ("signal", r"#<<type_name:alpha>>::(<<signal_name:alpha_dash>>)"),
    ("type_name", r"#(<<type_name:alpha>>)"),
    ("enum_value", r"%(<<member_name:alpha>>)"),
    ("parameter", r"@<<param_name:alpha>>"),
    ("function_call", r"<<symbol_name:alpha>>\(\)"),
    ("include", r"\{\{\s*<<include_name:anything>>\s*\}\}"),
    ("heading", r"#+\s+<<heading:anything>>"),
];

/// The markup constructs, one per public docstring pattern
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum MarkupKind {
    Note,
    NewParagraph,
    NewLine,
    CodeStartWithLanguage,
    CodeStart,
    CodeEnd,
    Property,
    Signal,
    TypeName,
    EnumValue,
    Parameter,
    FunctionCall,
    Include,
    Heading,
}

impl MarkupKind {
    pub fn from_name(name: &str) -> Option<Self> {
        Some(match name {
            "note" => MarkupKind::Note,
            "new_paragraph" => MarkupKind::NewParagraph,
            "new_line" => MarkupKind::NewLine,
            "code_start_with_language" => MarkupKind::CodeStartWithLanguage,
            "code_start" => MarkupKind::CodeStart,
            "code_end" => MarkupKind::CodeEnd,
            "property" => MarkupKind::Property,
            "signal" => MarkupKind::Signal,
            "type_name" => MarkupKind::TypeName,
            "enum_value" => MarkupKind::EnumValue,
            "parameter" => MarkupKind::Parameter,
            "function_call" => MarkupKind::FunctionCall,
            "include" => MarkupKind::Include,
            "heading" => MarkupKind::Heading,
            _ => return None,
        })
    }
}

/// A scanned piece of docstring with its captured fields
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Markup<'t> {
    /// Plain text between constructs
    Other,
    Note { contents: &'t str },
    NewParagraph,
    NewLine,
    CodeStart,
    CodeStartWithLanguage { language: &'t str },
    CodeEnd,
    Property { type_name: &'t str, property_name: &'t str },
    Signal { type_name: &'t str, signal_name: &'t str },
    TypeName { type_name: &'t str },
    EnumValue { member_name: &'t str },
    Parameter { param_name: &'t str },
    FunctionCall { symbol_name: &'t str },
    /// `path` is trimmed of surrounding whitespace
    Include { path: &'t str },
    /// `level` is the number of leading `#`
    Heading { level: usize, title: &'t str },
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DocToken<'t> {
    pub markup: Markup<'t>,
    /// The full matched text
    pub text: &'t str,
}

/// Tokenizer for docstring markup
#[derive(Debug, Clone)]
pub struct DocstringScanner {
    grammar: CompiledGrammar,
    kinds: Vec<MarkupKind>,
}

impl DocstringScanner {
    pub fn new() -> Result<Self, GrammarError> {
        let specs: Vec<PatternSpec> = DOCSTRING_PATTERNS
            .iter()
            .map(|(name, pattern)| PatternSpec::new(*name, *pattern))
            .collect();
        let grammar = CompiledGrammar::compile(&specs)?;
        let kinds = grammar
            .alternatives()
            .iter()
            .map(|alt| {
                MarkupKind::from_name(alt.name())
                    .ok_or_else(|| GrammarError::UnknownAlternative(alt.name().to_string()))
            })
            .collect::<Result<Vec<_>, _>>()?;

        Ok(Self { grammar, kinds })
    }

    pub fn grammar(&self) -> &CompiledGrammar {
        &self.grammar
    }

    /// Lazily tokenize a docstring
    pub fn scan<'s, 't>(&'s self, text: &'t str) -> impl Iterator<Item = DocToken<'t>> + 's
    where
        't: 's,
    {
        self.grammar.scan(text).map(move |token| {
            let field = |key: &str| token.properties.get(key).unwrap_or_default();
            let markup = match token.kind {
                TokenKind::Other => Markup::Other,
                TokenKind::Alternative(index) => match self.kinds[index] {
                    MarkupKind::Note => Markup::Note {
                        contents: field("note_contents"),
                    },
                    MarkupKind::NewParagraph => Markup::NewParagraph,
                    MarkupKind::NewLine => Markup::NewLine,
                    MarkupKind::CodeStartWithLanguage => Markup::CodeStartWithLanguage {
                        language: field("language_name"),
                    },
                    MarkupKind::CodeStart => Markup::CodeStart,
                    MarkupKind::CodeEnd => Markup::CodeEnd,
                    MarkupKind::Property => Markup::Property {
                        type_name: field("type_name"),
                        property_name: field("property_name"),
                    },
                    MarkupKind::Signal => Markup::Signal {
                        type_name: field("type_name"),
                        signal_name: field("signal_name"),
                    },
                    MarkupKind::TypeName => Markup::TypeName {
                        type_name: field("type_name"),
                    },
                    MarkupKind::EnumValue => Markup::EnumValue {
                        member_name: field("member_name"),
                    },
                    MarkupKind::Parameter => Markup::Parameter {
                        param_name: field("param_name"),
                    },
                    MarkupKind::FunctionCall => Markup::FunctionCall {
                        symbol_name: field("symbol_name"),
                    },
                    MarkupKind::Include => Markup::Include {
                        path: field("include_name").trim(),
                    },
                    MarkupKind::Heading => Markup::Heading {
                        level: token.text.chars().take_while(|&c| c == '#').count(),
                        title: field("heading"),
                    },
                },
            };
            DocToken {
                markup,
                text: token.text,
            }
        })
    }
}
