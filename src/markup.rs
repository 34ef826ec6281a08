//! Docstring markup
//!
//! - [grammar]: composes named sub-patterns into one alternation regex
//! - [scanner]: lazily splits a text into tokens with a compiled grammar
//! - [docstring]: the docstring grammar and its typed tokens
//! - [escape]: output escaping

pub mod docstring;
pub mod escape;
pub mod grammar;
pub mod scanner;

pub use docstring::{DocToken, DocstringScanner, Markup, MarkupKind};
pub use grammar::{CompiledGrammar, GrammarError, PatternSpec};
pub use scanner::{Properties, Scan, Token, TokenKind, OTHER};
