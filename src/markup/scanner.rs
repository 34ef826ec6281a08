//! Token Scanner
//!
//! Walks a text with a [`CompiledGrammar`] and yields one token per match, plus `other`
//! tokens for the text between matches. Concatenating the `text` of every token gives
//! back the input.

use std::ops::Range;

use regex::Captures;

use super::grammar::CompiledGrammar;

/// Kind name of the pass-through tokens
pub const OTHER: &str = "other";

/// Which part of the grammar produced a token
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TokenKind {
    /// Literal text nothing matched
    Other,
    /// Index into [`CompiledGrammar::alternatives`]
    Alternative(usize),
}

/// Properties captured by an alternative's aliases that took part in the match
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties<'g, 't> {
    entries: Vec<(&'g str, &'t str)>,
}

impl<'g, 't> Properties<'g, 't> {
    pub fn get(&self, key: &str) -> Option<&'t str> {
        self.entries
            .iter()
            .find(|(k, _)| *k == key)
            .map(|(_, v)| *v)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&'g str, &'t str)> + '_ {
        self.entries.iter().copied()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'g, 't> {
    pub kind: TokenKind,
    /// Alternative name, or [`OTHER`]
    pub name: &'g str,
    pub text: &'t str,
    pub span: Range<usize>,
    pub properties: Properties<'g, 't>,
}

impl<'g, 't> Token<'g, 't> {
    fn other(text: &'t str, span: Range<usize>) -> Self {
        Token {
            kind: TokenKind::Other,
            name: OTHER,
            text: &text[span.clone()],
            span,
            properties: Properties::default(),
        }
    }
}

impl CompiledGrammar {
    /// Lazily tokenize `text`. Each call starts a fresh, single-pass scan.
    pub fn scan<'g, 't>(&'g self, text: &'t str) -> Scan<'g, 't> {
        Scan {
            grammar: self,
            text,
            cursor: 0,
            search_from: 0,
            pending: None,
            done: false,
        }
    }
}

/// Iterator returned by [`CompiledGrammar::scan`]
pub struct Scan<'g, 't> {
    grammar: &'g CompiledGrammar,
    text: &'t str,
    /// End of the last emitted token
    cursor: usize,
    /// Where the next search starts; runs ahead of `cursor` only past empty matches
    search_from: usize,
    pending: Option<Token<'g, 't>>,
    done: bool,
}

impl<'g, 't> Scan<'g, 't> {
    fn matched(&self, caps: &Captures<'t>, span: Range<usize>) -> Token<'g, 't> {
        let found = self
            .grammar
            .alternatives
            .iter()
            .enumerate()
            .find(|(_, alt)| caps.get(alt.group).is_some());

        let Some((index, alt)) = found else {
            return Token::other(self.text, span);
        };

        let entries = alt
            .properties
            .iter()
            .filter_map(|slot| caps.get(slot.group).map(|m| (slot.key.as_str(), m.as_str())))
            .collect();

        Token {
            kind: TokenKind::Alternative(index),
            name: alt.name(),
            text: &self.text[span.clone()],
            span,
            properties: Properties { entries },
        }
    }

    fn next_char_boundary(&self, at: usize) -> usize {
        self.text[at..]
            .chars()
            .next()
            .map_or(self.text.len() + 1, |c| at + c.len_utf8())
    }
}

impl<'g, 't> Iterator for Scan<'g, 't> {
    type Item = Token<'g, 't>;

    fn next(&mut self) -> Option<Self::Item> {
        if let Some(token) = self.pending.take() {
            return Some(token);
        }
        if self.done {
            return None;
        }

        loop {
            let caps = if self.search_from <= self.text.len() {
                self.grammar.regex.captures_at(self.text, self.search_from)
            } else {
                None
            };

            let found = caps.and_then(|c| {
                let whole = c.get(0)?;
                Some((c, whole))
            });
            let Some((caps, whole)) = found else {
                self.done = true;
                if self.cursor < self.text.len() {
                    let span = self.cursor..self.text.len();
                    self.cursor = self.text.len();
                    return Some(Token::other(self.text, span));
                }
                return None;
            };

            // An empty match would never move the cursor
            if whole.is_empty() {
                self.search_from = self.next_char_boundary(whole.end());
                continue;
            }

            let token = self.matched(&caps, whole.range());
            let gap = self.cursor..whole.start();
            self.cursor = whole.end();
            self.search_from = whole.end();

            if !gap.is_empty() {
                self.pending = Some(token);
                return Some(Token::other(self.text, gap));
            }
            return Some(token);
        }
    }
}
