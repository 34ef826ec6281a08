//! Word splitting for implicit links
//!
//! Plain text is cut at spaces and parentheses only, so `foo_bar(x)` yields the words
//! `foo_bar` and `x` while `end.` stays one word with its punctuation.

use logos::Logos;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Piece {
    #[token(" ")]
    Space,
    #[token("(")]
    OpenParen,
    #[token(")")]
    CloseParen,
    #[regex(r"[^ ()]+")]
    Word,
}

/// Split `text` into pieces covering it entirely, in order
pub fn split(text: &str) -> Vec<(Piece, &str)> {
    let mut lexer = Piece::lexer(text);
    let mut pieces = Vec::new();

    while let Some(result) = lexer.next() {
        // Every character is either a separator or part of a word
        if let Ok(piece) = result {
            pieces.push((piece, lexer.slice()));
        }
    }

    pieces
}
