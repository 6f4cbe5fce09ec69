//! Lexer for backend attribute strings using logos
//!
//! Attribute strings are comma-separated option lists such as
//! `draw=red, thick, label={[blue]above:x}`. Only the structural characters
//! are tokens; everything between them is text.

use logos::Logos;

/// Byte range in source text
pub type Span = std::ops::Range<usize>;

#[derive(Logos, Debug, Clone, Copy, PartialEq, Eq)]
pub enum Token {
    #[token(",")]
    Comma,
    #[token("=")]
    Equals,
    #[token("{")]
    BraceOpen,
    #[token("}")]
    BraceClose,
    #[regex(r"[^,={}]+")]
    Text,
}

/// Tokenize an attribute string into tokens with their spans
pub fn lex(source: &str) -> Vec<(Token, Span)> {
    Token::lexer(source)
        .spanned()
        .map(|(token, span)| (token.unwrap_or(Token::Text), span))
        .collect()
}
