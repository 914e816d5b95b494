//! Token types for the package-info lexer.

use crate::Span;

/// The kind of a token.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TokenKind {
    // Structural tokens
    /// `{`
    LBrace,
    /// `}`
    RBrace,
    /// `=`
    Equals,
    /// `;`
    Semicolon,

    // Value tokens
    /// Identifier, optionally version-suffixed: `workspace`, `Foo-1.0`
    Ident,
    /// Number literal: `42`, `3.14`
    Number,
    /// Quoted string: `"hello world"`
    String,
    /// Filesystem path: `.`, `./src`, `pkg/lib`
    Path,

    // Special tokens
    /// End of file
    Eof,
    /// Lexer error; scanning stops after this token
    Error(LexErrorKind),
}

impl TokenKind {
    /// Whether a token of this kind ends the token sequence.
    pub fn is_terminal(&self) -> bool {
        matches!(self, TokenKind::Eof | TokenKind::Error(_))
    }

    /// Whether this token can appear as the value of a declaration.
    pub fn is_value_start(&self) -> bool {
        matches!(
            self,
            TokenKind::Ident | TokenKind::Number | TokenKind::String | TokenKind::Path
        )
    }
}

/// Why the lexer gave up.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum LexErrorKind {
    /// A character that cannot start any token.
    UnexpectedChar,
    /// A string ran into a raw newline or end of input before its closing quote.
    UnclosedString,
    /// A number with a `.` but no fraction digits.
    MalformedNumber,
    /// An identifier version suffix missing its `.` or digits.
    MalformedVersion,
}

impl std::fmt::Display for LexErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            LexErrorKind::UnexpectedChar => write!(f, "unexpected character"),
            LexErrorKind::UnclosedString => write!(f, "unclosed string"),
            LexErrorKind::MalformedNumber => write!(f, "malformed number literal"),
            LexErrorKind::MalformedVersion => write!(f, "malformed version suffix"),
        }
    }
}

/// A token with its kind, span, and source text slice.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Token<'src> {
    /// The kind of token.
    pub kind: TokenKind,
    /// The span in the source text.
    pub span: Span,
    /// The source text of this token.
    pub text: &'src str,
}

impl<'src> Token<'src> {
    /// Create a new token.
    pub fn new(kind: TokenKind, span: Span, text: &'src str) -> Self {
        Self { kind, span, text }
    }
}
