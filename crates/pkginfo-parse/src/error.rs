//! Syntax errors produced while turning tokens into a tree.

use pkginfo_tokenizer::{LexErrorKind, Span};

/// A syntax error with its source location.
///
/// Lexical failures are forwarded verbatim from the tokenizer so the original
/// failure site and reason stay visible to the caller.
#[derive(Debug, Clone, PartialEq)]
pub struct SyntaxError {
    /// The kind of error.
    pub kind: SyntaxErrorKind,
    /// Source location of the offending token or construct.
    pub span: Span,
    /// The offending lexeme, when one was seen.
    pub found: Option<String>,
}

/// Which stage rejected the input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyntaxErrorKind {
    /// The tokenizer gave up; scanning stopped at the first bad construct.
    Lexical(LexErrorKind),
    /// A token the parser's current state has no transition for, or a
    /// malformed parse stack during reduction.
    Parse(ParseErrorKind),
}

/// The parser states' rejection reasons, one per illegal transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ParseErrorKind {
    /// Top level or object body expected an identifier to start a declaration.
    IllegalDeclStart,
    /// Declaration expected `=` after its identifier.
    IllegalTokenInDecl,
    /// Declaration expected a value after `=`.
    ExpectedValue,
    /// Object body expected a declaration or `}`.
    IllegalTokenInObject,
    /// Value must be followed by `;`.
    IllegalTokenAfterValue,
    /// Completed declaration must be followed by another declaration, `}`,
    /// or end of input.
    IllegalTokenAfterDecl,
    /// Reduction found a stack that does not match `ident = value ;`.
    MalformedDecl,
    /// Object reduction ran out of stack before its opening `{`.
    UnbalancedObject,
    /// A non-declaration survived to file scope.
    MalformedFile,
    /// The token stream ended without a terminal token.
    UnexpectedEndOfTokens,
}

impl std::fmt::Display for ParseErrorKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            ParseErrorKind::IllegalDeclStart => write!(f, "illegal start of declaration"),
            ParseErrorKind::IllegalTokenInDecl => write!(f, "illegal token in declaration"),
            ParseErrorKind::ExpectedValue => write!(f, "expected value"),
            ParseErrorKind::IllegalTokenInObject => write!(f, "illegal token in object"),
            ParseErrorKind::IllegalTokenAfterValue => write!(f, "illegal token after value"),
            ParseErrorKind::IllegalTokenAfterDecl => {
                write!(f, "illegal token following declaration")
            }
            ParseErrorKind::MalformedDecl => write!(f, "malformed declaration on parse stack"),
            ParseErrorKind::UnbalancedObject => write!(f, "unbalanced object"),
            ParseErrorKind::MalformedFile => write!(f, "illegal node at file scope"),
            ParseErrorKind::UnexpectedEndOfTokens => {
                write!(f, "token stream ended unexpectedly")
            }
        }
    }
}

impl SyntaxError {
    /// Create a parse error at the given location.
    pub fn parse(kind: ParseErrorKind, span: Span, found: Option<String>) -> Self {
        Self {
            kind: SyntaxErrorKind::Parse(kind),
            span,
            found,
        }
    }

    /// Forward a tokenizer error verbatim.
    pub fn lexical(kind: LexErrorKind, span: Span, text: &str) -> Self {
        Self {
            kind: SyntaxErrorKind::Lexical(kind),
            span,
            found: Some(text.to_string()),
        }
    }

    /// The error message without location information.
    pub fn message(&self) -> String {
        match &self.kind {
            SyntaxErrorKind::Lexical(kind) => kind.to_string(),
            SyntaxErrorKind::Parse(kind) => kind.to_string(),
        }
    }
}

impl std::fmt::Display for SyntaxError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.message())?;
        if let Some(found) = &self.found {
            write!(f, ", found `{}`", found)?;
        }
        write!(f, " at offset {}", self.span.start)
    }
}

impl std::error::Error for SyntaxError {}
