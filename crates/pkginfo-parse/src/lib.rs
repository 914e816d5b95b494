//! A shift/reduce parser for package-info manifests.
//!
//! Consumes the token sequence produced by [`pkginfo_tokenizer`] and reduces
//! it to exactly one [`AstNode`]: the root object of the manifest, or an
//! error node carrying the first failure.

pub use pkginfo_tokenizer::{LexErrorKind, Span, Token, TokenKind, Tokenizer};

mod ast;
pub use ast::AstNode;

mod error;
pub use error::{ParseErrorKind, SyntaxError, SyntaxErrorKind};

mod parser;
pub use parser::Parser;

/// Parse manifest source into an AST.
pub fn parse(source: &str) -> AstNode<'_> {
    Parser::new(source).parse()
}
