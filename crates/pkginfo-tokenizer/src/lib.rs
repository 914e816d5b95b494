//! A tokenizer for package-info manifests

mod span;
pub use span::Span;

mod token;
pub use token::{LexErrorKind, Token, TokenKind};

mod tokenizer;
pub use tokenizer::Tokenizer;
