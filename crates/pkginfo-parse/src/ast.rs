//! AST node types for parsed manifests.

use std::borrow::Cow;

use pkginfo_tokenizer::{Span, TokenKind};

use crate::SyntaxError;

/// A node in the manifest syntax tree.
///
/// A successful parse yields exactly one root [`AstNode::Object`] whose
/// declarations appear in source order. Any failure yields a single
/// [`AstNode::Error`] instead; no partial trees are produced.
#[derive(Debug, Clone, PartialEq)]
pub enum AstNode<'src> {
    /// Terminal failure, forwarded downstream in place of a tree.
    Error(SyntaxError),
    /// A leaf wrapping a token. String terminals hold the unquoted,
    /// unescaped lexeme rather than the raw source slice.
    Terminal {
        /// The semantic kind of the wrapped token.
        kind: TokenKind,
        /// The lexeme, borrowed from the source where possible.
        lexeme: Cow<'src, str>,
        /// The span of the wrapped token.
        span: Span,
    },
    /// A single `key = value;` binding.
    Decl {
        /// The identifier terminal naming the binding.
        ident: Box<AstNode<'src>>,
        /// The bound value: a terminal or a nested object.
        value: Box<AstNode<'src>>,
        /// Covers the identifier through the closing semicolon.
        span: Span,
    },
    /// A brace-delimited group of declarations, in source order.
    Object {
        /// The declarations, each an [`AstNode::Decl`].
        decls: Vec<AstNode<'src>>,
        /// Covers the braces, or the whole file for the root object.
        span: Span,
    },
}

impl<'src> AstNode<'src> {
    /// The source span this node covers.
    pub fn span(&self) -> Span {
        match self {
            AstNode::Error(err) => err.span,
            AstNode::Terminal { span, .. } => *span,
            AstNode::Decl { span, .. } => *span,
            AstNode::Object { span, .. } => *span,
        }
    }

    /// Whether this node can stand as the value of a declaration.
    pub fn is_value(&self) -> bool {
        match self {
            AstNode::Object { .. } => true,
            AstNode::Terminal { kind, .. } => kind.is_value_start(),
            _ => false,
        }
    }

    /// The lexeme if this is a terminal node.
    pub fn as_terminal(&self) -> Option<(TokenKind, &str)> {
        match self {
            AstNode::Terminal { kind, lexeme, .. } => Some((*kind, lexeme.as_ref())),
            _ => None,
        }
    }

    /// The declarations if this is an object node.
    pub fn as_object(&self) -> Option<&[AstNode<'src>]> {
        match self {
            AstNode::Object { decls, .. } => Some(decls),
            _ => None,
        }
    }

    /// Whether this is a terminal of the given kind.
    pub fn is_terminal(&self, expected: TokenKind) -> bool {
        matches!(self, AstNode::Terminal { kind, .. } if *kind == expected)
    }
}
