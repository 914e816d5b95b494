//! Shift/reduce parser for the package-info manifest grammar.
//!
//! The parser is a state machine over the token stream. Shifted terminals and
//! partially-reduced non-terminals live on an explicit parse stack; a second
//! stack of state tags records, for each entered nested object, where to
//! resume once that object closes. Nesting depth is therefore bounded only by
//! memory, never by the call stack.

use std::borrow::Cow;

use pkginfo_tokenizer::{Span, Token, TokenKind, Tokenizer};
use tracing::trace;

use crate::error::{ParseErrorKind, SyntaxError};
use crate::AstNode;

/// The parser's states, one per parse function of the grammar.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum State {
    /// Expecting a top-level declaration or end of input.
    File,
    /// Saw an identifier; expecting `=`.
    Decl,
    /// Saw `=`; expecting a value.
    Value,
    /// Inside `{`; expecting a declaration or `}`.
    InsideObject,
    /// Saw a value; expecting `;`.
    AfterValue,
    /// Saw `;`; reduce the declaration, then dispatch.
    AfterDecl,
    /// Saw `}`; reduce the object, then resume the saved continuation.
    AfterObject,
}

/// A shift/reduce parser over a token sequence.
///
/// Produces exactly one [`AstNode`]: the root object on success, or an error
/// node for the first failure. A tokenizer error in the input stream is
/// forwarded verbatim as the parse result.
pub struct Parser<'src, I: Iterator<Item = Token<'src>>> {
    tokens: I,
    /// Shifted terminals and reduced non-terminals, LIFO.
    stack: Vec<AstNode<'src>>,
    /// States to resume after each open nested object closes.
    continuations: Vec<State>,
    /// End of the last token seen, for locating premature-end errors.
    last_end: u32,
}

impl<'src> Parser<'src, Tokenizer<'src>> {
    /// Create a parser that tokenizes the given source itself.
    pub fn new(source: &'src str) -> Self {
        Self::from_tokens(Tokenizer::new(source))
    }
}

impl<'src, I: Iterator<Item = Token<'src>>> Parser<'src, I> {
    /// Create a parser over an externally supplied token sequence.
    ///
    /// The sequence must be in tokenizer order and end with an `Eof` or
    /// `Error` token.
    pub fn from_tokens(tokens: I) -> Self {
        Self {
            tokens,
            stack: Vec::new(),
            continuations: Vec::new(),
            last_end: 0,
        }
    }

    /// Run the state machine to completion and return the single result node.
    pub fn parse(mut self) -> AstNode<'src> {
        let mut state = State::File;
        loop {
            trace!(
                "state {:?}, stack {}, continuations {}",
                state,
                self.stack.len(),
                self.continuations.len()
            );
            state = match state {
                State::File => match self.shift() {
                    Err(err) => return AstNode::Error(err),
                    Ok(TokenKind::Ident) => State::Decl,
                    Ok(TokenKind::Eof) => return self.accept_file(),
                    Ok(_) => return self.illegal(ParseErrorKind::IllegalDeclStart),
                },

                State::Decl => match self.shift() {
                    Err(err) => return AstNode::Error(err),
                    Ok(TokenKind::Equals) => State::Value,
                    Ok(_) => return self.illegal(ParseErrorKind::IllegalTokenInDecl),
                },

                State::Value => match self.shift() {
                    Err(err) => return AstNode::Error(err),
                    Ok(TokenKind::LBrace) => {
                        // Remember where to pick up once this object closes.
                        self.continuations.push(State::AfterValue);
                        State::InsideObject
                    }
                    Ok(kind) if kind.is_value_start() => State::AfterValue,
                    Ok(_) => return self.illegal(ParseErrorKind::ExpectedValue),
                },

                State::InsideObject => match self.shift() {
                    Err(err) => return AstNode::Error(err),
                    Ok(TokenKind::Ident) => State::Decl,
                    Ok(TokenKind::RBrace) => State::AfterObject,
                    Ok(_) => return self.illegal(ParseErrorKind::IllegalTokenInObject),
                },

                State::AfterValue => match self.shift() {
                    Err(err) => return AstNode::Error(err),
                    Ok(TokenKind::Semicolon) => State::AfterDecl,
                    Ok(_) => return self.illegal(ParseErrorKind::IllegalTokenAfterValue),
                },

                State::AfterDecl => {
                    if let Err(node) = self.reduce_decl() {
                        return node;
                    }
                    match self.shift() {
                        Err(err) => return AstNode::Error(err),
                        Ok(TokenKind::Ident) => State::Decl,
                        Ok(TokenKind::RBrace) => State::AfterObject,
                        Ok(TokenKind::Eof) => return self.accept_file(),
                        Ok(_) => return self.illegal(ParseErrorKind::IllegalTokenAfterDecl),
                    }
                }

                State::AfterObject => match self.reduce_object() {
                    Ok(resume) => resume,
                    Err(node) => return node,
                },
            };
        }
    }

    /// Pull the next token and push it on the parse stack as a terminal.
    ///
    /// String tokens are unquoted and unescaped here, so the AST carries the
    /// semantic lexeme while tokens stay exact source slices.
    fn shift(&mut self) -> Result<TokenKind, SyntaxError> {
        let Some(token) = self.tokens.next() else {
            return Err(SyntaxError::parse(
                ParseErrorKind::UnexpectedEndOfTokens,
                Span::empty(self.last_end),
                None,
            ));
        };
        self.last_end = token.span.end;

        if let TokenKind::Error(kind) = token.kind {
            return Err(SyntaxError::lexical(kind, token.span, token.text));
        }

        trace!("shift {:?}: {:?}", token.kind, token.text);
        let lexeme = match token.kind {
            TokenKind::String => unquote(token.text),
            _ => Cow::Borrowed(token.text),
        };
        self.stack.push(AstNode::Terminal {
            kind: token.kind,
            lexeme,
            span: token.span,
        });
        Ok(token.kind)
    }

    /// Build an error node for a token the current state cannot accept.
    /// The offending terminal is the one most recently shifted.
    fn illegal(&self, kind: ParseErrorKind) -> AstNode<'src> {
        let (span, found) = match self.stack.last() {
            Some(node) if node.is_terminal(TokenKind::Eof) => {
                (node.span(), Some("end of input".to_string()))
            }
            Some(node) => (
                node.span(),
                node.as_terminal().map(|(_, lexeme)| lexeme.to_string()),
            ),
            None => (Span::empty(self.last_end), None),
        };
        AstNode::Error(SyntaxError::parse(kind, span, found))
    }

    /// Reduce `ident = value ;` on top of the stack to a single declaration.
    fn reduce_decl(&mut self) -> Result<(), AstNode<'src>> {
        let n = self.stack.len();
        let shape_ok = n >= 4
            && self.stack[n - 4].is_terminal(TokenKind::Ident)
            && self.stack[n - 3].is_terminal(TokenKind::Equals)
            && self.stack[n - 2].is_value()
            && self.stack[n - 1].is_terminal(TokenKind::Semicolon);
        if !shape_ok {
            return Err(self.illegal(ParseErrorKind::MalformedDecl));
        }

        let (Some(semicolon), Some(value), Some(_equals), Some(ident)) = (
            self.stack.pop(),
            self.stack.pop(),
            self.stack.pop(),
            self.stack.pop(),
        ) else {
            return Err(self.illegal(ParseErrorKind::MalformedDecl));
        };

        trace!("reduce decl {:?}", ident.as_terminal());
        let span = ident.span().extend(semicolon.span());
        self.stack.push(AstNode::Decl {
            ident: Box::new(ident),
            value: Box::new(value),
            span,
        });
        Ok(())
    }

    /// Reduce everything back to the matching `{` into an object node, then
    /// pop the continuation stack to resume where the object was opened.
    fn reduce_object(&mut self) -> Result<State, AstNode<'src>> {
        let Some(rbrace) = self.stack.pop() else {
            return Err(self.illegal(ParseErrorKind::UnbalancedObject));
        };

        let mut decls = Vec::new();
        let lbrace = loop {
            match self.stack.pop() {
                Some(node @ AstNode::Decl { .. }) => decls.push(node),
                Some(node) if node.is_terminal(TokenKind::LBrace) => break node,
                _ => {
                    return Err(AstNode::Error(SyntaxError::parse(
                        ParseErrorKind::UnbalancedObject,
                        rbrace.span(),
                        None,
                    )));
                }
            }
        };
        // Popped in reverse; restore source order.
        decls.reverse();

        let span = lbrace.span().extend(rbrace.span());
        trace!("reduce object with {} decls", decls.len());
        self.stack.push(AstNode::Object { decls, span });

        match self.continuations.pop() {
            Some(resume) => Ok(resume),
            None => Err(AstNode::Error(SyntaxError::parse(
                ParseErrorKind::UnbalancedObject,
                span,
                None,
            ))),
        }
    }

    /// Accept the file: reduce all top-level declarations into the root
    /// object. The end-of-input terminal has just been shifted.
    fn accept_file(&mut self) -> AstNode<'src> {
        if !self.continuations.is_empty() {
            return self.illegal(ParseErrorKind::UnbalancedObject);
        }

        let end = match self.stack.pop() {
            Some(node) if node.is_terminal(TokenKind::Eof) => node.span().end,
            _ => return self.illegal(ParseErrorKind::MalformedFile),
        };

        let mut decls = Vec::new();
        while let Some(node) = self.stack.pop() {
            match node {
                node @ AstNode::Decl { .. } => decls.push(node),
                node => {
                    return AstNode::Error(SyntaxError::parse(
                        ParseErrorKind::MalformedFile,
                        node.span(),
                        None,
                    ));
                }
            }
        }
        decls.reverse();

        trace!("accept file with {} decls", decls.len());
        AstNode::Object {
            decls,
            span: Span::new(0, end),
        }
    }
}

/// Strip the surrounding quotes from a string lexeme and resolve escapes.
/// `\` escapes the next character verbatim; there are no interpreted escapes.
fn unquote(text: &str) -> Cow<'_, str> {
    let inner = &text[1..text.len() - 1];
    if !inner.contains('\\') {
        return Cow::Borrowed(inner);
    }
    let mut out = String::with_capacity(inner.len());
    let mut chars = inner.chars();
    while let Some(c) = chars.next() {
        if c == '\\' {
            if let Some(escaped) = chars.next() {
                out.push(escaped);
            }
        } else {
            out.push(c);
        }
    }
    Cow::Owned(out)
}
