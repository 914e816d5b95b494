//! Tokenizer for the package-info manifest format.

use crate::{LexErrorKind, Span, Token, TokenKind};
use tracing::trace;

/// A tokenizer that produces tokens from manifest source text.
///
/// Tokens are produced lazily through [`Tokenizer::next_token`] or the
/// [`Iterator`] impl. The sequence is finite: it ends with a single
/// [`TokenKind::Eof`] token, or with a single [`TokenKind::Error`] token at
/// the first malformed construct, after which no further tokens are produced.
/// A tokenizer is not restartable; create a fresh one to re-scan.
#[derive(Clone)]
pub struct Tokenizer<'src> {
    /// The source text being tokenized.
    source: &'src str,
    /// The remaining source text (suffix of `source`).
    remaining: &'src str,
    /// Current byte position in `source`.
    pos: u32,
    /// Set once a terminal token has been emitted.
    done: bool,
}

impl<'src> Tokenizer<'src> {
    /// Create a new tokenizer for the given source text.
    pub fn new(source: &'src str) -> Self {
        Self {
            source,
            remaining: source,
            pos: 0,
            done: false,
        }
    }

    /// Get the current byte position.
    #[inline]
    pub fn position(&self) -> u32 {
        self.pos
    }

    /// Check if we're at the end of input.
    #[inline]
    pub fn is_eof(&self) -> bool {
        self.remaining.is_empty()
    }

    /// Peek at the next character without consuming it.
    #[inline]
    fn peek(&self) -> Option<char> {
        self.remaining.chars().next()
    }

    /// Peek at the nth character (0-indexed) without consuming.
    #[inline]
    fn peek_nth(&self, n: usize) -> Option<char> {
        self.remaining.chars().nth(n)
    }

    /// Advance by one character and return it.
    #[inline]
    fn advance(&mut self) -> Option<char> {
        let c = self.peek()?;
        self.pos += c.len_utf8() as u32;
        self.remaining = &self.remaining[c.len_utf8()..];
        Some(c)
    }

    /// Create a token from the given start position to current position.
    fn token(&self, kind: TokenKind, start: u32) -> Token<'src> {
        let span = Span::new(start, self.pos);
        let text = &self.source[start as usize..self.pos as usize];
        trace!("Token {:?} at {:?}: {:?}", kind, span, text);
        Token::new(kind, span, text)
    }

    /// Create an error token covering the offending text.
    fn error(&self, kind: LexErrorKind, start: u32) -> Token<'src> {
        self.token(TokenKind::Error(kind), start)
    }

    /// Skip whitespace between tokens. Whitespace is never tokenized.
    fn skip_whitespace(&mut self) {
        while let Some(c) = self.peek() {
            if c == ' ' || c == '\t' || c == '\n' || c == '\r' {
                self.advance();
            } else {
                break;
            }
        }
    }

    /// Get the next token.
    pub fn next_token(&mut self) -> Token<'src> {
        self.skip_whitespace();

        if self.is_eof() {
            self.done = true;
            return self.token(TokenKind::Eof, self.pos);
        }

        let start = self.pos;
        let c = self.peek().unwrap();

        let token = match c {
            // Structural tokens
            '{' => {
                self.advance();
                self.token(TokenKind::LBrace, start)
            }
            '}' => {
                self.advance();
                self.token(TokenKind::RBrace, start)
            }
            '=' => {
                self.advance();
                self.token(TokenKind::Equals, start)
            }
            ';' => {
                self.advance();
                self.token(TokenKind::Semicolon, start)
            }

            // Quoted string
            '"' => self.scan_string(),

            // Digit-first lexemes are numbers; `.`/`/`-first are paths
            c if c.is_ascii_digit() => self.scan_number(),
            '.' | '/' => self.scan_path(start),

            // Identifier, which may continue into a path or version suffix
            c if c.is_ascii_alphabetic() => self.scan_ident(),

            // Error: unrecognized character
            _ => {
                self.advance();
                self.error(LexErrorKind::UnexpectedChar, start)
            }
        };

        if token.kind.is_terminal() {
            self.done = true;
        }
        token
    }

    /// Scan an identifier: `[A-Za-z][A-Za-z0-9_]*`.
    ///
    /// An identifier run followed by `.` or `/` continues as a path
    /// (`src/main`, `foo.bar`); followed by `-` and a digit it commits to a
    /// version suffix (`Foo-1.0`).
    fn scan_ident(&mut self) -> Token<'src> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if is_ident_char(c) {
                self.advance();
            } else {
                break;
            }
        }

        match self.peek() {
            Some('.') | Some('/') => self.scan_path(start),
            Some('-') if matches!(self.peek_nth(1), Some(c) if c.is_ascii_digit()) => {
                self.scan_version_suffix(start)
            }
            _ => self.token(TokenKind::Ident, start),
        }
    }

    /// Scan a version suffix: `-digit+ '.' alnum+ ('.' | alnum)*`.
    ///
    /// The suffix is part of the identifier lexeme. Trailing segments are
    /// accepted loosely; no semantic-versioning structure is enforced beyond
    /// the leading `major.minor` shape.
    fn scan_version_suffix(&mut self, start: u32) -> Token<'src> {
        self.advance(); // consume `-`

        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                self.advance();
            } else {
                break;
            }
        }

        if self.peek() != Some('.') {
            return self.error(LexErrorKind::MalformedVersion, start);
        }
        self.advance(); // consume `.`

        match self.peek() {
            Some(c) if c.is_ascii_alphanumeric() => {}
            _ => return self.error(LexErrorKind::MalformedVersion, start),
        }
        while let Some(c) = self.peek() {
            if c.is_ascii_alphanumeric() || c == '.' {
                self.advance();
            } else {
                break;
            }
        }

        self.token(TokenKind::Ident, start)
    }

    /// Scan a number: `digit+ ('.' digit+)?`.
    fn scan_number(&mut self) -> Token<'src> {
        let start = self.pos;
        while let Some(c) = self.peek() {
            if c.is_ascii_digit() {
                self.advance();
            } else {
                break;
            }
        }

        if self.peek() == Some('.') {
            if !matches!(self.peek_nth(1), Some(c) if c.is_ascii_digit()) {
                self.advance(); // include the stray `.` in the error span
                return self.error(LexErrorKind::MalformedNumber, start);
            }
            self.advance(); // consume `.`
            while let Some(c) = self.peek() {
                if c.is_ascii_digit() {
                    self.advance();
                } else {
                    break;
                }
            }
        }

        self.token(TokenKind::Number, start)
    }

    /// Scan a path: slash-separated segments of `[A-Za-z0-9._-]`.
    ///
    /// `start` may precede the cursor when an identifier run turned out to be
    /// the first path segment. A path of exactly `.` is legal.
    fn scan_path(&mut self, start: u32) -> Token<'src> {
        loop {
            while let Some(c) = self.peek() {
                if is_path_char(c) {
                    self.advance();
                } else {
                    break;
                }
            }
            if self.peek() == Some('/') {
                self.advance();
            } else {
                break;
            }
        }
        self.token(TokenKind::Path, start)
    }

    /// Scan a quoted string. `\` escapes the next character verbatim.
    ///
    /// A raw newline or end of input before the closing quote is an
    /// unterminated string.
    fn scan_string(&mut self) -> Token<'src> {
        let start = self.pos;
        self.advance(); // consume opening quote

        loop {
            match self.peek() {
                None | Some('\n') => {
                    return self.error(LexErrorKind::UnclosedString, start);
                }
                Some('"') => {
                    self.advance();
                    return self.token(TokenKind::String, start);
                }
                Some('\\') => {
                    self.advance();
                    if self.peek().is_some() {
                        self.advance();
                    }
                }
                Some(_) => {
                    self.advance();
                }
            }
        }
    }
}

impl<'src> Iterator for Tokenizer<'src> {
    type Item = Token<'src>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        Some(self.next_token())
    }
}

/// Check if a character can continue an identifier.
fn is_ident_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '_'
}

/// Check if a character can appear inside a path segment.
fn is_path_char(c: char) -> bool {
    c.is_ascii_alphanumeric() || c == '.' || c == '-' || c == '_'
}

#[cfg(test)]
mod tests {
    use super::*;

    fn tokenize(source: &str) -> Vec<(TokenKind, &str)> {
        Tokenizer::new(source).map(|t| (t.kind, t.text)).collect()
    }

    #[test]
    fn test_structural_tokens() {
        assert_eq!(
            tokenize("{ } = ;"),
            vec![
                (TokenKind::LBrace, "{"),
                (TokenKind::RBrace, "}"),
                (TokenKind::Equals, "="),
                (TokenKind::Semicolon, ";"),
                (TokenKind::Eof, ""),
            ]
        );
    }

    #[test]
    fn test_empty_input() {
        assert_eq!(tokenize(""), vec![(TokenKind::Eof, "")]);
        assert_eq!(tokenize("  \n\t\r\n "), vec![(TokenKind::Eof, "")]);
    }

    #[test]
    fn test_ident() {
        assert_eq!(
            tokenize("workspace"),
            vec![(TokenKind::Ident, "workspace"), (TokenKind::Eof, "")]
        );
        assert_eq!(
            tokenize("version_set2"),
            vec![(TokenKind::Ident, "version_set2"), (TokenKind::Eof, "")]
        );
    }

    #[test]
    fn test_version_suffixed_ident() {
        assert_eq!(
            tokenize("Foo-1.0"),
            vec![(TokenKind::Ident, "Foo-1.0"), (TokenKind::Eof, "")]
        );
        assert_eq!(
            tokenize("Foo-12.34"),
            vec![(TokenKind::Ident, "Foo-12.34"), (TokenKind::Eof, "")]
        );
        // Loosely-structured trailing segments stay in the lexeme
        assert_eq!(
            tokenize("Foo-1.0.Extra"),
            vec![(TokenKind::Ident, "Foo-1.0.Extra"), (TokenKind::Eof, "")]
        );
    }

    #[test]
    fn test_hyphen_without_digit_ends_ident() {
        // `-` not followed by a digit does not commit to a version suffix;
        // the identifier ends and the `-` fails at top level.
        let tokens = tokenize("Foo-bar");
        assert_eq!(tokens[0], (TokenKind::Ident, "Foo"));
        assert_eq!(
            tokens[1],
            (TokenKind::Error(LexErrorKind::UnexpectedChar), "-")
        );
        assert_eq!(tokens.len(), 2);
    }

    #[test]
    fn test_malformed_version_suffix() {
        // Committed suffix with no `.`
        let tokens = tokenize("Foo-1");
        assert_eq!(
            tokens,
            vec![(TokenKind::Error(LexErrorKind::MalformedVersion), "Foo-1")]
        );
        // Committed suffix with `.` but nothing after it
        let tokens = tokenize("Foo-1.;");
        assert_eq!(
            tokens[0],
            (TokenKind::Error(LexErrorKind::MalformedVersion), "Foo-1.")
        );
    }

    #[test]
    fn test_number() {
        assert_eq!(
            tokenize("42"),
            vec![(TokenKind::Number, "42"), (TokenKind::Eof, "")]
        );
        assert_eq!(
            tokenize("3.14"),
            vec![(TokenKind::Number, "3.14"), (TokenKind::Eof, "")]
        );
    }

    #[test]
    fn test_malformed_number() {
        assert_eq!(
            tokenize("1."),
            vec![(TokenKind::Error(LexErrorKind::MalformedNumber), "1.")]
        );
    }

    #[test]
    fn test_path() {
        assert_eq!(
            tokenize("."),
            vec![(TokenKind::Path, "."), (TokenKind::Eof, "")]
        );
        assert_eq!(
            tokenize("./src/main"),
            vec![(TokenKind::Path, "./src/main"), (TokenKind::Eof, "")]
        );
        assert_eq!(
            tokenize("/usr/lib"),
            vec![(TokenKind::Path, "/usr/lib"), (TokenKind::Eof, "")]
        );
    }

    #[test]
    fn test_ident_continues_into_path() {
        assert_eq!(
            tokenize("src/main"),
            vec![(TokenKind::Path, "src/main"), (TokenKind::Eof, "")]
        );
        assert_eq!(
            tokenize("foo.bar"),
            vec![(TokenKind::Path, "foo.bar"), (TokenKind::Eof, "")]
        );
        assert_eq!(
            tokenize("pkg/sub-dir/file.txt"),
            vec![(TokenKind::Path, "pkg/sub-dir/file.txt"), (TokenKind::Eof, "")]
        );
    }

    #[test]
    fn test_string() {
        assert_eq!(
            tokenize(r#""hello world""#),
            vec![(TokenKind::String, r#""hello world""#), (TokenKind::Eof, "")]
        );
        // Escapes are consumed but not interpreted by the tokenizer
        assert_eq!(
            tokenize(r#""with \"escapes\"""#),
            vec![
                (TokenKind::String, r#""with \"escapes\"""#),
                (TokenKind::Eof, ""),
            ]
        );
    }

    #[test]
    fn test_unterminated_string() {
        let tokens = tokenize(r#""hello"#);
        assert_eq!(
            tokens,
            vec![(TokenKind::Error(LexErrorKind::UnclosedString), "\"hello")]
        );
        // A raw newline also kills the string
        let tokens = tokenize("\"hello\nworld\"");
        assert_eq!(
            tokens[0],
            (TokenKind::Error(LexErrorKind::UnclosedString), "\"hello")
        );
        assert_eq!(tokens.len(), 1);
    }

    #[test]
    fn test_fail_fast_on_illegal_character() {
        // The first malformed character produces one error token and the
        // sequence ends; nothing after it is scanned.
        let tokens = tokenize("# comment\nfoo = bar;");
        assert_eq!(
            tokens,
            vec![(TokenKind::Error(LexErrorKind::UnexpectedChar), "#")]
        );
    }

    #[test]
    fn test_declaration() {
        assert_eq!(
            tokenize(r#"ident1 = "value1";"#),
            vec![
                (TokenKind::Ident, "ident1"),
                (TokenKind::Equals, "="),
                (TokenKind::String, r#""value1""#),
                (TokenKind::Semicolon, ";"),
                (TokenKind::Eof, ""),
            ]
        );
    }

    #[test]
    fn test_nested_object() {
        assert_eq!(
            tokenize("base = { workspace = ws1; };"),
            vec![
                (TokenKind::Ident, "base"),
                (TokenKind::Equals, "="),
                (TokenKind::LBrace, "{"),
                (TokenKind::Ident, "workspace"),
                (TokenKind::Equals, "="),
                (TokenKind::Ident, "ws1"),
                (TokenKind::Semicolon, ";"),
                (TokenKind::RBrace, "}"),
                (TokenKind::Semicolon, ";"),
                (TokenKind::Eof, ""),
            ]
        );
    }

    #[test]
    fn test_tokenize_twice_is_identical() {
        let source = r#"base = { workspace = ws1; versionSet = "vs1"; };
packages = { Foo-1.0 = .; };"#;
        let first: Vec<_> = Tokenizer::new(source).collect();
        let second: Vec<_> = Tokenizer::new(source).collect();
        assert_eq!(first, second);
    }

    #[test]
    fn test_spans_slice_back_to_source() {
        let source = "a = b;";
        for token in Tokenizer::new(source) {
            assert_eq!(token.span.slice(source), token.text);
        }
    }
}
