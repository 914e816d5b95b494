//! Concurrent staged composition of the manifest pipeline.
//!
//! The tokenizer and parser run as independent stages connected by bounded
//! FIFO channels; the marshaller consumes the single AST handoff on the
//! calling thread. Token order over the channel is exactly tokenizer order,
//! so the result is identical to the synchronous [`from_str`](crate::from_str)
//! composition.

use crossbeam_channel::bounded;
use pkginfo_parse::{AstNode, Parser, ParseErrorKind, SyntaxError};
use pkginfo_tokenizer::{Span, Token, Tokenizer};

use crate::marshal::{marshal, MarshalError};
use crate::PackageManifest;

/// Token channel capacity. The tokenizer suspends when the parser falls this
/// far behind; a disconnected receiver (parser done early after an error)
/// unblocks it instead of leaking a wedged stage.
const TOKEN_BUFFER: usize = 256;

/// Parse a manifest with each stage on its own thread.
pub fn parse_pipelined(source: &str) -> Result<PackageManifest, MarshalError> {
    let ast = std::thread::scope(|scope| {
        let (token_tx, token_rx) = bounded::<Token<'_>>(TOKEN_BUFFER);
        let (ast_tx, ast_rx) = bounded::<AstNode<'_>>(1);

        scope.spawn(move || {
            let mut tokenizer = Tokenizer::new(source);
            loop {
                let token = tokenizer.next_token();
                let terminal = token.kind.is_terminal();
                if token_tx.send(token).is_err() {
                    // Receiver gone; the parser stopped early.
                    break;
                }
                if terminal {
                    break;
                }
            }
        });

        scope.spawn(move || {
            let parser = Parser::from_tokens(token_rx.into_iter());
            // The receiver may be gone if the caller's scope unwound.
            let _ = ast_tx.send(parser.parse());
        });

        ast_rx.recv().unwrap_or_else(|_| {
            AstNode::Error(SyntaxError::parse(
                ParseErrorKind::UnexpectedEndOfTokens,
                Span::empty(0),
                None,
            ))
        })
    });

    marshal(&ast)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::from_str;

    #[test]
    fn test_pipelined_matches_synchronous() {
        let sources = [
            "",
            r#"ident1 = "value1";"#,
            r#"base = { workspace = ws1; versionSet = "vs1"; };
packages = { Foo-1.0 = .; Bar-2.0 = ./bar; };"#,
            "a = { b = { c = d; }; };",
        ];
        for source in sources {
            assert_eq!(parse_pipelined(source).unwrap(), from_str(source).unwrap());
        }
    }

    #[test]
    fn test_pipelined_matches_synchronous_on_errors() {
        let sources = [
            "a = \"unterminated",
            "a = ;",
            r#"packages = "not-an-object";"#,
            "# nope",
        ];
        for source in sources {
            assert_eq!(
                parse_pipelined(source).unwrap_err(),
                from_str(source).unwrap_err(),
            );
        }
    }

    #[test]
    fn test_pipelined_survives_early_parser_exit() {
        // The parse error sits near the front of a long token stream; the
        // parser drops its receiver long before the tokenizer is done, and
        // the tokenizer must unblock rather than wedge.
        let mut source = String::from("a = ; ");
        for i in 0..2048 {
            source.push_str(&format!("k{} = v;\n", i));
        }
        assert!(parse_pipelined(&source).is_err());
    }
}
