//! Typed manifest model for package-info workspace manifests.
//!
//! This crate ties the pipeline together: tokenize, parse, then marshal the
//! AST into a [`PackageManifest`]. Use [`from_str`] for the synchronous
//! composition or [`parse_pipelined`] to run the stages concurrently.

mod model;
pub use model::{BaseInfo, PackageDecl, PackageManifest};

mod marshal;
pub use marshal::{marshal, MarshalError};

mod diagnostic;

mod pipeline;
pub use pipeline::parse_pipelined;

pub use pkginfo_parse::{AstNode, Parser, SyntaxError, SyntaxErrorKind};
pub use pkginfo_tokenizer::{LexErrorKind, Span, Token, TokenKind, Tokenizer};

/// Parse a manifest into its typed model.
pub fn from_str(source: &str) -> Result<PackageManifest, MarshalError> {
    let ast = pkginfo_parse::parse(source);
    marshal(&ast)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_from_str() {
        let manifest = from_str(
            r#"base = { workspace = ws1; versionSet = "vs1"; };
packages = { Foo-1.0 = .; };"#,
        )
        .unwrap();
        assert_eq!(manifest.base.workspace, "ws1");
        assert_eq!(manifest.base.version_set, "vs1");
        assert_eq!(manifest.packages.len(), 1);
        assert_eq!(manifest.packages[0].name, "Foo-1.0");
        assert_eq!(manifest.packages[0].location, ".");
    }

    #[test]
    fn test_from_str_reports_first_failure() {
        // The tokenizer fails first; the parser and marshaller never run on
        // partial input, and the original reason reaches the caller.
        let err = from_str("a = \"unterminated").unwrap_err();
        let MarshalError::Syntax(syntax) = err else {
            panic!("expected forwarded syntax error");
        };
        assert_eq!(syntax.message(), "unclosed string");
    }
}
