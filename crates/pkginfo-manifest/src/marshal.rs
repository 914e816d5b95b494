//! Marshalling from the AST into the typed manifest model.
//!
//! Two phases: a fail-fast semantic validation walk over the tree, then a
//! projection through an ordered field map into [`PackageManifest`]. Only
//! this stage carries branching business rules; malformed shapes are
//! rejected rather than guessed at.

use pkginfo_parse::{AstNode, SyntaxError};
use pkginfo_tokenizer::{Span, TokenKind};
use tracing::trace;

use crate::{BaseInfo, PackageDecl, PackageManifest};

/// Why marshalling failed.
///
/// Upstream tokenizer and parser failures are forwarded verbatim in
/// [`MarshalError::Syntax`]; the other variants originate here.
#[derive(Debug, Clone, PartialEq)]
pub enum MarshalError {
    /// The AST is an error node; the original failure is carried unchanged.
    Syntax(SyntaxError),
    /// A terminal failed semantic validation.
    Semantic {
        /// What was wrong.
        message: String,
        /// Where the offending terminal sits in the source.
        span: Span,
    },
    /// A well-formed tree whose shape does not match the manifest schema.
    Schema {
        /// What was wrong.
        message: String,
        /// Where the offending declaration sits in the source.
        span: Span,
    },
}

impl std::fmt::Display for MarshalError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            MarshalError::Syntax(err) => write!(f, "{}", err),
            MarshalError::Semantic { message, span } => {
                write!(f, "{} at offset {}", message, span.start)
            }
            MarshalError::Schema { message, span } => {
                write!(f, "{} at offset {}", message, span.start)
            }
        }
    }
}

impl std::error::Error for MarshalError {}

/// A projected declaration value: terminal text or a nested field map.
enum FieldValue {
    Text(String),
    Object(Fields),
}

/// One projected declaration.
struct Field {
    key: String,
    value: FieldValue,
    span: Span,
}

/// An ordered key-to-value projection of an object's declarations.
///
/// The DSL treats keys as a map, but declaration order is significant for
/// `packages`, so this stays a vector. Lookup is last-match, the same as
/// repeated map assignment: a later declaration overwrites an earlier one.
struct Fields(Vec<Field>);

impl Fields {
    fn get(&self, key: &str) -> Option<&Field> {
        self.0.iter().rev().find(|f| f.key == key)
    }
}

/// Marshal a parse result into a [`PackageManifest`].
pub fn marshal(ast: &AstNode<'_>) -> Result<PackageManifest, MarshalError> {
    if let AstNode::Error(err) = ast {
        return Err(MarshalError::Syntax(err.clone()));
    }

    validate(ast)?;

    let AstNode::Object { decls, .. } = ast else {
        return Err(MarshalError::Schema {
            message: "manifest root must be an object".to_string(),
            span: ast.span(),
        });
    };
    let fields = project(decls)?;

    let base = marshal_base(fields.get("base"))?;
    let packages = marshal_packages(fields.get("packages"))?;
    trace!("marshalled manifest with {} packages", packages.len());
    Ok(PackageManifest { base, packages })
}

/// Recursive semantic validation. Fails fast on the first violation; siblings
/// after it are not examined.
fn validate(node: &AstNode<'_>) -> Result<(), MarshalError> {
    match node {
        AstNode::Error(err) => Err(MarshalError::Syntax(err.clone())),
        AstNode::Terminal {
            kind: kind @ (TokenKind::Ident | TokenKind::Number | TokenKind::Path),
            lexeme,
            span,
        } if lexeme.is_empty() => Err(MarshalError::Semantic {
            message: format!("invalid {:?}: empty lexeme", kind),
            span: *span,
        }),
        AstNode::Terminal { .. } => Ok(()),
        AstNode::Decl { ident, value, .. } => {
            validate(ident)?;
            validate(value)
        }
        AstNode::Object { decls, .. } => {
            for decl in decls {
                validate(decl)?;
            }
            Ok(())
        }
    }
}

/// Project an object's declarations into an ordered field map. Nested objects
/// become nested maps; terminals become their lexemes.
fn project(decls: &[AstNode<'_>]) -> Result<Fields, MarshalError> {
    let mut fields = Vec::with_capacity(decls.len());
    for node in decls {
        let AstNode::Decl { ident, value, span } = node else {
            return Err(MarshalError::Schema {
                message: "expected a declaration".to_string(),
                span: node.span(),
            });
        };
        let Some((_, key)) = ident.as_terminal() else {
            return Err(MarshalError::Schema {
                message: "declaration key must be an identifier".to_string(),
                span: ident.span(),
            });
        };
        let value = match value.as_ref() {
            AstNode::Object { decls, .. } => FieldValue::Object(project(decls)?),
            AstNode::Terminal { lexeme, .. } => FieldValue::Text(lexeme.to_string()),
            other => {
                return Err(MarshalError::Schema {
                    message: "declaration value must be a terminal or an object".to_string(),
                    span: other.span(),
                });
            }
        };
        fields.push(Field {
            key: key.to_string(),
            value,
            span: *span,
        });
    }
    Ok(Fields(fields))
}

/// Extract the `base` section. Absent means zero values; present but not an
/// object is a schema error.
fn marshal_base(field: Option<&Field>) -> Result<BaseInfo, MarshalError> {
    match field {
        None => Ok(BaseInfo::default()),
        Some(Field {
            value: FieldValue::Object(fields),
            ..
        }) => Ok(BaseInfo {
            workspace: text_field(fields, "workspace")?,
            version_set: text_field(fields, "versionSet")?,
        }),
        Some(field) => Err(MarshalError::Schema {
            message: "`base` must be an object".to_string(),
            span: field.span,
        }),
    }
}

/// Extract the `packages` section, preserving declaration order. Every value
/// must be a terminal naming the package's source location.
fn marshal_packages(field: Option<&Field>) -> Result<Vec<PackageDecl>, MarshalError> {
    match field {
        None => Ok(Vec::new()),
        Some(Field {
            value: FieldValue::Object(fields),
            ..
        }) => {
            let mut packages = Vec::with_capacity(fields.0.len());
            for field in &fields.0 {
                match &field.value {
                    FieldValue::Text(location) => packages.push(PackageDecl {
                        name: field.key.clone(),
                        location: location.clone(),
                    }),
                    FieldValue::Object(_) => {
                        return Err(MarshalError::Schema {
                            message: format!(
                                "package `{}` location must be a path or string",
                                field.key
                            ),
                            span: field.span,
                        });
                    }
                }
            }
            Ok(packages)
        }
        Some(field) => Err(MarshalError::Schema {
            message: "`packages` must be an object".to_string(),
            span: field.span,
        }),
    }
}

/// A string-valued leaf of `base`. Absent means empty; an object is a schema
/// error.
fn text_field(fields: &Fields, key: &str) -> Result<String, MarshalError> {
    match fields.get(key) {
        None => Ok(String::new()),
        Some(Field {
            value: FieldValue::Text(text),
            ..
        }) => Ok(text.clone()),
        Some(field) => Err(MarshalError::Schema {
            message: format!("`{}` must be a string-like value", key),
            span: field.span,
        }),
    }
}
