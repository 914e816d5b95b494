//! End-to-end coverage of the tokenize/parse/marshal pipeline.

use pkginfo_manifest::{
    from_str, parse_pipelined, BaseInfo, MarshalError, PackageDecl, PackageManifest,
};

#[test]
fn single_declaration_manifest() {
    // `ident1` is not a well-known key, so the manifest is empty but valid.
    let manifest = from_str(r#"ident1 = "value1";"#).unwrap();
    assert_eq!(manifest, PackageManifest::default());
}

#[test]
fn typical_workspace_manifest() {
    let source = r#"
base = {
    workspace = ws1;
    versionSet = "vs1";
};
packages = {
    Foo-1.0 = .;
    BarUtils-2.3 = ./libs/bar;
    Baz-1.0.Extra = packages/baz;
};
"#;
    let manifest = from_str(source).unwrap();
    assert_eq!(
        manifest.base,
        BaseInfo {
            workspace: "ws1".to_string(),
            version_set: "vs1".to_string(),
        }
    );
    assert_eq!(
        manifest.packages,
        vec![
            PackageDecl {
                name: "Foo-1.0".to_string(),
                location: ".".to_string(),
            },
            PackageDecl {
                name: "BarUtils-2.3".to_string(),
                location: "./libs/bar".to_string(),
            },
            PackageDecl {
                name: "Baz-1.0.Extra".to_string(),
                location: "packages/baz".to_string(),
            },
        ]
    );
}

#[test]
fn schema_violation_is_not_a_crash() {
    let err = from_str(r#"packages = "not-an-object";"#).unwrap_err();
    assert!(matches!(err, MarshalError::Schema { .. }));
}

#[test]
fn lexical_failure_reaches_the_caller_unchanged() {
    let err = from_str("a = \"unterminated").unwrap_err();
    let MarshalError::Syntax(syntax) = err else {
        panic!("expected syntax error, got {:?}", err);
    };
    assert_eq!(syntax.message(), "unclosed string");
}

#[test]
fn invalid_input_never_yields_a_partial_manifest() {
    // A good first section does not leak through when a later one is bad.
    let source = r#"base = { workspace = ws1; }; packages = nope-at = all"#;
    assert!(from_str(source).is_err());
    assert!(parse_pipelined(source).is_err());
}

#[test]
fn repeated_key_takes_the_later_value() {
    let manifest = from_str("base = { workspace = first; workspace = second; };").unwrap();
    assert_eq!(manifest.base.workspace, "second");
}

#[test]
fn deeply_nested_unknown_sections_are_tolerated() {
    let source = "extra = { a = { b = { c = { d = e; }; }; }; }; base = { workspace = w; };";
    let manifest = from_str(source).unwrap();
    assert_eq!(manifest.base.workspace, "w");
}
