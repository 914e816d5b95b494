//! The typed manifest model.
//!
//! Constructed once, atomically, by [`marshal`](crate::marshal) from a
//! validated AST; immutable thereafter and owned by the caller.

/// The `base` section of a manifest: which workspace the packages belong to
/// and which version set they build against.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct BaseInfo {
    /// The workspace name.
    pub workspace: String,
    /// The version set name.
    pub version_set: String,
}

/// One entry of the `packages` section.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PackageDecl {
    /// The package identifier, possibly version-suffixed (`Foo-1.0`).
    pub name: String,
    /// Where the package sources live.
    pub location: String,
}

/// A fully marshalled package manifest.
///
/// Missing `base` or `packages` sections marshal to their zero values rather
/// than failing; `packages` preserves declaration order.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PackageManifest {
    /// The `base` section, or its default when absent.
    pub base: BaseInfo,
    /// The declared packages, in declaration order.
    pub packages: Vec<PackageDecl>,
}
