//! Compiler configuration and the external collaborators it consults
//! (spec.md §6).

use std::rc::Rc;

use indexmap::IndexMap;

use cue_core::ast::File;
use cue_core::{Feature, VertexId};

use crate::error::CompileError;

/// `{pkg_id, files}` or an error, returned by an import resolution.
pub struct ResolvedImport {
    pub pkg_id: String,
    pub files: Vec<File>,
}

/// Resolves an import path to a package's files, invoked lazily when an
/// import is first dereferenced (spec.md §6). Path discovery and IO are the
/// caller's responsibility.
pub trait ImportResolver {
    fn resolve(&self, path: &str) -> Result<ResolvedImport, CompileError>;
}

/// An import resolver that rejects every path, for configurations with no
/// outside packages (e.g. `compile_expr` against a closed expression).
pub struct NoImports;

impl ImportResolver for NoImports {
    fn resolve(&self, path: &str) -> Result<ResolvedImport, CompileError> {
        Err(CompileError::UnresolvedReference {
            name: path.to_string(),
        })
    }
}

/// A chain of scope nodes exposing pre-existing compiled values, used when
/// the caller wants compiled expressions to reference values outside the
/// file being compiled (e.g. a REPL). References walk outer scopes after
/// file scope (spec.md §6).
#[derive(Clone)]
pub struct OuterScope {
    pub parent: Option<Rc<OuterScope>>,
    pub vertex: VertexId,
    /// Field names visible at this scope level, precomputed by the caller
    /// that built the scope (e.g. a REPL) so resolution rule 3 (spec.md
    /// §4.2) never has to reach back into a `Runtime`.
    pub fields: Rc<IndexMap<String, Feature>>,
}

impl OuterScope {
    pub fn parent(&self) -> Option<&OuterScope> {
        self.parent.as_deref()
    }

    pub fn vertex(&self) -> VertexId {
        self.vertex
    }

    pub fn resolve(&self, name: &str) -> Option<Feature> {
        let mut scope = Some(self);
        while let Some(s) = scope {
            if let Some(feature) = s.fields.get(name) {
                return Some(*feature);
            }
            scope = s.parent.as_deref();
        }
        None
    }
}

/// Compiler configuration (spec.md §4.2 "Input").
pub struct Config<'a> {
    pub scope: Option<Rc<OuterScope>>,
    pub import_resolver: &'a dyn ImportResolver,
    pub package_path: String,
}

impl<'a> Config<'a> {
    pub fn new(package_path: impl Into<String>, import_resolver: &'a dyn ImportResolver) -> Self {
        Self {
            scope: None,
            import_resolver,
            package_path: package_path.into(),
        }
    }

    pub fn with_scope(mut self, scope: Rc<OuterScope>) -> Self {
        self.scope = Some(scope);
        self
    }
}
