//! Fatal, whole-compilation errors (spec.md §7: `VersionError`,
//! `UnresolvedReference` are "compile-time; terminal for the whole
//! compilation").
//!
//! This is the *control*-level error type: it aborts a `compile_files`/
//! `compile_expr` call outright. The ADT-level `Bottom` (`cue_core::errors`)
//! is the *data*-level error produced per vertex during evaluation; the two
//! never overlap, mirroring `plotnik-lib`'s own split between its facade
//! `Error` enum and `Diagnostics`.

use cue_compile::CompileError;

/// Errors `cue-lib`'s facade can return. Presently just a wrapper around
/// [`CompileError`]; kept as its own enum (rather than a re-export) so a
/// future control-level failure that isn't a compile error — e.g. an
/// unresolvable `OuterScope` — has somewhere to go without breaking callers.
#[derive(Debug, Clone, thiserror::Error)]
pub enum Error {
    #[error(transparent)]
    Compile(#[from] CompileError),
}

impl Error {
    /// Render as a single-line diagnostic, in the shape of
    /// `cue_core::errors::Errors::render`.
    pub fn render(&self) -> String {
        self.to_string()
    }
}

pub type Result<T> = std::result::Result<T, Error>;
