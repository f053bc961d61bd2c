//! Compile-time errors (spec.md §4.2 "Errors").
//!
//! These are `thiserror`-derived, fatal-to-the-whole-compilation errors —
//! distinct from the ADT-level `Bottom` value the evaluator produces for
//! per-vertex evaluation failures.

use rowan::TextRange;
use thiserror::Error;

#[derive(Debug, Clone, Error)]
pub enum CompileError {
    #[error("unresolved reference: {name}")]
    UnresolvedReference { name: String },

    #[error("cyclic alias: {name} depends on its own value at the same scope")]
    CyclicAlias { name: String },

    #[error("invalid label: {reason}")]
    InvalidLabel { reason: String },

    #[error("duplicate alias {name} in the same scope")]
    DuplicateAlias { name: String },

    #[error("unused alias {name}")]
    UnusedAlias { name: String },

    #[error(
        "unused let {name}: every `if` clause guarding its use may fail to fire"
    )]
    UnusedLet { name: String },

    #[error("`{name}` requires version {required} or newer (file is {actual})")]
    VersionError {
        name: String,
        required: String,
        actual: String,
    },

    #[error("`{name}` requires experiment `{experiment}` to be enabled")]
    ExperimentRequired { name: String, experiment: String },

    #[error("`_` is not a valid field label or alias name")]
    UnderscoreLabel,

    #[error("a comprehension's first clause must be `for` or `if`")]
    InvalidComprehensionStart,
}

impl CompileError {
    pub fn range(&self) -> Option<TextRange> {
        None
    }
}

pub type CompileResult<T> = Result<T, CompileError>;
