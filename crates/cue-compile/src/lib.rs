//! AST-to-ADT compiler: scope resolution, alias/let semantics,
//! comprehension desugaring, and version gating (spec.md §4.2).
//!
//! The parser is out of scope (see `cue_core::ast`); this crate's input is
//! already a resolved-or-partially-resolved [`cue_core::ast::File`] list and
//! its output is a root [`cue_core::VertexId`] whose conjuncts `cue-eval`
//! can finalize.

mod alias;
mod closedness;
mod comprehension;
mod compiler;
mod config;
mod disjunction;
mod error;
mod fields;
mod frame;
mod let_compile;
mod resolve;
mod version;

pub use compiler::{Compiler, CompilerBuilder};
pub use config::{Config, ImportResolver, NoImports, OuterScope, ResolvedImport};
pub use error::{CompileError, CompileResult};
pub use resolve::{BuiltinInfo, BuiltinLookup, NoBuiltins};
pub use version::{check_experiment, check_version, satisfies};
