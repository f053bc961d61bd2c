//! The facade crate (spec.md §6): wires `cue-compile`, `cue-eval`,
//! `cue-builtins`, and `cue-export` into one `Engine`, in the shape of the
//! teacher's top-level `plotnik-lib` re-export list.

pub mod engine;
pub mod error;

pub use cue_core::diagnostics::{Diagnostics, DiagnosticsPrinter, Severity};
pub use cue_core::{Errors, Runtime, VertexId};
pub use engine::Engine;
pub use error::{Error, Result};

pub use cue_compile::{Config, ImportResolver, NoImports, OuterScope};
pub use cue_core::ast;
