//! ADT → AST regeneration (spec.md §6 "export"), kept deliberately thin:
//! export semantics beyond round-tripping a finalized value's shape are out
//! of scope.

pub mod export;

pub use export::{export_expr, export_vertex};
