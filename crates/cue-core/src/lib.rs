//! Core data structures for the CUE constraint evaluator.
//!
//! Three layers, leaves first:
//! - **Feature table** (`feature`): string-interning index producing
//!   compact, tagged field identifiers.
//! - **ADT** (`adt`): the closed `Expr`/`Decl` sum types and `Value`
//!   markers that make up a compiled conjunct.
//! - **Graph** (`vertex`, `env`, `runtime`): the arena-indexed `Vertex`/
//!   `Environment` graph a `Runtime` owns for one evaluation session.
//!
//! `ast` defines the external parser's input contract (spec.md §6); the
//! parser itself is out of scope for this crate.

#![cfg_attr(coverage_nightly, feature(coverage_attribute))]

pub mod adt;
pub mod ast;
pub mod diagnostics;
pub mod env;
pub mod errors;
pub mod feature;
pub mod kind;
pub mod regex_cache;
pub mod runtime;
pub mod vertex;

pub use env::{EnvArena, EnvId, Environment};
pub use errors::{Bottom, ErrorCode, ErrorRecord, Errors};
pub use feature::{Feature, FeatureTag, Interner};
pub use kind::Kind;
pub use regex_cache::RegexCache;
pub use runtime::Runtime;
pub use vertex::{StructInfo, Status, Vertex, VertexId};
