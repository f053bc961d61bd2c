//! The abstract data tree: the closed `Expr`/`Decl` sum types produced by
//! `cue-compile`, the `Value` markers a `Vertex` resolves to, and the
//! `Conjunct`/`CloseInfo` bookkeeping the evaluator needs (spec.md §3, §9).
//!
//! Per spec.md §9 ("Dynamic dispatch on Value/Expr variants"), these are
//! closed tagged unions matched exhaustively — no trait objects. Expression
//! trees are immutable once compiled and are shared across conjuncts via
//! `Rc`, since "Conjuncts outlive their creating Environment" and "sharing
//! across conjuncts is permitted" (spec.md §3).

mod decl;
mod expr;
mod value;

pub use decl::{Clause, Comprehension, Decl, FieldDecl, FieldMeta};
pub use expr::{BinaryOp, BoundOp, Expr, StringPart, UnaryOp};
pub use value::{BoundValue, MatchNValidator, NumValue, Value};

use std::rc::Rc;

use rowan::TextRange;

use crate::env::EnvId;
use crate::feature::Feature;

/// Which definition boundary (if any) a conjunct was contributed through.
///
/// Definitions close; plain structs do not. `CloseInfo` is a small linked
/// chain rather than a single bool so that re-opening by embedding a closed
/// value in a non-definition struct (spec.md §8, closedness monotonicity)
/// can be verified by walking provenance instead of trusting a flag.
#[derive(Debug, Clone, Default)]
pub struct CloseInfo {
    /// `true` if this conjunct was contributed from within (or via
    /// embedding of) a definition.
    pub is_closed: bool,
    /// The enclosing definitions' display names, innermost first, purely
    /// for diagnostics ("field not allowed by #Foo").
    pub defs: Rc<Vec<Feature>>,
}

impl CloseInfo {
    pub fn open() -> Self {
        Self::default()
    }

    /// Derive the `CloseInfo` for conjuncts nested inside a definition
    /// labeled `def_feature`.
    pub fn enter_definition(&self, def_feature: Feature) -> Self {
        let mut defs = (*self.defs).clone();
        defs.push(def_feature);
        Self {
            is_closed: true,
            defs: Rc::new(defs),
        }
    }

    /// Re-opening: embedding a closed value's conjuncts into a struct that
    /// is itself not a definition keeps the *original* closedness
    /// provenance (the embedded value still enforces its own field set),
    /// it just does not additionally close the outer struct.
    pub fn embed(&self) -> Self {
        self.clone()
    }
}

/// One contribution to a vertex's value: `(Environment, Elem, CloseInfo)`.
#[derive(Debug, Clone)]
pub struct Conjunct {
    pub env: EnvId,
    pub expr: Rc<Expr>,
    pub close_info: CloseInfo,
}

impl Conjunct {
    pub fn new(env: EnvId, expr: Rc<Expr>, close_info: CloseInfo) -> Self {
        Self {
            env,
            expr,
            close_info,
        }
    }
}

/// Up-count based reference resolution target classification, shared by all
/// reference variants in [`Expr`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct UpCount(pub u32);

/// Position-carrying wrapper, attached to ADT nodes that need it for
/// diagnostics and for `cue-export`'s AST back-pointer requirement
/// (spec.md §6: "the evaluator must preserve enough source information ...
/// to make [export] possible").
#[derive(Debug, Clone, Copy, Default)]
pub struct SourceInfo {
    pub range: Option<TextRange>,
}

impl SourceInfo {
    pub fn new(range: TextRange) -> Self {
        Self { range: Some(range) }
    }

    pub fn none() -> Self {
        Self { range: None }
    }
}

#[cfg(test)]
mod close_info_tests {
    use super::*;

    #[test]
    fn enter_definition_closes_and_records_the_def() {
        let mut interner = crate::feature::Interner::new();
        let def = interner.intern("#Foo");
        let open = CloseInfo::open();
        assert!(!open.is_closed);
        let closed = open.enter_definition(def);
        assert!(closed.is_closed);
        assert_eq!(&*closed.defs, &vec![def]);
    }

    // spec.md §8 "Closedness monotonicity": "reopening (by embedding the
    // closed value in a non-definition) preserves the closedness of the
    // original" — `embed` must not clear `is_closed` or drop `defs`.
    #[test]
    fn embed_preserves_original_closedness_provenance() {
        let mut interner = crate::feature::Interner::new();
        let def = interner.intern("#Foo");
        let closed = CloseInfo::open().enter_definition(def);
        let embedded = closed.embed();
        assert_eq!(embedded.is_closed, closed.is_closed);
        assert_eq!(&*embedded.defs, &*closed.defs);
    }

    #[test]
    fn embedding_an_open_close_info_stays_open() {
        let open = CloseInfo::open();
        let embedded = open.embed();
        assert!(!embedded.is_closed);
    }
}
