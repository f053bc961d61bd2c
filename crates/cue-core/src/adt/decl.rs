//! Struct-literal contents: field declarations and comprehensions
//! (spec.md §3 "Decls" and "Comprehension clauses").

use std::rc::Rc;

use crate::feature::Feature;

use super::expr::Expr;
use super::SourceInfo;

/// The arc-type a `Field` declares (required/optional, definitions close
/// implicitly — tracked separately via `CloseInfo`).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldMeta {
    Required,
    Optional,
}

#[derive(Debug, Clone)]
pub struct FieldDecl {
    pub feature: Feature,
    pub value: Rc<Expr>,
    pub meta: FieldMeta,
    pub info: SourceInfo,
}

/// One declaration inside a `StructLit`.
#[derive(Debug, Clone)]
pub enum Decl {
    Field(FieldDecl),
    /// `[X]: v` — matched against every sibling arc whose feature satisfies
    /// `filter` (spec.md §4.2 "Dynamic and pattern fields").
    BulkOptionalField {
        filter: Rc<Expr>,
        value: Rc<Expr>,
        /// The name the pattern binds for `LabelReference` lookups inside
        /// `value`, e.g. `[Name=string]: {key: Name}`.
        alias: Option<Feature>,
        info: SourceInfo,
    },
    /// A label computed from a parenthesized or interpolated expression.
    DynamicField {
        label_expr: Rc<Expr>,
        value: Rc<Expr>,
        info: SourceInfo,
    },
    /// A hidden, scope-qualified `let` binding (spec.md §4.2 "Let
    /// semantics"). `is_multi` marks lets that transitively reference a
    /// for-comprehension variable and must be instantiated per iteration.
    LetField {
        feature: Feature,
        value: Rc<Expr>,
        is_multi: bool,
        info: SourceInfo,
    },
    /// Marks a list (or, via a bulk field, a struct) as open; `element`
    /// constrains unmatched positions/arcs when present.
    Ellipsis {
        element: Option<Rc<Expr>>,
        info: SourceInfo,
    },
    /// An embedded value: contributes as a nested conjunct at the same
    /// level (spec.md §4.4 step 2).
    Embedding(Rc<Expr>),
    Comprehension(Comprehension),
}

/// A desugared comprehension: a chain of clauses terminated by the struct
/// literal to emit per matching iteration (spec.md §4.2 "Comprehension
/// lowering").
#[derive(Debug, Clone)]
pub struct Comprehension {
    pub clauses: Rc<[Clause]>,
    pub value: Rc<[Decl]>,
    pub info: SourceInfo,
}

/// One link of a desugared comprehension clause chain.
#[derive(Debug, Clone)]
pub enum Clause {
    For {
        key: Option<Feature>,
        value: Feature,
        source: Rc<Expr>,
    },
    If {
        cond: Rc<Expr>,
    },
    Let {
        feature: Feature,
        value: Rc<Expr>,
    },
}
