//! The compiled expression sum type (spec.md §3 "Expr / Elem / Decl").

use std::rc::Rc;

use crate::feature::Feature;

use super::decl::Decl;
use super::{SourceInfo, UpCount};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnaryOp {
    Neg,
    Plus,
    Not,
}

/// Binary operators at the evaluator level (spec.md §4.3). `And`/`Or` are
/// the lattice meet/join; the rest are ordinary scalar operators.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BinaryOp {
    And,
    Or,
    Add,
    Sub,
    Mul,
    Div,
    Eq,
    Neq,
    Lt,
    Lte,
    Gt,
    Gte,
    Matches,
    NotMatches,
}

/// The operator half of a `BoundValue{Op, Value}` (spec.md §4.3/§4.4).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum BoundOp {
    Lt,
    Lte,
    Gt,
    Gte,
    Neq,
    Matches,
    NotMatches,
}

#[derive(Debug, Clone)]
pub enum StringPart {
    Literal(Rc<str>),
    Expr(Rc<Expr>),
}

/// The closed sum of compiled expression forms (spec.md §3).
#[derive(Debug, Clone)]
pub enum Expr {
    Null(SourceInfo),
    Bool(bool, SourceInfo),
    Int(i64, SourceInfo),
    Float(f64, SourceInfo),
    String(Rc<str>, SourceInfo),
    Bytes(Rc<[u8]>, SourceInfo),
    Top(SourceInfo),
    Bottom(SourceInfo),

    StructLit {
        decls: Rc<[Decl]>,
        info: SourceInfo,
    },
    ListLit {
        elements: Rc<[Expr]>,
        ellipsis: Option<Rc<Expr>>,
        info: SourceInfo,
    },

    /// Resolves a struct field by feature, walking `up_count` Environment
    /// links (spec.md §4.2 rule 1/2/3).
    FieldReference {
        up_count: UpCount,
        feature: Feature,
        info: SourceInfo,
    },
    /// Resolves to the vertex bound at the target environment itself (used
    /// for embedded-scalar scopes pushed with `upCount = 0`).
    ValueReference { up_count: UpCount, info: SourceInfo },
    /// Resolves to the label (key) bound by an enclosing bulk-optional
    /// pattern alias, e.g. `[Name=string]: {key: Name}`.
    LabelReference { up_count: UpCount, info: SourceInfo },
    /// Resolves a computed/dynamic field's bound alias.
    DynamicReference {
        up_count: UpCount,
        label_expr: Rc<Expr>,
        info: SourceInfo,
    },
    /// Resolves a `let` binding by its globally-unique feature.
    LetReference {
        up_count: UpCount,
        feature: Feature,
        info: SourceInfo,
    },
    /// Resolved lazily through the `ImportResolver` (spec.md §6).
    ImportReference { pkg_path: Rc<str>, info: SourceInfo },

    UnaryExpr {
        op: UnaryOp,
        operand: Rc<Expr>,
        info: SourceInfo,
    },
    BinaryExpr {
        op: BinaryOp,
        lhs: Rc<Expr>,
        rhs: Rc<Expr>,
        info: SourceInfo,
    },
    BoundExpr {
        op: BoundOp,
        operand: Rc<Expr>,
        info: SourceInfo,
    },
    Interpolation {
        parts: Rc<[StringPart]>,
        info: SourceInfo,
    },
    CallExpr {
        func: Rc<Expr>,
        args: Rc<[Expr]>,
        info: SourceInfo,
    },
    SelectorExpr {
        base: Rc<Expr>,
        field: Feature,
        info: SourceInfo,
    },
    IndexExpr {
        base: Rc<Expr>,
        index: Rc<Expr>,
        info: SourceInfo,
    },
    SliceExpr {
        base: Rc<Expr>,
        low: Option<Rc<Expr>>,
        high: Option<Rc<Expr>>,
        info: SourceInfo,
    },
    /// A flat `a | b | c` with default markers (spec.md §4.2 "Disjunction
    /// flattening").
    DisjunctionExpr {
        values: Rc<[(Expr, bool)]>,
        info: SourceInfo,
    },
    /// A reference to a registered builtin (spec.md §4.5); the function
    /// pointer itself lives in `cue-builtins` to avoid a dependency cycle.
    Builtin {
        id: u32,
        name: Rc<str>,
        info: SourceInfo,
    },
    /// A validator constraint produced by a builtin, e.g. `matchN`'s
    /// `BuiltinValidator` (spec.md §3/§4.5).
    BuiltinValidator {
        id: u32,
        name: Rc<str>,
        args: Rc<[Expr]>,
        info: SourceInfo,
    },
}

impl Expr {
    pub fn info(&self) -> SourceInfo {
        match self {
            Expr::Null(i)
            | Expr::Bool(_, i)
            | Expr::Int(_, i)
            | Expr::Float(_, i)
            | Expr::String(_, i)
            | Expr::Bytes(_, i)
            | Expr::Top(i)
            | Expr::Bottom(i)
            | Expr::StructLit { info: i, .. }
            | Expr::ListLit { info: i, .. }
            | Expr::FieldReference { info: i, .. }
            | Expr::ValueReference { info: i, .. }
            | Expr::LabelReference { info: i, .. }
            | Expr::DynamicReference { info: i, .. }
            | Expr::LetReference { info: i, .. }
            | Expr::ImportReference { info: i, .. }
            | Expr::UnaryExpr { info: i, .. }
            | Expr::BinaryExpr { info: i, .. }
            | Expr::BoundExpr { info: i, .. }
            | Expr::Interpolation { info: i, .. }
            | Expr::CallExpr { info: i, .. }
            | Expr::SelectorExpr { info: i, .. }
            | Expr::IndexExpr { info: i, .. }
            | Expr::SliceExpr { info: i, .. }
            | Expr::DisjunctionExpr { info: i, .. }
            | Expr::Builtin { info: i, .. }
            | Expr::BuiltinValidator { info: i, .. } => *i,
        }
    }

    pub fn is_reference(&self) -> bool {
        matches!(
            self,
            Expr::FieldReference { .. }
                | Expr::ValueReference { .. }
                | Expr::LabelReference { .. }
                | Expr::DynamicReference { .. }
                | Expr::LetReference { .. }
                | Expr::ImportReference { .. }
        )
    }
}
