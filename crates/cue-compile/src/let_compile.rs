//! Let semantics (spec.md §4.2 "Let semantics").
//!
//! Lets are hidden fields with a globally unique, scope-qualified
//! [`cue_core::Feature`]. A let whose expression transitively refers to a
//! for-comprehension variable is marked `IsMulti`: such lets cannot be
//! shared across iterations and must be re-instantiated each time the
//! enclosing comprehension fires.

use std::collections::HashSet;

use cue_core::ast::{ClauseNode, Expr, StringPart};

/// Allocate the globally-unique feature for a `let` declaration.
pub fn alloc_let_feature(
    interner: &mut cue_core::Interner,
    name: &str,
    unit_id: u32,
) -> cue_core::Feature {
    interner.make_let(name, unit_id)
}

/// `true` if `expr` transitively mentions any name in `bound_names`,
/// walked the same way `plotnik_compiler::analyze::refs` walks reference
/// occurrences: a plain recursive descent with no attempt to special-case
/// shadowing (a let that shadows a for-variable with the same name still
/// counts as referencing it — the compiler's frame resolution, not this
/// scan, is what decides which binding actually wins).
pub fn references_any(expr: &Expr, bound_names: &HashSet<String>) -> bool {
    match expr {
        Expr::Ident(ident) => bound_names.contains(&ident.text),
        Expr::Selector { base, .. } => references_any(base, bound_names),
        Expr::Index { base, index, .. } => {
            references_any(base, bound_names) || references_any(index, bound_names)
        }
        Expr::Slice { base, low, high, .. } => {
            references_any(base, bound_names)
                || low.as_deref().is_some_and(|e| references_any(e, bound_names))
                || high
                    .as_deref()
                    .is_some_and(|e| references_any(e, bound_names))
        }
        Expr::Call { func, args, .. } => {
            references_any(func, bound_names)
                || args.iter().any(|a| references_any(a, bound_names))
        }
        Expr::Unary { operand, .. } => references_any(operand, bound_names),
        Expr::Binary { lhs, rhs, .. } => {
            references_any(lhs, bound_names) || references_any(rhs, bound_names)
        }
        Expr::Bound { operand, .. } => references_any(operand, bound_names),
        Expr::ListLit { elements, ellipsis, .. } => {
            elements.iter().any(|e| references_any(e, bound_names))
                || ellipsis
                    .as_deref()
                    .is_some_and(|e| references_any(e, bound_names))
        }
        Expr::String(parts, _) => parts.iter().any(|p| match p {
            StringPart::Literal(_) => false,
            StringPart::Interpolation(e) => references_any(e, bound_names),
        }),
        Expr::Disjunction { values, .. } => {
            values.iter().any(|alt| references_any(&alt.value, bound_names))
        }
        Expr::StructLit(decls, _) => decls.iter().any(|d| decl_references_any(d, bound_names)),
        Expr::Null(_)
        | Expr::Bool(_, _)
        | Expr::Int(_, _)
        | Expr::Float(_, _)
        | Expr::Bytes(_, _)
        | Expr::Top(_)
        | Expr::Bottom(_) => false,
    }
}

fn decl_references_any(decl: &cue_core::ast::Decl, bound_names: &HashSet<String>) -> bool {
    use cue_core::ast::Decl;
    match decl {
        Decl::Field(f) | Decl::OptionalField(f) => references_any(&f.value, bound_names),
        Decl::BulkOptionalField { filter, value, .. } => {
            references_any(filter, bound_names) || references_any(value, bound_names)
        }
        Decl::DynamicField { label_expr, value, .. } => {
            references_any(label_expr, bound_names) || references_any(value, bound_names)
        }
        Decl::LetField { value, .. } => references_any(value, bound_names),
        Decl::Ellipsis { element, .. } => element
            .as_deref()
            .is_some_and(|e| references_any(e, bound_names)),
        Decl::Embedding(e) => references_any(e, bound_names),
        Decl::Comprehension(c) => {
            c.clauses.iter().any(|clause| match clause {
                ClauseNode::For { source, .. } => references_any(source, bound_names),
                ClauseNode::If { cond } => references_any(cond, bound_names),
                ClauseNode::Let { value, .. } => references_any(value, bound_names),
            }) || c.value.iter().any(|d| decl_references_any(d, bound_names))
        }
        Decl::Import { .. } => false,
    }
}
