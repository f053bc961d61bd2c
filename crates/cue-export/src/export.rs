//! ADT → AST regeneration (spec.md §6 "export"): turn a finalized `Vertex`
//! back into an [`ast::File`].
//!
//! Export semantics (formatting, comment preservation, field ordering
//! options) are explicitly out of scope beyond producing *a* valid AST that
//! round-trips a finalized value's shape — every other concern is the
//! caller's (a pretty-printer, a profile-aware re-exporter). Every emitted
//! node carries a zero-width `TextRange` rather than the original source
//! position: finalized `Value`s no longer reference the `Expr` they were
//! compiled from, only the ADT's `SourceInfo` back-pointers on conjuncts do,
//! and stitching those back together is future work this crate does not
//! attempt.

use rowan::{TextRange, TextSize};

use cue_core::adt::NumValue;
use cue_core::ast;
use cue_core::{Feature, Runtime, VertexId};

use cue_eval::topo::sorted_arcs;

fn zero_range() -> TextRange {
    TextRange::new(TextSize::from(0), TextSize::from(0))
}

fn ident(text: impl Into<String>) -> ast::Ident {
    ast::Ident {
        text: text.into(),
        range: zero_range(),
        bound: ast::BoundTo::Unresolved,
    }
}

/// Export a finalized vertex as a single-field `File` whose one declaration
/// is the vertex's own exported expression, wrapped as an embedding so the
/// result always parses back to the same value regardless of whether the
/// vertex is a struct, list, or scalar.
pub fn export_vertex(rt: &Runtime, v: VertexId) -> ast::File {
    let expr = export_expr(rt, v);
    ast::File {
        decls: vec![ast::Decl::Embedding(Box::new(expr))],
        language: ast::LanguageVersion::default(),
        range: zero_range(),
    }
}

/// Export a vertex as a standalone expression: its `base_value` if scalar,
/// or a `StructLit`/`ListLit` built from its arcs if it resolved to a
/// struct or list marker.
pub fn export_expr(rt: &Runtime, v: VertexId) -> ast::Expr {
    let vertex = rt.vertex(v);
    match &vertex.base_value {
        None => ast::Expr::Top(zero_range()),
        Some(value) => export_value(rt, v, value),
    }
}

fn export_value(rt: &Runtime, v: VertexId, value: &cue_core::adt::Value) -> ast::Expr {
    use cue_core::adt::Value;
    let range = zero_range();
    match value {
        Value::Top => ast::Expr::Top(range),
        Value::Null => ast::Expr::Null(range),
        Value::Bool(b) => ast::Expr::Bool(*b, range),
        Value::Num(NumValue::Int(i)) => ast::Expr::Int(*i, range),
        Value::Num(NumValue::Float(f)) => ast::Expr::Float(*f, range),
        Value::String(s) => ast::Expr::String(
            vec![ast::StringPart::Literal(s.to_string())],
            range,
        ),
        Value::Bytes(b) => ast::Expr::Bytes(b.to_vec(), range),
        Value::StructMarker => export_struct(rt, v),
        Value::ListMarker => export_list(rt, v),
        Value::Bottom(_) => ast::Expr::Bottom(range),
        // Bounds, disjunctions, conjunctions, and type constraints have no
        // concrete shape to regenerate once a vertex has settled on them as
        // its final, unresolved value; exporting them as `_` (Top) is the
        // same "no data loss, no invented detail" choice the Bottom case
        // makes.
        Value::Bound(_)
        | Value::MatchN(_)
        | Value::Disjunction { .. }
        | Value::Conjunction(_)
        | Value::TypeConstraint(_) => ast::Expr::Top(range),
    }
}

fn export_struct(rt: &Runtime, v: VertexId) -> ast::Expr {
    let vertex = rt.vertex(v);
    let arcs = sorted_arcs(vertex, &rt.interner);
    let mut decls = Vec::with_capacity(arcs.len());
    for (feature, child) in arcs {
        decls.push(ast::Decl::Field(ast::FieldDecl {
            label: ident(feature_label(rt, feature)),
            label_alias: None,
            value: Box::new(export_expr(rt, child)),
            range: zero_range(),
        }));
    }
    ast::Expr::StructLit(decls, zero_range())
}

fn export_list(rt: &Runtime, v: VertexId) -> ast::Expr {
    let vertex = rt.vertex(v);
    let arcs = sorted_arcs(vertex, &rt.interner);
    let elements = arcs
        .into_iter()
        .map(|(_, child)| export_expr(rt, child))
        .collect();
    ast::Expr::ListLit {
        elements,
        ellipsis: None,
        range: zero_range(),
    }
}

fn feature_label(rt: &Runtime, f: Feature) -> String {
    rt.interner.ident(f).to_string()
}

#[cfg(test)]
mod export_tests {
    use super::*;
    use cue_core::vertex::{Status, Vertex};
    use cue_core::adt::Value;

    #[test]
    fn exports_a_scalar_vertex() {
        let mut rt = Runtime::new();
        let v = rt.alloc_vertex(Vertex::root());
        rt.vertex_mut(v).base_value = Some(Value::Num(NumValue::Int(42)));
        rt.vertex_mut(v).status = Status::Finalized;
        let expr = export_expr(&rt, v);
        assert!(matches!(expr, ast::Expr::Int(42, _)));
    }

    #[test]
    fn exports_a_struct_vertex_with_sorted_fields() {
        let mut rt = Runtime::new();
        let root = rt.alloc_vertex(Vertex::root());
        let b = rt.interner.intern("b");
        let a = rt.interner.intern("a");
        let child_b = rt.alloc_vertex(Vertex::child(root, b));
        rt.vertex_mut(child_b).base_value = Some(Value::Num(NumValue::Int(2)));
        rt.vertex_mut(child_b).status = Status::Finalized;
        let child_a = rt.alloc_vertex(Vertex::child(root, a));
        rt.vertex_mut(child_a).base_value = Some(Value::Num(NumValue::Int(1)));
        rt.vertex_mut(child_a).status = Status::Finalized;
        rt.vertex_mut(root).arcs.insert(b, child_b);
        rt.vertex_mut(root).arcs.insert(a, child_a);
        rt.vertex_mut(root).base_value = Some(Value::StructMarker);
        rt.vertex_mut(root).status = Status::Finalized;

        let ast::Expr::StructLit(decls, _) = export_expr(&rt, root) else {
            panic!("expected a struct literal");
        };
        assert_eq!(decls.len(), 2);
        let ast::Decl::Field(first) = &decls[0] else {
            panic!("expected a field decl");
        };
        assert_eq!(first.label.text, "a");
    }

    #[test]
    fn exports_bottom_as_bottom_expr() {
        let mut rt = Runtime::new();
        let v = rt.alloc_vertex(Vertex::root());
        rt.vertex_mut(v).base_value = Some(Value::Bottom(Box::new(
            cue_core::errors::Bottom::eval("conflicting values"),
        )));
        let expr = export_expr(&rt, v);
        assert!(matches!(expr, ast::Expr::Bottom(_)));
    }
}
