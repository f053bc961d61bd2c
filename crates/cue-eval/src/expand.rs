//! Step 2/3 of `finalize` (spec.md §4.4): expand every conjunct of a vertex
//! into arcs, accumulate the scalar/marker residue, and set aside the work
//! that later steps need — deferred disjunctions (step 4), bulk-optional
//! and ellipsis patterns (step 5).

use std::rc::Rc;

use cue_core::adt::{BinaryOp, CloseInfo, Conjunct, Decl, Expr, Value};
use cue_core::errors::Bottom;
use cue_core::feature::Feature;
use cue_core::vertex::{StructInfo, Vertex, VertexId};
use cue_core::{EnvId, Environment, Runtime};

use crate::expr_eval::{eval_expr, resolve_to_vertex};
use crate::registry::BuiltinRegistry;
use crate::unify::unify;
use crate::OpContext;

/// `[Filter]: Value` awaiting a finalized sibling-feature set before it can
/// be matched (spec.md §4.2 "Dynamic and pattern fields").
#[derive(Debug, Clone)]
pub struct BulkSpec {
    pub filter: Rc<Expr>,
    pub value: Rc<Expr>,
    pub alias: Option<Feature>,
    pub env: EnvId,
    pub close_info: CloseInfo,
}

/// `...` / `...Element`, deferred the same way.
#[derive(Debug, Clone)]
pub struct EllipsisSpec {
    pub element: Option<Rc<Expr>>,
    pub env: EnvId,
    pub close_info: CloseInfo,
}

/// Accumulated output of expanding a vertex's conjuncts, consumed by
/// `finalize.rs`'s remaining steps.
#[derive(Debug)]
pub struct Expansion {
    pub base: Value,
    pub bulk: Vec<BulkSpec>,
    pub ellipsis: Vec<EllipsisSpec>,
    pub pending_disjunctions: Vec<(EnvId, Rc<Expr>)>,
}

impl Expansion {
    fn new() -> Self {
        Self {
            base: Value::Top,
            bulk: Vec::new(),
            ellipsis: Vec::new(),
            pending_disjunctions: Vec::new(),
        }
    }

    fn merge_scalar(&mut self, rt: &mut Runtime, v: Value) {
        self.base = unify(rt, &self.base, &v);
    }
}

/// Look up or create the arc for `feature` on `owner`, without the closure
/// re-entrancy `Vertex::ensure_arc` would need (its maker closure would
/// itself require `&mut Runtime` to allocate the child vertex).
pub fn ensure_arc(rt: &mut Runtime, owner: VertexId, feature: Feature) -> VertexId {
    if let Some(existing) = rt.vertex(owner).get_arc(feature) {
        return existing;
    }
    let child = rt.alloc_vertex(Vertex::child(owner, feature));
    rt.vertex_mut(owner).arcs.insert(feature, child);
    child
}

pub fn expand_vertex(
    ctx: &mut OpContext,
    rt: &mut Runtime,
    registry: &dyn BuiltinRegistry,
    v: VertexId,
) -> Expansion {
    let conjuncts: Vec<Conjunct> = rt.vertex(v).conjuncts.clone();
    let mut ex = Expansion::new();
    for c in &conjuncts {
        expand_conjunct(ctx, rt, registry, v, c.env, &c.expr, &c.close_info, &mut ex);
        // A later conjunct of this same vertex (or a reference that loops
        // back through another vertex still being expanded) may need to
        // read what's been committed so far — see `Vertex::partial_value`.
        rt.vertex_mut(v).partial_value = Some(ex.base.clone());
    }
    ex
}

fn expand_conjunct(
    ctx: &mut OpContext,
    rt: &mut Runtime,
    registry: &dyn BuiltinRegistry,
    owner: VertexId,
    env: EnvId,
    expr: &Rc<Expr>,
    close: &CloseInfo,
    ex: &mut Expansion,
) {
    match expr.as_ref() {
        Expr::StructLit { decls, .. } => {
            let struct_env = rt.alloc_env(Environment::child(env, owner));
            let declared_order: Vec<Feature> = decls
                .iter()
                .filter_map(|d| match d {
                    Decl::Field(f) => Some(f.feature),
                    _ => None,
                })
                .collect();
            let has_ellipsis = decls.iter().any(|d| matches!(d, Decl::Ellipsis { .. }));
            let has_bulk_patterns = decls
                .iter()
                .any(|d| matches!(d, Decl::BulkOptionalField { .. }));
            rt.vertex_mut(owner).structs.push(StructInfo {
                declared_order,
                has_ellipsis,
                has_bulk_patterns,
                is_closed: close.is_closed,
            });
            if close.is_closed {
                rt.vertex_mut(owner).closed_recursive = true;
            }
            ex.merge_scalar(rt, Value::StructMarker);
            for decl in decls.iter() {
                expand_decl(ctx, rt, registry, owner, struct_env, decl, close, ex);
            }
        }
        Expr::ListLit {
            elements, ellipsis, ..
        } => {
            let list_env = rt.alloc_env(Environment::child(env, owner));
            ex.merge_scalar(rt, Value::ListMarker);
            let mut declared_order = Vec::with_capacity(elements.len());
            for (i, elem) in elements.iter().enumerate() {
                let feature = rt.interner.intern_int(i as u64);
                declared_order.push(feature);
                let child = ensure_arc(rt, owner, feature);
                rt.vertex_mut(child).push_conjunct(Conjunct::new(
                    list_env,
                    Rc::new(elem.clone()),
                    close.clone(),
                ));
            }
            rt.vertex_mut(owner).structs.push(StructInfo {
                declared_order,
                has_ellipsis: ellipsis.is_some(),
                has_bulk_patterns: false,
                is_closed: close.is_closed,
            });
            if let Some(elem) = ellipsis {
                ex.ellipsis.push(EllipsisSpec {
                    element: Some(elem.clone()),
                    env: list_env,
                    close_info: close.clone(),
                });
            }
        }
        Expr::DisjunctionExpr { .. } => {
            ex.pending_disjunctions.push((env, expr.clone()));
        }
        // `A & B` distributes over conjunct expansion rather than reducing
        // each side to a scalar first: this is what lets a struct-valued
        // operand (a definition, a sibling reference) contribute its own
        // Arcs instead of collapsing to a bare `StructMarker` (spec.md
        // §4.4 step 2, "Embeddings contribute their value as a nested
        // conjunct at the same level").
        Expr::BinaryExpr {
            op: BinaryOp::And,
            lhs,
            rhs,
            ..
        } => {
            expand_conjunct(ctx, rt, registry, owner, env, lhs, close, ex);
            expand_conjunct(ctx, rt, registry, owner, env, rhs, close, ex);
        }
        // A bare reference used as a whole conjunct: inline the target
        // vertex's own conjuncts rather than finalizing it down to a
        // scalar, so a reference to a struct/definition still contributes
        // its fields (spec.md §4.4 step 2: "A Reference is resolved
        // against env... and produces a Vertex or Value").
        Expr::FieldReference { .. }
        | Expr::ValueReference { .. }
        | Expr::LetReference { .. }
        | Expr::SelectorExpr { .. } => match resolve_to_vertex(ctx, rt, registry, env, expr) {
            Ok(target) => inline_vertex(ctx, rt, registry, owner, target, ex),
            Err(bottom) => ex.merge_scalar(rt, Value::Bottom(Box::new(bottom))),
        },
        _ => {
            let v = eval_expr(ctx, rt, registry, env, expr);
            ex.merge_scalar(rt, v);
        }
    }
}

/// Contributes `target`'s own conjuncts onto `owner`, each under its
/// original environment and `CloseInfo` (a definition's own closedness
/// travels with its conjuncts regardless of where it's referenced from).
fn inline_vertex(
    ctx: &mut OpContext,
    rt: &mut Runtime,
    registry: &dyn BuiltinRegistry,
    owner: VertexId,
    target: VertexId,
    ex: &mut Expansion,
) {
    if ctx.is_evaluating(target) {
        ex.merge_scalar(
            rt,
            Value::Bottom(Box::new(Bottom::incomplete(
                "cyclic reference; awaiting a concrete value from another conjunct",
            ))),
        );
        return;
    }
    let conjuncts: Vec<Conjunct> = rt.vertex(target).conjuncts.clone();
    for c in &conjuncts {
        expand_conjunct(ctx, rt, registry, owner, c.env, &c.expr, &c.close_info, ex);
    }
}

pub(crate) fn expand_decl(
    ctx: &mut OpContext,
    rt: &mut Runtime,
    registry: &dyn BuiltinRegistry,
    owner: VertexId,
    env: EnvId,
    decl: &Decl,
    close: &CloseInfo,
    ex: &mut Expansion,
) {
    match decl {
        Decl::Field(field) => {
            let child_close = field_close(close, field.feature);
            let child = ensure_arc(rt, owner, field.feature);
            rt.vertex_mut(child).push_conjunct(Conjunct::new(
                env,
                field.value.clone(),
                child_close,
            ));
        }
        Decl::LetField { feature, value, .. } => {
            let child = ensure_arc(rt, owner, *feature);
            rt.vertex_mut(child)
                .push_conjunct(Conjunct::new(env, value.clone(), CloseInfo::open()));
        }
        Decl::BulkOptionalField {
            filter,
            value,
            alias,
            ..
        } => {
            ex.bulk.push(BulkSpec {
                filter: filter.clone(),
                value: value.clone(),
                alias: *alias,
                env,
                close_info: close.clone(),
            });
        }
        Decl::DynamicField {
            label_expr, value, ..
        } => {
            let label_val = eval_expr(ctx, rt, registry, env, label_expr);
            match label_val {
                Value::String(s) => {
                    let feature = rt.interner.intern(&s);
                    let child_close = field_close(close, feature);
                    let child = ensure_arc(rt, owner, feature);
                    rt.vertex_mut(child)
                        .push_conjunct(Conjunct::new(env, value.clone(), child_close));
                    rt.vertex_mut(owner).structs.push(StructInfo {
                        declared_order: vec![feature],
                        has_ellipsis: false,
                        has_bulk_patterns: false,
                        is_closed: close.is_closed,
                    });
                }
                other if other.is_bottom() => ex.merge_scalar(rt, other),
                _ => ex.merge_scalar(
                    rt,
                    Value::Bottom(Box::new(cue_core::errors::Bottom::eval(
                        "dynamic field label must evaluate to a string",
                    ))),
                ),
            }
        }
        Decl::Ellipsis { element, .. } => {
            ex.ellipsis.push(EllipsisSpec {
                element: element.clone(),
                env,
                close_info: close.clone(),
            });
        }
        Decl::Embedding(e) => {
            expand_conjunct(ctx, rt, registry, owner, env, e, close, ex);
        }
        Decl::Comprehension(comp) => {
            crate::comprehension_eval::expand_comprehension(
                ctx, rt, registry, owner, env, close, comp, ex,
            );
        }
    }
}

fn field_close(close: &CloseInfo, feature: Feature) -> CloseInfo {
    if feature.tag().is_definition() {
        close.enter_definition(feature)
    } else {
        close.embed()
    }
}
