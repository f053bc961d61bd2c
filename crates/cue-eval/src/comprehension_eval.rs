//! Expands a desugared `for`/`if`/`let` clause chain (spec.md §4.2
//! "Comprehension lowering", §4.4 step 2).
//!
//! Each clause pushes a synthetic binding vertex exposing the loop
//! variable(s) as ordinary arcs, so the body resolves them through the same
//! `FieldReference`/env-walk machinery as any other field — no separate
//! lookup path is needed.

use std::rc::Rc;

use cue_core::adt::{CloseInfo, Clause, Comprehension, Conjunct, Decl, Value};
use cue_core::errors::Bottom;
use cue_core::feature::Feature;
use cue_core::vertex::{Vertex, VertexId};
use cue_core::{EnvId, Environment, Runtime, Status};

use crate::expand::{expand_decl, Expansion};
use crate::expr_eval::eval_expr;
use crate::finalize::finalize_vertex;
use crate::registry::BuiltinRegistry;
use crate::OpContext;

pub fn expand_comprehension(
    ctx: &mut OpContext,
    rt: &mut Runtime,
    registry: &dyn BuiltinRegistry,
    owner: VertexId,
    env: EnvId,
    close: &CloseInfo,
    comp: &Comprehension,
    ex: &mut Expansion,
) {
    run_clauses(ctx, rt, registry, owner, env, close, &comp.clauses, 0, &comp.value, ex);
}

fn run_clauses(
    ctx: &mut OpContext,
    rt: &mut Runtime,
    registry: &dyn BuiltinRegistry,
    owner: VertexId,
    env: EnvId,
    close: &CloseInfo,
    clauses: &[Clause],
    idx: usize,
    value: &[Decl],
    ex: &mut Expansion,
) {
    if idx == clauses.len() {
        for decl in value {
            expand_decl(ctx, rt, registry, owner, env, decl, close, ex);
        }
        return;
    }

    match &clauses[idx] {
        Clause::If { cond } => match eval_expr(ctx, rt, registry, env, cond) {
            Value::Bool(true) => {
                run_clauses(ctx, rt, registry, owner, env, close, clauses, idx + 1, value, ex)
            }
            Value::Bool(false) => {}
            other if other.is_bottom() => ex_merge(rt, ex, other),
            _ => ex_merge(
                rt,
                ex,
                Value::Bottom(Box::new(Bottom::incomplete(
                    "if-clause condition is not yet a concrete bool",
                ))),
            ),
        },
        Clause::Let {
            feature,
            value: let_expr,
        } => {
            let let_vertex = rt.alloc_vertex(Vertex::root());
            rt.vertex_mut(let_vertex).push_conjunct(Conjunct::new(
                env,
                let_expr.clone(),
                CloseInfo::open(),
            ));
            let binding_vertex = rt.alloc_vertex(Vertex::root());
            rt.vertex_mut(binding_vertex)
                .arcs
                .insert(*feature, let_vertex);
            let new_env = rt.alloc_env(Environment::child(env, binding_vertex));
            run_clauses(
                ctx, rt, registry, owner, new_env, close, clauses, idx + 1, value, ex,
            );
        }
        Clause::For {
            key,
            value: value_feature,
            source,
        } => {
            let src_vertex = rt.alloc_vertex(Vertex::root());
            rt.vertex_mut(src_vertex).push_conjunct(Conjunct::new(
                env,
                source.clone(),
                CloseInfo::open(),
            ));
            let src_value = finalize_vertex(ctx, rt, registry, src_vertex);
            if let Some(b) = src_value.as_bottom() {
                ex_merge(rt, ex, Value::Bottom(Box::new(b.clone())));
                return;
            }
            let arcs: Vec<(Feature, VertexId)> = rt
                .vertex(src_vertex)
                .arcs
                .iter()
                .map(|(f, v)| (*f, *v))
                .collect();
            for (feature, elem_vertex) in arcs {
                let binding_vertex = rt.alloc_vertex(Vertex::root());
                if let Some(key_feature) = key {
                    let key_name = rt.interner.ident(feature).to_string();
                    let key_vertex = rt.alloc_vertex(Vertex::root());
                    rt.vertex_mut(key_vertex).base_value = Some(Value::String(Rc::from(key_name)));
                    rt.vertex_mut(key_vertex).status = Status::Finalized;
                    rt.vertex_mut(binding_vertex)
                        .arcs
                        .insert(*key_feature, key_vertex);
                }
                rt.vertex_mut(binding_vertex)
                    .arcs
                    .insert(*value_feature, elem_vertex);
                let new_env = rt.alloc_env(Environment::child(env, binding_vertex));
                run_clauses(
                    ctx, rt, registry, owner, new_env, close, clauses, idx + 1, value, ex,
                );
            }
        }
    }
}

fn ex_merge(rt: &mut Runtime, ex: &mut Expansion, v: Value) {
    ex.base = crate::unify::unify(rt, &ex.base, &v);
}
