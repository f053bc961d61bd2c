//! The 8-step `finalize` orchestrator (spec.md §4.4): expand conjuncts,
//! unify the residue, resolve disjunctions, apply patterns, finalize
//! children, enforce closedness, and settle the vertex.

use cue_core::adt::{Expr, Value};
use cue_core::errors::Bottom;
use cue_core::vertex::{Status, VertexId};
use cue_core::{ErrorCode, Runtime};

use crate::closedness::enforce_closedness;
use crate::cycle;
use crate::disjunction;
use crate::expand::expand_vertex;
use crate::expr_eval::eval_expr;
use crate::op_context::OpContext;
use crate::pattern::apply_patterns;
use crate::registry::BuiltinRegistry;
use crate::unify::unify;

/// Finalize `v`: idempotent (spec.md §8 "finalize idempotence") — a
/// finalized vertex just returns its settled `base_value`.
pub fn finalize_vertex(
    ctx: &mut OpContext,
    rt: &mut Runtime,
    registry: &dyn BuiltinRegistry,
    v: VertexId,
) -> Value {
    if rt.vertex(v).status == Status::Finalized {
        return rt.vertex(v).base_value.clone().unwrap_or(Value::Top);
    }
    if ctx.enter(v) {
        ctx.exit(v);
        // `v` is already being expanded further up this same call chain
        // (reached here directly, e.g. via a selector/index expression,
        // rather than through `expr_eval::eval_reference`'s own check).
        // Whatever it's committed to its residue so far still breaks the
        // cycle if a concrete sibling conjunct got there first.
        return cycle::partial_or_cyclic_bottom(rt.vertex(v).partial_value.clone());
    }
    rt.vertex_mut(v).status = Status::Evaluating;

    // Steps 2/3: expand conjuncts into arcs and unify the scalar residue.
    let mut expansion = expand_vertex(ctx, rt, registry, v);

    // Step 4: resolve deferred disjunctions against that residue, one
    // DisjunctionExpr conjunct at a time (spec.md §9 Open Question:
    // "distribute over unification, recompute default sets per
    // alternative").
    let pending = std::mem::take(&mut expansion.pending_disjunctions);
    for (env, expr) in pending {
        let Expr::DisjunctionExpr { values, .. } = expr.as_ref() else {
            unreachable!("only DisjunctionExpr conjuncts are deferred by expand.rs");
        };
        let mut results = Vec::with_capacity(values.len());
        let mut budget_exhausted = false;
        for (alt, is_default) in values.iter() {
            if !ctx.take_disjunct_fork() {
                budget_exhausted = true;
                break;
            }
            let alt_value = eval_expr(ctx, rt, registry, env, alt);
            let candidate = unify(rt, &expansion.base, &alt_value);
            results.push((candidate, *is_default));
        }
        expansion.base = if budget_exhausted {
            Value::Bottom(Box::new(Bottom::new(
                ErrorCode::TooManyDisjuncts,
                "disjunction fork budget exhausted",
            )))
        } else {
            disjunction::resolve(results)
        };
    }

    // Step 5: bulk-optional and ellipsis patterns against sibling arcs.
    apply_patterns(ctx, rt, registry, v, &expansion.bulk, &expansion.ellipsis);

    // Step 7: finalize children (see closedness.rs for why step 6 runs
    // after this instead of before).
    let children: Vec<VertexId> = rt.vertex(v).arcs.values().copied().collect();
    for child in children {
        finalize_vertex(ctx, rt, registry, child);
    }

    // Step 6: closedness.
    enforce_closedness(rt, v);

    // Step 8: settle. A marked disjunction that reaches here unchallenged
    // settles to its default (spec.md §8 "Default projection"); an
    // unmarked one has no projection and is kept as-is.
    let settled = cycle::upgrade_unresolved(expansion.base);
    let result = disjunction::project_default(&settled).unwrap_or(settled);
    ctx.exit(v);
    rt.vertex_mut(v).status = Status::Finalized;
    rt.vertex_mut(v).base_value = Some(result.clone());
    rt.vertex_mut(v).partial_value = None;
    result
}
