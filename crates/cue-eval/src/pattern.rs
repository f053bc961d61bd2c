//! Step 5 of `finalize` (spec.md §4.4, §4.2 "Dynamic and pattern fields"):
//! match every unmatched arc's feature against the vertex's bulk-optional
//! filters and ellipsis element type.
//!
//! A pattern matches a *feature*, not the arc's eventual value — `[Name=
//! string]: v` is satisfied by any string-labeled arc regardless of what
//! it holds, so the filter is unified against a synthesized key value
//! (`Value::String`/`Value::Num` derived from the `Feature` itself).

use cue_core::adt::Conjunct;
use cue_core::adt::Value;
use cue_core::feature::Feature;
use cue_core::vertex::VertexId;
use cue_core::{Environment, Runtime};

use crate::expand::{BulkSpec, EllipsisSpec};
use crate::expr_eval::eval_expr;
use crate::registry::BuiltinRegistry;
use crate::unify::unify;
use crate::OpContext;

fn key_value(rt: &Runtime, feature: Feature) -> Value {
    use cue_core::feature::FeatureTag;
    match feature.tag() {
        FeatureTag::IntLabel => {
            let i: i64 = rt.interner.ident(feature).parse().unwrap_or(0);
            Value::Num(cue_core::adt::NumValue::Int(i))
        }
        _ => Value::String(std::rc::Rc::from(rt.interner.ident(feature))),
    }
}

pub fn apply_patterns(
    ctx: &mut OpContext,
    rt: &mut Runtime,
    registry: &dyn BuiltinRegistry,
    owner: VertexId,
    bulk: &[BulkSpec],
    ellipsis: &[EllipsisSpec],
) {
    if bulk.is_empty() && ellipsis.is_empty() {
        return;
    }

    let arcs: Vec<(Feature, VertexId)> = rt
        .vertex(owner)
        .arcs
        .iter()
        .map(|(f, v)| (*f, *v))
        .collect();

    for (feature, arc_vid) in arcs {
        let explicitly_declared = rt
            .vertex(owner)
            .structs
            .iter()
            .any(|s| s.declared_order.contains(&feature));
        if explicitly_declared {
            continue;
        }
        let key = key_value(rt, feature);

        for b in bulk {
            let filter_val = eval_expr(ctx, rt, registry, b.env, &b.filter);
            if unify(rt, &filter_val, &key).is_bottom() {
                continue;
            }
            let bound_env = rt.alloc_env(Environment::child(b.env, arc_vid).with_label(feature));
            rt.vertex_mut(arc_vid).push_conjunct(Conjunct::new(
                bound_env,
                b.value.clone(),
                b.close_info.clone(),
            ));
        }

        for e in ellipsis {
            if let Some(elem) = &e.element {
                rt.vertex_mut(arc_vid).push_conjunct(Conjunct::new(
                    e.env,
                    elem.clone(),
                    e.close_info.clone(),
                ));
            }
        }
    }
}
