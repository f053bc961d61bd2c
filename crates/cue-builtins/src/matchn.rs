//! `matchN(count, [schemas...])` (spec.md §4.4/§4.5): builds a
//! `Value::MatchN` validator. The schema list must stay as expressions
//! until each one is unified against a concrete operand (`unify.rs`'s
//! `check_matchn`), so this evaluates the count eagerly but leaves each
//! schema's evaluation to the point of comparison — here, that's
//! immediate, since schemas are evaluated once and stored as `Value`s on
//! the validator, matching how a plain `BoundValue` is built.

use std::rc::Rc;

use cue_core::adt::{Expr, MatchNValidator, Value};
use cue_core::errors::Bottom;
use cue_core::{EnvId, Runtime};

use cue_eval::expr_eval::eval_expr;
use cue_eval::registry::BuiltinRegistry;
use cue_eval::OpContext;

pub fn eval(
    ctx: &mut OpContext,
    rt: &mut Runtime,
    registry: &dyn BuiltinRegistry,
    env: EnvId,
    args: &[Expr],
) -> Value {
    let [count_expr, schemas_expr] = args else {
        return Value::Bottom(Box::new(Bottom::eval("matchN() takes exactly two arguments")));
    };
    let count = eval_expr(ctx, rt, registry, env, count_expr);
    if let Some(b) = count.as_bottom() {
        if b.is_sticky() {
            return count;
        }
    }
    let Expr::ListLit { elements, .. } = schemas_expr else {
        return Value::Bottom(Box::new(Bottom::incomplete(
            "matchN()'s schema list is not a literal list",
        )));
    };
    let schemas: Vec<Value> = elements
        .iter()
        .map(|e| eval_expr(ctx, rt, registry, env, e))
        .collect();
    if let Some(bottom) = schemas.iter().find_map(|v| v.as_bottom()) {
        if bottom.is_sticky() {
            return Value::Bottom(Box::new(bottom.clone()));
        }
    }
    Value::MatchN(MatchNValidator {
        count: Rc::new(count),
        schemas: Rc::from(schemas),
    })
}
