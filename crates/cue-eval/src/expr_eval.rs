//! Evaluates a compiled [`Expr`] to a [`Value`] (spec.md §4.4 step 3's
//! "evaluate each conjunct's expression").
//!
//! Struct/list literals are handled by `expand.rs` when they appear as a
//! top-level conjunct (they create arcs rather than producing a scalar);
//! here they only appear nested (e.g. as a function argument) and are
//! reduced to their marker, which is lossy but matches how far this
//! evaluator's `Value` can represent composite data outside the vertex
//! graph itself.

use std::rc::Rc;

use cue_core::adt::{BinaryOp, Expr, StringPart, UnaryOp, Value};
use cue_core::errors::Bottom;
use cue_core::{EnvId, Runtime};

use crate::disjunction;
use crate::finalize::finalize_vertex;
use crate::op_context::OpContext;
use crate::registry::BuiltinRegistry;
use crate::unify::unify;

pub fn eval_expr(
    ctx: &mut OpContext,
    rt: &mut Runtime,
    registry: &dyn BuiltinRegistry,
    env: EnvId,
    expr: &Expr,
) -> Value {
    match expr {
        Expr::Null(_) => Value::Null,
        Expr::Bool(b, _) => Value::Bool(*b),
        Expr::Int(i, _) => Value::Num(cue_core::adt::NumValue::Int(*i)),
        Expr::Float(f, _) => Value::Num(cue_core::adt::NumValue::Float(*f)),
        Expr::String(s, _) => Value::String(s.clone()),
        Expr::Bytes(b, _) => Value::Bytes(b.clone()),
        Expr::Top(_) => Value::Top,
        Expr::Bottom(_) => Value::Bottom(Box::new(Bottom::eval("explicit bottom"))),

        // Reached only when a struct/list literal appears nested inside a
        // scalar expression context; the arc graph it would otherwise build
        // is not materialized here.
        Expr::StructLit { .. } => Value::StructMarker,
        Expr::ListLit { .. } => Value::ListMarker,

        Expr::FieldReference {
            up_count, feature, ..
        } => eval_reference(ctx, rt, registry, env, *up_count, Some(*feature)),
        Expr::ValueReference { up_count, .. } => {
            eval_reference(ctx, rt, registry, env, *up_count, None)
        }
        Expr::LetReference {
            up_count, feature, ..
        } => eval_reference(ctx, rt, registry, env, *up_count, Some(*feature)),
        Expr::LabelReference { up_count, .. } => {
            let target_env = rt.env_arena().walk_up(env, *up_count);
            match rt.env(target_env).dynamic_label {
                Some(label) => Value::String(Rc::from(rt.interner.ident(label))),
                None => Value::Bottom(Box::new(Bottom::eval(
                    "label reference outside a pattern or for-clause scope",
                ))),
            }
        }
        Expr::DynamicReference { label_expr, .. } => {
            eval_expr(ctx, rt, registry, env, label_expr)
        }
        Expr::ImportReference { pkg_path, .. } => Value::Bottom(Box::new(Bottom::incomplete(
            format!("import {pkg_path} not resolved"),
        ))),

        Expr::UnaryExpr { op, operand, .. } => {
            let v = eval_expr(ctx, rt, registry, env, operand);
            eval_unary(*op, v)
        }
        Expr::BinaryExpr { op, lhs, rhs, .. } => {
            let l = eval_expr(ctx, rt, registry, env, lhs);
            if l.is_bottom() && l.as_bottom().unwrap().is_sticky() {
                return l;
            }
            let r = eval_expr(ctx, rt, registry, env, rhs);
            eval_binary(rt, *op, l, r)
        }
        Expr::BoundExpr { op, operand, .. } => {
            let v = eval_expr(ctx, rt, registry, env, operand);
            if v.is_bottom() {
                return v;
            }
            Value::Bound(cue_core::adt::BoundValue {
                op: *op,
                operand: Rc::new(v),
            })
        }
        Expr::Interpolation { parts, .. } => eval_interpolation(ctx, rt, registry, env, parts),
        Expr::CallExpr { func, args, .. } => eval_call(ctx, rt, registry, env, func, args),
        Expr::SelectorExpr { base, field, .. } => {
            match resolve_to_vertex(ctx, rt, registry, env, base) {
                Ok(base_id) => match rt.vertex(base_id).get_arc(*field) {
                    Some(arc) => finalize_vertex(ctx, rt, registry, arc),
                    None => Value::Bottom(Box::new(Bottom::eval(format!(
                        "field `{}` not present",
                        rt.interner.ident(*field)
                    )))),
                },
                Err(bottom) => Value::Bottom(Box::new(bottom)),
            }
        }
        Expr::IndexExpr { base, index, .. } => {
            let idx = eval_expr(ctx, rt, registry, env, index);
            match resolve_to_vertex(ctx, rt, registry, env, base) {
                Ok(base_id) => index_vertex(ctx, rt, registry, base_id, &idx),
                Err(bottom) => Value::Bottom(Box::new(bottom)),
            }
        }
        // Slicing would need to materialize a fresh sub-list vertex; this
        // evaluator's Value model has no way to return that without a
        // VertexId, so slices collapse to the list marker.
        Expr::SliceExpr { .. } => Value::ListMarker,

        Expr::DisjunctionExpr { values, .. } => {
            let mut results = Vec::with_capacity(values.len());
            for (alt, is_default) in values.iter() {
                if !ctx.take_disjunct_fork() {
                    return Value::Bottom(Box::new(Bottom::new(
                        cue_core::ErrorCode::TooManyDisjuncts,
                        "disjunction fork budget exhausted",
                    )));
                }
                let v = eval_expr(ctx, rt, registry, env, alt);
                results.push((v, *is_default));
            }
            disjunction::resolve(results)
        }

        Expr::Builtin { id, name, .. } => registry.call(rt, *id, name, &[]),
        Expr::BuiltinValidator { id, name, args, .. } => {
            registry.validator(ctx, rt, registry, env, *id, name, args)
        }
    }
}

fn eval_reference(
    ctx: &mut OpContext,
    rt: &mut Runtime,
    registry: &dyn BuiltinRegistry,
    env: EnvId,
    up_count: cue_core::adt::UpCount,
    feature: Option<cue_core::Feature>,
) -> Value {
    let target_env = rt.env_arena().walk_up(env, up_count);
    let base_vertex = rt.env(target_env).vertex;
    let target = match feature {
        Some(f) => match rt.vertex(base_vertex).get_arc(f) {
            Some(arc) => arc,
            None => {
                return Value::Bottom(Box::new(Bottom::eval(format!(
                    "reference to undeclared field `{}`",
                    rt.interner.ident(f)
                ))))
            }
        },
        None => base_vertex,
    };
    if ctx.is_evaluating(target) {
        // `target` is still being expanded further up this call chain. If
        // it already committed a usable residue from an earlier conjunct
        // (spec.md §8 scenario 4), read that instead of blocking; a
        // genuine structural cycle with nothing settled yet still falls
        // through to the ordinary cyclic `Bottom`.
        return crate::cycle::partial_or_cyclic_bottom(rt.vertex(target).partial_value.clone());
    }
    finalize_vertex(ctx, rt, registry, target)
}

/// Resolves an expression that names a vertex (as opposed to computing a
/// scalar) to that vertex's id. Used both for selector/index navigation
/// here and, via `expand.rs`, to inline a referenced vertex's own
/// conjuncts into the one being expanded.
pub(crate) fn resolve_to_vertex(
    ctx: &mut OpContext,
    rt: &mut Runtime,
    registry: &dyn BuiltinRegistry,
    env: EnvId,
    expr: &Expr,
) -> Result<cue_core::VertexId, Bottom> {
    match expr {
        Expr::FieldReference {
            up_count, feature, ..
        }
        | Expr::LetReference {
            up_count, feature, ..
        } => {
            let target_env = rt.env_arena().walk_up(env, *up_count);
            let base_vertex = rt.env(target_env).vertex;
            rt.vertex(base_vertex)
                .get_arc(*feature)
                .ok_or_else(|| Bottom::eval("reference to undeclared field"))
        }
        Expr::ValueReference { up_count, .. } => {
            let target_env = rt.env_arena().walk_up(env, *up_count);
            Ok(rt.env(target_env).vertex)
        }
        Expr::SelectorExpr { base, field, .. } => {
            let base_id = resolve_to_vertex(ctx, rt, registry, env, base)?;
            rt.vertex(base_id)
                .get_arc(*field)
                .ok_or_else(|| Bottom::eval("field not present"))
        }
        _ => Err(Bottom::eval("expression does not navigate to a vertex")),
    }
}

fn index_vertex(
    ctx: &mut OpContext,
    rt: &mut Runtime,
    registry: &dyn BuiltinRegistry,
    base: cue_core::VertexId,
    idx: &Value,
) -> Value {
    let feature = match idx {
        Value::Num(cue_core::adt::NumValue::Int(i)) if *i >= 0 => rt.interner.intern_int(*i as u64),
        Value::String(s) => rt.interner.intern(s),
        _ => {
            return Value::Bottom(Box::new(Bottom::eval("index must be a non-negative int or string")))
        }
    };
    match rt.vertex(base).get_arc(feature) {
        Some(arc) => finalize_vertex(ctx, rt, registry, arc),
        None => Value::Bottom(Box::new(Bottom::eval("index out of range or field not found"))),
    }
}

fn eval_unary(op: UnaryOp, v: Value) -> Value {
    if v.is_bottom() {
        return v;
    }
    match (op, &v) {
        (UnaryOp::Neg, Value::Num(n)) => Value::Num(match n {
            cue_core::adt::NumValue::Int(i) => cue_core::adt::NumValue::Int(-i),
            cue_core::adt::NumValue::Float(f) => cue_core::adt::NumValue::Float(-f),
        }),
        (UnaryOp::Plus, Value::Num(_)) => v,
        (UnaryOp::Not, Value::Bool(b)) => Value::Bool(!b),
        _ => Value::Bottom(Box::new(Bottom::eval(format!(
            "unary operator not defined for {}",
            v.kind()
        )))),
    }
}

fn eval_binary(rt: &mut Runtime, op: BinaryOp, l: Value, r: Value) -> Value {
    if op == BinaryOp::And {
        return unify(rt, &l, &r);
    }
    if op == BinaryOp::Or {
        return disjunction::distribute(
            rt,
            &Value::Disjunction {
                values: Rc::from(vec![l]),
                defaults: Rc::from(vec![]),
            },
            &r,
        );
    }
    if l.is_bottom() {
        return l;
    }
    if r.is_bottom() {
        return r;
    }
    match op {
        BinaryOp::Add => match (&l, &r) {
            (Value::Num(a), Value::Num(b)) => numeric_binop(*a, *b, |x, y| x + y, |x, y| x + y),
            (Value::String(a), Value::String(b)) => {
                Value::String(Rc::from(format!("{a}{b}")))
            }
            (Value::Bytes(a), Value::Bytes(b)) => {
                Value::Bytes(Rc::from([a.as_ref(), b.as_ref()].concat()))
            }
            _ => type_error("+", &l, &r),
        },
        BinaryOp::Sub => match (&l, &r) {
            (Value::Num(a), Value::Num(b)) => numeric_binop(*a, *b, |x, y| x - y, |x, y| x - y),
            _ => type_error("-", &l, &r),
        },
        BinaryOp::Mul => match (&l, &r) {
            (Value::Num(a), Value::Num(b)) => numeric_binop(*a, *b, |x, y| x * y, |x, y| x * y),
            (Value::String(a), Value::Num(cue_core::adt::NumValue::Int(n))) if *n >= 0 => {
                Value::String(Rc::from(a.repeat(*n as usize)))
            }
            _ => type_error("*", &l, &r),
        },
        BinaryOp::Div => match (numeric(&l), numeric(&r)) {
            (Some(a), Some(b)) if b != 0.0 => Value::Num(cue_core::adt::NumValue::Float(a / b)),
            (Some(_), Some(_)) => Value::Bottom(Box::new(Bottom::eval("division by zero"))),
            _ => type_error("/", &l, &r),
        },
        BinaryOp::Eq => Value::Bool(scalar_eq(&l, &r)),
        BinaryOp::Neq => Value::Bool(!scalar_eq(&l, &r)),
        BinaryOp::Lt | BinaryOp::Lte | BinaryOp::Gt | BinaryOp::Gte => {
            match (numeric(&l), numeric(&r)) {
                (Some(a), Some(b)) => Value::Bool(match op {
                    BinaryOp::Lt => a < b,
                    BinaryOp::Lte => a <= b,
                    BinaryOp::Gt => a > b,
                    BinaryOp::Gte => a >= b,
                    _ => unreachable!(),
                }),
                _ => type_error("comparison", &l, &r),
            }
        }
        BinaryOp::Matches | BinaryOp::NotMatches => match (&l, &r) {
            (Value::String(text), Value::String(pattern)) => {
                let matched = rt
                    .regex_cache
                    .get_or_compile(pattern)
                    .map(|re| re.is_match(text))
                    .unwrap_or(false);
                Value::Bool(if op == BinaryOp::Matches { matched } else { !matched })
            }
            _ => type_error("=~", &l, &r),
        },
        BinaryOp::And | BinaryOp::Or => unreachable!("handled above"),
    }
}

fn numeric_binop(
    a: cue_core::adt::NumValue,
    b: cue_core::adt::NumValue,
    int_op: impl Fn(i64, i64) -> i64,
    float_op: impl Fn(f64, f64) -> f64,
) -> Value {
    use cue_core::adt::NumValue;
    match (a, b) {
        (NumValue::Int(x), NumValue::Int(y)) => Value::Num(NumValue::Int(int_op(x, y))),
        _ => Value::Num(NumValue::Float(float_op(a.as_f64(), b.as_f64()))),
    }
}

fn numeric(v: &Value) -> Option<f64> {
    match v {
        Value::Num(n) => Some(n.as_f64()),
        _ => None,
    }
}

fn scalar_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Num(x), Value::Num(y)) => x.unifies_with(*y),
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Bytes(x), Value::Bytes(y)) => x == y,
        _ => false,
    }
}

fn type_error(op: &str, l: &Value, r: &Value) -> Value {
    Value::Bottom(Box::new(Bottom::eval(format!(
        "operator `{op}` not defined for {} and {}",
        l.kind(),
        r.kind()
    ))))
}

fn eval_interpolation(
    ctx: &mut OpContext,
    rt: &mut Runtime,
    registry: &dyn BuiltinRegistry,
    env: EnvId,
    parts: &[StringPart],
) -> Value {
    let mut out = String::new();
    for part in parts {
        match part {
            StringPart::Literal(s) => out.push_str(s),
            StringPart::Expr(e) => {
                let v = eval_expr(ctx, rt, registry, env, e);
                match v {
                    Value::String(s) => out.push_str(&s),
                    Value::Num(n) => out.push_str(&format_num(n)),
                    Value::Bool(b) => out.push_str(if b { "true" } else { "false" }),
                    Value::Null => out.push_str("null"),
                    Value::Bottom(_) => return v,
                    other => {
                        return Value::Bottom(Box::new(Bottom::incomplete(format!(
                            "cannot interpolate a {} value",
                            other.kind()
                        ))))
                    }
                }
            }
        }
    }
    Value::String(Rc::from(out))
}

fn format_num(n: cue_core::adt::NumValue) -> String {
    match n {
        cue_core::adt::NumValue::Int(i) => i.to_string(),
        cue_core::adt::NumValue::Float(f) => f.to_string(),
    }
}

fn eval_call(
    ctx: &mut OpContext,
    rt: &mut Runtime,
    registry: &dyn BuiltinRegistry,
    env: EnvId,
    func: &Expr,
    args: &[Expr],
) -> Value {
    let (id, name) = match func {
        Expr::Builtin { id, name, .. } => (*id, name.clone()),
        _ => return Value::Bottom(Box::new(Bottom::eval("call target is not a builtin"))),
    };
    let vals: Vec<Value> = args
        .iter()
        .map(|a| eval_expr(ctx, rt, registry, env, a))
        .collect();
    if let Some(bottom) = vals.iter().find_map(|v| v.as_bottom()) {
        if bottom.is_sticky() {
            return Value::Bottom(Box::new(bottom.clone()));
        }
    }
    let arg_vertices: Vec<Option<cue_core::VertexId>> = args
        .iter()
        .map(|a| resolve_to_vertex(ctx, rt, registry, env, a).ok())
        .collect();
    registry.call_with_arcs(rt, id, &name, &vals, &arg_vertices)
}
