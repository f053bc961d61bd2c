//! `OrOp` / disjunction resolution (spec.md §4.4 step 4).
//!
//! Two distinct uses share the same reduction rules:
//! - `distribute`: pure value-level `&` over an already-materialized
//!   `Value::Disjunction` (reached via the `and` builtin, or unifying two
//!   disjunctive field values) — no forking budget is spent since no
//!   further sub-evaluation happens, only a bounded cross product.
//! - `resolve`: reducing a single `DisjunctionExpr` conjunct's
//!   alternatives, already evaluated and unified with the vertex's
//!   residue by `finalize.rs`, which spends the fork budget per
//!   alternative it evaluates.
//!
//! Per spec.md §9's Open Question resolution, cross-unification with
//! defaults at different levels is handled by "distribute over
//! unification, recompute default sets per alternative": an alternative's
//! result is only marked default if *both* sides that produced it were
//! default.

use std::rc::Rc;

use cue_core::adt::Value;
use cue_core::errors::Bottom;
use cue_core::{ErrorCode, Runtime};

use crate::unify::unify;

fn value_eq(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Num(x), Value::Num(y)) => x.unifies_with(*y),
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Bytes(x), Value::Bytes(y)) => x == y,
        (Value::StructMarker, Value::StructMarker) => true,
        (Value::ListMarker, Value::ListMarker) => true,
        _ => false,
    }
}

fn is_default_marked(defaults: &[Value], v: &Value) -> bool {
    defaults.iter().any(|d| value_eq(d, v))
}

/// Distribute `&` over one or two `Value::Disjunction`s.
pub fn distribute(rt: &mut Runtime, a: &Value, b: &Value) -> Value {
    match (a, b) {
        (
            Value::Disjunction {
                values: va,
                defaults: da,
            },
            Value::Disjunction {
                values: vb,
                defaults: db,
            },
        ) => {
            let mut results = Vec::new();
            for x in va.iter() {
                for y in vb.iter() {
                    let r = unify(rt, x, y);
                    let is_default = is_default_marked(da, x) && is_default_marked(db, y);
                    results.push((r, is_default));
                }
            }
            collapse(results)
        }
        (
            Value::Disjunction {
                values: va,
                defaults: da,
            },
            other,
        )
        | (
            other,
            Value::Disjunction {
                values: va,
                defaults: da,
            },
        ) => {
            let mut results = Vec::new();
            for x in va.iter() {
                let r = unify(rt, x, other);
                let is_default = is_default_marked(da, x);
                results.push((r, is_default));
            }
            collapse(results)
        }
        _ => unify(rt, a, b),
    }
}

/// Reduce a set of already-evaluated alternatives (spec.md §4.4 step 4,
/// (a) and (b)) to: zero alternatives ⇒ `Bottom` (or `IncompleteError` if
/// every loss was itself incomplete); one ⇒ that alternative; more ⇒ a
/// `Value::Disjunction` with its own recomputed default set.
pub fn resolve(results: Vec<(Value, bool)>) -> Value {
    collapse(results)
}

/// spec.md §8 "Default projection": with marks, the default is the
/// disjunction of default-marked alternatives (one ⇒ that value directly);
/// with no marks, the projection is undefined and callers fall back to the
/// disjunction itself.
pub fn project_default(v: &Value) -> Option<Value> {
    match v {
        Value::Disjunction { defaults, .. } if !defaults.is_empty() => match defaults.len() {
            1 => Some(defaults[0].clone()),
            _ => Some(Value::Disjunction {
                values: defaults.clone(),
                defaults: defaults.clone(),
            }),
        },
        _ => None,
    }
}

fn collapse(results: Vec<(Value, bool)>) -> Value {
    let mut surviving: Vec<Value> = Vec::new();
    let mut surviving_defaults: Vec<Value> = Vec::new();
    let mut all_incomplete = true;

    for (v, is_default) in results {
        if let Some(bottom) = v.as_bottom() {
            if bottom.code != ErrorCode::IncompleteError {
                all_incomplete = false;
            }
            continue;
        }
        all_incomplete = false;
        if !surviving.iter().any(|e| value_eq(e, &v)) {
            surviving.push(v.clone());
        }
        if is_default && !surviving_defaults.iter().any(|e| value_eq(e, &v)) {
            surviving_defaults.push(v);
        }
    }

    match surviving.len() {
        0 if all_incomplete => {
            Value::Bottom(Box::new(Bottom::incomplete("no disjunct is concrete yet")))
        }
        0 => Value::Bottom(Box::new(Bottom::eval(
            "empty disjunction: no alternative survived unification",
        ))),
        1 => surviving.into_iter().next().expect("len checked above"),
        _ => Value::Disjunction {
            values: Rc::from(surviving),
            defaults: Rc::from(surviving_defaults),
        },
    }
}

#[cfg(test)]
mod disjunction_tests {
    use super::*;
    use cue_core::adt::NumValue;

    #[test]
    fn single_survivor_collapses_to_plain_value() {
        let results = vec![
            (Value::Bottom(Box::new(Bottom::eval("no"))), false),
            (Value::Num(NumValue::Int(1)), true),
        ];
        let v = resolve(results);
        assert!(matches!(v, Value::Num(NumValue::Int(1))));
    }

    #[test]
    fn multiple_survivors_keep_default_set() {
        let results = vec![
            (Value::Num(NumValue::Int(1)), true),
            (Value::Num(NumValue::Int(2)), false),
        ];
        let v = resolve(results);
        match v {
            Value::Disjunction { values, defaults } => {
                assert_eq!(values.len(), 2);
                assert_eq!(defaults.len(), 1);
            }
            _ => panic!("expected a disjunction"),
        }
    }

    #[test]
    fn all_incomplete_losses_surface_as_incomplete() {
        let results = vec![(
            Value::Bottom(Box::new(Bottom::incomplete("awaiting"))),
            false,
        )];
        let v = resolve(results);
        assert_eq!(v.as_bottom().unwrap().code, ErrorCode::IncompleteError);
    }

    #[test]
    fn distribute_cross_unifies_two_disjunctions() {
        let mut rt = Runtime::new();
        let a = Value::Disjunction {
            values: Rc::from(vec![Value::Num(NumValue::Int(1)), Value::Num(NumValue::Int(2))]),
            defaults: Rc::from(vec![Value::Num(NumValue::Int(1))]),
        };
        let b = Value::Num(NumValue::Int(2));
        let v = distribute(&mut rt, &a, &b);
        assert!(matches!(v, Value::Num(NumValue::Int(2))));
    }

    #[test]
    fn default_projection_with_one_mark_is_that_alternative() {
        let v = Value::Disjunction {
            values: Rc::from(vec![Value::Num(NumValue::Int(1)), Value::Num(NumValue::Int(2))]),
            defaults: Rc::from(vec![Value::Num(NumValue::Int(1))]),
        };
        let projected = project_default(&v).expect("one mark projects a default");
        assert!(matches!(projected, Value::Num(NumValue::Int(1))));
    }

    #[test]
    fn default_projection_with_no_marks_is_undefined() {
        let v = Value::Disjunction {
            values: Rc::from(vec![Value::Num(NumValue::Int(1)), Value::Num(NumValue::Int(2))]),
            defaults: Rc::from(vec![]),
        };
        assert!(project_default(&v).is_none());
    }

    #[test]
    fn default_projection_with_multiple_marks_is_their_disjunction() {
        let v = Value::Disjunction {
            values: Rc::from(vec![
                Value::Num(NumValue::Int(1)),
                Value::Num(NumValue::Int(2)),
                Value::Num(NumValue::Int(3)),
            ]),
            defaults: Rc::from(vec![Value::Num(NumValue::Int(1)), Value::Num(NumValue::Int(2))]),
        };
        match project_default(&v).expect("marks project a default") {
            Value::Disjunction { values, .. } => assert_eq!(values.len(), 2),
            other => panic!("expected a disjunction of the marked alternatives, got {other:?}"),
        }
    }

    #[test]
    fn non_disjunction_has_no_default_projection() {
        assert!(project_default(&Value::Num(NumValue::Int(1))).is_none());
    }
}
