//! `AndOp`: the unification primitive (spec.md §4.3, §4.4 step 3).
//!
//! `unify` is the pointwise lattice meet over scalar/marker `Value`s; the
//! surrounding per-vertex bookkeeping (merging arcs, absorbing structural
//! markers onto a vertex) lives in `expand.rs`. `x & x == x`,
//! commutativity and associativity (spec.md §8) fall out of these rules
//! being pure and symmetric.

use std::rc::Rc;

use cue_core::adt::{BoundOp, NumValue, Value};
use cue_core::errors::Bottom;
use cue_core::Runtime;

use crate::disjunction;

/// Unify two values per spec.md §4.4 step 3.
pub fn unify(rt: &mut Runtime, a: &Value, b: &Value) -> Value {
    match (a, b) {
        (Value::Top, other) | (other, Value::Top) => other.clone(),

        // Sticky bottoms dominate; an IncompleteError is discharged by a
        // concrete partner (spec.md §3 invariants).
        (Value::Bottom(bot), other) | (other, Value::Bottom(bot)) => {
            if bot.is_sticky() {
                Value::Bottom(bot.clone())
            } else if other.is_concrete() || matches!(other, Value::Top) {
                other.clone()
            } else {
                Value::Bottom(bot.clone())
            }
        }

        (Value::Disjunction { .. }, _) | (_, Value::Disjunction { .. }) => {
            disjunction::distribute(rt, a, b)
        }

        (Value::Null, Value::Null) => Value::Null,
        (Value::Bool(x), Value::Bool(y)) => {
            if x == y {
                Value::Bool(*x)
            } else {
                conflict(a, b)
            }
        }
        (Value::Num(x), Value::Num(y)) => {
            if x.unifies_with(*y) {
                Value::Num(*x)
            } else {
                conflict(a, b)
            }
        }
        (Value::String(x), Value::String(y)) => {
            if x == y {
                Value::String(x.clone())
            } else {
                conflict(a, b)
            }
        }
        (Value::Bytes(x), Value::Bytes(y)) => {
            if x == y {
                Value::Bytes(x.clone())
            } else {
                conflict(a, b)
            }
        }
        (Value::StructMarker, Value::StructMarker) => Value::StructMarker,
        (Value::ListMarker, Value::ListMarker) => Value::ListMarker,

        (Value::TypeConstraint(k1), Value::TypeConstraint(k2)) => {
            let narrowed = *k1 & *k2;
            if narrowed.is_empty() {
                conflict(a, b)
            } else {
                Value::TypeConstraint(narrowed)
            }
        }
        (Value::TypeConstraint(k), other) | (other, Value::TypeConstraint(k))
            if other.is_concrete() =>
        {
            if k.contains(other.kind()) {
                other.clone()
            } else {
                Value::Bottom(Box::new(Bottom::eval(format!(
                    "{} does not satisfy expected kind {k}",
                    other.kind()
                ))))
            }
        }

        (Value::Bound(bound), other) | (other, Value::Bound(bound)) if other.is_concrete() => {
            if satisfies_bound(rt, bound.op, &bound.operand, other) {
                other.clone()
            } else {
                Value::Bottom(Box::new(Bottom::eval(format!(
                    "{other_kind} does not satisfy bound",
                    other_kind = other.kind()
                ))))
            }
        }
        (Value::MatchN(mn), other) | (other, Value::MatchN(mn)) if other.is_concrete() => {
            check_matchn(rt, mn, other)
        }
        (Value::Bound(_), Value::Bound(_))
        | (Value::MatchN(_), Value::Bound(_))
        | (Value::Bound(_), Value::MatchN(_))
        | (Value::MatchN(_), Value::MatchN(_)) => {
            Value::Conjunction(Rc::from(vec![a.clone(), b.clone()]))
        }

        (Value::Conjunction(members), other) | (other, Value::Conjunction(members)) => {
            unify_conjunction(rt, members, other)
        }

        _ => {
            if a.kind().intersects(b.kind()) {
                conflict(a, b)
            } else {
                Value::Bottom(Box::new(Bottom::eval(format!(
                    "conflicting kinds {} and {}",
                    a.kind(),
                    b.kind()
                ))))
            }
        }
    }
}

/// Combines a `Conjunction`'s members with `other`. Unresolved validators
/// (`Bound`/`MatchN`/another `Conjunction`) are flattened straight into the
/// member list rather than folded in pairwise through `unify` one at a
/// time: folding would re-enter this same arm every time an intermediate
/// accumulator turned back into a fresh two-member `Conjunction`, which
/// never shrinks the remaining member count and recurses without bound. A
/// concrete `other` has nothing left to flatten against, so it discharges
/// the conjunction by checking containment member-by-member instead.
fn unify_conjunction(rt: &mut Runtime, members: &Rc<[Value]>, other: &Value) -> Value {
    if let Value::Conjunction(other_members) = other {
        let mut flat: Vec<Value> = members.iter().cloned().collect();
        flat.extend(other_members.iter().cloned());
        return Value::Conjunction(Rc::from(flat));
    }
    if matches!(other, Value::Bound(_) | Value::MatchN(_)) {
        let mut flat: Vec<Value> = members.iter().cloned().collect();
        flat.push(other.clone());
        return Value::Conjunction(Rc::from(flat));
    }
    let mut acc = other.clone();
    for m in members.iter() {
        acc = unify(rt, &acc, m);
        if acc.is_bottom() {
            return acc;
        }
    }
    acc
}

/// Renders a concrete scalar/marker the way a conflict message should show
/// it (spec.md §4.4 step 3 / §8 scenario 1: `"conflicting values: 4 != 5"`,
/// not a Rust `Debug` dump of the `Value`/`NumValue` wrapper types).
fn render_scalar(v: &Value) -> String {
    match v {
        Value::Null => "null".to_string(),
        Value::Bool(b) => b.to_string(),
        Value::Num(NumValue::Int(i)) => i.to_string(),
        Value::Num(NumValue::Float(f)) => f.to_string(),
        Value::String(s) => format!("{s:?}"),
        Value::Bytes(b) => format!("{b:?}"),
        Value::StructMarker => "struct".to_string(),
        Value::ListMarker => "list".to_string(),
        other => other.kind().to_string(),
    }
}

fn conflict(a: &Value, b: &Value) -> Value {
    Value::Bottom(Box::new(Bottom::eval(format!(
        "conflicting values: {} != {}",
        render_scalar(a),
        render_scalar(b)
    ))))
}

/// Whether concrete `value` satisfies a `BoundOp` against `operand`
/// (spec.md §4.4 "Bounds and validators").
pub fn satisfies_bound(rt: &mut Runtime, op: BoundOp, operand: &Value, value: &Value) -> bool {
    match op {
        BoundOp::Neq => !values_equal(operand, value),
        BoundOp::Lt | BoundOp::Lte | BoundOp::Gt | BoundOp::Gte => {
            match (numeric(operand), numeric(value)) {
                (Some(o), Some(v)) => match op {
                    BoundOp::Lt => v < o,
                    BoundOp::Lte => v <= o,
                    BoundOp::Gt => v > o,
                    BoundOp::Gte => v >= o,
                    _ => unreachable!(),
                },
                _ => false,
            }
        }
        BoundOp::Matches | BoundOp::NotMatches => {
            let (Value::String(pattern), Value::String(text)) = (operand, value) else {
                return false;
            };
            let matched = rt
                .regex_cache
                .get_or_compile(pattern)
                .map(|re| re.is_match(text))
                .unwrap_or(false);
            if op == BoundOp::Matches {
                matched
            } else {
                !matched
            }
        }
    }
}

/// `matchN(count, schemas)` re-enters unification for each schema against
/// the concrete value and checks the match count (spec.md §4.4, §4.5).
fn check_matchn(rt: &mut Runtime, mn: &cue_core::adt::MatchNValidator, concrete: &Value) -> Value {
    let required = match mn.count.as_ref() {
        Value::Num(NumValue::Int(n)) => *n,
        _ => return Value::Bottom(Box::new(Bottom::incomplete("matchN count is not yet concrete"))),
    };
    let matched = mn
        .schemas
        .iter()
        .filter(|schema| !unify(rt, schema, concrete).is_bottom())
        .count() as i64;
    if matched == required {
        concrete.clone()
    } else {
        Value::Bottom(Box::new(Bottom::eval(format!(
            "matchN({required}, ...) matched {matched} schemas"
        ))))
    }
}

fn numeric(v: &Value) -> Option<f64> {
    match v {
        Value::Num(n) => Some(n.as_f64()),
        _ => None,
    }
}

fn values_equal(a: &Value, b: &Value) -> bool {
    match (a, b) {
        (Value::Null, Value::Null) => true,
        (Value::Bool(x), Value::Bool(y)) => x == y,
        (Value::Num(x), Value::Num(y)) => x.unifies_with(*y),
        (Value::String(x), Value::String(y)) => x == y,
        (Value::Bytes(x), Value::Bytes(y)) => x == y,
        _ => false,
    }
}

#[cfg(test)]
mod unify_tests {
    use super::*;
    use cue_core::adt::BoundValue;

    #[test]
    fn top_unifies_to_other_operand() {
        let mut rt = Runtime::new();
        let v = unify(&mut rt, &Value::Top, &Value::Bool(true));
        assert!(matches!(v, Value::Bool(true)));
    }

    #[test]
    fn equal_numbers_unify() {
        let mut rt = Runtime::new();
        let v = unify(
            &mut rt,
            &Value::Num(NumValue::Int(4)),
            &Value::Num(NumValue::Int(4)),
        );
        assert!(matches!(v, Value::Num(NumValue::Int(4))));
    }

    #[test]
    fn unequal_numbers_conflict() {
        let mut rt = Runtime::new();
        let v = unify(
            &mut rt,
            &Value::Num(NumValue::Int(4)),
            &Value::Num(NumValue::Int(5)),
        );
        assert!(v.is_bottom());
    }

    #[test]
    fn bound_checks_containment_against_concrete() {
        let mut rt = Runtime::new();
        let bound = Value::Bound(BoundValue {
            op: BoundOp::Gte,
            operand: Rc::new(Value::Num(NumValue::Int(5))),
        });
        let ok = unify(&mut rt, &bound, &Value::Num(NumValue::Int(10)));
        assert!(matches!(ok, Value::Num(NumValue::Int(10))));

        let bad = unify(&mut rt, &bound, &Value::Num(NumValue::Int(1)));
        assert!(bad.is_bottom());
    }

    #[test]
    fn incomplete_bottom_is_discharged_by_concrete() {
        let mut rt = Runtime::new();
        let incomplete = Value::Bottom(Box::new(Bottom::incomplete("awaiting value")));
        let v = unify(&mut rt, &incomplete, &Value::Num(NumValue::Int(1)));
        assert!(matches!(v, Value::Num(NumValue::Int(1))));
    }

    #[test]
    fn sticky_bottom_dominates() {
        let mut rt = Runtime::new();
        let sticky = Value::Bottom(Box::new(Bottom::eval("already broken")));
        let v = unify(&mut rt, &sticky, &Value::Num(NumValue::Int(1)));
        assert!(v.is_bottom());
    }

    // spec.md §8 "Commutativity/associativity/idempotence of unification":
    // A&B == B&A; (A&B)&C == A&(B&C); A&A == A, for a representative sample
    // of well-formed scalar/marker values (the pointwise cases `unify`
    // actually dispatches on; structural arcs are a vertex-level concern
    // tested through `expand.rs`/the end-to-end scenarios instead).
    fn sample_values() -> Vec<Value> {
        vec![
            Value::Top,
            Value::Null,
            Value::Bool(true),
            Value::Num(NumValue::Int(4)),
            Value::Num(NumValue::Int(5)),
            Value::StructMarker,
            Value::ListMarker,
            Value::Bound(BoundValue {
                op: BoundOp::Gte,
                operand: Rc::new(Value::Num(NumValue::Int(5))),
            }),
        ]
    }

    #[test]
    fn unification_is_commutative() {
        let mut rt = Runtime::new();
        for a in sample_values() {
            for b in sample_values() {
                let ab = unify(&mut rt, &a, &b);
                let ba = unify(&mut rt, &b, &a);
                assert_eq!(
                    ab.is_bottom(),
                    ba.is_bottom(),
                    "a={a:?} b={b:?} disagree on bottom-ness depending on operand order"
                );
                if !ab.is_bottom() {
                    assert_eq!(format!("{ab:?}"), format!("{ba:?}"), "a={a:?} b={b:?}");
                }
            }
        }
    }

    #[test]
    fn unification_is_associative() {
        let mut rt = Runtime::new();
        let values = sample_values();
        for a in &values {
            for b in &values {
                for c in &values {
                    let ab_c = {
                        let ab = unify(&mut rt, a, b);
                        unify(&mut rt, &ab, c)
                    };
                    let a_bc = {
                        let bc = unify(&mut rt, b, c);
                        unify(&mut rt, a, &bc)
                    };
                    assert_eq!(
                        ab_c.is_bottom(),
                        a_bc.is_bottom(),
                        "a={a:?} b={b:?} c={c:?} disagree on bottom-ness depending on grouping"
                    );
                    if !ab_c.is_bottom() {
                        assert_eq!(
                            format!("{ab_c:?}"),
                            format!("{a_bc:?}"),
                            "a={a:?} b={b:?} c={c:?}"
                        );
                    }
                }
            }
        }
    }

    #[test]
    fn unification_is_idempotent() {
        let mut rt = Runtime::new();
        for a in sample_values() {
            let aa = unify(&mut rt, &a, &a);
            assert_eq!(format!("{aa:?}"), format!("{a:?}"), "a={a:?}");
        }
    }
}
