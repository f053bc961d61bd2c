//! Cycle-detection support shared between `expr_eval.rs` (detecting a
//! re-entrant reference) and `finalize.rs` (deciding whether a vertex that
//! never became concrete was a genuine structural cycle, spec.md §4.4
//! "Cycle handling").

use cue_core::adt::Value;
use cue_core::errors::Bottom;
use cue_core::ErrorCode;

/// The exact message `expr_eval::eval_reference` uses when a reference
/// hits a vertex already on the evaluating stack. A non-sticky
/// `IncompleteError` so a later, concrete conjunct on the same vertex can
/// still discharge it (the common "cycle broken by a concrete sibling"
/// case); kept as a sentinel so `finalize.rs` can recognize one that
/// survives to the end of `finalize` as unresolved.
pub const CYCLIC_REFERENCE_MESSAGE: &str =
    "cyclic reference; awaiting a concrete value from another conjunct";

pub fn cyclic_bottom() -> Value {
    Value::Bottom(Box::new(Bottom::incomplete(CYCLIC_REFERENCE_MESSAGE)))
}

/// What a reference into an already-`Evaluating` vertex resolves to
/// (spec.md §8 scenario 4, "cycle broken by a concrete sibling"): the
/// residue that vertex has committed so far if it's usable, falling back
/// to the ordinary non-sticky cyclic-reference `Bottom` otherwise. A
/// concrete value or an already-discovered sticky conflict are both
/// usable; `Top` (no conjunct processed yet) or a still-non-sticky
/// incomplete residue mean nothing was actually settled yet, so the cycle
/// remains genuinely unresolved for now.
pub fn partial_or_cyclic_bottom(partial: Option<Value>) -> Value {
    match partial {
        Some(v) if v.is_concrete() => v,
        Some(Value::Bottom(b)) if b.is_sticky() => Value::Bottom(b),
        _ => cyclic_bottom(),
    }
}

/// Promote an unresolved cyclic reference from `IncompleteError` to a
/// terminal `CycleError` once nothing more can discharge it.
pub fn upgrade_unresolved(v: Value) -> Value {
    match &v {
        Value::Bottom(b)
            if b.code == ErrorCode::IncompleteError && b.message == CYCLIC_REFERENCE_MESSAGE =>
        {
            Value::Bottom(Box::new(Bottom::cycle(
                "reference never resolved to a concrete value",
            )))
        }
        _ => v,
    }
}

#[cfg(test)]
mod cycle_tests {
    use super::*;

    #[test]
    fn unresolved_cycle_upgrades_to_cycle_error() {
        let v = upgrade_unresolved(cyclic_bottom());
        assert_eq!(v.as_bottom().unwrap().code, ErrorCode::CycleError);
    }

    #[test]
    fn ordinary_incomplete_is_untouched() {
        let v = Value::Bottom(Box::new(Bottom::incomplete("something else")));
        let upgraded = upgrade_unresolved(v.clone());
        assert_eq!(upgraded.as_bottom().unwrap().code, ErrorCode::IncompleteError);
    }

    #[test]
    fn concrete_partial_breaks_the_cycle() {
        let v = partial_or_cyclic_bottom(Some(Value::Num(cue_core::adt::NumValue::Int(200))));
        assert!(matches!(v, Value::Num(cue_core::adt::NumValue::Int(200))));
    }

    #[test]
    fn no_partial_yet_stays_cyclic() {
        let v = partial_or_cyclic_bottom(None);
        assert_eq!(v.as_bottom().unwrap().code, ErrorCode::IncompleteError);
    }

    #[test]
    fn non_concrete_partial_stays_cyclic() {
        let v = partial_or_cyclic_bottom(Some(Value::Top));
        assert_eq!(v.as_bottom().unwrap().code, ErrorCode::IncompleteError);
    }
}
