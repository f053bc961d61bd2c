//! `and(list)`/`or(list)` (spec.md §4.5): fold a list argument's elements
//! through unification or disjunction.
//!
//! Both need the list's elements, not just its marker `Value`, so they read
//! the argument's backing vertex the same way `len` does — by the time a
//! builtin call sees the argument, `finalize_vertex` has already finalized
//! its arcs, so their `base_value`s are ready to read.

use cue_core::adt::Value;
use cue_core::errors::Bottom;
use cue_core::{Runtime, VertexId};

use cue_eval::disjunction;
use cue_eval::topo::sorted_arcs;
use cue_eval::unify::unify;

fn list_elements(rt: &Runtime, vertex: Option<VertexId>) -> Result<Vec<Value>, Value> {
    let Some(vid) = vertex else {
        return Err(Value::Bottom(Box::new(Bottom::incomplete(
            "list argument not yet resolved to a vertex",
        ))));
    };
    let arcs = sorted_arcs(rt.vertex(vid), &rt.interner);
    Ok(arcs
        .into_iter()
        .map(|(_, child)| rt.vertex(child).base_value.clone().unwrap_or(Value::Top))
        .collect())
}

fn check_list_arg(name: &str, args: &[Value]) -> Result<(), Value> {
    match args.first() {
        Some(Value::ListMarker) => Ok(()),
        Some(other) if other.is_bottom() => Err(other.clone()),
        Some(other) => Err(Value::Bottom(Box::new(Bottom::eval(format!(
            "{name}() requires a list argument, got {}",
            other.kind()
        ))))),
        None => Err(Value::Bottom(Box::new(Bottom::eval(format!(
            "{name}() takes exactly one argument"
        ))))),
    }
}

pub fn and(rt: &mut Runtime, args: &[Value], vertex: Option<VertexId>) -> Value {
    if let Err(bottom) = check_list_arg("and", args) {
        return bottom;
    }
    let elements = match list_elements(rt, vertex) {
        Ok(elements) => elements,
        Err(bottom) => return bottom,
    };
    elements.iter().fold(Value::Top, |acc, v| unify(rt, &acc, v))
}

pub fn or(rt: &mut Runtime, args: &[Value], vertex: Option<VertexId>) -> Value {
    if let Err(bottom) = check_list_arg("or", args) {
        return bottom;
    }
    let elements = match list_elements(rt, vertex) {
        Ok(elements) => elements,
        Err(bottom) => return bottom,
    };
    if elements.is_empty() {
        return Value::Bottom(Box::new(Bottom::incomplete("or() of an empty list")));
    }
    disjunction::resolve(elements.into_iter().map(|v| (v, false)).collect())
}
