//! `len(x)` (spec.md §4.5): the number of arcs on a struct/list value, the
//! byte length of bytes, or the rune count of a string.

use cue_core::adt::{NumValue, Value};
use cue_core::errors::Bottom;
use cue_core::{Runtime, VertexId};

/// `len` only sees the scalar/marker `Value`, not the vertex's arcs, so a
/// struct/list argument's arc count is read from its backing vertex when
/// the caller resolved one (`registry.rs::call_with_arcs`).
pub fn eval(rt: &Runtime, args: &[Value], vertex: Option<VertexId>) -> Value {
    let Some(arg) = args.first() else {
        return Value::Bottom(Box::new(Bottom::eval("len() takes exactly one argument")));
    };
    match arg {
        Value::String(s) => Value::Num(NumValue::Int(s.chars().count() as i64)),
        Value::Bytes(b) => Value::Num(NumValue::Int(b.len() as i64)),
        Value::StructMarker | Value::ListMarker => match vertex {
            Some(vid) => Value::Num(NumValue::Int(rt.vertex(vid).arcs.len() as i64)),
            None => Value::Bottom(Box::new(Bottom::incomplete(
                "len() of a struct/list requires its arcs, not yet resolved",
            ))),
        },
        other if other.is_bottom() => other.clone(),
        other => Value::Bottom(Box::new(Bottom::eval(format!(
            "len() not defined for {}",
            other.kind()
        )))),
    }
}
