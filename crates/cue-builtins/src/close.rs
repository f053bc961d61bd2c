//! `close(x)` (spec.md §4.5): closes a struct, rejecting fields not
//! declared by any of its conjuncts.
//!
//! Closedness lives on the `Vertex` (`closed_non_recursive`), not the
//! scalar/marker `Value` this function returns, so the actual flag flip
//! happens against the caller-resolved `VertexId` (`registry.rs::
//! call_with_arcs`); the argument itself just needs to be a struct. The
//! `StructInfo`s already recorded against that vertex are retroactively
//! marked closed-origin at the same time, so its own already-declared
//! fields stay permitted under `Vertex::permits`'s closed-origin gate
//! (`cue-eval::expand`'s `StructInfo::is_closed`) — only a field unified in
//! from outside this call, after closing, is rejected.

use cue_core::adt::Value;
use cue_core::errors::Bottom;
use cue_core::{Runtime, VertexId};

pub fn eval(rt: &mut Runtime, args: &[Value], vertex: Option<VertexId>) -> Value {
    let Some(arg) = args.first() else {
        return Value::Bottom(Box::new(Bottom::eval("close() takes exactly one argument")));
    };
    match arg {
        Value::StructMarker => {
            if let Some(vid) = vertex {
                let v = rt.vertex_mut(vid);
                v.closed_non_recursive = true;
                // Everything already declared at the point of closing is
                // part of the permitted set; only fields unified in later
                // from outside this call are subject to rejection.
                for s in v.structs.iter_mut() {
                    s.is_closed = true;
                }
            }
            Value::StructMarker
        }
        other if other.is_bottom() => other.clone(),
        other => Value::Bottom(Box::new(Bottom::eval(format!(
            "cannot close non-struct value of kind {}",
            other.kind()
        )))),
    }
}
