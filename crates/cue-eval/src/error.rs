//! Bridges ADT-level `Bottom` values to the external error surface
//! (spec.md §7: "a top-level function that concatenates all Bottoms
//! beneath a vertex is provided").

use cue_core::{Errors, ErrorRecord, Interner, Runtime, VertexId};

/// Walk the finalized subtree rooted at `v` and collect every `Bottom`
/// found, each annotated with its dotted path from `v`.
pub fn collect_bottoms(rt: &Runtime, interner: &Interner, v: VertexId) -> Errors {
    let mut errors = Errors::default();
    collect_into(rt, interner, v, &mut Vec::new(), &mut errors);
    errors
}

fn collect_into(
    rt: &Runtime,
    interner: &Interner,
    v: VertexId,
    path: &mut Vec<String>,
    out: &mut Errors,
) {
    let vertex = rt.vertex(v);
    if let Some(bottom) = vertex.base_value.as_ref().and_then(|bv| bv.as_bottom()) {
        out.push(ErrorRecord {
            position: bottom.position,
            kind: bottom.code,
            message: bottom.message.clone(),
            path: path.clone(),
        });
    }
    for (feature, child) in vertex.arcs.iter() {
        path.push(interner.ident(*feature).to_string());
        collect_into(rt, interner, *child, path, out);
        path.pop();
    }
}

#[cfg(test)]
mod error_tests {
    use super::*;
    use cue_core::errors::Bottom;
    use cue_core::adt::Value;
    use cue_core::Vertex;

    #[test]
    fn collects_bottom_from_nested_arc() {
        let mut rt = Runtime::new();
        let mut interner = Interner::new();
        let f = interner.intern("a");

        let child = rt.alloc_vertex(Vertex::root());
        rt.vertex_mut(child).base_value =
            Some(Value::Bottom(Box::new(Bottom::eval("conflicting values"))));

        let root = rt.alloc_vertex(Vertex::root());
        rt.vertex_mut(root).arcs.insert(f, child);

        let errors = collect_bottoms(&rt, &interner, root);
        assert_eq!(errors.0.len(), 1);
        assert_eq!(errors.0[0].path, vec!["a".to_string()]);
    }
}
