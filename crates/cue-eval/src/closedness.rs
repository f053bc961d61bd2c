//! Step 6 of `finalize` (spec.md §4.4 step 6, §3 invariants): reject arcs a
//! closed vertex does not permit.
//!
//! Applied after children are finalized rather than before (spec.md's
//! step numbering lists this before child finalization): permission is
//! purely a function of the owning vertex's `StructInfo`s, established
//! during expansion, so checking it post-hoc has the same effect and
//! avoids re-entering an already-finalizing child to inject a conjunct.

use cue_core::adt::Value;
use cue_core::errors::Bottom;
use cue_core::feature::Feature;
use cue_core::vertex::VertexId;
use cue_core::Runtime;

pub fn enforce_closedness(rt: &mut Runtime, owner: VertexId) {
    if !rt.vertex(owner).is_closed() {
        return;
    }
    let arcs: Vec<(Feature, VertexId)> = rt
        .vertex(owner)
        .arcs
        .iter()
        .map(|(f, v)| (*f, *v))
        .collect();
    for (feature, child) in arcs {
        if rt.vertex(owner).permits(feature) {
            continue;
        }
        let name = rt.interner.ident(feature).to_string();
        rt.vertex_mut(child).base_value = Some(Value::Bottom(Box::new(Bottom::eval(format!(
            "field `{name}` not allowed"
        )))));
    }
}

#[cfg(test)]
mod closedness_tests {
    use super::*;
    use cue_core::vertex::{Status, StructInfo, Vertex};

    #[test]
    fn closed_vertex_rejects_undeclared_arc() {
        let mut rt = Runtime::new();
        let owner = rt.alloc_vertex(Vertex::root());
        let allowed = rt.interner.intern("a");
        let stray = rt.interner.intern("b");
        rt.vertex_mut(owner).closed_recursive = true;
        rt.vertex_mut(owner).structs.push(StructInfo {
            declared_order: vec![allowed],
            has_ellipsis: false,
            has_bulk_patterns: false,
            is_closed: true,
        });
        let stray_child = rt.alloc_vertex(Vertex::child(owner, stray));
        rt.vertex_mut(stray_child).status = Status::Finalized;
        rt.vertex_mut(stray_child).base_value = Some(Value::Num(cue_core::adt::NumValue::Int(1)));
        rt.vertex_mut(owner).arcs.insert(stray, stray_child);

        enforce_closedness(&mut rt, owner);

        assert!(rt.vertex(stray_child).base_value.as_ref().unwrap().is_bottom());
    }

    // spec.md §8 "Closedness monotonicity": once closed, unifying in a
    // conjunct that introduces a field no contributing closed-origin struct
    // declares can never succeed, no matter how many other structs (closed
    // or not) also contributed to the same vertex.
    #[test]
    fn closing_rejects_new_fields_regardless_of_other_contributions() {
        let mut rt = Runtime::new();
        let owner = rt.alloc_vertex(Vertex::root());
        let allowed = rt.interner.intern("a");
        let stray = rt.interner.intern("b");
        rt.vertex_mut(owner).closed_recursive = true;
        rt.vertex_mut(owner).structs.push(StructInfo {
            declared_order: vec![allowed],
            has_ellipsis: false,
            has_bulk_patterns: false,
            is_closed: true,
        });
        // An additional, open-origin struct also declaring `b` must not
        // license it: only closed-origin structs count (cue-core's
        // `StructInfo::is_closed` gate).
        rt.vertex_mut(owner).structs.push(StructInfo {
            declared_order: vec![stray],
            has_ellipsis: false,
            has_bulk_patterns: false,
            is_closed: false,
        });
        let stray_child = rt.alloc_vertex(Vertex::child(owner, stray));
        rt.vertex_mut(stray_child).status = Status::Finalized;
        rt.vertex_mut(stray_child).base_value = Some(Value::Num(cue_core::adt::NumValue::Int(1)));
        rt.vertex_mut(owner).arcs.insert(stray, stray_child);

        enforce_closedness(&mut rt, owner);

        assert!(rt.vertex(stray_child).base_value.as_ref().unwrap().is_bottom());
        assert!(rt.vertex(owner).permits(allowed));
    }
}
