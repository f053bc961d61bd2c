//! Deterministic arc emission order (spec.md §4.6).
//!
//! `Vertex::arcs`' insertion order already reflects source/declaration
//! order for the common case — arcs are created as `expand.rs` walks
//! conjuncts in declaration order, and fields are addressed by `Feature`
//! rather than position, so no dependency-driven reordering of the backing
//! map is needed. `sorted_arcs` gives callers that need a canonical order
//! regardless of insertion history (export, diagnostics, snapshot tests) the
//! tie-break rule of spec.md §4.6: int labels, then string labels, then
//! definitions, ties broken lexicographically by spelling.

use cue_core::feature::{Feature, Interner};
use cue_core::vertex::{Vertex, VertexId};

pub fn sorted_arcs(vertex: &Vertex, interner: &Interner) -> Vec<(Feature, VertexId)> {
    let mut arcs: Vec<(Feature, VertexId)> = vertex.arcs.iter().map(|(f, v)| (*f, *v)).collect();
    arcs.sort_by(|(a, _), (b, _)| {
        a.sort_rank()
            .cmp(&b.sort_rank())
            .then_with(|| interner.ident(*a).cmp(interner.ident(*b)))
    });
    arcs
}

#[cfg(test)]
mod topo_tests {
    use super::*;
    use cue_core::vertex::Vertex;
    use cue_core::Runtime;

    #[test]
    fn int_labels_sort_before_string_labels() {
        let mut rt = Runtime::new();
        let mut v = Vertex::root();
        let s = rt.interner.intern("zz");
        let i = rt.interner.intern_int(0);
        v.arcs.insert(s, VertexId(1));
        v.arcs.insert(i, VertexId(2));
        let sorted = sorted_arcs(&v, &rt.interner);
        assert_eq!(sorted[0].0, i);
        assert_eq!(sorted[1].0, s);
    }

    #[test]
    fn ties_break_lexicographically() {
        let mut rt = Runtime::new();
        let mut v = Vertex::root();
        let b = rt.interner.intern("b");
        let a = rt.interner.intern("a");
        v.arcs.insert(b, VertexId(1));
        v.arcs.insert(a, VertexId(2));
        let sorted = sorted_arcs(&v, &rt.interner);
        assert_eq!(sorted[0].0, a);
        assert_eq!(sorted[1].0, b);
    }

    // spec.md §8 "Topological determinism": running the sort on the same
    // multiset of contributing features yields byte-identical output no
    // matter what order they were inserted in.
    #[test]
    fn sort_output_is_independent_of_insertion_order() {
        let mut rt = Runtime::new();
        let zz = rt.interner.intern("zz");
        let aa = rt.interner.intern("aa");
        let zero = rt.interner.intern_int(0);
        let one = rt.interner.intern_int(1);

        let mut first = Vertex::root();
        for (f, id) in [(zz, 1), (zero, 2), (aa, 3), (one, 4)] {
            first.arcs.insert(f, VertexId(id));
        }

        let mut second = Vertex::root();
        for (f, id) in [(one, 4), (aa, 3), (zero, 2), (zz, 1)] {
            second.arcs.insert(f, VertexId(id));
        }

        let sorted_first = sorted_arcs(&first, &rt.interner);
        let sorted_second = sorted_arcs(&second, &rt.interner);
        assert_eq!(
            sorted_first.iter().map(|(f, _)| *f).collect::<Vec<_>>(),
            sorted_second.iter().map(|(f, _)| *f).collect::<Vec<_>>()
        );
    }
}
