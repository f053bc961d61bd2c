//! `Vertex`: the evaluation unit (spec.md §3).

use indexmap::IndexMap;

use crate::adt::{Conjunct, Value};
use crate::feature::Feature;

/// A handle into the owning [`Runtime`](crate::runtime::Runtime)'s vertex
/// arena. Per spec.md §9, vertices form a cyclic graph through `Parent` and
/// references; arena indices avoid owning references between siblings or
/// into parents.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct VertexId(pub u32);

/// A vertex's evaluation progress. Monotonically advances; a `Finalized`
/// vertex has an immutable `base_value` and `arcs` (spec.md §3 invariants).
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord)]
pub enum Status {
    Unprocessed,
    Evaluating,
    Partial,
    Finalized,
}

/// A `StructLit` that contributed to this vertex, retained for arc ordering
/// (spec.md §4.6) and closedness checks (spec.md §4.4 step 6): which
/// features it explicitly permits, and whether it carries bulk-optional
/// patterns/an ellipsis that also license otherwise-unlisted arcs.
#[derive(Debug, Clone)]
pub struct StructInfo {
    /// Declaration order of explicit field features in this struct, used by
    /// the topological arc sort (spec.md §4.6).
    pub declared_order: Vec<Feature>,
    pub has_ellipsis: bool,
    pub has_bulk_patterns: bool,
    /// Whether this particular struct literal was contributed from within a
    /// definition's closed scope. Only closed-origin structs restrict a
    /// closed vertex's permitted fields; unifying a closed definition with
    /// a plain, unrelated struct literal must not let the literal's own
    /// fields license themselves (spec.md §4.4 step 6).
    pub is_closed: bool,
}

impl StructInfo {
    pub fn permits(&self, f: Feature) -> bool {
        self.declared_order.contains(&f) || self.has_ellipsis || self.has_bulk_patterns
    }
}

/// The unit of evaluation (spec.md §3).
#[derive(Debug, Clone)]
pub struct Vertex {
    pub parent: Option<VertexId>,
    pub label: Option<Feature>,
    pub conjuncts: Vec<Conjunct>,
    /// Ordered, duplicate-free by construction (spec.md §3 invariant: "A
    /// Vertex never has two Arcs with the same Feature").
    pub arcs: IndexMap<Feature, VertexId>,
    pub base_value: Option<Value>,
    pub status: Status,
    pub closed_non_recursive: bool,
    pub closed_recursive: bool,
    pub structs: Vec<StructInfo>,
    /// The scalar residue accumulated so far while this vertex is
    /// `Evaluating`, refreshed after each of its own conjuncts is expanded
    /// (`cue-eval::expand::expand_vertex`). A reference that loops back to
    /// this vertex while it is still on the eval stack reads this instead
    /// of blocking outright, so a structural cycle broken by an
    /// already-processed concrete sibling conjunct (spec.md §8 scenario 4)
    /// resolves instead of latching a `CycleError`. Cleared once the
    /// vertex finalizes; `base_value` is the value to read afterwards.
    pub partial_value: Option<Value>,
}

impl Vertex {
    pub fn root() -> Self {
        Self {
            parent: None,
            label: None,
            conjuncts: Vec::new(),
            arcs: IndexMap::new(),
            base_value: None,
            status: Status::Unprocessed,
            closed_non_recursive: false,
            closed_recursive: false,
            structs: Vec::new(),
            partial_value: None,
        }
    }

    pub fn child(parent: VertexId, label: Feature) -> Self {
        Self {
            parent: Some(parent),
            label: Some(label),
            ..Self::root()
        }
    }

    /// Conjuncts may be added only while `status < Finalized` (spec.md §3
    /// invariants).
    pub fn push_conjunct(&mut self, c: Conjunct) {
        assert!(
            self.status != Status::Finalized,
            "cannot add a conjunct to a finalized vertex"
        );
        self.conjuncts.push(c);
    }

    /// Whether this vertex enforces closedness against `arc_feature`: a
    /// vertex closed recursively (or at this level only, non-recursively)
    /// rejects arcs not permitted by at least one contributing struct
    /// (spec.md §3 invariants, §4.4 step 6).
    pub fn is_closed(&self) -> bool {
        self.closed_recursive || self.closed_non_recursive
    }

    pub fn permits(&self, f: Feature) -> bool {
        if !self.is_closed() {
            return true;
        }
        self.structs.iter().any(|s| s.is_closed && s.permits(f))
    }

    pub fn get_arc(&self, f: Feature) -> Option<VertexId> {
        self.arcs.get(&f).copied()
    }

    /// Insert a new arc, upholding the feature-uniqueness invariant by
    /// construction (an existing arc for the same feature is returned
    /// unchanged; callers unify into it instead of replacing it).
    pub fn ensure_arc(&mut self, f: Feature, make: impl FnOnce() -> VertexId) -> VertexId {
        *self.arcs.entry(f).or_insert_with(make)
    }
}

#[cfg(test)]
mod vertex_tests {
    use super::*;

    #[test]
    #[should_panic(expected = "finalized")]
    fn pushing_conjunct_after_finalize_panics() {
        use crate::adt::{CloseInfo, Expr, SourceInfo};
        use crate::env::EnvId;
        use std::rc::Rc;

        let mut v = Vertex::root();
        v.status = Status::Finalized;
        v.push_conjunct(Conjunct::new(
            EnvId(0),
            Rc::new(Expr::Top(SourceInfo::none())),
            CloseInfo::open(),
        ));
    }

    #[test]
    fn open_vertex_permits_everything() {
        let v = Vertex::root();
        let mut interner = crate::feature::Interner::new();
        let f = interner.intern("foo");
        assert!(v.permits(f));
    }

    #[test]
    fn closed_vertex_rejects_unlisted_feature() {
        let mut interner = crate::feature::Interner::new();
        let a = interner.intern("a");
        let b = interner.intern("b");
        let mut v = Vertex::root();
        v.closed_recursive = true;
        v.structs.push(StructInfo {
            declared_order: vec![a],
            has_ellipsis: false,
            has_bulk_patterns: false,
            is_closed: true,
        });
        assert!(v.permits(a));
        assert!(!v.permits(b));
    }

    // spec.md §8 "Feature uniqueness": no Arcs list ever contains two arcs
    // with equal Features. `ensure_arc` is the only insertion path outside
    // of direct test setup, and it must hand back the existing arc for a
    // repeated feature rather than create a second one.
    #[test]
    fn ensure_arc_is_idempotent_per_feature() {
        let mut interner = crate::feature::Interner::new();
        let f = interner.intern("a");
        let mut v = Vertex::root();
        let mut next = VertexId(0);
        let first = v.ensure_arc(f, || {
            next = VertexId(next.0 + 1);
            next
        });
        let second = v.ensure_arc(f, || {
            next = VertexId(next.0 + 1);
            next
        });
        assert_eq!(first, second);
        assert_eq!(v.arcs.len(), 1);
    }
}
