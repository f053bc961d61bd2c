//! `Runtime`: the per-evaluation-session collection of shared, mutable
//! state (spec.md §5, §9 "Global runtime state").
//!
//! Callers evaluating multiple independent roots in parallel construct
//! separate `Runtime`s; cross-runtime sharing of `VertexId`/`EnvId` handles
//! is forbidden (spec.md §5) since those indices are only meaningful
//! against the arena that allocated them.

use crate::env::{EnvArena, EnvId, Environment};
use crate::feature::Interner;
use crate::regex_cache::RegexCache;
use crate::vertex::{Vertex, VertexId};

/// All runtime-scoped state for one evaluation session: the feature table,
/// the vertex and environment arenas, and the regex cache. Threaded
/// explicitly through compilation and evaluation rather than kept as a
/// process global (spec.md §9).
#[derive(Debug, Default)]
pub struct Runtime {
    pub interner: Interner,
    vertices: Vec<Vertex>,
    envs: EnvArena,
    pub regex_cache: RegexCache,
    next_compilation_unit: u32,
}

impl Runtime {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc_vertex(&mut self, v: Vertex) -> VertexId {
        let id = VertexId(self.vertices.len() as u32);
        self.vertices.push(v);
        id
    }

    pub fn vertex(&self, id: VertexId) -> &Vertex {
        &self.vertices[id.0 as usize]
    }

    pub fn vertex_mut(&mut self, id: VertexId) -> &mut Vertex {
        &mut self.vertices[id.0 as usize]
    }

    pub fn alloc_env(&mut self, env: Environment) -> EnvId {
        self.envs.alloc(env)
    }

    pub fn env(&self, id: EnvId) -> &Environment {
        self.envs.get(id)
    }

    pub fn env_arena(&self) -> &EnvArena {
        &self.envs
    }

    /// A fresh id for scoping `let` features to their compilation unit
    /// (spec.md §4.2).
    pub fn fresh_compilation_unit(&mut self) -> u32 {
        let id = self.next_compilation_unit;
        self.next_compilation_unit += 1;
        id
    }

    pub fn vertex_count(&self) -> usize {
        self.vertices.len()
    }
}

#[cfg(test)]
mod runtime_tests {
    use super::*;
    use crate::vertex::Vertex;

    #[test]
    fn allocating_vertices_yields_distinct_ids() {
        let mut rt = Runtime::new();
        let a = rt.alloc_vertex(Vertex::root());
        let b = rt.alloc_vertex(Vertex::root());
        assert_ne!(a, b);
        assert_eq!(rt.vertex_count(), 2);
    }

    #[test]
    fn compilation_units_are_monotonic() {
        let mut rt = Runtime::new();
        assert_eq!(rt.fresh_compilation_unit(), 0);
        assert_eq!(rt.fresh_compilation_unit(), 1);
    }
}
