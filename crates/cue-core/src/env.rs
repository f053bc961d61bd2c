//! `Environment`: the linked scope chain conjuncts resolve references
//! against (spec.md §3).

use crate::adt::UpCount;
use crate::feature::Feature;
use crate::vertex::VertexId;

/// A handle into the owning [`Runtime`](crate::runtime::Runtime)'s
/// environment arena. Per spec.md §9, environments are arena-allocated and
/// referenced by stable index rather than by owning pointer, since they form
/// a DAG shared across many conjuncts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct EnvId(pub u32);

/// A single link in the environment chain: `{Up, Vertex, DynamicLabel}`
/// (spec.md §3). Environments are immutable once created.
#[derive(Debug, Clone)]
pub struct Environment {
    pub up: Option<EnvId>,
    pub vertex: VertexId,
    /// The label bound by this frame for `LabelReference` lookups, when the
    /// frame was pushed for a bulk-optional pattern or a `for` clause.
    pub dynamic_label: Option<Feature>,
}

impl Environment {
    pub fn root(vertex: VertexId) -> Self {
        Self {
            up: None,
            vertex,
            dynamic_label: None,
        }
    }

    pub fn child(up: EnvId, vertex: VertexId) -> Self {
        Self {
            up: Some(up),
            vertex,
            dynamic_label: None,
        }
    }

    pub fn with_label(mut self, label: Feature) -> Self {
        self.dynamic_label = Some(label);
        self
    }
}

/// Append-only arena of [`Environment`]s, owned by the [`Runtime`].
#[derive(Debug, Default)]
pub struct EnvArena {
    envs: Vec<Environment>,
}

impl EnvArena {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn alloc(&mut self, env: Environment) -> EnvId {
        let id = EnvId(self.envs.len() as u32);
        self.envs.push(env);
        id
    }

    pub fn get(&self, id: EnvId) -> &Environment {
        &self.envs[id.0 as usize]
    }

    /// Walk `up_count` `Up` links from `start`, per spec.md §4.4: "A
    /// Reference is resolved against env (walking UpCount Up links to the
    /// target Environment)".
    pub fn walk_up(&self, start: EnvId, up_count: UpCount) -> EnvId {
        let mut current = start;
        for _ in 0..up_count.0 {
            current = self
                .get(current)
                .up
                .expect("UpCount exceeds environment chain depth");
        }
        current
    }
}

#[cfg(test)]
mod env_tests {
    use super::*;
    use crate::vertex::VertexId;

    #[test]
    fn walk_up_follows_chain() {
        let mut arena = EnvArena::new();
        let root = arena.alloc(Environment::root(VertexId(0)));
        let mid = arena.alloc(Environment::child(root, VertexId(1)));
        let leaf = arena.alloc(Environment::child(mid, VertexId(2)));

        assert_eq!(arena.walk_up(leaf, UpCount(0)), leaf);
        assert_eq!(arena.walk_up(leaf, UpCount(1)), mid);
        assert_eq!(arena.walk_up(leaf, UpCount(2)), root);
    }

    #[test]
    #[should_panic(expected = "UpCount exceeds")]
    fn walk_up_past_root_panics() {
        let mut arena = EnvArena::new();
        let root = arena.alloc(Environment::root(VertexId(0)));
        arena.walk_up(root, UpCount(1));
    }
}
