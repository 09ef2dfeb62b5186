//! In-process store used by the test suites and fixture-driven runs
//!
//! Mirrors the remote store's visible behavior: batched hops, batched
//! hydration, staged writes with optimistic commit. Conflict injection
//! ([`MemoryStore::fail_next_commits`]) exercises the retry wrapper, and a
//! round-trip counter lets tests assert that evaluators stay batched.

use super::{GraphStore, StoreError, StoreResult};
use crate::graph::{Direction, EntityKind, Frontier, PropertyCache, PropertyMap, VertexId};
use rustc_hash::FxHashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Clone)]
struct EdgeRec {
    label: String,
    other: VertexId,
    props: PropertyMap,
}

#[derive(Debug, Default)]
struct Committed {
    vertices: FxHashMap<VertexId, PropertyMap>,
    out_edges: FxHashMap<VertexId, Vec<EdgeRec>>,
    in_edges: FxHashMap<VertexId, Vec<EdgeRec>>,
}

#[derive(Debug, Default)]
struct Staged {
    vertices: Vec<(VertexId, PropertyMap)>,
    edges: Vec<(VertexId, String, VertexId, PropertyMap)>,
}

/// In-memory [`GraphStore`] with staged writes and injectable commit
/// conflicts.
#[derive(Debug, Default)]
pub struct MemoryStore {
    committed: RwLock<Committed>,
    staged: RwLock<Staged>,
    tx_enabled: AtomicBool,
    fail_next_commits: AtomicUsize,
    round_trips: AtomicUsize,
}

impl MemoryStore {
    pub fn new() -> Self {
        MemoryStore {
            tx_enabled: AtomicBool::new(true),
            ..MemoryStore::default()
        }
    }

    /// Insert a vertex directly into committed state, bypassing the
    /// transaction stage. Test seeding only.
    pub fn seed_vertex(&self, id: VertexId, props: PropertyMap) {
        self.write_committed().vertices.insert(id, props);
    }

    /// Insert an edge directly into committed state. Test seeding only.
    pub fn seed_edge(&self, source: VertexId, label: &str, target: VertexId, props: PropertyMap) {
        let mut committed = self.write_committed();
        Self::link(&mut committed, source, label, target, props);
    }

    /// Seed a `knows` friendship: one edge in each direction so undirected
    /// traversal works from either endpoint.
    pub fn seed_knows(&self, a: VertexId, b: VertexId, creation_date: i64) {
        let mut props = PropertyMap::new();
        props.insert(
            "creationDate".to_string(),
            crate::graph::PropertyValue::DateTime(creation_date),
        );
        let mut committed = self.write_committed();
        Self::link(&mut committed, a, "knows", b, props.clone());
        Self::link(&mut committed, b, "knows", a, props);
    }

    /// Make the next `n` commits fail with [`StoreError::Conflict`].
    pub fn fail_next_commits(&self, n: usize) {
        self.fail_next_commits.store(n, Ordering::SeqCst);
    }

    /// Number of batched store calls (hops + hydrations) issued so far.
    pub fn round_trips(&self) -> usize {
        self.round_trips.load(Ordering::SeqCst)
    }

    /// Whether transactional reads are currently enabled.
    pub fn tx_enabled(&self) -> bool {
        self.tx_enabled.load(Ordering::SeqCst)
    }

    pub fn staged_write_count(&self) -> usize {
        let staged = self.read_staged();
        staged.vertices.len() + staged.edges.len()
    }

    fn link(
        committed: &mut Committed,
        source: VertexId,
        label: &str,
        target: VertexId,
        props: PropertyMap,
    ) {
        committed.out_edges.entry(source).or_default().push(EdgeRec {
            label: label.to_string(),
            other: target,
            props: props.clone(),
        });
        committed.in_edges.entry(target).or_default().push(EdgeRec {
            label: label.to_string(),
            other: source,
            props,
        });
    }

    // Lock order: `committed` before `staged` wherever both are held.
    //
    // Poisoned locks only arise from a panicking test; recover the guard
    // rather than cascading the panic.
    fn read_committed(&self) -> RwLockReadGuard<'_, Committed> {
        self.committed.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_committed(&self) -> RwLockWriteGuard<'_, Committed> {
        self.committed.write().unwrap_or_else(|e| e.into_inner())
    }

    fn read_staged(&self) -> RwLockReadGuard<'_, Staged> {
        self.staged.read().unwrap_or_else(|e| e.into_inner())
    }

    fn write_staged(&self) -> RwLockWriteGuard<'_, Staged> {
        self.staged.write().unwrap_or_else(|e| e.into_inner())
    }

    fn vertex_exists(&self, id: VertexId) -> bool {
        if self.read_committed().vertices.contains_key(&id) {
            return true;
        }
        self.read_staged().vertices.iter().any(|(v, _)| *v == id)
    }

    fn kind_allowed(target: VertexId, target_kinds: &[EntityKind]) -> bool {
        target_kinds.is_empty() || target_kinds.contains(&target.kind)
    }
}

impl GraphStore for MemoryStore {
    fn traverse(
        &self,
        sources: &[VertexId],
        label: &str,
        direction: Direction,
        edge_props: bool,
        target_kinds: &[EntityKind],
    ) -> StoreResult<Frontier> {
        self.round_trips.fetch_add(1, Ordering::SeqCst);
        let committed = self.read_committed();
        let staged = self.read_staged();

        let mut frontier = Frontier::new();
        for source in sources {
            let adjacency = match direction {
                Direction::Out => committed.out_edges.get(source),
                Direction::In => committed.in_edges.get(source),
            };
            if let Some(edges) = adjacency {
                for rec in edges {
                    if rec.label == label && Self::kind_allowed(rec.other, target_kinds) {
                        let props = edge_props.then(|| rec.props.clone());
                        frontier.push(*source, rec.other, props);
                    }
                }
            }
            // Writes staged in this transaction are visible to its reads.
            for (s, l, t, props) in &staged.edges {
                let (from, to) = match direction {
                    Direction::Out => (*s, *t),
                    Direction::In => (*t, *s),
                };
                if from == *source && l == label && Self::kind_allowed(to, target_kinds) {
                    frontier.push(*source, to, edge_props.then(|| props.clone()));
                }
            }
        }
        Ok(frontier)
    }

    fn hydrate(&self, ids: &[VertexId], cache: &mut PropertyCache) -> StoreResult<()> {
        self.round_trips.fetch_add(1, Ordering::SeqCst);
        let committed = self.read_committed();
        let staged = self.read_staged();
        for id in ids {
            if cache.contains(*id) {
                continue;
            }
            if let Some(props) = committed.vertices.get(id) {
                cache.insert(*id, props.clone());
            } else if let Some((_, props)) = staged.vertices.iter().find(|(v, _)| v == id) {
                cache.insert(*id, props.clone());
            }
        }
        Ok(())
    }

    fn contains_vertex(&self, id: VertexId) -> StoreResult<bool> {
        Ok(self.vertex_exists(id))
    }

    fn create_vertex(&self, id: VertexId, props: PropertyMap) -> StoreResult<()> {
        if self.vertex_exists(id) {
            return Err(StoreError::VertexExists(id));
        }
        self.write_staged().vertices.push((id, props));
        Ok(())
    }

    fn create_edge(
        &self,
        source: VertexId,
        label: &str,
        target: VertexId,
        props: PropertyMap,
    ) -> StoreResult<()> {
        if !self.vertex_exists(source) {
            return Err(StoreError::VertexNotFound(source));
        }
        if !self.vertex_exists(target) {
            return Err(StoreError::VertexNotFound(target));
        }
        self.write_staged().edges.push((source, label.to_string(), target, props));
        Ok(())
    }

    fn set_tx_enabled(&self, enabled: bool) {
        self.tx_enabled.store(enabled, Ordering::SeqCst);
    }

    fn commit(&self) -> StoreResult<()> {
        let pending = self.fail_next_commits.load(Ordering::SeqCst);
        if pending > 0 {
            self.fail_next_commits.store(pending - 1, Ordering::SeqCst);
            return Err(StoreError::Conflict);
        }
        let mut committed = self.write_committed();
        let mut staged = self.write_staged();
        for (id, props) in staged.vertices.drain(..) {
            committed.vertices.insert(id, props);
        }
        let edges: Vec<_> = staged.edges.drain(..).collect();
        for (source, label, target, props) in edges {
            Self::link(&mut committed, source, &label, target, props);
        }
        Ok(())
    }

    fn rollback(&self) {
        let mut staged = self.write_staged();
        staged.vertices.clear();
        staged.edges.clear();
    }
}
