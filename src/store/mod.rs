//! Storage abstraction for the remote sharded graph
//!
//! Query evaluators talk to the store exclusively through [`GraphStore`]:
//! batched hop expansions, batched property hydration, and staged writes
//! under an optimistic transaction. The trait is deliberately narrow so a
//! remote client and the in-process [`memory::MemoryStore`] used by the
//! test suites stay interchangeable.

pub mod memory;

use crate::graph::{Direction, EntityKind, Frontier, PropertyCache, PropertyMap, VertexId};
use thiserror::Error;

pub use memory::MemoryStore;

/// Errors surfaced by store operations.
#[derive(Debug, Error)]
pub enum StoreError {
    /// Optimistic commit lost a race with a concurrent writer. Retryable.
    #[error("transaction conflict on commit")]
    Conflict,

    #[error("vertex not found: {0}")]
    VertexNotFound(VertexId),

    #[error("vertex already exists: {0}")]
    VertexExists(VertexId),

    #[error("store unavailable: {0}")]
    Unavailable(String),
}

pub type StoreResult<T> = Result<T, StoreError>;

/// Batched access to the sharded vertex/edge store.
///
/// All reads observe writes staged in the current transaction. When
/// transactional reads are disabled via [`GraphStore::set_tx_enabled`],
/// hops and hydrations go straight to the latest committed state and
/// `commit` degrades to a no-op validation.
pub trait GraphStore: Send + Sync {
    /// Expand one edge label from a batch of source vertices in a single
    /// round trip.
    ///
    /// Only targets whose kind appears in `target_kinds` are reported; an
    /// empty slice means no kind filter. With `edge_props`, per-edge
    /// property maps are returned index-parallel with the targets.
    fn traverse(
        &self,
        sources: &[VertexId],
        label: &str,
        direction: Direction,
        edge_props: bool,
        target_kinds: &[EntityKind],
    ) -> StoreResult<Frontier>;

    /// Fetch property maps for the given vertices, filling `cache`. Ids
    /// already hydrated are skipped; unknown ids are silently ignored so
    /// callers can hydrate speculative candidate lists.
    fn hydrate(&self, ids: &[VertexId], cache: &mut PropertyCache) -> StoreResult<()>;

    /// Whether a vertex exists (committed or staged in this transaction).
    fn contains_vertex(&self, id: VertexId) -> StoreResult<bool>;

    /// Existence probe for a batch of ids; returns the ids that do not
    /// exist. Update operations use this for their referent check.
    fn missing_vertices(&self, ids: &[VertexId]) -> StoreResult<Vec<VertexId>> {
        let mut missing = Vec::new();
        for id in ids {
            if !self.contains_vertex(*id)? {
                missing.push(*id);
            }
        }
        Ok(missing)
    }

    /// Stage a new vertex in the current transaction.
    fn create_vertex(&self, id: VertexId, props: PropertyMap) -> StoreResult<()>;

    /// Stage a new edge in the current transaction. Both endpoints must
    /// exist, committed or staged.
    fn create_edge(
        &self,
        source: VertexId,
        label: &str,
        target: VertexId,
        props: PropertyMap,
    ) -> StoreResult<()>;

    /// Toggle transactional reads. Disabled reads skip conflict tracking
    /// and read the latest committed state directly.
    fn set_tx_enabled(&self, enabled: bool);

    /// Validate and apply the staged writes. On [`StoreError::Conflict`]
    /// the stage is preserved so the caller can roll back and retry.
    fn commit(&self) -> StoreResult<()>;

    /// Discard all staged writes and conflict-tracking state.
    fn rollback(&self);

    /// Point expansion of one vertex; single-source convenience over
    /// [`GraphStore::traverse`].
    fn edges_of(
        &self,
        source: VertexId,
        label: &str,
        direction: Direction,
        edge_props: bool,
        target_kinds: &[EntityKind],
    ) -> StoreResult<Vec<(VertexId, PropertyMap)>> {
        let frontier = self.traverse(&[source], label, direction, edge_props, target_kinds)?;
        let mut out = Vec::new();
        if let Some(neighbors) = frontier.neighbors(source) {
            for (target, props) in neighbors.iter_with_props() {
                out.push((target, props.cloned().unwrap_or_default()));
            }
        }
        Ok(out)
    }
}

/// Hydrate every distinct target of a frontier in one batch.
pub fn hydrate_targets(
    store: &dyn GraphStore,
    frontier: &Frontier,
    cache: &mut PropertyCache,
) -> StoreResult<()> {
    store.hydrate(&frontier.target_ids(), cache)
}
