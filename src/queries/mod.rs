//! Workload operation evaluators
//!
//! One evaluator per benchmark operation: complex reads in [`complex`],
//! the two path queries in [`paths`], short reads in [`short`], updates in
//! [`updates`]. Evaluators are plain functions over a [`GraphStore`]; the
//! facade in [`crate::db`] wraps them in the transaction discipline and
//! the fixture short-circuit.
//!
//! Plans follow a common shape: batched hops build frontiers, set algebra
//! prunes them, one hydration pass per distinct vertex batch, then an
//! in-memory sort with the workload's tie-break rule (descending primary
//! key, ascending identifier).

pub mod complex;
pub mod paths;
pub mod short;
pub mod updates;

use crate::error::{QueryError, QueryResult};
use crate::graph::{Direction, EntityKind, Frontier, PropertyCache, VertexId};
use crate::store::GraphStore;
use rustc_hash::FxHashSet;

/// Upper bound for the data-dependent walks (`replyOf` chains, tag-class
/// hierarchy, forum resolution). The stored graph keeps these shallow; the
/// bound only exists to turn corrupt cyclic linkage into an error instead
/// of a hang.
pub(crate) const WALK_DEPTH_LIMIT: usize = 32;

/// Direct friends of a person, excluding the person itself.
pub(crate) fn friends(
    store: &dyn GraphStore,
    person: VertexId,
) -> QueryResult<FxHashSet<VertexId>> {
    let hop = store.traverse(&[person], "knows", Direction::Out, false, &[EntityKind::Person])?;
    let mut set: FxHashSet<VertexId> = hop.target_iter().collect();
    set.remove(&person);
    Ok(set)
}

/// Friends and friends-of-friends of a person, excluding the person.
pub(crate) fn friends_and_fof(
    store: &dyn GraphStore,
    person: VertexId,
) -> QueryResult<FxHashSet<VertexId>> {
    let hop1 = store.traverse(&[person], "knows", Direction::Out, false, &[EntityKind::Person])?;
    let hop2 =
        store.traverse(&hop1.target_ids(), "knows", Direction::Out, false, &[EntityKind::Person])?;
    let mut set: FxHashSet<VertexId> = Frontier::merge(&hop1, &hop2).target_iter().collect();
    set.remove(&person);
    Ok(set)
}

/// All messages (posts and comments) authored by the given persons.
pub(crate) fn messages_of(
    store: &dyn GraphStore,
    persons: &[VertexId],
) -> QueryResult<Frontier> {
    Ok(store.traverse(
        persons,
        "hasCreator",
        Direction::In,
        false,
        &[EntityKind::Post, EntityKind::Comment],
    )?)
}

/// Resolve a raw benchmark message id against the two message kinds.
/// Comments outnumber posts, so that kind is probed first.
pub(crate) fn resolve_message(store: &dyn GraphStore, local: u64) -> QueryResult<VertexId> {
    let comment = VertexId::comment(local);
    if store.contains_vertex(comment)? {
        return Ok(comment);
    }
    let post = VertexId::post(local);
    if store.contains_vertex(post)? {
        return Ok(post);
    }
    Err(QueryError::MissingVertex(post))
}

/// Message body with the image fallback: posts created from an image have
/// an empty `content` and carry the filename in `imageFile`.
pub(crate) fn content_or_image(cache: &PropertyCache, id: VertexId) -> String {
    match cache.string(id, "content") {
        Some(content) if !content.is_empty() => content.to_string(),
        _ => cache.string(id, "imageFile").unwrap_or_default().to_string(),
    }
}

pub(crate) fn string_prop(cache: &PropertyCache, id: VertexId, key: &str) -> String {
    cache.string(id, key).unwrap_or_default().to_string()
}

/// Walk a functionally single-valued label from one vertex, bounded by
/// [`WALK_DEPTH_LIMIT`], until the predicate accepts the current vertex.
/// Used for the `replyOf` chain up to the original post.
pub(crate) fn walk_until(
    store: &dyn GraphStore,
    start: VertexId,
    label: &str,
    operation: &'static str,
    accept: impl Fn(VertexId) -> bool,
) -> QueryResult<VertexId> {
    let mut current = start;
    for _ in 0..WALK_DEPTH_LIMIT {
        if accept(current) {
            return Ok(current);
        }
        let hop = store.traverse(&[current], label, Direction::Out, false, &[])?;
        match hop.first_target(current) {
            Some(next) => current = next,
            None => return Ok(current),
        }
    }
    Err(QueryError::TraversalDepthExceeded { operation, limit: WALK_DEPTH_LIMIT })
}
