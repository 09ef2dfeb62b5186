//! Path queries over the `knows` graph (queries 13 and 14)

use crate::error::QueryResult;
use crate::graph::{Direction, EntityKind, VertexId};
use crate::store::GraphStore;
use rustc_hash::{FxHashMap, FxHashSet};
use serde::{Deserialize, Serialize};
use std::cmp::Ordering;

/// Hop ceiling for the shortest-path search; beyond it the pair is
/// reported unreachable.
const PATH_DEPTH_LIMIT: i32 = 5;

// ---------------------------------------------------------------------------
// Q13: shortest friendship path length

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Q13Params {
    pub person1_id: u64,
    pub person2_id: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Q13Result {
    /// Hops on the shortest `knows` path; 0 for identical endpoints, -1
    /// when no path exists within the depth ceiling.
    pub shortest_path_length: i32,
}

pub fn q13(store: &dyn GraphStore, params: &Q13Params) -> QueryResult<Q13Result> {
    // Identical endpoints resolve locally, without touching the store.
    if params.person1_id == params.person2_id {
        return Ok(Q13Result { shortest_path_length: 0 });
    }
    let source = VertexId::person(params.person1_id);
    let target = VertexId::person(params.person2_id);

    let mut seen: FxHashSet<VertexId> = FxHashSet::default();
    seen.insert(source);
    let mut current = vec![source];
    for depth in 1..=PATH_DEPTH_LIMIT {
        let hop =
            store.traverse(&current, "knows", Direction::Out, false, &[EntityKind::Person])?;
        if hop.contains_target(target) {
            return Ok(Q13Result { shortest_path_length: depth });
        }
        current = hop.target_iter().filter(|v| seen.insert(*v)).collect();
        if current.is_empty() {
            break;
        }
    }
    Ok(Q13Result { shortest_path_length: -1 })
}

// ---------------------------------------------------------------------------
// Q14: all shortest paths, weighted by reply interactions

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Q14Params {
    pub person1_id: u64,
    pub person2_id: u64,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct Q14Row {
    pub person_ids: Vec<u64>,
    pub path_weight: f64,
}

/// Every shortest `knows` path between the endpoints, each weighted by
/// the reply traffic along its edges: 1.0 per comment replying to the
/// other endpoint's post, 0.5 per comment replying to the other
/// endpoint's comment, both directions. Unreachable endpoints yield an
/// empty result.
pub fn q14(store: &dyn GraphStore, params: &Q14Params) -> QueryResult<Vec<Q14Row>> {
    if params.person1_id == params.person2_id {
        return Ok(vec![Q14Row { person_ids: vec![params.person1_id], path_weight: 0.0 }]);
    }
    let source = VertexId::person(params.person1_id);
    let target = VertexId::person(params.person2_id);

    // BFS building the predecessor DAG of all shortest paths; expansion
    // stops at the level where the target first appears.
    let mut depth_of: FxHashMap<VertexId, usize> = FxHashMap::default();
    depth_of.insert(source, 0);
    let mut preds: FxHashMap<VertexId, Vec<VertexId>> = FxHashMap::default();
    let mut current = vec![source];
    let mut found = false;
    let mut depth = 0usize;
    while !current.is_empty() && !found {
        depth += 1;
        let hop =
            store.traverse(&current, "knows", Direction::Out, false, &[EntityKind::Person])?;
        let mut next = Vec::new();
        for (from, neighbors) in hop.iter() {
            for to in &neighbors.targets {
                match depth_of.get(to) {
                    None => {
                        depth_of.insert(*to, depth);
                        preds.entry(*to).or_default().push(from);
                        next.push(*to);
                        if *to == target {
                            found = true;
                        }
                    }
                    Some(d) if *d == depth => preds.entry(*to).or_default().push(from),
                    _ => {}
                }
            }
        }
        current = next;
    }
    if !found {
        return Ok(Vec::new());
    }

    let paths = enumerate_paths(&preds, source, target);
    let on_path: FxHashSet<VertexId> = paths.iter().flatten().copied().collect();
    let weights = pair_weights(store, &on_path)?;

    let mut rows: Vec<Q14Row> = paths
        .into_iter()
        .map(|path| {
            let path_weight = path
                .windows(2)
                .map(|pair| weights.get(&ordered_pair(pair[0], pair[1])).copied().unwrap_or(0.0))
                .sum();
            Q14Row { person_ids: path.into_iter().map(|v| v.local).collect(), path_weight }
        })
        .collect();
    rows.sort_by(|a, b| b.path_weight.partial_cmp(&a.path_weight).unwrap_or(Ordering::Equal));
    Ok(rows)
}

/// Walk the predecessor DAG back from the target, materializing every
/// shortest path in source-to-target order.
fn enumerate_paths(
    preds: &FxHashMap<VertexId, Vec<VertexId>>,
    source: VertexId,
    target: VertexId,
) -> Vec<Vec<VertexId>> {
    let mut out = Vec::new();
    let mut acc = Vec::new();
    descend(preds, source, target, &mut acc, &mut out);
    out
}

fn descend(
    preds: &FxHashMap<VertexId, Vec<VertexId>>,
    source: VertexId,
    v: VertexId,
    acc: &mut Vec<VertexId>,
    out: &mut Vec<Vec<VertexId>>,
) {
    acc.push(v);
    if v == source {
        out.push(acc.iter().rev().copied().collect());
    } else if let Some(parents) = preds.get(&v) {
        for parent in parents {
            descend(preds, source, *parent, acc, out);
        }
    }
    acc.pop();
}

fn ordered_pair(a: VertexId, b: VertexId) -> (VertexId, VertexId) {
    if a <= b {
        (a, b)
    } else {
        (b, a)
    }
}

/// Reply-interaction weight for every unordered pair of on-path persons,
/// computed in three batched hops over all of them at once.
fn pair_weights(
    store: &dyn GraphStore,
    persons: &FxHashSet<VertexId>,
) -> QueryResult<FxHashMap<(VertexId, VertexId), f64>> {
    let person_vec: Vec<VertexId> = persons.iter().copied().collect();
    let comments =
        store.traverse(&person_vec, "hasCreator", Direction::In, false, &[EntityKind::Comment])?;
    let parents = store.traverse(
        &comments.target_ids(),
        "replyOf",
        Direction::Out,
        false,
        &[EntityKind::Post, EntityKind::Comment],
    )?;
    let parent_authors = store.traverse(
        &parents.target_ids(),
        "hasCreator",
        Direction::Out,
        false,
        &[EntityKind::Person],
    )?;

    let mut weights: FxHashMap<(VertexId, VertexId), f64> = FxHashMap::default();
    for (author, neighbors) in comments.iter() {
        for comment in &neighbors.targets {
            let Some(parent) = parents.first_target(*comment) else { continue };
            let Some(parent_author) = parent_authors.first_target(parent) else { continue };
            if parent_author == author || !persons.contains(&parent_author) {
                continue;
            }
            let weight = if parent.kind == EntityKind::Post { 1.0 } else { 0.5 };
            *weights.entry(ordered_pair(author, parent_author)).or_default() += weight;
        }
    }
    Ok(weights)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(n: u64) -> VertexId {
        VertexId::person(n)
    }

    #[test]
    fn test_enumerate_paths_follows_all_branches() {
        // 1 -> {2, 3} -> 4: two shortest paths.
        let mut preds: FxHashMap<VertexId, Vec<VertexId>> = FxHashMap::default();
        preds.insert(p(2), vec![p(1)]);
        preds.insert(p(3), vec![p(1)]);
        preds.insert(p(4), vec![p(2), p(3)]);

        let mut paths = enumerate_paths(&preds, p(1), p(4));
        paths.sort();
        assert_eq!(paths, vec![vec![p(1), p(2), p(4)], vec![p(1), p(3), p(4)]]);
    }

    #[test]
    fn test_ordered_pair_is_symmetric() {
        assert_eq!(ordered_pair(p(2), p(1)), ordered_pair(p(1), p(2)));
    }
}
