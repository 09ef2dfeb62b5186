//! Batched neighborhood results and their set algebra
//!
//! A [`Frontier`] is the result of expanding one edge label from a batch of
//! source vertices: an insertion-ordered map from each source to the targets
//! it reached (with parallel per-edge properties when the label carries
//! them), plus a flattened, deduplicated set of all targets for downstream
//! batch hydration.
//!
//! The combinators here are the local half of every multi-hop query plan:
//! hops fetch, set algebra prunes and joins, so a three-hop neighborhood
//! query costs three round trips instead of one per frontier vertex.
//! Operations documented as "mutates self" modify the receiver in place and
//! rebuild the flattened target set; there is no hidden aliasing between
//! frontiers.

use super::property::PropertyMap;
use super::types::VertexId;
use indexmap::{IndexMap, IndexSet};
use rustc_hash::{FxBuildHasher, FxHashSet};

pub type FxIndexMap<K, V> = IndexMap<K, V, FxBuildHasher>;
pub type FxIndexSet<T> = IndexSet<T, FxBuildHasher>;

/// One source's expansion: targets reached plus parallel per-edge properties.
///
/// `edge_props` is index-parallel with `targets` when the expanded label
/// carries edge properties, and empty otherwise.
#[derive(Debug, Clone, Default)]
pub struct Neighbors {
    pub targets: Vec<VertexId>,
    pub edge_props: Vec<PropertyMap>,
}

impl Neighbors {
    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }

    pub fn first(&self) -> Option<VertexId> {
        self.targets.first().copied()
    }

    /// Iterate targets with their edge properties (empty map if the hop
    /// carried none).
    pub fn iter_with_props(&self) -> impl Iterator<Item = (VertexId, Option<&PropertyMap>)> {
        self.targets
            .iter()
            .enumerate()
            .map(|(i, t)| (*t, self.edge_props.get(i)))
    }
}

/// Result of one batched hop expansion.
///
/// Target-list order within a source is the insertion order reported by the
/// underlying store; it is not sorted. Vertex comparisons are by identity
/// (`VertexId` equality) throughout.
#[derive(Debug, Clone, Default)]
pub struct Frontier {
    map: FxIndexMap<VertexId, Neighbors>,
    targets: FxIndexSet<VertexId>,
}

impl Frontier {
    pub fn new() -> Self {
        Frontier::default()
    }

    /// Record one traversed edge. Used by store implementations while
    /// assembling a hop result.
    pub fn push(&mut self, source: VertexId, target: VertexId, edge_props: Option<PropertyMap>) {
        let entry = self.map.entry(source).or_default();
        entry.targets.push(target);
        if let Some(props) = edge_props {
            entry.edge_props.push(props);
        }
        self.targets.insert(target);
    }

    /// Number of sources with at least one target.
    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }

    /// Number of distinct targets across all sources.
    pub fn target_count(&self) -> usize {
        self.targets.len()
    }

    pub fn contains_target(&self, v: VertexId) -> bool {
        self.targets.contains(&v)
    }

    pub fn neighbors(&self, source: VertexId) -> Option<&Neighbors> {
        self.map.get(&source)
    }

    /// First target recorded for a source. Convenient for functionally
    /// single-valued labels such as `hasCreator` or `replyOf`.
    pub fn first_target(&self, source: VertexId) -> Option<VertexId> {
        self.map.get(&source).and_then(Neighbors::first)
    }

    pub fn iter(&self) -> impl Iterator<Item = (VertexId, &Neighbors)> {
        self.map.iter().map(|(k, v)| (*k, v))
    }

    /// Sources with at least one surviving target, in insertion order.
    pub fn keys(&self) -> Vec<VertexId> {
        self.map.keys().copied().collect()
    }

    /// Flattened distinct targets, in first-seen order.
    pub fn target_ids(&self) -> Vec<VertexId> {
        self.targets.iter().copied().collect()
    }

    pub fn target_iter(&self) -> impl Iterator<Item = VertexId> + '_ {
        self.targets.iter().copied()
    }

    /// Remove every target present in `exclude`; sources whose target list
    /// becomes empty are dropped entirely. Mutates self. Idempotent.
    pub fn subtract(&mut self, exclude: &FxHashSet<VertexId>) {
        for neighbors in self.map.values_mut() {
            if neighbors.edge_props.is_empty() {
                neighbors.targets.retain(|t| !exclude.contains(t));
            } else {
                let mut kept_targets = Vec::with_capacity(neighbors.targets.len());
                let mut kept_props = Vec::with_capacity(neighbors.edge_props.len());
                for (i, t) in neighbors.targets.iter().enumerate() {
                    if !exclude.contains(t) {
                        kept_targets.push(*t);
                        kept_props.push(neighbors.edge_props[i].clone());
                    }
                }
                neighbors.targets = kept_targets;
                neighbors.edge_props = kept_props;
            }
        }
        self.map.retain(|_, n| !n.targets.is_empty());
        self.rebuild_targets();
    }

    /// Keep only targets that are members of `keep`; sources left with no
    /// targets are dropped. Mutates self.
    pub fn retain_targets(&mut self, keep: &FxHashSet<VertexId>) {
        for neighbors in self.map.values_mut() {
            if neighbors.edge_props.is_empty() {
                neighbors.targets.retain(|t| keep.contains(t));
            } else {
                let mut kept_targets = Vec::with_capacity(neighbors.targets.len());
                let mut kept_props = Vec::with_capacity(neighbors.edge_props.len());
                for (i, t) in neighbors.targets.iter().enumerate() {
                    if keep.contains(t) {
                        kept_targets.push(*t);
                        kept_props.push(neighbors.edge_props[i].clone());
                    }
                }
                neighbors.targets = kept_targets;
                neighbors.edge_props = kept_props;
            }
        }
        self.map.retain(|_, n| !n.targets.is_empty());
        self.rebuild_targets();
    }

    /// Keep only source entries whose key is a member of `keep` ("by key"
    /// intersect variant). Mutates self.
    pub fn retain_sources(&mut self, keep: &FxHashSet<VertexId>) {
        self.map.retain(|source, _| keep.contains(source));
        self.rebuild_targets();
    }

    /// Keep only source entries satisfying the predicate. Mutates self.
    pub fn retain_sources_with(&mut self, mut pred: impl FnMut(VertexId, &Neighbors) -> bool) {
        self.map.retain(|source, neighbors| pred(*source, neighbors));
        self.rebuild_targets();
    }

    /// Compose two frontiers that share a key space: each of `a`'s targets
    /// is looked up as a source in `b`, and `a`'s sources are re-keyed onto
    /// the targets `b` recorded for them. Sources whose composed target list
    /// is empty are dropped. With `dedup`, targets are deduplicated per
    /// source (first-seen order). Edge properties do not survive a fuse.
    pub fn fuse(a: &Frontier, b: &Frontier, dedup: bool) -> Frontier {
        let mut fused = Frontier::new();
        for (source, neighbors) in a.iter() {
            let mut composed: Vec<VertexId> = Vec::new();
            let mut seen: FxHashSet<VertexId> = FxHashSet::default();
            for t in &neighbors.targets {
                if let Some(through) = b.neighbors(*t) {
                    for u in &through.targets {
                        if dedup && !seen.insert(*u) {
                            continue;
                        }
                        composed.push(*u);
                    }
                }
            }
            if !composed.is_empty() {
                for u in composed {
                    fused.push(source, u, None);
                }
            }
        }
        fused
    }

    /// Union of two frontiers over the same edge semantics: target lists of
    /// shared sources are concatenated (`a`'s first), edge properties kept
    /// only when both sides carry them consistently.
    pub fn merge(a: &Frontier, b: &Frontier) -> Frontier {
        let mut merged = Frontier::new();
        for (source, neighbors) in a.iter() {
            for (t, props) in neighbors.iter_with_props() {
                merged.push(source, t, props.cloned());
            }
        }
        for (source, neighbors) in b.iter() {
            for (t, props) in neighbors.iter_with_props() {
                merged.push(source, t, props.cloned());
            }
        }
        merged
    }

    fn rebuild_targets(&mut self) {
        self.targets.clear();
        for neighbors in self.map.values() {
            for t in &neighbors.targets {
                self.targets.insert(*t);
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn p(n: u64) -> VertexId {
        VertexId::person(n)
    }

    fn frontier(edges: &[(u64, u64)]) -> Frontier {
        let mut f = Frontier::new();
        for (s, t) in edges {
            f.push(p(*s), p(*t), None);
        }
        f
    }

    #[test]
    fn test_push_tracks_distinct_targets() {
        let f = frontier(&[(1, 10), (1, 11), (2, 10)]);
        assert_eq!(f.len(), 2);
        assert_eq!(f.target_count(), 2);
        assert_eq!(f.target_ids(), vec![p(10), p(11)]);
    }

    #[test]
    fn test_subtract_removes_targets_and_empty_sources() {
        let mut f = frontier(&[(1, 10), (1, 11), (2, 10)]);
        let exclude: FxHashSet<VertexId> = [p(10)].into_iter().collect();
        f.subtract(&exclude);

        assert_eq!(f.neighbors(p(1)).map(|n| n.targets.clone()), Some(vec![p(11)]));
        assert!(f.neighbors(p(2)).is_none());
        assert!(!f.contains_target(p(10)));
    }

    #[test]
    fn test_subtract_is_idempotent() {
        let mut f = frontier(&[(1, 10), (1, 11), (2, 10), (3, 12)]);
        let exclude: FxHashSet<VertexId> = [p(10), p(12)].into_iter().collect();
        f.subtract(&exclude);
        let keys_once = f.keys();
        let targets_once = f.target_ids();
        f.subtract(&exclude);
        assert_eq!(f.keys(), keys_once);
        assert_eq!(f.target_ids(), targets_once);
    }

    #[test]
    fn test_retain_targets() {
        let mut f = frontier(&[(1, 10), (1, 11), (2, 11)]);
        let keep: FxHashSet<VertexId> = [p(11)].into_iter().collect();
        f.retain_targets(&keep);
        assert_eq!(f.keys(), vec![p(1), p(2)]);
        assert_eq!(f.target_ids(), vec![p(11)]);
    }

    #[test]
    fn test_retain_sources() {
        let mut f = frontier(&[(1, 10), (2, 11), (3, 12)]);
        let keep: FxHashSet<VertexId> = [p(2)].into_iter().collect();
        f.retain_sources(&keep);
        assert_eq!(f.keys(), vec![p(2)]);
        assert_eq!(f.target_ids(), vec![p(11)]);
    }

    #[test]
    fn test_fuse_composes_and_drops_empty_sources() {
        // a: 1 -> {10, 11}, 2 -> {12}
        let a = frontier(&[(1, 10), (1, 11), (2, 12)]);
        // b: 10 -> {20}, 11 -> {21}; 12 has no entry
        let b = frontier(&[(10, 20), (11, 21)]);
        let fused = Frontier::fuse(&a, &b, false);

        assert_eq!(fused.neighbors(p(1)).map(|n| n.targets.clone()), Some(vec![p(20), p(21)]));
        assert!(fused.neighbors(p(2)).is_none());

        // keys() after fuse == sources of a with at least one entry in b's
        // source-keyed lookup
        assert_eq!(fused.keys(), vec![p(1)]);
    }

    #[test]
    fn test_fuse_dedup_per_source() {
        // 1 reaches 20 through both 10 and 11
        let a = frontier(&[(1, 10), (1, 11)]);
        let b = frontier(&[(10, 20), (11, 20)]);

        let plain = Frontier::fuse(&a, &b, false);
        assert_eq!(plain.neighbors(p(1)).map(|n| n.targets.len()), Some(2));

        let deduped = Frontier::fuse(&a, &b, true);
        assert_eq!(deduped.neighbors(p(1)).map(|n| n.targets.clone()), Some(vec![p(20)]));
    }

    #[test]
    fn test_merge_concatenates_shared_sources() {
        let a = frontier(&[(1, 10)]);
        let b = frontier(&[(1, 11), (2, 12)]);
        let merged = Frontier::merge(&a, &b);
        assert_eq!(merged.neighbors(p(1)).map(|n| n.targets.clone()), Some(vec![p(10), p(11)]));
        assert_eq!(merged.keys(), vec![p(1), p(2)]);
    }

    #[test]
    fn test_insertion_order_preserved() {
        let f = frontier(&[(5, 50), (3, 30), (4, 40)]);
        assert_eq!(f.keys(), vec![p(5), p(3), p(4)]);
        assert_eq!(f.target_ids(), vec![p(50), p(30), p(40)]);
    }

    #[test]
    fn test_subtract_keeps_edge_props_parallel() {
        let mut f = Frontier::new();
        let mut props_a = PropertyMap::new();
        props_a.insert("creationDate".to_string(), crate::graph::PropertyValue::DateTime(1));
        let mut props_b = PropertyMap::new();
        props_b.insert("creationDate".to_string(), crate::graph::PropertyValue::DateTime(2));
        f.push(p(1), p(10), Some(props_a));
        f.push(p(1), p(11), Some(props_b));

        let exclude: FxHashSet<VertexId> = [p(10)].into_iter().collect();
        f.subtract(&exclude);

        let n = f.neighbors(p(1)).unwrap();
        assert_eq!(n.targets, vec![p(11)]);
        assert_eq!(n.edge_props.len(), 1);
        assert_eq!(crate::graph::property::edge_datetime(&n.edge_props[0], "creationDate"), Some(2));
    }
}
