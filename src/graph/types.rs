//! Core identifier types for the social graph

use serde::{Deserialize, Serialize};
use std::fmt;

/// Entity classes of the social-network schema.
///
/// The remote store shards vertices by id; the kind tag occupies the upper
/// half of the 128-bit composite identifier so that local ids may repeat
/// across kinds without colliding.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub enum EntityKind {
    Person,
    Post,
    Comment,
    Forum,
    Place,
    Organisation,
    Tag,
    TagClass,
}

impl EntityKind {
    /// Vertex label string as stored in the remote store.
    pub fn label(&self) -> &'static str {
        match self {
            EntityKind::Person => "Person",
            EntityKind::Post => "Post",
            EntityKind::Comment => "Comment",
            EntityKind::Forum => "Forum",
            EntityKind::Place => "Place",
            EntityKind::Organisation => "Organisation",
            EntityKind::Tag => "Tag",
            EntityKind::TagClass => "TagClass",
        }
    }
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.label())
    }
}

/// 128-bit composite vertex identifier: entity kind tag plus local id.
///
/// Uniqueness is per `(kind, local)` pair. Ordering is derived, so sorting
/// a mixed list groups by kind first; query tie-breaks that compare raw
/// benchmark identifiers use [`VertexId::local`] directly.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct VertexId {
    pub kind: EntityKind,
    pub local: u64,
}

impl VertexId {
    pub fn new(kind: EntityKind, local: u64) -> Self {
        VertexId { kind, local }
    }

    pub fn person(local: u64) -> Self {
        VertexId::new(EntityKind::Person, local)
    }

    pub fn post(local: u64) -> Self {
        VertexId::new(EntityKind::Post, local)
    }

    pub fn comment(local: u64) -> Self {
        VertexId::new(EntityKind::Comment, local)
    }

    pub fn forum(local: u64) -> Self {
        VertexId::new(EntityKind::Forum, local)
    }

    pub fn place(local: u64) -> Self {
        VertexId::new(EntityKind::Place, local)
    }

    pub fn organisation(local: u64) -> Self {
        VertexId::new(EntityKind::Organisation, local)
    }

    pub fn tag(local: u64) -> Self {
        VertexId::new(EntityKind::Tag, local)
    }

    pub fn tag_class(local: u64) -> Self {
        VertexId::new(EntityKind::TagClass, local)
    }
}

impl fmt::Display for VertexId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}:{}", self.kind, self.local)
    }
}

/// Direction of a hop expansion relative to the source vertices.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Direction {
    Out,
    In,
}

impl Direction {
    pub fn reverse(self) -> Self {
        match self {
            Direction::Out => Direction::In,
            Direction::In => Direction::Out,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_vertex_id_identity() {
        let a = VertexId::person(42);
        let b = VertexId::new(EntityKind::Person, 42);
        assert_eq!(a, b);
        // Same local id under a different kind is a distinct vertex.
        let c = VertexId::post(42);
        assert_ne!(a, c);
    }

    #[test]
    fn test_vertex_id_display() {
        assert_eq!(format!("{}", VertexId::forum(7)), "Forum:7");
        assert_eq!(format!("{}", VertexId::tag_class(1)), "TagClass:1");
    }

    #[test]
    fn test_vertex_id_ordering() {
        let mut ids = vec![VertexId::person(2), VertexId::person(1)];
        ids.sort();
        assert_eq!(ids, vec![VertexId::person(1), VertexId::person(2)]);
    }

    #[test]
    fn test_direction_reverse() {
        assert_eq!(Direction::Out.reverse(), Direction::In);
        assert_eq!(Direction::In.reverse(), Direction::Out);
    }
}
