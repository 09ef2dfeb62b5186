//! Graph data model: identifiers, property values, and hop frontiers

pub mod frontier;
pub mod property;
pub mod types;

pub use frontier::{Frontier, Neighbors};
pub use property::{PropertyCache, PropertyMap, PropertyValue};
pub use types::{Direction, EntityKind, VertexId};
