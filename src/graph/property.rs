//! Property value types for vertices and edges
//!
//! Vertices are fetched as bare references first and hydrated with their
//! property maps on demand; hydrated maps accumulate in a [`PropertyCache`]
//! owned by the running query rather than being written back into shared
//! vertex objects.

use super::types::VertexId;
use rustc_hash::FxHashMap;
use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::fmt;

/// Typed property value.
///
/// Dates are epoch-millisecond integers end to end; `List` covers the
/// multi-valued properties of the schema (`email`, `language`).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum PropertyValue {
    String(String),
    Integer(i64),
    Float(f64),
    Boolean(bool),
    /// Unix timestamp in milliseconds
    DateTime(i64),
    List(Vec<String>),
    Null,
}

impl PropertyValue {
    pub fn is_null(&self) -> bool {
        matches!(self, PropertyValue::Null)
    }

    /// Get string value if this is a string
    pub fn as_str(&self) -> Option<&str> {
        match self {
            PropertyValue::String(s) => Some(s),
            _ => None,
        }
    }

    /// Get integer value if this is an integer
    pub fn as_integer(&self) -> Option<i64> {
        match self {
            PropertyValue::Integer(i) => Some(*i),
            _ => None,
        }
    }

    /// Get float value if this is a float
    pub fn as_float(&self) -> Option<f64> {
        match self {
            PropertyValue::Float(f) => Some(*f),
            _ => None,
        }
    }

    /// Get boolean value if this is a boolean
    pub fn as_boolean(&self) -> Option<bool> {
        match self {
            PropertyValue::Boolean(b) => Some(*b),
            _ => None,
        }
    }

    /// Get timestamp value if this is a datetime
    pub fn as_datetime(&self) -> Option<i64> {
        match self {
            PropertyValue::DateTime(dt) => Some(*dt),
            _ => None,
        }
    }

    /// Get string list if this is a list
    pub fn as_list(&self) -> Option<&[String]> {
        match self {
            PropertyValue::List(items) => Some(items),
            _ => None,
        }
    }

    pub fn type_name(&self) -> &'static str {
        match self {
            PropertyValue::String(_) => "String",
            PropertyValue::Integer(_) => "Integer",
            PropertyValue::Float(_) => "Float",
            PropertyValue::Boolean(_) => "Boolean",
            PropertyValue::DateTime(_) => "DateTime",
            PropertyValue::List(_) => "List",
            PropertyValue::Null => "Null",
        }
    }
}

impl fmt::Display for PropertyValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            PropertyValue::String(s) => write!(f, "\"{}\"", s),
            PropertyValue::Integer(i) => write!(f, "{}", i),
            PropertyValue::Float(fl) => write!(f, "{}", fl),
            PropertyValue::Boolean(b) => write!(f, "{}", b),
            PropertyValue::DateTime(dt) => write!(f, "DateTime({})", dt),
            PropertyValue::List(items) => {
                write!(f, "[")?;
                for (i, val) in items.iter().enumerate() {
                    if i > 0 {
                        write!(f, ", ")?;
                    }
                    write!(f, "\"{}\"", val)?;
                }
                write!(f, "]")
            }
            PropertyValue::Null => write!(f, "null"),
        }
    }
}

// Convenience conversions
impl From<String> for PropertyValue {
    fn from(s: String) -> Self {
        PropertyValue::String(s)
    }
}

impl From<&str> for PropertyValue {
    fn from(s: &str) -> Self {
        PropertyValue::String(s.to_string())
    }
}

impl From<i64> for PropertyValue {
    fn from(i: i64) -> Self {
        PropertyValue::Integer(i)
    }
}

impl From<i32> for PropertyValue {
    fn from(i: i32) -> Self {
        PropertyValue::Integer(i as i64)
    }
}

impl From<f64> for PropertyValue {
    fn from(f: f64) -> Self {
        PropertyValue::Float(f)
    }
}

impl From<bool> for PropertyValue {
    fn from(b: bool) -> Self {
        PropertyValue::Boolean(b)
    }
}

impl From<Vec<String>> for PropertyValue {
    fn from(items: Vec<String>) -> Self {
        PropertyValue::List(items)
    }
}

/// Property map for storing vertex and edge properties
pub type PropertyMap = HashMap<String, PropertyValue>;

/// Accumulates hydrated vertex properties across batched fetches.
///
/// One cache is owned by each query evaluation; the store only fetches ids
/// not already present, so repeated hydration of overlapping frontiers
/// stays cheap.
#[derive(Debug, Default)]
pub struct PropertyCache {
    map: FxHashMap<VertexId, PropertyMap>,
}

impl PropertyCache {
    pub fn new() -> Self {
        PropertyCache::default()
    }

    pub fn contains(&self, id: VertexId) -> bool {
        self.map.contains_key(&id)
    }

    pub fn insert(&mut self, id: VertexId, props: PropertyMap) {
        self.map.insert(id, props);
    }

    pub fn get(&self, id: VertexId) -> Option<&PropertyMap> {
        self.map.get(&id)
    }

    /// String property of a hydrated vertex.
    pub fn string(&self, id: VertexId, key: &str) -> Option<&str> {
        self.map.get(&id).and_then(|p| p.get(key)).and_then(PropertyValue::as_str)
    }

    /// Integer property of a hydrated vertex.
    pub fn integer(&self, id: VertexId, key: &str) -> Option<i64> {
        self.map.get(&id).and_then(|p| p.get(key)).and_then(PropertyValue::as_integer)
    }

    /// Epoch-millisecond date property of a hydrated vertex.
    pub fn datetime(&self, id: VertexId, key: &str) -> Option<i64> {
        self.map.get(&id).and_then(|p| p.get(key)).and_then(PropertyValue::as_datetime)
    }

    /// Multi-valued string property of a hydrated vertex.
    pub fn list(&self, id: VertexId, key: &str) -> Option<&[String]> {
        self.map.get(&id).and_then(|p| p.get(key)).and_then(PropertyValue::as_list)
    }

    pub fn len(&self) -> usize {
        self.map.len()
    }

    pub fn is_empty(&self) -> bool {
        self.map.is_empty()
    }
}

/// Per-edge property lookup helpers shared by evaluators.
pub fn edge_datetime(props: &PropertyMap, key: &str) -> Option<i64> {
    props.get(key).and_then(PropertyValue::as_datetime)
}

pub fn edge_integer(props: &PropertyMap, key: &str) -> Option<i64> {
    props.get(key).and_then(PropertyValue::as_integer)
}
