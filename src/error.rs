//! Error taxonomy for query evaluation

use crate::config::ConfigError;
use crate::graph::VertexId;
use crate::store::StoreError;
use thiserror::Error;

/// Errors surfaced to operation callers.
#[derive(Debug, Error)]
pub enum QueryError {
    /// A transactional attempt lost an optimistic race. Callers inside the
    /// retry wrapper never see this; it escapes only from raw store use.
    #[error("transaction conflict")]
    Conflict,

    /// An operation referenced a vertex the store does not have. For update
    /// operations this is fatal and aborts without retrying.
    #[error("referenced vertex does not exist: {0}")]
    MissingVertex(VertexId),

    /// The retry ceiling was reached without a successful commit.
    #[error("transaction retry limit reached after {0} attempts")]
    RetriesExhausted(usize),

    /// A bounded walk failed to terminate within its depth limit,
    /// indicating a cycle or corrupt linkage in the stored graph.
    #[error("{operation}: traversal exceeded depth limit {limit}")]
    TraversalDepthExceeded { operation: &'static str, limit: usize },

    #[error("store error: {0}")]
    Store(StoreError),

    #[error(transparent)]
    Config(#[from] ConfigError),
}

impl From<StoreError> for QueryError {
    fn from(err: StoreError) -> Self {
        match err {
            StoreError::Conflict => QueryError::Conflict,
            StoreError::VertexNotFound(v) => QueryError::MissingVertex(v),
            other => QueryError::Store(other),
        }
    }
}

pub type QueryResult<T> = Result<T, QueryError>;
