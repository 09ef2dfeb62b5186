//! Kindred: batched query evaluation for interactive social-network
//! workloads over a remote sharded graph store
//!
//! The store shards vertices and edges across machines and is reached
//! through the batched [`store::GraphStore`] interface; every multi-hop
//! query here is planned as a fixed number of whole-frontier round trips
//! plus local set algebra on [`graph::Frontier`] values.
//!
//! The public surface is [`KindredDb`]: one typed entry point per
//! workload operation (fourteen complex reads, seven short reads, eight
//! updates), each running under the optimistic-transaction discipline in
//! [`txn`] as selected by [`config::RuntimeConfig`].
//!
//! ```
//! use kindred::queries::short::S1Params;
//! use kindred::{KindredDb, MemoryStore, RuntimeConfig};
//!
//! let store = MemoryStore::new();
//! let db = KindredDb::new(store, RuntimeConfig::default());
//! assert!(db.s1(&S1Params { person_id: 1 }).is_err()); // empty store
//! ```

pub mod config;
pub mod db;
pub mod error;
pub mod graph;
pub mod queries;
pub mod store;
pub mod txn;

pub use config::{Fixtures, ReadMode, RuntimeConfig};
pub use db::KindredDb;
pub use error::{QueryError, QueryResult};
pub use graph::{
    Direction, EntityKind, Frontier, PropertyCache, PropertyMap, PropertyValue, VertexId,
};
pub use store::{GraphStore, MemoryStore, StoreError, StoreResult};
pub use txn::{TxnRunner, MAX_TX_ATTEMPTS};
