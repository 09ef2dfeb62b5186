//! Optimistic transaction retry wrapper
//!
//! Every operation body runs through here. Updates always use the full
//! commit-and-retry loop; reads pay for whichever [`ReadMode`] the
//! deployment selected. Bodies must be restartable: they are re-executed
//! from scratch after a conflict, with any staged writes rolled back first.

use crate::config::ReadMode;
use crate::error::{QueryError, QueryResult};
use crate::store::GraphStore;
use tracing::{debug, warn};

/// Attempt ceiling for the commit-and-retry loop.
pub const MAX_TX_ATTEMPTS: usize = 100;

/// Runs operation bodies under the configured transaction discipline.
pub struct TxnRunner<'a> {
    store: &'a dyn GraphStore,
    read_mode: ReadMode,
}

impl<'a> TxnRunner<'a> {
    pub fn new(store: &'a dyn GraphStore, read_mode: ReadMode) -> Self {
        TxnRunner { store, read_mode }
    }

    /// Execute a read-only operation body under the configured read mode.
    pub fn read<T>(
        &self,
        operation: &'static str,
        mut body: impl FnMut(&dyn GraphStore) -> QueryResult<T>,
    ) -> QueryResult<T> {
        match self.read_mode {
            ReadMode::BestEffort => {
                self.store.set_tx_enabled(false);
                let result = body(self.store);
                self.store.set_tx_enabled(true);
                result
            }
            ReadMode::StoreTransactional => {
                let result = body(self.store);
                // Snapshot only; reads never publish anything.
                self.store.rollback();
                result
            }
            ReadMode::Transactional => self.commit_loop(operation, &mut body),
        }
    }

    /// Execute an update operation body. Always transactional: commit, and
    /// retry from scratch on conflict. [`QueryError::MissingVertex`] aborts
    /// immediately; a dangling reference will not heal on retry.
    pub fn write<T>(
        &self,
        operation: &'static str,
        mut body: impl FnMut(&dyn GraphStore) -> QueryResult<T>,
    ) -> QueryResult<T> {
        self.commit_loop(operation, &mut body)
    }

    fn commit_loop<T>(
        &self,
        operation: &'static str,
        body: &mut impl FnMut(&dyn GraphStore) -> QueryResult<T>,
    ) -> QueryResult<T> {
        for attempt in 1..=MAX_TX_ATTEMPTS {
            match body(self.store) {
                Ok(value) => match self.store.commit() {
                    Ok(()) => return Ok(value),
                    Err(err) => {
                        self.store.rollback();
                        let err = QueryError::from(err);
                        if matches!(err, QueryError::Conflict) {
                            debug!(operation, attempt, "commit conflict, retrying");
                            continue;
                        }
                        return Err(err);
                    }
                },
                Err(QueryError::Conflict) => {
                    self.store.rollback();
                    debug!(operation, attempt, "read conflict, retrying");
                }
                Err(err) => {
                    self.store.rollback();
                    return Err(err);
                }
            }
        }
        warn!(operation, attempts = MAX_TX_ATTEMPTS, "transaction retry limit reached");
        Err(QueryError::RetriesExhausted(MAX_TX_ATTEMPTS))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::graph::{PropertyMap, VertexId};
    use crate::store::MemoryStore;

    #[test]
    fn test_best_effort_toggles_transactional_reads() {
        let store = MemoryStore::new();
        let runner = TxnRunner::new(&store, ReadMode::BestEffort);
        assert!(store.tx_enabled());
        runner
            .read("probe", |_| {
                assert!(!store.tx_enabled());
                Ok(())
            })
            .unwrap();
        assert!(store.tx_enabled());
    }

    #[test]
    fn test_best_effort_reenables_after_error() {
        let store = MemoryStore::new();
        let runner = TxnRunner::new(&store, ReadMode::BestEffort);
        let result: QueryResult<()> = runner.read("probe", |_| {
            Err(QueryError::MissingVertex(VertexId::person(1)))
        });
        assert!(result.is_err());
        assert!(store.tx_enabled());
    }

    #[test]
    fn test_store_transactional_rolls_back() {
        let store = MemoryStore::new();
        let runner = TxnRunner::new(&store, ReadMode::StoreTransactional);
        runner
            .read("probe", |s| {
                s.create_vertex(VertexId::person(1), PropertyMap::new())?;
                Ok(())
            })
            .unwrap();
        assert_eq!(store.staged_write_count(), 0);
        assert!(!store.contains_vertex(VertexId::person(1)).unwrap());
    }

    #[test]
    fn test_transactional_read_retries_conflicts() {
        let store = MemoryStore::new();
        store.fail_next_commits(2);
        let runner = TxnRunner::new(&store, ReadMode::Transactional);
        let mut attempts = 0;
        runner
            .read("probe", |_| {
                attempts += 1;
                Ok(())
            })
            .unwrap();
        assert_eq!(attempts, 3);
    }

    #[test]
    fn test_write_retries_until_commit_succeeds() {
        let store = MemoryStore::new();
        store.fail_next_commits(1);
        let runner = TxnRunner::new(&store, ReadMode::BestEffort);
        let v = VertexId::person(5);
        runner
            .write("insert", |s| {
                s.create_vertex(v, PropertyMap::new())?;
                Ok(())
            })
            .unwrap();
        assert!(store.contains_vertex(v).unwrap());
        assert_eq!(store.staged_write_count(), 0);
    }

    #[test]
    fn test_write_exhausts_retry_ceiling() {
        let store = MemoryStore::new();
        store.fail_next_commits(MAX_TX_ATTEMPTS);
        let runner = TxnRunner::new(&store, ReadMode::BestEffort);
        let result = runner.write("insert", |s| {
            s.create_vertex(VertexId::person(5), PropertyMap::new())?;
            Ok(())
        });
        assert!(matches!(result, Err(QueryError::RetriesExhausted(n)) if n == MAX_TX_ATTEMPTS));
    }

    #[test]
    fn test_write_missing_vertex_is_fatal() {
        let store = MemoryStore::new();
        let runner = TxnRunner::new(&store, ReadMode::BestEffort);
        let mut attempts = 0;
        let result: QueryResult<()> = runner.write("insert", |_| {
            attempts += 1;
            Err(QueryError::MissingVertex(VertexId::person(404)))
        });
        assert!(matches!(result, Err(QueryError::MissingVertex(_))));
        assert_eq!(attempts, 1);
    }
}
