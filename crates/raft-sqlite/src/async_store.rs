//! Async adapter for hosts running on tokio.
//!
//! Every store call blocks on SQLite, so [`AsyncStore`] runs it on
//! `spawn_blocking` instead of the runtime's worker threads. The adapter adds
//! no locking of its own; ordering between concurrent calls is whatever the
//! wrapped store provides.

use std::sync::Arc;

use async_trait::async_trait;
use raft_sqlite_core::LogEntry;
use raft_sqlite_store::{LogStore, Result, StableStore, StoreError};

/// Async view of [`LogStore`].
#[async_trait]
pub trait AsyncLogStore: Send + Sync {
    async fn first_index(&self) -> Result<u64>;

    async fn last_index(&self) -> Result<u64>;

    async fn get_log(&self, index: u64) -> Result<LogEntry>;

    async fn store_logs(&self, entries: Vec<LogEntry>) -> Result<()>;

    async fn delete_range(&self, min: u64, max: u64) -> Result<()>;
}

/// Async view of [`StableStore`].
#[async_trait]
pub trait AsyncStableStore: Send + Sync {
    async fn set(&self, key: Vec<u8>, value: Vec<u8>) -> Result<()>;

    async fn get(&self, key: Vec<u8>) -> Result<Vec<u8>>;

    async fn set_u64(&self, key: Vec<u8>, value: u64) -> Result<()>;

    async fn get_u64(&self, key: Vec<u8>) -> Result<u64>;
}

/// Wraps a blocking store for use from async code.
#[derive(Debug)]
pub struct AsyncStore<S> {
    inner: Arc<S>,
}

impl<S> Clone for AsyncStore<S> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
        }
    }
}

impl<S: Send + Sync + 'static> AsyncStore<S> {
    /// Wrap a store.
    pub fn new(store: S) -> Self {
        Self::from_arc(Arc::new(store))
    }

    /// Wrap a store that is already shared.
    pub fn from_arc(store: Arc<S>) -> Self {
        Self { inner: store }
    }

    /// The wrapped store, for synchronous calls such as `close`.
    pub fn inner(&self) -> &Arc<S> {
        &self.inner
    }

    /// Run a blocking store call on tokio's blocking pool.
    async fn run<T, F>(&self, f: F) -> Result<T>
    where
        F: FnOnce(&S) -> Result<T> + Send + 'static,
        T: Send + 'static,
    {
        let store = Arc::clone(&self.inner);
        tokio::task::spawn_blocking(move || f(&store))
            .await
            .map_err(|e| {
                tracing::warn!(error = %e, "blocking store task failed");
                StoreError::Io(std::io::Error::new(
                    std::io::ErrorKind::Other,
                    format!("spawn_blocking failed: {}", e),
                ))
            })?
    }
}

#[async_trait]
impl<S: LogStore + 'static> AsyncLogStore for AsyncStore<S> {
    async fn first_index(&self) -> Result<u64> {
        self.run(|store| store.first_index()).await
    }

    async fn last_index(&self) -> Result<u64> {
        self.run(|store| store.last_index()).await
    }

    async fn get_log(&self, index: u64) -> Result<LogEntry> {
        self.run(move |store| store.get_log(index)).await
    }

    async fn store_logs(&self, entries: Vec<LogEntry>) -> Result<()> {
        self.run(move |store| store.store_logs(&entries)).await
    }

    async fn delete_range(&self, min: u64, max: u64) -> Result<()> {
        self.run(move |store| store.delete_range(min, max)).await
    }
}

#[async_trait]
impl<S: StableStore + 'static> AsyncStableStore for AsyncStore<S> {
    async fn set(&self, key: Vec<u8>, value: Vec<u8>) -> Result<()> {
        self.run(move |store| store.set(&key, &value)).await
    }

    async fn get(&self, key: Vec<u8>) -> Result<Vec<u8>> {
        self.run(move |store| store.get(&key)).await
    }

    async fn set_u64(&self, key: Vec<u8>, value: u64) -> Result<()> {
        self.run(move |store| store.set_u64(&key, value)).await
    }

    async fn get_u64(&self, key: Vec<u8>) -> Result<u64> {
        self.run(move |store| store.get_u64(&key)).await
    }
}
