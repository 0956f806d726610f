//! Query cache - keyed response cache with a staleness window
//!
//! Every read the console makes goes through [`QueryCache::get_or_fetch`].
//! A fresh entry is returned as-is; a missing or stale one triggers the
//! fetcher and its result is stored. Errors from the fetcher are passed
//! through untouched and never stored.
//!
//! Mutations do not update entries in place. They call
//! [`QueryCache::invalidate_for`] with the [`Mutation`] that happened, which
//! drops every resource that mutation can affect so the next read goes back
//! to the server.

use serde::de::DeserializeOwned;
use serde::Serialize;
use std::collections::HashMap;
use std::fmt;
use std::future::Future;
use std::sync::{Arc, Mutex, PoisonError};
use std::time::Duration;
use thiserror::Error;
use tokio::time::Instant;


/// Default staleness window
pub const DEFAULT_TTL: Duration = Duration::from_secs(300);

/// Resource names used as the first segment of a [`QueryKey`]
pub mod resource {
    pub const BUYERS: &str = "buyers";
    pub const BUYERS_ACTIVE: &str = "buyers-active";
    pub const BUYER: &str = "buyer";
    pub const INVENTORY: &str = "inventory";
    pub const INVENTORY_ALL: &str = "inventory-all";
    pub const SINGLE_INVENTORY: &str = "single-inventory";
    pub const SAMPLE_REQUESTS: &str = "sample-requests";
    pub const SINGLE_REQUEST: &str = "single-request";
    pub const DASHBOARD_STATS: &str = "dashboard-stats";
}

#[derive(Debug, Error)]
pub enum CacheError {
    #[error("Cache serialization error: {0}")]
    Serialization(#[from] serde_json::Error),
}

/// Cache key: a resource name plus ordered parameter segments
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct QueryKey {
    resource: String,
    params: Vec<String>,
}

impl QueryKey {
    pub fn new(resource: impl Into<String>) -> Self {
        Self {
            resource: resource.into(),
            params: Vec::new(),
        }
    }

    /// Append a parameter segment (page number, id, filter value)
    pub fn with(mut self, param: impl ToString) -> Self {
        self.params.push(param.to_string());
        self
    }

    pub fn resource(&self) -> &str {
        &self.resource
    }

    pub fn params(&self) -> &[String] {
        &self.params
    }
}

impl fmt::Display for QueryKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.resource)?;
        for param in &self.params {
            write!(f, "/{}", param)?;
        }
        Ok(())
    }
}

/// A successful write that makes cached reads stale
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Mutation {
    /// Buyer create, update or delete
    Buyer,
    /// Inventory create, update or delete
    Inventory,
    /// Sample request create, update, delete or item status change
    SampleRequest,
}

impl Mutation {
    /// Resources whose cached entries this mutation invalidates
    pub fn invalidates(&self) -> &'static [&'static str] {
        match self {
            Mutation::Buyer => &[resource::BUYERS, resource::BUYERS_ACTIVE, resource::BUYER],
            Mutation::Inventory => &[
                resource::INVENTORY,
                resource::INVENTORY_ALL,
                resource::SINGLE_INVENTORY,
            ],
            Mutation::SampleRequest => &[
                resource::SAMPLE_REQUESTS,
                resource::SINGLE_REQUEST,
                resource::DASHBOARD_STATS,
            ],
        }
    }
}

#[derive(Debug, Clone)]
struct CacheEntry {
    value: serde_json::Value,
    fetched_at: Instant,
}

impl CacheEntry {
    fn new(value: serde_json::Value) -> Self {
        Self {
            value,
            fetched_at: Instant::now(),
        }
    }

    fn is_fresh(&self, ttl: Duration) -> bool {
        self.fetched_at.elapsed() < ttl
    }
}

#[derive(Debug, Default)]
struct Store {
    entries: HashMap<QueryKey, CacheEntry>,
    /// Bumped per resource on every invalidation
    generations: HashMap<String, u64>,
    /// Bumped by `clear`
    epoch: u64,
}

impl Store {
    fn stamp(&self, resource: &str) -> (u64, u64) {
        (
            self.epoch,
            self.generations.get(resource).copied().unwrap_or_default(),
        )
    }

    fn bump(&mut self, resource: &str) {
        *self.generations.entry(resource.to_string()).or_default() += 1;
    }
}

/// Shared response cache
///
/// Cloning shares the underlying store. A fetch that started before an
/// invalidation of its resource does not store its result.
#[derive(Debug, Clone)]
pub struct QueryCache {
    store: Arc<Mutex<Store>>,
    ttl: Duration,
}

impl Default for QueryCache {
    fn default() -> Self {
        Self::new(DEFAULT_TTL)
    }
}

impl QueryCache {
    pub fn new(ttl: Duration) -> Self {
        Self {
            store: Arc::new(Mutex::new(Store::default())),
            ttl,
        }
    }

    pub fn ttl(&self) -> Duration {
        self.ttl
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, Store> {
        self.store.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Fresh cached value for `key`, if any
    ///
    /// Stale entries are evicted on the way out.
    pub fn get<T: DeserializeOwned>(&self, key: &QueryKey) -> Result<Option<T>, CacheError> {
        let mut store = self.lock();
        match store.entries.get(key) {
            Some(entry) if entry.is_fresh(self.ttl) => {
                let value = serde_json::from_value(entry.value.clone())?;
                Ok(Some(value))
            }
            Some(_) => {
                store.entries.remove(key);
                Ok(None)
            }
            None => Ok(None),
        }
    }

    pub fn put<T: Serialize>(&self, key: QueryKey, value: &T) -> Result<(), CacheError> {
        let value = serde_json::to_value(value)?;
        self.lock().entries.insert(key, CacheEntry::new(value));
        Ok(())
    }

    /// Return the cached value or run `fetch` and cache its result
    ///
    /// An entry that no longer decodes as `T` is dropped and refetched.
    pub async fn get_or_fetch<T, E, F, Fut>(&self, key: QueryKey, fetch: F) -> Result<T, E>
    where
        T: Serialize + DeserializeOwned,
        E: From<CacheError>,
        F: FnOnce() -> Fut,
        Fut: Future<Output = Result<T, E>>,
    {
        match self.get::<T>(&key) {
            Ok(Some(hit)) => {
                tracing::debug!(key = %key, "cache hit");
                return Ok(hit);
            }
            Ok(None) => tracing::debug!(key = %key, "cache miss"),
            Err(e) => {
                tracing::warn!(key = %key, error = %e, "dropping undecodable cache entry");
                self.invalidate_key(&key);
            }
        }

        let stamp = self.lock().stamp(&key.resource);
        let value = fetch().await?;
        let encoded = serde_json::to_value(&value).map_err(CacheError::from)?;

        let mut store = self.lock();
        if store.stamp(&key.resource) == stamp {
            store.entries.insert(key, CacheEntry::new(encoded));
        } else {
            tracing::debug!(key = %key, "invalidated during fetch; not stored");
        }
        Ok(value)
    }

    /// Drop every entry belonging to `resource`
    pub fn invalidate(&self, resource: &str) -> usize {
        let mut store = self.lock();
        store.bump(resource);
        let before = store.entries.len();
        store.entries.retain(|key, _| key.resource != resource);
        let removed = before - store.entries.len();
        tracing::debug!(resource, removed, "cache invalidate");
        removed
    }

    /// Drop every resource affected by `mutation`
    pub fn invalidate_for(&self, mutation: Mutation) -> usize {
        mutation
            .invalidates()
            .iter()
            .map(|resource| self.invalidate(resource))
            .sum()
    }

    /// Drop one exact key
    ///
    /// In-flight fetches of the same resource are not stored either.
    pub fn invalidate_key(&self, key: &QueryKey) -> bool {
        let mut store = self.lock();
        store.bump(&key.resource);
        store.entries.remove(key).is_some()
    }

    pub fn clear(&self) {
        let mut store = self.lock();
        store.epoch += 1;
        store.entries.clear();
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.lock().entries.len()
    }

    #[cfg(test)]
    pub(crate) fn is_empty(&self) -> bool {
        self.lock().entries.is_empty()
    }

    #[cfg(test)]
    pub(crate) fn contains(&self, key: &QueryKey) -> bool {
        self.lock().entries.contains_key(key)
    }
}
