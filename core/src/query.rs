//! Cached read queries.
//!
//! # Design
//! A query result is stored under a [`CacheKey`]: the resource, an optional
//! id and the full [`ListParams`]. The key is compared structurally, so two
//! reads with the same parameters always hit the same entry. An entry is
//! reused until it is invalidated or, when the query has a refetch
//! interval, until it is older than that interval.
//!
//! Entries are type-erased; a key is only ever filled by one fetch
//! function, so the downcast on read matches what was stored.

use std::any::Any;
use std::collections::HashMap;
use std::sync::Arc;
use std::time::{Duration, Instant};

use parking_lot::Mutex;

use crate::error::ApiError;
use crate::types::ListParams;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Resource {
    Users,
    User,
    Entities,
    Chat,
    Clarifications,
    StatisticsSummary,
    Settings,
    SystemErrors,
    Actuator,
}

#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub struct CacheKey {
    pub resource: Resource,
    pub id: Option<i64>,
    pub params: ListParams,
}

impl CacheKey {
    pub fn new(resource: Resource) -> Self {
        Self {
            resource,
            id: None,
            params: ListParams::default(),
        }
    }

    pub fn with_id(resource: Resource, id: i64) -> Self {
        Self {
            id: Some(id),
            ..Self::new(resource)
        }
    }

    pub fn with_params(resource: Resource, params: ListParams) -> Self {
        Self {
            params,
            ..Self::new(resource)
        }
    }
}

struct Entry {
    value: Arc<dyn Any + Send + Sync>,
    fetched_at: Instant,
}

#[derive(Default)]
pub struct QueryCache {
    entries: Mutex<HashMap<CacheKey, Entry>>,
}

impl QueryCache {
    pub fn new() -> Self {
        Self::default()
    }

    /// Return the cached value for `key`, or run `fetch` and cache its result.
    ///
    /// With `refetch_interval` set, an entry older than the interval is
    /// fetched again. Failed fetches are not cached and leave any previous
    /// entry untouched.
    pub fn fetch<V, F>(&self, key: &CacheKey, refetch_interval: Option<Duration>, fetch: F) -> Result<Arc<V>, ApiError>
    where
        V: Send + Sync + 'static,
        F: FnOnce() -> Result<V, ApiError>,
    {
        self.fetch_at(key, refetch_interval, Instant::now(), fetch)
    }

    pub(crate) fn fetch_at<V, F>(
        &self,
        key: &CacheKey,
        refetch_interval: Option<Duration>,
        now: Instant,
        fetch: F,
    ) -> Result<Arc<V>, ApiError>
    where
        V: Send + Sync + 'static,
        F: FnOnce() -> Result<V, ApiError>,
    {
        if let Some(hit) = self.fresh::<V>(key, refetch_interval, now) {
            tracing::debug!(?key, "query cache hit");
            return Ok(hit);
        }
        tracing::debug!(?key, "query cache miss");
        // The lock is not held across the fetch.
        let value = Arc::new(fetch()?);
        self.entries.lock().insert(
            key.clone(),
            Entry {
                value: value.clone(),
                fetched_at: now,
            },
        );
        Ok(value)
    }

    fn fresh<V: Send + Sync + 'static>(
        &self,
        key: &CacheKey,
        refetch_interval: Option<Duration>,
        now: Instant,
    ) -> Option<Arc<V>> {
        let entries = self.entries.lock();
        let entry = entries.get(key)?;
        if let Some(interval) = refetch_interval {
            if now.saturating_duration_since(entry.fetched_at) >= interval {
                return None;
            }
        }
        entry.value.clone().downcast::<V>().ok()
    }

    /// Cached value without fetching, regardless of age.
    pub fn peek<V: Send + Sync + 'static>(&self, key: &CacheKey) -> Option<Arc<V>> {
        self.fresh(key, None, Instant::now())
    }

    pub fn contains(&self, key: &CacheKey) -> bool {
        self.entries.lock().contains_key(key)
    }

    pub fn invalidate(&self, key: &CacheKey) -> bool {
        self.entries.lock().remove(key).is_some()
    }

    /// Drop every entry of `resource`, whatever its id or parameters.
    pub fn invalidate_resource(&self, resource: Resource) -> usize {
        let mut entries = self.entries.lock();
        let before = entries.len();
        entries.retain(|key, _| key.resource != resource);
        before - entries.len()
    }

    pub fn clear(&self) {
        self.entries.lock().clear();
    }

    pub fn len(&self) -> usize {
        self.entries.lock().len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.lock().is_empty()
    }
}
