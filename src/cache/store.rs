//! In-memory cache store with explicit invalidation.

use serde::{de::DeserializeOwned, Serialize};
use serde_json::Value;
use std::collections::HashMap;
use std::future::Future;
use std::sync::{Arc, Mutex, MutexGuard};
use tracing::debug;

use super::key::QueryKey;

struct Entry {
  data: Value,
  kind: &'static str,
  stale: bool,
}

/// Process-wide cache shared by every consumer of the API.
///
/// Values are stored as serialized JSON so one store can hold entries of
/// different types; the typed key decides what comes back out.
#[derive(Clone, Default)]
pub struct QueryCache {
  entries: Arc<Mutex<HashMap<String, Entry>>>,
}

impl QueryCache {
  pub fn new() -> Self {
    Self::default()
  }

  /// Fetch through the cache.
  ///
  /// A fresh entry is returned as-is. A stale or missing entry goes to the
  /// fetcher, and the result replaces whatever was stored under the key.
  /// Fetcher errors are propagated and leave the cache untouched.
  pub async fn get<K, T, F, Fut, E>(&self, key: &K, fetcher: F) -> Result<T, E>
  where
    K: QueryKey,
    T: Serialize + DeserializeOwned,
    F: FnOnce() -> Fut,
    Fut: Future<Output = Result<T, E>>,
  {
    let hash = key.cache_hash();

    if let Some(cached) = self.lookup(&hash) {
      debug!(query = %key.description(), "cache hit");
      return Ok(cached);
    }

    debug!(query = %key.description(), "cache miss, fetching");
    let data = fetcher().await?;
    self.store(hash, key.kind(), &data);
    Ok(data)
  }

  /// Mark a single entry stale so the next read re-fetches it.
  pub fn invalidate<K: QueryKey>(&self, key: &K) {
    let hash = key.cache_hash();
    let mut entries = self.lock();
    if let Some(entry) = entries.get_mut(&hash) {
      entry.stale = true;
      debug!(query = %key.description(), "invalidated");
    }
  }

  /// Mark every entry of the given kind stale, regardless of parameters.
  pub fn invalidate_kind(&self, kind: &'static str) {
    let mut entries = self.lock();
    let mut count = 0usize;
    for entry in entries.values_mut() {
      if entry.kind == kind && !entry.stale {
        entry.stale = true;
        count += 1;
      }
    }
    if count > 0 {
      debug!(kind, count, "invalidated kind");
    }
  }

  fn lookup<T: DeserializeOwned>(&self, hash: &str) -> Option<T> {
    let entries = self.lock();
    let entry = entries.get(hash)?;
    if entry.stale {
      return None;
    }
    serde_json::from_value(entry.data.clone()).ok()
  }

  fn store<T: Serialize>(&self, hash: String, kind: &'static str, data: &T) {
    // A value that cannot be serialized simply isn't cached
    let Ok(data) = serde_json::to_value(data) else {
      return;
    };
    self.lock().insert(
      hash,
      Entry {
        data,
        kind,
        stale: false,
      },
    );
  }

  fn lock(&self) -> MutexGuard<'_, HashMap<String, Entry>> {
    match self.entries.lock() {
      Ok(guard) => guard,
      // A poisoned lock only means a panic mid-insert; the map itself
      // is still usable
      Err(poisoned) => poisoned.into_inner(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::sync::atomic::{AtomicU32, Ordering};

  #[derive(Clone, Debug)]
  enum TestKey {
    List(u32),
    Item(i64),
  }

  impl QueryKey for TestKey {
    fn kind(&self) -> &'static str {
      match self {
        TestKey::List(_) => "list",
        TestKey::Item(_) => "item",
      }
    }

    fn cache_hash(&self) -> String {
      match self {
        TestKey::List(page) => format!("list:{}", page),
        TestKey::Item(id) => format!("item:{}", id),
      }
    }

    fn description(&self) -> String {
      self.cache_hash()
    }
  }

  async fn counted_fetch(counter: &AtomicU32, value: Vec<i64>) -> Result<Vec<i64>, String> {
    counter.fetch_add(1, Ordering::SeqCst);
    Ok(value)
  }

  #[tokio::test]
  async fn test_second_read_is_served_from_cache() {
    let cache = QueryCache::new();
    let counter = AtomicU32::new(0);
    let key = TestKey::List(1);

    let first = cache
      .get(&key, || counted_fetch(&counter, vec![1, 2]))
      .await
      .unwrap();
    let second = cache
      .get(&key, || counted_fetch(&counter, vec![3, 4]))
      .await
      .unwrap();

    assert_eq!(first, vec![1, 2]);
    assert_eq!(second, vec![1, 2]);
    assert_eq!(counter.load(Ordering::SeqCst), 1);
  }

  #[tokio::test]
  async fn test_invalidate_forces_refetch() {
    let cache = QueryCache::new();
    let counter = AtomicU32::new(0);
    let key = TestKey::Item(7);

    cache
      .get(&key, || counted_fetch(&counter, vec![7]))
      .await
      .unwrap();
    cache.invalidate(&key);

    let refetched = cache
      .get(&key, || counted_fetch(&counter, vec![8]))
      .await
      .unwrap();

    assert_eq!(refetched, vec![8]);
    assert_eq!(counter.load(Ordering::SeqCst), 2);
  }

  #[tokio::test]
  async fn test_invalidate_kind_hits_every_parameterization() {
    let cache = QueryCache::new();
    let counter = AtomicU32::new(0);

    cache
      .get(&TestKey::List(1), || counted_fetch(&counter, vec![1]))
      .await
      .unwrap();
    cache
      .get(&TestKey::List(2), || counted_fetch(&counter, vec![2]))
      .await
      .unwrap();
    cache
      .get(&TestKey::Item(9), || counted_fetch(&counter, vec![9]))
      .await
      .unwrap();

    cache.invalidate_kind("list");

    // Both list pages re-fetch; the item entry is untouched
    cache
      .get(&TestKey::List(1), || counted_fetch(&counter, vec![1]))
      .await
      .unwrap();
    cache
      .get(&TestKey::List(2), || counted_fetch(&counter, vec![2]))
      .await
      .unwrap();
    cache
      .get(&TestKey::Item(9), || counted_fetch(&counter, vec![99]))
      .await
      .unwrap();

    assert_eq!(counter.load(Ordering::SeqCst), 5);
  }

  #[tokio::test]
  async fn test_fetch_error_leaves_cache_untouched() {
    let cache = QueryCache::new();
    let key = TestKey::Item(1);

    let result: Result<Vec<i64>, String> = cache
      .get(&key, || async { Err("boom".to_string()) })
      .await;
    assert!(result.is_err());

    // Next read goes to the fetcher again
    let counter = AtomicU32::new(0);
    cache
      .get(&key, || counted_fetch(&counter, vec![1]))
      .await
      .unwrap();
    assert_eq!(counter.load(Ordering::SeqCst), 1);
  }
}
