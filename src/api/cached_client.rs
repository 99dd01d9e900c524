//! Cached user API client: reads go through the query cache, writes
//! invalidate it.

use tracing::info;

use crate::api::client::ApiClient;
use crate::api::keys::{UserQueryKey, USER_LIST_KIND};
use crate::api::types::{Page, User, UserListFilter};
use crate::cache::QueryCache;
use crate::error::Result;
use crate::schema::{CreateUser, UpdateUser};

/// API client with transparent read caching and write-through
/// invalidation.
///
/// Shared by the list view and the form; cloning is cheap and every clone
/// sees the same cache.
#[derive(Clone)]
pub struct CachedApiClient {
  inner: ApiClient,
  cache: QueryCache,
}

impl CachedApiClient {
  pub fn new(base_url: &str) -> Result<Self> {
    Ok(Self {
      inner: ApiClient::new(base_url)?,
      cache: QueryCache::new(),
    })
  }

  pub fn base_url(&self) -> &str {
    self.inner.base_url()
  }

  /// List users through the cache.
  pub async fn list(&self, filter: &UserListFilter) -> Result<Page<User>> {
    let key = UserQueryKey::List(filter.clone());
    self
      .cache
      .get(&key, || {
        let inner = self.inner.clone();
        let filter = filter.clone();
        async move { inner.list(&filter).await }
      })
      .await
  }

  /// Get a single user through the cache.
  pub async fn get_by_id(&self, id: i64) -> Result<User> {
    let key = UserQueryKey::ById(id);
    self
      .cache
      .get(&key, || {
        let inner = self.inner.clone();
        async move { inner.get_by_id(id).await }
      })
      .await
  }

  /// Create a user. On success every cached listing is marked stale so the
  /// next read reflects the new entity.
  pub async fn create(&self, data: &CreateUser) -> Result<User> {
    let user = self.inner.create(data).await?;
    self.cache.invalidate_kind(USER_LIST_KIND);
    info!(id = user.id, uid = %user.uid, "user created");
    Ok(user)
  }

  /// Update a user. Invalidates the listings and the user's own entry.
  pub async fn update(&self, id: i64, data: &UpdateUser) -> Result<User> {
    let user = self.inner.update(id, data).await?;
    self.cache.invalidate_kind(USER_LIST_KIND);
    self.cache.invalidate(&UserQueryKey::ById(id));
    info!(id, "user updated");
    Ok(user)
  }

  /// Delete a user. Invalidates the listings and the user's own entry.
  pub async fn delete(&self, id: i64) -> Result<()> {
    self.inner.delete(id).await?;
    self.cache.invalidate_kind(USER_LIST_KIND);
    self.cache.invalidate(&UserQueryKey::ById(id));
    info!(id, "user deleted");
    Ok(())
  }

  /// Force the next list read to hit the network (manual refresh).
  pub fn invalidate_lists(&self) {
    self.cache.invalidate_kind(USER_LIST_KIND);
  }
}
