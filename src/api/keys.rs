//! Cache keys for user API queries.

use sha2::{Digest, Sha256};

use crate::api::types::UserListFilter;
use crate::cache::QueryKey;

/// Kind tag shared by every filtered variant of the user listing.
pub const USER_LIST_KIND: &str = "user_list";
/// Kind tag for single-user entries.
pub const USER_KIND: &str = "user";

/// Query key types for user API calls.
#[derive(Clone, Debug)]
pub enum UserQueryKey {
  /// One page of the user listing
  List(UserListFilter),
  /// A single user by id
  ById(i64),
}

impl QueryKey for UserQueryKey {
  fn kind(&self) -> &'static str {
    match self {
      Self::List(_) => USER_LIST_KIND,
      Self::ById(_) => USER_KIND,
    }
  }

  fn cache_hash(&self) -> String {
    let input = match self {
      Self::List(filter) => format!(
        "{}:{}:{}:{}:{}",
        USER_LIST_KIND,
        filter.email.as_deref().unwrap_or(""),
        filter.name_like.as_deref().unwrap_or(""),
        filter.page,
        filter.page_size
      ),
      Self::ById(id) => format!("{}:{}", USER_KIND, id),
    };

    // SHA256 hash for stable, fixed-length keys
    let mut hasher = Sha256::new();
    hasher.update(input.as_bytes());
    hex::encode(hasher.finalize())
  }

  fn description(&self) -> String {
    match self {
      Self::List(filter) => {
        let mut parts = vec![format!("page {}", filter.page)];
        if let Some(email) = &filter.email {
          parts.push(format!("email={}", email));
        }
        if let Some(pattern) = &filter.name_like {
          parts.push(format!("name~{}", pattern));
        }
        format!("users ({})", parts.join(", "))
      }
      Self::ById(id) => format!("user {}", id),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_same_filter_same_hash() {
    let a = UserQueryKey::List(UserListFilter::default());
    let b = UserQueryKey::List(UserListFilter::default());
    assert_eq!(a.cache_hash(), b.cache_hash());
  }

  #[test]
  fn test_page_changes_hash() {
    let a = UserQueryKey::List(UserListFilter::default());
    let b = UserQueryKey::List(UserListFilter::default().with_page(2));
    assert_ne!(a.cache_hash(), b.cache_hash());
  }

  #[test]
  fn test_list_and_item_kinds_are_distinct() {
    let list = UserQueryKey::List(UserListFilter::default());
    let item = UserQueryKey::ById(1);
    assert_ne!(list.kind(), item.kind());
    assert_ne!(list.cache_hash(), item.cache_hash());
  }
}
