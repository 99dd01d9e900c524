use serde::{Deserialize, Serialize};

/// A user record as served by the API.
///
/// `id` and `uid` never change after creation; `email` is supplied only at
/// creation and omitted from the update contract.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct User {
  pub id: i64,
  pub uid: String,
  pub email: Option<String>,
  pub name: String,
  pub used_name: Option<String>,
  pub company: Option<String>,
  /// YYYY-MM-DD
  pub birth: Option<String>,
  pub created_at: String,
  pub updated_at: String,
}

/// One page of a server-paginated result.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Page<T> {
  pub items: Vec<T>,
  pub total: u64,
  pub page: u32,
  pub page_size: u32,
  pub total_pages: u32,
}

impl<T> Page<T> {
  /// An empty first page, used before any data has loaded.
  pub fn empty(page_size: u32) -> Self {
    Self {
      items: Vec::new(),
      total: 0,
      page: 1,
      page_size,
      total_pages: 0,
    }
  }
}

/// Page count for a total at a given page size: ceil(total / page_size).
pub fn total_pages(total: u64, page_size: u32) -> u32 {
  if page_size == 0 {
    return 0;
  }
  total.div_ceil(page_size as u64) as u32
}

/// Query parameters for the user listing.
///
/// Serializes directly into the GET /users query string; absent filters
/// are omitted rather than sent empty.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct UserListFilter {
  #[serde(skip_serializing_if = "Option::is_none")]
  pub email: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub name_like: Option<String>,
  pub page: u32,
  pub page_size: u32,
}

impl Default for UserListFilter {
  fn default() -> Self {
    Self {
      email: None,
      name_like: None,
      page: 1,
      page_size: 20,
    }
  }
}

impl UserListFilter {
  pub fn new(page_size: u32) -> Self {
    Self {
      page_size,
      ..Self::default()
    }
    .normalize()
  }

  /// Same filter on a different page. Only the page field changes.
  pub fn with_page(&self, page: u32) -> Self {
    Self {
      page: page.max(1),
      ..self.clone()
    }
  }

  /// Clamp out-of-range values into the supported window.
  pub fn normalize(mut self) -> Self {
    self.page = self.page.max(1);
    self.page_size = self.page_size.clamp(1, 200);
    self
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_total_pages_rounds_up() {
    assert_eq!(total_pages(0, 20), 0);
    assert_eq!(total_pages(1, 20), 1);
    assert_eq!(total_pages(20, 20), 1);
    assert_eq!(total_pages(21, 20), 2);
    assert_eq!(total_pages(41, 20), 3);
    assert_eq!(total_pages(200, 1), 200);
  }

  #[test]
  fn test_last_page_length() {
    // With 41 items at page size 20, the last page holds the remainder
    let total: u64 = 41;
    let page_size: u32 = 20;
    let pages = total_pages(total, page_size);
    assert_eq!(pages, 3);
    let last_len = total - u64::from(page_size) * u64::from(pages - 1);
    assert_eq!(last_len, 1);
    assert!(last_len <= u64::from(page_size));
  }

  #[test]
  fn test_filter_defaults() {
    let filter = UserListFilter::default();
    assert_eq!(filter.page, 1);
    assert_eq!(filter.page_size, 20);
    assert!(filter.email.is_none());
    assert!(filter.name_like.is_none());
  }

  #[test]
  fn test_filter_normalize_clamps() {
    let filter = UserListFilter {
      page: 0,
      page_size: 0,
      ..UserListFilter::default()
    }
    .normalize();
    assert_eq!(filter.page, 1);
    assert_eq!(filter.page_size, 1);

    let filter = UserListFilter {
      page_size: 500,
      ..UserListFilter::default()
    }
    .normalize();
    assert_eq!(filter.page_size, 200);
  }

  #[test]
  fn test_with_page_replaces_only_page() {
    let filter = UserListFilter {
      email: Some("a@b.com".to_string()),
      name_like: Some("smith".to_string()),
      page: 2,
      page_size: 50,
    };
    let next = filter.with_page(3);
    assert_eq!(next.page, 3);
    assert_eq!(next.page_size, 50);
    assert_eq!(next.email.as_deref(), Some("a@b.com"));
    assert_eq!(next.name_like.as_deref(), Some("smith"));
  }

  #[test]
  fn test_absent_filters_not_serialized() {
    let filter = UserListFilter::default();
    let qs = serde_json::to_value(&filter).unwrap();
    assert!(qs.get("email").is_none());
    assert!(qs.get("name_like").is_none());
    assert_eq!(qs["page"], 1);
    assert_eq!(qs["page_size"], 20);
  }

  #[test]
  fn test_user_wire_shape() {
    let json = r#"{
      "id": 5,
      "uid": "u-0005",
      "email": null,
      "name": "Jane",
      "used_name": null,
      "company": "Acme",
      "birth": "1990-04-01",
      "created_at": "2024-01-01T00:00:00Z",
      "updated_at": "2024-01-02T00:00:00Z"
    }"#;
    let user: User = serde_json::from_str(json).unwrap();
    assert_eq!(user.id, 5);
    assert!(user.email.is_none());
    assert_eq!(user.birth.as_deref(), Some("1990-04-01"));
  }
}
