//! End-to-end cache behavior: reads are memoized, writes invalidate.

use serde_json::json;
use u9s::api::cached_client::CachedApiClient;
use u9s::api::types::UserListFilter;
use u9s::schema::{CreateUser, UpdateUser};
use wiremock::matchers::{method, path, query_param};
use wiremock::{Mock, MockServer, ResponseTemplate};

fn user_body(id: i64, name: &str) -> serde_json::Value {
  json!({
    "id": id,
    "uid": format!("u-{:04}", id),
    "email": format!("user{}@example.com", id),
    "name": name,
    "used_name": null,
    "company": null,
    "birth": null,
    "created_at": "2024-01-01T00:00:00Z",
    "updated_at": "2024-01-01T00:00:00Z"
  })
}

fn page_body(items: Vec<serde_json::Value>, total: u64) -> serde_json::Value {
  let total_pages = total.div_ceil(20);
  json!({
    "items": items,
    "total": total,
    "page": 1,
    "page_size": 20,
    "total_pages": total_pages
  })
}

#[tokio::test]
async fn repeated_list_reads_hit_the_network_once() {
  let server = MockServer::start().await;

  Mock::given(method("GET"))
    .and(path("/users"))
    .respond_with(ResponseTemplate::new(200).set_body_json(page_body(vec![user_body(1, "Jane")], 1)))
    .expect(1)
    .mount(&server)
    .await;

  let client = CachedApiClient::new(&server.uri()).unwrap();
  let filter = UserListFilter::default();

  let first = client.list(&filter).await.unwrap();
  let second = client.list(&filter).await.unwrap();

  assert_eq!(first, second);
}

#[tokio::test]
async fn distinct_filters_are_distinct_cache_entries() {
  let server = MockServer::start().await;

  Mock::given(method("GET"))
    .and(path("/users"))
    .and(query_param("page", "1"))
    .respond_with(ResponseTemplate::new(200).set_body_json(page_body(vec![user_body(1, "Jane")], 21)))
    .expect(1)
    .mount(&server)
    .await;
  Mock::given(method("GET"))
    .and(path("/users"))
    .and(query_param("page", "2"))
    .respond_with(ResponseTemplate::new(200).set_body_json(page_body(vec![user_body(21, "Zed")], 21)))
    .expect(1)
    .mount(&server)
    .await;

  let client = CachedApiClient::new(&server.uri()).unwrap();
  let filter = UserListFilter::default();

  let page1 = client.list(&filter).await.unwrap();
  let page2 = client.list(&filter.with_page(2)).await.unwrap();

  assert_eq!(page1.items[0].id, 1);
  assert_eq!(page2.items[0].id, 21);
}

#[tokio::test]
async fn create_invalidates_every_cached_listing() {
  let server = MockServer::start().await;

  // First read: one user
  Mock::given(method("GET"))
    .and(path("/users"))
    .respond_with(ResponseTemplate::new(200).set_body_json(page_body(vec![user_body(1, "Jane")], 1)))
    .up_to_n_times(1)
    .expect(1)
    .mount(&server)
    .await;

  Mock::given(method("POST"))
    .and(path("/users"))
    .respond_with(ResponseTemplate::new(201).set_body_json(user_body(2, "John")))
    .expect(1)
    .mount(&server)
    .await;

  let client = CachedApiClient::new(&server.uri()).unwrap();
  let filter = UserListFilter::default();

  let before = client.list(&filter).await.unwrap();
  assert_eq!(before.items.len(), 1);

  let input = CreateUser {
    uid: "u-0002".to_string(),
    email: "john@example.com".to_string(),
    name: "John".to_string(),
    ..CreateUser::default()
  };
  client.create(&input).await.unwrap();

  // Second read must go back to the network and observe the new user
  Mock::given(method("GET"))
    .and(path("/users"))
    .respond_with(ResponseTemplate::new(200).set_body_json(page_body(
      vec![user_body(1, "Jane"), user_body(2, "John")],
      2,
    )))
    .expect(1)
    .mount(&server)
    .await;

  let after = client.list(&filter).await.unwrap();
  assert_eq!(after.items.len(), 2);
  assert!(after.items.iter().any(|u| u.id == 2));
}

#[tokio::test]
async fn update_invalidates_the_entity_and_the_listing() {
  let server = MockServer::start().await;

  Mock::given(method("GET"))
    .and(path("/users/5"))
    .respond_with(ResponseTemplate::new(200).set_body_json(user_body(5, "Jane")))
    .up_to_n_times(1)
    .expect(1)
    .mount(&server)
    .await;
  Mock::given(method("PUT"))
    .and(path("/users/5"))
    .respond_with(ResponseTemplate::new(200).set_body_json(user_body(5, "Jane Doe")))
    .expect(1)
    .mount(&server)
    .await;

  let client = CachedApiClient::new(&server.uri()).unwrap();

  let before = client.get_by_id(5).await.unwrap();
  assert_eq!(before.name, "Jane");

  let input = UpdateUser {
    name: "Jane Doe".to_string(),
    ..UpdateUser::default()
  };
  client.update(5, &input).await.unwrap();

  Mock::given(method("GET"))
    .and(path("/users/5"))
    .respond_with(ResponseTemplate::new(200).set_body_json(user_body(5, "Jane Doe")))
    .expect(1)
    .mount(&server)
    .await;

  let after = client.get_by_id(5).await.unwrap();
  assert_eq!(after.name, "Jane Doe");
}

#[tokio::test]
async fn deleted_user_is_gone_from_entity_and_list_reads() {
  let server = MockServer::start().await;

  Mock::given(method("GET"))
    .and(path("/users/5"))
    .respond_with(ResponseTemplate::new(200).set_body_json(user_body(5, "Jane")))
    .up_to_n_times(1)
    .mount(&server)
    .await;
  Mock::given(method("GET"))
    .and(path("/users"))
    .respond_with(ResponseTemplate::new(200).set_body_json(page_body(vec![user_body(5, "Jane")], 1)))
    .up_to_n_times(1)
    .mount(&server)
    .await;
  Mock::given(method("DELETE"))
    .and(path("/users/5"))
    .respond_with(ResponseTemplate::new(204))
    .expect(1)
    .mount(&server)
    .await;

  let client = CachedApiClient::new(&server.uri()).unwrap();
  let filter = UserListFilter::default();

  client.get_by_id(5).await.unwrap();
  client.list(&filter).await.unwrap();

  client.delete(5).await.unwrap();

  // Post-delete the server no longer knows the user
  Mock::given(method("GET"))
    .and(path("/users/5"))
    .respond_with(ResponseTemplate::new(404).set_body_json(json!({
      "code": "NOT_FOUND",
      "message": "user not found"
    })))
    .mount(&server)
    .await;
  Mock::given(method("GET"))
    .and(path("/users"))
    .respond_with(ResponseTemplate::new(200).set_body_json(page_body(vec![], 0)))
    .mount(&server)
    .await;

  assert!(client.get_by_id(5).await.unwrap_err().is_not_found());
  let page = client.list(&filter).await.unwrap();
  assert!(page.items.iter().all(|u| u.id != 5));
}

#[tokio::test]
async fn manual_list_invalidation_forces_a_refetch() {
  let server = MockServer::start().await;

  Mock::given(method("GET"))
    .and(path("/users"))
    .respond_with(ResponseTemplate::new(200).set_body_json(page_body(vec![user_body(1, "Jane")], 1)))
    .expect(2)
    .mount(&server)
    .await;

  let client = CachedApiClient::new(&server.uri()).unwrap();
  let filter = UserListFilter::default();

  client.list(&filter).await.unwrap();
  client.invalidate_lists();
  client.list(&filter).await.unwrap();
}

#[tokio::test]
async fn failed_write_leaves_cache_intact() {
  let server = MockServer::start().await;

  Mock::given(method("GET"))
    .and(path("/users"))
    .respond_with(ResponseTemplate::new(200).set_body_json(page_body(vec![user_body(1, "Jane")], 1)))
    .expect(1)
    .mount(&server)
    .await;
  Mock::given(method("DELETE"))
    .and(path("/users/1"))
    .respond_with(ResponseTemplate::new(404))
    .mount(&server)
    .await;

  let client = CachedApiClient::new(&server.uri()).unwrap();
  let filter = UserListFilter::default();

  client.list(&filter).await.unwrap();
  assert!(client.delete(1).await.is_err());

  // The failed delete must not have invalidated anything; this read is
  // served from cache (the mock allows exactly one call)
  client.list(&filter).await.unwrap();
}
