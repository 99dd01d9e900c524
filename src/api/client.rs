use crate::api::types::{Page, User, UserListFilter};
use crate::error::{ApiError, Result};
use crate::schema::{CreateUser, UpdateUser};
use reqwest::{Client, Response, StatusCode};
use serde::de::DeserializeOwned;
use serde::Deserialize;
use std::time::Duration;
use tracing::debug;
use url::Url;

/// Error body returned by the API on failure.
#[derive(Debug, Deserialize)]
struct ErrorBody {
  #[allow(dead_code)]
  code: Option<String>,
  message: Option<String>,
}

/// Stateless HTTP client for the user admin API.
///
/// Every operation maps directly onto one request; failures surface as
/// `ApiError` for the caller's own presentation layer. No retries.
#[derive(Clone)]
pub struct ApiClient {
  http: Client,
  base_url: String,
}

impl ApiClient {
  pub fn new(base_url: &str) -> Result<Self> {
    let base_url = normalize_base_url(base_url)?;

    let http = Client::builder()
      .timeout(Duration::from_secs(30))
      .connect_timeout(Duration::from_secs(10))
      .user_agent(concat!("u9s/", env!("CARGO_PKG_VERSION")))
      .build()?;

    Ok(Self { http, base_url })
  }

  pub fn base_url(&self) -> &str {
    &self.base_url
  }

  /// List users matching the filter, one page at a time.
  pub async fn list(&self, filter: &UserListFilter) -> Result<Page<User>> {
    let url = format!("{}/users", self.base_url);
    debug!(page = filter.page, page_size = filter.page_size, "GET /users");

    let response = self.http.get(&url).query(filter).send().await?;
    Self::parse_json(response).await
  }

  /// Get a single user by id. Fails with NotFound if the id does not exist.
  pub async fn get_by_id(&self, id: i64) -> Result<User> {
    let url = format!("{}/users/{}", self.base_url, id);
    debug!(id, "GET /users/{{id}}");

    let response = self.http.get(&url).send().await?;
    Self::parse_json(response).await
  }

  /// Create a user. The server rejects duplicate uid/email with a 409.
  pub async fn create(&self, data: &CreateUser) -> Result<User> {
    let url = format!("{}/users", self.base_url);
    debug!(uid = %data.uid, "POST /users");

    let response = self.http.post(&url).json(data).send().await?;
    Self::parse_json(response).await
  }

  /// Update the mutable fields of a user.
  pub async fn update(&self, id: i64, data: &UpdateUser) -> Result<User> {
    let url = format!("{}/users/{}", self.base_url, id);
    debug!(id, "PUT /users/{{id}}");

    let response = self.http.put(&url).json(data).send().await?;
    Self::parse_json(response).await
  }

  /// Delete a user. Fails with NotFound if the id does not exist.
  pub async fn delete(&self, id: i64) -> Result<()> {
    let url = format!("{}/users/{}", self.base_url, id);
    debug!(id, "DELETE /users/{{id}}");

    let response = self.http.delete(&url).send().await?;
    if response.status().is_success() {
      Ok(())
    } else {
      Err(Self::error_for(response).await)
    }
  }

  async fn parse_json<T: DeserializeOwned>(response: Response) -> Result<T> {
    if response.status().is_success() {
      response
        .json()
        .await
        .map_err(|e| ApiError::Parse(e.to_string()))
    } else {
      Err(Self::error_for(response).await)
    }
  }

  /// Map a non-success response onto the error taxonomy.
  async fn error_for(response: Response) -> ApiError {
    let status = response.status();
    let message = response
      .json::<ErrorBody>()
      .await
      .ok()
      .and_then(|body| body.message)
      .unwrap_or_else(|| {
        status
          .canonical_reason()
          .unwrap_or("request failed")
          .to_string()
      });

    match status {
      StatusCode::NOT_FOUND => ApiError::NotFound(message),
      StatusCode::CONFLICT => ApiError::Conflict(message),
      s if s.is_client_error() => ApiError::BadRequest(message),
      s => ApiError::Server {
        status: s.as_u16(),
        message,
      },
    }
  }
}

fn normalize_base_url(raw: &str) -> Result<String> {
  let parsed = Url::parse(raw).map_err(|e| ApiError::InvalidUrl(e.to_string()))?;
  if parsed.scheme() != "http" && parsed.scheme() != "https" {
    return Err(ApiError::InvalidUrl(format!(
      "URL must be http or https: {}",
      raw
    )));
  }
  Ok(raw.trim_end_matches('/').to_string())
}
