//! Error taxonomy for the user admin API.

use thiserror::Error;

/// Errors surfaced by the API client.
///
/// Client-side validation failures never become an `ApiError`; they are
/// resolved in the form before a request is issued.
#[derive(Error, Debug)]
pub enum ApiError {
  /// Resource does not exist (404)
  #[error("Not found: {0}")]
  NotFound(String),

  /// Request rejected by the server (4xx other than 404/409)
  #[error("Bad request: {0}")]
  BadRequest(String),

  /// Duplicate uid/email or similar conflict (409)
  #[error("Conflict: {0}")]
  Conflict(String),

  /// Server failed to process the request (5xx)
  #[error("Server error ({status}): {message}")]
  Server { status: u16, message: String },

  /// Request never reached the server
  #[error("Network error: {0}")]
  Network(String),

  /// Response body did not match the expected shape
  #[error("Failed to parse response: {0}")]
  Parse(String),

  /// Base URL could not be parsed
  #[error("Invalid base URL: {0}")]
  InvalidUrl(String),
}

pub type Result<T> = std::result::Result<T, ApiError>;

impl From<reqwest::Error> for ApiError {
  fn from(err: reqwest::Error) -> Self {
    if err.is_decode() {
      ApiError::Parse(err.to_string())
    } else {
      // Connect failures, timeouts, dropped connections: the request
      // never produced a usable response
      ApiError::Network(err.to_string())
    }
  }
}

impl ApiError {
  /// True if the error means the resource is missing.
  pub fn is_not_found(&self) -> bool {
    matches!(self, ApiError::NotFound(_))
  }
}
