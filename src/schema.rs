//! Input validation for the create/edit form.
//!
//! Validation runs client-side before any request is issued. Failures are
//! reported per field so the form can annotate individual inputs, and the
//! submit is blocked until every field passes.

use regex::Regex;
use serde::Serialize;
use std::collections::BTreeMap;
use std::sync::LazyLock;
use validator::{Validate, ValidationError, ValidationErrors};

static BIRTH_RE: LazyLock<Regex> =
  LazyLock::new(|| Regex::new(r"^(\d{4})-(\d{2})-(\d{2})$").expect("birth regex"));

/// Body of POST /users.
#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct CreateUser {
  #[validate(length(min = 1, message = "UID is required"))]
  pub uid: String,
  #[validate(email(message = "Invalid email address"))]
  pub email: String,
  #[validate(length(min = 1, message = "Name is required"))]
  pub name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub used_name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub company: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  #[validate(custom(function = validate_birth))]
  pub birth: Option<String>,
}

/// Body of PUT /users/{id}.
///
/// The update contract omits uid and email; neither can change after
/// creation.
#[derive(Debug, Clone, Default, Serialize, Validate)]
pub struct UpdateUser {
  #[validate(length(min = 1, message = "Name is required"))]
  pub name: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub used_name: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub company: Option<String>,
  #[serde(skip_serializing_if = "Option::is_none")]
  #[validate(custom(function = validate_birth))]
  pub birth: Option<String>,
}

/// Empty birth means "not provided"; anything else must look like a date.
fn validate_birth(birth: &str) -> Result<(), ValidationError> {
  if birth.is_empty() || is_date_like(birth) {
    return Ok(());
  }
  let mut err = ValidationError::new("format");
  err.message = Some("Invalid date format".into());
  Err(err)
}

/// YYYY-MM-DD with plausible month and day ranges. Format check only; the
/// server owns real calendar semantics (Feb 31 passes, month 13 does not).
fn is_date_like(s: &str) -> bool {
  let Some(caps) = BIRTH_RE.captures(s) else {
    return false;
  };
  let month: u32 = caps[2].parse().unwrap_or(0);
  let day: u32 = caps[3].parse().unwrap_or(0);
  (1..=12).contains(&month) && (1..=31).contains(&day)
}

/// Flatten validator output into one message per field.
pub fn field_errors(errors: &ValidationErrors) -> BTreeMap<&'static str, String> {
  errors
    .field_errors()
    .iter()
    .map(|(field, errs)| {
      let message = errs
        .first()
        .and_then(|e| e.message.as_ref().map(|m| m.to_string()))
        .unwrap_or_else(|| "Invalid value".to_string());
      (*field, message)
    })
    .collect()
}
