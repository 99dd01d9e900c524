/// Truncate a string to a maximum length, adding "..." if truncated
pub fn truncate(s: &str, max_len: usize) -> String {
  if s.len() <= max_len {
    s.to_string()
  } else {
    format!("{}...", &s[..max_len.saturating_sub(3)])
  }
}

/// Display an optional value, substituting "-" for absent ones
pub fn display_or_dash(value: Option<&str>) -> &str {
  match value {
    Some(v) if !v.is_empty() => v,
    _ => "-",
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_truncate_short_string() {
    assert_eq!(truncate("hello", 10), "hello");
  }

  #[test]
  fn test_truncate_exact_length() {
    assert_eq!(truncate("hello", 5), "hello");
  }

  #[test]
  fn test_truncate_long_string() {
    assert_eq!(truncate("hello world", 8), "hello...");
  }

  #[test]
  fn test_display_or_dash() {
    assert_eq!(display_or_dash(Some("Acme")), "Acme");
    assert_eq!(display_or_dash(Some("")), "-");
    assert_eq!(display_or_dash(None), "-");
  }
}
