use color_eyre::{eyre::eyre, Result};
use serde::Deserialize;
use std::path::{Path, PathBuf};
use url::Url;

/// Default API endpoint for local development.
pub const DEFAULT_BASE_URL: &str = "http://localhost:8080";

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct Config {
  pub api: ApiConfig,
  /// Custom title for the header (defaults to the API host if not set)
  pub title: Option<String>,
  /// Rows requested per page in list views
  pub page_size: u32,
}

impl Default for Config {
  fn default() -> Self {
    Self {
      api: ApiConfig::default(),
      title: None,
      page_size: 20,
    }
  }
}

#[derive(Debug, Clone, Deserialize)]
#[serde(default)]
pub struct ApiConfig {
  pub base_url: String,
}

impl Default for ApiConfig {
  fn default() -> Self {
    Self {
      base_url: DEFAULT_BASE_URL.to_string(),
    }
  }
}

impl Config {
  /// Load configuration from file.
  ///
  /// Search order:
  /// 1. Explicit path if provided
  /// 2. ./u9s.yaml (current directory)
  /// 3. $XDG_CONFIG_HOME/u9s/config.yaml
  ///
  /// A missing config file is fine; defaults apply. U9S_API_URL overrides
  /// the configured base URL either way.
  pub fn load(explicit_path: Option<&Path>) -> Result<Self> {
    let path = if let Some(p) = explicit_path {
      if p.exists() {
        Some(p.to_path_buf())
      } else {
        return Err(eyre!("Config file not found: {}", p.display()));
      }
    } else {
      Self::find_config_file()
    };

    let mut config = match path {
      Some(p) => Self::load_from_path(&p)?,
      None => Config::default(),
    };

    if let Ok(url) = std::env::var("U9S_API_URL") {
      if !url.is_empty() {
        config.api.base_url = url;
      }
    }

    config.normalize()?;
    Ok(config)
  }

  fn find_config_file() -> Option<PathBuf> {
    // Check current directory
    let local = PathBuf::from("u9s.yaml");
    if local.exists() {
      return Some(local);
    }

    // Check XDG config directory
    if let Some(config_dir) = dirs::config_dir() {
      let xdg_path = config_dir.join("u9s").join("config.yaml");
      if xdg_path.exists() {
        return Some(xdg_path);
      }
    }

    None
  }

  fn load_from_path(path: &Path) -> Result<Self> {
    let contents = std::fs::read_to_string(path)
      .map_err(|e| eyre!("Failed to read config file {}: {}", path.display(), e))?;

    let config: Config = serde_yaml::from_str(&contents)
      .map_err(|e| eyre!("Failed to parse config file {}: {}", path.display(), e))?;

    Ok(config)
  }

  /// Validate the base URL and clamp page_size to the supported window.
  fn normalize(&mut self) -> Result<()> {
    let parsed = Url::parse(&self.api.base_url)
      .map_err(|e| eyre!("Invalid base URL {}: {}", self.api.base_url, e))?;
    if parsed.scheme() != "http" && parsed.scheme() != "https" {
      return Err(eyre!(
        "Base URL must be http or https: {}",
        self.api.base_url
      ));
    }

    self.api.base_url = self.api.base_url.trim_end_matches('/').to_string();
    self.page_size = self.page_size.clamp(1, 200);
    Ok(())
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn test_defaults() {
    let config = Config::default();
    assert_eq!(config.api.base_url, DEFAULT_BASE_URL);
    assert_eq!(config.page_size, 20);
    assert!(config.title.is_none());
  }

  #[test]
  fn test_normalize_trims_trailing_slash() {
    let mut config = Config {
      api: ApiConfig {
        base_url: "http://example.com/".to_string(),
      },
      ..Config::default()
    };
    config.normalize().expect("valid url");
    assert_eq!(config.api.base_url, "http://example.com");
  }

  #[test]
  fn test_normalize_clamps_page_size() {
    let mut config = Config {
      page_size: 1000,
      ..Config::default()
    };
    config.normalize().expect("valid config");
    assert_eq!(config.page_size, 200);

    let mut config = Config {
      page_size: 0,
      ..Config::default()
    };
    config.normalize().expect("valid config");
    assert_eq!(config.page_size, 1);
  }

  #[test]
  fn test_normalize_rejects_bad_scheme() {
    let mut config = Config {
      api: ApiConfig {
        base_url: "ftp://example.com".to_string(),
      },
      ..Config::default()
    };
    assert!(config.normalize().is_err());
  }
}
