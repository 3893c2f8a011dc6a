use directories::ProjectDirs;
use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use tracing::warn;

use crate::constants::constants;

/// Environment variable consulted for the API key before `prefs.toml`.
pub const API_KEY_ENV: &str = "YOUTUBE_API_KEY";

#[derive(Serialize, Deserialize, Default, Debug, Clone, PartialEq)]
pub struct Config {
  pub api_key: Option<String>,
  pub region: Option<String>,
  pub language: Option<String>,
  /// Category names left out of the chart and per-category views.
  pub excluded_categories: Option<Vec<String>>,
  /// Fixed trend ranking; when unset the trends feed is used.
  pub trend_phrases: Option<Vec<String>>,
  pub theme_name: Option<String>,
}

impl Config {
  pub fn path() -> Option<PathBuf> {
    ProjectDirs::from("", "", "yta").map(|dirs| dirs.config_dir().join("prefs.toml"))
  }

  pub fn load() -> Self {
    if let Some(config_file) = Self::path()
      && let Ok(content) = std::fs::read_to_string(&config_file)
    {
      match toml::from_str(&content) {
        Ok(config) => return config,
        Err(e) => warn!(path = %config_file.display(), err = %e, "config: ignoring malformed prefs"),
      }
    }
    Self::default()
  }

  pub fn save(&self) {
    if let Some(proj_dirs) = ProjectDirs::from("", "", "yta") {
      let config_dir = proj_dirs.config_dir();
      if std::fs::create_dir_all(config_dir).is_ok() {
        let config_file = config_dir.join("prefs.toml");
        if let Ok(content) = toml::to_string(self) {
          let _ = std::fs::write(config_file, content);
        }
      }
    }
  }

  /// Flag, then environment, then prefs file.
  pub fn resolve_api_key(&self, flag: Option<&str>, env: Option<String>) -> Option<String> {
    flag
      .map(str::to_string)
      .or(env)
      .or_else(|| self.api_key.clone())
      .map(|k| k.trim().to_string())
      .filter(|k| !k.is_empty())
  }

  pub fn region(&self) -> String {
    self.region.clone().unwrap_or_else(|| constants().default_region.clone())
  }

  pub fn language(&self) -> String {
    self.language.clone().unwrap_or_else(|| constants().default_language.clone())
  }

  pub fn excluded_categories(&self) -> Vec<String> {
    self.excluded_categories.clone().unwrap_or_else(|| constants().excluded_categories.clone())
  }
}
