//! Project configuration loader describing where the manifest, served files and sources live.

use std::fs;
use std::path::{Path, PathBuf};

use serde::Deserialize;
use tracing::{debug, warn};

use crate::layout::SyncLayout;

/// File name searched for in the project root when no explicit config path is given.
pub const DEFAULT_CONFIG_FILE: &str = "exercise-sync.config.json";

/// Discoverable project configuration describing filesystem layout and naming conventions.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct ProjectConfig {
  /// Path from the project root to the manifest JSON file.
  pub manifest_path: String,
  /// Path from the project root to the directory activated files are copied into.
  pub served_dir: String,
  /// Directory holding the original animations. Defaults to `~/OneDrive/Aspira`.
  pub source_root: Option<String>,
  /// URL prefix used to derive the public reference of an activated entry.
  pub public_prefix: String,
  /// Prefix carried by stored file names but absent from source file names.
  pub source_prefix: String,
}

impl Default for ProjectConfig {
  fn default() -> Self {
    Self {
      manifest_path: "public/gifs/_exercise_manifest.json".into(),
      served_dir: "public/gifs".into(),
      source_root: None,
      public_prefix: "/gifs".into(),
      source_prefix: "as_".into(),
    }
  }
}

impl ProjectConfig {
  /// Attempt to load configuration from the provided project root.
  ///
  /// When the configuration file does not exist or fails to parse we fall back to default
  /// values so downstream callers can continue operating with sensible assumptions.
  pub fn discover(project_root: &Path) -> Self {
    let candidate = project_root.join(DEFAULT_CONFIG_FILE);
    Self::load_or_default(&candidate)
  }

  /// Load configuration from `path`, falling back to defaults when it is absent or invalid.
  pub fn load_or_default(path: &Path) -> Self {
    if !path.exists() {
      debug!(path = %path.display(), "no config file, using defaults");
      return Self::default();
    }
    Self::from_path(path).unwrap_or_else(|| {
      warn!(path = %path.display(), "ignoring unparsable config file");
      Self::default()
    })
  }

  /// Read configuration from a specific JSON file.
  pub fn from_path(path: &Path) -> Option<Self> {
    let content = fs::read_to_string(path).ok()?;
    serde_json::from_str(&content).ok()
  }

  /// Resolve the configuration against the project root into an owned layout.
  pub fn into_layout(self, project_root: &Path) -> SyncLayout {
    let source_root = match self.source_root {
      Some(root) => project_root.join(root),
      None => default_source_root(),
    };

    SyncLayout {
      manifest_path: project_root.join(self.manifest_path),
      served_dir: project_root.join(self.served_dir),
      source_root,
      public_prefix: self.public_prefix,
      source_prefix: self.source_prefix,
    }
  }
}

/// Source root used when the configuration does not name one.
pub fn default_source_root() -> PathBuf {
  dirs::home_dir()
    .unwrap_or_default()
    .join("OneDrive")
    .join("Aspira")
}

#[cfg(test)]
mod tests {
  use super::*;
  use tempfile::tempdir;

  #[test]
  fn discover_defaults_when_file_missing() {
    let temp = tempdir().expect("failed to create temp dir");
    assert_eq!(ProjectConfig::discover(temp.path()), ProjectConfig::default());
  }

  #[test]
  fn discover_defaults_when_file_is_invalid() {
    let temp = tempdir().expect("failed to create temp dir");
    fs::write(temp.path().join(DEFAULT_CONFIG_FILE), "{ not json").unwrap();
    assert_eq!(ProjectConfig::discover(temp.path()), ProjectConfig::default());
  }

  #[test]
  fn partial_config_keeps_remaining_defaults() {
    let temp = tempdir().expect("failed to create temp dir");
    fs::write(
      temp.path().join(DEFAULT_CONFIG_FILE),
      r#"{"served_dir": "static/anim", "public_prefix": "/anim"}"#,
    )
    .unwrap();

    let config = ProjectConfig::discover(temp.path());
    assert_eq!(config.served_dir, "static/anim");
    assert_eq!(config.public_prefix, "/anim");
    assert_eq!(config.source_prefix, "as_");
    assert_eq!(config.manifest_path, "public/gifs/_exercise_manifest.json");
  }

  #[test]
  fn into_layout_resolves_paths_against_root() {
    let root = Path::new("/srv/app");
    let config = ProjectConfig {
      source_root: Some("../sources".into()),
      ..ProjectConfig::default()
    };

    let layout = config.into_layout(root);
    assert_eq!(
      layout.manifest_path,
      root.join("public/gifs/_exercise_manifest.json")
    );
    assert_eq!(layout.served_dir, root.join("public/gifs"));
    assert_eq!(layout.source_root, root.join("../sources"));
  }

  #[test]
  fn into_layout_defaults_source_root_to_home() {
    let layout = ProjectConfig::default().into_layout(Path::new("/srv/app"));
    assert!(layout.source_root.ends_with("OneDrive/Aspira"));
  }
}
