//! Loading and atomically persisting the manifest JSON file.

use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use serde::Serialize;
use serde_json::{Serializer, Value};
use tempfile::NamedTempFile;
use tracing::{debug, info};

use crate::manifest::error::ManifestError;
use crate::manifest::json_format::AsciiPrettyFormatter;
use crate::manifest::validation::validate_entries;
use crate::models::AssetEntry;

/// Storage backend holding the ordered list of manifest entries.
pub trait ManifestStore {
  /// Read every entry in manifest order.
  fn load(&self) -> Result<Vec<AssetEntry>, ManifestError>;

  /// Replace the stored manifest with `entries`, all or nothing.
  fn save(&self, entries: &[AssetEntry]) -> Result<(), ManifestError>;
}

/// Manifest stored as a pretty-printed JSON array on disk.
#[derive(Debug, Clone)]
pub struct JsonManifestStore {
  path: PathBuf,
}

impl JsonManifestStore {
  /// Create a store backed by the file at `path`.
  pub fn new(path: impl Into<PathBuf>) -> Self {
    Self { path: path.into() }
  }

  /// Location of the manifest file.
  pub fn path(&self) -> &Path {
    &self.path
  }
}

impl ManifestStore for JsonManifestStore {
  fn load(&self) -> Result<Vec<AssetEntry>, ManifestError> {
    let content = fs::read_to_string(&self.path).map_err(|source| ManifestError::Unreadable {
      path: self.path.clone(),
      source,
    })?;
    let entries = parse_manifest(&self.path, &content)?;
    debug!(path = %self.path.display(), entries = entries.len(), "loaded manifest");
    Ok(entries)
  }

  fn save(&self, entries: &[AssetEntry]) -> Result<(), ManifestError> {
    let unwritable = |source: std::io::Error| ManifestError::Unwritable {
      path: self.path.clone(),
      source,
    };

    let rendered = render_manifest(entries).map_err(|err| unwritable(err.into()))?;
    atomic_write(&self.path, rendered.as_bytes()).map_err(unwritable)?;
    info!(path = %self.path.display(), entries = entries.len(), "saved manifest");
    Ok(())
  }
}

/// Parse and validate manifest JSON read from `path`.
pub fn parse_manifest(path: &Path, content: &str) -> Result<Vec<AssetEntry>, ManifestError> {
  let invalid = |reason: String| ManifestError::Invalid {
    path: path.to_path_buf(),
    reason,
  };

  let value: Value = serde_json::from_str(content).map_err(|source| ManifestError::Parse {
    path: path.to_path_buf(),
    source,
  })?;
  let Value::Array(items) = value else {
    return Err(invalid("expected a JSON array of entries".into()));
  };

  let mut entries = Vec::with_capacity(items.len());
  for (index, item) in items.into_iter().enumerate() {
    let Value::Object(document) = item else {
      return Err(invalid(format!("entry {index} is not a JSON object")));
    };
    let entry =
      AssetEntry::from_json(document).map_err(|err| invalid(format!("entry {index}: {err}")))?;
    entries.push(entry);
  }

  validate_entries(&entries).map_err(invalid)?;
  Ok(entries)
}

/// Serialise entries with two-space indentation, ASCII-only strings and a trailing newline.
pub fn render_manifest(entries: &[AssetEntry]) -> Result<String, serde_json::Error> {
  let value = Value::Array(
    entries
      .iter()
      .map(|entry| Value::Object(entry.to_json()))
      .collect(),
  );

  let mut buffer = Vec::new();
  {
    let mut serializer = Serializer::with_formatter(&mut buffer, AsciiPrettyFormatter::new());
    value.serialize(&mut serializer)?;
  }
  buffer.push(b'\n');
  // The formatter only ever emits ASCII.
  Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Write `content` next to `path` and rename it into place once it is synced.
fn atomic_write(path: &Path, content: &[u8]) -> std::io::Result<()> {
  let parent = match path.parent() {
    Some(parent) if !parent.as_os_str().is_empty() => parent,
    _ => Path::new("."),
  };

  let mut temp = NamedTempFile::new_in(parent)?;
  temp.write_all(content)?;
  temp.as_file().sync_all()?;

  if let Ok(metadata) = fs::metadata(path) {
    fs::set_permissions(temp.path(), metadata.permissions())?;
  }

  temp.persist(path).map_err(|err| err.error)?;
  Ok(())
}
