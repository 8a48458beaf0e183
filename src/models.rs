//! Data structures shared by the manifest store, the selector and the activator.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// JSON key holding the entry name.
pub const NAME_KEY: &str = "name";
/// JSON key holding the entry group.
pub const GROUP_KEY: &str = "group";
/// JSON key holding the stored file name.
pub const STORED_FILE_KEY: &str = "gifFile";
/// JSON key holding the activation flag.
pub const ACTIVE_KEY: &str = "active";
/// JSON key holding the public reference.
pub const PUBLIC_REF_KEY: &str = "imageUrl";

/// Typed view over the fields of a manifest entry this crate reads or writes.
#[derive(Debug, Clone, Deserialize)]
struct AssetRecord {
  name: String,
  group: String,
  #[serde(rename = "gifFile")]
  stored_file: String,
  active: bool,
  #[serde(rename = "imageUrl", default)]
  public_ref: Option<String>,
}

/// One element of the manifest array.
///
/// The entry keeps the JSON object it was parsed from so that keys this crate does not
/// model, and the order of all keys, survive a load/save cycle unchanged.
#[derive(Debug, Clone, PartialEq)]
pub struct AssetEntry {
  /// Human readable identifier matched by name selection.
  pub name: String,
  /// Category label matched by group selection.
  pub group: String,
  /// File name of the activated copy inside the served directory.
  pub stored_file: String,
  /// Whether the entry has been activated.
  pub active: bool,
  /// Public reference recorded on activation.
  pub public_ref: Option<String>,
  document: Map<String, Value>,
}

impl AssetEntry {
  /// Create an inactive entry with no additional fields.
  pub fn new(
    name: impl Into<String>,
    group: impl Into<String>,
    stored_file: impl Into<String>,
  ) -> Self {
    Self {
      name: name.into(),
      group: group.into(),
      stored_file: stored_file.into(),
      active: false,
      public_ref: None,
      document: Map::new(),
    }
  }

  /// Mark the entry as active with the provided reference.
  pub fn with_public_ref(mut self, public_ref: impl Into<String>) -> Self {
    self.active = true;
    self.public_ref = Some(public_ref.into());
    self
  }

  /// Parse an entry from its JSON object, keeping the object for later serialisation.
  pub fn from_json(document: Map<String, Value>) -> Result<Self, serde_json::Error> {
    let record: AssetRecord = serde_json::from_value(Value::Object(document.clone()))?;
    Ok(Self {
      name: record.name,
      group: record.group,
      stored_file: record.stored_file,
      active: record.active,
      public_ref: record.public_ref,
      document,
    })
  }

  /// Render the entry back into a JSON object.
  ///
  /// Known keys are updated in place so their position is preserved; a missing
  /// `imageUrl` key is only added once the entry carries a reference.
  pub fn to_json(&self) -> Map<String, Value> {
    let mut document = self.document.clone();
    document.insert(NAME_KEY.into(), Value::String(self.name.clone()));
    document.insert(GROUP_KEY.into(), Value::String(self.group.clone()));
    document.insert(
      STORED_FILE_KEY.into(),
      Value::String(self.stored_file.clone()),
    );
    document.insert(ACTIVE_KEY.into(), Value::Bool(self.active));
    match &self.public_ref {
      Some(public_ref) => {
        document.insert(PUBLIC_REF_KEY.into(), Value::String(public_ref.clone()));
      }
      None => {
        if let Some(value) = document.get_mut(PUBLIC_REF_KEY) {
          *value = Value::Null;
        }
      }
    }
    document
  }
}

/// Whether a run performs its side effects or only reports what it would do.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum RunMode {
  /// Copy files and persist the manifest.
  #[default]
  Commit,
  /// Perform every check but neither copy nor persist.
  Simulate,
}

impl RunMode {
  /// Pick the mode for a `--dry-run` flag.
  pub fn from_dry_run(dry_run: bool) -> Self {
    if dry_run { Self::Simulate } else { Self::Commit }
  }

  /// Returns `true` for [`RunMode::Simulate`].
  pub fn is_simulate(self) -> bool {
    matches!(self, Self::Simulate)
  }
}

/// Result of activating a single entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Outcome {
  /// The entry was (or, when simulating, would be) activated.
  Activated {
    /// Size of the source file in bytes.
    bytes: u64,
  },
  /// The entry was already active; nothing was touched.
  AlreadyActive,
  /// The source file backing the entry does not exist.
  SourceMissing {
    /// Path that was checked.
    source: PathBuf,
  },
}

impl Outcome {
  /// Returns `true` when the outcome counts towards the succeeded total.
  pub fn is_success(&self) -> bool {
    matches!(self, Self::Activated { .. } | Self::AlreadyActive)
  }
}
