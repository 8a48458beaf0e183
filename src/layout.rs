//! Resolved filesystem layout threaded through every operation of a run.

use std::path::PathBuf;

use crate::asset_paths::{make_public_ref, source_name};

/// Owned description of where a run reads and writes, constructed once at startup.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SyncLayout {
  /// Manifest JSON file holding the activation state.
  pub manifest_path: PathBuf,
  /// Directory activated files are copied into.
  pub served_dir: PathBuf,
  /// Directory the original files are copied from.
  pub source_root: PathBuf,
  /// URL prefix of public references.
  pub public_prefix: String,
  /// Prefix stripped from stored names to obtain source names.
  pub source_prefix: String,
}

impl SyncLayout {
  /// Name of the source file backing `stored_file`.
  pub fn source_name<'a>(&self, stored_file: &'a str) -> &'a str {
    source_name(stored_file, &self.source_prefix)
  }

  /// Full path of the source file backing `stored_file`.
  pub fn source_path(&self, stored_file: &str) -> PathBuf {
    self.source_root.join(self.source_name(stored_file))
  }

  /// Destination of `stored_file` inside the served directory.
  pub fn served_path(&self, stored_file: &str) -> PathBuf {
    self.served_dir.join(stored_file)
  }

  /// Public reference recorded for `stored_file` once it is active.
  pub fn public_ref(&self, stored_file: &str) -> String {
    make_public_ref(&self.public_prefix, stored_file)
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn layout() -> SyncLayout {
    SyncLayout {
      manifest_path: PathBuf::from("/app/public/gifs/_exercise_manifest.json"),
      served_dir: PathBuf::from("/app/public/gifs"),
      source_root: PathBuf::from("/home/me/OneDrive/Aspira"),
      public_prefix: "/gifs".into(),
      source_prefix: "as_".into(),
    }
  }

  #[test]
  fn maps_stored_file_to_source_and_destination() {
    let layout = layout();
    assert_eq!(
      layout.source_path("as_archer.gif"),
      PathBuf::from("/home/me/OneDrive/Aspira/archer.gif")
    );
    assert_eq!(
      layout.served_path("as_archer.gif"),
      PathBuf::from("/app/public/gifs/as_archer.gif")
    );
    assert_eq!(layout.public_ref("as_archer.gif"), "/gifs/as_archer.gif");
  }
}
