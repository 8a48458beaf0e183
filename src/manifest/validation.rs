//! Schema checks applied to a freshly parsed manifest.

use std::collections::BTreeMap;

use crate::asset_paths::is_plain_file_name;
use crate::models::AssetEntry;

/// Check the invariants every loaded manifest must satisfy.
///
/// Stored file names must be plain file names and unique across the manifest, since both
/// the copy destination and the public reference are derived from them.
pub fn validate_entries(entries: &[AssetEntry]) -> Result<(), String> {
  let mut seen: BTreeMap<&str, usize> = BTreeMap::new();

  for (index, entry) in entries.iter().enumerate() {
    if entry.stored_file.is_empty() {
      return Err(format!("entry {index} ('{}') has an empty gifFile", entry.name));
    }
    if !is_plain_file_name(&entry.stored_file) {
      return Err(format!(
        "entry {index} ('{}') has gifFile '{}' which is not a plain file name",
        entry.name, entry.stored_file
      ));
    }
    if let Some(first) = seen.insert(&entry.stored_file, index) {
      return Err(format!(
        "entries {first} and {index} share gifFile '{}'",
        entry.stored_file
      ));
    }
  }

  Ok(())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn accepts_unique_plain_names() {
    let entries = vec![
      AssetEntry::new("Archer Pull-Up", "Back", "as_archer.gif"),
      AssetEntry::new("Band Biceps Curl", "Biceps", "as_band_curl.gif"),
    ];
    assert!(validate_entries(&entries).is_ok());
  }

  #[test]
  fn rejects_duplicate_stored_files() {
    let entries = vec![
      AssetEntry::new("Archer Pull-Up", "Back", "as_archer.gif"),
      AssetEntry::new("Archer Row", "Back", "as_archer.gif"),
    ];
    let err = validate_entries(&entries).unwrap_err();
    assert!(err.contains("entries 0 and 1"));
  }

  #[test]
  fn rejects_paths_and_empty_names() {
    let nested = vec![AssetEntry::new("Plank", "Core", "../plank.gif")];
    assert!(validate_entries(&nested).is_err());

    let empty = vec![AssetEntry::new("Plank", "Core", "")];
    assert!(validate_entries(&empty).unwrap_err().contains("empty gifFile"));
  }
}
