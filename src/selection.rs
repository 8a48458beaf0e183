//! Helpers used to pick which manifest entries a run activates.

use std::collections::BTreeSet;

use crate::models::AssetEntry;

/// Which entries a run targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Selection {
  /// Entries whose name matches one of the requested names, active or not.
  ByNames(RequestedNames),
  /// Inactive entries of one group.
  ByGroup(String),
  /// Every inactive entry.
  All,
}

/// Case-insensitive set of requested names that remembers how each was spelled.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RequestedNames {
  keys: BTreeSet<String>,
  spelled: Vec<String>,
}

/// Entries picked by a [`Selection`], in manifest order.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SelectedEntries {
  /// Indices into the manifest.
  pub indices: Vec<usize>,
  /// Requested names that matched no entry, as the user spelled them.
  pub unmatched_names: Vec<String>,
}

/// A selection that matched no entry.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum NoMatch {
  /// None of the requested names exist in the manifest.
  Names,
  /// The group has no inactive entries.
  Group(String),
  /// Every entry is already active.
  All,
}

impl Selection {
  /// Select entries by name.
  pub fn by_names<I, S>(names: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: AsRef<str>,
  {
    Self::ByNames(RequestedNames::from_iter(names))
  }

  /// Select inactive entries of `group`.
  pub fn by_group(group: impl Into<String>) -> Self {
    Self::ByGroup(group.into().trim().to_string())
  }

  /// Determine whether an entry should be activated by this selection.
  pub fn is_included(&self, entry: &AssetEntry) -> bool {
    match self {
      Self::ByNames(names) => names.contains(&entry.name),
      Self::ByGroup(group) => !entry.active && fold_case(&entry.group) == fold_case(group),
      Self::All => !entry.active,
    }
  }

  /// Pick the target entries, preserving manifest order.
  pub fn select(&self, entries: &[AssetEntry]) -> Result<SelectedEntries, NoMatch> {
    let indices: Vec<usize> = entries
      .iter()
      .enumerate()
      .filter(|(_, entry)| self.is_included(entry))
      .map(|(index, _)| index)
      .collect();

    if indices.is_empty() {
      return Err(match self {
        Self::ByNames(_) => NoMatch::Names,
        Self::ByGroup(group) => NoMatch::Group(group.clone()),
        Self::All => NoMatch::All,
      });
    }

    let unmatched_names = match self {
      Self::ByNames(names) => names.unmatched(entries),
      _ => Vec::new(),
    };

    Ok(SelectedEntries {
      indices,
      unmatched_names,
    })
  }
}

impl RequestedNames {
  /// Returns `true` when `name` was requested, ignoring case.
  pub fn contains(&self, name: &str) -> bool {
    self.keys.contains(&fold_case(name))
  }

  fn unmatched(&self, entries: &[AssetEntry]) -> Vec<String> {
    let present: BTreeSet<String> = entries.iter().map(|entry| fold_case(&entry.name)).collect();
    self
      .spelled
      .iter()
      .filter(|name| !present.contains(&fold_case(name)))
      .cloned()
      .collect()
  }
}

impl<S: AsRef<str>> FromIterator<S> for RequestedNames {
  /// Names are trimmed, blank values are discarded and case-insensitive duplicates are
  /// collapsed onto their first spelling.
  fn from_iter<I: IntoIterator<Item = S>>(names: I) -> Self {
    let mut requested = Self::default();
    for name in names {
      let name = name.as_ref().trim();
      if name.is_empty() {
        continue;
      }
      if requested.keys.insert(fold_case(name)) {
        requested.spelled.push(name.to_string());
      }
    }
    requested
  }
}

impl std::fmt::Display for NoMatch {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Names => write!(
        f,
        "No matching exercises found. Check spelling against manifest names."
      ),
      Self::Group(group) => write!(f, "No inactive exercises found in group '{group}'"),
      Self::All => write!(f, "No inactive exercises left to activate."),
    }
  }
}

impl std::error::Error for NoMatch {}

fn fold_case(value: &str) -> String {
  value.to_lowercase()
}
