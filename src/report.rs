//! Read-only aggregation and rendering of manifest state and run outcomes.

use std::collections::BTreeMap;
use std::fmt;

use serde::Serialize;

use crate::activator::ActivationError;
use crate::models::{AssetEntry, Outcome, RunMode};

/// Activation counts for one group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupStats {
  /// Group label as written in the manifest.
  pub group: String,
  /// Active entries in the group.
  pub active: usize,
  /// All entries in the group.
  pub total: usize,
}

/// Overall and per-group activation counts.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ManifestStats {
  /// Number of entries.
  pub total: usize,
  /// Number of active entries.
  pub active: usize,
  /// Number of inactive entries.
  pub inactive: usize,
  /// Per-group counts sorted by group label.
  pub groups: Vec<GroupStats>,
}

impl ManifestStats {
  /// Aggregate counts over the manifest.
  pub fn from_entries(entries: &[AssetEntry]) -> Self {
    let mut groups: BTreeMap<&str, GroupStats> = BTreeMap::new();
    for entry in entries {
      let stats = groups.entry(&entry.group).or_insert_with(|| GroupStats {
        group: entry.group.clone(),
        active: 0,
        total: 0,
      });
      stats.total += 1;
      if entry.active {
        stats.active += 1;
      }
    }

    let active = entries.iter().filter(|entry| entry.active).count();
    Self {
      total: entries.len(),
      active,
      inactive: entries.len() - active,
      groups: groups.into_values().collect(),
    }
  }
}

impl fmt::Display for ManifestStats {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    writeln!(
      f,
      "Total: {}, Active: {}, Inactive: {}",
      self.total, self.active, self.inactive
    )?;
    writeln!(f)?;
    for group in &self.groups {
      writeln!(f, "  {}: {}/{} active", group.group, group.active, group.total)?;
    }
    Ok(())
  }
}

/// Number of entries carrying one group label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct GroupCount {
  /// Group label as written in the manifest.
  pub group: String,
  /// Entries in the group.
  pub count: usize,
}

/// Distinct groups of the manifest in sorted order.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(transparent)]
pub struct GroupListing {
  /// Groups with their entry counts.
  pub groups: Vec<GroupCount>,
}

impl GroupListing {
  /// Collect the distinct groups of the manifest.
  pub fn from_entries(entries: &[AssetEntry]) -> Self {
    let mut counts: BTreeMap<&str, usize> = BTreeMap::new();
    for entry in entries {
      *counts.entry(&entry.group).or_default() += 1;
    }
    Self {
      groups: counts
        .into_iter()
        .map(|(group, count)| GroupCount {
          group: group.to_string(),
          count,
        })
        .collect(),
    }
  }
}

impl fmt::Display for GroupListing {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    for group in &self.groups {
      writeln!(f, "  {} ({})", group.group, group.count)?;
    }
    Ok(())
  }
}

/// What happened to one selected entry.
#[derive(Debug)]
pub struct EntryReport {
  /// Entry name.
  pub name: String,
  /// Stored file name.
  pub stored_file: String,
  /// Source file name the stored file maps to.
  pub source_name: String,
  /// Activation outcome, or the copy failure.
  pub result: Result<Outcome, ActivationError>,
}

impl EntryReport {
  /// Returns `true` when the entry counts towards the succeeded total.
  pub fn is_success(&self) -> bool {
    self.result.as_ref().is_ok_and(Outcome::is_success)
  }

  fn render(&self, mode: RunMode, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match &self.result {
      Ok(Outcome::Activated { bytes }) if mode.is_simulate() => writeln!(
        f,
        "  Would copy: {} -> {} ({:.1} MB)",
        self.source_name,
        self.stored_file,
        megabytes(*bytes)
      ),
      Ok(Outcome::Activated { .. }) => {
        writeln!(f, "  Activated: {} -> {}", self.name, self.stored_file)
      }
      Ok(Outcome::AlreadyActive) => writeln!(f, "  Already active: {}", self.name),
      Ok(Outcome::SourceMissing { source }) => writeln!(
        f,
        "  WARNING: Source file not found for {}: {}",
        self.name,
        source.display()
      ),
      Err(err) => writeln!(f, "  ERROR: {}: {}", self.name, err),
    }
  }
}

/// Per-run outcome of an activation command.
#[derive(Debug)]
pub struct ActivationSummary {
  /// Mode the run executed in.
  pub mode: RunMode,
  /// One report per selected entry, in manifest order.
  pub entries: Vec<EntryReport>,
  /// Requested names that matched nothing.
  pub unmatched_names: Vec<String>,
  /// Whether the manifest was written back.
  pub manifest_saved: bool,
}

impl ActivationSummary {
  /// Number of entries the run attempted.
  pub fn attempted(&self) -> usize {
    self.entries.len()
  }

  /// Number of entries activated or already active.
  pub fn succeeded(&self) -> usize {
    self.entries.iter().filter(|entry| entry.is_success()).count()
  }

  /// Number of entries that went through the inactive to active transition.
  pub fn newly_activated(&self) -> usize {
    self
      .entries
      .iter()
      .filter(|entry| matches!(entry.result, Ok(Outcome::Activated { .. })))
      .count()
  }
}

impl fmt::Display for ActivationSummary {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    let marker = if self.mode.is_simulate() { "[DRY RUN] " } else { "" };

    for name in &self.unmatched_names {
      writeln!(f, "  WARNING: No exercise named '{name}'")?;
    }
    writeln!(f, "{marker}Activating {} exercise(s):", self.attempted())?;
    writeln!(f)?;
    for entry in &self.entries {
      entry.render(self.mode, f)?;
    }
    writeln!(f)?;

    if self.mode.is_simulate() {
      writeln!(
        f,
        "{marker}{}/{} would be activated.",
        self.succeeded(),
        self.attempted()
      )
    } else {
      let persisted = if self.manifest_saved {
        "Manifest updated."
      } else {
        "Manifest unchanged."
      };
      writeln!(
        f,
        "Done. {}/{} activated. {persisted}",
        self.succeeded(),
        self.attempted()
      )
    }
  }
}

fn megabytes(bytes: u64) -> f64 {
  bytes as f64 / (1024.0 * 1024.0)
}
