//! Activation run orchestrator: load, select, activate each target, persist, report.

use std::fmt;
use std::path::PathBuf;

use tracing::debug;

use crate::activator::{Activator, AssetCopier};
use crate::layout::SyncLayout;
use crate::manifest::{ManifestError, ManifestStore};
use crate::models::RunMode;
use crate::report::{ActivationSummary, EntryReport};
use crate::selection::{NoMatch, Selection};

/// Fatal errors that abort a run before anything is persisted.
#[derive(Debug)]
pub enum RunError {
  /// The manifest could not be loaded or saved.
  Manifest(ManifestError),
  /// The directory holding the source files does not exist.
  SourceRootMissing(PathBuf),
}

impl From<ManifestError> for RunError {
  fn from(err: ManifestError) -> Self {
    Self::Manifest(err)
  }
}

impl fmt::Display for RunError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::Manifest(err) => fmt::Display::fmt(err, f),
      Self::SourceRootMissing(path) => {
        write!(f, "source folder not found: {}", path.display())
      }
    }
  }
}

impl std::error::Error for RunError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      Self::Manifest(err) => Some(err),
      Self::SourceRootMissing(_) => None,
    }
  }
}

/// Result of a run that was not aborted.
#[derive(Debug)]
pub enum RunReport {
  /// The selection matched nothing; the manifest was not touched.
  NoTargets(NoMatch),
  /// Every selected entry was processed.
  Completed(ActivationSummary),
}

impl fmt::Display for RunReport {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      Self::NoTargets(no_match) => writeln!(f, "{no_match}"),
      Self::Completed(summary) => fmt::Display::fmt(summary, f),
    }
  }
}

/// High-level helper sequencing one activation run against a manifest store.
pub struct ActivationRunner<'a, S, C> {
  layout: &'a SyncLayout,
  store: S,
  copier: C,
}

impl<'a, S: ManifestStore, C: AssetCopier> ActivationRunner<'a, S, C> {
  /// Create a runner for the provided layout, store and copy primitive.
  pub fn new(layout: &'a SyncLayout, store: S, copier: C) -> Self {
    Self {
      layout,
      store,
      copier,
    }
  }

  /// Activate the entries picked by `selection`.
  ///
  /// Entries are processed in manifest order and a failing entry never stops the batch.
  /// The manifest is saved once at the end, only when committing and only when at least
  /// one entry changed.
  pub fn run(&self, selection: &Selection, mode: RunMode) -> Result<RunReport, RunError> {
    if !self.layout.source_root.is_dir() {
      return Err(RunError::SourceRootMissing(self.layout.source_root.clone()));
    }

    let mut entries = self.store.load()?;
    debug!(entries = entries.len(), "state: loaded");

    let selected = match selection.select(&entries) {
      Ok(selected) => selected,
      Err(no_match) => {
        debug!(%no_match, "state: done (no targets)");
        return Ok(RunReport::NoTargets(no_match));
      }
    };
    debug!(targets = selected.indices.len(), ?mode, "state: selected");

    let activator = Activator::new(self.layout, &self.copier);
    let mut reports = Vec::with_capacity(selected.indices.len());
    for index in selected.indices {
      let entry = &mut entries[index];
      let result = activator.activate(entry, mode);
      reports.push(EntryReport {
        name: entry.name.clone(),
        stored_file: entry.stored_file.clone(),
        source_name: self.layout.source_name(&entry.stored_file).to_string(),
        result,
      });
    }
    debug!(processed = reports.len(), "state: processed");

    let mut summary = ActivationSummary {
      mode,
      entries: reports,
      unmatched_names: selected.unmatched_names,
      manifest_saved: false,
    };

    if mode.is_simulate() {
      debug!("state: simulate skip");
    } else if summary.newly_activated() > 0 {
      debug!("state: persisting");
      self.store.save(&entries)?;
      summary.manifest_saved = true;
    } else {
      debug!("state: nothing to persist");
    }

    Ok(RunReport::Completed(summary))
  }
}
