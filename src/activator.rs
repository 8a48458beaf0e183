//! Per-entry activation: source check, copy into the served directory and state flip.

use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use same_file::is_same_file;
use tempfile::NamedTempFile;
use tracing::{debug, info, warn};

use crate::layout::SyncLayout;
use crate::models::{AssetEntry, Outcome, RunMode};

/// Primitive duplicating a source file into the served directory.
pub trait AssetCopier {
  /// Copy `source` to `destination`, replacing any existing file.
  fn copy(&self, source: &Path, destination: &Path) -> io::Result<()>;
}

/// Copier backed by the local filesystem.
#[derive(Debug, Default, Clone, Copy)]
pub struct FsCopier;

impl AssetCopier for FsCopier {
  fn copy(&self, source: &Path, destination: &Path) -> io::Result<()> {
    install_served_asset(source, destination)
  }
}

impl<C: AssetCopier + ?Sized> AssetCopier for &C {
  fn copy(&self, source: &Path, destination: &Path) -> io::Result<()> {
    (**self).copy(source, destination)
  }
}

/// Failure to activate an entry whose source exists.
#[derive(Debug)]
pub enum ActivationError {
  /// Copying the source into the served directory failed.
  Copy {
    /// Source file.
    from: PathBuf,
    /// Intended destination.
    to: PathBuf,
    /// Source I/O error.
    source: io::Error,
  },
}

impl std::fmt::Display for ActivationError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Copy { from, to, source } => write!(
        f,
        "failed to copy {} -> {}: {}",
        from.display(),
        to.display(),
        source
      ),
    }
  }
}

impl std::error::Error for ActivationError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      Self::Copy { source, .. } => Some(source),
    }
  }
}

/// Applies the activation transition to single entries.
pub struct Activator<'a, C> {
  layout: &'a SyncLayout,
  copier: C,
}

impl<'a, C: AssetCopier> Activator<'a, C> {
  /// Create an activator copying with `copier` according to `layout`.
  pub fn new(layout: &'a SyncLayout, copier: C) -> Self {
    Self { layout, copier }
  }

  /// Activate `entry`.
  ///
  /// Simulated runs go through the same checks as committed ones and stop right before
  /// the copy. The entry is only modified once the copy has succeeded.
  pub fn activate(
    &self,
    entry: &mut AssetEntry,
    mode: RunMode,
  ) -> Result<Outcome, ActivationError> {
    if entry.active {
      debug!(name = %entry.name, "already active");
      return Ok(Outcome::AlreadyActive);
    }

    let source = self.layout.source_path(&entry.stored_file);
    let Some(bytes) = source_size(&source) else {
      warn!(name = %entry.name, source = %source.display(), "source file not found");
      return Ok(Outcome::SourceMissing { source });
    };

    if mode.is_simulate() {
      debug!(name = %entry.name, bytes, "would activate");
      return Ok(Outcome::Activated { bytes });
    }

    let destination = self.layout.served_path(&entry.stored_file);
    if let Err(source_err) = self.copier.copy(&source, &destination) {
      warn!(name = %entry.name, error = %source_err, "copy failed");
      return Err(ActivationError::Copy {
        from: source,
        to: destination,
        source: source_err,
      });
    }

    entry.active = true;
    entry.public_ref = Some(self.layout.public_ref(&entry.stored_file));
    info!(name = %entry.name, file = %entry.stored_file, "activated");
    Ok(Outcome::Activated { bytes })
  }
}

fn source_size(path: &Path) -> Option<u64> {
  fs::metadata(path)
    .ok()
    .filter(|metadata| metadata.is_file())
    .map(|metadata| metadata.len())
}

fn install_served_asset(source: &Path, destination: &Path) -> io::Result<()> {
  let parent = match destination.parent() {
    Some(parent) if !parent.as_os_str().is_empty() => parent,
    _ => Path::new("."),
  };
  fs::create_dir_all(parent)?;

  if destination.exists() && is_same_file(source, destination)? {
    return Ok(());
  }

  // Stage next to the destination so a failed copy never leaves a truncated file behind.
  let metadata = fs::metadata(source)?;
  let mut reader = fs::File::open(source)?;
  let mut staged = NamedTempFile::new_in(parent)?;
  io::copy(&mut reader, &mut staged)?;
  if let Err(err) = preserve_modified_time(staged.as_file(), &metadata) {
    debug!(destination = %destination.display(), error = %err, "could not carry over mtime");
  }
  staged.as_file().sync_all()?;
  fs::set_permissions(staged.path(), metadata.permissions())?;

  staged.persist(destination).map_err(|err| err.error)?;
  Ok(())
}

fn preserve_modified_time(file: &fs::File, source: &fs::Metadata) -> io::Result<()> {
  file.set_modified(source.modified()?)
}

#[cfg(test)]
mod tests {
  use super::*;
  use std::cell::Cell;
  use std::time::{Duration, SystemTime};
  use tempfile::{TempDir, tempdir};

  struct Fixture {
    _temp: TempDir,
    layout: SyncLayout,
  }

  fn fixture() -> Fixture {
    let temp = tempdir().expect("failed to create temp dir");
    let source_root = temp.path().join("source");
    fs::create_dir_all(&source_root).unwrap();
    let layout = SyncLayout {
      manifest_path: temp.path().join("served/_exercise_manifest.json"),
      served_dir: temp.path().join("served"),
      source_root,
      public_prefix: "/served".into(),
      source_prefix: "as_".into(),
    };
    Fixture {
      _temp: temp,
      layout,
    }
  }

  #[derive(Default)]
  struct CountingCopier {
    calls: Cell<usize>,
  }

  impl AssetCopier for CountingCopier {
    fn copy(&self, source: &Path, destination: &Path) -> io::Result<()> {
      self.calls.set(self.calls.get() + 1);
      FsCopier.copy(source, destination)
    }
  }

  struct FailingCopier;

  impl AssetCopier for FailingCopier {
    fn copy(&self, _source: &Path, _destination: &Path) -> io::Result<()> {
      Err(io::Error::new(io::ErrorKind::PermissionDenied, "read-only"))
    }
  }

  fn archer() -> AssetEntry {
    AssetEntry::new("Archer Pull-Up", "Back", "as_archer.gif")
  }

  #[test]
  fn commit_copies_and_activates() {
    let fx = fixture();
    fs::write(fx.layout.source_root.join("archer.gif"), b"GIF89a").unwrap();
    let copier = CountingCopier::default();
    let activator = Activator::new(&fx.layout, &copier);

    let mut entry = archer();
    let outcome = activator.activate(&mut entry, RunMode::Commit).unwrap();

    assert_eq!(outcome, Outcome::Activated { bytes: 6 });
    assert!(entry.active);
    assert_eq!(entry.public_ref.as_deref(), Some("/served/as_archer.gif"));
    assert_eq!(copier.calls.get(), 1);
    assert_eq!(
      fs::read(fx.layout.served_dir.join("as_archer.gif")).unwrap(),
      b"GIF89a"
    );
  }

  #[test]
  fn already_active_entries_are_left_alone() {
    let fx = fixture();
    let copier = CountingCopier::default();
    let activator = Activator::new(&fx.layout, &copier);

    let mut entry = archer().with_public_ref("/served/as_archer.gif");
    let before = entry.clone();
    let outcome = activator.activate(&mut entry, RunMode::Commit).unwrap();

    assert_eq!(outcome, Outcome::AlreadyActive);
    assert_eq!(entry, before);
    assert_eq!(copier.calls.get(), 0);
  }

  #[test]
  fn missing_source_is_reported_without_changes() {
    let fx = fixture();
    let copier = CountingCopier::default();
    let activator = Activator::new(&fx.layout, &copier);

    let mut entry = archer();
    let outcome = activator.activate(&mut entry, RunMode::Commit).unwrap();

    assert_eq!(outcome, Outcome::SourceMissing {
      source: fx.layout.source_root.join("archer.gif")
    });
    assert_eq!(entry, archer());
    assert_eq!(copier.calls.get(), 0);
  }

  #[test]
  fn directory_in_place_of_source_counts_as_missing() {
    let fx = fixture();
    fs::create_dir_all(fx.layout.source_root.join("archer.gif")).unwrap();
    let activator = Activator::new(&fx.layout, FsCopier);

    let mut entry = archer();
    let outcome = activator.activate(&mut entry, RunMode::Commit).unwrap();
    assert!(matches!(outcome, Outcome::SourceMissing { .. }));
  }

  #[test]
  fn simulate_matches_commit_classification_without_side_effects() {
    let fx = fixture();
    fs::write(fx.layout.source_root.join("archer.gif"), b"GIF89a").unwrap();
    let copier = CountingCopier::default();
    let activator = Activator::new(&fx.layout, &copier);

    let mut present = archer();
    let mut missing = AssetEntry::new("Hammer Curl", "Biceps", "as_hammer.gif");

    assert_eq!(
      activator.activate(&mut present, RunMode::Simulate).unwrap(),
      Outcome::Activated { bytes: 6 }
    );
    assert!(matches!(
      activator.activate(&mut missing, RunMode::Simulate).unwrap(),
      Outcome::SourceMissing { .. }
    ));
    assert_eq!(present, archer());
    assert_eq!(copier.calls.get(), 0);
    assert!(!fx.layout.served_dir.join("as_archer.gif").exists());
  }

  #[test]
  fn copy_failure_surfaces_as_error_and_keeps_entry_inactive() {
    let fx = fixture();
    fs::write(fx.layout.source_root.join("archer.gif"), b"GIF89a").unwrap();
    let activator = Activator::new(&fx.layout, FailingCopier);

    let mut entry = archer();
    let err = activator.activate(&mut entry, RunMode::Commit).unwrap_err();

    assert!(err.to_string().contains("read-only"));
    assert_eq!(entry, archer());
  }

  #[test]
  fn install_creates_served_dir_and_keeps_mtime() -> io::Result<()> {
    let temp = tempdir()?;
    let source = temp.path().join("archer.gif");
    fs::write(&source, b"GIF89a")?;
    let stamp = SystemTime::UNIX_EPOCH + Duration::from_secs(1_600_000_000);
    fs::OpenOptions::new()
      .write(true)
      .open(&source)?
      .set_modified(stamp)?;

    let destination = temp.path().join("public/gifs/as_archer.gif");
    install_served_asset(&source, &destination)?;

    assert_eq!(fs::read(&destination)?, b"GIF89a");
    assert_eq!(fs::metadata(&destination)?.modified()?, stamp);
    Ok(())
  }

  #[test]
  fn install_replaces_existing_file_without_leftovers() -> io::Result<()> {
    let temp = tempdir()?;
    let source = temp.path().join("archer.gif");
    fs::write(&source, b"GIF89a-new")?;
    let served = temp.path().join("served");
    fs::create_dir_all(&served)?;
    fs::write(served.join("as_archer.gif"), b"stale")?;

    install_served_asset(&source, &served.join("as_archer.gif"))?;

    assert_eq!(fs::read(served.join("as_archer.gif"))?, b"GIF89a-new");
    assert_eq!(fs::read_dir(&served)?.count(), 1);
    Ok(())
  }

  #[test]
  fn failed_install_leaves_no_partial_file() -> io::Result<()> {
    let temp = tempdir()?;
    // Opening a directory succeeds but reading from it fails.
    let source = temp.path().join("not-a-file");
    fs::create_dir_all(&source)?;
    let served = temp.path().join("served");

    assert!(install_served_asset(&source, &served.join("as_archer.gif")).is_err());
    assert_eq!(fs::read_dir(&served)?.count(), 0);
    Ok(())
  }

  #[test]
  fn install_skips_copy_onto_itself() -> io::Result<()> {
    let temp = tempdir()?;
    let source = temp.path().join("archer.gif");
    fs::write(&source, b"GIF89a")?;

    install_served_asset(&source, &source)?;
    assert_eq!(fs::read(&source)?, b"GIF89a");
    Ok(())
  }
}
