use std::path::PathBuf;

/// Errors raised while reading or writing the manifest file.
#[derive(Debug)]
pub enum ManifestError {
  /// The manifest file could not be read.
  Unreadable {
    /// Path that caused the error.
    path: PathBuf,
    /// Source I/O error.
    source: std::io::Error,
  },
  /// The manifest file is not valid JSON.
  Parse {
    /// Path that caused the error.
    path: PathBuf,
    /// Source parse error.
    source: serde_json::Error,
  },
  /// The manifest is valid JSON but does not match the entry schema.
  Invalid {
    /// Path that caused the error.
    path: PathBuf,
    /// Description of the violation, naming the offending entry.
    reason: String,
  },
  /// The updated manifest could not be written.
  Unwritable {
    /// Path that caused the error.
    path: PathBuf,
    /// Source I/O error.
    source: std::io::Error,
  },
}

impl std::fmt::Display for ManifestError {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Self::Unreadable { path, source } => {
        write!(f, "failed to read manifest {}: {}", path.display(), source)
      }
      Self::Parse { path, source } => {
        write!(f, "failed to parse manifest {}: {}", path.display(), source)
      }
      Self::Invalid { path, reason } => {
        write!(f, "invalid manifest {}: {}", path.display(), reason)
      }
      Self::Unwritable { path, source } => {
        write!(f, "failed to write manifest {}: {}", path.display(), source)
      }
    }
  }
}

impl std::error::Error for ManifestError {
  fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
    match self {
      Self::Unreadable { source, .. } | Self::Unwritable { source, .. } => Some(source),
      Self::Parse { source, .. } => Some(source),
      Self::Invalid { .. } => None,
    }
  }
}
