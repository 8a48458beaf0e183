//! Manifest store: the only reader and writer of the on-disk activation state.

mod error;
mod json_format;
mod store;
mod validation;

pub use error::ManifestError;
pub use store::{JsonManifestStore, ManifestStore, parse_manifest, render_manifest};
pub use validation::validate_entries;
