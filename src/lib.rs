#![doc = include_str!("../README.md")]
#![warn(missing_docs)]

pub mod activator;
pub mod asset_paths;
pub mod config;
pub mod layout;
pub mod manifest;
pub mod models;
pub mod report;
pub mod runner;
pub mod selection;

pub use activator::{ActivationError, Activator, AssetCopier, FsCopier};
pub use config::ProjectConfig;
pub use layout::SyncLayout;
pub use manifest::{JsonManifestStore, ManifestError, ManifestStore};
pub use models::{AssetEntry, Outcome, RunMode};
pub use report::{ActivationSummary, GroupListing, ManifestStats};
pub use runner::{ActivationRunner, RunError, RunReport};
pub use selection::{NoMatch, Selection};
