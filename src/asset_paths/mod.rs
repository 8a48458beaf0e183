//! Helpers translating stored asset file names into source names and public references.
//!
//! The responsibilities are split into focused submodules so the naming convention for the
//! source tree, the public reference derivation and the file-name validation used when the
//! manifest is loaded can be tested independently.

mod filters;
mod public;
mod source;

pub use filters::is_plain_file_name;
pub use public::make_public_ref;
pub use source::source_name;
