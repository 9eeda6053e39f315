//! Manifest Shape
//!
//! Classifies parsed documents as usable package manifests and flattens
//! their loose single-vs-sequence fields into canonical form.

pub mod normalize;
pub mod validate;
pub mod version;

pub use normalize::{normalize_members, normalize_types, OneOrMany, TypeRecord};
pub use validate::{classify, is_valid_manifest, ValidManifest};
pub use version::ApiVersion;
