//! Package Manifest Merging
//!
//! Folds any number of `package.xml` deployment manifests into a single
//! canonical manifest: members are unioned per metadata type, the highest
//! API version wins, and everything is emitted in sorted order.

pub mod aggregate;
pub mod collector;
pub mod document;
pub mod error;
pub mod manifest;
pub mod xml;

pub use aggregate::{merge, merge_sources, AggregateState, DESCRIPTION_HEADER, MERGED_PACKAGE_NAME};
pub use collector::{find_manifests, load_sources, SourceDocument, DEFAULT_MANIFEST_FILE};
pub use document::Document;
pub use error::{CodecError, CollectError, LoadError, MalformedTypeRecord, MergeError, SkipReason};
pub use manifest::{is_valid_manifest, ApiVersion, OneOrMany, TypeRecord};
pub use xml::{parse_document, render_document};
