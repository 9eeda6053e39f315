//! Error Types
//!
//! Only `MergeError` is fatal to a merge. `SkipReason` and
//! `MalformedTypeRecord` describe input the aggregator recovers from by
//! leaving it out.

use std::path::PathBuf;

/// Fatal merge failures surfaced to the caller
#[derive(Debug, thiserror::Error)]
pub enum MergeError {
    #[error("no valid package manifests among {inspected} input(s)")]
    NoValidInput { inspected: usize },
}

/// Why a whole document was left out of the aggregate
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SkipReason {
    #[error("missing <Package> root element")]
    MissingRoot,

    #[error("<Package> root has no child elements")]
    RootNotRecord,

    #[error("missing <version> element")]
    MissingVersion,

    #[error("missing <types> element")]
    MissingTypes,

    #[error("version {0:?} is not a decimal number")]
    UnparseableVersion(String),
}

/// Why a single `<types>` entry was left out
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum MalformedTypeRecord {
    #[error("type entry is not an element with children")]
    NotRecord,

    #[error("type entry has no <name>")]
    MissingName,

    #[error("type {0:?} has no <members>")]
    MissingMembers(String),
}

/// XML parse / render failures
#[derive(Debug, thiserror::Error)]
pub enum CodecError {
    #[error("XML error: {0}")]
    Xml(#[from] quick_xml::Error),

    #[error("XML attribute error: {0}")]
    Attribute(#[from] quick_xml::events::attributes::AttrError),

    #[error("XML escape error: {0}")]
    Escape(#[from] quick_xml::escape::EscapeError),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("output is not valid UTF-8: {0}")]
    Utf8(#[from] std::string::FromUtf8Error),

    #[error("document has no root element")]
    NoRoot,

    #[error("more than one root element (second is <{0}>)")]
    MultipleRoots(String),

    #[error("unexpected closing tag </{0}>")]
    UnbalancedClose(String),

    #[error("unclosed element <{0}>")]
    Unclosed(String),

    #[error("document must be a mapping with exactly one root element")]
    NotRenderable,
}

/// Failures walking the source tree
#[derive(Debug, thiserror::Error)]
pub enum CollectError {
    #[error("failed to read directory {path:?}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Per-file load failures; the collector logs these and moves on
#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),

    #[error("manifest file too large ({0} bytes)")]
    TooLarge(u64),

    #[error(transparent)]
    Codec(#[from] CodecError),
}
