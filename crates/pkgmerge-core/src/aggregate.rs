//! Aggregator
//!
//! Folds a batch of manifests into one. Each valid document contributes its
//! types and members (set union), its version (numeric maximum) and its
//! name (provenance). The first valid document doubles as the template for
//! the output, so fields the merge does not own pass through untouched.

use std::collections::{BTreeMap, BTreeSet};
use std::fmt;

use serde_json::Value;
use tracing::{debug, info, warn};

use crate::collector::SourceDocument;
use crate::document::{Document, DESCRIPTION_KEY, NAME_KEY, ROOT_KEY, TYPES_KEY, VERSION_KEY};
use crate::error::MergeError;
use crate::manifest::{classify, normalize_types, ApiVersion, TypeRecord, ValidManifest};

/// `fullName` given to every merged manifest
pub const MERGED_PACKAGE_NAME: &str = "Merged_Package";

/// Leading text of a merged manifest's description; source names follow, one per line
pub const DESCRIPTION_HEADER: &str =
    "This package.xml was created by merging the following packages:\n";

/// Running state of a merge
#[derive(Debug, Clone, Default)]
pub struct AggregateState {
    /// Type name → members; BTree keeps both levels in code-point order
    type_members: BTreeMap<String, BTreeSet<String>>,
    max_version: Option<ApiVersion>,
    /// In processing order until `finish`
    source_names: Vec<String>,
    template: Option<Document>,
    inspected: usize,
}

impl AggregateState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fold one document into the state.
    ///
    /// Invalid documents leave the state unchanged apart from the count of
    /// inspected inputs.
    pub fn absorb(mut self, origin: impl fmt::Display, doc: &Document) -> Self {
        self.inspected += 1;

        let manifest = match classify(doc) {
            Ok(manifest) => manifest,
            Err(reason) => {
                info!("{} is not a valid package manifest ({}). Skipping.", origin, reason);
                return self;
            }
        };

        info!("Processing {}", origin);

        match provenance(&manifest) {
            Some(names) => self.source_names.extend(names.into_iter().map(str::to_string)),
            None => warn!("{} has no <fullName>; it will not be listed as a source", origin),
        }

        self.max_version = Some(match self.max_version.take() {
            Some(current) => current.max(manifest.version),
            None => manifest.version,
        });

        if self.template.is_none() {
            self.template = Some(doc.clone());
        }

        for raw in normalize_types(manifest.types) {
            match TypeRecord::from_value(raw) {
                Ok(record) => {
                    debug!(type_name = %record.name, members = record.members.len(), "Adding members");
                    self.type_members
                        .entry(record.name)
                        .or_default()
                        .extend(record.members);
                }
                Err(e) => warn!("{}: skipping type entry: {}", origin, e),
            }
        }

        self
    }

    /// Render the merged manifest.
    pub fn finish(self) -> Result<Document, MergeError> {
        let AggregateState {
            type_members,
            max_version,
            mut source_names,
            template,
            inspected,
        } = self;

        let (Some(mut output), Some(max_version)) = (template, max_version) else {
            return Err(MergeError::NoValidInput { inspected });
        };

        source_names.sort();

        let types: Vec<Value> = type_members
            .into_iter()
            .map(|(name, members)| {
                TypeRecord {
                    members: members.into_iter().collect(),
                    name,
                }
                .into_value()
            })
            .collect();

        if let Some(root) = output.get_mut(ROOT_KEY).and_then(Value::as_object_mut) {
            root.insert(NAME_KEY.to_string(), Value::from(MERGED_PACKAGE_NAME));
            root.insert(
                DESCRIPTION_KEY.to_string(),
                Value::from(format!("{}{}", DESCRIPTION_HEADER, source_names.join("\n"))),
            );
            root.insert(VERSION_KEY.to_string(), Value::from(max_version.to_one_decimal()));
            root.insert(TYPES_KEY.to_string(), Value::Array(types));
        }

        info!(
            "Merging complete. Package created from packages:\n{}",
            source_names.join("\n")
        );
        Ok(output)
    }
}

/// Source names a valid manifest contributes.
///
/// A manifest produced by an earlier merge contributes the names it lists
/// rather than its own fixed name.
fn provenance<'a>(manifest: &ValidManifest<'a>) -> Option<Vec<&'a str>> {
    let name = manifest.name?;
    if name == MERGED_PACKAGE_NAME {
        if let Some(listed) = manifest
            .description
            // XML text is trimmed on parse, so the header may have lost its newline
            .and_then(|d| d.strip_prefix(DESCRIPTION_HEADER.trim_end()))
        {
            return Some(listed.lines().filter(|line| !line.is_empty()).collect());
        }
    }
    Some(vec![name])
}

/// Merge in-memory documents, in order.
pub fn merge(documents: &[Document]) -> Result<Document, MergeError> {
    documents
        .iter()
        .enumerate()
        .fold(AggregateState::new(), |state, (index, doc)| {
            state.absorb(format_args!("input[{}]", index), doc)
        })
        .finish()
}

/// Merge documents loaded from disk, in order.
pub fn merge_sources(sources: &[SourceDocument]) -> Result<Document, MergeError> {
    sources
        .iter()
        .fold(AggregateState::new(), |state, source| {
            state.absorb(source.path.display(), &source.document)
        })
        .finish()
}
