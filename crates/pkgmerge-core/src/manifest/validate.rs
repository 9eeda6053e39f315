//! Validator
//!
//! Decides whether a parsed document is a package manifest the aggregator
//! can use. Rejection is an expected outcome, not an error for the batch.

use serde_json::Value;

use super::version::ApiVersion;
use crate::document::{text_of, Document, DESCRIPTION_KEY, NAME_KEY, ROOT_KEY, TYPES_KEY, VERSION_KEY};
use crate::error::SkipReason;

/// Borrowed view of a document that passed validation
#[derive(Debug, Clone)]
pub struct ValidManifest<'a> {
    pub name: Option<&'a str>,
    pub description: Option<&'a str>,
    pub version: ApiVersion,
    pub types: &'a Value,
}

pub fn is_valid_manifest(doc: &Document) -> bool {
    classify(doc).is_ok()
}

/// Validate `doc` and extract the fields the merge reads.
pub fn classify(doc: &Document) -> Result<ValidManifest<'_>, SkipReason> {
    let root = doc.get(ROOT_KEY).ok_or(SkipReason::MissingRoot)?;
    let Value::Object(root) = root else {
        return Err(SkipReason::RootNotRecord);
    };

    let version = root
        .get(VERSION_KEY)
        .and_then(text_of)
        .ok_or(SkipReason::MissingVersion)?;
    let types = root.get(TYPES_KEY).ok_or(SkipReason::MissingTypes)?;
    let version = version.parse::<ApiVersion>()?;

    Ok(ValidManifest {
        name: root.get(NAME_KEY).and_then(text_of),
        description: root.get(DESCRIPTION_KEY).and_then(text_of),
        version,
        types,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn test_valid_manifest() {
        let doc = json!({"Package": {
            "@xmlns": "http://soap.sforce.com/2006/04/metadata",
            "fullName": "core",
            "types": {"members": "Foo", "name": "ApexClass"},
            "version": "58.0"
        }});
        let manifest = classify(&doc).unwrap();
        assert_eq!(manifest.name, Some("core"));
        assert_eq!(manifest.description, None);
        assert_eq!(manifest.version, "58".parse::<ApiVersion>().unwrap());
        assert!(is_valid_manifest(&doc));
    }

    #[test]
    fn test_missing_root() {
        assert_eq!(classify(&json!({"CustomObject": {}})).unwrap_err(), SkipReason::MissingRoot);
        assert_eq!(classify(&json!("text")).unwrap_err(), SkipReason::MissingRoot);
    }

    #[test]
    fn test_root_not_record() {
        assert_eq!(classify(&json!({"Package": null})).unwrap_err(), SkipReason::RootNotRecord);
        assert_eq!(classify(&json!({"Package": "x"})).unwrap_err(), SkipReason::RootNotRecord);
    }

    #[test]
    fn test_missing_fields() {
        let no_version = json!({"Package": {"types": {"members": "Foo", "name": "ApexClass"}}});
        assert_eq!(classify(&no_version).unwrap_err(), SkipReason::MissingVersion);
        assert!(!is_valid_manifest(&no_version));

        let empty_version = json!({"Package": {"types": [], "version": null}});
        assert_eq!(classify(&empty_version).unwrap_err(), SkipReason::MissingVersion);

        let no_types = json!({"Package": {"version": "58.0"}});
        assert_eq!(classify(&no_types).unwrap_err(), SkipReason::MissingTypes);
    }

    #[test]
    fn test_unparseable_version() {
        let doc = json!({"Package": {"types": [], "version": "latest"}});
        assert_eq!(
            classify(&doc).unwrap_err(),
            SkipReason::UnparseableVersion("latest".to_string())
        );
    }
}
