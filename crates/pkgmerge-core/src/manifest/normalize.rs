//! Normalizer
//!
//! `<types>` and `<members>` parse to a bare value when they occur once and
//! to a sequence when they repeat. Everything downstream sees sequences.

use serde_json::{json, Value};
use tracing::warn;

use crate::document::{text_of, MEMBERS_KEY, TYPE_NAME_KEY};
use crate::error::MalformedTypeRecord;

/// A field that may hold one value or a sequence of them
#[derive(Debug, Clone, PartialEq)]
pub enum OneOrMany<T> {
    One(T),
    Many(Vec<T>),
}

impl<T> OneOrMany<T> {
    pub fn into_vec(self) -> Vec<T> {
        match self {
            OneOrMany::One(item) => vec![item],
            OneOrMany::Many(items) => items,
        }
    }
}

impl<'a> OneOrMany<&'a Value> {
    pub fn from_value(value: &'a Value) -> Self {
        match value {
            Value::Array(items) => OneOrMany::Many(items.iter().collect()),
            other => OneOrMany::One(other),
        }
    }
}

/// One metadata type with its members, as read from or written to a manifest
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TypeRecord {
    pub members: Vec<String>,
    pub name: String,
}

impl TypeRecord {
    pub fn from_value(value: &Value) -> Result<Self, MalformedTypeRecord> {
        let Value::Object(record) = value else {
            return Err(MalformedTypeRecord::NotRecord);
        };

        let name = record
            .get(TYPE_NAME_KEY)
            .and_then(text_of)
            .ok_or(MalformedTypeRecord::MissingName)?;

        let members = match record.get(MEMBERS_KEY) {
            None | Some(Value::Null) => {
                return Err(MalformedTypeRecord::MissingMembers(name.to_string()))
            }
            Some(raw) => normalize_members(raw),
        };
        if members.is_empty() {
            return Err(MalformedTypeRecord::MissingMembers(name.to_string()));
        }

        Ok(Self {
            members: members.into_iter().map(str::to_string).collect(),
            name: name.to_string(),
        })
    }

    /// Canonical document form: `members` always a sequence, listed before `name`
    pub fn into_value(self) -> Value {
        json!({
            MEMBERS_KEY: self.members,
            TYPE_NAME_KEY: self.name,
        })
    }
}

/// Wrap a lone type record into a one-element sequence.
pub fn normalize_types(raw: &Value) -> Vec<&Value> {
    OneOrMany::from_value(raw).into_vec()
}

/// Wrap a lone member into a one-element sequence.
///
/// Entries without text (empty `<members/>` elements) are dropped.
pub fn normalize_members(raw: &Value) -> Vec<&str> {
    OneOrMany::from_value(raw)
        .into_vec()
        .into_iter()
        .filter_map(|member| {
            let text = text_of(member);
            if text.is_none() {
                warn!("Ignoring member without text: {}", member);
            }
            text
        })
        .collect()
}
