// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The entry model of the external state tree.
//!
//! An [`Entry`] is one node of the tree: an id, a kind, a display schema
//! (what a frontend needs to render the value) and a technical schema
//! (the optional path binding plus free-form extra data).

use std::collections::BTreeMap;
use std::fmt;

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};

/// The kind of a tree node.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryKind {
    /// Root node for a physical device.
    Device,
    /// Root node for a group.
    Group,
    /// Grouping node below a device root.
    Channel,
    /// Leaf node carrying a value.
    State,
}

/// Value type of a state entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValueType {
    /// Boolean values.
    Boolean,
    /// Numeric values.
    Number,
    /// String values.
    String,
}

/// A string path linking an entry to a field inside a domain object.
///
/// The sentinel [`PathBinding::VIRTUAL`] marks bindings with no real backing
/// field; the sync engine never resolves those.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct PathBinding(String);

impl PathBinding {
    /// The sentinel for bindings without a backing field.
    pub const VIRTUAL: &'static str = "__virtual__";

    /// Creates a binding for the given path.
    #[must_use]
    pub fn new(path: impl Into<String>) -> Self {
        Self(path.into())
    }

    /// Creates the virtual sentinel binding.
    #[must_use]
    pub fn virtual_binding() -> Self {
        Self(Self::VIRTUAL.to_string())
    }

    /// Returns `true` if this binding has no real backing field.
    #[must_use]
    pub fn is_virtual(&self) -> bool {
        self.0 == Self::VIRTUAL
    }

    /// Returns the path string.
    #[must_use]
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for PathBinding {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

/// Display schema of an entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct DisplaySchema {
    /// Display name.
    pub name: String,
    /// Icon file, relative to the adapter's icon directory.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub icon: Option<String>,
    /// Whether the value can be read.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub read: Option<bool>,
    /// Whether the value can be written.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub write: Option<bool>,
    /// Value type of the entry.
    #[serde(rename = "type", skip_serializing_if = "Option::is_none")]
    pub value_type: Option<ValueType>,
    /// Semantic role hint for frontends.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub role: Option<String>,
    /// Lower numeric bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub min: Option<f64>,
    /// Upper numeric bound.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub max: Option<f64>,
    /// Unit of the value.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub unit: Option<String>,
    /// Default value.
    #[serde(rename = "def", skip_serializing_if = "Option::is_none")]
    pub default: Option<Value>,
    /// Human-readable description.
    #[serde(rename = "desc", skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Enumerated choices, value to label.
    #[serde(rename = "states", skip_serializing_if = "Option::is_none")]
    pub choices: Option<BTreeMap<String, String>>,
}

/// Technical schema of an entry.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TechnicalSchema {
    /// Path binding resolved by the sync engine on each pass.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub path: Option<PathBinding>,
    /// Free-form extra data.
    #[serde(flatten)]
    pub extra: Map<String, Value>,
}

impl TechnicalSchema {
    /// Creates a technical schema with only a path binding.
    #[must_use]
    pub fn bound(path: impl Into<String>) -> Self {
        Self {
            path: Some(PathBinding::new(path)),
            extra: Map::new(),
        }
    }

    /// Creates a technical schema with the virtual sentinel binding.
    #[must_use]
    pub fn virtual_bound() -> Self {
        Self {
            path: Some(PathBinding::virtual_binding()),
            extra: Map::new(),
        }
    }
}

/// A node in the external state tree.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Entry {
    /// Tree-unique id.
    pub id: String,
    /// Node kind.
    pub kind: EntryKind,
    /// Display schema.
    pub display: DisplaySchema,
    /// Technical schema.
    pub technical: TechnicalSchema,
}

impl Entry {
    /// Returns the non-virtual path binding of this entry, if any.
    #[must_use]
    pub fn bound_path(&self) -> Option<&PathBinding> {
        self.technical.path.as_ref().filter(|p| !p.is_virtual())
    }

    /// Merges a patch into this entry's sections.
    pub fn apply_patch(&mut self, patch: &EntryPatch) {
        self.display = merge_section(&self.display, &patch.display);
        self.technical = merge_section(&self.technical, &patch.technical);
    }
}

/// A partial update over an entry's sections, carrying only changed fields.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct EntryPatch {
    /// Changed display fields.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub display: Map<String, Value>,
    /// Changed technical fields.
    #[serde(default, skip_serializing_if = "Map::is_empty")]
    pub technical: Map<String, Value>,
}

impl EntryPatch {
    /// Computes the shallow field-level difference between a stored entry's
    /// sections and freshly computed ones.
    ///
    /// Only fields whose fresh value differs from the stored value appear in
    /// the patch; fields present in the stored sections but absent from the
    /// fresh ones are left untouched (merge semantics, no removal).
    #[must_use]
    pub fn between(stored: &Entry, display: &DisplaySchema, technical: &TechnicalSchema) -> Self {
        Self {
            display: shallow_diff(&to_map(&stored.display), &to_map(display)),
            technical: shallow_diff(&to_map(&stored.technical), &to_map(technical)),
        }
    }

    /// Returns `true` if the patch changes nothing.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.display.is_empty() && self.technical.is_empty()
    }
}

fn to_map<T: Serialize>(section: &T) -> Map<String, Value> {
    // Safe: both section types serialize to JSON objects
    match serde_json::to_value(section) {
        Ok(Value::Object(map)) => map,
        _ => Map::new(),
    }
}

fn shallow_diff(stored: &Map<String, Value>, fresh: &Map<String, Value>) -> Map<String, Value> {
    fresh
        .iter()
        .filter(|(key, value)| stored.get(*key) != Some(value))
        .map(|(key, value)| (key.clone(), value.clone()))
        .collect()
}

fn merge_section<T>(section: &T, patch: &Map<String, Value>) -> T
where
    T: Serialize + serde::de::DeserializeOwned + Clone,
{
    if patch.is_empty() {
        return section.clone();
    }
    let mut map = to_map(section);
    for (key, value) in patch {
        map.insert(key.clone(), value.clone());
    }
    // Safe: the patch was produced from a section of the same type, so the
    // merged map deserializes back into it
    serde_json::from_value(Value::Object(map)).unwrap_or_else(|_| section.clone())
}
