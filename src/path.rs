// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Generic read/write access to nested values by string path.
//!
//! Paths are dot-separated; a segment of the form `[<integer>]` indexes into
//! a sequence instead of naming a mapping key. Traversal operates on
//! [`serde_json::Value`], so any `Serialize` domain object can be addressed
//! after conversion with [`serde_json::to_value`].
//!
//! # Examples
//!
//! ```
//! use serde_json::json;
//! use tradsync::path;
//!
//! let root = json!({ "a": { "b": [ { "c": 5 } ] } });
//! let value = path::resolve(&root, "a.b.[0].c").unwrap();
//! assert_eq!(value, &json!(5));
//! ```

use serde_json::Value;

use crate::error::PathError;

/// A single parsed path segment.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Segment {
    /// A mapping key.
    Name(String),
    /// An index into a sequence, written `[<integer>]`.
    Index(usize),
}

impl Segment {
    fn parse(raw: &str) -> Self {
        if let Some(inner) = raw.strip_prefix('[').and_then(|s| s.strip_suffix(']'))
            && let Ok(index) = inner.parse::<usize>()
        {
            return Self::Index(index);
        }
        Self::Name(raw.to_string())
    }

    fn describe(&self) -> String {
        match self {
            Self::Name(name) => name.clone(),
            Self::Index(index) => format!("[{index}]"),
        }
    }
}

/// Splits a path into its typed segments.
///
/// # Examples
///
/// ```
/// use tradsync::path::{parse, Segment};
///
/// let segments = parse("lightList.[0].dimmer");
/// assert_eq!(segments[1], Segment::Index(0));
/// ```
#[must_use]
pub fn parse(path: &str) -> Vec<Segment> {
    path.split('.').map(Segment::parse).collect()
}

/// Resolves the value at `path` inside `root`.
///
/// The traversal fails the moment an intermediate value is absent or null;
/// a null *final* value is returned as-is.
///
/// # Errors
///
/// Returns [`PathError::NotFound`] if any segment cannot be traversed, or
/// [`PathError::Empty`] for an empty path.
pub fn resolve<'a>(root: &'a Value, path: &str) -> Result<&'a Value, PathError> {
    if path.is_empty() {
        return Err(PathError::Empty);
    }
    let mut current = root;
    for segment in parse(path) {
        let child = match (&segment, current) {
            (Segment::Name(name), Value::Object(map)) => map.get(name),
            (Segment::Index(index), Value::Array(seq)) => seq.get(*index),
            _ => None,
        };
        current = child.ok_or_else(|| PathError::NotFound {
            path: path.to_string(),
            segment: segment.describe(),
        })?;
    }
    Ok(current)
}

/// Assigns `value` at `path` inside `root`.
///
/// All but the final segment must already exist; the final segment is
/// assigned (inserting a new mapping key if necessary, but never extending
/// a sequence).
///
/// # Errors
///
/// Returns [`PathError::NotFound`] if an intermediate segment cannot be
/// traversed, or if the final segment targets an out-of-bounds sequence
/// index or a non-container value.
pub fn write(root: &mut Value, path: &str, value: Value) -> Result<(), PathError> {
    if path.is_empty() {
        return Err(PathError::Empty);
    }
    let not_found = |segment: &Segment| PathError::NotFound {
        path: path.to_string(),
        segment: segment.describe(),
    };

    let segments = parse(path);
    let (last, intermediate) = segments.split_last().ok_or(PathError::Empty)?;

    let mut current = root;
    for segment in intermediate {
        let child = match (segment, current) {
            (Segment::Name(name), Value::Object(map)) => map.get_mut(name),
            (Segment::Index(index), Value::Array(seq)) => seq.get_mut(*index),
            _ => None,
        };
        current = child.ok_or_else(|| not_found(segment))?;
    }

    match (last, current) {
        (Segment::Name(name), Value::Object(map)) => {
            map.insert(name.clone(), value);
            Ok(())
        }
        (Segment::Index(index), Value::Array(seq)) => {
            let slot = seq.get_mut(*index).ok_or_else(|| not_found(last))?;
            *slot = value;
            Ok(())
        }
        _ => Err(not_found(last)),
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn parse_mixed_segments() {
        let segments = parse("a.b.[0].c");
        assert_eq!(
            segments,
            vec![
                Segment::Name("a".to_string()),
                Segment::Name("b".to_string()),
                Segment::Index(0),
                Segment::Name("c".to_string()),
            ]
        );
    }

    #[test]
    fn parse_malformed_index_is_a_name() {
        // "[x]" does not parse as an integer, so it stays a mapping key.
        assert_eq!(parse("[x]"), vec![Segment::Name("[x]".to_string())]);
    }

    #[test]
    fn resolve_nested_index() {
        let root = json!({ "a": { "b": [ { "c": 5 } ] } });
        assert_eq!(resolve(&root, "a.b.[0].c").unwrap(), &json!(5));
    }

    #[test]
    fn resolve_top_level() {
        let root = json!({ "alive": true });
        assert_eq!(resolve(&root, "alive").unwrap(), &json!(true));
    }

    #[test]
    fn resolve_null_final_value() {
        let root = json!({ "a": null });
        assert_eq!(resolve(&root, "a").unwrap(), &Value::Null);
    }

    #[test]
    fn resolve_missing_key() {
        let root = json!({ "a": { "b": 1 } });
        let err = resolve(&root, "a.c").unwrap_err();
        assert_eq!(
            err,
            PathError::NotFound {
                path: "a.c".to_string(),
                segment: "c".to_string(),
            }
        );
    }

    #[test]
    fn resolve_null_intermediate() {
        let root = json!({ "a": null });
        let err = resolve(&root, "a.b").unwrap_err();
        assert!(matches!(err, PathError::NotFound { .. }));
    }

    #[test]
    fn resolve_index_out_of_bounds() {
        let root = json!({ "a": [1, 2] });
        assert!(resolve(&root, "a.[2]").is_err());
    }

    #[test]
    fn resolve_empty_path() {
        let root = json!({});
        assert_eq!(resolve(&root, "").unwrap_err(), PathError::Empty);
    }

    #[test]
    fn write_nested_value() {
        let mut root = json!({ "a": { "b": 1, "keep": true } });
        write(&mut root, "a.b", json!(5)).unwrap();
        assert_eq!(root, json!({ "a": { "b": 5, "keep": true } }));
    }

    #[test]
    fn write_inserts_new_key() {
        let mut root = json!({ "a": {} });
        write(&mut root, "a.b", json!(5)).unwrap();
        assert_eq!(root, json!({ "a": { "b": 5 } }));
    }

    #[test]
    fn write_sequence_index() {
        let mut root = json!({ "a": [1, 2, 3] });
        write(&mut root, "a.[1]", json!(9)).unwrap();
        assert_eq!(root, json!({ "a": [1, 9, 3] }));
    }

    #[test]
    fn write_missing_intermediate() {
        let mut root = json!({ "a": {} });
        let err = write(&mut root, "a.b.c", json!(1)).unwrap_err();
        assert_eq!(
            err,
            PathError::NotFound {
                path: "a.b.c".to_string(),
                segment: "b".to_string(),
            }
        );
    }

    #[test]
    fn write_does_not_extend_sequences() {
        let mut root = json!({ "a": [1] });
        assert!(write(&mut root, "a.[3]", json!(2)).is_err());
    }
}
