// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Deterministic id derivation for devices, groups and scenes.
//!
//! Root entry ids are pure functions of the namespace, the instance id and
//! the device or group type: `<namespace>.<prefix>-<instanceId>`. Group ids
//! zero-pad the instance id to five digits so they sort stably.

use crate::types::{Accessory, AccessoryType, GroupLike, Scene};

/// Returns the root-relative name of a device: `<prefix>-<instanceId>`.
///
/// The prefix is `RC` for remotes and `L` for lightbulbs. Any other type
/// logs a warning and falls back to the generic prefix `XYZ` rather than
/// failing.
#[must_use]
pub fn device_name(accessory: &Accessory) -> String {
    let prefix = match accessory.accessory_type {
        AccessoryType::Remote => "RC",
        AccessoryType::Lightbulb => "L",
        other => {
            tracing::warn!(
                accessory_type = other.as_str(),
                instance_id = accessory.instance_id,
                "unknown accessory type, using generic prefix"
            );
            "XYZ"
        }
    };
    format!("{prefix}-{}", accessory.instance_id)
}

/// Returns the full id of a device root entry.
#[must_use]
pub fn device_id(namespace: &str, accessory: &Accessory) -> String {
    format!("{namespace}.{}", device_name(accessory))
}

/// Returns the root-relative name of a group: `<G|VG>-<padded instanceId>`.
#[must_use]
pub fn group_name(group: &GroupLike) -> String {
    let prefix = match group {
        GroupLike::Real(_) => "G",
        GroupLike::Virtual(_) => "VG",
    };
    format!("{prefix}-{:05}", group.instance_id())
}

/// Returns the full id of a group root entry.
#[must_use]
pub fn group_id(namespace: &str, group: &GroupLike) -> String {
    format!("{namespace}.{}", group_name(group))
}

/// Returns the root-relative name of a scene: `S-<instanceId>`.
#[must_use]
pub fn scene_name(scene: &Scene) -> String {
    format!("S-{}", scene.instance_id)
}

/// Returns the full id of a scene entry.
#[must_use]
pub fn scene_id(namespace: &str, scene: &Scene) -> String {
    format!("{namespace}.{}", scene_name(scene))
}

/// Extracts the root entry id from a state or entry id.
///
/// The root is the prefix up to and including the first `<prefix>-<digits>`
/// segment, e.g. `tradfri.0.L-65537` for
/// `tradfri.0.L-65537.lightbulb.brightness`.
#[must_use]
pub fn root_id(id: &str) -> Option<&str> {
    let mut consumed = 0;
    for segment in id.split('.') {
        let end = consumed + segment.len();
        if is_root_segment(segment) {
            return Some(&id[..end]);
        }
        consumed = end + 1;
    }
    None
}

/// Extracts the instance id from a state or entry id.
#[must_use]
pub fn instance_id(id: &str) -> Option<u32> {
    let root = root_id(id)?;
    let (_, digits) = root.rsplit_once('-')?;
    digits.parse().ok()
}

fn is_root_segment(segment: &str) -> bool {
    segment.split_once('-').is_some_and(|(prefix, digits)| {
        !prefix.is_empty()
            && prefix.chars().all(|c| c.is_ascii_alphanumeric() || c == '_')
            && !digits.is_empty()
            && digits.chars().all(|c| c.is_ascii_digit())
    })
}
