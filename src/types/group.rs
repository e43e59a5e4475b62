// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Group, virtual group and scene read models.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// A gateway-native group of accessories.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Group {
    /// Gateway-assigned instance id.
    pub instance_id: u32,
    /// Display name.
    pub name: String,
    /// Instance ids of member devices.
    #[serde(rename = "deviceIDs")]
    pub device_ids: Vec<u32>,
    /// Whether the group is switched on.
    pub on_off: bool,
    /// Aggregate brightness in percent (0-100).
    pub dimmer: Option<f64>,
    /// Transition time for state changes, in seconds.
    pub transition_time: Option<f64>,
    /// Instance id of the currently active scene.
    pub scene_id: Option<u32>,
}

/// A group-like entity synthesized locally, not backed by the gateway's
/// native grouping.
///
/// A virtual group tracks the optical fields itself because the gateway has
/// no endpoint summarizing them, so its path bindings point at these fields
/// directly instead of the virtual sentinel.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct VirtualGroup {
    /// Locally assigned instance id.
    pub instance_id: u32,
    /// Display name; may be empty, in which case a name is synthesized.
    pub name: String,
    /// Instance ids of member devices.
    #[serde(rename = "deviceIDs")]
    pub device_ids: Vec<u32>,
    /// Whether the group is switched on.
    pub on_off: bool,
    /// Aggregate brightness in percent (0-100).
    pub dimmer: Option<f64>,
    /// Transition time for state changes, in seconds.
    pub transition_time: Option<f64>,
    /// Instance id of the currently active scene.
    pub scene_id: Option<u32>,
    /// Color temperature in percent (0 = cold, 100 = warm).
    pub color_temperature: Option<f64>,
    /// Color as a 6-digit RGB hex string.
    pub color: Option<String>,
    /// Hue in degrees (0-360).
    pub hue: Option<f64>,
    /// Saturation in percent (0-100).
    pub saturation: Option<f64>,
}

/// A real or virtual group, distinguished by variant rather than by runtime
/// type inspection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum GroupLike {
    /// A gateway-native group.
    Real(Group),
    /// A locally synthesized group.
    Virtual(VirtualGroup),
}

impl GroupLike {
    /// Returns the instance id of either variant.
    #[must_use]
    pub const fn instance_id(&self) -> u32 {
        match self {
            Self::Real(group) => group.instance_id,
            Self::Virtual(group) => group.instance_id,
        }
    }

    /// Returns the raw display name of either variant.
    #[must_use]
    pub fn name(&self) -> &str {
        match self {
            Self::Real(group) => &group.name,
            Self::Virtual(group) => &group.name,
        }
    }

    /// Returns the member device ids of either variant.
    #[must_use]
    pub fn device_ids(&self) -> &[u32] {
        match self {
            Self::Real(group) => &group.device_ids,
            Self::Virtual(group) => &group.device_ids,
        }
    }
}

impl From<Group> for GroupLike {
    fn from(group: Group) -> Self {
        Self::Real(group)
    }
}

impl From<VirtualGroup> for GroupLike {
    fn from(group: VirtualGroup) -> Self {
        Self::Virtual(group)
    }
}

/// A scene owned by a group.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Scene {
    /// Gateway-assigned instance id.
    pub instance_id: u32,
    /// Display name.
    pub name: String,
}

/// A group together with its current scene set.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct GroupInfo {
    /// The group itself.
    pub group: GroupLike,
    /// Scenes owned by the group, keyed by instance id.
    pub scenes: BTreeMap<u32, Scene>,
}

impl Default for GroupLike {
    fn default() -> Self {
        Self::Real(Group::default())
    }
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    #[test]
    fn group_serializes_with_gateway_field_names() {
        let group = Group {
            instance_id: 131073,
            name: "Kitchen".to_string(),
            device_ids: vec![65537, 65538],
            on_off: true,
            dimmer: Some(80.0),
            transition_time: Some(0.5),
            scene_id: Some(196608),
        };
        let value = serde_json::to_value(group).unwrap();
        assert_eq!(value["deviceIDs"], json!([65537, 65538]));
        assert_eq!(value["onOff"], json!(true));
        assert_eq!(value["sceneId"], json!(196608));
    }

    #[test]
    fn group_like_accessors() {
        let group: GroupLike = Group {
            instance_id: 131073,
            name: "Kitchen".to_string(),
            device_ids: vec![65537],
            ..Group::default()
        }
        .into();
        assert_eq!(group.instance_id(), 131073);
        assert_eq!(group.name(), "Kitchen");
        assert_eq!(group.device_ids(), &[65537]);
    }

    #[test]
    fn virtual_group_carries_optical_fields() {
        let group = VirtualGroup {
            instance_id: 1,
            color: Some("00FF00".to_string()),
            hue: Some(120.0),
            ..VirtualGroup::default()
        };
        let value = serde_json::to_value(group).unwrap();
        assert_eq!(value["color"], json!("00FF00"));
        assert_eq!(value["hue"], json!(120.0));
    }
}
