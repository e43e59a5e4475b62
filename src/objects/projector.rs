// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Projection of domain objects into desired entry trees.
//!
//! The projector is pure: given an accessory or group it produces the root
//! entry's display and technical sections and the complete descendant set
//! "as of now", driven by device capability. It performs no I/O; the sync
//! engine compares its output against the stored tree.

use serde_json::json;

use crate::types::{Accessory, AccessoryType, GroupLike, Spectrum};

use super::entry::{DisplaySchema, Entry, EntryKind, TechnicalSchema, ValueType};
use super::ids;
use super::registry::{RootKind, StateName};

/// The desired tree for one domain object: the root entry plus every
/// descendant entry.
#[derive(Debug, Clone, PartialEq)]
pub struct Projection {
    /// The root entry.
    pub root: Entry,
    /// All descendant entries, in no particular order.
    pub descendants: Vec<Entry>,
}

/// Returns the display section of a device root entry.
#[must_use]
pub fn accessory_display(accessory: &Accessory) -> DisplaySchema {
    DisplaySchema {
        name: accessory.name.clone(),
        icon: accessory_icon(accessory).map(|file| format!("icons/{file}")),
        ..DisplaySchema::default()
    }
}

/// Returns the technical section of a device root entry.
#[must_use]
pub fn accessory_technical(accessory: &Accessory) -> TechnicalSchema {
    let mut technical = TechnicalSchema::default();
    technical
        .extra
        .insert("instanceId".to_string(), json!(accessory.instance_id));
    technical.extra.insert(
        "manufacturer".to_string(),
        json!(accessory.device_info.manufacturer),
    );
    technical.extra.insert(
        "firmwareVersion".to_string(),
        json!(accessory.device_info.firmware_version),
    );
    technical.extra.insert(
        "modelNumber".to_string(),
        json!(accessory.device_info.model_number),
    );
    technical.extra.insert(
        "type".to_string(),
        json!(accessory.accessory_type.as_str()),
    );
    technical.extra.insert(
        "serialNumber".to_string(),
        json!(accessory.device_info.serial_number),
    );
    technical
}

/// Chooses the icon file for an accessory, if a rule matches.
///
/// Exact model-string matches take precedence; otherwise lightbulbs get a
/// base name by substring match on the model string and a suffix from
/// their spectrum.
#[must_use]
pub fn accessory_icon(accessory: &Accessory) -> Option<String> {
    let model = accessory.device_info.model_number.as_str();
    match model {
        "TRADFRI remote control" => return Some("remote.png".to_string()),
        "TRADFRI motion sensor" => return Some("motion_sensor.png".to_string()),
        "TRADFRI wireless dimmer" => return Some("remote_dimmer.png".to_string()),
        "TRADFRI plug" => return Some("plug.png".to_string()),
        _ => {}
    }
    if accessory.accessory_type != AccessoryType::Lightbulb {
        return None;
    }
    let prefix = if model.contains(" panel ") {
        "panel"
    } else if model.contains(" door ") {
        "door"
    } else if model.contains(" GU10 ") {
        "gu10"
    } else {
        "bulb"
    };
    let suffix = match accessory.spectrum() {
        Spectrum::None => "",
        Spectrum::White => "_ws",
        Spectrum::Rgb => "_rgb",
    };
    Some(format!("{prefix}{suffix}.png"))
}

/// Projects the complete desired tree for a device.
#[must_use]
pub fn project_device(namespace: &str, accessory: &Accessory) -> Projection {
    let root_id = ids::device_id(namespace, accessory);
    let root = Entry {
        id: root_id.clone(),
        kind: EntryKind::Device,
        display: accessory_display(accessory),
        technical: accessory_technical(accessory),
    };

    let mut descendants = vec![alive_entry(&root_id), last_seen_entry(&root_id)];
    if accessory.accessory_type == AccessoryType::Lightbulb {
        let spectrum = accessory.spectrum();
        descendants.push(lightbulb_channel(&root_id, spectrum));
        for name in lightbulb_states(spectrum) {
            descendants.push(name.build(&root_id, RootKind::Device));
        }
    }

    Projection { root, descendants }
}

/// Returns the state set of a lightbulb channel for the given spectrum.
#[must_use]
pub fn lightbulb_states(spectrum: Spectrum) -> Vec<StateName> {
    let mut states = vec![
        StateName::OnOff,
        StateName::Brightness,
        StateName::TransitionDuration,
    ];
    match spectrum {
        Spectrum::None => {}
        Spectrum::White => states.push(StateName::ColorTemperature),
        Spectrum::Rgb => {
            states.extend([StateName::Color, StateName::Hue, StateName::Saturation]);
        }
    }
    states
}

/// Returns the display section of a group root entry.
///
/// A virtual group without an assigned name gets a synthesized one.
#[must_use]
pub fn group_display(group: &GroupLike) -> DisplaySchema {
    let name = match group {
        GroupLike::Real(real) => real.name.clone(),
        GroupLike::Virtual(virt) => {
            if virt.name.is_empty() {
                format!("virtual group {}", virt.instance_id)
            } else {
                virt.name.clone()
            }
        }
    };
    DisplaySchema {
        name,
        ..DisplaySchema::default()
    }
}

/// Returns the technical section of a group root entry.
#[must_use]
pub fn group_technical(group: &GroupLike) -> TechnicalSchema {
    let kind = match group {
        GroupLike::Real(_) => "group",
        GroupLike::Virtual(_) => "virtual group",
    };
    let mut technical = TechnicalSchema::default();
    technical
        .extra
        .insert("instanceId".to_string(), json!(group.instance_id()));
    technical
        .extra
        .insert("deviceIDs".to_string(), json!(group.device_ids()));
    technical.extra.insert("type".to_string(), json!(kind));
    technical
}

/// Projects the complete desired tree for a group.
#[must_use]
pub fn project_group(namespace: &str, group: &GroupLike) -> Projection {
    let root_id = ids::group_id(namespace, group);
    let root_kind = match group {
        GroupLike::Real(_) => RootKind::Group,
        GroupLike::Virtual(_) => RootKind::VirtualGroup,
    };
    let root = Entry {
        id: root_id.clone(),
        kind: EntryKind::Group,
        display: group_display(group),
        technical: group_technical(group),
    };

    let mut states = vec![
        StateName::OnOff,
        StateName::Brightness,
        StateName::TransitionDuration,
        StateName::ColorTemperature,
        StateName::Color,
        StateName::Hue,
        StateName::Saturation,
    ];
    // only gateway-native groups carry scenes
    if matches!(group, GroupLike::Real(_)) {
        states.push(StateName::ActiveScene);
    }
    let descendants = states
        .into_iter()
        .map(|name| name.build(&root_id, root_kind))
        .collect();

    Projection { root, descendants }
}

fn alive_entry(root_id: &str) -> Entry {
    Entry {
        id: format!("{root_id}.alive"),
        kind: EntryKind::State,
        display: DisplaySchema {
            name: "device alive".to_string(),
            read: Some(true),
            write: Some(false),
            value_type: Some(ValueType::Boolean),
            role: Some("indicator.alive".to_string()),
            description: Some(
                "indicates if the device is currently alive and connected to the gateway"
                    .to_string(),
            ),
            ..DisplaySchema::default()
        },
        technical: TechnicalSchema::bound("alive"),
    }
}

fn last_seen_entry(root_id: &str) -> Entry {
    Entry {
        id: format!("{root_id}.lastSeen"),
        kind: EntryKind::State,
        display: DisplaySchema {
            name: "last seen timestamp".to_string(),
            read: Some(true),
            write: Some(false),
            value_type: Some(ValueType::Number),
            role: Some("indicator.lastSeen".to_string()),
            description: Some(
                "indicates when the device has last been seen by the gateway".to_string(),
            ),
            ..DisplaySchema::default()
        },
        technical: TechnicalSchema::bound("lastSeen"),
    }
}

fn lightbulb_channel(root_id: &str, spectrum: Spectrum) -> Entry {
    let name = match spectrum {
        Spectrum::None => "Lightbulb",
        Spectrum::White => "Lightbulb (white spectrum)",
        Spectrum::Rgb => "RGB Lightbulb",
    };
    let mut technical = TechnicalSchema::default();
    // remember the spectrum so later passes know which states exist
    technical
        .extra
        .insert("spectrum".to_string(), json!(spectrum));
    Entry {
        id: format!("{root_id}.lightbulb"),
        kind: EntryKind::Channel,
        display: DisplaySchema {
            name: name.to_string(),
            role: Some("light".to_string()),
            ..DisplaySchema::default()
        },
        technical,
    }
}
