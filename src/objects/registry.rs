// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Builder table for the state entries of devices and groups.
//!
//! Each semantic state name maps to one pure builder of fixed signature
//! `fn(&str, RootKind) -> Entry`. The builder encodes the root-relative id
//! suffix, the display schema and the path binding appropriate to the root
//! kind: lightbulb states live below the `lightbulb` channel and bind into
//! `lightList.[0]`, group states live directly below the root, and optical
//! states on a real group bind to the virtual sentinel because the gateway
//! exposes no backing field there.
//!
//! Calling a builder twice with identical inputs yields structurally
//! identical entries; the sync engine relies on this for diffing.

use serde_json::json;

use super::entry::{DisplaySchema, Entry, EntryKind, TechnicalSchema, ValueType};

/// The kind of root an entry is built for.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum RootKind {
    /// A physical device root.
    Device,
    /// A gateway-native group root.
    Group,
    /// A locally synthesized group root.
    VirtualGroup,
}

/// Semantic names of the states the registry can build.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum StateName {
    /// The currently active scene of a group.
    ActiveScene,
    /// On/off switch state.
    OnOff,
    /// Brightness in percent.
    Brightness,
    /// Duration of a state change.
    TransitionDuration,
    /// Color temperature in percent.
    ColorTemperature,
    /// RGB color as a hex string.
    Color,
    /// Hue in degrees.
    Hue,
    /// Saturation in percent.
    Saturation,
}

/// Signature shared by every builder in the registry.
pub type Definition = fn(&str, RootKind) -> Entry;

/// The registry table, exposed read-only for introspection and testing.
pub const DEFINITIONS: [(StateName, Definition); 8] = [
    (StateName::ActiveScene, active_scene),
    (StateName::OnOff, on_off),
    (StateName::Brightness, brightness),
    (StateName::TransitionDuration, transition_duration),
    (StateName::ColorTemperature, color_temperature),
    (StateName::Color, color),
    (StateName::Hue, hue),
    (StateName::Saturation, saturation),
];

impl StateName {
    /// Builds the entry for this state below the given root.
    #[must_use]
    pub fn build(self, root_id: &str, root_kind: RootKind) -> Entry {
        let builder: Definition = match self {
            Self::ActiveScene => active_scene,
            Self::OnOff => on_off,
            Self::Brightness => brightness,
            Self::TransitionDuration => transition_duration,
            Self::ColorTemperature => color_temperature,
            Self::Color => color,
            Self::Hue => hue,
            Self::Saturation => saturation,
        };
        builder(root_id, root_kind)
    }
}

/// Device states live below the `lightbulb` channel, group states directly
/// below the root.
fn state_id(root_id: &str, root_kind: RootKind, suffix: &str) -> String {
    match root_kind {
        RootKind::Device => format!("{root_id}.lightbulb.{suffix}"),
        RootKind::Group | RootKind::VirtualGroup => format!("{root_id}.{suffix}"),
    }
}

/// The binding for a light field: into the first light record for devices,
/// the flat aggregate field for groups.
fn light_binding(root_kind: RootKind, device_field: &str, group_field: &str) -> TechnicalSchema {
    match root_kind {
        RootKind::Device => TechnicalSchema::bound(format!("lightList.[0].{device_field}")),
        RootKind::Group | RootKind::VirtualGroup => TechnicalSchema::bound(group_field),
    }
}

/// The binding for an optical field a real group cannot back: the virtual
/// sentinel for real groups, a flat field otherwise.
fn optical_binding(root_kind: RootKind, device_field: &str, group_field: &str) -> TechnicalSchema {
    match root_kind {
        RootKind::Device => TechnicalSchema::bound(format!("lightList.[0].{device_field}")),
        RootKind::Group => TechnicalSchema::virtual_bound(),
        RootKind::VirtualGroup => TechnicalSchema::bound(group_field),
    }
}

fn for_device(root_kind: RootKind, device: &str, group: &str) -> Option<String> {
    match root_kind {
        RootKind::Device => Some(device.to_string()),
        RootKind::Group | RootKind::VirtualGroup => Some(group.to_string()),
    }
}

fn active_scene(root_id: &str, _root_kind: RootKind) -> Entry {
    Entry {
        id: format!("{root_id}.activeScene"),
        kind: EntryKind::State,
        display: DisplaySchema {
            name: "active scene".to_string(),
            read: Some(true),
            write: Some(true),
            value_type: Some(ValueType::Number),
            role: Some("value.id".to_string()),
            description: Some("the instance id of the currently active scene".to_string()),
            ..DisplaySchema::default()
        },
        technical: TechnicalSchema::bound("sceneId"),
    }
}

fn on_off(root_id: &str, root_kind: RootKind) -> Entry {
    Entry {
        id: state_id(root_id, root_kind, "state"),
        kind: EntryKind::State,
        display: DisplaySchema {
            name: "on/off".to_string(),
            read: Some(true),
            write: Some(true),
            value_type: Some(ValueType::Boolean),
            role: Some("switch".to_string()),
            ..DisplaySchema::default()
        },
        technical: light_binding(root_kind, "onOff", "onOff"),
    }
}

fn brightness(root_id: &str, root_kind: RootKind) -> Entry {
    Entry {
        id: state_id(root_id, root_kind, "brightness"),
        kind: EntryKind::State,
        display: DisplaySchema {
            name: "Brightness".to_string(),
            read: Some(true),
            write: Some(true),
            value_type: Some(ValueType::Number),
            role: Some("light.dimmer".to_string()),
            min: Some(0.0),
            max: Some(100.0),
            unit: Some("%".to_string()),
            description: for_device(
                root_kind,
                "Brightness of the lightbulb",
                "Brightness of this group's lightbulbs",
            ),
            ..DisplaySchema::default()
        },
        technical: light_binding(root_kind, "dimmer", "dimmer"),
    }
}

fn transition_duration(root_id: &str, root_kind: RootKind) -> Entry {
    Entry {
        id: state_id(root_id, root_kind, "transitionDuration"),
        kind: EntryKind::State,
        display: DisplaySchema {
            name: "Transition duration".to_string(),
            read: Some(false),
            write: Some(true),
            value_type: Some(ValueType::Number),
            role: Some("light.dimmer".to_string()),
            min: Some(0.0),
            max: Some(100.0),
            unit: Some("s".to_string()),
            default: Some(json!(0)),
            description: for_device(
                root_kind,
                "Duration of a state change",
                "Duration for state changes of this group's lightbulbs",
            ),
            ..DisplaySchema::default()
        },
        technical: light_binding(root_kind, "transitionTime", "transitionTime"),
    }
}

fn color_temperature(root_id: &str, root_kind: RootKind) -> Entry {
    Entry {
        id: state_id(root_id, root_kind, "colorTemperature"),
        kind: EntryKind::State,
        display: DisplaySchema {
            name: "Color temperature".to_string(),
            read: Some(true),
            write: Some(true),
            value_type: Some(ValueType::Number),
            role: Some("level.color.temperature".to_string()),
            min: Some(0.0),
            max: Some(100.0),
            unit: Some("%".to_string()),
            description: for_device(
                root_kind,
                "Range: 0% = cold, 100% = warm",
                "Color temperature of this group's white spectrum lightbulbs. \
                 Range: 0% = cold, 100% = warm",
            ),
            ..DisplaySchema::default()
        },
        technical: optical_binding(root_kind, "colorTemperature", "colorTemperature"),
    }
}

fn color(root_id: &str, root_kind: RootKind) -> Entry {
    Entry {
        id: state_id(root_id, root_kind, "color"),
        kind: EntryKind::State,
        display: DisplaySchema {
            name: "RGB color".to_string(),
            read: Some(true),
            write: Some(true),
            value_type: Some(ValueType::String),
            role: Some("level.color".to_string()),
            description: for_device(
                root_kind,
                "6-digit RGB hex string",
                "Color of this group's RGB lightbulbs as a 6-digit hex string.",
            ),
            ..DisplaySchema::default()
        },
        technical: optical_binding(root_kind, "color", "color"),
    }
}

fn hue(root_id: &str, root_kind: RootKind) -> Entry {
    Entry {
        id: state_id(root_id, root_kind, "hue"),
        kind: EntryKind::State,
        display: DisplaySchema {
            name: "Hue".to_string(),
            read: Some(true),
            write: Some(true),
            value_type: Some(ValueType::Number),
            role: Some("level.color.hue".to_string()),
            min: Some(0.0),
            max: Some(360.0),
            unit: Some("°".to_string()),
            description: for_device(
                root_kind,
                "Hue of this RGB lightbulb",
                "Hue of this group's RGB lightbulbs",
            ),
            ..DisplaySchema::default()
        },
        technical: optical_binding(root_kind, "hue", "hue"),
    }
}

fn saturation(root_id: &str, root_kind: RootKind) -> Entry {
    Entry {
        id: state_id(root_id, root_kind, "saturation"),
        kind: EntryKind::State,
        display: DisplaySchema {
            name: "Saturation".to_string(),
            read: Some(true),
            write: Some(true),
            value_type: Some(ValueType::Number),
            role: Some("level.color.saturation".to_string()),
            min: Some(0.0),
            max: Some(100.0),
            unit: Some("%".to_string()),
            description: for_device(
                root_kind,
                "Saturation of this RGB lightbulb",
                "Saturation of this group's RGB lightbulbs",
            ),
            ..DisplaySchema::default()
        },
        technical: optical_binding(root_kind, "saturation", "saturation"),
    }
}
