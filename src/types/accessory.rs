// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Accessory read model as reported by the gateway client.
//!
//! Field names serialize in the gateway client's camelCase form
//! (`lightList`, `deviceInfo`, `lastSeen`, ...) so path bindings such as
//! `lightList.[0].dimmer` resolve directly against the serialized value.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// The type tag of a physical device.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub enum AccessoryType {
    /// A remote control.
    Remote,
    /// A lightbulb.
    Lightbulb,
    /// A motion sensor.
    MotionSensor,
    /// A smart plug.
    Plug,
}

impl AccessoryType {
    /// Returns the type tag as stored in an entry's technical section.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Remote => "remote",
            Self::Lightbulb => "lightbulb",
            Self::MotionSensor => "motionSensor",
            Self::Plug => "plug",
        }
    }
}

/// Color capability of a lightbulb.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Spectrum {
    /// No color control at all.
    #[default]
    None,
    /// Tunable color temperature only.
    White,
    /// Full color.
    Rgb,
}

/// Hardware information reported for an accessory.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct DeviceInfo {
    /// Manufacturer name.
    pub manufacturer: String,
    /// Firmware version string.
    pub firmware_version: String,
    /// Model number string, e.g. `"TRADFRI bulb E27 CWS opal 600lm"`.
    pub model_number: String,
    /// Serial number string.
    pub serial_number: String,
}

/// Light record of a lightbulb accessory.
///
/// All optical fields are optional because a bulb only reports the fields
/// its spectrum supports.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Light {
    /// Color capability of this light.
    pub spectrum: Spectrum,
    /// Whether the light is on.
    pub on_off: bool,
    /// Brightness in percent (0-100).
    pub dimmer: Option<f64>,
    /// Color temperature in percent (0 = cold, 100 = warm).
    pub color_temperature: Option<f64>,
    /// Color as a 6-digit RGB hex string.
    pub color: Option<String>,
    /// Hue in degrees (0-360).
    pub hue: Option<f64>,
    /// Saturation in percent (0-100).
    pub saturation: Option<f64>,
    /// Transition time for state changes, in seconds.
    pub transition_time: Option<f64>,
}

/// A single physical device as reported by the gateway client.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Accessory {
    /// Gateway-assigned instance id.
    pub instance_id: u32,
    /// Display name.
    pub name: String,
    /// Device type tag.
    #[serde(rename = "type")]
    pub accessory_type: AccessoryType,
    /// Hardware information.
    pub device_info: DeviceInfo,
    /// Light records; lightbulbs carry exactly one.
    #[serde(default)]
    pub light_list: Vec<Light>,
    /// Whether the device is currently reachable.
    pub alive: bool,
    /// When the gateway last saw the device, as Unix seconds.
    #[serde(with = "chrono::serde::ts_seconds_option", default)]
    pub last_seen: Option<DateTime<Utc>>,
}

impl Accessory {
    /// Returns the spectrum of the first light record, or [`Spectrum::None`]
    /// if the accessory carries no light.
    #[must_use]
    pub fn spectrum(&self) -> Spectrum {
        self.light_list.first().map_or(Spectrum::None, |l| l.spectrum)
    }
}
