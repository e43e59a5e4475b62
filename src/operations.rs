// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Command issuance against the gateway client.
//!
//! Virtual groups (and virtual properties of real groups) have no gateway
//! endpoint, so operating on them fans the operation out to every lightbulb
//! member individually.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::color::RgbColor;
use crate::error::{ColorError, GatewayError, Result};
use crate::types::{Accessory, AccessoryType, Group, GroupLike};

/// Trait for the gateway client collaborator that delivers commands to
/// physical devices.
#[allow(async_fn_in_trait)]
pub trait GatewayClient {
    /// Applies a light operation to a single lightbulb.
    ///
    /// Returns `true` if a request was sent.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the request fails.
    async fn operate_light(
        &self,
        accessory: &Accessory,
        operation: &LightOperation,
    ) -> Result<bool, GatewayError>;

    /// Pushes an updated accessory to the gateway.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the request fails.
    async fn update_device(&self, accessory: &Accessory) -> Result<bool, GatewayError>;

    /// Pushes an updated group to the gateway.
    ///
    /// # Errors
    ///
    /// Returns `GatewayError` if the request fails.
    async fn update_group(&self, group: &Group) -> Result<bool, GatewayError>;
}

/// A partial light state to apply to one or more lightbulbs.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LightOperation {
    /// Switch the light on or off.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub on_off: Option<bool>,
    /// Brightness in percent (0-100).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub dimmer: Option<f64>,
    /// Color temperature in percent (0 = cold, 100 = warm).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color_temperature: Option<f64>,
    /// Color as a 6-digit RGB hex string.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub color: Option<String>,
    /// Hue in degrees (0-360).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub hue: Option<f64>,
    /// Saturation in percent (0-100).
    #[serde(skip_serializing_if = "Option::is_none")]
    pub saturation: Option<f64>,
    /// Transition time for the change, in seconds.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub transition_time: Option<f64>,
}

impl LightOperation {
    /// Creates an operation switching the light on or off.
    #[must_use]
    pub fn switched(on_off: bool) -> Self {
        Self {
            on_off: Some(on_off),
            ..Self::default()
        }
    }

    /// Sets the brightness.
    #[must_use]
    pub fn with_dimmer(mut self, dimmer: f64) -> Self {
        self.dimmer = Some(dimmer);
        self
    }

    /// Sets the transition time in seconds.
    #[must_use]
    pub fn with_transition_time(mut self, seconds: f64) -> Self {
        self.transition_time = Some(seconds);
        self
    }

    /// Sets the color from a hex string, deriving hue and saturation so
    /// bulbs addressed by either representation converge on the same
    /// displayed color.
    ///
    /// # Errors
    ///
    /// Returns [`ColorError::InvalidHexColor`] if the string is not a valid
    /// 6-digit hex color.
    pub fn with_color(mut self, hex: &str) -> Result<Self, ColorError> {
        let rgb = RgbColor::from_hex(hex)?;
        let (hue, saturation) = rgb.to_hue_saturation();
        self.color = Some(rgb.to_hex());
        self.hue = Some(f64::from(hue));
        self.saturation = Some(f64::from(saturation));
        Ok(self)
    }
}

/// Applies a light operation to every lightbulb member of a group.
///
/// This is how virtual groups, and virtual properties of real groups, are
/// operated: each member receives the request individually. A virtual
/// group additionally merges the operation into its locally tracked state.
///
/// Returns `true` if at least one request was sent.
///
/// # Errors
///
/// Propagates the first gateway failure.
pub async fn operate_virtual_group<C: GatewayClient>(
    client: &C,
    devices: &HashMap<u32, Accessory>,
    group: &mut GroupLike,
    operation: &LightOperation,
) -> Result<bool> {
    let members: Vec<&Accessory> = group
        .device_ids()
        .iter()
        .filter_map(|id| devices.get(id))
        .filter(|acc| acc.accessory_type == AccessoryType::Lightbulb)
        .collect();

    let mut sent = false;
    for accessory in members {
        sent |= client.operate_light(accessory, operation).await?;
    }

    if let GroupLike::Virtual(virt) = group {
        if let Some(on_off) = operation.on_off {
            virt.on_off = on_off;
        }
        if operation.dimmer.is_some() {
            virt.dimmer = operation.dimmer;
        }
        if operation.color_temperature.is_some() {
            virt.color_temperature = operation.color_temperature;
        }
        if operation.color.is_some() {
            virt.color.clone_from(&operation.color);
        }
        if operation.hue.is_some() {
            virt.hue = operation.hue;
        }
        if operation.saturation.is_some() {
            virt.saturation = operation.saturation;
        }
        if operation.transition_time.is_some() {
            virt.transition_time = operation.transition_time;
        }
    }
    Ok(sent)
}

/// Renames a device on the gateway.
///
/// Returns `true` if a request was sent.
///
/// # Errors
///
/// Propagates gateway failures.
pub async fn rename_device<C: GatewayClient>(
    client: &C,
    accessory: &Accessory,
    new_name: &str,
) -> Result<bool> {
    let mut renamed = accessory.clone();
    renamed.name = new_name.to_string();
    Ok(client.update_device(&renamed).await?)
}

/// Renames a group on the gateway.
///
/// Returns `true` if a request was sent.
///
/// # Errors
///
/// Propagates gateway failures.
pub async fn rename_group<C: GatewayClient>(
    client: &C,
    group: &Group,
    new_name: &str,
) -> Result<bool> {
    let mut renamed = group.clone();
    renamed.name = new_name.to_string();
    Ok(client.update_group(&renamed).await?)
}

#[cfg(test)]
mod tests {
    use std::sync::Mutex;

    use crate::types::{DeviceInfo, Light, Spectrum, VirtualGroup};

    use super::*;

    #[derive(Default)]
    struct RecordingClient {
        operated: Mutex<Vec<(u32, LightOperation)>>,
        renamed: Mutex<Vec<String>>,
    }

    impl GatewayClient for RecordingClient {
        async fn operate_light(
            &self,
            accessory: &Accessory,
            operation: &LightOperation,
        ) -> Result<bool, GatewayError> {
            self.operated
                .lock()
                .unwrap()
                .push((accessory.instance_id, operation.clone()));
            Ok(true)
        }

        async fn update_device(&self, accessory: &Accessory) -> Result<bool, GatewayError> {
            self.renamed.lock().unwrap().push(accessory.name.clone());
            Ok(true)
        }

        async fn update_group(&self, group: &Group) -> Result<bool, GatewayError> {
            self.renamed.lock().unwrap().push(group.name.clone());
            Ok(true)
        }
    }

    fn accessory(instance_id: u32, accessory_type: AccessoryType) -> Accessory {
        Accessory {
            instance_id,
            name: format!("device {instance_id}"),
            accessory_type,
            device_info: DeviceInfo::default(),
            light_list: vec![Light::default()],
            alive: true,
            last_seen: None,
        }
    }

    #[test]
    fn with_color_derives_hue_and_saturation() {
        let operation = LightOperation::switched(true).with_color("#FF0000").unwrap();
        assert_eq!(operation.color.as_deref(), Some("FF0000"));
        assert_eq!(operation.hue, Some(0.0));
        assert_eq!(operation.saturation, Some(100.0));
    }

    #[test]
    fn with_color_rejects_garbage() {
        assert!(LightOperation::default().with_color("nope").is_err());
    }

    #[tokio::test]
    async fn operate_virtual_group_targets_lightbulbs_only() {
        let client = RecordingClient::default();
        let mut devices = HashMap::new();
        devices.insert(1, accessory(1, AccessoryType::Lightbulb));
        devices.insert(2, accessory(2, AccessoryType::Remote));
        devices.insert(3, accessory(3, AccessoryType::Lightbulb));

        let mut group: GroupLike = VirtualGroup {
            instance_id: 9,
            device_ids: vec![1, 2, 3, 4],
            ..VirtualGroup::default()
        }
        .into();

        let operation = LightOperation::switched(true).with_dimmer(50.0);
        let sent = operate_virtual_group(&client, &devices, &mut group, &operation)
            .await
            .unwrap();
        assert!(sent);

        let operated = client.operated.lock().unwrap();
        let ids: Vec<u32> = operated.iter().map(|(id, _)| *id).collect();
        assert_eq!(ids, vec![1, 3]);
    }

    #[tokio::test]
    async fn operate_virtual_group_merges_into_virtual_state() {
        let client = RecordingClient::default();
        let devices = HashMap::new();
        let mut group: GroupLike = VirtualGroup {
            instance_id: 9,
            dimmer: Some(10.0),
            ..VirtualGroup::default()
        }
        .into();

        let operation = LightOperation::switched(true)
            .with_dimmer(80.0)
            .with_color("00FF00")
            .unwrap();
        operate_virtual_group(&client, &devices, &mut group, &operation)
            .await
            .unwrap();

        let GroupLike::Virtual(virt) = group else {
            panic!("expected a virtual group");
        };
        assert!(virt.on_off);
        assert_eq!(virt.dimmer, Some(80.0));
        assert_eq!(virt.color.as_deref(), Some("00FF00"));
        assert_eq!(virt.hue, Some(120.0));
    }

    #[tokio::test]
    async fn rename_sends_copy_with_new_name() {
        let client = RecordingClient::default();
        let original = accessory(1, AccessoryType::Lightbulb);
        rename_device(&client, &original, "Bedside").await.unwrap();
        assert_eq!(original.name, "device 1");
        assert_eq!(client.renamed.lock().unwrap().as_slice(), ["Bedside"]);
    }
}
