// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Domain read models supplied by the gateway client.
//!
//! These types mirror what the gateway reports and serialize with the
//! gateway's own field names, so entry path bindings resolve against their
//! serialized form without translation.
//!
//! # Types
//!
//! - [`Accessory`] - A single physical device with its [`DeviceInfo`] and
//!   [`Light`] records
//! - [`AccessoryType`] - Device type tag (remote/lightbulb/sensor/plug)
//! - [`Spectrum`] - Lightbulb color capability (none/white/rgb)
//! - [`GroupLike`] - A real [`Group`] or locally synthesized [`VirtualGroup`]
//! - [`Scene`] / [`GroupInfo`] - Scenes and the per-group scene set

mod accessory;
mod group;

pub use accessory::{Accessory, AccessoryType, DeviceInfo, Light, Spectrum};
pub use group::{Group, GroupInfo, GroupLike, Scene, VirtualGroup};
