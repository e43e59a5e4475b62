// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! tradsync - mirror Trådfri gateway devices into a hierarchical object store.
//!
//! This library keeps an external hierarchical key-value store in sync with
//! the live state of smart-lighting devices, groups and scenes reported by a
//! gateway client. It provides:
//!
//! - **Path resolution**: read or write any nested field of a domain object
//!   by a dotted/indexed string path ([`path`])
//! - **Projection**: deterministic, capability-driven projection of devices
//!   and groups into typed, schema-carrying entries ([`objects`])
//! - **Reconciliation**: a diff-based sync engine that creates missing
//!   entries, patches only changed sections, and re-derives every
//!   path-bound value on each pass ([`sync`])
//! - **Color conversion**: RGB hex, hue/saturation and device chromaticity
//!   with gamut containment ([`color`])
//! - **Command issuance**: light operations fanned out to group members
//!   ([`operations`])
//!
//! The transport to the physical gateway and the store's own storage engine
//! are collaborators behind the [`operations::GatewayClient`] and
//! [`sync::ObjectStore`] traits.
//!
//! # Quick Start
//!
//! Projection and id derivation are pure and need no collaborators:
//!
//! ```
//! use tradsync::objects::{ids, projector};
//! use tradsync::types::{Accessory, AccessoryType, DeviceInfo, Light, Spectrum};
//!
//! let accessory = Accessory {
//!     instance_id: 65537,
//!     name: "Living room".to_string(),
//!     accessory_type: AccessoryType::Lightbulb,
//!     device_info: DeviceInfo {
//!         manufacturer: "IKEA of Sweden".to_string(),
//!         firmware_version: "1.2.217".to_string(),
//!         model_number: "TRADFRI bulb E27 CWS opal 600lm".to_string(),
//!         serial_number: String::new(),
//!     },
//!     light_list: vec![Light {
//!         spectrum: Spectrum::Rgb,
//!         on_off: true,
//!         dimmer: Some(47.0),
//!         ..Light::default()
//!     }],
//!     alive: true,
//!     last_seen: None,
//! };
//!
//! assert_eq!(ids::device_id("tradfri.0", &accessory), "tradfri.0.L-65537");
//!
//! let projection = projector::project_device("tradfri.0", &accessory);
//! assert!(
//!     projection
//!         .descendants
//!         .iter()
//!         .any(|entry| entry.id.ends_with(".lightbulb.color"))
//! );
//! ```
//!
//! Synchronization runs against an [`sync::ObjectStore`] implementation:
//!
//! ```no_run
//! use tradsync::sync::{ObjectStore, SyncEngine};
//! # async fn example<S: ObjectStore>(store: S, accessory: tradsync::types::Accessory) -> tradsync::Result<()> {
//! let engine = SyncEngine::new(store, "tradfri.0");
//! engine.sync_device(&accessory).await?;
//! # Ok(())
//! # }
//! ```

pub mod color;
pub mod error;
pub mod objects;
pub mod operations;
pub mod path;
pub mod sync;
pub mod types;

pub use error::{Error, Result};
pub use objects::{Entry, EntryKind, EntryPatch, PathBinding};
pub use sync::{ObjectStore, SyncEngine};
