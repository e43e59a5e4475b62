// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Entry model, id derivation, builder registry and projection.
//!
//! This module owns everything about the *shape* of the external state
//! tree:
//!
//! - [`entry`]: the [`Entry`] node type with its display and technical
//!   schemas and [`PathBinding`]
//! - [`ids`]: pure id functions for devices, groups and scenes
//! - [`registry`]: the fixed table of state builders, keyed by
//!   [`StateName`](registry::StateName)
//! - [`projector`]: projection of accessories and groups into desired
//!   entry trees

pub mod entry;
pub mod ids;
pub mod projector;
pub mod registry;

pub use entry::{DisplaySchema, Entry, EntryKind, EntryPatch, PathBinding, TechnicalSchema, ValueType};
pub use projector::Projection;
