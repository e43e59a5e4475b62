// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Synchronization of domain objects into the external store.
//!
//! - [`ObjectStore`]: the store collaborator trait
//! - [`SyncEngine`]: the diff-based reconciliation engine

mod engine;
mod store;

pub use engine::SyncEngine;
pub use store::ObjectStore;
