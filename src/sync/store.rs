// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! The external object-store collaborator.

use serde_json::Value;

use crate::error::StoreError;
use crate::objects::{Entry, EntryPatch};

/// Trait for the persisted hierarchical key-value store.
///
/// Operations are treated as idempotent at per-entry granularity, so a
/// caller may safely retry; this library itself performs no retries.
#[allow(async_fn_in_trait)]
pub trait ObjectStore {
    /// Reads an entry, returning `None` if it does not exist.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend fails.
    async fn get_entry(&self, id: &str) -> Result<Option<Entry>, StoreError>;

    /// Creates an entry, optionally with an initial value.
    ///
    /// Creating an entry that already exists overwrites its schema and is
    /// not an error.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend fails.
    async fn create_entry(
        &self,
        id: &str,
        entry: &Entry,
        initial_value: Option<&Value>,
    ) -> Result<(), StoreError>;

    /// Merges the patch into an existing entry's sections.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the entry is missing or the backend fails.
    async fn extend_entry(&self, id: &str, patch: &EntryPatch) -> Result<(), StoreError>;

    /// Sets the current value of an entry.
    ///
    /// `ack` marks the value as reported by the device rather than
    /// requested by a user.
    ///
    /// # Errors
    ///
    /// Returns `StoreError` if the backend fails.
    async fn set_value(&self, id: &str, value: &Value, ack: bool) -> Result<(), StoreError>;
}
