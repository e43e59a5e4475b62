// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Diff-based reconciliation of domain objects against the stored tree.
//!
//! On each pass the engine projects the desired tree for a device or group,
//! creates missing entries, patches sections that changed, and re-derives
//! every path-bound value from the fresh domain object. A failing resolution
//! of an individual binding skips only that entry; store failures propagate
//! to the caller.

use std::collections::{BTreeMap, HashMap, HashSet};

use futures::future::try_join_all;
use serde_json::Value;
use tokio::sync::RwLock;

use crate::error::{PathError, Result, StoreError};
use crate::objects::{Entry, EntryKind, EntryPatch, Projection};
use crate::objects::{ids, projector};
use crate::path;
use crate::types::{Accessory, GroupInfo, GroupLike};

use super::store::ObjectStore;

/// The sync engine.
///
/// Keeps a local mirror of the stored tree (primed at startup, maintained
/// across passes) and an index of tracked group instance ids. Callers may
/// invoke it concurrently for distinct root ids; the engine does not
/// serialize passes across different roots.
///
/// # Examples
///
/// ```no_run
/// use tradsync::sync::SyncEngine;
/// # use tradsync::sync::ObjectStore;
/// # async fn example<S: ObjectStore>(store: S, accessory: tradsync::types::Accessory) -> tradsync::Result<()> {
/// let engine = SyncEngine::new(store, "tradfri.0");
/// engine.sync_device(&accessory).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct SyncEngine<S> {
    store: S,
    namespace: String,
    /// Local mirror of the stored tree, keyed by entry id.
    entries: RwLock<HashMap<String, Entry>>,
    /// Instance ids of groups seen by this engine.
    tracked_groups: RwLock<HashSet<u32>>,
}

impl<S: ObjectStore> SyncEngine<S> {
    /// Creates an engine writing below the given namespace.
    pub fn new(store: S, namespace: impl Into<String>) -> Self {
        Self {
            store,
            namespace: namespace.into(),
            entries: RwLock::new(HashMap::new()),
            tracked_groups: RwLock::new(HashSet::new()),
        }
    }

    /// Returns the namespace this engine writes below.
    #[must_use]
    pub fn namespace(&self) -> &str {
        &self.namespace
    }

    /// Returns a reference to the underlying store.
    pub const fn store(&self) -> &S {
        &self.store
    }

    /// Seeds the local mirror with entries already present in the store.
    ///
    /// Group root entries also register their instance id in the tracked
    /// group index.
    pub async fn prime<I>(&self, entries: I)
    where
        I: IntoIterator<Item = Entry>,
    {
        let mut cache = self.entries.write().await;
        let mut groups = self.tracked_groups.write().await;
        for entry in entries {
            if entry.kind == EntryKind::Group
                && let Some(instance_id) = ids::instance_id(&entry.id)
            {
                groups.insert(instance_id);
            }
            cache.insert(entry.id.clone(), entry);
        }
    }

    /// Returns a copy of the mirrored entry with the given id.
    pub async fn cached_entry(&self, id: &str) -> Option<Entry> {
        self.entries.read().await.get(id).cloned()
    }

    /// Synchronizes a device.
    ///
    /// If the root entry exists, its sections are patched when they differ
    /// from the stored content and every bound descendant value is
    /// re-derived from the fresh accessory. Otherwise the root and the full
    /// initial descendant set are created, joined before returning.
    ///
    /// # Errors
    ///
    /// Propagates store failures unchanged. A `PathError::NotFound` while
    /// refreshing one binding only skips that entry.
    pub async fn sync_device(&self, accessory: &Accessory) -> Result<()> {
        let root_id = ids::device_id(&self.namespace, accessory);
        let value = serde_json::to_value(accessory)?;

        let stored = self.cached_entry(&root_id).await;
        if let Some(stored) = stored {
            let display = projector::accessory_display(accessory);
            let technical = projector::accessory_technical(accessory);
            self.patch_root(stored, &display, &technical).await?;
            self.refresh_bound_values(&root_id, &value).await
        } else {
            let projection = projector::project_device(&self.namespace, accessory);
            self.create_tree(projection, &value).await
        }
    }

    /// Synchronizes a real or virtual group.
    ///
    /// Behaves like [`sync_device`](Self::sync_device) with the group
    /// projection, and registers the group in the tracked index.
    ///
    /// # Errors
    ///
    /// Propagates store failures unchanged.
    pub async fn sync_group(&self, group: &GroupLike) -> Result<()> {
        let root_id = ids::group_id(&self.namespace, group);
        let value = serde_json::to_value(group)?;

        self.tracked_groups.write().await.insert(group.instance_id());

        let stored = self.cached_entry(&root_id).await;
        if let Some(stored) = stored {
            let display = projector::group_display(group);
            let technical = projector::group_technical(group);
            self.patch_root(stored, &display, &technical).await?;
            self.refresh_bound_values(&root_id, &value).await
        } else {
            let projection = projector::project_group(&self.namespace, group);
            self.create_tree(projection, &value).await
        }
    }

    /// Rebuilds the scene choice list of a group's scene selector.
    ///
    /// No-op if the group is not tracked by this engine or its selector
    /// entry does not exist yet.
    ///
    /// # Errors
    ///
    /// Propagates store failures unchanged.
    pub async fn sync_scenes(&self, group_info: &GroupInfo) -> Result<()> {
        let instance_id = group_info.group.instance_id();
        if !self.tracked_groups.read().await.contains(&instance_id) {
            return Ok(());
        }
        let root_id = ids::group_id(&self.namespace, &group_info.group);
        let scenes_id = format!("{root_id}.activeScene");
        if !self.entries.read().await.contains_key(&scenes_id) {
            return Ok(());
        }

        let choices: BTreeMap<String, String> = group_info
            .scenes
            .values()
            .map(|scene| (scene.instance_id.to_string(), scene.name.clone()))
            .collect();
        tracing::info!(
            group = instance_id,
            scenes = ?choices.values().collect::<Vec<_>>(),
            "updating possible scenes"
        );

        let stored = self
            .store
            .get_entry(&scenes_id)
            .await?
            .ok_or_else(|| StoreError::EntryNotFound(scenes_id.clone()))?;

        let mut display = stored.display.clone();
        display.choices = Some(choices);
        let patch = EntryPatch::between(&stored, &display, &stored.technical);
        if !patch.is_empty() {
            self.store.extend_entry(&scenes_id, &patch).await?;
        }

        let mut updated = stored;
        updated.apply_patch(&patch);
        self.entries.write().await.insert(scenes_id, updated);
        Ok(())
    }

    /// Compares the stored root sections against freshly projected ones and
    /// issues at most one update call covering both.
    async fn patch_root(
        &self,
        mut stored: Entry,
        display: &crate::objects::DisplaySchema,
        technical: &crate::objects::TechnicalSchema,
    ) -> Result<()> {
        let patch = EntryPatch::between(&stored, display, technical);
        if patch.is_empty() {
            return Ok(());
        }
        self.store.extend_entry(&stored.id, &patch).await?;
        stored.apply_patch(&patch);
        self.entries
            .write()
            .await
            .insert(stored.id.clone(), stored);
        Ok(())
    }

    /// Re-derives the value of every stored descendant with a non-virtual
    /// path binding.
    async fn refresh_bound_values(&self, root_id: &str, value: &Value) -> Result<()> {
        let prefix = format!("{root_id}.");
        let bound: Vec<(String, String)> = self
            .entries
            .read()
            .await
            .iter()
            .filter(|(id, _)| id.starts_with(&prefix))
            .filter_map(|(id, entry)| {
                entry
                    .bound_path()
                    .map(|binding| (id.clone(), binding.as_str().to_string()))
            })
            .collect();

        for (id, binding) in bound {
            match path::resolve(value, &binding) {
                Ok(resolved) => {
                    self.store.set_value(&id, resolved, true).await?;
                }
                Err(err @ PathError::NotFound { .. }) => {
                    tracing::debug!(entry = %id, error = %err, "skipping value refresh");
                }
                Err(err) => return Err(err.into()),
            }
        }
        Ok(())
    }

    /// Creates the root and every descendant of a fresh projection.
    ///
    /// Descendant creations run as an explicit set of independent
    /// operations joined before returning; the first failure surfaces to
    /// the caller.
    async fn create_tree(&self, projection: Projection, value: &Value) -> Result<()> {
        let Projection { root, descendants } = projection;
        tracing::info!(root = %root.id, descendants = descendants.len(), "creating entry tree");

        self.store.create_entry(&root.id, &root, None).await?;

        let with_values: Vec<(Entry, Option<Value>)> = descendants
            .into_iter()
            .map(|entry| {
                let initial = entry.bound_path().and_then(|binding| {
                    match path::resolve(value, binding.as_str()) {
                        Ok(resolved) => Some(resolved.clone()),
                        Err(err) => {
                            tracing::debug!(entry = %entry.id, error = %err, "no initial value");
                            None
                        }
                    }
                });
                (entry, initial)
            })
            .collect();

        try_join_all(with_values.iter().map(|(entry, initial)| {
            self.store
                .create_entry(&entry.id, entry, initial.as_ref())
        }))
        .await?;

        let mut cache = self.entries.write().await;
        cache.insert(root.id.clone(), root);
        for (entry, _) in with_values {
            cache.insert(entry.id.clone(), entry);
        }
        Ok(())
    }
}
