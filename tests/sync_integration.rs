// SPDX-License-Identifier: MPL-2.0
// This Source Code Form is subject to the terms of the Mozilla Public
// License, v. 2.0. If a copy of the MPL was not distributed with this
// file, You can obtain one at https://mozilla.org/MPL/2.0/.

//! Integration tests for the sync engine against a recording mock store.

use std::collections::{BTreeMap, HashMap};
use std::sync::Mutex;

use serde_json::{Value, json};
use tradsync::objects::{Entry, EntryPatch};
use tradsync::sync::{ObjectStore, SyncEngine};
use tradsync::types::{
    Accessory, AccessoryType, DeviceInfo, Group, GroupInfo, GroupLike, Light, Scene, Spectrum,
};
use tradsync::error::StoreError;

const NAMESPACE: &str = "tradfri.0";

// ============================================================================
// Mock store
// ============================================================================

#[derive(Default)]
struct MockStore {
    inner: Mutex<Inner>,
}

#[derive(Default)]
struct Inner {
    entries: HashMap<String, Entry>,
    created: Vec<(String, Option<Value>)>,
    extended: Vec<(String, EntryPatch)>,
    set_values: Vec<(String, Value, bool)>,
    fail_create_on: Option<String>,
}

impl MockStore {
    fn failing_on(id: &str) -> Self {
        let store = Self::default();
        store.inner.lock().unwrap().fail_create_on = Some(id.to_string());
        store
    }

    fn created(&self) -> Vec<(String, Option<Value>)> {
        self.inner.lock().unwrap().created.clone()
    }

    fn extended(&self) -> Vec<(String, EntryPatch)> {
        self.inner.lock().unwrap().extended.clone()
    }

    fn set_values(&self) -> Vec<(String, Value, bool)> {
        self.inner.lock().unwrap().set_values.clone()
    }

    fn clear_log(&self) {
        let mut inner = self.inner.lock().unwrap();
        inner.created.clear();
        inner.extended.clear();
        inner.set_values.clear();
    }
}

impl ObjectStore for MockStore {
    async fn get_entry(&self, id: &str) -> Result<Option<Entry>, StoreError> {
        Ok(self.inner.lock().unwrap().entries.get(id).cloned())
    }

    async fn create_entry(
        &self,
        id: &str,
        entry: &Entry,
        initial_value: Option<&Value>,
    ) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        if inner.fail_create_on.as_deref() == Some(id) {
            return Err(StoreError::Backend(format!("refusing to create {id}")));
        }
        inner.entries.insert(id.to_string(), entry.clone());
        inner
            .created
            .push((id.to_string(), initial_value.cloned()));
        Ok(())
    }

    async fn extend_entry(&self, id: &str, patch: &EntryPatch) -> Result<(), StoreError> {
        let mut inner = self.inner.lock().unwrap();
        let entry = inner
            .entries
            .get_mut(id)
            .ok_or_else(|| StoreError::EntryNotFound(id.to_string()))?;
        entry.apply_patch(patch);
        inner.extended.push((id.to_string(), patch.clone()));
        Ok(())
    }

    async fn set_value(&self, id: &str, value: &Value, ack: bool) -> Result<(), StoreError> {
        self.inner
            .lock()
            .unwrap()
            .set_values
            .push((id.to_string(), value.clone(), ack));
        Ok(())
    }
}

// ============================================================================
// Fixtures
// ============================================================================

fn rgb_bulb() -> Accessory {
    Accessory {
        instance_id: 65537,
        name: "Living room".to_string(),
        accessory_type: AccessoryType::Lightbulb,
        device_info: DeviceInfo {
            manufacturer: "IKEA of Sweden".to_string(),
            firmware_version: "1.2.217".to_string(),
            model_number: "TRADFRI bulb E27 CWS opal 600lm".to_string(),
            serial_number: String::new(),
        },
        light_list: vec![Light {
            spectrum: Spectrum::Rgb,
            on_off: true,
            dimmer: Some(47.0),
            color: Some("FF0000".to_string()),
            hue: Some(0.0),
            saturation: Some(100.0),
            transition_time: Some(0.5),
            ..Light::default()
        }],
        alive: true,
        last_seen: None,
    }
}

fn kitchen_group() -> GroupLike {
    Group {
        instance_id: 123,
        name: "Kitchen".to_string(),
        device_ids: vec![65537, 65538],
        on_off: true,
        dimmer: Some(80.0),
        transition_time: Some(0.5),
        scene_id: Some(196608),
    }
    .into()
}

fn scene(instance_id: u32, name: &str) -> Scene {
    Scene {
        instance_id,
        name: name.to_string(),
    }
}

// ============================================================================
// Device sync
// ============================================================================

#[tokio::test]
async fn first_sync_creates_root_and_descendants() {
    let engine = SyncEngine::new(MockStore::default(), NAMESPACE);
    engine.sync_device(&rgb_bulb()).await.unwrap();

    let created = engine.store().created();
    let ids: Vec<&str> = created.iter().map(|(id, _)| id.as_str()).collect();
    assert_eq!(created.len(), 10);
    assert!(ids.contains(&"tradfri.0.L-65537"));
    assert!(ids.contains(&"tradfri.0.L-65537.alive"));
    assert!(ids.contains(&"tradfri.0.L-65537.lightbulb"));
    assert!(ids.contains(&"tradfri.0.L-65537.lightbulb.color"));
    assert!(ids.contains(&"tradfri.0.L-65537.lightbulb.hue"));
    assert!(ids.contains(&"tradfri.0.L-65537.lightbulb.saturation"));
    assert!(!ids.contains(&"tradfri.0.L-65537.lightbulb.colorTemperature"));

    // no updates on a fresh tree
    assert!(engine.store().extended().is_empty());
}

#[tokio::test]
async fn first_sync_resolves_initial_values() {
    let engine = SyncEngine::new(MockStore::default(), NAMESPACE);
    engine.sync_device(&rgb_bulb()).await.unwrap();

    let created: HashMap<String, Option<Value>> =
        engine.store().created().into_iter().collect();
    assert_eq!(
        created["tradfri.0.L-65537.lightbulb.brightness"],
        Some(json!(47.0))
    );
    assert_eq!(
        created["tradfri.0.L-65537.lightbulb.color"],
        Some(json!("FF0000"))
    );
    assert_eq!(created["tradfri.0.L-65537.alive"], Some(json!(true)));
    // the channel carries no binding, so no initial value
    assert_eq!(created["tradfri.0.L-65537.lightbulb"], None);
    // the root is created without an initial value
    assert_eq!(created["tradfri.0.L-65537"], None);
}

#[tokio::test]
async fn unchanged_device_issues_zero_updates() {
    let engine = SyncEngine::new(MockStore::default(), NAMESPACE);
    engine.sync_device(&rgb_bulb()).await.unwrap();
    engine.store().clear_log();

    engine.sync_device(&rgb_bulb()).await.unwrap();

    assert!(engine.store().extended().is_empty());
    assert!(engine.store().created().is_empty());
}

#[tokio::test]
async fn second_sync_refreshes_every_bound_value() {
    let engine = SyncEngine::new(MockStore::default(), NAMESPACE);
    engine.sync_device(&rgb_bulb()).await.unwrap();
    engine.store().clear_log();

    engine.sync_device(&rgb_bulb()).await.unwrap();

    let set = engine.store().set_values();
    // 8 bound descendants: alive, lastSeen and six channel states
    assert_eq!(set.len(), 8);
    assert!(set.iter().all(|(_, _, ack)| *ack));
    let brightness = set
        .iter()
        .find(|(id, _, _)| id.ends_with(".brightness"))
        .unwrap();
    assert_eq!(brightness.1, json!(47.0));
}

#[tokio::test]
async fn firmware_change_patches_only_that_field() {
    let engine = SyncEngine::new(MockStore::default(), NAMESPACE);
    engine.sync_device(&rgb_bulb()).await.unwrap();
    engine.store().clear_log();

    let mut updated = rgb_bulb();
    updated.device_info.firmware_version = "1.4.020".to_string();
    engine.sync_device(&updated).await.unwrap();

    let extended = engine.store().extended();
    assert_eq!(extended.len(), 1);
    let (id, patch) = &extended[0];
    assert_eq!(id, "tradfri.0.L-65537");
    assert!(patch.display.is_empty());
    assert_eq!(patch.technical.len(), 1);
    assert_eq!(patch.technical["firmwareVersion"], json!("1.4.020"));
}

#[tokio::test]
async fn renamed_device_patches_display_and_technical_together() {
    let engine = SyncEngine::new(MockStore::default(), NAMESPACE);
    engine.sync_device(&rgb_bulb()).await.unwrap();
    engine.store().clear_log();

    let mut updated = rgb_bulb();
    updated.name = "Reading lamp".to_string();
    updated.device_info.firmware_version = "1.4.020".to_string();
    engine.sync_device(&updated).await.unwrap();

    // one update call covering both sections, never two
    let extended = engine.store().extended();
    assert_eq!(extended.len(), 1);
    let (_, patch) = &extended[0];
    assert_eq!(patch.display["name"], json!("Reading lamp"));
    assert_eq!(patch.technical["firmwareVersion"], json!("1.4.020"));
}

#[tokio::test]
async fn unresolvable_bindings_are_skipped_not_fatal() {
    let engine = SyncEngine::new(MockStore::default(), NAMESPACE);
    engine.sync_device(&rgb_bulb()).await.unwrap();
    engine.store().clear_log();

    // the bulb stopped reporting its light record; lightList.[0].* no
    // longer resolves, the liveness bindings still do
    let mut faded = rgb_bulb();
    faded.light_list.clear();
    engine.sync_device(&faded).await.unwrap();

    let set = engine.store().set_values();
    let ids: Vec<&str> = set.iter().map(|(id, _, _)| id.as_str()).collect();
    assert_eq!(set.len(), 2);
    assert!(ids.contains(&"tradfri.0.L-65537.alive"));
    assert!(ids.contains(&"tradfri.0.L-65537.lastSeen"));
}

#[tokio::test]
async fn creation_failure_surfaces_to_the_caller() {
    let store = MockStore::failing_on("tradfri.0.L-65537.lightbulb.hue");
    let engine = SyncEngine::new(store, NAMESPACE);
    assert!(engine.sync_device(&rgb_bulb()).await.is_err());
}

#[tokio::test]
async fn primed_engine_updates_instead_of_creating() {
    let first = SyncEngine::new(MockStore::default(), NAMESPACE);
    first.sync_device(&rgb_bulb()).await.unwrap();
    let existing: Vec<Entry> = {
        let inner = first.store().inner.lock().unwrap();
        inner.entries.values().cloned().collect()
    };

    // a fresh engine primed with the stored tree must not recreate it
    let store = MockStore::default();
    store.inner.lock().unwrap().entries = existing
        .iter()
        .map(|entry| (entry.id.clone(), entry.clone()))
        .collect();
    let engine = SyncEngine::new(store, NAMESPACE);
    engine.prime(existing).await;

    engine.sync_device(&rgb_bulb()).await.unwrap();
    assert!(engine.store().created().is_empty());
    assert_eq!(engine.store().set_values().len(), 8);
}

// ============================================================================
// Group sync and scenes
// ============================================================================

#[tokio::test]
async fn group_sync_creates_virtual_optical_states() {
    let engine = SyncEngine::new(MockStore::default(), NAMESPACE);
    engine.sync_group(&kitchen_group()).await.unwrap();

    let created: HashMap<String, Option<Value>> =
        engine.store().created().into_iter().collect();
    // root + seven states + activeScene
    assert_eq!(created.len(), 9);
    assert_eq!(created["tradfri.0.G-00123.brightness"], Some(json!(80.0)));
    assert_eq!(created["tradfri.0.G-00123.state"], Some(json!(true)));
    assert_eq!(
        created["tradfri.0.G-00123.activeScene"],
        Some(json!(196608))
    );
    // optical states on a real group bind the virtual sentinel
    assert_eq!(created["tradfri.0.G-00123.color"], None);
    assert_eq!(created["tradfri.0.G-00123.hue"], None);
}

#[tokio::test]
async fn group_refresh_skips_virtual_bindings() {
    let engine = SyncEngine::new(MockStore::default(), NAMESPACE);
    engine.sync_group(&kitchen_group()).await.unwrap();
    engine.store().clear_log();

    engine.sync_group(&kitchen_group()).await.unwrap();

    let set = engine.store().set_values();
    let ids: Vec<&str> = set.iter().map(|(id, _, _)| id.as_str()).collect();
    // onOff, dimmer, transitionTime and sceneId resolve; the four virtual
    // optical states are never touched
    assert_eq!(set.len(), 4);
    assert!(!ids.contains(&"tradfri.0.G-00123.color"));
    assert!(!ids.contains(&"tradfri.0.G-00123.colorTemperature"));
}

#[tokio::test]
async fn sync_scenes_rebuilds_choice_list() {
    let engine = SyncEngine::new(MockStore::default(), NAMESPACE);
    engine.sync_group(&kitchen_group()).await.unwrap();
    engine.store().clear_log();

    let mut scenes = BTreeMap::new();
    scenes.insert(196608, scene(196608, "Relax"));
    scenes.insert(196609, scene(196609, "Focus"));
    let info = GroupInfo {
        group: kitchen_group(),
        scenes,
    };
    engine.sync_scenes(&info).await.unwrap();

    let extended = engine.store().extended();
    assert_eq!(extended.len(), 1);
    let (id, patch) = &extended[0];
    assert_eq!(id, "tradfri.0.G-00123.activeScene");
    assert_eq!(
        patch.display["states"],
        json!({ "196608": "Relax", "196609": "Focus" })
    );
}

#[tokio::test]
async fn sync_scenes_is_noop_for_untracked_group() {
    let engine = SyncEngine::new(MockStore::default(), NAMESPACE);
    let info = GroupInfo {
        group: kitchen_group(),
        scenes: BTreeMap::new(),
    };
    engine.sync_scenes(&info).await.unwrap();

    assert!(engine.store().created().is_empty());
    assert!(engine.store().extended().is_empty());
    assert!(engine.store().set_values().is_empty());
}

#[tokio::test]
async fn sync_scenes_is_stable_when_unchanged() {
    let engine = SyncEngine::new(MockStore::default(), NAMESPACE);
    engine.sync_group(&kitchen_group()).await.unwrap();

    let mut scenes = BTreeMap::new();
    scenes.insert(196608, scene(196608, "Relax"));
    let info = GroupInfo {
        group: kitchen_group(),
        scenes,
    };
    engine.sync_scenes(&info).await.unwrap();
    engine.store().clear_log();

    // same scene set again: nothing to persist
    engine.sync_scenes(&info).await.unwrap();
    assert!(engine.store().extended().is_empty());
}
