//! Device registry - current known state of the mesh
//!
//! Holds physical devices, their outputs and scenes, plus the derived room
//! and BLE address indexes. Lookups never fail: unknown keys yield `None`.
//! Mutations that cannot apply (hidden outputs, state updates for unknown
//! outputs) are logged and otherwise ignored.
//!
//! The registry is a plain owned value. Callers that share it between tasks
//! wrap the whole registry in a single lock so the output map and its
//! indexes are always updated together.

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use tracing::{debug, info, warn};

use crate::ble::BleIndex;
use crate::device::{
    unique_output_id, BleAddress, DeviceId, OutputDevice, PhysicalDevice, SceneDevice,
};
use crate::rooms::RoomIndex;
use crate::site::{ApiSite, CryptoKey};
use crate::snapshot::{IngestReport, MeshSnapshot};

/// Registry counts for integration exporters
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RegistrySummary {
    pub physical_devices: usize,
    pub outputs: usize,
    pub scenes: usize,
    pub rooms: usize,
    pub has_crypto_key: bool,
}

#[derive(Debug, Clone, Default)]
pub struct DeviceRegistry {
    api_site: Option<ApiSite>,
    crypto_key: Option<CryptoKey>,

    physical_devices: IndexMap<String, PhysicalDevice>,
    output_devices: IndexMap<String, OutputDevice>,
    output_ids_by_room: RoomIndex,
    output_id_by_ble_address: BleIndex,

    scenes: IndexMap<String, SceneDevice>,
    // Scene records carry no BLE address, so nothing writes this yet
    scene_id_by_ble_address: BleIndex,
}

impl DeviceRegistry {
    /// Create an empty registry
    pub fn new() -> Self {
        Self::default()
    }

    /// Insert or overwrite a physical device
    pub fn add_physical_device(&mut self, device: PhysicalDevice) {
        debug!(device = %device.device_id, name = %device.name, "Adding physical device");
        self.physical_devices
            .insert(device.device_id.0.clone(), device);
    }

    /// Insert or overwrite an output device and update the room and BLE
    /// indexes. Hidden outputs are dropped without touching anything.
    pub fn add_output_device(&mut self, output: OutputDevice) {
        if output.is_hidden() {
            debug!(
                output = %output.unique_id,
                name = %output.name,
                hidden_from_integrations = output.hidden_from_integrations,
                hidden_from_room_list = output.hidden_from_room_list,
                "Output device is hidden, not adding it"
            );
            return;
        }

        let unique_id = output.unique_id.clone();
        let room_id = output.room_id.clone();

        if let Some(previous) = self
            .output_id_by_ble_address
            .insert(output.ble_output_address, &unique_id)
        {
            if previous != unique_id {
                debug!(
                    address = output.ble_output_address,
                    previous = %previous,
                    output = %unique_id,
                    "BLE address remapped to a different output"
                );
            }
        }
        self.output_ids_by_room.add_output(&room_id, &unique_id);

        debug!(
            output = %unique_id,
            name = %output.name,
            room = %room_id,
            address = output.ble_output_address,
            "Added output device"
        );
        self.output_devices.insert(unique_id, output);
    }

    /// Insert or overwrite a scene
    pub fn add_scene(&mut self, scene: SceneDevice) {
        debug!(scene = %scene.unique_id, name = %scene.name, "Adding scene");
        self.scenes.insert(scene.unique_id.clone(), scene);
    }

    /// Forget all physical devices, outputs and their indexes
    pub fn clear_plejd_devices(&mut self) {
        self.physical_devices.clear();
        self.output_devices.clear();
        self.output_ids_by_room.clear();
        self.output_id_by_ble_address.clear();
    }

    /// Forget all scenes and the scene address index
    pub fn clear_scene_devices(&mut self) {
        self.scenes.clear();
        self.scene_id_by_ble_address.clear();
    }

    /// All visible outputs, in registration order
    pub fn get_all_output_devices(&self) -> Vec<&OutputDevice> {
        self.output_devices.values().collect()
    }

    /// All scenes, in registration order
    pub fn get_all_scene_devices(&self) -> Vec<&SceneDevice> {
        self.scenes.values().collect()
    }

    /// All physical devices, in registration order
    pub fn get_all_physical_devices(&self) -> Vec<&PhysicalDevice> {
        self.physical_devices.values().collect()
    }

    pub fn get_output_device(&self, unique_output_id: &str) -> Option<&OutputDevice> {
        self.output_devices.get(unique_output_id)
    }

    /// Resolve a BLE address to the output currently registered under it
    pub fn get_output_device_by_ble_output_address(
        &self,
        address: BleAddress,
    ) -> Option<&OutputDevice> {
        let unique_id = self.output_id_by_ble_address.get(address)?;
        self.output_devices.get(unique_id)
    }

    /// Output ids in a room; `None` if no output was ever registered there
    pub fn get_output_device_ids_by_room_id(&self, room_id: &str) -> Option<&[String]> {
        self.output_ids_by_room.get(room_id)
    }

    /// Outputs in a room, skipping ids that no longer resolve
    pub fn get_output_devices_by_room_id(&self, room_id: &str) -> Vec<&OutputDevice> {
        self.output_ids_by_room
            .get(room_id)
            .unwrap_or_default()
            .iter()
            .filter_map(|id| self.output_devices.get(id))
            .collect()
    }

    /// Room ids in first-seen order
    pub fn room_ids(&self) -> impl Iterator<Item = &str> {
        self.output_ids_by_room.rooms().map(|(room, _)| room)
    }

    pub fn get_output_device_name(&self, unique_output_id: &str) -> Option<&str> {
        self.output_devices
            .get(unique_output_id)
            .map(|o| o.name.as_str())
    }

    pub fn get_physical_device(&self, device_id: &str) -> Option<&PhysicalDevice> {
        self.physical_devices.get(device_id)
    }

    pub fn get_scene(&self, scene_unique_id: &str) -> Option<&SceneDevice> {
        self.scenes.get(scene_unique_id)
    }

    pub fn get_scene_by_ble_address(&self, address: BleAddress) -> Option<&SceneDevice> {
        let unique_id = self.scene_id_by_ble_address.get(address)?;
        self.scenes.get(unique_id)
    }

    pub fn get_scene_name(&self, scene_unique_id: &str) -> Option<&str> {
        self.scenes.get(scene_unique_id).map(|s| s.name.as_str())
    }

    /// See [`unique_output_id`]
    pub fn get_unique_output_id(device_id: &DeviceId, output: u32) -> String {
        unique_output_id(device_id, output)
    }

    pub fn get_api_site(&self) -> Option<&ApiSite> {
        self.api_site.as_ref()
    }

    /// The mesh crypto key of the current site
    pub fn crypto_key(&self) -> Option<&CryptoKey> {
        self.crypto_key.as_ref()
    }

    /// Store the site and cache its mesh crypto key
    pub fn set_api_site(&mut self, api_site: ApiSite) {
        info!(site = %api_site.site.site_id, title = %api_site.site.title, "Site set");
        self.crypto_key = Some(api_site.crypto_key().clone());
        self.api_site = Some(api_site);
    }

    /// Apply a state notification to a registered output.
    ///
    /// `state` is always written. `dim` is written only when it is non-zero
    /// and the output is dimmable, so a dim of 0 never clears the level.
    pub fn set_output_state(&mut self, unique_output_id: &str, state: bool, dim: Option<u8>) {
        let Some(output) = self.output_devices.get_mut(unique_output_id) else {
            warn!(
                output = %unique_output_id,
                "Tried to set state for an unknown output device"
            );
            return;
        };

        output.state = state;
        if let Some(dim) = dim.filter(|d| *d != 0) {
            if output.dimmable {
                output.dim = dim;
            }
        }

        debug!(
            output = %unique_output_id,
            state = output.state,
            dim = output.dim,
            "Output state updated"
        );
    }

    /// Replace registry contents with a mesh snapshot.
    ///
    /// Physical data and scenes are cleared first; the site is replaced only
    /// when the snapshot carries one. State updates in the snapshot are not
    /// applied here.
    pub fn apply_snapshot(&mut self, snapshot: MeshSnapshot) -> IngestReport {
        let mut report = IngestReport::default();

        if let Some(site) = snapshot.site {
            self.set_api_site(site);
        }

        self.clear_plejd_devices();
        for device in snapshot.devices {
            self.add_physical_device(device);
            report.physical_devices += 1;
        }
        for output in snapshot.outputs {
            if output.is_hidden() {
                report.outputs_hidden += 1;
            } else {
                report.outputs_registered += 1;
            }
            self.add_output_device(output);
        }

        self.clear_scene_devices();
        for scene in snapshot.scenes {
            self.add_scene(scene);
            report.scenes += 1;
        }

        info!(
            devices = report.physical_devices,
            outputs = report.outputs_registered,
            hidden = report.outputs_hidden,
            scenes = report.scenes,
            "Applied mesh snapshot"
        );
        report
    }

    pub fn summary(&self) -> RegistrySummary {
        RegistrySummary {
            physical_devices: self.physical_devices.len(),
            outputs: self.output_devices.len(),
            scenes: self.scenes.len(),
            rooms: self.output_ids_by_room.len(),
            has_crypto_key: self.crypto_key.is_some(),
        }
    }
}
