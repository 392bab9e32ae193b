//! Device types for the Plejd mesh: physical nodes, their outputs, and scenes

use serde::{Deserialize, Serialize};

/// Numeric BLE address of an output (or scene) on the mesh.
///
/// Opaque to the registry; it is only ever used as an index key.
pub type BleAddress = u8;

/// Stable identifier of a physical mesh node
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct DeviceId(pub String);

impl DeviceId {
    pub fn new(id: impl Into<String>) -> Self {
        Self(id.into())
    }

    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl std::fmt::Display for DeviceId {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.0)
    }
}

impl From<&str> for DeviceId {
    fn from(s: &str) -> Self {
        Self(s.to_string())
    }
}

/// Build the unique id of an output from its device and output index.
///
/// The index is rendered in decimal, so the last `_` always separates the
/// two parts and distinct pairs never collide.
pub fn unique_output_id(device_id: &DeviceId, output: u32) -> String {
    format!("{}_{}", device_id.0, output)
}

/// Split a unique output id back into its device id and output index
pub fn parse_unique_output_id(unique_id: &str) -> Option<(DeviceId, u32)> {
    let (device, output) = unique_id.rsplit_once('_')?;
    if device.is_empty() || output.is_empty() || !output.bytes().all(|b| b.is_ascii_digit()) {
        return None;
    }
    let output = output.parse().ok()?;
    Some((DeviceId::new(device), output))
}

/// A physical node on the mesh
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct PhysicalDevice {
    /// Stable device identifier
    pub device_id: DeviceId,
    /// Human-readable name
    #[serde(default)]
    pub name: String,
    /// Hardware type (e.g. "DIM-02")
    #[serde(default)]
    pub hardware: Option<String>,
    /// Firmware version reported by the site
    #[serde(default)]
    pub firmware_version: Option<String>,
    /// Room the node is installed in
    #[serde(default)]
    pub room_id: Option<String>,
}

impl PhysicalDevice {
    pub fn new(device_id: DeviceId, name: impl Into<String>) -> Self {
        Self {
            device_id,
            name: name.into(),
            hardware: None,
            firmware_version: None,
            room_id: None,
        }
    }
}

/// Kind of load an output drives
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum OutputType {
    Light,
    Switch,
    Sensor,
    #[default]
    #[serde(other)]
    Unknown,
}

/// One controllable channel of a physical device
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputDevice {
    /// `{device_id}_{output}`, see [`unique_output_id`]
    pub unique_id: String,
    /// Owning physical device
    pub device_id: DeviceId,
    /// Output index on the physical device
    #[serde(default)]
    pub output: u32,
    pub name: String,
    pub room_id: String,
    pub ble_output_address: BleAddress,
    #[serde(default)]
    pub dimmable: bool,
    #[serde(default)]
    pub hidden_from_integrations: bool,
    #[serde(default)]
    pub hidden_from_room_list: bool,
    #[serde(default)]
    pub hidden_from_scene_list: bool,
    /// Current on/off state
    #[serde(default)]
    pub state: bool,
    /// Current dim level (0-255)
    #[serde(default)]
    pub dim: u8,
    #[serde(default, rename = "type")]
    pub output_type: OutputType,
    #[serde(default)]
    pub type_name: Option<String>,
    #[serde(default)]
    pub version: Option<String>,
}

impl OutputDevice {
    /// Create a visible, switched-off output with its unique id derived
    /// from `device_id` and `output`
    pub fn new(
        device_id: DeviceId,
        output: u32,
        name: impl Into<String>,
        room_id: impl Into<String>,
        ble_output_address: BleAddress,
    ) -> Self {
        Self {
            unique_id: unique_output_id(&device_id, output),
            device_id,
            output,
            name: name.into(),
            room_id: room_id.into(),
            ble_output_address,
            dimmable: false,
            hidden_from_integrations: false,
            hidden_from_room_list: false,
            hidden_from_scene_list: false,
            state: false,
            dim: 0,
            output_type: OutputType::Unknown,
            type_name: None,
            version: None,
        }
    }

    /// Hidden outputs are never stored by the registry
    pub fn is_hidden(&self) -> bool {
        self.hidden_from_integrations || self.hidden_from_room_list
    }
}

/// A named scene
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SceneDevice {
    pub unique_id: String,
    pub name: String,
    #[serde(default)]
    pub hidden: bool,
}

impl SceneDevice {
    pub fn new(unique_id: impl Into<String>, name: impl Into<String>) -> Self {
        Self {
            unique_id: unique_id.into(),
            name: name.into(),
            hidden: false,
        }
    }
}
