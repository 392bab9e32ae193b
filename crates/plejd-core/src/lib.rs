//! Plejd Core - Device registry for a Plejd mesh
//!
//! This crate provides the in-memory state shared by mesh listeners,
//! integration exporters and command senders:
//! - Device types for physical nodes, their outputs and scenes
//! - Site description carrying the mesh crypto key
//! - Room and BLE address indexes over registered outputs
//! - Mesh snapshots for bulk ingestion of a scan

pub mod ble;
pub mod device;
pub mod registry;
pub mod rooms;
pub mod site;
pub mod snapshot;

pub use ble::BleIndex;
pub use device::{
    parse_unique_output_id, unique_output_id, BleAddress, DeviceId, OutputDevice, OutputType,
    PhysicalDevice, SceneDevice,
};
pub use registry::{DeviceRegistry, RegistrySummary};
pub use rooms::RoomIndex;
pub use site::{ApiSite, CryptoKey, PlejdMesh, SiteDetails};
pub use snapshot::{IngestReport, MeshSnapshot, SnapshotError, StateUpdate};
