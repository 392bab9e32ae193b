//! Mesh snapshot - a bulk dump of everything a mesh scan produced
//!
//! Collaborators that discover the mesh hand the registry one of these
//! instead of calling the individual registration methods. The JSON form
//! uses the same camelCase field names as the Plejd cloud.

use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

use crate::device::{OutputDevice, PhysicalDevice, SceneDevice};
use crate::site::ApiSite;

#[derive(Error, Debug)]
pub enum SnapshotError {
    #[error("Failed to read snapshot: {0}")]
    IoError(#[from] std::io::Error),
    #[error("Failed to parse snapshot: {0}")]
    ParseError(#[from] serde_json::Error),
}

/// A state notification for a single output
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct StateUpdate {
    pub unique_output_id: String,
    pub state: bool,
    #[serde(default)]
    pub dim: Option<u8>,
}

/// Everything learned from one mesh scan
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct MeshSnapshot {
    #[serde(default)]
    pub site: Option<ApiSite>,
    #[serde(default)]
    pub devices: Vec<PhysicalDevice>,
    #[serde(default)]
    pub outputs: Vec<OutputDevice>,
    #[serde(default)]
    pub scenes: Vec<SceneDevice>,
    /// State notifications observed after the scan, in arrival order
    #[serde(default)]
    pub state_updates: Vec<StateUpdate>,
}

impl MeshSnapshot {
    /// Load a snapshot from a JSON file
    pub fn from_file(path: &Path) -> Result<Self, SnapshotError> {
        let content = std::fs::read_to_string(path)?;
        Self::from_json(&content)
    }

    /// Parse a snapshot from a JSON string
    pub fn from_json(content: &str) -> Result<Self, SnapshotError> {
        let snapshot: MeshSnapshot = serde_json::from_str(content)?;
        Ok(snapshot)
    }
}

/// Counts produced by [`DeviceRegistry::apply_snapshot`](crate::DeviceRegistry::apply_snapshot)
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct IngestReport {
    pub physical_devices: usize,
    pub outputs_registered: usize,
    pub outputs_hidden: usize,
    pub scenes: usize,
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    const SNAPSHOT: &str = r#"{
        "site": {
            "site": { "siteId": "site-1", "title": "Cabin" },
            "plejdMesh": { "cryptoKey": "00112233" }
        },
        "devices": [
            { "deviceId": "AA:BB", "name": "Kitchen dimmer", "hardware": "DIM-02" }
        ],
        "outputs": [
            {
                "uniqueId": "AA:BB_1",
                "deviceId": "AA:BB",
                "output": 1,
                "name": "Kitchen Light",
                "roomId": "room1",
                "bleOutputAddress": 42,
                "dimmable": true
            }
        ],
        "scenes": [ { "uniqueId": "scene-1", "name": "Evening" } ],
        "stateUpdates": [ { "uniqueOutputId": "AA:BB_1", "state": true, "dim": 80 } ]
    }"#;

    #[test]
    fn test_parse_snapshot() {
        let snapshot = MeshSnapshot::from_json(SNAPSHOT).unwrap();
        assert_eq!(snapshot.devices.len(), 1);
        assert_eq!(snapshot.outputs[0].unique_id, "AA:BB_1");
        assert_eq!(snapshot.scenes[0].name, "Evening");
        assert_eq!(snapshot.state_updates[0].dim, Some(80));
        assert_eq!(
            snapshot.site.unwrap().crypto_key().as_str(),
            "00112233"
        );
    }

    #[test]
    fn test_empty_snapshot() {
        let snapshot = MeshSnapshot::from_json("{}").unwrap();
        assert!(snapshot.site.is_none());
        assert!(snapshot.outputs.is_empty());
    }

    #[test]
    fn test_snapshot_from_file() {
        let mut file = NamedTempFile::new().unwrap();
        file.write_all(SNAPSHOT.as_bytes()).unwrap();

        let snapshot = MeshSnapshot::from_file(file.path()).unwrap();
        assert_eq!(snapshot.outputs.len(), 1);
    }

    #[test]
    fn test_snapshot_errors() {
        assert!(matches!(
            MeshSnapshot::from_json("not json"),
            Err(SnapshotError::ParseError(_))
        ));
        assert!(matches!(
            MeshSnapshot::from_file(Path::new("/nonexistent/snapshot.json")),
            Err(SnapshotError::IoError(_))
        ));
    }
}
