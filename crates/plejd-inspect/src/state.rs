//! Application state management

use anyhow::{anyhow, Result};
use plejd_core::{
    DeviceRegistry, IngestReport, MeshSnapshot, OutputDevice, RegistrySummary, SceneDevice,
    StateUpdate,
};
use serde::Serialize;
use std::sync::Arc;
use tokio::sync::{mpsc, oneshot, RwLock};
use tracing::{debug, info};

use crate::config::Config;

/// Messages for the state update task
enum UpdateCommand {
    /// Apply one state notification
    Apply(StateUpdate),
    /// Reply with the number of updates applied so far once everything
    /// queued before it has been handled
    Flush(oneshot::Sender<usize>),
}

/// Outputs of one room, for display and export
#[derive(Debug, Clone, Serialize)]
pub struct RoomView {
    pub room_id: String,
    pub outputs: Vec<OutputDevice>,
}

/// Shared application state
pub struct AppState {
    /// The registry; every mutation holds the write lock for its full duration
    pub registry: Arc<RwLock<DeviceRegistry>>,
    /// Configuration
    pub config: Config,
    /// Queue of state notifications for the update task
    updates: mpsc::Sender<UpdateCommand>,
}

impl AppState {
    /// Create new application state and start the update task
    pub async fn new(config: Config) -> Arc<Self> {
        let registry = Arc::new(RwLock::new(DeviceRegistry::new()));
        let (updates, mut rx) = mpsc::channel(100);

        let state = Arc::new(Self {
            registry: registry.clone(),
            config,
            updates,
        });

        tokio::spawn(async move {
            let mut applied = 0usize;
            while let Some(command) = rx.recv().await {
                match command {
                    UpdateCommand::Apply(update) => {
                        let mut registry = registry.write().await;
                        registry.set_output_state(&update.unique_output_id, update.state, update.dim);
                        applied += 1;
                    }
                    UpdateCommand::Flush(reply) => {
                        let _ = reply.send(applied);
                    }
                }
            }
            debug!("State update task stopped");
        });

        state
    }

    /// Replace the registry contents with a snapshot and queue its state updates
    pub async fn ingest_snapshot(&self, mut snapshot: MeshSnapshot) -> Result<IngestReport> {
        let updates = std::mem::take(&mut snapshot.state_updates);
        let report = self.registry.write().await.apply_snapshot(snapshot);

        info!(updates = updates.len(), "Queueing state updates from snapshot");
        for update in updates {
            self.queue_update(update).await?;
        }
        Ok(report)
    }

    /// Queue a state notification
    pub async fn queue_update(&self, update: StateUpdate) -> Result<()> {
        self.updates
            .send(UpdateCommand::Apply(update))
            .await
            .map_err(|_| anyhow!("State update task is not running"))
    }

    /// Wait until every queued update is applied; returns the total applied
    pub async fn flush(&self) -> Result<usize> {
        let (tx, rx) = oneshot::channel();
        self.updates
            .send(UpdateCommand::Flush(tx))
            .await
            .map_err(|_| anyhow!("State update task is not running"))?;
        Ok(rx.await?)
    }

    /// Get registry counts
    pub async fn summary(&self) -> RegistrySummary {
        self.registry.read().await.summary()
    }

    /// Get all outputs grouped by room, in first-seen room order
    pub async fn rooms(&self) -> Vec<RoomView> {
        let registry = self.registry.read().await;
        registry
            .room_ids()
            .map(|room_id| RoomView {
                room_id: room_id.to_string(),
                outputs: registry
                    .get_output_devices_by_room_id(room_id)
                    .into_iter()
                    .cloned()
                    .collect(),
            })
            .filter(|room| self.config.display.show_empty_rooms || !room.outputs.is_empty())
            .collect()
    }

    /// Get outputs of a single room, `None` if the room is unknown
    pub async fn room(&self, room_id: &str) -> Option<RoomView> {
        let registry = self.registry.read().await;
        registry.get_output_device_ids_by_room_id(room_id)?;
        Some(RoomView {
            room_id: room_id.to_string(),
            outputs: registry
                .get_output_devices_by_room_id(room_id)
                .into_iter()
                .cloned()
                .collect(),
        })
    }

    /// Get all scenes
    pub async fn scenes(&self) -> Vec<SceneDevice> {
        self.registry
            .read()
            .await
            .get_all_scene_devices()
            .into_iter()
            .cloned()
            .collect()
    }
}
