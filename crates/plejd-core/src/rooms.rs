//! Room membership of output devices

use indexmap::IndexMap;

/// Room id -> ordered list of output unique ids in that room
#[derive(Debug, Clone, Default)]
pub struct RoomIndex {
    rooms: IndexMap<String, Vec<String>>,
}

impl RoomIndex {
    /// Create a new empty index
    pub fn new() -> Self {
        Self {
            rooms: IndexMap::new(),
        }
    }

    /// Record that an output belongs to a room.
    ///
    /// The room's list is created on first use even if nothing ends up
    /// appended to it. An output whose unique id equals the room id is a
    /// room placeholder and is never listed inside its own room; an id
    /// already present is not added twice.
    pub fn add_output(&mut self, room_id: &str, unique_id: &str) {
        let members = self.rooms.entry(room_id.to_string()).or_default();
        if room_id != unique_id && !members.iter().any(|id| id == unique_id) {
            members.push(unique_id.to_string());
        }
    }

    /// Output ids for a room, `None` if the room was never seen
    pub fn get(&self, room_id: &str) -> Option<&[String]> {
        self.rooms.get(room_id).map(|ids| ids.as_slice())
    }

    /// All rooms in first-seen order
    pub fn rooms(&self) -> impl Iterator<Item = (&str, &[String])> {
        self.rooms
            .iter()
            .map(|(room, ids)| (room.as_str(), ids.as_slice()))
    }

    pub fn len(&self) -> usize {
        self.rooms.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rooms.is_empty()
    }

    pub fn clear(&mut self) {
        self.rooms.clear();
    }
}
