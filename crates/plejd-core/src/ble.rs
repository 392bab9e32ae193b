//! Reverse lookup from BLE address to unique id

use std::collections::HashMap;

use crate::device::BleAddress;

/// BLE address -> unique id. Later registrations overwrite earlier ones.
#[derive(Debug, Clone, Default)]
pub struct BleIndex {
    by_address: HashMap<BleAddress, String>,
}

impl BleIndex {
    pub fn new() -> Self {
        Self::default()
    }

    /// Map an address to a unique id, returning the id it replaced
    pub fn insert(&mut self, address: BleAddress, unique_id: &str) -> Option<String> {
        self.by_address.insert(address, unique_id.to_string())
    }

    pub fn get(&self, address: BleAddress) -> Option<&str> {
        self.by_address.get(&address).map(|s| s.as_str())
    }

    pub fn len(&self) -> usize {
        self.by_address.len()
    }

    pub fn is_empty(&self) -> bool {
        self.by_address.is_empty()
    }

    pub fn clear(&mut self) {
        self.by_address.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_later_insert_wins() {
        let mut index = BleIndex::new();
        assert_eq!(index.insert(42, "dev1_0"), None);
        assert_eq!(index.insert(42, "dev2_0").as_deref(), Some("dev1_0"));
        assert_eq!(index.get(42), Some("dev2_0"));
        assert_eq!(index.len(), 1);
    }

    #[test]
    fn test_missing_address() {
        let index = BleIndex::new();
        assert!(index.get(7).is_none());
        assert!(index.is_empty());
    }
}
