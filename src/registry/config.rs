//! Registry configuration

use std::time::Duration;

/// Registry configuration options
#[derive(Debug, Clone)]
pub struct RegistryConfig {
    /// How long a room survives without any read or write
    pub room_ttl: Duration,

    /// Capacity of each room's broadcast channel. A subscriber that falls
    /// further behind than this skips ahead to newer snapshots.
    pub broadcast_capacity: usize,
}

impl Default for RegistryConfig {
    fn default() -> Self {
        Self {
            room_ttl: Duration::from_secs(30 * 60),
            broadcast_capacity: 32,
        }
    }
}

impl RegistryConfig {
    /// Set the room time-to-live
    pub fn room_ttl(mut self, ttl: Duration) -> Self {
        self.room_ttl = ttl;
        self
    }

    /// Set the broadcast channel capacity
    pub fn broadcast_capacity(mut self, capacity: usize) -> Self {
        self.broadcast_capacity = capacity.max(1);
        self
    }
}
