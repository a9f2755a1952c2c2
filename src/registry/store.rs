//! Room registry implementation
//!
//! The central registry that owns all live rooms, applies state updates,
//! and fans every change out to the room's subscribers.

use std::collections::HashMap;
use std::sync::Arc;

use rand::Rng;
use tokio::sync::RwLock;

use crate::command::Command;

use super::config::RegistryConfig;
use super::entry::{now_ms, RoomEntry, RoomPatch, RoomState, Subscription};
use super::error::RegistryError;

/// Room code alphabet: 26 uppercase letters, 26^4 = 456,976 combinations
const CODE_ALPHABET: &[u8] = b"ABCDEFGHIJKLMNOPQRSTUVWXYZ";

/// Room code length
const CODE_LENGTH: usize = 4;

/// Central registry for all live rooms
///
/// Thread-safe via `RwLock`. The map lock is held for the duration of each
/// logical operation on the map; each entry's lock is held across
/// lookup+touch and merge+publish, so snapshots of a single room are
/// totally ordered.
pub struct RoomRegistry {
    /// Map of room code to room entry
    rooms: RwLock<HashMap<String, Arc<RwLock<RoomEntry>>>>,

    /// Configuration
    config: RegistryConfig,
}

impl RoomRegistry {
    /// Create a new room registry with default configuration
    pub fn new() -> Self {
        Self::with_config(RegistryConfig::default())
    }

    /// Create a new room registry with custom configuration
    pub fn with_config(config: RegistryConfig) -> Self {
        Self {
            rooms: RwLock::new(HashMap::new()),
            config,
        }
    }

    /// Get the registry configuration
    pub fn config(&self) -> &RegistryConfig {
        &self.config
    }

    /// Allocate a new room with a fresh unique code and default state
    ///
    /// Expired rooms are swept first. Code generation retries until it finds
    /// a code no live room holds.
    pub async fn create(&self) -> RoomState {
        let mut rooms = self.rooms.write().await;
        self.sweep_expired(&mut rooms);

        let code = loop {
            let candidate = generate_code();
            if !rooms.contains_key(&candidate) {
                break candidate;
            }
        };

        let entry = RoomEntry::new(code.clone(), &self.config);
        let snapshot = entry.state.clone();
        rooms.insert(code.clone(), Arc::new(RwLock::new(entry)));

        tracing::info!(room = %code, rooms = rooms.len(), "Room created");

        snapshot
    }

    /// Look up a room by code
    ///
    /// Expired rooms are swept first. A hit refreshes `last_activity`, so
    /// reading a room extends its lease.
    pub async fn get(&self, code: &str) -> Option<RoomState> {
        let code = normalize(code);

        let entry_arc = {
            let mut rooms = self.rooms.write().await;
            self.sweep_expired(&mut rooms);
            rooms.get(&code)?.clone()
        };

        let mut entry = entry_arc.write().await;
        entry.state.last_activity = now_ms();

        Some(entry.state.clone())
    }

    /// Merge a partial update into a room's state and notify subscribers
    ///
    /// Looks the room up directly, without the lease-extending sweep of
    /// [`get`](Self::get); `last_activity` is refreshed unconditionally as
    /// part of the merge. Returns the full post-merge snapshot.
    pub async fn update(&self, code: &str, patch: RoomPatch) -> Result<RoomState, RegistryError> {
        let code = normalize(code);
        let entry_arc = self.entry(&code).await?;

        let mut entry = entry_arc.write().await;
        Ok(merge_and_publish(&mut entry, patch))
    }

    /// Apply a validated command to a room and notify subscribers
    ///
    /// The command's patch is computed from the room's current state under
    /// the same write lock that merges it, so concurrent commands for one
    /// room serialize in arrival order.
    pub async fn apply(&self, code: &str, command: &Command) -> Result<RoomState, RegistryError> {
        let code = normalize(code);
        let entry_arc = self.entry(&code).await?;

        let mut entry = entry_arc.write().await;
        let patch = command.to_patch(&entry.state);

        tracing::debug!(room = %code, command = command.kind(), "Applying command");

        Ok(merge_and_publish(&mut entry, patch))
    }

    /// Subscribe to a room's state changes
    ///
    /// Expired rooms are swept first and the lookup refreshes
    /// `last_activity`, like [`get`](Self::get). The returned snapshot is
    /// taken after the receiver is registered, so no update published after
    /// the snapshot can be missed; at worst an update is seen both in the
    /// snapshot and as an event.
    pub async fn subscribe(
        &self,
        code: &str,
    ) -> Result<(RoomState, Subscription), RegistryError> {
        let code = normalize(code);

        let entry_arc = {
            let mut rooms = self.rooms.write().await;
            self.sweep_expired(&mut rooms);
            rooms
                .get(&code)
                .cloned()
                .ok_or_else(|| RegistryError::RoomNotFound(code.clone()))?
        };

        let mut entry = entry_arc.write().await;
        entry.state.last_activity = now_ms();

        let subscription = entry.subscribe();
        let snapshot = entry.state.clone();

        tracing::debug!(
            room = %code,
            subscribers = entry.subscriber_count(),
            "Subscriber added"
        );

        Ok((snapshot, subscription))
    }

    /// Remove a room unconditionally
    ///
    /// Returns whether a room was removed. Open subscriptions observe the
    /// channel closing. Reserved capability: nothing on the HTTP surface
    /// routes here.
    pub async fn delete(&self, code: &str) -> bool {
        let code = normalize(code);
        let removed = self.rooms.write().await.remove(&code).is_some();

        if removed {
            tracing::info!(room = %code, "Room deleted");
        }

        removed
    }

    /// Get the number of live rooms
    pub async fn room_count(&self) -> usize {
        self.rooms.read().await.len()
    }

    /// Get the number of live subscriptions on a room
    pub async fn subscriber_count(&self, code: &str) -> Option<u32> {
        let entry_arc = {
            let rooms = self.rooms.read().await;
            rooms.get(&normalize(code))?.clone()
        };

        let entry = entry_arc.read().await;
        Some(entry.subscriber_count())
    }

    /// Direct lookup without sweep or touch
    async fn entry(&self, code: &str) -> Result<Arc<RwLock<RoomEntry>>, RegistryError> {
        let rooms = self.rooms.read().await;
        rooms
            .get(code)
            .cloned()
            .ok_or_else(|| RegistryError::RoomNotFound(code.to_string()))
    }

    /// Remove every room whose last activity is older than the TTL
    ///
    /// Runs synchronously at the start of `create`, `get`, and `subscribe`;
    /// there is no background timer. Full scan, O(live rooms).
    fn sweep_expired(&self, rooms: &mut HashMap<String, Arc<RwLock<RoomEntry>>>) {
        let now = now_ms();
        let ttl_ms = self.config.room_ttl.as_millis() as u64;

        let expired: Vec<String> = rooms
            .iter()
            .filter_map(|(code, entry_arc)| {
                // An entry locked by an in-flight operation is active.
                let entry = entry_arc.try_read().ok()?;
                if now.saturating_sub(entry.state.last_activity) > ttl_ms {
                    Some(code.clone())
                } else {
                    None
                }
            })
            .collect();

        for code in expired {
            rooms.remove(&code);
            tracing::info!(room = %code, "Room expired");
        }
    }
}

impl Default for RoomRegistry {
    fn default() -> Self {
        Self::new()
    }
}

/// The one path every state change takes: merge, touch, then notify
fn merge_and_publish(entry: &mut RoomEntry, patch: RoomPatch) -> RoomState {
    entry.state.merge(patch);
    entry.state.last_activity = now_ms();

    let snapshot = entry.state.clone();
    let receivers = entry.publish();

    tracing::debug!(room = %snapshot.code, receivers, "State published");

    snapshot
}

/// Room codes are case-insensitive on input and uppercase everywhere else
fn normalize(code: &str) -> String {
    code.to_ascii_uppercase()
}

/// Generate a random room code; uniqueness is the caller's retry loop
fn generate_code() -> String {
    let mut rng = rand::thread_rng();
    (0..CODE_LENGTH)
        .map(|_| CODE_ALPHABET[rng.gen_range(0..CODE_ALPHABET.len())] as char)
        .collect()
}
