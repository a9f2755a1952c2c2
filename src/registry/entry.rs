//! Room entry and state types
//!
//! This module defines the per-room state stored in the registry and the
//! subscription handle handed to live-channel consumers.

use std::sync::atomic::{AtomicU32, Ordering};
use std::sync::Arc;
use std::time::{SystemTime, UNIX_EPOCH};

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

use super::config::RegistryConfig;

/// Current epoch time in milliseconds, the unit used on the wire.
pub(crate) fn now_ms() -> u64 {
    SystemTime::now()
        .duration_since(UNIX_EPOCH)
        .unwrap_or_default()
        .as_millis() as u64
}

/// Full state of a room, sent wholesale to subscribers on every change
///
/// This is the wire snapshot: no diffing, every update carries the complete
/// state. Cheap to clone; the broadcast channel clones it per subscriber.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct RoomState {
    /// Four-letter room code, always uppercase, immutable after creation
    pub code: String,

    /// Selected song id from the catalog; `None` until a song is chosen
    pub current_song: Option<String>,

    /// Index into the current song's section list. Decrements saturate at
    /// zero; the upper bound is left to the controller, which knows the
    /// section count.
    pub current_section: u32,

    /// Scroll position as a percentage. Nominally 0..=100 but stored as
    /// received; controllers clamp on their side.
    pub scroll_position: i32,

    /// Transpose offset in semitones. Nominally -6..=6, stored as received.
    pub transpose: i32,

    /// Reserved for tracking connected controllers; not populated by the
    /// current command set.
    pub controllers: Vec<String>,

    /// Whether autoscroll is running on the display
    pub auto_scroll: bool,

    /// Autoscroll speed: 1 slow, 2 medium, 3 fast
    pub auto_scroll_speed: u8,

    /// Creation time, epoch milliseconds
    pub created_at: u64,

    /// Last read or write, epoch milliseconds; drives expiry
    pub last_activity: u64,
}

impl RoomState {
    /// Create the default state for a freshly allocated room
    pub(crate) fn new(code: String) -> Self {
        let now = now_ms();
        Self {
            code,
            current_song: None,
            current_section: 0,
            scroll_position: 0,
            transpose: 0,
            controllers: Vec::new(),
            auto_scroll: false,
            auto_scroll_speed: 1,
            created_at: now,
            last_activity: now,
        }
    }

    /// Shallow-merge a partial update into this state
    ///
    /// Every `Some` field fully replaces the current value. `code`,
    /// `created_at`, and `controllers` are not patchable.
    pub fn merge(&mut self, patch: RoomPatch) {
        if let Some(song) = patch.current_song {
            self.current_song = Some(song);
        }
        if let Some(section) = patch.current_section {
            self.current_section = section;
        }
        if let Some(position) = patch.scroll_position {
            self.scroll_position = position;
        }
        if let Some(semitones) = patch.transpose {
            self.transpose = semitones;
        }
        if let Some(enabled) = patch.auto_scroll {
            self.auto_scroll = enabled;
        }
        if let Some(speed) = patch.auto_scroll_speed {
            self.auto_scroll_speed = speed;
        }
    }
}

/// Partial update to a room's mutable fields
///
/// `None` leaves a field untouched. Produced by the command router, consumed
/// by [`RoomState::merge`].
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RoomPatch {
    pub current_song: Option<String>,
    pub current_section: Option<u32>,
    pub scroll_position: Option<i32>,
    pub transpose: Option<i32>,
    pub auto_scroll: Option<bool>,
    pub auto_scroll_speed: Option<u8>,
}

/// Entry for a single room in the registry
pub struct RoomEntry {
    /// Current state; mutated only under the entry's write lock
    pub state: RoomState,

    /// Broadcast sender for fan-out to subscribers
    pub(super) tx: broadcast::Sender<RoomState>,

    /// Number of live subscriptions, shared with the subscription guards
    subscribers: Arc<AtomicU32>,
}

impl RoomEntry {
    /// Create a new entry with default room state
    pub(super) fn new(code: String, config: &RegistryConfig) -> Self {
        let (tx, _) = broadcast::channel(config.broadcast_capacity);

        Self {
            state: RoomState::new(code),
            tx,
            subscribers: Arc::new(AtomicU32::new(0)),
        }
    }

    /// Get the number of live subscriptions
    pub fn subscriber_count(&self) -> u32 {
        self.subscribers.load(Ordering::Relaxed)
    }

    /// Register a new subscription on this room's broadcast channel
    pub(super) fn subscribe(&self) -> Subscription {
        self.subscribers.fetch_add(1, Ordering::Relaxed);

        Subscription {
            rx: self.tx.subscribe(),
            code: self.state.code.clone(),
            subscribers: Arc::clone(&self.subscribers),
        }
    }

    /// Send the current state to all subscribers
    ///
    /// Returns the number of receivers, or 0 if nobody is listening. A
    /// closed or lagging receiver never affects the others.
    pub(super) fn publish(&self) -> usize {
        self.tx.send(self.state.clone()).unwrap_or(0)
    }
}

/// Live handle to one room subscription
///
/// Receives every state snapshot published for the room after the moment of
/// subscription. Dropping the handle is the unsubscribe: the receiver
/// detaches from the channel and the room's subscriber count is decremented,
/// on every exit route, exactly once.
pub struct Subscription {
    rx: broadcast::Receiver<RoomState>,
    code: String,
    subscribers: Arc<AtomicU32>,
}

impl Subscription {
    /// Wait for the next published snapshot
    pub async fn recv(&mut self) -> Result<RoomState, broadcast::error::RecvError> {
        self.rx.recv().await
    }

    /// Code of the room this subscription is attached to
    pub fn code(&self) -> &str {
        &self.code
    }
}

impl Drop for Subscription {
    fn drop(&mut self) {
        let prev = self.subscribers.fetch_sub(1, Ordering::Relaxed);

        tracing::debug!(
            room = %self.code,
            subscribers = prev.saturating_sub(1),
            "Subscriber removed"
        );
    }
}
