//! Room registry for display/controller synchronization
//!
//! The registry owns every live room and routes state changes from
//! controllers to displays. It uses `tokio::sync::broadcast` for fan-out to
//! multiple subscribers of the same room.
//!
//! # Architecture
//!
//! ```text
//!                          Arc<RoomRegistry>
//!                     ┌─────────────────────────┐
//!                     │ rooms: HashMap<Code,    │
//!                     │   RoomEntry {           │
//!                     │     state,              │
//!                     │     tx: broadcast::Tx,  │
//!                     │   }                     │
//!                     │ >                       │
//!                     └───────────┬─────────────┘
//!                                 │
//!         ┌───────────────────────┼───────────────────────┐
//!         │                       │                       │
//!         ▼                       ▼                       ▼
//!    [Controller]            [Display]               [Display]
//!    POST /command           subscription.recv()     subscription.recv()
//!         │                       │                       │
//!         └──► registry.apply() ──► "update" event ──► SSE
//! ```
//!
//! Rooms are identified by a four-letter code and expire after thirty
//! minutes without a read or write; the sweep runs inline on `create`,
//! `get`, and `subscribe` rather than on a timer. Reading a room extends
//! its lease.

pub mod config;
pub mod entry;
pub mod error;
pub mod store;

pub use config::RegistryConfig;
pub use entry::{RoomEntry, RoomPatch, RoomState, Subscription};
pub use error::RegistryError;
pub use store::RoomRegistry;
