//! Room synchronization for a shared songbook display
//!
//! One browser shows the songbook on a shared screen; a phone drives it.
//! The two meet in a server-held room: the display creates a room and
//! subscribes to its event stream, the phone joins by four-letter code and
//! submits commands (song selection, section navigation, scroll, transpose,
//! autoscroll). Every accepted command produces a full state snapshot that
//! is pushed to all of the room's subscribers over server-sent events.
//!
//! Rooms live in memory only and expire after thirty minutes without
//! activity. There is no controller authentication and no cross-process
//! fan-out; concurrent controllers resolve last-write-wins.
//!
//! # Example
//!
//! ```no_run
//! use songroom::{RoomServer, ServerConfig};
//!
//! #[tokio::main]
//! async fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let server = RoomServer::new(ServerConfig::default());
//!     server.run().await?;
//!     Ok(())
//! }
//! ```

pub mod command;
pub mod error;
pub mod registry;
pub mod server;

pub use command::{Command, CommandError};
pub use error::{Error, Result};
pub use registry::{RegistryConfig, RoomPatch, RoomRegistry, RoomState, Subscription};
pub use server::{RoomServer, ServerConfig};
