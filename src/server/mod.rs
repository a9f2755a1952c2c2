//! HTTP surface for the room API
//!
//! Four routes carry the whole protocol: create a room, read a snapshot,
//! submit a command, attach to the event stream. Room codes are
//! case-insensitive on input and uppercase everywhere else.

pub mod config;
pub mod error;
pub mod listener;
pub mod routes;
mod sse;

pub use config::ServerConfig;
pub use error::ApiError;
pub use listener::RoomServer;
