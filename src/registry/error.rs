//! Registry error types
//!
//! Error types for room registry operations.

/// Error type for registry operations
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RegistryError {
    /// No live room with this code (never created, expired, or deleted)
    RoomNotFound(String),
}

impl std::fmt::Display for RegistryError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            RegistryError::RoomNotFound(code) => write!(f, "Room not found: {}", code),
        }
    }
}

impl std::error::Error for RegistryError {}
