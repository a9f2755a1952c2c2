//! Remote control commands
//!
//! Controllers submit commands as externally tagged JSON (`{"type": ...}`).
//! Decoding validates in stages so callers can tell malformed input apart
//! from a room that no longer exists; translation into a state patch is a
//! pure function of the command and the room's current state.

use serde::Deserialize;

use crate::registry::{RoomPatch, RoomState};

/// Command tags accepted on the wire, in dispatch order
const KNOWN_TYPES: &[&str] = &[
    "setSong",
    "nextSection",
    "prevSection",
    "scroll",
    "transpose",
    "setAutoScroll",
];

/// A validated controller command
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(tag = "type", rename_all = "camelCase")]
pub enum Command {
    /// Select a song; section and scroll restart from the top
    #[serde(rename_all = "camelCase")]
    SetSong { song_id: String },

    /// Advance one section. No upper clamp: the controller knows the
    /// section count and stops at the last one.
    NextSection,

    /// Go back one section, saturating at the first
    PrevSection,

    /// Jump the display to a scroll percentage
    Scroll { position: i32 },

    /// Set the transpose offset in semitones
    Transpose { value: i32 },

    /// Toggle autoscroll; a missing `speed` keeps the previous speed
    SetAutoScroll {
        enabled: bool,
        #[serde(default)]
        speed: Option<u8>,
    },
}

impl Command {
    /// Decode a command from a raw request body
    ///
    /// Rejections are staged: undecodable bodies, then a missing or
    /// non-string `type`, then an unrecognized tag, then bad fields for a
    /// known tag. Nothing here touches room state.
    pub fn parse(body: &[u8]) -> Result<Command, CommandError> {
        let value: serde_json::Value =
            serde_json::from_slice(body).map_err(|_| CommandError::InvalidJson)?;

        let tag = match value.get("type").and_then(serde_json::Value::as_str) {
            Some(tag) => tag.to_string(),
            None => return Err(CommandError::MissingType),
        };

        if !KNOWN_TYPES.contains(&tag.as_str()) {
            return Err(CommandError::UnknownType(tag));
        }

        serde_json::from_value(value).map_err(|e| CommandError::InvalidPayload(e.to_string()))
    }

    /// Wire tag of this command, for logging
    pub fn kind(&self) -> &'static str {
        match self {
            Command::SetSong { .. } => "setSong",
            Command::NextSection => "nextSection",
            Command::PrevSection => "prevSection",
            Command::Scroll { .. } => "scroll",
            Command::Transpose { .. } => "transpose",
            Command::SetAutoScroll { .. } => "setAutoScroll",
        }
    }

    /// Translate this command into a partial state update
    ///
    /// `current` is the room state the command executes against; only the
    /// section commands read it.
    pub fn to_patch(&self, current: &RoomState) -> RoomPatch {
        match self {
            Command::SetSong { song_id } => RoomPatch {
                current_song: Some(song_id.clone()),
                current_section: Some(0),
                scroll_position: Some(0),
                ..RoomPatch::default()
            },
            Command::NextSection => RoomPatch {
                current_section: Some(current.current_section.saturating_add(1)),
                ..RoomPatch::default()
            },
            Command::PrevSection => RoomPatch {
                current_section: Some(current.current_section.saturating_sub(1)),
                ..RoomPatch::default()
            },
            Command::Scroll { position } => RoomPatch {
                scroll_position: Some(*position),
                ..RoomPatch::default()
            },
            Command::Transpose { value } => RoomPatch {
                transpose: Some(*value),
                ..RoomPatch::default()
            },
            Command::SetAutoScroll { enabled, speed } => RoomPatch {
                auto_scroll: Some(*enabled),
                auto_scroll_speed: *speed,
                ..RoomPatch::default()
            },
        }
    }
}

/// Error type for command decoding
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum CommandError {
    /// Body is not valid JSON
    InvalidJson,
    /// Decoded JSON has no string `type` field
    MissingType,
    /// `type` names no known command
    UnknownType(String),
    /// Known command with missing or mistyped fields
    InvalidPayload(String),
}

impl std::fmt::Display for CommandError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            CommandError::InvalidJson => write!(f, "Invalid JSON body"),
            CommandError::MissingType => write!(f, "Invalid command format"),
            CommandError::UnknownType(tag) => write!(f, "Unknown command type: {}", tag),
            CommandError::InvalidPayload(detail) => {
                write!(f, "Invalid command payload: {}", detail)
            }
        }
    }
}

impl std::error::Error for CommandError {}
