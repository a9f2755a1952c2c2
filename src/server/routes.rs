//! HTTP routes and JSON handlers
//!
//! The room API mirrors what displays and controllers call: create a room,
//! read its snapshot, submit a command, or attach to its event stream.

use std::sync::Arc;
use std::time::Duration;

use axum::body::Bytes;
use axum::extract::{Path, State};
use axum::http::StatusCode;
use axum::routing::{get, post};
use axum::{Json, Router};
use serde::Serialize;

use crate::command::Command;
use crate::registry::{RoomRegistry, RoomState};

use super::error::ApiError;
use super::sse::stream_room;

/// Shared state handed to every handler
#[derive(Clone)]
pub struct AppState {
    pub registry: Arc<RoomRegistry>,
    pub keepalive_interval: Duration,
}

/// Build the room API router
pub fn router(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/room", post(create_room))
        .route("/room/{code}", get(get_room))
        .route("/room/{code}/command", post(submit_command))
        .route("/room/{code}/stream", get(stream_room))
        .with_state(state)
}

#[derive(Serialize)]
struct HealthResponse {
    status: &'static str,
}

/// Response to a successfully applied command
#[derive(Debug, Serialize)]
struct CommandResponse {
    success: bool,
    room: RoomState,
}

async fn health() -> Json<HealthResponse> {
    Json(HealthResponse { status: "ok" })
}

/// `POST /room`: allocate a room and return its initial snapshot
async fn create_room(State(state): State<AppState>) -> (StatusCode, Json<RoomState>) {
    let room = state.registry.create().await;
    (StatusCode::CREATED, Json(room))
}

/// `GET /room/{code}`: current snapshot; reading extends the room's lease
async fn get_room(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Json<RoomState>, ApiError> {
    state
        .registry
        .get(&code)
        .await
        .map(Json)
        .ok_or(ApiError::RoomNotFound)
}

/// `POST /room/{code}/command`: validate and apply one controller command
///
/// The room is resolved before the body is parsed, so a request that is
/// both malformed and aimed at a dead room reports the dead room.
async fn submit_command(
    State(state): State<AppState>,
    Path(code): Path<String>,
    body: Bytes,
) -> Result<Json<CommandResponse>, ApiError> {
    if state.registry.get(&code).await.is_none() {
        return Err(ApiError::RoomNotFound);
    }

    let command = Command::parse(&body)?;
    let room = state.registry.apply(&code, &command).await?;

    Ok(Json(CommandResponse {
        success: true,
        room,
    }))
}

#[cfg(test)]
mod tests {
    use crate::command::CommandError;
    use crate::registry::RegistryConfig;

    use super::*;

    fn test_state() -> AppState {
        AppState {
            registry: Arc::new(RoomRegistry::with_config(RegistryConfig::default())),
            keepalive_interval: Duration::from_secs(15),
        }
    }

    #[tokio::test]
    async fn create_room_returns_created_snapshot() {
        let state = test_state();

        let (status, Json(room)) = create_room(State(state.clone())).await;

        assert_eq!(status, StatusCode::CREATED);
        assert_eq!(room.code.len(), 4);
        assert_eq!(room.current_section, 0);
        assert!(state.registry.get(&room.code).await.is_some());
    }

    #[tokio::test]
    async fn get_room_reports_unknown_code() {
        let state = test_state();

        let result = get_room(State(state), Path("ZZZZ".to_string())).await;
        assert!(matches!(result, Err(ApiError::RoomNotFound)));
    }

    #[tokio::test]
    async fn command_round_trip() {
        let state = test_state();
        let room = state.registry.create().await;

        let body = Bytes::from_static(br#"{"type":"setSong","songId":"bae-bae-lille-lam"}"#);
        let Json(response) = submit_command(State(state), Path(room.code.clone()), body)
            .await
            .unwrap();

        assert!(response.success);
        assert_eq!(response.room.current_song, Some("bae-bae-lille-lam".into()));
        assert_eq!(response.room.current_section, 0);
        assert_eq!(response.room.scroll_position, 0);
    }

    #[tokio::test]
    async fn command_for_unknown_room_is_not_found() {
        let state = test_state();

        // Room resolution wins even though the body is also malformed.
        let body = Bytes::from_static(b"{");
        let result = submit_command(State(state), Path("ZZZZ".to_string()), body).await;

        assert!(matches!(result, Err(ApiError::RoomNotFound)));
    }

    #[tokio::test]
    async fn unknown_command_is_rejected_without_side_effects() {
        let state = test_state();
        let room = state.registry.create().await;
        let (_, mut sub) = state.registry.subscribe(&room.code).await.unwrap();

        let body = Bytes::from_static(br#"{"type":"bogus"}"#);
        let result = submit_command(State(state.clone()), Path(room.code.clone()), body).await;

        assert_eq!(
            result.unwrap_err(),
            ApiError::InvalidCommand(CommandError::UnknownType("bogus".into()))
        );

        let after = state.registry.get(&room.code).await.unwrap();
        assert_eq!(after.current_song, room.current_song);
        assert_eq!(after.current_section, room.current_section);
        assert_eq!(after.scroll_position, room.scroll_position);

        // No broadcast fired for the rejected command: the first snapshot
        // the subscriber sees is the scroll applied below.
        let body = Bytes::from_static(br#"{"type":"scroll","position":50}"#);
        submit_command(State(state), Path(room.code.clone()), body)
            .await
            .unwrap();

        let received = sub.recv().await.unwrap();
        assert_eq!(received.scroll_position, 50);
    }

    #[tokio::test]
    async fn invalid_json_is_bad_request() {
        let state = test_state();
        let room = state.registry.create().await;

        let body = Bytes::from_static(b"no json here");
        let result = submit_command(State(state), Path(room.code), body).await;

        assert_eq!(
            result.unwrap_err(),
            ApiError::InvalidCommand(CommandError::InvalidJson)
        );
    }

    #[tokio::test]
    async fn room_codes_accept_lowercase_input() {
        let state = test_state();
        let room = state.registry.create().await;

        let Json(found) = get_room(State(state), Path(room.code.to_ascii_lowercase()))
            .await
            .unwrap();
        assert_eq!(found.code, room.code);
    }
}
