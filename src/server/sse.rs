//! Live channel adapter
//!
//! Bridges one room subscription onto a server-sent-event response. Every
//! stream opens with a `state` event carrying the connect-time snapshot,
//! strictly before any `update` event, then mirrors each published change.
//! Comment-frame keepalives ride alongside so idle-timeout intermediaries
//! leave the connection alone.

use axum::extract::{Path, State};
use axum::response::sse::{Event, KeepAlive, Sse};
use futures_util::{future, stream, Stream, StreamExt};
use tokio::sync::broadcast::error::RecvError;

use crate::registry::{RoomState, Subscription};

use super::error::ApiError;
use super::routes::AppState;

/// `GET /room/{code}/stream`: attach to a room's event stream
///
/// Teardown is carried by the subscription guard: dropping the response
/// body on any exit route detaches the receiver and decrements the room's
/// subscriber count, exactly once.
pub(super) async fn stream_room(
    State(state): State<AppState>,
    Path(code): Path<String>,
) -> Result<Sse<impl Stream<Item = Result<Event, axum::Error>>>, ApiError> {
    let (snapshot, subscription) = state.registry.subscribe(&code).await?;

    tracing::debug!(room = %subscription.code(), "Event stream opened");

    let events = state_stream(snapshot, subscription)
        .map(|(name, room)| Event::default().event(name).json_data(&room));

    Ok(Sse::new(events).keep_alive(
        KeepAlive::new()
            .interval(state.keepalive_interval)
            .text("keepalive"),
    ))
}

/// Ordered event stream for one subscription: the initial snapshot under
/// the `state` name, then every published snapshot under `update`.
fn state_stream(
    initial: RoomState,
    subscription: Subscription,
) -> impl Stream<Item = (&'static str, RoomState)> {
    let first = stream::once(future::ready(("state", initial)));

    let updates = stream::unfold(subscription, |mut subscription| async move {
        loop {
            match subscription.recv().await {
                Ok(room) => return Some((("update", room), subscription)),
                Err(RecvError::Lagged(missed)) => {
                    tracing::debug!(
                        room = %subscription.code(),
                        missed,
                        "Subscriber lagged, skipping to newer snapshots"
                    );
                }
                Err(RecvError::Closed) => {
                    // The room expired or was deleted while this stream is
                    // open. Hold the connection on keepalives alone until
                    // the client goes away.
                    tracing::debug!(
                        room = %subscription.code(),
                        "Room gone, stream idling until client disconnect"
                    );
                    future::pending::<()>().await;
                }
            }
        }
    });

    first.chain(updates)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;
    use std::time::Duration;

    use futures_util::pin_mut;

    use crate::command::Command;
    use crate::registry::RoomRegistry;

    use super::*;

    fn test_state() -> AppState {
        AppState {
            registry: Arc::new(RoomRegistry::new()),
            keepalive_interval: Duration::from_secs(15),
        }
    }

    #[tokio::test]
    async fn initial_state_precedes_updates() {
        let registry = RoomRegistry::new();
        let room = registry.create().await;

        let (snapshot, subscription) = registry.subscribe(&room.code).await.unwrap();

        // Command lands after subscription but before the stream is polled,
        // like a controller racing a freshly attached display.
        registry
            .apply(&room.code, &Command::Scroll { position: 42 })
            .await
            .unwrap();

        let stream = state_stream(snapshot.clone(), subscription);
        pin_mut!(stream);

        let (name, first) = stream.next().await.unwrap();
        assert_eq!(name, "state");
        assert_eq!(first, snapshot);

        let (name, second) = stream.next().await.unwrap();
        assert_eq!(name, "update");
        assert_eq!(second.scroll_position, 42);
    }

    #[tokio::test]
    async fn stream_stays_open_after_room_removal() {
        let registry = RoomRegistry::new();
        let room = registry.create().await;
        let (snapshot, subscription) = registry.subscribe(&room.code).await.unwrap();

        registry.delete(&room.code).await;

        let stream = state_stream(snapshot, subscription);
        pin_mut!(stream);

        let (name, _) = stream.next().await.unwrap();
        assert_eq!(name, "state");

        // The closed channel must neither yield an event nor end the
        // stream; only the client ends it.
        let next = tokio::time::timeout(Duration::from_millis(50), stream.next()).await;
        assert!(next.is_err());
    }

    #[tokio::test]
    async fn stream_for_unknown_room_is_not_found() {
        let result = stream_room(State(test_state()), Path("ZZZZ".to_string())).await;

        assert!(matches!(result, Err(ApiError::RoomNotFound)));
    }
}
