//! Live Stream Handler
//!
//! Server-Sent Events endpoint delivering new-message events to a
//! subscribed user without polling.

use std::convert::Infallible;
use std::time::Duration;

use axum::{
    extract::{Query, State},
    response::sse::{Event, KeepAlive, Sse},
};
use futures::Stream;

use crate::application::dto::request::StreamQuery;
use crate::presentation::live::registry::SubscriptionGuard;
use crate::startup::AppState;

/// `GET /api/v1/messages/stream?user_id=`
///
/// Opens one live channel for the given user, replacing any previous
/// one. The stream ends on client disconnect, on replacement by a newer
/// subscription, or after the configured idle lifetime with no delivered
/// message; in every case the guard removes the registration.
pub async fn stream_messages(
    State(state): State<AppState>,
    Query(query): Query<StreamQuery>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let subscription = state.live.subscribe(query.user_id);
    let guard = SubscriptionGuard::new(state.live.clone(), query.user_id, subscription.channel_id);
    let idle_timeout = state.settings.live.idle_timeout();

    let stream = futures::stream::unfold(
        (subscription.receiver, guard),
        move |(mut receiver, guard)| async move {
            match tokio::time::timeout(idle_timeout, receiver.recv()).await {
                Ok(Some(payload)) => match Event::default().json_data(&payload) {
                    Ok(event) => Some((Ok(event), (receiver, guard))),
                    Err(e) => {
                        tracing::warn!("Failed to encode live event: {}", e);
                        None
                    }
                },
                // Sender dropped: this channel was replaced or the
                // registry removed it after a failed push.
                Ok(None) => None,
                // Idle lifetime elapsed.
                Err(_) => None,
            }
        },
    );

    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(15)))
}
