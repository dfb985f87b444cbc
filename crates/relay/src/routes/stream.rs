//! Server-sent event stream of live alerts.

use std::time::Duration;

use axum::extract::State;
use axum::response::sse::{Event, KeepAlive, Sse};
use futures::stream::{Stream, StreamExt};
use tokio_stream::wrappers::UnboundedReceiverStream;
use tracing::info;

use crate::state::{wait_for_shutdown, AppState};

/// Stream every live alert to this client as a `new_alert` event.
///
/// Each connection gets its own subscription, so all connected clients see
/// every alert. The stream ends when the relay shuts down.
pub async fn alert_stream(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let subscription = state.broadcaster.subscribe();
    info!(subscriber = subscription.id(), "Live feed client connected");

    let events = UnboundedReceiverStream::new(subscription.into_receiver())
        .map(|alert| Event::default().event("new_alert").json_data(alert))
        .take_until(wait_for_shutdown(state.shutdown.clone()));

    Sse::new(events).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(15))
            .text("keep-alive"),
    )
}
