use std::time::Duration;

use axum::{
    Router,
    extract::{Query, State},
    response::sse::{Event, KeepAlive, Sse},
    routing::get,
};
use serde::Deserialize;
use tokio_stream::{
    Stream, StreamExt,
    wrappers::{BroadcastStream, errors::BroadcastStreamRecvError},
};
use utoipa::ToSchema;

use crate::{
    events::{OrderEvent, OrderEventKind},
    state::AppState,
};

const KEEP_ALIVE_SECS: u64 = 15;

pub fn router() -> Router<AppState> {
    Router::new().route("/stream", get(stream_events))
}

#[derive(Debug, Default, Deserialize, ToSchema)]
pub struct EventStreamQuery {
    pub kind: Option<OrderEventKind>,
}

/// Order events published after the client connects. Nothing is replayed.
#[utoipa::path(
    get,
    path = "/api/events/stream",
    params(
        ("kind" = Option<String>, Query, description = "order_created, order_updated, order_assigned or order_delivered")
    ),
    responses(
        (status = 200, description = "Server-sent order events", content_type = "text/event-stream", body = OrderEvent)
    ),
    tag = "Events"
)]
pub async fn stream_events(
    State(state): State<AppState>,
    Query(query): Query<EventStreamQuery>,
) -> Sse<impl Stream<Item = Result<Event, axum::Error>>> {
    let wanted = query.kind;
    let stream = BroadcastStream::new(state.live.subscribe()).filter_map(move |msg| match msg {
        Ok(event) if wanted.is_none_or(|kind| kind == event.kind) => Some(
            Event::default()
                .event(event.kind.as_str())
                .json_data(&event),
        ),
        Ok(_) => None,
        Err(BroadcastStreamRecvError::Lagged(skipped)) => {
            tracing::warn!(skipped, "event stream client lagged");
            None
        }
    });

    Sse::new(stream).keep_alive(KeepAlive::new().interval(Duration::from_secs(KEEP_ALIVE_SECS)))
}
