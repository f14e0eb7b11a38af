use std::convert::Infallible;
use std::sync::Arc;
use std::time::Duration;

use axum::extract::State;
use axum::response::Sse;
use axum::response::sse::{Event, KeepAlive};
use bytes::Bytes;
use futures::stream::Stream;
use terrawatch_shared::FeedKind;
use tokio_stream::StreamExt;
use tokio_stream::wrappers::BroadcastStream;
use tracing::warn;

use crate::config::SSE_KEEPALIVE_SECS;
use crate::state::AppState;

/// One event stream for all three feeds. On connect (and after a lagged
/// client falls behind the broadcast buffer) each feed's current document is
/// replayed as a named snapshot event; afterwards only changed feeds emit.
pub async fn feed_events(
    State(state): State<AppState>,
) -> Sse<impl Stream<Item = Result<Event, Infallible>>> {
    let stream = async_stream::stream! {
        for event in snapshot_events(&state).await {
            yield Ok(event);
        }

        let rx = state.event_tx.subscribe();
        let mut stream = BroadcastStream::new(rx);

        while let Some(result) = stream.next().await {
            match result {
                Ok(broadcast) => {
                    let Some(payload) = event_payload(broadcast.json.as_ref()) else {
                        warn!(
                            seq = broadcast.seq,
                            feed = broadcast.kind.as_str(),
                            "event payload is not valid utf-8; dropping SSE event"
                        );
                        continue;
                    };
                    yield Ok(
                        Event::default()
                            .id(broadcast.seq.to_string())
                            .event(broadcast.kind.as_str())
                            .data(payload),
                    );
                }
                Err(tokio_stream::wrappers::errors::BroadcastStreamRecvError::Lagged(skipped)) => {
                    warn!(
                        skipped_events = skipped,
                        "SSE client lagged behind broadcast buffer; replaying feed snapshots"
                    );
                    for event in snapshot_events(&state).await {
                        yield Ok(event);
                    }
                }
            }
        }
    };

    Sse::new(stream).keep_alive(
        KeepAlive::new()
            .interval(Duration::from_secs(SSE_KEEPALIVE_SECS))
            .text("keep-alive"),
    )
}

/// Pre-serialized current documents for all feeds. The Arc clone inside
/// `document()` is an O(1) refcount bump, not a payload copy.
async fn snapshot_events(state: &AppState) -> Vec<Event> {
    let mut events = Vec::with_capacity(FeedKind::ALL.len());

    for kind in FeedKind::ALL {
        let (seq, json): (u64, Arc<Bytes>) = match kind {
            FeedKind::Quakes => state.quakes.document().await,
            FeedKind::Air => state.air.document().await,
            FeedKind::NaturalEvents => state.natural_events.document().await,
        };
        let Some(payload) = event_payload(json.as_ref()) else {
            warn!(
                feed = kind.as_str(),
                "snapshot payload is not valid utf-8; skipping SSE snapshot event"
            );
            continue;
        };
        events.push(
            Event::default()
                .id(seq.to_string())
                .event(kind.as_str())
                .data(payload),
        );
    }

    events
}

fn event_payload(bytes: &Bytes) -> Option<&str> {
    std::str::from_utf8(bytes.as_ref()).ok()
}
