use serde::Deserialize;
use terrawatch_shared::{FeedKind, NaturalEvent};
use tracing::warn;

use crate::config::{EONET_EVENTS_URL, eonet_poll_interval};
use crate::services::{body_preview, fetch_feed_bytes};
use crate::state::AppState;

pub async fn run(state: AppState) {
    let mut interval = tokio::time::interval(eonet_poll_interval());

    loop {
        interval.tick().await;

        match fetch_natural_events(&state.http_client).await {
            Ok(records) if records.is_empty() => {
                state
                    .observability
                    .record_poll_failure(FeedKind::NaturalEvents);
                warn!("EONET returned no mappable events");
                state
                    .natural_events
                    .degrade("no mappable events in response".to_string())
                    .await;
            }
            Ok(records) => {
                state
                    .natural_events
                    .publish(&state.next_seq, &state.event_tx, records)
                    .await;
            }
            Err(e) => {
                state
                    .observability
                    .record_poll_failure(FeedKind::NaturalEvents);
                warn!("failed to fetch EONET feed: {e}");
                state.natural_events.degrade(e).await;
            }
        }
    }
}

async fn fetch_natural_events(client: &reqwest::Client) -> Result<Vec<NaturalEvent>, String> {
    let bytes = fetch_feed_bytes(client, EONET_EVENTS_URL).await?;
    parse_eonet_payload(bytes.as_ref()).map_err(|e| {
        format!(
            "failed to decode natural-event payload: {e}; body preview: {}",
            body_preview(&bytes)
        )
    })
}

#[derive(Deserialize)]
struct RawResponse {
    #[serde(default)]
    events: Vec<RawEvent>,
}

#[derive(Deserialize)]
struct RawEvent {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    title: Option<String>,
    #[serde(default)]
    closed: Option<String>,
    #[serde(default)]
    categories: Vec<RawCategory>,
    #[serde(default)]
    geometry: Vec<RawGeometry>,
}

#[derive(Deserialize)]
struct RawCategory {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    title: Option<String>,
}

#[derive(Deserialize)]
struct RawGeometry {
    #[serde(default)]
    date: Option<String>,
    #[serde(rename = "type", default)]
    kind: Option<String>,
    // Point coordinates are [lon, lat]; polygons nest arrays, so decode
    // loosely and pick out point geometries only.
    #[serde(default)]
    coordinates: serde_json::Value,
}

/// Decode the EONET open-events payload. Each event is pinned at its most
/// recent point geometry; events with only polygon geometries are dropped.
fn parse_eonet_payload(bytes: &[u8]) -> Result<Vec<NaturalEvent>, serde_json::Error> {
    let raw: RawResponse = serde_json::from_slice(bytes)?;
    Ok(raw
        .events
        .into_iter()
        .filter_map(|event| {
            let id = event.id?;
            let geometry = event
                .geometry
                .iter()
                .rev()
                .find(|g| g.kind.as_deref() == Some("Point"))?;
            let (longitude, latitude) = point_coordinates(&geometry.coordinates)?;
            let category = event.categories.first();

            Some(NaturalEvent {
                id,
                title: event.title.unwrap_or_default(),
                category_id: category
                    .and_then(|c| c.id.clone())
                    .unwrap_or_else(|| "unknown".to_string()),
                category_title: category
                    .and_then(|c| c.title.clone())
                    .unwrap_or_else(|| "Unknown".to_string()),
                longitude,
                latitude,
                date: geometry.date.clone().unwrap_or_default(),
                closed: event.closed,
            })
        })
        .collect())
}

fn point_coordinates(value: &serde_json::Value) -> Option<(f64, f64)> {
    let coordinates = value.as_array()?;
    match coordinates.as_slice() {
        [lon, lat, ..] => Some((lon.as_f64()?, lat.as_f64()?)),
        _ => None,
    }
}

#[cfg(test)]
mod tests {
    use super::parse_eonet_payload;

    #[test]
    fn pins_events_at_their_latest_point_geometry() {
        let payload = r#"{
            "events": [
                {
                    "id": "EONET_6513",
                    "title": "Tropical Storm Alpha",
                    "closed": null,
                    "categories": [{"id": "severeStorms", "title": "Severe Storms"}],
                    "geometry": [
                        {"date": "2026-08-23T00:00:00Z", "type": "Point", "coordinates": [-40.1, 15.2]},
                        {"date": "2026-08-24T00:00:00Z", "type": "Point", "coordinates": [-42.7, 16.8]}
                    ]
                }
            ]
        }"#;

        let events = parse_eonet_payload(payload.as_bytes()).expect("payload should parse");

        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert_eq!(event.id, "EONET_6513");
        assert_eq!(event.category_id, "severeStorms");
        assert_eq!(event.longitude, -42.7);
        assert_eq!(event.latitude, 16.8);
        assert_eq!(event.date, "2026-08-24T00:00:00Z");
        assert!(event.closed.is_none());
    }

    #[test]
    fn drops_polygon_only_events_and_tolerates_missing_categories() {
        let payload = r#"{
            "events": [
                {
                    "id": "EONET_9001",
                    "title": "Large Wildfire Perimeter",
                    "categories": [],
                    "geometry": [
                        {"date": "2026-08-20T00:00:00Z", "type": "Polygon",
                         "coordinates": [[[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 0.0]]]}
                    ]
                },
                {
                    "id": "EONET_9002",
                    "title": "Iceberg A23a",
                    "categories": [],
                    "geometry": [
                        {"date": "2026-08-21T00:00:00Z", "type": "Point", "coordinates": [-38.0, -54.5]}
                    ]
                }
            ]
        }"#;

        let events = parse_eonet_payload(payload.as_bytes()).expect("payload should parse");

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].id, "EONET_9002");
        assert_eq!(events[0].category_id, "unknown");
        assert_eq!(events[0].category_title, "Unknown");
    }

    #[test]
    fn empty_response_parses_to_no_events() {
        assert!(
            parse_eonet_payload(br#"{"events": []}"#)
                .expect("payload should parse")
                .is_empty()
        );
        assert!(
            parse_eonet_payload(br#"{}"#)
                .expect("payload should parse")
                .is_empty()
        );
    }
}
