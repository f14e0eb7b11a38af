use serde::Deserialize;
use terrawatch_shared::{FeedKind, SeismicEvent};
use tracing::warn;

use crate::config::{USGS_ALL_DAY_URL, quake_poll_interval};
use crate::services::{body_preview, fetch_feed_bytes};
use crate::state::AppState;

pub async fn run(state: AppState) {
    let mut interval = tokio::time::interval(quake_poll_interval());

    loop {
        interval.tick().await;

        match fetch_quakes(&state.http_client).await {
            Ok(records) => {
                state
                    .quakes
                    .publish(&state.next_seq, &state.event_tx, records)
                    .await;
            }
            Err(e) => {
                state.observability.record_poll_failure(FeedKind::Quakes);
                warn!("failed to fetch USGS earthquake feed: {e}");
                state.quakes.degrade(e).await;
            }
        }
    }
}

async fn fetch_quakes(client: &reqwest::Client) -> Result<Vec<SeismicEvent>, String> {
    let bytes = fetch_feed_bytes(client, USGS_ALL_DAY_URL).await?;
    parse_usgs_payload(bytes.as_ref()).map_err(|e| {
        format!(
            "failed to decode earthquake payload: {e}; body preview: {}",
            body_preview(&bytes)
        )
    })
}

#[derive(Deserialize)]
struct RawFeed {
    #[serde(default)]
    features: Vec<RawFeature>,
}

#[derive(Deserialize)]
struct RawFeature {
    #[serde(default)]
    id: Option<String>,
    #[serde(default)]
    properties: Option<RawProperties>,
    #[serde(default)]
    geometry: Option<RawGeometry>,
}

#[derive(Deserialize)]
struct RawProperties {
    #[serde(default)]
    mag: Option<f64>,
    #[serde(default)]
    place: Option<String>,
    #[serde(default)]
    time: Option<i64>,
    #[serde(default)]
    tsunami: Option<i64>,
}

#[derive(Deserialize)]
struct RawGeometry {
    #[serde(default)]
    coordinates: Vec<f64>,
}

/// Decode the USGS GeoJSON summary feed. Features with a null magnitude or
/// without point coordinates are dropped rather than failing the whole poll.
fn parse_usgs_payload(bytes: &[u8]) -> Result<Vec<SeismicEvent>, serde_json::Error> {
    let raw: RawFeed = serde_json::from_slice(bytes)?;
    Ok(raw
        .features
        .into_iter()
        .filter_map(|feature| {
            let id = feature.id?;
            let properties = feature.properties?;
            let magnitude = properties.mag?;
            let coordinates = feature.geometry?.coordinates;
            let &[longitude, latitude, ..] = coordinates.as_slice() else {
                return None;
            };

            Some(SeismicEvent {
                id,
                magnitude,
                place: properties
                    .place
                    .map(|place| place.trim().to_string())
                    .unwrap_or_default(),
                time_millis: properties.time.unwrap_or_default(),
                longitude,
                latitude,
                depth_km: coordinates.get(2).copied().unwrap_or_default(),
                tsunami: properties.tsunami.unwrap_or_default() != 0,
            })
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::parse_usgs_payload;

    #[test]
    fn parses_features_and_drops_null_magnitudes() {
        let payload = r#"{
            "features": [
                {
                    "id": "us7000abcd",
                    "properties": {"mag": 6.1, "place": " 12km SW of Town ", "time": 1700000000000, "tsunami": 1},
                    "geometry": {"coordinates": [139.7, 35.6, 42.3]}
                },
                {
                    "id": "us7000null",
                    "properties": {"mag": null, "place": "Somewhere", "time": 1700000000000},
                    "geometry": {"coordinates": [0.0, 0.0, 10.0]}
                },
                {
                    "id": "us7000nogeo",
                    "properties": {"mag": 4.2, "place": "Nowhere", "time": 1700000000000}
                }
            ]
        }"#;

        let events = parse_usgs_payload(payload.as_bytes()).expect("payload should parse");

        assert_eq!(events.len(), 1);
        let event = &events[0];
        assert_eq!(event.id, "us7000abcd");
        assert_eq!(event.magnitude, 6.1);
        assert_eq!(event.place, "12km SW of Town");
        assert_eq!(event.latitude, 35.6);
        assert_eq!(event.longitude, 139.7);
        assert_eq!(event.depth_km, 42.3);
        assert!(event.tsunami);
    }

    #[test]
    fn tolerates_missing_optional_fields() {
        let payload = r#"{
            "features": [
                {
                    "id": "shallow",
                    "properties": {"mag": 2.5},
                    "geometry": {"coordinates": [-120.1, 36.2]}
                }
            ]
        }"#;

        let events = parse_usgs_payload(payload.as_bytes()).expect("payload should parse");

        assert_eq!(events.len(), 1);
        assert_eq!(events[0].place, "");
        assert_eq!(events[0].time_millis, 0);
        assert_eq!(events[0].depth_km, 0.0);
        assert!(!events[0].tsunami);
    }

    #[test]
    fn empty_feed_parses_to_no_events() {
        let events = parse_usgs_payload(br#"{"features": []}"#).expect("payload should parse");
        assert!(events.is_empty());
        let events = parse_usgs_payload(br#"{}"#).expect("payload should parse");
        assert!(events.is_empty());
    }
}
