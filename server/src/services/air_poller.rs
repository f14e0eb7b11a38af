use serde::Deserialize;
use terrawatch_shared::{AirQualityReading, FeedKind};
use tracing::warn;

use crate::config::{OPENAQ_LATEST_URL, air_poll_interval};
use crate::services::{body_preview, fetch_feed_bytes};
use crate::state::AppState;

pub async fn run(state: AppState) {
    let mut interval = tokio::time::interval(air_poll_interval());

    loop {
        interval.tick().await;

        match fetch_air_quality(&state.http_client).await {
            Ok(records) if records.is_empty() => {
                // An empty result set is treated as an upstream hiccup so the
                // seeded/last-good readings stay on the map.
                state.observability.record_poll_failure(FeedKind::Air);
                warn!("OpenAQ returned no usable measurements");
                state
                    .air
                    .degrade("no usable measurements in response".to_string())
                    .await;
            }
            Ok(records) => {
                state
                    .air
                    .publish(&state.next_seq, &state.event_tx, records)
                    .await;
            }
            Err(e) => {
                state.observability.record_poll_failure(FeedKind::Air);
                warn!("failed to fetch OpenAQ feed: {e}");
                state.air.degrade(e).await;
            }
        }
    }
}

async fn fetch_air_quality(client: &reqwest::Client) -> Result<Vec<AirQualityReading>, String> {
    let bytes = fetch_feed_bytes(client, OPENAQ_LATEST_URL).await?;
    parse_openaq_payload(bytes.as_ref()).map_err(|e| {
        format!(
            "failed to decode air quality payload: {e}; body preview: {}",
            body_preview(&bytes)
        )
    })
}

#[derive(Deserialize)]
struct RawResponse {
    #[serde(default)]
    results: Vec<RawStation>,
}

#[derive(Deserialize)]
struct RawStation {
    #[serde(default)]
    location: Option<String>,
    #[serde(default)]
    city: Option<String>,
    #[serde(default)]
    country: Option<String>,
    #[serde(default)]
    coordinates: Option<RawCoordinates>,
    #[serde(default)]
    measurements: Vec<RawMeasurement>,
}

#[derive(Deserialize)]
struct RawCoordinates {
    latitude: f64,
    longitude: f64,
}

#[derive(Deserialize)]
struct RawMeasurement {
    #[serde(default)]
    parameter: Option<String>,
    #[serde(default)]
    value: Option<f64>,
    #[serde(default)]
    unit: Option<String>,
    #[serde(rename = "lastUpdated", default)]
    last_updated: Option<String>,
}

/// Decode the OpenAQ latest-measurements payload, flattening one record per
/// station measurement. Stations without coordinates and measurements without
/// a value are dropped.
fn parse_openaq_payload(bytes: &[u8]) -> Result<Vec<AirQualityReading>, serde_json::Error> {
    let raw: RawResponse = serde_json::from_slice(bytes)?;
    let mut readings = Vec::new();

    for station in raw.results {
        let Some(coordinates) = station.coordinates else {
            continue;
        };
        let location = station
            .location
            .as_deref()
            .map(str::trim)
            .filter(|location| !location.is_empty())
            .unwrap_or("Unknown station")
            .to_string();
        let city = station.city.unwrap_or_default();
        let country = station.country.unwrap_or_default();

        for (index, measurement) in station.measurements.into_iter().enumerate() {
            let Some(value) = measurement.value else {
                continue;
            };
            let parameter = measurement.parameter.unwrap_or_default();
            readings.push(AirQualityReading {
                id: format!("{location}-{parameter}-{index}"),
                location: location.clone(),
                city: city.clone(),
                country: country.clone(),
                latitude: coordinates.latitude,
                longitude: coordinates.longitude,
                parameter,
                value,
                unit: measurement.unit.unwrap_or_default(),
                last_updated: measurement.last_updated.unwrap_or_default(),
            });
        }
    }

    Ok(readings)
}

#[cfg(test)]
mod tests {
    use super::parse_openaq_payload;

    #[test]
    fn flattens_measurements_and_drops_stations_without_coordinates() {
        let payload = r#"{
            "results": [
                {
                    "location": "US Diplomatic Post: New Delhi",
                    "city": "Delhi",
                    "country": "IN",
                    "coordinates": {"latitude": 28.6, "longitude": 77.2},
                    "measurements": [
                        {"parameter": "pm25", "value": 162.0, "unit": "µg/m³", "lastUpdated": "2026-08-25T00:00:00Z"},
                        {"parameter": "no2", "value": 41.5, "unit": "µg/m³", "lastUpdated": "2026-08-25T00:00:00Z"}
                    ]
                },
                {
                    "location": "Ghost Station",
                    "city": "Nowhere",
                    "country": "XX",
                    "coordinates": null,
                    "measurements": [
                        {"parameter": "pm25", "value": 10.0, "unit": "µg/m³"}
                    ]
                }
            ]
        }"#;

        let readings = parse_openaq_payload(payload.as_bytes()).expect("payload should parse");

        assert_eq!(readings.len(), 2);
        assert_eq!(readings[0].id, "US Diplomatic Post: New Delhi-pm25-0");
        assert_eq!(readings[0].value, 162.0);
        assert_eq!(readings[1].id, "US Diplomatic Post: New Delhi-no2-1");
        assert_eq!(readings[1].parameter, "no2");
    }

    #[test]
    fn tolerates_null_city_and_missing_values() {
        let payload = r#"{
            "results": [
                {
                    "location": null,
                    "city": null,
                    "country": "BR",
                    "coordinates": {"latitude": -23.5, "longitude": -46.6},
                    "measurements": [
                        {"parameter": "pm25", "value": null},
                        {"parameter": "pm10", "value": 33.0, "unit": "µg/m³"}
                    ]
                }
            ]
        }"#;

        let readings = parse_openaq_payload(payload.as_bytes()).expect("payload should parse");

        assert_eq!(readings.len(), 1);
        assert_eq!(readings[0].location, "Unknown station");
        assert_eq!(readings[0].city, "");
        assert_eq!(readings[0].parameter, "pm10");
    }

    #[test]
    fn empty_response_parses_to_no_readings() {
        assert!(
            parse_openaq_payload(br#"{"results": []}"#)
                .expect("payload should parse")
                .is_empty()
        );
        assert!(
            parse_openaq_payload(br#"{}"#)
                .expect("payload should parse")
                .is_empty()
        );
    }
}
