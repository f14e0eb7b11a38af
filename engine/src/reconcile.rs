use std::collections::HashMap;

use chrono::{DateTime, Utc};
use terrawatch_shared::severity::DARK_BLUE;
use terrawatch_shared::{AirQualityReading, LayerCategory, SeismicEvent, classify};

use crate::marker::{Marker, MarkerInfo, MarkerStyle};
use crate::record::LayerRecord;

/// Compute the full desired marker set for one category.
///
/// Pure with respect to its inputs: an inactive category yields an empty set,
/// records with invalid coordinates or of the wrong kind are skipped, and the
/// air-quality category is deduplicated by exact coordinate pair keeping the
/// highest value. Re-running with the same inputs yields the same markers.
pub fn desired_markers(
    category: LayerCategory,
    records: &[LayerRecord],
    active: bool,
) -> Vec<Marker> {
    if !active {
        return Vec::new();
    }

    let kept: Vec<&LayerRecord> = records
        .iter()
        .filter(|record| record.matches(category) && record.position().is_valid())
        .collect();

    let kept = if category == LayerCategory::AirQuality {
        dedup_by_coordinate(kept)
    } else {
        kept
    };

    kept.into_iter()
        .map(|record| build_marker(category, record))
        .collect()
}

/// Keep one record per exact (lat, lon) pair, preferring the highest value.
/// Several pollutant parameters can share a sensor location; only the worst
/// reading per location is shown. First-seen order is preserved.
fn dedup_by_coordinate(records: Vec<&LayerRecord>) -> Vec<&LayerRecord> {
    let mut kept: Vec<&LayerRecord> = Vec::with_capacity(records.len());
    let mut index_by_coord: HashMap<(u64, u64), usize> = HashMap::new();

    for record in records {
        let position = record.position();
        let key = (position.lat.to_bits(), position.lon.to_bits());
        match index_by_coord.get(&key) {
            Some(&index) => {
                if record.severity_value() > kept[index].severity_value() {
                    kept[index] = record;
                }
            }
            None => {
                index_by_coord.insert(key, kept.len());
                kept.push(record);
            }
        }
    }

    kept
}

fn build_marker(category: LayerCategory, record: &LayerRecord) -> Marker {
    let class = classify(category, record.severity_value());
    let style = match category {
        LayerCategory::Seismic => MarkerStyle {
            radius: class.radius,
            fill: class.color,
            fill_opacity: 0.7,
            stroke: class.color,
            stroke_opacity: 1.0,
            stroke_weight: 2.0,
        },
        LayerCategory::AirQuality => MarkerStyle {
            radius: class.radius,
            fill: class.color,
            fill_opacity: 0.6,
            stroke: class.color,
            stroke_opacity: 0.8,
            stroke_weight: 2.0,
        },
        LayerCategory::ForestCover => MarkerStyle {
            radius: class.radius,
            fill: class.color,
            fill_opacity: 0.3,
            stroke: class.color,
            stroke_opacity: 1.0,
            stroke_weight: 2.0,
        },
        LayerCategory::WaterLevel => MarkerStyle {
            radius: class.radius,
            fill: class.color,
            fill_opacity: 0.7,
            stroke: DARK_BLUE,
            stroke_opacity: 1.0,
            stroke_weight: 2.0,
        },
    };

    Marker {
        position: record.position(),
        style,
        info: build_info(category, record),
        record: record.clone(),
    }
}

fn build_info(category: LayerCategory, record: &LayerRecord) -> MarkerInfo {
    match (category, record) {
        (_, LayerRecord::Seismic(event)) => seismic_info(event),
        (_, LayerRecord::AirQuality(reading)) => air_info(reading),
        (LayerCategory::ForestCover, LayerRecord::Site(site)) => MarkerInfo {
            title: "Deforestation Alert".to_string(),
            lines: vec![
                site.name.clone(),
                format!("Affected Area: {}", site.metric),
                site.description.clone(),
            ],
        },
        (_, LayerRecord::Site(site)) => MarkerInfo {
            title: "Water Level Change".to_string(),
            lines: vec![site.name.clone(), site.metric.clone(), site.description.clone()],
        },
    }
}

fn seismic_info(event: &SeismicEvent) -> MarkerInfo {
    let place = if event.place.is_empty() {
        "Unknown location".to_string()
    } else {
        event.place.clone()
    };

    let mut lines = vec![place, format!("Depth: {}km", event.depth_km)];
    if let Some(time) = event.time() {
        lines.push(format_time(time));
    }
    if event.tsunami {
        lines.push("Tsunami Warning".to_string());
    }

    MarkerInfo {
        title: format!("M{:.1} Earthquake", event.magnitude),
        lines,
    }
}

fn air_info(reading: &AirQualityReading) -> MarkerInfo {
    MarkerInfo {
        title: reading.location.clone(),
        lines: vec![
            format!("{}, {}", reading.city, reading.country),
            format!("{:.1} {}", reading.value, reading.unit),
            reading.parameter.to_uppercase(),
            format!("Updated: {}", reading.last_updated),
        ],
    }
}

fn format_time(time: DateTime<Utc>) -> String {
    time.format("%Y-%m-%d %H:%M UTC").to_string()
}
