use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// One normalized natural event from the NASA EONET feed, reduced to its most
/// recent point geometry.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct NaturalEvent {
    pub id: String,
    pub title: String,
    pub category_id: String,
    pub category_title: String,
    pub longitude: f64,
    pub latitude: f64,
    /// Geometry timestamp, RFC 3339.
    pub date: String,
    /// Close timestamp when the event is resolved, RFC 3339.
    #[serde(default)]
    pub closed: Option<String>,
}

impl NaturalEvent {
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// Fixed open events served with a `Seed` feed status until the first
/// successful EONET poll.
pub fn seed_natural_events(now_rfc3339: &str) -> Vec<NaturalEvent> {
    let seed = |id: &str, title: &str, cat_id: &str, cat_title: &str, lon: f64, lat: f64| {
        NaturalEvent {
            id: id.to_string(),
            title: title.to_string(),
            category_id: cat_id.to_string(),
            category_title: cat_title.to_string(),
            longitude: lon,
            latitude: lat,
            date: now_rfc3339.to_string(),
            closed: None,
        }
    };

    vec![
        seed("EONET_1", "Wildfire in Northern California", "wildfires", "Wildfires", -121.5, 39.7),
        seed("EONET_2", "Tropical Storm in Western Pacific", "severeStorms", "Severe Storms", 135.2, 18.4),
        seed("EONET_3", "Volcanic Activity - Mount Etna", "volcanoes", "Volcanoes", 15.0, 37.75),
        seed("EONET_4", "Iceberg Drift in South Atlantic", "seaLakeIce", "Sea and Lake Ice", -40.0, -60.5),
        seed("EONET_5", "Flooding in Bangladesh", "floods", "Floods", 90.4, 23.8),
    ]
}
