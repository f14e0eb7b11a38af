use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// One normalized pollutant measurement from the OpenAQ feed. A station
/// reporting several parameters yields one reading per parameter, all at the
/// same coordinates.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AirQualityReading {
    pub id: String,
    pub location: String,
    pub city: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    pub parameter: String,
    pub value: f64,
    pub unit: String,
    /// Upstream measurement timestamp, RFC 3339.
    pub last_updated: String,
}

impl AirQualityReading {
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

/// Fixed PM2.5 seed readings for hosts that want content before the first
/// successful poll (or with no network at all). Always served with a `Seed`
/// feed status, never dressed up as live data.
pub fn seed_air_quality(now_rfc3339: &str) -> Vec<AirQualityReading> {
    let seed = |id: &str, location: &str, city: &str, country: &str, lat: f64, lon: f64, value: f64| {
        AirQualityReading {
            id: id.to_string(),
            location: location.to_string(),
            city: city.to_string(),
            country: country.to_string(),
            latitude: lat,
            longitude: lon,
            parameter: "pm25".to_string(),
            value,
            unit: "µg/m³".to_string(),
            last_updated: now_rfc3339.to_string(),
        }
    };

    vec![
        seed("delhi-pm25", "Anand Vihar", "Delhi", "IN", 28.6469, 77.315, 162.0),
        seed("beijing-pm25", "Chaoyang", "Beijing", "CN", 39.9219, 116.4436, 98.0),
        seed("lahore-pm25", "Gulberg", "Lahore", "PK", 31.5204, 74.3587, 185.0),
        seed("mexico-pm25", "Iztapalapa", "Mexico City", "MX", 19.4326, -99.1332, 76.0),
    ]
}
