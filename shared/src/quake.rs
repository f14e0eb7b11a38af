use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// One normalized earthquake reading from the USGS feed.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SeismicEvent {
    pub id: String,
    pub magnitude: f64,
    pub place: String,
    /// Origin time as Unix milliseconds, as reported upstream.
    pub time_millis: i64,
    pub longitude: f64,
    pub latitude: f64,
    pub depth_km: f64,
    #[serde(default)]
    pub tsunami: bool,
}

impl SeismicEvent {
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }

    pub fn time(&self) -> Option<DateTime<Utc>> {
        DateTime::from_timestamp_millis(self.time_millis)
    }
}
