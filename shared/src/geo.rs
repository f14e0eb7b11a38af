use serde::{Deserialize, Serialize};

/// A WGS84 point: latitude in degrees north, longitude in degrees east.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GeoPoint {
    pub lat: f64,
    pub lon: f64,
}

impl GeoPoint {
    pub const fn new(lat: f64, lon: f64) -> Self {
        Self { lat, lon }
    }

    /// Finite and inside the valid WGS84 range.
    pub fn is_valid(&self) -> bool {
        self.lat.is_finite()
            && self.lon.is_finite()
            && (-90.0..=90.0).contains(&self.lat)
            && (-180.0..=180.0).contains(&self.lon)
    }

    /// `Some` only for coordinates that pass [`GeoPoint::is_valid`].
    pub fn checked(lat: f64, lon: f64) -> Option<Self> {
        let point = Self { lat, lon };
        point.is_valid().then_some(point)
    }
}

#[cfg(test)]
mod tests {
    use super::GeoPoint;

    #[test]
    fn accepts_range_boundaries() {
        assert!(GeoPoint::new(90.0, 180.0).is_valid());
        assert!(GeoPoint::new(-90.0, -180.0).is_valid());
        assert!(GeoPoint::new(0.0, 0.0).is_valid());
    }

    #[test]
    fn rejects_out_of_range_and_non_finite() {
        assert!(!GeoPoint::new(90.1, 0.0).is_valid());
        assert!(!GeoPoint::new(0.0, -180.5).is_valid());
        assert!(!GeoPoint::new(f64::NAN, 0.0).is_valid());
        assert!(!GeoPoint::new(0.0, f64::INFINITY).is_valid());
        assert!(GeoPoint::checked(f64::NAN, 0.0).is_none());
    }
}
