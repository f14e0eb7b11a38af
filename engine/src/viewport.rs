use serde::{Deserialize, Serialize};
use terrawatch_shared::GeoPoint;

/// Pan/zoom/center state of the map, independent of any data layer. Created
/// once when the surface initializes and mutated only by explicit user
/// interaction or a programmatic fly-to; reconciliation never touches it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Viewport {
    center: GeoPoint,
    zoom: f64,
    min_zoom: f64,
    max_zoom: f64,
}

impl Viewport {
    pub(crate) fn new(center: GeoPoint, zoom: f64, min_zoom: f64, max_zoom: f64) -> Self {
        let max_zoom = max_zoom.max(min_zoom);
        Self {
            center,
            zoom: zoom.clamp(min_zoom, max_zoom),
            min_zoom,
            max_zoom,
        }
    }

    pub fn center(&self) -> GeoPoint {
        self.center
    }

    pub fn zoom(&self) -> f64 {
        self.zoom
    }

    /// Jump to a new center and zoom. Invalid coordinates are ignored so a
    /// malformed selection cannot fling the map off the globe.
    pub fn fly_to(&mut self, center: GeoPoint, zoom: f64) {
        if !center.is_valid() {
            return;
        }
        self.center = center;
        self.zoom = zoom.clamp(self.min_zoom, self.max_zoom);
    }

    /// Pan by a latitude/longitude delta. Latitude clamps at the poles,
    /// longitude wraps across the antimeridian.
    pub fn pan_by(&mut self, dlat: f64, dlon: f64) {
        if !dlat.is_finite() || !dlon.is_finite() {
            return;
        }
        self.center.lat = (self.center.lat + dlat).clamp(-90.0, 90.0);
        self.center.lon = wrap_longitude(self.center.lon + dlon);
    }

    pub fn zoom_by(&mut self, delta: f64) {
        if !delta.is_finite() {
            return;
        }
        self.zoom = (self.zoom + delta).clamp(self.min_zoom, self.max_zoom);
    }
}

fn wrap_longitude(lon: f64) -> f64 {
    let wrapped = (lon + 180.0).rem_euclid(360.0) - 180.0;
    // rem_euclid maps 180 to -180; keep the canonical positive edge.
    if wrapped == -180.0 && lon >= 0.0 { 180.0 } else { wrapped }
}

#[cfg(test)]
mod tests {
    use terrawatch_shared::GeoPoint;

    use super::Viewport;

    fn world_view() -> Viewport {
        Viewport::new(GeoPoint::new(20.0, 0.0), 2.0, 2.0, 18.0)
    }

    #[test]
    fn fly_to_clamps_zoom_to_bounds() {
        let mut viewport = world_view();
        viewport.fly_to(GeoPoint::new(35.0, 139.0), 25.0);
        assert_eq!(viewport.zoom(), 18.0);
        viewport.fly_to(GeoPoint::new(35.0, 139.0), 0.5);
        assert_eq!(viewport.zoom(), 2.0);
        assert_eq!(viewport.center(), GeoPoint::new(35.0, 139.0));
    }

    #[test]
    fn fly_to_rejects_invalid_targets() {
        let mut viewport = world_view();
        let before = viewport.clone();
        viewport.fly_to(GeoPoint::new(f64::NAN, 0.0), 5.0);
        viewport.fly_to(GeoPoint::new(0.0, 500.0), 5.0);
        assert_eq!(viewport, before);
    }

    #[test]
    fn pan_clamps_latitude_and_wraps_longitude() {
        let mut viewport = world_view();
        viewport.pan_by(100.0, 0.0);
        assert_eq!(viewport.center().lat, 90.0);

        let mut viewport = Viewport::new(GeoPoint::new(0.0, 170.0), 2.0, 2.0, 18.0);
        viewport.pan_by(0.0, 20.0);
        assert_eq!(viewport.center().lon, -170.0);
    }

    #[test]
    fn zoom_by_stays_in_bounds() {
        let mut viewport = world_view();
        viewport.zoom_by(3.0);
        assert_eq!(viewport.zoom(), 5.0);
        viewport.zoom_by(100.0);
        assert_eq!(viewport.zoom(), 18.0);
        viewport.zoom_by(-100.0);
        assert_eq!(viewport.zoom(), 2.0);
    }
}
