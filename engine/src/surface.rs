use std::collections::HashMap;

use terrawatch_shared::{GeoPoint, LayerCategory};

use crate::marker::Marker;
use crate::reconcile::desired_markers;
use crate::record::LayerRecord;
use crate::viewport::Viewport;

/// Initial viewport configuration. Defaults to a whole-Earth view.
#[derive(Debug, Clone, PartialEq)]
pub struct SurfaceConfig {
    pub center: GeoPoint,
    pub zoom: f64,
    pub min_zoom: f64,
    pub max_zoom: f64,
}

impl Default for SurfaceConfig {
    fn default() -> Self {
        Self {
            center: GeoPoint::new(20.0, 0.0),
            zoom: 2.0,
            min_zoom: 2.0,
            max_zoom: 18.0,
        }
    }
}

/// Handler invoked when a marker is selected. The record is handed back to
/// the host exactly as it was supplied.
pub type SelectHandler = Box<dyn FnMut(LayerCategory, &LayerRecord)>;

enum SurfaceState {
    Uninitialized,
    Active(ActiveSurface),
    TornDown,
}

struct ActiveSurface {
    viewport: Viewport,
    groups: HashMap<LayerCategory, Vec<Marker>>,
}

/// The map surface: a viewport plus one render group per category.
///
/// Lifecycle is uninitialized → active → torn down, with teardown terminal.
/// Every mutating call on a surface that is not active is a safe no-op, so a
/// late data update arriving after unmount cannot crash or resurrect state.
pub struct MapSurface {
    state: SurfaceState,
    on_select: Option<SelectHandler>,
}

impl Default for MapSurface {
    fn default() -> Self {
        Self::new()
    }
}

impl MapSurface {
    pub fn new() -> Self {
        Self {
            state: SurfaceState::Uninitialized,
            on_select: None,
        }
    }

    /// Create the viewport and empty render groups. Idempotent: a second call
    /// (or a call after teardown) changes nothing and returns `false`.
    pub fn initialize(&mut self, config: SurfaceConfig) -> bool {
        if !matches!(self.state, SurfaceState::Uninitialized) {
            return false;
        }

        let groups = LayerCategory::ALL
            .into_iter()
            .map(|category| (category, Vec::new()))
            .collect();
        self.state = SurfaceState::Active(ActiveSurface {
            viewport: Viewport::new(config.center, config.zoom, config.min_zoom, config.max_zoom),
            groups,
        });
        true
    }

    pub fn is_active(&self) -> bool {
        matches!(self.state, SurfaceState::Active(_))
    }

    pub fn viewport(&self) -> Option<&Viewport> {
        match &self.state {
            SurfaceState::Active(active) => Some(&active.viewport),
            _ => None,
        }
    }

    pub fn viewport_mut(&mut self) -> Option<&mut Viewport> {
        match &mut self.state {
            SurfaceState::Active(active) => Some(&mut active.viewport),
            _ => None,
        }
    }

    /// Animate the viewport to a new center/zoom. Render groups are untouched.
    pub fn fly_to(&mut self, center: GeoPoint, zoom: f64) {
        if let SurfaceState::Active(active) = &mut self.state {
            active.viewport.fly_to(center, zoom);
        }
    }

    /// Rebuild one category's render group from the given records. Clears
    /// then repopulates that group only; other groups and the viewport keep
    /// their state. No-op unless the surface is active.
    pub fn reconcile(&mut self, category: LayerCategory, records: &[LayerRecord], active: bool) {
        if let SurfaceState::Active(surface) = &mut self.state {
            let markers = desired_markers(category, records, active);
            surface.groups.insert(category, markers);
        }
    }

    /// The current render group for a category. Empty when the surface is not
    /// active or the category has never been reconciled.
    pub fn markers(&self, category: LayerCategory) -> &[Marker] {
        match &self.state {
            SurfaceState::Active(active) => active
                .groups
                .get(&category)
                .map(Vec::as_slice)
                .unwrap_or_default(),
            _ => &[],
        }
    }

    pub fn set_select_handler(&mut self, handler: SelectHandler) {
        self.on_select = Some(handler);
    }

    /// Report a marker interaction. Returns the selected marker and raises
    /// the registered handler with the underlying record, which is the only
    /// path by which selection flows back to the host.
    pub fn select(&mut self, category: LayerCategory, index: usize) -> Option<&Marker> {
        let SurfaceState::Active(active) = &self.state else {
            return None;
        };
        let marker = active.groups.get(&category)?.get(index)?;
        if let Some(handler) = &mut self.on_select {
            handler(category, &marker.record);
        }
        Some(marker)
    }

    /// Release the viewport and all render groups. Terminal: the surface
    /// cannot be re-initialized, and every later call is a no-op.
    pub fn teardown(&mut self) {
        self.state = SurfaceState::TornDown;
    }
}

#[cfg(test)]
mod tests {
    use std::cell::RefCell;
    use std::rc::Rc;

    use terrawatch_shared::{AirQualityReading, GeoPoint, LayerCategory, SeismicEvent};

    use super::{MapSurface, SurfaceConfig};
    use crate::record::LayerRecord;

    fn quake(id: &str, magnitude: f64, lat: f64, lon: f64) -> LayerRecord {
        LayerRecord::Seismic(SeismicEvent {
            id: id.to_string(),
            magnitude,
            place: "test region".to_string(),
            time_millis: 1_700_000_000_000,
            longitude: lon,
            latitude: lat,
            depth_km: 10.0,
            tsunami: false,
        })
    }

    fn reading(id: &str, value: f64, lat: f64, lon: f64) -> LayerRecord {
        LayerRecord::AirQuality(AirQualityReading {
            id: id.to_string(),
            location: "Station".to_string(),
            city: "City".to_string(),
            country: "XX".to_string(),
            latitude: lat,
            longitude: lon,
            parameter: "pm25".to_string(),
            value,
            unit: "µg/m³".to_string(),
            last_updated: "2026-01-01T00:00:00Z".to_string(),
        })
    }

    fn active_surface() -> MapSurface {
        let mut surface = MapSurface::new();
        assert!(surface.initialize(SurfaceConfig::default()));
        surface
    }

    #[test]
    fn initialize_is_idempotent() {
        let mut surface = MapSurface::new();
        assert!(surface.initialize(SurfaceConfig::default()));
        assert!(!surface.initialize(SurfaceConfig {
            zoom: 10.0,
            ..SurfaceConfig::default()
        }));
        // The first configuration wins.
        assert_eq!(surface.viewport().map(|v| v.zoom()), Some(2.0));
    }

    #[test]
    fn default_view_is_whole_earth() {
        let surface = active_surface();
        let viewport = surface.viewport().expect("active viewport");
        assert_eq!(viewport.center(), GeoPoint::new(20.0, 0.0));
        assert_eq!(viewport.zoom(), 2.0);
    }

    #[test]
    fn reconcile_touches_only_its_own_group() {
        let mut surface = active_surface();
        surface.reconcile(LayerCategory::Seismic, &[quake("a", 5.0, 10.0, 20.0)], true);
        surface.reconcile(LayerCategory::AirQuality, &[reading("r", 80.0, 1.0, 2.0)], true);

        surface.reconcile(LayerCategory::Seismic, &[], true);
        assert!(surface.markers(LayerCategory::Seismic).is_empty());
        assert_eq!(surface.markers(LayerCategory::AirQuality).len(), 1);
    }

    #[test]
    fn viewport_survives_data_updates() {
        let mut surface = active_surface();
        surface.fly_to(GeoPoint::new(35.0, 139.0), 8.0);
        let before = surface.viewport().expect("viewport").clone();

        surface.reconcile(LayerCategory::Seismic, &[quake("a", 6.2, 35.0, 139.0)], true);
        surface.reconcile(LayerCategory::Seismic, &[], true);

        assert_eq!(surface.viewport().expect("viewport"), &before);
    }

    #[test]
    fn toggling_off_then_on_restores_the_same_markers() {
        let mut surface = active_surface();
        let records = vec![quake("a", 4.0, 10.0, 20.0), quake("b", 6.5, -5.0, 40.0)];

        surface.reconcile(LayerCategory::Seismic, &records, true);
        let before: Vec<_> = surface.markers(LayerCategory::Seismic).to_vec();
        assert_eq!(before.len(), 2);

        surface.reconcile(LayerCategory::Seismic, &records, false);
        assert!(surface.markers(LayerCategory::Seismic).is_empty());

        surface.reconcile(LayerCategory::Seismic, &records, true);
        assert_eq!(surface.markers(LayerCategory::Seismic), before.as_slice());
    }

    #[test]
    fn select_raises_the_handler_with_the_record() {
        let mut surface = active_surface();
        surface.reconcile(LayerCategory::Seismic, &[quake("a", 5.0, 10.0, 20.0)], true);

        let seen: Rc<RefCell<Vec<(LayerCategory, String)>>> = Rc::new(RefCell::new(Vec::new()));
        let sink = Rc::clone(&seen);
        surface.set_select_handler(Box::new(move |category, record| {
            let LayerRecord::Seismic(event) = record else {
                panic!("expected seismic record");
            };
            sink.borrow_mut().push((category, event.id.clone()));
        }));

        assert!(surface.select(LayerCategory::Seismic, 0).is_some());
        assert!(surface.select(LayerCategory::Seismic, 7).is_none());
        assert_eq!(
            seen.borrow().as_slice(),
            &[(LayerCategory::Seismic, "a".to_string())]
        );
    }

    #[test]
    fn teardown_is_terminal_and_safe() {
        let mut surface = active_surface();
        surface.reconcile(LayerCategory::Seismic, &[quake("a", 5.0, 10.0, 20.0)], true);
        surface.teardown();

        assert!(!surface.is_active());
        assert!(surface.viewport().is_none());
        assert!(surface.markers(LayerCategory::Seismic).is_empty());

        // All of these must be quiet no-ops after teardown.
        surface.reconcile(LayerCategory::Seismic, &[quake("b", 6.0, 0.0, 0.0)], true);
        surface.fly_to(GeoPoint::new(0.0, 0.0), 5.0);
        assert!(surface.select(LayerCategory::Seismic, 0).is_none());
        assert!(surface.markers(LayerCategory::Seismic).is_empty());

        assert!(!surface.initialize(SurfaceConfig::default()));
        assert!(!surface.is_active());
    }

    #[test]
    fn markers_empty_before_initialize() {
        let surface = MapSurface::new();
        assert!(surface.markers(LayerCategory::WaterLevel).is_empty());
        assert!(surface.viewport().is_none());
    }
}
