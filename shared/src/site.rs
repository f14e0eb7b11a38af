use serde::{Deserialize, Serialize};

use crate::geo::GeoPoint;

/// A static monitoring site rendered on the forest-cover and water-level
/// layers. These layers have no live feed; the sites below are explicit seed
/// data injected by the host, not fetched.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SampleSite {
    pub name: String,
    pub latitude: f64,
    pub longitude: f64,
    /// Affected area for forest sites, level change for water sites.
    pub metric: String,
    pub description: String,
}

impl SampleSite {
    pub fn position(&self) -> GeoPoint {
        GeoPoint::new(self.latitude, self.longitude)
    }
}

fn site(name: &str, lat: f64, lon: f64, metric: &str, description: &str) -> SampleSite {
    SampleSite {
        name: name.to_string(),
        latitude: lat,
        longitude: lon,
        metric: metric.to_string(),
        description: description.to_string(),
    }
}

pub fn deforestation_hotspots() -> Vec<SampleSite> {
    let source = "Data: Global Forest Watch";
    vec![
        site("Amazon Basin", -3.4653, -62.2159, "1,200 km²", source),
        site("Borneo", 1.5, 110.0, "850 km²", source),
        site("Congo Basin", -6.0, 22.0, "620 km²", source),
        site("Southeast Asia", 8.0, 80.0, "340 km²", source),
    ]
}

pub fn water_level_sites() -> Vec<SampleSite> {
    let baseline = "vs. 2020 baseline";
    vec![
        site("Lake Tahoe", 46.0, -122.0, "-2.3m", baseline),
        site("Aral Sea", 44.0, 58.0, "-15.2m", baseline),
        site("Lake Chad", 13.0, 14.0, "-8.7m", baseline),
        site("Lake Titicaca", -16.0, 68.0, "-1.1m", baseline),
    ]
}

#[cfg(test)]
mod tests {
    use super::{deforestation_hotspots, water_level_sites};

    #[test]
    fn sample_sites_have_valid_coordinates() {
        for site in deforestation_hotspots().iter().chain(water_level_sites().iter()) {
            assert!(site.position().is_valid(), "{} out of range", site.name);
        }
    }
}
