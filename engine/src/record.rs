use serde::{Deserialize, Serialize};
use terrawatch_shared::{AirQualityReading, GeoPoint, LayerCategory, SampleSite, SeismicEvent};

/// One upstream record in any of the shapes the map layers consume. Static
/// sites serve both the forest-cover and water-level layers; which one a site
/// lands on is decided by the category it is reconciled under.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "kind", rename_all = "kebab-case")]
pub enum LayerRecord {
    Seismic(SeismicEvent),
    AirQuality(AirQualityReading),
    Site(SampleSite),
}

impl LayerRecord {
    pub fn position(&self) -> GeoPoint {
        match self {
            LayerRecord::Seismic(event) => event.position(),
            LayerRecord::AirQuality(reading) => reading.position(),
            LayerRecord::Site(site) => site.position(),
        }
    }

    /// The value fed to the severity classifier. Sites carry no numeric
    /// severity; the classifier maps them to a fixed bucket regardless.
    pub fn severity_value(&self) -> f64 {
        match self {
            LayerRecord::Seismic(event) => event.magnitude,
            LayerRecord::AirQuality(reading) => reading.value,
            LayerRecord::Site(_) => 0.0,
        }
    }

    pub(crate) fn matches(&self, category: LayerCategory) -> bool {
        matches!(
            (self, category),
            (LayerRecord::Seismic(_), LayerCategory::Seismic)
                | (LayerRecord::AirQuality(_), LayerCategory::AirQuality)
                | (LayerRecord::Site(_), LayerCategory::ForestCover)
                | (LayerRecord::Site(_), LayerCategory::WaterLevel)
        )
    }
}

impl From<SeismicEvent> for LayerRecord {
    fn from(event: SeismicEvent) -> Self {
        LayerRecord::Seismic(event)
    }
}

impl From<AirQualityReading> for LayerRecord {
    fn from(reading: AirQualityReading) -> Self {
        LayerRecord::AirQuality(reading)
    }
}

impl From<SampleSite> for LayerRecord {
    fn from(site: SampleSite) -> Self {
        LayerRecord::Site(site)
    }
}
