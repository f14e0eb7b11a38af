use serde::{Deserialize, Serialize};

/// The closed set of map data layers. Each category owns exactly one render
/// group on the map surface.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum LayerCategory {
    Seismic,
    AirQuality,
    ForestCover,
    WaterLevel,
}

impl LayerCategory {
    pub const ALL: [LayerCategory; 4] = [
        LayerCategory::Seismic,
        LayerCategory::AirQuality,
        LayerCategory::ForestCover,
        LayerCategory::WaterLevel,
    ];

    pub const fn as_str(&self) -> &'static str {
        match self {
            LayerCategory::Seismic => "seismic",
            LayerCategory::AirQuality => "air-quality",
            LayerCategory::ForestCover => "forest-cover",
            LayerCategory::WaterLevel => "water-level",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::LayerCategory;

    #[test]
    fn serde_names_match_as_str() {
        for category in LayerCategory::ALL {
            let json = serde_json::to_string(&category).expect("serialize category");
            assert_eq!(json, format!("\"{}\"", category.as_str()));
        }
    }
}
