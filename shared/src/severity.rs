use serde::{Deserialize, Serialize};

use crate::layer::LayerCategory;

/// Marker color as sRGB bytes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct Rgb(pub u8, pub u8, pub u8);

impl Rgb {
    pub fn css_hex(&self) -> String {
        format!("#{:02x}{:02x}{:02x}", self.0, self.1, self.2)
    }
}

pub const GREEN: Rgb = Rgb(0x22, 0xc5, 0x5e);
pub const YELLOW: Rgb = Rgb(0xea, 0xb3, 0x08);
pub const ORANGE: Rgb = Rgb(0xf9, 0x73, 0x16);
pub const RED: Rgb = Rgb(0xef, 0x44, 0x44);
pub const PURPLE: Rgb = Rgb(0x7c, 0x3a, 0xed);
pub const BLUE: Rgb = Rgb(0x3b, 0x82, 0xf6);
pub const DARK_BLUE: Rgb = Rgb(0x1d, 0x4e, 0xd8);

/// Severity bucket plus the visual encoding derived from it.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SeverityClass {
    pub bucket: &'static str,
    pub color: Rgb,
    pub radius: f64,
}

/// Map a category's severity value to a bucket, color and marker radius.
///
/// Total over the whole real line: non-finite or out-of-range inputs clamp to
/// the nearest defined bucket, so the map never fails to encode a record.
pub fn classify(category: LayerCategory, value: f64) -> SeverityClass {
    match category {
        LayerCategory::Seismic => classify_magnitude(value),
        LayerCategory::AirQuality => classify_concentration(value),
        // The static layers carry no severity scale; every record lands in
        // the single bucket with a fixed encoding.
        LayerCategory::ForestCover => SeverityClass {
            bucket: "alert",
            color: GREEN,
            radius: 10.0,
        },
        LayerCategory::WaterLevel => SeverityClass {
            bucket: "watch",
            color: BLUE,
            radius: 12.0,
        },
    }
}

fn classify_magnitude(magnitude: f64) -> SeverityClass {
    let (bucket, color) = if magnitude >= 6.0 {
        ("critical", RED)
    } else if magnitude >= 5.0 {
        ("high", ORANGE)
    } else if magnitude >= 4.0 {
        ("medium", YELLOW)
    } else {
        // NaN compares false against every threshold and lands here.
        ("low", GREEN)
    };

    let radius = if magnitude.is_finite() {
        (magnitude * 3.0).max(5.0)
    } else {
        5.0
    };

    SeverityClass { bucket, color, radius }
}

fn classify_concentration(value: f64) -> SeverityClass {
    let (bucket, color) = if value > 150.0 {
        ("very-unhealthy", PURPLE)
    } else if value > 100.0 {
        ("unhealthy", RED)
    } else if value > 50.0 {
        ("moderate", ORANGE)
    } else if value > 25.0 {
        ("fair", YELLOW)
    } else {
        ("good", GREEN)
    };

    let radius = if value.is_finite() {
        (value / 10.0).clamp(5.0, 15.0)
    } else if value == f64::INFINITY {
        15.0
    } else {
        5.0
    };

    SeverityClass { bucket, color, radius }
}

#[cfg(test)]
mod tests {
    use super::{GREEN, PURPLE, RED, YELLOW, classify};
    use crate::layer::LayerCategory;

    #[test]
    fn magnitude_boundaries_round_up() {
        assert_eq!(classify(LayerCategory::Seismic, 3.9).bucket, "low");
        assert_eq!(classify(LayerCategory::Seismic, 4.0).bucket, "medium");
        assert_eq!(classify(LayerCategory::Seismic, 4.0).color, YELLOW);
        assert_eq!(classify(LayerCategory::Seismic, 5.0).bucket, "high");
        assert_eq!(classify(LayerCategory::Seismic, 5.999).bucket, "high");
        assert_eq!(classify(LayerCategory::Seismic, 6.0).bucket, "critical");
        assert_eq!(classify(LayerCategory::Seismic, 6.0).color, RED);
    }

    #[test]
    fn magnitude_radius_scales_with_floor() {
        assert_eq!(classify(LayerCategory::Seismic, 1.0).radius, 5.0);
        assert_eq!(classify(LayerCategory::Seismic, 3.0).radius, 9.0);
        assert_eq!(classify(LayerCategory::Seismic, 7.5).radius, 22.5);
    }

    #[test]
    fn concentration_boundaries_are_inclusive_below() {
        assert_eq!(classify(LayerCategory::AirQuality, 25.0).bucket, "good");
        assert_eq!(classify(LayerCategory::AirQuality, 25.01).bucket, "fair");
        assert_eq!(classify(LayerCategory::AirQuality, 50.0).bucket, "fair");
        assert_eq!(classify(LayerCategory::AirQuality, 100.0).bucket, "moderate");
        assert_eq!(classify(LayerCategory::AirQuality, 150.0).bucket, "unhealthy");
        assert_eq!(classify(LayerCategory::AirQuality, 150.01).bucket, "very-unhealthy");
        assert_eq!(classify(LayerCategory::AirQuality, 150.01).color, PURPLE);
    }

    #[test]
    fn concentration_radius_clamps() {
        assert_eq!(classify(LayerCategory::AirQuality, 10.0).radius, 5.0);
        assert_eq!(classify(LayerCategory::AirQuality, 90.0).radius, 9.0);
        assert_eq!(classify(LayerCategory::AirQuality, 400.0).radius, 15.0);
    }

    #[test]
    fn total_over_pathological_inputs() {
        let nan_mag = classify(LayerCategory::Seismic, f64::NAN);
        assert_eq!(nan_mag.bucket, "low");
        assert_eq!(nan_mag.radius, 5.0);

        let neg_mag = classify(LayerCategory::Seismic, -3.0);
        assert_eq!(neg_mag.bucket, "low");
        assert_eq!(neg_mag.radius, 5.0);

        assert_eq!(classify(LayerCategory::AirQuality, f64::NAN).bucket, "good");
        assert_eq!(classify(LayerCategory::AirQuality, -5.0).bucket, "good");
        assert_eq!(
            classify(LayerCategory::AirQuality, f64::INFINITY).bucket,
            "very-unhealthy"
        );
    }

    #[test]
    fn static_layers_use_fixed_encodings() {
        let forest = classify(LayerCategory::ForestCover, 123.0);
        assert_eq!(forest.bucket, "alert");
        assert_eq!(forest.color, GREEN);

        let water = classify(LayerCategory::WaterLevel, f64::NAN);
        assert_eq!(water.bucket, "watch");
        assert_eq!(water.radius, 12.0);
    }
}
