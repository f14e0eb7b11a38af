pub mod air;
pub mod carbon;
pub mod feed;
pub mod geo;
pub mod layer;
pub mod natural_event;
pub mod quake;
pub mod severity;
pub mod site;

pub use air::AirQualityReading;
pub use feed::{FeedDocument, FeedKind, FeedSource, FeedStatus};
pub use geo::GeoPoint;
pub use layer::LayerCategory;
pub use natural_event::NaturalEvent;
pub use quake::SeismicEvent;
pub use severity::{Rgb, SeverityClass, classify};
pub use site::SampleSite;
