//! Map layer composition engine.
//!
//! Owns a map viewport and one render group per [`LayerCategory`], and
//! reconciles each group's markers against externally supplied records. The
//! engine is deliberately independent of any rendering library: "what should
//! be shown" is computed here as plain data, and a renderer replays it into
//! whatever retained-mode scene graph it uses.

pub mod marker;
pub mod reconcile;
pub mod record;
pub mod surface;
pub mod viewport;

pub use marker::{Marker, MarkerInfo, MarkerStyle};
pub use reconcile::desired_markers;
pub use record::LayerRecord;
pub use surface::{MapSurface, SelectHandler, SurfaceConfig};
pub use viewport::Viewport;

pub use terrawatch_shared::LayerCategory;
