pub mod api;
pub mod assistant;
pub mod sse;
