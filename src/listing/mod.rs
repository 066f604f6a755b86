//! Framework-independent state behind the listing page: filters, the
//! fetched page, per-card prices and the map.

pub mod controller;
pub mod filters;
pub mod map;
pub mod pricing;

pub use controller::{ListingController, ListingPhase, ListingView, PendingFetch, DEFAULT_MAP_CENTER};
pub use filters::FilterState;
pub use map::{MapBridge, MapScene, MapSelection, MapView, Marker, SearchArea};
pub use pricing::{to_cents, PriceBoard, PriceDisplay};
