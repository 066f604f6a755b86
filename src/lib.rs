//! Client-side core of the rental listing page: filter state, the REST
//! query adapter, the listing controller, per-card pricing and the map bridge.

pub mod api;
pub mod config;
pub mod listing;
pub mod models;

pub use api::{FilterCriteria, FilterField, PropertyApi, RentalApiClient};
pub use config::Config;
pub use listing::{ListingController, MapBridge, PriceBoard};
