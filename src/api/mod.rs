pub mod client;
pub mod error;
pub mod query;
pub mod traits;
pub mod types;

#[cfg(test)]
pub(crate) mod fake;

pub use client::RentalApiClient;
pub use error::{ApiError, ApiResult};
pub use query::{build_query, to_query_string};
pub use traits::PropertyApi;
pub use types::{FilterCriteria, FilterField, PropertyType, SortKey, AMENITIES, DEFAULT_PAGE_SIZE};
