use crate::api::error::ApiResult;
use crate::api::types::FilterCriteria;
use crate::models::{
    DateRange, NearbyResponse, PriceCalculation, PropertyDetail, PropertyId, PropertyListResponse,
};
use async_trait::async_trait;

/// Calls the listing UI makes against the rental backend.
/// The controller and price board only depend on this, so a fake can stand in for tests.
#[async_trait]
pub trait PropertyApi: Send + Sync {
    /// One page of properties matching the criteria
    async fn list_properties(&self, criteria: &FilterCriteria) -> ApiResult<PropertyListResponse>;

    async fn get_property(&self, id: PropertyId) -> ApiResult<PropertyDetail>;

    async fn nearby(&self, latitude: f64, longitude: f64, radius_km: f64)
        -> ApiResult<NearbyResponse>;

    /// Availability payload, passed through untouched
    async fn availability(&self, id: PropertyId) -> ApiResult<serde_json::Value>;

    async fn calculate_price(&self, id: PropertyId, range: DateRange)
        -> ApiResult<PriceCalculation>;
}
