//! In-memory [`PropertyApi`] used by the controller and price board tests.

use std::collections::{HashSet, VecDeque};
use std::sync::Mutex;

use async_trait::async_trait;
use rust_decimal::Decimal;

use crate::api::error::{ApiError, ApiResult};
use crate::api::traits::PropertyApi;
use crate::api::types::FilterCriteria;
use crate::models::{
    DateRange, GeoPoint, NearbyResponse, PriceCalculation, PropertyDetail, PropertyId,
    PropertyListResponse, PropertySummary,
};

pub(crate) fn summary(id: PropertyId, latitude: f64, longitude: f64, price: i64) -> PropertySummary {
    PropertySummary {
        id,
        name: format!("Property {id}"),
        property_type: "Apartment".to_string(),
        city: "Paris".to_string(),
        country: "France".to_string(),
        latitude,
        longitude,
        bedrooms: 2,
        bathrooms: Decimal::from(1),
        max_guests: 4,
        base_price_per_night: Decimal::from(price),
        currency: "EUR".to_string(),
        amenities: vec!["WiFi".to_string()],
        primary_image: None,
        distance: None,
    }
}

pub(crate) fn page(results: Vec<PropertySummary>) -> PropertyListResponse {
    PropertyListResponse {
        count: results.len() as u64,
        results,
        ..PropertyListResponse::default()
    }
}

#[derive(Default)]
pub(crate) struct FakeApi {
    /// Queued listing replies; `Err(status)` becomes a backend error
    listings: Mutex<VecDeque<Result<PropertyListResponse, u16>>>,
    list_calls: Mutex<Vec<FilterCriteria>>,
    failing_quotes: Mutex<HashSet<PropertyId>>,
    panicking_quotes: Mutex<HashSet<PropertyId>>,
    quote_calls: Mutex<Vec<(PropertyId, DateRange)>>,
}

impl FakeApi {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn push_listing(&self, reply: Result<PropertyListResponse, u16>) {
        self.listings.lock().unwrap().push_back(reply);
    }

    pub(crate) fn fail_quotes_for(&self, id: PropertyId) {
        self.failing_quotes.lock().unwrap().insert(id);
    }

    /// Make pricing for `id` panic instead of answering
    pub(crate) fn panic_quotes_for(&self, id: PropertyId) {
        self.panicking_quotes.lock().unwrap().insert(id);
    }

    pub(crate) fn list_calls(&self) -> Vec<FilterCriteria> {
        self.list_calls.lock().unwrap().clone()
    }

    pub(crate) fn quote_calls(&self) -> Vec<(PropertyId, DateRange)> {
        self.quote_calls.lock().unwrap().clone()
    }

    /// Quote the fake backend would return: 100 per night plus the id
    pub(crate) fn expected_total(id: PropertyId, range: DateRange) -> Decimal {
        let nights = (range.check_out - range.check_in).num_days();
        Decimal::from(nights * 100) + Decimal::from(id)
    }
}

#[async_trait]
impl PropertyApi for FakeApi {
    async fn list_properties(&self, criteria: &FilterCriteria) -> ApiResult<PropertyListResponse> {
        self.list_calls.lock().unwrap().push(criteria.clone());
        let reply = self.listings.lock().unwrap().pop_front();
        match reply {
            Some(Ok(page)) => Ok(page),
            Some(Err(status)) => Err(ApiError::Backend {
                status,
                body: "fake failure".to_string(),
            }),
            None => Ok(PropertyListResponse::default()),
        }
    }

    async fn get_property(&self, id: PropertyId) -> ApiResult<PropertyDetail> {
        Err(ApiError::Backend {
            status: 404,
            body: format!("no property {id}"),
        })
    }

    async fn nearby(
        &self,
        latitude: f64,
        longitude: f64,
        radius_km: f64,
    ) -> ApiResult<NearbyResponse> {
        Ok(NearbyResponse {
            count: 0,
            radius_km,
            center: GeoPoint {
                latitude,
                longitude,
            },
            results: Vec::new(),
        })
    }

    async fn availability(&self, id: PropertyId) -> ApiResult<serde_json::Value> {
        Ok(serde_json::json!({ "property_id": id }))
    }

    async fn calculate_price(
        &self,
        id: PropertyId,
        range: DateRange,
    ) -> ApiResult<PriceCalculation> {
        self.quote_calls.lock().unwrap().push((id, range));
        let panics = self.panicking_quotes.lock().unwrap().contains(&id);
        if panics {
            panic!("pricing for property {id} blew up");
        }
        if self.failing_quotes.lock().unwrap().contains(&id) {
            return Err(ApiError::Backend {
                status: 500,
                body: "pricing unavailable".to_string(),
            });
        }

        let nights = (range.check_out - range.check_in).num_days();
        let total = Self::expected_total(id, range);
        Ok(PriceCalculation {
            property_id: Some(id),
            property_name: None,
            check_in: Some(range.check_in),
            check_out: Some(range.check_out),
            nights: nights as u32,
            base_price_per_night: None,
            total_price: total,
            average_price_per_night: total / Decimal::from(nights.max(1)),
            currency: "EUR".to_string(),
            daily_breakdown: Vec::new(),
        })
    }
}
