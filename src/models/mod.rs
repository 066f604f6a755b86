use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

pub mod pricing;

pub use pricing::{DailyPrice, DateRange, PriceCalculation, PriceQuote};

/// Backend identifier of a property
pub type PropertyId = u64;

/// One row of the paginated property listing
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PropertySummary {
    pub id: PropertyId,
    pub name: String,
    pub property_type: String,
    pub city: String,
    pub country: String,
    pub latitude: f64,
    pub longitude: f64,
    pub bedrooms: u32,
    pub bathrooms: Decimal,
    pub max_guests: u32,
    pub base_price_per_night: Decimal,
    pub currency: String,
    #[serde(default)]
    pub amenities: Vec<String>,
    #[serde(default)]
    pub primary_image: Option<String>,
    /// Distance from the search center in km, only present for geo searches
    #[serde(default)]
    pub distance: Option<f64>,
}

impl PropertySummary {
    pub fn position(&self) -> (f64, f64) {
        (self.latitude, self.longitude)
    }
}

/// Image attached to a property detail
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PropertyImage {
    pub id: u64,
    pub image_url: String,
    #[serde(default)]
    pub is_primary: bool,
}

/// Booked range the property cannot be rented for
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct UnavailableDate {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct AvailabilityNote {
    #[serde(default)]
    pub message: String,
    #[serde(default)]
    pub note: String,
}

/// Full property payload from `GET /properties/{id}/`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PropertyDetail {
    #[serde(flatten)]
    pub summary: PropertySummary,
    #[serde(default)]
    pub description: String,
    #[serde(default)]
    pub address: String,
    #[serde(default)]
    pub images: Vec<PropertyImage>,
    #[serde(default)]
    pub available_dates: AvailabilityNote,
    #[serde(default)]
    pub unavailable_dates: Vec<UnavailableDate>,
    pub created_at: Option<DateTime<Utc>>,
    pub updated_at: Option<DateTime<Utc>>,
}

/// Echo of the filters the backend actually applied
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct FiltersApplied {
    pub property_type: Option<String>,
    pub city: Option<String>,
    pub min_price: Option<String>,
    pub max_price: Option<String>,
    #[serde(default)]
    pub geolocation: bool,
}

/// Page of results from `GET /properties/`
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq)]
pub struct PropertyListResponse {
    pub count: u64,
    pub next: Option<String>,
    pub previous: Option<String>,
    #[serde(default)]
    pub results: Vec<PropertySummary>,
    #[serde(default)]
    pub filters_applied: FiltersApplied,
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq)]
pub struct GeoPoint {
    pub latitude: f64,
    pub longitude: f64,
}

/// Payload of `GET /properties/nearby/`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct NearbyResponse {
    pub count: u64,
    pub radius_km: f64,
    pub center: GeoPoint,
    #[serde(default)]
    pub results: Vec<PropertySummary>,
}
