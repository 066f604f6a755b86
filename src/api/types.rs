use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::models::DateRange;

/// Page size used by a freshly created or reset filter
pub const DEFAULT_PAGE_SIZE: u32 = 20;

/// Amenities offered as toggles by the filter form
pub const AMENITIES: [&str; 13] = [
    "WiFi",
    "Kitchen",
    "Parking",
    "Pool",
    "Gym",
    "Air Conditioning",
    "Heating",
    "TV",
    "Washer",
    "Dryer",
    "Elevator",
    "Balcony",
    "Pet Friendly",
];

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum PropertyType {
    Apartment,
    House,
    Condo,
    Villa,
    Townhouse,
    Loft,
    Studio,
    Penthouse,
    Cottage,
    Bungalow,
}

impl PropertyType {
    pub const ALL: [PropertyType; 10] = [
        PropertyType::Apartment,
        PropertyType::House,
        PropertyType::Condo,
        PropertyType::Villa,
        PropertyType::Townhouse,
        PropertyType::Loft,
        PropertyType::Studio,
        PropertyType::Penthouse,
        PropertyType::Cottage,
        PropertyType::Bungalow,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            PropertyType::Apartment => "Apartment",
            PropertyType::House => "House",
            PropertyType::Condo => "Condo",
            PropertyType::Villa => "Villa",
            PropertyType::Townhouse => "Townhouse",
            PropertyType::Loft => "Loft",
            PropertyType::Studio => "Studio",
            PropertyType::Penthouse => "Penthouse",
            PropertyType::Cottage => "Cottage",
            PropertyType::Bungalow => "Bungalow",
        }
    }
}

impl fmt::Display for PropertyType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for PropertyType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        PropertyType::ALL
            .iter()
            .copied()
            .find(|t| t.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| format!("unknown property type: {s}"))
    }
}

/// Sort orders understood by the listing endpoint's `ordering` parameter
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum SortKey {
    Newest,
    Oldest,
    PriceAscending,
    PriceDescending,
    BedroomsAscending,
    BedroomsDescending,
    NameAscending,
    NameDescending,
}

impl SortKey {
    pub const ALL: [SortKey; 8] = [
        SortKey::Newest,
        SortKey::Oldest,
        SortKey::PriceAscending,
        SortKey::PriceDescending,
        SortKey::BedroomsAscending,
        SortKey::BedroomsDescending,
        SortKey::NameAscending,
        SortKey::NameDescending,
    ];

    /// Value sent as `ordering=`
    pub fn as_param(&self) -> &'static str {
        match self {
            SortKey::Newest => "-created_at",
            SortKey::Oldest => "created_at",
            SortKey::PriceAscending => "base_price_per_night",
            SortKey::PriceDescending => "-base_price_per_night",
            SortKey::BedroomsAscending => "bedrooms",
            SortKey::BedroomsDescending => "-bedrooms",
            SortKey::NameAscending => "name",
            SortKey::NameDescending => "-name",
        }
    }

    pub fn label(&self) -> &'static str {
        match self {
            SortKey::Newest => "Newest First",
            SortKey::Oldest => "Oldest First",
            SortKey::PriceAscending => "Price: Low to High",
            SortKey::PriceDescending => "Price: High to Low",
            SortKey::BedroomsAscending => "Bedrooms: Low to High",
            SortKey::BedroomsDescending => "Bedrooms: High to Low",
            SortKey::NameAscending => "Name: A-Z",
            SortKey::NameDescending => "Name: Z-A",
        }
    }
}

impl fmt::Display for SortKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_param())
    }
}

impl FromStr for SortKey {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        SortKey::ALL
            .iter()
            .copied()
            .find(|k| k.as_param() == s)
            .ok_or_else(|| format!("unknown ordering: {s}"))
    }
}

/// Search, sort and pagination constraints for the listing query.
///
/// Every field is optional and `None` means "no constraint". Values are never
/// validated here; the backend decides what is acceptable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FilterCriteria {
    pub search: Option<String>,
    pub property_type: Option<PropertyType>,
    pub city: Option<String>,
    pub country: Option<String>,
    pub min_price: Option<Decimal>,
    pub max_price: Option<Decimal>,
    /// Exact bedroom count
    pub bedrooms: Option<u32>,
    pub min_bedrooms: Option<u32>,
    /// Exact bathroom count
    pub bathrooms: Option<Decimal>,
    pub min_bathrooms: Option<Decimal>,
    /// Comma-joined amenity names
    pub amenities: Option<String>,
    /// Minimum guest capacity
    pub max_guests: Option<u32>,
    pub check_in: Option<NaiveDate>,
    pub check_out: Option<NaiveDate>,
    pub latitude: Option<f64>,
    pub longitude: Option<f64>,
    /// Geo search radius in km
    pub radius: Option<f64>,
    pub ordering: Option<SortKey>,
    pub page: Option<u32>,
    pub page_size: Option<u32>,
}

impl Default for FilterCriteria {
    fn default() -> Self {
        Self {
            search: None,
            property_type: None,
            city: None,
            country: None,
            min_price: None,
            max_price: None,
            bedrooms: None,
            min_bedrooms: None,
            bathrooms: None,
            min_bathrooms: None,
            amenities: None,
            max_guests: None,
            check_in: None,
            check_out: None,
            latitude: None,
            longitude: None,
            radius: None,
            ordering: None,
            page: None,
            page_size: Some(DEFAULT_PAGE_SIZE),
        }
    }
}

impl FilterCriteria {
    /// Criteria with every field unset, including the page size
    pub fn empty() -> Self {
        Self {
            page_size: None,
            ..Self::default()
        }
    }

    /// The active stay, when both ends are chosen
    pub fn date_range(&self) -> Option<DateRange> {
        match (self.check_in, self.check_out) {
            (Some(check_in), Some(check_out)) => Some(DateRange::new(check_in, check_out)),
            _ => None,
        }
    }

    /// Explicit geo center, when both coordinates are set
    pub fn geo_center(&self) -> Option<(f64, f64)> {
        match (self.latitude, self.longitude) {
            (Some(lat), Some(lng)) => Some((lat, lng)),
            _ => None,
        }
    }

    /// Amenities currently selected, split from the comma-joined field
    pub fn selected_amenities(&self) -> Vec<String> {
        self.amenities
            .as_deref()
            .map(|joined| {
                joined
                    .split(',')
                    .map(str::trim)
                    .filter(|a| !a.is_empty())
                    .map(str::to_string)
                    .collect()
            })
            .unwrap_or_default()
    }

    /// Set fields other than `page_size`, labelled for a summary strip
    pub fn active_filters(&self) -> Vec<(String, String)> {
        crate::api::query::build_query(self)
            .into_iter()
            .filter(|(key, _)| *key != "page_size")
            .map(|(key, value)| (key.replace("__", " ").replace('_', " "), value))
            .collect()
    }
}

/// A single-field edit of [`FilterCriteria`]; `None` clears the field
#[derive(Debug, Clone, PartialEq)]
pub enum FilterField {
    Search(Option<String>),
    PropertyType(Option<PropertyType>),
    City(Option<String>),
    Country(Option<String>),
    MinPrice(Option<Decimal>),
    MaxPrice(Option<Decimal>),
    Bedrooms(Option<u32>),
    MinBedrooms(Option<u32>),
    Bathrooms(Option<Decimal>),
    MinBathrooms(Option<Decimal>),
    Amenities(Option<String>),
    MaxGuests(Option<u32>),
    CheckIn(Option<NaiveDate>),
    CheckOut(Option<NaiveDate>),
    Latitude(Option<f64>),
    Longitude(Option<f64>),
    Radius(Option<f64>),
    Ordering(Option<SortKey>),
    Page(Option<u32>),
    PageSize(Option<u32>),
}

impl FilterField {
    pub(crate) fn apply(self, criteria: &mut FilterCriteria) {
        match self {
            FilterField::Search(v) => criteria.search = v,
            FilterField::PropertyType(v) => criteria.property_type = v,
            FilterField::City(v) => criteria.city = v,
            FilterField::Country(v) => criteria.country = v,
            FilterField::MinPrice(v) => criteria.min_price = v,
            FilterField::MaxPrice(v) => criteria.max_price = v,
            FilterField::Bedrooms(v) => criteria.bedrooms = v,
            FilterField::MinBedrooms(v) => criteria.min_bedrooms = v,
            FilterField::Bathrooms(v) => criteria.bathrooms = v,
            FilterField::MinBathrooms(v) => criteria.min_bathrooms = v,
            FilterField::Amenities(v) => criteria.amenities = v,
            FilterField::MaxGuests(v) => criteria.max_guests = v,
            FilterField::CheckIn(v) => criteria.check_in = v,
            FilterField::CheckOut(v) => criteria.check_out = v,
            FilterField::Latitude(v) => criteria.latitude = v,
            FilterField::Longitude(v) => criteria.longitude = v,
            FilterField::Radius(v) => criteria.radius = v,
            FilterField::Ordering(v) => criteria.ordering = v,
            FilterField::Page(v) => criteria.page = v,
            FilterField::PageSize(v) => criteria.page_size = v,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_only_sets_page_size() {
        let criteria = FilterCriteria::default();
        assert_eq!(criteria.page_size, Some(20));
        assert_eq!(
            FilterCriteria {
                page_size: None,
                ..criteria
            },
            FilterCriteria::empty()
        );
    }

    #[test]
    fn sort_keys_round_trip_through_params() {
        for key in SortKey::ALL {
            assert_eq!(key.as_param().parse::<SortKey>().unwrap(), key);
        }
        assert!("price".parse::<SortKey>().is_err());
    }

    #[test]
    fn sort_labels_match_ordering_direction() {
        assert_eq!(SortKey::Newest.label(), "Newest First");
        assert_eq!(SortKey::PriceAscending.label(), "Price: Low to High");
        assert_eq!(SortKey::NameDescending.label(), "Name: Z-A");
    }

    #[test]
    fn amenity_choices_toggle_into_the_filter() {
        let mut state = crate::listing::FilterState::default();
        for amenity in AMENITIES {
            state.toggle_amenity(amenity);
        }
        assert_eq!(state.current().selected_amenities(), AMENITIES.to_vec());
    }

    #[test]
    fn property_type_parse_is_case_insensitive() {
        assert_eq!("villa".parse::<PropertyType>().unwrap(), PropertyType::Villa);
        assert!("castle".parse::<PropertyType>().is_err());
    }

    #[test]
    fn date_range_needs_both_ends() {
        let mut criteria = FilterCriteria::default();
        criteria.check_in = NaiveDate::from_ymd_opt(2024, 5, 1);
        assert!(criteria.date_range().is_none());
        criteria.check_out = NaiveDate::from_ymd_opt(2024, 5, 3);
        assert_eq!(criteria.date_range().unwrap().check_out.to_string(), "2024-05-03");
    }

    #[test]
    fn selected_amenities_ignores_blanks() {
        let criteria = FilterCriteria {
            amenities: Some("WiFi,,Pool".to_string()),
            ..FilterCriteria::default()
        };
        assert_eq!(criteria.selected_amenities(), vec!["WiFi", "Pool"]);
    }

    #[test]
    fn active_filters_skip_page_size() {
        let criteria = FilterCriteria {
            city: Some("Berlin".to_string()),
            min_bedrooms: Some(2),
            ..FilterCriteria::default()
        };
        assert_eq!(
            criteria.active_filters(),
            vec![
                ("city".to_string(), "Berlin".to_string()),
                ("bedrooms gte".to_string(), "2".to_string()),
            ]
        );
    }
}
