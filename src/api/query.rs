//! Serialization of [`FilterCriteria`] into listing query parameters.

use std::fmt::Display;

use super::types::FilterCriteria;

fn push<T: Display>(pairs: &mut Vec<(&'static str, String)>, key: &'static str, value: &Option<T>) {
    if let Some(value) = value {
        let value = value.to_string();
        // Blank strings mean "missing", zero does not
        if !value.is_empty() {
            pairs.push((key, value));
        }
    }
}

/// Key/value pairs for `GET /properties/`, in a stable order.
///
/// Unset fields and empty strings are omitted; everything else, zero
/// included, is kept.
pub fn build_query(criteria: &FilterCriteria) -> Vec<(&'static str, String)> {
    let mut pairs = Vec::new();

    push(&mut pairs, "search", &criteria.search);
    push(&mut pairs, "property_type", &criteria.property_type);
    push(&mut pairs, "city", &criteria.city);
    push(&mut pairs, "country", &criteria.country);
    push(&mut pairs, "min_price", &criteria.min_price);
    push(&mut pairs, "max_price", &criteria.max_price);
    push(&mut pairs, "bedrooms", &criteria.bedrooms);
    push(&mut pairs, "bedrooms__gte", &criteria.min_bedrooms);
    push(&mut pairs, "bathrooms", &criteria.bathrooms);
    push(&mut pairs, "bathrooms__gte", &criteria.min_bathrooms);
    push(&mut pairs, "amenities", &criteria.amenities);
    push(&mut pairs, "max_guests", &criteria.max_guests);
    push(&mut pairs, "check_in", &criteria.check_in);
    push(&mut pairs, "check_out", &criteria.check_out);
    push(&mut pairs, "latitude", &criteria.latitude);
    push(&mut pairs, "longitude", &criteria.longitude);
    push(&mut pairs, "radius", &criteria.radius);
    push(&mut pairs, "ordering", &criteria.ordering);
    push(&mut pairs, "page", &criteria.page);
    push(&mut pairs, "page_size", &criteria.page_size);

    pairs
}

/// URL-encoded query string, with a leading `?` unless empty
pub fn to_query_string(criteria: &FilterCriteria) -> String {
    let pairs = build_query(criteria);
    if pairs.is_empty() {
        return String::new();
    }

    let encoded = url::form_urlencoded::Serializer::new(String::new())
        .extend_pairs(pairs.iter().map(|(k, v)| (*k, v.as_str())))
        .finish();
    format!("?{encoded}")
}
