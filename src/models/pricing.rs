use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::fmt;

use super::PropertyId;

/// Check-in / check-out pair a price is requested for
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct DateRange {
    pub check_in: NaiveDate,
    pub check_out: NaiveDate,
}

impl DateRange {
    pub fn new(check_in: NaiveDate, check_out: NaiveDate) -> Self {
        Self { check_in, check_out }
    }
}

impl fmt::Display for DateRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} to {}", self.check_in, self.check_out)
    }
}

/// Per-day line of the backend's dynamic pricing breakdown
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct DailyPrice {
    pub date: NaiveDate,
    pub base_price: Decimal,
    pub multiplier: Decimal,
    pub final_price: Decimal,
    #[serde(default)]
    pub pricing_rule: Option<String>,
}

/// Payload of `GET /properties/{id}/calculate_price/`
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct PriceCalculation {
    #[serde(default)]
    pub property_id: Option<PropertyId>,
    #[serde(default)]
    pub property_name: Option<String>,
    #[serde(default)]
    pub check_in: Option<NaiveDate>,
    #[serde(default)]
    pub check_out: Option<NaiveDate>,
    pub nights: u32,
    #[serde(default)]
    pub base_price_per_night: Option<Decimal>,
    pub total_price: Decimal,
    pub average_price_per_night: Decimal,
    pub currency: String,
    #[serde(default)]
    pub daily_breakdown: Vec<DailyPrice>,
}

/// Total and average nightly price for one property over one date range
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PriceQuote {
    pub nights: u32,
    pub total: Decimal,
    pub average_per_night: Decimal,
    pub currency: String,
}

impl From<PriceCalculation> for PriceQuote {
    fn from(calc: PriceCalculation) -> Self {
        Self {
            nights: calc.nights,
            total: calc.total_price,
            average_per_night: calc.average_price_per_night,
            currency: calc.currency,
        }
    }
}
