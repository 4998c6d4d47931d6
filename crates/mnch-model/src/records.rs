//! Row types flowing through the pipeline.
//!
//! Raw rows carry the source identifier exactly as read; typed rows carry a
//! normalized [`CountryKey`].

use serde::{Deserialize, Serialize};

use crate::enums::{Indicator, StatusGroup};
use crate::ids::CountryKey;

/// Indicator row before key normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct RawObservation {
    pub raw_key: String,
    pub year: i32,
    pub value: f64,
    /// 1-based data row in the source table.
    pub row: usize,
}

/// Classification row before key normalization.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RawStatus {
    pub raw_key: String,
    pub label: String,
    pub row: usize,
}

/// Demographic projection row before key normalization.
#[derive(Debug, Clone, PartialEq)]
pub struct RawBirths {
    pub raw_key: String,
    pub year: i32,
    pub births_thousands: f64,
    pub row: usize,
}

/// One observed indicator value for a country and year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct IndicatorObservation {
    pub country_key: CountryKey,
    pub year: i32,
    /// Percentage, 0-100.
    pub value: f64,
}

/// Classification of a country with its derived group.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CountryStatus {
    pub country_key: CountryKey,
    pub raw_status_label: String,
    pub canonical_group: StatusGroup,
}

/// Projected births for a country and year.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BirthProjection {
    pub country_key: CountryKey,
    pub year: i32,
    pub births_thousands: f64,
}

/// Latest in-window observation of one indicator for a country.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LatestIndicator {
    pub country_key: CountryKey,
    pub indicator: Indicator,
    pub year: i32,
    pub value: f64,
}

impl LatestIndicator {
    pub fn new(indicator: Indicator, observation: &IndicatorObservation) -> Self {
        Self {
            country_key: observation.country_key.clone(),
            indicator,
            year: observation.year,
            value: observation.value,
        }
    }
}

/// A country present in every source after the join.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ReconciledRecord {
    pub country_key: CountryKey,
    pub anc4_value: f64,
    pub anc4_year: i32,
    pub sba_value: f64,
    pub sba_year: i32,
    pub canonical_group: StatusGroup,
    pub raw_status_label: String,
    pub births_thousands: f64,
}

impl ReconciledRecord {
    /// Value of the given indicator.
    pub fn value(&self, indicator: Indicator) -> f64 {
        match indicator {
            Indicator::Anc4 => self.anc4_value,
            Indicator::Sba => self.sba_value,
        }
    }
}

/// Simple and birth-weighted mean of one indicator within one group.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct GroupAggregate {
    pub group: StatusGroup,
    pub indicator: Indicator,
    pub country_count: usize,
    pub total_births_thousands: f64,
    pub simple_mean: f64,
    pub weighted_mean: f64,
}
