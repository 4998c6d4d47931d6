//! Error types for reconciliation and aggregation.

use thiserror::Error;

use crate::enums::{Indicator, StatusGroup};
use crate::ids::CountryKey;

/// Data-integrity failures raised by the coverage pipeline core.
///
/// Every variant aborts the run. The message always names the offending
/// identifier or value so the failing input can be located.
#[derive(Debug, Error, PartialEq)]
pub enum CoverageError {
    /// Identifier that no extraction strategy could resolve to an ISO3 code.
    #[error("unknown country identifier '{identifier}'")]
    UnknownCountry { identifier: String },

    /// Status label outside the fixed classification table.
    #[error("unrecognized status label '{label}'")]
    UnrecognizedStatus { label: String },

    /// Mean requested over zero values.
    #[error("no {indicator} values in group {group}")]
    EmptyGroup {
        group: StatusGroup,
        indicator: Indicator,
    },

    /// Sum of birth weights is zero for a group.
    #[error("total births are zero for {indicator} in group {group}")]
    ZeroWeight {
        group: StatusGroup,
        indicator: Indicator,
    },

    /// A birth weight below zero.
    #[error("negative births ({weight}) for {country} in group {group}")]
    NegativeWeight {
        group: StatusGroup,
        country: CountryKey,
        weight: f64,
    },

    /// A birth weight that is NaN or infinite.
    #[error("non-finite births ({weight}) for {country} in group {group}")]
    NonFiniteWeight {
        group: StatusGroup,
        country: CountryKey,
        weight: f64,
    },

    /// The same country appears twice in a table that must be unique per country.
    #[error("duplicate country {country} in {source_name}")]
    DuplicateCountry {
        country: CountryKey,
        source_name: String,
    },

    /// A country dropped by the join while the join policy forbids drops.
    #[error("country {country} has no match at join stage {stage}")]
    UnmatchedCountry { country: CountryKey, stage: String },

    /// Year window with min greater than max.
    #[error("invalid year window {min}..={max}")]
    InvalidWindow { min: i32, max: i32 },
}

/// Result type for core pipeline operations.
pub type Result<T> = std::result::Result<T, CoverageError>;
