//! Type-safe enumerations for indicators and status groups.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Service-coverage indicator.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum Indicator {
    /// Pregnant women with at least four antenatal care visits.
    #[serde(rename = "ANC4")]
    Anc4,
    /// Births attended by a skilled health professional.
    #[serde(rename = "SBA")]
    Sba,
}

impl Indicator {
    /// All indicators in output column order.
    pub const ALL: [Indicator; 2] = [Indicator::Anc4, Indicator::Sba];

    pub fn as_str(&self) -> &'static str {
        match self {
            Indicator::Anc4 => "ANC4",
            Indicator::Sba => "SBA",
        }
    }
}

impl fmt::Display for Indicator {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Indicator {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_uppercase().as_str() {
            "ANC4" => Ok(Indicator::Anc4),
            "SBA" => Ok(Indicator::Sba),
            _ => Err(format!("Unknown indicator: {s}")),
        }
    }
}

/// Progress toward the under-five mortality target.
///
/// `Unknown` only appears when unmapped status labels are routed to a third
/// group instead of aborting the run.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum StatusGroup {
    #[serde(rename = "On-track")]
    OnTrack,
    #[serde(rename = "Off-track")]
    OffTrack,
    #[serde(rename = "Unknown")]
    Unknown,
}

impl StatusGroup {
    /// Label used in output tables and reports.
    pub fn label(&self) -> &'static str {
        match self {
            StatusGroup::OnTrack => "On-track",
            StatusGroup::OffTrack => "Off-track",
            StatusGroup::Unknown => "Unknown",
        }
    }
}

impl fmt::Display for StatusGroup {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn indicator_from_str() {
        assert_eq!("anc4".parse::<Indicator>().unwrap(), Indicator::Anc4);
        assert_eq!(" SBA ".parse::<Indicator>().unwrap(), Indicator::Sba);
        assert!("PNC".parse::<Indicator>().is_err());
    }

    #[test]
    fn group_labels() {
        assert_eq!(StatusGroup::OnTrack.to_string(), "On-track");
        assert_eq!(StatusGroup::OffTrack.to_string(), "Off-track");
    }
}
