//! Status label classification.

use std::collections::BTreeMap;

use tracing::warn;

use mnch_model::{
    CountryKey, CountryStatus, CoverageError, Result, StatusGroup, UnmappedStatusPolicy,
};

/// Maps free-text status labels to canonical groups.
///
/// Labels are trimmed and lowercased before lookup in a fixed table.
#[derive(Debug, Clone, Copy, Default)]
pub struct StatusClassifier {
    policy: UnmappedStatusPolicy,
}

impl StatusClassifier {
    pub fn new(policy: UnmappedStatusPolicy) -> Self {
        Self { policy }
    }

    pub fn classify(&self, raw: &str) -> Result<StatusGroup> {
        match raw.trim().to_lowercase().as_str() {
            "on-track" | "on track" | "achieved" => Ok(StatusGroup::OnTrack),
            "acceleration needed" => Ok(StatusGroup::OffTrack),
            _ => match self.policy {
                UnmappedStatusPolicy::Fail => Err(CoverageError::UnrecognizedStatus {
                    label: raw.trim().to_string(),
                }),
                UnmappedStatusPolicy::Unknown => Ok(StatusGroup::Unknown),
            },
        }
    }
}

/// Classifies keyed status labels into a map.
///
/// A repeat that classifies into the same group is ignored and the first
/// label is kept. Labels routed to `Unknown` only agree when they match
/// case-insensitively. Anything else is a duplicate.
pub fn classify_statuses(
    classifier: &StatusClassifier,
    rows: impl IntoIterator<Item = (CountryKey, String)>,
) -> Result<BTreeMap<CountryKey, CountryStatus>> {
    let mut statuses: BTreeMap<CountryKey, CountryStatus> = BTreeMap::new();
    let mut unmapped = 0usize;
    for (country_key, label) in rows {
        let label = label.trim().to_string();
        let canonical_group = classifier.classify(&label)?;
        if let Some(existing) = statuses.get(&country_key) {
            let agrees = existing.canonical_group == canonical_group
                && (canonical_group != StatusGroup::Unknown
                    || existing.raw_status_label.to_lowercase() == label.to_lowercase());
            if agrees {
                continue;
            }
            return Err(CoverageError::DuplicateCountry {
                country: country_key,
                source_name: "status".to_string(),
            });
        }
        if canonical_group == StatusGroup::Unknown {
            unmapped += 1;
        }
        statuses.insert(
            country_key.clone(),
            CountryStatus {
                country_key,
                raw_status_label: label,
                canonical_group,
            },
        );
    }
    if unmapped > 0 {
        warn!(count = unmapped, "status labels outside the table routed to Unknown");
    }
    Ok(statuses)
}
