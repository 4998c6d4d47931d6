//! Raw source rows to typed, keyed rows.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::{debug, warn};

use mnch_model::{
    BirthProjection, CountryKey, CountryStatus, CoverageError, IndicatorObservation, RawBirths,
    RawObservation, RawStatus, Result, TableSource, UnknownCountryPolicy,
};

use crate::classify::{StatusClassifier, classify_statuses};
use crate::keys::KeyNormalizer;

/// Key normalization counts for one source.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct KeyReport {
    pub source: String,
    /// Rows offered for normalization.
    pub rows: usize,
    /// Rows dropped because their identifier did not resolve.
    pub dropped: usize,
    /// Distinct unresolved identifiers, sorted.
    pub unknown_identifiers: Vec<String>,
}

/// Normalizes the key of every row under the source's unknown-country policy.
fn normalize_keys<'a, T>(
    source: &str,
    table: &TableSource,
    aliases: &BTreeMap<String, String>,
    rows: impl IntoIterator<Item = &'a T>,
    raw_key: impl Fn(&T) -> &str,
) -> Result<(Vec<(CountryKey, &'a T)>, KeyReport)>
where
    T: 'a,
{
    let normalizer = KeyNormalizer::for_source(table, aliases)?;
    let mut keyed = Vec::new();
    let mut report = KeyReport {
        source: source.to_string(),
        ..KeyReport::default()
    };
    let mut unknown = BTreeSet::new();
    for row in rows {
        report.rows += 1;
        match normalizer.normalize(raw_key(row)) {
            Ok(key) => keyed.push((key, row)),
            Err(CoverageError::UnknownCountry { identifier })
                if table.on_unknown_country == UnknownCountryPolicy::Drop =>
            {
                report.dropped += 1;
                unknown.insert(identifier);
            }
            Err(err) => return Err(err),
        }
    }
    report.unknown_identifiers = unknown.into_iter().collect();
    if report.dropped > 0 {
        warn!(
            source,
            dropped = report.dropped,
            identifiers = report.unknown_identifiers.len(),
            "rows with unknown country identifiers dropped"
        );
        debug!(source, identifiers = ?report.unknown_identifiers, "unknown identifiers");
    }
    Ok((keyed, report))
}

/// Keys an indicator series. Row order is preserved.
pub fn prepare_indicator(
    source: &str,
    rows: &[RawObservation],
    table: &TableSource,
    aliases: &BTreeMap<String, String>,
) -> Result<(Vec<IndicatorObservation>, KeyReport)> {
    let (keyed, report) = normalize_keys(source, table, aliases, rows, |r| r.raw_key.as_str())?;
    let observations = keyed
        .into_iter()
        .map(|(country_key, row)| IndicatorObservation {
            country_key,
            year: row.year,
            value: row.value,
        })
        .collect();
    Ok((observations, report))
}

/// Keys and classifies the status table.
pub fn prepare_statuses(
    rows: &[RawStatus],
    table: &TableSource,
    aliases: &BTreeMap<String, String>,
    classifier: &StatusClassifier,
) -> Result<(BTreeMap<CountryKey, CountryStatus>, KeyReport)> {
    let (keyed, report) = normalize_keys("status", table, aliases, rows, |r| r.raw_key.as_str())?;
    let statuses = classify_statuses(
        classifier,
        keyed.into_iter().map(|(key, row)| (key, row.label.clone())),
    )?;
    Ok((statuses, report))
}

/// Keys the births table, keeping only `births_year`.
///
/// A country with two rows for the target year is a duplicate.
pub fn prepare_births(
    rows: &[RawBirths],
    table: &TableSource,
    aliases: &BTreeMap<String, String>,
    births_year: i32,
) -> Result<(BTreeMap<CountryKey, BirthProjection>, KeyReport)> {
    let in_year = rows.iter().filter(|row| row.year == births_year);
    let (keyed, report) = normalize_keys("births", table, aliases, in_year, |r| r.raw_key.as_str())?;
    let mut births = BTreeMap::new();
    for (country_key, row) in keyed {
        if births.contains_key(&country_key) {
            return Err(CoverageError::DuplicateCountry {
                country: country_key,
                source_name: "births".to_string(),
            });
        }
        births.insert(
            country_key.clone(),
            BirthProjection {
                country_key,
                year: row.year,
                births_thousands: row.births_thousands,
            },
        );
    }
    Ok((births, report))
}

#[cfg(test)]
mod tests {
    use super::*;
    use mnch_model::{KeyExtraction, PipelineConfig, StatusGroup};

    fn raw_obs(key: &str, year: i32, value: f64) -> RawObservation {
        RawObservation {
            raw_key: key.to_string(),
            year,
            value,
            row: 1,
        }
    }

    fn raw_births(key: &str, year: i32, births: f64) -> RawBirths {
        RawBirths {
            raw_key: key.to_string(),
            year,
            births_thousands: births,
            row: 1,
        }
    }

    #[test]
    fn indicator_rows_drop_regional_aggregates() {
        let config = PipelineConfig::default();
        let rows = vec![
            raw_obs("AFG: Afghanistan", 2020, 27.6),
            raw_obs("UNICEF_ESA: Eastern and Southern Africa", 2020, 60.0),
            raw_obs("UNICEF_ESA: Eastern and Southern Africa", 2021, 61.0),
        ];
        let (observations, report) =
            prepare_indicator("ANC4", &rows, &config.sources.anc4.table, &config.aliases)
                .unwrap();
        assert_eq!(observations.len(), 1);
        assert_eq!(observations[0].country_key.as_str(), "AFG");
        assert_eq!(report.rows, 3);
        assert_eq!(report.dropped, 2);
        assert_eq!(
            report.unknown_identifiers,
            vec!["UNICEF_ESA: Eastern and Southern Africa".to_string()]
        );
    }

    #[test]
    fn fail_policy_aborts_on_unknown_status_country() {
        let config = PipelineConfig::default();
        let rows = vec![RawStatus {
            raw_key: "ZZZ".to_string(),
            label: "Achieved".to_string(),
            row: 4,
        }];
        let err = prepare_statuses(
            &rows,
            &config.sources.status.table,
            &config.aliases,
            &StatusClassifier::default(),
        )
        .unwrap_err();
        assert_eq!(
            err,
            CoverageError::UnknownCountry {
                identifier: "ZZZ".to_string()
            }
        );
    }

    #[test]
    fn statuses_are_classified() {
        let config = PipelineConfig::default();
        let rows = vec![RawStatus {
            raw_key: "chl".to_string(),
            label: " Achieved ".to_string(),
            row: 1,
        }];
        let (statuses, _) = prepare_statuses(
            &rows,
            &config.sources.status.table,
            &config.aliases,
            &StatusClassifier::default(),
        )
        .unwrap();
        let chl = &statuses[&CountryKey::parse("CHL").unwrap()];
        assert_eq!(chl.canonical_group, StatusGroup::OnTrack);
        assert_eq!(chl.raw_status_label, "Achieved");
    }

    #[test]
    fn births_keep_the_target_year_only() {
        let config = PipelineConfig::default();
        let rows = vec![
            raw_births("AFG", 2021, 1300.0),
            raw_births("AFG", 2022, 1350.0),
            raw_births("XXX", 2021, 5.0),
        ];
        let (births, report) =
            prepare_births(&rows, &config.sources.births.table, &config.aliases, 2022).unwrap();
        assert_eq!(births.len(), 1);
        assert_eq!(births[&CountryKey::parse("AFG").unwrap()].births_thousands, 1350.0);
        assert_eq!(report.rows, 1);
        assert_eq!(report.dropped, 0);
    }

    #[test]
    fn duplicate_births_in_target_year_fail() {
        let config = PipelineConfig::default();
        let rows = vec![raw_births("AFG", 2022, 1.0), raw_births("afg", 2022, 2.0)];
        assert!(matches!(
            prepare_births(&rows, &config.sources.births.table, &config.aliases, 2022)
                .unwrap_err(),
            CoverageError::DuplicateCountry { .. }
        ));
    }

    #[test]
    fn name_keyed_source_uses_aliases() {
        let mut table = PipelineConfig::default().sources.births.table;
        table.key_extraction = KeyExtraction::Name;
        let mut aliases = BTreeMap::new();
        aliases.insert("Kosovo (UNSCR 1244)".to_string(), "XKX".to_string());
        let rows = vec![
            raw_births("Kosovo (UNSCR 1244)", 2022, 20.0),
            raw_births("Bolivia", 2022, 250.0),
        ];
        let (births, _) = prepare_births(&rows, &table, &aliases, 2022).unwrap();
        let keys: Vec<&str> = births.keys().map(CountryKey::as_str).collect();
        assert_eq!(keys, vec!["BOL", "XKX"]);
    }
}
