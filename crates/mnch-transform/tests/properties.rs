//! Property tests for selection, joining, weighting and key normalization.

use std::collections::{BTreeMap, BTreeSet};

use proptest::prelude::*;

use mnch_model::{
    BirthProjection, CountryKey, CountryStatus, IndicatorObservation, JoinPolicy, KeyExtraction,
    ReconciledRecord, StatusGroup,
};
use mnch_transform::{
    KeyNormalizer, YearWindow, countries, reconcile, select_latest, simple_mean, weighted_mean,
};

const CODES: [&str; 8] = ["AFG", "ALB", "BRA", "CHL", "IND", "NGA", "VNM", "ZWE"];

fn key(code: &str) -> CountryKey {
    CountryKey::parse(code).unwrap()
}

fn observation() -> impl Strategy<Value = IndicatorObservation> {
    (0..CODES.len(), 2010..2026i32, 0.0..100.0f64).prop_map(|(idx, year, value)| {
        IndicatorObservation {
            country_key: key(CODES[idx]),
            year,
            value,
        }
    })
}

fn code_subset() -> impl Strategy<Value = BTreeSet<&'static str>> {
    proptest::sample::subsequence(CODES.to_vec(), 0..=CODES.len())
        .prop_map(|codes| codes.into_iter().collect())
}

fn indicator_map(codes: &BTreeSet<&str>) -> BTreeMap<CountryKey, IndicatorObservation> {
    codes
        .iter()
        .map(|code| {
            (
                key(code),
                IndicatorObservation {
                    country_key: key(code),
                    year: 2020,
                    value: 50.0,
                },
            )
        })
        .collect()
}

proptest! {
    #[test]
    fn latest_is_unique_and_maximal(rows in proptest::collection::vec(observation(), 0..60)) {
        let window = YearWindow::new(2018, 2022).unwrap();
        let latest = select_latest(&rows, window);
        for (country, chosen) in &latest {
            prop_assert_eq!(&chosen.country_key, country);
            prop_assert!(window.contains(chosen.year));
            let max_year = rows
                .iter()
                .filter(|r| &r.country_key == country && window.contains(r.year))
                .map(|r| r.year)
                .max();
            prop_assert_eq!(max_year, Some(chosen.year));
        }
        let expected: BTreeSet<&CountryKey> = rows
            .iter()
            .filter(|r| window.contains(r.year))
            .map(|r| &r.country_key)
            .collect();
        prop_assert_eq!(latest.keys().collect::<BTreeSet<_>>(), expected);
    }

    #[test]
    fn reconciled_keys_are_the_intersection(
        anc4 in code_subset(),
        sba in code_subset(),
        status in code_subset(),
        births in code_subset(),
    ) {
        let status_map: BTreeMap<CountryKey, CountryStatus> = status
            .iter()
            .map(|code| (key(code), CountryStatus {
                country_key: key(code),
                raw_status_label: "Achieved".to_string(),
                canonical_group: StatusGroup::OnTrack,
            }))
            .collect();
        let births_map: BTreeMap<CountryKey, BirthProjection> = births
            .iter()
            .map(|code| (key(code), BirthProjection {
                country_key: key(code),
                year: 2022,
                births_thousands: 10.0,
            }))
            .collect();

        let result = reconcile(
            &indicator_map(&anc4),
            &indicator_map(&sba),
            &status_map,
            &births_map,
            JoinPolicy::Inner,
        ).unwrap();

        let expected: Vec<&str> = anc4
            .iter()
            .filter(|c| sba.contains(*c) && status.contains(*c) && births.contains(*c))
            .copied()
            .collect();
        let actual: Vec<&str> = result.records.iter().map(|r| r.country_key.as_str()).collect();
        prop_assert_eq!(actual, expected);
    }

    #[test]
    fn equal_weights_match_the_simple_mean(
        values in proptest::collection::vec(0.0..100.0f64, 1..CODES.len()),
        weight in 0.001..10_000.0f64,
    ) {
        let records: Vec<ReconciledRecord> = values
            .iter()
            .enumerate()
            .map(|(idx, value)| ReconciledRecord {
                country_key: key(CODES[idx]),
                anc4_value: *value,
                anc4_year: 2021,
                sba_value: *value,
                sba_year: 2021,
                canonical_group: StatusGroup::OffTrack,
                raw_status_label: "Acceleration Needed".to_string(),
                births_thousands: weight,
            })
            .collect();
        let refs: Vec<&ReconciledRecord> = records.iter().collect();
        let simple = simple_mean(StatusGroup::OffTrack, mnch_model::Indicator::Anc4, &refs).unwrap();
        let weighted = weighted_mean(StatusGroup::OffTrack, mnch_model::Indicator::Anc4, &refs).unwrap();
        prop_assert!((simple - weighted).abs() < 1e-6);
    }

    #[test]
    fn normalize_is_idempotent(
        idx in 0..250usize,
        label in "[A-Za-z ]{0,20}",
        strategy in prop_oneof![
            Just(KeyExtraction::Iso3),
            Just(KeyExtraction::CodePrefix),
            Just(KeyExtraction::LeadingLetters),
            Just(KeyExtraction::Name),
        ],
    ) {
        let normalizer = KeyNormalizer::new(strategy, ':', &BTreeMap::new()).unwrap();
        let table: Vec<(&str, &str)> = countries::countries().collect();
        let (code, name) = table[idx % table.len()];
        let raw = match strategy {
            KeyExtraction::Iso3 => code.to_lowercase(),
            KeyExtraction::CodePrefix => format!("{code}: {label}"),
            KeyExtraction::LeadingLetters => format!("{code}{label}"),
            KeyExtraction::Name => name.to_uppercase(),
        };
        let once = normalizer.normalize(&raw).unwrap();
        let twice = normalizer.normalize(once.as_str()).unwrap();
        prop_assert_eq!(&once, &twice);
        prop_assert_eq!(once.as_str(), code);
    }
}
