//! Group means of coverage indicators.

use std::collections::BTreeMap;

use tracing::debug;

use mnch_model::{
    CoverageError, GroupAggregate, Indicator, ReconciledRecord, Result, StatusGroup,
};

/// Unweighted mean of `indicator` over `records`.
pub fn simple_mean(
    group: StatusGroup,
    indicator: Indicator,
    records: &[&ReconciledRecord],
) -> Result<f64> {
    if records.is_empty() {
        return Err(CoverageError::EmptyGroup { group, indicator });
    }
    let sum: f64 = records.iter().map(|r| r.value(indicator)).sum();
    Ok(sum / records.len() as f64)
}

/// Birth-weighted mean of `indicator` over `records`.
///
/// Every weight must be finite and non-negative, and the weights must not
/// sum to zero.
pub fn weighted_mean(
    group: StatusGroup,
    indicator: Indicator,
    records: &[&ReconciledRecord],
) -> Result<f64> {
    if records.is_empty() {
        return Err(CoverageError::EmptyGroup { group, indicator });
    }
    let mut weighted_sum = 0.0;
    let mut total_weight = 0.0;
    for record in records {
        let weight = record.births_thousands;
        if !weight.is_finite() {
            return Err(CoverageError::NonFiniteWeight {
                group,
                country: record.country_key.clone(),
                weight,
            });
        }
        if weight < 0.0 {
            return Err(CoverageError::NegativeWeight {
                group,
                country: record.country_key.clone(),
                weight,
            });
        }
        weighted_sum += record.value(indicator) * weight;
        total_weight += weight;
    }
    if total_weight == 0.0 {
        return Err(CoverageError::ZeroWeight { group, indicator });
    }
    Ok(weighted_sum / total_weight)
}

/// Simple and weighted means per group and indicator.
///
/// Output is ordered by group, then ANC4 before SBA. Groups without any
/// record do not appear.
pub fn aggregate(records: &[ReconciledRecord]) -> Result<Vec<GroupAggregate>> {
    let mut groups: BTreeMap<StatusGroup, Vec<&ReconciledRecord>> = BTreeMap::new();
    for record in records {
        groups.entry(record.canonical_group).or_default().push(record);
    }

    let mut aggregates = Vec::with_capacity(groups.len() * Indicator::ALL.len());
    for (group, members) in &groups {
        let total_births_thousands: f64 = members.iter().map(|r| r.births_thousands).sum();
        for indicator in Indicator::ALL {
            let aggregate = GroupAggregate {
                group: *group,
                indicator,
                country_count: members.len(),
                total_births_thousands,
                simple_mean: simple_mean(*group, indicator, members)?,
                weighted_mean: weighted_mean(*group, indicator, members)?,
            };
            debug!(
                group = %aggregate.group,
                indicator = %aggregate.indicator,
                countries = aggregate.country_count,
                simple = aggregate.simple_mean,
                weighted = aggregate.weighted_mean,
                "group aggregate"
            );
            aggregates.push(aggregate);
        }
    }
    Ok(aggregates)
}

#[cfg(test)]
mod tests {
    use super::*;
    use mnch_model::CountryKey;

    fn record(code: &str, group: StatusGroup, anc4: f64, sba: f64, births: f64) -> ReconciledRecord {
        ReconciledRecord {
            country_key: CountryKey::parse(code).unwrap(),
            anc4_value: anc4,
            anc4_year: 2021,
            sba_value: sba,
            sba_year: 2021,
            canonical_group: group,
            raw_status_label: group.label().to_string(),
            births_thousands: births,
        }
    }

    #[test]
    fn weights_shift_the_mean_toward_large_countries() {
        let records = vec![
            record("AFG", StatusGroup::OffTrack, 20.0, 40.0, 300.0),
            record("ALB", StatusGroup::OffTrack, 80.0, 100.0, 100.0),
        ];
        let refs: Vec<&ReconciledRecord> = records.iter().collect();
        let simple = simple_mean(StatusGroup::OffTrack, Indicator::Anc4, &refs).unwrap();
        let weighted = weighted_mean(StatusGroup::OffTrack, Indicator::Anc4, &refs).unwrap();
        assert!((simple - 50.0).abs() < 1e-9);
        assert!((weighted - 35.0).abs() < 1e-9);
    }

    #[test]
    fn aggregates_are_ordered_by_group_then_indicator() {
        let records = vec![
            record("AFG", StatusGroup::OffTrack, 20.0, 40.0, 300.0),
            record("CHL", StatusGroup::OnTrack, 90.0, 99.0, 200.0),
        ];
        let aggregates = aggregate(&records).unwrap();
        let order: Vec<(StatusGroup, Indicator)> =
            aggregates.iter().map(|a| (a.group, a.indicator)).collect();
        assert_eq!(
            order,
            vec![
                (StatusGroup::OnTrack, Indicator::Anc4),
                (StatusGroup::OnTrack, Indicator::Sba),
                (StatusGroup::OffTrack, Indicator::Anc4),
                (StatusGroup::OffTrack, Indicator::Sba),
            ]
        );
        assert_eq!(aggregates[2].country_count, 1);
        assert_eq!(aggregates[2].total_births_thousands, 300.0);
    }

    #[test]
    fn zero_total_births_fails() {
        let records = vec![
            record("AFG", StatusGroup::OnTrack, 20.0, 40.0, 0.0),
            record("ALB", StatusGroup::OnTrack, 80.0, 100.0, 0.0),
        ];
        assert_eq!(
            aggregate(&records).unwrap_err(),
            CoverageError::ZeroWeight {
                group: StatusGroup::OnTrack,
                indicator: Indicator::Anc4
            }
        );
    }

    #[test]
    fn negative_and_nan_weights_fail() {
        let negative = vec![record("AFG", StatusGroup::OnTrack, 20.0, 40.0, -1.0)];
        assert!(matches!(
            aggregate(&negative).unwrap_err(),
            CoverageError::NegativeWeight { .. }
        ));
        let nan = vec![record("AFG", StatusGroup::OnTrack, 20.0, 40.0, f64::NAN)];
        assert!(matches!(
            aggregate(&nan).unwrap_err(),
            CoverageError::NonFiniteWeight { .. }
        ));
    }

    #[test]
    fn empty_input_is_an_empty_group() {
        assert_eq!(
            simple_mean(StatusGroup::OnTrack, Indicator::Sba, &[]).unwrap_err(),
            CoverageError::EmptyGroup {
                group: StatusGroup::OnTrack,
                indicator: Indicator::Sba
            }
        );
    }
}
