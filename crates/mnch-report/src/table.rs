//! Group-by-indicator pivot of the aggregates.

use std::collections::BTreeMap;

use mnch_model::{GroupAggregate, Indicator, StatusGroup};

/// Means of both indicators for one status group.
#[derive(Debug, Clone, PartialEq)]
pub struct CoverageRow {
    pub group: StatusGroup,
    pub country_count: usize,
    pub total_births_thousands: f64,
    pub anc4_mean: f64,
    pub sba_mean: f64,
    pub anc4_weighted_mean: f64,
    pub sba_weighted_mean: f64,
}

impl CoverageRow {
    pub fn simple(&self, indicator: Indicator) -> f64 {
        match indicator {
            Indicator::Anc4 => self.anc4_mean,
            Indicator::Sba => self.sba_mean,
        }
    }

    pub fn weighted(&self, indicator: Indicator) -> f64 {
        match indicator {
            Indicator::Anc4 => self.anc4_weighted_mean,
            Indicator::Sba => self.sba_weighted_mean,
        }
    }
}

/// One row per group, sorted by group label.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct CoverageTable {
    pub rows: Vec<CoverageRow>,
}

impl CoverageTable {
    pub fn from_aggregates(aggregates: &[GroupAggregate]) -> Self {
        let mut by_label: BTreeMap<&'static str, CoverageRow> = BTreeMap::new();
        for aggregate in aggregates {
            let row = by_label
                .entry(aggregate.group.label())
                .or_insert_with(|| CoverageRow {
                    group: aggregate.group,
                    country_count: aggregate.country_count,
                    total_births_thousands: aggregate.total_births_thousands,
                    anc4_mean: f64::NAN,
                    sba_mean: f64::NAN,
                    anc4_weighted_mean: f64::NAN,
                    sba_weighted_mean: f64::NAN,
                });
            match aggregate.indicator {
                Indicator::Anc4 => {
                    row.anc4_mean = aggregate.simple_mean;
                    row.anc4_weighted_mean = aggregate.weighted_mean;
                }
                Indicator::Sba => {
                    row.sba_mean = aggregate.simple_mean;
                    row.sba_weighted_mean = aggregate.weighted_mean;
                }
            }
        }
        Self {
            rows: by_label.into_values().collect(),
        }
    }

    pub fn row(&self, group: StatusGroup) -> Option<&CoverageRow> {
        self.rows.iter().find(|row| row.group == group)
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}
