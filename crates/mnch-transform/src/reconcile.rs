//! Strict inner join of the four per-country tables.

use std::collections::{BTreeMap, BTreeSet};

use serde::Serialize;
use tracing::{debug, warn};

use mnch_model::{
    BirthProjection, CountryKey, CountryStatus, CoverageError, IndicatorObservation, JoinPolicy,
    ReconciledRecord, Result,
};

/// Unmatched countries of one join stage.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JoinStage {
    /// Source joined at this stage.
    pub stage: String,
    /// Countries on the accumulated side missing from the stage source.
    pub left_only: Vec<CountryKey>,
    /// Countries of the stage source missing from the accumulated side.
    pub right_only: Vec<CountryKey>,
}

impl JoinStage {
    fn between(
        stage: &str,
        left: &BTreeSet<CountryKey>,
        right: &BTreeSet<CountryKey>,
    ) -> Self {
        Self {
            stage: stage.to_string(),
            left_only: left.difference(right).cloned().collect(),
            right_only: right.difference(left).cloned().collect(),
        }
    }

    pub fn dropped_count(&self) -> usize {
        self.left_only.len() + self.right_only.len()
    }
}

/// Per-stage join diagnostics in stage order: SBA, status, births.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize)]
pub struct JoinDiagnostics {
    pub stages: Vec<JoinStage>,
}

impl JoinDiagnostics {
    pub fn stage(&self, name: &str) -> Option<&JoinStage> {
        self.stages.iter().find(|stage| stage.stage == name)
    }

    pub fn dropped_count(&self) -> usize {
        self.stages.iter().map(JoinStage::dropped_count).sum()
    }
}

/// Joined records with the diagnostics of how they were obtained.
#[derive(Debug, Clone, PartialEq)]
pub struct Reconciliation {
    /// One record per country, ascending by key.
    pub records: Vec<ReconciledRecord>,
    pub diagnostics: JoinDiagnostics,
}

fn key_set<V>(map: &BTreeMap<CountryKey, V>) -> BTreeSet<CountryKey> {
    map.keys().cloned().collect()
}

/// Applies one join stage: records diagnostics and narrows the key set.
fn join_stage(
    name: &str,
    left: BTreeSet<CountryKey>,
    right: &BTreeSet<CountryKey>,
    policy: JoinPolicy,
    diagnostics: &mut JoinDiagnostics,
) -> Result<BTreeSet<CountryKey>> {
    let stage = JoinStage::between(name, &left, right);
    if stage.dropped_count() > 0 {
        if policy == JoinPolicy::RequireComplete {
            let country = stage
                .left_only
                .first()
                .or_else(|| stage.right_only.first())
                .cloned();
            if let Some(country) = country {
                return Err(CoverageError::UnmatchedCountry {
                    country,
                    stage: name.to_string(),
                });
            }
        }
        warn!(
            stage = name,
            dropped = stage.dropped_count(),
            "countries dropped by inner join"
        );
        debug!(
            stage = name,
            left_only = ?stage.left_only,
            right_only = ?stage.right_only,
            "unmatched countries"
        );
    }
    diagnostics.stages.push(stage);
    Ok(left.intersection(right).cloned().collect())
}

/// Joins latest ANC4, latest SBA, status and births on the country key.
///
/// Stage order is ANC4 ⋈ SBA ⋈ status ⋈ births. Countries missing from any
/// table are dropped under [`JoinPolicy::Inner`] and abort the run under
/// [`JoinPolicy::RequireComplete`]. Values are never substituted.
pub fn reconcile(
    anc4: &BTreeMap<CountryKey, IndicatorObservation>,
    sba: &BTreeMap<CountryKey, IndicatorObservation>,
    status: &BTreeMap<CountryKey, CountryStatus>,
    births: &BTreeMap<CountryKey, BirthProjection>,
    policy: JoinPolicy,
) -> Result<Reconciliation> {
    let mut diagnostics = JoinDiagnostics::default();
    let keys = key_set(anc4);
    let keys = join_stage("SBA", keys, &key_set(sba), policy, &mut diagnostics)?;
    let keys = join_stage("status", keys, &key_set(status), policy, &mut diagnostics)?;
    let keys = join_stage("births", keys, &key_set(births), policy, &mut diagnostics)?;

    let mut records = Vec::with_capacity(keys.len());
    for key in keys {
        let (Some(a), Some(s), Some(st), Some(b)) = (
            anc4.get(&key),
            sba.get(&key),
            status.get(&key),
            births.get(&key),
        ) else {
            continue;
        };
        records.push(ReconciledRecord {
            country_key: key,
            anc4_value: a.value,
            anc4_year: a.year,
            sba_value: s.value,
            sba_year: s.year,
            canonical_group: st.canonical_group,
            raw_status_label: st.raw_status_label.clone(),
            births_thousands: b.births_thousands,
        });
    }
    debug!(records = records.len(), "reconciled countries");
    Ok(Reconciliation {
        records,
        diagnostics,
    })
}
