//! Reconciliation and aggregation core of the coverage pipeline.
//!
//! Stages run leaf-first: [`keys`] normalizes identifiers, [`selection`]
//! picks the latest in-window observations, [`classify`] maps status labels,
//! [`reconcile`] joins the four tables and [`aggregate`] computes group means.

pub mod aggregate;
pub mod classify;
pub mod countries;
pub mod keys;
pub mod prepare;
pub mod reconcile;
pub mod selection;

pub use aggregate::{aggregate, simple_mean, weighted_mean};
pub use classify::{StatusClassifier, classify_statuses};
pub use keys::KeyNormalizer;
pub use prepare::{KeyReport, prepare_births, prepare_indicator, prepare_statuses};
pub use reconcile::{JoinDiagnostics, JoinStage, Reconciliation, reconcile};
pub use selection::{YearWindow, latest_indicators, select_latest};
