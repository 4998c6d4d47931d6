//! Configuration options for the coverage pipeline.
//!
//! The defaults reproduce the file and column names of the UNICEF ANC4/SBA
//! exports, the U5MR classification workbook and the WPP 2022 compact
//! demographic indicators.

use std::collections::BTreeMap;

use serde::{Deserialize, Serialize};

/// How a source's country column is turned into an ISO3 code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum KeyExtraction {
    /// The column already holds ISO3 codes.
    #[default]
    Iso3,
    /// `CODE:Label` strings; the code before the delimiter, or the leading
    /// three letters when no delimiter is present.
    CodePrefix,
    /// The leading three letters of the identifier.
    LeadingLetters,
    /// Free-text country names resolved through the name table.
    Name,
}

/// What to do with rows whose identifier cannot be resolved.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnknownCountryPolicy {
    /// Skip the row and count it in the normalization report.
    #[default]
    Drop,
    /// Abort the run.
    Fail,
}

/// Join behavior for countries missing from one of the sources.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum JoinPolicy {
    /// Strict inner join: unmatched countries are dropped and counted.
    #[default]
    Inner,
    /// Abort when any country fails to match.
    RequireComplete,
}

/// Handling of status labels outside the classification table.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum UnmappedStatusPolicy {
    /// Abort with an unrecognized-status error.
    #[default]
    Fail,
    /// Route the country into the `Unknown` group.
    Unknown,
}

fn default_delimiter() -> char {
    ':'
}

/// Location and key column of one tabular source.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TableSource {
    /// File name inside the input directory (matched case-insensitively).
    pub file: String,
    /// Worksheet name for spreadsheet sources; first sheet when absent.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub sheet: Option<String>,
    /// Rows above the header row.
    #[serde(default)]
    pub skip_rows: usize,
    pub key_column: String,
    #[serde(default)]
    pub key_extraction: KeyExtraction,
    #[serde(default = "default_delimiter")]
    pub key_delimiter: char,
    #[serde(default)]
    pub on_unknown_country: UnknownCountryPolicy,
}

impl TableSource {
    fn new(file: &str, key_column: &str, key_extraction: KeyExtraction) -> Self {
        Self {
            file: file.to_string(),
            sheet: None,
            skip_rows: 0,
            key_column: key_column.to_string(),
            key_extraction,
            key_delimiter: default_delimiter(),
            on_unknown_country: UnknownCountryPolicy::Drop,
        }
    }
}

/// Indicator time series: country, year, value.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct IndicatorSource {
    #[serde(flatten)]
    pub table: TableSource,
    pub year_column: String,
    pub value_column: String,
}

impl IndicatorSource {
    fn unicef(file: &str) -> Self {
        Self {
            table: TableSource::new(file, "REF_AREA:Geographic area", KeyExtraction::CodePrefix),
            year_column: "TIME_PERIOD".to_string(),
            value_column: "OBS_VALUE".to_string(),
        }
    }
}

/// Classification table: country, status label.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StatusSource {
    #[serde(flatten)]
    pub table: TableSource,
    pub status_column: String,
}

/// Demographic projection table: country, year, births.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BirthsSource {
    #[serde(flatten)]
    pub table: TableSource,
    pub year_column: String,
    pub births_column: String,
}

/// The four configured sources.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct SourcesConfig {
    pub anc4: IndicatorSource,
    pub sba: IndicatorSource,
    pub status: StatusSource,
    pub births: BirthsSource,
}

impl Default for SourcesConfig {
    fn default() -> Self {
        let mut status = TableSource::new(
            "On-track and off-track countries.xlsx",
            "ISO3Code",
            KeyExtraction::Iso3,
        );
        status.on_unknown_country = UnknownCountryPolicy::Fail;
        Self {
            anc4: IndicatorSource::unicef("ANC4.CSV"),
            sba: IndicatorSource::unicef("SBA.CSV"),
            status: StatusSource {
                table: status,
                status_column: "Status.U5MR".to_string(),
            },
            births: BirthsSource {
                table: TableSource::new(
                    "WPP2022_GEN_F01_DEMOGRAPHIC_INDICATORS_COMPACT_REV1.xlsx",
                    "ISO3 Alpha-code",
                    KeyExtraction::Iso3,
                ),
                year_column: "Year".to_string(),
                births_column: "Births (thousands)".to_string(),
            },
        }
    }
}

/// Year window for indicator selection and the births target year.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct WindowConfig {
    pub year_min: i32,
    pub year_max: i32,
    pub births_year: i32,
}

impl Default for WindowConfig {
    fn default() -> Self {
        Self {
            year_min: 2018,
            year_max: 2022,
            births_year: 2022,
        }
    }
}

/// Join and classification policies.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PolicyConfig {
    pub join: JoinPolicy,
    pub unmapped_status: UnmappedStatusPolicy,
}

/// Full pipeline configuration, passed explicitly into the pipeline.
#[derive(Debug, Clone, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub window: WindowConfig,
    pub policy: PolicyConfig,
    pub sources: SourcesConfig,
    /// Extra country names (or spellings) mapped to ISO3 codes.
    pub aliases: BTreeMap<String, String>,
}

impl PipelineConfig {
    pub fn with_window(mut self, window: WindowConfig) -> Self {
        self.window = window;
        self
    }

    pub fn with_join_policy(mut self, join: JoinPolicy) -> Self {
        self.policy.join = join;
        self
    }

    pub fn with_unmapped_status(mut self, policy: UnmappedStatusPolicy) -> Self {
        self.policy.unmapped_status = policy;
        self
    }
}
