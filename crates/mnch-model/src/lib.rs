pub mod enums;
pub mod error;
pub mod ids;
pub mod lookup;
pub mod options;
pub mod records;

pub use enums::{Indicator, StatusGroup};
pub use error::{CoverageError, Result};
pub use ids::CountryKey;
pub use lookup::CaseInsensitiveSet;
pub use options::{
    BirthsSource, IndicatorSource, JoinPolicy, KeyExtraction, PipelineConfig, PolicyConfig,
    SourcesConfig, StatusSource, TableSource, UnknownCountryPolicy, UnmappedStatusPolicy,
    WindowConfig,
};
pub use records::{
    BirthProjection, CountryStatus, GroupAggregate, IndicatorObservation, LatestIndicator,
    RawBirths, RawObservation, RawStatus, ReconciledRecord,
};
