//! Temporal selection of the latest in-window observation.

use std::collections::BTreeMap;

use mnch_model::{
    CountryKey, CoverageError, Indicator, IndicatorObservation, LatestIndicator, Result,
    WindowConfig,
};

/// Inclusive calendar-year window.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct YearWindow {
    min: i32,
    max: i32,
}

impl YearWindow {
    pub fn new(min: i32, max: i32) -> Result<Self> {
        if min > max {
            return Err(CoverageError::InvalidWindow { min, max });
        }
        Ok(Self { min, max })
    }

    pub fn from_config(window: &WindowConfig) -> Result<Self> {
        Self::new(window.year_min, window.year_max)
    }

    pub fn min(&self) -> i32 {
        self.min
    }

    pub fn max(&self) -> i32 {
        self.max
    }

    pub fn contains(&self, year: i32) -> bool {
        (self.min..=self.max).contains(&year)
    }
}

/// Latest in-window observation per country.
///
/// Equal years resolve to the row that comes last in `observations`.
/// Countries without any in-window row are absent from the result.
pub fn select_latest(
    observations: &[IndicatorObservation],
    window: YearWindow,
) -> BTreeMap<CountryKey, IndicatorObservation> {
    let mut latest: BTreeMap<CountryKey, IndicatorObservation> = BTreeMap::new();
    for obs in observations.iter().filter(|obs| window.contains(obs.year)) {
        match latest.get(&obs.country_key) {
            Some(current) if current.year > obs.year => {}
            _ => {
                latest.insert(obs.country_key.clone(), obs.clone());
            }
        }
    }
    latest
}

/// Tags a selection with its indicator.
pub fn latest_indicators(
    indicator: Indicator,
    selected: &BTreeMap<CountryKey, IndicatorObservation>,
) -> Vec<LatestIndicator> {
    selected
        .values()
        .map(|obs| LatestIndicator::new(indicator, obs))
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn obs(key: &str, year: i32, value: f64) -> IndicatorObservation {
        IndicatorObservation {
            country_key: CountryKey::parse(key).unwrap(),
            year,
            value,
        }
    }

    fn window() -> YearWindow {
        YearWindow::new(2018, 2022).unwrap()
    }

    #[test]
    fn picks_maximum_year_in_window() {
        let rows = vec![
            obs("AFG", 2020, 50.0),
            obs("AFG", 2021, 70.0),
            obs("AFG", 2023, 99.0),
            obs("ALB", 2017, 10.0),
        ];
        let latest = select_latest(&rows, window());
        assert_eq!(latest.len(), 1);
        let afg = &latest[&CountryKey::parse("AFG").unwrap()];
        assert_eq!(afg.year, 2021);
        assert_eq!(afg.value, 70.0);
    }

    #[test]
    fn window_bounds_are_inclusive() {
        let rows = vec![obs("AFG", 2018, 1.0), obs("ALB", 2022, 2.0)];
        assert_eq!(select_latest(&rows, window()).len(), 2);
    }

    #[test]
    fn equal_years_keep_the_last_row() {
        let rows = vec![obs("AFG", 2021, 60.0), obs("AFG", 2021, 65.0)];
        let latest = select_latest(&rows, window());
        assert_eq!(latest[&CountryKey::parse("AFG").unwrap()].value, 65.0);
    }

    #[test]
    fn inverted_window_is_rejected() {
        assert_eq!(
            YearWindow::new(2022, 2018).unwrap_err(),
            CoverageError::InvalidWindow {
                min: 2022,
                max: 2018
            }
        );
    }

    #[test]
    fn latest_indicators_are_tagged() {
        let latest = select_latest(&[obs("AFG", 2019, 40.0)], window());
        let tagged = latest_indicators(Indicator::Sba, &latest);
        assert_eq!(tagged.len(), 1);
        assert_eq!(tagged[0].indicator, Indicator::Sba);
        assert_eq!(tagged[0].year, 2019);
    }
}
