use crate::errors::{DemandError, DemandResult};
use anyhow::anyhow;
use serde::{Deserialize, Serialize};
use serde_valid::Validate;
use std::io::Read;

/// Upper limit on the number of balance points a single search may try.
pub const MAX_CANDIDATES: usize = 100_000;

#[derive(Clone, Copy, Debug, Default, Deserialize, PartialEq, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct EstimationConfig {
    pub basis: BalancePointBasis,
    pub indoor_reference: IndoorReference,
    /// Overrides the basis' default grid when present.
    pub search: Option<SearchRange>,
}

impl EstimationConfig {
    /// Read estimation settings from JSON. Any field left out takes its default.
    pub fn from_json(json: impl Read) -> anyhow::Result<Self> {
        let config: Self = serde_json::from_reader(json)
            .map_err(|err| anyhow!("Estimation config could not be parsed: {err}"))?;
        config.search_range().candidates()?;

        Ok(config)
    }

    pub fn search_range(&self) -> SearchRange {
        self.search
            .unwrap_or_else(|| self.basis.default_search_range())
    }
}

/// How candidate balance points are expressed.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum BalancePointBasis {
    /// Candidates are outdoor temperatures in °F.
    #[default]
    Absolute,
    /// Candidates are offsets in °F from the indoor reference at each hour.
    IndoorOffset,
}

impl BalancePointBasis {
    pub fn default_search_range(&self) -> SearchRange {
        match self {
            BalancePointBasis::Absolute => SearchRange {
                lower: 40.,
                upper: 100.,
                step: 0.5,
            },
            BalancePointBasis::IndoorOffset => SearchRange {
                lower: -30.,
                upper: 30.,
                step: 0.5,
            },
        }
    }
}

/// Which indoor series an indoor-offset balance point is measured from.
#[derive(Clone, Copy, Debug, Default, Deserialize, Eq, PartialEq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum IndoorReference {
    #[default]
    TemperatureIn,
    Setpoint,
}

#[derive(Clone, Copy, Debug, Deserialize, PartialEq, Serialize, Validate)]
#[serde(deny_unknown_fields)]
pub struct SearchRange {
    pub lower: f64,
    pub upper: f64,
    #[validate(exclusive_minimum = 0.0)]
    pub step: f64,
}

impl SearchRange {
    /// Grid of candidates in ascending order from `lower` up to and including `upper`.
    pub fn candidates(&self) -> DemandResult<Vec<f64>> {
        self.validate()
            .map_err(|err| DemandError::InvalidConfig(err.to_string()))?;
        if !(self.lower.is_finite() && self.upper.is_finite() && self.step.is_finite()) {
            return Err(DemandError::InvalidConfig(
                "search bounds and step must be finite".to_string(),
            ));
        }
        if self.lower > self.upper {
            return Err(DemandError::InvalidConfig(format!(
                "search lower bound {} is above upper bound {}",
                self.lower, self.upper
            )));
        }

        // small allowance so an upper bound on the grid is not lost to rounding
        let steps = ((self.upper - self.lower) / self.step + 1e-9).floor();
        if !steps.is_finite() || steps >= MAX_CANDIDATES as f64 {
            return Err(DemandError::InvalidConfig(format!(
                "search from {} to {} in steps of {} exceeds {MAX_CANDIDATES} candidates",
                self.lower, self.upper, self.step
            )));
        }
        let steps = steps as usize;

        Ok((0..=steps)
            .map(|i| self.lower + i as f64 * self.step)
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[rstest]
    fn test_default_grid_covers_plausible_balance_points() {
        let candidates = EstimationConfig::default()
            .search_range()
            .candidates()
            .unwrap();

        assert_eq!(candidates.len(), 121);
        assert_eq!(candidates[0], 40.);
        assert_eq!(candidates[60], 70.);
        assert_eq!(candidates[120], 100.);
    }

    #[rstest]
    fn test_offset_basis_has_its_own_default_grid() {
        let config = EstimationConfig {
            basis: BalancePointBasis::IndoorOffset,
            ..Default::default()
        };

        let candidates = config.search_range().candidates().unwrap();

        assert_eq!(candidates.first(), Some(&-30.));
        assert_eq!(candidates[60], 0.);
        assert_eq!(candidates.last(), Some(&30.));
    }

    #[rstest]
    fn test_grid_stops_at_upper_bound() {
        let range = SearchRange {
            lower: 60.,
            upper: 61.,
            step: 0.3,
        };

        assert_eq!(range.candidates().unwrap().len(), 4);
    }

    #[rstest]
    #[case(0.)]
    #[case(-1.)]
    fn test_non_positive_step_is_rejected(#[case] step: f64) {
        let range = SearchRange {
            lower: 40.,
            upper: 100.,
            step,
        };

        assert!(matches!(
            range.candidates(),
            Err(DemandError::InvalidConfig(_))
        ));
    }

    #[rstest]
    #[case(0., 1e300, 1e-300)]
    #[case(-1e308, 1e308, 1.)]
    #[case(0., 100_000., 1.)]
    fn test_oversized_grid_is_rejected(#[case] lower: f64, #[case] upper: f64, #[case] step: f64) {
        let range = SearchRange { lower, upper, step };

        assert!(matches!(
            range.candidates(),
            Err(DemandError::InvalidConfig(_))
        ));
    }

    #[rstest]
    fn test_largest_allowed_grid_is_accepted() {
        let range = SearchRange {
            lower: 0.,
            upper: (MAX_CANDIDATES - 1) as f64,
            step: 1.,
        };

        assert_eq!(range.candidates().unwrap().len(), MAX_CANDIDATES);
    }

    #[rstest]
    fn test_inverted_bounds_are_rejected() {
        let range = SearchRange {
            lower: 80.,
            upper: 60.,
            step: 1.,
        };

        assert!(matches!(
            range.candidates(),
            Err(DemandError::InvalidConfig(_))
        ));
    }

    #[rstest]
    fn test_from_json_fills_in_defaults() {
        let json = r#"{"basis": "indoor_offset", "indoor_reference": "setpoint"}"#;

        let config = EstimationConfig::from_json(json.as_bytes()).unwrap();

        assert_eq!(
            config,
            EstimationConfig {
                basis: BalancePointBasis::IndoorOffset,
                indoor_reference: IndoorReference::Setpoint,
                search: None,
            }
        );
    }

    #[rstest]
    fn test_from_json_with_search_range() {
        let json = r#"{"search": {"lower": 55, "upper": 75, "step": 1}}"#;

        let config = EstimationConfig::from_json(json.as_bytes()).unwrap();

        assert_eq!(config.basis, BalancePointBasis::Absolute);
        assert_eq!(config.search_range().candidates().unwrap().len(), 21);
    }

    #[rstest]
    #[case(r#"{"search": {"lower": 55, "upper": 75, "step": 0}}"#)]
    #[case(r#"{"search": {"lower": 75, "upper": 55, "step": 1}}"#)]
    #[case(r#"{"basis": "relative"}"#)]
    #[case(r#"{"granularity": "daily"}"#)]
    #[case(r#"{"search": {"lower": 0, "upper": 1e300, "step": 1e-300}}"#)]
    fn test_from_json_rejects_invalid_config(#[case] json: &str) {
        assert!(EstimationConfig::from_json(json.as_bytes()).is_err());
    }
}
