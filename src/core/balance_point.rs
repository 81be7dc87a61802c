use crate::config::{BalancePointBasis, EstimationConfig};
use crate::core::degree_days::{aggregate_spans, Granularity, Mode, Threshold};
use crate::core::linear_fit::{fit, LinearFit};
use crate::core::timeseries::TimeSeries;
use crate::errors::{DemandError, DemandResult};
use tracing::{debug, warn};

/// Degree-day series together with the balance point and coefficient it was fitted at.
#[derive(Clone, Debug, PartialEq)]
pub struct DegreeDayEstimate {
    /// One degree-day value per day covered by the season, stamped at midnight.
    pub degree_days: TimeSeries,
    /// Outdoor temperature (°F) at which demand is estimated to begin.
    pub balance_point: f64,
    /// Runtime seconds per degree-day.
    pub coefficient: f64,
    pub sum_squared_error: f64,
}

impl DegreeDayEstimate {
    pub fn into_parts(self) -> (TimeSeries, f64, f64, f64) {
        (
            self.degree_days,
            self.balance_point,
            self.coefficient,
            self.sum_squared_error,
        )
    }
}

/// Grid-search the balance point that best explains daily runtime as a multiple of degree-days.
///
/// All series must already be masked to the season and share one index. Observed demand for
/// each day is the summed runtime over that day's hours. Candidates are tried in ascending
/// order and an exact tie keeps the earlier candidate.
///
/// Every included outdoor hour (and, for an indoor-offset basis, every indoor reference hour)
/// must be a finite temperature.
pub fn optimize(
    temp_out: &TimeSeries,
    indoor_reference: &TimeSeries,
    observed: &TimeSeries,
    mode: Mode,
    granularity: Granularity,
    config: &EstimationConfig,
) -> DemandResult<DegreeDayEstimate> {
    temp_out.ensure_aligned(indoor_reference, "indoor reference temperatures")?;
    temp_out.ensure_aligned(observed, "observed runtime")?;
    ensure_finite(temp_out, "outdoor temperatures")?;
    if config.basis == BalancePointBasis::IndoorOffset {
        ensure_finite(indoor_reference, "indoor reference temperatures")?;
    }

    let candidates = config.search_range().candidates()?;
    let spans = temp_out.day_spans();
    let observed_daily = observed.daily_sum();
    let observed_daily = observed_daily.values();

    let indoor_mean = indoor_reference.mean().unwrap_or(0.);
    let threshold_for = |candidate: f64| match config.basis {
        BalancePointBasis::Absolute => Threshold::Fixed(candidate),
        BalancePointBasis::IndoorOffset => Threshold::IndoorOffset {
            reference: indoor_reference.values(),
            offset: candidate,
        },
    };
    let balance_point_for = |candidate: f64| match config.basis {
        BalancePointBasis::Absolute => candidate,
        BalancePointBasis::IndoorOffset => indoor_mean + candidate,
    };

    // candidates() always yields at least the lower bound
    let first_candidate = candidates[0];

    if spans.is_empty() || observed_daily.iter().all(|runtime| *runtime == 0.) {
        warn!(
            %mode,
            %granularity,
            periods = spans.len(),
            "No runtime observed in season, returning zero demand estimate"
        );
        return Ok(DegreeDayEstimate {
            degree_days: TimeSeries::from_day_spans(&spans, vec![0.; spans.len()]),
            balance_point: balance_point_for(first_candidate),
            coefficient: 0.,
            sum_squared_error: 0.,
        });
    }

    let mut best_candidate = first_candidate;
    let mut best_fit: Option<LinearFit> = None;
    let mut best_degree_days = vec![];

    for candidate in candidates {
        let degree_days = aggregate_spans(
            temp_out.values(),
            &spans,
            threshold_for(candidate),
            mode,
            granularity,
        );
        let candidate_fit = fit(&degree_days, observed_daily)?;

        let improves = match best_fit {
            Some(current) => candidate_fit.sum_squared_error < current.sum_squared_error,
            None => true,
        };
        if improves {
            best_candidate = candidate;
            best_fit = Some(candidate_fit);
            best_degree_days = degree_days;
        }
    }

    let LinearFit {
        coefficient,
        sum_squared_error,
    } = best_fit.unwrap_or_default();
    let balance_point = balance_point_for(best_candidate);

    debug!(
        %mode,
        %granularity,
        balance_point,
        coefficient,
        sum_squared_error,
        "Fitted degree-day model"
    );

    Ok(DegreeDayEstimate {
        degree_days: TimeSeries::from_day_spans(&spans, best_degree_days),
        balance_point,
        coefficient,
        sum_squared_error,
    })
}

fn ensure_finite(temperatures: &TimeSeries, context: &str) -> DemandResult<()> {
    match temperatures
        .values()
        .iter()
        .position(|temperature| !temperature.is_finite())
    {
        Some(position) => Err(DemandError::NonFiniteTemperature {
            context: context.to_string(),
            position,
        }),
        None => Ok(()),
    }
}
