use crate::core::timeseries::{DaySpan, TimeSeries};
use crate::errors::{DemandError, DemandResult};
use strum::Display;

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
#[strum(serialize_all = "snake_case")]
pub enum Mode {
    Heating,
    Cooling,
}

impl Mode {
    /// Hourly temperature deviation in the direction that drives demand for this mode. Negative
    /// values mean no demand is expected that hour.
    pub(crate) fn deviation(self, threshold: f64, temp_out: f64) -> f64 {
        match self {
            Mode::Heating => threshold - temp_out,
            Mode::Cooling => temp_out - threshold,
        }
    }
}

#[derive(Clone, Copy, Debug, Display, Eq, PartialEq)]
#[strum(serialize_all = "snake_case")]
pub enum Granularity {
    /// Average the hourly deviation over each day, then clip at zero.
    DailyAverage,
    /// Clip each hourly deviation at zero, then sum over each day in degree-days. A day with
    /// fewer than 24 included hours is scaled by the hours it has, as `DailyAverage` is.
    HourlySum,
}

/// The temperature each hour is compared against.
#[derive(Clone, Copy, Debug)]
pub enum Threshold<'a> {
    /// A single balance-point temperature.
    Fixed(f64),
    /// A per-hour indoor reference (temperature in or setpoint) shifted by an offset.
    IndoorOffset { reference: &'a [f64], offset: f64 },
}

impl Threshold<'_> {
    fn at(&self, position: usize) -> f64 {
        match self {
            Threshold::Fixed(balance_point) => *balance_point,
            Threshold::IndoorOffset { reference, offset } => reference[position] + offset,
        }
    }
}

/// Degree-days for each day of `temp_out`, stamped at midnight.
///
/// Arguments:
/// * `temp_out` - hourly outdoor temperatures, already restricted to the season
/// * `threshold` - the balance point (or indoor reference and offset) to measure against
/// * `mode` - heating or cooling
/// * `granularity` - whether clipping happens after daily averaging or per hour
pub fn aggregate(
    temp_out: &TimeSeries,
    threshold: Threshold,
    mode: Mode,
    granularity: Granularity,
) -> DemandResult<TimeSeries> {
    if let Threshold::IndoorOffset { reference, .. } = threshold {
        if reference.len() != temp_out.len() {
            return Err(DemandError::shape_mismatch(
                "indoor reference temperatures",
                temp_out.len(),
                reference.len(),
            ));
        }
    }

    let spans = temp_out.day_spans();
    let degree_days = aggregate_spans(temp_out.values(), &spans, threshold, mode, granularity);

    Ok(TimeSeries::from_day_spans(&spans, degree_days))
}

/// Degree-days for pre-computed day spans. Callers guarantee the spans and any indoor reference
/// are aligned with `temp_out`.
pub(crate) fn aggregate_spans(
    temp_out: &[f64],
    spans: &[DaySpan],
    threshold: Threshold,
    mode: Mode,
    granularity: Granularity,
) -> Vec<f64> {
    spans
        .iter()
        .map(|span| {
            if span.is_empty() {
                return 0.;
            }
            let deviations = span
                .range
                .clone()
                .map(|position| mode.deviation(threshold.at(position), temp_out[position]));
            let hours = span.len() as f64;
            match granularity {
                Granularity::DailyAverage => (deviations.sum::<f64>() / hours).max(0.),
                Granularity::HourlySum => {
                    deviations.map(|deviation| deviation.max(0.)).sum::<f64>() / hours
                }
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::{NaiveDate, NaiveDateTime};
    use pretty_assertions::assert_eq;
    use rstest::*;

    #[fixture]
    fn start() -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2012, 1, 1)
            .unwrap()
            .and_hms_opt(0, 0, 0)
            .unwrap()
    }

    fn linspace(from: f64, to: f64, num: usize) -> Vec<f64> {
        (0..num)
            .map(|i| from + (to - from) * i as f64 / (num - 1) as f64)
            .collect()
    }

    #[fixture]
    fn warming_ramp(start: NaiveDateTime) -> TimeSeries {
        TimeSeries::hourly(start, linspace(80., 90., 400))
    }

    #[rstest]
    fn test_daily_average_cooling_degree_days(warming_ramp: TimeSeries) {
        let cdd = aggregate(
            &warming_ramp,
            Threshold::Fixed(70.),
            Mode::Cooling,
            Granularity::DailyAverage,
        )
        .unwrap();

        let expected = [
            10.288, 10.889, 11.491, 12.092, 12.694, 13.295, 13.897, 14.498, 15.100, 15.701,
            16.303, 16.904, 17.506, 18.107, 18.709, 19.310,
        ];
        for (actual, expected) in cdd.values().iter().zip(expected) {
            assert_relative_eq!(*actual, expected, max_relative = 1e-3);
        }
        assert_eq!(cdd.index()[0], start());
        // trailing partial day is still a period of its own
        assert_eq!(cdd.len(), 17);
    }

    #[rstest]
    fn test_heating_degree_days_mirror_cooling(start: NaiveDateTime) {
        let cooling_ramp = TimeSeries::hourly(start, linspace(80., 90., 48));
        let heating_ramp = TimeSeries::hourly(start, linspace(60., 50., 48));

        let cdd = aggregate(
            &cooling_ramp,
            Threshold::Fixed(70.),
            Mode::Cooling,
            Granularity::HourlySum,
        )
        .unwrap();
        let hdd = aggregate(
            &heating_ramp,
            Threshold::Fixed(70.),
            Mode::Heating,
            Granularity::HourlySum,
        )
        .unwrap();

        for (c, h) in cdd.values().iter().zip(hdd.values()) {
            assert_relative_eq!(*c, *h, max_relative = 1e-12);
        }
    }

    #[rstest]
    fn test_clipping_order_distinguishes_granularities(start: NaiveDateTime) {
        // half the day 10 degrees above the balance point, half 10 below
        let temps = (0..24)
            .map(|hour| if hour < 12 { 80. } else { 60. })
            .collect();
        let temp_out = TimeSeries::hourly(start, temps);

        let daily_average = aggregate(
            &temp_out,
            Threshold::Fixed(70.),
            Mode::Cooling,
            Granularity::DailyAverage,
        )
        .unwrap();
        let hourly_sum = aggregate(
            &temp_out,
            Threshold::Fixed(70.),
            Mode::Cooling,
            Granularity::HourlySum,
        )
        .unwrap();

        assert_eq!(daily_average.values(), &[0.]);
        assert_eq!(hourly_sum.values(), &[5.]);
    }

    #[rstest]
    fn test_granularities_agree_on_partial_trailing_day(warming_ramp: TimeSeries) {
        let daily_average = aggregate(
            &warming_ramp,
            Threshold::Fixed(70.),
            Mode::Cooling,
            Granularity::DailyAverage,
        )
        .unwrap();
        let hourly_sum = aggregate(
            &warming_ramp,
            Threshold::Fixed(70.),
            Mode::Cooling,
            Granularity::HourlySum,
        )
        .unwrap();

        // the last day only has 16 hours
        assert_eq!(hourly_sum.len(), 17);
        for (average, sum) in daily_average.values().iter().zip(hourly_sum.values()) {
            assert_relative_eq!(*average, *sum, max_relative = 1e-12);
        }
    }

    #[rstest]
    fn test_days_with_no_demand_are_zero(warming_ramp: TimeSeries) {
        for granularity in [Granularity::DailyAverage, Granularity::HourlySum] {
            let hdd = aggregate(
                &warming_ramp,
                Threshold::Fixed(70.),
                Mode::Heating,
                granularity,
            )
            .unwrap();
            assert!(hdd.values().iter().all(|value| *value == 0.));
        }
    }

    #[rstest]
    fn test_indoor_offset_threshold_follows_reference(start: NaiveDateTime) {
        let temp_out = TimeSeries::hourly(start, vec![75.; 24]);
        let reference = (0..24)
            .map(|hour| if hour % 2 == 0 { 68. } else { 72. })
            .collect::<Vec<_>>();

        let cdd = aggregate(
            &temp_out,
            Threshold::IndoorOffset {
                reference: &reference,
                offset: 1.,
            },
            Mode::Cooling,
            Granularity::HourlySum,
        )
        .unwrap();

        // hours alternate between 6 and 2 degrees above the shifted reference
        assert_relative_eq!(cdd.values()[0], 12. * (6. + 2.) / 24.);
    }

    #[rstest]
    fn test_indoor_reference_must_align(warming_ramp: TimeSeries) {
        let reference = vec![70.; 10];
        let result = aggregate(
            &warming_ramp,
            Threshold::IndoorOffset {
                reference: &reference,
                offset: 0.,
            },
            Mode::Cooling,
            Granularity::DailyAverage,
        );

        assert!(matches!(result, Err(DemandError::ShapeMismatch { .. })));
    }

    #[rstest]
    fn test_empty_series_aggregates_to_no_periods() {
        let cdd = aggregate(
            &TimeSeries::default(),
            Threshold::Fixed(70.),
            Mode::Cooling,
            Granularity::DailyAverage,
        )
        .unwrap();

        assert!(cdd.is_empty());
    }
}
