use crate::core::timeseries::{DaySpan, SeasonMask, TimeSeries};
use crate::core::units::HOURS_PER_DAY;
use chrono::{Datelike, NaiveDate};
use std::collections::BTreeMap;

// Seasons are detected the "simple" way: every usable day of a fixed yearly window on which the
// relevant equipment ran at all.

/// A named subset of a thermostat's time index.
#[derive(Clone, Debug, PartialEq)]
pub struct Season {
    name: String,
    mask: SeasonMask,
}

impl Season {
    pub fn new(name: impl Into<String>, mask: SeasonMask) -> Self {
        Self {
            name: name.into(),
            mask,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    pub fn mask(&self) -> &SeasonMask {
        &self.mask
    }
}

/// Cooling seasons run over calendar years, e.g. "2012 Cooling".
pub(crate) fn cooling_seasons(
    temperature_in: &TimeSeries,
    temperature_out: &TimeSeries,
    cooling_runtime: &TimeSeries,
) -> Vec<Season> {
    detect_seasons(
        temperature_in,
        temperature_out,
        cooling_runtime,
        |date| date.year(),
        |year| format!("{year} Cooling"),
    )
}

/// Heating seasons run from July 1 through June 30, e.g. "2011-2012 Heating".
pub(crate) fn heating_seasons(
    temperature_in: &TimeSeries,
    temperature_out: &TimeSeries,
    heating_runtime: &TimeSeries,
) -> Vec<Season> {
    detect_seasons(
        temperature_in,
        temperature_out,
        heating_runtime,
        |date| {
            if date.month() >= 7 {
                date.year()
            } else {
                date.year() - 1
            }
        },
        |year| format!("{}-{} Heating", year, year + 1),
    )
}

fn detect_seasons(
    temperature_in: &TimeSeries,
    temperature_out: &TimeSeries,
    runtime: &TimeSeries,
    season_year: impl Fn(NaiveDate) -> i32,
    season_name: impl Fn(i32) -> String,
) -> Vec<Season> {
    let mut days_by_season: BTreeMap<i32, Vec<DaySpan>> = BTreeMap::new();

    for span in temperature_in.day_spans() {
        if is_usable_day(&span, temperature_in, temperature_out) && ran_on_day(&span, runtime) {
            days_by_season
                .entry(season_year(span.date))
                .or_default()
                .push(span);
        }
    }

    days_by_season
        .into_iter()
        .map(|(year, days)| {
            let mut mask = vec![false; temperature_in.len()];
            for day in days {
                mask[day.range].fill(true);
            }
            Season::new(season_name(year), SeasonMask::new(mask))
        })
        .collect()
}

/// A full day of hourly readings with both temperatures present.
fn is_usable_day(span: &DaySpan, temperature_in: &TimeSeries, temperature_out: &TimeSeries) -> bool {
    span.len() == HOURS_PER_DAY as usize
        && temperature_in.values()[span.range.clone()]
            .iter()
            .chain(&temperature_out.values()[span.range.clone()])
            .all(|temperature| temperature.is_finite())
}

fn ran_on_day(span: &DaySpan, runtime: &TimeSeries) -> bool {
    runtime.values()[span.range.clone()].iter().sum::<f64>() > 0.
}
