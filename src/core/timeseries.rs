use crate::errors::{DemandError, DemandResult};
use chrono::{NaiveDate, NaiveDateTime, NaiveTime, TimeDelta};
use itertools::Itertools;
use std::ops::Range;

/// Boolean inclusion mask aligned to a thermostat's reference time index. `true` marks a
/// timestamp as part of the season.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct SeasonMask(Vec<bool>);

impl SeasonMask {
    pub fn new(mask: Vec<bool>) -> Self {
        Self(mask)
    }

    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of timestamps included by the mask.
    pub fn count_included(&self) -> usize {
        self.0.iter().filter(|included| **included).count()
    }

    pub fn as_slice(&self) -> &[bool] {
        &self.0
    }
}

impl From<Vec<bool>> for SeasonMask {
    fn from(mask: Vec<bool>) -> Self {
        Self::new(mask)
    }
}

/// Apply a mask to a plain slice of values, keeping order.
pub fn masked_values<T: Copy>(values: &[T], mask: &SeasonMask) -> DemandResult<Vec<T>> {
    if values.len() != mask.len() {
        return Err(DemandError::shape_mismatch(
            "season mask",
            values.len(),
            mask.len(),
        ));
    }

    Ok(values
        .iter()
        .zip(mask.as_slice())
        .filter_map(|(value, included)| included.then_some(*value))
        .collect())
}

/// The contiguous positions within a series that fall on one calendar day.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct DaySpan {
    pub date: NaiveDate,
    pub range: Range<usize>,
}

impl DaySpan {
    pub fn len(&self) -> usize {
        self.range.len()
    }

    pub fn is_empty(&self) -> bool {
        self.range.is_empty()
    }

    pub fn start_of_day(&self) -> NaiveDateTime {
        self.date.and_time(NaiveTime::MIN)
    }
}

/// An ordered sequence of (timestamp, value) observations with strictly increasing timestamps.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct TimeSeries {
    index: Vec<NaiveDateTime>,
    values: Vec<f64>,
}

impl TimeSeries {
    pub fn new(index: Vec<NaiveDateTime>, values: Vec<f64>) -> DemandResult<Self> {
        if index.len() != values.len() {
            return Err(DemandError::shape_mismatch(
                "time series values",
                index.len(),
                values.len(),
            ));
        }
        if let Some(position) = index
            .iter()
            .tuple_windows()
            .position(|(earlier, later)| later <= earlier)
        {
            return Err(DemandError::UnorderedIndex {
                position: position + 1,
            });
        }

        Ok(Self { index, values })
    }

    /// Build a series at hourly cadence starting from `start`.
    pub fn hourly(start: NaiveDateTime, values: Vec<f64>) -> Self {
        let index = (0..values.len())
            .map(|hour| start + TimeDelta::hours(hour as i64))
            .collect();

        Self { index, values }
    }

    pub fn index(&self) -> &[NaiveDateTime] {
        &self.index
    }

    pub fn values(&self) -> &[f64] {
        &self.values
    }

    pub fn len(&self) -> usize {
        self.values.len()
    }

    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    pub fn iter(&self) -> impl Iterator<Item = (NaiveDateTime, f64)> + '_ {
        self.index.iter().copied().zip(self.values.iter().copied())
    }

    /// Check that `other` shares this series' index exactly.
    pub(crate) fn ensure_aligned(&self, other: &TimeSeries, context: &str) -> DemandResult<()> {
        if self.len() != other.len() {
            return Err(DemandError::shape_mismatch(
                context,
                self.len(),
                other.len(),
            ));
        }
        if self.index != other.index {
            return Err(DemandError::shape_mismatch(
                &format!("{context} (timestamps differ)"),
                self.len(),
                other.len(),
            ));
        }

        Ok(())
    }

    /// The sub-series at timestamps included by `mask`.
    pub fn masked(&self, mask: &SeasonMask) -> DemandResult<TimeSeries> {
        Ok(Self {
            index: masked_values(&self.index, mask)?,
            values: masked_values(&self.values, mask)?,
        })
    }

    /// Combine two aligned series value by value.
    pub fn zip_with(
        &self,
        other: &TimeSeries,
        op: impl Fn(f64, f64) -> f64,
    ) -> DemandResult<TimeSeries> {
        self.ensure_aligned(other, "paired time series")?;

        Ok(Self {
            index: self.index.clone(),
            values: self
                .values
                .iter()
                .zip(other.values.iter())
                .map(|(a, b)| op(*a, *b))
                .collect(),
        })
    }

    /// Split the series into calendar days, in order.
    pub fn day_spans(&self) -> Vec<DaySpan> {
        let mut spans: Vec<DaySpan> = vec![];
        let days = self.index.iter().enumerate().chunk_by(|(_, timestamp)| timestamp.date());
        for (date, positions) in &days {
            let positions = positions.map(|(position, _)| position).collect_vec();
            if let (Some(first), Some(last)) = (positions.first(), positions.last()) {
                spans.push(DaySpan {
                    date,
                    range: *first..(*last + 1),
                });
            }
        }

        spans
    }

    /// Total of the values in each calendar day, stamped at midnight.
    pub fn daily_sum(&self) -> TimeSeries {
        let spans = self.day_spans();
        let values = spans
            .iter()
            .map(|span| self.values[span.range.clone()].iter().sum())
            .collect();

        Self::from_day_spans(&spans, values)
    }

    /// Series with one value per day span. `values` must have one entry per span.
    pub(crate) fn from_day_spans(spans: &[DaySpan], values: Vec<f64>) -> TimeSeries {
        debug_assert_eq!(spans.len(), values.len());
        Self {
            index: spans.iter().map(DaySpan::start_of_day).collect(),
            values,
        }
    }

    pub fn mean(&self) -> Option<f64> {
        if self.is_empty() {
            None
        } else {
            Some(self.values.iter().sum::<f64>() / self.len() as f64)
        }
    }
}
