pub const SECONDS_PER_HOUR: u32 = 3_600;
pub const HOURS_PER_DAY: u32 = 24;

/// Runtime is reported as seconds run within each hourly period, so anything outside this range
/// has come from a sensor or upstream aggregation problem.
pub(crate) fn is_plausible_hourly_runtime(seconds: f64) -> bool {
    (0.0..=SECONDS_PER_HOUR as f64).contains(&seconds)
}
