use crate::errors::{DemandError, DemandResult};

/// Result of fitting `y ≈ coefficient × x` through the origin.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct LinearFit {
    pub coefficient: f64,
    pub sum_squared_error: f64,
}

/// Ordinary least squares with no intercept: zero degree-days must mean zero demand.
///
/// The coefficient is Σxy / Σx², falling back to 0 when there is no variation to fit against.
pub fn fit(x: &[f64], y: &[f64]) -> DemandResult<LinearFit> {
    if x.len() != y.len() {
        return Err(DemandError::shape_mismatch(
            "observed demand periods",
            x.len(),
            y.len(),
        ));
    }

    let (sum_xy, sum_xx) = x
        .iter()
        .zip(y)
        .fold((0., 0.), |(sum_xy, sum_xx), (x, y)| {
            (sum_xy + x * y, sum_xx + x * x)
        });

    let coefficient = if sum_xx > 0. {
        let coefficient = sum_xy / sum_xx;
        if coefficient.is_finite() {
            coefficient
        } else {
            0.
        }
    } else {
        0.
    };

    let sum_squared_error = x
        .iter()
        .zip(y)
        .map(|(x, y)| (y - coefficient * x).powi(2))
        .sum();

    Ok(LinearFit {
        coefficient,
        sum_squared_error,
    })
}
