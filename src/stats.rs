//! Sample statistics over price sequences.
//!
//! Every function borrows its input and returns a defined value for empty or
//! degenerate series instead of `NaN`.

use crate::error::StatsError;

/// Arithmetic mean. `0.0` for an empty slice.
pub fn mean(xs: &[f64]) -> f64 {
    if xs.is_empty() {
        return 0.0;
    }
    xs.iter().sum::<f64>() / xs.len() as f64
}

/// Sample standard deviation (divisor `n - 1`). `0.0` when `n < 2`.
pub fn stddev(xs: &[f64]) -> f64 {
    if xs.len() < 2 {
        return 0.0;
    }
    let m = mean(xs);
    let sum_sq: f64 = xs.iter().map(|x| (x - m).powi(2)).sum();
    (sum_sq / (xs.len() - 1) as f64).sqrt()
}

/// Sample covariance (divisor `n - 1`) of two equal-length series.
///
/// Returns `0.0` when `n < 2`.
pub fn covariance(xs: &[f64], ys: &[f64]) -> Result<f64, StatsError> {
    debug_assert_eq!(xs.len(), ys.len(), "covariance over unequal series");
    sample_covariance(xs, ys)
}

fn sample_covariance(xs: &[f64], ys: &[f64]) -> Result<f64, StatsError> {
    if xs.len() != ys.len() {
        return Err(StatsError::DimensionMismatch {
            left: xs.len(),
            right: ys.len(),
        });
    }
    if xs.len() < 2 {
        return Ok(0.0);
    }

    let mx = mean(xs);
    let my = mean(ys);
    let sum: f64 = xs
        .iter()
        .zip(ys)
        .map(|(x, y)| (x - mx) * (y - my))
        .sum();
    Ok(sum / (xs.len() - 1) as f64)
}

/// Round half away from zero to `places` decimal digits.
///
/// Results that round to zero are returned as `+0.0`.
pub fn round_to(value: f64, places: u32) -> f64 {
    let factor = 10f64.powi(places as i32);
    let rounded = (value * factor).round() / factor;
    if rounded == 0.0 {
        0.0
    } else {
        rounded
    }
}
