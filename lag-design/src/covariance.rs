use common::{check_pair, Trial, TrfError};
use nalgebra::DMatrix;

use crate::lag_matrix::{lag_matrix, truncate_rows};

/// Compute the autocovariance of the time-lagged input and the covariance
/// of the lagged input with the output.
///
/// Returns `(cov_xx, cov_xy)` where `cov_xx = X_lagᵀ X_lag` and
/// `cov_xy = X_lagᵀ y`. When `zeropad` is false, `y` is truncated by the
/// same rows as the lag matrix so both stay sample-aligned.
pub fn covariance_matrices(
    x: &Trial,
    y: &Trial,
    lags: &[i64],
    zeropad: bool,
    bias: bool,
) -> Result<(DMatrix<f64>, DMatrix<f64>), TrfError> {
    let x_lag = lag_matrix(x, lags, zeropad, bias)?;
    let y_valid = if zeropad {
        y.clone()
    } else {
        let min_lag = *lags.iter().min().unwrap_or(&0);
        let max_lag = *lags.iter().max().unwrap_or(&0);
        truncate_rows(y, min_lag, max_lag)
    };

    let cov_xx = x_lag.transpose() * &x_lag;
    let cov_xy = x_lag.transpose() * y_valid;
    Ok((cov_xx, cov_xy))
}

/// Accumulate covariances over a paired multi-trial set by summation,
/// equivalent to concatenating all trials' design matrices first.
pub fn accumulate_covariances(
    xs: &[Trial],
    ys: &[Trial],
    lags: &[i64],
    zeropad: bool,
    bias: bool,
) -> Result<(DMatrix<f64>, DMatrix<f64>), TrfError> {
    check_pair(xs, ys)?;

    let mut acc: Option<(DMatrix<f64>, DMatrix<f64>)> = None;
    for (xt, yt) in xs.iter().zip(ys.iter()) {
        let (cov_xx, cov_xy) = covariance_matrices(xt, yt, lags, zeropad, bias)?;
        match acc.as_mut() {
            Some((acc_xx, acc_xy)) => {
                *acc_xx += cov_xx;
                *acc_xy += cov_xy;
            }
            None => acc = Some((cov_xx, cov_xy)),
        }
    }
    acc.ok_or_else(|| TrfError::InvalidData("got an empty trial list".to_string()))
}

#[cfg(test)]
mod tests {
    use round::round;

    use super::*;

    fn noisy_trial(n: usize, seed: f64) -> Trial {
        DMatrix::from_fn(n, 2, |i, j| ((i as f64 + seed) * 0.7 + j as f64).sin())
    }

    #[test]
    fn matches_explicit_design_product() {
        let x = noisy_trial(16, 0.0);
        let y = DMatrix::from_fn(16, 1, |i, _| (i as f64 * 0.3).cos());
        let lags = [-1, 0, 1, 2];

        let (cov_xx, cov_xy) = covariance_matrices(&x, &y, &lags, true, true).unwrap();
        let x_lag = lag_matrix(&x, &lags, true, true).unwrap();
        assert_eq!(cov_xx, x_lag.transpose() * &x_lag);
        assert_eq!(cov_xy, x_lag.transpose() * &y);
        assert_eq!(cov_xx.nrows(), 2 * 4 + 1);
    }

    #[test]
    fn accumulation_equals_concatenation() {
        if let Err(_) = pretty_env_logger::try_init() {}

        let x0 = noisy_trial(12, 0.0);
        let x1 = noisy_trial(9, 5.0);
        let y0 = DMatrix::from_fn(12, 1, |i, _| (i as f64).sqrt());
        let y1 = DMatrix::from_fn(9, 1, |i, _| (i as f64) * 0.1);
        let lags = [0, 1];

        let (acc_xx, acc_xy) =
            accumulate_covariances(&[x0.clone(), x1.clone()], &[y0.clone(), y1.clone()], &lags, true, true)
                .unwrap();
        let (sw_xx, sw_xy) =
            accumulate_covariances(&[x1, x0], &[y1, y0], &lags, true, true).unwrap();
        log::info!("acc_xx: {}", acc_xx);

        // trial order must not matter beyond floating point rounding
        for (a, b) in acc_xx.iter().zip(sw_xx.iter()) {
            assert_eq!(round(*a, 9), round(*b, 9));
        }
        for (a, b) in acc_xy.iter().zip(sw_xy.iter()) {
            assert_eq!(round(*a, 9), round(*b, 9));
        }
    }

    #[test]
    fn truncated_output_stays_aligned() {
        let x = noisy_trial(20, 1.0);
        let y = DMatrix::from_fn(20, 1, |i, _| i as f64);
        let lags = [-2, -1, 0, 1];

        let (cov_xx, cov_xy) = covariance_matrices(&x, &y, &lags, false, true).unwrap();
        let x_lag = lag_matrix(&x, &lags, false, true).unwrap();
        assert_eq!(x_lag.nrows(), 20 - 1 - 2);
        assert_eq!(cov_xx.nrows(), x_lag.ncols());
        assert_eq!(cov_xy.nrows(), x_lag.ncols());
    }
}
