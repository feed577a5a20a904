use common::{Trial, TrfError};
use nalgebra::DMatrix;

/// Construct a matrix of time lagged input features
///
/// Column blocks are ordered by the lag list; each block holds all features
/// of `x` shifted by that lag. A positive lag delays the feature (causal),
/// a negative lag advances it.
///
/// # Arguments:
/// x: Input trial of shape samples x features
/// lags: Time lags in samples
/// zeropad: Zero-fill rows the shift moves past the edge; otherwise the
/// matrix is truncated so only rows valid under every lag remain
/// bias: Prepend a column of ones for a constant bias term
pub fn lag_matrix(
    x: &Trial,
    lags: &[i64],
    zeropad: bool,
    bias: bool,
) -> Result<DMatrix<f64>, TrfError> {
    let n_samples = x.nrows();
    let n_features = x.ncols();
    let (min_lag, max_lag) = lag_bounds(lags)?;
    if max_lag > n_samples as i64 {
        return Err(TrfError::LagTooLong {
            max_lag,
            n_samples,
        });
    }

    let mut lagged: DMatrix<f64> = DMatrix::zeros(n_samples, n_features * lags.len());
    for (idx, &lag) in lags.iter().enumerate() {
        let col = idx * n_features;
        let shift = lag.unsigned_abs() as usize;
        if shift >= n_samples && lag != 0 {
            continue;
        }
        let valid = n_samples - shift;
        if lag < 0 {
            lagged
                .view_mut((0, col), (valid, n_features))
                .copy_from(&x.view((shift, 0), (valid, n_features)));
        } else if lag > 0 {
            lagged
                .view_mut((shift, col), (valid, n_features))
                .copy_from(&x.view((0, 0), (valid, n_features)));
        } else {
            lagged.view_mut((0, col), (n_samples, n_features)).copy_from(x);
        }
    }

    if !zeropad {
        lagged = truncate_rows(&lagged, min_lag, max_lag);
    }
    if bias {
        lagged = lagged.insert_column(0, 1.0);
    }

    Ok(lagged)
}

/// Drop the rows a lag window renders invalid: leading rows affected by the
/// most positive lag and trailing rows affected by the most negative one.
pub fn truncate_rows(x: &DMatrix<f64>, min_idx: i64, max_idx: i64) -> DMatrix<f64> {
    let n_rows = x.nrows() as i64;
    let start = max_idx.max(0).min(n_rows);
    let end = (min_idx.min(0) + n_rows).clamp(start, n_rows);

    x.rows(start as usize, (end - start) as usize).into_owned()
}

fn lag_bounds(lags: &[i64]) -> Result<(i64, i64), TrfError> {
    match (lags.iter().min(), lags.iter().max()) {
        (Some(&min), Some(&max)) => Ok((min, max)),
        _ => Err(TrfError::InvalidData("got an empty lag set".to_string())),
    }
}
