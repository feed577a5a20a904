use crate::TrfError;

/// Derive the lag set in samples from a time window in milliseconds
///
/// # Arguments:
/// tmin_ms: Start of the window in milliseconds, may be negative
/// tmax_ms: End of the window in milliseconds
/// fs: Sampling rate in Hz
pub fn lag_window(tmin_ms: f64, tmax_ms: f64, fs: f64) -> Result<Vec<i64>, TrfError> {
    if fs <= 0.0 || !fs.is_finite() || tmin_ms > tmax_ms {
        return Err(TrfError::InvalidLagWindow { tmin_ms, tmax_ms, fs });
    }
    let min_lag = (tmin_ms / 1000.0 * fs).round() as i64;
    let max_lag = (tmax_ms / 1000.0 * fs).round() as i64;

    Ok((min_lag..=max_lag).collect())
}

/// Convert a lag set back to milliseconds
pub fn lags_to_ms(lags: &[i64], fs: f64) -> Vec<f64> {
    lags.iter().map(|l| *l as f64 / fs * 1000.0).collect()
}

/// Recover the lag set from its millisecond representation
pub fn lags_from_ms(times: &[f64], fs: f64) -> Vec<i64> {
    times.iter().map(|t| (t / 1000.0 * fs).round() as i64).collect()
}
