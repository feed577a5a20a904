use nalgebra::{DMatrix, RowDVector};

/// Pearson correlation between matching columns of two equally sized matrices
pub(crate) fn pearson(predicted: &DMatrix<f64>, actual: &DMatrix<f64>) -> RowDVector<f64> {
    let n = predicted.nrows() as f64;
    RowDVector::from_fn(predicted.ncols(), |_, j| {
        let p = predicted.column(j);
        let a = actual.column(j);
        let p_mean = p.mean();
        let a_mean = a.mean();

        let mut cov = 0.0;
        let mut p_var = 0.0;
        let mut a_var = 0.0;
        for (pv, av) in p.iter().zip(a.iter()) {
            cov += (pv - p_mean) * (av - a_mean);
            p_var += (pv - p_mean).powi(2);
            a_var += (av - a_mean).powi(2);
        }
        let denom = (p_var * a_var).sqrt();
        if denom == 0.0 || n < 2.0 {
            0.0
        } else {
            cov / denom
        }
    })
}

/// Mean squared error between matching columns of two equally sized matrices
pub(crate) fn mean_squared_error(
    predicted: &DMatrix<f64>,
    actual: &DMatrix<f64>,
) -> RowDVector<f64> {
    let n = predicted.nrows().max(1) as f64;
    RowDVector::from_fn(predicted.ncols(), |_, j| {
        (predicted.column(j) - actual.column(j)).map(|d| d * d).sum() / n
    })
}

#[cfg(test)]
mod tests {
    use round::round;

    use super::*;

    #[test]
    fn perfectly_correlated_columns() {
        let a = DMatrix::from_fn(10, 2, |i, j| i as f64 * (j + 1) as f64);
        // scaled and shifted copy keeps r at exactly 1
        let b = a.map(|v| 3.0 * v + 2.0);
        let r = pearson(&b, &a);
        assert_eq!(round(r[0], 9), 1.0);
        assert_eq!(round(r[1], 9), 1.0);
    }

    #[test]
    fn anticorrelated_column_is_minus_one() {
        let a = DMatrix::from_fn(8, 1, |i, _| i as f64);
        let b = a.map(|v| -v);
        assert_eq!(round(pearson(&b, &a)[0], 9), -1.0);
    }

    #[test]
    fn mse_of_constant_offset() {
        let a = DMatrix::from_element(5, 2, 1.0);
        let b = DMatrix::from_element(5, 2, 3.0);
        let err = mean_squared_error(&b, &a);
        assert_eq!(err, RowDVector::from_row_slice(&[4.0, 4.0]));
    }
}
