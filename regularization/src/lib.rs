//! Penalty matrices for regularized TRF regression

#![deny(unused_imports, unused_crate_dependencies)]
#![warn(missing_docs)]

use common::TrfError;
use nalgebra::DMatrix;
use serde::{Deserialize, Serialize};

/// Which structure of the weight solution is penalized
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum Regularization {
    /// Penalize weight magnitude (classic ridge regression)
    Ridge,
    /// Penalize roughness of the weight curve across adjacent lags
    Tikhonov,
    /// Ridge with an independent coefficient per feature band
    Banded {
        /// Regularization coefficient per band, same length as `bands`
        coefficients: Vec<f64>,
        /// Feature count of each band, in stimulus-matrix order
        bands: Vec<usize>,
    },
}

impl Regularization {
    /// Build the penalty matrix that is scaled by lambda and added to the
    /// autocovariance before inversion.
    ///
    /// # Arguments:
    /// size: Number of design-matrix columns, bias column included
    /// n_lags: Number of time lags in the design
    /// bias: Whether the design carries a leading bias column; the bias
    /// entry is never penalized
    pub fn matrix(&self, size: usize, n_lags: usize, bias: bool) -> Result<DMatrix<f64>, TrfError> {
        match self {
            Self::Ridge => Ok(ridge_matrix(size, bias)),
            Self::Tikhonov => Ok(tikhonov_matrix(size, bias)),
            Self::Banded {
                coefficients,
                bands,
            } => banded_regularization(n_lags, coefficients, bands, size, bias),
        }
    }
}

fn ridge_matrix(size: usize, bias: bool) -> DMatrix<f64> {
    let mut regmat = DMatrix::identity(size, size);
    if bias {
        regmat[(0, 0)] = 0.0;
    }
    regmat
}

fn tikhonov_matrix(size: usize, bias: bool) -> DMatrix<f64> {
    let mut regmat = DMatrix::identity(size, size);
    for i in 0..size.saturating_sub(1) {
        regmat[(i, i + 1)] -= 0.5;
        regmat[(i + 1, i)] -= 0.5;
    }
    if size > 1 {
        regmat[(size - 1, size - 1)] = 0.5;
    }
    if bias && size > 1 {
        regmat[(1, 1)] = 0.5;
        regmat[(0, 0)] = 0.0;
        regmat[(0, 1)] = 0.0;
        regmat[(1, 0)] = 0.0;
    }
    regmat
}

/// Diagonal penalty for banded ridge regression: one coefficient per band,
/// replicated across the band's features and repeated for every lag, with a
/// leading zero for the bias entry.
pub fn banded_regularization(
    n_lags: usize,
    coefficients: &[f64],
    bands: &[usize],
    size: usize,
    bias: bool,
) -> Result<DMatrix<f64>, TrfError> {
    if coefficients.len() != bands.len() {
        return Err(TrfError::BandSpecMismatch {
            coefficients: coefficients.len(),
            bands: bands.len(),
        });
    }

    let mut diagonal = Vec::with_capacity(size);
    if bias {
        diagonal.push(0.0);
    }
    for _ in 0..n_lags {
        for (c, f) in coefficients.iter().zip(bands.iter()) {
            diagonal.extend(std::iter::repeat(*c).take(*f));
        }
    }
    if diagonal.len() != size {
        return Err(TrfError::BandSizeMismatch {
            expected: size,
            got: diagonal.len(),
        });
    }

    Ok(DMatrix::from_diagonal(&nalgebra::DVector::from_vec(diagonal)))
}
