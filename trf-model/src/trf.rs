use common::{
    check_data, check_pair, lag_window, lags_from_ms, lags_to_ms, Direction, Kind, Trial, TrfError,
};
use lag_design::{accumulate_covariances, lag_matrix, truncate_rows};
use nalgebra::{DMatrix, RowDVector};
use regularization::Regularization;
use serde::{Deserialize, Serialize};

use crate::metrics::{mean_squared_error, pearson};

/// Result of applying a trained model to new data
#[derive(Debug, Clone)]
pub struct Prediction {
    /// Predicted output, one samples-by-output-channels matrix per trial
    pub predictions: Vec<DMatrix<f64>>,
    /// Pearson correlation per trial (rows) and output channel (columns);
    /// `None` when no ground truth was supplied
    pub r: Option<DMatrix<f64>>,
    /// Mean squared error per trial and output channel
    pub err: Option<DMatrix<f64>>,
}

/// The (multivariate) temporal response function.
///
/// Can be used as a forward encoding model (stimulus to neural response) or
/// backward decoding model (neural response to stimulus) using time lagged
/// input features, as per Crosse et al. (2016).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Trf {
    /// Mapping direction of the model
    pub direction: Direction,
    /// Joint multi-lag fit or independent single-lag fits
    pub kind: Kind,
    /// Zero-fill lagged edges instead of truncating them
    pub zeropad: bool,
    /// Penalty structure added to the autocovariance
    pub regularization: Regularization,
    weights: Option<DMatrix<f64>>,
    bias: Option<RowDVector<f64>>,
    times: Option<Vec<f64>>,
    n_features: usize,
    n_outputs: usize,
    fs: f64,
}

impl Default for Trf {
    fn default() -> Self {
        Self::new(Direction::Forward, Kind::Multi, true)
    }
}

impl Trf {
    /// Create an untrained model
    pub fn new(direction: Direction, kind: Kind, zeropad: bool) -> Self {
        Self {
            direction,
            kind,
            zeropad,
            regularization: Regularization::Ridge,
            weights: None,
            bias: None,
            times: None,
            n_features: 0,
            n_outputs: 0,
            fs: -1.0,
        }
    }

    /// Replace the default ridge penalty
    pub fn with_regularization(mut self, regularization: Regularization) -> Self {
        self.regularization = regularization;
        self
    }

    /// Whether `train` has completed on this instance
    #[inline(always)]
    pub fn is_trained(&self) -> bool {
        self.fs != -1.0
    }

    /// Fitted weights, shaped (features * lags) rows by output channels,
    /// rows ordered lag-major (all features of the first lag first)
    #[inline(always)]
    pub fn weights(&self) -> Option<&DMatrix<f64>> {
        self.weights.as_ref()
    }

    /// Fitted bias, one entry per output channel
    #[inline(always)]
    pub fn bias(&self) -> Option<&RowDVector<f64>> {
        self.bias.as_ref()
    }

    /// Lag set in milliseconds
    #[inline(always)]
    pub fn times(&self) -> Option<&[f64]> {
        self.times.as_deref()
    }

    /// Sampling rate the model was fit at, -1 while untrained
    #[inline(always)]
    pub fn fs(&self) -> f64 {
        self.fs
    }

    /// Number of input features the model was fit on
    #[inline(always)]
    pub fn n_features(&self) -> usize {
        self.n_features
    }

    /// Number of output channels the model was fit on
    #[inline(always)]
    pub fn n_outputs(&self) -> usize {
        self.n_outputs
    }

    /// Fit the model on paired multi-trial data.
    ///
    /// A backward model swaps the roles of stimulus and response and mirrors
    /// the lag window in time. Model state is only mutated once the whole
    /// solve has succeeded.
    ///
    /// # Arguments:
    /// stim: Stimulus trials, samples by features each
    /// resp: Response trials, sample counts matching `stim` per trial
    /// fs: Sampling rate in Hz
    /// tmin_ms: Start of the lag window in milliseconds
    /// tmax_ms: End of the lag window in milliseconds
    /// lambda: Regularization strength scaling the penalty matrix
    pub fn train(
        &mut self,
        stim: &[Trial],
        resp: &[Trial],
        fs: f64,
        tmin_ms: f64,
        tmax_ms: f64,
        lambda: f64,
    ) -> Result<(), TrfError> {
        check_pair(stim, resp)?;
        let (x, y, tmin_ms, tmax_ms) = match self.direction {
            Direction::Forward => (stim, resp, tmin_ms, tmax_ms),
            Direction::Backward => (resp, stim, -tmax_ms, -tmin_ms),
        };
        let lags = lag_window(tmin_ms, tmax_ms, fs)?;
        let n_features = x[0].ncols();
        let n_outputs = y[0].ncols();

        let (weights, bias) = match self.kind {
            Kind::Multi => self.solve_normal_equations(x, y, &lags, lambda)?,
            Kind::Single => self.solve_per_lag(x, y, &lags, lambda, n_features, n_outputs)?,
        };
        debug!("trained weights dims: ({}, {})", weights.nrows(), weights.ncols());

        self.weights = Some(weights);
        self.bias = Some(bias);
        self.times = Some(lags_to_ms(&lags, fs));
        self.n_features = n_features;
        self.n_outputs = n_outputs;
        self.fs = fs;
        Ok(())
    }

    /// Solve `(cov_xx + lambda * R)^-1 cov_xy` over the given lag set,
    /// splitting the solution into bias row and weight rows.
    fn solve_normal_equations(
        &self,
        x: &[Trial],
        y: &[Trial],
        lags: &[i64],
        lambda: f64,
    ) -> Result<(DMatrix<f64>, RowDVector<f64>), TrfError> {
        let (cov_xx, cov_xy) = accumulate_covariances(x, y, lags, self.zeropad, true)?;
        let size = cov_xx.nrows();
        let regmat = self.regularization.matrix(size, lags.len(), true)?;

        let inverse = (cov_xx + lambda * regmat)
            .try_inverse()
            .ok_or(TrfError::SingularCovariance)?;
        let solution = inverse * cov_xy;

        let bias = solution.row(0).into_owned();
        let weights = solution.rows(1, size - 1).into_owned();
        Ok((weights, bias))
    }

    /// Fit an independent model per lag and stack the per-lag weight blocks.
    /// The shared bias is the mean over the per-lag biases.
    fn solve_per_lag(
        &self,
        x: &[Trial],
        y: &[Trial],
        lags: &[i64],
        lambda: f64,
        n_features: usize,
        n_outputs: usize,
    ) -> Result<(DMatrix<f64>, RowDVector<f64>), TrfError> {
        let mut weights = DMatrix::zeros(n_features * lags.len(), n_outputs);
        let mut bias = RowDVector::zeros(n_outputs);
        for (idx, &lag) in lags.iter().enumerate() {
            let (lag_weights, lag_bias) = self.solve_normal_equations(x, y, &[lag], lambda)?;
            weights
                .view_mut((idx * n_features, 0), (n_features, n_outputs))
                .copy_from(&lag_weights);
            bias += lag_bias;
        }
        bias /= lags.len() as f64;
        Ok((weights, bias))
    }

    /// Apply the trained model to new data.
    ///
    /// The side the model maps from is required (stimulus for forward,
    /// response for backward); when the other side is supplied as ground
    /// truth, per-trial correlation and error are computed as well.
    pub fn predict(
        &self,
        stim: Option<&[Trial]>,
        resp: Option<&[Trial]>,
    ) -> Result<Prediction, TrfError> {
        if !self.is_trained() {
            return Err(TrfError::Untrained);
        }
        let (x, y) = match self.direction {
            Direction::Forward => (stim, resp),
            Direction::Backward => (resp, stim),
        };
        let x = x.ok_or(TrfError::MissingInput(match self.direction {
            Direction::Forward => "stimulus",
            Direction::Backward => "response",
        }))?;
        check_data(x)?;
        if let Some(y) = y {
            check_pair(x, y)?;
        }
        if x[0].ncols() != self.n_features {
            return Err(TrfError::InvalidData(format!(
                "model was fit on {} features but the input has {}",
                self.n_features,
                x[0].ncols()
            )));
        }

        // invariants checked by is_trained
        let weights = self.weights.as_ref().ok_or(TrfError::Untrained)?;
        let bias = self.bias.as_ref().ok_or(TrfError::Untrained)?;
        let times = self.times.as_ref().ok_or(TrfError::Untrained)?;
        let lags = lags_from_ms(times, self.fs);
        let min_lag = *lags.iter().min().unwrap_or(&0);
        let max_lag = *lags.iter().max().unwrap_or(&0);

        let mut predictions = Vec::with_capacity(x.len());
        let mut r_rows: Vec<RowDVector<f64>> = Vec::new();
        let mut err_rows: Vec<RowDVector<f64>> = Vec::new();
        for (i, trial) in x.iter().enumerate() {
            let x_lag = lag_matrix(trial, &lags, self.zeropad, false)?;
            let mut pred = x_lag * weights;
            for mut row in pred.row_iter_mut() {
                row += bias;
            }

            if let Some(y) = y {
                let actual = if self.zeropad {
                    y[i].clone()
                } else {
                    truncate_rows(&y[i], min_lag, max_lag)
                };
                r_rows.push(pearson(&pred, &actual));
                err_rows.push(mean_squared_error(&pred, &actual));
            }
            predictions.push(pred);
        }

        let (r, err) = if y.is_some() {
            (Some(DMatrix::from_rows(&r_rows)), Some(DMatrix::from_rows(&err_rows)))
        } else {
            (None, None)
        };
        Ok(Prediction {
            predictions,
            r,
            err,
        })
    }

    pub(crate) fn weights_mut(&mut self) -> Option<&mut DMatrix<f64>> {
        self.weights.as_mut()
    }

    pub(crate) fn bias_mut(&mut self) -> Option<&mut RowDVector<f64>> {
        self.bias.as_mut()
    }
}
