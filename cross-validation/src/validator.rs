use std::cmp::max;
use std::sync::Arc;

use common::{check_pair, Direction, Kind, Trial, TrfError};
use crossbeam::channel::unbounded;
use nalgebra::{DMatrix, RowDVector};
use regularization::Regularization;
use threadpool::ThreadPool;
use trf_model::Trf;

/// Mean correlation and error over all splits for one lambda
#[derive(Debug, Clone)]
pub struct CvScore {
    /// The regularization strength that was evaluated
    pub lambda: f64,
    /// Mean Pearson correlation per output channel
    pub r: RowDVector<f64>,
    /// Mean squared error per output channel
    pub err: RowDVector<f64>,
}

/// Cross-validated evaluation of a TRF model configuration.
///
/// Generates train/test partitions of the trial set, fits a fresh model per
/// split and aggregates the held-out metrics. With `n_workers > 1` the
/// splits are dispatched to a fixed-size worker pool sharing the trial data
/// read-only.
#[derive(Debug, Clone)]
pub struct CrossValidator {
    /// Direction of the models to fit
    pub direction: Direction,
    /// Kind of the models to fit
    pub kind: Kind,
    /// Zero-padding policy of the models to fit
    pub zeropad: bool,
    /// Penalty structure of the models to fit
    pub regularization: Regularization,
    /// Sampling rate in Hz
    pub fs: f64,
    /// Start of the lag window in milliseconds
    pub tmin_ms: f64,
    /// End of the lag window in milliseconds
    pub tmax_ms: f64,
    /// Number of shuffled splits; `None` selects leave-one-out
    pub n_splits: Option<usize>,
    /// Worker threads; values <= 1 evaluate sequentially
    pub n_workers: usize,
    /// Seed for the split shuffle
    pub random_state: Option<u64>,
}

impl CrossValidator {
    /// Create a validator with the default split layout (10 shuffled
    /// splits, sequential evaluation, seed 42).
    pub fn new(
        direction: Direction,
        kind: Kind,
        zeropad: bool,
        fs: f64,
        tmin_ms: f64,
        tmax_ms: f64,
    ) -> Self {
        Self {
            direction,
            kind,
            zeropad,
            regularization: Regularization::Ridge,
            fs,
            tmin_ms,
            tmax_ms,
            n_splits: Some(10),
            n_workers: 1,
            random_state: Some(42),
        }
    }

    /// The train/test partitions this validator evaluates
    pub fn splits(&self, n_trials: usize) -> Result<Vec<crate::Split>, TrfError> {
        match self.n_splits {
            Some(n_splits) => crate::shuffled_splits(n_trials, n_splits, self.random_state),
            None => crate::leave_one_out(n_trials),
        }
    }

    /// Evaluate a single regularization strength: mean r and err over all
    /// splits, per output channel.
    pub fn cross_validate(
        &self,
        stim: &[Trial],
        resp: &[Trial],
        lambda: f64,
    ) -> Result<CvScore, TrfError> {
        check_pair(stim, resp)?;
        let splits = self.splits(stim.len())?;
        let n_splits = splits.len();

        let blocks = if self.n_workers <= 1 {
            let mut blocks = Vec::with_capacity(n_splits);
            for (idx, split) in splits.iter().enumerate() {
                debug!("cross validation split {}/{}", idx + 1, n_splits);
                blocks.push(self.evaluate_split(stim, resp, split, lambda)?);
            }
            blocks
        } else {
            self.evaluate_parallel(stim, resp, splits, lambda)?
        };

        let (r, err) = aggregate(&blocks);
        Ok(CvScore { lambda, r, err })
    }

    /// Evaluate a set of candidate lambdas, one aggregated score per
    /// lambda in input order.
    pub fn cross_validate_lambdas(
        &self,
        stim: &[Trial],
        resp: &[Trial],
        lambdas: &[f64],
    ) -> Result<Vec<CvScore>, TrfError> {
        lambdas
            .iter()
            .map(|lambda| self.cross_validate(stim, resp, *lambda))
            .collect()
    }

    /// Train a fresh model on the split's train trials and score it on the
    /// held-out trials. Returns per-trial r and err rows.
    fn evaluate_split(
        &self,
        stim: &[Trial],
        resp: &[Trial],
        split: &crate::Split,
        lambda: f64,
    ) -> Result<(DMatrix<f64>, DMatrix<f64>), TrfError> {
        let mut model = Trf::new(self.direction, self.kind, self.zeropad)
            .with_regularization(self.regularization.clone());
        model.train(
            &select(stim, &split.train),
            &select(resp, &split.train),
            self.fs,
            self.tmin_ms,
            self.tmax_ms,
            lambda,
        )?;

        let stim_test = select(stim, &split.test);
        let resp_test = select(resp, &split.test);
        let out = model.predict(Some(&stim_test), Some(&resp_test))?;
        // ground truth was supplied, so both metrics are present
        match (out.r, out.err) {
            (Some(r), Some(err)) => Ok((r, err)),
            _ => Err(TrfError::WorkerFailed("prediction produced no metrics".to_string())),
        }
    }

    /// Fan the splits out over a fixed-size worker pool. The validator
    /// config and both trial sets are shared read-only via `Arc`; each
    /// worker writes only its own result. Any worker error aborts the
    /// whole call, and dropping the pool, channel and `Arc` releases the
    /// shared buffers on every exit path.
    fn evaluate_parallel(
        &self,
        stim: &[Trial],
        resp: &[Trial],
        splits: Vec<crate::Split>,
        lambda: f64,
    ) -> Result<Vec<(DMatrix<f64>, DMatrix<f64>)>, TrfError> {
        let n_splits = splits.len();
        let workers = self.n_workers.min(max(num_cpus::get(), 1));
        let pool = ThreadPool::new(workers);
        debug!("dispatching {} splits to {} workers", n_splits, workers);

        let shared = Arc::new((self.clone(), stim.to_vec(), resp.to_vec()));
        let (result_s, result_r) = unbounded();
        for split in splits {
            let result_s = result_s.clone();
            let shared = Arc::clone(&shared);
            pool.execute(move || {
                let (validator, stim, resp) = &*shared;
                let result = validator.evaluate_split(stim, resp, &split, lambda);
                let _ = result_s.send(result);
            });
        }
        drop(result_s);

        let mut blocks = Vec::with_capacity(n_splits);
        while let Ok(result) = result_r.recv() {
            blocks.push(result?);
        }
        if blocks.len() != n_splits {
            // a worker died without reporting, e.g. a panic
            return Err(TrfError::WorkerFailed(format!(
                "{} of {} splits returned no result",
                n_splits - blocks.len(),
                n_splits
            )));
        }
        Ok(blocks)
    }
}

fn select(trials: &[Trial], indices: &[usize]) -> Vec<Trial> {
    indices.iter().map(|i| trials[*i].clone()).collect()
}

/// Column means over the concatenated per-split metric rows; split order
/// does not matter.
fn aggregate(blocks: &[(DMatrix<f64>, DMatrix<f64>)]) -> (RowDVector<f64>, RowDVector<f64>) {
    let n_outputs = blocks.first().map_or(0, |(r, _)| r.ncols());
    let mut r_sum = RowDVector::zeros(n_outputs);
    let mut err_sum = RowDVector::zeros(n_outputs);
    let mut n_rows = 0usize;
    for (r, err) in blocks {
        for i in 0..r.nrows() {
            r_sum += r.row(i);
            err_sum += err.row(i);
        }
        n_rows += r.nrows();
    }
    let n = max(n_rows, 1) as f64;
    (r_sum / n, err_sum / n)
}
