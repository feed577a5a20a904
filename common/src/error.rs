use thiserror::Error;

/// All the ways TRF estimation can fail
#[derive(Debug, Error)]
pub enum TrfError {
    /// Model direction was neither forward (1) nor backward (-1)
    #[error("parameter direction must be either 1 or -1, got {0}")]
    InvalidDirection(i32),

    /// Model kind was neither "multi" nor "single"
    #[error("parameter kind must be either \"multi\" or \"single\", got {0:?}")]
    InvalidKind(String),

    /// Stimulus or response was not a non-empty set of samples-by-features trials
    #[error("stimulus and response must be a single samples-by-features matrix or a non-empty list of such matrices: {0}")]
    InvalidData(String),

    /// Paired trials must have the same number of samples
    #[error("trial {index} length mismatch: input has {x_samples} samples, output has {y_samples}")]
    TrialLengthMismatch {
        /// Index of the offending trial pair
        index: usize,
        /// Sample count on the input side
        x_samples: usize,
        /// Sample count on the output side
        y_samples: usize,
    },

    /// The lag window produced no lags
    #[error("invalid lag window: tmin {tmin_ms} ms, tmax {tmax_ms} ms at {fs} Hz")]
    InvalidLagWindow {
        /// Window start in milliseconds
        tmin_ms: f64,
        /// Window end in milliseconds
        tmax_ms: f64,
        /// Sampling rate in Hz
        fs: f64,
    },

    /// A lag reaches past the end of the signal
    #[error("the maximum lag ({max_lag} samples) can't be longer than the signal ({n_samples} samples)")]
    LagTooLong {
        /// Most positive lag in samples
        max_lag: i64,
        /// Length of the signal in samples
        n_samples: usize,
    },

    /// Banded regularization coefficient and band lists differ in length
    #[error("coefficients ({coefficients}) and bands ({bands}) must be of same size")]
    BandSpecMismatch {
        /// Number of per-band coefficients given
        coefficients: usize,
        /// Number of feature bands given
        bands: usize,
    },

    /// Banded regularization does not cover the design matrix
    #[error("banded regularization covers {got} columns but the design matrix has {expected}")]
    BandSizeMismatch {
        /// Columns of the design matrix
        expected: usize,
        /// Columns covered by the band specification
        got: usize,
    },

    /// The regularized normal equations could not be inverted
    #[error("regularized autocovariance matrix is singular; increase lambda")]
    SingularCovariance,

    /// Operation requires a trained model
    #[error("model is untrained; call train first")]
    Untrained,

    /// Predict was called without the side of the data the model maps from
    #[error("missing {0} input required by the model direction")]
    MissingInput(&'static str),

    /// Arithmetic between models that are not of the same shape
    #[error("combined TRFs must be of same kind and direction")]
    IncompatibleModels,

    /// A cross-validation worker died without reporting a result
    #[error("cross-validation worker failed: {0}")]
    WorkerFailed(String),

    /// Cross-validation was asked for an impossible split layout
    #[error("cannot generate {n_splits} splits from {n_trials} trials")]
    InvalidSplits {
        /// Requested number of splits
        n_splits: usize,
        /// Number of trials available
        n_trials: usize,
    },

    /// Reading or writing a model file failed
    #[error("model file i/o failed: {0}")]
    Io(#[from] std::io::Error),

    /// A model file did not hold a valid serialized model
    #[error("model deserialization failed: {0}")]
    Serialization(#[from] serde_json::Error),
}
