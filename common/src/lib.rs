//! This crate provides the shared types of the TRF workspace

#![deny(unused_imports, unused_crate_dependencies)]
#![warn(missing_docs)]

mod data;
mod error;
mod lags;
mod model_config;

pub use data::{check_data, check_pair, trial_from_vector};
pub use error::TrfError;
pub use lags::{lag_window, lags_from_ms, lags_to_ms};
pub use model_config::{Direction, Kind};

use nalgebra::DMatrix;

/// A single trial: samples (rows) by features (columns)
pub type Trial = DMatrix<f64>;
