//! The multivariate Temporal Response Function model
//!
//! A TRF is a linear filter mapping a time-lagged stimulus representation to
//! a neural response (forward model) or vice versa (backward model), fit by
//! regularized regression on the normal equations.

#![deny(unused_imports, unused_crate_dependencies)]
#![warn(missing_docs)]

#[macro_use]
extern crate log;

mod metrics;
mod ops;
mod persistence;
mod trf;

pub use ops::average;
pub use persistence::MODEL_EXTENSION;
pub use trf::{Prediction, Trf};
