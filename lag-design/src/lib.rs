//! Time-lagged design matrices and the covariance accumulation they feed

#![deny(unused_imports, unused_crate_dependencies)]
#![warn(missing_docs)]

mod covariance;
mod lag_matrix;

pub use covariance::{accumulate_covariances, covariance_matrices};
pub use lag_matrix::{lag_matrix, truncate_rows};
