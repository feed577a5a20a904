//! Cross-validated evaluation of TRF models over multi-trial data

#![deny(unused_imports, unused_crate_dependencies)]
#![warn(missing_docs)]

#[macro_use]
extern crate log;

mod splits;
mod validator;

pub use splits::{leave_one_out, shuffled_splits, Split};
pub use validator::{CrossValidator, CvScore};
