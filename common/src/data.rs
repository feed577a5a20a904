use nalgebra::{DMatrix, DVector};

use crate::{Trial, TrfError};

/// Promote a one-dimensional signal to a single-feature trial matrix
pub fn trial_from_vector(x: &DVector<f64>) -> Trial {
    DMatrix::from_column_slice(x.len(), 1, x.as_slice())
}

/// Check that a trial set is usable: non-empty, every trial non-empty and
/// all trials agreeing on the feature dimension.
pub fn check_data(data: &[Trial]) -> Result<(), TrfError> {
    if data.is_empty() {
        return Err(TrfError::InvalidData("got an empty trial list".to_string()));
    }
    let n_features = data[0].ncols();
    for (i, trial) in data.iter().enumerate() {
        if trial.nrows() == 0 || trial.ncols() == 0 {
            return Err(TrfError::InvalidData(format!(
                "trial {} is empty ({}x{})",
                i,
                trial.nrows(),
                trial.ncols()
            )));
        }
        if trial.ncols() != n_features {
            return Err(TrfError::InvalidData(format!(
                "trial {} has {} features but trial 0 has {}",
                i,
                trial.ncols(),
                n_features
            )));
        }
    }
    Ok(())
}

/// Check a paired input/output trial set: both sides valid, equally many
/// trials and matching sample counts per trial pair.
pub fn check_pair(x: &[Trial], y: &[Trial]) -> Result<(), TrfError> {
    check_data(x)?;
    check_data(y)?;
    if x.len() != y.len() {
        return Err(TrfError::InvalidData(format!(
            "input has {} trials but output has {}",
            x.len(),
            y.len()
        )));
    }
    for (i, (xt, yt)) in x.iter().zip(y.iter()).enumerate() {
        if xt.nrows() != yt.nrows() {
            return Err(TrfError::TrialLengthMismatch {
                index: i,
                x_samples: xt.nrows(),
                y_samples: yt.nrows(),
            });
        }
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn promotes_vector_to_single_feature() {
        let v = DVector::from_vec(vec![1.0, 2.0, 3.0]);
        let t = trial_from_vector(&v);
        assert_eq!((t.nrows(), t.ncols()), (3, 1));
        assert_eq!(t[(1, 0)], 2.0);
    }

    #[test]
    fn rejects_empty_and_ragged_sets() {
        assert!(check_data(&[]).is_err());

        let a = DMatrix::from_element(10, 2, 0.0);
        let b = DMatrix::from_element(8, 3, 0.0);
        // differing trial lengths are fine, differing feature counts are not
        assert!(check_data(&[a.clone(), b]).is_err());
        let c = DMatrix::from_element(8, 2, 0.0);
        assert!(check_data(&[a, c]).is_ok());
    }

    #[test]
    fn rejects_mismatched_pairs() {
        let x = vec![DMatrix::from_element(10, 2, 0.0)];
        let y = vec![DMatrix::from_element(9, 1, 0.0)];
        match check_pair(&x, &y) {
            Err(TrfError::TrialLengthMismatch { index, x_samples, y_samples }) => {
                assert_eq!((index, x_samples, y_samples), (0, 10, 9));
            }
            other => panic!("expected length mismatch, got {:?}", other.err()),
        }
    }
}
