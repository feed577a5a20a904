use common::TrfError;
use nanorand::{Rng, WyRand};

/// One train/test partition of trial indices
#[derive(Debug, Clone)]
pub struct Split {
    /// Indices of the trials to train on
    pub train: Vec<usize>,
    /// Indices of the held-out trials
    pub test: Vec<usize>,
}

/// Generate `n_splits` shuffled random splits with a test fraction of
/// `min(1 / n_splits, 0.1)` (at least one held-out trial). Deterministic
/// for a given `random_state`.
pub fn shuffled_splits(
    n_trials: usize,
    n_splits: usize,
    random_state: Option<u64>,
) -> Result<Vec<Split>, TrfError> {
    if n_splits == 0 || n_trials < 2 {
        return Err(TrfError::InvalidSplits { n_splits, n_trials });
    }
    let test_fraction = (1.0 / n_splits as f64).min(0.1);
    let n_test = ((n_trials as f64 * test_fraction).round() as usize).clamp(1, n_trials - 1);

    let mut rng = match random_state {
        Some(seed) => WyRand::new_seed(seed),
        None => WyRand::new(),
    };
    let mut splits = Vec::with_capacity(n_splits);
    for _ in 0..n_splits {
        let mut indices: Vec<usize> = (0..n_trials).collect();
        rng.shuffle(&mut indices);
        let test = indices.split_off(n_trials - n_test);
        splits.push(Split {
            train: indices,
            test,
        });
    }
    Ok(splits)
}

/// One split per trial, each holding out exactly that trial
pub fn leave_one_out(n_trials: usize) -> Result<Vec<Split>, TrfError> {
    if n_trials < 2 {
        return Err(TrfError::InvalidSplits {
            n_splits: n_trials,
            n_trials,
        });
    }
    Ok((0..n_trials)
        .map(|held_out| Split {
            train: (0..n_trials).filter(|i| *i != held_out).collect(),
            test: vec![held_out],
        })
        .collect())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn leave_one_out_covers_every_trial_once() {
        let splits = leave_one_out(6).unwrap();
        assert_eq!(splits.len(), 6);

        let mut held_out: Vec<usize> = splits.iter().flat_map(|s| s.test.clone()).collect();
        held_out.sort_unstable();
        assert_eq!(held_out, vec![0, 1, 2, 3, 4, 5]);
        for split in &splits {
            assert_eq!(split.test.len(), 1);
            assert_eq!(split.train.len(), 5);
            assert!(!split.train.contains(&split.test[0]));
        }
    }

    #[test]
    fn shuffled_splits_partition_without_replacement() {
        let splits = shuffled_splits(20, 10, Some(42)).unwrap();
        assert_eq!(splits.len(), 10);

        for split in &splits {
            // test fraction capped at 0.1 -> 2 of 20 trials held out
            assert_eq!(split.test.len(), 2);
            assert_eq!(split.train.len(), 18);
            let mut all: Vec<usize> = split.train.iter().chain(split.test.iter()).copied().collect();
            all.sort_unstable();
            assert_eq!(all, (0..20).collect::<Vec<usize>>());
        }
    }

    #[test]
    fn seeded_splits_are_deterministic() {
        let a = shuffled_splits(9, 5, Some(7)).unwrap();
        let b = shuffled_splits(9, 5, Some(7)).unwrap();
        for (sa, sb) in a.iter().zip(b.iter()) {
            assert_eq!(sa.train, sb.train);
            assert_eq!(sa.test, sb.test);
        }
    }

    #[test]
    fn degenerate_layouts_are_rejected() {
        assert!(shuffled_splits(1, 10, Some(0)).is_err());
        assert!(shuffled_splits(10, 0, Some(0)).is_err());
        assert!(leave_one_out(1).is_err());
    }
}
