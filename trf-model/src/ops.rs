use std::iter::Sum;
use std::ops::{Add, Div};

use common::TrfError;

use crate::Trf;

impl Trf {
    /// Elementwise sum of two trained models, for ensemble averaging across
    /// cross-validation folds. Both models must share direction and kind.
    pub fn checked_add(&self, other: &Trf) -> Result<Trf, TrfError> {
        if self.direction != other.direction || self.kind != other.kind {
            return Err(TrfError::IncompatibleModels);
        }
        let mut sum = self.clone();
        {
            let weights = sum.weights_mut().ok_or(TrfError::Untrained)?;
            *weights += other.weights().ok_or(TrfError::Untrained)?;
        }
        {
            let bias = sum.bias_mut().ok_or(TrfError::Untrained)?;
            *bias += other.bias().ok_or(TrfError::Untrained)?;
        }
        Ok(sum)
    }
}

impl Add for Trf {
    type Output = Trf;

    /// # Panics
    /// If the models differ in direction or kind, or either is untrained.
    /// Use [`Trf::checked_add`] for the fallible form.
    fn add(self, rhs: Trf) -> Trf {
        match self.checked_add(&rhs) {
            Ok(sum) => sum,
            Err(e) => panic!("{}", e),
        }
    }
}

impl Div<f64> for Trf {
    type Output = Trf;

    /// # Panics
    /// If the model is untrained.
    fn div(mut self, num: f64) -> Trf {
        match self.weights_mut() {
            Some(weights) => *weights /= num,
            None => panic!("{}", TrfError::Untrained),
        }
        if let Some(bias) = self.bias_mut() {
            *bias /= num;
        }
        self
    }
}

impl Sum for Trf {
    /// Reduce a collection of fold models into their elementwise sum; the
    /// empty sum is the untrained default model.
    fn sum<I: Iterator<Item = Trf>>(iter: I) -> Trf {
        iter.reduce(Add::add).unwrap_or_default()
    }
}

/// Average a set of fold models into a single model
pub fn average(models: &[Trf]) -> Result<Trf, TrfError> {
    let (first, rest) = models
        .split_first()
        .ok_or_else(|| TrfError::InvalidData("cannot average zero models".to_string()))?;
    let mut acc = first.clone();
    for model in rest {
        acc = acc.checked_add(model)?;
    }
    Ok(acc / models.len() as f64)
}
