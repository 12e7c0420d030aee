use super::{SparseGrad, Updater, UpdaterParams, check_bounds};
use crate::{MlErr, Result};

/// Plain stochastic gradient descent.
#[derive(Debug, Default)]
pub struct Sgd {
    hyper: Option<(f32, f32)>,
}

impl Sgd {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Updater for Sgd {
    fn initialize(&mut self, params: &UpdaterParams) -> Result<()> {
        self.hyper = Some((params.learning_rate, params.regu_lambda));
        Ok(())
    }

    fn update(&mut self, params: &mut [f32], grad: &SparseGrad) -> Result<()> {
        let (lr, lambda) = self.hyper.ok_or(MlErr::Uninitialized("sgd updater"))?;
        check_bounds(params.len(), grad)?;

        for &(i, g) in grad.entries() {
            let p = &mut params[i];
            *p -= lr * (g + lambda * *p);
        }

        Ok(())
    }
}
