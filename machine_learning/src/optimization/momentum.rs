use super::{SparseGrad, Updater, UpdaterParams, check_bounds};
use crate::{MlErr, Result};

/// Gradient descent with a per parameter velocity.
#[derive(Debug, Default)]
pub struct Momentum {
    learning_rate: f32,
    regu_lambda: f32,
    momentum: f32,
    velocity: Box<[f32]>,
    initialized: bool,
}

impl Momentum {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Updater for Momentum {
    fn initialize(&mut self, params: &UpdaterParams) -> Result<()> {
        if !(0. ..1.).contains(&params.momentum) {
            return Err(MlErr::InvalidHyperParam("momentum must be in [0, 1)"));
        }

        self.learning_rate = params.learning_rate;
        self.regu_lambda = params.regu_lambda;
        self.momentum = params.momentum;
        self.velocity = vec![0.; params.num_param].into_boxed_slice();
        self.initialized = true;
        Ok(())
    }

    fn update(&mut self, params: &mut [f32], grad: &SparseGrad) -> Result<()> {
        if !self.initialized {
            return Err(MlErr::Uninitialized("momentum updater"));
        }
        check_bounds(params.len().min(self.velocity.len()), grad)?;

        let lr = self.learning_rate;
        let mu = self.momentum;

        for &(i, g) in grad.entries() {
            let g = g + self.regu_lambda * params[i];
            let v = &mut self.velocity[i];
            *v = mu * *v + g;
            params[i] -= lr * *v;
        }

        Ok(())
    }
}
