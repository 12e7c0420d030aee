use super::{SparseGrad, Updater, UpdaterParams, check_bounds};
use crate::{MlErr, Result};

/// AdaGrad, every parameter gets its own decaying learning rate.
#[derive(Debug, Default)]
pub struct AdaGrad {
    learning_rate: f32,
    regu_lambda: f32,
    epsilon: f32,
    sum_sq: Box<[f32]>,
    initialized: bool,
}

impl AdaGrad {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Updater for AdaGrad {
    fn initialize(&mut self, params: &UpdaterParams) -> Result<()> {
        self.learning_rate = params.learning_rate;
        self.regu_lambda = params.regu_lambda;
        self.epsilon = params.epsilon;
        self.sum_sq = vec![0.; params.num_param].into_boxed_slice();
        self.initialized = true;
        Ok(())
    }

    fn update(&mut self, params: &mut [f32], grad: &SparseGrad) -> Result<()> {
        if !self.initialized {
            return Err(MlErr::Uninitialized("adagrad updater"));
        }
        check_bounds(params.len().min(self.sum_sq.len()), grad)?;

        for &(i, g) in grad.entries() {
            let g = g + self.regu_lambda * params[i];
            let s = &mut self.sum_sq[i];
            *s += g * g;
            params[i] -= self.learning_rate * g / (s.sqrt() + self.epsilon);
        }

        Ok(())
    }
}
