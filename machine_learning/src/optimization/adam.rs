use super::{SparseGrad, Updater, UpdaterParams, check_bounds};
use crate::{MlErr, Result};

#[derive(Debug, Default)]
pub struct Adam {
    learning_rate: f32,
    regu_lambda: f32,
    beta1: f32,
    beta2: f32,
    beta1_t: f32,
    beta2_t: f32,
    epsilon: f32,
    v: Box<[f32]>,
    s: Box<[f32]>,
    initialized: bool,
}

impl Adam {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Updater for Adam {
    fn initialize(&mut self, params: &UpdaterParams) -> Result<()> {
        let unit = 0. ..1.;
        if !unit.contains(&params.beta1) || !unit.contains(&params.beta2) {
            return Err(MlErr::InvalidHyperParam("adam betas must be in [0, 1)"));
        }

        self.learning_rate = params.learning_rate;
        self.regu_lambda = params.regu_lambda;
        self.beta1 = params.beta1;
        self.beta2 = params.beta2;
        self.beta1_t = 1.;
        self.beta2_t = 1.;
        self.epsilon = params.epsilon;
        self.v = vec![0.; params.num_param].into_boxed_slice();
        self.s = vec![0.; params.num_param].into_boxed_slice();
        self.initialized = true;
        Ok(())
    }

    fn update(&mut self, params: &mut [f32], grad: &SparseGrad) -> Result<()> {
        if !self.initialized {
            return Err(MlErr::Uninitialized("adam updater"));
        }
        check_bounds(params.len().min(self.v.len()), grad)?;

        let Self {
            learning_rate: lr,
            regu_lambda: lambda,
            beta1: b1,
            beta2: b2,
            epsilon: eps,
            ..
        } = *self;

        self.beta1_t *= b1;
        self.beta2_t *= b2;

        let bc1 = 1. - self.beta1_t;
        let bc2 = 1. - self.beta2_t;
        let step_size = lr * (bc2.sqrt() / bc1);

        for &(i, g) in grad.entries() {
            let g = g + lambda * params[i];
            let v = &mut self.v[i];
            let s = &mut self.s[i];

            *v = b1 * *v + (1. - b1) * g;
            *s = b2 * *s + (1. - b2) * g.powi(2);
            params[i] -= step_size * *v / (s.sqrt() + eps);
        }

        Ok(())
    }
}
