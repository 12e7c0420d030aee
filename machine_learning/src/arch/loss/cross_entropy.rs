use std::sync::Arc;

use super::{Loss, sign};
use crate::{MlErr, Result, arch::score::Score};

/// Logistic loss for binary classification, positive labels are the ones above 0.
#[derive(Default)]
pub struct CrossEntropy {
    score: Option<Arc<dyn Score>>,
}

impl CrossEntropy {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Loss for CrossEntropy {
    fn initialize(&mut self, score: Arc<dyn Score>) -> Result<()> {
        self.score = Some(score);
        Ok(())
    }

    fn score(&self) -> Result<&dyn Score> {
        self.score
            .as_deref()
            .ok_or(MlErr::Uninitialized("cross entropy loss"))
    }

    fn loss(&self, pred: f32, label: f32) -> f32 {
        // log(1 + exp(-y * pred)) without overflowing for large margins.
        let z = -sign(label) * pred;
        z.max(0.) + (-z.abs()).exp().ln_1p()
    }

    fn partial(&self, pred: f32, label: f32) -> f32 {
        let y = sign(label);
        -y / (1. + (y * pred).exp())
    }

    fn output(&self, pred: f32) -> f32 {
        1. / (1. + (-pred).exp())
    }
}
