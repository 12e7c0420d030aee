use std::sync::Arc;

use super::Loss;
use crate::{MlErr, Result, arch::score::Score};

/// Squared error for regression, `(pred - y)^2 / 2`.
#[derive(Default)]
pub struct Squared {
    score: Option<Arc<dyn Score>>,
}

impl Squared {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Loss for Squared {
    fn initialize(&mut self, score: Arc<dyn Score>) -> Result<()> {
        self.score = Some(score);
        Ok(())
    }

    fn score(&self) -> Result<&dyn Score> {
        self.score
            .as_deref()
            .ok_or(MlErr::Uninitialized("squared loss"))
    }

    fn loss(&self, pred: f32, label: f32) -> f32 {
        0.5 * (pred - label).powi(2)
    }

    fn partial(&self, pred: f32, label: f32) -> f32 {
        pred - label
    }
}
