use std::sync::Arc;

use super::{Loss, sign};
use crate::{MlErr, Result, arch::score::Score};

/// Hinge loss for binary classification, `max(0, 1 - y * pred)`.
#[derive(Default)]
pub struct Hinge {
    score: Option<Arc<dyn Score>>,
}

impl Hinge {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Loss for Hinge {
    fn initialize(&mut self, score: Arc<dyn Score>) -> Result<()> {
        self.score = Some(score);
        Ok(())
    }

    fn score(&self) -> Result<&dyn Score> {
        self.score.as_deref().ok_or(MlErr::Uninitialized("hinge loss"))
    }

    fn loss(&self, pred: f32, label: f32) -> f32 {
        (1. - sign(label) * pred).max(0.)
    }

    fn partial(&self, pred: f32, label: f32) -> f32 {
        let y = sign(label);
        if y * pred < 1. { -y } else { 0. }
    }
}
