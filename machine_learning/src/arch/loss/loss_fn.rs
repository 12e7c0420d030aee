use std::sync::Arc;

use crate::{Result, arch::score::Score, data::BatchRef, optimization::SparseGrad};

/// Maps a prediction and a label to a scalar loss and its gradient.
///
/// Losses compose the score function they're initialized with, every batch level
/// operation goes through it.
pub trait Loss: Send {
    /// Binds the loss to the score function it composes.
    fn initialize(&mut self, score: Arc<dyn Score>) -> Result<()>;

    /// The score function this loss was initialized with.
    fn score(&self) -> Result<&dyn Score>;

    /// The loss of a single raw prediction.
    fn loss(&self, pred: f32, label: f32) -> f32;

    /// The derivative of `loss` with respect to the raw prediction.
    fn partial(&self, pred: f32, label: f32) -> f32;

    /// Maps a raw prediction into the value reported to users.
    fn output(&self, pred: f32) -> f32 {
        pred
    }

    /// Appends the user facing prediction of every row in `batch` to `out`.
    fn predict(&self, batch: BatchRef<'_>, params: &[f32], out: &mut Vec<f32>) -> Result<()> {
        let score = self.score()?;

        for row in batch {
            out.push(self.output(score.calc(row, params)?));
        }

        Ok(())
    }

    /// The summed loss of every row in `batch`.
    fn evaluate(&self, batch: BatchRef<'_>, params: &[f32]) -> Result<f32> {
        let score = self.score()?;

        batch.iter().try_fold(0., |acc, row| {
            Ok(acc + self.loss(score.calc(row, params)?, row.label))
        })
    }

    /// Computes the batch-averaged gradient of the loss into `grad`.
    ///
    /// # Arguments
    /// * `batch` - The rows to differentiate over.
    /// * `params` - The model's parameters.
    /// * `grad` - Cleared and then filled with the coalesced gradient.
    ///
    /// # Returns
    /// The summed loss of the batch.
    fn calc_grad(&self, batch: BatchRef<'_>, params: &[f32], grad: &mut SparseGrad) -> Result<f32> {
        let score = self.score()?;
        grad.clear();

        let mut total = 0.;
        for row in batch {
            let pred = score.calc(row, params)?;
            total += self.loss(pred, row.label);
            score.calc_grad(row, params, self.partial(pred, row.label), grad)?;
        }

        if !batch.is_empty() {
            grad.coalesce(1. / batch.len() as f32);
        }

        Ok(total)
    }
}
