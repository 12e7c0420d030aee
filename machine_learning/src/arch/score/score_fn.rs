use crate::{Result, data::Row, model::ParamLayout, optimization::SparseGrad};

/// Maps the model's parameters and a sparse row to a raw prediction.
///
/// Scores are shared with the loss function, so after `initialize` they're read-only.
pub trait Score: Send + Sync {
    /// Binds the score to the layout of the model it will be evaluated against.
    fn initialize(&mut self, layout: ParamLayout) -> Result<()>;

    /// Computes the raw prediction for `row`.
    ///
    /// # Arguments
    /// * `row` - The sparse example.
    /// * `params` - The model's parameters.
    fn calc(&self, row: &Row, params: &[f32]) -> Result<f32>;

    /// Accumulates the gradient of the loss with respect to the parameters used by `row`.
    ///
    /// # Arguments
    /// * `row` - The sparse example.
    /// * `params` - The model's parameters.
    /// * `pg` - The partial gradient of the loss with respect to this row's prediction.
    /// * `grad` - The sparse gradient to push the contributions into.
    fn calc_grad(&self, row: &Row, params: &[f32], pg: f32, grad: &mut SparseGrad)
    -> Result<()>;
}
