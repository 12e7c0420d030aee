use super::SparseGrad;
use crate::Result;

/// The hyper parameters every updater is initialized with.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct UpdaterParams {
    pub num_param: usize,
    pub learning_rate: f32,
    pub regu_lambda: f32,
    pub momentum: f32,
    pub beta1: f32,
    pub beta2: f32,
    pub epsilon: f32,
}

impl Default for UpdaterParams {
    fn default() -> Self {
        Self {
            num_param: 0,
            learning_rate: 0.2,
            regu_lambda: 0.,
            momentum: 0.9,
            beta1: 0.9,
            beta2: 0.999,
            epsilon: 1e-8,
        }
    }
}

/// Defines the strategy for updating model parameters based on calculated gradients.
pub trait Updater: Send {
    /// Sets the hyper parameters and allocates any per parameter state, discarding
    /// the previous one.
    fn initialize(&mut self, params: &UpdaterParams) -> Result<()>;

    /// Updates the parameters touched by `grad`, adding the L2 penalty of each of them.
    ///
    /// # Arguments
    /// * `params` - The model's parameters.
    /// * `grad` - The coalesced sparse gradient.
    ///
    /// # Returns
    /// An error if an index of `grad` is out of bounds or the updater isn't initialized.
    fn update(&mut self, params: &mut [f32], grad: &SparseGrad) -> Result<()>;
}
