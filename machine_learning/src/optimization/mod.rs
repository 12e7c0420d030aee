mod adagrad;
mod adam;
mod momentum;
mod sgd;
mod sparse_grad;
mod updater;

pub use adagrad::AdaGrad;
pub use adam::Adam;
pub use momentum::Momentum;
pub use sgd::Sgd;
pub use sparse_grad::SparseGrad;
pub use updater::{Updater, UpdaterParams};

use crate::{MlErr, Result};

/// Verifies every index of `grad` addresses one of `len` parameters.
fn check_bounds(len: usize, grad: &SparseGrad) -> Result<()> {
    match grad.entries().iter().find(|&&(i, _)| i >= len) {
        Some(&(index, _)) => Err(MlErr::IndexOutOfBounds { index, len }),
        None => Ok(()),
    }
}
