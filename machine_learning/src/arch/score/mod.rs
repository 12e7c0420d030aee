mod ffm;
mod fm;
mod linear;
mod score_fn;

pub use ffm::FfmScore;
pub use fm::FmScore;
pub use linear::LinearScore;
pub use score_fn::Score;

use crate::{MlErr, Result, data::Row, model::ParamLayout, optimization::SparseGrad};

/// Returns the bound layout, checking `params` was sized after it.
fn bound<'a>(layout: &'a Option<ParamLayout>, params: &[f32]) -> Result<&'a ParamLayout> {
    let layout = layout.as_ref().ok_or(MlErr::Uninitialized("score function"))?;

    if params.len() != layout.len() {
        return Err(MlErr::SizeMismatch {
            what: "model parameters",
            got: params.len(),
            expected: layout.len(),
        });
    }

    Ok(layout)
}

/// The entries of `row` that have parameters in `layout`, unseen features are skipped.
fn known<'a>(layout: &'a ParamLayout, row: &'a Row) -> impl Iterator<Item = (usize, f32)> + 'a {
    row.entries().filter(|&(j, _)| layout.has_feature(j))
}

/// Bias plus the weighted sum of the row's features.
fn linear_term(layout: &ParamLayout, row: &Row, params: &[f32]) -> f32 {
    known(layout, row).fold(params[layout.bias()], |acc, (j, x)| {
        acc + params[layout.linear(j)] * x
    })
}

fn linear_grad(layout: &ParamLayout, row: &Row, pg: f32, grad: &mut SparseGrad) {
    grad.push(layout.bias(), pg);
    for (j, x) in known(layout, row) {
        grad.push(layout.linear(j), pg * x);
    }
}
