use super::{Score, bound, known, linear_grad, linear_term};
use crate::{Result, data::Row, model::ParamLayout, optimization::SparseGrad};

/// Factorization machine:
/// `w0 + sum(w_j * x_j) + 1/2 * sum_f((sum_j v_jf * x_j)^2 - sum_j v_jf^2 * x_j^2)`
#[derive(Debug, Default)]
pub struct FmScore {
    layout: Option<ParamLayout>,
}

impl FmScore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// `sum_j v_jf * x_j` for every latent factor `f`.
fn factor_sums(layout: &ParamLayout, row: &Row, params: &[f32]) -> Vec<f32> {
    let mut sums = vec![0.; layout.k()];

    for (j, x) in known(layout, row) {
        let v = &params[layout.latent(j)];
        for (sum, v) in sums.iter_mut().zip(v) {
            *sum += v * x;
        }
    }

    sums
}

impl Score for FmScore {
    fn initialize(&mut self, layout: ParamLayout) -> Result<()> {
        self.layout = Some(layout);
        Ok(())
    }

    fn calc(&self, row: &Row, params: &[f32]) -> Result<f32> {
        let layout = bound(&self.layout, params)?;
        let sums = factor_sums(layout, row, params);

        let mut sq_sums = vec![0.; layout.k()];
        for (j, x) in known(layout, row) {
            let v = &params[layout.latent(j)];
            for (sq, v) in sq_sums.iter_mut().zip(v) {
                *sq += (v * x).powi(2);
            }
        }

        let interactions: f32 = sums
            .iter()
            .zip(&sq_sums)
            .map(|(sum, sq)| sum * sum - sq)
            .sum();

        Ok(linear_term(layout, row, params) + 0.5 * interactions)
    }

    fn calc_grad(
        &self,
        row: &Row,
        params: &[f32],
        pg: f32,
        grad: &mut SparseGrad,
    ) -> Result<()> {
        let layout = bound(&self.layout, params)?;
        linear_grad(layout, row, pg, grad);

        let sums = factor_sums(layout, row, params);
        for (j, x) in known(layout, row) {
            let latent = layout.latent(j);
            for (f, i) in latent.enumerate() {
                grad.push(i, pg * (x * sums[f] - params[i] * x * x));
            }
        }

        Ok(())
    }
}
