use super::{Score, bound, linear_grad, linear_term};
use crate::{MlErr, Result, data::Row, model::ParamLayout, optimization::SparseGrad};

/// Field-aware factorization machine, every feature keeps one latent vector per field:
/// `w0 + sum(w_j * x_j) + sum_{a<b}(<v_{j_a,f_b}, v_{j_b,f_a}> * x_a * x_b)`
#[derive(Debug, Default)]
pub struct FfmScore {
    layout: Option<ParamLayout>,
}

impl FfmScore {
    pub fn new() -> Self {
        Self::default()
    }
}

/// `(field, feature, value)` triplets of `row` that have parameters in `layout`.
fn known_triplets(layout: &ParamLayout, row: &Row) -> Result<Vec<(usize, usize, f32)>> {
    let fields = row.fields.as_deref().ok_or(MlErr::MissingFields)?;

    let triplets = fields
        .iter()
        .zip(row.entries())
        .map(|(&f, (j, x))| (f, j, x))
        .filter(|&(f, j, _)| layout.has_field(f) && layout.has_feature(j))
        .collect();

    Ok(triplets)
}

fn dot(a: &[f32], b: &[f32]) -> f32 {
    a.iter().zip(b).map(|(a, b)| a * b).sum()
}

impl Score for FfmScore {
    fn initialize(&mut self, layout: ParamLayout) -> Result<()> {
        self.layout = Some(layout);
        Ok(())
    }

    fn calc(&self, row: &Row, params: &[f32]) -> Result<f32> {
        let layout = bound(&self.layout, params)?;
        let triplets = known_triplets(layout, row)?;

        let mut interactions = 0.;
        for (a, &(fa, ja, xa)) in triplets.iter().enumerate() {
            for &(fb, jb, xb) in &triplets[a + 1..] {
                let va = &params[layout.field_latent(ja, fb)];
                let vb = &params[layout.field_latent(jb, fa)];
                interactions += dot(va, vb) * xa * xb;
            }
        }

        Ok(linear_term(layout, row, params) + interactions)
    }

    fn calc_grad(
        &self,
        row: &Row,
        params: &[f32],
        pg: f32,
        grad: &mut SparseGrad,
    ) -> Result<()> {
        let layout = bound(&self.layout, params)?;
        let triplets = known_triplets(layout, row)?;
        linear_grad(layout, row, pg, grad);

        for (a, &(fa, ja, xa)) in triplets.iter().enumerate() {
            for &(fb, jb, xb) in &triplets[a + 1..] {
                let ra = layout.field_latent(ja, fb);
                let rb = layout.field_latent(jb, fa);
                let scale = pg * xa * xb;

                for (ia, ib) in ra.zip(rb) {
                    grad.push(ia, scale * params[ib]);
                    grad.push(ib, scale * params[ia]);
                }
            }
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{super::tests::*, *};
    use crate::model::{ModelFamily, ModelMeta};

    fn score(num_feature: usize, k: usize, num_field: usize) -> FfmScore {
        let mut score = FfmScore::new();
        let meta = ModelMeta::new(ModelFamily::Ffm, num_feature, k, num_field);
        score.initialize(ParamLayout::new(&meta).unwrap()).unwrap();
        score
    }

    #[test]
    fn field_aware_interaction() {
        let score = score(2, 1, 2);
        let row = Row::with_fields(1., vec![1, 2], vec![1, 2], vec![1., 1.]);
        // bias, w1, w2, v_{1,1}, v_{1,2}, v_{2,1}, v_{2,2}
        let params = [0., 0., 0., 9., 2., 3., 9.];

        // <v_{1,2}, v_{2,1}> = 2 * 3
        assert!((score.calc(&row, &params).unwrap() - 6.).abs() < 1e-6);
    }

    #[test]
    fn rows_without_fields_are_rejected() {
        let score = score(2, 1, 2);
        let row = Row::new(1., vec![1, 2], vec![1., 1.]);

        assert!(matches!(
            score.calc(&row, &[0.; 7]),
            Err(MlErr::MissingFields)
        ));
    }

    #[test]
    fn gradient_matches_finite_differences() {
        let score = score(3, 2, 2);
        let row = Row::with_fields(1., vec![1, 2, 2], vec![1, 2, 3], vec![0.5, 1.5, -1.]);
        let params: Vec<f32> = (0..16).map(|i| 0.05 * i as f32 - 0.4).collect();

        assert_close(
            &analytic_grad(&score, &row, &params),
            &numeric_grad(&score, &row, &params),
        );
    }
}
