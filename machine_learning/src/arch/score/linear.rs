use super::{Score, bound, linear_grad, linear_term};
use crate::{Result, data::Row, model::ParamLayout, optimization::SparseGrad};

/// `w0 + sum(w_j * x_j)`
#[derive(Debug, Default)]
pub struct LinearScore {
    layout: Option<ParamLayout>,
}

impl LinearScore {
    pub fn new() -> Self {
        Self::default()
    }
}

impl Score for LinearScore {
    fn initialize(&mut self, layout: ParamLayout) -> Result<()> {
        self.layout = Some(layout);
        Ok(())
    }

    fn calc(&self, row: &Row, params: &[f32]) -> Result<f32> {
        let layout = bound(&self.layout, params)?;
        Ok(linear_term(layout, row, params))
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
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::{super::tests::*, *};
    use crate::model::{ModelFamily, ModelMeta};

    fn score(num_feature: usize) -> LinearScore {
        let mut score = LinearScore::new();
        let meta = ModelMeta::new(ModelFamily::Linear, num_feature, 0, 0);
        score.initialize(ParamLayout::new(&meta).unwrap()).unwrap();
        score
    }

    #[test]
    fn weighted_sum_plus_bias() {
        let score = score(3);
        let row = Row::new(1., vec![1, 3], vec![2., 0.5]);
        let params = [0.5, 1., 100., -2.];

        assert_eq!(score.calc(&row, &params).unwrap(), 0.5 + 2. - 1.);
    }

    #[test]
    fn unseen_features_are_ignored() {
        let score = score(2);
        let row = Row::new(1., vec![1, 9], vec![1., 1.]);
        let params = [0., 3., 4.];

        assert_eq!(score.calc(&row, &params).unwrap(), 3.);
    }

    #[test]
    fn gradient_matches_finite_differences() {
        let score = score(3);
        let row = Row::new(1., vec![2, 3], vec![1.5, -1.]);
        let params = [0.1, 0.2, 0.3, 0.4];

        assert_close(
            &analytic_grad(&score, &row, &params),
            &numeric_grad(&score, &row, &params),
        );
    }
}
