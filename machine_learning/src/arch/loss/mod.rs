mod cross_entropy;
mod hinge;
mod loss_fn;
mod squared;

pub use cross_entropy::CrossEntropy;
pub use hinge::Hinge;
pub use loss_fn::Loss;
pub use squared::Squared;

/// Maps a binary label into {-1, 1}.
fn sign(label: f32) -> f32 {
    if label > 0. { 1. } else { -1. }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::{
        MlErr,
        arch::score::{LinearScore, Score},
        data::{BatchRef, Row},
        model::{ModelFamily, ModelMeta, ParamLayout},
        optimization::SparseGrad,
    };

    fn linear(num_feature: usize) -> Arc<dyn Score> {
        let mut score = LinearScore::new();
        let meta = ModelMeta::new(ModelFamily::Linear, num_feature, 0, 0);
        score.initialize(ParamLayout::new(&meta).unwrap()).unwrap();
        Arc::new(score)
    }

    fn losses() -> Vec<Box<dyn Loss>> {
        vec![
            Box::new(Squared::new()),
            Box::new(CrossEntropy::new()),
            Box::new(Hinge::new()),
        ]
    }

    #[test]
    fn partials_match_finite_differences() {
        const H: f32 = 1e-3;

        for loss in losses() {
            for label in [0., 1., -1.] {
                for pred in [-2.3, -0.4, 0.35, 1.7] {
                    let numeric =
                        (loss.loss(pred + H, label) - loss.loss(pred - H, label)) / (2. * H);
                    let analytic = loss.partial(pred, label);
                    assert!((numeric - analytic).abs() < 1e-2, "{pred} {label}");
                }
            }
        }
    }

    #[test]
    fn cross_entropy_is_stable_and_bounded() {
        let loss = CrossEntropy::new();

        assert!(loss.loss(100., 1.) >= 0.);
        assert!(loss.loss(100., 1.) < 1e-6);
        assert!((loss.loss(-100., 1.) - 100.).abs() < 1e-3);
        assert!((loss.loss(0., 0.) - 2f32.ln()).abs() < 1e-6);
        assert!((loss.output(0.) - 0.5).abs() < 1e-6);
    }

    #[test]
    fn squared_loss_through_the_score() {
        let mut loss = Squared::new();
        loss.initialize(linear(2)).unwrap();

        let rows = [
            Row::new(1., vec![1], vec![1.]),
            Row::new(3., vec![2], vec![1.]),
        ];
        let batch = BatchRef::new(&rows);
        let params = [0., 2., 2.];

        // residuals: 1 and -1
        assert_eq!(loss.evaluate(batch, &params).unwrap(), 1.);

        let mut preds = Vec::new();
        loss.predict(batch, &params, &mut preds).unwrap();
        assert_eq!(preds, [2., 2.]);

        let mut grad = SparseGrad::new();
        let total = loss.calc_grad(batch, &params, &mut grad).unwrap();
        assert_eq!(total, 1.);
        // bias residuals cancel out, each weight sees half its residual
        assert_eq!(grad.entries(), [(0, 0.), (1, 0.5), (2, -0.5)]);
    }

    #[test]
    fn uninitialized_loss_fails() {
        for loss in losses() {
            let rows = [Row::new(1., vec![1], vec![1.])];
            let err = loss.evaluate(BatchRef::new(&rows), &[0., 0.]).unwrap_err();
            assert!(matches!(err, MlErr::Uninitialized(_)));
        }
    }
}
