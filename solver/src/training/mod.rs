mod epoch_trainer;
mod predictor;

use std::{path::PathBuf, sync::Arc};

use machine_learning::{
    arch::{Loss, Score},
    model::Model,
    optimization::Updater,
    reading::Reader,
};

pub use epoch_trainer::EpochTrainer;
pub use predictor::Predictor;

use crate::{HyperParam, Interrupt, Result};

/// Every component a training run is made of, exclusively owned by the solver.
pub struct TrainPipeline {
    /// One reader per fold when cross validating, otherwise the training reader
    /// followed by the test reader if any.
    pub readers: Vec<Box<dyn Reader>>,
    /// The fold files created for cross validation.
    pub fold_files: Vec<PathBuf>,
    pub model: Model,
    pub updater: Box<dyn Updater>,
    pub score: Arc<dyn Score>,
    pub loss: Box<dyn Loss>,
}

/// Every component an inference run is made of, exclusively owned by the solver.
pub struct InferencePipeline {
    pub reader: Box<dyn Reader>,
    pub model: Model,
    pub score: Arc<dyn Score>,
    pub loss: Box<dyn Loss>,
}

/// The outcome of a training run.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct TrainReport {
    /// Mean training loss per epoch, empty when cross validating.
    pub train_loss: Vec<f32>,
    /// Mean test loss per epoch, empty without a test file.
    pub test_loss: Vec<f32>,
    /// Mean validation loss across folds.
    pub cv_loss: Option<f32>,
}

/// The outcome of an inference run.
#[derive(Debug, Clone, PartialEq)]
pub struct InferenceReport {
    pub num_predictions: usize,
    pub output: PathBuf,
}

/// Trains the model of an assembled pipeline.
pub trait TrainLoop: Send {
    /// Runs the training, leaving the trained parameters in `pipeline.model`.
    ///
    /// # Arguments
    /// * `pipeline` - The assembled components.
    /// * `hyper_param` - The configuration of the run.
    /// * `interrupt` - Checked between batches.
    fn train(
        &mut self,
        pipeline: &mut TrainPipeline,
        hyper_param: &HyperParam,
        interrupt: &Interrupt,
    ) -> Result<TrainReport>;

    /// Consumes the pipeline, persisting whatever the run produced and releasing
    /// every component.
    fn teardown(&mut self, pipeline: TrainPipeline, hyper_param: &HyperParam) -> Result<()>;
}

/// Emits predictions for the rows of an assembled pipeline.
pub trait InferenceLoop: Send {
    fn infer(
        &mut self,
        pipeline: &mut InferencePipeline,
        hyper_param: &HyperParam,
        interrupt: &Interrupt,
    ) -> Result<InferenceReport>;

    fn teardown(&mut self, pipeline: InferencePipeline, hyper_param: &HyperParam) -> Result<()>;
}
