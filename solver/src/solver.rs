use std::{
    num::NonZeroUsize,
    path::{Path, PathBuf},
    sync::Arc,
};

use log::info;
use machine_learning::{
    Registry,
    arch::{Loss, Score},
    model::{Init, Model, ModelMeta},
    parsing::Parser,
    reading::Reader,
};

use crate::{
    Dimensions, HyperParam, Interrupt, Mode, Result, SolverErr,
    scan::scan,
    splitter,
    training::{
        EpochTrainer, InferenceLoop, InferencePipeline, InferenceReport, Predictor, TrainLoop,
        TrainPipeline, TrainReport,
    },
};

/// What a call to `Solver::start_work` produced.
#[derive(Debug, Clone, PartialEq)]
pub enum Report {
    Train(TrainReport),
    Inference(InferenceReport),
}

enum Work {
    Train {
        pipeline: TrainPipeline,
        train_loop: Box<dyn TrainLoop>,
    },
    Inference {
        pipeline: InferencePipeline,
        inference_loop: Box<dyn InferenceLoop>,
    },
}

/// An assembled, ready to run pipeline.
pub struct Solver {
    hyper_param: HyperParam,
    dims: Dimensions,
    interrupt: Interrupt,
    work: Work,
}

impl Solver {
    /// The configuration of the run, reconciled from the checkpoint in inference mode.
    pub fn hyper_param(&self) -> &HyperParam {
        &self.hyper_param
    }

    pub fn dims(&self) -> Dimensions {
        self.dims
    }

    pub fn mode(&self) -> Mode {
        match self.work {
            Work::Train { .. } => Mode::Train,
            Work::Inference { .. } => Mode::Inference,
        }
    }

    pub fn train_pipeline(&self) -> Option<&TrainPipeline> {
        match &self.work {
            Work::Train { pipeline, .. } => Some(pipeline),
            Work::Inference { .. } => None,
        }
    }

    pub fn inference_pipeline(&self) -> Option<&InferencePipeline> {
        match &self.work {
            Work::Inference { pipeline, .. } => Some(pipeline),
            Work::Train { .. } => None,
        }
    }

    /// Runs the training or inference loop over the assembled pipeline.
    pub fn start_work(&mut self) -> Result<Report> {
        let hyper_param = &self.hyper_param;
        let interrupt = &self.interrupt;

        match &mut self.work {
            Work::Train {
                pipeline,
                train_loop,
            } => Ok(Report::Train(train_loop.train(pipeline, hyper_param, interrupt)?)),
            Work::Inference {
                pipeline,
                inference_loop,
            } => Ok(Report::Inference(inference_loop.infer(
                pipeline,
                hyper_param,
                interrupt,
            )?)),
        }
    }

    /// Tears the pipeline down, releasing every component it owns.
    pub fn finalize(self) -> Result<()> {
        match self.work {
            Work::Train {
                pipeline,
                mut train_loop,
            } => train_loop.teardown(pipeline, &self.hyper_param),
            Work::Inference {
                pipeline,
                mut inference_loop,
            } => inference_loop.teardown(pipeline, &self.hyper_param),
        }
    }
}

/// Assembles `Solver`s from a configuration.
pub struct SolverBuilder<'r> {
    registry: &'r Registry,
    interrupt: Interrupt,
    train_loop: Option<Box<dyn TrainLoop>>,
    inference_loop: Option<Box<dyn InferenceLoop>>,
}

impl Default for SolverBuilder<'static> {
    fn default() -> Self {
        Self::new()
    }
}

impl SolverBuilder<'static> {
    /// Creates a new `SolverBuilder` over the global registry.
    pub fn new() -> Self {
        Self::with_registry(Registry::global())
    }
}

impl<'r> SolverBuilder<'r> {
    /// Creates a new `SolverBuilder` whose components come from `registry`.
    pub fn with_registry(registry: &'r Registry) -> Self {
        Self {
            registry,
            interrupt: Interrupt::new(),
            train_loop: None,
            inference_loop: None,
        }
    }

    /// Shares `interrupt` with the pre-scan and the loops.
    pub fn interrupt(mut self, interrupt: Interrupt) -> Self {
        self.interrupt = interrupt;
        self
    }

    /// Replaces the default `EpochTrainer`.
    pub fn train_loop<T: TrainLoop + 'static>(mut self, train_loop: T) -> Self {
        self.train_loop = Some(Box::new(train_loop));
        self
    }

    /// Replaces the default `Predictor`.
    pub fn inference_loop<T: InferenceLoop + 'static>(mut self, inference_loop: T) -> Self {
        self.inference_loop = Some(Box::new(inference_loop));
        self
    }

    /// Validates `hyper_param` and assembles the pipeline of its mode.
    ///
    /// # Arguments
    /// * `hyper_param` - The configuration of the run.
    ///
    /// # Returns
    /// A ready to run `Solver`, or the first error found. Nothing built before the
    /// error is retained, fold files included.
    pub fn build(self, hyper_param: HyperParam) -> Result<Solver> {
        hyper_param.validate(self.registry)?;

        match hyper_param.mode {
            Mode::Train => self.build_train(hyper_param),
            Mode::Inference => self.build_inference(hyper_param),
        }
    }

    fn build_train(self, hyper_param: HyperParam) -> Result<Solver> {
        let fold_files = if hyper_param.cross_validation {
            let num_folds = NonZeroUsize::new(hyper_param.num_folds)
                .ok_or_else(|| SolverErr::InvalidConfig("num_folds must be positive".into()))?;
            splitter::split(&hyper_param.train_set_file, num_folds)?
        } else {
            Vec::new()
        };

        match self.resolve_train(&hyper_param, fold_files.clone()) {
            Ok((pipeline, dims)) => Ok(Solver {
                work: Work::Train {
                    pipeline,
                    train_loop: self
                        .train_loop
                        .unwrap_or_else(|| Box::new(EpochTrainer::new())),
                },
                hyper_param,
                dims,
                interrupt: self.interrupt,
            }),
            Err(e) => {
                splitter::remove_folds(&fold_files);
                Err(e)
            }
        }
    }

    fn resolve_train(
        &self,
        hyper_param: &HyperParam,
        fold_files: Vec<PathBuf>,
    ) -> Result<(TrainPipeline, Dimensions)> {
        let family = hyper_param.family()?;

        let paths = if hyper_param.cross_validation {
            fold_files.clone()
        } else {
            let mut paths = vec![PathBuf::from(&hyper_param.train_set_file)];
            if !hyper_param.test_set_file.is_empty() {
                paths.push(PathBuf::from(&hyper_param.test_set_file));
            }
            paths
        };

        let parser = self.resolve_parser(hyper_param)?;
        let mut readers = paths
            .iter()
            .map(|path| self.resolve_reader(hyper_param, path, &parser))
            .collect::<Result<Vec<_>>>()?;

        let maxima = scan(&mut readers, family.is_field_aware(), &self.interrupt)?;

        let num_k = if family.is_latent() { hyper_param.num_k } else { 0 };
        let num_field = if family.is_field_aware() { maxima.max_field } else { 0 };
        let meta = ModelMeta::new(family, maxima.max_feature, num_k, num_field);

        let init = if family.is_latent() {
            Init::Gaussian {
                seed: hyper_param.seed,
            }
        } else {
            Init::Zeros
        };
        let model = Model::new(meta, init)?;
        let dims = Dimensions::from(&model);

        info!(
            "sized {family} model: {} features, {} fields, {} parameters",
            dims.num_feature, dims.num_field, dims.num_param
        );

        let mut updater = self.registry.create_updater(&hyper_param.updater_type)?;
        updater.initialize(&hyper_param.updater_params(dims.num_param))?;

        let (score, loss) = self.resolve_score_and_loss(hyper_param, &model)?;

        let pipeline = TrainPipeline {
            readers,
            fold_files,
            model,
            updater,
            score,
            loss,
        };

        Ok((pipeline, dims))
    }

    fn build_inference(self, hyper_param: HyperParam) -> Result<Solver> {
        let parser = self.resolve_parser(&hyper_param)?;
        let reader = self.resolve_reader(
            &hyper_param,
            Path::new(&hyper_param.inference_file),
            &parser,
        )?;

        let model = Model::load(&hyper_param.model_checkpoint_file)?;
        let (hyper_param, dims) = hyper_param.reconcile(&model);

        let (score, loss) = self.resolve_score_and_loss(&hyper_param, &model)?;

        Ok(Solver {
            work: Work::Inference {
                pipeline: InferencePipeline {
                    reader,
                    model,
                    score,
                    loss,
                },
                inference_loop: self
                    .inference_loop
                    .unwrap_or_else(|| Box::new(Predictor::new())),
            },
            hyper_param,
            dims,
            interrupt: self.interrupt,
        })
    }

    fn resolve_parser(&self, hyper_param: &HyperParam) -> Result<Arc<dyn Parser>> {
        let parser = self.registry.create_parser(&hyper_param.file_format)?;
        Ok(Arc::from(parser))
    }

    fn resolve_reader(
        &self,
        hyper_param: &HyperParam,
        path: &Path,
        parser: &Arc<dyn Parser>,
    ) -> Result<Box<dyn Reader>> {
        let batch_size = NonZeroUsize::new(hyper_param.batch_size)
            .ok_or_else(|| SolverErr::InvalidConfig("batch_size must be positive".into()))?;

        let mut reader = self.registry.create_reader(hyper_param.reader_key())?;
        reader.initialize(path, batch_size, Arc::clone(parser))?;
        Ok(reader)
    }

    fn resolve_score_and_loss(
        &self,
        hyper_param: &HyperParam,
        model: &Model,
    ) -> Result<(Arc<dyn Score>, Box<dyn Loss>)> {
        let mut score = self.registry.create_score(&hyper_param.score_func)?;
        score.initialize(model.layout())?;
        let score: Arc<dyn Score> = Arc::from(score);

        let mut loss = self.registry.create_loss(&hyper_param.loss_func)?;
        loss.initialize(Arc::clone(&score))?;

        Ok((score, loss))
    }
}
