use log::{debug, info};
use machine_learning::{
    arch::Loss,
    optimization::{SparseGrad, Updater},
    reading::Reader,
};

use super::{TrainLoop, TrainPipeline, TrainReport};
use crate::{HyperParam, Interrupt, Result, splitter};

/// Running sum of per-row losses.
#[derive(Debug, Default, Clone, Copy)]
struct LossSum {
    total: f32,
    rows: usize,
}

impl LossSum {
    fn add(&mut self, other: LossSum) {
        self.total += other.total;
        self.rows += other.rows;
    }

    fn mean(self) -> f32 {
        if self.rows == 0 {
            0.
        } else {
            self.total / self.rows as f32
        }
    }
}

/// Plain epoch based mini-batch training, optionally k-fold cross validated.
#[derive(Debug, Default)]
pub struct EpochTrainer {
    grad: SparseGrad,
}

impl EpochTrainer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs one full pass over `reader`, updating `params` after every batch.
    fn fit(
        &mut self,
        reader: &mut dyn Reader,
        params: &mut [f32],
        updater: &mut dyn Updater,
        loss: &dyn Loss,
        interrupt: &Interrupt,
    ) -> Result<LossSum> {
        let mut sum = LossSum::default();
        reader.reset()?;

        loop {
            interrupt.check()?;

            let batch = reader.samples()?;
            if batch.is_empty() {
                break;
            }

            sum.total += loss.calc_grad(batch, params, &mut self.grad)?;
            sum.rows += batch.len();
            updater.update(params, &self.grad)?;
        }

        Ok(sum)
    }

    fn train_holdout(
        &mut self,
        pipeline: &mut TrainPipeline,
        hyper_param: &HyperParam,
        interrupt: &Interrupt,
    ) -> Result<TrainReport> {
        let TrainPipeline {
            readers,
            model,
            updater,
            loss,
            ..
        } = pipeline;
        let mut report = TrainReport::default();

        let Some((train, rest)) = readers.split_first_mut() else {
            return Ok(report);
        };

        for epoch in 0..hyper_param.num_epoch {
            let train_loss = self
                .fit(
                    train.as_mut(),
                    model.params_mut(),
                    updater.as_mut(),
                    loss.as_ref(),
                    interrupt,
                )?
                .mean();
            report.train_loss.push(train_loss);

            match rest.first_mut() {
                Some(test) => {
                    let test_loss =
                        evaluate(test.as_mut(), model.params(), loss.as_ref(), interrupt)?
                            .mean();
                    report.test_loss.push(test_loss);
                    info!("epoch {epoch}: train loss {train_loss:.6}, test loss {test_loss:.6}");
                }
                None => info!("epoch {epoch}: train loss {train_loss:.6}"),
            }
        }

        Ok(report)
    }

    fn train_folds(
        &mut self,
        pipeline: &mut TrainPipeline,
        hyper_param: &HyperParam,
        interrupt: &Interrupt,
    ) -> Result<TrainReport> {
        let TrainPipeline {
            readers,
            model,
            updater,
            loss,
            ..
        } = pipeline;

        let initial = model.params().to_vec();
        let updater_params = hyper_param.updater_params(model.num_params());
        let mut losses = Vec::with_capacity(readers.len());

        for held_out in 0..readers.len() {
            model.params_mut().copy_from_slice(&initial);
            updater.initialize(&updater_params)?;

            for epoch in 0..hyper_param.num_epoch {
                let mut sum = LossSum::default();

                for (fold, reader) in readers.iter_mut().enumerate() {
                    if fold == held_out {
                        continue;
                    }

                    sum.add(self.fit(
                        reader.as_mut(),
                        model.params_mut(),
                        updater.as_mut(),
                        loss.as_ref(),
                        interrupt,
                    )?);
                }

                debug!("fold {held_out}, epoch {epoch}: train loss {:.6}", sum.mean());
            }

            let validation = evaluate(
                readers[held_out].as_mut(),
                model.params(),
                loss.as_ref(),
                interrupt,
            )?
            .mean();

            info!("fold {held_out}: validation loss {validation:.6}");
            losses.push(validation);
        }

        let cv_loss = losses.iter().sum::<f32>() / losses.len().max(1) as f32;
        info!("cross validation over {} folds: mean loss {cv_loss:.6}", losses.len());

        Ok(TrainReport {
            cv_loss: Some(cv_loss),
            ..Default::default()
        })
    }
}

impl TrainLoop for EpochTrainer {
    fn train(
        &mut self,
        pipeline: &mut TrainPipeline,
        hyper_param: &HyperParam,
        interrupt: &Interrupt,
    ) -> Result<TrainReport> {
        if hyper_param.cross_validation {
            self.train_folds(pipeline, hyper_param, interrupt)
        } else {
            self.train_holdout(pipeline, hyper_param, interrupt)
        }
    }

    fn teardown(&mut self, pipeline: TrainPipeline, hyper_param: &HyperParam) -> Result<()> {
        let TrainPipeline {
            readers,
            fold_files,
            model,
            ..
        } = pipeline;

        // Fold files are still open through their readers.
        drop(readers);
        splitter::remove_folds(&fold_files);

        if !hyper_param.cross_validation && !hyper_param.model_checkpoint_file.is_empty() {
            model.save(&hyper_param.model_checkpoint_file)?;
        }

        Ok(())
    }
}

/// Sums the loss over one full pass of `reader` without touching the parameters.
fn evaluate(
    reader: &mut dyn Reader,
    params: &[f32],
    loss: &dyn Loss,
    interrupt: &Interrupt,
) -> Result<LossSum> {
    let mut sum = LossSum::default();
    reader.reset()?;

    loop {
        interrupt.check()?;

        let batch = reader.samples()?;
        if batch.is_empty() {
            break;
        }

        sum.total += loss.evaluate(batch, params)?;
        sum.rows += batch.len();
    }

    Ok(sum)
}
