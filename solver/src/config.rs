use std::{fs::File, io::BufReader, path::Path};

use log::{info, warn};
use machine_learning::{
    ComponentKind, Registry,
    model::{Model, ModelFamily},
    optimization::UpdaterParams,
};
use serde::{Deserialize, Serialize};

use crate::{Result, SolverErr};

/// The two mutually exclusive ways of running a solver.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Mode {
    #[default]
    Train,
    Inference,
}

/// The configuration of a single run.
///
/// Empty paths stand for absent files. Fields missing from the JSON file take the
/// values of `HyperParam::default`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct HyperParam {
    pub mode: Mode,
    pub train_set_file: String,
    pub test_set_file: String,
    pub inference_file: String,
    pub model_checkpoint_file: String,
    /// Where predictions are written, `<inference_file>.out` if empty.
    pub output_file: String,
    pub cross_validation: bool,
    pub num_folds: usize,
    pub batch_size: usize,
    pub score_func: String,
    pub loss_func: String,
    pub updater_type: String,
    pub file_format: String,
    pub on_disk: bool,
    pub num_k: usize,
    pub num_epoch: usize,
    pub learning_rate: f32,
    pub regu_lambda: f32,
    pub momentum: f32,
    pub beta1: f32,
    pub beta2: f32,
    pub epsilon: f32,
    pub seed: Option<u64>,
}

impl Default for HyperParam {
    fn default() -> Self {
        let updater = UpdaterParams::default();

        Self {
            mode: Mode::Train,
            train_set_file: String::new(),
            test_set_file: String::new(),
            inference_file: String::new(),
            model_checkpoint_file: String::new(),
            output_file: String::new(),
            cross_validation: false,
            num_folds: 5,
            batch_size: 256,
            score_func: ModelFamily::Linear.to_string(),
            loss_func: "cross_entropy".to_string(),
            updater_type: "sgd".to_string(),
            file_format: "libsvm".to_string(),
            on_disk: false,
            num_k: 4,
            num_epoch: 10,
            learning_rate: updater.learning_rate,
            regu_lambda: 0.00002,
            momentum: updater.momentum,
            beta1: updater.beta1,
            beta2: updater.beta2,
            epsilon: updater.epsilon,
            seed: None,
        }
    }
}

/// Dimensions derived while assembling a run, written exactly once.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct Dimensions {
    pub num_feature: usize,
    pub num_field: usize,
    pub num_param: usize,
}

impl From<&Model> for Dimensions {
    fn from(model: &Model) -> Self {
        Self {
            num_feature: model.num_feature(),
            num_field: model.num_field(),
            num_param: model.num_params(),
        }
    }
}

impl HyperParam {
    /// Reads a configuration from a JSON file.
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let file = BufReader::new(File::open(path)?);
        Ok(serde_json::from_reader(file)?)
    }

    /// Checks this configuration can be assembled into a pipeline.
    ///
    /// # Arguments
    /// * `registry` - The registry the components will be created from.
    ///
    /// # Returns
    /// The first problem found, before any file is touched.
    pub fn validate(&self, registry: &Registry) -> Result<()> {
        if self.batch_size == 0 {
            return invalid("batch_size must be positive");
        }

        registry.check(ComponentKind::Parser, &self.file_format)?;
        registry.check(ComponentKind::Reader, self.reader_key())?;
        registry.check(ComponentKind::Loss, &self.loss_func)?;

        match self.mode {
            Mode::Train => self.validate_train(registry),
            Mode::Inference => self.validate_inference(),
        }
    }

    /// The caller's family only matters when training, inference takes it from the
    /// checkpoint.
    fn validate_train(&self, registry: &Registry) -> Result<()> {
        registry.check(ComponentKind::Score, &self.score_func)?;
        registry.check(ComponentKind::Updater, &self.updater_type)?;

        if self.train_set_file.is_empty() {
            return invalid("train_set_file must be set when training");
        }
        if self.cross_validation && self.num_folds == 0 {
            return invalid("num_folds must be positive when cross validating");
        }
        if self.num_epoch == 0 {
            return invalid("num_epoch must be positive");
        }
        if self.family()?.is_latent() && self.num_k == 0 {
            return invalid("num_k must be positive for latent factor models");
        }

        Ok(())
    }

    fn validate_inference(&self) -> Result<()> {
        if self.inference_file.is_empty() {
            return invalid("inference_file must be set for inference");
        }
        if self.model_checkpoint_file.is_empty() {
            return invalid("model_checkpoint_file must be set for inference");
        }

        Ok(())
    }

    /// The model family named by `score_func`.
    pub fn family(&self) -> Result<ModelFamily> {
        Ok(self.score_func.parse()?)
    }

    /// The registry key of the reader selected by `on_disk`.
    pub fn reader_key(&self) -> &'static str {
        if self.on_disk { "disk" } else { "memory" }
    }

    /// The file predictions are written to.
    pub fn output_path(&self) -> String {
        if self.output_file.is_empty() {
            format!("{}.out", self.inference_file)
        } else {
            self.output_file.clone()
        }
    }

    /// The updater hyper parameters for a model of `num_param` parameters.
    pub fn updater_params(&self, num_param: usize) -> UpdaterParams {
        UpdaterParams {
            num_param,
            learning_rate: self.learning_rate,
            regu_lambda: self.regu_lambda,
            momentum: self.momentum,
            beta1: self.beta1,
            beta2: self.beta2,
            epsilon: self.epsilon,
        }
    }

    /// Replaces the family and dimensions of this configuration with the ones a loaded
    /// model was trained with, discarding whatever the caller supplied.
    ///
    /// # Arguments
    /// * `model` - The loaded model.
    ///
    /// # Returns
    /// The reconciled configuration and the dimensions of the model.
    pub fn reconcile(mut self, model: &Model) -> (Self, Dimensions) {
        let meta = model.meta();
        let family = meta.family.as_str();
        if self.score_func != family {
            warn!(
                "score_func {:?} overridden by the checkpoint's {family:?}",
                self.score_func
            );
            self.score_func = family.to_string();
        }

        if meta.family.is_latent() && self.num_k != meta.num_k {
            warn!("num_k {} overridden by the checkpoint's {}", self.num_k, meta.num_k);
            self.num_k = meta.num_k;
        }

        let dims = Dimensions::from(model);
        info!(
            "reconciled from checkpoint: {family} with {} features, {} fields, {} params",
            dims.num_feature, dims.num_field, dims.num_param
        );

        (self, dims)
    }
}

fn invalid<T>(msg: &str) -> Result<T> {
    Err(SolverErr::InvalidConfig(msg.to_string()))
}

#[cfg(test)]
mod tests {
    use machine_learning::{
        MlErr,
        model::{Init, ModelMeta},
    };

    use super::*;

    #[test]
    fn missing_fields_take_defaults() {
        let json = r#"{ "train_set_file": "train.txt", "score_func": "fm", "num_k": 8 }"#;
        let hp: HyperParam = serde_json::from_str(json).unwrap();

        assert_eq!(hp.mode, Mode::Train);
        assert_eq!(hp.family().unwrap(), ModelFamily::Fm);
        assert_eq!(hp.num_k, 8);
        assert_eq!(hp.batch_size, 256);
        assert_eq!(hp.reader_key(), "memory");
        assert!(hp.validate(Registry::global()).is_ok());
    }

    #[test]
    fn mode_is_snake_case() {
        let hp: HyperParam = serde_json::from_str(r#"{ "mode": "inference" }"#).unwrap();
        assert_eq!(hp.mode, Mode::Inference);
    }

    #[test]
    fn required_paths_are_enforced() {
        let registry = Registry::global();

        let hp = HyperParam::default();
        assert!(matches!(hp.validate(registry), Err(SolverErr::InvalidConfig(_))));

        let hp = HyperParam {
            mode: Mode::Inference,
            inference_file: "test.txt".to_string(),
            ..Default::default()
        };
        assert!(matches!(hp.validate(registry), Err(SolverErr::InvalidConfig(_))));
    }

    #[test]
    fn inference_skips_the_score_key() {
        let hp = HyperParam {
            mode: Mode::Inference,
            inference_file: "test.txt".to_string(),
            model_checkpoint_file: "model.json".to_string(),
            score_func: "bogus".to_string(),
            ..Default::default()
        };
        assert!(hp.validate(Registry::global()).is_ok());

        let hp = HyperParam {
            mode: Mode::Train,
            train_set_file: "train.txt".to_string(),
            ..hp
        };
        let err = hp.validate(Registry::global()).unwrap_err();
        assert!(matches!(err, SolverErr::Ml(MlErr::UnknownComponent { .. })));
    }

    #[test]
    fn zero_folds_and_zero_k_are_rejected() {
        let registry = Registry::global();
        let base = HyperParam {
            train_set_file: "train.txt".to_string(),
            ..Default::default()
        };

        let hp = HyperParam {
            cross_validation: true,
            num_folds: 0,
            ..base.clone()
        };
        assert!(matches!(hp.validate(registry), Err(SolverErr::InvalidConfig(_))));

        let hp = HyperParam {
            score_func: "ffm".to_string(),
            num_k: 0,
            ..base
        };
        assert!(matches!(hp.validate(registry), Err(SolverErr::InvalidConfig(_))));
    }

    #[test]
    fn empty_registry_rejects_every_key() {
        let mut registry = Registry::with_defaults();
        let hp = HyperParam {
            train_set_file: "train.txt".to_string(),
            on_disk: true,
            ..Default::default()
        };
        assert!(hp.validate(&registry).is_ok());

        registry = Registry::empty();
        let err = hp.validate(&registry).unwrap_err();
        assert!(matches!(err, SolverErr::Ml(MlErr::UnknownComponent { .. })));
    }

    #[test]
    fn reconcile_overrides_family_and_dims() {
        let hp = HyperParam {
            mode: Mode::Inference,
            score_func: "linear".to_string(),
            num_k: 16,
            ..Default::default()
        };
        let meta = ModelMeta::new(ModelFamily::Ffm, 10, 2, 3);
        let model = Model::new(meta, Init::Zeros).unwrap();

        let (hp, dims) = hp.reconcile(&model);

        assert_eq!(hp.score_func, "ffm");
        assert_eq!(hp.num_k, 2);
        assert_eq!(
            dims,
            Dimensions {
                num_feature: 10,
                num_field: 3,
                num_param: 11 + 60,
            }
        );
    }

    #[test]
    fn default_output_path_follows_the_inference_file() {
        let mut hp = HyperParam {
            inference_file: "test.txt".to_string(),
            ..Default::default()
        };
        assert_eq!(hp.output_path(), "test.txt.out");

        hp.output_file = "preds.txt".to_string();
        assert_eq!(hp.output_path(), "preds.txt");
    }
}
