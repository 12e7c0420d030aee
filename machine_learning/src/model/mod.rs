mod family;
mod layout;

use std::{
    fs::File,
    io::{BufReader, BufWriter, Write},
    path::Path,
};

use log::info;
use rand::{SeedableRng, rngs::StdRng};
use serde::{Deserialize, Serialize};

pub use family::{ModelFamily, UnknownFamily};
pub use layout::ParamLayout;

use crate::{
    MlErr, Result,
    initialization::{ConstParamGen, ParamGen, RandParamGen},
};

/// The dimensional metadata of a model.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct ModelMeta {
    pub family: ModelFamily,
    pub num_feature: usize,
    pub num_k: usize,
    pub num_field: usize,
}

impl ModelMeta {
    pub fn new(family: ModelFamily, num_feature: usize, num_k: usize, num_field: usize) -> Self {
        Self {
            family,
            num_feature,
            num_k,
            num_field,
        }
    }

    /// The amount of parameters a model with this metadata holds.
    ///
    /// # Returns
    /// `MlErr::TooManyParams` if the count overflows or can't be allocated as `f32`s.
    pub fn num_params(&self) -> Result<usize> {
        const MAX_PARAMS: usize = isize::MAX as usize / size_of::<f32>();

        self.family
            .num_params(self.num_feature, self.num_field, self.num_k)
            .filter(|&len| len <= MAX_PARAMS)
            .ok_or(MlErr::TooManyParams(*self))
    }
}

/// How the parameters of a fresh model get their initial values.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Init {
    Zeros,
    /// N(0, 1/sqrt(k)), seeded from the OS when `seed` is `None`.
    Gaussian { seed: Option<u64> },
}

/// An owned parameter vector plus the metadata describing its layout.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Model {
    meta: ModelMeta,
    params: Vec<f32>,
}

impl Model {
    /// Creates a fresh model sized after its metadata.
    ///
    /// # Arguments
    /// * `meta` - The family and dimensions of the model.
    /// * `init` - The initialization strategy for the parameters.
    ///
    /// # Returns
    /// A new model or an error if the initial distribution is invalid.
    pub fn new(meta: ModelMeta, init: Init) -> Result<Self> {
        let len = meta.num_params()?;

        let params = match init {
            Init::Zeros => ConstParamGen::zeros(len).collect(len),
            Init::Gaussian { seed } => {
                let rng = match seed {
                    Some(seed) => StdRng::seed_from_u64(seed),
                    None => StdRng::from_os_rng(),
                };
                RandParamGen::latent(rng, len, meta.num_k)?.collect(len)
            }
        };

        Ok(Self { meta, params })
    }

    /// Loads a model from a checkpoint written by `save`.
    ///
    /// # Returns
    /// An error if the file can't be read, can't be decoded or its parameter count
    /// disagrees with its own metadata.
    pub fn load<P: AsRef<Path>>(path: P) -> Result<Self> {
        let path = path.as_ref();
        let file = BufReader::new(File::open(path)?);
        let model: Model = serde_json::from_reader(file)?;

        let expected = model.meta.num_params()?;
        if model.params.len() != expected {
            return Err(MlErr::SizeMismatch {
                what: "checkpoint parameters",
                got: model.params.len(),
                expected,
            });
        }

        info!(
            "loaded {} model with {} parameters from {}",
            model.meta.family,
            expected,
            path.display()
        );
        Ok(model)
    }

    /// Writes this model as a checkpoint.
    pub fn save<P: AsRef<Path>>(&self, path: P) -> Result<()> {
        let path = path.as_ref();
        let mut file = BufWriter::new(File::create(path)?);
        serde_json::to_writer(&mut file, self)?;
        file.flush()?;

        info!("saved model checkpoint to {}", path.display());
        Ok(())
    }

    #[inline]
    pub fn meta(&self) -> &ModelMeta {
        &self.meta
    }

    #[inline]
    pub fn family(&self) -> ModelFamily {
        self.meta.family
    }

    #[inline]
    pub fn num_feature(&self) -> usize {
        self.meta.num_feature
    }

    #[inline]
    pub fn num_k(&self) -> usize {
        self.meta.num_k
    }

    #[inline]
    pub fn num_field(&self) -> usize {
        self.meta.num_field
    }

    #[inline]
    pub fn num_params(&self) -> usize {
        self.params.len()
    }

    pub fn layout(&self) -> ParamLayout {
        ParamLayout::sized(&self.meta, self.params.len())
    }

    #[inline]
    pub fn params(&self) -> &[f32] {
        &self.params
    }

    #[inline]
    pub fn params_mut(&mut self) -> &mut [f32] {
        &mut self.params
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn linear_model_starts_at_zero() {
        let meta = ModelMeta::new(ModelFamily::Linear, 7, 0, 0);
        let model = Model::new(meta, Init::Zeros).unwrap();

        assert_eq!(model.num_params(), 8);
        assert!(model.params().iter().all(|&p| p == 0.));
    }

    #[test]
    fn gaussian_model_is_sized_and_seeded() {
        let meta = ModelMeta::new(ModelFamily::Ffm, 50, 8, 3);
        let a = Model::new(meta, Init::Gaussian { seed: Some(1) }).unwrap();
        let b = Model::new(meta, Init::Gaussian { seed: Some(1) }).unwrap();

        assert_eq!(a.num_params(), 1251);
        assert_eq!(a, b);
    }

    #[test]
    fn checkpoint_keeps_meta_and_params() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");

        let meta = ModelMeta::new(ModelFamily::Fm, 10, 2, 0);
        let model = Model::new(meta, Init::Gaussian { seed: Some(3) }).unwrap();
        model.save(&path).unwrap();

        let loaded = Model::load(&path).unwrap();
        assert_eq!(loaded.family(), ModelFamily::Fm);
        assert_eq!(loaded.num_feature(), 10);
        assert_eq!(loaded.num_k(), 2);
        assert_eq!(loaded.params(), model.params());
    }

    #[test]
    fn truncated_checkpoint_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");

        let json = r#"{
            "meta": { "family": "fm", "num_feature": 4, "num_k": 2, "num_field": 0 },
            "params": [0.0, 1.0]
        }"#;
        std::fs::write(&path, json).unwrap();

        let err = Model::load(&path).unwrap_err();
        assert!(matches!(
            err,
            MlErr::SizeMismatch {
                got: 2,
                expected: 13,
                ..
            }
        ));
    }

    #[test]
    fn oversized_checkpoint_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");

        let meta = ModelMeta::new(ModelFamily::Fm, usize::MAX / 2, 4, 0);
        let json = serde_json::json!({ "meta": meta, "params": [0.0] });
        std::fs::write(&path, json.to_string()).unwrap();

        let err = Model::load(&path).unwrap_err();
        assert!(matches!(err, MlErr::TooManyParams(m) if m == meta));
    }

    #[test]
    fn oversized_model_is_not_allocated() {
        let meta = ModelMeta::new(ModelFamily::Linear, usize::MAX, 0, 0);
        assert!(matches!(meta.num_params(), Err(MlErr::TooManyParams(_))));

        let meta = ModelMeta::new(ModelFamily::Ffm, usize::MAX / 8, 3, 2);
        let err = Model::new(meta, Init::Gaussian { seed: Some(0) }).unwrap_err();
        assert!(matches!(err, MlErr::TooManyParams(_)));

        let meta = ModelMeta::new(ModelFamily::Linear, isize::MAX as usize / 2, 0, 0);
        assert!(Model::new(meta, Init::Zeros).is_err());
    }

    #[test]
    fn garbage_checkpoint_is_rejected() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("model.json");
        std::fs::write(&path, "not json").unwrap();

        assert!(matches!(Model::load(&path), Err(MlErr::Checkpoint(_))));
    }
}
