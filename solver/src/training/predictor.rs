use std::{
    fs::File,
    io::{BufWriter, Write},
    path::PathBuf,
};

use log::info;

use super::{InferenceLoop, InferencePipeline, InferenceReport};
use crate::{HyperParam, Interrupt, Result};

/// Writes one prediction per row of the inference file.
#[derive(Debug, Default)]
pub struct Predictor {
    out: Option<BufWriter<File>>,
    preds: Vec<f32>,
}

impl Predictor {
    pub fn new() -> Self {
        Self::default()
    }
}

impl InferenceLoop for Predictor {
    fn infer(
        &mut self,
        pipeline: &mut InferencePipeline,
        hyper_param: &HyperParam,
        interrupt: &Interrupt,
    ) -> Result<InferenceReport> {
        let InferencePipeline {
            reader,
            model,
            loss,
            ..
        } = pipeline;

        let output = PathBuf::from(hyper_param.output_path());
        let out = self.out.insert(BufWriter::new(File::create(&output)?));
        let mut num_predictions = 0;

        reader.reset()?;
        loop {
            interrupt.check()?;

            let batch = reader.samples()?;
            if batch.is_empty() {
                break;
            }

            self.preds.clear();
            loss.predict(batch, model.params(), &mut self.preds)?;

            for pred in &self.preds {
                writeln!(out, "{pred}")?;
            }
            num_predictions += self.preds.len();
        }

        out.flush()?;
        info!("wrote {num_predictions} predictions to {}", output.display());

        Ok(InferenceReport {
            num_predictions,
            output,
        })
    }

    fn teardown(&mut self, pipeline: InferencePipeline, _: &HyperParam) -> Result<()> {
        drop(pipeline);

        if let Some(mut out) = self.out.take() {
            out.flush()?;
        }

        Ok(())
    }
}
