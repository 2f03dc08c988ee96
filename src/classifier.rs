use std::path::Path;

use ndarray::Array4;
use tract_core::prelude::{Tensor, TypedModel, TypedRunnableModel};
use tract_onnx::prelude::*;
use tracing::{debug, info};

use crate::error::{Result, ServiceError};
use crate::models::Diagnosis;

/// Scores a preprocessed `(1, size, size, 3)` input.
pub trait Classifier: Send + Sync {
    /// Probability of the stroke class, in [0, 1].
    fn score(&self, input: Array4<f32>) -> Result<f32>;
}

pub fn diagnose(score: f32, threshold: f32) -> Diagnosis {
    if score > threshold {
        Diagnosis::StrokeDetected
    } else {
        Diagnosis::NoStrokeDetected
    }
}

/// Binary classifier exported to ONNX with a single sigmoid output.
pub struct OnnxClassifier {
    plan: TypedRunnableModel<TypedModel>,
    size: usize,
}

impl OnnxClassifier {
    pub fn load(path: impl AsRef<Path>, size: u32) -> Result<Self> {
        let path = path.as_ref();
        let side = size as usize;

        let plan = tract_onnx::onnx()
            .model_for_path(path)
            .map_err(|e| ServiceError::Model(format!("load {}: {}", path.display(), e)))?
            .with_input_fact(
                0,
                InferenceFact::dt_shape(f32::datum_type(), tvec!(1, side, side, 3)),
            )
            .map_err(|e| ServiceError::Model(e.to_string()))?
            .into_optimized()
            .map_err(|e| ServiceError::Model(format!("optimize: {}", e)))?
            .into_runnable()
            .map_err(|e| ServiceError::Model(format!("runnable: {}", e)))?;

        info!(model = %path.display(), size, "model loaded");
        Ok(Self { plan, size: side })
    }
}

impl Classifier for OnnxClassifier {
    fn score(&self, input: Array4<f32>) -> Result<f32> {
        let shape = [1, self.size, self.size, 3];
        if input.shape() != shape {
            return Err(ServiceError::Inference(format!(
                "expected input shape {:?}, got {:?}",
                shape,
                input.shape()
            )));
        }

        let tensor = Tensor::from_shape(&shape, &input.into_raw_vec())
            .map_err(|e| ServiceError::Inference(e.to_string()))?;

        let outputs = self
            .plan
            .run(tvec!(tensor.into()))
            .map_err(|e| ServiceError::Inference(e.to_string()))?;

        let view = outputs[0]
            .to_array_view::<f32>()
            .map_err(|e| ServiceError::Inference(e.to_string()))?;
        first_score(view.iter())
    }
}

/// First element of the model output, clamped to [0, 1].
fn first_score<'a>(values: impl IntoIterator<Item = &'a f32>) -> Result<f32> {
    let score = values
        .into_iter()
        .next()
        .copied()
        .ok_or_else(|| ServiceError::Inference("model returned an empty output".into()))?;

    debug!(score, "raw model output");
    Ok(score.clamp(0.0, 1.0))
}
