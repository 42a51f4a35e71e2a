use crate::{InferError, ModelSource, Session};
use gesture_base::{Tensor, log};
use ndarray::ArrayD;
use ort::{inputs, session::Session as OrtSession, value::TensorRef};
use std::collections::HashMap;

/// `Session` backed by ONNX Runtime.
pub struct OnnxSession {
    session: OrtSession,
    input_names: Vec<String>,
    output_names: Vec<String>,
}

impl OnnxSession {
    pub(crate) fn new(session: OrtSession) -> Self {
        let input_names = session
            .inputs()
            .iter()
            .map(|input| input.name().to_string())
            .collect();
        let output_names = session
            .outputs()
            .iter()
            .map(|output| output.name().to_string())
            .collect();
        Self {
            session,
            input_names,
            output_names,
        }
    }

    pub(crate) fn commit(
        builder: ort::session::builder::SessionBuilder,
        model: ModelSource,
    ) -> Result<Self, InferError> {
        let session = match model {
            ModelSource::File(path) => {
                log::info!("Loading ONNX model {}", path.display());
                builder.commit_from_file(&path).map_err(|e| {
                    InferError::ModelLoad(format!("failed to load {}: {}", path.display(), e))
                })?
            }
            ModelSource::Memory(bytes) => builder.commit_from_memory(&bytes).map_err(|e| {
                InferError::ModelLoad(format!("failed to load model from memory: {}", e))
            })?,
        };
        let session = Self::new(session);
        log::debug!(
            "ONNX model inputs {:?}, outputs {:?}",
            session.input_names,
            session.output_names
        );
        Ok(session)
    }
}

impl Session for OnnxSession {
    fn run(
        &mut self,
        inputs: &[(&str, Tensor<f32>)],
    ) -> Result<HashMap<String, Tensor<f32>>, InferError> {
        // every model in this workspace takes exactly one tensor
        let [(name, tensor)] = inputs else {
            return Err(InferError::Backend(format!(
                "expected 1 input, got {}",
                inputs.len()
            )));
        };
        if !self.input_names.iter().any(|n| n == name) {
            return Err(InferError::Backend(format!(
                "unknown input '{}', model expects {:?}",
                name, self.input_names
            )));
        }

        let array = tensor_to_ndarray(tensor.clone())?;
        let tensor_ref = TensorRef::from_array_view(array.view())
            .map_err(|e| InferError::Backend(format!("failed to create tensor ref: {}", e)))?;
        let outputs = self
            .session
            .run(inputs![*name => tensor_ref])
            .map_err(|e| InferError::Backend(format!("inference failed: {}", e)))?;

        let mut result = HashMap::new();
        for output_name in &self.output_names {
            let array = outputs[output_name.as_str()]
                .try_extract_array::<f32>()
                .map_err(|e| {
                    InferError::Backend(format!("output '{}' is not f32: {}", output_name, e))
                })?;
            result.insert(output_name.clone(), ndarray_to_tensor(array)?);
        }
        Ok(result)
    }

    fn input_names(&self) -> &[String] {
        &self.input_names
    }

    fn output_names(&self) -> &[String] {
        &self.output_names
    }
}

pub fn tensor_to_ndarray(tensor: Tensor<f32>) -> Result<ArrayD<f32>, InferError> {
    ArrayD::from_shape_vec(tensor.shape, tensor.data)
        .map_err(|e| InferError::Backend(format!("failed to create ndarray from tensor: {}", e)))
}

pub fn ndarray_to_tensor(
    array: ndarray::ArrayView<'_, f32, ndarray::IxDyn>,
) -> Result<Tensor<f32>, InferError> {
    let shape = array.shape().to_vec();
    let data = array.iter().copied().collect();
    Ok(Tensor::new(shape, data)?)
}
