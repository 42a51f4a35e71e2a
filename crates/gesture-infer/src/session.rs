use crate::InferError;
use gesture_base::Tensor;
use std::collections::HashMap;

/// A loaded model that maps named `f32` tensors to named `f32` tensors.
pub trait Session {
    fn run(
        &mut self,
        inputs: &[(&str, Tensor<f32>)],
    ) -> Result<HashMap<String, Tensor<f32>>, InferError>;

    fn input_names(&self) -> &[String];

    /// Output names in model order.
    fn output_names(&self) -> &[String];
}

/// Run a single-input model and return its outputs in model order.
pub(crate) fn run_single(
    session: &mut dyn Session,
    input: Tensor<f32>,
) -> Result<Vec<Tensor<f32>>, InferError> {
    let input_name = session
        .input_names()
        .first()
        .ok_or_else(|| InferError::Backend("model has no inputs".to_string()))?
        .clone();
    let mut outputs = session.run(&[(input_name.as_str(), input)])?;
    session
        .output_names()
        .to_vec()
        .into_iter()
        .map(|name| outputs.remove(&name).ok_or(InferError::MissingOutput(name)))
        .collect()
}
