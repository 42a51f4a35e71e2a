use std::fmt;

#[derive(Debug)]
pub enum InferError {
    Io(String),
    ModelLoad(String),
    Backend(String),
    ShapeMismatch { expected: String, got: String },
    MissingOutput(String),
}

impl fmt::Display for InferError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InferError::Io(msg) => write!(f, "io error: {msg}"),
            InferError::ModelLoad(msg) => write!(f, "model load error: {msg}"),
            InferError::Backend(msg) => write!(f, "backend error: {msg}"),
            InferError::ShapeMismatch { expected, got } => {
                write!(f, "shape mismatch: expected {expected}, got {got}")
            }
            InferError::MissingOutput(name) => write!(f, "model produced no output {name}"),
        }
    }
}

impl std::error::Error for InferError {}

impl From<std::io::Error> for InferError {
    fn from(err: std::io::Error) -> Self {
        InferError::Io(err.to_string())
    }
}

impl From<gesture_base::TensorError> for InferError {
    fn from(err: gesture_base::TensorError) -> Self {
        InferError::Backend(format!("failed to create tensor: {err}"))
    }
}

impl From<ort::Error> for InferError {
    fn from(err: ort::Error) -> Self {
        InferError::Backend(err.to_string())
    }
}
