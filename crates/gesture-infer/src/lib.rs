//! ONNX Runtime adapters for the gesture pipeline: the two arg-max
//! classifiers and the hand-landmark detector.

pub mod classifier;
pub mod error;
pub mod hand;
pub mod inference;
pub mod modelsource;
pub mod onnx;
pub mod session;

pub use classifier::{OnnxClassifier, argmax};
pub use error::InferError;
pub use hand::{HAND_INPUT_SIZE, HandLandmarker, HandLandmarkerConfig, Letterbox, postprocess, preprocess};
pub use inference::Inference;
pub use modelsource::ModelSource;
pub use onnx::OnnxSession;
pub use session::Session;
