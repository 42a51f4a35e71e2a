use crate::{
    HandLandmarker, HandLandmarkerConfig, InferError, ModelSource, OnnxClassifier, OnnxSession,
};
use gesture_base::log;
use ort::session::Session as OrtSession;
use std::{path::Path, sync::OnceLock};

static ORT_INIT: OnceLock<()> = OnceLock::new();

fn ensure_ort_init() {
    ORT_INIT.get_or_init(|| {
        let _ = ort::init().with_name("gesture").commit();
    });
}

#[derive(Debug, Clone, Copy)]
enum OnnxDevice {
    Cpu,
    #[allow(dead_code)]
    Cuda(usize),
}

/// Factory for the models the service needs, all sharing one device choice.
#[derive(Debug)]
pub struct Inference {
    device: OnnxDevice,
    intra_threads: usize,
}

impl Inference {
    pub fn cpu() -> Self {
        ensure_ort_init();
        log::info!("Inference device: CPU");
        Self {
            device: OnnxDevice::Cpu,
            intra_threads: 1,
        }
    }

    #[cfg(feature = "cuda")]
    pub fn cuda(ordinal: usize) -> Self {
        ensure_ort_init();
        log::info!("Inference device: CUDA (ordinal {})", ordinal);
        Self {
            device: OnnxDevice::Cuda(ordinal),
            intra_threads: 1,
        }
    }

    /// Threads per model; the classifiers are tiny so 1 is usually right.
    pub fn with_intra_threads(mut self, threads: usize) -> Self {
        self.intra_threads = threads.max(1);
        self
    }

    pub fn onnx_session(&self, model: impl Into<ModelSource>) -> Result<OnnxSession, InferError> {
        let builder = OrtSession::builder()?.with_intra_threads(self.intra_threads)?;
        let builder = match self.device {
            OnnxDevice::Cpu => builder.with_execution_providers([
                ort::execution_providers::CPUExecutionProvider::default().build(),
            ])?,
            #[cfg(feature = "cuda")]
            OnnxDevice::Cuda(ordinal) => builder.with_execution_providers([
                ort::execution_providers::CUDAExecutionProvider::default()
                    .with_device_id(ordinal as i32)
                    .build(),
                ort::execution_providers::CPUExecutionProvider::default().build(),
            ])?,
            #[cfg(not(feature = "cuda"))]
            OnnxDevice::Cuda(_) => {
                return Err(InferError::Backend("CUDA feature not enabled".to_string()));
            }
        };
        OnnxSession::commit(builder, model.into())
    }

    /// Hand-sign classifier over the 42 normalized landmark coordinates.
    pub fn use_keypoint_classifier(
        &self,
        model_path: impl AsRef<Path>,
        input_len: usize,
    ) -> Result<OnnxClassifier, InferError> {
        let session = self.onnx_session(model_path.as_ref())?;
        OnnxClassifier::new(Box::new(session), input_len)
    }

    /// Finger-gesture classifier over the normalized point history. Best
    /// scores under `score_threshold` are reported as class 0.
    pub fn use_point_history_classifier(
        &self,
        model_path: impl AsRef<Path>,
        input_len: usize,
        score_threshold: f32,
    ) -> Result<OnnxClassifier, InferError> {
        let session = self.onnx_session(model_path.as_ref())?;
        Ok(OnnxClassifier::new(Box::new(session), input_len)?
            .with_score_threshold(score_threshold, gesture::NO_GESTURE))
    }

    pub fn use_hand_landmarker(
        &self,
        model_path: impl AsRef<Path>,
        config: HandLandmarkerConfig,
    ) -> Result<HandLandmarker, InferError> {
        let session = self.onnx_session(model_path.as_ref())?;
        Ok(HandLandmarker::new(Box::new(session), config))
    }
}
