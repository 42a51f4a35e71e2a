//! The capabilities the pipeline consumes but does not implement: a hand
//! detector and the two classifiers. Runtime-backed implementations live in
//! `gesture-infer`; tests use hand-written fakes.

use crate::{GestureError, NormalizedLandmark};
use gesture_base::Tensor;
use serde::{Deserialize, Serialize};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Handedness {
    Left,
    Right,
}

/// One hand reported by a detector.
#[derive(Debug, Clone, PartialEq)]
pub struct DetectedHand {
    pub landmarks: Vec<NormalizedLandmark>,
    pub handedness: Option<Handedness>,
    pub score: f32,
}

impl DetectedHand {
    pub fn new(landmarks: Vec<NormalizedLandmark>) -> Self {
        Self {
            landmarks,
            handedness: None,
            score: 1.0,
        }
    }
}

/// Finds hands in an RGB frame (`Tensor<u8>`, HWC, 3 channels).
pub trait HandDetector {
    fn detect(&mut self, image: &Tensor<u8>) -> Result<Vec<DetectedHand>, GestureError>;
}

/// Maps a feature vector to a class id in `0..num_classes()`.
pub trait Classifier {
    fn classify(&mut self, features: &[f32]) -> Result<usize, GestureError>;

    fn num_classes(&self) -> usize;
}

impl<C: Classifier + ?Sized> Classifier for Box<C> {
    fn classify(&mut self, features: &[f32]) -> Result<usize, GestureError> {
        (**self).classify(features)
    }

    fn num_classes(&self) -> usize {
        (**self).num_classes()
    }
}

impl<D: HandDetector + ?Sized> HandDetector for Box<D> {
    fn detect(&mut self, image: &Tensor<u8>) -> Result<Vec<DetectedHand>, GestureError> {
        (**self).detect(image)
    }
}
