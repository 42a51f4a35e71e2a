//! Hand-sign and finger-gesture recognition pipeline.
//!
//! Per hand and frame: pixel landmarks are normalized into a keypoint feature
//! vector and classified; the index fingertip (or a `(0, 0)` marker) is pushed
//! onto a point history; once the history is full it is normalized and
//! classified as a motion gesture; the last gesture ids are reduced to a
//! stable label by majority vote.
//!
//! Detection and classification are supplied through the [`HandDetector`] and
//! [`Classifier`] traits. All mutable state lives in a [`GestureSession`].

pub mod capability;
pub mod error;
pub mod history;
pub mod labels;
pub mod landmark;
pub mod normalize;
pub mod pipeline;
pub mod session;

pub use capability::{Classifier, DetectedHand, HandDetector, Handedness};
pub use error::{GestureError, LabelTable};
pub use history::{GestureHistory, HISTORY_LENGTH, History, NO_GESTURE, PointHistory};
pub use labels::Labels;
pub use landmark::{FrameSize, HandLandmarks, LANDMARK_COUNT, NormalizedLandmark};
pub use normalize::{normalize_landmarks, normalize_point_history};
pub use pipeline::{ClassificationResult, GestureRecognizer, POINTING_SIGN_ID, PipelineConfig};
pub use session::GestureSession;
