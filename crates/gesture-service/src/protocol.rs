use gesture::{ClassificationResult, Handedness};
use serde::{Deserialize, Serialize};

/// One classified hand as sent over the wire.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Prediction {
    pub class: String,
    /// `[x_min, y_min, x_max, y_max]` in pixels of the (mirrored) frame.
    pub location: [i32; 4],
    pub finger_gesture: String,
    pub hand_sign_id: usize,
    pub finger_gesture_id: usize,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub handedness: Option<Handedness>,
}

impl From<&ClassificationResult> for Prediction {
    fn from(result: &ClassificationResult) -> Self {
        Self {
            class: result.class.clone(),
            location: result.location.to_array(),
            finger_gesture: result.finger_gesture.clone(),
            hand_sign_id: result.hand_sign_id,
            finger_gesture_id: result.finger_gesture_id,
            handedness: result.handedness,
        }
    }
}

/// Body of a `POST /classify` reply.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum ClassifyResponse {
    Predictions { predictions: Vec<Prediction> },
    Error { error: String },
}

impl ClassifyResponse {
    /// First hand, if any.
    pub fn first(&self) -> Option<&Prediction> {
        match self {
            ClassifyResponse::Predictions { predictions } => predictions.first(),
            ClassifyResponse::Error { .. } => None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct HealthResponse {
    pub status: String,
    pub sessions: usize,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct ErrorResponse {
    pub error: String,
}
