use crate::{
    Classifier, DetectedHand, FrameSize, GestureError, GestureSession, HISTORY_LENGTH,
    HandLandmarks, Handedness, Labels, NO_GESTURE,
    normalize::{normalize_landmarks, normalize_point_history},
};
use gesture_base::{Rect, Vec2, log};
use serde::{Serialize, Serializer};

/// Keypoint class whose index fingertip feeds the point history.
pub const POINTING_SIGN_ID: usize = 8;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PipelineConfig {
    history_length: usize,
    tracked_sign_id: usize,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            history_length: HISTORY_LENGTH,
            tracked_sign_id: POINTING_SIGN_ID,
        }
    }
}

impl PipelineConfig {
    /// Window length of both histories; the point-history classifier expects
    /// `2 * history_length` inputs.
    pub fn with_history_length(mut self, history_length: usize) -> Self {
        self.history_length = history_length;
        self
    }

    pub fn with_tracked_sign_id(mut self, tracked_sign_id: usize) -> Self {
        self.tracked_sign_id = tracked_sign_id;
        self
    }

    pub fn history_length(&self) -> usize {
        self.history_length
    }

    pub fn tracked_sign_id(&self) -> usize {
        self.tracked_sign_id
    }
}

fn serialize_location<S: Serializer>(rect: &Rect<i32>, serializer: S) -> Result<S::Ok, S::Error> {
    rect.to_array().serialize(serializer)
}

/// Decision for one hand in one frame.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ClassificationResult {
    pub class: String,
    /// Serialized as `[x_min, y_min, x_max, y_max]`.
    #[serde(serialize_with = "serialize_location")]
    pub location: Rect<i32>,
    pub finger_gesture: String,
    pub hand_sign_id: usize,
    pub finger_gesture_id: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub handedness: Option<Handedness>,
}

/// Runs the keypoint classifier, the point-history classifier and the
/// majority vote for each hand, updating a caller-owned `GestureSession`.
pub struct GestureRecognizer<K = Box<dyn Classifier + Send>, T = Box<dyn Classifier + Send>> {
    keypoint: K,
    point_history: T,
    keypoint_labels: Labels,
    point_history_labels: Labels,
    config: PipelineConfig,
}

impl<K: Classifier, T: Classifier> GestureRecognizer<K, T> {
    /// Fails with `ConfigurationMismatch` when a label table does not cover
    /// its classifier's classes exactly, and with `InvalidConfig` for a zero
    /// history length.
    pub fn new(
        keypoint: K,
        point_history: T,
        keypoint_labels: Labels,
        point_history_labels: Labels,
        config: PipelineConfig,
    ) -> Result<Self, GestureError> {
        if config.history_length == 0 {
            return Err(GestureError::InvalidConfig(
                "history length must be at least 1".to_string(),
            ));
        }
        keypoint_labels.validate(keypoint.num_classes())?;
        point_history_labels.validate(point_history.num_classes())?;
        Ok(Self {
            keypoint,
            point_history,
            keypoint_labels,
            point_history_labels,
            config,
        })
    }

    pub fn config(&self) -> &PipelineConfig {
        &self.config
    }

    /// A fresh session sized for this recognizer.
    pub fn new_session(&self) -> GestureSession {
        GestureSession::new(self.config.history_length)
    }

    /// Classify one hand and advance the session.
    ///
    /// The session is updated only if every step succeeds.
    pub fn process_hand(
        &mut self,
        session: &mut GestureSession,
        landmarks: &HandLandmarks,
        frame: FrameSize,
    ) -> Result<ClassificationResult, GestureError> {
        let location = landmarks.bounding_box();

        let features = normalize_landmarks(landmarks)?;
        let hand_sign_id = self.keypoint.classify(&features)?;
        let class = self.keypoint_labels.get(hand_sign_id)?.to_string();

        let mut point_history = session.point_history().clone();
        if hand_sign_id == self.config.tracked_sign_id {
            point_history.push(landmarks.index_tip());
        } else {
            point_history.push(Vec2::zero());
        }

        let history_features = normalize_point_history(&point_history, frame);
        let finger_gesture_id = if history_features.len() == point_history.capacity() * 2 {
            self.point_history.classify(&history_features)?
        } else {
            NO_GESTURE
        };

        let mut gesture_history = session.gesture_history().clone();
        gesture_history.record(finger_gesture_id);
        let most_common = gesture_history.most_common();
        let finger_gesture = self.point_history_labels.get(most_common)?.to_string();

        session.commit(point_history, gesture_history);
        log::debug!(
            "hand sign {} ({}), finger gesture {} -> {} ({})",
            hand_sign_id,
            class,
            finger_gesture_id,
            most_common,
            finger_gesture
        );

        Ok(ClassificationResult {
            class,
            location,
            finger_gesture,
            hand_sign_id,
            finger_gesture_id,
            handedness: None,
        })
    }

    /// Classify every detected hand in detector order.
    ///
    /// No hands: `NoHandDetected` and the session is untouched. Hands failing
    /// with a recoverable error are skipped; if none succeeds the first such
    /// error is returned. Any error leaves the session as it was before the
    /// frame.
    pub fn process_frame(
        &mut self,
        session: &mut GestureSession,
        hands: &[DetectedHand],
        frame: FrameSize,
    ) -> Result<Vec<ClassificationResult>, GestureError> {
        if hands.is_empty() {
            return Err(GestureError::NoHandDetected);
        }

        let mut staged = session.clone();
        let mut results = Vec::with_capacity(hands.len());
        let mut first_error = None;
        for (index, hand) in hands.iter().enumerate() {
            let outcome = HandLandmarks::from_normalized(&hand.landmarks, frame)
                .and_then(|landmarks| self.process_hand(&mut staged, &landmarks, frame));
            match outcome {
                Ok(mut result) => {
                    result.handedness = hand.handedness;
                    results.push(result);
                }
                Err(e) if e.is_recoverable() => {
                    log::warn!("Skipping hand {}: {}", index, e);
                    first_error.get_or_insert(e);
                }
                Err(e) => return Err(e),
            }
        }

        match first_error {
            Some(e) if results.is_empty() => Err(e),
            _ => {
                *session = staged;
                Ok(results)
            }
        }
    }
}
