//! Feature extraction for the two classifiers.
//!
//! The keypoint features are scaled by their own largest component, the point
//! history features by the frame size. The two classifiers were trained on
//! these exact transforms, so the asymmetry has to stay.

use crate::{FrameSize, GestureError, HandLandmarks};
use gesture_base::Vec2;

/// Wrist-relative landmark coordinates, flattened `[x0, y0, x1, y1, ...]` and
/// divided by the largest absolute component.
///
/// Returns `DegenerateLandmarks` when every landmark equals the wrist.
pub fn normalize_landmarks(landmarks: &HandLandmarks) -> Result<Vec<f32>, GestureError> {
    let base = landmarks.wrist();
    let mut features: Vec<f32> = landmarks
        .points()
        .iter()
        .flat_map(|&p| {
            let rel = (p - base).as_f32();
            [rel.x, rel.y]
        })
        .collect();

    let max_value = features.iter().fold(0.0f32, |acc, v| acc.max(v.abs()));
    if max_value == 0.0 {
        return Err(GestureError::DegenerateLandmarks);
    }
    for v in &mut features {
        *v /= max_value;
    }
    Ok(features)
}

/// History points relative to the oldest one, x divided by frame width and y
/// by frame height, flattened in time order. An empty history gives an empty
/// vector.
pub fn normalize_point_history<'a>(
    history: impl IntoIterator<Item = &'a Vec2<i32>>,
    frame: FrameSize,
) -> Vec<f32> {
    let width = frame.width() as f32;
    let height = frame.height() as f32;
    let mut history = history.into_iter().peekable();
    let Some(&&base) = history.peek() else {
        return Vec::new();
    };
    history
        .flat_map(|&p| {
            let rel = (p - base).as_f32();
            [rel.x / width, rel.y / height]
        })
        .collect()
}
