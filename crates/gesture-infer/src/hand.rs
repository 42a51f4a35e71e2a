use crate::{InferError, Session, session::run_single};
use gesture::{DetectedHand, GestureError, HandDetector, Handedness, LANDMARK_COUNT, NormalizedLandmark};
use gesture_base::{Tensor, log};

/// Side of the square model input for the MediaPipe hand-landmark model.
pub const HAND_INPUT_SIZE: usize = 224;

#[derive(Debug, Clone, PartialEq)]
pub struct HandLandmarkerConfig {
    min_detection_confidence: f32,
    input_size: usize,
    logit_scores: bool,
}

impl Default for HandLandmarkerConfig {
    fn default() -> Self {
        Self {
            min_detection_confidence: 0.7,
            input_size: HAND_INPUT_SIZE,
            logit_scores: false,
        }
    }
}

impl HandLandmarkerConfig {
    pub fn with_min_detection_confidence(mut self, confidence: f32) -> Self {
        self.min_detection_confidence = confidence;
        self
    }

    pub fn with_input_size(mut self, input_size: usize) -> Self {
        self.input_size = input_size;
        self
    }

    /// Set when the model emits raw logits for presence and handedness
    /// instead of probabilities.
    pub fn with_logit_scores(mut self, logit_scores: bool) -> Self {
        self.logit_scores = logit_scores;
        self
    }

    pub fn min_detection_confidence(&self) -> f32 {
        self.min_detection_confidence
    }

    pub fn input_size(&self) -> usize {
        self.input_size
    }
}

/// Mapping between frame pixels and the padded square model input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Letterbox {
    pub scale: f32,
    pub pad_x: f32,
    pub pad_y: f32,
}

/// Letterbox an RGB `[H, W, 3]` u8 frame into `[1, size, size, 3]` floats in
/// `[0, 1]`, nearest-neighbour sampled, zero padded.
pub fn preprocess(image: &Tensor<u8>, size: usize) -> Result<(Tensor<f32>, Letterbox), InferError> {
    let (h, w, c) = image.image_dims().map_err(|_| InferError::ShapeMismatch {
        expected: "[H, W, 3]".to_string(),
        got: format!("{:?}", image.shape),
    })?;
    if c != 3 || h == 0 || w == 0 {
        return Err(InferError::ShapeMismatch {
            expected: "[H, W, 3]".to_string(),
            got: format!("{:?}", image.shape),
        });
    }

    let scale = (size as f32 / w as f32).min(size as f32 / h as f32);
    let new_w = ((w as f32 * scale) as usize).clamp(1, size);
    let new_h = ((h as f32 * scale) as usize).clamp(1, size);
    let pad_x = (size - new_w) / 2;
    let pad_y = (size - new_h) / 2;

    let mut data = vec![0.0f32; size * size * 3];
    for y in 0..new_h {
        let src_y = ((y as f32 / scale) as usize).min(h - 1);
        for x in 0..new_w {
            let src_x = ((x as f32 / scale) as usize).min(w - 1);
            let src = (src_y * w + src_x) * 3;
            let dst = ((y + pad_y) * size + (x + pad_x)) * 3;
            for ch in 0..3 {
                data[dst + ch] = image.data[src + ch] as f32 / 255.0;
            }
        }
    }

    let tensor = Tensor::new(vec![1, size, size, 3], data)?;
    Ok((
        tensor,
        Letterbox {
            scale,
            pad_x: pad_x as f32,
            pad_y: pad_y as f32,
        },
    ))
}

fn sigmoid(x: f32) -> f32 {
    1.0 / (1.0 + (-x).exp())
}

/// Turn raw model outputs into a detection in frame-relative coordinates.
///
/// `landmarks` holds 21 `(x, y, z)` triples in model-input pixels. Returns
/// `None` when `presence` is below the configured confidence.
pub fn postprocess(
    landmarks: &Tensor<f32>,
    presence: f32,
    handedness: f32,
    letterbox: &Letterbox,
    frame_width: usize,
    frame_height: usize,
    config: &HandLandmarkerConfig,
) -> Result<Option<DetectedHand>, InferError> {
    if landmarks.len() != LANDMARK_COUNT * 3 {
        return Err(InferError::ShapeMismatch {
            expected: format!("{} landmark values", LANDMARK_COUNT * 3),
            got: format!("{:?}", landmarks.shape),
        });
    }
    let (presence, handedness) = if config.logit_scores {
        (sigmoid(presence), sigmoid(handedness))
    } else {
        (presence, handedness)
    };
    if presence < config.min_detection_confidence {
        return Ok(None);
    }

    let size = config.input_size as f32;
    let points = landmarks
        .data
        .chunks_exact(3)
        .map(|v| NormalizedLandmark {
            x: (v[0] - letterbox.pad_x) / letterbox.scale / frame_width as f32,
            y: (v[1] - letterbox.pad_y) / letterbox.scale / frame_height as f32,
            z: v[2] / size,
        })
        .collect();

    Ok(Some(DetectedHand {
        landmarks: points,
        handedness: Some(if handedness > 0.5 {
            Handedness::Right
        } else {
            Handedness::Left
        }),
        score: presence,
    }))
}

/// Single-hand landmark model run on the whole (letterboxed) frame.
///
/// Expects outputs in the order: landmarks (63 values), hand presence score,
/// handedness score. Additional outputs (world landmarks) are ignored.
pub struct HandLandmarker {
    session: Box<dyn Session + Send>,
    config: HandLandmarkerConfig,
}

impl HandLandmarker {
    pub fn new(session: Box<dyn Session + Send>, config: HandLandmarkerConfig) -> Self {
        Self { session, config }
    }

    pub fn config(&self) -> &HandLandmarkerConfig {
        &self.config
    }

    pub fn landmarks(&mut self, image: &Tensor<u8>) -> Result<Option<DetectedHand>, InferError> {
        let (input, letterbox) = preprocess(image, self.config.input_size)?;
        let outputs = run_single(self.session.as_mut(), input)?;
        let [landmarks, presence, handedness, ..] = outputs.as_slice() else {
            return Err(InferError::ShapeMismatch {
                expected: "3 outputs (landmarks, presence, handedness)".to_string(),
                got: format!("{} outputs", outputs.len()),
            });
        };
        let scalar = |t: &Tensor<f32>, name: &str| {
            t.data
                .first()
                .copied()
                .ok_or_else(|| InferError::MissingOutput(name.to_string()))
        };
        let (h, w, _) = image.image_dims()?;
        let hand = postprocess(
            landmarks,
            scalar(presence, "presence")?,
            scalar(handedness, "handedness")?,
            &letterbox,
            w,
            h,
            &self.config,
        )?;
        if let Some(hand) = &hand {
            log::debug!("Hand detected with score {:.3}", hand.score);
        }
        Ok(hand)
    }
}

impl HandDetector for HandLandmarker {
    fn detect(&mut self, image: &Tensor<u8>) -> Result<Vec<DetectedHand>, GestureError> {
        self.landmarks(image)
            .map(|hand| hand.into_iter().collect())
            .map_err(|e| GestureError::Detector(e.to_string()))
    }
}
