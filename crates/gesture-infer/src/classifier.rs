use crate::{InferError, Session, session::run_single};
use gesture::{Classifier, GestureError};
use gesture_base::Tensor;

/// Arg-max classifier over a `[1, input_len]` model input.
pub struct OnnxClassifier {
    session: Box<dyn Session + Send>,
    input_len: usize,
    num_classes: usize,
    score_threshold: Option<(f32, usize)>,
}

impl OnnxClassifier {
    /// Wrap a loaded session. The class count is read from the output width
    /// of one inference on a zero vector.
    pub fn new(mut session: Box<dyn Session + Send>, input_len: usize) -> Result<Self, InferError> {
        let sample = scores(session.as_mut(), &vec![0.0; input_len])?;
        if sample.is_empty() {
            return Err(InferError::ShapeMismatch {
                expected: "at least one class score".to_string(),
                got: "empty output".to_string(),
            });
        }
        Ok(Self {
            session,
            input_len,
            num_classes: sample.len(),
            score_threshold: None,
        })
    }

    /// Report `fallback_id` whenever the best score is below `threshold`.
    pub fn with_score_threshold(mut self, threshold: f32, fallback_id: usize) -> Self {
        self.score_threshold = Some((threshold, fallback_id));
        self
    }

    pub fn input_len(&self) -> usize {
        self.input_len
    }

    /// Raw per-class scores for `features`.
    pub fn scores(&mut self, features: &[f32]) -> Result<Vec<f32>, InferError> {
        if features.len() != self.input_len {
            return Err(InferError::ShapeMismatch {
                expected: format!("{} features", self.input_len),
                got: format!("{} features", features.len()),
            });
        }
        scores(self.session.as_mut(), features)
    }
}

fn scores(session: &mut dyn Session, features: &[f32]) -> Result<Vec<f32>, InferError> {
    let input = Tensor::new(vec![1, features.len()], features.to_vec())?;
    let output = run_single(session, input)?
        .into_iter()
        .next()
        .ok_or_else(|| InferError::MissingOutput("scores".to_string()))?;
    Ok(output.data)
}

/// Index of the first maximum.
pub fn argmax(scores: &[f32]) -> Option<(usize, f32)> {
    scores
        .iter()
        .copied()
        .enumerate()
        .fold(None, |best, (i, s)| match best {
            Some((_, b)) if b >= s => best,
            _ => Some((i, s)),
        })
}

impl Classifier for OnnxClassifier {
    fn classify(&mut self, features: &[f32]) -> Result<usize, GestureError> {
        let scores = self
            .scores(features)
            .map_err(|e| GestureError::Classifier(e.to_string()))?;
        let (id, score) = argmax(&scores)
            .ok_or_else(|| GestureError::Classifier("model produced no scores".to_string()))?;
        match self.score_threshold {
            Some((threshold, fallback)) if score < threshold => Ok(fallback),
            _ => Ok(id),
        }
    }

    fn num_classes(&self) -> usize {
        self.num_classes
    }
}
