use gesture::{
    Classifier, DetectedHand, FrameSize, GestureError, GestureRecognizer, GestureSession,
    HandLandmarks, Handedness, LabelTable, Labels, NormalizedLandmark, PipelineConfig,
};
use gesture_base::Vec2;
use std::{
    collections::VecDeque,
    sync::{Arc, Mutex},
};

/// Returns scripted ids and records every feature vector it was given.
#[derive(Clone)]
struct ScriptedClassifier {
    classes: usize,
    script: Arc<Mutex<VecDeque<usize>>>,
    fallback: usize,
    calls: Arc<Mutex<Vec<Vec<f32>>>>,
    fail: bool,
    fail_after: Option<usize>,
}

impl ScriptedClassifier {
    fn constant(classes: usize, id: usize) -> Self {
        Self {
            classes,
            script: Arc::new(Mutex::new(VecDeque::new())),
            fallback: id,
            calls: Arc::new(Mutex::new(Vec::new())),
            fail: false,
            fail_after: None,
        }
    }

    fn scripted(classes: usize, ids: &[usize]) -> Self {
        let classifier = Self::constant(classes, 0);
        classifier.script.lock().unwrap().extend(ids);
        classifier
    }

    fn failing(classes: usize) -> Self {
        Self {
            fail: true,
            ..Self::constant(classes, 0)
        }
    }

    fn failing_after(classes: usize, successes: usize) -> Self {
        Self {
            fail_after: Some(successes),
            ..Self::constant(classes, 0)
        }
    }

    fn calls(&self) -> Vec<Vec<f32>> {
        self.calls.lock().unwrap().clone()
    }
}

impl Classifier for ScriptedClassifier {
    fn classify(&mut self, features: &[f32]) -> Result<usize, GestureError> {
        let count = {
            let mut calls = self.calls.lock().unwrap();
            calls.push(features.to_vec());
            calls.len()
        };
        if self.fail || self.fail_after.is_some_and(|n| count > n) {
            return Err(GestureError::Classifier("model exploded".to_string()));
        }
        Ok(self.script.lock().unwrap().pop_front().unwrap_or(self.fallback))
    }

    fn num_classes(&self) -> usize {
        self.classes
    }
}

fn keypoint_labels() -> Labels {
    let names = (0..10).map(|i| format!("sign{i}")).collect();
    Labels::new(LabelTable::Keypoint, names)
}

fn gesture_labels() -> Labels {
    Labels::new(
        LabelTable::PointHistory,
        vec!["Stop".into(), "Clockwise".into(), "Counter Clockwise".into(), "Move".into()],
    )
}

fn recognizer(
    keypoint: ScriptedClassifier,
    temporal: ScriptedClassifier,
) -> GestureRecognizer<ScriptedClassifier, ScriptedClassifier> {
    GestureRecognizer::new(keypoint, temporal, keypoint_labels(), gesture_labels(), PipelineConfig::default())
        .unwrap()
}

/// Wrist at (100, 100), index tip at (150, 80), everything else on the wrist.
fn pointing_hand() -> HandLandmarks {
    let mut points = [Vec2::new(100, 100); 21];
    points[8] = Vec2::new(150, 80);
    HandLandmarks::new(points)
}

fn frame() -> FrameSize {
    FrameSize::new(640, 480).unwrap()
}

#[test]
fn test_pointing_for_sixteen_frames() {
    let keypoint = ScriptedClassifier::constant(10, 8);
    let temporal = ScriptedClassifier::constant(4, 2);
    let mut recognizer = recognizer(keypoint, temporal.clone());
    let mut session = recognizer.new_session();
    let hand = pointing_hand();

    for n in 1..=15 {
        let result = recognizer.process_hand(&mut session, &hand, frame()).unwrap();
        assert_eq!(result.class, "sign8");
        assert_eq!(result.finger_gesture_id, 0);
        assert_eq!(session.point_history().len(), n);
        assert!(temporal.calls().is_empty(), "temporal classifier ran at frame {n}");
    }

    let result = recognizer.process_hand(&mut session, &hand, frame()).unwrap();
    let calls = temporal.calls();
    assert_eq!(calls.len(), 1);
    assert_eq!(calls[0].len(), 32);
    assert!(calls[0].iter().all(|&v| v == 0.0));
    assert_eq!(result.finger_gesture_id, 2);

    assert_eq!(session.point_history().to_vec(), vec![Vec2::new(150, 80); 16]);
    // 15 zeros and one 2 in the vote window
    assert_eq!(result.finger_gesture, "Stop");
}

#[test]
fn test_non_pointing_frames_push_sentinel() {
    let keypoint = ScriptedClassifier::scripted(10, &[8, 3, 8, 0, 0, 8]);
    let temporal = ScriptedClassifier::constant(4, 0);
    let mut recognizer = recognizer(keypoint, temporal);
    let mut session = recognizer.new_session();
    let hand = pointing_hand();

    for _ in 0..6 {
        recognizer.process_hand(&mut session, &hand, frame()).unwrap();
    }

    let tip = Vec2::new(150, 80);
    let zero = Vec2::new(0, 0);
    assert_eq!(session.point_history().to_vec(), vec![tip, zero, tip, zero, zero, tip]);
}

#[test]
fn test_tracked_sign_is_configurable() {
    let keypoint = ScriptedClassifier::constant(10, 3);
    let temporal = ScriptedClassifier::constant(4, 0);
    let config = PipelineConfig::default().with_tracked_sign_id(3).with_history_length(4);
    let mut recognizer =
        GestureRecognizer::new(keypoint, temporal.clone(), keypoint_labels(), gesture_labels(), config).unwrap();
    let mut session = recognizer.new_session();

    for _ in 0..4 {
        recognizer.process_hand(&mut session, &pointing_hand(), frame()).unwrap();
    }
    assert_eq!(session.point_history().to_vec(), vec![Vec2::new(150, 80); 4]);
    assert_eq!(temporal.calls().len(), 1);
    assert_eq!(temporal.calls()[0].len(), 8);
}

#[test]
fn test_majority_vote_stabilizes_label() {
    let keypoint = ScriptedClassifier::constant(10, 8);
    // history fills on frame 4, so 13 frames make 10 temporal calls
    let mut script = vec![1; 8];
    script.extend([3, 3]);
    let temporal = ScriptedClassifier::scripted(4, &script);
    let config = PipelineConfig::default().with_history_length(4);
    let mut recognizer =
        GestureRecognizer::new(keypoint, temporal, keypoint_labels(), gesture_labels(), config).unwrap();
    let mut session = recognizer.new_session();

    let mut last = None;
    for _ in 0..13 {
        last = Some(recognizer.process_hand(&mut session, &pointing_hand(), frame()).unwrap());
    }
    // window holds [1, 1, 3, 3]; tie resolves to the smaller id
    let last = last.unwrap();
    assert_eq!(last.finger_gesture_id, 3);
    assert_eq!(last.finger_gesture, "Clockwise");
}

#[test]
fn test_degenerate_hand_leaves_session_untouched() {
    let keypoint = ScriptedClassifier::constant(10, 8);
    let mut recognizer = recognizer(keypoint.clone(), ScriptedClassifier::constant(4, 0));
    let mut session = recognizer.new_session();
    recognizer.process_hand(&mut session, &pointing_hand(), frame()).unwrap();
    let before = session.clone();

    let flat = HandLandmarks::new([Vec2::new(5, 5); 21]);
    let result = recognizer.process_hand(&mut session, &flat, frame());
    assert!(matches!(result, Err(GestureError::DegenerateLandmarks)));
    assert_eq!(session, before);
    assert_eq!(keypoint.calls().len(), 1);
}

#[test]
fn test_failing_temporal_classifier_is_all_or_nothing() {
    let keypoint = ScriptedClassifier::constant(10, 8);
    let mut recognizer = recognizer(keypoint, ScriptedClassifier::failing(4));
    let mut session = recognizer.new_session();

    for _ in 0..15 {
        recognizer.process_hand(&mut session, &pointing_hand(), frame()).unwrap();
    }
    let before = session.clone();

    let result = recognizer.process_hand(&mut session, &pointing_hand(), frame());
    assert!(matches!(result, Err(GestureError::Classifier(_))));
    assert_eq!(session, before);
    assert_eq!(session.point_history().len(), 15);
    assert_eq!(session.gesture_history().len(), 15);
}

#[test]
fn test_label_mismatch_rejected_at_construction() {
    let result = GestureRecognizer::new(
        ScriptedClassifier::constant(11, 0),
        ScriptedClassifier::constant(4, 0),
        keypoint_labels(),
        gesture_labels(),
        PipelineConfig::default(),
    );
    assert!(matches!(
        result,
        Err(GestureError::ConfigurationMismatch { table: LabelTable::Keypoint, labels: 10, classes: 11 })
    ));
}

#[test]
fn test_zero_history_length_rejected_at_construction() {
    let result = GestureRecognizer::new(
        ScriptedClassifier::constant(10, 0),
        ScriptedClassifier::constant(4, 0),
        keypoint_labels(),
        gesture_labels(),
        PipelineConfig::default().with_history_length(0),
    );
    assert!(matches!(result, Err(GestureError::InvalidConfig(_))));
}

fn detected(hand: &HandLandmarks, frame: FrameSize, handedness: Handedness) -> DetectedHand {
    let landmarks = hand
        .points()
        .iter()
        .map(|p| {
            NormalizedLandmark::new(
                (p.x as f32 + 0.5) / frame.width() as f32,
                (p.y as f32 + 0.5) / frame.height() as f32,
            )
        })
        .collect();
    DetectedHand {
        landmarks,
        handedness: Some(handedness),
        score: 0.9,
    }
}

#[test]
fn test_process_frame_without_hands() {
    let mut recognizer = recognizer(ScriptedClassifier::constant(10, 8), ScriptedClassifier::constant(4, 0));
    let mut session = GestureSession::default();
    let result = recognizer.process_frame(&mut session, &[], frame());
    assert!(matches!(result, Err(GestureError::NoHandDetected)));
    assert_eq!(session, GestureSession::default());
}

#[test]
fn test_process_frame_returns_every_hand_in_order() {
    let keypoint = ScriptedClassifier::scripted(10, &[8, 2]);
    let mut recognizer = recognizer(keypoint, ScriptedClassifier::constant(4, 0));
    let mut session = recognizer.new_session();

    let mut other = [Vec2::new(300, 300); 21];
    other[12] = Vec2::new(320, 250);
    let other = HandLandmarks::new(other);
    let hands = [
        detected(&pointing_hand(), frame(), Handedness::Right),
        detected(&other, frame(), Handedness::Left),
    ];

    let results = recognizer.process_frame(&mut session, &hands, frame()).unwrap();
    assert_eq!(results.len(), 2);
    assert_eq!(results[0].class, "sign8");
    assert_eq!(results[0].handedness, Some(Handedness::Right));
    assert_eq!(results[0].location.to_array(), [100, 80, 150, 100]);
    assert_eq!(results[1].class, "sign2");
    assert_eq!(results[1].location.to_array(), [300, 250, 320, 300]);
    assert_eq!(session.point_history().to_vec(), vec![Vec2::new(150, 80), Vec2::new(0, 0)]);
}

#[test]
fn test_process_frame_skips_degenerate_hand() {
    let mut recognizer = recognizer(ScriptedClassifier::constant(10, 8), ScriptedClassifier::constant(4, 0));
    let mut session = recognizer.new_session();

    let flat = HandLandmarks::new([Vec2::new(10, 10); 21]);
    let hands = [
        detected(&flat, frame(), Handedness::Left),
        detected(&pointing_hand(), frame(), Handedness::Right),
    ];
    let results = recognizer.process_frame(&mut session, &hands, frame()).unwrap();
    assert_eq!(results.len(), 1);
    assert_eq!(session.point_history().len(), 1);

    let only_flat = [detected(&flat, frame(), Handedness::Left)];
    let result = recognizer.process_frame(&mut session, &only_flat, frame());
    assert!(matches!(result, Err(GestureError::DegenerateLandmarks)));
    assert_eq!(session.point_history().len(), 1);
}

#[test]
fn test_result_json_shape() {
    let mut recognizer = recognizer(ScriptedClassifier::constant(10, 8), ScriptedClassifier::constant(4, 0));
    let mut session = recognizer.new_session();
    let result = recognizer.process_hand(&mut session, &pointing_hand(), frame()).unwrap();

    let json = serde_json::to_value(&result).unwrap();
    assert_eq!(json["class"], "sign8");
    assert_eq!(json["location"], serde_json::json!([100, 80, 150, 100]));
    assert_eq!(json["finger_gesture"], "Stop");
    assert!(json.get("handedness").is_none());
}

#[test]
fn test_session_reset() {
    let mut recognizer = recognizer(ScriptedClassifier::constant(10, 8), ScriptedClassifier::constant(4, 0));
    let mut session = recognizer.new_session();
    recognizer.process_hand(&mut session, &pointing_hand(), frame()).unwrap();
    assert_eq!(session.frames_processed(), 1);

    session.reset();
    assert!(session.point_history().is_empty());
    assert!(session.gesture_history().is_empty());
    assert_eq!(session.frames_processed(), 0);
}

#[test]
fn test_process_frame_failure_rolls_back_earlier_hands() {
    let config = PipelineConfig::default().with_history_length(2);
    let mut recognizer = GestureRecognizer::new(
        ScriptedClassifier::constant(10, 8),
        ScriptedClassifier::failing_after(4, 1),
        keypoint_labels(),
        gesture_labels(),
        config,
    )
    .unwrap();
    let mut session = recognizer.new_session();
    recognizer.process_hand(&mut session, &pointing_hand(), frame()).unwrap();
    let before = session.clone();

    // first hand fills the history and classifies, second hand fails
    let hands = [
        detected(&pointing_hand(), frame(), Handedness::Left),
        detected(&pointing_hand(), frame(), Handedness::Right),
    ];
    let result = recognizer.process_frame(&mut session, &hands, frame());
    assert!(matches!(result, Err(GestureError::Classifier(_))));
    assert_eq!(session, before);
    assert_eq!(session.frames_processed(), 1);
    assert_eq!(session.point_history().len(), 1);
    assert_eq!(session.gesture_history().len(), 1);
}
