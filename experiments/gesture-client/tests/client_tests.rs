use clap::Parser;
use gesture_base::Tensor;
use gesture_client::{
    ClientArgs, NO_CLASS, UPLOAD_HEIGHT, error_text, prepare_upload, result_text, rgb_to_argb,
    window_title,
};
use gesture_service::{ClassifyResponse, Prediction, ServiceError};
use std::time::Duration;

fn prediction(class: &str, finger_gesture: &str) -> Prediction {
    Prediction {
        class: class.to_string(),
        location: [10, 20, 30, 40],
        finger_gesture: finger_gesture.to_string(),
        hand_sign_id: 0,
        finger_gesture_id: 0,
        handedness: None,
    }
}

#[test]
fn test_rgb_to_argb() {
    let argb = rgb_to_argb(&[255, 0, 0, 0, 255, 0, 0, 0, 255, 1, 2, 3], 2, 2).unwrap();
    assert_eq!(argb, vec![0xFF0000, 0x00FF00, 0x0000FF, 0x010203]);
}

#[test]
fn test_rgb_to_argb_short_buffer() {
    assert!(rgb_to_argb(&[0; 5], 2, 1).is_none());
}

#[test]
fn test_result_text_letter() {
    let response = ClassifyResponse::Predictions {
        predictions: vec![prediction("A", "Stop")],
    };
    assert_eq!(result_text(&response), "Letter: A");
}

#[test]
fn test_result_text_no_class() {
    let error = ClassifyResponse::Error {
        error: "No hand detected".to_string(),
    };
    assert_eq!(result_text(&error), NO_CLASS);

    let empty = ClassifyResponse::Predictions {
        predictions: vec![],
    };
    assert_eq!(result_text(&empty), NO_CLASS);

    let unlabeled = ClassifyResponse::Predictions {
        predictions: vec![prediction("A", "")],
    };
    assert_eq!(result_text(&unlabeled), NO_CLASS);
}

#[test]
fn test_error_text() {
    let err = ServiceError::Status {
        status: 500,
        message: String::new(),
    };
    assert_eq!(error_text(&err), "Request error: 500");
    assert_eq!(error_text(&ServiceError::ConnectionClosed), "Server unreachable");
}

#[test]
fn test_window_title() {
    assert!(window_title("Letter: B").starts_with("Letter: B | "));
    assert!(!window_title("").contains('|'));
}

#[test]
fn test_prepare_upload_scales_to_240() {
    let frame = Tensor::new(vec![480, 640, 3], vec![90u8; 480 * 640 * 3]).unwrap();
    let jpeg = prepare_upload(&frame).unwrap();
    let decoded = gesture_image::decode_rgb(&jpeg).unwrap();
    assert_eq!(decoded.shape, vec![UPLOAD_HEIGHT as usize, 320, 3]);
}

#[test]
fn test_args() {
    let args = ClientArgs::parse_from(["gesture-client", "--server", "10.0.0.2:5000", "--interval", "0.5"]);
    assert_eq!(args.server, "10.0.0.2:5000");
    assert_eq!(args.device, "/dev/video0");
    assert_eq!(args.interval(), Duration::from_millis(500));
    assert!(args.session.is_none());
}
