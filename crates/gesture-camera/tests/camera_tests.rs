use gesture_base::Tensor;
use gesture_camera::{Camera, CameraConfig, CameraError};

struct MockCamera {
    frame_count: usize,
    fail_after: Option<usize>,
}

impl MockCamera {
    fn new() -> Self {
        Self {
            frame_count: 0,
            fail_after: None,
        }
    }
}

impl Camera for MockCamera {
    async fn recv(&mut self) -> Result<Tensor<u8>, CameraError> {
        if self.fail_after == Some(self.frame_count) {
            return Err(CameraError::Channel("capture thread stopped".to_string()));
        }
        self.frame_count += 1;
        let value = self.frame_count as u8;
        Tensor::new(vec![2, 2, 3], vec![value; 12]).map_err(|e| CameraError::Stream(e.to_string()))
    }
}

async fn capture_frames(
    camera: &mut impl Camera,
    count: usize,
) -> Result<Vec<Tensor<u8>>, CameraError> {
    let mut frames = Vec::new();
    for _ in 0..count {
        frames.push(camera.recv().await?);
    }
    Ok(frames)
}

#[tokio::test]
async fn test_mock_camera_frames_in_order() {
    let mut camera = MockCamera::new();
    let frames = capture_frames(&mut camera, 3).await.unwrap();
    assert_eq!(frames.len(), 3);
    assert_eq!(frames[0].shape, vec![2, 2, 3]);
    assert_eq!(frames[2].data[0], 3);
}

#[tokio::test]
async fn test_camera_error_propagates() {
    let mut camera = MockCamera {
        frame_count: 0,
        fail_after: Some(1),
    };
    let err = capture_frames(&mut camera, 3).await.unwrap_err();
    assert!(matches!(err, CameraError::Channel(_)));
}

#[test]
fn test_config_defaults() {
    let config = CameraConfig::default();
    assert_eq!(config.device(), "/dev/video0");
    assert_eq!(config.width(), 640);
    assert_eq!(config.height(), 480);
    assert_eq!(config.fps(), 30);
    assert_eq!(config.buffer_count(), 4);
}

#[test]
fn test_config_builder() {
    let config = CameraConfig::default()
        .with_device("/dev/video2")
        .with_resolution(1280, 720)
        .with_fps(15)
        .with_buffer_count(0);
    assert_eq!(config.device(), "/dev/video2");
    assert_eq!(config.width(), 1280);
    assert_eq!(config.height(), 720);
    assert_eq!(config.fps(), 15);
    assert_eq!(config.buffer_count(), 1);
}

#[test]
fn test_error_conversions() {
    let io_err = std::io::Error::new(std::io::ErrorKind::NotFound, "no such device");
    let err: CameraError = io_err.into();
    assert!(matches!(&err, CameraError::Device(msg) if msg.contains("no such device")));

    let err: CameraError = gesture_image::ImageError::Decode("bad jpeg".to_string()).into();
    assert!(err.to_string().contains("bad jpeg"));
}
