use clap::Parser;
use gesture_base::Tensor;
use gesture_image::ImageError;
use gesture_service::{ClassifyResponse, ServiceError};
use std::time::Duration;

/// Height frames are scaled to before upload.
pub const UPLOAD_HEIGHT: u32 = 240;
pub const NO_CLASS: &str = "No class detected";
const TITLE: &str = "Gesture Recognition - ESC to exit";

/// Live camera view that asks a gesture-server to classify a frame every few seconds
#[derive(Parser, Debug)]
#[command(name = "gesture-client", version, about)]
pub struct ClientArgs {
    /// Server address, host:port
    #[arg(long, default_value = "127.0.0.1:5000")]
    pub server: String,

    /// Camera device
    #[arg(long, default_value = "/dev/video0")]
    pub device: String,

    /// Seconds between uploads
    #[arg(long, default_value_t = 2.0)]
    pub interval: f64,

    /// Session id sent with every upload
    #[arg(long)]
    pub session: Option<String>,
}

impl ClientArgs {
    pub fn interval(&self) -> Duration {
        Duration::from_secs_f64(self.interval.max(0.1))
    }
}

/// Pack an HWC RGB buffer into minifb's `0RGB` pixels.
pub fn rgb_to_argb(buf: &[u8], width: usize, height: usize) -> Option<Vec<u32>> {
    let pixels = buf.get(..width * height * 3)?;
    Some(
        pixels
            .chunks_exact(3)
            .map(|p| ((p[0] as u32) << 16) | ((p[1] as u32) << 8) | p[2] as u32)
            .collect(),
    )
}

/// Scale a frame to the upload height and encode it.
pub fn prepare_upload(frame: &Tensor<u8>) -> Result<Vec<u8>, ImageError> {
    let small = gesture_image::resize_to_height(frame, UPLOAD_HEIGHT)?;
    gesture_image::encode_jpeg(&small, gesture_image::DEFAULT_JPEG_QUALITY)
}

/// Text shown for a classification reply.
pub fn result_text(response: &ClassifyResponse) -> String {
    match response.first() {
        Some(p) if !p.class.is_empty() && !p.finger_gesture.is_empty() => {
            format!("Letter: {}", p.class)
        }
        _ => NO_CLASS.to_string(),
    }
}

/// Text for a failed upload.
pub fn error_text(err: &ServiceError) -> String {
    match err {
        ServiceError::Status { status, .. } => format!("Request error: {status}"),
        _ => "Server unreachable".to_string(),
    }
}

pub fn window_title(text: &str) -> String {
    if text.is_empty() {
        TITLE.to_string()
    } else {
        format!("{text} | {TITLE}")
    }
}
