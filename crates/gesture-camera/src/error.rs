use std::fmt;

#[derive(Debug)]
pub enum CameraError {
    Device(String),
    Stream(String),
    Decode(gesture_image::ImageError),
    Channel(String),
}

impl fmt::Display for CameraError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            CameraError::Device(msg) => write!(f, "camera device error: {msg}"),
            CameraError::Stream(msg) => write!(f, "camera stream error: {msg}"),
            CameraError::Decode(err) => write!(f, "frame decode error: {err}"),
            CameraError::Channel(msg) => write!(f, "frame channel error: {msg}"),
        }
    }
}

impl std::error::Error for CameraError {}

impl From<std::io::Error> for CameraError {
    fn from(err: std::io::Error) -> Self {
        CameraError::Device(err.to_string())
    }
}

impl From<gesture_image::ImageError> for CameraError {
    fn from(err: gesture_image::ImageError) -> Self {
        CameraError::Decode(err)
    }
}
