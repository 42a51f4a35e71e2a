use gesture::GestureError;
use http::StatusCode;
use std::fmt;

#[derive(Debug)]
pub enum ServiceError {
    Io(std::io::Error),
    ConnectionClosed,
    BadRequest(String),
    BodyTooLarge { limit: usize, got: usize },
    Unsupported(String),
    Image(gesture_image::ImageError),
    Gesture(GestureError),
    Infer(gesture_infer::InferError),
    Json(serde_json::Error),
    Http(http::Error),
    /// Transport failure seen by the client.
    Request(reqwest::Error),
    Task(String),
    /// Non-success reply seen by the client.
    Status { status: u16, message: String },
}

impl ServiceError {
    /// Status code the server answers with for this error.
    pub fn status(&self) -> StatusCode {
        match self {
            ServiceError::BadRequest(_) | ServiceError::Image(_) | ServiceError::Json(_) => {
                StatusCode::BAD_REQUEST
            }
            ServiceError::BodyTooLarge { .. } => StatusCode::PAYLOAD_TOO_LARGE,
            ServiceError::Unsupported(_) => StatusCode::NOT_IMPLEMENTED,
            ServiceError::Gesture(GestureError::InvalidFrameSize { .. }) => StatusCode::BAD_REQUEST,
            ServiceError::Gesture(e) if e.is_recoverable() => StatusCode::OK,
            _ => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Io(err) => write!(f, "io error: {err}"),
            ServiceError::ConnectionClosed => write!(f, "connection closed"),
            ServiceError::BadRequest(msg) => write!(f, "bad request: {msg}"),
            ServiceError::BodyTooLarge { limit, got } => {
                write!(f, "body of {got} bytes exceeds limit of {limit} bytes")
            }
            ServiceError::Unsupported(msg) => write!(f, "not supported: {msg}"),
            ServiceError::Image(err) => write!(f, "image error: {err}"),
            // the no-hand message is part of the response contract
            ServiceError::Gesture(err) => write!(f, "{err}"),
            ServiceError::Infer(err) => write!(f, "inference error: {err}"),
            ServiceError::Json(err) => write!(f, "json error: {err}"),
            ServiceError::Http(err) => write!(f, "http error: {err}"),
            ServiceError::Request(err) => write!(f, "request error: {err}"),
            ServiceError::Task(msg) => write!(f, "task error: {msg}"),
            ServiceError::Status { status, message } => write!(f, "server replied {status}: {message}"),
        }
    }
}

impl std::error::Error for ServiceError {}

impl From<std::io::Error> for ServiceError {
    fn from(err: std::io::Error) -> Self {
        if err.kind() == std::io::ErrorKind::UnexpectedEof {
            ServiceError::ConnectionClosed
        } else {
            ServiceError::Io(err)
        }
    }
}

impl From<gesture_image::ImageError> for ServiceError {
    fn from(err: gesture_image::ImageError) -> Self {
        ServiceError::Image(err)
    }
}

impl From<GestureError> for ServiceError {
    fn from(err: GestureError) -> Self {
        ServiceError::Gesture(err)
    }
}

impl From<gesture_infer::InferError> for ServiceError {
    fn from(err: gesture_infer::InferError) -> Self {
        ServiceError::Infer(err)
    }
}

impl From<serde_json::Error> for ServiceError {
    fn from(err: serde_json::Error) -> Self {
        ServiceError::Json(err)
    }
}

impl From<http::Error> for ServiceError {
    fn from(err: http::Error) -> Self {
        ServiceError::Http(err)
    }
}

impl From<reqwest::Error> for ServiceError {
    fn from(err: reqwest::Error) -> Self {
        ServiceError::Request(err)
    }
}
