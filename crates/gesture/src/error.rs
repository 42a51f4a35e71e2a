use std::fmt;

/// Which label table an error refers to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LabelTable {
    Keypoint,
    PointHistory,
}

impl fmt::Display for LabelTable {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            LabelTable::Keypoint => write!(f, "keypoint"),
            LabelTable::PointHistory => write!(f, "point history"),
        }
    }
}

#[derive(Debug)]
pub enum GestureError {
    /// The detector found no hand in the frame.
    NoHandDetected,
    /// Every landmark coincides with the wrist; the hand cannot be normalized.
    DegenerateLandmarks,
    InvalidLandmarkCount { expected: usize, got: usize },
    InvalidFrameSize { width: u32, height: u32 },
    /// A label table does not match its classifier's output cardinality.
    ConfigurationMismatch {
        table: LabelTable,
        labels: usize,
        classes: usize,
    },
    UnknownLabel { table: LabelTable, id: usize },
    InvalidLabels(String),
    InvalidConfig(String),
    Classifier(String),
    Detector(String),
    Io(std::io::Error),
}

impl GestureError {
    /// Per-frame errors that leave the stream usable.
    pub fn is_recoverable(&self) -> bool {
        matches!(
            self,
            GestureError::NoHandDetected
                | GestureError::DegenerateLandmarks
                | GestureError::InvalidLandmarkCount { .. }
        )
    }
}

impl fmt::Display for GestureError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            GestureError::NoHandDetected => write!(f, "No hand detected"),
            GestureError::DegenerateLandmarks => {
                write!(f, "degenerate landmarks: all keypoints coincide")
            }
            GestureError::InvalidLandmarkCount { expected, got } => {
                write!(f, "expected {expected} landmarks, got {got}")
            }
            GestureError::InvalidFrameSize { width, height } => {
                write!(f, "invalid frame size {width}x{height}")
            }
            GestureError::ConfigurationMismatch {
                table,
                labels,
                classes,
            } => write!(
                f,
                "{table} label table has {labels} labels but the classifier has {classes} classes"
            ),
            GestureError::UnknownLabel { table, id } => {
                write!(f, "no {table} label for class id {id}")
            }
            GestureError::InvalidLabels(msg) => write!(f, "invalid label file: {msg}"),
            GestureError::InvalidConfig(msg) => write!(f, "invalid configuration: {msg}"),
            GestureError::Classifier(msg) => write!(f, "classifier error: {msg}"),
            GestureError::Detector(msg) => write!(f, "detector error: {msg}"),
            GestureError::Io(err) => write!(f, "io error: {err}"),
        }
    }
}

impl std::error::Error for GestureError {
    fn source(&self) -> Option<&(dyn std::error::Error + 'static)> {
        match self {
            GestureError::Io(err) => Some(err),
            _ => None,
        }
    }
}

impl From<std::io::Error> for GestureError {
    fn from(err: std::io::Error) -> Self {
        GestureError::Io(err)
    }
}
