use crate::{GestureHistory, HISTORY_LENGTH, PointHistory};

/// Per-stream state: the fingertip trajectory and the recent temporal
/// gesture ids. One session per camera/client; never shared between streams.
#[derive(Debug, Clone, PartialEq)]
pub struct GestureSession {
    point_history: PointHistory,
    gesture_history: GestureHistory,
    frames: u64,
}

impl GestureSession {
    pub fn new(history_length: usize) -> Self {
        Self {
            point_history: PointHistory::new(history_length),
            gesture_history: GestureHistory::new(history_length),
            frames: 0,
        }
    }

    pub fn point_history(&self) -> &PointHistory {
        &self.point_history
    }

    pub fn gesture_history(&self) -> &GestureHistory {
        &self.gesture_history
    }

    /// Number of hands committed to this session.
    pub fn frames_processed(&self) -> u64 {
        self.frames
    }

    pub fn reset(&mut self) {
        self.point_history.clear();
        self.gesture_history.clear();
        self.frames = 0;
    }

    /// Replace both histories at once with fully computed successors.
    pub(crate) fn commit(&mut self, point_history: PointHistory, gesture_history: GestureHistory) {
        self.point_history = point_history;
        self.gesture_history = gesture_history;
        self.frames += 1;
    }
}

impl Default for GestureSession {
    fn default() -> Self {
        Self::new(HISTORY_LENGTH)
    }
}
