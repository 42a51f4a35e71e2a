use crate::GestureError;
use gesture_base::{Rect, Tensor, Vec2};

/// Number of landmarks the hand detector reports per hand.
pub const LANDMARK_COUNT: usize = 21;

pub const WRIST: usize = 0;
pub const THUMB_CMC: usize = 1;
pub const THUMB_MCP: usize = 2;
pub const THUMB_IP: usize = 3;
pub const THUMB_TIP: usize = 4;
pub const INDEX_MCP: usize = 5;
pub const INDEX_PIP: usize = 6;
pub const INDEX_DIP: usize = 7;
pub const INDEX_TIP: usize = 8;
pub const MIDDLE_MCP: usize = 9;
pub const MIDDLE_PIP: usize = 10;
pub const MIDDLE_DIP: usize = 11;
pub const MIDDLE_TIP: usize = 12;
pub const RING_MCP: usize = 13;
pub const RING_PIP: usize = 14;
pub const RING_DIP: usize = 15;
pub const RING_TIP: usize = 16;
pub const PINKY_MCP: usize = 17;
pub const PINKY_PIP: usize = 18;
pub const PINKY_DIP: usize = 19;
pub const PINKY_TIP: usize = 20;

/// Detector output for one landmark, `x` and `y` relative to the frame size.
/// `z` is relative depth and is not used by the classifiers.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct NormalizedLandmark {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl NormalizedLandmark {
    pub fn new(x: f32, y: f32) -> Self {
        Self { x, y, z: 0.0 }
    }
}

/// Pixel dimensions of a source frame. Both sides are non-zero.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct FrameSize {
    width: u32,
    height: u32,
}

impl FrameSize {
    pub fn new(width: u32, height: u32) -> Result<Self, GestureError> {
        if width == 0 || height == 0 {
            return Err(GestureError::InvalidFrameSize { width, height });
        }
        Ok(Self { width, height })
    }

    /// Size of an HWC image tensor.
    pub fn of_image(image: &Tensor<u8>) -> Result<Self, GestureError> {
        let (height, width, _) = image
            .image_dims()
            .map_err(|e| GestureError::Detector(e.to_string()))?;
        Self::new(width as u32, height as u32)
    }

    pub fn width(&self) -> u32 {
        self.width
    }

    pub fn height(&self) -> u32 {
        self.height
    }
}

/// The 21 pixel landmarks of one hand, in detector order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct HandLandmarks {
    points: [Vec2<i32>; LANDMARK_COUNT],
}

impl HandLandmarks {
    pub fn new(points: [Vec2<i32>; LANDMARK_COUNT]) -> Self {
        Self { points }
    }

    pub fn from_pixels(points: &[Vec2<i32>]) -> Result<Self, GestureError> {
        let points: [Vec2<i32>; LANDMARK_COUNT] =
            points
                .try_into()
                .map_err(|_| GestureError::InvalidLandmarkCount {
                    expected: LANDMARK_COUNT,
                    got: points.len(),
                })?;
        Ok(Self { points })
    }

    /// Scale normalized detector coordinates to pixels, truncating and
    /// clamping into `[0, width-1] x [0, height-1]`.
    pub fn from_normalized(
        landmarks: &[NormalizedLandmark],
        frame: FrameSize,
    ) -> Result<Self, GestureError> {
        if landmarks.len() != LANDMARK_COUNT {
            return Err(GestureError::InvalidLandmarkCount {
                expected: LANDMARK_COUNT,
                got: landmarks.len(),
            });
        }
        let max_x = frame.width() as i32 - 1;
        let max_y = frame.height() as i32 - 1;
        let mut points = [Vec2::zero(); LANDMARK_COUNT];
        for (point, landmark) in points.iter_mut().zip(landmarks) {
            let x = (landmark.x * frame.width() as f32) as i32;
            let y = (landmark.y * frame.height() as f32) as i32;
            *point = Vec2::new(x.clamp(0, max_x), y.clamp(0, max_y));
        }
        Ok(Self { points })
    }

    pub fn points(&self) -> &[Vec2<i32>; LANDMARK_COUNT] {
        &self.points
    }

    pub fn get(&self, index: usize) -> Option<Vec2<i32>> {
        self.points.get(index).copied()
    }

    pub fn wrist(&self) -> Vec2<i32> {
        self.points[WRIST]
    }

    pub fn index_tip(&self) -> Vec2<i32> {
        self.points[INDEX_TIP]
    }

    /// Min/max box over the raw pixel landmarks.
    pub fn bounding_box(&self) -> Rect<i32> {
        let (min, max) = self.points[1..]
            .iter()
            .fold((self.points[0], self.points[0]), |(min, max), &p| {
                (min.min(p), max.max(p))
            });
        Rect::from_min_max(min, max)
    }
}
