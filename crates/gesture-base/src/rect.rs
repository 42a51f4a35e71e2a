use crate::Vec2;

/// Axis-aligned rectangle stored as inclusive min/max corners.
///
/// Pixel boxes around a hand use the extreme landmark coordinates directly,
/// so both corners lie on actual landmarks.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Rect<T> {
    pub min: Vec2<T>,
    pub max: Vec2<T>,
}

impl<T: Default> Default for Rect<T> {
    fn default() -> Self {
        Self {
            min: Vec2::zero(),
            max: Vec2::zero(),
        }
    }
}

impl<T> Rect<T> {
    pub fn from_min_max(min: Vec2<T>, max: Vec2<T>) -> Self {
        Self { min, max }
    }
}

impl<T: PartialOrd + Copy> Rect<T> {
    /// Smallest rectangle enclosing every point, or `None` for an empty iterator.
    pub fn enclosing(points: impl IntoIterator<Item = Vec2<T>>) -> Option<Self> {
        let mut points = points.into_iter();
        let first = points.next()?;
        let (min, max) = points.fold((first, first), |(min, max), p| (min.min(p), max.max(p)));
        Some(Self { min, max })
    }

    pub fn contains_point(&self, point: Vec2<T>) -> bool {
        point.x >= self.min.x && point.y >= self.min.y && point.x <= self.max.x && point.y <= self.max.y
    }
}

impl<T: std::ops::Sub<Output = T> + Copy> Rect<T> {
    pub fn width(&self) -> T {
        self.max.x - self.min.x
    }

    pub fn height(&self) -> T {
        self.max.y - self.min.y
    }
}

impl<T: Copy> Rect<T> {
    /// `[x_min, y_min, x_max, y_max]`
    pub fn to_array(&self) -> [T; 4] {
        [self.min.x, self.min.y, self.max.x, self.max.y]
    }
}
