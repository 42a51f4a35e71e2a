use std::{
    fmt,
    ops::{Add, Sub},
};

/// Two-component vector, used both for pixel coordinates (`Vec2<i32>`) and
/// normalized coordinates (`Vec2<f32>`).
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Vec2<T> {
    pub x: T,
    pub y: T,
}

impl<T: fmt::Debug> fmt::Debug for Vec2<T> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_tuple("Vec2").field(&self.x).field(&self.y).finish()
    }
}

impl<T: Default> Default for Vec2<T> {
    fn default() -> Self {
        Self {
            x: T::default(),
            y: T::default(),
        }
    }
}

impl<T> Vec2<T> {
    pub const fn new(x: T, y: T) -> Self {
        Self { x, y }
    }
}

impl<T: Default> Vec2<T> {
    pub fn zero() -> Self {
        Self::default()
    }
}

impl<T: Default + PartialEq> Vec2<T> {
    pub fn is_zero(&self) -> bool {
        self.x == T::default() && self.y == T::default()
    }
}

impl<T: Add<Output = T>> Add for Vec2<T> {
    type Output = Self;
    fn add(self, rhs: Self) -> Self {
        Self {
            x: self.x + rhs.x,
            y: self.y + rhs.y,
        }
    }
}

impl<T: Sub<Output = T>> Sub for Vec2<T> {
    type Output = Self;
    fn sub(self, rhs: Self) -> Self {
        Self {
            x: self.x - rhs.x,
            y: self.y - rhs.y,
        }
    }
}

impl<T: PartialOrd + Copy> Vec2<T> {
    /// Component-wise minimum.
    pub fn min(self, rhs: Self) -> Self {
        Self {
            x: if rhs.x < self.x { rhs.x } else { self.x },
            y: if rhs.y < self.y { rhs.y } else { self.y },
        }
    }

    /// Component-wise maximum.
    pub fn max(self, rhs: Self) -> Self {
        Self {
            x: if rhs.x > self.x { rhs.x } else { self.x },
            y: if rhs.y > self.y { rhs.y } else { self.y },
        }
    }
}

impl Vec2<i32> {
    /// Convert to floats for normalization math.
    pub fn as_f32(self) -> Vec2<f32> {
        Vec2::new(self.x as f32, self.y as f32)
    }
}

impl From<(i32, i32)> for Vec2<i32> {
    fn from((x, y): (i32, i32)) -> Self {
        Self { x, y }
    }
}

impl<T> From<Vec2<T>> for [T; 2] {
    fn from(v: Vec2<T>) -> Self {
        [v.x, v.y]
    }
}
