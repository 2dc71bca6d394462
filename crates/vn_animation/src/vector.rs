// SPDX-License-Identifier: MIT OR Apache-2.0
//! 2D vector math for animated positions.

use serde::{Deserialize, Serialize};
use std::ops::{Add, Div, Mul, Sub};

/// A 2D vector
#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vector2 {
    /// Horizontal component
    pub x: f64,
    /// Vertical component
    pub y: f64,
}

impl Vector2 {
    /// Zero vector
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Create a new vector
    pub fn new(x: f64, y: f64) -> Self {
        Self { x, y }
    }

    /// Unit vector at `angle` radians
    pub fn from_angle(angle: f64) -> Self {
        Self::new(angle.cos(), angle.sin())
    }

    /// Euclidean length
    pub fn len(self) -> f64 {
        self.x.hypot(self.y)
    }

    /// Same direction with length one. The zero vector has no direction and
    /// yields NaN components.
    pub fn normalize(self) -> Self {
        self / self.len()
    }

    /// Distance to another point
    pub fn distance(self, other: Self) -> f64 {
        (self - other).len()
    }
}

impl Add for Vector2 {
    type Output = Self;

    fn add(self, rhs: Self) -> Self {
        Self::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Add<f64> for Vector2 {
    type Output = Self;

    fn add(self, rhs: f64) -> Self {
        Self::new(self.x + rhs, self.y + rhs)
    }
}

impl Sub for Vector2 {
    type Output = Self;

    fn sub(self, rhs: Self) -> Self {
        Self::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Sub<f64> for Vector2 {
    type Output = Self;

    fn sub(self, rhs: f64) -> Self {
        Self::new(self.x - rhs, self.y - rhs)
    }
}

impl Mul<f64> for Vector2 {
    type Output = Self;

    fn mul(self, rhs: f64) -> Self {
        Self::new(self.x * rhs, self.y * rhs)
    }
}

impl Div<f64> for Vector2 {
    type Output = Self;

    fn div(self, rhs: f64) -> Self {
        Self::new(self.x / rhs, self.y / rhs)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_arithmetic() {
        let v = Vector2::new(3.0, 4.0);
        assert_eq!(v.len(), 5.0);
        assert_eq!(v + 1.0, Vector2::new(4.0, 5.0));
        assert_eq!(v - Vector2::new(1.0, 1.0), Vector2::new(2.0, 3.0));
        assert_eq!(v * 2.0, Vector2::new(6.0, 8.0));
        assert_eq!(v.normalize(), Vector2::new(0.6, 0.8));
        assert_eq!(Vector2::ZERO.distance(v), 5.0);
    }
}
