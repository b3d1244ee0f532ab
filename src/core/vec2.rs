//! 2D Vector
//!
//! Screen-space vector used by every entity in the simulation.
//! Arithmetic mutates in place and returns `&mut Self` so calls chain,
//! operator overloads cover the by-value cases.

use std::fmt;
use serde::{Serialize, Deserialize};

/// 2D vector with `f32` components (screen space, +Y points down).
#[derive(Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct Vec2 {
    /// X component
    pub x: f32,
    /// Y component
    pub y: f32,
}

impl Vec2 {
    /// Zero vector
    pub const ZERO: Self = Self { x: 0.0, y: 0.0 };

    /// Unit vector pointing up the screen (-Y)
    pub const UP: Self = Self { x: 0.0, y: -1.0 };

    /// Unit vector pointing down the screen (+Y)
    pub const DOWN: Self = Self { x: 0.0, y: 1.0 };

    /// Create a new vector.
    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    /// Add another vector in place.
    #[inline]
    pub fn add(&mut self, other: Self) -> &mut Self {
        self.x += other.x;
        self.y += other.y;
        self
    }

    /// Subtract another vector in place.
    #[inline]
    pub fn subtract(&mut self, other: Self) -> &mut Self {
        self.x -= other.x;
        self.y -= other.y;
        self
    }

    /// Scale by a scalar in place.
    #[inline]
    pub fn multiply(&mut self, scalar: f32) -> &mut Self {
        self.x *= scalar;
        self.y *= scalar;
        self
    }

    /// Squared length (avoids sqrt - prefer this for comparisons).
    #[inline]
    pub fn length_squared(self) -> f32 {
        self.x * self.x + self.y * self.y
    }

    /// Length (magnitude).
    #[inline]
    pub fn length(self) -> f32 {
        self.length_squared().sqrt()
    }

    /// Normalize to unit length in place.
    /// A zero-length vector is left unchanged.
    #[inline]
    pub fn normalize(&mut self) -> &mut Self {
        let len = self.length();
        if len > 0.0 {
            self.x /= len;
            self.y /= len;
        }
        self
    }

    /// Normalized copy. Zero stays zero.
    #[inline]
    pub fn normalized(self) -> Self {
        let mut v = self;
        v.normalize();
        v
    }

    /// Independent copy, handy at the head of a mutating chain.
    #[inline]
    pub fn copy(&self) -> Self {
        *self
    }

    /// Whether both components are exactly zero.
    #[inline]
    pub fn is_zero(self) -> bool {
        self.x == 0.0 && self.y == 0.0
    }

    /// Whether both components are finite.
    #[inline]
    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite()
    }

    /// Dot product with another vector.
    #[inline]
    pub fn dot(self, other: Self) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// Rotate 90 degrees (`(-y, x)`).
    #[inline]
    pub fn perpendicular(self) -> Self {
        Self { x: -self.y, y: self.x }
    }

    /// Heading in radians.
    #[inline]
    pub fn angle(self) -> f32 {
        self.y.atan2(self.x)
    }

    /// Unit vector from a heading in radians.
    #[inline]
    pub fn from_angle(angle: f32) -> Self {
        Self { x: angle.cos(), y: angle.sin() }
    }

    /// Euclidean distance between two points.
    #[inline]
    pub fn distance(a: Self, b: Self) -> f32 {
        let dx = a.x - b.x;
        let dy = a.y - b.y;
        (dx * dx + dy * dy).sqrt()
    }
}

// Operator overloads for ergonomics
impl std::ops::Add for Vec2 {
    type Output = Self;
    #[inline]
    fn add(self, rhs: Self) -> Self {
        Self { x: self.x + rhs.x, y: self.y + rhs.y }
    }
}

impl std::ops::Sub for Vec2 {
    type Output = Self;
    #[inline]
    fn sub(self, rhs: Self) -> Self {
        Self { x: self.x - rhs.x, y: self.y - rhs.y }
    }
}

impl std::ops::Mul<f32> for Vec2 {
    type Output = Self;
    #[inline]
    fn mul(self, rhs: f32) -> Self {
        Self { x: self.x * rhs, y: self.y * rhs }
    }
}

impl std::ops::Neg for Vec2 {
    type Output = Self;
    #[inline]
    fn neg(self) -> Self {
        Self { x: -self.x, y: -self.y }
    }
}

impl std::ops::AddAssign for Vec2 {
    #[inline]
    fn add_assign(&mut self, rhs: Self) {
        self.x += rhs.x;
        self.y += rhs.y;
    }
}

impl fmt::Debug for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Vec2({:.3}, {:.3})", self.x, self.y)
    }
}

impl fmt::Display for Vec2 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.3}, {:.3})", self.x, self.y)
    }
}

// =============================================================================
// TESTS
// =============================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    #[test]
    fn test_vec2_chaining() {
        let mut v = Vec2::new(1.0, 2.0);
        v.add(Vec2::new(2.0, 2.0)).multiply(2.0).subtract(Vec2::new(1.0, 1.0));
        assert_eq!(v, Vec2::new(5.0, 7.0));
    }

    #[test]
    fn test_copy_is_independent() {
        let original = Vec2::new(3.0, 4.0);
        let mut copied = original.copy();
        copied.multiply(10.0);
        assert_eq!(original, Vec2::new(3.0, 4.0));
        assert_eq!(copied, Vec2::new(30.0, 40.0));
    }

    #[test]
    fn test_vec2_length() {
        // 3-4-5 triangle
        let v = Vec2::new(3.0, 4.0);
        assert_eq!(v.length_squared(), 25.0);
        assert_eq!(v.length(), 5.0);
    }

    #[test]
    fn test_vec2_distance() {
        let a = Vec2::new(1.0, 1.0);
        let b = Vec2::new(4.0, 5.0);
        assert_eq!(Vec2::distance(a, b), 5.0);
        assert_eq!(Vec2::distance(b, a), 5.0);
    }

    #[test]
    fn test_normalize_zero_is_noop() {
        let mut zero = Vec2::ZERO;
        zero.normalize();
        assert_eq!(zero, Vec2::ZERO);
        assert!(!zero.x.is_nan() && !zero.y.is_nan());
        assert_eq!(Vec2::ZERO.normalized(), Vec2::ZERO);
    }

    #[test]
    fn test_perpendicular_and_angle() {
        let right = Vec2::new(1.0, 0.0);
        assert_eq!(right.perpendicular(), Vec2::new(0.0, 1.0));
        assert_eq!(right.dot(right.perpendicular()), 0.0);
        assert!((Vec2::DOWN.angle() - std::f32::consts::FRAC_PI_2).abs() < 1e-6);

        let back = Vec2::from_angle(Vec2::UP.angle());
        assert!(Vec2::distance(back, Vec2::UP) < 1e-6);
    }

    #[test]
    fn test_operators() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(3.0, 5.0);
        assert_eq!(a + b, Vec2::new(4.0, 7.0));
        assert_eq!(b - a, Vec2::new(2.0, 3.0));
        assert_eq!(a * 3.0, Vec2::new(3.0, 6.0));
        assert_eq!(-a, Vec2::new(-1.0, -2.0));
    }

    proptest! {
        #[test]
        fn prop_normalize_is_unit_or_zero(x in -1.0e4f32..1.0e4, y in -1.0e4f32..1.0e4) {
            let n = Vec2::new(x, y).normalized();
            prop_assert!(n.is_finite());
            if x == 0.0 && y == 0.0 {
                prop_assert_eq!(n, Vec2::ZERO);
            } else {
                prop_assert!((n.length() - 1.0).abs() < 1e-4);
            }
        }
    }
}
