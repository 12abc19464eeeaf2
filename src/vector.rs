use std::ops::{Add, AddAssign, Mul, Neg, Sub, SubAssign};

use crate::world::GridCoord;

/// 2D float vector, used both as a grid-space position and as a direction.
#[derive(Clone, Copy, Debug, Default, PartialEq)]
pub struct Vec2 {
    pub x: f32,
    pub y: f32,
}

impl Vec2 {
    pub const ZERO: Vec2 = Vec2::new(0.0, 0.0);
    pub const X: Vec2 = Vec2::new(1.0, 0.0);
    pub const Y: Vec2 = Vec2::new(0.0, 1.0);

    #[inline]
    pub const fn new(x: f32, y: f32) -> Self {
        Self { x, y }
    }

    #[inline]
    pub fn scale(self, k: f32) -> Self {
        Self::new(self.x * k, self.y * k)
    }

    #[inline]
    pub fn dot(self, other: Vec2) -> f32 {
        self.x * other.x + self.y * other.y
    }

    /// `(y, -x)`
    #[inline]
    pub fn perpendicular(self) -> Self {
        Self::new(self.y, -self.x)
    }

    #[inline]
    pub fn length(self) -> f32 {
        (self.x * self.x + self.y * self.y).sqrt()
    }

    /// Unit vector with the same direction.
    ///
    /// Panics on a zero-length vector; callers must never normalize one.
    #[inline]
    pub fn normalize(self) -> Self {
        let l = self.length();
        assert!(l > 0.0, "cannot normalize zero-length vector {self:?}");
        Self::new(self.x / l, self.y / l)
    }

    /// Rotation in the flipped-Y screen frame:
    /// `(x cos a + y sin a, -x sin a + y cos a)`.
    ///
    /// Positive angles turn clockwise in math axes, which reads as
    /// counter-clockwise on a y-down screen.
    #[inline]
    pub fn rotate(self, angle: f32) -> Self {
        let c = angle.cos();
        let s = angle.sin();
        Self::new(self.x * c + self.y * s, -self.x * s + self.y * c)
    }

    /// Grid cell containing this point (truncation toward zero).
    #[inline]
    pub fn cell(self) -> GridCoord {
        GridCoord::new(self.x as i32, self.y as i32)
    }
}

impl Add for Vec2 {
    type Output = Vec2;

    #[inline]
    fn add(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x + rhs.x, self.y + rhs.y)
    }
}

impl Sub for Vec2 {
    type Output = Vec2;

    #[inline]
    fn sub(self, rhs: Vec2) -> Vec2 {
        Vec2::new(self.x - rhs.x, self.y - rhs.y)
    }
}

impl Mul<f32> for Vec2 {
    type Output = Vec2;

    #[inline]
    fn mul(self, k: f32) -> Vec2 {
        self.scale(k)
    }
}

impl Neg for Vec2 {
    type Output = Vec2;

    #[inline]
    fn neg(self) -> Vec2 {
        Vec2::new(-self.x, -self.y)
    }
}

impl AddAssign for Vec2 {
    #[inline]
    fn add_assign(&mut self, rhs: Vec2) {
        *self = *self + rhs;
    }
}

impl SubAssign for Vec2 {
    #[inline]
    fn sub_assign(&mut self, rhs: Vec2) {
        *self = *self - rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::FRAC_PI_2;

    fn close(a: Vec2, b: Vec2) -> bool {
        (a.x - b.x).abs() < 1e-6 && (a.y - b.y).abs() < 1e-6
    }

    #[test]
    fn arithmetic() {
        let a = Vec2::new(1.0, 2.0);
        let b = Vec2::new(3.0, -1.0);
        assert_eq!(a + b, Vec2::new(4.0, 1.0));
        assert_eq!(a - b, Vec2::new(-2.0, 3.0));
        assert_eq!(a * 2.0, Vec2::new(2.0, 4.0));
        assert_eq!(a.dot(b), 1.0);
        assert_eq!(-a, Vec2::new(-1.0, -2.0));
    }

    #[test]
    fn perpendicular_is_orthogonal() {
        let v = Vec2::new(3.0, 4.0);
        assert_eq!(v.perpendicular(), Vec2::new(4.0, -3.0));
        assert_eq!(v.dot(v.perpendicular()), 0.0);
    }

    #[test]
    fn normalize_gives_unit_length() {
        let n = Vec2::new(3.0, 4.0).normalize();
        assert!((n.length() - 1.0).abs() < 1e-6);
        assert!(close(n, Vec2::new(0.6, 0.8)));
        // (0, 0.66) collapses to the unit plane
        assert!(close(Vec2::new(0.0, 0.66).normalize(), Vec2::Y));
    }

    #[test]
    #[should_panic(expected = "zero-length")]
    fn normalize_zero_panics() {
        let _ = Vec2::ZERO.normalize();
    }

    #[test]
    fn rotate_uses_flipped_y_convention() {
        // a quarter turn sends +x to -y, not +y
        assert!(close(Vec2::X.rotate(FRAC_PI_2), Vec2::new(0.0, -1.0)));
        assert!(close(Vec2::Y.rotate(FRAC_PI_2), Vec2::new(1.0, 0.0)));
        assert_eq!(Vec2::new(0.3, -0.7).rotate(0.0), Vec2::new(0.3, -0.7));
    }

    #[test]
    fn cell_truncates() {
        assert_eq!(Vec2::new(1.9, 2.1).cell(), GridCoord::new(1, 2));
    }
}
