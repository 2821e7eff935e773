use std::fmt;
use std::ops::{
    Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign,
};

use crate::{DELTA, MathError};

/// Single-precision 3D vector used for directions, offsets, and velocities.
///
/// Positions far from the origin should stay in `f64` (`glam::DVec3`) and be
/// brought into this type only after subtracting a nearby reference point.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq, Default)]
pub struct Vector3 {
    pub x: f32,
    pub y: f32,
    pub z: f32,
}

impl Vector3 {
    /// (0, 0, 0)
    pub const ZERO: Self = Self::new(0.0, 0.0, 0.0);
    /// (1, 0, 0)
    pub const X: Self = Self::new(1.0, 0.0, 0.0);
    /// (0, 1, 0)
    pub const Y: Self = Self::new(0.0, 1.0, 0.0);
    /// (0, 0, 1)
    pub const Z: Self = Self::new(0.0, 0.0, 1.0);

    /// Create a new vector with the given components.
    pub const fn new(x: f32, y: f32, z: f32) -> Self {
        Self { x, y, z }
    }

    /// Vector with all three components set to `v`.
    pub const fn splat(v: f32) -> Self {
        Self::new(v, v, v)
    }

    /// Narrow a double-precision vector to single precision.
    pub fn from_f64(x: f64, y: f64, z: f64) -> Self {
        Self::new(x as f32, y as f32, z as f32)
    }

    pub fn to_array(self) -> [f32; 3] {
        [self.x, self.y, self.z]
    }

    /// Returns the dot product: x₁x₂ + y₁y₂ + z₁z₂
    pub fn dot(self, rhs: Vector3) -> f32 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z
    }

    /// Returns the right-handed cross product self × rhs.
    pub fn cross(self, rhs: Vector3) -> Vector3 {
        Vector3::new(
            self.y * rhs.z - self.z * rhs.y,
            self.z * rhs.x - self.x * rhs.z,
            self.x * rhs.y - self.y * rhs.x,
        )
    }

    pub fn magnitude_squared(self) -> f32 {
        self.dot(self)
    }

    pub fn magnitude(self) -> f32 {
        self.magnitude_squared().sqrt()
    }

    pub fn distance_squared(self, rhs: Vector3) -> f32 {
        (self - rhs).magnitude_squared()
    }

    pub fn distance(self, rhs: Vector3) -> f32 {
        (self - rhs).magnitude()
    }

    /// Point halfway between `self` and `rhs`.
    pub fn midpoint(self, rhs: Vector3) -> Vector3 {
        (self - rhs) / 2.0 + rhs
    }

    /// Component-wise mean of `self` and `rhs`.
    pub fn average(self, rhs: Vector3) -> Vector3 {
        (self + rhs) / 2.0
    }

    /// Scale this vector to unit length in place.
    ///
    /// A zero vector divides by zero and becomes NaN. Callers that cannot rule
    /// that out should use [`Vector3::try_normalized`].
    pub fn normalize(&mut self) {
        *self /= self.magnitude();
    }

    /// Unit-length copy of this vector. Same zero-vector caveat as
    /// [`Vector3::normalize`].
    pub fn normalized(self) -> Vector3 {
        self / self.magnitude()
    }

    /// Unit-length copy, or an error for zero-length or non-finite input.
    ///
    /// Divides by the largest component first, so finite vectors whose
    /// squared magnitude would overflow still normalize correctly.
    pub fn try_normalized(self) -> Result<Vector3, MathError> {
        if !self.is_finite() {
            return Err(MathError::NonFinite);
        }
        let largest = self.x.abs().max(self.y.abs()).max(self.z.abs());
        if largest == 0.0 {
            return Err(MathError::ZeroLength);
        }
        let scaled = self / largest;
        let scaled_magnitude = scaled.magnitude();
        if largest * scaled_magnitude <= DELTA {
            return Err(MathError::ZeroLength);
        }
        Ok(scaled / scaled_magnitude)
    }

    pub fn is_finite(self) -> bool {
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite()
    }

    /// Angle in radians between two unit vectors.
    pub fn angle(self, rhs: Vector3) -> f32 {
        self.dot(rhs).acos()
    }

    /// Reflect this vector about the plane with unit normal `normal`,
    /// preserving its magnitude.
    pub fn reflect(self, normal: Vector3) -> Vector3 {
        let length = self.magnitude();
        let unit = self / length;
        (unit - normal * (2.0 * unit.dot(normal))) * length
    }

    /// Rotate this vector by `angle` radians around the unit vector `axis`:
    ///
    /// `v·cosθ + (axis·v)(1 − cosθ)·axis + (v × axis)·sinθ`
    ///
    /// With the `v × axis` term a positive angle turns clockwise when viewed
    /// from the tip of `axis` looking back at the origin.
    pub fn rotate(self, angle: f32, axis: Vector3) -> Vector3 {
        let (sin, cos) = angle.sin_cos();
        self * cos + axis * (axis.dot(self) * (1.0 - cos)) + self.cross(axis) * sin
    }

    /// Returns true if all components are within epsilon of the other.
    pub fn approx_eq(self, other: Vector3, epsilon: f32) -> bool {
        (self.x - other.x).abs() <= epsilon
            && (self.y - other.y).abs() <= epsilon
            && (self.z - other.z).abs() <= epsilon
    }
}

/// Normalized cross product of two vectors.
pub fn normal_vector(a: Vector3, b: Vector3) -> Vector3 {
    a.cross(b).normalized()
}

/// Normal of the triangle (p1, p2, p3), assuming counter-clockwise winding.
pub fn triangle_normal(p1: Vector3, p2: Vector3, p3: Vector3) -> Vector3 {
    normal_vector(p2 - p1, p3 - p1)
}

/// Unit direction pointing from `from` to `to`. NaN when the points coincide.
pub fn direction_vector(from: Vector3, to: Vector3) -> Vector3 {
    (to - from).normalized()
}

impl fmt::Display for Vector3 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "({:.6}, {:.6}, {:.6})", self.x, self.y, self.z)
    }
}

impl From<[f32; 3]> for Vector3 {
    fn from(a: [f32; 3]) -> Self {
        Vector3::new(a[0], a[1], a[2])
    }
}

impl From<Vector3> for [f32; 3] {
    fn from(v: Vector3) -> Self {
        v.to_array()
    }
}

impl Index<usize> for Vector3 {
    type Output = f32;

    fn index(&self, index: usize) -> &f32 {
        match index {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            _ => panic!("Vector3 index out of range: {index}"),
        }
    }
}

impl IndexMut<usize> for Vector3 {
    fn index_mut(&mut self, index: usize) -> &mut f32 {
        match index {
            0 => &mut self.x,
            1 => &mut self.y,
            2 => &mut self.z,
            _ => panic!("Vector3 index out of range: {index}"),
        }
    }
}

impl Neg for Vector3 {
    type Output = Vector3;

    fn neg(self) -> Self::Output {
        Vector3::new(-self.x, -self.y, -self.z)
    }
}

impl Add for Vector3 {
    type Output = Vector3;

    fn add(self, rhs: Vector3) -> Self::Output {
        Vector3::new(self.x + rhs.x, self.y + rhs.y, self.z + rhs.z)
    }
}

impl Sub for Vector3 {
    type Output = Vector3;

    fn sub(self, rhs: Vector3) -> Self::Output {
        Vector3::new(self.x - rhs.x, self.y - rhs.y, self.z - rhs.z)
    }
}

impl Mul for Vector3 {
    type Output = Vector3;

    fn mul(self, rhs: Vector3) -> Self::Output {
        Vector3::new(self.x * rhs.x, self.y * rhs.y, self.z * rhs.z)
    }
}

impl Div for Vector3 {
    type Output = Vector3;

    fn div(self, rhs: Vector3) -> Self::Output {
        Vector3::new(self.x / rhs.x, self.y / rhs.y, self.z / rhs.z)
    }
}

impl Add<f32> for Vector3 {
    type Output = Vector3;

    fn add(self, rhs: f32) -> Self::Output {
        Vector3::new(self.x + rhs, self.y + rhs, self.z + rhs)
    }
}

impl Sub<f32> for Vector3 {
    type Output = Vector3;

    fn sub(self, rhs: f32) -> Self::Output {
        Vector3::new(self.x - rhs, self.y - rhs, self.z - rhs)
    }
}

impl Mul<f32> for Vector3 {
    type Output = Vector3;

    fn mul(self, rhs: f32) -> Self::Output {
        Vector3::new(self.x * rhs, self.y * rhs, self.z * rhs)
    }
}

impl Mul<Vector3> for f32 {
    type Output = Vector3;

    fn mul(self, rhs: Vector3) -> Self::Output {
        rhs * self
    }
}

impl Div<f32> for Vector3 {
    type Output = Vector3;

    fn div(self, rhs: f32) -> Self::Output {
        Vector3::new(self.x / rhs, self.y / rhs, self.z / rhs)
    }
}

impl AddAssign for Vector3 {
    fn add_assign(&mut self, rhs: Vector3) {
        self.x += rhs.x;
        self.y += rhs.y;
        self.z += rhs.z;
    }
}

impl SubAssign for Vector3 {
    fn sub_assign(&mut self, rhs: Vector3) {
        self.x -= rhs.x;
        self.y -= rhs.y;
        self.z -= rhs.z;
    }
}

impl MulAssign for Vector3 {
    fn mul_assign(&mut self, rhs: Vector3) {
        self.x *= rhs.x;
        self.y *= rhs.y;
        self.z *= rhs.z;
    }
}

impl DivAssign for Vector3 {
    fn div_assign(&mut self, rhs: Vector3) {
        self.x /= rhs.x;
        self.y /= rhs.y;
        self.z /= rhs.z;
    }
}

impl AddAssign<f32> for Vector3 {
    fn add_assign(&mut self, rhs: f32) {
        self.x += rhs;
        self.y += rhs;
        self.z += rhs;
    }
}

impl SubAssign<f32> for Vector3 {
    fn sub_assign(&mut self, rhs: f32) {
        self.x -= rhs;
        self.y -= rhs;
        self.z -= rhs;
    }
}

impl MulAssign<f32> for Vector3 {
    fn mul_assign(&mut self, rhs: f32) {
        self.x *= rhs;
        self.y *= rhs;
        self.z *= rhs;
    }
}

impl DivAssign<f32> for Vector3 {
    fn div_assign(&mut self, rhs: f32) {
        self.x /= rhs;
        self.y /= rhs;
        self.z /= rhs;
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::{FRAC_PI_2, PI};

    #[test]
    fn test_arithmetic_is_component_wise() {
        let a = Vector3::new(1.0, 2.0, 3.0);
        let b = Vector3::new(4.0, 5.0, 6.0);
        assert_eq!(a + b, Vector3::new(5.0, 7.0, 9.0));
        assert_eq!(b - a, Vector3::new(3.0, 3.0, 3.0));
        assert_eq!(a * b, Vector3::new(4.0, 10.0, 18.0));
        assert_eq!(b / a, Vector3::new(4.0, 2.5, 2.0));
        assert_eq!(a * 2.0, Vector3::new(2.0, 4.0, 6.0));
        assert_eq!(2.0 * a, Vector3::new(2.0, 4.0, 6.0));
        assert_eq!(a + 1.0, Vector3::new(2.0, 3.0, 4.0));
        assert_eq!(-a, Vector3::new(-1.0, -2.0, -3.0));
    }

    #[test]
    fn test_compound_assignment() {
        let mut v = Vector3::new(1.0, 2.0, 3.0);
        v += Vector3::splat(1.0);
        v *= 2.0;
        v -= 1.0;
        v /= Vector3::new(1.0, 5.0, 7.0);
        assert_eq!(v, Vector3::new(3.0, 1.0, 1.0));
    }

    #[test]
    fn test_indexing() {
        let mut v = Vector3::new(7.0, 8.0, 9.0);
        assert_eq!(v[0], 7.0);
        assert_eq!(v[2], 9.0);
        v[1] = -1.0;
        assert_eq!(v.y, -1.0);
    }

    #[test]
    #[should_panic(expected = "out of range")]
    fn test_index_out_of_range_panics() {
        let v = Vector3::ZERO;
        let _ = v[3];
    }

    #[test]
    fn test_dot_and_cross() {
        assert_eq!(Vector3::X.dot(Vector3::Y), 0.0);
        assert_eq!(Vector3::new(1.0, 2.0, 3.0).dot(Vector3::new(4.0, 5.0, 6.0)), 32.0);
        assert_eq!(Vector3::X.cross(Vector3::Y), Vector3::Z);
        assert_eq!(Vector3::Y.cross(Vector3::Z), Vector3::X);
        assert_eq!(Vector3::Z.cross(Vector3::X), Vector3::Y);
        assert_eq!(Vector3::Y.cross(Vector3::X), -Vector3::Z);
    }

    #[test]
    fn test_magnitude_and_distance() {
        let v = Vector3::new(3.0, 4.0, 0.0);
        assert_eq!(v.magnitude_squared(), 25.0);
        assert_eq!(v.magnitude(), 5.0);
        assert_eq!(Vector3::ZERO.distance(v), 5.0);
        assert_eq!(Vector3::ZERO.distance_squared(v), 25.0);
    }

    #[test]
    fn test_midpoint_and_average_agree() {
        let a = Vector3::new(-2.0, 4.0, 10.0);
        let b = Vector3::new(6.0, 0.0, 2.0);
        assert!(a.midpoint(b).approx_eq(Vector3::new(2.0, 2.0, 6.0), DELTA));
        assert!(a.average(b).approx_eq(a.midpoint(b), DELTA));
    }

    #[test]
    fn test_normalize_produces_unit_vector() {
        let mut v = Vector3::new(10.0, -3.0, 2.5);
        v.normalize();
        assert!((v.magnitude() - 1.0).abs() < 1e-6);
    }

    #[test]
    fn test_normalize_zero_vector_is_nan() {
        let v = Vector3::ZERO.normalized();
        assert!(v.x.is_nan() && v.y.is_nan() && v.z.is_nan());
    }

    #[test]
    fn test_try_normalized_rejects_degenerate_input() {
        assert_eq!(Vector3::ZERO.try_normalized(), Err(MathError::ZeroLength));
        assert_eq!(
            Vector3::new(f32::NAN, 0.0, 1.0).try_normalized(),
            Err(MathError::NonFinite)
        );
        let unit = Vector3::new(0.0, 0.0, -4.0).try_normalized().unwrap();
        assert_eq!(unit, -Vector3::Z);
    }

    #[test]
    fn test_try_normalized_handles_huge_components() {
        let v = Vector3::new(1e20, 1e20, 1e20);
        assert!(v.magnitude().is_infinite());
        let unit = v.try_normalized().unwrap();
        assert!((unit.magnitude() - 1.0).abs() < 1e-6);
        assert!(unit.approx_eq(Vector3::splat(1.0 / 3f32.sqrt()), 1e-6));
        assert_eq!(
            Vector3::new(1e-7, 0.0, 0.0).try_normalized(),
            Err(MathError::ZeroLength)
        );
    }

    #[test]
    fn test_reflect_off_floor() {
        let incoming = Vector3::new(1.0, -1.0, 0.0);
        let reflected = incoming.reflect(Vector3::Y);
        assert!(reflected.approx_eq(Vector3::new(1.0, 1.0, 0.0), 1e-6));
        assert!((reflected.magnitude() - incoming.magnitude()).abs() < 1e-6);
    }

    #[test]
    fn test_rotate_about_z_turns_clockwise() {
        let rotated = Vector3::X.rotate(FRAC_PI_2, Vector3::Z);
        assert!(rotated.approx_eq(-Vector3::Y, 1e-6));
    }

    #[test]
    fn test_rotate_preserves_axis_component_and_length() {
        let axis = Vector3::new(1.0, 1.0, 1.0).normalized();
        let v = Vector3::new(0.3, -2.0, 5.0);
        let rotated = v.rotate(1.234, axis);
        assert!((rotated.magnitude() - v.magnitude()).abs() < 1e-5);
        assert!((rotated.dot(axis) - v.dot(axis)).abs() < 1e-5);
    }

    #[test]
    fn test_rotate_full_turn_is_identity() {
        let v = Vector3::new(0.5, 0.25, -1.0);
        assert!(v.rotate(2.0 * PI, Vector3::Y).approx_eq(v, 1e-5));
    }

    #[test]
    fn test_angle_between_axes() {
        assert!((Vector3::X.angle(Vector3::Y) - FRAC_PI_2).abs() < 1e-6);
        assert!((Vector3::X.angle(-Vector3::X) - PI).abs() < 1e-6);
    }

    #[test]
    fn test_normal_helpers() {
        assert_eq!(normal_vector(Vector3::X * 3.0, Vector3::Y * 2.0), Vector3::Z);
        let n = triangle_normal(
            Vector3::ZERO,
            Vector3::new(1.0, 0.0, 0.0),
            Vector3::new(0.0, 1.0, 0.0),
        );
        assert_eq!(n, Vector3::Z);
        let d = direction_vector(Vector3::new(1.0, 1.0, 1.0), Vector3::new(1.0, 1.0, 5.0));
        assert_eq!(d, Vector3::Z);
    }

    #[test]
    fn test_approx_eq_tolerance_is_per_call() {
        let a = Vector3::new(1.0, 2.0, 3.0);
        let b = Vector3::new(1.0005, 2.0, 3.0);
        assert!(a.approx_eq(b, 1e-3));
        assert!(!a.approx_eq(b, DELTA));
        assert_ne!(a, b);
    }

    #[test]
    fn test_array_conversion() {
        let v = Vector3::from([1.0, 2.0, 3.0]);
        let a: [f32; 3] = v.into();
        assert_eq!(a, [1.0, 2.0, 3.0]);
        assert_eq!(Vector3::from_f64(1.5, -2.5, 0.0), Vector3::new(1.5, -2.5, 0.0));
    }

    #[test]
    fn test_display() {
        assert_eq!(
            format!("{}", Vector3::new(1.0, -2.0, 0.5)),
            "(1.000000, -2.000000, 0.500000)"
        );
    }
}
