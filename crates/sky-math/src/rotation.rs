use std::fmt;
use std::ops::{
    Add, AddAssign, Div, DivAssign, Index, IndexMut, Mul, MulAssign, Neg, Sub, SubAssign,
};

use crate::{DELTA, MathError, Transform4x4, Vector3};

/// Quaternion with the scalar part last: (x, y, z, w).
///
/// Used both as a raw 4-vector and as an orientation. Only unit quaternions
/// represent rotations; nothing here renormalizes automatically, so code that
/// accumulates incremental rotations must call [`Rotation::normalize`] itself
/// (`SceneObject` does this after every mutation).
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Rotation {
    pub x: f32,
    pub y: f32,
    pub z: f32,
    pub w: f32,
}

impl Rotation {
    /// The identity rotation (0, 0, 0, 1).
    pub const IDENTITY: Self = Self::new(0.0, 0.0, 0.0, 1.0);

    pub const fn new(x: f32, y: f32, z: f32, w: f32) -> Self {
        Self { x, y, z, w }
    }

    /// Pure quaternion (v, 0), the form a vector takes in the sandwich product.
    pub const fn from_vector(v: Vector3) -> Self {
        Self::new(v.x, v.y, v.z, 0.0)
    }

    pub fn from_array(a: [f32; 4]) -> Self {
        Self::new(a[0], a[1], a[2], a[3])
    }

    pub fn to_array(self) -> [f32; 4] {
        [self.x, self.y, self.z, self.w]
    }

    /// Rotation of `angle` radians around `axis`.
    ///
    /// `axis` must already be unit length; it is not normalized here.
    pub fn from_axis_angle(axis: Vector3, angle: f32) -> Self {
        let (sin, cos) = (angle * 0.5).sin_cos();
        Self::new(axis.x * sin, axis.y * sin, axis.z * sin, cos)
    }

    /// Validated [`Rotation::from_axis_angle`]: normalizes `axis` and rejects
    /// zero-length or non-finite input.
    pub fn try_from_axis_angle(axis: Vector3, angle: f32) -> Result<Self, MathError> {
        if !angle.is_finite() {
            return Err(MathError::NonFinite);
        }
        Ok(Self::from_axis_angle(axis.try_normalized()?, angle))
    }

    /// Extract the rotation from the upper-left 3x3 of an orthonormal matrix.
    pub fn from_matrix(m: &Transform4x4) -> Self {
        // m[(c, r)] is column c, row r.
        let m00 = m[(0, 0)];
        let m11 = m[(1, 1)];
        let m22 = m[(2, 2)];
        let trace = m00 + m11 + m22;

        if trace > 0.0 {
            let s = (trace + 1.0).sqrt() * 2.0;
            Self::new(
                (m[(1, 2)] - m[(2, 1)]) / s,
                (m[(2, 0)] - m[(0, 2)]) / s,
                (m[(0, 1)] - m[(1, 0)]) / s,
                0.25 * s,
            )
        } else if m00 > m11 && m00 > m22 {
            let s = (1.0 + m00 - m11 - m22).sqrt() * 2.0;
            Self::new(
                0.25 * s,
                (m[(1, 0)] + m[(0, 1)]) / s,
                (m[(2, 0)] + m[(0, 2)]) / s,
                (m[(1, 2)] - m[(2, 1)]) / s,
            )
        } else if m11 > m22 {
            let s = (1.0 + m11 - m00 - m22).sqrt() * 2.0;
            Self::new(
                (m[(1, 0)] + m[(0, 1)]) / s,
                0.25 * s,
                (m[(2, 1)] + m[(1, 2)]) / s,
                (m[(2, 0)] - m[(0, 2)]) / s,
            )
        } else {
            let s = (1.0 + m22 - m00 - m11).sqrt() * 2.0;
            Self::new(
                (m[(2, 0)] + m[(0, 2)]) / s,
                (m[(2, 1)] + m[(1, 2)]) / s,
                0.25 * s,
                (m[(0, 1)] - m[(1, 0)]) / s,
            )
        }
    }

    /// Returns `(axis, angle)`.
    ///
    /// The identity rotation (w = ±1) divides by `sin(0)` and yields a NaN
    /// axis; use [`Rotation::try_to_axis_angle`] when that can happen.
    pub fn to_axis_angle(self) -> (Vector3, f32) {
        let half = self.w.acos();
        let axis = self.vector_part() / half.sin();
        (axis, half * 2.0)
    }

    /// Validated [`Rotation::to_axis_angle`] on the normalized quaternion.
    pub fn try_to_axis_angle(self) -> Result<(Vector3, f32), MathError> {
        let q = self.try_normalized()?;
        let sin_half = (1.0 - q.w * q.w).max(0.0).sqrt();
        if sin_half <= DELTA {
            return Err(MathError::NoRotationAxis);
        }
        let half = q.w.clamp(-1.0, 1.0).acos();
        Ok((q.vector_part() / sin_half, half * 2.0))
    }

    /// The (x, y, z) part.
    pub fn vector_part(self) -> Vector3 {
        Vector3::new(self.x, self.y, self.z)
    }

    /// 4D dot product.
    pub fn dot(self, rhs: Rotation) -> f32 {
        self.x * rhs.x + self.y * rhs.y + self.z * rhs.z + self.w * rhs.w
    }

    pub fn magnitude_squared(self) -> f32 {
        self.dot(self)
    }

    pub fn magnitude(self) -> f32 {
        self.magnitude_squared().sqrt()
    }

    /// Divide all four components by the magnitude. Zero input becomes NaN.
    pub fn normalize(&mut self) {
        *self /= self.magnitude();
    }

    pub fn normalized(self) -> Rotation {
        self / self.magnitude()
    }

    /// Unit-length copy, or an error for zero-length or non-finite input.
    /// Scales by the largest component first so huge finite values do not
    /// overflow.
    pub fn try_normalized(self) -> Result<Rotation, MathError> {
        if !self.is_finite() {
            return Err(MathError::NonFinite);
        }
        let largest = self
            .x
            .abs()
            .max(self.y.abs())
            .max(self.z.abs())
            .max(self.w.abs());
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
        self.x.is_finite() && self.y.is_finite() && self.z.is_finite() && self.w.is_finite()
    }

    /// True when the magnitude is within `epsilon` of one.
    pub fn is_unit(self, epsilon: f32) -> bool {
        (self.magnitude_squared() - 1.0).abs() <= epsilon
    }

    /// Negates the vector part.
    pub fn conjugate(self) -> Rotation {
        Rotation::new(-self.x, -self.y, -self.z, self.w)
    }

    /// General inverse: conjugate / |q|².
    pub fn inverse(self) -> Rotation {
        self.conjugate() / self.magnitude_squared()
    }

    /// Inverse of a unit quaternion. Silently wrong for non-unit input.
    pub fn unit_inverse(self) -> Rotation {
        self.conjugate()
    }

    /// Rotate `v` with the sandwich product `q · (v, 0) · q⁻¹`.
    pub fn rotate_vector(self, v: Vector3) -> Vector3 {
        (self * Rotation::from_vector(v) * self.unit_inverse()).vector_part()
    }

    /// Prepend `q` in world space: `self = q * self`.
    pub fn rotate(&mut self, q: Rotation) {
        *self = q * *self;
    }

    /// Prepend a rotation of `angle` radians about the unit vector `axis`.
    pub fn rotate_axis_angle(&mut self, axis: Vector3, angle: f32) {
        self.rotate(Rotation::from_axis_angle(axis, angle));
    }

    /// Prepend the rotation that turns unit direction `from` onto unit
    /// direction `to`.
    ///
    /// Anti-parallel directions have a zero cross product and produce NaN.
    pub fn rotate_between(&mut self, from: Vector3, to: Vector3) {
        let axis = from.cross(to).normalized();
        self.rotate_axis_angle(axis, from.dot(to).acos());
    }

    /// Validated [`Rotation::rotate_between`]. Parallel directions leave the
    /// rotation unchanged; anti-parallel ones are rejected.
    pub fn try_rotate_between(&mut self, from: Vector3, to: Vector3) -> Result<(), MathError> {
        let from = from.try_normalized()?;
        let to = to.try_normalized()?;
        let cos = from.dot(to).clamp(-1.0, 1.0);
        let cross = from.cross(to);
        if cross.magnitude() <= DELTA {
            if cos > 0.0 {
                return Ok(());
            }
            return Err(MathError::AntiParallel);
        }
        self.rotate_axis_angle(cross.normalized(), cos.acos());
        Ok(())
    }

    // Each axis is one column of the equivalent rotation matrix.

    /// Direction the object faces: the negated third column (-Z forward).
    pub fn view_axis(self) -> Vector3 {
        // 6 muls, 7 adds
        let (x2, y2, z2) = (self.x + self.x, self.y + self.y, self.z + self.z);
        let (xx, xz) = (self.x * x2, self.x * z2);
        let (yy, yz) = (self.y * y2, self.y * z2);
        let (wx, wy) = (self.w * x2, self.w * y2);
        -Vector3::new(xz + wy, yz - wx, 1.0 - (xx + yy))
    }

    pub fn up_axis(self) -> Vector3 {
        // 6 muls, 7 adds
        let (x2, y2, z2) = (self.x + self.x, self.y + self.y, self.z + self.z);
        let (xx, xy) = (self.x * x2, self.x * y2);
        let (yz, zz) = (self.y * z2, self.z * z2);
        let (wx, wz) = (self.w * x2, self.w * z2);
        Vector3::new(xy - wz, 1.0 - (xx + zz), yz + wx)
    }

    pub fn right_axis(self) -> Vector3 {
        // 6 muls, 7 adds
        let (x2, y2, z2) = (self.x + self.x, self.y + self.y, self.z + self.z);
        let (xy, xz) = (self.x * y2, self.x * z2);
        let (yy, zz) = (self.y * y2, self.z * z2);
        let (wy, wz) = (self.w * y2, self.w * z2);
        Vector3::new(1.0 - (yy + zz), xy + wz, xz - wy)
    }

    /// Spherical linear interpolation from `self` (t = 0) to `to` (t = 1)
    /// along the shorter arc. Both inputs must be unit quaternions.
    pub fn slerp(self, to: Rotation, t: f32) -> Rotation {
        let mut cos = self.dot(to);
        let mut end = to;
        // q and -q are the same orientation; flip to take the short way round.
        if cos < 0.0 {
            end = -end;
            cos = -cos;
        }

        // Nearly parallel: sin(θ) → 0, fall back to normalized lerp.
        if cos > 0.9995 {
            return (self + (end - self) * t).normalized();
        }

        let theta = cos.acos();
        let sin = theta.sin();
        let a = ((1.0 - t) * theta).sin() / sin;
        let b = (t * theta).sin() / sin;
        self * a + end * b
    }

    /// Returns true if all components are within epsilon of the other.
    pub fn approx_eq(self, other: Rotation, epsilon: f32) -> bool {
        (self.x - other.x).abs() <= epsilon
            && (self.y - other.y).abs() <= epsilon
            && (self.z - other.z).abs() <= epsilon
            && (self.w - other.w).abs() <= epsilon
    }

    /// Like [`Rotation::approx_eq`] but treats q and -q as equal, since both
    /// encode the same orientation.
    pub fn approx_eq_orientation(self, other: Rotation, epsilon: f32) -> bool {
        self.approx_eq(other, epsilon) || self.approx_eq(-other, epsilon)
    }
}

impl Default for Rotation {
    fn default() -> Self {
        Self::IDENTITY
    }
}

impl fmt::Display for Rotation {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "({:.6}, {:.6}, {:.6}, {:.6})",
            self.x, self.y, self.z, self.w
        )
    }
}

impl From<[f32; 4]> for Rotation {
    fn from(a: [f32; 4]) -> Self {
        Rotation::from_array(a)
    }
}

impl From<Rotation> for [f32; 4] {
    fn from(q: Rotation) -> Self {
        q.to_array()
    }
}

impl Index<usize> for Rotation {
    type Output = f32;

    fn index(&self, index: usize) -> &f32 {
        match index {
            0 => &self.x,
            1 => &self.y,
            2 => &self.z,
            3 => &self.w,
            _ => panic!("Rotation index out of range: {index}"),
        }
    }
}

impl IndexMut<usize> for Rotation {
    fn index_mut(&mut self, index: usize) -> &mut f32 {
        match index {
            0 => &mut self.x,
            1 => &mut self.y,
            2 => &mut self.z,
            3 => &mut self.w,
            _ => panic!("Rotation index out of range: {index}"),
        }
    }
}

/// Hamilton product. `a * b` applies `b` first, then `a`.
impl Mul for Rotation {
    type Output = Rotation;

    fn mul(self, q: Rotation) -> Self::Output {
        // 16 muls, 12 adds
        Rotation::new(
            self.w * q.x + self.x * q.w + self.y * q.z - self.z * q.y,
            self.w * q.y - self.x * q.z + self.y * q.w + self.z * q.x,
            self.w * q.z + self.x * q.y - self.y * q.x + self.z * q.w,
            self.w * q.w - self.x * q.x - self.y * q.y - self.z * q.z,
        )
    }
}

impl MulAssign for Rotation {
    fn mul_assign(&mut self, rhs: Rotation) {
        *self = *self * rhs;
    }
}

impl Neg for Rotation {
    type Output = Rotation;

    fn neg(self) -> Self::Output {
        Rotation::new(-self.x, -self.y, -self.z, -self.w)
    }
}

impl Add for Rotation {
    type Output = Rotation;

    fn add(self, q: Rotation) -> Self::Output {
        Rotation::new(self.x + q.x, self.y + q.y, self.z + q.z, self.w + q.w)
    }
}

impl Sub for Rotation {
    type Output = Rotation;

    fn sub(self, q: Rotation) -> Self::Output {
        Rotation::new(self.x - q.x, self.y - q.y, self.z - q.z, self.w - q.w)
    }
}

impl AddAssign for Rotation {
    fn add_assign(&mut self, q: Rotation) {
        *self = *self + q;
    }
}

impl SubAssign for Rotation {
    fn sub_assign(&mut self, q: Rotation) {
        *self = *self - q;
    }
}

impl Add<f32> for Rotation {
    type Output = Rotation;

    fn add(self, f: f32) -> Self::Output {
        Rotation::new(self.x + f, self.y + f, self.z + f, self.w + f)
    }
}

impl Sub<f32> for Rotation {
    type Output = Rotation;

    fn sub(self, f: f32) -> Self::Output {
        Rotation::new(self.x - f, self.y - f, self.z - f, self.w - f)
    }
}

impl Mul<f32> for Rotation {
    type Output = Rotation;

    fn mul(self, f: f32) -> Self::Output {
        Rotation::new(self.x * f, self.y * f, self.z * f, self.w * f)
    }
}

impl Div<f32> for Rotation {
    type Output = Rotation;

    fn div(self, f: f32) -> Self::Output {
        Rotation::new(self.x / f, self.y / f, self.z / f, self.w / f)
    }
}

impl MulAssign<f32> for Rotation {
    fn mul_assign(&mut self, f: f32) {
        *self = *self * f;
    }
}

impl DivAssign<f32> for Rotation {
    fn div_assign(&mut self, f: f32) {
        *self = *self / f;
    }
}
