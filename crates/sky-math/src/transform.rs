use std::fmt;
use std::ops::{Index, IndexMut, Mul, MulAssign};

use crate::{Rotation, Vector3, deg_to_rad};

/// 4x4 matrix stored column-major, the layout OpenGL uniforms expect.
///
/// ```text
/// | m[0] m[4] m[8]  m[12] |   | (0,0) (1,0) (2,0) (3,0) |
/// | m[1] m[5] m[9]  m[13] |   | (0,1) (1,1) (2,1) (3,1) |
/// | m[2] m[6] m[10] m[14] | = | (0,2) (1,2) (2,2) (3,2) |
/// | m[3] m[7] m[11] m[15] |   | (0,3) (1,3) (2,3) (3,3) |
/// ```
///
/// `m[(c, r)]` addresses column `c`, row `r`, i.e. `m[4 * c + r]`.
///
/// Apart from [`Transform4x4::projection_matrix`], every operation assumes
/// the bottom row is `[0 0 0 1]`: the matrix holds rotation, translation and
/// scale only. Products and transforms skip the bottom row entirely, so
/// feeding them a projective matrix gives wrong results without warning.
#[repr(C)]
#[derive(Clone, Copy, Debug, PartialEq)]
pub struct Transform4x4 {
    m: [f32; 16],
}

impl Transform4x4 {
    pub const IDENTITY: Self = Self {
        m: [
            1.0, 0.0, 0.0, 0.0, //
            0.0, 1.0, 0.0, 0.0, //
            0.0, 0.0, 1.0, 0.0, //
            0.0, 0.0, 0.0, 1.0,
        ],
    };

    pub const ZERO: Self = Self { m: [0.0; 16] };

    /// Build from sixteen values in column-major order.
    pub const fn from_cols_array(m: [f32; 16]) -> Self {
        Self { m }
    }

    /// Every entry set to `f`.
    pub const fn splat(f: f32) -> Self {
        Self { m: [f; 16] }
    }

    /// Column-major entries, ready for a uniform upload.
    pub fn as_array(&self) -> &[f32; 16] {
        &self.m
    }

    pub fn to_cols_array(&self) -> [f32; 16] {
        self.m
    }

    pub fn set_zero(&mut self) {
        *self = Self::ZERO;
    }

    pub fn set_identity(&mut self) {
        *self = Self::IDENTITY;
    }

    /// The translation column (m[12], m[13], m[14]).
    pub fn translation(&self) -> Vector3 {
        Vector3::new(self.m[12], self.m[13], self.m[14])
    }

    pub fn set_translation(&mut self, t: Vector3) {
        self.m[12] = t.x;
        self.m[13] = t.y;
        self.m[14] = t.z;
    }

    /// Transform `v` as a point: the translation column is added.
    pub fn transform_vector(&self, v: Vector3) -> Vector3 {
        // 9 muls, 9 adds
        let m = &self.m;
        Vector3::new(
            m[0] * v.x + m[4] * v.y + m[8] * v.z + m[12],
            m[1] * v.x + m[5] * v.y + m[9] * v.z + m[13],
            m[2] * v.x + m[6] * v.y + m[10] * v.z + m[14],
        )
    }

    /// Transform `v` as a direction through the transposed upper-left 3x3,
    /// ignoring translation.
    ///
    /// For an orthonormal matrix this applies the inverse rotation; for a
    /// scaled or skewed one the result is not meaningful.
    pub fn transform_normal(&self, v: Vector3) -> Vector3 {
        // 9 muls, 6 adds
        let m = &self.m;
        Vector3::new(
            m[0] * v.x + m[1] * v.y + m[2] * v.z,
            m[4] * v.x + m[5] * v.y + m[6] * v.z,
            m[8] * v.x + m[9] * v.y + m[10] * v.z,
        )
    }

    /// A pure translation matrix.
    pub fn translation_matrix(x: f32, y: f32, z: f32) -> Self {
        let mut out = Self::IDENTITY;
        out.set_translation(Vector3::new(x, y, z));
        out
    }

    /// Post-multiply by a translation: `self = self * T(x, y, z)`.
    pub fn translate(&mut self, x: f32, y: f32, z: f32) {
        // 9 muls, 9 adds
        let m = &mut self.m;
        m[12] += m[0] * x + m[4] * y + m[8] * z;
        m[13] += m[1] * x + m[5] * y + m[9] * z;
        m[14] += m[2] * x + m[6] * y + m[10] * z;
    }

    /// A pure scale matrix.
    pub fn scale_matrix(x: f32, y: f32, z: f32) -> Self {
        let mut out = Self::IDENTITY;
        out.m[0] = x;
        out.m[5] = y;
        out.m[10] = z;
        out
    }

    /// Post-multiply by a scale: `self = self * S(x, y, z)`.
    pub fn scale(&mut self, x: f32, y: f32, z: f32) {
        // 9 muls
        for (column, factor) in [x, y, z].into_iter().enumerate() {
            for row in 0..3 {
                self.m[4 * column + row] *= factor;
            }
        }
    }

    /// Right-handed rotation of `radians` about +X.
    pub fn rotation_x_matrix(radians: f32) -> Self {
        // | 1 0    0    0 |
        // | 0 cos -sin  0 |
        // | 0 sin  cos  0 |
        // | 0 0    0    1 |
        let (sin, cos) = radians.sin_cos();
        let mut out = Self::IDENTITY;
        out.m[5] = cos;
        out.m[6] = sin;
        out.m[9] = -sin;
        out.m[10] = cos;
        out
    }

    /// Post-multiply by [`Transform4x4::rotation_x_matrix`]. Only columns 1
    /// and 2 change.
    pub fn rotate_x(&mut self, radians: f32) {
        // 12 muls, 6 adds, 2 trig function calls
        let (sin, cos) = radians.sin_cos();
        for row in 0..3 {
            let c1 = self.m[4 + row];
            let c2 = self.m[8 + row];
            self.m[4 + row] = c1 * cos + c2 * sin;
            self.m[8 + row] = c2 * cos - c1 * sin;
        }
    }

    /// Right-handed rotation of `radians` about +Y.
    pub fn rotation_y_matrix(radians: f32) -> Self {
        // |  cos 0 sin 0 |
        // |  0   1 0   0 |
        // | -sin 0 cos 0 |
        // |  0   0 0   1 |
        let (sin, cos) = radians.sin_cos();
        let mut out = Self::IDENTITY;
        out.m[0] = cos;
        out.m[2] = -sin;
        out.m[8] = sin;
        out.m[10] = cos;
        out
    }

    /// Post-multiply by [`Transform4x4::rotation_y_matrix`]. Only columns 0
    /// and 2 change.
    pub fn rotate_y(&mut self, radians: f32) {
        // 12 muls, 6 adds, 2 trig function calls
        let (sin, cos) = radians.sin_cos();
        for row in 0..3 {
            let c0 = self.m[row];
            let c2 = self.m[8 + row];
            self.m[row] = c0 * cos - c2 * sin;
            self.m[8 + row] = c0 * sin + c2 * cos;
        }
    }

    /// Right-handed rotation of `radians` about +Z.
    pub fn rotation_z_matrix(radians: f32) -> Self {
        // | cos -sin 0 0 |
        // | sin  cos 0 0 |
        // | 0    0   1 0 |
        // | 0    0   0 1 |
        let (sin, cos) = radians.sin_cos();
        let mut out = Self::IDENTITY;
        out.m[0] = cos;
        out.m[1] = sin;
        out.m[4] = -sin;
        out.m[5] = cos;
        out
    }

    /// Post-multiply by [`Transform4x4::rotation_z_matrix`]. Only columns 0
    /// and 1 change.
    pub fn rotate_z(&mut self, radians: f32) {
        // 12 muls, 6 adds, 2 trig function calls
        let (sin, cos) = radians.sin_cos();
        for row in 0..3 {
            let c0 = self.m[row];
            let c1 = self.m[4 + row];
            self.m[row] = c0 * cos + c1 * sin;
            self.m[4 + row] = c1 * cos - c0 * sin;
        }
    }

    /// Right-handed rotation of `radians` about the unit vector `axis`.
    pub fn rotation_axis_matrix(axis: Vector3, radians: f32) -> Self {
        // 15 muls, 10 adds, 2 trig function calls
        let (sin, cos) = radians.sin_cos();
        let a = axis * (1.0 - cos);
        let s = axis * sin;
        Self::from_cols_array([
            axis.x * a.x + cos,
            axis.y * a.x + s.z,
            axis.z * a.x - s.y,
            0.0,
            axis.x * a.y - s.z,
            axis.y * a.y + cos,
            axis.z * a.y + s.x,
            0.0,
            axis.x * a.z + s.y,
            axis.y * a.z - s.x,
            axis.z * a.z + cos,
            0.0,
            0.0,
            0.0,
            0.0,
            1.0,
        ])
    }

    /// Post-multiply by [`Transform4x4::rotation_axis_matrix`].
    pub fn rotate(&mut self, axis: Vector3, radians: f32) {
        *self *= Self::rotation_axis_matrix(axis, radians);
    }

    /// Place an object in the world: rotation from `orientation`, translation
    /// `position`.
    pub fn model_matrix(orientation: Rotation, position: Vector3) -> Self {
        let mut out = Self::from(orientation);
        out.set_translation(position);
        out
    }

    /// Model matrix from an orthonormal basis. Columns are right, up, −view
    /// (objects look down −Z) and the `from` position.
    pub fn model_matrix_from_basis(
        from: Vector3,
        view: Vector3,
        up: Vector3,
        right: Vector3,
    ) -> Self {
        Self::from_cols_array([
            right.x, right.y, right.z, 0.0, //
            up.x, up.y, up.z, 0.0, //
            -view.x, -view.y, -view.z, 0.0, //
            from.x, from.y, from.z, 1.0,
        ])
    }

    /// Model matrix for an object at `from` facing `at`, with `up` as the
    /// approximate up direction. Degenerate when `at == from` or the view
    /// direction is parallel to `up`.
    pub fn model_matrix_look_at(from: Vector3, at: Vector3, up: Vector3) -> Self {
        let (view, up, right) = look_at_basis(from, at, up);
        Self::model_matrix_from_basis(from, view, up, right)
    }

    /// World-to-camera transform for a camera at `position` with
    /// `orientation`: the transposed rotation and a translation of
    /// −(Rᵀ · position).
    pub fn view_matrix(orientation: Rotation, position: Vector3) -> Self {
        let mut out = Self::from(orientation);
        out.transpose();
        let m = &mut out.m;
        let p = position;
        m[12] = -(p.x * m[0] + p.y * m[4] + p.z * m[8]);
        m[13] = -(p.x * m[1] + p.y * m[5] + p.z * m[9]);
        m[14] = -(p.x * m[2] + p.y * m[6] + p.z * m[10]);
        out
    }

    /// View matrix from an orthonormal basis. Right, up and −view become the
    /// rows of the rotation part and the translation is −(from · axis).
    pub fn view_matrix_from_basis(
        from: Vector3,
        view: Vector3,
        up: Vector3,
        right: Vector3,
    ) -> Self {
        // 9 muls, 9 adds
        Self::from_cols_array([
            right.x,
            up.x,
            -view.x,
            0.0,
            right.y,
            up.y,
            -view.y,
            0.0,
            right.z,
            up.z,
            -view.z,
            0.0,
            -from.dot(right),
            -from.dot(up),
            from.dot(view),
            1.0,
        ])
    }

    /// Look-at view matrix for a camera at `from` facing `at`.
    pub fn view_matrix_look_at(from: Vector3, at: Vector3, up: Vector3) -> Self {
        let (view, up, right) = look_at_basis(from, at, up);
        Self::view_matrix_from_basis(from, view, up, right)
    }

    /// OpenGL-style perspective projection (right-handed, clip depth in
    /// [−w, w]) with a vertical field of view in degrees.
    ///
    /// This is the one projective matrix in the type; do not multiply or
    /// transpose it with the affine operations.
    pub fn projection_matrix(near: f32, far: f32, fov_degrees: f32, aspect: f32) -> Self {
        // 2 muls, 3 divs, 2 adds, 1 trig function call
        let h = 1.0 / deg_to_rad(fov_degrees * 0.5).tan();
        let inv_depth = 1.0 / (near - far);
        let mut out = Self::ZERO;
        out.m[0] = h / aspect;
        out.m[5] = h;
        out.m[10] = (near + far) * inv_depth;
        out.m[11] = -1.0;
        out.m[14] = 2.0 * near * far * inv_depth;
        out
    }

    /// Swap rows and columns in place.
    ///
    /// For an orthonormal rotation this is also the inverse of the rotation
    /// part. Nothing checks that precondition; see
    /// [`Transform4x4::is_orthonormal`].
    pub fn transpose(&mut self) {
        let m = &mut self.m;
        m.swap(1, 4);
        m.swap(2, 8);
        m.swap(3, 12);
        m.swap(6, 9);
        m.swap(7, 13);
        m.swap(11, 14);
    }

    pub fn transposed(mut self) -> Self {
        self.transpose();
        self
    }

    /// True when the upper-left 3x3 has unit, mutually orthogonal columns.
    pub fn is_orthonormal(&self, epsilon: f32) -> bool {
        let column = |c: usize| Vector3::new(self.m[4 * c], self.m[4 * c + 1], self.m[4 * c + 2]);
        let (c0, c1, c2) = (column(0), column(1), column(2));
        [c0, c1, c2]
            .iter()
            .all(|c| (c.magnitude_squared() - 1.0).abs() <= epsilon)
            && c0.dot(c1).abs() <= epsilon
            && c0.dot(c2).abs() <= epsilon
            && c1.dot(c2).abs() <= epsilon
    }

    /// Returns true if all entries are within epsilon of the other.
    ///
    /// `==` compares bit-for-bit and is meant for matrices that should be
    /// computed identically; use this for geometric comparisons.
    pub fn approx_eq(&self, other: &Transform4x4, epsilon: f32) -> bool {
        self.m
            .iter()
            .zip(other.m.iter())
            .all(|(a, b)| (a - b).abs() <= epsilon)
    }

    pub fn is_finite(&self) -> bool {
        self.m.iter().all(|v| v.is_finite())
    }
}

/// Orthonormal (view, up, right) basis for a viewer at `from` looking at `at`.
fn look_at_basis(from: Vector3, at: Vector3, up: Vector3) -> (Vector3, Vector3, Vector3) {
    let view = (at - from).normalized();
    let right = view.cross(up).normalized();
    let true_up = right.cross(view).normalized();
    (view, true_up, right)
}

impl Default for Transform4x4 {
    fn default() -> Self {
        Self::IDENTITY
    }
}

/// Rotation matrix of a unit quaternion.
impl From<Rotation> for Transform4x4 {
    fn from(q: Rotation) -> Self {
        // 9 muls, 15 adds
        let (x2, y2, z2) = (q.x + q.x, q.y + q.y, q.z + q.z);
        let (xx, xy, xz) = (q.x * x2, q.x * y2, q.x * z2);
        let (yy, yz, zz) = (q.y * y2, q.y * z2, q.z * z2);
        let (wx, wy, wz) = (q.w * x2, q.w * y2, q.w * z2);
        Self::from_cols_array([
            1.0 - (yy + zz),
            xy + wz,
            xz - wy,
            0.0,
            xy - wz,
            1.0 - (xx + zz),
            yz + wx,
            0.0,
            xz + wy,
            yz - wx,
            1.0 - (xx + yy),
            0.0,
            0.0,
            0.0,
            0.0,
            1.0,
        ])
    }
}

impl From<[f32; 16]> for Transform4x4 {
    fn from(m: [f32; 16]) -> Self {
        Self::from_cols_array(m)
    }
}

impl Index<usize> for Transform4x4 {
    type Output = f32;

    fn index(&self, index: usize) -> &f32 {
        &self.m[index]
    }
}

impl IndexMut<usize> for Transform4x4 {
    fn index_mut(&mut self, index: usize) -> &mut f32 {
        &mut self.m[index]
    }
}

/// `(column, row)` access.
impl Index<(usize, usize)> for Transform4x4 {
    type Output = f32;

    fn index(&self, (column, row): (usize, usize)) -> &f32 {
        &self.m[4 * column + row]
    }
}

impl IndexMut<(usize, usize)> for Transform4x4 {
    fn index_mut(&mut self, (column, row): (usize, usize)) -> &mut f32 {
        &mut self.m[4 * column + row]
    }
}

/// Affine product: both operands are assumed to have a `[0 0 0 1]` bottom
/// row, and so does the result.
impl Mul for Transform4x4 {
    type Output = Transform4x4;

    fn mul(self, rhs: Transform4x4) -> Self::Output {
        // 36 muls, 27 adds
        let mut out = Self::IDENTITY;
        for column in 0..4 {
            for row in 0..3 {
                let mut value = self[(0, row)] * rhs[(column, 0)]
                    + self[(1, row)] * rhs[(column, 1)]
                    + self[(2, row)] * rhs[(column, 2)];
                if column == 3 {
                    value += self[(3, row)];
                }
                out[(column, row)] = value;
            }
        }
        out
    }
}

impl MulAssign for Transform4x4 {
    fn mul_assign(&mut self, rhs: Transform4x4) {
        *self = *self * rhs;
    }
}

impl Mul<Vector3> for Transform4x4 {
    type Output = Vector3;

    fn mul(self, v: Vector3) -> Self::Output {
        self.transform_vector(v)
    }
}

impl fmt::Display for Transform4x4 {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for row in 0..4 {
            writeln!(
                f,
                "| {:>10.5} {:>10.5} {:>10.5} {:>10.5} |",
                self[(0, row)],
                self[(1, row)],
                self[(2, row)],
                self[(3, row)]
            )?;
        }
        Ok(())
    }
}
