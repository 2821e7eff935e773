//! Vector, quaternion, and affine matrix algebra for the sky simulation.
//!
//! Everything here is a small `Copy` value type. The per-frame paths never
//! validate their inputs: degenerate geometry (zero-length vectors,
//! anti-parallel directions, non-unit quaternions) propagates NaN/Inf the way
//! real-time math conventionally does. The `try_*` constructors are the
//! validated path for data that is not trusted, such as deserialized scenes.

mod error;
mod interop;
mod rotation;
mod transform;
mod vector;

pub use error::MathError;
pub use rotation::Rotation;
pub use transform::Transform4x4;
pub use vector::{Vector3, direction_vector, normal_vector, triangle_normal};

/// Small number for comparing floating point values.
///
/// This is the single tolerance shared by every `approx_eq` call site that
/// does not have a better domain-specific bound.
pub const DELTA: f32 = 1e-6;

/// Convert degrees to radians.
pub fn deg_to_rad(degrees: f32) -> f32 {
    degrees * 0.017_453_292_519_94
}

/// Convert radians to degrees.
pub fn rad_to_deg(radians: f32) -> f32 {
    radians * 57.295_779_513_08
}
