//! Errors returned by the validated (`try_*`) construction paths.

/// Degenerate geometric input rejected by a `try_*` operation.
///
/// The unchecked operations never produce this; they return NaN/Inf instead.
#[derive(Debug, Clone, Copy, PartialEq, Eq, thiserror::Error)]
pub enum MathError {
    /// The value has zero (or subnormal) magnitude and cannot be normalized.
    #[error("cannot normalize a zero-length value")]
    ZeroLength,

    /// At least one component is NaN or infinite.
    #[error("value contains NaN or infinite components")]
    NonFinite,

    /// The two directions point in opposite directions, so the rotation axis
    /// between them is undefined.
    #[error("rotation between anti-parallel directions is undefined")]
    AntiParallel,

    /// The rotation is the identity and has no defined axis.
    #[error("identity rotation has no defined axis")]
    NoRotationAxis,
}
