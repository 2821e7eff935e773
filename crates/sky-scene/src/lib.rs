//! Objects placed in the sky scene and the camera flight model.
//!
//! World positions are kept in f64; everything handed to the renderer is
//! camera-relative f32, so precision is spent where the viewer is.

mod flight;
mod object;

pub use flight::{FlightController, FlightInput};
pub use object::SceneObject;
