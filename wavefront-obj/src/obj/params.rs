//! Import configuration.

use std::path::PathBuf;

/// One of the six cardinal directions an OBJ exporter may have used for "up" or "forward" when it
/// wrote the file. Carried through so a caller can reorient the model afterward; this crate never
/// applies the transform itself.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Axis {
    PosX,
    PosY,
    PosZ,
    NegX,
    NegY,
    NegZ,
}

/// Parameters controlling a single [`crate::import`] call.
#[derive(Debug, Clone)]
pub struct ImportParams {
    pub path: PathBuf,
    /// Axis the source file treats as "up". Recorded, not applied.
    pub up_axis: Axis,
    /// Axis the source file treats as "forward". Recorded, not applied.
    pub forward_axis: Axis,
    /// Largest coordinate value to accept unmodified; informational only, see
    /// [`ImportParams::clamp_size`] callers for how they choose to act on it.
    pub clamp_size: f32,
}

impl ImportParams {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into(), up_axis: Axis::PosZ, forward_axis: Axis::NegY, clamp_size: 0.0 }
    }
}
