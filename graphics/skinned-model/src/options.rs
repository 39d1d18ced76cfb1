//! Load and evaluation options for skinned models

use crate::error::{ModelError, Result};

/// Ticks per second assumed when an animation does not specify its rate
pub const DEFAULT_TICKS_PER_SECOND: f64 = 25.0;

/// Memory layout of each 4x4 matrix written into a bone matrix buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub enum MatrixLayout {
    /// Columns are stored one after another (OpenGL/WebGPU uniform layout)
    #[default]
    ColumnMajor,
    /// Rows are stored one after another
    RowMajor,
}

impl MatrixLayout {
    /// Flatten a matrix into the first 16 scalars of `out` using this layout
    ///
    /// Returns false and leaves `out` untouched when it is too short.
    pub fn write(self, matrix: &glam::Mat4, out: &mut [f32]) -> bool {
        let Some(slot) = out.get_mut(..16) else {
            return false;
        };
        let data = match self {
            Self::ColumnMajor => matrix.to_cols_array(),
            Self::RowMajor => matrix.transpose().to_cols_array(),
        };
        slot.copy_from_slice(&data);
        true
    }
}

/// Options controlling how models are built and animated
#[derive(Debug, Clone, PartialEq)]
#[cfg_attr(feature = "serde-support", derive(serde::Serialize, serde::Deserialize))]
pub struct ModelOptions {
    /// Allowed deviation of a vertex's summed bone weights from 1.0
    pub weight_tolerance: f32,
    /// Whether to check per-vertex weight sums while building meshes
    pub validate_weights: bool,
    /// Rate used for animations that report zero ticks per second
    pub default_ticks_per_second: f64,
    /// Layout of the matrices produced by pose evaluation
    pub matrix_layout: MatrixLayout,
    /// Whether keyframe tracks that are out of order get sorted on load
    pub sort_unordered_keys: bool,
}

impl Default for ModelOptions {
    fn default() -> Self {
        Self {
            weight_tolerance: 0.001,
            validate_weights: true,
            default_ticks_per_second: DEFAULT_TICKS_PER_SECOND,
            matrix_layout: MatrixLayout::ColumnMajor,
            sort_unordered_keys: true,
        }
    }
}

impl ModelOptions {
    /// Check that the options are usable
    pub fn validate(&self) -> Result<()> {
        if !self.weight_tolerance.is_finite() || self.weight_tolerance < 0.0 {
            return Err(ModelError::ValidationError(format!(
                "weight tolerance must be a non-negative number, got {}",
                self.weight_tolerance
            )));
        }

        if !self.default_ticks_per_second.is_finite() || self.default_ticks_per_second <= 0.0 {
            return Err(ModelError::ValidationError(format!(
                "default ticks per second must be positive, got {}",
                self.default_ticks_per_second
            )));
        }

        Ok(())
    }
}
