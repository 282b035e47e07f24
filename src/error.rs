//! Error type for the sector precomputation.

use thiserror::Error;

use crate::dimensions::Dimensions;

/// Errors reported at the precomputation entry boundary.
///
/// Every variant is raised before any sector assignment runs, so an error
/// never comes with partial output.
#[derive(Debug, Clone, Error, PartialEq)]
pub enum PrecomputeError {
    #[error("sector width must be positive")]
    ZeroSectorWidth,

    #[error("oversampling factor must be finite and positive, got {0}")]
    InvalidOversampling(f64),

    /// A zero grid extent leaves no sectors to assign samples to.
    #[error("grid {grid} produces no sectors")]
    EmptySectorGrid { grid: Dimensions },

    /// Sector ordinals are `x + height * (y + depth * z)`, which is only
    /// one-to-one for some sector grid shapes. Accepted: equal extents on
    /// every axis, planar grids with `width == height`, and shapes where
    /// single-sector axes make the strides line up (e.g. `w x 1 x 1`,
    /// `2 x 1 x 2`). Rejected: general anisotropic grids such as `24x24x21`,
    /// non-square planar grids, and grids with more than `u32::MAX` sectors.
    /// See [`crate::sector_grid::is_dense_linearization`].
    #[error("sector grid {sector_dims} is unsupported: ordinals must be dense and fit in u32")]
    UnsupportedSectorGrid { sector_dims: Dimensions },

    #[error("grid has {grid_axes} axes but samples have {sample_axes}")]
    AxisCountMismatch {
        grid_axes: usize,
        sample_axes: usize,
    },

    #[error("samples must have 2 or 3 axes, got {0}")]
    InvalidAxisCount(usize),

    #[error("axis {axis} has {actual} coordinates, expected {expected}")]
    MismatchedAxisLengths {
        axis: usize,
        expected: usize,
        actual: usize,
    },

    #[error("buffer of length {len} cannot be split into {axes} axes")]
    MalformedBuffer { len: usize, axes: usize },

    #[error("sample {sample} axis {axis} coordinate {value} is outside [-0.5, 0.5]")]
    CoordinateOutOfRange { sample: usize, axis: usize, value: f32 },

    #[error("{0} samples exceed the u32 ordinal range")]
    TooManySamples(usize),
}

pub type Result<T> = std::result::Result<T, PrecomputeError>;
