//! Mapping normalized sample coordinates to sectors.

use glam::{UVec3, Vec3};

use crate::dimensions::Dimensions;
use crate::samples::SampleCoords;

/// Sector containing `coord` on an axis split into `axis_sector_count` sectors.
///
/// `floor((coord + 0.5) * count)`. A coordinate on an interior boundary goes to
/// the higher sector; the outer boundary `0.5` is clamped into the last one.
/// `coord` must lie in [-0.5, 0.5].
#[inline]
pub fn sector_index(coord: f32, axis_sector_count: usize) -> u32 {
    debug_assert!(axis_sector_count > 0);
    let count = axis_sector_count as u32;
    let sector = ((coord + 0.5) * axis_sector_count as f32).floor() as u32;
    sector.min(count - 1)
}

/// Per-axis sector index of `coord`. Planar sector grids ignore `coord.z`.
#[inline]
pub fn sector_index_vector(coord: Vec3, sector_dims: Dimensions) -> UVec3 {
    let z = match sector_dims.depth {
        Some(depth) => sector_index(coord.z, depth),
        None => 0,
    };
    UVec3::new(
        sector_index(coord.x, sector_dims.width),
        sector_index(coord.y, sector_dims.height),
        z,
    )
}

/// Sector ordinal: `x + height * (y + depth * z)`, or `x + height * y` for a
/// planar sector grid.
#[inline]
pub fn linearize(index: UVec3, sector_dims: Dimensions) -> usize {
    let (x, y, z) = (index.x as usize, index.y as usize, index.z as usize);
    match sector_dims.depth {
        Some(depth) => x + sector_dims.height * (y + depth * z),
        None => x + sector_dims.height * y,
    }
}

#[inline]
fn sector_of(samples: &SampleCoords, i: usize, sector_dims: Dimensions) -> u32 {
    linearize(sector_index_vector(samples.point3(i), sector_dims), sector_dims) as u32
}

/// Sector ordinal of every sample, in sample order.
pub fn assign_sectors(samples: &SampleCoords, sector_dims: Dimensions) -> Vec<u32> {
    (0..samples.len())
        .map(|i| sector_of(samples, i, sector_dims))
        .collect()
}

/// Parallel [`assign_sectors`]. Each sample is independent, so the result is
/// identical.
pub fn assign_sectors_par(samples: &SampleCoords, sector_dims: Dimensions) -> Vec<u32> {
    #[cfg(not(feature = "single-threaded"))]
    {
        use rayon::prelude::*;
        (0..samples.len())
            .into_par_iter()
            .map(|i| sector_of(samples, i, sector_dims))
            .collect()
    }
    #[cfg(feature = "single-threaded")]
    {
        assign_sectors(samples, sector_dims)
    }
}
