//! Sector decomposition of the oversampled grid.
//!
//! The grid is cut into cuboid sectors `sector_width` cells wide on every
//! axis. The last sector on an axis is narrower when the extent is not a
//! multiple of the width; ceiling division takes care of that and nothing
//! downstream special-cases it.

use glam::UVec3;

use crate::dimensions::Dimensions;
use crate::sector_mapper::{linearize, sector_index};

/// Number of sectors along one axis: `ceil(extent / sector_width)`.
#[inline]
pub fn sector_count_per_axis(extent: usize, sector_width: usize) -> usize {
    debug_assert!(sector_width > 0, "sector_width must be positive");
    extent.div_ceil(sector_width)
}

/// Sector grid dimensions for `grid`, applying [`sector_count_per_axis`] per axis.
pub fn sector_grid_dimensions(grid: Dimensions, sector_width: usize) -> Dimensions {
    grid.map(|extent| sector_count_per_axis(extent, sector_width))
}

pub fn total_sector_count(grid: Dimensions, sector_width: usize) -> usize {
    sector_grid_dimensions(grid, sector_width).count()
}

/// `axis_sector_count + 1` boundaries evenly spaced over [-0.5, 0.5].
///
/// Diagnostic only: sector assignment computes the index directly with
/// [`sector_index`]. Interior boundary `i` is the smallest f32 that
/// [`sector_index`] puts in sector `i`, so the table and the mapper agree on
/// every boundary coordinate, not only the exactly representable ones.
pub fn sector_boundaries(axis_sector_count: usize) -> Vec<f32> {
    let count = axis_sector_count;
    (0..=count)
        .map(|i| {
            if i == 0 {
                return -0.5;
            }
            if i == count {
                return 0.5;
            }
            let mut b = (-0.5 + i as f64 / count as f64) as f32;
            while (sector_index(b, count) as usize) < i {
                b = b.next_up();
            }
            while sector_index(b.next_down(), count) as usize >= i {
                b = b.next_down();
            }
            b
        })
        .collect()
}

/// Whether `x + height * (y + depth * z)` maps the sector grid one-to-one onto
/// `0..sector_dims.count()`.
///
/// The ordinal strides by `height` and `depth` rather than `width` and
/// `height`, so it is only dense when, ignoring single-sector axes, every
/// stride equals the product of the extents below it.
///
/// A grid whose sector count overflows `usize` is never dense.
pub fn is_dense_linearization(sector_dims: Dimensions) -> bool {
    let (w, h) = (sector_dims.width, sector_dims.height);
    let d = sector_dims.depth_or_one();
    if sector_dims.is_empty() {
        return true;
    }
    // Every stride and running product below is bounded by the count.
    if sector_dims.checked_count().is_none() {
        return false;
    }

    // (stride, extent) per axis.
    let mut axes = [(1, w), (h, h), (h * d, d)];
    axes.sort_by_key(|&(stride, _)| stride);

    let mut expected = 1;
    for (stride, extent) in axes {
        if extent == 1 {
            continue;
        }
        if stride != expected {
            return false;
        }
        expected *= extent;
    }
    true
}

/// Center of every sector in grid cells, indexed by sector ordinal.
///
/// `center = index * sector_width + sector_width / 2` on each axis. The
/// truncated edge sector keeps the same offset, so its center may sit past
/// the middle of the cells it actually covers. Planar grids report `z = 0`.
///
/// Panics if the sector grid does not have a dense linearization.
pub fn sector_centers(sector_dims: Dimensions, sector_width: usize) -> Vec<UVec3> {
    assert!(
        is_dense_linearization(sector_dims),
        "sector_centers requires a dense sector ordinal layout, got {sector_dims}"
    );
    let half = (sector_width / 2) as u32;
    let width = sector_width as u32;
    let center = |i: usize| i as u32 * width + half;

    let mut centers = vec![UVec3::ZERO; sector_dims.count()];
    for z in 0..sector_dims.depth_or_one() {
        for y in 0..sector_dims.height {
            for x in 0..sector_dims.width {
                let index = UVec3::new(x as u32, y as u32, z as u32);
                let cz = if sector_dims.is_planar() { 0 } else { center(z) };
                centers[linearize(index, sector_dims)] = UVec3::new(center(x), center(y), cz);
            }
        }
    }
    centers
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPS: f32 = 1e-4;

    #[test]
    fn test_sector_count_per_axis() {
        assert_eq!(sector_count_per_axis(128, 8), 16);
        assert_eq!(sector_count_per_axis(124, 8), 16);
        assert_eq!(sector_count_per_axis(7, 8), 1);
        assert_eq!(sector_count_per_axis(120, 8), 15);
        assert_eq!(sector_count_per_axis(0, 8), 0);
    }

    #[test]
    fn test_isotropic_sector_dims() {
        let osr = 1.5;
        let grid = Dimensions::isotropic(128).scaled(osr);
        let sectors = sector_count_per_axis(grid.width, 8);
        assert_eq!(sectors, 24);

        let expected = (16.0 * 16.0 * 16.0 * osr * osr * osr) as usize;
        assert_eq!(total_sector_count(grid, 8), expected);
        assert_eq!(sector_grid_dimensions(grid, 8).count(), expected);
    }

    #[test]
    fn test_anisotropic_sector_dims() {
        let osr = 1.5;
        let grid = Dimensions::new(128, 128, 128 - 16) * osr;
        let expected = (16.0 * 16.0 * 14.0 * osr * osr * osr) as usize;

        assert_eq!(total_sector_count(grid, 8), expected);
        assert_eq!(
            sector_grid_dimensions(grid, 8),
            Dimensions::new(24, 24, 21)
        );
    }

    #[test]
    fn test_planar_sector_dims_stay_planar() {
        let dims = sector_grid_dimensions(Dimensions::planar(24, 20), 8);
        assert_eq!(dims, Dimensions::planar(3, 3));
        assert_eq!(dims.count(), 9);
    }

    #[test]
    fn test_sector_boundaries_16() {
        let sector_dims = sector_grid_dimensions(Dimensions::isotropic(128), 8);
        let boundaries = sector_boundaries(sector_dims.width);
        let expected = [
            -0.5, -0.4375, -0.375, -0.3125, -0.25, -0.1875, -0.125, -0.0625, 0.0, 0.0625, 0.125,
            0.1875, 0.25, 0.3125, 0.375, 0.4375, 0.5,
        ];
        assert_eq!(boundaries.len(), expected.len());
        for (b, e) in boundaries.iter().zip(expected) {
            assert!((b - e).abs() < EPS, "boundary {b} != {e}");
        }
    }

    #[test]
    fn test_sector_boundaries_3() {
        let boundaries = sector_boundaries(3);
        let expected = [-0.5, -0.16666, 0.16666, 0.5];
        for (b, e) in boundaries.iter().zip(expected) {
            assert!((b - e).abs() < EPS, "boundary {b} != {e}");
        }
    }

    #[test]
    fn test_boundaries_agree_with_mapper() {
        for count in 1..=64usize {
            let b = sector_boundaries(count);
            for i in 0..count {
                let mid = 0.5 * (b[i] + b[i + 1]);
                assert_eq!(sector_index(mid, count) as usize, i, "count={count} i={i}");
            }
        }

        // Power-of-two counts have exactly representable boundaries.
        for count in [1usize, 2, 4, 8, 16, 32, 64] {
            let b = sector_boundaries(count);
            for (i, &boundary) in b.iter().enumerate() {
                let expected = i.min(count - 1);
                assert_eq!(sector_index(boundary, count) as usize, expected);
            }
        }
    }

    #[test]
    fn test_every_interior_boundary_opens_its_sector() {
        // 1/5, 1/7, 1/10 ... round below the exact boundary in f32.
        for count in 1..=512usize {
            let b = sector_boundaries(count);
            assert_eq!(b.len(), count + 1);
            assert_eq!((b[0], b[count]), (-0.5, 0.5));
            for i in 1..count {
                assert_eq!(sector_index(b[i], count) as usize, i, "count={count} i={i}");
                assert_eq!(
                    sector_index(b[i].next_down(), count) as usize,
                    i - 1,
                    "count={count} i={i}"
                );
                assert!(b[i - 1] < b[i]);
            }
        }
        assert_eq!(sector_index(sector_boundaries(5)[1], 5), 1);
        assert_eq!(sector_index(sector_boundaries(10)[2], 10), 2);
    }

    #[test]
    fn test_dense_linearization() {
        assert!(is_dense_linearization(Dimensions::isotropic(3)));
        assert!(is_dense_linearization(Dimensions::planar(5, 5)));
        assert!(is_dense_linearization(Dimensions::planar(7, 1)));
        assert!(is_dense_linearization(Dimensions::new(6, 1, 1)));
        assert!(is_dense_linearization(Dimensions::new(4, 4, 1)));
        assert!(is_dense_linearization(Dimensions::new(2, 1, 2)));
        assert!(!is_dense_linearization(Dimensions::new(24, 24, 21)));
        assert!(!is_dense_linearization(Dimensions::planar(2, 4)));
        assert!(!is_dense_linearization(Dimensions::new(4, 2, 2)));
        assert!(!is_dense_linearization(Dimensions::isotropic(1 << 40)));
        assert!(is_dense_linearization(Dimensions::new(1 << 40, 0, 1 << 40)));
    }

    #[test]
    fn test_dense_linearization_matches_brute_force() {
        for w in 1..=4usize {
            for h in 1..=4usize {
                for d in 1..=4usize {
                    let dims = Dimensions::new(w, h, d);
                    let mut seen = vec![false; dims.count()];
                    let mut dense = true;
                    for z in 0..d {
                        for y in 0..h {
                            for x in 0..w {
                                let idx = linearize(UVec3::new(x as u32, y as u32, z as u32), dims);
                                if idx >= seen.len() || seen[idx] {
                                    dense = false;
                                } else {
                                    seen[idx] = true;
                                }
                            }
                        }
                    }
                    assert_eq!(is_dense_linearization(dims), dense, "dims={dims}");
                }
            }
        }
    }

    #[test]
    fn test_sector_centers() {
        let grid = Dimensions::isotropic(16).scaled(1.5);
        let sector_dims = sector_grid_dimensions(grid, 8);
        let centers = sector_centers(sector_dims, 8);

        assert_eq!(centers.len(), 27);
        assert_eq!(centers[0], UVec3::new(4, 4, 4));
        assert_eq!(centers[1], UVec3::new(12, 4, 4));
        assert_eq!(centers[26], UVec3::new(20, 20, 20));
    }

    #[test]
    fn test_edge_sector_center_uses_full_width_offset() {
        // 20 cells / width 8 -> sectors cover [0,8), [8,16), [16,20).
        let sector_dims = sector_grid_dimensions(Dimensions::isotropic(20), 8);
        assert_eq!(sector_dims, Dimensions::isotropic(3));

        let centers = sector_centers(sector_dims, 8);
        let last = centers[linearize(UVec3::new(2, 2, 2), sector_dims)];
        // Not the midpoint of the truncated sector (18), but 16 + 8/2.
        assert_eq!(last, UVec3::new(20, 20, 20));
    }

    #[test]
    fn test_sector_centers_planar() {
        let centers = sector_centers(Dimensions::planar(2, 2), 5);
        assert_eq!(
            centers,
            vec![
                UVec3::new(2, 2, 0),
                UVec3::new(7, 2, 0),
                UVec3::new(2, 7, 0),
                UVec3::new(7, 7, 0),
            ]
        );
    }
}
