//! Structure-of-arrays storage for non-uniform sample coordinates.

use glam::{Vec2, Vec3};

use crate::error::{PrecomputeError, Result};

/// Normalized sample coordinates, axis-major.
///
/// All x values come first, then all y values, then (for 3-axis samples) all
/// z values. Sample `i` is `(data[i], data[i + n], data[i + 2n])`.
#[derive(Debug, Clone, PartialEq)]
pub struct SampleCoords {
    axes: usize,
    len: usize,
    data: Vec<f32>,
}

impl SampleCoords {
    pub fn new_3d(x: Vec<f32>, y: Vec<f32>, z: Vec<f32>) -> Result<Self> {
        Self::from_axes(vec![x, y, z])
    }

    pub fn new_2d(x: Vec<f32>, y: Vec<f32>) -> Result<Self> {
        Self::from_axes(vec![x, y])
    }

    fn from_axes(axes: Vec<Vec<f32>>) -> Result<Self> {
        let len = axes[0].len();
        for (axis, values) in axes.iter().enumerate().skip(1) {
            if values.len() != len {
                return Err(PrecomputeError::MismatchedAxisLengths {
                    axis,
                    expected: len,
                    actual: values.len(),
                });
            }
        }
        let num_axes = axes.len();
        let data = axes.into_iter().flatten().collect();
        Ok(Self {
            axes: num_axes,
            len,
            data,
        })
    }

    /// Wrap an existing axis-major buffer holding `axes` axes.
    pub fn from_soa(data: Vec<f32>, axes: usize) -> Result<Self> {
        if !(2..=3).contains(&axes) {
            return Err(PrecomputeError::InvalidAxisCount(axes));
        }
        if data.len() % axes != 0 {
            return Err(PrecomputeError::MalformedBuffer {
                len: data.len(),
                axes,
            });
        }
        Ok(Self {
            axes,
            len: data.len() / axes,
            data,
        })
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.len
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.len == 0
    }

    #[inline]
    pub fn axes(&self) -> usize {
        self.axes
    }

    /// All coordinates of one axis (0 = x, 1 = y, 2 = z).
    #[inline]
    pub fn axis(&self, axis: usize) -> &[f32] {
        debug_assert!(axis < self.axes);
        &self.data[axis * self.len..(axis + 1) * self.len]
    }

    /// Sample `i` as a 3D point. Planar samples get `z = 0`.
    #[inline]
    pub fn point3(&self, i: usize) -> Vec3 {
        let n = self.len;
        let z = if self.axes == 3 { self.data[i + 2 * n] } else { 0.0 };
        Vec3::new(self.data[i], self.data[i + n], z)
    }

    /// Sample `i` projected onto the xy plane.
    #[inline]
    pub fn point2(&self, i: usize) -> Vec2 {
        Vec2::new(self.data[i], self.data[i + self.len])
    }

    pub fn as_slice(&self) -> &[f32] {
        &self.data
    }

    pub fn into_inner(self) -> Vec<f32> {
        self.data
    }

    /// Check every component lies in [-0.5, 0.5].
    ///
    /// Reports the first offending component in axis-major order. NaN fails
    /// the check.
    pub fn validate_range(&self) -> Result<()> {
        for axis in 0..self.axes {
            let values = self.axis(axis);
            if let Some(sample) = values.iter().position(|v| !(-0.5..=0.5).contains(v)) {
                return Err(PrecomputeError::CoordinateOutOfRange {
                    sample,
                    axis,
                    value: values[sample],
                });
            }
        }
        Ok(())
    }

    /// Coordinates reordered so that sample `k` of the result is sample
    /// `perm[k]` of `self`.
    pub fn permuted(&self, perm: &[u32]) -> SampleCoords {
        debug_assert_eq!(perm.len(), self.len);
        let mut data = Vec::with_capacity(self.data.len());
        for axis in 0..self.axes {
            let values = self.axis(axis);
            data.extend(perm.iter().map(|&i| values[i as usize]));
        }
        SampleCoords {
            axes: self.axes,
            len: self.len,
            data,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_set() -> SampleCoords {
        SampleCoords::new_3d(
            vec![-0.5, -0.3, -0.1, 0.1, 0.3, 0.5],
            vec![-0.5, -0.5, 0.0, 0.0, 0.5, 0.45],
            vec![-0.33, -0.16666, 0.0, 0.0, -0.23, 0.45],
        )
        .unwrap()
    }

    #[test]
    fn test_soa_layout() {
        let coords = sample_set();
        assert_eq!(coords.len(), 6);
        assert_eq!(coords.axes(), 3);
        assert_eq!(coords.axis(1), &[-0.5, -0.5, 0.0, 0.0, 0.5, 0.45]);
        assert_eq!(coords.as_slice()[6], -0.5);
        assert_eq!(coords.as_slice()[12], -0.33);
        assert_eq!(coords.point3(5), Vec3::new(0.5, 0.45, 0.45));
        assert_eq!(coords.point2(4), Vec2::new(0.3, 0.5));
    }

    #[test]
    fn test_from_soa_matches_per_axis() {
        let coords = sample_set();
        let rebuilt = SampleCoords::from_soa(coords.as_slice().to_vec(), 3).unwrap();
        assert_eq!(rebuilt, coords);

        assert_eq!(
            SampleCoords::from_soa(vec![0.0; 7], 2),
            Err(PrecomputeError::MalformedBuffer { len: 7, axes: 2 })
        );
        assert_eq!(
            SampleCoords::from_soa(vec![0.0; 8], 4),
            Err(PrecomputeError::InvalidAxisCount(4))
        );
    }

    #[test]
    fn test_mismatched_axis_lengths() {
        let err = SampleCoords::new_3d(vec![0.0; 4], vec![0.0; 4], vec![0.0; 3]).unwrap_err();
        assert_eq!(
            err,
            PrecomputeError::MismatchedAxisLengths {
                axis: 2,
                expected: 4,
                actual: 3
            }
        );
    }

    #[test]
    fn test_planar_point3_has_zero_z() {
        let coords = SampleCoords::new_2d(vec![0.25], vec![-0.25]).unwrap();
        assert_eq!(coords.point3(0), Vec3::new(0.25, -0.25, 0.0));
    }

    #[test]
    fn test_validate_range() {
        assert!(sample_set().validate_range().is_ok());

        let coords = SampleCoords::new_2d(vec![0.0, 0.1], vec![0.2, -0.5001]).unwrap();
        assert_eq!(
            coords.validate_range(),
            Err(PrecomputeError::CoordinateOutOfRange {
                sample: 1,
                axis: 1,
                value: -0.5001
            })
        );

        let coords = SampleCoords::new_2d(vec![f32::NAN], vec![0.0]).unwrap();
        assert!(coords.validate_range().is_err());
    }

    #[test]
    fn test_permuted() {
        let coords = sample_set();
        let sorted = coords.permuted(&[0, 4, 1, 2, 3, 5]);
        assert_eq!(sorted.axis(0), &[-0.5, 0.3, -0.3, -0.1, 0.1, 0.5]);
        assert_eq!(sorted.axis(2), &[-0.33, -0.23, -0.16666, 0.0, 0.0, 0.45]);
        assert_eq!(sorted.point3(1), coords.point3(4));
    }
}
