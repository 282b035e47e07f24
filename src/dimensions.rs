//! Grid extents shared by the oversampled grid and the sector grid.

use std::fmt;
use std::ops::Mul;

/// Extent of a 3-axis grid, or a planar 2-axis grid when `depth` is `None`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Dimensions {
    pub width: usize,
    pub height: usize,
    pub depth: Option<usize>,
}

impl Dimensions {
    pub const fn new(width: usize, height: usize, depth: usize) -> Self {
        Self {
            width,
            height,
            depth: Some(depth),
        }
    }

    pub const fn planar(width: usize, height: usize) -> Self {
        Self {
            width,
            height,
            depth: None,
        }
    }

    /// Cube with the same extent on every axis.
    pub const fn isotropic(extent: usize) -> Self {
        Self::new(extent, extent, extent)
    }

    #[inline]
    pub fn is_planar(&self) -> bool {
        self.depth.is_none()
    }

    /// Number of axes (2 or 3).
    #[inline]
    pub fn axes(&self) -> usize {
        if self.is_planar() {
            2
        } else {
            3
        }
    }

    /// Depth extent, with a planar grid counting as a single layer.
    #[inline]
    pub fn depth_or_one(&self) -> usize {
        self.depth.unwrap_or(1)
    }

    /// Total element count. Zero if any extent is zero.
    ///
    /// Overflows for oversized extents; use [`Dimensions::checked_count`] on
    /// unvalidated input.
    #[inline]
    pub fn count(&self) -> usize {
        self.width * self.height * self.depth_or_one()
    }

    /// Total element count, or `None` if it does not fit in `usize`.
    pub fn checked_count(&self) -> Option<usize> {
        self.width
            .checked_mul(self.height)?
            .checked_mul(self.depth_or_one())
    }

    /// Whether any extent is zero.
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0 || self.depth == Some(0)
    }

    /// Apply `f` to every present extent.
    pub fn map(self, mut f: impl FnMut(usize) -> usize) -> Self {
        Self {
            width: f(self.width),
            height: f(self.height),
            depth: self.depth.map(f),
        }
    }

    /// Scale every extent by `factor`, truncating toward zero.
    ///
    /// Used to derive the oversampled grid from the base image size, e.g.
    /// 16 × 1.5 → 24 and 124 × 1.5 → 186.
    pub fn scaled(self, factor: f64) -> Self {
        debug_assert!(factor.is_finite() && factor > 0.0);
        self.map(|extent| (extent as f64 * factor) as usize)
    }
}

impl Mul<f64> for Dimensions {
    type Output = Dimensions;

    fn mul(self, factor: f64) -> Dimensions {
        self.scaled(factor)
    }
}

impl fmt::Display for Dimensions {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.depth {
            Some(depth) => write!(f, "{}x{}x{}", self.width, self.height, depth),
            None => write!(f, "{}x{}", self.width, self.height),
        }
    }
}
