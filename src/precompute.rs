//! Validated entry point: samples + grid configuration → sector layout.
//!
//! Runs the stages leaf to root (sector grid, assignment, sort, offsets) and
//! hands back one owned [`SectorPrecomputation`]. Every configuration and
//! input check happens before the first stage, so a failed call produces no
//! output at all.

use glam::UVec3;

use crate::dimensions::Dimensions;
use crate::error::{PrecomputeError, Result};
use crate::sample_sort::{counting_sort, counting_sort_par};
use crate::samples::SampleCoords;
use crate::sector_grid::{is_dense_linearization, sector_centers, sector_grid_dimensions};
use crate::sector_index::SectorOffsets;
use crate::sector_mapper::{assign_sectors, assign_sectors_par};
use crate::util::{PhaseTimings, Timed};

/// Grid configuration for one precomputation run.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PrecomputeConfig {
    /// Oversampled grid dimensions.
    pub grid: Dimensions,
    pub sector_width: usize,
    /// Use the rayon variants of assignment and sorting. Output is identical.
    pub parallel: bool,
}

impl PrecomputeConfig {
    pub fn new(grid: Dimensions, sector_width: usize) -> Self {
        Self {
            grid,
            sector_width,
            parallel: false,
        }
    }

    /// Derive the oversampled grid from a base image size.
    pub fn from_image(image: Dimensions, oversampling: f64, sector_width: usize) -> Result<Self> {
        if !oversampling.is_finite() || oversampling <= 0.0 {
            return Err(PrecomputeError::InvalidOversampling(oversampling));
        }
        Ok(Self::new(image.scaled(oversampling), sector_width))
    }

    pub fn with_parallel(mut self, parallel: bool) -> Self {
        self.parallel = parallel;
        self
    }

    /// Check the configuration and return the sector grid dimensions.
    pub fn validate(&self) -> Result<Dimensions> {
        if self.sector_width == 0 {
            return Err(PrecomputeError::ZeroSectorWidth);
        }
        let sector_dims = sector_grid_dimensions(self.grid, self.sector_width);
        if sector_dims.is_empty() {
            return Err(PrecomputeError::EmptySectorGrid { grid: self.grid });
        }
        // Sector ordinals are u32.
        let fits = sector_dims
            .checked_count()
            .is_some_and(|count| count <= u32::MAX as usize);
        if !fits || !is_dense_linearization(sector_dims) {
            return Err(PrecomputeError::UnsupportedSectorGrid { sector_dims });
        }
        Ok(sector_dims)
    }
}

/// Sample distribution over sectors.
#[derive(Debug, Clone, PartialEq)]
pub struct SectorStats {
    pub num_sectors: usize,
    pub num_samples: usize,
    pub min_samples_per_sector: usize,
    pub max_samples_per_sector: usize,
    pub empty_sectors: usize,
    pub avg_samples_per_sector: f64,
}

/// Result of a precomputation run.
#[derive(Debug, Clone)]
pub struct SectorPrecomputation {
    sector_dims: Dimensions,
    sector_width: usize,
    /// Sector ordinal per original sample.
    assignment: Vec<u32>,
    /// Sample ordinals grouped by sector.
    permutation: Vec<u32>,
    offsets: SectorOffsets,
    timings: PhaseTimings,
}

/// Run the full precomputation for `samples` on the grid in `config`.
pub fn precompute(
    samples: &SampleCoords,
    config: &PrecomputeConfig,
) -> Result<SectorPrecomputation> {
    let timer = Timed::debug("validate", samples.len());
    let sector_dims = config.validate()?;
    if config.grid.axes() != samples.axes() {
        return Err(PrecomputeError::AxisCountMismatch {
            grid_axes: config.grid.axes(),
            sample_axes: samples.axes(),
        });
    }
    if samples.len() > u32::MAX as usize {
        return Err(PrecomputeError::TooManySamples(samples.len()));
    }
    samples.validate_range()?;
    let validate = timer.finish();

    let sector_count = sector_dims.count();
    log::debug!(
        "precompute: {} samples, grid {}, sector width {}, {} sectors ({})",
        samples.len(),
        config.grid,
        config.sector_width,
        sector_count,
        sector_dims
    );

    let timer = Timed::debug("assign sectors", samples.len());
    let assignment = if config.parallel {
        assign_sectors_par(samples, sector_dims)
    } else {
        assign_sectors(samples, sector_dims)
    };
    let assign = timer.finish();

    let timer = Timed::debug("sort samples", samples.len());
    let sorted = if config.parallel {
        counting_sort_par(&assignment, sector_count)
    } else {
        counting_sort(&assignment, sector_count)
    };
    let sort = timer.finish();

    let timer = Timed::debug("sector offsets", samples.len());
    let offsets = SectorOffsets::from_sorted(&sorted.sectors, sector_count);
    let offsets_time = timer.finish();
    debug_assert_eq!(offsets.total(), samples.len());

    Ok(SectorPrecomputation {
        sector_dims,
        sector_width: config.sector_width,
        assignment,
        permutation: sorted.permutation,
        offsets,
        timings: PhaseTimings {
            validate,
            assign,
            sort,
            offsets: offsets_time,
        },
    })
}

impl SectorPrecomputation {
    pub fn sector_dims(&self) -> Dimensions {
        self.sector_dims
    }

    pub fn sector_width(&self) -> usize {
        self.sector_width
    }

    pub fn num_sectors(&self) -> usize {
        self.offsets.sector_count()
    }

    pub fn num_samples(&self) -> usize {
        self.permutation.len()
    }

    /// Sector ordinal of every sample, in original order.
    pub fn assignment(&self) -> &[u32] {
        &self.assignment
    }

    pub fn permutation(&self) -> &[u32] {
        &self.permutation
    }

    pub fn offsets(&self) -> &SectorOffsets {
        &self.offsets
    }

    pub fn timings(&self) -> PhaseTimings {
        self.timings
    }

    /// Original ordinals of the samples in `sector`, ascending.
    #[inline]
    pub fn sector_samples(&self, sector: usize) -> &[u32] {
        &self.permutation[self.offsets.range(sector)]
    }

    /// Iterate `(sector, samples)` over non-empty sectors.
    pub fn occupied_sectors(&self) -> impl Iterator<Item = (usize, &[u32])> + '_ {
        (0..self.num_sectors())
            .map(|s| (s, self.sector_samples(s)))
            .filter(|(_, samples)| !samples.is_empty())
    }

    /// `samples` reordered into sector order.
    pub fn sorted_coords(&self, samples: &SampleCoords) -> SampleCoords {
        samples.permuted(&self.permutation)
    }

    /// Grid-cell center of each sector, indexed by sector ordinal.
    pub fn sector_centers(&self) -> Vec<UVec3> {
        sector_centers(self.sector_dims, self.sector_width)
    }

    pub fn stats(&self) -> SectorStats {
        let num_sectors = self.num_sectors();
        let mut min_samples = usize::MAX;
        let mut max_samples = 0usize;
        let mut empty = 0usize;

        for sector in 0..num_sectors {
            let count = self.offsets.count(sector);
            min_samples = min_samples.min(count);
            max_samples = max_samples.max(count);
            if count == 0 {
                empty += 1;
            }
        }

        SectorStats {
            num_sectors,
            num_samples: self.num_samples(),
            min_samples_per_sector: min_samples,
            max_samples_per_sector: max_samples,
            empty_sectors: empty,
            avg_samples_per_sector: self.num_samples() as f64 / num_sectors as f64,
        }
    }
}
