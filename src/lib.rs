//! Sector decomposition and sample sorting for non-uniform gridding.
//!
//! Splits an oversampled grid into fixed-width sectors, maps each scattered
//! sample in [-0.5, 0.5]ᵈ to its sector, and orders the samples so that every
//! sector's samples are one contiguous range described by an offset table.
//! The convolution kernel then walks `permutation[offsets[s]..offsets[s + 1]]`
//! per sector.
//!
//! # Example
//!
//! ```
//! use gridding_sectors::{precompute, Dimensions, PrecomputeConfig, SampleCoords};
//!
//! let samples = SampleCoords::new_3d(
//!     vec![-0.5, -0.3, -0.1, 0.1, 0.3, 0.5],
//!     vec![-0.5, -0.5, 0.0, 0.0, 0.5, 0.45],
//!     vec![-0.33, -0.16666, 0.0, 0.0, -0.23, 0.45],
//! )
//! .unwrap();
//! let config = PrecomputeConfig::from_image(Dimensions::isotropic(16), 1.5, 8).unwrap();
//!
//! let result = precompute(&samples, &config).expect("valid input");
//! assert_eq!(result.sector_dims(), Dimensions::isotropic(3));
//! assert_eq!(result.permutation(), &[0, 4, 1, 2, 3, 5]);
//! assert_eq!(result.sector_samples(13), &[2, 3]);
//! ```

pub mod dimensions;
pub mod error;
pub mod precompute;
pub mod sample_sort;
pub mod samples;
pub mod sector_grid;
pub mod sector_index;
pub mod sector_mapper;
pub mod util;

pub use dimensions::Dimensions;
pub use error::{PrecomputeError, Result};
pub use precompute::{precompute, PrecomputeConfig, SectorPrecomputation, SectorStats};
pub use sample_sort::SortedSamples;
pub use samples::SampleCoords;
pub use sector_index::SectorOffsets;
pub use util::PhaseTimings;
