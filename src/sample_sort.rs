//! Stable ordering of samples by sector ordinal.
//!
//! All variants produce the same permutation: samples ordered by
//! `(sector, original index)`. The counting sort is the fast path; the
//! comparison sort is kept as a reference for tests and benchmarks.

/// Samples in sector order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SortedSamples {
    /// Original sample ordinals, grouped by sector, ascending within a sector.
    pub permutation: Vec<u32>,
    /// Sector ordinal of each entry of `permutation` (non-decreasing).
    pub sectors: Vec<u32>,
    /// Number of samples per sector. Length: sector count.
    pub counts: Vec<u32>,
}

impl SortedSamples {
    pub fn len(&self) -> usize {
        self.permutation.len()
    }

    pub fn is_empty(&self) -> bool {
        self.permutation.is_empty()
    }
}

/// Number of samples assigned to each of `sector_count` sectors.
pub fn sector_histogram(assignment: &[u32], sector_count: usize) -> Vec<u32> {
    let mut counts = vec![0u32; sector_count];
    for &sector in assignment {
        counts[sector as usize] += 1;
    }
    counts
}

fn exclusive_prefix_sum(counts: &[u32]) -> Vec<u32> {
    let mut starts = Vec::with_capacity(counts.len());
    let mut sum = 0u32;
    for &count in counts {
        starts.push(sum);
        sum += count;
    }
    starts
}

fn expand_sectors(counts: &[u32], n: usize) -> Vec<u32> {
    let mut sectors = Vec::with_capacity(n);
    for (sector, &count) in counts.iter().enumerate() {
        sectors.extend(std::iter::repeat(sector as u32).take(count as usize));
    }
    sectors
}

/// Counting sort over sector ordinals. O(n + sector_count).
///
/// Every ordinal in `assignment` must be below `sector_count`.
pub fn counting_sort(assignment: &[u32], sector_count: usize) -> SortedSamples {
    // Step 1: histogram
    let counts = sector_histogram(assignment, sector_count);

    // Step 2: prefix sum to get each sector's first slot
    let mut cursors = exclusive_prefix_sum(&counts);

    // Step 3: scatter in original order, which keeps ties stable
    let mut permutation = vec![0u32; assignment.len()];
    for (i, &sector) in assignment.iter().enumerate() {
        let slot = &mut cursors[sector as usize];
        permutation[*slot as usize] = i as u32;
        *slot += 1;
    }

    let sectors = expand_sectors(&counts, assignment.len());
    SortedSamples {
        permutation,
        sectors,
        counts,
    }
}

/// Smallest chunk the parallel sort splits into. Inputs that fit in one
/// chunk go through [`counting_sort`].
#[cfg_attr(feature = "single-threaded", allow(dead_code))]
const PAR_MIN_CHUNK: usize = 1 << 14;

/// Parallel counting sort: per-chunk histograms, a scan over
/// `(sector, chunk)`, then a parallel scatter.
///
/// Chunk `c` writes sector `s` entries after every entry of sector `s` from
/// chunks `< c`, so the result is bit-identical to [`counting_sort`].
pub fn counting_sort_par(assignment: &[u32], sector_count: usize) -> SortedSamples {
    #[cfg(not(feature = "single-threaded"))]
    {
        use rayon::prelude::*;
        use std::sync::atomic::{AtomicU32, Ordering};

        let n = assignment.len();
        let threads = rayon::current_num_threads().max(1);
        let chunk_len = n.div_ceil(threads * 4).max(PAR_MIN_CHUNK);
        if n <= chunk_len {
            return counting_sort(assignment, sector_count);
        }

        // Pass 1: per-chunk histograms.
        let chunk_counts: Vec<Vec<u32>> = assignment
            .par_chunks(chunk_len)
            .map(|chunk| sector_histogram(chunk, sector_count))
            .collect();

        let mut counts = vec![0u32; sector_count];
        for hist in &chunk_counts {
            for (total, &c) in counts.iter_mut().zip(hist) {
                *total += c;
            }
        }

        // Scan in (sector, chunk) order: each chunk's first slot per sector.
        let sector_starts = exclusive_prefix_sum(&counts);
        let mut chunk_cursors = Vec::with_capacity(chunk_counts.len());
        let mut running = sector_starts;
        for hist in &chunk_counts {
            chunk_cursors.push(running.clone());
            for (r, &c) in running.iter_mut().zip(hist) {
                *r += c;
            }
        }

        // Pass 2: scatter. Slots are disjoint across chunks.
        let slots: Vec<AtomicU32> = (0..n).map(|_| AtomicU32::new(0)).collect();
        assignment
            .par_chunks(chunk_len)
            .zip(chunk_cursors.into_par_iter())
            .enumerate()
            .for_each(|(chunk_idx, (chunk, mut cursors))| {
                let base = chunk_idx * chunk_len;
                for (j, &sector) in chunk.iter().enumerate() {
                    let slot = &mut cursors[sector as usize];
                    slots[*slot as usize].store((base + j) as u32, Ordering::Relaxed);
                    *slot += 1;
                }
            });
        let permutation = slots.into_iter().map(AtomicU32::into_inner).collect();

        let sectors = expand_sectors(&counts, n);
        SortedSamples {
            permutation,
            sectors,
            counts,
        }
    }
    #[cfg(feature = "single-threaded")]
    {
        counting_sort(assignment, sector_count)
    }
}

/// Reference sort keyed on `(sector, index)`. O(n log n).
///
/// The key order matters: keying on `(index, sector)` would leave the input
/// order untouched.
pub fn comparison_sort(assignment: &[u32], sector_count: usize) -> SortedSamples {
    let mut permutation: Vec<u32> = (0..assignment.len() as u32).collect();
    permutation.sort_unstable_by_key(|&i| (assignment[i as usize], i));

    let sectors = permutation
        .iter()
        .map(|&i| assignment[i as usize])
        .collect();
    SortedSamples {
        permutation,
        sectors,
        counts: sector_histogram(assignment, sector_count),
    }
}
