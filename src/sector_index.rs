//! Per-sector offset table (CSR row pointer) over the sorted samples.
//!
//! `offsets[s]..offsets[s + 1]` is the range of the sorted permutation that
//! holds sector `s`. Length is `sector_count + 1`, entry 0 is 0 and the last
//! entry is the sample count.

use std::ops::Range;

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SectorOffsets(Vec<u32>);

impl SectorOffsets {
    /// Build from a non-decreasing sector ordinal sequence in one pass.
    ///
    /// For each sector the cursor advances past every entry equal to it, so
    /// empty sectors repeat the previous offset and sectors past the largest
    /// present ordinal all get `sorted_sectors.len()`.
    pub fn from_sorted(sorted_sectors: &[u32], sector_count: usize) -> Self {
        debug_assert!(sorted_sectors.windows(2).all(|w| w[0] <= w[1]));
        let n = sorted_sectors.len();
        let mut offsets = Vec::with_capacity(sector_count + 1);
        offsets.push(0u32);

        let mut cursor = 0usize;
        for sector in 0..sector_count as u32 {
            while cursor < n && sorted_sectors[cursor] == sector {
                cursor += 1;
            }
            offsets.push(cursor as u32);
        }
        debug_assert_eq!(cursor, n, "sector ordinal out of range");
        Self(offsets)
    }

    /// Build from per-sector counts with a prefix sum. Same result as
    /// [`SectorOffsets::from_sorted`] for the same samples.
    pub fn from_counts(counts: &[u32]) -> Self {
        let mut offsets = Vec::with_capacity(counts.len() + 1);
        offsets.push(0u32);
        let mut sum = 0u32;
        for &count in counts {
            sum += count;
            offsets.push(sum);
        }
        Self(offsets)
    }

    pub fn sector_count(&self) -> usize {
        self.0.len() - 1
    }

    /// Total number of samples.
    pub fn total(&self) -> usize {
        self.0[self.0.len() - 1] as usize
    }

    /// Range of the sorted permutation holding sector `sector`.
    #[inline]
    pub fn range(&self, sector: usize) -> Range<usize> {
        self.0[sector] as usize..self.0[sector + 1] as usize
    }

    #[inline]
    pub fn count(&self, sector: usize) -> usize {
        (self.0[sector + 1] - self.0[sector]) as usize
    }

    pub fn as_slice(&self) -> &[u32] {
        &self.0
    }

    pub fn into_inner(self) -> Vec<u32> {
        self.0
    }
}
